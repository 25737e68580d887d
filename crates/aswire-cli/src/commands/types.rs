use aswire_proto::registry::{self, Role};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

const TYPES_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct TypesJson {
    schema_version: u32,
    types: Vec<TypeJson>,
}

#[derive(Serialize)]
struct TypeJson {
    name: &'static str,
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

fn role_parts(role: Role) -> (&'static str, Option<&'static str>) {
    match role {
        Role::Value => ("value", None),
        Role::Notification(event) => ("notification", Some(event)),
        Role::Request(method) => ("request", Some(method)),
        Role::Result(method) => ("result", Some(method)),
    }
}

/// List every registered type with the message it belongs to.
pub fn run(json: bool) -> Result<()> {
    let entries = registry::types();

    if json {
        let out = TypesJson {
            schema_version: TYPES_SCHEMA_VERSION,
            types: entries
                .iter()
                .map(|entry| {
                    let (role, message) = role_parts(entry.role);
                    TypeJson {
                        name: entry.name,
                        role,
                        message,
                    }
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        println!("{:<width$}  {}", entry.name, entry.role);
    }
    Ok(())
}
