use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Options that change how strictly messages are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DecodeConfig {
    /// What to do with a tree whose node ranges are not properly nested.
    pub tree_ranges: RangePolicy,
}

impl DecodeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tree range policy.
    #[must_use]
    pub fn with_tree_ranges(mut self, policy: RangePolicy) -> Self {
        self.tree_ranges = policy;
        self
    }
}

/// Handling of tree nodes whose `[offset, offset+length)` range escapes the
/// parent range or overlaps a preceding sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Fail the decode with `MalformedMessage`.
    #[default]
    Reject,
    /// Accept the tree and record the violation on it.
    Flag,
}

impl RangePolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Flag => "flag",
        }
    }
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "flag" => Ok(Self::Flag),
            other => Err(format!(
                "unknown range policy `{other}` (expected `reject` or `flag`)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_bad_ranges() {
        assert_eq!(DecodeConfig::default().tree_ranges, RangePolicy::Reject);
    }

    #[test]
    fn test_policy_parses_case_insensitively() {
        assert_eq!("FLAG".parse::<RangePolicy>(), Ok(RangePolicy::Flag));
        assert_eq!("reject".parse::<RangePolicy>(), Ok(RangePolicy::Reject));
        assert!("warn".parse::<RangePolicy>().is_err());
    }

    #[test]
    fn test_config_serializes_lowercase_policy() {
        let config = DecodeConfig::new().with_tree_ranges(RangePolicy::Flag);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"tree_ranges":"flag"}"#);
    }
}
