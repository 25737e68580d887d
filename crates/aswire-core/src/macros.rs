//! Declarative schemas for protocol types.
//!
//! A protocol record is written once as an ordered field list and the
//! struct, its codec impls and the serde bridge are generated from it.

/// Declare a protocol record.
///
/// ```
/// aswire_core::protocol_object! {
///     /// A position in a file.
///     #[derive(Eq, Hash)]
///     pub struct Position {
///         required file: String = "file",
///         required offset: i64 = "offset",
///         optional label: String = "label",
///     }
/// }
///
/// let p: Position = aswire_core::decode_str(r#"{"file":"/a.dart","offset":3}"#).unwrap();
/// assert_eq!(p.label, None);
/// assert_eq!(aswire_core::encode_string(&p), r#"{"file":"/a.dart","offset":3}"#);
/// ```
///
/// A constant discriminator is written first and checked on decode:
/// `pub struct AddContentOverlay: tag "type" = "add" { ... }`.
/// A trailing `validate = path;` runs after all fields have been decoded.
#[macro_export]
macro_rules! protocol_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: tag $tag_key:literal = $tag_value:literal)? {
            $(
                $(#[$field_meta:meta])*
                $kind:ident $field:ident : $ty:ty = $key:literal
            ),* $(,)?
        }
        $(validate = $validate:path;)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::__field_type!($kind $ty),
            )*
        }

        impl $crate::ProtocolType for $name {
            const TYPE_NAME: &'static str = stringify!($name);
        }

        impl $crate::FromJson for $name {
            fn from_json(
                value: &$crate::__private::Value,
                cx: &$crate::Cursor<'_>,
            ) -> $crate::Result<Self> {
                let reader = $crate::ObjectReader::open(value, stringify!($name), cx)?;
                $( reader.expect_tag($tag_key, $tag_value)?; )?
                let decoded = Self {
                    $( $field: $crate::__field_decode!($kind reader, $key), )*
                };
                $( $validate(&decoded, reader.cursor())?; )?
                Ok(decoded)
            }

            fn range_violations(&self) -> ::std::vec::Vec<&$crate::RangeViolation> {
                #[allow(unused_mut)]
                let mut found = ::std::vec::Vec::new();
                $( $crate::__field_violations!($kind found, &self.$field); )*
                found
            }
        }

        impl $crate::ToJson for $name {
            fn to_json(&self) -> $crate::__private::Value {
                #[allow(unused_mut)]
                let mut writer = $crate::ObjectWriter::new();
                $( writer.tag($tag_key, $tag_value); )?
                $( $crate::__field_encode!($kind writer, $key, &self.$field); )*
                writer.finish()
            }
        }

        $crate::serde_via_json!($name);
    };
}

/// Declare an open string enum: a string newtype with named constants for
/// the known members. Unknown members decode and re-encode verbatim.
#[macro_export]
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(::std::borrow::Cow<'static, str>);

        impl $name {
            $(
                $(#[$variant_meta])*
                pub const $variant: Self = Self(::std::borrow::Cow::Borrowed($wire));
            )*

            /// Wire values of the known members.
            pub const KNOWN: &'static [&'static str] = &[$($wire),*];

            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                let value = value.into();
                match Self::KNOWN.iter().find(|known| **known == value) {
                    Some(known) => Self(::std::borrow::Cow::Borrowed(*known)),
                    None => Self(::std::borrow::Cow::Owned(value)),
                }
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether this is one of the members known to this version.
            #[must_use]
            pub fn is_known(&self) -> bool {
                Self::KNOWN.contains(&self.as_str())
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::convert::From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl ::std::convert::From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl $crate::ProtocolType for $name {
            const TYPE_NAME: &'static str = stringify!($name);
        }

        impl $crate::FromJson for $name {
            fn from_json(
                value: &$crate::__private::Value,
                cx: &$crate::Cursor<'_>,
            ) -> $crate::Result<Self> {
                match value.as_str() {
                    Some(s) => Ok(Self::new(s)),
                    None => Err($crate::codec::wrong_type(cx, "string", value)),
                }
            }
        }

        impl $crate::ToJson for $name {
            fn to_json(&self) -> $crate::__private::Value {
                $crate::__private::Value::String(self.0.to_string())
            }
        }

        $crate::serde_via_json!($name);
    };
}

/// Implement serde `Serialize`/`Deserialize` by going through the codec, so
/// protocol types can sit inside ordinary serde structs.
#[macro_export]
macro_rules! serde_via_json {
    ($name:ty) => {
        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(
                    &$crate::ToJson::to_json(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <$crate::__private::Value as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                $crate::decode::<Self>(&value)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_type {
    (required $ty:ty) => { $ty };
    (optional $ty:ty) => { ::core::option::Option<$ty> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_decode {
    (required $reader:ident, $key:literal) => { $reader.required($key)? };
    (optional $reader:ident, $key:literal) => { $reader.optional($key)? };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_encode {
    (required $writer:ident, $key:literal, $value:expr) => { $writer.put($key, $value) };
    (optional $writer:ident, $key:literal, $value:expr) => { $writer.put_opt($key, $value) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_violations {
    (required $found:ident, $value:expr) => {
        $found.extend($crate::FromJson::range_violations($value))
    };
    (optional $found:ident, $value:expr) => {
        if let ::core::option::Option::Some(value) = $value {
            $found.extend($crate::FromJson::range_violations(value));
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{decode, decode_str, encode, encode_string, Problem};
    use serde_json::json;

    crate::open_enum! {
        pub struct Fruit {
            APPLE = "APPLE",
            PEAR = "PEAR",
        }
    }

    crate::protocol_object! {
        #[derive(Eq, Hash)]
        pub struct Basket {
            required owner: String = "owner",
            required fruit: Vec<Fruit> = "fruit",
            optional note: String = "note",
        }
    }

    crate::protocol_object! {
        pub struct Tagged: tag "kind" = "tagged" {
            required value: i64 = "value",
        }
    }

    crate::protocol_object! {
        pub struct Checked {
            required value: i64 = "value",
        }
        validate = check_value;
    }

    fn check_value(checked: &Checked, cx: &crate::Cursor<'_>) -> crate::Result<()> {
        if checked.value < 0 {
            return Err(cx.field("value").malformed(Problem::WrongType {
                expected: "non-negative integer",
                found: checked.value.to_string(),
            }));
        }
        Ok(())
    }

    #[test]
    fn test_open_enum_keeps_unknown_member() {
        let basket: Basket =
            decode(&json!({"owner": "ann", "fruit": ["APPLE", "DURIAN"]})).unwrap();
        assert_eq!(basket.fruit[0], Fruit::APPLE);
        assert!(basket.fruit[0].is_known());
        assert_eq!(basket.fruit[1].as_str(), "DURIAN");
        assert!(!basket.fruit[1].is_known());
        assert_eq!(encode(&basket), json!({"owner": "ann", "fruit": ["APPLE", "DURIAN"]}));
    }

    #[test]
    fn test_open_enum_owned_equals_constant() {
        assert_eq!(Fruit::new(String::from("PEAR")), Fruit::PEAR);
        assert_eq!(Fruit::from("PEAR").to_string(), "PEAR");
    }

    #[test]
    fn test_missing_required_field_names_type() {
        let err = decode::<Basket>(&json!({"fruit": []})).unwrap_err();
        assert_eq!(err.type_name(), Some("Basket"));
        assert_eq!(err.problem(), Some(&Problem::MissingField("owner")));
    }

    #[test]
    fn test_optional_null_is_omitted_on_encode() {
        let basket: Basket = decode(&json!({"owner": "ann", "fruit": [], "note": null})).unwrap();
        assert_eq!(basket.note, None);
        assert_eq!(encode_string(&basket), r#"{"owner":"ann","fruit":[]}"#);
    }

    #[test]
    fn test_tag_written_first_and_checked() {
        let tagged: Tagged = decode_str(r#"{"value":1,"kind":"tagged"}"#).unwrap();
        assert_eq!(encode_string(&tagged), r#"{"kind":"tagged","value":1}"#);

        let err = decode_str::<Tagged>(r#"{"kind":"other","value":1}"#).unwrap_err();
        assert!(matches!(err.problem(), Some(Problem::UnknownTag { .. })));
    }

    #[test]
    fn test_validate_hook_runs() {
        assert!(decode::<Checked>(&json!({"value": 3})).is_ok());
        let err = decode::<Checked>(&json!({"value": -3})).unwrap_err();
        assert_eq!(err.path(), Some("$.value"));
    }

    #[test]
    fn test_serde_bridge() {
        let basket: Basket = serde_json::from_str(r#"{"owner":"bo","fruit":["PEAR"]}"#).unwrap();
        assert_eq!(serde_json::to_string(&basket).unwrap(), r#"{"owner":"bo","fruit":["PEAR"]}"#);
        assert!(serde_json::from_str::<Basket>(r#"{"fruit":["PEAR"]}"#).is_err());
    }
}
