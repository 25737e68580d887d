//! Elements and their flag bitmask.

use crate::common::Location;
use aswire_core::codec::wrong_type;
use aswire_core::{open_enum, protocol_object, Cursor, FromJson, ToJson};
use bitflags::bitflags;
use serde_json::Value;

open_enum! {
    pub struct ElementKind {
        CLASS = "CLASS",
        CLASS_TYPE_ALIAS = "CLASS_TYPE_ALIAS",
        COMPILATION_UNIT = "COMPILATION_UNIT",
        CONSTRUCTOR = "CONSTRUCTOR",
        CONSTRUCTOR_INVOCATION = "CONSTRUCTOR_INVOCATION",
        ENUM = "ENUM",
        ENUM_CONSTANT = "ENUM_CONSTANT",
        EXTENSION = "EXTENSION",
        FIELD = "FIELD",
        FILE = "FILE",
        FUNCTION = "FUNCTION",
        FUNCTION_INVOCATION = "FUNCTION_INVOCATION",
        FUNCTION_TYPE_ALIAS = "FUNCTION_TYPE_ALIAS",
        GETTER = "GETTER",
        LABEL = "LABEL",
        LIBRARY = "LIBRARY",
        LOCAL_VARIABLE = "LOCAL_VARIABLE",
        METHOD = "METHOD",
        MIXIN = "MIXIN",
        PARAMETER = "PARAMETER",
        PREFIX = "PREFIX",
        SETTER = "SETTER",
        TOP_LEVEL_VARIABLE = "TOP_LEVEL_VARIABLE",
        TYPE_ALIAS = "TYPE_ALIAS",
        TYPE_PARAMETER = "TYPE_PARAMETER",
        UNIT_TEST_GROUP = "UNIT_TEST_GROUP",
        UNIT_TEST_TEST = "UNIT_TEST_TEST",
        UNKNOWN = "UNKNOWN",
    }
}

bitflags! {
    /// Boolean facts about an element, packed into the `flags` integer.
    ///
    /// Bit positions are part of the wire format. Bits this version does not
    /// know are kept so the integer re-encodes unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ElementFlags: u32 {
        const ABSTRACT = 0x01;
        const CONST = 0x02;
        const FINAL = 0x04;
        const TOP_LEVEL_STATIC = 0x08;
        const PRIVATE = 0x10;
        const DEPRECATED = 0x20;
    }
}

impl FromJson for ElementFlags {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> aswire_core::Result<Self> {
        value
            .as_u64()
            .and_then(|bits| u32::try_from(bits).ok())
            .map(Self::from_bits_retain)
            .ok_or_else(|| wrong_type(cx, "flag bitmask", value))
    }
}

impl ToJson for ElementFlags {
    fn to_json(&self) -> Value {
        Value::from(self.bits())
    }
}

protocol_object! {
    /// Information about a declared element.
    #[derive(Eq, Hash)]
    pub struct Element {
        required kind: ElementKind = "kind",
        required name: String = "name",
        optional location: Location = "location",
        required flags: ElementFlags = "flags",
        /// Parameter list, including parentheses, for executable elements.
        optional parameters: String = "parameters",
        optional return_type: String = "returnType",
        optional type_parameters: String = "typeParameters",
        optional aliased_type: String = "aliasedType",
    }
}

impl Element {
    /// An element with only the required fields set.
    #[must_use]
    pub fn new(kind: ElementKind, name: impl Into<String>, flags: ElementFlags) -> Self {
        Self {
            kind,
            name: name.into(),
            location: None,
            flags,
            parameters: None,
            return_type: None,
            type_parameters: None,
            aliased_type: None,
        }
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ElementFlags::ABSTRACT)
    }

    #[must_use]
    pub fn is_const(&self) -> bool {
        self.flags.contains(ElementFlags::CONST)
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.flags.contains(ElementFlags::FINAL)
    }

    #[must_use]
    pub fn is_top_level_or_static(&self) -> bool {
        self.flags.contains(ElementFlags::TOP_LEVEL_STATIC)
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.flags.contains(ElementFlags::PRIVATE)
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.flags.contains(ElementFlags::DEPRECATED)
    }
}

protocol_object! {
    /// References to one element within a file.
    #[derive(Eq, Hash)]
    pub struct Occurrences {
        required element: Element = "element",
        required offsets: Vec<i64> = "offsets",
        required length: i64 = "length",
    }
}

protocol_object! {
    /// Params of the `analysis.occurrences` notification.
    #[derive(Eq, Hash)]
    pub struct AnalysisOccurrencesParams {
        required file: String = "file",
        required occurrences: Vec<Occurrences> = "occurrences",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aswire_core::{decode, encode, Problem};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_flag_bits_are_stable() {
        assert_eq!(ElementFlags::ABSTRACT.bits(), 0x01);
        assert_eq!(ElementFlags::CONST.bits(), 0x02);
        assert_eq!(ElementFlags::FINAL.bits(), 0x04);
        assert_eq!(ElementFlags::TOP_LEVEL_STATIC.bits(), 0x08);
        assert_eq!(ElementFlags::PRIVATE.bits(), 0x10);
        assert_eq!(ElementFlags::DEPRECATED.bits(), 0x20);
    }

    #[test]
    fn test_element_accessors() {
        let json = json!({"kind": "CLASS", "name": "_Foo", "flags": 0x11});
        let element: Element = decode(&json).unwrap();
        assert!(element.is_abstract());
        assert!(element.is_private());
        assert!(!element.is_const());
        assert!(!element.is_deprecated());
        assert_eq!(encode(&element), json);
    }

    #[test]
    fn test_unknown_bits_survive() {
        let json = json!({"kind": "FIELD", "name": "x", "flags": 0x104});
        let element: Element = decode(&json).unwrap();
        assert!(element.is_final());
        assert_eq!(encode(&element)["flags"], json!(0x104));
    }

    #[test]
    fn test_negative_flags_rejected() {
        let err = decode::<Element>(&json!({"kind": "FIELD", "name": "x", "flags": -1}))
            .unwrap_err();
        assert_eq!(err.path(), Some("$.flags"));
        assert!(matches!(
            err.problem(),
            Some(Problem::WrongType { expected: "flag bitmask", .. })
        ));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let element = Element::new(ElementKind::METHOD, "run", ElementFlags::empty());
        assert_eq!(
            aswire_core::encode_string(&element),
            r#"{"kind":"METHOD","name":"run","flags":0}"#
        );
    }

    proptest! {
        #[test]
        fn prop_accessors_match_bits(flags in 0u32..0x400) {
            let json = json!({"kind": "METHOD", "name": "m", "flags": flags});
            let element: Element = decode(&json).unwrap();
            prop_assert_eq!(element.is_abstract(), flags & 0x01 != 0);
            prop_assert_eq!(element.is_const(), flags & 0x02 != 0);
            prop_assert_eq!(element.is_final(), flags & 0x04 != 0);
            prop_assert_eq!(element.is_top_level_or_static(), flags & 0x08 != 0);
            prop_assert_eq!(element.is_private(), flags & 0x10 != 0);
            prop_assert_eq!(element.is_deprecated(), flags & 0x20 != 0);
            prop_assert_eq!(encode(&element)["flags"].as_u64(), Some(u64::from(flags)));
        }
    }
}
