//! Flutter outline and widget property types.

use crate::common::Location;
use crate::element::Element;
use aswire_core::codec::wrong_type;
use aswire_core::{
    open_enum, protocol_object, serde_via_json, Cursor, FiniteF64, FromJson, ObjectReader,
    ObjectWriter, ProtocolType, Result, TextRange, ToJson, Tree, TreePayload,
};
use serde_json::Value;

open_enum! {
    pub struct FlutterOutlineKind {
        DART_ELEMENT = "DART_ELEMENT",
        GENERIC = "GENERIC",
        NEW_INSTANCE = "NEW_INSTANCE",
        INVOCATION = "INVOCATION",
        VARIABLE = "VARIABLE",
        PLACEHOLDER = "PLACEHOLDER",
    }
}

open_enum! {
    pub struct FlutterWidgetPropertyEditorKind {
        BOOL = "BOOL",
        DOUBLE = "DOUBLE",
        ENUM = "ENUM",
        ENUM_LIKE = "ENUM_LIKE",
        INT = "INT",
        STRING = "STRING",
    }
}

protocol_object! {
    /// An argument attribute of a widget creation.
    #[derive(Eq, Hash)]
    pub struct FlutterOutlineAttribute {
        required name: String = "name",
        required label: String = "label",
        optional literal_value_boolean: bool = "literalValueBoolean",
        optional literal_value_integer: i64 = "literalValueInteger",
        optional literal_value_string: String = "literalValueString",
        optional name_location: Location = "nameLocation",
        optional value_location: Location = "valueLocation",
    }
}

/// One node of a Flutter outline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlutterOutline {
    pub kind: FlutterOutlineKind,
    pub offset: i64,
    pub length: i64,
    pub code_offset: i64,
    pub code_length: i64,
    pub label: Option<String>,
    pub dart_element: Option<Element>,
    pub attributes: Option<Vec<FlutterOutlineAttribute>>,
    pub class_name: Option<String>,
    pub parent_association_label: Option<String>,
    pub variable_name: Option<String>,
}

impl TreePayload for FlutterOutline {
    const TYPE_NAME: &'static str = "FlutterOutline";

    fn decode(reader: &ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Self {
            kind: reader.required("kind")?,
            offset: reader.required("offset")?,
            length: reader.required("length")?,
            code_offset: reader.required("codeOffset")?,
            code_length: reader.required("codeLength")?,
            label: reader.optional("label")?,
            dart_element: reader.optional("dartElement")?,
            attributes: reader.optional("attributes")?,
            class_name: reader.optional("className")?,
            parent_association_label: reader.optional("parentAssociationLabel")?,
            variable_name: reader.optional("variableName")?,
        })
    }

    fn encode(&self, writer: &mut ObjectWriter) {
        writer.put("kind", &self.kind);
        writer.put("offset", &self.offset);
        writer.put("length", &self.length);
        writer.put("codeOffset", &self.code_offset);
        writer.put("codeLength", &self.code_length);
        writer.put_opt("label", &self.label);
        writer.put_opt("dartElement", &self.dart_element);
        writer.put_opt("attributes", &self.attributes);
        writer.put_opt("className", &self.class_name);
        writer.put_opt("parentAssociationLabel", &self.parent_association_label);
        writer.put_opt("variableName", &self.variable_name);
    }

    fn range(&self) -> TextRange {
        TextRange::new(self.offset, self.length)
    }
}

protocol_object! {
    /// Params of the `flutter.outline` notification.
    #[derive(Eq, Hash)]
    pub struct FlutterOutlineParams {
        required file: String = "file",
        required outline: Tree<FlutterOutline> = "outline",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct FlutterWidgetPropertyValueEnumItem {
        required library_uri: String = "libraryUri",
        required class_name: String = "className",
        required name: String = "name",
        optional documentation: String = "documentation",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct FlutterWidgetPropertyEditor {
        required kind: FlutterWidgetPropertyEditorKind = "kind",
        optional enum_items: Vec<FlutterWidgetPropertyValueEnumItem> = "enumItems",
    }
}

/// The value of a widget property: exactly one of its alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlutterWidgetPropertyValue {
    Bool(bool),
    Double(FiniteF64),
    Int(i64),
    String(String),
    Enum(FlutterWidgetPropertyValueEnumItem),
    /// Free-form expression used as the value verbatim.
    Expression(String),
}

impl FlutterWidgetPropertyValue {
    /// Alternative keys, in the order they are checked.
    pub const ALTERNATIVES: &'static [&'static str] = &[
        "boolValue",
        "doubleValue",
        "intValue",
        "stringValue",
        "enumValue",
        "expression",
    ];

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolValue",
            Self::Double(_) => "doubleValue",
            Self::Int(_) => "intValue",
            Self::String(_) => "stringValue",
            Self::Enum(_) => "enumValue",
            Self::Expression(_) => "expression",
        }
    }
}

impl ProtocolType for FlutterWidgetPropertyValue {
    const TYPE_NAME: &'static str = "FlutterWidgetPropertyValue";
}

impl FromJson for FlutterWidgetPropertyValue {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        let reader = ObjectReader::open(value, Self::TYPE_NAME, cx)?;
        let key = reader.union_alternative(Self::ALTERNATIVES)?;
        Ok(match key {
            "boolValue" => Self::Bool(reader.required(key)?),
            "doubleValue" => Self::Double(reader.required(key)?),
            "intValue" => Self::Int(reader.required(key)?),
            "stringValue" => Self::String(reader.required(key)?),
            "enumValue" => Self::Enum(reader.required(key)?),
            "expression" => Self::Expression(reader.required(key)?),
            other => {
                let found = Value::from(other);
                return Err(wrong_type(reader.cursor(), "widget property value", &found));
            }
        })
    }
}

impl ToJson for FlutterWidgetPropertyValue {
    fn to_json(&self) -> Value {
        let mut writer = ObjectWriter::new();
        let key = self.key();
        match self {
            Self::Bool(v) => writer.put(key, v),
            Self::Double(v) => writer.put(key, v),
            Self::Int(v) => writer.put(key, v),
            Self::String(v) | Self::Expression(v) => writer.put(key, v),
            Self::Enum(v) => writer.put(key, v),
        }
        writer.finish()
    }
}

serde_via_json!(FlutterWidgetPropertyValue);

protocol_object! {
    /// A property of a widget, possibly with nested properties.
    #[derive(Eq, Hash)]
    pub struct FlutterWidgetProperty {
        optional documentation: String = "documentation",
        optional expression: String = "expression",
        required id: i64 = "id",
        required is_required: bool = "isRequired",
        required is_safe_to_update: bool = "isSafeToUpdate",
        required name: String = "name",
        optional children: Vec<FlutterWidgetProperty> = "children",
        optional editor: FlutterWidgetPropertyEditor = "editor",
        optional value: FlutterWidgetPropertyValue = "value",
    }
}

protocol_object! {
    /// Result of `flutter.getWidgetDescription`.
    #[derive(Eq, Hash)]
    pub struct FlutterGetWidgetDescriptionResult {
        required properties: Vec<FlutterWidgetProperty> = "properties",
    }
}

protocol_object! {
    /// Params of `flutter.setWidgetPropertyValue`. An absent value removes
    /// the argument.
    #[derive(Eq, Hash)]
    pub struct FlutterSetWidgetPropertyValueParams {
        required id: i64 = "id",
        optional value: FlutterWidgetPropertyValue = "value",
    }
}
