//! The value codec shared by every protocol type.
//!
//! Decoding rules:
//! - a required field that is absent or `null` is a `MalformedMessage`
//! - an optional field that is absent or `null` decodes to `None`
//! - `None` is never written; the key is omitted instead
//! - integers must be JSON integers, doubles accept any JSON number
//! - doubles are `FiniteF64`, so encoding never produces `null`

use crate::config::DecodeConfig;
use crate::cursor::Cursor;
use crate::error::{Error, Problem, Result};
use crate::tree::RangeViolation;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Decode a value from its JSON form.
pub trait FromJson: Sized {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self>;

    /// Tree range problems accepted under `RangePolicy::Flag`, here and in
    /// every nested value.
    fn range_violations(&self) -> Vec<&RangeViolation> {
        Vec::new()
    }
}

/// Encode a value to its JSON form.
pub trait ToJson {
    fn to_json(&self) -> Value;
}

/// A named top-level protocol type.
pub trait ProtocolType: FromJson + ToJson {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;
}

/// Short description of a JSON value for wrong-type errors.
#[must_use]
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {n}"),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// A wrong-type error for `value` at `cx`.
#[must_use]
pub fn wrong_type(cx: &Cursor<'_>, expected: &'static str, value: &Value) -> Error {
    cx.malformed(Problem::WrongType {
        expected,
        found: describe(value),
    })
}

impl FromJson for bool {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| wrong_type(cx, "boolean", value))
    }
}

impl ToJson for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromJson for i64 {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        value.as_i64().ok_or_else(|| wrong_type(cx, "integer", value))
    }
}

impl ToJson for i64 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

/// A JSON double. NaN and infinities have no JSON form, so they cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FiniteF64(f64);

impl FiniteF64 {
    /// `None` for NaN and infinities.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FiniteF64 {
    type Error = f64;

    fn try_from(value: f64) -> std::result::Result<Self, f64> {
        Self::new(value).ok_or(value)
    }
}

impl From<FiniteF64> for f64 {
    fn from(value: FiniteF64) -> Self {
        value.0
    }
}

// NaN is excluded, so `==` is reflexive.
impl Eq for FiniteF64 {}

impl std::hash::Hash for FiniteF64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // 0.0 == -0.0, so both must hash alike.
        let canonical = if self.0 == 0.0 { 0.0_f64 } else { self.0 };
        canonical.to_bits().hash(state);
    }
}

impl FromJson for FiniteF64 {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        value
            .as_f64()
            .and_then(Self::new)
            .ok_or_else(|| wrong_type(cx, "number", value))
    }
}

impl ToJson for FiniteF64 {
    fn to_json(&self) -> Value {
        Value::from(self.0)
    }
}

impl FromJson for String {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| wrong_type(cx, "string", value))
    }
}

impl ToJson for String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

/// Opaque JSON, used for envelope payloads decoded in a second step.
impl FromJson for Value {
    fn from_json(value: &Value, _cx: &Cursor<'_>) -> Result<Self> {
        Ok(value.clone())
    }
}

impl ToJson for Value {
    fn to_json(&self) -> Value {
        self.clone()
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| wrong_type(cx, "array", value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_json(item, &cx.index(i)))
            .collect()
    }

    fn range_violations(&self) -> Vec<&RangeViolation> {
        self.iter().flat_map(T::range_violations).collect()
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(ToJson::to_json).collect())
    }
}

impl<T: FromJson> FromJson for BTreeMap<String, T> {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        let entries = value
            .as_object()
            .ok_or_else(|| wrong_type(cx, "object", value))?;
        entries
            .iter()
            .map(|(key, item)| -> Result<(String, T)> {
                Ok((key.clone(), T::from_json(item, &cx.key(key))?))
            })
            .collect()
    }

    fn range_violations(&self) -> Vec<&RangeViolation> {
        self.values().flat_map(T::range_violations).collect()
    }
}

impl<T: ToJson> ToJson for BTreeMap<String, T> {
    fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, item)| (key.clone(), item.to_json()))
                .collect(),
        )
    }
}

/// Field access over one JSON object, owned by one protocol type.
pub struct ObjectReader<'v, 'c> {
    map: &'v Map<String, Value>,
    cx: Cursor<'c>,
}

impl<'v, 'c> ObjectReader<'v, 'c> {
    /// Open `value` as the JSON object of a `owner` value.
    pub fn open(value: &'v Value, owner: &'static str, cx: &Cursor<'c>) -> Result<Self> {
        let cx = cx.with_owner(owner);
        match value {
            Value::Object(map) => Ok(Self { map, cx }),
            other => Err(wrong_type(&cx, "object", other)),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> &Cursor<'c> {
        &self.cx
    }

    /// The value of `key`, with `null` treated as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'v Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn required<T: FromJson>(&self, key: &'static str) -> Result<T> {
        match self.get(key) {
            Some(value) => T::from_json(value, &self.cx.field(key)),
            None => Err(self.cx.malformed(Problem::MissingField(key))),
        }
    }

    pub fn optional<T: FromJson>(&self, key: &'static str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| T::from_json(value, &self.cx.field(key)))
            .transpose()
    }

    /// Check a constant discriminator such as `"type": "add"`.
    pub fn expect_tag(&self, key: &'static str, expected: &'static str) -> Result<()> {
        let found: String = self.required(key)?;
        if found == expected {
            Ok(())
        } else {
            Err(self.cx.field(key).malformed(Problem::UnknownTag { key, found }))
        }
    }

    /// The single key of a one-of union that is present, checked in the
    /// order given.
    pub fn union_alternative(&self, alternatives: &'static [&'static str]) -> Result<&'static str> {
        let present: Vec<&'static str> = alternatives
            .iter()
            .copied()
            .filter(|key| self.present(key))
            .collect();
        match present.as_slice() {
            [only] => Ok(*only),
            [] => Err(self.cx.malformed(Problem::MissingAlternative(alternatives))),
            _ => Err(self.cx.ambiguous(present)),
        }
    }
}

/// Builds one JSON object, keeping keys in insertion order.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    map: Map<String, Value>,
}

impl ObjectWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(&mut self, key: &str, value: &str) {
        self.map
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn put<T: ToJson + ?Sized>(&mut self, key: &str, value: &T) {
        self.map.insert(key.to_string(), value.to_json());
    }

    /// Write `value` if present; `None` omits the key.
    pub fn put_opt<T: ToJson>(&mut self, key: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.put(key, value);
        }
    }

    #[must_use]
    pub fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

/// Decode a `T` message with the default configuration.
pub fn decode<T: ProtocolType>(value: &Value) -> Result<T> {
    decode_with(value, &DecodeConfig::default())
}

/// Decode a `T` message.
pub fn decode_with<T: ProtocolType>(value: &Value, config: &DecodeConfig) -> Result<T> {
    T::from_json(value, &Cursor::root(T::TYPE_NAME, config))
}

/// Parse and decode a `T` message from JSON text.
pub fn decode_str<T: ProtocolType>(text: &str) -> Result<T> {
    decode_str_with(text, &DecodeConfig::default())
}

/// Parse and decode a `T` message from JSON text.
pub fn decode_str_with<T: ProtocolType>(text: &str, config: &DecodeConfig) -> Result<T> {
    let value: Value = serde_json::from_str(text)?;
    decode_with(&value, config)
}

#[must_use]
pub fn encode<T: ToJson + ?Sized>(value: &T) -> Value {
    value.to_json()
}

/// Encode to compact JSON text.
#[must_use]
pub fn encode_string<T: ToJson + ?Sized>(value: &T) -> String {
    value.to_json().to_string()
}
