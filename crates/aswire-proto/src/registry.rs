//! Static table of the known top-level protocol types.
//!
//! The table is built at compile time and never changes, so it can be read
//! from any number of threads.

use crate::common::{
    AnalysisError, AnalysisErrorsParams, AnalysisFoldingParams, AnalysisHighlightsParams,
    DiagnosticMessage, FoldingRegion, HighlightRegion, LinkedEditGroup, LinkedEditSuggestion,
    Location, Position, SourceChange, SourceEdit, SourceFileEdit,
};
use crate::completion::{
    AvailableSuggestion, AvailableSuggestionSet, CompletionAvailableSuggestionsParams,
    CompletionExistingImportsParams, ExistingImport, ExistingImports, ImportedElementSet,
    IncludedSuggestionSet,
};
use crate::element::{AnalysisOccurrencesParams, Element, Occurrences};
use crate::envelope::{Notification, Request, RequestError, Response};
use crate::flutter::{
    FlutterGetWidgetDescriptionResult, FlutterOutline, FlutterOutlineAttribute,
    FlutterOutlineParams, FlutterSetWidgetPropertyValueParams, FlutterWidgetProperty,
    FlutterWidgetPropertyEditor, FlutterWidgetPropertyValue, FlutterWidgetPropertyValueEnumItem,
};
use crate::navigation::{AnalysisNavigationParams, NavigationRegion, NavigationTarget};
use crate::outline::{AnalysisOutlineParams, Outline};
use crate::overlay::{
    AddContentOverlay, AnalysisUpdateContentParams, ChangeContentOverlay, ContentOverlay,
    RemoveContentOverlay,
};
use aswire_core::{
    Cursor, DecodeConfig, FromJson, ObjectReader, Problem, ProtocolType, RangeViolation, Result,
    ToJson, Tree,
};
use serde_json::Value;
use std::fmt;

/// Where a type appears in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Nested inside other values.
    Value,
    /// Params of the notification with this event name.
    Notification(&'static str),
    /// Params of the request with this method name.
    Request(&'static str),
    /// Result of the request with this method name.
    Result(&'static str),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => f.write_str("value"),
            Self::Notification(event) => write!(f, "notification {event}"),
            Self::Request(method) => write!(f, "request {method}"),
            Self::Result(method) => write!(f, "result of {method}"),
        }
    }
}

type NormalizeFn = fn(&Value, &Cursor<'_>) -> Result<Normalized>;

/// A decoded and re-encoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: Value,
    /// Range problems accepted under `RangePolicy::Flag`.
    pub violations: Vec<RangeViolation>,
}

/// A registered protocol type.
#[derive(Clone, Copy)]
pub struct TypeEntry {
    pub name: &'static str,
    pub role: Role,
    normalize: NormalizeFn,
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl TypeEntry {
    /// Decode `value` as this type and re-encode it.
    pub fn normalize(&self, value: &Value, config: &DecodeConfig) -> Result<Normalized> {
        (self.normalize)(value, &Cursor::root(self.name, config))
    }

    /// Like `normalize`, for a value nested at `cx`.
    pub fn normalize_at(&self, value: &Value, cx: &Cursor<'_>) -> Result<Normalized> {
        (self.normalize)(value, cx)
    }
}

fn normalize<T: ProtocolType>(value: &Value, cx: &Cursor<'_>) -> Result<Normalized> {
    let decoded = T::from_json(value, cx)?;
    Ok(Normalized {
        value: decoded.to_json(),
        violations: decoded.range_violations().into_iter().cloned().collect(),
    })
}

macro_rules! registry {
    ($($ty:ty => $role:expr),* $(,)?) => {
        &[$(
            TypeEntry {
                name: <$ty as ProtocolType>::TYPE_NAME,
                role: $role,
                normalize: normalize::<$ty>,
            },
        )*]
    };
}

static TYPES: &[TypeEntry] = registry! {
    Position => Role::Value,
    Location => Role::Value,
    SourceEdit => Role::Value,
    SourceFileEdit => Role::Value,
    LinkedEditSuggestion => Role::Value,
    LinkedEditGroup => Role::Value,
    SourceChange => Role::Value,
    DiagnosticMessage => Role::Value,
    AnalysisError => Role::Value,
    HighlightRegion => Role::Value,
    FoldingRegion => Role::Value,
    Element => Role::Value,
    Occurrences => Role::Value,
    NavigationRegion => Role::Value,
    NavigationTarget => Role::Value,
    Tree<Outline> => Role::Value,
    Tree<FlutterOutline> => Role::Value,
    FlutterOutlineAttribute => Role::Value,
    FlutterWidgetProperty => Role::Value,
    FlutterWidgetPropertyEditor => Role::Value,
    FlutterWidgetPropertyValue => Role::Value,
    FlutterWidgetPropertyValueEnumItem => Role::Value,
    ImportedElementSet => Role::Value,
    ExistingImport => Role::Value,
    ExistingImports => Role::Value,
    AvailableSuggestion => Role::Value,
    AvailableSuggestionSet => Role::Value,
    IncludedSuggestionSet => Role::Value,
    ContentOverlay => Role::Value,
    AddContentOverlay => Role::Value,
    ChangeContentOverlay => Role::Value,
    RemoveContentOverlay => Role::Value,
    RequestError => Role::Value,
    Request => Role::Value,
    Response => Role::Value,
    Notification => Role::Value,
    AnalysisErrorsParams => Role::Notification("analysis.errors"),
    AnalysisFoldingParams => Role::Notification("analysis.folding"),
    AnalysisHighlightsParams => Role::Notification("analysis.highlights"),
    AnalysisNavigationParams => Role::Notification("analysis.navigation"),
    AnalysisOccurrencesParams => Role::Notification("analysis.occurrences"),
    AnalysisOutlineParams => Role::Notification("analysis.outline"),
    FlutterOutlineParams => Role::Notification("flutter.outline"),
    CompletionExistingImportsParams => Role::Notification("completion.existingImports"),
    CompletionAvailableSuggestionsParams => Role::Notification("completion.availableSuggestions"),
    AnalysisUpdateContentParams => Role::Request("analysis.updateContent"),
    FlutterSetWidgetPropertyValueParams => Role::Request("flutter.setWidgetPropertyValue"),
    FlutterGetWidgetDescriptionResult => Role::Result("flutter.getWidgetDescription"),
};

/// Every registered type, in registration order.
#[must_use]
pub fn types() -> &'static [TypeEntry] {
    TYPES
}

/// Look a type up by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static TypeEntry> {
    TYPES.iter().find(|entry| entry.name == name)
}

/// The params type of the notification `event`.
#[must_use]
pub fn params_for_event(event: &str) -> Option<&'static TypeEntry> {
    TYPES
        .iter()
        .find(|entry| matches!(entry.role, Role::Notification(e) if e == event))
}

/// The params type of the request `method`.
#[must_use]
pub fn params_for_method(method: &str) -> Option<&'static TypeEntry> {
    TYPES
        .iter()
        .find(|entry| matches!(entry.role, Role::Request(m) if m == method))
}

/// The result type of the request `method`.
#[must_use]
pub fn result_for_method(method: &str) -> Option<&'static TypeEntry> {
    TYPES
        .iter()
        .find(|entry| matches!(entry.role, Role::Result(m) if m == method))
}

/// Envelope keys that identify a message, checked in this order.
pub const ENVELOPE_KEYS: &[&str] = &["event", "method", "id"];

/// Normalize a whole message whose kind is detected from its keys: `event`
/// marks a notification, `method` a request, and a bare `id` a response.
/// Params of registered events and methods are decoded too; anything else
/// inside the envelope is carried through as raw JSON.
pub fn normalize_message(value: &Value, config: &DecodeConfig) -> Result<Normalized> {
    let root = Cursor::root("Message", config);
    let reader = ObjectReader::open(value, "Message", &root)?;
    if reader.present("event") {
        normalize_notification(value, config)
    } else if reader.present("method") {
        normalize_request(value, config)
    } else if reader.present("id") {
        normalize::<Response>(value, &Cursor::root(Response::TYPE_NAME, config))
    } else {
        Err(root.malformed(Problem::MissingAlternative(ENVELOPE_KEYS)))
    }
}

fn normalize_notification(value: &Value, config: &DecodeConfig) -> Result<Normalized> {
    let root = Cursor::root(Notification::TYPE_NAME, config);
    let mut notification = Notification::from_json(value, &root)?;
    let mut violations = Vec::new();
    if let Some(entry) = params_for_event(&notification.event) {
        if let Some(params) = notification.params.take() {
            let params = entry.normalize_at(&params, &root.field("params"))?;
            notification.params = Some(params.value);
            violations = params.violations;
        }
    }
    Ok(Normalized {
        value: notification.to_json(),
        violations,
    })
}

fn normalize_request(value: &Value, config: &DecodeConfig) -> Result<Normalized> {
    let root = Cursor::root(Request::TYPE_NAME, config);
    let mut request = Request::from_json(value, &root)?;
    let mut violations = Vec::new();
    if let Some(entry) = params_for_method(&request.method) {
        if let Some(params) = request.params.take() {
            let params = entry.normalize_at(&params, &root.field("params"))?;
            request.params = Some(params.value);
            violations = params.violations;
        }
    }
    Ok(Normalized {
        value: request.to_json(),
        violations,
    })
}
