#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! Protocol type catalog for the analysis server wire protocol.
//!
//! Types are declared as schemas with the `aswire-core` macros. Messages that
//! ship reference tables (`AnalysisNavigationParams`, `ImportedElementSet`,
//! `ExistingImports`) validate every index while decoding and expose
//! `resolve()` for the bound form plus a builder for the flat form.
//! Outlines decode into `aswire_core::Tree`.

pub mod common;
pub mod completion;
pub mod element;
pub mod envelope;
pub mod flutter;
pub mod navigation;
pub mod outline;
pub mod overlay;
pub mod registry;

pub use common::{
    AnalysisError, AnalysisErrorSeverity, AnalysisErrorType, AnalysisErrorsParams,
    AnalysisFoldingParams, AnalysisHighlightsParams, DiagnosticMessage, FileKind, FoldingKind,
    FoldingRegion, HighlightRegion, HighlightRegionType, LinkedEditGroup, LinkedEditSuggestion,
    LinkedEditSuggestionKind, Location, Position, SourceChange, SourceEdit, SourceFileEdit,
};
pub use completion::{
    AvailableSuggestion, AvailableSuggestionSet, CompletionAvailableSuggestionsParams,
    CompletionExistingImportsParams, ExistingImport, ExistingImports, ExistingImportsBuilder,
    ImportedElement, ImportedElementSet, ImportedElementSetBuilder, IncludedSuggestionSet,
    ResolvedImport,
};
pub use element::{AnalysisOccurrencesParams, Element, ElementFlags, ElementKind, Occurrences};
pub use envelope::{Notification, Request, RequestError, RequestErrorCode, Response};
pub use flutter::{
    FlutterGetWidgetDescriptionResult, FlutterOutline, FlutterOutlineAttribute, FlutterOutlineKind,
    FlutterOutlineParams, FlutterSetWidgetPropertyValueParams, FlutterWidgetProperty,
    FlutterWidgetPropertyEditor, FlutterWidgetPropertyEditorKind, FlutterWidgetPropertyValue,
    FlutterWidgetPropertyValueEnumItem,
};
pub use navigation::{
    AnalysisNavigationParams, NavigationBuilder, NavigationRegion, NavigationTarget,
    ResolvedNavigation, ResolvedRegion, ResolvedTarget,
};
pub use outline::{AnalysisOutlineParams, Outline};
pub use overlay::{
    AddContentOverlay, AnalysisUpdateContentParams, ChangeContentOverlay, ContentOverlay,
    RemoveContentOverlay,
};
pub use registry::{normalize_message, params_for_event, Normalized, Role, TypeEntry};
