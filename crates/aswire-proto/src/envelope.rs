//! Message envelopes. Params and results stay as raw JSON here and are
//! decoded on demand into the catalog type the caller expects.

use aswire_core::{
    open_enum, protocol_object, Cursor, DecodeConfig, ProtocolType, Result, ToJson,
};
use serde_json::Value;

open_enum! {
    pub struct RequestErrorCode {
        CONTENT_MODIFIED = "CONTENT_MODIFIED",
        FILE_NOT_ANALYZED = "FILE_NOT_ANALYZED",
        FLUTTER_GET_WIDGET_DESCRIPTION_CONTENT_MODIFIED = "FLUTTER_GET_WIDGET_DESCRIPTION_CONTENT_MODIFIED",
        FLUTTER_GET_WIDGET_DESCRIPTION_NO_WIDGET = "FLUTTER_GET_WIDGET_DESCRIPTION_NO_WIDGET",
        FLUTTER_SET_WIDGET_PROPERTY_VALUE_INVALID_EXPRESSION = "FLUTTER_SET_WIDGET_PROPERTY_VALUE_INVALID_EXPRESSION",
        FLUTTER_SET_WIDGET_PROPERTY_VALUE_INVALID_ID = "FLUTTER_SET_WIDGET_PROPERTY_VALUE_INVALID_ID",
        FLUTTER_SET_WIDGET_PROPERTY_VALUE_IS_REQUIRED = "FLUTTER_SET_WIDGET_PROPERTY_VALUE_IS_REQUIRED",
        FORMAT_INVALID_FILE = "FORMAT_INVALID_FILE",
        FORMAT_WITH_ERRORS = "FORMAT_WITH_ERRORS",
        GET_ERRORS_INVALID_FILE = "GET_ERRORS_INVALID_FILE",
        INVALID_OVERLAY_CHANGE = "INVALID_OVERLAY_CHANGE",
        INVALID_PARAMETER = "INVALID_PARAMETER",
        INVALID_REQUEST = "INVALID_REQUEST",
        SERVER_ALREADY_STARTED = "SERVER_ALREADY_STARTED",
        SERVER_ERROR = "SERVER_ERROR",
        UNKNOWN_REQUEST = "UNKNOWN_REQUEST",
        UNSUPPORTED_FEATURE = "UNSUPPORTED_FEATURE",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct RequestError {
        required code: RequestErrorCode = "code",
        required message: String = "message",
        optional stack_trace: String = "stackTrace",
    }
}

protocol_object! {
    /// A request from the client.
    pub struct Request {
        required id: String = "id",
        required method: String = "method",
        optional params: Value = "params",
        /// Milliseconds since the epoch when the client sent the request.
        optional client_request_time: i64 = "clientRequestTime",
    }
}

protocol_object! {
    /// The server's answer to the request with the same `id`.
    pub struct Response {
        required id: String = "id",
        optional error: RequestError = "error",
        optional result: Value = "result",
    }
}

protocol_object! {
    /// A server-initiated message.
    pub struct Notification {
        required event: String = "event",
        optional params: Value = "params",
    }
}

fn decode_member<T: ProtocolType>(
    value: Option<&Value>,
    owner: &'static str,
    key: &'static str,
    config: &DecodeConfig,
) -> Result<Option<T>> {
    let root = Cursor::root(owner, config);
    let cx = root.field(key);
    value.map(|value| T::from_json(value, &cx)).transpose()
}

impl Request {
    #[must_use]
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            params: None,
            client_request_time: None,
        }
    }

    #[must_use]
    pub fn with_params<T: ToJson>(mut self, params: &T) -> Self {
        self.params = Some(params.to_json());
        self
    }

    /// Decode `params` as `T`. Errors report paths under `$.params`.
    pub fn params_as<T: ProtocolType>(&self) -> Result<Option<T>> {
        self.params_as_with(&DecodeConfig::default())
    }

    pub fn params_as_with<T: ProtocolType>(&self, config: &DecodeConfig) -> Result<Option<T>> {
        decode_member(self.params.as_ref(), "Request", "params", config)
    }
}

impl Response {
    #[must_use]
    pub fn success<T: ToJson>(id: impl Into<String>, result: &T) -> Self {
        Self {
            id: id.into(),
            error: None,
            result: Some(result.to_json()),
        }
    }

    #[must_use]
    pub fn failure(id: impl Into<String>, error: RequestError) -> Self {
        Self {
            id: id.into(),
            error: Some(error),
            result: None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decode `result` as `T`.
    pub fn result_as<T: ProtocolType>(&self) -> Result<Option<T>> {
        self.result_as_with(&DecodeConfig::default())
    }

    pub fn result_as_with<T: ProtocolType>(&self, config: &DecodeConfig) -> Result<Option<T>> {
        decode_member(self.result.as_ref(), "Response", "result", config)
    }
}

impl Notification {
    #[must_use]
    pub fn new<T: ToJson>(event: impl Into<String>, params: &T) -> Self {
        Self {
            event: event.into(),
            params: Some(params.to_json()),
        }
    }

    pub fn params_as<T: ProtocolType>(&self) -> Result<Option<T>> {
        self.params_as_with(&DecodeConfig::default())
    }

    pub fn params_as_with<T: ProtocolType>(&self, config: &DecodeConfig) -> Result<Option<T>> {
        decode_member(self.params.as_ref(), "Notification", "params", config)
    }
}
