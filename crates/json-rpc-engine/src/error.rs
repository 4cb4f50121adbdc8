use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::error_codes;
use crate::types::{JsonRpcVersion, RequestId};

/// JSON-RPC error kinds and their transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl ErrorKind {
    pub fn code(&self) -> i64 {
        match self {
            ErrorKind::ParseError => error_codes::PARSE_ERROR,
            ErrorKind::InvalidRequest => error_codes::INVALID_REQUEST,
            ErrorKind::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            ErrorKind::InvalidParams => error_codes::INVALID_PARAMS,
            ErrorKind::InternalError => error_codes::INTERNAL_ERROR,
            ErrorKind::ServerError(code) => *code,
        }
    }

    /// Label used as the prefix of every error message
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "ParseError",
            ErrorKind::InvalidRequest => "InvalidRequestError",
            ErrorKind::MethodNotFound => "MethodNotFoundError",
            ErrorKind::InvalidParams => "InvalidParamsError",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::ServerError(_) => "ServerError",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "Parse error.",
            ErrorKind::InvalidRequest => "Invalid Request.",
            ErrorKind::MethodNotFound => "Method not found.",
            ErrorKind::InvalidParams => "Invalid params.",
            ErrorKind::InternalError => "Internal error.",
            ErrorKind::ServerError(_) => "Server error.",
        }
    }

    /// Transport status reported for a single response carrying this error
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::InvalidRequest | ErrorKind::InvalidParams => StatusCode::BAD_REQUEST,
            ErrorKind::MethodNotFound => StatusCode::NOT_FOUND,
            ErrorKind::ParseError | ErrorKind::InternalError | ErrorKind::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Map a wire error code back to its kind
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            error_codes::PARSE_ERROR => Some(ErrorKind::ParseError),
            error_codes::INVALID_REQUEST => Some(ErrorKind::InvalidRequest),
            error_codes::METHOD_NOT_FOUND => Some(ErrorKind::MethodNotFound),
            error_codes::INVALID_PARAMS => Some(ErrorKind::InvalidParams),
            error_codes::INTERNAL_ERROR => Some(ErrorKind::InternalError),
            c if (error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END).contains(&c) => {
                Some(ErrorKind::ServerError(c))
            }
            _ => None,
        }
    }
}

/// JSON-RPC Error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    /// Build an error object; the message reads `"<KindName>: <detail>"`
    pub fn new(kind: ErrorKind, detail: Option<&str>, data: Option<Value>) -> Self {
        Self {
            code: kind.code(),
            message: format!("{}: {}", kind.name(), detail.unwrap_or(kind.message())),
            data,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(ErrorKind::ParseError, None, None)
    }

    pub fn invalid_request(detail: &str) -> Self {
        Self::new(ErrorKind::InvalidRequest, Some(detail), None)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorKind::MethodNotFound,
            Some(&format!("Method {} not found", method)),
            None,
        )
    }

    pub fn invalid_params(detail: &str) -> Self {
        Self::new(ErrorKind::InvalidParams, Some(detail), None)
    }

    /// The fixed, non-leaking error for failed handler invocations
    pub fn internal_error() -> Self {
        Self::new(
            ErrorKind::InternalError,
            Some("error executing service method"),
            None,
        )
    }

    /// Application-level error; `code` outside -32099..=-32000 falls back to -32000
    pub fn server_error(code: i64, message: &str, data: Option<Value>) -> Self {
        let code = if (error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END)
            .contains(&code)
        {
            code
        } else {
            tracing::warn!(
                "Server error code {} outside -32099..=-32000, using {}",
                code,
                error_codes::SERVER_ERROR
            );
            error_codes::SERVER_ERROR
        };
        Self::new(ErrorKind::ServerError(code), Some(message), data)
    }

    /// Kind of this error, `None` for codes outside the reserved ranges
    pub fn kind(&self) -> Option<ErrorKind> {
        ErrorKind::from_code(self.code)
    }

    /// Transport status for this error; unknown codes map to 500
    pub fn status(&self) -> StatusCode {
        self.kind()
            .map(|kind| kind.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// JSON-RPC Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub error: JsonRpcErrorObject,
    pub id: RequestId,
}

impl JsonRpcError {
    pub fn new(id: RequestId, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            error,
            id,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(RequestId::Null, JsonRpcErrorObject::parse_error())
    }

    pub fn status(&self) -> StatusCode {
        self.error.status()
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Errors returned by service handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Deliberate application failure, reported to the caller as a server error
    #[error("Server error {code}: {message}")]
    Server {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Runtime failure; the detail is logged but never sent to the caller
    #[error("Service method failed: {0}")]
    Failed(String),
}

impl ServiceError {
    pub fn server(message: impl Into<String>) -> Self {
        ServiceError::Server {
            code: error_codes::SERVER_ERROR,
            message: message.into(),
            data: None,
        }
    }

    pub fn failed(detail: impl fmt::Display) -> Self {
        ServiceError::Failed(detail.to_string())
    }

    /// Convert to the error object placed in the response
    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            ServiceError::Server {
                code,
                message,
                data,
            } => JsonRpcErrorObject::server_error(*code, message, data.clone()),
            ServiceError::Failed(_) => JsonRpcErrorObject::internal_error(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Failed(err.to_string())
    }
}

/// Errors raised while building the method registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Method '{0}' is already registered")]
    DuplicateMethod(String),

    #[error("Method name '{0}' is reserved for rpc-internal methods")]
    ReservedMethod(String),

    #[error("Method name must not be empty")]
    EmptyMethodName,

    #[error("Method '{method}' declares parameter '{param}' more than once")]
    DuplicateParameter { method: String, param: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::ParseError.code(), -32700);
        assert_eq!(ErrorKind::InvalidRequest.code(), -32600);
        assert_eq!(ErrorKind::MethodNotFound.code(), -32601);
        assert_eq!(ErrorKind::InvalidParams.code(), -32602);
        assert_eq!(ErrorKind::InternalError.code(), -32603);
        assert_eq!(ErrorKind::ServerError(-32000).code(), -32000);
    }

    #[test]
    fn test_error_status() {
        assert_eq!(ErrorKind::ParseError.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorKind::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::MethodNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::InvalidParams.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InternalError.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ErrorKind::ServerError(-32050).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_from_code() {
        assert_eq!(ErrorKind::from_code(-32601), Some(ErrorKind::MethodNotFound));
        assert_eq!(ErrorKind::from_code(-32042), Some(ErrorKind::ServerError(-32042)));
        assert_eq!(ErrorKind::from_code(-1), None);
        assert_eq!(
            JsonRpcErrorObject {
                code: 12,
                message: "custom".to_string(),
                data: None
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            JsonRpcErrorObject::method_not_found("foobar").message,
            "MethodNotFoundError: Method foobar not found"
        );
        assert_eq!(JsonRpcErrorObject::parse_error().message, "ParseError: Parse error.");
        assert_eq!(
            JsonRpcErrorObject::internal_error().message,
            "InternalError: error executing service method"
        );
    }

    #[test]
    fn test_server_error_code_is_clamped() {
        let error = JsonRpcErrorObject::server_error(-1, "boom", None);
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "ServerError: boom");

        let error = JsonRpcErrorObject::server_error(-32099, "edge", Some(json!({"retry": false})));
        assert_eq!(error.code, -32099);
        assert_eq!(error.data, Some(json!({"retry": false})));
    }

    #[test]
    fn test_service_error_conversion() {
        let server = ServiceError::server("Something went wrong").to_error_object();
        assert_eq!(server.code, -32000);
        assert_eq!(server.message, "ServerError: Something went wrong");

        let failed = ServiceError::failed("database offline").to_error_object();
        assert_eq!(failed.code, -32603);
        assert!(!failed.message.contains("database"));
    }

    #[test]
    fn test_error_serialization() {
        let error = JsonRpcError::new(
            RequestId::from(1),
            JsonRpcErrorObject::method_not_found("test"),
        );
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32601, "message": "MethodNotFoundError: Method test not found"},
                "id": 1
            })
        );
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let value = serde_json::to_value(JsonRpcError::parse_error()).unwrap();
        assert_eq!(value["id"], json!(null));
        assert_eq!(value["error"]["code"], json!(-32700));
    }
}
