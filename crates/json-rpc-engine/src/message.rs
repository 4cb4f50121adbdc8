//! Per-request message descriptor.
//!
//! Every candidate taken from a request body becomes one [`JsonRpcMessage`]. The
//! descriptor keeps its position in the batch while it moves through validation,
//! binding and dispatch, and ends up holding exactly one outcome.

use http::StatusCode;
use serde_json::Value;

use crate::error::{JsonRpcError, JsonRpcErrorObject};
use crate::request::RequestParams;
use crate::response::{JsonRpcEnvelope, JsonRpcResponse};
use crate::types::RequestId;

/// Result or error held by a processed message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    Result(Value),
    Error(JsonRpcErrorObject),
}

/// One JSON-RPC request/response unit
#[derive(Debug, Clone, Default)]
pub struct JsonRpcMessage {
    pub id: RequestId,
    pub method: Option<String>,
    pub params: Option<RequestParams>,
    /// True for a valid request that carried no `id` member
    pub notification: bool,
    outcome: Option<MessageOutcome>,
}

impl JsonRpcMessage {
    /// A structurally valid request, ready to be bound and dispatched
    pub fn request(id: RequestId, method: String, params: Option<RequestParams>) -> Self {
        Self {
            id,
            method: Some(method),
            params,
            notification: false,
            outcome: None,
        }
    }

    /// A structurally valid notification
    pub fn notification(method: String, params: Option<RequestParams>) -> Self {
        Self {
            notification: true,
            ..Self::request(RequestId::Null, method, params)
        }
    }

    /// A message that failed before it could be dispatched
    pub fn rejected(id: RequestId, error: JsonRpcErrorObject) -> Self {
        Self {
            id,
            outcome: Some(MessageOutcome::Error(error)),
            ..Self::default()
        }
    }

    pub fn set_result(&mut self, result: Value) {
        self.outcome = Some(MessageOutcome::Result(result));
    }

    pub fn set_error(&mut self, error: JsonRpcErrorObject) {
        self.outcome = Some(MessageOutcome::Error(error));
    }

    pub fn outcome(&self) -> Option<&MessageOutcome> {
        self.outcome.as_ref()
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Some(MessageOutcome::Result(value)) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcErrorObject> {
        match &self.outcome {
            Some(MessageOutcome::Error(error)) => Some(error),
            _ => None,
        }
    }

    /// Whether processing has finished for this message
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_notification(&self) -> bool {
        self.notification
    }

    /// Transport status for this message when answered on its own
    pub fn status(&self) -> StatusCode {
        match &self.outcome {
            Some(MessageOutcome::Error(error)) => error.status(),
            _ => StatusCode::OK,
        }
    }

    /// Response envelope; a message without an outcome answers with a null result
    pub fn to_envelope(&self) -> JsonRpcEnvelope {
        match &self.outcome {
            Some(MessageOutcome::Error(error)) => {
                JsonRpcEnvelope::Error(JsonRpcError::new(self.id.clone(), error.clone()))
            }
            Some(MessageOutcome::Result(value)) => {
                JsonRpcEnvelope::Response(JsonRpcResponse::new(self.id.clone(), value.clone()))
            }
            None => JsonRpcEnvelope::Response(JsonRpcResponse::new(self.id.clone(), Value::Null)),
        }
    }
}
