use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::dispatch::Body;
use crate::error::{JsonRpcError, JsonRpcErrorObject};
use crate::message::JsonRpcMessage;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response; a `null` result is a valid "no value" answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: RequestId,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }
}

/// Union type that represents either a successful response or an error response
/// This ensures JSON-RPC 2.0 compliance by keeping success and error responses separate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcEnvelope {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

/// Serialized response body plus the transport status to send it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedResponse {
    pub status: StatusCode,
    /// Empty when nothing is to be answered
    pub body: String,
}

impl ProcessedResponse {
    pub fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, String::new())
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Envelope and status for every message that gets answered, in input order.
/// Notifications are left out.
pub fn message_responses(messages: &[JsonRpcMessage]) -> Vec<(StatusCode, JsonRpcEnvelope)> {
    messages
        .iter()
        .filter(|message| !message.is_notification())
        .map(|message| (message.status(), message.to_envelope()))
        .collect()
}

/// Assemble the response for a fully processed request body.
///
/// A single message answers with its own status. A batch answers with an array
/// and `200 OK` whatever its members carry. With nothing left to answer the body
/// is empty and the status is `204 No Content`.
pub fn build_response(body: &Body<JsonRpcMessage>) -> ProcessedResponse {
    match body {
        Body::Single(message) => {
            if message.is_notification() {
                return ProcessedResponse::no_content();
            }
            serialize_body(message.status(), &message.to_envelope())
        }
        Body::Batch(messages) => {
            let envelopes: Vec<JsonRpcEnvelope> = message_responses(messages)
                .into_iter()
                .map(|(_, envelope)| envelope)
                .collect();
            if envelopes.is_empty() {
                return ProcessedResponse::no_content();
            }
            serialize_body(StatusCode::OK, &envelopes)
        }
    }
}

fn serialize_body<T: Serialize>(status: StatusCode, payload: &T) -> ProcessedResponse {
    match serde_json::to_string(payload) {
        Ok(body) => ProcessedResponse::new(status, body),
        Err(err) => {
            error!("Failed to serialize JSON-RPC response: {}", err);
            let fallback = JsonRpcError::new(RequestId::Null, JsonRpcErrorObject::internal_error());
            ProcessedResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::to_string(&fallback).unwrap_or_default(),
            )
        }
    }
}
