use serde_json::Value;
use tracing::debug;

use crate::{
    error::JsonRpcErrorObject, message::JsonRpcMessage, request::RequestParams, types::RequestId,
};

/// Members a request object may carry
const REQUEST_MEMBERS: [&str; 4] = ["jsonrpc", "method", "params", "id"];

/// Shape of a request body: one message or an ordered batch
#[derive(Debug, Clone, PartialEq)]
pub enum Body<T> {
    Single(T),
    Batch(Vec<T>),
}

impl<T> Body<T> {
    pub fn is_batch(&self) -> bool {
        matches!(self, Body::Batch(_))
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Body::Single(item) => std::slice::from_ref(item),
            Body::Batch(items) => items,
        }
    }

    /// Transform every member, keeping the body's shape and order
    pub fn map<U, F>(self, mut f: F) -> Body<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Body::Single(item) => Body::Single(f(item)),
            Body::Batch(items) => Body::Batch(items.into_iter().map(f).collect()),
        }
    }
}

/// Parse a raw request body into candidate messages.
///
/// Fails with a terminal message when the body is not valid JSON (parse error) or
/// is an empty array (invalid request). Top-level values that are neither arrays
/// nor objects are passed on as a single candidate for the validator to reject.
pub fn parse_body(raw: &str) -> Result<Body<Value>, JsonRpcMessage> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        debug!("JSON-RPC parse error: {}", err);
        JsonRpcMessage::rejected(RequestId::Null, JsonRpcErrorObject::parse_error())
    })?;

    match value {
        Value::Array(items) if items.is_empty() => Err(JsonRpcMessage::rejected(
            RequestId::Null,
            JsonRpcErrorObject::invalid_request("Received an empty batch message."),
        )),
        Value::Array(items) => Ok(Body::Batch(items)),
        other => Ok(Body::Single(other)),
    }
}

/// Check one candidate against the JSON-RPC 2.0 request structure.
///
/// The first failing rule decides the error. Errors report the request's id when
/// a valid one was supplied and `null` otherwise. Only valid requests without an
/// `id` member are notifications; malformed candidates are always answered.
pub fn validate_message(candidate: Value) -> JsonRpcMessage {
    let Value::Object(mut object) = candidate else {
        return reject(
            RequestId::Null,
            "No valid JSON-RPC Message. Must be an object.",
        );
    };

    let id_member = object.remove("id");
    let id = id_member.as_ref().and_then(RequestId::from_value);
    let report_id = id.clone().unwrap_or_default();

    if object
        .keys()
        .any(|key| !REQUEST_MEMBERS.contains(&key.as_str()))
    {
        return reject(report_id, "Invalid members in request object");
    }

    match object.get("jsonrpc") {
        Some(Value::String(version)) if version == crate::JSONRPC_VERSION => {}
        _ => return reject(report_id, "Server supports JSON-RPC 2.0 only"),
    }

    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        Some(_) => return reject(report_id, "method must be a string"),
        None => return reject(report_id, "No method specified"),
    };

    let params = match object.remove("params") {
        None => None,
        Some(value) => match RequestParams::from_value(value) {
            Some(params) => Some(params),
            None => return reject(report_id, "params must be an array or object"),
        },
    };

    match (id_member, id) {
        (None, _) => JsonRpcMessage::notification(method, params),
        (Some(_), Some(id)) => JsonRpcMessage::request(id, method, params),
        (Some(_), None) => reject(RequestId::Null, "id must be a string, number or null"),
    }
}

fn reject(id: RequestId, detail: &str) -> JsonRpcMessage {
    debug!("Rejecting invalid JSON-RPC request: {}", detail);
    JsonRpcMessage::rejected(id, JsonRpcErrorObject::invalid_request(detail))
}
