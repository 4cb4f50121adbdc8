use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::types::{JsonRpcVersion, RequestId};

/// Parameters for a JSON-RPC request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(HashMap<String, Value>),
}

impl RequestParams {
    /// Convert a raw `params` member, `None` unless it is an array or an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(vec) => Some(RequestParams::Array(vec)),
            Value::Object(map) => Some(RequestParams::Object(map.into_iter().collect())),
            _ => None,
        }
    }

    /// Get a parameter by name (for object params only)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    /// Get a parameter by index (for array params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            RequestParams::Object(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RequestParams::Object(map) => map.len(),
            RequestParams::Array(vec) => vec.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_named(&self) -> bool {
        matches!(self, RequestParams::Object(_))
    }
}

/// A JSON-RPC request as sent by a client.
///
/// A request without an id is a notification; the `id` member is then left out
/// of the serialized form entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params: None,
            id: Some(id.into()),
        }
    }

    /// Create a notification (no id member)
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params: None,
            id: None,
        }
    }

    pub fn with_array_params(mut self, params: Vec<Value>) -> Self {
        self.params = Some(RequestParams::Array(params));
        self
    }

    pub fn with_object_params(mut self, params: HashMap<String, Value>) -> Self {
        self.params = Some(RequestParams::Object(params));
        self
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}
