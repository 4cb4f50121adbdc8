//! # JSON-RPC 2.0 Engine
//!
//! A transport-agnostic JSON-RPC 2.0 request/response engine. The engine takes an
//! already extracted request body, runs it through parsing, structural validation,
//! method resolution, parameter binding and dispatch, and hands back a serialized
//! response body together with the transport status code to send.
//!
//! ## Features
//! - Single requests, notifications and batches as laid down by JSON-RPC 2.0
//! - Positional and named parameters bound against declared handler signatures
//! - Handler faults (errors and panics) reported as a fixed internal error
//! - Immutable, shareable method registry built once at startup
//!
//! ```rust
//! use json_rpc_engine::prelude::*;
//! use serde_json::json;
//!
//! let engine = JsonRpcEngine::builder()
//!     .method_fn("subtract", &["minuend", "subtrahend"], |params| {
//!         let minuend: i64 = params.arg("minuend")?;
//!         let subtrahend: i64 = params.arg("subtrahend")?;
//!         Ok(json!(minuend - subtrahend))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let response = engine.process_blocking(
//!     r#"{"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1}"#,
//! );
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.body, r#"{"jsonrpc":"2.0","result":19,"id":1}"#);
//! ```

pub mod binder;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod message;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;

pub mod r#async;

// Re-export main types
pub use binder::{BoundParams, bind_params};
pub use dispatch::{Body, parse_body, validate_message};
pub use engine::{EngineConfig, JsonRpcEngine, JsonRpcEngineBuilder};
pub use error::{ErrorKind, JsonRpcError, JsonRpcErrorObject, RegistryError, ServiceError};
pub use message::{JsonRpcMessage, MessageOutcome};
pub use r#async::{FunctionHandler, JsonRpcHandler, SyncFunctionHandler};
pub use registry::{HandlerDescriptor, MethodRegistry, MethodSignature};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{
    JsonRpcEnvelope, JsonRpcResponse, ProcessedResponse, build_response, message_responses,
};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const SERVER_ERROR: i64 = -32000;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
