//! # JSON-RPC Engine Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! from the JSON-RPC engine library.
//!
//! ```rust
//! use json_rpc_engine::prelude::*;
//! ```

// Engine and registration
pub use crate::engine::{EngineConfig, JsonRpcEngine, JsonRpcEngineBuilder};
pub use crate::r#async::{FunctionHandler, JsonRpcHandler, SyncFunctionHandler};
pub use crate::registry::{MethodRegistry, MethodSignature};
pub use crate::binder::BoundParams;

// Core JSON-RPC types
pub use crate::error::{ErrorKind, JsonRpcError, JsonRpcErrorObject, RegistryError, ServiceError};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcEnvelope, JsonRpcResponse, ProcessedResponse};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
