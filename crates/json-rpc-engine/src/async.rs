use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{error, warn};

use crate::{
    binder::BoundParams,
    error::{JsonRpcErrorObject, ServiceError},
    registry::HandlerDescriptor,
};

/// Trait for service methods exposed over JSON-RPC
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    /// Handle one call with arguments already bound in declaration order.
    /// A return value of `Value::Null` is a valid "no value" result.
    async fn handle(&self, params: BoundParams) -> Result<Value, ServiceError>;
}

/// A handler backed by an async function
pub struct FunctionHandler<F>
where
    F: Fn(BoundParams) -> BoxFuture<'static, Result<Value, ServiceError>> + Send + Sync,
{
    handler_fn: F,
}

impl<F> FunctionHandler<F>
where
    F: Fn(BoundParams) -> BoxFuture<'static, Result<Value, ServiceError>> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> JsonRpcHandler for FunctionHandler<F>
where
    F: Fn(BoundParams) -> BoxFuture<'static, Result<Value, ServiceError>> + Send + Sync,
{
    async fn handle(&self, params: BoundParams) -> Result<Value, ServiceError> {
        (self.handler_fn)(params).await
    }
}

/// A handler backed by a plain synchronous function
pub struct SyncFunctionHandler<F>
where
    F: Fn(BoundParams) -> Result<Value, ServiceError> + Send + Sync,
{
    handler_fn: F,
}

impl<F> SyncFunctionHandler<F>
where
    F: Fn(BoundParams) -> Result<Value, ServiceError> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> JsonRpcHandler for SyncFunctionHandler<F>
where
    F: Fn(BoundParams) -> Result<Value, ServiceError> + Send + Sync,
{
    async fn handle(&self, params: BoundParams) -> Result<Value, ServiceError> {
        (self.handler_fn)(params)
    }
}

/// Invoke a handler with bound arguments.
///
/// Handler failures never escape: runtime errors and panics become the fixed
/// internal error (the detail only goes to the log), deliberate server errors
/// are passed on to the caller.
pub async fn dispatch(
    descriptor: &HandlerDescriptor,
    params: BoundParams,
) -> Result<Value, JsonRpcErrorObject> {
    // Building the future runs handler code too, so it happens inside the guard
    let handler = Arc::clone(descriptor.handler());
    let call = AssertUnwindSafe(async move { handler.handle(params).await });

    match call.catch_unwind().await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(ServiceError::Failed(detail))) => {
            error!(
                "Error executing service method '{}': {}",
                descriptor.name(),
                detail
            );
            Err(JsonRpcErrorObject::internal_error())
        }
        Ok(Err(server_error)) => {
            warn!(
                "Service method '{}' reported: {}",
                descriptor.name(),
                server_error
            );
            Err(server_error.to_error_object())
        }
        Err(panic) => {
            error!(
                "Service method '{}' panicked: {}",
                descriptor.name(),
                panic_message(panic.as_ref())
            );
            Err(JsonRpcErrorObject::internal_error())
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
