//! The request cycle: parse, validate, bind, dispatch and build the response.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::binder::{BoundParams, bind_params};
use crate::dispatch::{Body, parse_body, validate_message};
use crate::error::{JsonRpcErrorObject, RegistryError, ServiceError};
use crate::message::JsonRpcMessage;
use crate::r#async::{JsonRpcHandler, dispatch};
use crate::registry::{MethodRegistry, MethodSignature};
use crate::request::RequestParams;
use crate::response::{ProcessedResponse, build_response};
use crate::types::RequestId;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Process the members of a batch concurrently
    pub concurrent_batches: bool,
    /// Reject batches with more members than this
    pub max_batch_size: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrent_batches: true,
            max_batch_size: None,
        }
    }
}

/// JSON-RPC 2.0 engine over a frozen method registry.
///
/// Cloning is cheap; clones share the registry. Every call to [`process`] is
/// independent of every other.
///
/// [`process`]: JsonRpcEngine::process
#[derive(Debug, Clone)]
pub struct JsonRpcEngine {
    registry: Arc<MethodRegistry>,
    config: Arc<EngineConfig>,
}

impl JsonRpcEngine {
    pub fn new(registry: MethodRegistry, config: EngineConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    pub fn builder() -> JsonRpcEngineBuilder {
        JsonRpcEngineBuilder::new()
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Names of all reachable methods, sorted
    pub fn registered_methods(&self) -> Vec<String> {
        self.registry.method_names()
    }

    /// Process a raw request body into a serialized response and its status
    pub async fn process(&self, raw_body: &str) -> ProcessedResponse {
        debug!("Received JSON-RPC body: {}", raw_body);
        let body = self.process_body(raw_body).await;
        let response = build_response(&body);
        debug!(
            "Sending JSON-RPC response: status={}, {} bytes",
            response.status,
            response.body.len()
        );
        response
    }

    /// [`process`](Self::process) for hosts without an async runtime
    pub fn process_blocking(&self, raw_body: &str) -> ProcessedResponse {
        futures::executor::block_on(self.process(raw_body))
    }

    /// Run a raw body through every stage up to, but excluding, response building
    pub async fn process_body(&self, raw_body: &str) -> Body<JsonRpcMessage> {
        let candidates = match parse_body(raw_body) {
            Ok(candidates) => candidates,
            Err(message) => return Body::Single(message),
        };

        if let (Body::Batch(items), Some(limit)) = (&candidates, self.config.max_batch_size) {
            if items.len() > limit {
                warn!("Rejecting batch of {} messages (limit {})", items.len(), limit);
                return Body::Single(JsonRpcMessage::rejected(
                    RequestId::Null,
                    JsonRpcErrorObject::invalid_request(&format!(
                        "Batch of {} messages exceeds the limit of {}",
                        items.len(),
                        limit
                    )),
                ));
            }
        }

        match candidates.map(validate_message) {
            Body::Single(message) => Body::Single(self.handle_message(message).await),
            Body::Batch(messages) if self.config.concurrent_batches => Body::Batch(
                join_all(messages.into_iter().map(|message| self.handle_message(message))).await,
            ),
            Body::Batch(messages) => {
                let mut processed = Vec::with_capacity(messages.len());
                for message in messages {
                    processed.push(self.handle_message(message).await);
                }
                Body::Batch(processed)
            }
        }
    }

    /// Resolve, bind and dispatch one validated message.
    /// Messages that already hold an outcome are returned unchanged.
    pub async fn handle_message(&self, mut message: JsonRpcMessage) -> JsonRpcMessage {
        if message.is_terminal() {
            return message;
        }

        let outcome = match message.method.as_deref() {
            Some(method) => self.execute(method, message.params.as_ref()).await,
            None => Err(JsonRpcErrorObject::invalid_request("No method specified")),
        };

        match outcome {
            Ok(result) => message.set_result(result),
            Err(error) => message.set_error(error),
        }
        message
    }

    async fn execute(
        &self,
        method: &str,
        params: Option<&RequestParams>,
    ) -> Result<Value, JsonRpcErrorObject> {
        debug!("Processing JSON-RPC request: method={}", method);
        let descriptor = self.registry.resolve(method)?;
        let bound = bind_params(descriptor, params)?;
        dispatch(descriptor, bound).await
    }
}

/// Builder collecting method registrations and configuration
#[derive(Default)]
pub struct JsonRpcEngineBuilder {
    config: EngineConfig,
    registry: MethodRegistry,
    error: Option<RegistryError>,
}

impl JsonRpcEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn concurrent_batches(mut self, enabled: bool) -> Self {
        self.config.concurrent_batches = enabled;
        self
    }

    pub fn max_batch_size(mut self, limit: usize) -> Self {
        self.config.max_batch_size = Some(limit);
        self
    }

    /// Register a handler with a fixed parameter list
    pub fn method<H>(self, name: impl Into<String>, handler: H, params: &[&str]) -> Self
    where
        H: JsonRpcHandler + 'static,
    {
        let signature = MethodSignature::new(params.iter().copied());
        self.method_with_signature(name, handler, signature)
    }

    /// Register a handler with an explicit signature
    pub fn method_with_signature<H>(
        mut self,
        name: impl Into<String>,
        handler: H,
        signature: MethodSignature,
    ) -> Self
    where
        H: JsonRpcHandler + 'static,
    {
        let result = self
            .registry
            .register_with_signature(name, Arc::new(handler), signature);
        self.record(result);
        self
    }

    /// Register a synchronous closure
    pub fn method_fn<F>(mut self, name: impl Into<String>, params: &[&str], handler_fn: F) -> Self
    where
        F: Fn(BoundParams) -> Result<Value, ServiceError> + Send + Sync + 'static,
    {
        let result = self.registry.register_fn(name, params, handler_fn);
        self.record(result);
        self
    }

    /// Register an asynchronous closure
    pub fn async_method_fn<F, Fut>(
        mut self,
        name: impl Into<String>,
        params: &[&str],
        handler_fn: F,
    ) -> Self
    where
        F: Fn(BoundParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ServiceError>> + Send + 'static,
    {
        let result = self.registry.register_async_fn(name, params, handler_fn);
        self.record(result);
        self
    }

    /// Freeze the registry; fails with the first registration error
    pub fn build(self) -> Result<JsonRpcEngine, RegistryError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        debug!("Built JSON-RPC engine with {} methods", self.registry.len());
        Ok(JsonRpcEngine::new(self.registry, self.config))
    }

    fn record(&mut self, result: Result<(), RegistryError>) {
        if let Err(error) = result {
            warn!("Service method registration failed: {}", error);
            self.error.get_or_insert(error);
        }
    }
}
