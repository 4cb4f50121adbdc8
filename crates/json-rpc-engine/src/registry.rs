//! Method registry.
//!
//! Only methods registered here are reachable. The registry is filled once at
//! startup and shared read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use crate::binder::BoundParams;
use crate::error::{JsonRpcErrorObject, RegistryError, ServiceError};
use crate::r#async::{FunctionHandler, JsonRpcHandler, SyncFunctionHandler};

/// Prefix reserved by JSON-RPC 2.0 for rpc-internal methods
const RESERVED_PREFIX: &str = "rpc.";

/// Declared parameters of a service method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodSignature {
    params: Vec<String>,
    variadic: bool,
}

impl MethodSignature {
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            variadic: false,
        }
    }

    /// Mark the method as taking a variable number of trailing arguments.
    /// Such methods are registered but can never be invoked.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

/// Registry entry for one service method
#[derive(Clone)]
pub struct HandlerDescriptor {
    name: String,
    handler: Arc<dyn JsonRpcHandler>,
    params: Arc<[String]>,
    variadic: bool,
}

impl HandlerDescriptor {
    pub fn new(name: String, handler: Arc<dyn JsonRpcHandler>, signature: MethodSignature) -> Self {
        Self {
            name,
            handler,
            params: signature.params.into(),
            variadic: signature.variadic,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &Arc<dyn JsonRpcHandler> {
        &self.handler
    }

    /// Declared parameter names in declaration order
    pub fn params(&self) -> &Arc<[String]> {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn accepts_variadic(&self) -> bool {
        self.variadic
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

/// Mapping from method name to handler descriptor
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, HandlerDescriptor>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name` with its ordered parameter names
    pub fn register<H>(
        &mut self,
        name: impl Into<String>,
        handler: H,
        params: &[&str],
        variadic: bool,
    ) -> Result<(), RegistryError>
    where
        H: JsonRpcHandler + 'static,
    {
        let mut signature = MethodSignature::new(params.iter().copied());
        if variadic {
            signature = signature.variadic();
        }
        self.register_with_signature(name, Arc::new(handler), signature)
    }

    /// Register a shared handler with an explicit signature
    pub fn register_with_signature(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn JsonRpcHandler>,
        signature: MethodSignature,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyMethodName);
        }
        if name.starts_with(RESERVED_PREFIX) {
            return Err(RegistryError::ReservedMethod(name));
        }
        if self.methods.contains_key(&name) {
            return Err(RegistryError::DuplicateMethod(name));
        }
        for (index, param) in signature.params.iter().enumerate() {
            if signature.params[..index].contains(param) {
                return Err(RegistryError::DuplicateParameter {
                    method: name,
                    param: param.clone(),
                });
            }
        }

        debug!(
            "Registering service method '{}' with params {:?}",
            name, signature.params
        );
        let descriptor = HandlerDescriptor::new(name.clone(), handler, signature);
        self.methods.insert(name, descriptor);
        Ok(())
    }

    /// Register a synchronous closure
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        params: &[&str],
        handler_fn: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(BoundParams) -> Result<Value, ServiceError> + Send + Sync + 'static,
    {
        self.register(name, SyncFunctionHandler::new(handler_fn), params, false)
    }

    /// Register an asynchronous closure
    pub fn register_async_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        params: &[&str],
        handler_fn: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(BoundParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ServiceError>> + Send + 'static,
    {
        let handler = FunctionHandler::new(move |params| handler_fn(params).boxed());
        self.register(name, handler, params, false)
    }

    pub fn get(&self, name: &str) -> Option<&HandlerDescriptor> {
        self.methods.get(name)
    }

    /// Look up a method, failing with a method-not-found error
    pub fn resolve(&self, name: &str) -> Result<&HandlerDescriptor, JsonRpcErrorObject> {
        self.get(name).ok_or_else(|| JsonRpcErrorObject::method_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered method names, sorted
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }
}
