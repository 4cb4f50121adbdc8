//! Simple Calculator JSON-RPC Example
//!
//! This example registers a few calculator operations with the engine and feeds
//! it request bodies the way an HTTP adaptor would, printing the status code and
//! response body for each one.
//!
//! Run with `RUST_LOG=debug` to see the engine's tracing output.

use async_trait::async_trait;
use json_rpc_engine::prelude::*;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Subtracts `subtrahend` from `minuend`
struct SubtractHandler;

#[async_trait]
impl JsonRpcHandler for SubtractHandler {
    async fn handle(&self, params: BoundParams) -> Result<Value, ServiceError> {
        let minuend: f64 = params.arg("minuend")?;
        let subtrahend: f64 = params.arg("subtrahend")?;
        Ok(json!(minuend - subtrahend))
    }
}

/// Divides `a` by `b`, refusing division by zero with an application error
struct DivideHandler;

#[async_trait]
impl JsonRpcHandler for DivideHandler {
    async fn handle(&self, params: BoundParams) -> Result<Value, ServiceError> {
        let a: f64 = params.arg("a")?;
        let b: f64 = params.arg("b")?;
        if b == 0.0 {
            return Err(ServiceError::Server {
                code: -32001,
                message: "division by zero".to_string(),
                data: Some(json!({"a": a})),
            });
        }
        Ok(json!(a / b))
    }
}

#[tokio::main]
async fn main() -> Result<(), RegistryError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Simple Calculator JSON-RPC Engine Example");
    println!("=========================================");

    let engine = JsonRpcEngine::builder()
        .method("subtract", SubtractHandler, &["minuend", "subtrahend"])
        .method("divide", DivideHandler, &["a", "b"])
        .method_fn("add", &["a", "b"], |params| {
            let a: f64 = params.arg("a")?;
            let b: f64 = params.arg("b")?;
            Ok(json!(a + b))
        })
        // Declared with a variable argument list: registered, never invocable
        .method_with_signature(
            "sum",
            SyncFunctionHandler::new(|params| {
                let values: Vec<f64> = params
                    .values()
                    .iter()
                    .map(|v| v.as_f64().unwrap_or_default())
                    .collect();
                Ok(json!(values.iter().sum::<f64>()))
            }),
            MethodSignature::new(["first"]).variadic(),
        )
        .method_fn("log", &["message"], |params| {
            let message: String = params.arg("message")?;
            tracing::info!("client says: {}", message);
            Ok(Value::Null)
        })
        .build()?;

    println!("Registered methods: {:?}", engine.registered_methods());

    let test_requests = [
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 5, "b": 3}, "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": [10, 4], "id": 2}"#,
        r#"{"jsonrpc": "2.0", "method": "divide", "params": {"a": 1, "b": 0}, "id": 3}"#,
        r#"{"jsonrpc": "2.0", "method": "multiply", "params": [2, 3], "id": 4}"#, // Will fail
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": "invalid", "b": 5}, "id": 5}"#, // Will fail
        r#"{"jsonrpc": "2.0", "method": "sum", "params": [1, 2, 3], "id": 6}"#, // Will fail
        r#"{"jsonrpc": "2.0", "method": "log", "params": ["hello"]}"#,
        r#"[
            {"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": "a"},
            {"jsonrpc": "2.0", "method": "log", "params": {"message": "batched"}},
            {"foo": "boo"},
            {"jsonrpc": "2.0", "method": "subtract", "params": [1], "id": "b"}
        ]"#,
        r#"[]"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": [1, 2"#,
    ];

    for (i, request_json) in test_requests.iter().enumerate() {
        println!("\n--- Test {} ---", i + 1);
        println!("Request: {}", request_json);

        let response = engine.process(request_json).await;
        if response.is_empty() {
            println!("Status {}: (no content)", response.status_code());
        } else {
            println!("Status {}: {}", response.status_code(), response.body);
        }
    }

    Ok(())
}
