//! JSON-RPC 2.0 Compliance Tests
//!
//! Replays the examples from section 7 of the JSON-RPC 2.0 specification
//! through the engine and checks both the response body and the status code.

use http::StatusCode;
use json_rpc_engine::prelude::*;
use serde_json::{Value, json};

/// Handler with a method that is deliberately not registered
struct TestService;

impl TestService {
    fn subtract(params: BoundParams) -> Result<Value, ServiceError> {
        let minuend: i64 = params.arg("minuend")?;
        let subtrahend: i64 = params.arg("subtrahend")?;
        Ok(json!(minuend - subtrahend))
    }

    fn notify_hello(_params: BoundParams) -> Result<Value, ServiceError> {
        Ok(Value::Null)
    }

    #[allow(dead_code)]
    fn no_service_method(_params: BoundParams) -> Result<Value, ServiceError> {
        Ok(json!("unreachable"))
    }
}

fn engine() -> JsonRpcEngine {
    JsonRpcEngine::builder()
        .method_fn("subtract", &["minuend", "subtrahend"], TestService::subtract)
        .method_fn("notify_hello", &["num"], TestService::notify_hello)
        .method_with_signature(
            "sum",
            SyncFunctionHandler::new(|params| {
                Ok(json!(params.values().iter().filter_map(Value::as_i64).sum::<i64>()))
            }),
            MethodSignature::new(["first"]).variadic(),
        )
        .build()
        .expect("registry should build")
}

async fn exec(body: &str) -> (StatusCode, String) {
    let response = engine().process(body).await;
    (response.status, response.body)
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("response body should be JSON")
}

#[tokio::test]
async fn test_positional_params() {
    let (status, body) =
        exec(r#"{"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"jsonrpc": "2.0", "result": 19, "id": 1}));

    let (status, body) =
        exec(r#"{"jsonrpc": "2.0", "method": "subtract", "params": [23, 42], "id": 2}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"jsonrpc": "2.0", "result": -19, "id": 2}));
}

#[tokio::test]
async fn test_named_params() {
    let (status, body) = exec(
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"subtrahend": 23, "minuend": 42}, "id": 3}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"jsonrpc": "2.0", "result": 19, "id": 3}));

    let (status, body) = exec(
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 42, "subtrahend": 23}, "id": 4}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"jsonrpc": "2.0", "result": 19, "id": 4}));
}

#[tokio::test]
async fn test_notification() {
    let (status, body) =
        exec(r#"{"jsonrpc": "2.0", "method": "update", "params": [1,2,3,4,5]}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, "");
}

#[tokio::test]
async fn test_method_not_found() {
    let (status, body) = exec(r#"{"jsonrpc": "2.0", "method": "foobar", "id": "1"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        parse(&body),
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "MethodNotFoundError: Method foobar not found"},
            "id": "1"
        })
    );
}

#[tokio::test]
async fn test_unregistered_method_is_unreachable() {
    let (status, body) =
        exec(r#"{"jsonrpc": "2.0", "method": "no_service_method", "id": 1}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body)["error"]["code"], json!(-32601));
}

#[tokio::test]
async fn test_invalid_json() {
    let (status, body) =
        exec(r#"{"jsonrpc": "2.0", "method": "foobar, "params": "bar", "baz]"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        parse(&body),
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32700, "message": "ParseError: Parse error."},
            "id": null
        })
    );
}

#[tokio::test]
async fn test_invalid_request() {
    let (status, body) = exec(r#"{"jsonrpc": "2.0", "method": 1, "params": "bar"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse(&body),
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32600, "message": "InvalidRequestError: method must be a string"},
            "id": null
        })
    );
}

#[tokio::test]
async fn test_invalid_json_batch() {
    let (status, body) = exec(
        r#"[ {"jsonrpc": "2.0", "method": "sum", "params": [1,2,4], "id": "1"},{"jsonrpc": "2.0", "method" ]"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        parse(&body),
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32700, "message": "ParseError: Parse error."},
            "id": null
        })
    );
}

#[tokio::test]
async fn test_empty_array() {
    let (status, body) = exec("[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse(&body),
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32600, "message": "InvalidRequestError: Received an empty batch message."},
            "id": null
        })
    );
}

#[tokio::test]
async fn test_invalid_batch() {
    let (status, body) = exec("[1,2,3]").await;
    assert_eq!(status, StatusCode::OK);

    let error = json!({
        "jsonrpc": "2.0",
        "error": {
            "code": -32600,
            "message": "InvalidRequestError: No valid JSON-RPC Message. Must be an object."
        },
        "id": null
    });
    assert_eq!(parse(&body), json!([error.clone(), error.clone(), error]));
}

#[tokio::test]
async fn test_batch() {
    let (status, body) = exec(
        r#"[{"foo": "boo"},
            {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
            {"jsonrpc": "2.0", "method": "subtract", "params": [42,23], "id": "2"},
            {"jsonrpc": "2.0", "method": "foo.get", "params": {"name": "myself"}, "id": "5"}
        ]"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse(&body),
        json!([
            {
                "jsonrpc": "2.0",
                "error": {"code": -32600, "message": "InvalidRequestError: Invalid members in request object"},
                "id": null
            },
            {"jsonrpc": "2.0", "result": 19, "id": "2"},
            {
                "jsonrpc": "2.0",
                "error": {"code": -32601, "message": "MethodNotFoundError: Method foo.get not found"},
                "id": "5"
            }
        ])
    );
}

#[tokio::test]
async fn test_notification_batch() {
    let (status, body) = exec(
        r#"[
            {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
            {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]}
        ]"#,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, "");
}

#[tokio::test]
async fn test_variadic_method_is_never_invocable() {
    for params in ["[1]", "[1, 2, 4]", "{\"first\": 1}", "[]"] {
        let request = format!(
            r#"{{"jsonrpc": "2.0", "method": "sum", "params": {}, "id": 9}}"#,
            params
        );
        let (status, body) = exec(&request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["error"]["code"], json!(-32602));
        assert_eq!(parse(&body)["id"], json!(9));
    }

    let (status, _) = exec(r#"{"jsonrpc": "2.0", "method": "sum", "id": 9}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_absent_params_with_required_arity() {
    let (status, body) = exec(r#"{"jsonrpc": "2.0", "method": "subtract", "id": 7}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = parse(&body);
    assert_eq!(body["error"]["code"], json!(-32602));
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_null_id_is_answered() {
    let (status, body) =
        exec(r#"{"jsonrpc": "2.0", "method": "subtract", "params": [2, 1], "id": null}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"jsonrpc": "2.0", "result": 1, "id": null}));
}

#[tokio::test]
async fn test_scalar_body_is_invalid_request() {
    for raw in ["42", "\"text\"", "true", "null"] {
        let (status, body) = exec(raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["error"]["code"], json!(-32600));
        assert_eq!(parse(&body)["id"], json!(null));
    }
}

#[tokio::test]
async fn test_processing_is_idempotent() {
    let engine = engine();
    let raw = r#"[
        {"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 5, "subtrahend": 9}, "id": 1},
        {"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 5, "extra": 9}, "id": 2},
        {"jsonrpc": "2.0", "method": "missing", "id": 3},
        {"id": 4}
    ]"#;

    let first = engine.process(raw).await;
    let second = engine.process(raw).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_request_builder_round_trip() {
    let request = JsonRpcRequest::new(11, "subtract").with_array_params(vec![json!(50), json!(8)]);
    let raw = serde_json::to_string(&request).unwrap();

    let (status, body) = exec(&raw).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"jsonrpc": "2.0", "result": 42, "id": 11}));
}
