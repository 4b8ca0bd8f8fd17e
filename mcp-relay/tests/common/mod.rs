//! In-process Streamable HTTP MCP server used by the integration tests.
//!
//! Serves the two calculator tools (`add`, `multiply`) on `POST /mcp/` and
//! records what every request looked like.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use mcp_relay_types::{
    jsonrpc::{INVALID_PARAMS, METHOD_NOT_FOUND},
    JsonRpcResponse, MCP_PROTOCOL_VERSION_HEADER, MCP_SESSION_ID_HEADER, PROTOCOL_VERSION,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// How the server behaves.
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    /// Answer requests with a single-event SSE stream instead of plain JSON
    pub sse: bool,
    /// Session id handed out on `initialize`; `None` never issues one
    pub session_id: Option<String>,
    /// Replace the session id when a given method is called
    pub rotation: Option<SessionRotation>,
}

/// Issue `new_id` in reply to `on_method`, invalidating the previous session.
#[derive(Debug, Clone)]
pub struct SessionRotation {
    pub on_method: String,
    pub new_id: String,
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub session_id: Option<String>,
    pub protocol_version: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    options: MockOptions,
    /// Session id the server currently accepts
    current_session: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start(options: MockOptions) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            current_session: Arc::new(Mutex::new(options.session_id.clone())),
            options,
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/mcp/", post(mcp_post))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

async fn mcp_post(State(state): State<MockState>, headers: HeaderMap, body: String) -> Response {
    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    let session_id = header_string(&headers, MCP_SESSION_ID_HEADER);
    state.requests.lock().unwrap().push(RecordedRequest {
        session_id: session_id.clone(),
        protocol_version: header_string(&headers, MCP_PROTOCOL_VERSION_HEADER),
        accept: header_string(&headers, header::ACCEPT.as_str()),
        content_type: header_string(&headers, header::CONTENT_TYPE.as_str()),
        body: request.clone(),
    });

    if let Some(ref sid) = session_id {
        let current = state.current_session.lock().unwrap().clone();
        if current.as_deref() != Some(sid.as_str()) {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Session not found"})),
            )
                .into_response();
        }
    }

    let method = request["method"].as_str().unwrap_or_default();
    let id = match request.get("id") {
        Some(id) => id.clone(),
        None => return notification_response(method),
    };

    match method {
        "test/server_error" => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
        }
        "test/rejected" => {
            let error = JsonRpcResponse::error(id, -32000, "Bad Request: rejected");
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
        "test/sse_without_data" => {
            return event_stream_response(": keep-alive\nevent: message\n\n".to_string());
        }
        "test/empty" => {
            return StatusCode::OK.into_response();
        }
        _ => {}
    }

    let response = handle_method(method, id, &request["params"]);
    let text = serde_json::to_string(&response).unwrap();

    let mut resp = if state.options.sse {
        event_stream_response(format!("event: message\ndata: {}\n\n", text))
    } else {
        let mut resp = (StatusCode::OK, text).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        resp
    };

    let rotation = state
        .options
        .rotation
        .as_ref()
        .filter(|r| r.on_method == method);
    let issued = if let Some(rotation) = rotation {
        Some(rotation.new_id.clone())
    } else if method == "initialize" {
        state.options.session_id.clone()
    } else {
        session_id
    };
    if issued.is_some() {
        *state.current_session.lock().unwrap() = issued.clone();
    }
    if let Some(sid) = issued {
        resp.headers_mut().insert(
            MCP_SESSION_ID_HEADER,
            HeaderValue::from_str(&sid).unwrap(),
        );
    }
    resp
}

fn notification_response(method: &str) -> Response {
    match method {
        "notifications/test_rejected" => {
            let error = JsonRpcResponse::error(Value::Null, -32600, "Bad Request");
            (StatusCode::BAD_REQUEST, Json(error)).into_response()
        }
        "notifications/test_answered" => {
            let reply = JsonRpcResponse::success(Value::Null, json!({}));
            (StatusCode::OK, Json(reply)).into_response()
        }
        // Notification - no response needed
        _ => StatusCode::ACCEPTED.into_response(),
    }
}

fn event_stream_response(body: String) -> Response {
    let mut resp = (StatusCode::OK, body).into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    resp
}

fn handle_method(method: &str, id: Value, params: &Value) -> JsonRpcResponse {
    match method {
        "initialize" => JsonRpcResponse::success(id, initialize_result()),
        "tools/list" => JsonRpcResponse::success(
            id,
            json!({
                "tools": [
                    calculator_tool("add", "Add two numbers"),
                    calculator_tool("multiply", "Multiply two numbers"),
                ]
            }),
        ),
        "tools/call" => call_tool(id, params),
        _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method)),
    }
}

pub fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {"tools": {"listChanged": false}},
        "serverInfo": {"name": "Simple Server", "version": "1.0.0"}
    })
}

fn calculator_tool(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": {
            "type": "object",
            "properties": {
                "a": {"type": "number"},
                "b": {"type": "number"}
            },
            "required": ["a", "b"]
        }
    })
}

fn call_tool(id: Value, params: &Value) -> JsonRpcResponse {
    let args = &params["arguments"];
    let (a, b) = match (args["a"].as_f64(), args["b"].as_f64()) {
        (Some(a), Some(b)) => (a, b),
        _ => return JsonRpcResponse::error(id, INVALID_PARAMS, "Arguments a and b are required"),
    };

    let result = match params["name"].as_str() {
        Some("add") => a + b,
        Some("multiply") => a * b,
        other => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {:?}", other))
        }
    };

    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": result.to_string()}],
            "isError": false
        }),
    )
}
