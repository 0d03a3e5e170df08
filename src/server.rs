//! Newline-delimited JSON-RPC 2.0 server exposing the registry tools.
//!
//! Each input line carries one request. Responses are written one per line
//! in request order; notifications (requests without an `id`) get none.
//! Supported methods are `initialize`, `ping`, `tools/list`, `tools/call`
//! and any `notifications/*` message.

use crate::registry::ports::HealthProbe;
use crate::tools::{ToolDispatchError, ToolDispatcher, catalog};
use mockable::Clock;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "hangar";

const JSONRPC_VERSION: &str = "2.0";

const INSTRUCTIONS: &str = "Manage MCP server installations and cloud project deployments. \
Install servers, deploy them together as projects, check their health, update their \
configuration and remove them; removing a server drops it from every project.";

/// JSON-RPC error codes used in responses.
pub mod error_codes {
    /// The line is not valid JSON.
    pub const PARSE_ERROR: i64 = -32_700;
    /// The JSON is not a valid request object.
    pub const INVALID_REQUEST: i64 = -32_600;
    /// The method is not supported.
    pub const METHOD_NOT_FOUND: i64 = -32_601;
    /// The method parameters are invalid.
    pub const INVALID_PARAMS: i64 = -32_602;
    /// The server failed while handling a valid request.
    pub const INTERNAL_ERROR: i64 = -32_603;
}

/// Errors that stop the serve loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reading a request or writing a response failed.
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A response could not be encoded.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Request {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

fn envelope(id: Value, key: &str, body: Value) -> Value {
    let mut message = Map::new();
    message.insert("jsonrpc".to_owned(), Value::from(JSONRPC_VERSION));
    message.insert("id".to_owned(), id);
    message.insert(key.to_owned(), body);
    Value::Object(message)
}

fn success(id: Value, result: Value) -> Value {
    envelope(id, "result", result)
}

fn failure(id: Value, code: i64, message: impl Into<String>) -> Value {
    let text: String = message.into();
    envelope(id, "error", json!({"code": code, "message": text}))
}

/// JSON-RPC front end over a [`ToolDispatcher`].
pub struct ToolServer<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    dispatcher: ToolDispatcher<P, C>,
}

impl<P, C> ToolServer<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    /// Creates a server that routes tool calls to `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: ToolDispatcher<P, C>) -> Self {
        Self { dispatcher }
    }

    /// Serves requests from `reader` until end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the transport fails or a response
    /// cannot be encoded.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("tool server started");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
        info!("input closed, tool server stopping");
        Ok(())
    }

    /// Handles one input line, returning the response to send, if any.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let message: Value = match serde_json::from_str(trimmed) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "discarding unparseable request");
                return Some(failure(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("parse error: {err}"),
                ));
            }
        };

        let fallback_id = message.get("id").cloned().unwrap_or(Value::Null);
        if message.is_array() {
            return Some(failure(
                Value::Null,
                error_codes::INVALID_REQUEST,
                "batch requests are not supported",
            ));
        }
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(err) => {
                return Some(failure(
                    fallback_id,
                    error_codes::INVALID_REQUEST,
                    format!("invalid request: {err}"),
                ));
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(failure(
                fallback_id,
                error_codes::INVALID_REQUEST,
                format!("unsupported JSON-RPC version '{}'", request.jsonrpc),
            ));
        }

        let Some(id) = request.id else {
            debug!(method = %request.method, "received notification");
            return None;
        };
        Some(self.dispatch(id, &request.method, request.params).await)
    }

    async fn dispatch(&self, id: Value, method: &str, params: Value) -> Value {
        match method {
            "initialize" => success(id, initialize_result()),
            "ping" => success(id, json!({})),
            "tools/list" => success(id, json!({ "tools": catalog() })),
            "tools/call" => self.call_tool(id, params).await,
            other => {
                warn!(method = other, "unknown method");
                failure(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("method not found: {other}"),
                )
            }
        }
    }

    async fn call_tool(&self, id: Value, params: Value) -> Value {
        let call: CallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(err) => {
                return failure(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("invalid tools/call params: {err}"),
                );
            }
        };

        match self.dispatcher.call(&call.name, call.arguments).await {
            Ok(output) => success(id, output.to_value()),
            Err(err @ ToolDispatchError::UnknownTool(_)) => {
                warn!(tool = %call.name, "call to unknown tool");
                failure(id, error_codes::INVALID_PARAMS, err.to_string())
            }
            Err(err @ ToolDispatchError::Render(_)) => {
                warn!(tool = %call.name, error = %err, "tool result could not be rendered");
                failure(id, error_codes::INTERNAL_ERROR, err.to_string())
            }
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {"tools": {"listChanged": false}},
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
        "instructions": INSTRUCTIONS
    })
}
