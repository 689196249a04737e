//! Line-protocol dispatcher
//!
//! Reads newline-delimited envelopes, routes requests to an [`EmbeddableMcp`]
//! and writes one correlated response line per request.
//!
//! Reading and execution are decoupled: every request runs on its own task
//! and hands its finished response to a single writer task over a channel,
//! so a slow tool call never blocks the next line from being read and no two
//! responses can interleave on the output stream. Responses to overlapping
//! requests may therefore be written out of order; the `id` is the only
//! correlation.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::embeddable::EmbeddableMcp;
use crate::error::RpcError;
use crate::protocol::{parse_line, Inbound, Response};

/// MCP protocol revision announced in `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default = "empty_object")]
    arguments: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Serve the line protocol on the process's stdin/stdout until EOF
pub async fn serve_stdio<H>(handler: Arc<H>) -> anyhow::Result<()>
where
    H: EmbeddableMcp + 'static,
{
    let reader = BufReader::new(tokio::io::stdin());
    serve(handler, reader, tokio::io::stdout()).await?;
    Ok(())
}

/// Serve the line protocol on arbitrary streams
///
/// Returns the writer once input is exhausted and every in-flight request has
/// been answered.
pub async fn serve<H, R, W>(handler: Arc<H>, reader: R, writer: W) -> anyhow::Result<W>
where
    H: EmbeddableMcp + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(write_lines(rx, writer));
    let mut in_flight: JoinSet<()> = JoinSet::new();
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            next = lines.next_line() => match next {
                Ok(Some(line)) => accept_line(&handler, &line, &tx, &mut in_flight).await,
                Ok(None) => {
                    tracing::debug!("Input closed");
                    break;
                }
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_join(joined);
            }
        }

        if tx.is_closed() {
            tracing::error!("Output stream closed, stopping");
            break;
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        log_join(joined);
    }
    drop(tx);

    let writer = writer_task.await??;
    Ok(writer)
}

/// Parse one line and either answer it, spawn its handler, or drop it
async fn accept_line<H>(
    handler: &Arc<H>,
    line: &str,
    tx: &mpsc::UnboundedSender<String>,
    in_flight: &mut JoinSet<()>,
) where
    H: EmbeddableMcp + 'static,
{
    let inbound = match parse_line(line.trim()) {
        Ok(inbound) => inbound,
        Err(err) => {
            tracing::warn!("Invalid JSON-RPC message: {}", err.message);
            send(tx, Response::failure(Value::Null, err));
            return;
        }
    };

    match inbound {
        Inbound::Notification { method, params } => {
            handler.on_notification(&method, params).await;
        }
        Inbound::Response { id } => {
            tracing::debug!("Ignoring unsolicited response (id: {:?})", id);
        }
        Inbound::Request { id, method, params } => {
            tracing::debug!("Request {} -> {}", id, method);
            let handler = Arc::clone(handler);
            let tx = tx.clone();
            in_flight.spawn(async move {
                // The inner task isolates panics so the request still gets an answer.
                let outcome = tokio::spawn(async move { route(&*handler, &method, params).await })
                    .await
                    .unwrap_or_else(|e| Err(RpcError::internal(format!("Internal error: {}", e))));
                send(&tx, Response::from_outcome(id, outcome));
            });
        }
    }
}

/// Route one request to its method handler
pub async fn route<H>(handler: &H, method: &str, params: Value) -> Result<Value, RpcError>
where
    H: EmbeddableMcp + ?Sized,
{
    match method {
        "initialize" => Ok(initialize_result(handler)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": serde_json::to_value(handler.list_tools())? })),
        "tools/call" => {
            let call: CallToolParams = serde_json::from_value(params)
                .map_err(|e| RpcError::internal(format!("Invalid tools/call params: {}", e)))?;
            let result = handler.call_tool(&call.name, call.arguments).await?;
            Ok(serde_json::to_value(result)?)
        }
        "resources/list" => Ok(json!({ "resources": [] })),
        "prompts/list" => Ok(json!({ "prompts": [] })),
        other => Err(RpcError::method_not_found(other)),
    }
}

fn initialize_result<H>(handler: &H) -> Value
where
    H: EmbeddableMcp + ?Sized,
{
    let capabilities = rmcp::model::ServerCapabilities::builder()
        .enable_tools()
        .build();
    let capabilities =
        serde_json::to_value(capabilities).unwrap_or_else(|_| json!({ "tools": {} }));

    let mut result = json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": capabilities,
        "serverInfo": {
            "name": handler.server_name(),
            "version": handler.server_version().unwrap_or("0.0.0"),
        },
    });
    if let Some(instructions) = handler.server_description() {
        result["instructions"] = Value::String(instructions.to_string());
    }
    result
}

fn send(tx: &mpsc::UnboundedSender<String>, response: Response) {
    if tx.send(response.to_line()).is_err() {
        tracing::warn!("Dropping response for id {}: writer has stopped", response.id);
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Request task failed: {}", e);
    }
}

async fn write_lines<W>(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: W,
) -> std::io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = rx.recv().await {
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(writer)
}
