//! Newline-delimited JSON-RPC over byte streams
//!
//! Every incoming line is handled on its own task, so a slow upstream call
//! never blocks the next request. Responses flow through one channel to a
//! single writer, which keeps each line intact on the output stream.

use super::TransportError;
use crate::protocol::JsonRpcResponse;
use crate::server::McpServer;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const RESPONSE_BUFFER: usize = 64;

/// Serve until the reader reaches EOF and every in-flight request has answered
pub async fn serve<R, W>(server: Arc<McpServer>, reader: R, writer: W) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<JsonRpcResponse>(RESPONSE_BUFFER);
    let writer_task = tokio::spawn(write_responses(rx, writer));

    let mut lines = reader.lines();
    let read_result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(TransportError::Io(e)),
        };

        if line.trim().is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_message(&line).await {
                if tx.send(response).await.is_err() {
                    debug!("Output closed before response could be written");
                }
            }
        });
    };

    // The writer finishes once the last in-flight task drops its sender
    drop(tx);
    let write_result = writer_task
        .await
        .map_err(|e| TransportError::Writer(e.to_string()))?;

    read_result?;
    write_result
}

async fn write_responses<W>(
    mut rx: mpsc::Receiver<JsonRpcResponse>,
    mut writer: W,
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Serve on stdin/stdout until EOF or Ctrl-C
pub async fn serve_stdio(server: Arc<McpServer>) -> Result<(), TransportError> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    info!(tools = server.registry().len(), "MCP server listening on stdio");

    tokio::select! {
        result = serve(server, reader, writer) => {
            if let Err(e) = &result {
                error!(error = %e, "Stdio transport failed");
            }
            info!("Input closed, shutting down");
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AdzunaClient;
    use crate::config::{ClientSettings, Credentials};
    use crate::testing::MockHttpTransport;
    use crate::tools::ToolRegistry;
    use serde_json::{json, Value};

    fn server() -> Arc<McpServer> {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"api_version": 1})));
        let client = AdzunaClient::with_transport(
            ClientSettings::default(),
            Some(Credentials::new("id", "key")),
            transport,
        );
        let registry = ToolRegistry::adzuna(Arc::new(client)).unwrap();
        Arc::new(McpServer::new(Arc::new(registry), "test"))
    }

    async fn run(input: &str) -> Vec<Value> {
        let (output_writer, output_reader) = tokio::io::duplex(64 * 1024);
        serve(server(), input.as_bytes(), output_writer)
            .await
            .unwrap();

        let mut lines = BufReader::new(output_reader).lines();
        let mut responses = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str(&line).unwrap());
        }
        responses
    }

    #[tokio::test]
    async fn test_one_response_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_api_version"}}"#,
            "\n",
        );

        let mut responses = run(input).await;
        responses.sort_by_key(|r| r["id"].as_i64());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["result"]["structuredContent"]["api_version"], 1);
    }

    #[tokio::test]
    async fn test_garbage_line_does_not_stop_server() {
        let input = "not json\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}\n";
        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert!(responses
            .iter()
            .any(|r| r["error"]["code"] == -32700 && r["id"].is_null()));
        assert!(responses.iter().any(|r| r["id"] == 3));
    }

    #[tokio::test]
    async fn test_empty_input_exits_cleanly() {
        assert!(run("").await.is_empty());
    }
}
