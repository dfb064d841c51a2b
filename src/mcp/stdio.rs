//! Stdio session host
//!
//! One server instance for the process lifetime, newline-delimited JSON-RPC
//! over stdin/stdout. Logging must stay on stderr.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::McpServer;
use crate::AppState;

pub async fn serve(state: AppState) -> Result<(), std::io::Error> {
    let server = McpServer::new(state);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("stdio host ready");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(payload) => server.handle_value(payload).await,
            Err(_) => Some(json_rpc_error(None, -32700, "Parse error")),
        };

        // Notifications produce no output line.
        if let Some(response) = response {
            let text = serde_json::to_string(&response).expect("jsonrpc response serialization");
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("stdin closed, stdio host exiting");
    Ok(())
}
