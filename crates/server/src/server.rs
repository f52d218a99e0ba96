//! TCP accept loop
//!
//! One spawned task per client connection. A connection failure only takes
//! down its own task; in-flight requests either completed their critical
//! section or touched nothing.

use signbank_proto::{codec, Request, Response};
use std::io;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

use crate::dispatch;
use crate::state::AppState;

/// Accept connections forever.
pub async fn run(listener: TcpListener, state: AppState) -> io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        tracing::info!(%addr, "client connected");

        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state).await {
                tracing::warn!(%addr, error = %e, "connection ended with error");
            }
            tracing::info!(%addr, "client disconnected");
        });
    }
}

/// Serve one client: read a line, process, answer, repeat until EOF.
async fn handle_connection(stream: TcpStream, state: AppState) -> io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    while let Some(line) = codec::read_line(&mut reader).await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => dispatch::process(&state, request).await,
            Err(e) => {
                tracing::debug!(error = %e, "rejected malformed request");
                Response::error(format!("invalid action: {e}"))
            }
        };

        codec::write_message(&mut write_half, &response).await?;
    }

    Ok(())
}
