//! Connection to the bank server
//!
//! One write-line/read-line exchange per call over a persistent TCP
//! connection.

use signbank_proto::{codec, Request, Response};
use std::io;
use thiserror::Error;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("communication failure: {0}")]
    Io(#[from] io::Error),

    #[error("server closed the connection")]
    Disconnected,

    #[error("unreadable server response: {0}")]
    BadResponse(#[from] serde_json::Error),
}

/// A connected bank client.
pub struct BankClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl BankClient {
    /// Connect to the server.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Send one request and wait for its response.
    pub async fn call(&mut self, request: &Request) -> Result<Response, ClientError> {
        codec::write_message(&mut self.writer, request).await?;

        let line = codec::read_line(&mut self.reader)
            .await?
            .ok_or(ClientError::Disconnected)?;

        Ok(serde_json::from_str(&line)?)
    }
}
