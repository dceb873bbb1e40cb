//! Turnstile authentication server.
//!
//! One acceptor loop, one spawned task per connection, one mutex around the
//! gate. A connection lives for exactly one authentication exchange:
//!
//! ```text
//! Accepted → Reading → Authenticating → Responding → Closed
//! ```
//!
//! The gate (and the expectation file behind it) is the only state shared
//! across handler tasks. Every handler takes the same lock for the entire
//! compare-and-possibly-replace step, so concurrent submissions are
//! serialized into a strict total order — two connections can never both be
//! compared against the same expectation and both succeed. Which of two
//! concurrent correct submissions wins is whichever acquires the lock first.

#![forbid(unsafe_code)]

mod error;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use turnstile_core::store::FileExpectationStore;
use turnstile_core::wire::{FAILURE_LINE, MAX_SUBMISSION_BYTES, SUCCESS_LINE};
use turnstile_core::{Gate, Verdict};

pub use error::ServerError;

/// How long a handler waits for a submission before giving up on the
/// connection. Keeps a silent peer from pinning a task forever.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g. "0.0.0.0:2289").
    pub bind_address: String,
    /// Path of the expectation file.
    pub store_path: PathBuf,
    /// Per-connection read timeout.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{}", turnstile_core::wire::DEFAULT_PORT),
            store_path: PathBuf::from("server_password.txt"),
            read_timeout: READ_TIMEOUT,
        }
    }
}

/// Turnstile server: a bound listener plus the shared gate.
pub struct Server {
    listener: TcpListener,
    gate: Arc<Mutex<Gate<FileExpectationStore>>>,
    read_timeout: Duration,
}

impl Server {
    /// Create and bind a new server.
    ///
    /// Loads the current expectation from the store up front, so a missing or
    /// unreadable expectation file fails the start instead of every
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded or binding fails.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let store = FileExpectationStore::new(&config.store_path);
        let gate = Gate::load(store)?;
        let listener = TcpListener::bind(&config.bind_address).await?;

        Ok(Self {
            listener,
            gate: Arc::new(Mutex::new(gate)),
            read_timeout: config.read_timeout,
        })
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server, accepting connections until the process is killed.
    ///
    /// Each accepted connection gets its own task; a failure inside one
    /// handler is logged and never takes down the acceptor or any other
    /// connection.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let gate = Arc::clone(&self.gate);
                    let read_timeout = self.read_timeout;

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, gate, read_timeout).await {
                            tracing::debug!("connection {}: {}", peer, e);
                        }
                    });
                },
                Err(e) => {
                    tracing::error!("accept error: {}", e);
                },
            }
        }
    }
}

/// Handle a single connection: one submission, one verdict, close.
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    gate: Arc<Mutex<Gate<FileExpectationStore>>>,
    read_timeout: Duration,
) -> Result<(), ServerError> {
    tracing::debug!("new connection from {}", peer);

    // Reading. A timeout or read error closes the connection with no
    // response sent.
    let submitted = read_submission(&mut stream, read_timeout).await?;

    // Authenticating. The lock covers the whole compare-and-replace step,
    // including the persist on success.
    let verdict = {
        let mut gate = gate.lock().await;
        match gate.submit(&submitted) {
            Ok(verdict) => verdict,
            Err(e) => {
                // The expectation did not advance, so the attempt is not
                // spent on the server side; tell the client it failed.
                tracing::error!("expectation store failure: {}", e);
                Verdict::Rejected
            },
        }
    };

    // Responding.
    let line = match verdict {
        Verdict::Accepted => SUCCESS_LINE,
        Verdict::Rejected => FAILURE_LINE,
    };
    stream.write_all(line.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.shutdown().await?;

    tracing::info!("{} -> {:?}", peer, verdict);
    Ok(())
}

/// Read one submission: up to [`MAX_SUBMISSION_BYTES`], ended by a newline or
/// by the peer closing its write half, with trailing `\r\n` trimmed.
async fn read_submission(
    stream: &mut TcpStream,
    read_timeout: Duration,
) -> Result<String, ServerError> {
    let mut buf = [0u8; MAX_SUBMISSION_BYTES];
    let mut filled = 0;

    let read_all = async {
        loop {
            if filled == buf.len() {
                break Ok::<_, std::io::Error>(());
            }
            let n = stream.read(&mut buf[filled..]).await?;
            if n == 0 {
                break Ok(());
            }
            filled += n;
            if buf[..filled].contains(&b'\n') {
                break Ok(());
            }
        }
    };

    tokio::time::timeout(read_timeout, read_all)
        .await
        .map_err(|_| ServerError::ReadTimeout)??;

    let mut line = &buf[..filled];
    if let Some(pos) = line.iter().position(|&b| b == b'\n') {
        line = &line[..pos];
    }
    if line.last() == Some(&b'\r') {
        line = &line[..line.len() - 1];
    }

    Ok(String::from_utf8_lossy(line).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn echo_submission(payload: &[u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let payload = payload.to_vec();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(&payload).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let (mut stream, _) = listener.accept().await.unwrap();
        let submitted = read_submission(&mut stream, READ_TIMEOUT).await.unwrap();
        client.await.unwrap();
        submitted
    }

    #[tokio::test]
    async fn reads_a_newline_terminated_submission() {
        assert_eq!(echo_submission(b"7327d846\n").await, "7327d846");
    }

    #[tokio::test]
    async fn reads_an_eof_terminated_submission() {
        assert_eq!(echo_submission(b"7327d846").await, "7327d846");
    }

    #[tokio::test]
    async fn trims_carriage_return() {
        assert_eq!(echo_submission(b"7327d846\r\n").await, "7327d846");
    }

    #[tokio::test]
    async fn ignores_bytes_after_the_first_newline() {
        assert_eq!(echo_submission(b"7327d846\ntrailing").await, "7327d846");
    }

    #[tokio::test]
    async fn oversized_submission_is_truncated_not_fatal() {
        let big = vec![b'a'; MAX_SUBMISSION_BYTES * 2];
        let submitted = echo_submission(&big).await;
        assert_eq!(submitted.len(), MAX_SUBMISSION_BYTES);
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let _client = TcpStream::connect(addr).await.unwrap();
        let (mut stream, _) = listener.accept().await.unwrap();

        let result = read_submission(&mut stream, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(ServerError::ReadTimeout)));
    }
}
