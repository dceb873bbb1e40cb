//! Turnstile client session.
//!
//! The client is fully sequential: one authentication attempt is one blocking
//! round trip. It takes the first unused token from its sequence, sends it,
//! reads the verdict, and — whatever happened on the wire — pops the token
//! and rewrites the store. A token is submitted at most once, ever; attempts
//! are not idempotent, and a dropped connection burns the token it carried.

#![forbid(unsafe_code)]

mod error;

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use turnstile_core::Verdict;
use turnstile_core::otp::Otp;
use turnstile_core::store::SequenceStore;
use turnstile_core::wire::SUCCESS_LINE;

pub use error::ClientError;

/// Bound on connecting, writing, and awaiting the response.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Run one authentication attempt against `addr`.
///
/// The exhaustion check happens before any socket is opened: an empty
/// sequence never generates network traffic. After the transport attempt —
/// successful or not — the submitted token is removed from the front of the
/// sequence and the store rewritten, enforcing single use independent of the
/// server's verdict.
///
/// # Errors
///
/// - [`ClientError::Exhausted`] if the sequence is empty; regeneration on
///   both sides is the only recovery.
/// - [`ClientError::Store`] if the sequence cannot be loaded or rewritten.
/// - [`ClientError::Transport`] on refused/reset/timed-out connections; the
///   token is consumed regardless.
pub fn authenticate_once<S: SequenceStore>(
    store: &S,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<Verdict, ClientError> {
    let mut passwords = store.load()?;
    if passwords.is_empty() {
        return Err(ClientError::Exhausted);
    }

    let submitted = passwords.remove(0);
    tracing::debug!("submitting {}", submitted);

    let outcome = exchange(addr, &submitted, timeout);

    // Single-use guarantee: the token is spent by the attempt itself, not by
    // the verdict.
    store.save(&passwords)?;

    let response = outcome?;
    let verdict = if response.trim_end() == SUCCESS_LINE {
        Verdict::Accepted
    } else {
        Verdict::Rejected
    };

    tracing::info!("server verdict: {:?}", verdict);
    Ok(verdict)
}

/// The wire round trip: connect, send the raw token, read one response line.
fn exchange(addr: SocketAddr, otp: &Otp, timeout: Duration) -> std::io::Result<String> {
    let mut stream = TcpStream::connect_timeout(&addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    stream.write_all(otp.as_bytes())?;
    stream.write_all(b"\n")?;

    let mut response = String::new();
    let mut reader = BufReader::new(stream);
    reader.read_line(&mut response)?;
    Ok(response)
}
