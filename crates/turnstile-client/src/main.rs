//! Turnstile client binary.
//!
//! # Usage
//!
//! ```bash
//! # One authentication attempt against the default server
//! turnstile-client
//!
//! # Against a specific server, with a specific sequence file
//! turnstile-client --addr auth.example.net:2289 --file ./client_passwords.json
//! ```
//!
//! The sequence file must exist and hold the remaining passwords;
//! `turnstile-keygen` writes it during enrollment. Each run consumes exactly
//! one password, whatever the outcome.

// The verdict is this program's output; it goes to stdout for piping.
#![allow(clippy::print_stdout)]

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use turnstile_client::{ATTEMPT_TIMEOUT, authenticate_once};
use turnstile_core::Verdict;
use turnstile_core::store::FileSequenceStore;
use turnstile_core::wire::{FAILURE_LINE, SUCCESS_LINE};

/// Turnstile authentication client
#[derive(Parser, Debug)]
#[command(name = "turnstile-client")]
#[command(about = "Lock-step OTP authentication client")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value_t = format!("127.0.0.1:{}", turnstile_core::wire::DEFAULT_PORT))]
    addr: String,

    /// Path of the password sequence file
    #[arg(short, long, default_value = "client_passwords.json")]
    file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn resolve(addr: &str) -> Result<SocketAddr, std::io::Error> {
    addr.to_socket_addrs()?.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "address resolved to nothing")
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let store = FileSequenceStore::new(&args.file);
    let addr = resolve(&args.addr)?;

    let verdict = authenticate_once(&store, addr, ATTEMPT_TIMEOUT)?;
    match verdict {
        Verdict::Accepted => println!("{SUCCESS_LINE}"),
        Verdict::Rejected => println!("{FAILURE_LINE}"),
    }

    Ok(())
}
