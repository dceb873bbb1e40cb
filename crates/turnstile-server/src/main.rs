//! Turnstile server binary.
//!
//! # Usage
//!
//! ```bash
//! # Listen on the default port with the default expectation file
//! turnstile-server
//!
//! # Custom port and store location
//! turnstile-server --port 4222 --file /var/lib/turnstile/server_password.txt
//! ```
//!
//! The expectation file must exist and hold the token the server currently
//! expects; `turnstile-keygen` writes it during enrollment.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use turnstile_server::{Server, ServerConfig};

/// Turnstile authentication server
#[derive(Parser, Debug)]
#[command(name = "turnstile-server")]
#[command(about = "Lock-step OTP authentication server")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = turnstile_core::wire::DEFAULT_PORT)]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Path of the expectation file
    #[arg(short, long, default_value = "server_password.txt")]
    file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = ServerConfig {
        bind_address: format!("{}:{}", args.bind, args.port),
        store_path: args.file,
        ..Default::default()
    };

    let server = Server::bind(config).await?;

    tracing::info!("server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
