//! Turnstile enrollment binary.
//!
//! # Usage
//!
//! ```bash
//! # Generate a 4-password chain into the default store files
//! turnstile-keygen 4
//!
//! # Explicit store locations, reproducible seed
//! turnstile-keygen 10 --client-file c.json --server-file s.txt --seed 42
//! ```
//!
//! Writes the full password sequence to the client file and the anchor — the
//! hash of the sequence's first element — to the server file, establishing
//! the initial lock-step position. Both sides must receive their file out of
//! band before any authentication attempt.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use turnstile_core::store::{
    ExpectationStore, FileExpectationStore, FileSequenceStore, SequenceStore,
};
use turnstile_core::{generate, generate_from_seed};

/// Turnstile enrollment tool
#[derive(Parser, Debug)]
#[command(name = "turnstile-keygen")]
#[command(about = "Generates a lock-step OTP chain and seeds both stores")]
#[command(version)]
struct Args {
    /// Number of one-time passwords to generate; positive integer
    count: usize,

    /// Path of the client-side sequence file
    #[arg(long, default_value = "client_passwords.json")]
    client_file: PathBuf,

    /// Path of the server-side expectation file
    #[arg(long, default_value = "server_password.txt")]
    server_file: PathBuf,

    /// Fixed seed instead of a random draw (reproducible chains)
    #[arg(long)]
    seed: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    // Generation fails before either store is touched, so an invalid count
    // persists nothing.
    let chain = match args.seed {
        Some(seed) => generate_from_seed(args.count, seed)?,
        None => generate(args.count)?,
    };

    let (passwords, anchor) = chain.into_parts();

    FileSequenceStore::new(&args.client_file).save(&passwords)?;
    tracing::info!("wrote {} passwords to {}", passwords.len(), args.client_file.display());

    FileExpectationStore::new(&args.server_file).save(&anchor)?;
    tracing::info!("wrote initial expectation to {}", args.server_file.display());

    Ok(())
}
