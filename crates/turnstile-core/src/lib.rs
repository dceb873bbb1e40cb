//! Turnstile protocol core.
//!
//! This crate holds everything both ends of the protocol agree on: the OTP
//! derivation function, hash-chain generation, the server-side
//! compare-and-advance gate, and the typed persistence stores.
//!
//! ## Architecture
//!
//! ```text
//! turnstile-core
//!   ├─ otp       (derivation function, Otp token type)
//!   ├─ chain     (hash-chain generation for one enrollment)
//!   ├─ gate      (compare-and-advance over the expected token)
//!   ├─ store     (SequenceStore / ExpectationStore + file impls)
//!   └─ wire      (shared wire-protocol constants)
//! ```
//!
//! Protocol logic here is pure and synchronous; the server and client crates
//! supply the I/O around it.

#![forbid(unsafe_code)]

pub mod chain;
pub mod error;
pub mod gate;
pub mod otp;
pub mod store;
pub mod wire;

pub use chain::{Chain, generate, generate_from_seed};
pub use error::{GenerateError, StoreError};
pub use gate::{Gate, Verdict};
pub use otp::{MAX_SEED, OTP_LEN, Otp, derive, derive_seed};
pub use store::{
    ExpectationStore, FileExpectationStore, FileSequenceStore, MemoryExpectationStore,
    SequenceStore,
};
