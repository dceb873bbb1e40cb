//! Hash-chain generation for one enrollment.
//!
//! One enrollment draws a single random seed and walks the derivation
//! function forward `n + 1` times:
//!
//! ```text
//! link[0]   = derive_seed(seed)
//! link[i+1] = derive(link[i])
//! ```
//!
//! The client receives the `n` pre-images in consumption order
//! `[link[n-1], …, link[0]]`; the server is seeded with the anchor
//! `link[n]`. The stored expectation is therefore always one hash-step ahead
//! of the next valid submission: verifying `link[i]` means checking
//! `derive(link[i]) == link[i+1]`, then storing `link[i]` as the new
//! expectation. Each accepted round walks the expectation one link down the
//! chain, and a consumed pre-image can never verify again.

use rand::Rng;

use crate::error::GenerateError;
use crate::otp::{MAX_SEED, Otp, derive, derive_seed};

/// One generated enrollment: the client's password sequence plus the server's
/// initial expectation.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Pre-images in consumption order (first element used first).
    passwords: Vec<Otp>,
    /// The server's initial expectation, `derive(passwords[0])`.
    anchor: Otp,
}

impl Chain {
    /// The client-side sequence, in authentication order.
    pub fn passwords(&self) -> &[Otp] {
        &self.passwords
    }

    /// The server-side initial expectation.
    pub fn anchor(&self) -> &Otp {
        &self.anchor
    }

    /// Split into `(passwords, anchor)` for persisting to the two stores.
    pub fn into_parts(self) -> (Vec<Otp>, Otp) {
        (self.passwords, self.anchor)
    }
}

/// Generate a chain of `count` passwords from a fresh random seed.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidCount`] for `count < 1`. Nothing is
/// persisted here; callers write the two stores and treat a write failure as
/// fatal to the run.
pub fn generate(count: usize) -> Result<Chain, GenerateError> {
    let seed = rand::thread_rng().gen_range(0..MAX_SEED);
    generate_from_seed(count, seed)
}

/// Generate a chain of `count` passwords from a caller-chosen seed.
///
/// Deterministic: the same `(count, seed)` pair always yields the same chain.
pub fn generate_from_seed(count: usize, seed: u32) -> Result<Chain, GenerateError> {
    if count < 1 {
        return Err(GenerateError::InvalidCount { count });
    }

    let mut current = derive_seed(seed);
    let mut pre_images = Vec::with_capacity(count);
    for _ in 0..count {
        pre_images.push(current.clone());
        current = derive(current.as_bytes());
    }
    // pre_images now holds link[0]..link[n-1]; the client consumes the chain
    // from the far end back toward the seed.
    pre_images.reverse();

    tracing::debug!(count, "generated password chain");

    Ok(Chain { passwords: pre_images, anchor: current })
}
