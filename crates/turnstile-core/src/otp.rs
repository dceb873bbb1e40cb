//! OTP derivation.
//!
//! A token is a fixed window of the hex digest of MD5 over the input bytes.
//! Derivation is pure and total: any byte string hashes, identical input
//! yields identical output.
//!
//! # Security
//!
//! The seed space is `[0, MAX_SEED)` — 10 bits. Every chain a generator can
//! produce starts from one of 1024 seeds, so an attacker who captures the
//! server's expectation can brute-force the originating seed offline. This is
//! a known weakness of the scheme and is kept as-is rather than silently
//! widened; do not use these tokens to protect anything valuable.

use std::fmt;
use std::ops::Range;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Length of a token in characters.
pub const OTP_LEN: usize = 8;

/// Window of the 32-character hex digest a token is cut from.
pub const DIGEST_WINDOW: Range<usize> = 12..20;

/// Exclusive upper bound of the seed space.
pub const MAX_SEED: u32 = 1024;

/// A one-time password token.
///
/// Opaque for comparison purposes; the only operation the protocol performs
/// on a token is equality. Honest tokens are 8 lowercase-hex characters, but
/// the type does not enforce that — the gate stores whatever pre-image was
/// proven, and anything else simply never verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Otp(String);

impl Otp {
    /// View the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token's byte representation, as fed back into [`derive`] when
    /// walking the chain.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<String> for Otp {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Otp {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive a token from arbitrary input bytes.
///
/// Used on the verification path (re-hash of the raw value received over the
/// wire) and when walking the chain one link forward.
pub fn derive(input: &[u8]) -> Otp {
    let digest = Md5::digest(input);
    let hex = hex::encode(digest);
    Otp(hex[DIGEST_WINDOW].to_owned())
}

/// Derive the first chain link from a seed.
///
/// Hashes the seed's decimal string representation, so `derive_seed(42)` is
/// `derive(b"42")`.
pub fn derive_seed(seed: u32) -> Otp {
    derive(seed.to_string().as_bytes())
}
