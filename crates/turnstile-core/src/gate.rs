//! The compare-and-advance gate.
//!
//! The gate owns the server's single piece of authentication state: the
//! expected token. [`Gate::submit`] is the sole mutation point — it re-hashes
//! the submitted value, compares it against the expectation, and on a match
//! persists and adopts the proven pre-image as the new expectation.
//!
//! The gate itself is synchronous and knows nothing about connections; the
//! server serializes all concurrent submissions through one mutex around it,
//! which makes the whole read-compare-replace step atomic system-wide.

use crate::error::StoreError;
use crate::otp::{Otp, derive};
use crate::store::ExpectationStore;

/// Outcome of one authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The submission hashed to the expectation; the chain advanced.
    Accepted,
    /// The submission did not verify; the expectation is unchanged.
    Rejected,
}

impl Verdict {
    /// Whether this verdict is an accept.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Server-side authenticator over a persisted expectation.
pub struct Gate<S> {
    expected: Otp,
    store: S,
}

impl<S: ExpectationStore> Gate<S> {
    /// Create a gate from an already-known expectation.
    pub fn new(expected: Otp, store: S) -> Self {
        Self { expected, store }
    }

    /// Create a gate by loading the expectation from its store.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let expected = store.load()?;
        Ok(Self { expected, store })
    }

    /// The token the next submission must hash to.
    pub fn expected(&self) -> &Otp {
        &self.expected
    }

    /// Judge one submission.
    ///
    /// Computes `derive(submitted)` and compares it to the expectation. On a
    /// match the pre-image is persisted first and only then adopted in
    /// memory, so a failed persist leaves the gate exactly where it was. A
    /// mismatch — including empty or malformed submissions and replays of
    /// already-consumed tokens — is an ordinary rejection, never an error.
    pub fn submit(&mut self, submitted: &str) -> Result<Verdict, StoreError> {
        let candidate = derive(submitted.as_bytes());
        if candidate != self.expected {
            tracing::debug!("submission rejected");
            return Ok(Verdict::Rejected);
        }

        let proven = Otp::from(submitted);
        self.store.save(&proven)?;
        self.expected = proven;
        tracing::info!("submission accepted, expectation advanced");
        Ok(Verdict::Accepted)
    }
}
