//! Wire-protocol constants shared by both ends.
//!
//! The exchange is one round trip per connection: the client sends the raw
//! token as a newline-terminated byte string (the receiver also accepts EOF
//! termination and strips trailing line terminators), the server replies with
//! exactly one of two fixed lines and closes. No framing, no length prefix,
//! no second attempt on the same connection.

/// Default TCP port the server listens on.
pub const DEFAULT_PORT: u16 = 2289;

/// Fixed response line for an accepted submission.
pub const SUCCESS_LINE: &str = "Authentication successful!";

/// Fixed response line for a rejected submission.
pub const FAILURE_LINE: &str = "Failed to Authenticate.";

/// Upper bound on the bytes a handler reads for one submission. Honest
/// submissions are 8 characters plus a newline; anything longer is truncated
/// here and rejected by the hash comparison.
pub const MAX_SUBMISSION_BYTES: usize = 256;
