//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to an upstream API:
//!     → reqwest client timeouts (connect / per-call deadline)
//!     → On failure: retries.rs (check if retryable, retry with backoff)
//!     → backoff.rs (exponential delay with jitter, Retry-After)
//! ```

pub mod backoff;
pub mod retries;

pub use retries::send_with_retry;
