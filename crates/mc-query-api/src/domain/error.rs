//! Query API error types.
//!
//! Missing objects are never an error on batch accessors: they surface as
//! `None` in the result position. Errors are reserved for malformed
//! requests and serialization failures.

use shared_types::ids::InvalidMarketPair;
use thiserror::Error;

/// Result alias for query facade methods.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A lookup asked for more results than the hard cap allows.
    #[error("limit {requested} exceeds maximum {maximum}")]
    LimitExceeded { requested: u32, maximum: u32 },

    /// The two assets given do not form a market.
    #[error(transparent)]
    InvalidMarket(#[from] InvalidMarketPair),

    /// A lookup by name referenced an account that does not exist.
    #[error("account {0:?} does not exist")]
    AccountNotFound(String),

    /// Canonical serialization failed.
    #[error("failed to serialize transaction: {0}")]
    Encode(#[from] bincode::Error),
}

impl QueryError {
    /// Build a limit error, used by every capped lookup.
    #[must_use]
    pub fn limit_exceeded(requested: u32, maximum: u32) -> Self {
        Self::LimitExceeded { requested, maximum }
    }
}

/// A subscriber failed to take delivery of an update.
///
/// Delivery failures are isolated per callback: they are logged by the
/// broadcast worker and never abort the rest of the batch.
#[derive(Debug, Clone, Error)]
#[error("subscriber rejected update: {reason}")]
pub struct DeliveryError {
    pub reason: String,
}

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The subscriber's transport is gone.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::new("subscriber disconnected")
    }
}
