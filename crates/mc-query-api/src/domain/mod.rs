//! Domain types for the query API.
//!
//! This module contains the pure pieces of the notification pipeline:
//! batches, the throttle state machine, the market change detector, the
//! subscription registry, and the snapshot resolver. None of them touch
//! the event bus or spawn tasks; the service layer wires them together.

pub mod batch;
pub mod config;
pub mod error;
pub mod markets;
pub mod resolver;
pub mod subscriptions;
pub mod throttle;

// Re-exports for convenience
pub use batch::BroadcastBatch;
pub use config::{BusConfig, LookupLimits, QueryApiConfig};
pub use error::{DeliveryError, QueryError, QueryResult};
pub use markets::partition_by_market;
pub use resolver::{ObjectSnapshot, SnapshotResolver};
pub use subscriptions::{DeliveryPlan, MarketUpdate, ObjectUpdate, SubscriptionRegistry};
pub use throttle::BroadcastThrottle;
