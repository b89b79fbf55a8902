//! MC Query API - Read-side queries and live change notifications.
//!
//! This crate answers point and range queries against replicated ledger
//! state and pushes incremental change notifications to subscribers as new
//! blocks commit.
//!
//! # Architecture
//!
//! ```text
//!                         Event Bus
//!                             │ BlockApplied
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │   Commit Listener   │
//!                  └──────────┬──────────┘
//!                             │
//! ┌───────────────────────────┼─────────────────────────────────────┐
//! │                QUERY API (mc-query-api)                         │
//! │  ┌────────────────────────┴──────────────────────────┐         │
//! │  │              Block-Commit Hook                    │         │
//! │  │   changed ids ──► Market Change Detector          │         │
//! │  │                ──► Broadcast Throttle (coalesce)  │         │
//! │  └────────────────────────┬──────────────────────────┘         │
//! │  ┌────────────────────────┴──────────────────────────┐         │
//! │  │             Broadcast Worker (one at a time)      │         │
//! │  │   Snapshot Resolver ──► Subscription Registry     │         │
//! │  │                     ──► one task per callback     │         │
//! │  └───────────────────────────────────────────────────┘         │
//! │                                                                 │
//! │  Query Facade: get_objects / lookups / order books / balances  │
//! │  over the ObjectStore + BlockStore ports                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Delivery Semantics
//!
//! At most one broadcast is in flight at a time. Blocks that commit while
//! a broadcast runs are coalesced into a single pending batch, so
//! subscribers observe the latest state rather than every intermediate
//! one. Within a broadcast every callback runs as its own task; a slow or
//! failing subscriber never delays the others and never stalls block
//! processing.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::commit_listener::spawn_commit_listener;
pub use adapters::memory_blocks::MemoryBlockStore;
pub use adapters::memory_store::MemoryLedgerStore;
pub use domain::batch::BroadcastBatch;
pub use domain::config::{BusConfig, LookupLimits, QueryApiConfig};
pub use domain::error::{DeliveryError, QueryError, QueryResult};
pub use domain::resolver::ObjectSnapshot;
pub use domain::subscriptions::{
    market_callback, object_callback, MarketCallback, MarketUpdate, ObjectCallback, ObjectUpdate,
};
pub use ports::store::{BlockStore, ObjectStore};
pub use service::QueryApiService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
