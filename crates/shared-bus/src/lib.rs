//! # Shared Bus - Event Bus for Inter-Subsystem Communication
//!
//! Subsystems never call each other directly: the pipeline that applies
//! blocks publishes a [`ChainEvent`] here, and any subsystem that cares
//! (the query layer, indexers, gossip) consumes it through its own
//! subscription.
//!
//! ## Choreography Pattern
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Validation   │                    │ Query Layer  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  │              │  subscribe()
//!                  └──────────────┘
//! ```
//!
//! The commit event fires exactly once per applied block, after the block
//! is durable; subscribers therefore never observe state that could be
//! rolled back by a crash.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ChainEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
