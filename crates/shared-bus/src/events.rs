//! # Chain Events
//!
//! Defines the event types that flow through the shared bus. The block
//! payload travels behind an `Arc` so fanning an event out to many
//! subscribers never copies the block itself.

use std::sync::Arc;

use shared_types::block::AppliedBlock;

/// All events that can be published to the event bus.
#[derive(Debug, Clone)]
pub enum ChainEvent {
    /// A block was applied and is durable. Fired exactly once per block,
    /// in commit order.
    BlockApplied(Arc<AppliedBlock>),

    /// The node is shutting down; consumers should finish in-flight work
    /// and stop.
    ShuttingDown,
}

impl ChainEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockApplied(_) => EventTopic::Commit,
            Self::ShuttingDown => EventTopic::Control,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    /// Block commit events.
    Commit,
    /// Lifecycle events (shutdown).
    Control,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ChainEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
