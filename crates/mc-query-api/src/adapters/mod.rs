//! Adapters binding the query core to its surroundings: in-memory
//! implementations of the store ports and the event-bus listener that
//! drives the notification pipeline.

pub mod commit_listener;
pub mod memory_blocks;
pub mod memory_store;

pub use commit_listener::spawn_commit_listener;
pub use memory_blocks::MemoryBlockStore;
pub use memory_store::MemoryLedgerStore;
