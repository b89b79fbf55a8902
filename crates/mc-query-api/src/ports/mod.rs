//! Outbound ports: what the query layer needs from the rest of the node.

pub mod store;

pub use store::{BlockStore, ObjectStore};
