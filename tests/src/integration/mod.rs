//! Cross-crate integration flows.

pub mod queries;
