//! # Shared Types Crate
//!
//! This crate contains the ledger vocabulary shared across subsystems:
//! object identifiers, asset amounts and prices, ledger object state,
//! protocol operations, and block types.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Invariants by Construction**: `MarketPair` can only be built through
//!   its normalizing constructor; object ids render and parse through one
//!   canonical `space.type.instance` form.
//! - **Wire-Stable**: Every type serializes through serde; object ids and
//!   market pairs use their canonical text forms.

pub mod amount;
pub mod block;
pub mod entities;
pub mod ids;
pub mod operations;

pub use amount::*;
pub use block::*;
pub use entities::*;
pub use ids::*;
pub use operations::*;
