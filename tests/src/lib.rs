//! # Meridian-Chain Test Suite
//!
//! Cross-crate tests that exercise the query subsystem the way a running
//! node does: blocks commit on the shared bus, the commit listener drives
//! the notification pipeline, and clients hit the query facade.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared chain state and callback builders
//! └── integration/
//!     ├── pipeline.rs   # Bus → listener → broadcast delivery flows
//!     └── queries.rs    # Query facade contracts against populated state
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mc-tests
//!
//! # By category
//! cargo test -p mc-tests integration::pipeline
//! cargo test -p mc-tests integration::queries
//!
//! # Benchmarks
//! cargo bench -p mc-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
