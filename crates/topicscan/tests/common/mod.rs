//! Shared test utilities for topicscan integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs over temp directories
//! - Transport and reader doubles for driving failure paths

pub mod doubles;
pub mod harness;

pub use doubles::{CorruptingTransport, CountingTransport, FlakyReader};
pub use harness::TestHarness;
