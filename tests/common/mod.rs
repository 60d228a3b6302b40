//! Common test utilities module
//!
//! Provides shared utilities for tests including:
//! - Temporary directory management
//! - Cricket source fixtures

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod test_utils;

pub use fixtures::{fixture_config, fixture_frame, fixture_source, write_fixture_sources};
pub use test_utils::TempTestDir;
