//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Workflow definition fixtures
//! - Project directories with a `.workflow-kit/` configuration
//! - Event collection helpers

pub mod fixtures;

pub use fixtures::*;
