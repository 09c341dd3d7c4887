//! # wk-protocol
//!
//! Core protocol definitions and data models for workflow-kit.
//!
//! This crate defines all shared data structures used for:
//! - Conversation messages and snapshots
//! - Workflow definition files (YAML / Markdown)
//! - Global configuration (`config.toml`)
//! - Communication between front ends and workflow sessions
//!
//! ## Modules
//!
//! - [`message_models`]: Messages, roles, ids and snapshots
//! - [`workflow_models`]: Step descriptors, engine config, scripted workflows
//! - [`config_models`]: Global configuration from config.toml
//! - [`ipc`]: Operations and Events for front end / session communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, ts-rs, uuid, chrono and tokio channels
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other workflow-kit crates

pub mod config_models;
pub mod ipc;
pub mod message_models;
pub mod workflow_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use message_models::*;
pub use workflow_models::*;
