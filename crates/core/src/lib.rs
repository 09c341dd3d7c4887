//! # wk-core
//!
//! Conversational workflow engine and the runtime around it.
//!
//! This crate provides:
//! - The [`engine::WorkflowEngine`] message log with step tracking,
//!   a single active customization and editable history
//! - A cancellable [`scheduler`] for timed continuations
//! - [`session::WorkflowSession`], which plays scripted workflow definitions
//!   against an engine and reports progress as events
//! - Configuration loading from the `.workflow-kit/` directory
//! - Project initialization from embedded templates
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`engine`]: Message log and step state
//! - [`init`]: `.workflow-kit/` generation
//! - [`scheduler`]: Cancellable delays and continuations
//! - [`session`]: Scripted workflow playback and the op loop

pub mod config;
pub mod engine;
pub mod init;
pub mod scheduler;
pub mod session;
