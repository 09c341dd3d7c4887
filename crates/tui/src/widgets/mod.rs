//! TUI widgets module.
//!
//! This module contains the panels the app lays out.

pub mod conversation_view;
pub mod input_composer;
pub mod step_tracker;

pub use conversation_view::ConversationView;
pub use input_composer::{ComposerAction, InputComposer};
pub use step_tracker::render_step_tracker;
