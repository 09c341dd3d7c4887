//! Initialization module for creating .workflow-kit directory structures.
//!
//! This module provides functionality to initialize a new workflow-kit project
//! by generating a `.workflow-kit/` directory with pre-configured templates for:
//! - Global configuration (`config.toml`)
//! - Demo workflows (`workflows/*.yaml`, `workflows/*.md`)
//!
//! # Example
//!
//! ```no_run
//! use wk_core::init::{InitOptions, generate_workflow_kit_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! let written = generate_workflow_kit_structure(options).await?;
//! println!("Wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_workflow_kit_structure, InitOptions};
pub use templates::{get_template, list_templates};
