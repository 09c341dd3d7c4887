//! Errors raised while loading `.workflow-kit/`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading `config.toml` and workflow files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has mistyped keys.
    #[error("Failed to parse global config {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A `.yaml`/`.yml` workflow does not match the definition schema.
    #[error("Failed to parse workflow {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A `.md` workflow has missing or malformed front matter.
    #[error("Failed to parse workflow front matter in {path}: {reason}")]
    MarkdownParse { path: PathBuf, reason: String },

    #[error("Failed to scan workflow directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Parsed fine but breaks a rule, e.g. a negative time scale or a
    /// workflow without steps.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// Two workflow files declare the same name.
    #[error("Workflow '{name}' is defined twice: {first} and {second}")]
    DuplicateWorkflow {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result alias for the config loader.
pub type ConfigResult<T> = Result<T, ConfigError>;
