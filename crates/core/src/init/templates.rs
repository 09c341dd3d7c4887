//! Embedded template files for .workflow-kit initialization.
//!
//! This module uses `rust-embed` to embed template files from the workspace
//! root `templates/` directory into the binary at compile time, so the CLI can
//! generate `.workflow-kit/` structures without external file dependencies.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// The path is relative to the crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = workspace root `templates/`
///
/// With the `debug-embed` feature, debug builds embed the files as well.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Arguments
/// * `path` - Relative path from templates root (e.g., "config.toml", "workflows/peer-comparison.yaml")
///
/// # Returns
/// The file content as a String, or None if the file doesn't exist.
///
/// # Example
/// ```
/// use wk_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("time-scale ="));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files under a directory prefix.
///
/// # Example
/// ```
/// use wk_core::init::templates::list_templates;
///
/// let workflows = list_templates("workflows/");
/// assert!(workflows.contains(&"workflows/peer-comparison.yaml".to_string()));
/// ```
pub fn list_templates(prefix: &str) -> Vec<String> {
    TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wk_protocol::workflow_models::WorkflowDefinition;

    #[test]
    fn test_get_config_template() {
        let content = get_template("config.toml").expect("config.toml should be embedded");
        assert!(content.contains("time-scale ="));
        assert!(content.contains("default-workflow"));
    }

    #[test]
    fn test_yaml_workflow_templates_parse() {
        for path in list_templates("workflows/") {
            if !path.ends_with(".yaml") {
                continue;
            }
            let content = get_template(&path).unwrap();
            let definition: WorkflowDefinition = serde_yaml::from_str(&content)
                .unwrap_or_else(|e| panic!("{} should parse: {}", path, e));
            assert!(definition.validate().is_ok(), "{} should validate", path);
            assert!(
                !definition.steps.last().unwrap().customization,
                "{} should end without a control",
                path
            );
        }
    }

    #[test]
    fn test_get_markdown_workflow() {
        let content = get_template("workflows/ipo-screening.md").unwrap();
        assert!(content.starts_with("---\nname: ipo-screening"));
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }

    #[test]
    fn test_list_workflow_templates() {
        let workflows = list_templates("workflows/");
        assert_eq!(workflows.len(), 4);
        assert!(workflows.contains(&"workflows/document-upload.yaml".to_string()));
        assert!(workflows.contains(&"workflows/chart-extraction.yaml".to_string()));
    }

    #[test]
    fn test_list_empty_prefix() {
        // config.toml plus four workflows
        assert_eq!(list_templates("").len(), 5);
    }
}
