//! Ecosystem-specific markers used by the extractor.
//!
//! The defaults target JavaScript projects. Other ecosystems override them
//! through the `[signals]` config table.

use serde::{Deserialize, Serialize};

/// Maps an exact manifest path to a project category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub manifest: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(manifest: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            manifest: manifest.into(),
            category: category.into(),
        }
    }
}

/// Substring markers and classification tables for signal extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalRules {
    /// A file path containing any of these means linting is configured.
    pub lint_markers: Vec<String>,
    /// A file path containing any of these means CI is configured.
    pub ci_markers: Vec<String>,
    /// Case-insensitive README keywords that indicate setup instructions.
    pub setup_keywords: Vec<String>,
    /// Checked in order; first manifest present in the tree wins.
    pub categories: Vec<CategoryRule>,
    pub fallback_category: String,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            lint_markers: vec!["eslint".to_string()],
            ci_markers: vec![".github/workflows".to_string()],
            setup_keywords: vec![
                "install".to_string(),
                "setup".to_string(),
                "usage".to_string(),
            ],
            categories: vec![CategoryRule::new("package.json", "web application")],
            fallback_category: "general project".to_string(),
        }
    }
}

impl SignalRules {
    /// Category for a set of file paths.
    pub fn categorize(&self, files: &[&str]) -> &str {
        self.categories
            .iter()
            .find(|rule| files.iter().any(|path| *path == rule.manifest))
            .map(|rule| rule.category.as_str())
            .unwrap_or(&self.fallback_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_package_json_only_at_root() {
        let rules = SignalRules::default();
        assert_eq!(rules.categorize(&["package.json"]), "web application");
        assert_eq!(
            rules.categorize(&["web/package.json", "README.md"]),
            "general project"
        );
        assert_eq!(rules.categorize(&[]), "general project");
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = SignalRules {
            categories: vec![
                CategoryRule::new("Cargo.toml", "rust crate"),
                CategoryRule::new("package.json", "web application"),
            ],
            ..SignalRules::default()
        };
        let files = ["package.json", "Cargo.toml"];
        assert_eq!(rules.categorize(&files), "rust crate");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let rules: SignalRules = toml::from_str(r#"lint_markers = ["clippy.toml"]"#).unwrap();
        assert_eq!(rules.lint_markers, vec!["clippy.toml"]);
        assert_eq!(rules.ci_markers, vec![".github/workflows"]);
        assert_eq!(rules.fallback_category, "general project");
    }
}
