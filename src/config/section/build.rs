//! `[build]` section configuration.
//!
//! Contains the rendered site to rewrite and where the result goes.
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = "public"              # Rendered site (relative to config root)
//! output = "dist"               # Omit to rewrite files in place
//! extensions = ["html", "htm"]  # Files treated as HTML pages
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Batch rewrite settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding the rendered site.
    pub input: PathBuf,

    /// Destination directory. `None` rewrites pages in place.
    pub output: Option<PathBuf>,

    /// File extensions (without dot, case-insensitive) treated as HTML.
    pub extensions: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: "public".into(),
            output: None,
            extensions: vec!["html".into(), "htm".into()],
        }
    }
}

impl BuildConfig {
    pub const FIELD_OUTPUT: FieldPath = FieldPath::new("build.output");
    pub const FIELD_EXTENSIONS: FieldPath = FieldPath::new("build.extensions");

    /// Whether `path` has one of the configured HTML extensions.
    pub fn is_html(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    /// Validate after path normalization.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            diag.error(Self::FIELD_EXTENSIONS, "no HTML extensions configured")
                .with_hint("use extensions = [\"html\", \"htm\"]");
        }

        if let Some(output) = &self.output
            && output == &self.input
        {
            diag.error(Self::FIELD_OUTPUT, "output directory is the same as input")
                .with_hint("remove `output` to rewrite files in place");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_build_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.input, PathBuf::from("public"));
        assert!(config.build.output.is_none());
        assert_eq!(config.build.extensions, ["html", "htm"]);
    }

    #[test]
    fn test_build_config_override() {
        let config = test_parse_config(
            "[build]\ninput = \"site\"\noutput = \"clean\"\nextensions = [\"xhtml\"]",
        );
        assert_eq!(config.build.input, PathBuf::from("site"));
        assert_eq!(config.build.output, Some(PathBuf::from("clean")));
        assert!(config.build.is_html(Path::new("a/page.XHTML")));
        assert!(!config.build.is_html(Path::new("a/page.html")));
    }

    #[test]
    fn test_is_html() {
        let build = BuildConfig::default();
        assert!(build.is_html(Path::new("index.html")));
        assert!(build.is_html(Path::new("old/INDEX.HTM")));
        assert!(!build.is_html(Path::new("feed.xml")));
        assert!(!build.is_html(Path::new("README")));
    }

    #[test]
    fn test_validate_same_output() {
        let build = BuildConfig {
            output: Some("public".into()),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, BuildConfig::FIELD_OUTPUT);
    }

    #[test]
    fn test_validate_empty_extensions() {
        let build = BuildConfig {
            extensions: Vec::new(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
