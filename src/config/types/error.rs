//! Configuration errors and field-addressed diagnostics.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file is not valid TOML")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Validation(String),

    // No #[from]: a source() here would print every diagnostic twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// Dotted path of a config field, e.g. `serve.admin_prefixes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One validation failure.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Attach a fix suggestion.
    pub fn with_hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.field.as_str().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Validation failures collected across all sections, reported together.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<Diagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; chain [`Diagnostic::with_hint`] to add a suggestion.
    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) -> &mut Diagnostic {
        self.errors.push(Diagnostic {
            field,
            message: message.into(),
            hint: None,
        });
        let last = self.errors.len() - 1;
        &mut self.errors[last]
    }

    /// Print a non-fatal note right away.
    pub fn note(&self, field: FieldPath, message: impl AsRef<str>) {
        crate::log!("hint"; "{}: {}", field, message.as_ref());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = crate::utils::plural_count(self.errors.len(), "error");
        write!(f, "{} ({count})", "invalid config".red().bold())?;
        for err in &self.errors {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
