//! Diagnostics reported by SANY (TLA+ syntax and semantic analyzer)

use serde::Serialize;

use crate::check::SourceRange;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single SANY message tied to a module location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Module the message refers to, when SANY named one
    pub module: Option<String>,
    pub range: SourceRange,
    pub severity: Severity,
    pub message: String,
}

/// All messages from one SANY run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticCollection {
    /// Files SANY reported parsing, in order
    pub files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<String>) {
        self.files.push(path.into());
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_count_ignores_warnings() {
        let mut col = DiagnosticCollection::new();
        assert!(col.is_empty());
        col.add(Diagnostic {
            module: Some("Spec".to_string()),
            range: SourceRange::new(1, 1, 1, 5),
            severity: Severity::Warning,
            message: "Multiply-defined symbol".to_string(),
        });
        col.add(Diagnostic {
            module: None,
            range: SourceRange::default(),
            severity: Severity::Error,
            message: "Unknown operator".to_string(),
        });
        assert_eq!(col.error_count(), 1);
        assert!(!col.is_empty());
    }
}
