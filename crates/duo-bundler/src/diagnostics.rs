//! Diagnostic extraction from Rolldown errors.
//!
//! Rolldown's batched errors are classified from their debug rendering into
//! a small, stable, cloneable shape so the rest of the crate never depends
//! on Rolldown's error types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: Option<String>,
    pub help: Option<String>,
}

impl ExtractedDiagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            file: None,
            help: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingExport,
    ParseError,
    CircularDependency,
    UnresolvedEntry,
    UnresolvedImport,
    Plugin,
    Other,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DiagnosticKind::MissingExport => "MissingExport",
            DiagnosticKind::ParseError => "ParseError",
            DiagnosticKind::CircularDependency => "CircularDependency",
            DiagnosticKind::UnresolvedEntry => "UnresolvedEntry",
            DiagnosticKind::UnresolvedImport => "UnresolvedImport",
            DiagnosticKind::Plugin => "Plugin",
            DiagnosticKind::Other => "Error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Extract diagnostics from any Rolldown error value.
pub fn extract_from_rolldown_error(error: &dyn std::fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let error_str = format!("{error:?}");

    let parts: Vec<&str> = error_str
        .split("BatchedBuildDiagnostic")
        .filter(|s| !s.trim().is_empty())
        .collect();

    if parts.len() > 1 {
        parts.iter().map(|part| extract_single(part)).collect()
    } else {
        vec![extract_single(&error_str)]
    }
}

fn extract_single(error_str: &str) -> ExtractedDiagnostic {
    let kind = classify(error_str);
    let help = match kind {
        DiagnosticKind::UnresolvedImport | DiagnosticKind::UnresolvedEntry => Some(
            "Check that the file exists and that dependencies are installed in node_modules."
                .to_string(),
        ),
        _ => extract_help_text(error_str),
    };

    ExtractedDiagnostic {
        kind,
        severity: DiagnosticSeverity::Error,
        message: error_str.trim().to_string(),
        file: extract_file_path(error_str),
        help,
    }
}

fn classify(error_str: &str) -> DiagnosticKind {
    if error_str.contains("MissingExport") {
        DiagnosticKind::MissingExport
    } else if error_str.contains("UnresolvedEntry") {
        DiagnosticKind::UnresolvedEntry
    } else if error_str.contains("UnresolvedImport") || error_str.contains("Could not resolve") {
        DiagnosticKind::UnresolvedImport
    } else if error_str.contains("Parse error")
        || error_str.contains("Syntax")
        || error_str.contains("Expected")
    {
        DiagnosticKind::ParseError
    } else if error_str.contains("Circular") {
        DiagnosticKind::CircularDependency
    } else if error_str.contains("Plugin") {
        DiagnosticKind::Plugin
    } else {
        DiagnosticKind::Other
    }
}

/// First quoted or prefixed path ending in a script extension.
fn extract_file_path(text: &str) -> Option<String> {
    for ext in &[".js", ".ts", ".jsx", ".tsx", ".mjs", ".cjs"] {
        if let Some(pos) = text.find(ext) {
            let before = &text[..pos + ext.len()];
            for indicator in &["\"", "'", "file: ", "path: ", "in ", "at "] {
                if let Some(start) = before.rfind(indicator) {
                    let path_str = before[start + indicator.len()..].trim();
                    if !path_str.is_empty() {
                        return Some(path_str.to_string());
                    }
                }
            }
        }
    }
    None
}

fn extract_help_text(text: &str) -> Option<String> {
    for indicator in &["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(indicator) {
            let help = text[pos + indicator.len()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim();
            if !help.is_empty() {
                return Some(help.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Raw(&'static str);

    impl std::fmt::Debug for Raw {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    #[test]
    fn test_unresolved_import() {
        let diags = extract_from_rolldown_error(&Raw(
            "UnresolvedImport: Could not resolve 'missing' in \"/app/src/a.js\"",
        ));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnresolvedImport);
        assert_eq!(diags[0].file.as_deref(), Some("/app/src/a.js"));
        assert!(diags[0].help.is_some());
    }

    #[test]
    fn test_batched_errors_are_split() {
        let diags = extract_from_rolldown_error(&Raw(
            "BatchedBuildDiagnostic MissingExport foo BatchedBuildDiagnostic Parse error",
        ));
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingExport);
        assert_eq!(diags[1].kind, DiagnosticKind::ParseError);
    }

    #[test]
    fn test_help_text() {
        let diags = extract_from_rolldown_error(&Raw("something broke\nhelp: try again"));
        assert_eq!(diags[0].kind, DiagnosticKind::Other);
        assert_eq!(diags[0].help.as_deref(), Some("try again"));
    }
}
