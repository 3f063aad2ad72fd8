//! Error types for template scaffolding

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Errors that can occur while locating, rendering or materializing a template
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// No template is registered under the identifier
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A required variable has neither a user value nor a default
    #[error("Missing required variable: {0}")]
    MissingVariable(String),

    /// Template content or path references a variable absent from the context
    #[error("Unresolved placeholder '{{{{{placeholder}}}}}' in {file}")]
    UnresolvedPlaceholder {
        /// Placeholder name as written in the template
        placeholder: String,
        /// Template-relative file (or path expression) containing it
        file: String,
    },

    /// Malformed placeholder syntax
    #[error("Invalid template syntax in {file} at line {line}: {message}")]
    InvalidSyntax {
        /// Template-relative file containing the error
        file: String,
        /// Line number where the error occurred
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Destination files already exist under the abort policy
    #[error("Destination already contains {} conflicting file(s): {}", .paths.len(), display_paths(.paths))]
    Conflict {
        /// Conflicting paths relative to the destination root
        paths: Vec<PathBuf>,
    },

    /// Filesystem failure, after retry and rollback
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Template manifest or file tree failed validation
    #[error("Invalid template '{id}': {message}")]
    InvalidTemplate {
        /// Template identifier (or manifest location when the id is unknown)
        id: String,
        /// Validation failure
        message: String,
    },

    /// Rendered path would escape the destination root
    #[error("Unsafe destination path: {}", .0.display())]
    UnsafePath(PathBuf),

    /// `template.yaml` could not be parsed
    #[error("Failed to parse manifest {}: {source}", .path.display())]
    ManifestParse {
        /// Manifest location
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// Engine configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScaffoldError {
    /// Build an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable label for the error kind, used in CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            ScaffoldError::TemplateNotFound(_) => "NotFoundError",
            ScaffoldError::MissingVariable(_) => "MissingVariableError",
            ScaffoldError::UnresolvedPlaceholder { .. } => "UnresolvedPlaceholderError",
            ScaffoldError::InvalidSyntax { .. } => "InvalidSyntaxError",
            ScaffoldError::Conflict { .. } => "ConflictError",
            ScaffoldError::Io { .. } => "IOError",
            ScaffoldError::InvalidTemplate { .. } => "InvalidTemplateError",
            ScaffoldError::UnsafePath(_) => "UnsafePathError",
            ScaffoldError::ManifestParse { .. } => "ManifestParseError",
            ScaffoldError::Config(_) => "ConfigError",
        }
    }
}

impl From<config::ConfigError> for ScaffoldError {
    fn from(err: config::ConfigError) -> Self {
        ScaffoldError::Config(err.to_string())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_placeholder_message() {
        let err = ScaffoldError::UnresolvedPlaceholder {
            placeholder: "name".to_string(),
            file: "index.js".to_string(),
        };
        assert_eq!(err.to_string(), "Unresolved placeholder '{{name}}' in index.js");
    }

    #[test]
    fn test_conflict_message_lists_paths() {
        let err = ScaffoldError::Conflict {
            paths: vec![PathBuf::from("a.txt"), PathBuf::from("src/b.rs")],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 conflicting"));
        assert!(msg.contains("a.txt, src/b.rs"));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            ScaffoldError::TemplateNotFound("x".into()).kind(),
            "NotFoundError"
        );
        assert_eq!(
            ScaffoldError::MissingVariable("x".into()).kind(),
            "MissingVariableError"
        );
        assert_eq!(
            ScaffoldError::io("x", std::io::Error::other("boom")).kind(),
            "IOError"
        );
    }
}
