// CLI error types and exit codes

use scaffold_generation::ScaffoldError;
use thiserror::Error;

/// Exit code for invalid arguments or configuration
pub const EXIT_USAGE: i32 = 1;
/// Exit code for an unknown template
pub const EXIT_NOT_FOUND: i32 = 2;
/// Exit code for a missing variable or unresolved placeholder
pub const EXIT_MISSING_VARIABLE: i32 = 3;
/// Exit code for a conflict under the abort policy
pub const EXIT_CONFLICT: i32 = 4;
/// Exit code for filesystem failures
pub const EXIT_IO: i32 = 5;
/// Exit code for an invalid template or unsafe destination path
pub const EXIT_INVALID_TEMPLATE: i32 = 6;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\nCheck the file passed with --config and SCAFFOLD_* variables.",
                    msg
                )
            }
            CliError::Scaffold(err) => match err {
                ScaffoldError::TemplateNotFound(id) => format!(
                    "{}: template '{}' not found\n\nRun 'scaffold list' for available templates.",
                    err.kind(),
                    id
                ),
                ScaffoldError::MissingVariable(name) => format!(
                    "{}: variable '{}' is required\n\nPass it with --set {}=<value>.",
                    err.kind(),
                    name,
                    name
                ),
                ScaffoldError::Conflict { .. } => format!(
                    "{}: {}\n\nUse --policy skip or --policy overwrite to proceed.",
                    err.kind(),
                    err
                ),
                _ => format!("{}: {}", err.kind(), err),
            },
            CliError::Output(e) => {
                format!("Failed to format output: {}", e)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => EXIT_USAGE,
            CliError::Output(_) => EXIT_IO,
            CliError::Scaffold(err) => match err {
                ScaffoldError::TemplateNotFound(_) => EXIT_NOT_FOUND,
                ScaffoldError::MissingVariable(_) | ScaffoldError::UnresolvedPlaceholder { .. } => {
                    EXIT_MISSING_VARIABLE
                }
                ScaffoldError::Conflict { .. } => EXIT_CONFLICT,
                ScaffoldError::Io { .. } => EXIT_IO,
                ScaffoldError::InvalidTemplate { .. }
                | ScaffoldError::InvalidSyntax { .. }
                | ScaffoldError::UnsafePath(_)
                | ScaffoldError::ManifestParse { .. } => EXIT_INVALID_TEMPLATE,
                ScaffoldError::Config(_) => EXIT_USAGE,
            },
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
