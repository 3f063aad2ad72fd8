// Output formatting and styling

use colored::Colorize;
use scaffold_generation::FileOutcome;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a section header
    pub fn section(&self, title: &str) -> String {
        if self.use_colors {
            format!(
                "\n{}\n{}",
                title.bold().underline(),
                "─".repeat(title.chars().count())
            )
        } else {
            format!("\n{}\n{}", title, "─".repeat(title.chars().count()))
        }
    }

    /// Format a list item
    pub fn list_item(&self, item: &str) -> String {
        format!("  • {}", item)
    }

    /// Format a key-value pair
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.use_colors {
            format!("  {}: {}", key.bold(), value)
        } else {
            format!("  {}: {}", key, value)
        }
    }

    /// Format a file path with its write outcome
    pub fn file_outcome(&self, path: &str, outcome: FileOutcome) -> String {
        let label = outcome_label(outcome);
        if !self.use_colors {
            return format!("  {:<11} {}", label, path);
        }

        let label = match outcome {
            FileOutcome::Written => label.green(),
            FileOutcome::Overwritten => label.yellow(),
            FileOutcome::SkippedExists => label.dimmed(),
            FileOutcome::Conflict => label.red().bold(),
        };
        format!("  {:<11} {}", label, path)
    }
}

/// Short label for a file outcome
pub fn outcome_label(outcome: FileOutcome) -> &'static str {
    match outcome {
        FileOutcome::Written => "create",
        FileOutcome::Overwritten => "overwrite",
        FileOutcome::SkippedExists => "skip",
        FileOutcome::Conflict => "conflict",
    }
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    let style = OutputStyle {
        use_colors: atty::is(atty::Stream::Stderr),
    };
    eprintln!("{}", style.error(msg));
}
