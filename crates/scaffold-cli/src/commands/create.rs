// Render a template into a destination directory

use std::{collections::HashMap, path::PathBuf};

use scaffold_generation::{ConflictPolicy, ScaffoldError, ScaffoldManager, WriteResult};

use super::Command;
use crate::error::CliResult;
use crate::logging::VerbosityLevel;
use crate::output::OutputStyle;

/// Render a template into a destination directory
pub struct CreateCommand<'a> {
    manager: &'a ScaffoldManager,
    template: String,
    destination: PathBuf,
    values: HashMap<String, String>,
    policy: Option<ConflictPolicy>,
    dry_run: bool,
    json: bool,
}

impl<'a> CreateCommand<'a> {
    pub fn new(manager: &'a ScaffoldManager, template: String, destination: PathBuf) -> Self {
        Self {
            manager,
            template,
            destination,
            values: HashMap::new(),
            policy: None,
            dry_run: false,
            json: false,
        }
    }

    /// Add variable values; later values for the same key win
    pub fn with_values(mut self, values: impl IntoIterator<Item = (String, String)>) -> Self {
        self.values.extend(values);
        self
    }

    pub fn with_policy(mut self, policy: Option<ConflictPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Render (or preview) without printing
    ///
    /// A preview that finds conflicts under the abort policy still returns
    /// its result; [`Command::execute`] reports it as a conflict afterwards.
    pub fn run(&self) -> CliResult<WriteResult> {
        let result = if self.dry_run {
            self.manager
                .preview(&self.template, &self.destination, &self.values, self.policy)?
        } else {
            self.manager
                .create(&self.template, &self.destination, &self.values, self.policy)?
        };
        Ok(result)
    }

    fn print_result(&self, result: &WriteResult) {
        let style = OutputStyle::default();

        if self.dry_run || VerbosityLevel::Verbose.should_output() {
            for file in &result.files {
                println!(
                    "{}",
                    style.file_outcome(&file.path.display().to_string(), file.outcome)
                );
            }
        }

        if !VerbosityLevel::Normal.should_output() {
            return;
        }

        let headline = if self.dry_run {
            format!("Would render '{}' into {}", self.template, result.destination.display())
        } else {
            format!("Rendered '{}' into {}", self.template, result.destination.display())
        };
        if result.success {
            println!("{}", style.success(&headline));
        } else {
            println!("{}", style.warning(&headline));
        }
        println!("{}", style.key_value("Result", &result.summary()));
    }
}

impl Command for CreateCommand<'_> {
    fn execute(&self) -> CliResult<()> {
        let result = self.run()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            self.print_result(&result);
        }

        if !result.success {
            return Err(ScaffoldError::Conflict {
                paths: result.conflicts().into_iter().map(PathBuf::from).collect(),
            }
            .into());
        }

        Ok(())
    }
}
