// List available templates

use scaffold_generation::ScaffoldManager;
use serde::Serialize;

use super::Command;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Summary of one template for `list --json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// List available templates
pub struct ListCommand<'a> {
    manager: &'a ScaffoldManager,
    json: bool,
}

impl<'a> ListCommand<'a> {
    pub fn new(manager: &'a ScaffoldManager) -> Self {
        Self {
            manager,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Registered templates in identifier order
    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.manager
            .registry()
            .descriptors()
            .map(|d| TemplateSummary {
                id: d.id.clone(),
                description: d.description.clone(),
                version: d.version.clone(),
            })
            .collect()
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self) -> CliResult<()> {
        let summaries = self.summaries();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            return Ok(());
        }

        let style = OutputStyle::default();
        if summaries.is_empty() {
            println!("{}", style.warning("No templates found"));
            return Ok(());
        }

        println!("{}", style.header("Available templates:"));
        let width = summaries.iter().map(|s| s.id.len()).max().unwrap_or(0);
        for summary in &summaries {
            let line = match &summary.description {
                Some(description) => format!("{:<width$}  {}", summary.id, description),
                None => summary.id.clone(),
            };
            println!("{}", style.list_item(&line));
        }
        println!(
            "\n{}",
            style.info("Run 'scaffold show <template>' to see its variables")
        );

        Ok(())
    }
}
