// Show a template's variables and files

use scaffold_generation::{ScaffoldManager, TemplateDescriptor, VariableSpec};

use super::Command;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Show a template's variables and files
pub struct ShowCommand<'a> {
    manager: &'a ScaffoldManager,
    template: String,
}

impl<'a> ShowCommand<'a> {
    pub fn new(manager: &'a ScaffoldManager, template: String) -> Self {
        Self { manager, template }
    }

    /// Format the template details
    pub fn render(&self, style: &OutputStyle) -> CliResult<String> {
        let descriptor = self.manager.registry().resolve(&self.template)?;
        Ok(describe(descriptor, style))
    }
}

impl Command for ShowCommand<'_> {
    fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        println!("{}", self.render(&style)?);
        Ok(())
    }
}

fn describe(descriptor: &TemplateDescriptor, style: &OutputStyle) -> String {
    let mut lines = vec![style.header(&descriptor.id)];

    if let Some(description) = &descriptor.description {
        lines.push(style.key_value("description", description));
    }
    if let Some(version) = &descriptor.version {
        lines.push(style.key_value("version", version));
    }
    lines.push(style.key_value("location", &descriptor.root.display().to_string()));

    lines.push(style.section("Variables"));
    if descriptor.variables.is_empty() {
        lines.push(style.list_item("(none)"));
    }
    for variable in &descriptor.variables {
        lines.push(style.list_item(&variable_line(variable)));
    }

    lines.push(style.section("Files"));
    for file in &descriptor.files {
        lines.push(style.list_item(file));
    }

    lines.join("\n")
}

fn variable_line(variable: &VariableSpec) -> String {
    let mut line = variable.name.clone();
    match (&variable.default, variable.required) {
        (Some(default), _) => line.push_str(&format!(" (default: {})", default)),
        (None, true) => line.push_str(" (required)"),
        (None, false) => line.push_str(" (optional)"),
    }
    if let Some(description) = &variable.description {
        line.push_str(&format!(" - {}", description));
    }
    line
}
