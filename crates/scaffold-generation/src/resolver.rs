//! Variable resolution
//!
//! Merges user-supplied values, declared defaults and computed values into
//! the [`SubstitutionContext`] for one render. Variables are resolved in the
//! descriptor's declaration order, so the first missing variable reported is
//! always the same one regardless of how the user values were supplied.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, Datelike, Local};
use tracing::debug;

use crate::{
    error::{Result, ScaffoldError},
    models::{SubstitutionContext, TemplateDescriptor},
    templates::TemplateEngine,
};

/// Computed value: final component of the destination path
pub const DESTINATION_NAME: &str = "destinationName";
/// Computed value: identifier of the template being rendered
pub const TEMPLATE_ID: &str = "templateId";
/// Computed value: current year
pub const YEAR: &str = "year";
/// Computed value: current date as `YYYY-MM-DD`
pub const DATE: &str = "date";

/// Values derived from the invocation rather than supplied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedValues {
    values: Vec<(String, String)>,
}

impl ComputedValues {
    /// No computed values
    pub fn none() -> Self {
        Self { values: Vec::new() }
    }

    /// Computed values for rendering `descriptor` into `destination` now
    pub fn for_invocation(descriptor: &TemplateDescriptor, destination: &Path) -> Self {
        Self::at(descriptor, destination, Local::now())
    }

    /// Computed values for a fixed point in time
    pub fn at(descriptor: &TemplateDescriptor, destination: &Path, now: DateTime<Local>) -> Self {
        let mut values = vec![
            (TEMPLATE_ID.to_string(), descriptor.id.clone()),
            (YEAR.to_string(), now.year().to_string()),
            (DATE.to_string(), now.format("%Y-%m-%d").to_string()),
        ];
        if let Some(name) = destination_name(destination) {
            values.push((DESTINATION_NAME.to_string(), name));
        }
        Self { values }
    }

    /// Look up a computed value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn to_context(&self) -> SubstitutionContext {
        self.values.iter().cloned().collect()
    }
}

/// Final path component, resolving `.` and `..` against the filesystem
fn destination_name(destination: &Path) -> Option<String> {
    let name = match destination.file_name() {
        Some(name) => name.to_os_string(),
        None => destination.canonicalize().ok()?.file_name()?.to_os_string(),
    };
    name.into_string().ok()
}

/// Resolves declared variables into a substitution context
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    engine: TemplateEngine,
}

impl VariableResolver {
    /// Create a new variable resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the descriptor's variables from user values and defaults
    ///
    /// Fails with `MissingVariable` for the first required variable, in
    /// declaration order, that has neither a user value nor a default.
    /// Optional variables without a default resolve to the empty string.
    /// Keys the descriptor does not declare are ignored.
    pub fn resolve(
        &self,
        descriptor: &TemplateDescriptor,
        user_values: &HashMap<String, String>,
    ) -> Result<SubstitutionContext> {
        self.resolve_with_computed(descriptor, user_values, &ComputedValues::none())
    }

    /// Resolve with computed values available to the context and to defaults
    ///
    /// Defaults may reference computed values (`default: "{{destinationName}}"`);
    /// they are expanded in a single pass. Declared variables shadow computed
    /// values of the same name.
    pub fn resolve_with_computed(
        &self,
        descriptor: &TemplateDescriptor,
        user_values: &HashMap<String, String>,
        computed: &ComputedValues,
    ) -> Result<SubstitutionContext> {
        let computed_context = computed.to_context();
        let mut context = computed_context.clone();

        for variable in &descriptor.variables {
            let value = if let Some(value) = user_values.get(&variable.name) {
                value.clone()
            } else if let Some(default) = &variable.default {
                let origin = format!("default of '{}'", variable.name);
                self.engine.render(default, &computed_context, &origin)?
            } else if variable.required {
                return Err(ScaffoldError::MissingVariable(variable.name.clone()));
            } else {
                String::new()
            };

            debug!("Resolved variable '{}'", variable.name);
            context.insert(variable.name.clone(), value);
        }

        for key in user_values.keys() {
            if descriptor.variable(key).is_none() {
                debug!(
                    "Ignoring value for '{}': not declared by template '{}'",
                    key, descriptor.id
                );
            }
        }

        Ok(context)
    }
}
