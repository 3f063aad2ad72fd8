//! Placeholder substitution
//!
//! Substitution is a single pass over the parsed template: values inserted
//! for a placeholder are never scanned again, so user input containing `{{`
//! cannot trigger further expansion.

use crate::{
    error::{Result, ScaffoldError},
    models::SubstitutionContext,
    templates::parser::{ParsedTemplate, TemplateElement, TemplateParser},
};

/// Renders template text against a substitution context
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        Self
    }

    /// Render template content
    ///
    /// # Arguments
    /// * `content` - Template text
    /// * `context` - Resolved variable values
    /// * `file` - Source name used in error messages
    ///
    /// # Returns
    /// Rendered text, or `UnresolvedPlaceholder` for the first placeholder
    /// without a value
    pub fn render(
        &self,
        content: &str,
        context: &SubstitutionContext,
        file: &str,
    ) -> Result<String> {
        let parsed = TemplateParser::parse(content, file)?;
        self.render_parsed(&parsed, context, file)
    }

    /// Render an already parsed template
    pub fn render_parsed(
        &self,
        parsed: &ParsedTemplate,
        context: &SubstitutionContext,
        file: &str,
    ) -> Result<String> {
        let mut result = String::new();

        for element in &parsed.elements {
            match element {
                TemplateElement::Text(text) => result.push_str(text),
                TemplateElement::Placeholder {
                    name, transform, ..
                } => {
                    let value = context.get(name).ok_or_else(|| {
                        ScaffoldError::UnresolvedPlaceholder {
                            placeholder: name.clone(),
                            file: file.to_string(),
                        }
                    })?;
                    match transform {
                        Some(transform) => result.push_str(&transform.apply(value)),
                        None => result.push_str(value),
                    }
                }
            }
        }

        Ok(result)
    }

    /// Placeholder names referenced by `content`, in first-occurrence order
    pub fn placeholders(&self, content: &str, file: &str) -> Result<Vec<String>> {
        let parsed = TemplateParser::parse(content, file)?;
        Ok(parsed
            .placeholder_names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}
