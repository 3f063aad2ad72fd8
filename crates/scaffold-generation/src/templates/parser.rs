//! Placeholder syntax parser
//!
//! Splits template text into literal runs and placeholders. Recognized syntax:
//!
//! - `{{name}}` or `{{ name }}`: substitute `name`
//! - `{{ name | snake }}`: substitute `name` after a case transformation
//! - `\{{`: a literal `{{`
//!
//! Anything else inside `{{ }}` is a syntax error, so stray template syntax is
//! reported instead of being copied into a generated project.

use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ScaffoldError};

/// Opening placeholder delimiter
pub const OPEN: &str = "{{";
/// Closing placeholder delimiter
pub const CLOSE: &str = "}}";
/// Escaped opening delimiter, emitted as a literal `{{`
pub const ESCAPED_OPEN: &str = "\\{{";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Whether `name` is a valid variable identifier
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Case transformation applied by a placeholder filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTransform {
    /// PascalCase (e.g., MyProject)
    PascalCase,
    /// camelCase (e.g., myProject)
    CamelCase,
    /// snake_case (e.g., my_project)
    SnakeCase,
    /// kebab-case (e.g., my-project)
    KebabCase,
    /// UPPERCASE (e.g., MY_PROJECT)
    UpperCase,
    /// lowercase (e.g., myproject)
    LowerCase,
}

impl CaseTransform {
    /// Apply case transformation to a string
    pub fn apply(&self, input: &str) -> String {
        use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};

        match self {
            CaseTransform::PascalCase => input.to_pascal_case(),
            CaseTransform::CamelCase => input.to_lower_camel_case(),
            CaseTransform::SnakeCase => input.to_snake_case(),
            CaseTransform::KebabCase => input.to_kebab_case(),
            CaseTransform::UpperCase => input.to_uppercase(),
            CaseTransform::LowerCase => input.to_lowercase(),
        }
    }

    /// Filter name as written in templates
    pub fn name(&self) -> &'static str {
        match self {
            CaseTransform::PascalCase => "pascal",
            CaseTransform::CamelCase => "camel",
            CaseTransform::SnakeCase => "snake",
            CaseTransform::KebabCase => "kebab",
            CaseTransform::UpperCase => "upper",
            CaseTransform::LowerCase => "lower",
        }
    }
}

impl FromStr for CaseTransform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pascal" => Ok(CaseTransform::PascalCase),
            "camel" => Ok(CaseTransform::CamelCase),
            "snake" => Ok(CaseTransform::SnakeCase),
            "kebab" => Ok(CaseTransform::KebabCase),
            "upper" => Ok(CaseTransform::UpperCase),
            "lower" => Ok(CaseTransform::LowerCase),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

impl fmt::Display for CaseTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    /// Literal text, escapes already applied
    Text(String),
    /// A placeholder reference
    Placeholder {
        /// Variable name
        name: String,
        /// Optional case filter
        transform: Option<CaseTransform>,
        /// Line on which the placeholder starts
        line: usize,
    },
}

/// Parsed template structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Elements in source order
    pub elements: Vec<TemplateElement>,
}

impl ParsedTemplate {
    /// Placeholder names in first-occurrence order, without duplicates
    pub fn placeholder_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for element in &self.elements {
            if let TemplateElement::Placeholder { name, .. } = element {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Template parser
pub struct TemplateParser;

impl TemplateParser {
    /// Parse template content
    ///
    /// `file` names the source in error messages.
    pub fn parse(content: &str, file: &str) -> Result<ParsedTemplate> {
        Parser::new(content, file).parse()
    }
}

/// Internal parser state machine
struct Parser<'a> {
    content: &'a str,
    file: &'a str,
    position: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(content: &'a str, file: &'a str) -> Self {
        Self {
            content,
            file,
            position: 0,
            line: 1,
        }
    }

    fn parse(mut self) -> Result<ParsedTemplate> {
        let mut elements = Vec::new();
        let mut text = String::new();

        while self.position < self.content.len() {
            let rest = &self.content[self.position..];

            if rest.starts_with(ESCAPED_OPEN) {
                text.push_str(OPEN);
                self.position += ESCAPED_OPEN.len();
            } else if rest.starts_with(OPEN) {
                if !text.is_empty() {
                    elements.push(TemplateElement::Text(std::mem::take(&mut text)));
                }
                elements.push(self.parse_placeholder()?);
            } else if let Some(ch) = rest.chars().next() {
                if ch == '\n' {
                    self.line += 1;
                }
                text.push(ch);
                self.position += ch.len_utf8();
            }
        }

        if !text.is_empty() {
            elements.push(TemplateElement::Text(text));
        }

        Ok(ParsedTemplate { elements })
    }

    fn parse_placeholder(&mut self) -> Result<TemplateElement> {
        let start_line = self.line;
        let body_start = self.position + OPEN.len();

        let body_len = self.content[body_start..]
            .find(CLOSE)
            .ok_or_else(|| self.syntax_error(start_line, "unterminated placeholder"))?;
        let body = &self.content[body_start..body_start + body_len];

        self.line += body.matches('\n').count();
        self.position = body_start + body_len + CLOSE.len();

        let (name, filter) = match body.split_once('|') {
            Some((name, filter)) => (name.trim(), Some(filter.trim())),
            None => (body.trim(), None),
        };

        if !is_identifier(name) {
            return Err(self.syntax_error(
                start_line,
                &format!("invalid placeholder name '{}'", name),
            ));
        }

        let transform = match filter {
            Some(filter) => Some(
                filter
                    .parse::<CaseTransform>()
                    .map_err(|message| self.syntax_error(start_line, &message))?,
            ),
            None => None,
        };

        Ok(TemplateElement::Placeholder {
            name: name.to_string(),
            transform,
            line: start_line,
        })
    }

    fn syntax_error(&self, line: usize, message: &str) -> ScaffoldError {
        ScaffoldError::InvalidSyntax {
            file: self.file.to_string(),
            line,
            message: message.to_string(),
        }
    }
}
