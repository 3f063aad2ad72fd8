//! Template handling
//!
//! Manifest loading, the template registry, placeholder parsing and
//! substitution.

pub mod engine;
pub mod manifest;
pub mod parser;
pub mod registry;

// Re-export public API
pub use engine::TemplateEngine;
pub use manifest::{is_safe_relative, load_template, TemplateManifest, FILES_DIR, MANIFEST_FILE};
pub use parser::{CaseTransform, ParsedTemplate, TemplateElement, TemplateParser};
pub use registry::TemplateRegistry;
