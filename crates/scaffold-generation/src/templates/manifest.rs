//! Template manifests
//!
//! Each template is a directory laid out as:
//!
//! ```text
//! <root>/<id>/
//!     template.yaml     manifest: id, description, variables, files
//!     files/            template sources, one per manifest entry
//! ```
//!
//! Manifests are validated eagerly when loaded so a broken template is
//! reported at startup rather than halfway through a render.

use std::{
    collections::HashSet,
    fs,
    path::{Component, Path},
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ScaffoldError},
    models::{TemplateDescriptor, VariableSpec},
    templates::{engine::TemplateEngine, parser::is_identifier},
};

/// Manifest file name inside a template directory
pub const MANIFEST_FILE: &str = "template.yaml";
/// Directory holding template sources
pub const FILES_DIR: &str = "files";

static TEMPLATE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("template id pattern is valid")
});

/// On-disk form of `template.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    /// Template identifier
    pub id: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Template version
    #[serde(default)]
    pub version: Option<String>,
    /// Declared variables, in resolution order
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    /// Relative paths under `files/`; may contain placeholders
    pub files: Vec<String>,
}

impl TemplateManifest {
    /// Read and parse a manifest file
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|source| ScaffoldError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate the manifest against its template directory and build a descriptor
    ///
    /// # Arguments
    /// * `root` - Template directory containing the manifest
    ///
    /// # Returns
    /// Immutable descriptor, or `InvalidTemplate` describing the first problem
    pub fn into_descriptor(self, root: &Path) -> Result<TemplateDescriptor> {
        let invalid = |message: String| ScaffoldError::InvalidTemplate {
            id: self.id.clone(),
            message,
        };

        if !TEMPLATE_ID.is_match(&self.id) {
            return Err(invalid(format!("invalid template id '{}'", self.id)));
        }

        let mut names = HashSet::new();
        for variable in &self.variables {
            if !is_identifier(&variable.name) {
                return Err(invalid(format!(
                    "invalid variable name '{}'",
                    variable.name
                )));
            }
            if !names.insert(variable.name.as_str()) {
                return Err(invalid(format!(
                    "variable '{}' declared more than once",
                    variable.name
                )));
            }
        }

        if self.files.is_empty() {
            return Err(invalid("manifest lists no files".to_string()));
        }

        let engine = TemplateEngine::new();
        let files_dir = root.join(FILES_DIR);
        let mut seen = HashSet::new();
        for file in &self.files {
            if !is_safe_relative(Path::new(file)) {
                return Err(invalid(format!("manifest path '{}' is not a safe relative path", file)));
            }
            if !seen.insert(file.as_str()) {
                return Err(invalid(format!("manifest path '{}' listed more than once", file)));
            }
            if !files_dir.join(file).is_file() {
                return Err(invalid(format!(
                    "manifest path '{}' does not exist under {}",
                    file,
                    files_dir.display()
                )));
            }
            // Templated file names must at least parse
            engine.placeholders(file, file)?;
        }

        Ok(TemplateDescriptor {
            id: self.id,
            root: root.to_path_buf(),
            description: self.description,
            version: self.version,
            variables: self.variables,
            files: self.files,
        })
    }
}

/// Load and validate the template in `dir`
pub fn load_template(dir: &Path) -> Result<TemplateDescriptor> {
    TemplateManifest::read(&dir.join(MANIFEST_FILE))?.into_descriptor(dir)
}

/// Whether `path` is non-empty, relative and free of `..` or root components
pub fn is_safe_relative(path: &Path) -> bool {
    let mut has_normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_normal
}
