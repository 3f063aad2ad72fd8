//! Template registry
//!
//! Built once at startup from the configured template roots and passed by
//! reference to every operation. Later roots take precedence over earlier ones
//! for the same identifier, so user templates can override bundled ones.
//! Within a single root an identifier must be unique.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    config::EngineConfig,
    error::{Result, ScaffoldError},
    models::TemplateDescriptor,
    templates::manifest::{load_template, MANIFEST_FILE},
};

/// Immutable map from template identifier to descriptor
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateDescriptor>,
}

impl TemplateRegistry {
    /// Build the registry from the roots listed in `config`
    pub fn load(config: &EngineConfig) -> Result<Self> {
        Self::from_roots(&config.template_roots)
    }

    /// Build the registry from explicit template roots
    ///
    /// # Arguments
    /// * `roots` - Directories whose subdirectories are templates
    ///
    /// # Returns
    /// Registry, or the first validation error encountered
    pub fn from_roots(roots: &[PathBuf]) -> Result<Self> {
        let mut templates = BTreeMap::new();

        for root in roots {
            if !root.is_dir() {
                debug!("Skipping missing template root {}", root.display());
                continue;
            }

            let mut seen: HashMap<String, PathBuf> = HashMap::new();

            for dir in template_dirs(root)? {
                let descriptor = load_template(&dir)?;
                debug!("Loaded template '{}' from {}", descriptor.id, dir.display());

                if let Some(first) = seen.insert(descriptor.id.clone(), dir.clone()) {
                    return Err(ScaffoldError::InvalidTemplate {
                        id: descriptor.id,
                        message: format!(
                            "declared by both {} and {}",
                            first.display(),
                            dir.display()
                        ),
                    });
                }

                if let Some(previous) = templates.insert(descriptor.id.clone(), descriptor) {
                    debug!(
                        "Template '{}' from {} overridden",
                        previous.id,
                        previous.root.display()
                    );
                }
            }
        }

        Ok(Self { templates })
    }

    /// Build a registry from already validated descriptors
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = TemplateDescriptor>) -> Self {
        Self {
            templates: descriptors
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        }
    }

    /// Look up a template by identifier
    pub fn resolve(&self, id: &str) -> Result<&TemplateDescriptor> {
        self.templates
            .get(id)
            .ok_or_else(|| ScaffoldError::TemplateNotFound(id.to_string()))
    }

    /// Registered identifiers in sorted order
    pub fn list(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Registered descriptors in identifier order
    pub fn descriptors(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.templates.values()
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates are registered
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Subdirectories of `root` that contain a manifest, sorted for determinism
fn template_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| ScaffoldError::io(root, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ScaffoldError::io(root, e))?.path();
        if path.is_dir() && path.join(MANIFEST_FILE).is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();

    Ok(dirs)
}
