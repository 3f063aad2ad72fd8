//! Scaffold manager for orchestrating template rendering
//!
//! Runs one scaffold invocation end to end: registry lookup, variable
//! resolution, file tree rendering and the guarded write. Resolution and
//! rendering finish before the conflict guard touches the destination.

use std::{collections::HashMap, path::Path};

use tracing::{debug, info};

use crate::{
    config::EngineConfig,
    conflict_guard::{ConflictGuard, ConflictPolicy},
    error::Result,
    models::{RenderPlan, WriteResult},
    renderer::FileTreeRenderer,
    resolver::{ComputedValues, VariableResolver},
    templates::TemplateRegistry,
};

/// Orchestrates scaffold invocations against one template registry
#[derive(Debug, Clone)]
pub struct ScaffoldManager {
    config: EngineConfig,
    registry: TemplateRegistry,
    resolver: VariableResolver,
    guard: ConflictGuard,
}

impl ScaffoldManager {
    /// Creates a manager, loading templates from the configured roots
    pub fn new(config: EngineConfig) -> Result<Self> {
        let registry = TemplateRegistry::load(&config)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Creates a manager over an already loaded registry
    pub fn with_registry(config: EngineConfig, registry: TemplateRegistry) -> Self {
        let guard = ConflictGuard::with_config(&config);
        Self {
            config,
            registry,
            resolver: VariableResolver::new(),
            guard,
        }
    }

    /// Gets the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Gets the template registry
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Resolves variables and renders template `id` for `destination`
    ///
    /// Nothing is written; the destination is only used for computed values.
    pub fn plan(
        &self,
        id: &str,
        destination: &Path,
        user_values: &HashMap<String, String>,
    ) -> Result<RenderPlan> {
        let descriptor = self.registry.resolve(id)?;
        let computed = ComputedValues::for_invocation(descriptor, destination);
        let context = self
            .resolver
            .resolve_with_computed(descriptor, user_values, &computed)?;
        debug!(
            "Resolved {} value(s) for template '{}'",
            context.len(),
            descriptor.id
        );

        FileTreeRenderer::new(&self.config).render(descriptor, &context)
    }

    /// Renders template `id` into `destination`
    ///
    /// `policy` falls back to the configured default policy.
    pub fn create(
        &self,
        id: &str,
        destination: &Path,
        user_values: &HashMap<String, String>,
        policy: Option<ConflictPolicy>,
    ) -> Result<WriteResult> {
        let policy = policy.unwrap_or(self.config.default_policy);
        info!(
            "Scaffolding '{}' into {} (policy: {})",
            id,
            destination.display(),
            policy
        );

        let plan = self.plan(id, destination, user_values)?;
        self.guard.apply(&plan, destination, policy)
    }

    /// Reports what [`ScaffoldManager::create`] would do without writing
    pub fn preview(
        &self,
        id: &str,
        destination: &Path,
        user_values: &HashMap<String, String>,
        policy: Option<ConflictPolicy>,
    ) -> Result<WriteResult> {
        let policy = policy.unwrap_or(self.config.default_policy);
        let plan = self.plan(id, destination, user_values)?;
        self.guard.preview(&plan, destination, policy)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{error::ScaffoldError, models::FileOutcome};

    fn write_template(root: &Path) {
        let dir = root.join("hello");
        fs::create_dir_all(dir.join("files/src")).unwrap();
        fs::write(
            dir.join("template.yaml"),
            "id: hello\n\
             description: Hello world\n\
             variables:\n\
             \x20 - name: projectName\n\
             \x20   required: true\n\
             \x20 - name: author\n\
             \x20   default: \"{{destinationName}} team\"\n\
             files:\n\
             \x20 - README.md\n\
             \x20 - src/{{projectName|snake}}.txt\n",
        )
        .unwrap();
        fs::write(dir.join("files/README.md"), "# {{projectName}} by {{author}}\n").unwrap();
        fs::write(dir.join("files/src/{{projectName|snake}}.txt"), "{{projectName|pascal}}").unwrap();
    }

    fn manager(templates: &Path) -> ScaffoldManager {
        ScaffoldManager::new(EngineConfig::with_roots(vec![templates.to_path_buf()])).unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_create_end_to_end() {
        let templates = TempDir::new().unwrap();
        write_template(templates.path());
        let out = TempDir::new().unwrap();
        let destination = out.path().join("my-app");

        let result = manager(templates.path())
            .create("hello", &destination, &values(&[("projectName", "my-app")]), None)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files_written(), 2);
        assert_eq!(
            fs::read_to_string(destination.join("README.md")).unwrap(),
            "# my-app by my-app team\n"
        );
        assert_eq!(
            fs::read_to_string(destination.join("src/my_app.txt")).unwrap(),
            "MyApp"
        );
    }

    #[test]
    fn test_unknown_template() {
        let templates = TempDir::new().unwrap();
        write_template(templates.path());
        let out = TempDir::new().unwrap();

        let err = manager(templates.path())
            .create("nope", out.path(), &HashMap::new(), None)
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::TemplateNotFound(ref id) if id == "nope"));
    }

    #[test]
    fn test_missing_variable_writes_nothing() {
        let templates = TempDir::new().unwrap();
        write_template(templates.path());
        let out = TempDir::new().unwrap();
        let destination = out.path().join("app");

        let err = manager(templates.path())
            .create("hello", &destination, &HashMap::new(), None)
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::MissingVariable(ref name) if name == "projectName"));
        assert!(!destination.exists());
    }

    #[test]
    fn test_configured_default_policy_applies() {
        let templates = TempDir::new().unwrap();
        write_template(templates.path());
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("README.md"), "mine").unwrap();

        let mut config = EngineConfig::with_roots(vec![templates.path().to_path_buf()]);
        config.default_policy = ConflictPolicy::Skip;
        let manager = ScaffoldManager::new(config).unwrap();

        let result = manager
            .create("hello", out.path(), &values(&[("projectName", "x")]), None)
            .unwrap();

        assert_eq!(result.files_skipped(), 1);
        assert_eq!(fs::read_to_string(out.path().join("README.md")).unwrap(), "mine");
    }

    #[test]
    fn test_preview_reports_conflicts_without_writing() {
        let templates = TempDir::new().unwrap();
        write_template(templates.path());
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("README.md"), "mine").unwrap();

        let result = manager(templates.path())
            .preview("hello", out.path(), &values(&[("projectName", "x")]), None)
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.files[0].outcome, FileOutcome::Conflict);
        assert_eq!(result.files[1].outcome, FileOutcome::Written);
        assert!(!out.path().join("src").exists());
    }
}
