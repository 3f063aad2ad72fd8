//! Core data models for template scaffolding

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// A variable declared by a template manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Variable name as referenced by placeholders
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Default value used when the user supplies none
    #[serde(default)]
    pub default: Option<String>,
    /// Whether a value must be resolved
    #[serde(default)]
    pub required: bool,
}

impl VariableSpec {
    /// Create a required variable without a default
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: None,
            required: true,
        }
    }

    /// Create an optional variable with a default value
    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: Some(default.into()),
            required: false,
        }
    }
}

/// A template located and validated by the registry
///
/// Created at registry load time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// Unique identifier
    pub id: String,
    /// Directory containing `template.yaml`
    pub root: PathBuf,
    /// Description shown by `list` and `show`
    pub description: Option<String>,
    /// Template version
    pub version: Option<String>,
    /// Declared variables, in declaration order
    pub variables: Vec<VariableSpec>,
    /// Manifest paths relative to [`TemplateDescriptor::files_dir`]
    pub files: Vec<String>,
}

impl TemplateDescriptor {
    /// Directory holding the template's source files
    pub fn files_dir(&self) -> PathBuf {
        self.root.join(crate::templates::manifest::FILES_DIR)
    }

    /// Absolute location of a manifest entry
    pub fn source_path(&self, relative: &str) -> PathBuf {
        self.files_dir().join(relative)
    }

    /// Look up a declared variable by name
    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// Resolved variable values for a single render invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionContext {
    values: BTreeMap<String, String>,
}

impl SubstitutionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether the context has a value for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate values in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = SubstitutionContext::new();
        for (k, v) in iter {
            context.insert(k, v);
        }
        context
    }
}

/// Rendered contents of a planned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Text after placeholder substitution
    Text(String),
    /// Bytes copied verbatim
    Binary(Vec<u8>),
}

impl FileContents {
    /// Raw bytes to write
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContents::Text(text) => text.as_bytes(),
            FileContents::Binary(bytes) => bytes,
        }
    }

    /// Whether the file was copied verbatim
    pub fn is_binary(&self) -> bool {
        matches!(self, FileContents::Binary(_))
    }
}

/// A single file in a render plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Manifest path, relative to the template's files directory
    pub source: String,
    /// Rendered path, relative to the destination root
    pub destination: PathBuf,
    /// Rendered contents
    pub contents: FileContents,
}

/// Ordered list of files to materialize
///
/// Every destination is relative and free of traversal components; the
/// renderer refuses to build a plan that violates this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    /// Template the plan was rendered from
    pub template_id: String,
    /// Files in manifest order
    pub files: Vec<PlannedFile>,
}

impl RenderPlan {
    /// Number of planned files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find a planned file by destination
    pub fn find(&self, destination: &Path) -> Option<&PlannedFile> {
        self.files.iter().find(|f| f.destination == destination)
    }
}

/// Outcome for a single planned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileOutcome {
    /// Created a new file
    Written,
    /// Replaced an existing file
    Overwritten,
    /// Left an existing file untouched
    SkippedExists,
    /// Would conflict under the abort policy (previews only)
    Conflict,
}

/// Result of writing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWriteResult {
    /// Path relative to the destination root
    pub path: PathBuf,
    /// What happened
    pub outcome: FileOutcome,
}

/// Result of applying a render plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    /// Destination root
    pub destination: PathBuf,
    /// Per-file outcomes in plan order
    pub files: Vec<FileWriteResult>,
    /// Whether this was a preview
    pub dry_run: bool,
    /// True when no file conflicted
    pub success: bool,
}

impl WriteResult {
    pub(crate) fn new(destination: PathBuf, files: Vec<FileWriteResult>, dry_run: bool) -> Self {
        let success = files.iter().all(|f| f.outcome != FileOutcome::Conflict);
        Self {
            destination,
            files,
            dry_run,
            success,
        }
    }

    fn count(&self, outcome: FileOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }

    /// Files created or overwritten
    pub fn files_written(&self) -> usize {
        self.count(FileOutcome::Written) + self.count(FileOutcome::Overwritten)
    }

    /// Files overwritten
    pub fn files_overwritten(&self) -> usize {
        self.count(FileOutcome::Overwritten)
    }

    /// Files skipped because they existed
    pub fn files_skipped(&self) -> usize {
        self.count(FileOutcome::SkippedExists)
    }

    /// Conflicting paths (previews under the abort policy)
    pub fn conflicts(&self) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::Conflict)
            .map(|f| f.path.as_path())
            .collect()
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        format!(
            "Files written: {}, Files skipped: {}{}",
            self.files_written(),
            self.files_skipped(),
            if self.dry_run { " (dry-run)" } else { "" }
        )
    }
}
