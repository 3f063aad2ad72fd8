#![warn(missing_docs)]

//! Project scaffolding engine for scaffold
//!
//! Renders named file-tree templates into a destination directory. Templates
//! are discovered from manifest directories, their declared variables are
//! resolved from user values, defaults and computed values, file contents and
//! paths are substituted into a render plan, and the plan is written under an
//! overwrite policy with rollback on failure.

pub mod config;
pub mod conflict_detector;
pub mod conflict_guard;
pub mod error;
pub mod models;
pub mod renderer;
pub mod resolver;
pub mod retry;
pub mod scaffold_manager;
pub mod templates;

// Re-export public API
pub use config::{ConfigManager, EngineConfig};
pub use conflict_detector::{ConflictDetector, ExistingFile};
pub use conflict_guard::{ConflictGuard, ConflictPolicy};
pub use error::{Result, ScaffoldError};
pub use models::{
    FileContents, FileOutcome, FileWriteResult, PlannedFile, RenderPlan, SubstitutionContext,
    TemplateDescriptor, VariableSpec, WriteResult,
};
pub use renderer::FileTreeRenderer;
pub use resolver::{ComputedValues, VariableResolver};
pub use scaffold_manager::ScaffoldManager;
pub use templates::{
    CaseTransform, TemplateEngine, TemplateManifest, TemplateParser, TemplateRegistry,
};
