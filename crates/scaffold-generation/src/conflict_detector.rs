//! Conflict detection for render plans
//!
//! Finds planned files whose destination already exists before anything is
//! written. A symbolic link inside the destination root is never followed: a
//! link in place of a parent directory is rejected as an unsafe path, and a
//! link in place of a file is reported so the guard can refuse to write
//! through it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    error::{Result, ScaffoldError},
    models::RenderPlan,
};

/// A planned destination that already exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistingFile {
    /// Path relative to the destination root
    pub path: PathBuf,
    /// The existing entry is a directory
    pub is_dir: bool,
    /// The existing entry is a symbolic link
    pub is_symlink: bool,
    /// The existing file already has the planned contents
    pub identical: bool,
}

/// Detects destination collisions
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Create a new conflict detector
    pub fn new() -> Self {
        Self
    }

    /// List plan entries whose destination exists under `root`, in plan order
    ///
    /// Paths that cannot be inspected (for example because a parent is a
    /// regular file) are treated as absent; writing them fails later with the
    /// real IO error. Fails with `UnsafePath` when a parent directory of a
    /// planned file is a symbolic link.
    pub fn detect(&self, plan: &RenderPlan, root: &Path) -> Result<Vec<ExistingFile>> {
        let mut existing = Vec::new();

        for file in &plan.files {
            check_parents(root, &file.destination)?;

            let full_path = root.join(&file.destination);
            let Ok(metadata) = fs::symlink_metadata(&full_path) else {
                continue;
            };

            let identical = if metadata.is_file() {
                let current = fs::read(&full_path).map_err(|e| ScaffoldError::io(&full_path, e))?;
                current == file.contents.as_bytes()
            } else {
                false
            };

            existing.push(ExistingFile {
                path: file.destination.clone(),
                is_dir: metadata.is_dir(),
                is_symlink: metadata.file_type().is_symlink(),
                identical,
            });
        }

        Ok(existing)
    }
}

/// Reject `destination` when an existing parent under `root` is a symlink
fn check_parents(root: &Path, destination: &Path) -> Result<()> {
    let Some(parent) = destination.parent() else {
        return Ok(());
    };

    let mut current = root.to_path_buf();
    for component in parent.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Err(ScaffoldError::UnsafePath(destination.to_path_buf()));
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    Ok(())
}
