//! Conflict guard: the only component that writes to the destination
//!
//! Applies a [`RenderPlan`] under a [`ConflictPolicy`]:
//! - `Abort`: any existing destination file cancels the whole write
//! - `Skip`: existing files are left untouched
//! - `Overwrite`: every planned file is written
//!
//! All writes of one call form a single scope. If a write fails part way,
//! files created by the call are removed, overwritten files get their
//! original bytes back, and directories created by the call are removed when
//! empty, before the error is returned. A change is recorded before its bytes
//! hit the disk, so the file whose write failed is undone too.
//!
//! `Overwrite` never writes through a symbolic link and never replaces a
//! directory; both are rejected before the first write.

use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    conflict_detector::{ConflictDetector, ExistingFile},
    error::{Result, ScaffoldError},
    models::{FileOutcome, FileWriteResult, PlannedFile, RenderPlan, WriteResult},
    retry::retry_once,
};

/// How to treat destination files that already exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Write nothing if any destination file exists
    #[default]
    Abort,
    /// Leave existing files untouched and write the rest
    Skip,
    /// Replace existing files
    Overwrite,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(ConflictPolicy::Abort),
            "skip" => Ok(ConflictPolicy::Skip),
            "overwrite" => Ok(ConflictPolicy::Overwrite),
            other => Err(format!(
                "unknown policy '{}' (expected abort, skip or overwrite)",
                other
            )),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictPolicy::Abort => "abort",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Overwrite => "overwrite",
        })
    }
}

/// Gates and performs all writes of a render plan
#[derive(Debug, Clone)]
pub struct ConflictGuard {
    detector: ConflictDetector,
    retry_transient_io: bool,
}

impl ConflictGuard {
    /// Create a conflict guard that retries transient IO failures once
    pub fn new() -> Self {
        Self {
            detector: ConflictDetector::new(),
            retry_transient_io: true,
        }
    }

    /// Create a conflict guard following `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            detector: ConflictDetector::new(),
            retry_transient_io: config.retry_transient_io,
        }
    }

    /// Write `plan` under `root` following `policy`
    ///
    /// # Returns
    /// Per-file outcomes; `Conflict` listing every colliding path when the
    /// policy is `Abort`; `Io` after rolling back on a write failure
    pub fn apply(
        &self,
        plan: &RenderPlan,
        root: &Path,
        policy: ConflictPolicy,
    ) -> Result<WriteResult> {
        let existing = self.detector.detect(plan, root)?;

        match policy {
            ConflictPolicy::Abort if !existing.is_empty() => {
                return Err(ScaffoldError::Conflict {
                    paths: existing.into_iter().map(|e| e.path).collect(),
                });
            }
            ConflictPolicy::Overwrite => check_replaceable(&existing, root)?,
            _ => {}
        }

        let mut transaction = Transaction::new(self.retry_transient_io);
        let mut results = Vec::with_capacity(plan.len());

        for file in &plan.files {
            let conflict = find_existing(&existing, &file.destination);

            match transaction.write(root, file, conflict, policy) {
                Ok(outcome) => results.push(FileWriteResult {
                    path: file.destination.clone(),
                    outcome,
                }),
                Err(err) => {
                    warn!(
                        "Writing {} failed; rolling back {} change(s)",
                        file.destination.display(),
                        transaction.len()
                    );
                    transaction.rollback();
                    return Err(err);
                }
            }
        }

        let result = WriteResult::new(root.to_path_buf(), results, false);
        info!(
            "Rendered template '{}' into {}: {}",
            plan.template_id,
            root.display(),
            result.summary()
        );
        Ok(result)
    }

    /// Report what [`ConflictGuard::apply`] would do without touching the disk
    ///
    /// Entries that `Overwrite` cannot replace fail here with the same error
    /// `apply` would return.
    pub fn preview(
        &self,
        plan: &RenderPlan,
        root: &Path,
        policy: ConflictPolicy,
    ) -> Result<WriteResult> {
        let existing = self.detector.detect(plan, root)?;
        if policy == ConflictPolicy::Overwrite {
            check_replaceable(&existing, root)?;
        }

        let results = plan
            .files
            .iter()
            .map(|file| {
                let outcome = match (find_existing(&existing, &file.destination), policy) {
                    (None, _) => FileOutcome::Written,
                    (Some(_), ConflictPolicy::Abort) => FileOutcome::Conflict,
                    (Some(_), ConflictPolicy::Skip) => FileOutcome::SkippedExists,
                    (Some(_), ConflictPolicy::Overwrite) => FileOutcome::Overwritten,
                };
                FileWriteResult {
                    path: file.destination.clone(),
                    outcome,
                }
            })
            .collect();

        Ok(WriteResult::new(root.to_path_buf(), results, true))
    }
}

impl Default for ConflictGuard {
    fn default() -> Self {
        Self::new()
    }
}

fn find_existing<'a>(existing: &'a [ExistingFile], destination: &Path) -> Option<&'a ExistingFile> {
    existing.iter().find(|e| e.path == destination)
}

/// Fail on the first existing entry that cannot be replaced by a file
fn check_replaceable(existing: &[ExistingFile], root: &Path) -> Result<()> {
    for entry in existing {
        if entry.is_symlink {
            return Err(ScaffoldError::UnsafePath(entry.path.clone()));
        }
        if entry.is_dir {
            return Err(ScaffoldError::io(
                root.join(&entry.path),
                io::Error::other("destination is a directory"),
            ));
        }
    }
    Ok(())
}

/// Changes made by one apply call, kept for rollback
struct Transaction {
    retry: bool,
    created_files: Vec<PathBuf>,
    overwritten: Vec<(PathBuf, Vec<u8>)>,
    created_dirs: Vec<PathBuf>,
}

impl Transaction {
    fn new(retry: bool) -> Self {
        Self {
            retry,
            created_files: Vec::new(),
            overwritten: Vec::new(),
            created_dirs: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.created_files.len() + self.overwritten.len() + self.created_dirs.len()
    }

    fn write(
        &mut self,
        root: &Path,
        file: &PlannedFile,
        existing: Option<&ExistingFile>,
        policy: ConflictPolicy,
    ) -> Result<FileOutcome> {
        let full_path = root.join(&file.destination);

        match existing {
            Some(_) if policy == ConflictPolicy::Skip => {
                debug!("Skipping existing {}", full_path.display());
                Ok(FileOutcome::SkippedExists)
            }
            Some(_) => {
                let original = retry_once(self.retry, "backup read", || fs::read(&full_path))
                    .map_err(|e| ScaffoldError::io(&full_path, e))?;
                self.overwritten.push((full_path.clone(), original));
                retry_once(self.retry, "overwrite", || {
                    fs::write(&full_path, file.contents.as_bytes())
                })
                .map_err(|e| ScaffoldError::io(&full_path, e))?;
                debug!("Overwrote {}", full_path.display());
                Ok(FileOutcome::Overwritten)
            }
            None => {
                if let Some(parent) = full_path.parent() {
                    self.ensure_dir(parent)?;
                }
                let mut handle = retry_once(self.retry, "create", || create_new(&full_path))
                    .map_err(|e| ScaffoldError::io(&full_path, e))?;
                self.created_files.push(full_path.clone());
                write_contents(&mut handle, file.contents.as_bytes())
                    .map_err(|e| ScaffoldError::io(&full_path, e))?;
                debug!("Wrote {}", full_path.display());
                Ok(FileOutcome::Written)
            }
        }
    }

    /// Create `dir` and any missing ancestors, recording each one created
    fn ensure_dir(&mut self, dir: &Path) -> Result<()> {
        let missing: Vec<&Path> = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
            .collect();

        for path in missing.into_iter().rev() {
            match retry_once(self.retry, "create directory", || fs::create_dir(path)) {
                Ok(()) => self.created_dirs.push(path.to_path_buf()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(ScaffoldError::io(path, e)),
            }
        }

        Ok(())
    }

    /// Undo every recorded change, best-effort
    fn rollback(self) {
        for path in self.created_files.iter().rev() {
            if let Err(e) = fs::remove_file(path) {
                warn!("Rollback could not remove {}: {}", path.display(), e);
            }
        }

        for (path, original) in self.overwritten.iter().rev() {
            if let Err(e) = fs::write(path, original) {
                warn!("Rollback could not restore {}: {}", path.display(), e);
            }
        }

        // Deepest first; a directory that gained foreign content stays
        for dir in self.created_dirs.iter().rev() {
            if let Err(e) = fs::remove_dir(dir) {
                debug!("Rollback left directory {}: {}", dir.display(), e);
            }
        }
    }
}

/// Open a file that must not exist yet
fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

fn write_contents(file: &mut File, contents: &[u8]) -> io::Result<()> {
    file.write_all(contents)?;
    file.sync_all()
}
