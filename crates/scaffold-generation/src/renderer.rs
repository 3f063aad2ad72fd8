//! File tree rendering
//!
//! Turns a template descriptor and a substitution context into a
//! [`RenderPlan`]. Rendering only reads template sources; nothing is written
//! until the plan is handed to the conflict guard.

use std::{collections::HashSet, fs, path::PathBuf};

use tracing::debug;

use crate::{
    config::EngineConfig,
    error::{Result, ScaffoldError},
    models::{FileContents, PlannedFile, RenderPlan, SubstitutionContext, TemplateDescriptor},
    retry::retry_once,
    templates::{is_safe_relative, TemplateEngine},
};

/// Renders template file trees into render plans
pub struct FileTreeRenderer<'a> {
    config: &'a EngineConfig,
    engine: TemplateEngine,
}

impl<'a> FileTreeRenderer<'a> {
    /// Create a renderer using `config` for binary detection and IO retries
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            engine: TemplateEngine::new(),
        }
    }

    /// Render every manifest entry of `descriptor`
    ///
    /// Both the manifest path and the file contents are substituted. Binary
    /// files keep their bytes unchanged.
    ///
    /// # Returns
    /// Plan in manifest order, or the first rendering error
    pub fn render(
        &self,
        descriptor: &TemplateDescriptor,
        context: &SubstitutionContext,
    ) -> Result<RenderPlan> {
        let mut files = Vec::with_capacity(descriptor.files.len());
        let mut destinations = HashSet::new();

        for source in &descriptor.files {
            let destination = self.render_path(source, context)?;

            if !destinations.insert(destination.clone()) {
                return Err(ScaffoldError::InvalidTemplate {
                    id: descriptor.id.clone(),
                    message: format!(
                        "more than one file renders to {}",
                        destination.display()
                    ),
                });
            }

            let contents = self.render_contents(descriptor, source, context)?;
            debug!(
                "Planned {} -> {}{}",
                source,
                destination.display(),
                if contents.is_binary() { " (binary)" } else { "" }
            );

            files.push(PlannedFile {
                source: source.clone(),
                destination,
                contents,
            });
        }

        Ok(RenderPlan {
            template_id: descriptor.id.clone(),
            files,
        })
    }

    /// Substitute a manifest path and check it stays inside the destination
    pub fn render_path(&self, source: &str, context: &SubstitutionContext) -> Result<PathBuf> {
        let rendered = self.engine.render(source, context, source)?;
        let destination = PathBuf::from(rendered);

        if !is_safe_relative(&destination) {
            return Err(ScaffoldError::UnsafePath(destination));
        }

        Ok(destination)
    }

    fn render_contents(
        &self,
        descriptor: &TemplateDescriptor,
        source: &str,
        context: &SubstitutionContext,
    ) -> Result<FileContents> {
        let path = descriptor.source_path(source);
        let bytes = retry_once(self.config.retry_transient_io, "template read", || {
            fs::read(&path)
        })
        .map_err(|e| ScaffoldError::io(&path, e))?;

        if self.config.is_binary_path(&path) {
            return Ok(FileContents::Binary(bytes));
        }

        match String::from_utf8(bytes) {
            Ok(text) => Ok(FileContents::Text(self.engine.render(&text, context, source)?)),
            Err(err) => {
                debug!("{} is not UTF-8; copying verbatim", source);
                Ok(FileContents::Binary(err.into_bytes()))
            }
        }
    }
}
