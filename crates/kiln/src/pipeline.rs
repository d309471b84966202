//! Directory-level rendering.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{DashboardRenderer, KilnError};

/// Options for [`DashboardRenderer::render_dir`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    clean: bool,
}

impl RenderOptions {
    /// Delete existing `*.json` files in the destination before rendering.
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Returns whether the destination is cleaned first.
    pub fn clean(&self) -> bool {
        self.clean
    }
}

/// Outcome of a successful directory render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    outputs: Vec<PathBuf>,
}

impl RenderSummary {
    /// Number of dashboards written.
    pub fn rendered(&self) -> usize {
        self.outputs.len()
    }

    /// Paths of the written dashboards, in render order.
    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }
}

pub(crate) fn render_dir(
    renderer: &DashboardRenderer,
    src: &Path,
    dest: &Path,
    options: &RenderOptions,
) -> Result<RenderSummary, KilnError> {
    if !src.is_dir() {
        return Err(KilnError::SourceNotFound(src.to_path_buf()));
    }

    fs::create_dir_all(dest)?;

    if options.clean() {
        clean_destination(dest)?;
    }

    let sources = collect_dashboards(src)?;
    if sources.is_empty() {
        return Err(KilnError::NoDashboards(src.to_path_buf()));
    }

    info!(
        src = src.display().to_string(),
        dest = dest.display().to_string(),
        count = sources.len();
        "Rendering dashboards"
    );

    let mut outputs = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = dest.join(file_name);

        renderer
            .render_file(&source, &target)
            .map_err(|err| KilnError::new_render_error(&source, err))?;

        info!(
            src = source.display().to_string(),
            dest = target.display().to_string();
            "Rendered dashboard"
        );
        outputs.push(target);
    }

    Ok(RenderSummary { outputs })
}

/// Remove existing dashboards from `dest`. Files that cannot be removed are
/// reported and skipped.
fn clean_destination(dest: &Path) -> Result<(), KilnError> {
    for path in collect_dashboards(dest)? {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = path.display().to_string(); "Removed stale dashboard"),
            Err(err) => warn!(
                path = path.display().to_string(),
                err:%;
                "Failed to delete stale dashboard"
            ),
        }
    }
    Ok(())
}

/// Collect the `*.json` files directly inside `dir`, sorted by file name.
fn collect_dashboards(dir: &Path) -> Result<Vec<PathBuf>, KilnError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        if path.is_file() {
            files.push(path);
        } else {
            debug!(path = path.display().to_string(); "Skipping entry that is not a regular file");
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = dir.display().to_string(), count = files.len(); "Collected dashboards");
    Ok(files)
}
