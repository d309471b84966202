//! Kiln - render exported dashboards for file provisioning.
//!
//! Dashboards exported for interactive import carry `__inputs` metadata and
//! datasource placeholders like `${DS_PROMETHEUS}` that only the import
//! dialog knows how to fill in. Kiln strips the import metadata, pins the
//! dashboard `id`/`uid`, resolves the placeholders to fixed provisioned
//! datasources and migrates deprecated panel types, producing files that can
//! be dropped into a provisioning directory.

pub mod config;
pub mod placeholder;
pub mod rewrite;
pub mod templating;
pub mod uid;

mod error;
mod pipeline;

pub use error::{DocumentError, KilnError};
pub use pipeline::{RenderOptions, RenderSummary};

use std::{fs, path::Path};

use log::{debug, trace};
use serde_json::Value;

use config::AppConfig;
use rewrite::Rewriter;

/// Top-level keys only meaningful to the interactive import dialog.
pub const IMPORT_ONLY_KEYS: &[&str] = &["__inputs", "__requires", "__elements"];

/// Renderer turning exported dashboards into provisioning-ready ones.
///
/// # Examples
///
/// ```
/// use kiln::{DashboardRenderer, config::AppConfig};
/// use serde_json::json;
///
/// let renderer = DashboardRenderer::new(AppConfig::default());
///
/// let exported = json!({
///     "__inputs": [{ "name": "DS_PROMETHEUS", "type": "datasource" }],
///     "id": 42,
///     "panels": [{ "datasource": "${DS_PROMETHEUS}" }]
/// });
///
/// let dashboard = renderer.render(exported, "Node Exporter").expect("object input");
/// assert_eq!(
///     dashboard,
///     json!({
///         "id": null,
///         "panels": [{ "datasource": "Prometheus" }],
///         "uid": "node-exporter"
///     })
/// );
/// ```
#[derive(Debug, Default)]
pub struct DashboardRenderer {
    config: AppConfig,
}

impl DashboardRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the renderer configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render a parsed dashboard.
    ///
    /// `file_stem` is the source file name without extension; it seeds the
    /// `uid` when the dashboard has none.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotAnObject`] if `dashboard` is not a JSON
    /// object.
    pub fn render(&self, dashboard: Value, file_stem: &str) -> Result<Value, DocumentError> {
        let mut dashboard = match dashboard {
            Value::Object(object) => object,
            other => {
                return Err(DocumentError::NotAnObject {
                    found: json_kind(&other),
                });
            }
        };

        for key in IMPORT_ONLY_KEYS {
            if dashboard.shift_remove(*key).is_some() {
                trace!(key; "Stripped import-only key");
            }
        }

        dashboard.insert("id".to_string(), Value::Null);

        if !dashboard.contains_key("uid") {
            let uid = uid::sanitize_uid(file_stem);
            debug!(file_stem, uid; "Assigning dashboard uid");
            dashboard.insert("uid".to_string(), Value::String(uid));
        }

        Ok(Rewriter::new(&self.config).rewrite(Value::Object(dashboard), None))
    }

    /// Parse, render and pretty-print a dashboard.
    ///
    /// The output uses two-space indentation, keeps key order and non-ASCII
    /// text as is, and ends with a single newline.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if `source` is not valid JSON or not an
    /// object.
    pub fn render_str(&self, source: &str, file_stem: &str) -> Result<String, DocumentError> {
        let dashboard: Value = serde_json::from_str(source)
            .map_err(|err| DocumentError::new_parse_error(err, source))?;

        let rendered = self.render(dashboard, file_stem)?;

        let mut output = serde_json::to_string_pretty(&rendered).map_err(DocumentError::Serialize)?;
        output.push('\n');
        Ok(output)
    }

    /// Render the dashboard file at `src` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] for I/O failures on either file and for
    /// anything [`DashboardRenderer::render_str`] rejects.
    pub fn render_file(&self, src: &Path, dest: &Path) -> Result<(), DocumentError> {
        let file_stem = src
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();

        let source = fs::read_to_string(src)?;
        let output = self.render_str(&source, &file_stem)?;
        fs::write(dest, output)?;

        Ok(())
    }

    /// Render every `*.json` dashboard in `src` into `dest`.
    ///
    /// Files are processed one at a time in file-name order and the first
    /// failure stops the run.
    ///
    /// # Errors
    ///
    /// - [`KilnError::SourceNotFound`] if `src` is not a directory
    /// - [`KilnError::NoDashboards`] if `src` holds no `*.json` file
    /// - [`KilnError::Render`] naming the first file that failed
    /// - [`KilnError::Io`] if `dest` cannot be created or listed
    pub fn render_dir(
        &self,
        src: &Path,
        dest: &Path,
        options: &RenderOptions,
    ) -> Result<RenderSummary, KilnError> {
        pipeline::render_dir(self, src, dest, options)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
