//! Configuration types for dashboard rendering.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! partial TOML file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining datasource and panel settings.
//! - [`DatasourceConfig`] - The provisioned Prometheus and Loki datasources placeholders resolve to.
//! - [`PanelConfig`] - Deprecated panel types and their replacements.
//!
//! # Example
//!
//! ```
//! # use kiln::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.datasources().prometheus().name(), "Prometheus");
//! assert_eq!(config.panels().migrate("grafana-piechart-panel"), Some("piechart"));
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::placeholder::DatasourceKind;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Datasource configuration section.
    #[serde(default)]
    datasources: DatasourceConfig,

    /// Panel configuration section.
    #[serde(default)]
    panels: PanelConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(datasources: DatasourceConfig, panels: PanelConfig) -> Self {
        Self {
            datasources,
            panels,
        }
    }

    /// Returns the datasource configuration.
    pub fn datasources(&self) -> &DatasourceConfig {
        &self.datasources
    }

    /// Returns the panel configuration.
    pub fn panels(&self) -> &PanelConfig {
        &self.panels
    }
}

/// The provisioned datasources that placeholders resolve to.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasourceConfig {
    #[serde(default = "DatasourceTarget::prometheus")]
    prometheus: DatasourceTarget,

    #[serde(default = "DatasourceTarget::loki")]
    loki: DatasourceTarget,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            prometheus: DatasourceTarget::prometheus(),
            loki: DatasourceTarget::loki(),
        }
    }
}

impl DatasourceConfig {
    /// Creates a new [`DatasourceConfig`] with explicit targets.
    pub fn new(prometheus: DatasourceTarget, loki: DatasourceTarget) -> Self {
        Self { prometheus, loki }
    }

    /// Returns the Prometheus target.
    pub fn prometheus(&self) -> &DatasourceTarget {
        &self.prometheus
    }

    /// Returns the Loki target.
    pub fn loki(&self) -> &DatasourceTarget {
        &self.loki
    }

    /// Returns the target for a datasource kind.
    pub fn target(&self, kind: DatasourceKind) -> &DatasourceTarget {
        match kind {
            DatasourceKind::Prometheus => &self.prometheus,
            DatasourceKind::Loki => &self.loki,
        }
    }
}

/// Name and uid of one provisioned datasource.
///
/// Placeholders in name position (`datasource` strings, templating
/// variables) resolve to `name`; placeholders in a `uid` field resolve to
/// `uid`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasourceTarget {
    name: String,
    uid: String,
}

impl DatasourceTarget {
    /// Creates a new target.
    pub fn new(name: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: uid.into(),
        }
    }

    fn prometheus() -> Self {
        Self::new("Prometheus", "prometheus")
    }

    fn loki() -> Self {
        Self::new("Loki", "loki")
    }

    /// Returns the datasource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the datasource uid.
    pub fn uid(&self) -> &str {
        &self.uid
    }
}

/// Panel type migrations applied to every object with a matching `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_migrations")]
    migrations: IndexMap<String, String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            migrations: default_migrations(),
        }
    }
}

impl PanelConfig {
    /// Creates a new [`PanelConfig`] from a deprecated-to-current type map.
    pub fn new(migrations: IndexMap<String, String>) -> Self {
        Self { migrations }
    }

    /// Returns the replacement for a deprecated panel type, if any.
    pub fn migrate(&self, panel_type: &str) -> Option<&str> {
        self.migrations.get(panel_type).map(String::as_str)
    }
}

fn default_migrations() -> IndexMap<String, String> {
    IndexMap::from([(
        "grafana-piechart-panel".to_string(),
        "piechart".to_string(),
    )])
}
