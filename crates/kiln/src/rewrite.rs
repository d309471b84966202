//! Recursive rewrite of dashboard values.
//!
//! [`Rewriter::rewrite`] walks a JSON tree and resolves datasource
//! placeholders. String rules depend on the key the string was found under,
//! so the walk carries the enclosing object key down one level. Array
//! elements are rewritten without a key.
//!
//! String rules, first match wins:
//!
//! 1. `${DS_*PROMETHEUS}` import inputs resolve to the Prometheus name.
//! 2. `${DS_*LOKI}` import inputs resolve to the Loki name.
//! 3. `${datasource}` resolves to the Prometheus uid under `uid` and to the
//!    Prometheus name under `datasource`; elsewhere it is kept.
//! 4. Legacy datasource spellings under `datasource` resolve to the
//!    Prometheus name.
//! 5. Any other placeholder under `datasource` resolves to Loki if it
//!    mentions `loki`, otherwise to Prometheus.
//!
//! Everything else is kept as is. After an object's entries are rewritten
//! the object itself is normalized: templating variables are pinned, deprecated
//! panel types are migrated and placeholder uids of `{type, uid}` datasource
//! references are resolved from the `type`.

use log::trace;
use serde_json::{Map, Value};

use crate::{
    config::AppConfig,
    placeholder::{self, DatasourceKind},
    templating,
};

const DATASOURCE_KEY: &str = "datasource";
const UID_KEY: &str = "uid";
const TYPE_KEY: &str = "type";

/// Placeholder-resolving tree rewriter.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'a> {
    config: &'a AppConfig,
}

impl<'a> Rewriter<'a> {
    /// Creates a rewriter resolving to the datasources in `config`.
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Rewrite a value found under `key` in its parent object.
    ///
    /// Pass `None` for a document root or an array element.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiln::{config::AppConfig, rewrite::Rewriter};
    /// use serde_json::json;
    ///
    /// let config = AppConfig::default();
    /// let rewriter = Rewriter::new(&config);
    ///
    /// let panel = json!({ "datasource": "${DS_PROMETHEUS}", "expr": "up{job=\"$job\"}" });
    /// assert_eq!(
    ///     rewriter.rewrite(panel, None),
    ///     json!({ "datasource": "Prometheus", "expr": "up{job=\"$job\"}" })
    /// );
    /// ```
    pub fn rewrite(&self, value: Value, key: Option<&str>) -> Value {
        match value {
            Value::String(text) => self.rewrite_string(text, key),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.rewrite(item, None))
                    .collect(),
            ),
            Value::Object(object) => Value::Object(self.rewrite_object(object)),
            scalar => scalar,
        }
    }

    fn rewrite_string(&self, text: String, key: Option<&str>) -> Value {
        match self.resolve_string(&text, key) {
            Some(resolved) => {
                trace!(key:?, from = text, to = resolved; "Resolved placeholder");
                Value::String(resolved.to_string())
            }
            None => Value::String(text),
        }
    }

    fn resolve_string(&self, text: &str, key: Option<&str>) -> Option<&'a str> {
        let datasources = self.config.datasources();

        if let Some(kind) = placeholder::input_kind(text) {
            return Some(datasources.target(kind).name());
        }

        if placeholder::is_generic_datasource(text) {
            return match key {
                Some(UID_KEY) => Some(datasources.prometheus().uid()),
                Some(DATASOURCE_KEY) => Some(datasources.prometheus().name()),
                _ => None,
            };
        }

        if key != Some(DATASOURCE_KEY) {
            return None;
        }

        if placeholder::is_legacy_datasource(text) {
            return Some(datasources.prometheus().name());
        }

        if placeholder::is_placeholder(text) {
            return Some(datasources.target(DatasourceKind::guess(text)).name());
        }

        None
    }

    fn rewrite_object(&self, object: Map<String, Value>) -> Map<String, Value> {
        // Entry rewriting turns `${datasource}` into a uid, so look at the uid
        // before descending. Import inputs already name their datasource and
        // keep the rule-based result.
        let had_placeholder_uid = object
            .get(UID_KEY)
            .and_then(Value::as_str)
            .is_some_and(|uid| {
                placeholder::is_placeholder(uid) && placeholder::input_kind(uid).is_none()
            });

        let mut object: Map<String, Value> = object
            .into_iter()
            .map(|(key, value)| {
                let value = self.rewrite(value, Some(&key));
                (key, value)
            })
            .collect();

        if templating::is_templating_variable(&object) {
            templating::normalize_variable(&mut object, self.config.datasources());
        }

        self.migrate_panel_type(&mut object);

        if had_placeholder_uid {
            self.resolve_reference_uid(&mut object);
        }

        object
    }

    fn migrate_panel_type(&self, object: &mut Map<String, Value>) {
        let Some(replacement) = object
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(|panel_type| self.config.panels().migrate(panel_type))
        else {
            return;
        };

        trace!(replacement; "Migrating deprecated panel type");
        object.insert(TYPE_KEY.to_string(), Value::String(replacement.to_string()));
    }

    /// Resolve the uid of a `{type, uid}` datasource reference from its type.
    fn resolve_reference_uid(&self, object: &mut Map<String, Value>) {
        if !object.get(UID_KEY).is_some_and(Value::is_string) {
            return;
        }
        let Some(kind) = object
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(DatasourceKind::from_type)
        else {
            return;
        };

        let uid = self.config.datasources().target(kind).uid();
        object.insert(UID_KEY.to_string(), Value::String(uid.to_string()));
    }
}
