//! Normalization of dashboard templating variables.
//!
//! Two kinds of variables select a datasource in exported dashboards:
//! `datasource` variables whose `query` names a plugin type, and `constant`
//! variables named `datasource`/`VAR_DATASOURCE` that imports fill in from an
//! input. Both are pinned to the provisioned datasource so the dashboard
//! opens with a valid selection.

use log::{trace, warn};
use serde_json::{Map, Value, json};

use crate::config::DatasourceConfig;

const CONSTANT_DATASOURCE_NAMES: &[&str] = &["datasource", "var_datasource"];

/// Returns `true` if an object has the shape of a templating variable: a
/// string `type` plus `name` and `current` entries.
pub fn is_templating_variable(object: &Map<String, Value>) -> bool {
    object.get("type").is_some_and(Value::is_string)
        && object.contains_key("name")
        && object.contains_key("current")
}

/// Pin a templating variable to a provisioned datasource.
///
/// Variables that neither select a datasource nor stand in for one are left
/// unchanged, as are variables whose `current` value has an unexpected shape.
pub fn normalize_variable(variable: &mut Map<String, Value>, datasources: &DatasourceConfig) {
    let Some(var_type) = variable.get("type").and_then(Value::as_str) else {
        return;
    };

    match var_type {
        "constant" if is_datasource_constant(variable) => {
            pin_constant(variable, datasources.prometheus().name());
        }
        "datasource" => {
            if let Err(reason) = select_datasource(variable, datasources) {
                warn!(
                    name:? = variable.get("name"),
                    reason;
                    "Leaving datasource variable unchanged"
                );
            }
        }
        _ => {}
    }
}

fn is_datasource_constant(variable: &Map<String, Value>) -> bool {
    variable
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| {
            CONSTANT_DATASOURCE_NAMES
                .iter()
                .any(|candidate| name.eq_ignore_ascii_case(candidate))
        })
}

/// Force a datasource constant to a single unselected value.
fn pin_constant(variable: &mut Map<String, Value>, name: &str) {
    trace!(name; "Pinning datasource constant");

    variable.insert("query".to_string(), Value::String(name.to_string()));

    if let Some(Value::Array(options)) = variable.get_mut("options") {
        for option in options.iter_mut() {
            match option {
                Value::Object(entry) => set_choice(entry, name, Some(false)),
                other => *other = choice(name),
            }
        }
    }

    match variable.get_mut("current") {
        Some(Value::Object(current)) => set_choice(current, name, Some(false)),
        _ => {
            variable.insert("current".to_string(), choice(name));
        }
    }
}

/// Point a `datasource` variable at the provisioned datasource its query names.
///
/// Shape is checked before anything is written, so a rejected variable is
/// never half-updated.
fn select_datasource(
    variable: &mut Map<String, Value>,
    datasources: &DatasourceConfig,
) -> Result<(), &'static str> {
    match variable.get("current") {
        Some(Value::Object(_) | Value::Null) | None => {}
        Some(_) => return Err("current is not an object"),
    }

    let queries_loki = variable
        .get("query")
        .and_then(Value::as_str)
        .is_some_and(|query| query.eq_ignore_ascii_case("loki"));
    let selection = if queries_loki {
        datasources.loki().name()
    } else {
        datasources.prometheus().name()
    };

    trace!(selection; "Selecting datasource for variable");

    match variable.get_mut("current") {
        Some(Value::Object(current)) => set_choice(current, selection, None),
        _ => {
            variable.insert("current".to_string(), choice(selection));
        }
    }

    if let Some(Value::Array(options)) = variable.get_mut("options") {
        let offers_selection = options
            .iter()
            .any(|option| option.get("value").and_then(Value::as_str) == Some(selection));
        if !offers_selection {
            *options = vec![choice(selection)];
        }
    }

    Ok(())
}

/// Set `text` and `value` on a choice object. `selected` is overwritten when
/// given, otherwise kept and defaulted to `false`.
fn set_choice(entry: &mut Map<String, Value>, name: &str, selected: Option<bool>) {
    entry.insert("text".to_string(), Value::String(name.to_string()));
    entry.insert("value".to_string(), Value::String(name.to_string()));
    match selected {
        Some(selected) => {
            entry.insert("selected".to_string(), Value::Bool(selected));
        }
        None => {
            entry
                .entry("selected")
                .or_insert(Value::Bool(false));
        }
    }
}

fn choice(name: &str) -> Value {
    json!({ "text": name, "value": name, "selected": false })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn normalized(value: Value) -> Value {
        let mut variable = object(value);
        normalize_variable(&mut variable, &DatasourceConfig::default());
        Value::Object(variable)
    }

    #[test]
    fn test_detects_variable_shape() {
        assert!(is_templating_variable(&object(json!({
            "type": "query", "name": "job", "current": {}
        }))));
        assert!(!is_templating_variable(&object(json!({
            "type": "query", "name": "job"
        }))));
        assert!(!is_templating_variable(&object(json!({
            "type": 3, "name": "job", "current": {}
        }))));
    }

    #[test]
    fn test_datasource_variable_selects_loki() {
        let variable = normalized(json!({
            "type": "datasource",
            "name": "logs",
            "query": "Loki",
            "current": { "text": "${DS_LOKI}", "value": "${DS_LOKI}" }
        }));

        assert_eq!(variable["current"]["text"], "Loki");
        assert_eq!(variable["current"]["value"], "Loki");
        assert_eq!(variable["current"]["selected"], false);
    }

    #[test]
    fn test_datasource_variable_defaults_to_prometheus() {
        for query in ["prometheus", "influxdb", ""] {
            let variable = normalized(json!({
                "type": "datasource",
                "name": "ds",
                "query": query,
                "current": {}
            }));
            assert_eq!(variable["current"]["text"], "Prometheus", "query {query:?}");
            assert_eq!(variable["current"]["value"], "Prometheus", "query {query:?}");
        }
    }

    #[test]
    fn test_datasource_variable_preserves_selected() {
        let variable = normalized(json!({
            "type": "datasource",
            "name": "ds",
            "query": "prometheus",
            "current": { "selected": true, "text": "old", "value": "old" }
        }));

        assert_eq!(
            variable["current"],
            json!({ "selected": true, "text": "Prometheus", "value": "Prometheus" })
        );
    }

    #[test]
    fn test_datasource_variable_replaces_options_without_target() {
        let variable = normalized(json!({
            "type": "datasource",
            "name": "ds",
            "query": "loki",
            "current": {},
            "options": [{ "text": "other", "value": "other", "selected": true }]
        }));

        assert_eq!(
            variable["options"],
            json!([{ "text": "Loki", "value": "Loki", "selected": false }])
        );
    }

    #[test]
    fn test_datasource_variable_keeps_options_with_target() {
        let options = json!([
            { "text": "Prometheus", "value": "Prometheus", "selected": true },
            { "text": "Thanos", "value": "Thanos", "selected": false }
        ]);
        let variable = normalized(json!({
            "type": "datasource",
            "name": "ds",
            "query": "prometheus",
            "current": {},
            "options": options.clone()
        }));

        assert_eq!(variable["options"], options);
    }

    #[test]
    fn test_datasource_variable_with_odd_current_is_untouched() {
        let original = json!({
            "type": "datasource",
            "name": "ds",
            "query": "loki",
            "current": "Loki",
            "options": []
        });

        assert_eq!(normalized(original.clone()), original);
    }

    #[test]
    fn test_constant_datasource_is_pinned() {
        let variable = normalized(json!({
            "type": "constant",
            "name": "VAR_DATASOURCE",
            "query": "${VAR_DATASOURCE}",
            "current": { "text": "x", "value": "x", "selected": true },
            "options": [
                { "text": "x", "value": "x", "selected": true },
                { "text": "y", "value": "y", "selected": false }
            ]
        }));

        let pinned = json!({ "text": "Prometheus", "value": "Prometheus", "selected": false });
        assert_eq!(variable["query"], "Prometheus");
        assert_eq!(variable["current"], pinned);
        assert_eq!(variable["options"], json!([pinned.clone(), pinned]));
    }

    #[test]
    fn test_other_constants_are_untouched() {
        let original = json!({
            "type": "constant",
            "name": "cluster",
            "query": "prod",
            "current": { "text": "prod", "value": "prod" }
        });

        assert_eq!(normalized(original.clone()), original);
    }

    #[test]
    fn test_query_variables_are_untouched() {
        let original = json!({
            "type": "query",
            "name": "datasource",
            "query": "label_values(job)",
            "current": { "text": "a", "value": "a" }
        });

        assert_eq!(normalized(original.clone()), original);
    }
}
