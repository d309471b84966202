//! Classification of export-time placeholder tokens.
//!
//! Dashboards exported for interactive import reference their datasources
//! through template tokens such as `${DS_PROMETHEUS}` or `${datasource}`.
//! File provisioning has no input prompt to fill those in, so they have to be
//! recognized and resolved ahead of time.

use std::sync::LazyLock;

use regex::Regex;

/// The generic datasource variable most newer exports use.
pub const GENERIC_DATASOURCE: &str = "${datasource}";

/// Older spellings of the datasource variable, only resolved inside a
/// `datasource` field.
pub const LEGACY_DATASOURCE_SPELLINGS: &[&str] =
    &["$datasource", "${VAR_DATASOURCE}", "$VAR_DATASOURCE"];

static PROMETHEUS_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{DS_.*PROMETHEUS\}$").expect("static regex is valid"));

static LOKI_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{DS_.*LOKI\}$").expect("static regex is valid"));

static BRACED_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{[^}]+\}$").expect("static regex is valid"));

static BARE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[A-Za-z_][A-Za-z0-9_]*$").expect("static regex is valid"));

/// The datasource kinds placeholders can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasourceKind {
    Prometheus,
    Loki,
}

impl DatasourceKind {
    /// Maps a datasource plugin `type` to a known kind.
    ///
    /// The match is exact, as plugin ids are lower-case.
    pub fn from_type(ds_type: &str) -> Option<Self> {
        match ds_type {
            "prometheus" => Some(Self::Prometheus),
            "loki" => Some(Self::Loki),
            _ => None,
        }
    }

    /// Guesses the kind behind an unrecognized placeholder.
    ///
    /// Anything mentioning `loki` is Loki; everything else defaults to
    /// Prometheus.
    pub fn guess(placeholder: &str) -> Self {
        if placeholder.to_ascii_lowercase().contains("loki") {
            Self::Loki
        } else {
            Self::Prometheus
        }
    }
}

/// Returns the datasource kind of an import input token (`${DS_*}`).
pub fn input_kind(value: &str) -> Option<DatasourceKind> {
    if value == "${DS_PROMETHEUS}" || PROMETHEUS_INPUT.is_match(value) {
        Some(DatasourceKind::Prometheus)
    } else if value == "${DS_LOKI}" || LOKI_INPUT.is_match(value) {
        Some(DatasourceKind::Loki)
    } else {
        None
    }
}

/// Returns `true` for the generic `${datasource}` token.
pub fn is_generic_datasource(value: &str) -> bool {
    value == GENERIC_DATASOURCE
}

/// Returns `true` for a legacy datasource variable spelling.
pub fn is_legacy_datasource(value: &str) -> bool {
    LEGACY_DATASOURCE_SPELLINGS.contains(&value)
}

/// Returns `true` if the whole string is a template variable reference,
/// either braced (`${name}`) or bare (`$name`).
pub fn is_placeholder(value: &str) -> bool {
    BRACED_VARIABLE.is_match(value) || BARE_VARIABLE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_prometheus() {
        assert_eq!(
            input_kind("${DS_PROMETHEUS}"),
            Some(DatasourceKind::Prometheus)
        );
        assert_eq!(
            input_kind("${DS_THANOS_PROMETHEUS}"),
            Some(DatasourceKind::Prometheus)
        );
    }

    #[test]
    fn test_input_kind_loki() {
        assert_eq!(input_kind("${DS_LOKI}"), Some(DatasourceKind::Loki));
        assert_eq!(input_kind("${DS_CLUSTER_LOKI}"), Some(DatasourceKind::Loki));
    }

    #[test]
    fn test_input_kind_rejects_other_tokens() {
        assert_eq!(input_kind("${DS_MYSQL}"), None);
        assert_eq!(input_kind("${datasource}"), None);
        assert_eq!(input_kind("prefix ${DS_PROMETHEUS}"), None);
        assert_eq!(input_kind("${ds_prometheus}"), None);
    }

    #[test]
    fn test_is_placeholder_forms() {
        assert!(is_placeholder("${datasource}"));
        assert!(is_placeholder("${DS_ELASTIC}"));
        assert!(is_placeholder("$namespace"));
        assert!(is_placeholder("$__rate_interval"));

        assert!(!is_placeholder("Prometheus"));
        assert!(!is_placeholder("rate($metric[5m])"));
        assert!(!is_placeholder("${}"));
        assert!(!is_placeholder("$1abc"));
        assert!(!is_placeholder("$"));
    }

    #[test]
    fn test_legacy_spellings() {
        assert!(is_legacy_datasource("$datasource"));
        assert!(is_legacy_datasource("${VAR_DATASOURCE}"));
        assert!(!is_legacy_datasource("${datasource}"));
    }

    #[test]
    fn test_guess_kind() {
        assert_eq!(DatasourceKind::guess("${LOKI_SOURCE}"), DatasourceKind::Loki);
        assert_eq!(DatasourceKind::guess("$logs_loki"), DatasourceKind::Loki);
        assert_eq!(DatasourceKind::guess("${metrics}"), DatasourceKind::Prometheus);
        assert_eq!(DatasourceKind::guess("${DS_TEMPO}"), DatasourceKind::Prometheus);
    }

    #[test]
    fn test_from_type() {
        assert_eq!(
            DatasourceKind::from_type("prometheus"),
            Some(DatasourceKind::Prometheus)
        );
        assert_eq!(DatasourceKind::from_type("loki"), Some(DatasourceKind::Loki));
        assert_eq!(DatasourceKind::from_type("Prometheus"), None);
        assert_eq!(DatasourceKind::from_type("tempo"), None);
    }
}
