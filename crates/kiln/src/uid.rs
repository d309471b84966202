//! Dashboard identifier derivation.
//!
//! Provisioned dashboards need a stable `uid`. When the exported document does
//! not carry one, it is derived from the source file name with
//! [`sanitize_uid`].

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a dashboard uid accepted by the provisioning backend.
pub const MAX_UID_LEN: usize = 40;

/// Uid used when the file name sanitizes to nothing.
pub const FALLBACK_UID: &str = "dashboard";

static DISALLOWED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("static regex is valid"));

/// Derive a dashboard uid from a file-name stem.
///
/// Runs of characters outside `[a-zA-Z0-9_-]` collapse to a single hyphen,
/// surrounding hyphens are trimmed and the result is lower-cased and capped at
/// [`MAX_UID_LEN`] characters.
///
/// # Examples
///
/// ```
/// use kiln::uid::sanitize_uid;
///
/// assert_eq!(sanitize_uid("My Dashboard!!"), "my-dashboard");
/// assert_eq!(sanitize_uid("!!!"), "dashboard");
/// ```
pub fn sanitize_uid(stem: &str) -> String {
    let collapsed = DISALLOWED_RUN.replace_all(stem, "-");
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        return FALLBACK_UID.to_string();
    }

    let mut uid = trimmed.to_ascii_lowercase();
    if uid.len() > MAX_UID_LEN {
        // Only ASCII survives the substitution above, so byte truncation is safe.
        uid.truncate(MAX_UID_LEN);
        let end = uid.trim_end_matches('-').len();
        uid.truncate(end);
    }
    uid
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize_uid("My Dashboard!!"), "my-dashboard");
        assert_eq!(sanitize_uid("node  exporter / full"), "node-exporter-full");
    }

    #[test]
    fn test_sanitize_keeps_underscores_and_hyphens() {
        assert_eq!(sanitize_uid("k8s_cluster-overview"), "k8s_cluster-overview");
        assert_eq!(sanitize_uid("_private_"), "_private_");
    }

    #[test]
    fn test_sanitize_trims_hyphens() {
        assert_eq!(sanitize_uid("--logs--"), "logs");
        assert_eq!(sanitize_uid("  spaced  "), "spaced");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_uid(""), FALLBACK_UID);
        assert_eq!(sanitize_uid("***"), FALLBACK_UID);
        assert_eq!(sanitize_uid("---"), FALLBACK_UID);
    }

    #[test]
    fn test_sanitize_replaces_non_ascii_letters() {
        assert_eq!(sanitize_uid("Übersicht Knoten"), "bersicht-knoten");
    }

    #[test]
    fn test_sanitize_truncates_and_strips_trailing_hyphen() {
        let stem = format!("{}-tail", "a".repeat(39));
        let uid = sanitize_uid(&stem);
        assert_eq!(uid, "a".repeat(39));

        let long = "x".repeat(100);
        assert_eq!(sanitize_uid(&long).len(), MAX_UID_LEN);
    }

    fn check_uid_shape(stem: &str) -> Result<(), TestCaseError> {
        let uid = sanitize_uid(stem);
        prop_assert!(!uid.is_empty());
        prop_assert!(uid.len() <= MAX_UID_LEN, "uid too long: {uid}");
        prop_assert!(
            uid.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'),
            "uid contains disallowed characters: {uid}"
        );
        prop_assert!(!uid.starts_with('-') && !uid.ends_with('-'));
        Ok(())
    }

    proptest! {
        #[test]
        fn uid_has_provisioning_shape(stem in "\\PC{0,80}") {
            check_uid_shape(&stem)?;
        }

        #[test]
        fn uid_is_deterministic(stem in "[ -~]{0,60}") {
            prop_assert_eq!(sanitize_uid(&stem), sanitize_uid(&stem));
        }
    }
}
