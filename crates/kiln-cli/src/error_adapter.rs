//! Error adapter for converting KilnError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. It also owns the
//! mapping from errors to process exit codes.
//!
//! # Source Snippets
//!
//! When a dashboard fails to parse, the report points at the line and column
//! of the JSON syntax error inside the offending file.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use kiln::{DocumentError, KilnError};

/// Exit status for configuration and other unclassified failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when the source directory does not exist.
pub const EXIT_SOURCE_NOT_FOUND: i32 = 2;
/// Exit status when the source directory holds no dashboards.
pub const EXIT_NO_DASHBOARDS: i32 = 3;
/// Exit status when a dashboard fails to render.
pub const EXIT_RENDER_FAILED: i32 = 4;

/// Map an error to the process exit status reported for it.
pub fn exit_code(err: &KilnError) -> i32 {
    match err {
        KilnError::SourceNotFound(_) => EXIT_SOURCE_NOT_FOUND,
        KilnError::NoDashboards(_) => EXIT_NO_DASHBOARDS,
        KilnError::Render { .. } => EXIT_RENDER_FAILED,
        KilnError::Io(_) | KilnError::Config(_) => EXIT_FAILURE,
    }
}

/// Adapter for a JSON syntax error in a dashboard file.
///
/// This adapter wraps the [`serde_json::Error`] together with the file
/// contents and implements [`MietteDiagnostic`] to label the failing
/// position.
pub struct JsonDiagnosticAdapter<'a> {
    /// The error being reported
    err: &'a KilnError,
    /// The underlying JSON error
    json: &'a serde_json::Error,
    /// Dashboard source for displaying snippets
    src: &'a str,
}

impl<'a> JsonDiagnosticAdapter<'a> {
    /// Create a new JSON diagnostic adapter.
    pub fn new(err: &'a KilnError, json: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, json, src }
    }
}

impl fmt::Debug for JsonDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDiagnosticAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for JsonDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for JsonDiagnosticAdapter<'_> {}

impl MietteDiagnostic for JsonDiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("kiln::json"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = json_error_span(self.json, self.src);
        let label = LabeledSpan::new_primary_with_span(Some("invalid JSON".to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for every error without a source snippet.
pub struct ErrorAdapter<'a>(pub &'a KilnError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// The Display output of every variant already names its cause, so no
// source chain is exposed to keep reports from repeating it.
impl std::error::Error for ErrorAdapter<'_> {}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            KilnError::Io(_) => "kiln::io",
            KilnError::Config(_) => "kiln::config",
            KilnError::SourceNotFound(_) => "kiln::source",
            KilnError::NoDashboards(_) => "kiln::empty",
            KilnError::Render { .. } => "kiln::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            KilnError::SourceNotFound(_) => "check the --src path",
            KilnError::NoDashboards(_) => {
                "the source directory must contain at least one *.json dashboard"
            }
            KilnError::Render {
                source: DocumentError::NotAnObject { .. },
                ..
            } => "exported dashboards are JSON objects at the top level",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a JSON syntax diagnostic or a plain error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A JSON syntax error with source location information.
    Json(JsonDiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Json(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Json(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Json(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`KilnError`] into a reportable error.
///
/// JSON syntax errors keep their source text and become
/// [`Reportable::Json`]; everything else becomes [`Reportable::Error`].
pub fn to_reportable(err: &KilnError) -> Reportable<'_> {
    match err {
        KilnError::Render {
            source: DocumentError::Parse { err: json, src },
            ..
        } if json.is_syntax() || json.is_eof() => {
            Reportable::Json(JsonDiagnosticAdapter::new(err, json, src))
        }
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

/// Locate a JSON error's line/column position as a byte span in `src`.
fn json_error_span(err: &serde_json::Error, src: &str) -> SourceSpan {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(err.line().saturating_sub(1))
        .map(str::len)
        .sum();

    let mut offset = (line_start + err.column().saturating_sub(1)).min(src.len());
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }

    let len = src[offset..].chars().next().map_or(0, char::len_utf8);
    SourceSpan::new(offset.into(), len)
}

/// Render a report for `err` into a string.
pub fn render_report(err: &KilnError) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    reporter
        .render_report(&mut writer, &to_reportable(err))
        .expect("Writing to String buffer is infallible");
    writer
}
