//! Error rendering using ariadne
//!
//! Renders Sprig diagnostics with the offending source line, an error code
//! and the scope stack captured when the error was raised.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use sprig::{Engine, render_error};
///
/// let mut engine = Engine::default();
/// if let Err(e) = engine.execute("var x = ;") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error.diagnostic() {
        Some(diagnostic) => render_diagnostic(diagnostic, writer, use_color),
        None => writeln!(writer, "{}", error),
    }
}

fn render_diagnostic(
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    let span = diag.span.clone();

    let mut report = Report::build(kind, ("<script>", span.clone()))
        .with_message(format!("line {} column {}: {}", diag.line, diag.column, diag.message))
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new(("<script>", span))
            .with_message(&diag.message)
            .with_color(colors.next()),
    );

    if !diag.scope_dump.is_empty() {
        report = report.with_note(format!("scopes:\n{}", diag.scope_dump.join("\n")));
    }

    report
        .finish()
        .write(("<script>", Source::from(diag.source.as_str())), &mut *writer)
}
