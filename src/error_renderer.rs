//! Error rendering using ariadne
//!
//! Conversion errors carry the span of the external node they are about;
//! these helpers print them against the original source text.

use crate::{ConvertError, Span};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use miette::Diagnostic;
use std::io::Write;

const SOURCE_ID: &str = "<source>";

/// Render a conversion error to stderr.
///
/// # Example
/// ```no_run
/// use transir::{ConvertError, Span, render_error};
/// use transir::ops::Operator;
///
/// let source = "x instanceof Foo";
/// let error = ConvertError::UnmappedOperator {
///     operator: Operator::from_symbol("instanceof").unwrap_err(),
///     span: Some(Span::new(0, 16)),
/// };
/// render_error(&error, source);
/// ```
pub fn render_error(error: &ConvertError, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer.
pub fn render_error_to(
    error: &ConvertError,
    source: &str,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String (useful for logs and UIs).
pub fn render_error_to_string(error: &ConvertError, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Same as [`render_error_to_string`] without ANSI color codes, so the output
/// is easy to compare in tests.
pub fn render_error_to_string_no_color(error: &ConvertError, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &ConvertError,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let message = error.to_string();
    let Some(span) = error.span().filter(|span| span.0.end <= source.len()) else {
        // Nothing to point at in the source.
        writeln!(writer, "Error: {message}")?;
        if let Some(help) = error.help() {
            writeln!(writer, "Help: {help}")?;
        }
        return Ok(());
    };
    render_with_span(error, &message, span, source, writer, use_color)
}

fn render_with_span(
    error: &dyn Diagnostic,
    message: &str,
    span: &Span,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.0.clone()))
        .with_message(message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = error.code() {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new((SOURCE_ID, span.0.clone()))
            .with_message(message)
            .with_color(color),
    );

    if let Some(help) = error.help() {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}
