//! Rendering of errors as annotated source reports.

use crate::ast::Span;
use crate::error::Error;
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use std::io::{self, IsTerminal};
use std::ops::Range;

type SourceSpan = (String, Range<usize>);

fn label_message(err: &Error) -> String {
    match err {
        Error::Lex { .. } => "unexpected character".to_string(),
        Error::Parse { .. } => "unexpected input here".to_string(),
        Error::Undefined { name, .. } => format!("add `{}` to the declarations", name),
        Error::IgnoreInsert { .. } => "`_` has no value".to_string(),
        Error::Duplicate { .. } => "declared again here".to_string(),
        Error::MissingInput { .. } => "declared here without a default".to_string(),
        Error::Errors(_) => String::new(),
    }
}

fn build(err: &Error, path: &str, color: bool) -> Report<'static, SourceSpan> {
    let span = err.span().unwrap_or_default();
    let mut report = Report::build(ReportKind::Error, path.to_string(), span.start)
        .with_config(
            Config::default()
                .with_color(color)
                .with_index_type(IndexType::Byte),
        )
        .with_message(err.to_string())
        .with_label(
            Label::new((path.to_string(), span.range()))
                .with_message(label_message(err))
                .with_color(Color::Red),
        );

    if let Error::Duplicate { first, .. } = err {
        report = report.with_label(
            Label::new((path.to_string(), first.range()))
                .with_message("first declared here")
                .with_color(Color::Blue),
        );
    }

    report.finish()
}

/// One report per leaf error
pub fn reports(err: &Error, path: &str, color: bool) -> Vec<Report<'static, SourceSpan>> {
    err.flatten()
        .into_iter()
        .map(|leaf| build(leaf, path, color))
        .collect()
}

/// Write every report for `err` to `out` without colour
pub fn write_report<W: io::Write>(
    err: &Error,
    path: &str,
    source: &str,
    mut out: W,
) -> io::Result<()> {
    for report in reports(err, path, false) {
        report.write((path.to_string(), Source::from(source.to_string())), &mut out)?;
    }
    Ok(())
}

/// Print every report for `err` to stderr, coloured when stderr is a terminal
pub fn eprint_report(err: &Error, path: &str, source: &str) -> io::Result<()> {
    let color = io::stderr().is_terminal();
    for report in reports(err, path, color) {
        report.eprint((path.to_string(), Source::from(source.to_string())))?;
    }
    Ok(())
}

/// Short `path:line:col: message` form, one line per leaf error
pub fn summary(err: &Error, path: &str, source: &str) -> Vec<String> {
    err.flatten()
        .into_iter()
        .map(|leaf| {
            let (line, col) = line_col(source, leaf.span().unwrap_or_default());
            format!("{}:{}:{}: {}", path, line, col, leaf)
        })
        .collect()
}

fn line_col(source: &str, span: Span) -> (usize, usize) {
    let start = span.start.min(source.len());
    let before = &source[..start];
    let line = before.matches('\n').count() + 1;
    let col = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, col)
}
