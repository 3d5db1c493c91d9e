//! Human-formatted diagnostic rendering via `ariadne` (§7 "User-visible
//! behaviour": non-JSON mode prints span + fix hint).

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::diagnostic::{Diagnostic, Severity};

/// Render one diagnostic as a human-readable report string.
///
/// `source` is the full text of the file the diagnostic's span refers to;
/// pass an empty string when no span is available (synthesized/global
/// errors) and the message/fix hint alone are printed.
#[must_use]
pub fn render(diag: &Diagnostic, source: &str) -> String {
    let Some(span) = &diag.span else {
        return format_headless(diag);
    };
    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    let color = match diag.severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
    };
    let start = span.span.start as usize;
    let end = (span.span.end as usize).max(start + 1).min(source.len().max(1));
    let mut builder = Report::build(kind, span.file.clone(), start)
        .with_code(diag.code.to_string())
        .with_message(&diag.message)
        .with_label(
            Label::new((span.file.clone(), start..end))
                .with_message(&diag.message)
                .with_color(color),
        );
    if let Some(fix) = &diag.fix {
        builder = builder.with_help(format!(
            "{} (confidence {:.1})",
            fix.suggestion, fix.confidence
        ));
    }
    let report = builder.finish();
    let mut out = Vec::new();
    let _ = report.write((span.file.clone(), Source::from(source)), &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

fn format_headless(diag: &Diagnostic) -> String {
    let mut out = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
    if let Some(fix) = &diag.fix {
        out.push_str(&format!(
            "\n  help: {} (confidence {:.1})",
            fix.suggestion, fix.confidence
        ));
    }
    out
}
