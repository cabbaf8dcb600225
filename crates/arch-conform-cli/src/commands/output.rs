//! Shared output formatting for check reports.

use anyhow::Result;
use arch_conform_core::{Report, Severity, ViolationDiagnostic};
use std::io::{self, Write};

use crate::OutputFormat;

/// Print a report in the specified format to stdout.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write(report, format, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write a report in the specified format.
///
/// Every format writes the whole report, diagnostics and summary alike, to
/// `out`.
pub fn write(report: &Report, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(report, out)?,
        OutputFormat::Json => write_json(report, out)?,
        OutputFormat::Compact => write_compact(report, out)?,
        OutputFormat::Pretty => write_pretty(report, out)?,
    }
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn write_text(report: &Report, out: &mut impl Write) -> io::Result<()> {
    let (errors, warnings, _) = report.count_by_severity();

    for violation in &report.violations {
        writeln!(
            out,
            "{} {} at {}",
            violation.code, violation.rule, violation.location
        )?;
        writeln!(
            out,
            "  {}: {}",
            severity_label(violation.severity),
            violation.message
        )?;
        writeln!(out, "  = help: {}", violation.hint)?;
        if !violation.doc_ref.is_empty() {
            writeln!(out, "  = see: {}", violation.doc_ref)?;
        }
        writeln!(out)?;
    }

    write_failures(report, out)?;

    let summary_color = if errors > 0 || report.has_rule_errors() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    writeln!(out, "{}{}\x1b[0m", summary_color, report.summary())?;
    if report.cancelled {
        writeln!(out, "\x1b[33mRun was cancelled; results are partial\x1b[0m")?;
    }
    Ok(())
}

fn write_failures(report: &Report, out: &mut impl Write) -> io::Result<()> {
    if !report.rule_errors.is_empty() {
        writeln!(out, "Rule execution errors:")?;
        for error in &report.rule_errors {
            writeln!(out, "  {error}")?;
        }
        writeln!(out)?;
    }
    if !report.resolution_warnings.is_empty() {
        writeln!(out, "Unresolved types:")?;
        for warning in &report.resolution_warnings {
            writeln!(out, "  {warning}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_json(report: &Report, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn write_compact(report: &Report, out: &mut impl Write) -> io::Result<()> {
    for violation in &report.violations {
        writeln!(
            out,
            "{}:{}: {} [{}] {}",
            violation.location.file.display(),
            violation.location.line,
            violation.severity,
            violation.code,
            violation.message,
        )?;
    }
    Ok(())
}

fn write_pretty(report: &Report, out: &mut impl Write) -> io::Result<()> {
    for violation in &report.violations {
        let diagnostic = miette::Report::new(ViolationDiagnostic::from(violation));
        writeln!(out, "{diagnostic:?}")?;
    }
    write_failures(report, out)?;
    writeln!(out, "{}", report.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::{FixAction, Location, RemediationHint, Violation};

    fn report() -> Report {
        let mut report = Report::new();
        report.types_checked = 1;
        report.violations.push(Violation::new(
            "DC001",
            "sealed-concrete-class",
            Severity::Error,
            Location::new("Ordering", "src/Order.cs", 3),
            "`Order` is never extended but is not sealed",
            RemediationHint::new(FixAction::AddModifier, "Ordering.Order").with_snippet("sealed"),
        ));
        report
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        write(&report(), format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn pretty_keeps_diagnostics_and_summary_together() {
        let out = render(OutputFormat::Pretty);
        assert!(out.contains("is never extended but is not sealed"), "{out}");
        assert!(out.contains("Found 1 error(s)"), "{out}");
    }

    #[test]
    fn compact_is_one_line_per_violation() {
        let out = render(OutputFormat::Compact);
        assert_eq!(
            out,
            "src/Order.cs:3: error [DC001] `Order` is never extended but is not sealed\n"
        );
    }

    #[test]
    fn json_carries_violation_codes() {
        let out = render(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["violations"][0]["code"], "DC001");
    }
}
