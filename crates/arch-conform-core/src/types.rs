//! Core types for violations, run outcomes and reports.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::model::TypeDecl;

/// Severity level for conformance violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Error returned when parsing an unknown severity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`. Valid values: error, warning, info")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// Where a violation was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Owning project.
    pub project: String,
    /// File path relative to the project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: u32,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(project: impl Into<String>, file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            project: project.into(),
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.project, self.file.display(), self.line)
    }
}

/// What an automated fixer should do about a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixAction {
    /// Add a modifier to a declaration (`snippet` holds the modifier).
    AddModifier,
    /// Change a member's accessibility (`snippet` holds the new accessibility).
    ChangeAccessibility,
    /// Add a member (`snippet` holds its signature).
    AddMember,
    /// Rename a type or member (`snippet` holds the new name, when known).
    Rename,
    /// Change a method's return type (`snippet` holds the new type).
    ChangeReturnType,
    /// Change a property's or field's declared type (`snippet` holds the new type).
    ChangeDeclaredType,
    /// Replace a construct in a body (`snippet` holds the replacement).
    ReplaceConstruct,
    /// Remove a construct from a body.
    RemoveConstruct,
    /// Wrap statements in a mutual-exclusion block.
    WrapInLock,
    /// Move a declaration (`snippet` holds the destination).
    MoveDeclaration,
    /// A structural change no single edit expresses.
    Restructure,
}

impl fmt::Display for FixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AddModifier => "add-modifier",
            Self::ChangeAccessibility => "change-accessibility",
            Self::AddMember => "add-member",
            Self::Rename => "rename",
            Self::ChangeReturnType => "change-return-type",
            Self::ChangeDeclaredType => "change-declared-type",
            Self::ReplaceConstruct => "replace-construct",
            Self::RemoveConstruct => "remove-construct",
            Self::WrapInLock => "wrap-in-lock",
            Self::MoveDeclaration => "move-declaration",
            Self::Restructure => "restructure",
        };
        f.write_str(s)
    }
}

/// Machine-oriented remediation hint, intended for automated-fix tooling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RemediationHint {
    /// Kind of edit.
    pub action: FixAction,
    /// Fully-qualified symbol the edit applies to (`Order`, `Order.ChangeName`).
    pub target: String,
    /// Edit payload, when the action needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl RemediationHint {
    /// Creates a hint without payload.
    #[must_use]
    pub fn new(action: FixAction, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
            snippet: None,
        }
    }

    /// Sets the edit payload.
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

impl fmt::Display for RemediationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.target)?;
        if let Some(snippet) = &self.snippet {
            write!(f, " `{snippet}`")?;
        }
        Ok(())
    }
}

/// Field order used to sort violations.
type SortKey<'a> = (
    &'a str,
    &'a std::path::Path,
    u32,
    &'a str,
    &'a str,
    &'a str,
    Severity,
    &'a RemediationHint,
    &'a str,
);

/// A conformance violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "DC001").
    pub code: String,
    /// Rule name (e.g., "sealed-concrete-class").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Location of the offending declaration or construct.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Remediation hint for automated fixes.
    pub hint: RemediationHint,
    /// Reference to the remediation document.
    pub doc_ref: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
        hint: RemediationHint,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            hint,
            doc_ref: String::new(),
        }
    }

    /// Adds a remediation document reference to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = doc_ref.into();
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.location);
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        let _ = writeln!(output, "  = fix: {}", self.hint);
        if !self.doc_ref.is_empty() {
            let _ = writeln!(output, "  = see: {}", self.doc_ref);
        }
        output
    }

    /// Deterministic ordering key: project, file, line, rule, message, then
    /// every remaining field so the order agrees with equality.
    fn sort_key(&self) -> SortKey<'_> {
        (
            &self.location.project,
            &self.location.file,
            self.location.line,
            &self.rule,
            &self.message,
            &self.code,
            self.severity,
            &self.hint,
            &self.doc_ref,
        )
    }
}

impl Ord for Violation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Violation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.message
        )?;
        if !self.doc_ref.is_empty() {
            write!(f, " (see: {})", self.doc_ref)?;
        }
        Ok(())
    }
}

/// Renders a [`Violation`] through miette's graphical report handler.
#[derive(Debug, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: String,
    rule: String,
    message: String,
    severity: Severity,
    help: String,
    url: Option<String>,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            code: v.code.clone(),
            rule: v.rule.clone(),
            message: format!("{} ({})", v.message, v.location),
            severity: v.severity,
            help: format!("fix: {}", v.hint),
            url: (!v.doc_ref.is_empty()).then(|| v.doc_ref.clone()),
        }
    }
}

impl Diagnostic for ViolationDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.rule))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Info => miette::Severity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.help))
    }

    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.url
            .as_ref()
            .map(|u| Box::new(u) as Box<dyn fmt::Display + 'a>)
    }
}

/// A fault inside one rule while evaluating one type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleError {
    /// Rule name.
    pub rule: String,
    /// Owning project of the type.
    pub project: String,
    /// Fully-qualified name of the type.
    pub type_name: String,
    /// Underlying fault.
    pub cause: String,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule `{}` failed on {}/{}: {}",
            self.rule, self.project, self.type_name, self.cause
        )
    }
}

/// Why a type's model could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResolutionFailure {
    /// An ancestor was not resolved by the frontend and no type with that
    /// name exists anywhere in the workspace.
    UnresolvedAncestor {
        /// Ancestor name as exported.
        name: String,
    },
    /// The fully-qualified name is declared more than once.
    DuplicateDeclaration {
        /// Project holding the earlier declaration.
        other_project: String,
    },
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedAncestor { name } => write!(f, "unresolvable ancestor `{name}`"),
            Self::DuplicateDeclaration { other_project } => {
                write!(f, "also declared in project `{other_project}`")
            }
        }
    }
}

/// A type skipped because its Symbol Model could not be built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolutionWarning {
    /// Owning project.
    pub project: String,
    /// Fully-qualified name of the skipped type.
    pub type_name: String,
    /// File of the skipped type.
    pub file: PathBuf,
    /// Declaration line.
    pub line: u32,
    /// What failed.
    pub failure: ResolutionFailure,
}

impl ResolutionWarning {
    /// Creates a warning for `decl`.
    #[must_use]
    pub fn new(project: &str, decl: &TypeDecl, failure: ResolutionFailure) -> Self {
        Self {
            project: project.to_string(),
            type_name: decl.qualified_name().to_string(),
            file: decl.file.clone(),
            line: decl.line,
            failure,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}: {} skipped: {}",
            self.project,
            self.file.display(),
            self.line,
            self.type_name,
            self.failure
        )
    }
}

/// Result of one conformance run: three disjoint buckets plus counters.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// Violations, sorted by project, file, line and rule.
    pub violations: Vec<Violation>,
    /// Rule execution errors, sorted by rule and type.
    pub rule_errors: Vec<RuleError>,
    /// Types skipped because their model could not be built.
    pub resolution_warnings: Vec<ResolutionWarning>,
    /// Number of types evaluated.
    pub types_checked: usize,
    /// Whether the run was cancelled before every (type, rule) pair ran.
    #[serde(default)]
    pub cancelled: bool,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any error-level violations.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns true if the checker itself failed on any (type, rule) pair.
    #[must_use]
    pub fn has_rule_errors(&self) -> bool {
        !self.rule_errors.is_empty()
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity: (errors, warnings, infos).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// One-line summary of all three buckets.
    #[must_use]
    pub fn summary(&self) -> String {
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "Found {} error(s), {} warning(s), {} info(s) in {} type(s); {} rule error(s), {} unresolved type(s)",
            errors,
            warnings,
            infos,
            self.types_checked,
            self.rule_errors.len(),
            self.resolution_warnings.len()
        )
    }

    /// Formats violations as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()` messages
    /// in `cargo test` integration. Rule errors and resolution warnings are listed
    /// in their own sections.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self
            .violations
            .iter()
            .filter(|v| v.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== arch-conform: {} violation(s) ===\n",
            failing.len()
        );

        for v in &failing {
            let _ = writeln!(report, "{}", v.format());
        }

        if !self.rule_errors.is_empty() {
            let _ = writeln!(report, "--- rule execution errors ---");
            for e in &self.rule_errors {
                let _ = writeln!(report, "{e}");
            }
            let _ = writeln!(report);
        }

        if !self.resolution_warnings.is_empty() {
            let _ = writeln!(report, "--- unresolved types ---");
            for w in &self.resolution_warnings {
                let _ = writeln!(report, "{w}");
            }
            let _ = writeln!(report);
        }

        let _ = writeln!(report, "{}", self.summary());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity, line: u32, rule: &str) -> Violation {
        Violation::new(
            "DC001",
            rule,
            severity,
            Location::new("Ordering", "src/Order.cs", line),
            "Order is never extended but not sealed",
            RemediationHint::new(FixAction::AddModifier, "Ordering.Order").with_snippet("sealed"),
        )
    }

    #[test]
    fn severity_parses_and_orders() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert!("critical".parse::<Severity>().is_err());
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn violations_sort_by_location_then_rule() {
        let mut list = vec![
            make_violation(Severity::Error, 20, "b-rule"),
            make_violation(Severity::Error, 10, "z-rule"),
            make_violation(Severity::Error, 10, "a-rule"),
        ];
        list.sort();
        let order: Vec<(u32, &str)> = list
            .iter()
            .map(|v| (v.location.line, v.rule.as_str()))
            .collect();
        assert_eq!(order, vec![(10, "a-rule"), (10, "z-rule"), (20, "b-rule")]);
    }

    #[test]
    fn ordering_agrees_with_equality() {
        let error = make_violation(Severity::Error, 10, "sealed-concrete-class");
        let warning = make_violation(Severity::Warning, 10, "sealed-concrete-class");
        assert_ne!(error, warning);
        assert_ne!(error.cmp(&warning), std::cmp::Ordering::Equal);

        let mut other_hint = error.clone();
        other_hint.hint.snippet = None;
        assert_ne!(error.cmp(&other_hint), std::cmp::Ordering::Equal);
        assert_eq!(error.cmp(&error.clone()), std::cmp::Ordering::Equal);
    }

    #[test]
    fn display_is_stable() {
        let v = make_violation(Severity::Error, 12, "sealed-concrete-class")
            .with_doc_ref("docs/sealed.md");
        insta::assert_snapshot!(
            v.to_string(),
            @"Ordering/src/Order.cs:12: error [DC001] Order is never extended but not sealed (see: docs/sealed.md)"
        );
    }

    #[test]
    fn format_includes_hint_and_doc_ref() {
        let v = make_violation(Severity::Error, 12, "sealed-concrete-class")
            .with_doc_ref("docs/sealed.md");
        let formatted = v.format();
        assert!(formatted.contains("= fix: add-modifier Ordering.Order `sealed`"));
        assert!(formatted.contains("= see: docs/sealed.md"));
    }

    #[test]
    fn format_omits_doc_ref_when_empty() {
        let v = make_violation(Severity::Error, 12, "sealed-concrete-class");
        assert!(!v.format().contains("see:"));
    }

    #[test]
    fn has_violations_at_threshold() {
        let mut report = Report::new();
        report
            .violations
            .push(make_violation(Severity::Warning, 1, "r"));
        assert!(!report.has_violations_at(Severity::Error));
        assert!(report.has_violations_at(Severity::Warning));
    }

    #[test]
    fn test_report_lists_all_buckets() {
        let mut report = Report::new();
        report.types_checked = 3;
        report.violations.push(make_violation(Severity::Error, 1, "r"));
        report.rule_errors.push(RuleError {
            rule: "r".to_string(),
            project: "Ordering".to_string(),
            type_name: "Order".to_string(),
            cause: "boom".to_string(),
        });

        let text = report.format_test_report(Severity::Error);
        assert!(text.contains("1 violation(s)"));
        assert!(text.contains("rule execution errors"));
        assert!(text.contains("rule `r` failed on Ordering/Order: boom"));
        assert!(!text.contains("unresolved types ---"));
    }

    #[test]
    fn diagnostic_maps_severity() {
        let v = make_violation(Severity::Warning, 1, "r");
        let d = ViolationDiagnostic::from(&v);
        assert_eq!(d.severity(), Some(miette::Severity::Warning));
        assert!(d.url().is_none());
    }
}
