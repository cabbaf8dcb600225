//! Rule to limit the number of abstract tiers under an entity root.
//!
//! # Rationale
//!
//! Each abstract tier adds validation and extension points that every
//! concrete entity below it inherits. Deep chains make it hard to see which
//! rules an entity actually follows.
//!
//! # Configuration
//!
//! - `max_depth`: Maximum abstract tiers between a type and its root (default: 2)

use arch_conform_core::{
    Eligibility, FixAction, ModelError, RemediationHint, Rule, RuleContext, Severity, Violation,
};

use crate::detectors::lineage::path_to_root;

/// Limits abstract tiers between a type and its lineage root.
#[derive(Debug, Clone)]
pub struct MaxInheritanceDepth {
    /// Maximum number of abstract tiers.
    pub max_depth: usize,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MaxInheritanceDepth {
    fn default() -> Self {
        Self::new()
    }
}

impl MaxInheritanceDepth {
    /// Rule code.
    pub const CODE: &'static str = "DC050";

    /// Rule name.
    pub const NAME: &'static str = "max-inheritance-depth";

    /// Default maximum depth.
    pub const DEFAULT_MAX_DEPTH: usize = 2;

    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            severity: Severity::Warning,
        }
    }

    /// Sets the maximum depth.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for MaxInheritanceDepth {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn description(&self) -> &'static str {
        "Limits abstract tiers between a type and its entity root"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn eligibility(&self) -> Eligibility {
        Eligibility::Unrestricted
    }

    fn doc_ref(&self) -> &'static str {
        "max-inheritance-depth.md"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let Some(path) = path_to_root(symbol, ctx.lineage) else {
            return Ok(None);
        };
        if path.depth() <= self.max_depth {
            return Ok(None);
        }

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!(
                "`{}` sits {} abstract tiers below `{}` ({}); at most {} allowed",
                symbol.name(),
                path.depth(),
                path.root.name,
                path.describe(),
                self.max_depth
            ),
            RemediationHint::new(FixAction::Restructure, symbol.fqn()),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::testing::{evaluate, TypeBuilder};

    fn invoice() -> Vec<arch_conform_core::model::TypeDecl> {
        vec![TypeBuilder::class("Invoice")
            .line(7)
            .extends("TaxDocument", true)
            .extends("Document", true)
            .extends("Record", true)
            .extends("Entity", true)
            .build()]
    }

    #[test]
    fn test_too_deep() {
        let v = evaluate(&MaxInheritanceDepth::new(), invoice(), "Invoice")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 7);
        insta::assert_snapshot!(v.message, @"`Invoice` sits 3 abstract tiers below `Entity` (TaxDocument -> Document -> Record -> Entity); at most 2 allowed");
    }

    #[test]
    fn test_configured_depth() {
        let rule = MaxInheritanceDepth::new().max_depth(3);
        assert!(evaluate(&rule, invoice(), "Invoice").unwrap().is_none());
    }

    #[test]
    fn test_types_outside_lineage() {
        let types = vec![TypeBuilder::class("Report")
            .extends("A", true)
            .extends("B", true)
            .extends("C", true)
            .build()];
        assert!(evaluate(&MaxInheritanceDepth::new(), types, "Report")
            .unwrap()
            .is_none());
    }
}
