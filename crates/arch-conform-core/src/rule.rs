//! The rule contract and eligibility filters.

use crate::context::RuleContext;
use crate::error::ModelError;
use crate::lineage::Lineage;
use crate::model::TypeSymbol;
use crate::types::{Severity, Violation};

/// Which types a rule applies to.
///
/// A type outside a rule's eligibility is "not applicable": the rule's
/// detector never runs for it and nothing is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eligibility {
    /// Every declared type.
    Unrestricted,
    /// Concrete classes that descend from a lineage root.
    ConcreteEntity,
    /// Abstract, non-static classes that descend from a lineage root.
    AbstractTier,
}

impl Eligibility {
    /// Returns true if `symbol` passes this filter.
    #[must_use]
    pub fn admits(self, symbol: &TypeSymbol<'_>, lineage: &Lineage) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::ConcreteEntity => symbol.is_concrete_class() && lineage.contains(symbol),
            Self::AbstractTier => {
                symbol.kind() == crate::model::TypeKind::Class
                    && symbol.is_abstract()
                    && !symbol.is_static()
                    && !lineage.is_root(symbol.name())
                    && lineage.contains(symbol)
            }
        }
    }

    /// Short label used by `list-rules`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unrestricted => "any",
            Self::ConcreteEntity => "entity",
            Self::AbstractTier => "abstract",
        }
    }
}

/// A conformance rule evaluated against one declared type at a time.
///
/// Rules are stateless and shared across worker threads. A rule returns at
/// most one violation per type: the first non-conforming member or construct
/// it finds.
///
/// # Example
///
/// ```ignore
/// use arch_conform_core::{Rule, RuleContext, ModelError, Violation};
///
/// pub struct NoStaticEntities;
///
/// impl Rule for NoStaticEntities {
///     fn name(&self) -> &'static str { "no-static-entities" }
///     fn code(&self) -> &'static str { "DC900" }
///     fn doc_ref(&self) -> &'static str { "no-static-entities.md" }
///
///     fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
///         Ok(None)
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "sealed-concrete-class").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "DC001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Which types this rule applies to.
    fn eligibility(&self) -> Eligibility {
        Eligibility::Unrestricted
    }

    /// Remediation document, relative to the configured docs base.
    fn doc_ref(&self) -> &'static str;

    /// Runs the detector on an eligible type.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when the symbol has a shape the detector
    /// cannot interpret (for example a malformed member body).
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError>;

    /// Applies the eligibility filter, then the detector.
    ///
    /// # Errors
    ///
    /// Propagates detector errors.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        if !self.eligibility().admits(&ctx.symbol, ctx.lineage) {
            return Ok(None);
        }
        self.check(ctx)
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectSnapshot, Workspace, WorkspaceIndex};
    use crate::testing::TypeBuilder;
    use crate::types::{FixAction, RemediationHint};

    struct FlagEverything;

    impl Rule for FlagEverything {
        fn name(&self) -> &'static str {
            "flag-everything"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn eligibility(&self) -> Eligibility {
            Eligibility::ConcreteEntity
        }
        fn doc_ref(&self) -> &'static str {
            "flag.md"
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
            Ok(Some(ctx.violation(
                self,
                ctx.symbol.line(),
                "flagged",
                RemediationHint::new(FixAction::Restructure, ctx.symbol.fqn()),
            )))
        }
    }

    #[test]
    fn filter_runs_before_detector() {
        let ws = Workspace::new(vec![ProjectSnapshot::new(
            "Domain",
            vec![
                TypeBuilder::class("Order").extends("Entity", true).build(),
                TypeBuilder::class("Helper").build(),
            ],
        )]);
        let (index, _) = WorkspaceIndex::build(&ws);
        let lineage = Lineage::default();

        let results: Vec<bool> = ws
            .declarations()
            .map(|(project, decl, container)| {
                let symbol = TypeSymbol::new(project, decl, container, &index);
                let ctx = RuleContext::new(symbol, &lineage, "");
                FlagEverything.evaluate(&ctx).unwrap().is_some()
            })
            .collect();
        assert_eq!(results, vec![true, false]);
    }

    #[test]
    fn abstract_tier_excludes_root_itself() {
        let ws = Workspace::new(vec![ProjectSnapshot::new(
            "Domain",
            vec![
                TypeBuilder::class("Entity").abstract_().build(),
                TypeBuilder::class("Document")
                    .abstract_()
                    .extends("Entity", true)
                    .build(),
            ],
        )]);
        let (index, _) = WorkspaceIndex::build(&ws);
        let lineage = Lineage::default();
        let admitted: Vec<&str> = ws
            .declarations()
            .filter(|(project, decl, container)| {
                let symbol = TypeSymbol::new(project, decl, *container, &index);
                Eligibility::AbstractTier.admits(&symbol, &lineage)
            })
            .map(|(_, d, _)| d.name.as_str())
            .collect();
        assert_eq!(admitted, vec!["Document"]);
    }
}
