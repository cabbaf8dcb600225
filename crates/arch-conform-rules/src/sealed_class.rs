//! Rule requiring concrete classes nobody extends to be sealed.
//!
//! # Rationale
//!
//! An open class invites subclasses that bypass the clone-and-replace
//! mutation path. A concrete class with no subtypes anywhere in the
//! workspace gains nothing from staying open.
//!
//! # Detected Patterns
//!
//! - Concrete (non-abstract, non-static, non-value) classes that are not
//!   final and have no subtype in any inspected project

use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

declare_rule! {
    /// Requires concrete classes without subtypes to be sealed.
    pub struct SealedConcreteClass {
        code: "DC001",
        name: "sealed-concrete-class",
        severity: Error,
        eligibility: Unrestricted,
        doc: "sealed-concrete-class.md",
        description: "Concrete classes that are never extended must be sealed",
    }
}

impl SealedConcreteClass {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        if !symbol.is_concrete_class() || symbol.is_final() || symbol.has_subtypes() {
            return Ok(None);
        }

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!(
                "`{}` is never extended but is not sealed",
                symbol.name()
            ),
            RemediationHint::new(FixAction::AddModifier, symbol.fqn()).with_snippet("sealed"),
        )))
    }
}
