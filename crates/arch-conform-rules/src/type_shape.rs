//! Rules on the shape of capabilities and value aggregates.

use arch_conform_core::model::{MemberKind, Mutability};
use arch_conform_core::utils::naming::has_capability_prefix;
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::structural::{first_nonconforming, MemberSelector};

declare_rule! {
    /// Requires capability names to start with `I`.
    pub struct CapabilityNamePrefix {
        code: "DC006",
        name: "capability-name-prefix",
        severity: Warning,
        eligibility: Unrestricted,
        doc: "capability-name-prefix.md",
        description: "Capabilities (interfaces) are named `I` followed by an uppercase letter",
    }
}

impl CapabilityNamePrefix {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        if !symbol.is_capability() || has_capability_prefix(symbol.name()) {
            return Ok(None);
        }

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!("Capability `{}` must be named `I{}`", symbol.name(), symbol.name()),
            RemediationHint::new(FixAction::Rename, symbol.fqn())
                .with_snippet(format!("I{}", symbol.name())),
        )))
    }
}

declare_rule! {
    /// Requires value aggregates to be immutable.
    pub struct ValueAggregateImmutable {
        code: "DC007",
        name: "value-aggregate-immutable",
        severity: Error,
        eligibility: Unrestricted,
        doc: "value-aggregate-immutable.md",
        description: "Value aggregates must not have freely assignable stored members",
    }
}

impl ValueAggregateImmutable {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        if !symbol.is_value_aggregate() {
            return Ok(None);
        }

        let found = first_nonconforming(symbol, MemberSelector::data(), |m| {
            m.is_static || !m.is_stored() || m.mutability != Mutability::Mutable
        });

        Ok(found.map(|member| {
            let modifier = if member.kind == MemberKind::Field {
                "readonly"
            } else {
                "init"
            };
            ctx.violation(
                self,
                member.line,
                format!(
                    "Value aggregate `{}` has assignable member `{}`",
                    symbol.name(),
                    member.name
                ),
                RemediationHint::new(FixAction::AddModifier, member_target(symbol, member))
                    .with_snippet(modifier),
            )
        }))
    }
}
