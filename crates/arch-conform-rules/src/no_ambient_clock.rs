//! Rule to forbid reading the system clock inside entities.
//!
//! Entities receive the current time from an injected clock so behavior
//! that depends on it stays testable and deterministic.

use arch_conform_core::model::{short_type_name, NodeKind};
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::body::find_in;
use crate::detectors::member_target;

const CLOCK_TYPES: &[&str] = &["DateTime", "DateTimeOffset"];
const CLOCK_READS: &[&str] = &["Now", "UtcNow", "Today"];

declare_rule! {
    /// Forbids `DateTime.Now` and friends in entity members.
    pub struct NoAmbientClock {
        code: "DC025",
        name: "no-ambient-clock",
        severity: Warning,
        eligibility: ConcreteEntity,
        doc: "no-ambient-clock.md",
        description: "Entities take the current time from an injected clock",
    }
}

impl NoAmbientClock {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = find_in(symbol, symbol.members(), |n| {
            n.kind == NodeKind::MemberAccess
                && CLOCK_TYPES.contains(&short_type_name(n.target()))
                && CLOCK_READS.contains(&n.name())
        })?;

        Ok(found.map(|hit| {
            ctx.violation(
                self,
                hit.node.line,
                format!(
                    "`{}` reads `{}.{}`; take the time from an injected clock",
                    hit.member.name,
                    hit.node.target(),
                    hit.node.name()
                ),
                RemediationHint::new(FixAction::ReplaceConstruct, member_target(symbol, hit.member))
                    .with_snippet("clock.UtcNow"),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::testing::{evaluate, node, MemberBuilder, TypeBuilder};

    #[test]
    fn test_clock_read_in_property() {
        let types = vec![TypeBuilder::entity("Subscription")
            .member(
                MemberBuilder::property("IsExpired", "bool")
                    .public()
                    .computed()
                    .body(vec![node::ret(
                        node::binary(
                            arch_conform_core::model::Operator::Greater,
                            node::access("System.DateTime", "UtcNow", 14),
                            node::ident("ExpiresAt", 14),
                            14,
                        ),
                        14,
                    )])
                    .build(),
            )
            .build()];
        let v = evaluate(&NoAmbientClock::new(), types, "Subscription")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 14);
        insta::assert_snapshot!(v.message, @"`IsExpired` reads `System.DateTime.UtcNow`; take the time from an injected clock");
    }

    #[test]
    fn test_injected_clock_passes() {
        let types = vec![TypeBuilder::entity("Subscription")
            .member(
                MemberBuilder::method("Renew")
                    .public()
                    .param("clock", "IClock")
                    .body(vec![node::local(
                        "now",
                        node::access("clock", "UtcNow", 3),
                        3,
                    )])
                    .build(),
            )
            .build()];
        assert!(evaluate(&NoAmbientClock::new(), types, "Subscription")
            .unwrap()
            .is_none());
    }
}
