//! Rules on the methods that accompany each `Change{X}`.
//!
//! # Rationale
//!
//! A `Change{X}` method is a thin shell: it clones, delegates the actual
//! write to a private `Change{X}Internal`, then runs `Validate{X}` on the
//! result. Keeping the three apart lets the write be reused by factories
//! and the check be reused by callers that only want to validate input.
//!
//! # Detected Patterns
//!
//! - `Change{X}` without an `*Internal` companion it can reach
//! - `Change{X}` without `Validate{X}`
//! - `*Internal` methods nothing calls

use arch_conform_core::model::Member;
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::controlled_mutation::{public_change_methods, CHANGE};
use crate::detectors::cross_member::CallGraph;
use crate::detectors::member_target;
use crate::detectors::structural::MemberSelector;
use crate::member_visibility::INTERNAL;

fn rendered_parameters(method: &Member) -> String {
    method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

declare_rule! {
    /// Requires each `Change{X}` to delegate to an `*Internal` method.
    pub struct ChangeHasInternal {
        code: "DC030",
        name: "change-has-internal",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "change-has-internal.md",
        description: "`Change{X}` delegates the write to a private `Change{X}Internal`",
    }
}

impl ChangeHasInternal {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let graph = CallGraph::build(symbol)?;

        let found = public_change_methods(symbol).find(|method| {
            let companion = format!("{}Internal", method.name);
            !symbol.has_member(&companion) && !graph.reaches(&method.name, |m| INTERNAL.matches(m))
        });

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!(
                    "`{}` has no `{}Internal` companion and calls no `*Internal` method",
                    method.name, method.name
                ),
                RemediationHint::new(FixAction::AddMember, symbol.fqn()).with_snippet(format!(
                    "private void {}Internal({})",
                    method.name,
                    rendered_parameters(method)
                )),
            )
        }))
    }
}

declare_rule! {
    /// Requires a `Validate{X}` for each `Change{X}`.
    pub struct ChangeHasValidator {
        code: "DC032",
        name: "change-has-validator",
        severity: Warning,
        eligibility: ConcreteEntity,
        doc: "change-has-validator.md",
        description: "Every `Change{X}` has a matching `Validate{X}`",
    }
}

impl ChangeHasValidator {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = public_change_methods(symbol).find_map(|method| {
            let property = CHANGE.capture(&method.name).filter(|p| !p.is_empty())?;
            let validator = format!("Validate{property}");
            (!symbol.has_member(&validator)).then_some((method, validator))
        });

        Ok(found.map(|(method, validator)| {
            let params = rendered_parameters(method);
            let params = if params.is_empty() {
                "ICollection<string> errors".to_string()
            } else {
                format!("{params}, ICollection<string> errors")
            };
            ctx.violation(
                self,
                method.line,
                format!("`{}` has no matching `{validator}`", method.name),
                RemediationHint::new(FixAction::AddMember, symbol.fqn())
                    .with_snippet(format!("public static bool {validator}({params})")),
            )
        }))
    }
}

declare_rule! {
    /// Flags `*Internal` methods that no other method calls.
    pub struct InternalMethodsReachable {
        code: "DC033",
        name: "internal-methods-reachable",
        severity: Info,
        eligibility: ConcreteEntity,
        doc: "internal-methods-reachable.md",
        description: "`*Internal` methods are called from the entity's own methods",
    }
}

impl InternalMethodsReachable {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let mut internals = MemberSelector::methods().named(INTERNAL).select(symbol).peekable();
        if internals.peek().is_none() {
            return Ok(None);
        }
        let graph = CallGraph::build(symbol)?;

        Ok(internals
            .find(|m| !graph.is_called(&m.name))
            .map(|method| {
                ctx.violation(
                    self,
                    method.line,
                    format!("`{}` is never called by another method", method.name),
                    RemediationHint::new(FixAction::RemoveConstruct, member_target(symbol, method)),
                )
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::testing::{evaluate, node, MemberBuilder, TypeBuilder};
    use arch_conform_core::Severity;

    fn change_name(body: Vec<arch_conform_core::model::Node>) -> Member {
        MemberBuilder::method("ChangeName")
            .public()
            .returns_optional("Order")
            .param("name", "string")
            .line(10)
            .body(body)
            .build()
    }

    #[test]
    fn test_missing_internal_companion() {
        let types = vec![TypeBuilder::entity("Order")
            .member(change_name(vec![]))
            .build()];
        let v = evaluate(&ChangeHasInternal::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 10);
        assert_eq!(
            v.hint.snippet.as_deref(),
            Some("private void ChangeNameInternal(string name)")
        );
    }

    #[test]
    fn test_companion_by_name_or_call() {
        let by_name = vec![TypeBuilder::entity("Order")
            .member(change_name(vec![]))
            .member(MemberBuilder::method("ChangeNameInternal").private().build())
            .build()];
        assert!(evaluate(&ChangeHasInternal::new(), by_name, "Order")
            .unwrap()
            .is_none());

        let by_call = vec![TypeBuilder::entity("Order")
            .member(change_name(vec![node::stmt(node::call_on(
                "clone",
                "ApplyInternal",
                11,
            ))]))
            .member(MemberBuilder::method("ApplyInternal").private().build())
            .build()];
        assert!(evaluate(&ChangeHasInternal::new(), by_call, "Order")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_validator() {
        let types = vec![TypeBuilder::entity("Order")
            .member(change_name(vec![]))
            .build()];
        let v = evaluate(&ChangeHasValidator::new(), types, "Order")
            .unwrap()
            .unwrap();
        insta::assert_snapshot!(v.message, @"`ChangeName` has no matching `ValidateName`");
        assert_eq!(
            v.hint.snippet.as_deref(),
            Some("public static bool ValidateName(string name, ICollection<string> errors)")
        );
    }

    #[test]
    fn test_validator_present() {
        let types = vec![TypeBuilder::entity("Order")
            .member(change_name(vec![]))
            .member(MemberBuilder::method("ValidateName").public().static_().build())
            .member(MemberBuilder::method("Change").public().build())
            .build()];
        assert!(evaluate(&ChangeHasValidator::new(), types, "Order")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_orphan_internal() {
        let types = vec![TypeBuilder::entity("Order")
            .member(change_name(vec![node::stmt(node::call(
                "ChangeNameInternal",
                11,
            ))]))
            .member(MemberBuilder::method("ChangeNameInternal").private().line(20).build())
            .member(MemberBuilder::method("ResetInternal").private().line(30).build())
            .build()];
        let v = evaluate(&InternalMethodsReachable::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 30);
        assert_eq!(v.severity, Severity::Info);
    }
}
