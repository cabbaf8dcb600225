//! Rule to forbid exceptions as a business-rule signal.
//!
//! # Rationale
//!
//! Entities report rejected changes by returning null from `Change{X}` and
//! `Create*`. Throwing is reserved for programming errors, which in practice
//! means argument guards: a throw in the `then` branch of `if (x == null)`
//! or on the right of `??`. The `else` branch and any `if` nested inside a
//! guard are business logic again.
//!
//! # Configuration
//!
//! - `allowed_exceptions`: Exception types that may be thrown anywhere
//!   (default: `["ArgumentNullException"]`)

use arch_conform_core::model::{short_type_name, Node, NodeKind, Operator};
use arch_conform_core::{
    Eligibility, FixAction, ModelError, RemediationHint, Rule, RuleContext, Severity, Violation,
};

use crate::detectors::body::find_with_ancestors;
use crate::detectors::member_target;

/// Forbids throwing outside argument guards.
#[derive(Debug, Clone)]
pub struct NoBusinessExceptions {
    /// Exception types allowed anywhere.
    pub allowed_exceptions: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoBusinessExceptions {
    fn default() -> Self {
        Self::new()
    }
}

impl NoBusinessExceptions {
    /// Rule code.
    pub const CODE: &'static str = "DC021";

    /// Rule name.
    pub const NAME: &'static str = "no-business-exceptions";

    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed_exceptions: vec!["ArgumentNullException".to_string()],
            severity: Severity::Error,
        }
    }

    /// Replaces the allowed exception types.
    #[must_use]
    pub fn allowed_exceptions(mut self, allowed: Vec<String>) -> Self {
        self.allowed_exceptions = allowed;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_allowed(&self, thrown: &str) -> bool {
        let thrown = short_type_name(thrown);
        !thrown.is_empty()
            && self
                .allowed_exceptions
                .iter()
                .any(|a| short_type_name(a) == thrown)
    }
}

/// A null test, or a short-circuit combination of null tests.
fn is_guard_condition(cond: &Node) -> bool {
    if cond.is_null_check() {
        return true;
    }
    cond.kind == NodeKind::Binary
        && cond.op.is_some_and(Operator::is_short_circuit)
        && !cond.children.is_empty()
        && cond.children.iter().all(is_guard_condition)
}

/// True if `throw` sits in a guard: directly in the `then` branch of an `if`
/// on a guard condition, or in the fallback of a `??` below any `if`.
///
/// `path` holds the enclosing nodes, outermost first. Only the innermost `if`
/// counts, so business checks nested inside a guard are not guards.
fn is_guarded(path: &[&Node], throw: &Node) -> bool {
    let child_at = |depth: usize| path.get(depth + 1).copied().unwrap_or(throw);
    let innermost_if = path.iter().rposition(|n| n.kind == NodeKind::If);

    let below_if = innermost_if.map_or(0, |depth| depth + 1);
    let in_fallback = path
        .iter()
        .enumerate()
        .skip(below_if)
        .any(|(depth, ancestor)| {
            ancestor.kind == NodeKind::Binary
                && ancestor.op == Some(Operator::Coalesce)
                && ancestor
                    .children
                    .get(1)
                    .is_some_and(|fallback| std::ptr::eq(fallback, child_at(depth)))
        });
    if in_fallback {
        return true;
    }

    let Some(depth) = innermost_if else {
        return false;
    };
    let guard = path[depth];
    guard
        .then_branch()
        .is_some_and(|then| std::ptr::eq(then, child_at(depth)))
        && guard.condition().is_some_and(is_guard_condition)
}

impl Rule for NoBusinessExceptions {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn description(&self) -> &'static str {
        "Business rules reject changes by returning null, not by throwing"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn eligibility(&self) -> Eligibility {
        Eligibility::ConcreteEntity
    }

    fn doc_ref(&self) -> &'static str {
        "no-business-exceptions.md"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        for member in symbol
            .members()
            .filter(|m| m.is_method() || m.is_constructor())
        {
            let body = symbol.body(member)?;
            let found = find_with_ancestors(body, &mut |node, path| {
                node.kind == NodeKind::Throw
                    && !self.is_allowed(node.name())
                    && !is_guarded(path, node)
            });
            if let Some(throw) = found {
                let thrown = if throw.name().is_empty() {
                    "an exception".to_string()
                } else {
                    format!("`{}`", throw.name())
                };
                return Ok(Some(ctx.violation(
                    self,
                    throw.line,
                    format!(
                        "`{}` throws {thrown} outside an argument guard; return null instead",
                        member.name
                    ),
                    RemediationHint::new(FixAction::ReplaceConstruct, member_target(symbol, member))
                        .with_snippet("return null;"),
                )));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::testing::{evaluate, node, MemberBuilder, TypeBuilder};

    fn order_with(body: Vec<Node>) -> Vec<arch_conform_core::model::TypeDecl> {
        vec![TypeBuilder::entity("Order")
            .member(
                MemberBuilder::method("ChangeTotal")
                    .public()
                    .returns_optional("Order")
                    .body(body)
                    .build(),
            )
            .build()]
    }

    #[test]
    fn test_business_throw_is_reported() {
        let body = vec![node::if_(
            node::binary(Operator::Less, node::ident("total", 4), node::lit("0", 4), 4),
            [node::throw("InvalidOperationException", 5)],
            4,
        )];
        let v = evaluate(&NoBusinessExceptions::new(), order_with(body), "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 5);
        insta::assert_snapshot!(v.message, @"`ChangeTotal` throws `InvalidOperationException` outside an argument guard; return null instead");
    }

    #[test]
    fn test_null_guards_are_allowed() {
        let body = vec![
            node::if_(
                node::binary(
                    Operator::ConditionalOr,
                    node::is_null("clock", 3),
                    node::is_null("user", 3),
                    3,
                ),
                [node::throw("ArgumentException", 4)],
                3,
            ),
            node::local(
                "name",
                node::binary(
                    Operator::Coalesce,
                    node::ident("input", 6),
                    node::throw("InvalidOperationException", 6),
                    6,
                ),
                6,
            ),
            node::stmt(node::throw("System.ArgumentNullException", 8)),
        ];
        assert!(evaluate(&NoBusinessExceptions::new(), order_with(body), "Order")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_else_branch_of_null_guard_is_reported() {
        let body = vec![node::if_else(
            node::is_null("clock", 3),
            [node::ret(node::lit("null", 4), 4)],
            [node::throw("InvalidOperationException", 6)],
            3,
        )];
        let v = evaluate(&NoBusinessExceptions::new(), order_with(body), "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 6);
    }

    #[test]
    fn test_business_check_nested_in_null_guard_is_reported() {
        let body = vec![node::if_(
            node::is_null("clock", 3),
            [node::if_(
                node::binary(Operator::Less, node::ident("total", 4), node::lit("0", 4), 4),
                [node::throw("InvalidOperationException", 5)],
                4,
            )],
            3,
        )];
        let v = evaluate(&NoBusinessExceptions::new(), order_with(body), "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 5);
    }

    #[test]
    fn test_first_unguarded_throw_wins() {
        let body = vec![
            node::if_(
                node::ident("frozen", 3),
                [node::throw("InvalidOperationException", 4)],
                3,
            ),
            node::stmt(node::throw("DomainException", 7)),
        ];
        let v = evaluate(&NoBusinessExceptions::new(), order_with(body), "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 4);
        assert!(v.message.contains("InvalidOperationException"));
    }

    #[test]
    fn test_mixed_condition_is_not_a_guard() {
        let body = vec![node::if_(
            node::binary(
                Operator::ConditionalOr,
                node::is_null("name", 3),
                node::ident("frozen", 3),
                3,
            ),
            [node::throw("ArgumentException", 4)],
            3,
        )];
        let v = evaluate(&NoBusinessExceptions::new(), order_with(body), "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 4);
    }

    #[test]
    fn test_allowed_exceptions_are_configurable() {
        let body = vec![node::stmt(node::throw("DomainException", 3))];
        let rule = NoBusinessExceptions::new().allowed_exceptions(vec!["DomainException".into()]);
        assert!(evaluate(&rule, order_with(body), "Order").unwrap().is_none());
    }

    #[test]
    fn test_constructor_bodies_are_checked() {
        let types = vec![TypeBuilder::entity("Order")
            .member(
                MemberBuilder::constructor("Order")
                    .private()
                    .body(vec![node::stmt(node::throw("Exception", 2))])
                    .build(),
            )
            .build()];
        let v = evaluate(&NoBusinessExceptions::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.hint.target, "Order.Order");
    }
}
