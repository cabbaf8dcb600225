//! Rules on how `Validate{X}` methods are written.
//!
//! # Rationale
//!
//! Validators collect every problem in one pass, so each check must run even
//! after an earlier one failed. Short-circuit operators silently skip the
//! remaining checks. Validators also route their checks through a shared
//! helper so messages and limits stay consistent.
//!
//! # Configuration
//!
//! - `helper`: Receiver validators must call (default: `ValidationHelper`)

use arch_conform_core::model::{NodeKind, Operator};
use arch_conform_core::utils::NamePattern;
use arch_conform_core::{
    Eligibility, FixAction, ModelError, RemediationHint, Rule, RuleContext, Severity, Violation,
};

use crate::detectors::body::{contains, find_in};
use crate::detectors::member_target;
use crate::detectors::structural::MemberSelector;

/// Validation methods.
pub(crate) const VALIDATE: NamePattern = NamePattern::prefix("Validate");

declare_rule! {
    /// Forbids short-circuit operators inside validators.
    pub struct NonShortCircuitValidation {
        code: "DC020",
        name: "non-short-circuit-validation",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "non-short-circuit-validation.md",
        description: "Validators combine checks with `&`/`|` so every check runs",
    }
}

impl NonShortCircuitValidation {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let validators = MemberSelector::methods().named(VALIDATE).select(symbol);
        let found = find_in(symbol, validators, |n| {
            n.kind == NodeKind::Binary && n.op.is_some_and(Operator::is_short_circuit)
        })?;

        Ok(found.and_then(|hit| {
            let op = hit.node.op?;
            let eager = op.eager_form()?;
            Some(ctx.violation(
                self,
                hit.node.line,
                format!(
                    "`{}` combines checks with `{}`; use `{eager}` so every check runs",
                    hit.member.name,
                    op.symbol()
                ),
                RemediationHint::new(
                    FixAction::ReplaceConstruct,
                    member_target(symbol, hit.member),
                )
                .with_snippet(eager),
            ))
        }))
    }
}

/// Requires validators to delegate to the shared validation helper.
#[derive(Debug, Clone)]
pub struct ValidatorsUseHelper {
    /// Receiver every validator must invoke.
    pub helper: String,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ValidatorsUseHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorsUseHelper {
    /// Rule code.
    pub const CODE: &'static str = "DC023";

    /// Rule name.
    pub const NAME: &'static str = "validators-use-helper";

    /// Default helper receiver.
    pub const DEFAULT_HELPER: &'static str = "ValidationHelper";

    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            helper: Self::DEFAULT_HELPER.to_string(),
            severity: Severity::Warning,
        }
    }

    /// Sets the helper receiver.
    #[must_use]
    pub fn helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = helper.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ValidatorsUseHelper {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn description(&self) -> &'static str {
        "Validators call the shared validation helper"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn eligibility(&self) -> Eligibility {
        Eligibility::ConcreteEntity
    }

    fn doc_ref(&self) -> &'static str {
        "validators-use-helper.md"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        for validator in MemberSelector::methods().named(VALIDATE).select(symbol) {
            if !validator.body.has_source() {
                continue;
            }
            let body = symbol.body(validator)?;
            let delegates = contains(body, |n| {
                n.kind == NodeKind::Invocation && n.target() == self.helper
            });
            if !delegates {
                return Ok(Some(ctx.violation(
                    self,
                    validator.line,
                    format!(
                        "`{}` does not call `{}`",
                        validator.name, self.helper
                    ),
                    RemediationHint::new(
                        FixAction::ReplaceConstruct,
                        member_target(symbol, validator),
                    )
                    .with_snippet(format!("{}.Validate...(...)", self.helper)),
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

    fn validator(body: Vec<arch_conform_core::model::Node>) -> arch_conform_core::model::Member {
        MemberBuilder::method("ValidateName")
            .public()
            .static_()
            .returns("bool")
            .line(20)
            .body(body)
            .build()
    }

    #[test]
    fn test_short_circuit_reported_at_operator() {
        let body = vec![node::ret(
            node::binary(
                Operator::ConditionalAnd,
                node::call_on("ValidationHelper", "Required", 21),
                node::call_on("ValidationHelper", "MaxLength", 22),
                22,
            ),
            21,
        )];
        let types = vec![TypeBuilder::entity("Order").member(validator(body)).build()];
        let v = evaluate(&NonShortCircuitValidation::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 22);
        insta::assert_snapshot!(v.message, @"`ValidateName` combines checks with `&&`; use `&` so every check runs");
        assert_eq!(v.hint.snippet.as_deref(), Some("&"));
    }

    #[test]
    fn test_first_short_circuit_wins() {
        let body = vec![
            node::local(
                "named",
                node::binary(
                    Operator::ConditionalAnd,
                    node::call_on("ValidationHelper", "Required", 21),
                    node::call_on("ValidationHelper", "MaxLength", 21),
                    21,
                ),
                21,
            ),
            node::ret(
                node::binary(
                    Operator::ConditionalOr,
                    node::ident("named", 24),
                    node::call_on("ValidationHelper", "Optional", 24),
                    24,
                ),
                24,
            ),
        ];
        let types = vec![TypeBuilder::entity("Order").member(validator(body)).build()];
        let v = evaluate(&NonShortCircuitValidation::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 21);
        assert_eq!(v.hint.snippet.as_deref(), Some("&"));
    }

    #[test]
    fn test_eager_operators_pass() {
        let body = vec![node::ret(
            node::binary(
                Operator::And,
                node::call_on("ValidationHelper", "Required", 21),
                node::call_on("ValidationHelper", "MaxLength", 22),
                22,
            ),
            21,
        )];
        let types = vec![TypeBuilder::entity("Order").member(validator(body)).build()];
        assert!(evaluate(&NonShortCircuitValidation::new(), types.clone(), "Order")
            .unwrap()
            .is_none());
        assert!(evaluate(&ValidatorsUseHelper::new(), types, "Order")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_short_circuit_outside_validators_ignored() {
        let types = vec![TypeBuilder::entity("Order")
            .member(
                MemberBuilder::method("ChangeName")
                    .public()
                    .body(vec![node::if_(
                        node::binary(
                            Operator::ConditionalOr,
                            node::is_null("name", 3),
                            node::ident("frozen", 3),
                            3,
                        ),
                        [],
                        3,
                    )])
                    .build(),
            )
            .build()];
        assert!(evaluate(&NonShortCircuitValidation::new(), types, "Order")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_validator_without_helper() {
        let body = vec![node::ret(
            node::binary(Operator::NotEqual, node::ident("name", 21), node::lit("null", 21), 21),
            21,
        )];
        let types = vec![TypeBuilder::entity("Order").member(validator(body)).build()];
        let v = evaluate(&ValidatorsUseHelper::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 20);
        assert_eq!(v.severity, Severity::Warning);
    }

    #[test]
    fn test_custom_helper_and_bodiless_validators() {
        let body = vec![node::ret(node::call_on("Checks", "Required", 21), 21)];
        let types = vec![TypeBuilder::entity("Order")
            .member(validator(body))
            .member(MemberBuilder::method("ValidateTotal").public().build())
            .build()];
        let rule = ValidatorsUseHelper::new().helper("Checks");
        assert!(evaluate(&rule, types, "Order").unwrap().is_none());
    }
}
