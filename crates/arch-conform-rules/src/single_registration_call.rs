//! Rule limiting change registration to one call per public method.
//!
//! # Rationale
//!
//! Each public operation on an entity records exactly one change event.
//! Registering twice from the same method produces duplicate events
//! downstream.
//!
//! # Configuration
//!
//! - `methods`: Registration method names (default: `["RegisterChange"]`)

use arch_conform_core::{
    Eligibility, FixAction, ModelError, RemediationHint, Rule, RuleContext, Severity, Violation,
};

use crate::detectors::cross_member::invocations_of;
use crate::detectors::member_target;
use crate::detectors::structural::MemberSelector;

/// Forbids more than one registration call per public method.
#[derive(Debug, Clone)]
pub struct SingleRegistrationCall {
    /// Names of the registration methods.
    pub methods: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for SingleRegistrationCall {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleRegistrationCall {
    /// Rule code.
    pub const CODE: &'static str = "DC031";

    /// Rule name.
    pub const NAME: &'static str = "single-registration-call";

    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            methods: vec!["RegisterChange".to_string()],
            severity: Severity::Error,
        }
    }

    /// Replaces the registration method names.
    #[must_use]
    pub fn methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for SingleRegistrationCall {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn description(&self) -> &'static str {
        "Each public method registers its change at most once"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn eligibility(&self) -> Eligibility {
        Eligibility::ConcreteEntity
    }

    fn doc_ref(&self) -> &'static str {
        "single-registration-call.md"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        for method in MemberSelector::methods().public().select(symbol) {
            let calls = invocations_of(symbol.body(method)?, &self.methods);
            if let [_, second, ..] = calls.as_slice() {
                return Ok(Some(ctx.violation(
                    self,
                    second.line,
                    format!(
                        "`{}` calls `{}` {} times; register the change once",
                        method.name,
                        second.name(),
                        calls.len()
                    ),
                    RemediationHint::new(FixAction::RemoveConstruct, member_target(symbol, method)),
                )));
            }
        }
        Ok(None)
    }
}
