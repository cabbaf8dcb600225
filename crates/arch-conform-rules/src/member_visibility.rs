//! Rules on member accessibility that hold for every type.
//!
//! # Detected Patterns
//!
//! - `no-public-fields`: public non-constant fields
//! - `underscore-members-private`: `_name` members that are not private
//! - `internal-methods-not-public`: `*Internal` methods visible outside the hierarchy
//! - `no-public-static-mutable-state`: static properties or fields assignable from outside

use arch_conform_core::model::{Accessibility, MemberKind, Mutability};
use arch_conform_core::utils::NamePattern;
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::structural::{first_nonconforming, MemberSelector};

/// Methods that only the type itself (or its subtypes) may call.
pub(crate) const INTERNAL: NamePattern = NamePattern::suffix("Internal");

declare_rule! {
    /// Forbids public fields.
    pub struct NoPublicFields {
        code: "DC002",
        name: "no-public-fields",
        severity: Error,
        eligibility: Unrestricted,
        doc: "no-public-fields.md",
        description: "State must be exposed through properties, never public fields",
    }
}

impl NoPublicFields {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        if symbol.is_enumeration() {
            return Ok(None);
        }

        let found = first_nonconforming(symbol, MemberSelector::kind(MemberKind::Field), |m| {
            !m.accessibility.is_public() || m.mutability == Mutability::Constant
        });

        Ok(found.map(|field| {
            ctx.violation(
                self,
                field.line,
                format!("`{}.{}` is a public field", symbol.name(), field.name),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, field))
                    .with_snippet("private"),
            )
        }))
    }
}

declare_rule! {
    /// Requires underscore-prefixed members to be private.
    pub struct UnderscoreMembersPrivate {
        code: "DC003",
        name: "underscore-members-private",
        severity: Info,
        eligibility: Unrestricted,
        doc: "underscore-members-private.md",
        description: "Members named with a leading underscore must be private",
    }
}

impl UnderscoreMembersPrivate {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = symbol
            .members()
            .find(|m| m.name.starts_with('_') && !m.accessibility.is_private());

        Ok(found.map(|member| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}` is named as private state but is {}",
                    member.name, member.accessibility
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, member))
                    .with_snippet("private"),
            )
        }))
    }
}

declare_rule! {
    /// Keeps `*Internal` methods out of the public surface.
    pub struct InternalMethodsNotPublic {
        code: "DC004",
        name: "internal-methods-not-public",
        severity: Error,
        eligibility: Unrestricted,
        doc: "internal-methods-not-public.md",
        description: "Methods ending in `Internal` must be private or protected",
    }
}

impl InternalMethodsNotPublic {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::methods().named(INTERNAL), |m| {
            m.accessibility.is_hierarchy_only()
        });

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!(
                    "`{}` is {} but must only be reachable from `{}` itself",
                    method.name,
                    method.accessibility,
                    symbol.name()
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, method))
                    .with_snippet("private"),
            )
        }))
    }
}

declare_rule! {
    /// Forbids global mutable state.
    pub struct NoPublicStaticMutableState {
        code: "DC005",
        name: "no-public-static-mutable-state",
        severity: Error,
        eligibility: Unrestricted,
        doc: "no-public-static-mutable-state.md",
        description: "Static properties and fields must not be assignable from outside the type",
    }
}

impl NoPublicStaticMutableState {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = MemberSelector::data()
            .select(symbol)
            .filter(|m| m.is_static)
            .find(|m| {
                m.setter_accessibility()
                    .is_some_and(Accessibility::is_externally_visible)
            });

        Ok(found.map(|member| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}.{}` is static state anyone can reassign",
                    symbol.name(),
                    member.name
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, member))
                    .with_snippet("private set"),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::testing::{evaluate, MemberBuilder, TypeBuilder};

    #[test]
    fn test_public_field_flagged() {
        let types = vec![TypeBuilder::class("Order")
            .member(MemberBuilder::field("MaxLines", "int").public().mutability(Mutability::Constant).line(3).build())
            .member(MemberBuilder::field("total", "decimal").public().line(5).build())
            .build()];
        let v = evaluate(&NoPublicFields::new(), types, "Order").unwrap().unwrap();
        assert_eq!(v.location.line, 5);
        assert_eq!(v.hint.target, "Order.total");
    }

    #[test]
    fn test_private_fields_pass() {
        let types = vec![TypeBuilder::class("Order")
            .member(MemberBuilder::field("_total", "decimal").private().build())
            .build()];
        assert!(evaluate(&NoPublicFields::new(), types, "Order").unwrap().is_none());
    }

    #[test]
    fn test_underscore_member_must_be_private() {
        let types = vec![TypeBuilder::class("Order")
            .member(MemberBuilder::field("_lines", "List").protected().line(8).build())
            .build()];
        let v = evaluate(&UnderscoreMembersPrivate::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 8);
        assert_eq!(v.severity, arch_conform_core::Severity::Info);
    }

    #[test]
    fn test_internal_method_visibility() {
        let types = vec![TypeBuilder::class("Order")
            .member(MemberBuilder::method("ChangeNameInternal").protected().line(3).build())
            .member(MemberBuilder::method("ChangeTotalInternal").public().line(9).build())
            .build()];
        let v = evaluate(&InternalMethodsNotPublic::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 9);
        insta::assert_snapshot!(
            v.message,
            @"`ChangeTotalInternal` is public but must only be reachable from `Order` itself"
        );
    }

    #[test]
    fn test_static_mutable_state() {
        let types = vec![TypeBuilder::class("Settings")
            .member(
                MemberBuilder::property("Limit", "int")
                    .public()
                    .static_()
                    .setter(Accessibility::Private)
                    .line(2)
                    .build(),
            )
            .member(
                MemberBuilder::property("Cache", "Dictionary")
                    .public()
                    .static_()
                    .mutable()
                    .line(4)
                    .build(),
            )
            .build()];
        let v = evaluate(&NoPublicStaticMutableState::new(), types, "Settings")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 4);
    }

    #[test]
    fn test_instance_mutable_state_is_not_static_state() {
        let types = vec![TypeBuilder::class("Settings")
            .member(MemberBuilder::property("Limit", "int").public().mutable().build())
            .build()];
        assert!(evaluate(&NoPublicStaticMutableState::new(), types, "Settings")
            .unwrap()
            .is_none());
    }
}
