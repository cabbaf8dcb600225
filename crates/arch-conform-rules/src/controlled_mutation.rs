//! Rules enforcing controlled mutation of concrete entities.
//!
//! # Rationale
//!
//! Entities change only through `Change{X}` methods that return a modified
//! copy (or nothing, when validation fails) and are created only through
//! static `Create*` factories with the same contract. Constructors and
//! setters stay out of reach so no other path can produce an unvalidated
//! instance.
//!
//! # Detected Patterns
//!
//! - `Change*` / `Create*` methods whose return type is not `Self?`
//! - `Create*` methods that are not `public static`
//! - Externally visible constructors
//! - Missing private copy constructor
//! - Externally visible setters

use arch_conform_core::model::{Accessibility, Member, MemberKind, ReturnShape, TypeSymbol};
use arch_conform_core::utils::NamePattern;
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::structural::{first_nonconforming, MemberSelector};
use crate::member_visibility::INTERNAL;

/// Mutation methods.
pub(crate) const CHANGE: NamePattern = NamePattern::prefix("Change");

/// Factory methods.
pub(crate) const CREATE: NamePattern = NamePattern::prefix("Create");

/// Public instance `Change{X}` methods, excluding their `*Internal` companions.
pub(crate) fn public_change_methods<'a>(
    symbol: &TypeSymbol<'a>,
) -> impl Iterator<Item = &'a Member> + 'a {
    symbol.methods().filter(|m| {
        m.accessibility.is_public()
            && !m.is_static
            && CHANGE.matches(&m.name)
            && !INTERNAL.matches(&m.name)
    })
}

fn rendered_return(member: &Member) -> String {
    member
        .returns
        .as_ref()
        .map_or_else(|| "void".to_string(), ToString::to_string)
}

declare_rule! {
    /// Requires `Change{X}` methods to return an optional copy of the entity.
    pub struct ChangeReturnsOptionalSelf {
        code: "DC010",
        name: "change-returns-optional-self",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "change-returns-optional-self.md",
        description: "`Change{X}` methods return the modified copy or null",
    }
}

impl ChangeReturnsOptionalSelf {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let owner = symbol.name();
        let found = public_change_methods(symbol)
            .find(|m| m.return_shape(owner) != ReturnShape::OptionalOfSelf);

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!(
                    "`{}` must return `{owner}?`, but returns `{}`",
                    method.name,
                    rendered_return(method)
                ),
                RemediationHint::new(FixAction::ChangeReturnType, member_target(symbol, method))
                    .with_snippet(format!("{owner}?")),
            )
        }))
    }
}

declare_rule! {
    /// Requires `Create*` factories to return an optional instance.
    pub struct FactoryReturnsOptionalSelf {
        code: "DC011",
        name: "factory-returns-optional-self",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "factory-returns-optional-self.md",
        description: "`Create*` factories return the new instance or null",
    }
}

impl FactoryReturnsOptionalSelf {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let owner = symbol.name();
        let found = first_nonconforming(symbol, MemberSelector::methods().named(CREATE), |m| {
            m.return_shape(owner) == ReturnShape::OptionalOfSelf
        });

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!(
                    "Factory `{}` must return `{owner}?`, but returns `{}`",
                    method.name,
                    rendered_return(method)
                ),
                RemediationHint::new(FixAction::ChangeReturnType, member_target(symbol, method))
                    .with_snippet(format!("{owner}?")),
            )
        }))
    }
}

declare_rule! {
    /// Requires `Create*` factories to be public and static.
    pub struct FactoryIsPublicStatic {
        code: "DC012",
        name: "factory-is-public-static",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "factory-is-public-static.md",
        description: "`Create*` factories are public static methods",
    }
}

impl FactoryIsPublicStatic {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::methods().named(CREATE), |m| {
            m.is_static && m.accessibility.is_public()
        });

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!("Factory `{}` must be public static", method.name),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, method))
                    .with_snippet("public static"),
            )
        }))
    }
}

declare_rule! {
    /// Forbids externally visible constructors on entities.
    pub struct NoPublicConstructors {
        code: "DC013",
        name: "no-public-constructors",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "no-public-constructors.md",
        description: "Entities are instantiated through factories, not constructors",
    }
}

impl NoPublicConstructors {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::kind(MemberKind::Constructor), |m| {
            !m.accessibility.is_externally_visible()
        });

        Ok(found.map(|ctor| {
            ctx.violation(
                self,
                ctor.line,
                format!(
                    "Constructor `{}` is {}; use a `Create*` factory instead",
                    ctor.signature(),
                    ctor.accessibility
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, ctor))
                    .with_snippet("private"),
            )
        }))
    }
}

declare_rule! {
    /// Requires a copy constructor for clone-and-replace.
    pub struct RequiresCopyConstructor {
        code: "DC014",
        name: "requires-copy-constructor",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "requires-copy-constructor.md",
        description: "Entities declare a constructor taking a single instance of themselves",
    }
}

impl RequiresCopyConstructor {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let owner = symbol.name();
        let has_copy = symbol
            .constructors()
            .any(|c| c.parameters.len() == 1 && c.parameters[0].ty.is_named(owner));
        if has_copy {
            return Ok(None);
        }

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!("`{owner}` has no copy constructor `{owner}({owner} source)`"),
            RemediationHint::new(FixAction::AddMember, symbol.fqn())
                .with_snippet(format!("private {owner}({owner} source)")),
        )))
    }
}

declare_rule! {
    /// Forbids setters reachable from outside the entity.
    pub struct NoPublicSetters {
        code: "DC015",
        name: "no-public-setters",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "no-public-setters.md",
        description: "Entity state changes only through `Change{X}` methods",
    }
}

impl NoPublicSetters {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = MemberSelector::data()
            .select(symbol)
            .filter(|m| !m.is_static)
            .find(|m| {
                m.setter_accessibility()
                    .is_some_and(Accessibility::is_externally_visible)
            });

        Ok(found.map(|member| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}.{}` can be assigned from outside; change it through `Change{}` instead",
                    symbol.name(),
                    member.name,
                    member.name
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, member))
                    .with_snippet("private set"),
            )
        }))
    }
}
