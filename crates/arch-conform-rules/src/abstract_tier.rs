//! Rules for abstract tiers between an entity root and concrete entities.
//!
//! # Rationale
//!
//! An abstract tier contributes shared state and validation to the entities
//! below it. It exposes a single public static `Validate` orchestrator that
//! concrete validators call, keeps its extension points protected and never
//! grows a public instance surface of its own.
//!
//! # Detected Patterns
//!
//! - Missing `public static bool Validate({Type} entity, ...)`
//! - Public abstract or virtual methods
//! - Public instance methods other than `Equals`, `GetHashCode` and `ToString`
//! - `Validate*` methods that are not public static
//! - Constructors that are not protected

use arch_conform_core::model::{Accessibility, MemberKind};
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::structural::{first_nonconforming, MemberSelector};
use crate::validation_bodies::VALIDATE;

const OBJECT_OVERRIDES: &[&str] = &["Equals", "GetHashCode", "ToString"];

fn is_protected(accessibility: Accessibility) -> bool {
    matches!(
        accessibility,
        Accessibility::Protected | Accessibility::PrivateProtected
    )
}

declare_rule! {
    /// Requires a public static validation orchestrator on abstract tiers.
    pub struct AbstractTierValidateOrchestrator {
        code: "DC060",
        name: "abstract-tier-validate-orchestrator",
        severity: Error,
        eligibility: AbstractTier,
        doc: "abstract-tier-validate-orchestrator.md",
        description: "Abstract tiers expose `public static Validate({Type} entity, ...)`",
    }
}

impl AbstractTierValidateOrchestrator {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let owner = symbol.name();
        let has_orchestrator = symbol.methods().any(|m| {
            m.name == "Validate"
                && m.is_static
                && m.accessibility.is_public()
                && m.parameters.first().is_some_and(|p| p.ty.is_named(owner))
        });
        if has_orchestrator {
            return Ok(None);
        }

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!("Abstract tier `{owner}` has no `public static Validate({owner} entity, ...)`"),
            RemediationHint::new(FixAction::AddMember, symbol.fqn()).with_snippet(format!(
                "public static bool Validate({owner} entity, ICollection<string> errors)"
            )),
        )))
    }
}

declare_rule! {
    /// Requires extension points on abstract tiers to be protected.
    pub struct AbstractTierExtensionPointsProtected {
        code: "DC061",
        name: "abstract-tier-extension-points-protected",
        severity: Error,
        eligibility: AbstractTier,
        doc: "abstract-tier-extension-points-protected.md",
        description: "Abstract and virtual methods of abstract tiers are protected",
    }
}

impl AbstractTierExtensionPointsProtected {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::methods(), |m| {
            !(m.is_abstract || m.is_virtual) || m.is_override || is_protected(m.accessibility)
        });

        Ok(found.map(|method| {
            let kind = if method.is_abstract { "abstract" } else { "virtual" };
            ctx.violation(
                self,
                method.line,
                format!(
                    "Extension point `{}` is {kind} and {}; make it protected",
                    method.name, method.accessibility
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, method))
                    .with_snippet("protected"),
            )
        }))
    }
}

declare_rule! {
    /// Forbids a public instance surface on abstract tiers.
    pub struct AbstractTierNoPublicInstanceMethods {
        code: "DC062",
        name: "abstract-tier-no-public-instance-methods",
        severity: Warning,
        eligibility: AbstractTier,
        doc: "abstract-tier-no-public-instance-methods.md",
        description: "Abstract tiers declare no public instance methods of their own",
    }
}

impl AbstractTierNoPublicInstanceMethods {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = MemberSelector::methods().public().select(symbol).find(|m| {
            !m.is_static && !m.is_override && !OBJECT_OVERRIDES.contains(&m.name.as_str())
        });

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!(
                    "Abstract tier `{}` declares public instance method `{}`",
                    symbol.name(),
                    method.name
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, method))
                    .with_snippet("protected"),
            )
        }))
    }
}

declare_rule! {
    /// Requires validators on abstract tiers to be public static.
    pub struct AbstractTierValidatorsPublicStatic {
        code: "DC063",
        name: "abstract-tier-validators-public-static",
        severity: Error,
        eligibility: AbstractTier,
        doc: "abstract-tier-validators-public-static.md",
        description: "`Validate*` methods of abstract tiers are public static",
    }
}

impl AbstractTierValidatorsPublicStatic {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::methods().named(VALIDATE), |m| {
            m.is_static && m.accessibility.is_public()
        });

        Ok(found.map(|method| {
            ctx.violation(
                self,
                method.line,
                format!("Validator `{}` must be public static", method.name),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, method))
                    .with_snippet("public static"),
            )
        }))
    }
}

declare_rule! {
    /// Requires constructors on abstract tiers to be protected.
    pub struct AbstractTierProtectedConstructors {
        code: "DC064",
        name: "abstract-tier-protected-constructors",
        severity: Error,
        eligibility: AbstractTier,
        doc: "abstract-tier-protected-constructors.md",
        description: "Constructors of abstract tiers are protected",
    }
}

impl AbstractTierProtectedConstructors {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::kind(MemberKind::Constructor), |m| {
            is_protected(m.accessibility)
        });

        Ok(found.map(|ctor| {
            ctx.violation(
                self,
                ctor.line,
                format!(
                    "Constructor `{}` of abstract tier is {}; make it protected",
                    ctor.signature(),
                    ctor.accessibility
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, ctor))
                    .with_snippet("protected"),
            )
        }))
    }
}
