//! Rules on where metadata lives and how it is declared.
//!
//! # Rationale
//!
//! Validation limits belong to the entity they constrain: a nested static
//! `Metadata` type with public static members, initialized inline so the
//! values are visible at the declaration. Entities that validate input
//! must have one.

use arch_conform_core::model::MemberKind;
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::metadata::{constraint_members, nested_metadata, sibling_metadata};
use crate::detectors::structural::MemberSelector;
use crate::validation_bodies::VALIDATE;

declare_rule! {
    /// Requires metadata to be nested inside its entity.
    pub struct MetadataNested {
        code: "DC042",
        name: "metadata-nested",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "metadata-nested.md",
        description: "Metadata is nested in the entity, not declared beside it",
    }
}

impl MetadataNested {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let Some(site) = sibling_metadata(symbol) else {
            return Ok(None);
        };

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!(
                "`{}` is declared beside `{}` in {}:{}; nest it as `{}.Metadata`",
                site.fqn,
                symbol.name(),
                site.file.display(),
                site.line,
                symbol.name()
            ),
            RemediationHint::new(FixAction::MoveDeclaration, site.fqn.clone())
                .with_snippet(format!("{}.Metadata", symbol.name())),
        )))
    }
}

declare_rule! {
    /// Forbids static initializers on metadata.
    pub struct MetadataNoStaticInitializer {
        code: "DC043",
        name: "metadata-no-static-initializer",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "metadata-no-static-initializer.md",
        description: "Metadata values are initialized inline, not in a static constructor",
    }
}

impl MetadataNoStaticInitializer {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let Some(metadata) = nested_metadata(&ctx.symbol) else {
            return Ok(None);
        };
        let found = metadata.members_of(MemberKind::StaticInitializer).next();

        Ok(found.map(|init| {
            ctx.violation(
                self,
                init.line,
                format!(
                    "`{}` has a static initializer; initialize each limit inline",
                    metadata.fqn()
                ),
                RemediationHint::new(FixAction::RemoveConstruct, member_target(&metadata, init)),
            )
        }))
    }
}

declare_rule! {
    /// Requires metadata to be a static type with public static members.
    pub struct MetadataMembersPublicStatic {
        code: "DC044",
        name: "metadata-members-public-static",
        severity: Warning,
        eligibility: ConcreteEntity,
        doc: "metadata-members-public-static.md",
        description: "Metadata is a static type whose limits are public static members",
    }
}

impl MetadataMembersPublicStatic {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let Some(metadata) = nested_metadata(&ctx.symbol) else {
            return Ok(None);
        };
        if !metadata.is_static() {
            return Ok(Some(ctx.violation(
                self,
                metadata.line(),
                format!("`{}` must be declared static", metadata.fqn()),
                RemediationHint::new(FixAction::AddModifier, metadata.fqn()).with_snippet("static"),
            )));
        }

        let found =
            constraint_members(&metadata).find(|m| !(m.is_static && m.accessibility.is_public()));
        Ok(found.map(|member| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}.{}` must be public static",
                    metadata.name(),
                    member.name
                ),
                RemediationHint::new(
                    FixAction::ChangeAccessibility,
                    member_target(&metadata, member),
                )
                .with_snippet("public static"),
            )
        }))
    }
}

declare_rule! {
    /// Requires entities with validators to declare metadata.
    pub struct ValidatedEntityHasMetadata {
        code: "DC045",
        name: "validated-entity-has-metadata",
        severity: Warning,
        eligibility: ConcreteEntity,
        doc: "validated-entity-has-metadata.md",
        description: "Entities with `Validate*` methods carry their limits in nested metadata",
    }
}

impl ValidatedEntityHasMetadata {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let validates = MemberSelector::methods()
            .named(VALIDATE)
            .select(symbol)
            .next()
            .is_some();
        if !validates || nested_metadata(symbol).is_some() || sibling_metadata(symbol).is_some() {
            return Ok(None);
        }

        Ok(Some(ctx.violation(
            self,
            symbol.line(),
            format!(
                "`{}` has validators but no nested `Metadata` holding their limits",
                symbol.name()
            ),
            RemediationHint::new(FixAction::AddMember, symbol.fqn())
                .with_snippet("public static class Metadata"),
        )))
    }
}
