//! Rules keeping collection state encapsulated.
//!
//! A caller holding a `List<T>` returned by an entity can add and remove
//! elements behind the entity's back. Collections are exposed through
//! read-only views and stored in private fields.

use arch_conform_core::model::{MemberKind, TypeRef};
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::structural::{first_nonconforming, MemberSelector};

/// The read-only view to expose instead of `ty`.
fn read_only_view(ty: &TypeRef) -> String {
    if let Some(element) = ty.name.strip_suffix("[]") {
        return format!("IReadOnlyList<{element}>");
    }
    match ty.args.as_slice() {
        [key, value] => format!("IReadOnlyDictionary<{key}, {value}>"),
        [element] => format!("IReadOnlyList<{element}>"),
        _ => "IReadOnlyCollection<T>".to_string(),
    }
}

declare_rule! {
    /// Forbids exposing mutable collections.
    pub struct EncapsulatedCollections {
        code: "DC016",
        name: "encapsulated-collections",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "encapsulated-collections.md",
        description: "Externally visible collections are exposed as read-only views",
    }
}

impl EncapsulatedCollections {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = MemberSelector::data().select(symbol).find_map(|m| {
            let ty = m.declared_type.as_ref()?;
            (m.accessibility.is_externally_visible() && ty.is_mutable_collection())
                .then_some((m, ty))
        });

        Ok(found.map(|(member, ty)| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}.{}` exposes mutable collection `{ty}`",
                    symbol.name(),
                    member.name
                ),
                RemediationHint::new(FixAction::ChangeDeclaredType, member_target(symbol, member))
                    .with_snippet(read_only_view(ty)),
            )
        }))
    }
}

declare_rule! {
    /// Requires collection-typed fields to be private.
    pub struct CollectionFieldsPrivate {
        code: "DC017",
        name: "collection-fields-private",
        severity: Warning,
        eligibility: ConcreteEntity,
        doc: "collection-fields-private.md",
        description: "Fields holding mutable collections are private",
    }
}

impl CollectionFieldsPrivate {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let found = first_nonconforming(symbol, MemberSelector::kind(MemberKind::Field), |m| {
            m.accessibility.is_private()
                || !m
                    .declared_type
                    .as_ref()
                    .is_some_and(TypeRef::is_mutable_collection)
        });

        Ok(found.map(|field| {
            ctx.violation(
                self,
                field.line,
                format!(
                    "Collection field `{}.{}` is {}; keep it private",
                    symbol.name(),
                    field.name,
                    field.accessibility
                ),
                RemediationHint::new(FixAction::ChangeAccessibility, member_target(symbol, field))
                    .with_snippet("private"),
            )
        }))
    }
}
