//! Rule requiring metadata customization to happen under a lock.
//!
//! Metadata limits are static and shared by every instance. `Customize*`
//! methods that adjust them at startup must hold a lock for every write,
//! otherwise concurrent readers can observe half-applied limits.

use std::collections::BTreeSet;

use arch_conform_core::model::{Member, Node, NodeKind, TypeSymbol};
use arch_conform_core::utils::NamePattern;
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::body::{contains, find_with_ancestors};
use crate::detectors::member_target;
use crate::detectors::metadata::nested_metadata;

const CUSTOMIZE: NamePattern = NamePattern::prefix("Customize");

declare_rule! {
    /// Requires `Customize*` methods to write metadata only inside a lock.
    pub struct LockedMetadataCustomization {
        code: "DC022",
        name: "locked-metadata-customization",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "locked-metadata-customization.md",
        description: "Metadata customization writes shared state only while holding a lock",
    }
}

/// Names assignable without touching shared state: locals and parameters.
fn local_names<'n>(member: &'n Member, body: &'n [Node]) -> BTreeSet<&'n str> {
    member
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .chain(
            Node::walk(body)
                .filter(|n| n.kind == NodeKind::LocalDeclaration)
                .map(Node::name),
        )
        .collect()
}

impl LockedMetadataCustomization {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let owners: Vec<TypeSymbol<'_>> = std::iter::once(ctx.symbol)
            .chain(nested_metadata(&ctx.symbol))
            .collect();

        for owner in &owners {
            for method in owner.methods().filter(|m| CUSTOMIZE.matches(&m.name)) {
                if !method.body.has_source() {
                    continue;
                }
                let body = owner.body(method)?;
                let hint = || {
                    RemediationHint::new(FixAction::WrapInLock, member_target(owner, method))
                        .with_snippet("lock (SyncRoot) { ... }")
                };

                if !contains(body, |n| n.kind == NodeKind::Lock) {
                    return Ok(Some(ctx.violation(
                        self,
                        method.line,
                        format!("`{}` customizes metadata without taking a lock", method.name),
                        hint(),
                    )));
                }

                let locals = local_names(method, body);
                let unlocked = find_with_ancestors(body, &mut |node, path| {
                    node.kind == NodeKind::Assignment
                        && !path.iter().any(|a| a.kind == NodeKind::Lock)
                        && !node.children.first().is_some_and(|target| {
                            target.kind == NodeKind::Identifier && locals.contains(target.name())
                        })
                });
                if let Some(write) = unlocked {
                    return Ok(Some(ctx.violation(
                        self,
                        write.line,
                        format!("`{}` writes shared state outside its lock", method.name),
                        hint(),
                    )));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::testing::{evaluate, node, MemberBuilder, TypeBuilder};

    fn entity_with_metadata(customize: Member) -> Vec<arch_conform_core::model::TypeDecl> {
        vec![TypeBuilder::entity("Order")
            .nested(
                TypeBuilder::class("Metadata")
                    .static_()
                    .member(customize)
                    .build(),
            )
            .build()]
    }

    #[test]
    fn test_missing_lock() {
        let customize = MemberBuilder::method("CustomizeNameLimits")
            .public()
            .static_()
            .line(30)
            .body(vec![node::stmt(node::assign(
                node::ident("NameMaxLength", 31),
                node::ident("max", 31),
                31,
            ))])
            .build();
        let v = evaluate(
            &LockedMetadataCustomization::new(),
            entity_with_metadata(customize),
            "Order",
        )
        .unwrap()
        .unwrap();
        assert_eq!(v.location.line, 30);
        assert_eq!(v.hint.target, "Order.Metadata.CustomizeNameLimits");
    }

    #[test]
    fn test_write_outside_lock() {
        let customize = MemberBuilder::method("CustomizeNameLimits")
            .public()
            .static_()
            .param("max", "int")
            .line(30)
            .body(vec![
                node::local("clamped", node::ident("max", 31), 31),
                node::stmt(node::assign(
                    node::ident("clamped", 32),
                    node::lit("100", 32),
                    32,
                )),
                node::stmt(node::assign(
                    node::ident("NameMinLength", 33),
                    node::lit("1", 33),
                    33,
                )),
                node::lock(
                    "SyncRoot",
                    [node::stmt(node::assign(
                        node::ident("NameMaxLength", 35),
                        node::ident("clamped", 35),
                        35,
                    ))],
                    34,
                ),
            ])
            .build();
        let v = evaluate(
            &LockedMetadataCustomization::new(),
            entity_with_metadata(customize),
            "Order",
        )
        .unwrap()
        .unwrap();
        assert_eq!(v.location.line, 33);
    }

    #[test]
    fn test_first_unlocked_write_wins() {
        let customize = MemberBuilder::method("CustomizeNameLimits")
            .public()
            .static_()
            .param("max", "int")
            .line(30)
            .body(vec![
                node::lock("SyncRoot", [], 31),
                node::stmt(node::assign(
                    node::ident("NameMaxLength", 33),
                    node::ident("max", 33),
                    33,
                )),
                node::stmt(node::assign(
                    node::access("Metadata", "NameMinLength", 36),
                    node::lit("1", 36),
                    36,
                )),
            ])
            .build();
        let v = evaluate(
            &LockedMetadataCustomization::new(),
            entity_with_metadata(customize),
            "Order",
        )
        .unwrap()
        .unwrap();
        assert_eq!(v.location.line, 33);
        insta::assert_snapshot!(v.message, @"`CustomizeNameLimits` writes shared state outside its lock");
    }

    #[test]
    fn test_locked_customization_passes() {
        let customize = MemberBuilder::method("CustomizeNameLimits")
            .public()
            .static_()
            .param("max", "int")
            .body(vec![node::lock(
                "SyncRoot",
                [node::stmt(node::assign(
                    node::access("Metadata", "NameMaxLength", 32),
                    node::ident("max", 32),
                    32,
                ))],
                31,
            )])
            .build();
        assert!(evaluate(
            &LockedMetadataCustomization::new(),
            entity_with_metadata(customize),
            "Order",
        )
        .unwrap()
        .is_none());
    }
}
