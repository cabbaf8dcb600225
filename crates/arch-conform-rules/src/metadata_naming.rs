//! Rules on member names inside an entity's nested metadata.
//!
//! Metadata members are named `{Property}{Suffix}`. The suffix comes from a
//! fixed vocabulary and the property must exist on the entity, so tooling
//! can map each limit back to the state it constrains.

use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::detectors::member_target;
use crate::detectors::metadata::{constraint_members, decompose, nested_metadata, vocabulary};

declare_rule! {
    /// Requires metadata members to end in a recognised constraint suffix.
    pub struct MetadataMemberNaming {
        code: "DC040",
        name: "metadata-member-naming",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "metadata-member-naming.md",
        description: "Metadata members are named `{Property}{Suffix}` from the constraint vocabulary",
    }
}

impl MetadataMemberNaming {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let Some(metadata) = nested_metadata(&ctx.symbol) else {
            return Ok(None);
        };
        let found = constraint_members(&metadata).find(|m| decompose(&m.name).is_none());

        Ok(found.map(|member| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}.{}` does not end in a constraint suffix (one of: {})",
                    metadata.name(),
                    member.name,
                    vocabulary()
                ),
                RemediationHint::new(FixAction::Rename, member_target(&metadata, member)),
            )
        }))
    }
}

declare_rule! {
    /// Requires each metadata member to constrain a property of the entity.
    pub struct MetadataPropertyExists {
        code: "DC041",
        name: "metadata-property-exists",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "metadata-property-exists.md",
        description: "Metadata members refer to properties the entity declares",
    }
}

impl MetadataPropertyExists {
    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let Some(metadata) = nested_metadata(symbol) else {
            return Ok(None);
        };
        let found = constraint_members(&metadata).find_map(|m| {
            let (property, _) = decompose(&m.name)?;
            let declared = symbol
                .data_members()
                .any(|d| d.name == property);
            (!declared).then_some((m, property))
        });

        Ok(found.map(|(member, property)| {
            ctx.violation(
                self,
                member.line,
                format!(
                    "`{}.{}` constrains `{property}`, which `{}` does not declare",
                    metadata.name(),
                    member.name,
                    symbol.name()
                ),
                RemediationHint::new(FixAction::Rename, member_target(&metadata, member)),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::model::Member;
    use arch_conform_core::testing::{evaluate, MemberBuilder, TypeBuilder};

    fn order(metadata_members: Vec<Member>) -> Vec<arch_conform_core::model::TypeDecl> {
        let mut metadata = TypeBuilder::class("Metadata").static_();
        for member in metadata_members {
            metadata = metadata.member(member);
        }
        vec![TypeBuilder::entity("Order")
            .member(MemberBuilder::property("Title", "string").public().build())
            .member(MemberBuilder::property("GracePeriod", "int").public().build())
            .nested(metadata.build())
            .build()]
    }

    fn limit(name: &str, line: u32) -> Member {
        MemberBuilder::property(name, "int")
            .public()
            .static_()
            .line(line)
            .build()
    }

    #[test]
    fn test_unknown_suffix() {
        let types = order(vec![limit("TitleMaxLength", 40), limit("TitleLimit", 41)]);
        let v = evaluate(&MetadataMemberNaming::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 41);
        assert!(v.message.starts_with("`Metadata.TitleLimit` does not end in a constraint suffix"));
        assert!(v.message.contains("InDaysMax"));
        assert_eq!(v.hint.target, "Order.Metadata.TitleLimit");
    }

    #[test]
    fn test_unknown_property() {
        let types = order(vec![
            limit("TitleMaxLength", 40),
            limit("GracePeriodInDaysMax", 41),
            limit("SubtitleMaxLength", 42),
        ]);
        assert!(evaluate(&MetadataMemberNaming::new(), types.clone(), "Order")
            .unwrap()
            .is_none());
        let v = evaluate(&MetadataPropertyExists::new(), types, "Order")
            .unwrap()
            .unwrap();
        assert_eq!(v.location.line, 42);
        insta::assert_snapshot!(v.message, @"`Metadata.SubtitleMaxLength` constrains `Subtitle`, which `Order` does not declare");
    }

    #[test]
    fn test_entity_without_metadata() {
        let types = vec![TypeBuilder::entity("Order").build()];
        assert!(evaluate(&MetadataMemberNaming::new(), types.clone(), "Order")
            .unwrap()
            .is_none());
        assert!(evaluate(&MetadataPropertyExists::new(), types, "Order")
            .unwrap()
            .is_none());
    }
}
