//! Structural predicates over member descriptors.

use arch_conform_core::model::{Member, MemberKind, TypeSymbol};
use arch_conform_core::utils::NamePattern;

/// Which members a structural check looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberSelector {
    kind: Option<MemberKind>,
    pattern: Option<NamePattern>,
    data_only: bool,
    public_only: bool,
}

impl MemberSelector {
    /// Every member.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Members of one kind.
    #[must_use]
    pub fn kind(kind: MemberKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Methods.
    #[must_use]
    pub fn methods() -> Self {
        Self::kind(MemberKind::Method)
    }

    /// Properties and fields.
    #[must_use]
    pub fn data() -> Self {
        Self {
            data_only: true,
            ..Self::default()
        }
    }

    /// Restricts to names matching `pattern`.
    #[must_use]
    pub fn named(mut self, pattern: NamePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Restricts to public members.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.public_only = true;
        self
    }

    /// Returns true if `member` is selected.
    #[must_use]
    pub fn selects(&self, member: &Member) -> bool {
        self.kind.map_or(true, |k| member.kind == k)
            && (!self.data_only || member.is_data())
            && (!self.public_only || member.accessibility.is_public())
            && self.pattern.map_or(true, |p| p.matches(&member.name))
    }

    /// Selected members of `symbol`, in declaration order.
    pub fn select<'a>(self, symbol: &TypeSymbol<'a>) -> impl Iterator<Item = &'a Member> + 'a {
        symbol.members().filter(move |m| self.selects(m))
    }
}

/// The first selected member that does not satisfy `conforms`.
pub fn first_nonconforming<'a>(
    symbol: &TypeSymbol<'a>,
    selector: MemberSelector,
    conforms: impl Fn(&Member) -> bool,
) -> Option<&'a Member> {
    selector.select(symbol).find(|m| !conforms(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::model::WorkspaceIndex;
    use arch_conform_core::testing::{workspace, MemberBuilder, TypeBuilder};

    #[test]
    fn first_nonconforming_respects_order_and_selection() {
        let ws = workspace(vec![TypeBuilder::class("Order")
            .member(MemberBuilder::method("ChangeName").public().line(3).build())
            .member(MemberBuilder::method("Rename").public().line(5).build())
            .member(MemberBuilder::method("ChangeTotal").public().line(7).build())
            .build()]);
        let (index, _) = WorkspaceIndex::build(&ws);
        let decl = &ws.projects()[0].types[0];
        let symbol = TypeSymbol::new("Domain", decl, None, &index);

        let selector = MemberSelector::methods().named(NamePattern::prefix("Change"));
        let found = first_nonconforming(&symbol, selector, |m| m.is_static);
        assert_eq!(found.map(|m| m.line), Some(3));

        let none = first_nonconforming(&symbol, selector, |m| m.accessibility.is_public());
        assert!(none.is_none());
    }
}
