//! Shape of a type's position in the entity lineage.

use arch_conform_core::model::{AncestorRef, TypeSymbol};
use arch_conform_core::Lineage;

/// The abstract tiers between a type and its nearest lineage root.
#[derive(Debug, Clone)]
pub struct LineagePath<'a> {
    /// Abstract ancestors below the root, nearest first.
    pub tiers: Vec<&'a AncestorRef>,
    /// The root reached.
    pub root: &'a AncestorRef,
}

impl LineagePath<'_> {
    /// Number of intermediate abstract tiers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tiers.len()
    }

    /// Tier names, nearest first, for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        self.tiers
            .iter()
            .map(|a| a.name.as_str())
            .chain(std::iter::once(self.root.name.as_str()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Walks the ancestor chain up to the nearest root.
///
/// Returns `None` for types outside the lineage.
#[must_use]
pub fn path_to_root<'a>(symbol: &TypeSymbol<'a>, lineage: &Lineage) -> Option<LineagePath<'a>> {
    let ancestors = symbol.ancestors();
    let root = lineage.root_position(symbol)?;
    Some(LineagePath {
        tiers: ancestors[..root].iter().filter(|a| a.is_abstract).collect(),
        root: &ancestors[root],
    })
}
