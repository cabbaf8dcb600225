//! Entity lineage: which ancestor names make a type part of the domain model.

use serde::{Deserialize, Serialize};

use crate::model::TypeSymbol;

/// Root names used when no lineage is configured.
pub const DEFAULT_LINEAGE_ROOTS: &[&str] = &["Entity", "AggregateRoot"];

/// The configured entity lineage roots, fixed for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    roots: Vec<String>,
}

impl Default for Lineage {
    fn default() -> Self {
        Self::new(DEFAULT_LINEAGE_ROOTS.iter().copied())
    }
}

impl Lineage {
    /// Creates a lineage from root names.
    #[must_use]
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured root names.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Returns true if `name` is one of the roots.
    #[must_use]
    pub fn is_root(&self, name: &str) -> bool {
        self.roots.iter().any(|r| r == name)
    }

    /// Position of the nearest root in the symbol's ancestor chain.
    #[must_use]
    pub fn root_position(&self, symbol: &TypeSymbol<'_>) -> Option<usize> {
        symbol
            .ancestors()
            .iter()
            .position(|a| self.roots.iter().any(|r| a.is(r)))
    }

    /// Returns true if the symbol descends from any root.
    #[must_use]
    pub fn contains(&self, symbol: &TypeSymbol<'_>) -> bool {
        self.root_position(symbol).is_some()
    }

    /// Number of abstract ancestors between the symbol and its nearest root.
    ///
    /// Returns `None` for types outside the lineage.
    #[must_use]
    pub fn abstract_tiers(&self, symbol: &TypeSymbol<'_>) -> Option<usize> {
        let root = self.root_position(symbol)?;
        Some(
            symbol.ancestors()[..root]
                .iter()
                .filter(|a| a.is_abstract)
                .count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectSnapshot, Workspace, WorkspaceIndex};
    use crate::testing::TypeBuilder;

    #[test]
    fn counts_abstract_tiers_below_root() {
        let ws = Workspace::new(vec![ProjectSnapshot::new(
            "Domain",
            vec![TypeBuilder::class("Invoice")
                .extends("TaxDocument", true)
                .extends("Document", true)
                .extends("Entity", true)
                .build()],
        )]);
        let (index, _) = WorkspaceIndex::build(&ws);
        let decl = &ws.projects()[0].types[0];
        let symbol = TypeSymbol::new("Domain", decl, None, &index);

        let lineage = Lineage::default();
        assert!(lineage.contains(&symbol));
        assert_eq!(lineage.abstract_tiers(&symbol), Some(2));
    }

    #[test]
    fn custom_roots() {
        let ws = Workspace::new(vec![ProjectSnapshot::new(
            "Domain",
            vec![TypeBuilder::class("Invoice")
                .extends("DomainObject", true)
                .build()],
        )]);
        let (index, _) = WorkspaceIndex::build(&ws);
        let decl = &ws.projects()[0].types[0];
        let symbol = TypeSymbol::new("Domain", decl, None, &index);

        assert!(!Lineage::default().contains(&symbol));
        assert!(Lineage::new(["DomainObject"]).contains(&symbol));
    }
}
