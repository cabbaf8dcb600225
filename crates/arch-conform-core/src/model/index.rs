//! Workspace-wide indexes built once per run.
//!
//! [`WorkspaceIndex::build`] walks every declared type exactly once, before
//! any rule runs. The result is never mutated afterwards and is handed to
//! every [`TypeSymbol`](super::TypeSymbol) by shared reference, so rules
//! evaluated in parallel all observe the same facts.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::decl::{short_type_name, TypeDecl};
use super::workspace::Workspace;
use crate::types::{ResolutionFailure, ResolutionWarning};

/// Names of types that have at least one subtype somewhere in the workspace.
#[derive(Debug, Clone, Default)]
pub struct InheritanceIndex {
    /// Fully-qualified names of extended types.
    subtyped: HashSet<String>,
    /// Short names of extended types whose declaration could not be pinned
    /// to one fully-qualified name.
    unqualified: HashSet<String>,
}

impl InheritanceIndex {
    /// Returns true if a type with this fully-qualified name, or an
    /// ancestor recorded only by this short name, is extended.
    #[must_use]
    pub fn has_subtypes(&self, name: &str) -> bool {
        self.subtyped.contains(name) || self.unqualified.contains(name)
    }

    /// Returns true if the declaration `fqn` is extended.
    ///
    /// The short name only counts for ancestors that were recorded without a
    /// qualified name, so an unrelated type sharing the short name of an
    /// extended one is not considered subtyped.
    #[must_use]
    pub fn is_extended(&self, fqn: &str, short: &str) -> bool {
        self.subtyped.contains(fqn) || self.unqualified.contains(short)
    }

    /// Number of distinct names recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subtyped.len() + self.unqualified.len()
    }

    /// Returns true when no type in the workspace is extended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subtyped.is_empty() && self.unqualified.is_empty()
    }

    fn record(&mut self, short: &str, fqn: Option<&str>) {
        match fqn {
            Some(fqn) => self.subtyped.insert(fqn.to_string()),
            None => self.unqualified.insert(short_type_name(short).to_string()),
        };
    }
}

/// Where a type is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSite {
    /// Owning project.
    pub project: String,
    /// Fully-qualified name.
    pub fqn: String,
    /// File relative to the project root.
    pub file: PathBuf,
    /// Declaration line.
    pub line: u32,
    /// False for types nested in another declaration.
    pub top_level: bool,
}

/// Frozen, read-only view of cross-type facts for one run.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceIndex {
    inheritance: InheritanceIndex,
    by_name: HashMap<String, Vec<DeclarationSite>>,
    by_fqn: HashMap<String, DeclarationSite>,
    unresolved: HashSet<(String, String)>,
}

impl WorkspaceIndex {
    /// Builds the index for a workspace and reports types whose model cannot
    /// be completed.
    ///
    /// Resolution rules:
    /// - ancestors the frontend resolved are trusted as-is;
    /// - unresolved ancestors are looked up by fully-qualified name, then by
    ///   short name, across every project;
    /// - a fully-qualified name declared twice is ambiguous.
    ///
    /// Types with any resolution failure are excluded from evaluation (see
    /// [`WorkspaceIndex::is_resolved`]).
    #[must_use]
    pub fn build(workspace: &Workspace) -> (Self, Vec<ResolutionWarning>) {
        let mut index = Self::default();
        let mut warnings = Vec::new();

        for (project, decl, container) in workspace.declarations() {
            let site = DeclarationSite {
                project: project.to_string(),
                fqn: decl.qualified_name().to_string(),
                file: decl.file.clone(),
                line: decl.line,
                top_level: container.is_none(),
            };

            if let Some(existing) = index.by_fqn.get(&site.fqn) {
                warn!(
                    "Duplicate declaration of {} in {} and {}",
                    site.fqn, existing.project, project
                );
                warnings.push(ResolutionWarning::new(
                    project,
                    decl,
                    ResolutionFailure::DuplicateDeclaration {
                        other_project: existing.project.clone(),
                    },
                ));
                index
                    .unresolved
                    .insert((project.to_string(), site.fqn.clone()));
                continue;
            }

            index
                .by_name
                .entry(decl.name.clone())
                .or_default()
                .push(site.clone());
            index.by_fqn.insert(site.fqn.clone(), site);
        }

        for (project, decl, _) in workspace.declarations() {
            for ancestor in &decl.ancestors {
                if ancestor.resolved {
                    let fqn = ancestor
                        .fqn
                        .clone()
                        .or_else(|| index.qualify(&ancestor.name).map(|site| site.fqn.clone()));
                    index.inheritance.record(&ancestor.name, fqn.as_deref());
                    continue;
                }

                match index.resolve_by_name(ancestor.fqn.as_deref(), &ancestor.name) {
                    Some(site) => {
                        debug!(
                            "Resolved {} for {} across projects ({})",
                            ancestor.name,
                            decl.qualified_name(),
                            site.project
                        );
                        let fqn = site.fqn.clone();
                        index.inheritance.record(&ancestor.name, Some(&fqn));
                    }
                    None => {
                        warn!(
                            "Cannot resolve ancestor {} of {}",
                            ancestor.name,
                            decl.qualified_name()
                        );
                        warnings.push(ResolutionWarning::new(
                            project,
                            decl,
                            ResolutionFailure::UnresolvedAncestor {
                                name: ancestor.name.clone(),
                            },
                        ));
                        index
                            .unresolved
                            .insert((project.to_string(), decl.qualified_name().to_string()));
                    }
                }
            }
        }

        warnings.sort();
        warnings.dedup();
        (index, warnings)
    }

    /// The cross-type inheritance index.
    #[must_use]
    pub fn inheritance(&self) -> &InheritanceIndex {
        &self.inheritance
    }

    /// All declarations with the given short name, in workspace order.
    #[must_use]
    pub fn declarations_named(&self, name: &str) -> &[DeclarationSite] {
        self.by_name
            .get(short_type_name(name))
            .map_or(&[], Vec::as_slice)
    }

    /// Declaration with the given fully-qualified name.
    #[must_use]
    pub fn declaration(&self, fqn: &str) -> Option<&DeclarationSite> {
        self.by_fqn.get(fqn)
    }

    /// Returns false for types whose model could not be completed.
    #[must_use]
    pub fn is_resolved(&self, project: &str, decl: &TypeDecl) -> bool {
        !self
            .unresolved
            .contains(&(project.to_string(), decl.qualified_name().to_string()))
    }

    /// The one declaration `name` can denote, if that is unambiguous.
    fn qualify(&self, name: &str) -> Option<&DeclarationSite> {
        self.by_fqn.get(name).or_else(|| match self.declarations_named(name) {
            [only] => Some(only),
            _ => None,
        })
    }

    fn resolve_by_name(&self, fqn: Option<&str>, name: &str) -> Option<&DeclarationSite> {
        if let Some(site) = fqn.and_then(|f| self.by_fqn.get(f)) {
            return Some(site);
        }
        self.by_fqn
            .get(name)
            .or_else(|| self.declarations_named(name).first())
    }
}
