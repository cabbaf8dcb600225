//! The set of declared types under inspection.

use serde::{Deserialize, Serialize};

use super::decl::TypeDecl;

/// All types one project exported, as written by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Project name used in reports.
    pub project: String,
    /// Top-level type declarations.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl ProjectSnapshot {
    /// Creates a project snapshot.
    #[must_use]
    pub fn new(project: impl Into<String>, types: Vec<TypeDecl>) -> Self {
        Self {
            project: project.into(),
            types,
        }
    }
}

/// An immutable collection of project snapshots.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    projects: Vec<ProjectSnapshot>,
}

impl Workspace {
    /// Creates a workspace, filling in fully-qualified names the frontend left
    /// empty (nested types become `Outer.Inner`).
    #[must_use]
    pub fn new(mut projects: Vec<ProjectSnapshot>) -> Self {
        for project in &mut projects {
            for decl in &mut project.types {
                qualify(decl, None);
            }
        }
        Self { projects }
    }

    /// Project snapshots in load order.
    #[must_use]
    pub fn projects(&self) -> &[ProjectSnapshot] {
        &self.projects
    }

    /// Total number of declared types, nested ones included.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.declarations().count()
    }

    /// Every declared type with its project and containing declaration,
    /// depth-first in declaration order.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &TypeDecl, Option<&TypeDecl>)> {
        self.projects.iter().flat_map(|project| {
            let mut out = Vec::new();
            for decl in &project.types {
                collect(project.project.as_str(), decl, None, &mut out);
            }
            out
        })
    }
}

fn qualify(decl: &mut TypeDecl, container: Option<&str>) {
    if decl.fqn.is_empty() {
        decl.fqn = match container {
            Some(outer) => format!("{outer}.{}", decl.name),
            None => decl.name.clone(),
        };
    }
    let outer = decl.fqn.clone();
    for nested in &mut decl.nested {
        qualify(nested, Some(&outer));
    }
}

fn collect<'a>(
    project: &'a str,
    decl: &'a TypeDecl,
    container: Option<&'a TypeDecl>,
    out: &mut Vec<(&'a str, &'a TypeDecl, Option<&'a TypeDecl>)>,
) {
    out.push((project, decl, container));
    for nested in &decl.nested {
        collect(project, nested, Some(decl), out);
    }
}
