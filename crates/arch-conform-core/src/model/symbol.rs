//! Read-only facade over one declared type.

use std::path::Path;

use super::body::Node;
use super::decl::{
    AncestorRef, Member, MemberKind, Modifiers, TypeDecl, TypeKind,
};
use super::index::WorkspaceIndex;
use crate::error::ModelError;

/// The Symbol Model of one declared type.
///
/// Cheap to copy: it only borrows the declaration, its container, the project
/// name and the frozen [`WorkspaceIndex`]. Nothing reachable from a symbol can
/// be mutated, so every rule sees the same facts regardless of order.
#[derive(Debug, Clone, Copy)]
pub struct TypeSymbol<'a> {
    project: &'a str,
    decl: &'a TypeDecl,
    container: Option<&'a TypeDecl>,
    index: &'a WorkspaceIndex,
}

impl<'a> TypeSymbol<'a> {
    /// Creates a symbol for `decl`.
    #[must_use]
    pub fn new(
        project: &'a str,
        decl: &'a TypeDecl,
        container: Option<&'a TypeDecl>,
        index: &'a WorkspaceIndex,
    ) -> Self {
        Self {
            project,
            decl,
            container,
            index,
        }
    }

    /// Underlying declaration.
    #[must_use]
    pub fn decl(&self) -> &'a TypeDecl {
        self.decl
    }

    /// Short name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.decl.name
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn fqn(&self) -> &'a str {
        self.decl.qualified_name()
    }

    /// Owning project.
    #[must_use]
    pub fn project(&self) -> &'a str {
        self.project
    }

    /// Source file relative to the project root.
    #[must_use]
    pub fn file(&self) -> &'a Path {
        &self.decl.file
    }

    /// Declaration line.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.decl.line
    }

    /// Declaration kind.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.decl.kind
    }

    /// Type modifiers.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.decl.modifiers
    }

    /// Declared abstract.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.decl.modifiers.is_abstract
    }

    /// Declared final / sealed.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.decl.modifiers.is_final
    }

    /// Declared static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.decl.modifiers.is_static
    }

    /// Value aggregate, either by kind or by modifier.
    #[must_use]
    pub fn is_value_aggregate(&self) -> bool {
        self.decl.kind == TypeKind::ValueAggregate || self.decl.modifiers.is_value_aggregate
    }

    /// Capability (interface).
    #[must_use]
    pub fn is_capability(&self) -> bool {
        self.decl.kind == TypeKind::Capability
    }

    /// Enumeration.
    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        self.decl.kind == TypeKind::Enumeration
    }

    /// A class that can be instantiated: not abstract, static, a value
    /// aggregate, an enumeration or a capability.
    #[must_use]
    pub fn is_concrete_class(&self) -> bool {
        self.decl.kind == TypeKind::Class
            && !self.is_abstract()
            && !self.is_static()
            && !self.is_value_aggregate()
    }

    /// Direct base type.
    #[must_use]
    pub fn base_type(&self) -> Option<&'a str> {
        self.decl
            .base_type
            .as_deref()
            .or_else(|| self.decl.ancestors.first().map(|a| a.name.as_str()))
    }

    /// Ancestor chain, nearest first.
    #[must_use]
    pub fn ancestors(&self) -> &'a [AncestorRef] {
        &self.decl.ancestors
    }

    /// Returns true if `name` appears anywhere in the ancestor chain.
    #[must_use]
    pub fn descends_from(&self, name: &str) -> bool {
        self.decl.ancestors.iter().any(|a| a.is(name))
    }

    /// Implemented capabilities, direct and transitive.
    #[must_use]
    pub fn capabilities(&self) -> &'a [String] {
        &self.decl.capabilities
    }

    /// Returns true if the type implements `capability`.
    #[must_use]
    pub fn implements(&self, capability: &str) -> bool {
        self.decl.capabilities.iter().any(|c| c == capability)
    }

    /// Returns true if any type in the workspace extends this one.
    #[must_use]
    pub fn has_subtypes(&self) -> bool {
        self.index.inheritance().is_extended(self.fqn(), self.name())
    }

    /// All members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &'a Member> + 'a {
        self.decl.members.iter()
    }

    /// Members of one kind.
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &'a Member> + 'a {
        self.decl.members.iter().filter(move |m| m.kind == kind)
    }

    /// Methods.
    pub fn methods(&self) -> impl Iterator<Item = &'a Member> + 'a {
        self.members_of(MemberKind::Method)
    }

    /// Instance constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &'a Member> + 'a {
        self.members_of(MemberKind::Constructor)
    }

    /// Properties and fields.
    pub fn data_members(&self) -> impl Iterator<Item = &'a Member> + 'a {
        self.decl.members.iter().filter(|m| m.is_data())
    }

    /// First member named `name` (overloads share a name).
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&'a Member> {
        self.decl.members.iter().find(|m| m.name == name)
    }

    /// Returns true if any member is named `name`.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// Nested type declarations as symbols.
    pub fn nested_types(&self) -> impl Iterator<Item = TypeSymbol<'a>> + 'a {
        let Self {
            project,
            decl,
            index,
            ..
        } = *self;
        decl.nested
            .iter()
            .map(move |n| TypeSymbol::new(project, n, Some(decl), index))
    }

    /// Nested type with the given short name.
    #[must_use]
    pub fn nested(&self, name: &str) -> Option<TypeSymbol<'a>> {
        self.nested_types().find(|n| n.name() == name)
    }

    /// Declaring type of a nested type.
    #[must_use]
    pub fn container(&self) -> Option<TypeSymbol<'a>> {
        self.container
            .map(|c| TypeSymbol::new(self.project, c, None, self.index))
    }

    /// The frozen workspace index this symbol was built against.
    #[must_use]
    pub fn index(&self) -> &'a WorkspaceIndex {
        self.index
    }

    /// Statement tree of a member body, parsed on first request.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedBody`] if the exported body is not a
    /// valid node tree.
    pub fn body(&self, member: &'a Member) -> Result<&'a [Node], ModelError> {
        member.body.nodes().map_err(|message| ModelError::MalformedBody {
            type_name: self.fqn().to_string(),
            member: member.name.clone(),
            message: message.to_string(),
        })
    }
}
