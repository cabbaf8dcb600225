//! In-memory model builders for rule tests.
//!
//! Enabled for this crate's own tests and, through the `test-support`
//! feature, for the rule crate's tests.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use crate::context::RuleContext;
use crate::error::ModelError;
use crate::lineage::Lineage;
use crate::model::{
    Accessibility, AncestorRef, Body, Member, MemberKind, Modifiers, Mutability, Node,
    Parameter, ProjectSnapshot, TypeDecl, TypeKind, TypeRef, TypeSymbol, Workspace,
    WorkspaceIndex,
};
use crate::rule::Rule;
use crate::types::Violation;

/// Project name used by [`workspace`] and [`evaluate`].
pub const TEST_PROJECT: &str = "Domain";

/// Builds a [`TypeDecl`].
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    decl: TypeDecl,
}

impl TypeBuilder {
    /// Starts a declaration of the given kind.
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            decl: TypeDecl {
                name: name.to_string(),
                fqn: String::new(),
                kind,
                modifiers: Modifiers::default(),
                file: format!("src/{name}.cs").into(),
                line: 1,
                base_type: None,
                ancestors: Vec::new(),
                capabilities: Vec::new(),
                members: Vec::new(),
                nested: Vec::new(),
            },
        }
    }

    /// Starts a class.
    pub fn class(name: &str) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Starts a concrete class that directly extends `Entity`.
    pub fn entity(name: &str) -> Self {
        Self::class(name).extends("Entity", true)
    }

    /// Sets the fully-qualified name.
    pub fn fqn(mut self, fqn: &str) -> Self {
        self.decl.fqn = fqn.to_string();
        self
    }

    /// Sets the source file.
    pub fn file(mut self, file: &str) -> Self {
        self.decl.file = file.into();
        self
    }

    /// Sets the declaration line.
    pub fn line(mut self, line: u32) -> Self {
        self.decl.line = line;
        self
    }

    /// Marks the type abstract.
    pub fn abstract_(mut self) -> Self {
        self.decl.modifiers.is_abstract = true;
        self
    }

    /// Marks the type final.
    pub fn final_(mut self) -> Self {
        self.decl.modifiers.is_final = true;
        self
    }

    /// Marks the type static.
    pub fn static_(mut self) -> Self {
        self.decl.modifiers.is_static = true;
        self
    }

    /// Gives the type value semantics.
    pub fn value_aggregate(mut self) -> Self {
        self.decl.modifiers.is_value_aggregate = true;
        self
    }

    /// Appends an ancestor. The first call also sets the direct base type.
    pub fn extends(mut self, name: &str, is_abstract: bool) -> Self {
        if self.decl.base_type.is_none() {
            self.decl.base_type = Some(name.to_string());
        }
        self.decl.ancestors.push(AncestorRef::new(name, is_abstract));
        self
    }

    /// Adds an implemented capability.
    pub fn implements(mut self, capability: &str) -> Self {
        self.decl.capabilities.push(capability.to_string());
        self
    }

    /// Adds a member.
    pub fn member(mut self, member: Member) -> Self {
        self.decl.members.push(member);
        self
    }

    /// Adds a nested type.
    pub fn nested(mut self, nested: TypeDecl) -> Self {
        self.decl.nested.push(nested);
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> TypeDecl {
        self.decl
    }
}

/// Builds a [`Member`].
#[derive(Debug, Clone)]
pub struct MemberBuilder {
    member: Member,
}

impl MemberBuilder {
    fn new(name: &str, kind: MemberKind) -> Self {
        Self {
            member: Member {
                name: name.to_string(),
                kind,
                accessibility: Accessibility::Private,
                is_static: false,
                is_abstract: false,
                is_virtual: false,
                is_override: false,
                parameters: Vec::new(),
                returns: (kind == MemberKind::Method).then(|| TypeRef::named("void")),
                declared_type: None,
                mutability: Mutability::ReadOnly,
                setter: None,
                computed: false,
                line: 1,
                body: Body::default(),
            },
        }
    }

    /// Instance constructor of type `owner`.
    pub fn constructor(owner: &str) -> Self {
        Self::new(owner, MemberKind::Constructor)
    }

    /// Static initializer of type `owner`.
    pub fn static_initializer(owner: &str) -> Self {
        let mut builder = Self::new(owner, MemberKind::StaticInitializer);
        builder.member.is_static = true;
        builder
    }

    /// Method returning `void`.
    pub fn method(name: &str) -> Self {
        Self::new(name, MemberKind::Method)
    }

    /// Read-only property.
    pub fn property(name: &str, ty: impl Into<TypeRef>) -> Self {
        let mut builder = Self::new(name, MemberKind::Property);
        builder.member.declared_type = Some(ty.into());
        builder
    }

    /// Read-only field.
    pub fn field(name: &str, ty: impl Into<TypeRef>) -> Self {
        let mut builder = Self::new(name, MemberKind::Field);
        builder.member.declared_type = Some(ty.into());
        builder
    }

    /// Sets the accessibility.
    pub fn access(mut self, accessibility: Accessibility) -> Self {
        self.member.accessibility = accessibility;
        self
    }

    /// `public`
    pub fn public(self) -> Self {
        self.access(Accessibility::Public)
    }

    /// `protected`
    pub fn protected(self) -> Self {
        self.access(Accessibility::Protected)
    }

    /// `internal`
    pub fn internal(self) -> Self {
        self.access(Accessibility::Internal)
    }

    /// `private`
    pub fn private(self) -> Self {
        self.access(Accessibility::Private)
    }

    /// Marks the member static.
    pub fn static_(mut self) -> Self {
        self.member.is_static = true;
        self
    }

    /// Marks the member abstract.
    pub fn abstract_(mut self) -> Self {
        self.member.is_abstract = true;
        self
    }

    /// Marks the member virtual.
    pub fn virtual_(mut self) -> Self {
        self.member.is_virtual = true;
        self
    }

    /// Marks the member as an override.
    pub fn override_(mut self) -> Self {
        self.member.is_override = true;
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.member.returns = Some(ty.into());
        self
    }

    /// Returns a nullable reference to `ty`.
    pub fn returns_optional(self, ty: &str) -> Self {
        self.returns(TypeRef::named(ty).nullable())
    }

    /// Appends a parameter.
    pub fn param(mut self, name: &str, ty: impl Into<TypeRef>) -> Self {
        self.member.parameters.push(Parameter {
            name: name.to_string(),
            ty: ty.into(),
        });
        self
    }

    /// Makes a property or field freely assignable.
    pub fn mutable(mut self) -> Self {
        self.member.mutability = Mutability::Mutable;
        self
    }

    /// Sets the mutability.
    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.member.mutability = mutability;
        self
    }

    /// Makes the property assignable with a setter of the given accessibility.
    pub fn setter(mut self, accessibility: Accessibility) -> Self {
        self.member.mutability = Mutability::Mutable;
        self.member.setter = Some(accessibility);
        self
    }

    /// Marks the property computed.
    pub fn computed(mut self) -> Self {
        self.member.computed = true;
        self
    }

    /// Sets the declaration line.
    pub fn line(mut self, line: u32) -> Self {
        self.member.line = line;
        self
    }

    /// Sets an already-parsed body.
    pub fn body(mut self, nodes: Vec<Node>) -> Self {
        self.member.body = Body::from_nodes(nodes);
        self
    }

    /// Sets a raw JSON body, parsed on first access.
    ///
    /// # Panics
    ///
    /// Panics if `json` is not syntactically valid JSON.
    pub fn raw_body(mut self, json: &str) -> Self {
        let raw = serde_json::value::RawValue::from_string(json.to_string())
            .unwrap_or_else(|e| panic!("invalid raw body: {e}"));
        self.member.body = Body::from_raw(raw);
        self
    }

    /// Finishes the member.
    pub fn build(self) -> Member {
        self.member
    }
}

/// Constructors for body nodes.
pub mod node {
    use crate::model::{Node, NodeKind, Operator};

    /// Identifier reference.
    pub fn ident(name: &str, line: u32) -> Node {
        Node::new(NodeKind::Identifier, line).with_name(name)
    }

    /// Literal.
    pub fn lit(text: &str, line: u32) -> Node {
        Node::new(NodeKind::Literal, line).with_name(text)
    }

    /// Invocation without receiver.
    pub fn call(method: &str, line: u32) -> Node {
        Node::new(NodeKind::Invocation, line).with_name(method)
    }

    /// Invocation on a receiver.
    pub fn call_on(target: &str, method: &str, line: u32) -> Node {
        call(method, line).with_target(target)
    }

    /// Member access.
    pub fn access(target: &str, member: &str, line: u32) -> Node {
        Node::new(NodeKind::MemberAccess, line)
            .with_name(member)
            .with_target(target)
    }

    /// Expression statement.
    pub fn stmt(expr: Node) -> Node {
        let line = expr.line;
        Node::new(NodeKind::ExpressionStatement, line).with_children([expr])
    }

    /// Assignment.
    pub fn assign(target: Node, value: Node, line: u32) -> Node {
        Node::new(NodeKind::Assignment, line).with_children([target, value])
    }

    /// Binary operation.
    pub fn binary(op: Operator, left: Node, right: Node, line: u32) -> Node {
        Node::new(NodeKind::Binary, line)
            .with_op(op)
            .with_children([left, right])
    }

    /// `x == null`
    pub fn is_null(name: &str, line: u32) -> Node {
        binary(Operator::Equal, ident(name, line), lit("null", line), line)
    }

    /// `if (cond) { body }`
    pub fn if_(cond: Node, body: impl IntoIterator<Item = Node>, line: u32) -> Node {
        Node::new(NodeKind::If, line).with_children([cond, block(body, line)])
    }

    /// `if (cond) { then } else { otherwise }`
    pub fn if_else(
        cond: Node,
        then: impl IntoIterator<Item = Node>,
        otherwise: impl IntoIterator<Item = Node>,
        line: u32,
    ) -> Node {
        Node::new(NodeKind::If, line).with_children([
            cond,
            block(then, line),
            block(otherwise, line),
        ])
    }

    /// `{ body }`
    pub fn block(body: impl IntoIterator<Item = Node>, line: u32) -> Node {
        Node::new(NodeKind::Block, line).with_children(body)
    }

    /// `throw new T()`
    pub fn throw(exception: &str, line: u32) -> Node {
        Node::new(NodeKind::Throw, line).with_name(exception)
    }

    /// `lock (target) { body }`
    pub fn lock(target: &str, body: impl IntoIterator<Item = Node>, line: u32) -> Node {
        Node::new(NodeKind::Lock, line)
            .with_children([ident(target, line)])
            .with_children(body)
    }

    /// `return value`
    pub fn ret(value: Node, line: u32) -> Node {
        Node::new(NodeKind::Return, line).with_children([value])
    }

    /// `new T(args)`
    pub fn new_obj(ty: &str, args: impl IntoIterator<Item = Node>, line: u32) -> Node {
        Node::new(NodeKind::ObjectCreation, line)
            .with_name(ty)
            .with_children(args)
    }

    /// `var name = value`
    pub fn local(name: &str, value: Node, line: u32) -> Node {
        Node::new(NodeKind::LocalDeclaration, line)
            .with_name(name)
            .with_children([value])
    }
}

/// A single-project workspace.
pub fn workspace(types: Vec<TypeDecl>) -> Workspace {
    Workspace::new(vec![ProjectSnapshot::new(TEST_PROJECT, types)])
}

/// Evaluates `rule` on the type named `name` (short or fully-qualified) in a
/// single-project workspace built from `types`, with the default lineage.
///
/// # Panics
///
/// Panics if no type is named `name`.
pub fn evaluate<R: Rule + ?Sized>(
    rule: &R,
    types: Vec<TypeDecl>,
    name: &str,
) -> Result<Option<Violation>, ModelError> {
    evaluate_in(rule, &workspace(types), &Lineage::default(), name)
}

/// Evaluates `rule` on the type named `name` in `ws`.
///
/// # Panics
///
/// Panics if no type is named `name`.
pub fn evaluate_in<R: Rule + ?Sized>(
    rule: &R,
    ws: &Workspace,
    lineage: &Lineage,
    name: &str,
) -> Result<Option<Violation>, ModelError> {
    let (index, _) = WorkspaceIndex::build(ws);
    let (project, decl, container) = ws
        .declarations()
        .find(|(_, d, _)| d.name == name || d.fqn == name)
        .unwrap_or_else(|| panic!("no type named {name}"));
    let symbol = TypeSymbol::new(project, decl, container, &index);
    rule.evaluate(&RuleContext::new(symbol, lineage, ""))
}
