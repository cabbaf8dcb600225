//! Declaration descriptors exported by the upstream analysis frontend.
//!
//! These are plain data: the frontend serializes them into a project
//! snapshot and the engine only ever reads them. Everything a rule needs to
//! know about a declared type is reachable from [`TypeDecl`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::body::Body;

/// Generic wrappers that express "maybe a value of T".
const OPTIONAL_WRAPPERS: &[&str] = &["Option", "Optional", "Maybe", "Nullable"];

/// Collection types that allow callers to mutate their contents.
const MUTABLE_COLLECTIONS: &[&str] = &[
    "List",
    "IList",
    "ICollection",
    "Collection",
    "Dictionary",
    "IDictionary",
    "HashSet",
    "ISet",
    "SortedSet",
    "SortedList",
    "SortedDictionary",
    "Queue",
    "Stack",
    "LinkedList",
    "ObservableCollection",
];

/// Declaration kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A class-like reference type.
    Class,
    /// A value aggregate (struct, record).
    #[serde(alias = "struct", alias = "record")]
    ValueAggregate,
    /// An enumeration.
    #[serde(alias = "enum")]
    Enumeration,
    /// A capability (interface, protocol, trait).
    #[serde(alias = "interface")]
    Capability,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::ValueAggregate => write!(f, "value aggregate"),
            Self::Enumeration => write!(f, "enumeration"),
            Self::Capability => write!(f, "capability"),
        }
    }
}

/// Type-level modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Declared abstract.
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    /// Declared final / sealed (cannot be extended).
    #[serde(rename = "final", alias = "sealed")]
    pub is_final: bool,
    /// Declared static (no instances).
    #[serde(rename = "static")]
    pub is_static: bool,
    /// Value semantics on a class-like declaration (e.g. a record class).
    #[serde(rename = "value")]
    pub is_value_aggregate: bool,
}

/// Member accessibility, from most to least visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Visible everywhere.
    Public,
    /// Visible to the declaring assembly/module or to subtypes.
    ProtectedInternal,
    /// Visible to the declaring assembly/module.
    Internal,
    /// Visible to subtypes.
    Protected,
    /// Visible to subtypes within the declaring assembly/module.
    PrivateProtected,
    /// Visible to the declaring type only.
    #[default]
    Private,
}

impl Accessibility {
    /// Returns true for `public`.
    #[must_use]
    pub fn is_public(self) -> bool {
        self == Self::Public
    }

    /// Returns true when only the declaring type can see the member.
    #[must_use]
    pub fn is_private(self) -> bool {
        self == Self::Private
    }

    /// Returns true when code outside the type hierarchy can reach the member.
    #[must_use]
    pub fn is_externally_visible(self) -> bool {
        matches!(self, Self::Public | Self::ProtectedInternal | Self::Internal)
    }

    /// Returns true for accessibilities that limit access to the type and its subtypes.
    #[must_use]
    pub fn is_hierarchy_only(self) -> bool {
        matches!(self, Self::Protected | Self::PrivateProtected | Self::Private)
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::ProtectedInternal => "protected internal",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::PrivateProtected => "private protected",
            Self::Private => "private",
        };
        f.write_str(s)
    }
}

/// Kind of a type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Instance constructor.
    Constructor,
    /// Static initializer block (static constructor).
    StaticInitializer,
    /// Method.
    Method,
    /// Property (accessor pair).
    Property,
    /// Field.
    Field,
}

/// Whether a stored member can be reassigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Compile-time constant.
    Constant,
    /// Assigned once, during construction.
    #[default]
    ReadOnly,
    /// Assignable only during object initialization.
    InitOnly,
    /// Freely assignable.
    Mutable,
}

/// A reference to a type as written in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Type name, possibly namespace-qualified (e.g. `System.String`, `Order`, `int[]`).
    pub name: String,
    /// Generic arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    /// Whether the reference is marked nullable (`Order?`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl TypeRef {
    /// Creates a plain, non-generic, non-nullable reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Creates a generic reference.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            nullable: false,
        }
    }

    /// Marks the reference nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns the unqualified name without namespace or generic arity suffix.
    #[must_use]
    pub fn short_name(&self) -> &str {
        short_type_name(&self.name)
    }

    /// Returns true when the unqualified name equals `name`.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.short_name() == short_type_name(name)
    }

    /// Returns true for `void` / unit returns.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.short_name(), "void" | "Void" | "()" | "Unit")
    }

    /// Returns true when this is "maybe an instance of `type_name`":
    /// either a nullable reference to it or a recognised optional wrapper.
    #[must_use]
    pub fn is_optional_of(&self, type_name: &str) -> bool {
        if self.nullable && self.args.is_empty() && self.is_named(type_name) {
            return true;
        }
        OPTIONAL_WRAPPERS.contains(&self.short_name())
            && self.args.len() == 1
            && self.args[0].is_named(type_name)
    }

    /// Returns true when the reference is (or wraps) `type_name` in any way.
    #[must_use]
    pub fn mentions(&self, type_name: &str) -> bool {
        self.is_named(type_name) || self.args.iter().any(|a| a.mentions(type_name))
    }

    /// Returns true for arrays and collection types whose contents can be mutated by holders.
    #[must_use]
    pub fn is_mutable_collection(&self) -> bool {
        self.name.ends_with("[]") || MUTABLE_COLLECTIONS.contains(&self.short_name())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

/// Strips namespace qualification and generic arity (`Ns.List`1` → `List`).
#[must_use]
pub fn short_type_name(name: &str) -> &str {
    let name = name.rsplit(['.', ':']).next().unwrap_or(name);
    name.split('`').next().unwrap_or(name)
}

/// The shape of a method's return type relative to its declaring type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    /// Nothing is returned.
    Void,
    /// The declaring type itself, never absent.
    SelfType,
    /// Maybe an instance of the declaring type.
    OptionalOfSelf,
    /// A generic wrapper carrying the declaring type (e.g. `Result<Order>`).
    Wrapper(String),
    /// Anything else.
    Other(String),
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Descriptor of a single type member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Member name (constructors use the type name).
    pub name: String,
    /// Member kind.
    pub kind: MemberKind,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Declared static.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Declared abstract (no body).
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Declared virtual (overridable).
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    /// Overrides an inherited member.
    #[serde(default, rename = "override")]
    pub is_override: bool,
    /// Parameters of methods and constructors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Return type of methods. `None` for non-methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,
    /// Declared type of properties and fields.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<TypeRef>,
    /// Mutability of properties and fields.
    #[serde(default)]
    pub mutability: Mutability,
    /// Setter accessibility when it differs from the member's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<Accessibility>,
    /// Computed property (no backing storage).
    #[serde(default)]
    pub computed: bool,
    /// Declaration line (1-indexed).
    #[serde(default)]
    pub line: u32,
    /// Statement tree of the member body, materialized on first access.
    #[serde(default)]
    pub body: Body,
}

impl Member {
    /// Returns true for methods.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    /// Returns true for instance constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Constructor
    }

    /// Returns true for properties and fields.
    #[must_use]
    pub fn is_data(&self) -> bool {
        matches!(self.kind, MemberKind::Property | MemberKind::Field)
    }

    /// Returns true for stored (non-computed) properties and all fields.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        match self.kind {
            MemberKind::Field => true,
            MemberKind::Property => !self.computed,
            _ => false,
        }
    }

    /// Accessibility of the setter, or `None` if the member cannot be reassigned
    /// after construction.
    #[must_use]
    pub fn setter_accessibility(&self) -> Option<Accessibility> {
        if !self.is_data() || self.mutability != Mutability::Mutable {
            return None;
        }
        Some(self.setter.unwrap_or(self.accessibility))
    }

    /// Classifies the return type relative to `owner`.
    #[must_use]
    pub fn return_shape(&self, owner: &str) -> ReturnShape {
        let Some(ret) = &self.returns else {
            return ReturnShape::Void;
        };
        if ret.is_void() {
            ReturnShape::Void
        } else if ret.is_optional_of(owner) {
            ReturnShape::OptionalOfSelf
        } else if ret.is_named(owner) && ret.args.is_empty() {
            ReturnShape::SelfType
        } else if !ret.args.is_empty() && ret.mentions(owner) {
            ReturnShape::Wrapper(ret.to_string())
        } else {
            ReturnShape::Other(ret.to_string())
        }
    }

    /// Rendered signature, for messages (`public static bool Validate(Order entity)`).
    #[must_use]
    pub fn signature(&self) -> String {
        let mut out = format!("{} ", self.accessibility);
        if self.is_static {
            out.push_str("static ");
        }
        if let Some(ret) = &self.returns {
            out.push_str(&ret.to_string());
            out.push(' ');
        } else if let Some(ty) = &self.declared_type {
            out.push_str(&ty.to_string());
            out.push(' ');
        }
        out.push_str(&self.name);
        if matches!(self.kind, MemberKind::Method | MemberKind::Constructor) {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|p| format!("{} {}", p.ty, p.name))
                .collect();
            out.push('(');
            out.push_str(&params.join(", "));
            out.push(')');
        }
        out
    }
}

/// An entry in a type's ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorRef {
    /// Short name of the ancestor.
    pub name: String,
    /// Fully-qualified name, when the frontend resolved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqn: Option<String>,
    /// Whether the ancestor is declared abstract.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Whether the frontend could resolve the ancestor. Unresolved ancestors
    /// are looked up by name across the whole workspace.
    #[serde(default = "default_true")]
    pub resolved: bool,
}

impl AncestorRef {
    /// Creates a resolved ancestor reference.
    #[must_use]
    pub fn new(name: impl Into<String>, is_abstract: bool) -> Self {
        Self {
            name: name.into(),
            fqn: None,
            is_abstract,
            resolved: true,
        }
    }

    /// Returns true when this ancestor is `name` (short or fully-qualified).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
            || self.fqn.as_deref() == Some(name)
            || short_type_name(&self.name) == short_type_name(name)
    }
}

fn default_true() -> bool {
    true
}

/// A declared type as exported by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Short name.
    pub name: String,
    /// Fully-qualified name. Empty means "same as `name`".
    #[serde(default)]
    pub fqn: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Modifiers.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Source file, relative to the project root.
    #[serde(default)]
    pub file: PathBuf,
    /// Declaration line (1-indexed).
    #[serde(default)]
    pub line: u32,
    /// Direct base type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    /// Full ancestor chain, nearest first.
    #[serde(default)]
    pub ancestors: Vec<AncestorRef>,
    /// Implemented capabilities, direct and transitive.
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Nested type declarations.
    #[serde(default)]
    pub nested: Vec<TypeDecl>,
}

impl TypeDecl {
    /// Returns the fully-qualified name, falling back to the short name.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        if self.fqn.is_empty() {
            &self.name
        } else {
            &self.fqn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, returns: TypeRef) -> Member {
        Member {
            name: name.to_string(),
            kind: MemberKind::Method,
            accessibility: Accessibility::Public,
            is_static: false,
            is_abstract: false,
            is_virtual: false,
            is_override: false,
            parameters: Vec::new(),
            returns: Some(returns),
            declared_type: None,
            mutability: Mutability::ReadOnly,
            setter: None,
            computed: false,
            line: 1,
            body: Body::default(),
        }
    }

    #[test]
    fn short_name_strips_namespace_and_arity() {
        assert_eq!(short_type_name("System.Collections.Generic.List`1"), "List");
        assert_eq!(short_type_name("Order"), "Order");
        assert_eq!(short_type_name("crate::domain::Order"), "Order");
    }

    #[test]
    fn optional_of_self_detection() {
        assert!(TypeRef::named("Order").nullable().is_optional_of("Order"));
        assert!(TypeRef::generic("Option", vec![TypeRef::named("Order")]).is_optional_of("Order"));
        assert!(!TypeRef::generic("Result", vec![TypeRef::named("Order")]).is_optional_of("Order"));
        assert!(!TypeRef::named("Order").is_optional_of("Order"));
    }

    #[test]
    fn return_shapes() {
        let owner = "Order";
        assert_eq!(
            method("ChangeName", TypeRef::named("Order").nullable()).return_shape(owner),
            ReturnShape::OptionalOfSelf
        );
        assert_eq!(
            method("ChangeName", TypeRef::named("Order")).return_shape(owner),
            ReturnShape::SelfType
        );
        assert_eq!(
            method(
                "ChangeName",
                TypeRef::generic("Result", vec![TypeRef::named("Order")])
            )
            .return_shape(owner),
            ReturnShape::Wrapper("Result<Order>".to_string())
        );
        assert_eq!(
            method("ChangeName", TypeRef::named("void")).return_shape(owner),
            ReturnShape::Void
        );
    }

    #[test]
    fn mutable_collections() {
        assert!(TypeRef::generic("List", vec![TypeRef::named("Line")]).is_mutable_collection());
        assert!(TypeRef::named("Line[]").is_mutable_collection());
        assert!(
            !TypeRef::generic("IReadOnlyList", vec![TypeRef::named("Line")])
                .is_mutable_collection()
        );
    }

    #[test]
    fn setter_accessibility_defaults_to_member() {
        let mut prop = method("Name", TypeRef::named("string"));
        prop.kind = MemberKind::Property;
        prop.returns = None;
        prop.mutability = Mutability::Mutable;
        assert_eq!(prop.setter_accessibility(), Some(Accessibility::Public));

        prop.setter = Some(Accessibility::Private);
        assert_eq!(prop.setter_accessibility(), Some(Accessibility::Private));

        prop.mutability = Mutability::InitOnly;
        assert_eq!(prop.setter_accessibility(), None);
    }

    #[test]
    fn deserializes_member_with_defaults() {
        let json = r#"{ "name": "Id", "kind": "property", "accessibility": "public",
                        "type": { "name": "Guid" } }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.kind, MemberKind::Property);
        assert_eq!(member.mutability, Mutability::ReadOnly);
        assert!(member.declared_type.unwrap().is_named("Guid"));
        assert!(!member.body.has_source());
    }
}
