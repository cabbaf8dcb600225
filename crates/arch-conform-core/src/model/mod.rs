//! The Symbol Model: declared types, their members and bodies, and the
//! workspace-wide indexes rules read while evaluating them.

pub mod body;
pub mod decl;
pub mod index;
pub mod symbol;
pub mod workspace;

pub use body::{Body, Descendants, Node, NodeKind, Operator};
pub use decl::{
    short_type_name, Accessibility, AncestorRef, Member, MemberKind, Modifiers, Mutability,
    Parameter, ReturnShape, TypeDecl, TypeKind, TypeRef,
};
pub use index::{DeclarationSite, InheritanceIndex, WorkspaceIndex};
pub use symbol::TypeSymbol;
pub use workspace::{ProjectSnapshot, Workspace};
