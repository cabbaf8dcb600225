//! Reusable detection strategies the rules are composed from.
//!
//! None of these hold state across types: every function takes the symbol
//! it inspects and returns the first finding, if any.

pub mod body;
pub mod cross_member;
pub mod lineage;
pub mod metadata;
pub mod structural;

use arch_conform_core::model::{Member, TypeSymbol};

/// `Type.Member`, the hint target for member-level findings.
pub(crate) fn member_target(symbol: &TypeSymbol<'_>, member: &Member) -> String {
    format!("{}.{}", symbol.fqn(), member.name)
}
