//! Rule enforcing clone-and-replace in `Change{X}` methods.
//!
//! # Rationale
//!
//! A `Change{X}` method never touches the current instance. It copies
//! itself, applies the change to the copy, validates the copy and returns
//! it, so a rejected change leaves the original untouched.
//!
//! # Detected Patterns
//!
//! - Assignments to `this.X` or to an own member inside the method
//! - No copy construction in the method or anything it calls

use std::collections::BTreeSet;

use arch_conform_core::model::{short_type_name, Member, Node, NodeKind, TypeSymbol};
use arch_conform_core::{FixAction, ModelError, RemediationHint, RuleContext, Violation};

use crate::controlled_mutation::public_change_methods;
use crate::detectors::body::contains;
use crate::detectors::cross_member::CallGraph;
use crate::detectors::member_target;

const CLONE_METHODS: &[&str] = &["Clone", "With", "MemberwiseClone"];

declare_rule! {
    /// Requires `Change{X}` methods to mutate a copy, never `this`.
    pub struct ChangeClonesSelf {
        code: "DC024",
        name: "change-clones-self",
        severity: Error,
        eligibility: ConcreteEntity,
        doc: "change-clones-self.md",
        description: "`Change{X}` copies the entity and mutates the copy",
    }
}

/// The assignment target if it names state of the current instance.
fn self_state_target<'n>(
    assignment: &'n Node,
    own_state: &BTreeSet<&str>,
    locals: &BTreeSet<&str>,
) -> Option<String> {
    let target = assignment.children.first()?;
    match target.kind {
        NodeKind::MemberAccess if target.target() == "this" => {
            Some(format!("this.{}", target.name()))
        }
        NodeKind::Identifier
            if own_state.contains(target.name()) && !locals.contains(target.name()) =>
        {
            Some(target.name().to_string())
        }
        _ => None,
    }
}

fn creates_copy(nodes: &[Node], owner: &str) -> bool {
    contains(nodes, |n| match n.kind {
        NodeKind::ObjectCreation => short_type_name(n.name()) == owner,
        NodeKind::Invocation => CLONE_METHODS.contains(&n.name()),
        _ => false,
    })
}

impl ChangeClonesSelf {
    fn copies_through_calls(
        symbol: &TypeSymbol<'_>,
        graph: &CallGraph<'_>,
        method: &Member,
    ) -> Result<bool, ModelError> {
        for callee in graph.reachable_from(&method.name) {
            for overload in symbol.methods().filter(|m| m.name == callee) {
                if creates_copy(symbol.body(overload)?, symbol.name()) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn detect(&self, ctx: &RuleContext<'_>) -> Result<Option<Violation>, ModelError> {
        let symbol = &ctx.symbol;
        let owner = symbol.name();
        let own_state: BTreeSet<&str> = symbol.data_members().map(|m| m.name.as_str()).collect();
        let mut graph = None;

        for method in public_change_methods(symbol) {
            if !method.body.has_source() {
                continue;
            }
            let body = symbol.body(method)?;
            let locals: BTreeSet<&str> = method
                .parameters
                .iter()
                .map(|p| p.name.as_str())
                .chain(
                    Node::walk(body)
                        .filter(|n| n.kind == NodeKind::LocalDeclaration)
                        .map(Node::name),
                )
                .collect();

            let direct = Node::walk(body)
                .filter(|n| n.kind == NodeKind::Assignment)
                .find_map(|n| self_state_target(n, &own_state, &locals).map(|t| (n, t)));
            if let Some((assignment, target)) = direct {
                return Ok(Some(ctx.violation(
                    self,
                    assignment.line,
                    format!(
                        "`{}` assigns `{target}` on the current instance; mutate a copy instead",
                        method.name
                    ),
                    RemediationHint::new(FixAction::ReplaceConstruct, member_target(symbol, method))
                        .with_snippet(format!("var clone = new {owner}(this);")),
                )));
            }

            if creates_copy(body, owner) {
                continue;
            }
            let graph = match &mut graph {
                Some(graph) => graph,
                None => graph.insert(CallGraph::build(symbol)?),
            };
            if !Self::copies_through_calls(symbol, graph, method)? {
                return Ok(Some(ctx.violation(
                    self,
                    method.line,
                    format!("`{}` never creates a copy of `{owner}`", method.name),
                    RemediationHint::new(FixAction::ReplaceConstruct, member_target(symbol, method))
                        .with_snippet(format!("var clone = new {owner}(this);")),
                )));
            }
        }
        Ok(None)
    }
}
