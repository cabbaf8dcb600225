//! Consistency between members of the same type.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use arch_conform_core::model::{Node, NodeKind, TypeSymbol};
use arch_conform_core::ModelError;

/// Intra-type call graph: which of the type's own methods each method invokes.
///
/// Calls are matched by method name regardless of receiver, so
/// `clone.ChangeNameInternal(name)` counts as a call from the enclosing
/// method to `ChangeNameInternal`. Overloads share one node.
#[derive(Debug, Clone, Default)]
pub struct CallGraph<'a> {
    edges: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> CallGraph<'a> {
    /// Builds the graph from every method and constructor body of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if any body is malformed.
    pub fn build(symbol: &TypeSymbol<'a>) -> Result<Self, ModelError> {
        let own: BTreeSet<&'a str> = symbol.methods().map(|m| m.name.as_str()).collect();
        let mut edges: BTreeMap<&'a str, BTreeSet<&'a str>> = BTreeMap::new();

        for member in symbol
            .members()
            .filter(|m| m.is_method() || m.is_constructor())
        {
            let callees = edges.entry(member.name.as_str()).or_default();
            for node in Node::walk(symbol.body(member)?) {
                if node.kind == NodeKind::Invocation {
                    if let Some(&callee) = own.get(node.name()) {
                        callees.insert(callee);
                    }
                }
            }
        }

        Ok(Self { edges })
    }

    /// Own methods directly invoked by `method`.
    pub fn callees(&self, method: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.edges
            .get(method)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Every own method reachable from `method` through one or more calls,
    /// in breadth-first order. `method` itself is included only if it is
    /// part of a cycle.
    #[must_use]
    pub fn reachable_from(&self, method: &str) -> Vec<&'a str> {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<&'a str> = self.callees(method).collect();

        while let Some(next) = queue.pop_front() {
            if seen.insert(next) {
                order.push(next);
                queue.extend(self.callees(next));
            }
        }
        order
    }

    /// Returns true if some method reachable from `method` satisfies `pred`.
    pub fn reaches(&self, method: &str, pred: impl Fn(&str) -> bool) -> bool {
        self.reachable_from(method).into_iter().any(pred)
    }

    /// Returns true if any method other than `method` itself calls it.
    #[must_use]
    pub fn is_called(&self, method: &str) -> bool {
        self.edges
            .iter()
            .any(|(caller, callees)| *caller != method && callees.contains(method))
    }
}

/// Invocations of any of `methods`, in source order.
pub fn invocations_of<'n>(nodes: &'n [Node], methods: &[String]) -> Vec<&'n Node> {
    Node::walk(nodes)
        .filter(|n| n.kind == NodeKind::Invocation && methods.iter().any(|m| m == n.name()))
        .collect()
}
