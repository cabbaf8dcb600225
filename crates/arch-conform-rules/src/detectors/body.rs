//! First-match searches over member bodies.
//!
//! All searches are pre-order, so the node reported is the earliest
//! offending construct in source order. Bodies are only parsed for the
//! members a search actually visits.

use arch_conform_core::model::{Member, Node, TypeSymbol};
use arch_conform_core::ModelError;

/// A match inside some member's body.
#[derive(Debug, Clone, Copy)]
pub struct BodyMatch<'a> {
    /// Member whose body matched.
    pub member: &'a Member,
    /// Matching node.
    pub node: &'a Node,
}

/// First node, across `members` in order, for which `pred` holds.
///
/// # Errors
///
/// Returns an error if a visited body is malformed.
pub fn find_in<'a>(
    symbol: &TypeSymbol<'a>,
    members: impl IntoIterator<Item = &'a Member>,
    mut pred: impl FnMut(&'a Node) -> bool,
) -> Result<Option<BodyMatch<'a>>, ModelError> {
    for member in members {
        let body = symbol.body(member)?;
        if let Some(node) = Node::walk(body).find(|&n| pred(n)) {
            return Ok(Some(BodyMatch { member, node }));
        }
    }
    Ok(None)
}

/// First node for which `pred` holds, given the chain of enclosing nodes
/// (outermost first).
pub fn find_with_ancestors<'n>(
    nodes: &'n [Node],
    pred: &mut impl FnMut(&'n Node, &[&'n Node]) -> bool,
) -> Option<&'n Node> {
    fn visit<'n>(
        node: &'n Node,
        path: &mut Vec<&'n Node>,
        pred: &mut impl FnMut(&'n Node, &[&'n Node]) -> bool,
    ) -> Option<&'n Node> {
        if pred(node, path) {
            return Some(node);
        }
        path.push(node);
        let found = node.children.iter().find_map(|child| visit(child, path, pred));
        path.pop();
        found
    }

    let mut path = Vec::new();
    nodes.iter().find_map(|node| visit(node, &mut path, pred))
}

/// Returns true if any node in `nodes` satisfies `pred`.
pub fn contains(nodes: &[Node], pred: impl Fn(&Node) -> bool) -> bool {
    Node::walk(nodes).any(pred)
}

/// All nodes satisfying `pred`, in source order.
pub fn collect<'n>(nodes: &'n [Node], pred: impl Fn(&Node) -> bool) -> Vec<&'n Node> {
    Node::walk(nodes).filter(|n| pred(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::model::{NodeKind, Operator};
    use arch_conform_core::testing::node;

    #[test]
    fn ancestors_are_outermost_first() {
        let nodes = vec![node::if_(
            node::is_null("clock", 2),
            [node::throw("ArgumentNullException", 3)],
            2,
        )];

        let mut seen_path = Vec::new();
        let found = find_with_ancestors(&nodes, &mut |n, path| {
            if n.kind == NodeKind::Throw {
                seen_path = path.iter().map(|p| p.kind).collect();
                true
            } else {
                false
            }
        });

        assert_eq!(found.map(|n| n.line), Some(3));
        assert_eq!(seen_path, vec![NodeKind::If, NodeKind::Block]);
    }

    #[test]
    fn collect_is_in_source_order() {
        let nodes = vec![
            node::stmt(node::call("RegisterChange", 4)),
            node::if_(
                node::binary(
                    Operator::ConditionalAnd,
                    node::ident("a", 5),
                    node::ident("b", 5),
                    5,
                ),
                [node::stmt(node::call("RegisterChange", 6))],
                5,
            ),
        ];
        let calls = collect(&nodes, |n| n.is_invocation_of("RegisterChange"));
        let lines: Vec<u32> = calls.iter().map(|n| n.line).collect();
        assert_eq!(lines, vec![4, 6]);
        assert!(contains(&nodes, |n| n.op == Some(Operator::ConditionalAnd)));
    }
}
