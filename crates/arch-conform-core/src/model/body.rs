//! Member bodies as generic statement/expression trees.
//!
//! The frontend exports bodies in a language-neutral shape: every node has a
//! [`NodeKind`], a source line, an optional name/target/operator and ordered
//! children. Bodies stay as raw JSON until a detector first asks for them.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::sync::OnceLock;

/// Node kinds understood by body-pattern detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// `{ ... }`
    Block,
    /// An expression used as a statement.
    ExpressionStatement,
    /// Local variable declaration. `name` is the variable.
    LocalDeclaration,
    /// Assignment. First child is the target, second the value.
    Assignment,
    /// `return`
    Return,
    /// `if`. Children are the condition, the `then` statement and an
    /// optional `else` statement, in that order.
    If,
    /// Mutual-exclusion block. First child is the lock object.
    Lock,
    /// `throw` statement or expression. `name` is the thrown type when known.
    Throw,
    /// `try` / `catch` / `finally`.
    Try,
    /// Any loop construct.
    Loop,
    /// Method invocation. `name` is the method, `target` the receiver as written.
    Invocation,
    /// Member access. `name` is the member, `target` the receiver as written.
    MemberAccess,
    /// Object creation. `name` is the created type.
    ObjectCreation,
    /// Binary operation. `op` holds the operator.
    Binary,
    /// Unary operation. `op` holds the operator.
    Unary,
    /// Ternary conditional.
    Conditional,
    /// Lambda or local function.
    Lambda,
    /// Identifier reference. `name` is the identifier.
    Identifier,
    /// Literal. `name` holds its text (`null`, `42`, `"x"`).
    Literal,
    /// Pattern test (`x is null`). Children are the operand and the pattern.
    IsPattern,
    /// Anything the frontend does not classify further.
    Other,
}

/// Operators carried by [`NodeKind::Binary`] and [`NodeKind::Unary`] nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Short-circuit conjunction.
    #[serde(rename = "&&")]
    ConditionalAnd,
    /// Short-circuit disjunction.
    #[serde(rename = "||")]
    ConditionalOr,
    /// Non-short-circuit conjunction.
    #[serde(rename = "&")]
    And,
    /// Non-short-circuit disjunction.
    #[serde(rename = "|")]
    Or,
    /// Exclusive or.
    #[serde(rename = "^")]
    Xor,
    /// Equality.
    #[serde(rename = "==")]
    Equal,
    /// Inequality.
    #[serde(rename = "!=")]
    NotEqual,
    /// Null-coalescing.
    #[serde(rename = "??")]
    Coalesce,
    /// Logical negation.
    #[serde(rename = "!")]
    Not,
    /// Comparison.
    #[serde(rename = "<")]
    Less,
    /// Comparison.
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Comparison.
    #[serde(rename = ">")]
    Greater,
    /// Comparison.
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Arithmetic and everything else.
    #[serde(rename = "arith")]
    Arithmetic,
}

impl Operator {
    /// Returns true for `&&` and `||`.
    #[must_use]
    pub fn is_short_circuit(self) -> bool {
        matches!(self, Self::ConditionalAnd | Self::ConditionalOr)
    }

    /// The non-short-circuit counterpart of a short-circuit operator.
    #[must_use]
    pub fn eager_form(self) -> Option<&'static str> {
        match self {
            Self::ConditionalAnd => Some("&"),
            Self::ConditionalOr => Some("|"),
            _ => None,
        }
    }

    /// Source form of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::ConditionalAnd => "&&",
            Self::ConditionalOr => "||",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Coalesce => "??",
            Self::Not => "!",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Arithmetic => "arith",
        }
    }
}

/// One statement or expression in a member body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Source line (1-indexed).
    #[serde(default)]
    pub line: u32,
    /// Name payload (see [`NodeKind`] for its meaning per kind).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Receiver/qualifier as written (`this`, `ValidationHelper`, `DateTime`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Operator for binary and unary nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<Operator>,
    /// Ordered child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node without payload or children.
    #[must_use]
    pub fn new(kind: NodeKind, line: u32) -> Self {
        Self {
            kind,
            line,
            name: None,
            target: None,
            op: None,
            children: Vec::new(),
        }
    }

    /// Sets the name payload.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the receiver/qualifier.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the operator.
    #[must_use]
    pub fn with_op(mut self, op: Operator) -> Self {
        self.op = Some(op);
        self
    }

    /// Appends children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns the name payload, or `""`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Returns the receiver, or `""`.
    #[must_use]
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or("")
    }

    /// Returns true for an invocation of `method` (any receiver).
    #[must_use]
    pub fn is_invocation_of(&self, method: &str) -> bool {
        self.kind == NodeKind::Invocation && self.name() == method
    }

    /// Returns true for invocations on the current instance (no receiver, `this`, `base`).
    #[must_use]
    pub fn is_self_invocation(&self) -> bool {
        self.kind == NodeKind::Invocation && matches!(self.target(), "" | "this" | "self" | "base")
    }

    /// Returns true for the `null` literal.
    #[must_use]
    pub fn is_null_literal(&self) -> bool {
        self.kind == NodeKind::Literal && matches!(self.name(), "null" | "nil" | "None")
    }

    /// Returns true for a null test: `x == null`, `null == x`, `x is null`.
    #[must_use]
    pub fn is_null_check(&self) -> bool {
        match self.kind {
            NodeKind::Binary => {
                self.op == Some(Operator::Equal) && self.children.iter().any(Node::is_null_literal)
            }
            NodeKind::IsPattern => self.children.iter().any(Node::is_null_literal),
            _ => false,
        }
    }

    /// Condition of an `if`.
    #[must_use]
    pub fn condition(&self) -> Option<&Node> {
        (self.kind == NodeKind::If).then(|| self.children.first()).flatten()
    }

    /// Statement run when the condition of an `if` holds.
    #[must_use]
    pub fn then_branch(&self) -> Option<&Node> {
        (self.kind == NodeKind::If).then(|| self.children.get(1)).flatten()
    }

    /// `else` statement of an `if`, if any.
    #[must_use]
    pub fn else_branch(&self) -> Option<&Node> {
        (self.kind == NodeKind::If).then(|| self.children.get(2)).flatten()
    }

    /// Pre-order traversal of this node and all of its descendants.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Pre-order traversal over a sequence of sibling nodes.
    #[must_use]
    pub fn walk(nodes: &[Node]) -> Descendants<'_> {
        Descendants {
            stack: nodes.iter().rev().collect(),
        }
    }
}

/// Lazy pre-order iterator over a node tree.
///
/// Pre-order visits nodes in source order, so the first match of a search is
/// the earliest construct in the body. Calling [`Node::walk`] again restarts
/// the traversal.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A member body, parsed from its raw form on first access.
#[derive(Debug, Clone, Default)]
pub struct Body {
    raw: Option<Box<RawValue>>,
    parsed: OnceLock<Result<Vec<Node>, String>>,
}

impl Body {
    /// Creates an already-materialized body.
    #[must_use]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let parsed = OnceLock::new();
        let _ = parsed.set(Ok(nodes));
        Self { raw: None, parsed }
    }

    /// Creates a body that is parsed from `raw` JSON on first access.
    #[must_use]
    pub fn from_raw(raw: Box<RawValue>) -> Self {
        Self {
            raw: Some(raw),
            parsed: OnceLock::new(),
        }
    }

    /// Returns true if the frontend exported a body (raw or materialized).
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.raw.is_some() || self.parsed.get().is_some_and(|p| !matches!(p, Ok(v) if v.is_empty()))
    }

    /// Returns true once the statement tree has been built.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.parsed.get().is_some()
    }

    /// Returns the top-level statements, parsing them on first call.
    ///
    /// # Errors
    ///
    /// Returns the parse error message if the exported body is not a valid
    /// node sequence. The error is cached, so repeated calls agree.
    pub fn nodes(&self) -> Result<&[Node], &str> {
        let parsed = self.parsed.get_or_init(|| match &self.raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str::<Vec<Node>>(raw.get()).map_err(|e| e.to_string()),
        });
        match parsed {
            Ok(nodes) => Ok(nodes.as_slice()),
            Err(message) => Err(message.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Body {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Box<RawValue>>::deserialize(deserializer)?;
        Ok(raw.map_or_else(Self::default, Self::from_raw))
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(raw) = &self.raw {
            return raw.serialize(serializer);
        }
        match self.parsed.get() {
            Some(Ok(nodes)) => nodes.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Node> {
        vec![
            Node::new(NodeKind::If, 3).with_children([
                Node::new(NodeKind::Binary, 3)
                    .with_op(Operator::Equal)
                    .with_children([
                        Node::new(NodeKind::Identifier, 3).with_name("clock"),
                        Node::new(NodeKind::Literal, 3).with_name("null"),
                    ]),
                Node::new(NodeKind::Throw, 4).with_name("ArgumentNullException"),
            ]),
            Node::new(NodeKind::Return, 6),
        ]
    }

    #[test]
    fn walk_is_pre_order() {
        let nodes = sample();
        let kinds: Vec<NodeKind> = Node::walk(&nodes).map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::If,
                NodeKind::Binary,
                NodeKind::Identifier,
                NodeKind::Literal,
                NodeKind::Throw,
                NodeKind::Return,
            ]
        );
    }

    #[test]
    fn if_branches_follow_child_layout() {
        let nodes = sample();
        let guard = &nodes[0];
        assert_eq!(guard.condition().map(|c| c.kind), Some(NodeKind::Binary));
        assert_eq!(guard.then_branch().map(|t| t.line), Some(4));
        assert!(guard.else_branch().is_none());
        assert!(nodes[1].condition().is_none());
    }

    #[test]
    fn walk_is_restartable() {
        let nodes = sample();
        let first = Node::walk(&nodes).count();
        let second = Node::walk(&nodes).count();
        assert_eq!(first, second);
    }

    #[test]
    fn null_check_detection() {
        let nodes = sample();
        assert!(nodes[0].children[0].is_null_check());
        assert!(!nodes[1].is_null_check());
    }

    #[test]
    fn raw_body_is_parsed_lazily() {
        let raw = RawValue::from_string(
            r#"[{ "kind": "invocation", "line": 7, "name": "RegisterChange" }]"#.to_string(),
        )
        .unwrap();
        let body = Body::from_raw(raw);
        assert!(!body.is_materialized());

        let nodes = body.nodes().unwrap();
        assert!(nodes[0].is_invocation_of("RegisterChange"));
        assert!(body.is_materialized());
    }

    #[test]
    fn malformed_body_reports_error_every_time() {
        let raw = RawValue::from_string(r#"[{ "kind": "goto" }]"#.to_string()).unwrap();
        let body = Body::from_raw(raw);
        assert!(body.nodes().is_err());
        assert!(body.nodes().is_err());
    }

    #[test]
    fn operators_deserialize_from_symbols() {
        let node: Node =
            serde_json::from_str(r#"{ "kind": "binary", "line": 1, "op": "&&" }"#).unwrap();
        assert_eq!(node.op, Some(Operator::ConditionalAnd));
        assert_eq!(node.op.and_then(Operator::eager_form), Some("&"));
    }
}
