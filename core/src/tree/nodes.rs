//! Constructors for synthesized nodes.
//!
//! Rewriting passes build new fragments with these. Every child handed in
//! must be a detached root (freshly built, copied, or detached); the new
//! node takes ownership of it.

use smallvec::SmallVec;

use super::{Ast, Kind, Node, NodeId, NodeKind, Seq, Slot, TreeError};
use crate::bindings::TypeRef;

impl<'t> Ast<'t> {
    /// Validate the children of a not-yet-allocated node, then allocate it.
    pub(super) fn attach_new(&mut self, node: Node<'t>) -> Result<NodeId, TreeError> {
        let mut seen = SmallVec::<[NodeId; 4]>::new();
        for (field, child) in node.kind.child_fields() {
            self.check_attachable(None, field, child)?;
            if seen.contains(&child) {
                return Err(TreeError::DuplicateChild(child));
            }
            seen.push(child);
        }
        Ok(self.alloc(node))
    }

    fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(Node::new(kind))
    }

    pub fn number_literal(&mut self, token: impl Into<String>) -> NodeId {
        self.leaf(NodeKind::NumberLiteral(token.into()))
    }

    pub fn boolean_literal(&mut self, value: bool) -> NodeId {
        self.leaf(NodeKind::BooleanLiteral(value))
    }

    pub fn string_literal(&mut self, text: impl Into<String>) -> NodeId {
        self.leaf(NodeKind::StringLiteral(text.into()))
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.leaf(NodeKind::NullLiteral)
    }

    pub fn simple_name(&mut self, identifier: impl Into<String>) -> NodeId {
        self.leaf(NodeKind::SimpleName(identifier.into()))
    }

    pub fn parenthesized(&mut self, expression: NodeId) -> Result<NodeId, TreeError> {
        self.attach_new(Node::new(NodeKind::ParenthesizedExpression {
            expression: Slot(Some(expression)),
        }))
    }

    pub fn conditional(
        &mut self,
        type_binding: Option<TypeRef<'t>>,
        expression: NodeId,
        then_expression: NodeId,
        else_expression: NodeId,
    ) -> Result<NodeId, TreeError> {
        let mut node = Node::new(NodeKind::ConditionalExpression {
            expression: Slot(Some(expression)),
            then_expression: Slot(Some(then_expression)),
            else_expression: Slot(Some(else_expression)),
        });
        node.type_binding = type_binding;
        self.attach_new(node)
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> Result<NodeId, TreeError> {
        self.attach_new(Node::new(NodeKind::ExpressionStatement {
            expression: Slot(Some(expression)),
        }))
    }

    pub fn return_statement(&mut self, expression: Option<NodeId>) -> Result<NodeId, TreeError> {
        self.attach_new(Node::new(NodeKind::ReturnStatement {
            expression: Slot(expression),
        }))
    }

    pub fn block(
        &mut self,
        statements: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, TreeError> {
        self.attach_new(Node::new(NodeKind::Block {
            statements: Seq(statements.into_iter().collect()),
        }))
    }

    pub fn if_statement(
        &mut self,
        expression: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        self.attach_new(Node::new(NodeKind::IfStatement {
            expression: Slot(Some(expression)),
            then_statement: Slot(Some(then_statement)),
            else_statement: Slot(else_statement),
        }))
    }

    /// Identifier of a `SimpleName`.
    pub fn identifier(&self, id: NodeId) -> Result<&str, TreeError> {
        match &self.node(id)?.kind {
            NodeKind::SimpleName(identifier) => Ok(identifier),
            other => Err(TreeError::KindMismatch {
                expected: Kind::SimpleName,
                found: other.kind(),
            }),
        }
    }
}
