//! Infix expressions.
//!
//! `a + b + c + d` is a single node: left `a`, right `b`, extended
//! operands `[c, d]`, all sharing one operator. Operands are traversed left
//! to right in exactly that order.

use smallvec::SmallVec;

use super::{Ast, Field, Kind, Node, NodeId, NodeKind, Seq, SeqMut, Slot, TreeError};
use crate::bindings::TypeRef;
use crate::ops::Operator;

impl<'t> Ast<'t> {
    /// Build an infix expression from two detached operands. Extended
    /// operands start out empty.
    pub fn infix(
        &mut self,
        type_binding: Option<TypeRef<'t>>,
        operator: Operator,
        left_operand: NodeId,
        right_operand: NodeId,
    ) -> Result<NodeId, TreeError> {
        self.infix_chain(type_binding, operator, left_operand, right_operand, Vec::new())
    }

    /// Build an infix expression with its extended operands in one step.
    /// Either every operand is claimed or none is.
    pub(crate) fn infix_chain(
        &mut self,
        type_binding: Option<TypeRef<'t>>,
        operator: Operator,
        left_operand: NodeId,
        right_operand: NodeId,
        extended_operands: Vec<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let mut node = Node::new(NodeKind::InfixExpression {
            operator,
            left_operand: Slot(Some(left_operand)),
            right_operand: Slot(Some(right_operand)),
            extended_operands: Seq(extended_operands),
        });
        node.type_binding = type_binding;
        self.attach_new(node)
    }

    /// The operator and kind of an infix node, or `KindMismatch`.
    fn expect_infix(&self, id: NodeId) -> Result<(Operator, &NodeKind), TreeError> {
        let kind = &self.node(id)?.kind;
        match kind {
            NodeKind::InfixExpression { operator, .. } => Ok((*operator, kind)),
            other => Err(TreeError::KindMismatch {
                expected: Kind::InfixExpression,
                found: other.kind(),
            }),
        }
    }

    fn operand(&self, id: NodeId, field: Field) -> Result<NodeId, TreeError> {
        self.expect_infix(id)?;
        self.slot(id, field)?
            .ok_or(TreeError::EmptySlot { parent: id, field })
    }

    pub fn operator(&self, id: NodeId) -> Result<Operator, TreeError> {
        let (operator, _) = self.expect_infix(id)?;
        Ok(operator)
    }

    pub fn left_operand(&self, id: NodeId) -> Result<NodeId, TreeError> {
        self.operand(id, Field::LeftOperand)
    }

    /// Install a detached node as left operand; the previous one is
    /// destroyed.
    pub fn set_left_operand(&mut self, id: NodeId, operand: NodeId) -> Result<(), TreeError> {
        self.expect_infix(id)?;
        self.set_slot(id, Field::LeftOperand, operand)
    }

    pub fn right_operand(&self, id: NodeId) -> Result<NodeId, TreeError> {
        self.operand(id, Field::RightOperand)
    }

    pub fn set_right_operand(&mut self, id: NodeId, operand: NodeId) -> Result<(), TreeError> {
        self.expect_infix(id)?;
        self.set_slot(id, Field::RightOperand, operand)
    }

    pub fn extended_operands(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        self.expect_infix(id)?;
        self.seq(id, Field::ExtendedOperands)
    }

    /// Live view of the extended operands. The node never drops entries on
    /// its own; only the caller appends or removes.
    pub fn extended_operands_mut(&mut self, id: NodeId) -> Result<SeqMut<'_, 't>, TreeError> {
        self.expect_infix(id)?;
        self.seq_mut(id, Field::ExtendedOperands)
    }

    /// Left, right and extended operands, in evaluation order.
    pub fn operands(&self, id: NodeId) -> Result<SmallVec<[NodeId; 4]>, TreeError> {
        let (_, kind) = self.expect_infix(id)?;
        Ok(kind.children())
    }
}
