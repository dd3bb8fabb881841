use core::fmt;

use smallvec::SmallVec;

use super::NodeId;
use crate::ops::Operator;

/// Discriminant of every node variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    NumberLiteral,
    BooleanLiteral,
    StringLiteral,
    NullLiteral,
    SimpleName,
    ParenthesizedExpression,
    InfixExpression,
    ConditionalExpression,
    ExpressionStatement,
    ReturnStatement,
    Block,
    IfStatement,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Expression,
    Statement,
}

impl Kind {
    pub fn category(self) -> Category {
        match self {
            Kind::NumberLiteral
            | Kind::BooleanLiteral
            | Kind::StringLiteral
            | Kind::NullLiteral
            | Kind::SimpleName
            | Kind::ParenthesizedExpression
            | Kind::InfixExpression
            | Kind::ConditionalExpression => Category::Expression,
            Kind::ExpressionStatement | Kind::ReturnStatement | Kind::Block | Kind::IfStatement => {
                Category::Statement
            }
        }
    }

    pub fn is_expression(self) -> bool {
        self.category() == Category::Expression
    }

    pub fn is_statement(self) -> bool {
        self.category() == Category::Statement
    }
}

/// Named child position of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Expression,
    LeftOperand,
    RightOperand,
    ExtendedOperands,
    ThenExpression,
    ElseExpression,
    ThenStatement,
    ElseStatement,
    Statements,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Expression => "expression",
            Field::LeftOperand => "left_operand",
            Field::RightOperand => "right_operand",
            Field::ExtendedOperands => "extended_operands",
            Field::ThenExpression => "then_expression",
            Field::ElseExpression => "else_expression",
            Field::ThenStatement => "then_statement",
            Field::ElseStatement => "else_statement",
            Field::Statements => "statements",
        }
    }

    /// Category of the nodes this field accepts.
    pub fn category(self) -> Category {
        match self {
            Field::ThenStatement | Field::ElseStatement | Field::Statements => Category::Statement,
            _ => Category::Expression,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zero-or-one owned child.
///
/// Only [`Ast`](super::Ast) can change the occupant, so ownership is always
/// tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot(pub(super) Option<NodeId>);

impl Slot {
    pub fn get(&self) -> Option<NodeId> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Ordered owned children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seq(pub(super) Vec<NodeId>);

impl Seq {
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }
}

/// Variant payload of a node, including its owned children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    NumberLiteral(String),
    BooleanLiteral(bool),
    StringLiteral(String),
    NullLiteral,
    SimpleName(String),
    ParenthesizedExpression {
        expression: Slot,
    },
    InfixExpression {
        operator: Operator,
        left_operand: Slot,
        right_operand: Slot,
        extended_operands: Seq,
    },
    ConditionalExpression {
        expression: Slot,
        then_expression: Slot,
        else_expression: Slot,
    },
    ExpressionStatement {
        expression: Slot,
    },
    ReturnStatement {
        expression: Slot,
    },
    Block {
        statements: Seq,
    },
    IfStatement {
        expression: Slot,
        then_statement: Slot,
        else_statement: Slot,
    },
}

pub(crate) type ChildFields = SmallVec<[(Field, NodeId); 4]>;

impl NodeKind {
    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::NumberLiteral(_) => Kind::NumberLiteral,
            NodeKind::BooleanLiteral(_) => Kind::BooleanLiteral,
            NodeKind::StringLiteral(_) => Kind::StringLiteral,
            NodeKind::NullLiteral => Kind::NullLiteral,
            NodeKind::SimpleName(_) => Kind::SimpleName,
            NodeKind::ParenthesizedExpression { .. } => Kind::ParenthesizedExpression,
            NodeKind::InfixExpression { .. } => Kind::InfixExpression,
            NodeKind::ConditionalExpression { .. } => Kind::ConditionalExpression,
            NodeKind::ExpressionStatement { .. } => Kind::ExpressionStatement,
            NodeKind::ReturnStatement { .. } => Kind::ReturnStatement,
            NodeKind::Block { .. } => Kind::Block,
            NodeKind::IfStatement { .. } => Kind::IfStatement,
        }
    }

    pub(crate) fn slot(&self, field: Field) -> Option<&Slot> {
        match (self, field) {
            (NodeKind::ParenthesizedExpression { expression }, Field::Expression)
            | (NodeKind::ExpressionStatement { expression }, Field::Expression)
            | (NodeKind::ReturnStatement { expression }, Field::Expression) => Some(expression),
            (NodeKind::InfixExpression { left_operand, .. }, Field::LeftOperand) => {
                Some(left_operand)
            }
            (NodeKind::InfixExpression { right_operand, .. }, Field::RightOperand) => {
                Some(right_operand)
            }
            (NodeKind::ConditionalExpression { expression, .. }, Field::Expression)
            | (NodeKind::IfStatement { expression, .. }, Field::Expression) => Some(expression),
            (NodeKind::ConditionalExpression { then_expression, .. }, Field::ThenExpression) => {
                Some(then_expression)
            }
            (NodeKind::ConditionalExpression { else_expression, .. }, Field::ElseExpression) => {
                Some(else_expression)
            }
            (NodeKind::IfStatement { then_statement, .. }, Field::ThenStatement) => {
                Some(then_statement)
            }
            (NodeKind::IfStatement { else_statement, .. }, Field::ElseStatement) => {
                Some(else_statement)
            }
            _ => None,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: Field) -> Option<&mut Slot> {
        match (self, field) {
            (NodeKind::ParenthesizedExpression { expression }, Field::Expression)
            | (NodeKind::ExpressionStatement { expression }, Field::Expression)
            | (NodeKind::ReturnStatement { expression }, Field::Expression) => Some(expression),
            (NodeKind::InfixExpression { left_operand, .. }, Field::LeftOperand) => {
                Some(left_operand)
            }
            (NodeKind::InfixExpression { right_operand, .. }, Field::RightOperand) => {
                Some(right_operand)
            }
            (NodeKind::ConditionalExpression { expression, .. }, Field::Expression)
            | (NodeKind::IfStatement { expression, .. }, Field::Expression) => Some(expression),
            (NodeKind::ConditionalExpression { then_expression, .. }, Field::ThenExpression) => {
                Some(then_expression)
            }
            (NodeKind::ConditionalExpression { else_expression, .. }, Field::ElseExpression) => {
                Some(else_expression)
            }
            (NodeKind::IfStatement { then_statement, .. }, Field::ThenStatement) => {
                Some(then_statement)
            }
            (NodeKind::IfStatement { else_statement, .. }, Field::ElseStatement) => {
                Some(else_statement)
            }
            _ => None,
        }
    }

    pub(crate) fn seq(&self, field: Field) -> Option<&Seq> {
        match (self, field) {
            (NodeKind::InfixExpression { extended_operands, .. }, Field::ExtendedOperands) => {
                Some(extended_operands)
            }
            (NodeKind::Block { statements }, Field::Statements) => Some(statements),
            _ => None,
        }
    }

    pub(crate) fn seq_mut(&mut self, field: Field) -> Option<&mut Seq> {
        match (self, field) {
            (NodeKind::InfixExpression { extended_operands, .. }, Field::ExtendedOperands) => {
                Some(extended_operands)
            }
            (NodeKind::Block { statements }, Field::Statements) => Some(statements),
            _ => None,
        }
    }

    /// Whether `field` may be left empty.
    pub fn is_optional(&self, field: Field) -> bool {
        matches!(
            (self, field),
            (NodeKind::ReturnStatement { .. }, Field::Expression)
                | (NodeKind::IfStatement { .. }, Field::ElseStatement)
        )
    }

    /// Owned children paired with the field holding them, in traversal
    /// order. Sequence fields contribute one entry per element.
    pub(crate) fn child_fields(&self) -> ChildFields {
        fn slot(out: &mut ChildFields, field: Field, slot: &Slot) {
            if let Some(id) = slot.get() {
                out.push((field, id));
            }
        }

        let mut out = ChildFields::new();
        match self {
            NodeKind::NumberLiteral(_)
            | NodeKind::BooleanLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::NullLiteral
            | NodeKind::SimpleName(_) => {}
            NodeKind::ParenthesizedExpression { expression }
            | NodeKind::ExpressionStatement { expression }
            | NodeKind::ReturnStatement { expression } => {
                slot(&mut out, Field::Expression, expression);
            }
            NodeKind::InfixExpression {
                left_operand,
                right_operand,
                extended_operands,
                ..
            } => {
                slot(&mut out, Field::LeftOperand, left_operand);
                slot(&mut out, Field::RightOperand, right_operand);
                out.extend(extended_operands.iter().map(|id| (Field::ExtendedOperands, id)));
            }
            NodeKind::ConditionalExpression {
                expression,
                then_expression,
                else_expression,
            } => {
                slot(&mut out, Field::Expression, expression);
                slot(&mut out, Field::ThenExpression, then_expression);
                slot(&mut out, Field::ElseExpression, else_expression);
            }
            NodeKind::Block { statements } => {
                out.extend(statements.iter().map(|id| (Field::Statements, id)));
            }
            NodeKind::IfStatement {
                expression,
                then_statement,
                else_statement,
            } => {
                slot(&mut out, Field::Expression, expression);
                slot(&mut out, Field::ThenStatement, then_statement);
                slot(&mut out, Field::ElseStatement, else_statement);
            }
        }
        out
    }

    /// Owned children in traversal order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        self.child_fields().into_iter().map(|(_, id)| id).collect()
    }

    /// Rebuild this payload with every child passed through `f`, keeping
    /// slot and sequence positions. Children are visited in traversal order.
    pub(crate) fn try_map_children<E>(
        &self,
        mut f: impl FnMut(NodeId) -> Result<NodeId, E>,
    ) -> Result<NodeKind, E> {
        fn slot<E>(
            slot: &Slot,
            f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
        ) -> Result<Slot, E> {
            slot.get().map(f).transpose().map(Slot)
        }

        fn seq<E>(seq: &Seq, f: &mut impl FnMut(NodeId) -> Result<NodeId, E>) -> Result<Seq, E> {
            seq.iter().map(f).collect::<Result<Vec<_>, E>>().map(Seq)
        }

        Ok(match self {
            NodeKind::NumberLiteral(_)
            | NodeKind::BooleanLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::NullLiteral
            | NodeKind::SimpleName(_) => self.clone(),
            NodeKind::ParenthesizedExpression { expression } => {
                NodeKind::ParenthesizedExpression {
                    expression: slot(expression, &mut f)?,
                }
            }
            NodeKind::InfixExpression {
                operator,
                left_operand,
                right_operand,
                extended_operands,
            } => NodeKind::InfixExpression {
                operator: *operator,
                left_operand: slot(left_operand, &mut f)?,
                right_operand: slot(right_operand, &mut f)?,
                extended_operands: seq(extended_operands, &mut f)?,
            },
            NodeKind::ConditionalExpression {
                expression,
                then_expression,
                else_expression,
            } => NodeKind::ConditionalExpression {
                expression: slot(expression, &mut f)?,
                then_expression: slot(then_expression, &mut f)?,
                else_expression: slot(else_expression, &mut f)?,
            },
            NodeKind::ExpressionStatement { expression } => NodeKind::ExpressionStatement {
                expression: slot(expression, &mut f)?,
            },
            NodeKind::ReturnStatement { expression } => NodeKind::ReturnStatement {
                expression: slot(expression, &mut f)?,
            },
            NodeKind::Block { statements } => NodeKind::Block {
                statements: seq(statements, &mut f)?,
            },
            NodeKind::IfStatement {
                expression,
                then_statement,
                else_statement,
            } => NodeKind::IfStatement {
                expression: slot(expression, &mut f)?,
                then_statement: slot(then_statement, &mut f)?,
                else_statement: slot(else_statement, &mut f)?,
            },
        })
    }
}
