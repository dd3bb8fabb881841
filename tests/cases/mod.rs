//! A small stand-in for an external parser's tree, plus a table of trees and
//! the source text they should render back to.

#![allow(dead_code)]

use core::fmt;

use once_cell::sync::Lazy;
use transir::{SourceNode, SourceShape, Span};

/// Operator enumeration of the external grammar. Besides the infix operators
/// the IR models, it has a few it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOperator {
    Times,
    Divide,
    Remainder,
    Plus,
    Minus,
    LeftShift,
    RightShiftSigned,
    RightShiftUnsigned,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    Xor,
    And,
    Or,
    ConditionalAnd,
    ConditionalOr,
    InstanceOf,
    PlusAssign,
    UnsignedShiftAssign,
}

impl ExternalOperator {
    pub const INFIX: [ExternalOperator; 19] = [
        ExternalOperator::Times,
        ExternalOperator::Divide,
        ExternalOperator::Remainder,
        ExternalOperator::Plus,
        ExternalOperator::Minus,
        ExternalOperator::LeftShift,
        ExternalOperator::RightShiftSigned,
        ExternalOperator::RightShiftUnsigned,
        ExternalOperator::Less,
        ExternalOperator::Greater,
        ExternalOperator::LessEquals,
        ExternalOperator::GreaterEquals,
        ExternalOperator::Equals,
        ExternalOperator::NotEquals,
        ExternalOperator::Xor,
        ExternalOperator::And,
        ExternalOperator::Or,
        ExternalOperator::ConditionalAnd,
        ExternalOperator::ConditionalOr,
    ];

    pub const UNMAPPED: [ExternalOperator; 3] = [
        ExternalOperator::InstanceOf,
        ExternalOperator::PlusAssign,
        ExternalOperator::UnsignedShiftAssign,
    ];
}

impl fmt::Display for ExternalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExternalOperator::Times => "*",
            ExternalOperator::Divide => "/",
            ExternalOperator::Remainder => "%",
            ExternalOperator::Plus => "+",
            ExternalOperator::Minus => "-",
            ExternalOperator::LeftShift => "<<",
            ExternalOperator::RightShiftSigned => ">>",
            ExternalOperator::RightShiftUnsigned => ">>>",
            ExternalOperator::Less => "<",
            ExternalOperator::Greater => ">",
            ExternalOperator::LessEquals => "<=",
            ExternalOperator::GreaterEquals => ">=",
            ExternalOperator::Equals => "==",
            ExternalOperator::NotEquals => "!=",
            ExternalOperator::Xor => "^",
            ExternalOperator::And => "&",
            ExternalOperator::Or => "|",
            ExternalOperator::ConditionalAnd => "&&",
            ExternalOperator::ConditionalOr => "||",
            ExternalOperator::InstanceOf => "instanceof",
            ExternalOperator::PlusAssign => "+=",
            ExternalOperator::UnsignedShiftAssign => ">>>=",
        })
    }
}

#[derive(Debug, Clone)]
pub enum Src {
    Int(&'static str),
    Str(&'static str),
    Bool(bool),
    Null,
    Name(&'static str),
    Paren(Box<Src>),
    Infix(ExternalOperator, Vec<Src>),
    Cond(Box<Src>, Box<Src>, Box<Src>),
    Expr(Box<Src>),
    Return(Option<Box<Src>>),
    Block(Vec<Src>),
    If(Box<Src>, Box<Src>, Option<Box<Src>>),
    /// Attaches a resolved type name and a span to the wrapped node.
    Typed(&'static str, Span, Box<Src>),
}

impl SourceNode for Src {
    type Operator = ExternalOperator;

    fn shape(&self) -> SourceShape<'_, Self> {
        match self {
            Src::Int(token) => SourceShape::NumberLiteral(*token),
            Src::Str(text) => SourceShape::StringLiteral(*text),
            Src::Bool(value) => SourceShape::BooleanLiteral(*value),
            Src::Null => SourceShape::NullLiteral,
            Src::Name(identifier) => SourceShape::SimpleName(*identifier),
            Src::Paren(inner) => SourceShape::Parenthesized(inner),
            Src::Infix(operator, operands) => SourceShape::Infix {
                operator: *operator,
                left: &operands[0],
                right: &operands[1],
                extended: operands[2..].iter().collect(),
            },
            Src::Cond(condition, then_expression, else_expression) => SourceShape::Conditional {
                condition,
                then_expression,
                else_expression,
            },
            Src::Expr(expression) => SourceShape::ExpressionStatement(expression),
            Src::Return(expression) => SourceShape::Return(expression.as_deref()),
            Src::Block(statements) => SourceShape::Block(statements.iter().collect()),
            Src::If(condition, then_statement, else_statement) => SourceShape::If {
                condition,
                then_statement,
                else_statement: else_statement.as_deref(),
            },
            Src::Typed(_, _, inner) => inner.shape(),
        }
    }

    fn resolved_type(&self) -> Option<&str> {
        match self {
            Src::Typed(type_name, _, _) => Some(*type_name),
            _ => None,
        }
    }

    fn span(&self) -> Option<Span> {
        match self {
            Src::Typed(_, span, _) => Some(span.clone()),
            _ => None,
        }
    }
}

pub fn int(token: &'static str) -> Src {
    Src::Int(token)
}

pub fn name(identifier: &'static str) -> Src {
    Src::Name(identifier)
}

pub fn paren(inner: Src) -> Src {
    Src::Paren(Box::new(inner))
}

pub fn infix(operator: ExternalOperator, operands: Vec<Src>) -> Src {
    Src::Infix(operator, operands)
}

pub fn typed(type_name: &'static str, start: usize, end: usize, inner: Src) -> Src {
    Src::Typed(type_name, Span::new(start, end), Box::new(inner))
}

pub struct TestCase {
    pub name: &'static str,
    pub tree: Src,
    pub rendered: &'static str,
}

pub static TEST_CASES: Lazy<Vec<TestCase>> = Lazy::new(|| {
    use ExternalOperator::*;

    vec![
        TestCase {
            name: "simple_addition",
            tree: infix(Plus, vec![int("1"), int("2")]),
            rendered: "1 + 2",
        },
        TestCase {
            name: "extended_operands",
            tree: infix(Minus, vec![name("a"), name("b"), name("c"), name("d")]),
            rendered: "a - b - c - d",
        },
        TestCase {
            name: "explicit_parentheses_are_kept",
            tree: infix(Times, vec![paren(infix(Plus, vec![name("a"), name("b")])), name("c")]),
            rendered: "(a + b) * c",
        },
        TestCase {
            name: "implicit_grouping_is_made_explicit",
            tree: infix(Times, vec![infix(Plus, vec![name("a"), name("b")]), name("c")]),
            rendered: "(a + b) * c",
        },
        TestCase {
            name: "right_nested_subtraction",
            tree: infix(Minus, vec![name("a"), infix(Minus, vec![name("b"), name("c")])]),
            rendered: "a - (b - c)",
        },
        TestCase {
            name: "mixed_precedence",
            tree: infix(
                ConditionalOr,
                vec![
                    infix(ConditionalAnd, vec![
                        infix(Less, vec![name("i"), name("n")]),
                        infix(NotEquals, vec![name("p"), Src::Null]),
                    ]),
                    Src::Bool(false),
                ],
            ),
            rendered: "i < n && p != null || false",
        },
        TestCase {
            name: "shifts",
            tree: infix(Or, vec![
                infix(LeftShift, vec![name("x"), int("3")]),
                infix(RightShiftUnsigned, vec![name("y"), int("29")]),
            ]),
            rendered: "x << 3 | y >>> 29",
        },
        TestCase {
            name: "conditional_operand",
            tree: infix(Plus, vec![
                Src::Str("n="),
                Src::Cond(Box::new(name("ok")), Box::new(int("1")), Box::new(int("0"))),
            ]),
            rendered: "\"n=\" + (ok ? 1 : 0)",
        },
        TestCase {
            name: "if_else",
            tree: Src::If(
                Box::new(infix(GreaterEquals, vec![name("x"), int("0")])),
                Box::new(Src::Block(vec![Src::Return(Some(Box::new(name("x"))))])),
                Some(Box::new(Src::Return(Some(Box::new(infix(Minus, vec![int("0"), name("x")])))))),
            ),
            rendered: "if (x >= 0) {\n    return x;\n} else return 0 - x;",
        },
        TestCase {
            name: "block_of_statements",
            tree: Src::Block(vec![
                Src::Expr(Box::new(infix(Remainder, vec![name("a"), name("b")]))),
                Src::Return(None),
            ]),
            rendered: "{\n    a % b;\n    return;\n}",
        },
    ]
});
