//! Infix operator vocabulary.
//!
//! The IR uses its own closed set of operators, independent of whatever
//! enumeration the external grammar uses. External operators are mapped in
//! through their canonical textual symbol.

use core::fmt;

use hashbrown::HashMap;
use miette::Diagnostic;
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
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
}

/// Binding strength of an infix operator, loosest first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    ConditionalOr,
    ConditionalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
}

/// An external operator whose symbol is not part of [`Operator`].
///
/// This is never recoverable: it means the external grammar grew an
/// operator the IR does not model yet.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("operator `{symbol}` has no counterpart in the IR operator vocabulary")]
#[diagnostic(
    code(transir::unmapped_operator),
    help("extend `Operator` with this symbol before translating this source")
)]
pub struct UnmappedOperator {
    pub symbol: String,
}

static SYMBOL_LOOKUP: Lazy<HashMap<&'static str, Operator>> = Lazy::new(|| {
    Operator::ALL
        .iter()
        .map(|&operator| (operator.symbol(), operator))
        .collect()
});

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 19] = [
        Operator::Times,
        Operator::Divide,
        Operator::Remainder,
        Operator::Plus,
        Operator::Minus,
        Operator::LeftShift,
        Operator::RightShiftSigned,
        Operator::RightShiftUnsigned,
        Operator::Less,
        Operator::Greater,
        Operator::LessEquals,
        Operator::GreaterEquals,
        Operator::Equals,
        Operator::NotEquals,
        Operator::Xor,
        Operator::And,
        Operator::Or,
        Operator::ConditionalAnd,
        Operator::ConditionalOr,
    ];

    /// Canonical source text of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Times => "*",
            Operator::Divide => "/",
            Operator::Remainder => "%",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::LeftShift => "<<",
            Operator::RightShiftSigned => ">>",
            Operator::RightShiftUnsigned => ">>>",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEquals => "<=",
            Operator::GreaterEquals => ">=",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Xor => "^",
            Operator::And => "&",
            Operator::Or => "|",
            Operator::ConditionalAnd => "&&",
            Operator::ConditionalOr => "||",
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Operator::Times | Operator::Divide | Operator::Remainder => Precedence::Multiplicative,
            Operator::Plus | Operator::Minus => Precedence::Additive,
            Operator::LeftShift | Operator::RightShiftSigned | Operator::RightShiftUnsigned => {
                Precedence::Shift
            }
            Operator::Less
            | Operator::Greater
            | Operator::LessEquals
            | Operator::GreaterEquals => Precedence::Relational,
            Operator::Equals | Operator::NotEquals => Precedence::Equality,
            Operator::And => Precedence::BitwiseAnd,
            Operator::Xor => Precedence::BitwiseXor,
            Operator::Or => Precedence::BitwiseOr,
            Operator::ConditionalAnd => Precedence::ConditionalAnd,
            Operator::ConditionalOr => Precedence::ConditionalOr,
        }
    }

    /// Whether `(a op b) op c` and `a op (b op c)` mean the same thing, so a
    /// right operand at equal precedence needs no parentheses.
    pub fn is_associative(self) -> bool {
        matches!(
            self,
            Operator::Times
                | Operator::Plus
                | Operator::Xor
                | Operator::And
                | Operator::Or
                | Operator::ConditionalAnd
                | Operator::ConditionalOr
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self.precedence(),
            Precedence::Relational | Precedence::Equality
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Operator::ConditionalAnd | Operator::ConditionalOr)
    }

    pub fn from_symbol(symbol: &str) -> Result<Operator, UnmappedOperator> {
        SYMBOL_LOOKUP
            .get(symbol)
            .copied()
            .ok_or_else(|| UnmappedOperator {
                symbol: symbol.to_string(),
            })
    }

    /// Map an operator of the external grammar by its rendered symbol.
    pub fn from_external<E: fmt::Display + ?Sized>(
        external: &E,
    ) -> Result<Operator, UnmappedOperator> {
        Operator::from_symbol(&external.to_string())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
