//! Building the IR from an external parse tree.
//!
//! The external parser is not part of this crate. Its nodes are read through
//! the [`SourceNode`] trait, which reports each node's shape, the type name
//! its resolver assigned, and its source span. [`TreeConverter`] walks that
//! tree once and returns a fully-populated, detached root.
//!
//! Conversion either succeeds completely or leaves the target [`Ast`]
//! exactly as it found it.

mod error;
mod options;

#[cfg(test)]
mod tests;

pub use error::ConvertError;
pub use options::ConvertOptions;

use core::fmt;

use crate::bindings::TypeTable;
use crate::ops::Operator;
use crate::span::Span;
use crate::tree::{Ast, Category, NodeId, TreeError};

/// A node of the external parse tree.
pub trait SourceNode: Sized {
    /// Operator token of the external grammar. Only its rendered symbol is
    /// looked at.
    type Operator: fmt::Display;

    fn shape(&self) -> SourceShape<'_, Self>;

    /// Type name reported by the external resolver, if it resolved one.
    fn resolved_type(&self) -> Option<&str> {
        None
    }

    fn span(&self) -> Option<Span> {
        None
    }
}

/// What an external node is, with borrowed children.
pub enum SourceShape<'n, N: SourceNode> {
    NumberLiteral(&'n str),
    BooleanLiteral(bool),
    StringLiteral(&'n str),
    NullLiteral,
    SimpleName(&'n str),
    Parenthesized(&'n N),
    Infix {
        operator: N::Operator,
        left: &'n N,
        right: &'n N,
        extended: Vec<&'n N>,
    },
    Conditional {
        condition: &'n N,
        then_expression: &'n N,
        else_expression: &'n N,
    },
    ExpressionStatement(&'n N),
    Return(Option<&'n N>),
    Block(Vec<&'n N>),
    If {
        condition: &'n N,
        then_statement: &'n N,
        else_statement: Option<&'n N>,
    },
}

/// Converts external trees into nodes of an [`Ast`], resolving type names
/// through a shared [`TypeTable`].
pub struct TreeConverter<'a, 't> {
    types: &'a TypeTable<'t>,
    options: ConvertOptions,
}

impl<'a, 't> TreeConverter<'a, 't> {
    pub fn new(types: &'a TypeTable<'t>) -> Self {
        Self::with_options(types, ConvertOptions::default())
    }

    pub fn with_options(types: &'a TypeTable<'t>, options: ConvertOptions) -> Self {
        Self { types, options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `source` and everything below it into a new detached root.
    pub fn convert<N: SourceNode>(
        &self,
        ast: &mut Ast<'t>,
        source: &N,
    ) -> Result<NodeId, ConvertError> {
        let before = ast.len();
        let root = self.node(ast, source, 0)?;
        tracing::debug!(
            ?root,
            nodes = ast.len() - before,
            "converted external tree"
        );
        Ok(root)
    }

    fn node<N: SourceNode>(
        &self,
        ast: &mut Ast<'t>,
        source: &N,
        depth: usize,
    ) -> Result<NodeId, ConvertError> {
        if depth >= self.options.max_depth {
            return Err(ConvertError::TooDeep {
                max_depth: self.options.max_depth,
                span: source.span(),
            });
        }

        let id = match source.shape() {
            SourceShape::NumberLiteral(token) => ast.number_literal(token),
            SourceShape::BooleanLiteral(value) => ast.boolean_literal(value),
            SourceShape::StringLiteral(text) => ast.string_literal(text),
            SourceShape::NullLiteral => ast.null_literal(),
            SourceShape::SimpleName(identifier) => ast.simple_name(identifier),
            SourceShape::Parenthesized(expression) => {
                let children = self.children(ast, [(expression, Category::Expression)], depth)?;
                assemble(ast, children, |ast, c| ast.parenthesized(c[0]))?
            }
            SourceShape::Infix {
                operator,
                left,
                right,
                extended,
            } => {
                // Resolve the operator before converting any operand so an
                // unmapped one aborts without touching the tree.
                let operator = Operator::from_external(&operator).map_err(|err| {
                    tracing::debug!(symbol = %err.symbol, "unmapped external operator");
                    ConvertError::UnmappedOperator {
                        operator: err,
                        span: source.span(),
                    }
                })?;
                let operands = [left, right]
                    .into_iter()
                    .chain(extended)
                    .map(|operand| (operand, Category::Expression));
                let children = self.children(ast, operands, depth)?;
                assemble(ast, children, |ast, c| {
                    ast.infix_chain(None, operator, c[0], c[1], c[2..].to_vec())
                })?
            }
            SourceShape::Conditional {
                condition,
                then_expression,
                else_expression,
            } => {
                let children = self.children(
                    ast,
                    [
                        (condition, Category::Expression),
                        (then_expression, Category::Expression),
                        (else_expression, Category::Expression),
                    ],
                    depth,
                )?;
                assemble(ast, children, |ast, c| ast.conditional(None, c[0], c[1], c[2]))?
            }
            SourceShape::ExpressionStatement(expression) => {
                let children = self.children(ast, [(expression, Category::Expression)], depth)?;
                assemble(ast, children, |ast, c| ast.expression_statement(c[0]))?
            }
            SourceShape::Return(expression) => {
                let children = self.children(
                    ast,
                    expression.map(|expression| (expression, Category::Expression)),
                    depth,
                )?;
                assemble(ast, children, |ast, c| {
                    ast.return_statement(c.first().copied())
                })?
            }
            SourceShape::Block(statements) => {
                let statements = statements
                    .into_iter()
                    .map(|statement| (statement, Category::Statement));
                let children = self.children(ast, statements, depth)?;
                assemble(ast, children, |ast, c| ast.block(c.iter().copied()))?
            }
            SourceShape::If {
                condition,
                then_statement,
                else_statement,
            } => {
                let branches = [
                    (condition, Category::Expression),
                    (then_statement, Category::Statement),
                ]
                .into_iter()
                .chain(else_statement.map(|statement| (statement, Category::Statement)));
                let children = self.children(ast, branches, depth)?;
                assemble(ast, children, |ast, c| {
                    ast.if_statement(c[0], c[1], c.get(2).copied())
                })?
            }
        };

        if let Some(name) = source.resolved_type() {
            ast.set_type_binding(id, Some(self.types.resolve(name)))?;
        }
        if self.options.keep_spans {
            ast.set_span(id, source.span())?;
        }
        tracing::trace!(?id, depth, "converted node");
        Ok(id)
    }

    /// Convert child nodes in order, checking that each lands in the
    /// category its position requires. On failure the children converted
    /// so far are destroyed.
    fn children<'n, N: SourceNode + 'n>(
        &self,
        ast: &mut Ast<'t>,
        sources: impl IntoIterator<Item = (&'n N, Category)>,
        depth: usize,
    ) -> Result<Vec<NodeId>, ConvertError> {
        let mut converted = Vec::new();
        for (source, expected) in sources {
            match self.child(ast, source, expected, depth + 1) {
                Ok(id) => converted.push(id),
                Err(err) => {
                    discard_all(ast, &converted);
                    return Err(err);
                }
            }
        }
        Ok(converted)
    }

    fn child<N: SourceNode>(
        &self,
        ast: &mut Ast<'t>,
        source: &N,
        expected: Category,
        depth: usize,
    ) -> Result<NodeId, ConvertError> {
        let id = self.node(ast, source, depth)?;
        let found = ast.kind(id)?;
        if found.category() != expected {
            ast.discard(id)?;
            return Err(ConvertError::MalformedSource {
                expected,
                found,
                span: source.span(),
            });
        }
        Ok(id)
    }
}

/// Build a parent over freshly converted children, destroying them if the
/// parent cannot be built.
fn assemble<'t>(
    ast: &mut Ast<'t>,
    children: Vec<NodeId>,
    build: impl FnOnce(&mut Ast<'t>, &[NodeId]) -> Result<NodeId, TreeError>,
) -> Result<NodeId, ConvertError> {
    build(ast, &children).map_err(|err| {
        discard_all(ast, &children);
        ConvertError::Tree(err)
    })
}

fn discard_all(ast: &mut Ast<'_>, nodes: &[NodeId]) {
    for &node in nodes {
        // Only still-detached nodes are ours to destroy.
        if matches!(ast.is_detached(node), Ok(true)) {
            let _ = ast.discard(node);
        }
    }
}
