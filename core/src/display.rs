//! Rendering subtrees back to source text.
//!
//! Used for diagnostics and tests. Parentheses are inserted only where the
//! tree's shape would otherwise be misread: an operand binding looser than
//! its operator, or a right-hand operand at the same precedence that cannot
//! be regrouped. Explicit `ParenthesizedExpression` nodes are always kept.

use crate::bindings::TypeRef;
use crate::ops::Operator;
use crate::tree::{Ast, Field, NodeId, NodeKind, TreeError};

const INDENT: &str = "    ";

impl<'t> Ast<'t> {
    /// Render the subtree rooted at `root`.
    ///
    /// ```
    /// use transir_core::ops::Operator;
    /// use transir_core::tree::Ast;
    ///
    /// let mut ast = Ast::new();
    /// let a = ast.simple_name("a");
    /// let b = ast.simple_name("b");
    /// let c = ast.simple_name("c");
    /// let sum = ast.infix(None, Operator::Plus, a, b).unwrap();
    /// let product = ast.infix(None, Operator::Times, sum, c).unwrap();
    /// assert_eq!(ast.to_source(product).unwrap(), "(a + b) * c");
    /// ```
    pub fn to_source(&self, root: NodeId) -> Result<String, TreeError> {
        let mut printer = Printer {
            ast: self,
            out: String::new(),
            indent: 0,
        };
        printer.node(root)?;
        Ok(printer.out)
    }
}

struct Printer<'a, 't> {
    ast: &'a Ast<'t>,
    out: String,
    indent: usize,
}

impl Printer<'_, '_> {
    fn node(&mut self, id: NodeId) -> Result<(), TreeError> {
        let ast = self.ast;
        match ast.node(id)?.kind() {
            NodeKind::NumberLiteral(token) => self.out.push_str(token),
            NodeKind::BooleanLiteral(value) => {
                self.out.push_str(if *value { "true" } else { "false" })
            }
            NodeKind::StringLiteral(text) => self.string_literal(text),
            NodeKind::NullLiteral => self.out.push_str("null"),
            NodeKind::SimpleName(identifier) => self.out.push_str(identifier),
            NodeKind::ParenthesizedExpression { .. } => {
                self.out.push('(');
                self.node(self.required(id, Field::Expression)?)?;
                self.out.push(')');
            }
            NodeKind::InfixExpression { operator, .. } => {
                let operator = *operator;
                for (position, operand) in ast.operands(id)?.into_iter().enumerate() {
                    if position > 0 {
                        self.out.push(' ');
                        self.out.push_str(operator.symbol());
                        self.out.push(' ');
                    }
                    let wrap = self.needs_parens(id, operator, operand, position)?;
                    self.wrapped(operand, wrap)?;
                }
            }
            NodeKind::ConditionalExpression { .. } => {
                let condition = self.required(id, Field::Expression)?;
                let nested = matches!(
                    ast.node(condition)?.kind(),
                    NodeKind::ConditionalExpression { .. }
                );
                self.wrapped(condition, nested)?;
                self.out.push_str(" ? ");
                self.node(self.required(id, Field::ThenExpression)?)?;
                self.out.push_str(" : ");
                self.node(self.required(id, Field::ElseExpression)?)?;
            }
            NodeKind::ExpressionStatement { .. } => {
                self.node(self.required(id, Field::Expression)?)?;
                self.out.push(';');
            }
            NodeKind::ReturnStatement { expression } => match expression.get() {
                Some(expression) => {
                    self.out.push_str("return ");
                    self.node(expression)?;
                    self.out.push(';');
                }
                None => self.out.push_str("return;"),
            },
            NodeKind::Block { statements } => {
                self.out.push('{');
                self.indent += 1;
                for statement in statements.iter() {
                    self.newline();
                    self.node(statement)?;
                }
                self.indent -= 1;
                if !statements.is_empty() {
                    self.newline();
                }
                self.out.push('}');
            }
            NodeKind::IfStatement { else_statement, .. } => {
                self.out.push_str("if (");
                self.node(self.required(id, Field::Expression)?)?;
                self.out.push_str(") ");
                self.node(self.required(id, Field::ThenStatement)?)?;
                if let Some(else_statement) = else_statement.get() {
                    self.out.push_str(" else ");
                    self.node(else_statement)?;
                }
            }
        }
        Ok(())
    }

    fn required(&self, id: NodeId, field: Field) -> Result<NodeId, TreeError> {
        self.ast
            .slot(id, field)?
            .ok_or(TreeError::EmptySlot { parent: id, field })
    }

    fn wrapped(&mut self, id: NodeId, parens: bool) -> Result<(), TreeError> {
        if parens {
            self.out.push('(');
        }
        self.node(id)?;
        if parens {
            self.out.push(')');
        }
        Ok(())
    }

    fn needs_parens(
        &self,
        parent: NodeId,
        operator: Operator,
        operand: NodeId,
        position: usize,
    ) -> Result<bool, TreeError> {
        let node = self.ast.node(operand)?;
        Ok(match node.kind() {
            NodeKind::ConditionalExpression { .. } => true,
            NodeKind::InfixExpression {
                operator: inner, ..
            } => {
                let (outer, inner_precedence) = (operator.precedence(), inner.precedence());
                // `"s" + (1 + 2)` is not `"s" + 1 + 2`, and floating-point
                // addition does not regroup, so only matching integral or
                // boolean types may drop the parentheses.
                let regroupable = *inner == operator
                    && operator.is_associative()
                    && regroupable_types(self.ast.type_binding(parent)?, node.type_binding());
                inner_precedence < outer
                    || (inner_precedence == outer && position > 0 && !regroupable)
            }
            _ => false,
        })
    }

    fn string_literal(&mut self, text: &str) {
        self.out.push('"');
        for c in text.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }
}

fn regroupable_types(a: Option<TypeRef<'_>>, b: Option<TypeRef<'_>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => core::ptr::eq(a, b) && (a.is_integral() || a.is_boolean()),
        _ => false,
    }
}
