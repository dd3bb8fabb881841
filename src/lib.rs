//! transir - the tree IR of a source-to-source translator
//!
//! # Overview
//!
//! A translator front end hands over an external parse tree. transir turns
//! it into an owned, mutable tree in which every node has at most one owner,
//! so that translation passes can walk it, rewrite it in place and copy
//! subtrees without ever aliasing a node.
//!
//! # Quick Start
//!
//! ```
//! use transir::{Ast, Operator, TypeTable};
//! use bumpalo::Bump;
//!
//! // Type bindings live in an arena shared by every tree.
//! let arena = Bump::new();
//! let types = TypeTable::new(&arena);
//!
//! // Build `a + b` synthetically, then grow it into `a + b + 1`.
//! let mut ast = Ast::new();
//! let a = ast.simple_name("a");
//! let b = ast.simple_name("b");
//! let sum = ast.infix(Some(types.int()), Operator::Plus, a, b).unwrap();
//! let one = ast.number_literal("1");
//! ast.extended_operands_mut(sum).unwrap().push(one).unwrap();
//!
//! // Copies are independent of the original.
//! let copy = ast.copy(sum).unwrap();
//! let c = ast.simple_name("c");
//! ast.set_left_operand(sum, c).unwrap();
//!
//! assert_eq!(ast.to_source(sum).unwrap(), "c + b + 1");
//! assert_eq!(ast.to_source(copy).unwrap(), "a + b + 1");
//! ```
//!
//! # Converting external trees
//!
//! Implement [`SourceNode`] for the external parser's node type and hand the
//! root to a [`TreeConverter`]. An operator the IR does not model aborts the
//! conversion with [`ConvertError::UnmappedOperator`]; use [`render_error`]
//! to show it against the source text.

pub use transir_core::{bindings, convert, display, ops, span, tree, visitor};

pub use transir_core::bindings::{Primitive, TypeBinding, TypeRef, TypeTable};
pub use transir_core::convert::{
    ConvertError, ConvertOptions, SourceNode, SourceShape, TreeConverter,
};
pub use transir_core::ops::{Operator, Precedence, UnmappedOperator};
pub use transir_core::span::Span;
pub use transir_core::tree::{Ast, Field, Kind, Node, NodeId, NodeKind, TreeError};
pub use transir_core::visitor::{ClosureVisitor, TreeVisitor, TreeVisitorMut};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
