//! Owned, traversable intermediate representation for a source-to-source
//! translator.
//!
//! An external parser produces a parse tree; [`convert::TreeConverter`]
//! turns it into an [`tree::Ast`], an arena in which every node has at most
//! one owner. Later passes walk the tree with the [`visitor`] protocol and
//! rewrite it in place through slots and sequences, copying subtrees when
//! they need an independent version.

pub mod bindings;
pub mod convert;
pub mod display;
pub mod ops;
pub mod span;
pub mod tree;
pub mod visitor;
