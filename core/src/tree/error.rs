use miette::Diagnostic;
use thiserror::Error;

use super::{Category, Field, Kind, NodeId};

/// Misuse of the tree's ownership contract.
///
/// None of these are expected while translating well-formed input; they
/// surface bugs in a pass. The tree is left unchanged whenever an operation
/// returns one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TreeError {
    #[error("{0:?} refers to a node that no longer exists")]
    #[diagnostic(code(transir::tree::stale_node))]
    StaleNode(NodeId),

    #[error("{child:?} is already owned by {owner:?}")]
    #[diagnostic(
        code(transir::tree::already_owned),
        help("detach the node first (`take`, `remove`, `replace`) or install a `copy` of it")
    )]
    AlreadyOwned { child: NodeId, owner: NodeId },

    #[error("{0:?} was passed for more than one child position")]
    #[diagnostic(code(transir::tree::duplicate_child))]
    DuplicateChild(NodeId),

    #[error("installing {child:?} under {parent:?} would make a node its own descendant")]
    #[diagnostic(code(transir::tree::cycle))]
    Cycle { parent: NodeId, child: NodeId },

    #[error("`{field}` expects {expected:?}, found {found:?}")]
    #[diagnostic(code(transir::tree::category_mismatch))]
    CategoryMismatch {
        field: Field,
        expected: Category,
        found: Kind,
    },

    #[error("expected {expected:?}, found {found:?}")]
    #[diagnostic(code(transir::tree::kind_mismatch))]
    KindMismatch { expected: Kind, found: Kind },

    #[error("{kind:?} has no `{field}` field")]
    #[diagnostic(code(transir::tree::no_such_field))]
    NoSuchField { kind: Kind, field: Field },

    #[error("`{field}` of {parent:?} is empty")]
    #[diagnostic(code(transir::tree::empty_slot))]
    EmptySlot { parent: NodeId, field: Field },

    #[error("`{field}` of {kind:?} is mandatory and cannot be left empty")]
    #[diagnostic(
        code(transir::tree::mandatory_slot),
        help("use `replace` to swap the occupant for another node")
    )]
    MandatorySlot { kind: Kind, field: Field },

    #[error("index {index} is out of bounds for `{field}` of length {len}")]
    #[diagnostic(code(transir::tree::index_out_of_bounds))]
    IndexOutOfBounds {
        field: Field,
        index: usize,
        len: usize,
    },

    #[error("{0:?} is the root of its tree and has no owner")]
    #[diagnostic(code(transir::tree::detached))]
    Detached(NodeId),
}
