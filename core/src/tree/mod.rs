//! Owned, mutable program tree.
//!
//! All nodes of a program live in one [`Ast`] arena and are addressed by
//! [`NodeId`] handles. A node owns its children through slots (zero or one
//! child) and sequences (ordered children); the arena records which node
//! owns which, so that every node has at most one owner and the tree stays
//! acyclic.
//!
//! Replacing a slot's occupant destroys the old subtree: its entries are
//! recycled and any handle still pointing at them becomes stale. A handle
//! carries a generation, so a stale handle is reported as
//! [`TreeError::StaleNode`] instead of silently aliasing a newer node.

mod copy;
mod error;
mod infix;
mod kind;
mod nodes;
mod ownership;


pub use error::TreeError;
pub use kind::{Category, Field, Kind, NodeKind, Seq, Slot};
pub use ownership::SeqMut;

use core::fmt;

use smallvec::SmallVec;

use crate::bindings::TypeRef;
use crate::span::Span;

/// Handle to a node in an [`Ast`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

/// A node: its variant payload plus the data every variant carries.
#[derive(Debug, Clone)]
pub struct Node<'t> {
    kind: NodeKind,
    type_binding: Option<TypeRef<'t>>,
    span: Option<Span>,
}

impl<'t> Node<'t> {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            type_binding: None,
            span: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> Kind {
        self.kind.kind()
    }

    /// Resolved type, or `None` while unresolved.
    pub fn type_binding(&self) -> Option<TypeRef<'t>> {
        self.type_binding
    }

    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

#[derive(Debug)]
struct Live<'t> {
    node: Node<'t>,
    owner: Option<NodeId>,
}

#[derive(Debug)]
struct Entry<'t> {
    generation: u32,
    live: Option<Live<'t>>,
}

/// Arena owning every node of one program tree (or forest of detached
/// subtrees).
#[derive(Debug, Default)]
pub struct Ast<'t> {
    entries: Vec<Entry<'t>>,
    free: Vec<u32>,
    live_count: usize,
}

impl<'t> Ast<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes, attached or detached.
    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.live(id).is_ok()
    }

    fn live(&self, id: NodeId) -> Result<&Live<'t>, TreeError> {
        self.entries
            .get(id.index())
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.live.as_ref())
            .ok_or(TreeError::StaleNode(id))
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut Live<'t>, TreeError> {
        self.entries
            .get_mut(id.index())
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.live.as_mut())
            .ok_or(TreeError::StaleNode(id))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node<'t>, TreeError> {
        Ok(&self.live(id)?.node)
    }

    pub fn kind(&self, id: NodeId) -> Result<Kind, TreeError> {
        Ok(self.node(id)?.tag())
    }

    pub fn type_binding(&self, id: NodeId) -> Result<Option<TypeRef<'t>>, TreeError> {
        Ok(self.node(id)?.type_binding)
    }

    pub fn set_type_binding(
        &mut self,
        id: NodeId,
        type_binding: Option<TypeRef<'t>>,
    ) -> Result<(), TreeError> {
        self.live_mut(id)?.node.type_binding = type_binding;
        Ok(())
    }

    pub fn span(&self, id: NodeId) -> Result<Option<&Span>, TreeError> {
        Ok(self.node(id)?.span.as_ref())
    }

    pub fn set_span(&mut self, id: NodeId, span: Option<Span>) -> Result<(), TreeError> {
        self.live_mut(id)?.node.span = span;
        Ok(())
    }

    /// The node owning `id`, or `None` for a detached root.
    pub fn owner(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.live(id)?.owner)
    }

    pub fn is_detached(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.owner(id)?.is_none())
    }

    /// Walk owner links up to the root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> Result<NodeId, TreeError> {
        let mut current = id;
        while let Some(owner) = self.owner(current)? {
            current = owner;
        }
        Ok(current)
    }

    /// Whether `ancestor` is `node` itself or one of its owners.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool, TreeError> {
        self.live(ancestor)?;
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.owner(id)?;
        }
        Ok(false)
    }

    /// Owned children of `id` in traversal order.
    pub fn children(&self, id: NodeId) -> Result<SmallVec<[NodeId; 4]>, TreeError> {
        Ok(self.node(id)?.kind.children())
    }

    /// Every live node that has no owner.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match &entry.live {
                Some(live) if live.owner.is_none() => Some(NodeId {
                    index: index as u32,
                    generation: entry.generation,
                }),
                _ => None,
            })
    }

    /// Store `node` as a new detached entry and claim its children.
    ///
    /// Callers guarantee the children are live, detached and distinct.
    fn alloc(&mut self, node: Node<'t>) -> NodeId {
        let children = node.kind.children();
        let live = Some(Live { node, owner: None });
        let id = match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.live = live;
                NodeId {
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    live,
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };
        self.live_count += 1;
        for child in children {
            if let Some(entry) = self.entries.get_mut(child.index()) {
                if let Some(live) = entry.live.as_mut() {
                    live.owner = Some(id);
                }
            }
        }
        tracing::trace!(?id, "allocated node");
        id
    }

    /// Destroy `id` and everything it owns.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(entry) = self.entries.get_mut(current.index()) else {
                continue;
            };
            if entry.generation != current.generation {
                continue;
            }
            if let Some(live) = entry.live.take() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(current.index);
                self.live_count -= 1;
                stack.extend(live.node.kind.children());
            }
        }
        tracing::trace!(?id, "freed subtree");
    }
}
