//! Slot and sequence operations.
//!
//! Every way of changing which node owns which goes through here, so the
//! single-owner and acyclicity checks live in one place.

use super::{Ast, Field, NodeId, TreeError};

impl<'t> Ast<'t> {
    /// Check that `child` may be installed into `field`, below `parent` when
    /// given.
    pub(super) fn check_attachable(
        &self,
        parent: Option<NodeId>,
        field: Field,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let live = self.live(child)?;
        if let Some(owner) = live.owner {
            return Err(TreeError::AlreadyOwned { child, owner });
        }
        let found = live.node.tag();
        if found.category() != field.category() {
            return Err(TreeError::CategoryMismatch {
                field,
                expected: field.category(),
                found,
            });
        }
        if let Some(parent) = parent {
            if self.is_ancestor(child, parent)? {
                return Err(TreeError::Cycle { parent, child });
            }
        }
        Ok(())
    }

    fn check_slot_field(&self, parent: NodeId, field: Field) -> Result<bool, TreeError> {
        let kind = &self.node(parent)?.kind;
        match kind.slot(field) {
            Some(_) => Ok(kind.is_optional(field)),
            None => Err(TreeError::NoSuchField {
                kind: kind.kind(),
                field,
            }),
        }
    }

    fn check_seq_field(&self, parent: NodeId, field: Field) -> Result<(), TreeError> {
        let kind = &self.node(parent)?.kind;
        match kind.seq(field) {
            Some(_) => Ok(()),
            None => Err(TreeError::NoSuchField {
                kind: kind.kind(),
                field,
            }),
        }
    }

    fn swap_slot(
        &mut self,
        parent: NodeId,
        field: Field,
        value: Option<NodeId>,
    ) -> Result<Option<NodeId>, TreeError> {
        let node = &mut self.live_mut(parent)?.node;
        let kind = node.tag();
        let slot = node
            .kind
            .slot_mut(field)
            .ok_or(TreeError::NoSuchField { kind, field })?;
        Ok(core::mem::replace(&mut slot.0, value))
    }

    fn set_owner(&mut self, id: NodeId, owner: Option<NodeId>) -> Result<(), TreeError> {
        self.live_mut(id)?.owner = owner;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Slots
    // ------------------------------------------------------------------

    /// Current occupant of a slot.
    pub fn slot(&self, parent: NodeId, field: Field) -> Result<Option<NodeId>, TreeError> {
        let node = self.node(parent)?;
        node.kind
            .slot(field)
            .map(|slot| slot.get())
            .ok_or(TreeError::NoSuchField {
                kind: node.tag(),
                field,
            })
    }

    /// Install a detached `child` into a slot, destroying the previous
    /// occupant.
    pub fn set_slot(&mut self, parent: NodeId, field: Field, child: NodeId) -> Result<(), TreeError> {
        self.check_slot_field(parent, field)?;
        self.check_attachable(Some(parent), field, child)?;
        let previous = self.swap_slot(parent, field, Some(child))?;
        self.set_owner(child, Some(parent))?;
        if let Some(previous) = previous {
            tracing::trace!(?parent, %field, ?previous, ?child, "replaced slot occupant");
            self.free_subtree(previous);
        }
        Ok(())
    }

    /// Empty an optional slot, destroying its occupant.
    pub fn clear_slot(&mut self, parent: NodeId, field: Field) -> Result<(), TreeError> {
        if let Some(previous) = self.take(parent, field)? {
            self.free_subtree(previous);
        }
        Ok(())
    }

    /// Detach the occupant of an optional slot and hand it back to the
    /// caller as a detached root.
    pub fn take(&mut self, parent: NodeId, field: Field) -> Result<Option<NodeId>, TreeError> {
        if !self.check_slot_field(parent, field)? {
            return Err(TreeError::MandatorySlot {
                kind: self.kind(parent)?,
                field,
            });
        }
        let previous = self.swap_slot(parent, field, None)?;
        if let Some(previous) = previous {
            self.set_owner(previous, None)?;
        }
        Ok(previous)
    }

    /// Replace a slot's occupant with a deep copy of another slot's
    /// occupant.
    ///
    /// Copying an empty source into an optional slot empties it; into a
    /// mandatory slot it is an error.
    pub fn copy_slot_from(
        &mut self,
        parent: NodeId,
        field: Field,
        source: NodeId,
        source_field: Field,
    ) -> Result<(), TreeError> {
        let optional = self.check_slot_field(parent, field)?;
        match self.slot(source, source_field)? {
            Some(occupant) => {
                let copy = self.copy(occupant)?;
                self.set_slot(parent, field, copy).inspect_err(|_| {
                    self.free_subtree(copy);
                })
            }
            None if optional => self.clear_slot(parent, field),
            None => Err(TreeError::EmptySlot {
                parent: source,
                field: source_field,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------

    pub fn seq(&self, parent: NodeId, field: Field) -> Result<&[NodeId], TreeError> {
        let node = self.node(parent)?;
        node.kind
            .seq(field)
            .map(|seq| seq.as_slice())
            .ok_or(TreeError::NoSuchField {
                kind: node.tag(),
                field,
            })
    }

    /// Live view of a sequence for appending, inserting and removing.
    pub fn seq_mut(&mut self, parent: NodeId, field: Field) -> Result<SeqMut<'_, 't>, TreeError> {
        self.check_seq_field(parent, field)?;
        Ok(SeqMut {
            ast: self,
            parent,
            field,
        })
    }

    /// Append a detached `child` to a sequence.
    pub fn push(&mut self, parent: NodeId, field: Field, child: NodeId) -> Result<(), TreeError> {
        let len = self.seq(parent, field)?.len();
        self.insert(parent, field, len, child)
    }

    pub fn insert(
        &mut self,
        parent: NodeId,
        field: Field,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let len = self.seq(parent, field)?.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { field, index, len });
        }
        self.check_attachable(Some(parent), field, child)?;
        let node = &mut self.live_mut(parent)?.node;
        let kind = node.tag();
        node.kind
            .seq_mut(field)
            .ok_or(TreeError::NoSuchField { kind, field })?
            .0
            .insert(index, child);
        self.set_owner(child, Some(parent))
    }

    /// Remove the element at `index`, returning it as a detached root.
    pub fn remove(
        &mut self,
        parent: NodeId,
        field: Field,
        index: usize,
    ) -> Result<NodeId, TreeError> {
        let len = self.seq(parent, field)?.len();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { field, index, len });
        }
        let node = &mut self.live_mut(parent)?.node;
        let kind = node.tag();
        let removed = node
            .kind
            .seq_mut(field)
            .ok_or(TreeError::NoSuchField { kind, field })?
            .0
            .remove(index);
        self.set_owner(removed, None)?;
        Ok(removed)
    }

    /// Destroy every element of a sequence.
    pub fn clear_seq(&mut self, parent: NodeId, field: Field) -> Result<(), TreeError> {
        let removed = self.replace_seq(parent, field, Vec::new())?;
        for id in removed {
            self.free_subtree(id);
        }
        Ok(())
    }

    fn replace_seq(
        &mut self,
        parent: NodeId,
        field: Field,
        items: Vec<NodeId>,
    ) -> Result<Vec<NodeId>, TreeError> {
        let node = &mut self.live_mut(parent)?.node;
        let kind = node.tag();
        let seq = node
            .kind
            .seq_mut(field)
            .ok_or(TreeError::NoSuchField { kind, field })?;
        Ok(core::mem::replace(&mut seq.0, items))
    }

    /// Replace a sequence's elements with deep copies of another sequence's
    /// elements, in order.
    pub fn copy_seq_from(
        &mut self,
        parent: NodeId,
        field: Field,
        source: NodeId,
        source_field: Field,
    ) -> Result<(), TreeError> {
        self.check_seq_field(parent, field)?;
        let originals = self.seq(source, source_field)?.to_vec();
        let mut copies = Vec::with_capacity(originals.len());
        for original in originals {
            let copy = self
                .copy(original)
                .and_then(|copy| match self.check_attachable(None, field, copy) {
                    Ok(()) => Ok(copy),
                    Err(err) => {
                        self.free_subtree(copy);
                        Err(err)
                    }
                });
            match copy {
                Ok(copy) => copies.push(copy),
                Err(err) => {
                    for copy in copies {
                        self.free_subtree(copy);
                    }
                    return Err(err);
                }
            }
        }
        for &copy in &copies {
            self.set_owner(copy, Some(parent))?;
        }
        let previous = self.replace_seq(parent, field, copies)?;
        for id in previous {
            self.free_subtree(id);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Whole-node operations
    // ------------------------------------------------------------------

    /// Field (and sequence index) through which `owner` holds `child`.
    pub(super) fn position_in_owner(
        &self,
        owner: NodeId,
        child: NodeId,
    ) -> Result<(Field, Option<usize>), TreeError> {
        let kind = &self.node(owner)?.kind;
        let field = kind
            .child_fields()
            .into_iter()
            .find_map(|(field, id)| (id == child).then_some(field))
            .ok_or(TreeError::Detached(child))?;
        let index = kind
            .seq(field)
            .and_then(|seq| seq.iter().position(|id| id == child));
        Ok((field, index))
    }

    /// Put the detached `new` where `old` currently is. `old` stays alive
    /// as a detached root.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        let owner = self.owner(old)?.ok_or(TreeError::Detached(old))?;
        let (field, index) = self.position_in_owner(owner, old)?;
        self.check_attachable(Some(owner), field, new)?;
        match index {
            Some(index) => {
                let node = &mut self.live_mut(owner)?.node;
                let kind = node.tag();
                let seq = node
                    .kind
                    .seq_mut(field)
                    .ok_or(TreeError::NoSuchField { kind, field })?;
                seq.0[index] = new;
            }
            None => {
                self.swap_slot(owner, field, Some(new))?;
            }
        }
        self.set_owner(new, Some(owner))?;
        self.set_owner(old, None)?;
        tracing::trace!(?owner, %field, ?old, ?new, "replaced node");
        Ok(())
    }

    /// Remove `id` from its owner, leaving it a detached root.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        let owner = self.owner(id)?.ok_or(TreeError::Detached(id))?;
        match self.position_in_owner(owner, id)? {
            (field, Some(index)) => self.remove(owner, field, index).map(|_| ()),
            (field, None) => self.take(owner, field).map(|_| ()),
        }
    }

    /// Destroy a detached subtree.
    pub fn discard(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(owner) = self.owner(id)? {
            return Err(TreeError::AlreadyOwned { child: id, owner });
        }
        self.free_subtree(id);
        Ok(())
    }
}

/// Mutable view of one sequence field of a node.
pub struct SeqMut<'a, 't> {
    ast: &'a mut Ast<'t>,
    parent: NodeId,
    field: Field,
}

impl<'a, 't> SeqMut<'a, 't> {
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn as_slice(&self) -> &[NodeId] {
        self.ast.seq(self.parent, self.field).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.as_slice().get(index).copied()
    }

    pub fn push(&mut self, child: NodeId) -> Result<(), TreeError> {
        self.ast.push(self.parent, self.field, child)
    }

    pub fn insert(&mut self, index: usize, child: NodeId) -> Result<(), TreeError> {
        self.ast.insert(self.parent, self.field, index, child)
    }

    pub fn remove(&mut self, index: usize) -> Result<NodeId, TreeError> {
        self.ast.remove(self.parent, self.field, index)
    }

    /// Append every node of `children`, stopping at the first rejected one.
    pub fn extend(&mut self, children: impl IntoIterator<Item = NodeId>) -> Result<(), TreeError> {
        children.into_iter().try_for_each(|child| self.push(child))
    }
}
