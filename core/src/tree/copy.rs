use hashbrown::HashMap;

use super::{Ast, Node, NodeId, TreeError};

impl<'t> Ast<'t> {
    /// Deep-copy the subtree rooted at `id`.
    ///
    /// The copy is a new detached root that shares no node with the
    /// original. Type bindings are shared by reference; payloads, spans and
    /// children are copied. Depth is bounded only by memory.
    pub fn copy(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let order = self.preorder(id)?;
        let mut copies = HashMap::with_capacity(order.len());
        let copied = self.copy_in_reverse(id, &order, &mut copies);
        if copied.is_err() {
            for &copy in copies.values() {
                if matches!(self.owner(copy), Ok(None)) {
                    self.free_subtree(copy);
                }
            }
        }
        copied
    }

    /// Copy `order` back to front, so every child is copied before the
    /// node that owns it.
    fn copy_in_reverse(
        &mut self,
        root: NodeId,
        order: &[NodeId],
        copies: &mut HashMap<NodeId, NodeId>,
    ) -> Result<NodeId, TreeError> {
        for &original in order.iter().rev() {
            let node = self.node(original)?;
            let kind = node.kind.try_map_children(|child| {
                copies
                    .get(&child)
                    .copied()
                    .ok_or(TreeError::StaleNode(child))
            })?;
            let copy = Node {
                kind,
                type_binding: node.type_binding,
                span: node.span.clone(),
            };
            let copy = self.alloc(copy);
            copies.insert(original, copy);
        }
        copies.get(&root).copied().ok_or(TreeError::StaleNode(root))
    }
}
