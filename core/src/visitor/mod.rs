//! Tree visitor protocol.
//!
//! Traversal is the same for every node kind: call `visit`; if it returns
//! `true`, traverse the node's children in the order its kind defines
//! (see [`NodeKind::children`](crate::tree::NodeKind::children)); then
//! call `end_visit`, whatever `visit` returned.
//!
//! Walks keep their own stack, so deep trees do not exhaust the thread's.
//!
//! There are two flavours. [`TreeVisitor`] borrows the tree immutably and
//! suits analyses. [`TreeVisitorMut`] hands out `&mut Ast` so a pass can
//! rewrite children as it walks.

use smallvec::SmallVec;

use crate::tree::{Ast, NodeId, TreeError};

/// Read-only visitor.
///
/// # Example
///
/// ```
/// use transir_core::tree::Ast;
/// use transir_core::visitor::TreeVisitor;
///
/// struct NodeCounter(usize);
///
/// impl<'t> TreeVisitor<'t> for NodeCounter {
///     fn visit(&mut self, _ast: &Ast<'t>, _node: transir_core::tree::NodeId) -> bool {
///         self.0 += 1;
///         true
///     }
/// }
///
/// let mut ast = Ast::new();
/// let a = ast.simple_name("a");
/// let b = ast.simple_name("b");
/// let sum = ast.infix(None, transir_core::ops::Operator::Plus, a, b).unwrap();
///
/// let mut counter = NodeCounter(0);
/// ast.accept(sum, &mut counter).unwrap();
/// assert_eq!(counter.0, 3);
/// ```
pub trait TreeVisitor<'t> {
    /// Pre-order hook. Return `false` to skip this node's children.
    fn visit(&mut self, ast: &Ast<'t>, node: NodeId) -> bool {
        let _ = (ast, node);
        true
    }

    /// Post-order hook, called once for every visited node.
    fn end_visit(&mut self, ast: &Ast<'t>, node: NodeId) {
        let _ = (ast, node);
    }
}

/// Visitor that may mutate the tree while walking it.
///
/// Children are read after `visit` returns, so replacements made there are
/// the ones traversed. Children destroyed or moved away by the time the
/// walk reaches them are skipped.
pub trait TreeVisitorMut<'t> {
    fn visit(&mut self, ast: &mut Ast<'t>, node: NodeId) -> bool {
        let _ = (ast, node);
        true
    }

    fn end_visit(&mut self, ast: &mut Ast<'t>, node: NodeId) {
        let _ = (ast, node);
    }
}

/// Pre-order visitor built from a closure.
pub struct ClosureVisitor<F> {
    f: F,
}

impl<F> ClosureVisitor<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<'t, F> TreeVisitor<'t> for ClosureVisitor<F>
where
    F: FnMut(&Ast<'t>, NodeId) -> bool,
{
    fn visit(&mut self, ast: &Ast<'t>, node: NodeId) -> bool {
        (self.f)(ast, node)
    }
}

impl<'t> Ast<'t> {
    /// Walk the subtree rooted at `root` with a read-only visitor.
    pub fn accept<V>(&self, root: NodeId, visitor: &mut V) -> Result<(), TreeError>
    where
        V: TreeVisitor<'t> + ?Sized,
    {
        self.node(root)?;
        self.walk(root, visitor);
        Ok(())
    }

    fn walk<V>(&self, root: NodeId, visitor: &mut V)
    where
        V: TreeVisitor<'t> + ?Sized,
    {
        let mut stack = Vec::new();
        let children = self.descend(root, visitor.visit(self, root));
        stack.push(Frame::new(root, children));
        while let Some(frame) = stack.last_mut() {
            match frame.next_child() {
                Some(child) => {
                    let children = self.descend(child, visitor.visit(self, child));
                    stack.push(Frame::new(child, children));
                }
                None => {
                    let node = frame.node;
                    stack.pop();
                    visitor.end_visit(self, node);
                }
            }
        }
    }

    fn descend(&self, node: NodeId, visit: bool) -> SmallVec<[NodeId; 4]> {
        if visit {
            self.children(node).unwrap_or_default()
        } else {
            SmallVec::new()
        }
    }

    /// Walk the subtree rooted at `root` with a rewriting visitor.
    pub fn accept_mut<V>(&mut self, root: NodeId, visitor: &mut V) -> Result<(), TreeError>
    where
        V: TreeVisitorMut<'t> + ?Sized,
    {
        self.node(root)?;
        self.walk_mut(root, visitor);
        Ok(())
    }

    fn walk_mut<V>(&mut self, root: NodeId, visitor: &mut V)
    where
        V: TreeVisitorMut<'t> + ?Sized,
    {
        let mut stack = Vec::new();
        let visit = visitor.visit(self, root);
        stack.push(Frame::new(root, self.descend(root, visit)));
        while let Some(frame) = stack.last_mut() {
            match frame.next_child() {
                Some(child) => {
                    let parent = frame.node;
                    if matches!(self.owner(child), Ok(Some(owner)) if owner == parent) {
                        let visit = visitor.visit(self, child);
                        stack.push(Frame::new(child, self.descend(child, visit)));
                    }
                }
                None => {
                    let node = frame.node;
                    stack.pop();
                    visitor.end_visit(self, node);
                }
            }
        }
    }

    /// Collect the subtree rooted at `root` in pre-order.
    pub fn preorder(&self, root: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut order = Vec::new();
        self.accept(
            root,
            &mut ClosureVisitor::new(|_: &Ast<'t>, node: NodeId| {
                order.push(node);
                true
            }),
        )?;
        Ok(order)
    }
}

/// A node whose children are being walked, with its children as they were
/// when it was visited.
struct Frame {
    node: NodeId,
    children: SmallVec<[NodeId; 4]>,
    next: usize,
}

impl Frame {
    fn new(node: NodeId, children: SmallVec<[NodeId; 4]>) -> Self {
        Self {
            node,
            children,
            next: 0,
        }
    }

    fn next_child(&mut self) -> Option<NodeId> {
        let child = self.children.get(self.next).copied()?;
        self.next += 1;
        Some(child)
    }
}
