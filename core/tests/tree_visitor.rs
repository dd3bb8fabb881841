//! Passes written against the public visitor API, the way translation
//! passes use it.

use bumpalo::Bump;
use pretty_assertions::assert_eq;
use transir_core::bindings::{TypeRef, TypeTable};
use transir_core::ops::Operator;
use transir_core::tree::{Ast, Kind, NodeId, NodeKind, TreeError};
use transir_core::visitor::{TreeVisitor, TreeVisitorMut};

/// Rewrites `e * 2` into `e + e`.
#[derive(Default)]
struct StrengthReduction {
    rewritten: usize,
    error: Option<TreeError>,
}

impl StrengthReduction {
    fn rewrite(&mut self, ast: &mut Ast<'_>, node: NodeId) -> Result<(), TreeError> {
        if ast.operator(node) != Ok(Operator::Times) || !ast.extended_operands(node)?.is_empty() {
            return Ok(());
        }
        let right = ast.right_operand(node)?;
        if !matches!(ast.node(right)?.kind(), NodeKind::NumberLiteral(token) if token == "2") {
            return Ok(());
        }
        let left = ast.left_operand(node)?;
        let first = ast.copy(left)?;
        let second = ast.copy(left)?;
        let sum = ast.infix(ast.type_binding(node)?, Operator::Plus, first, second)?;
        ast.replace(node, sum)?;
        ast.discard(node)?;
        self.rewritten += 1;
        Ok(())
    }
}

impl<'t> TreeVisitorMut<'t> for StrengthReduction {
    fn end_visit(&mut self, ast: &mut Ast<'t>, node: NodeId) {
        if let Err(err) = self.rewrite(ast, node) {
            self.error.get_or_insert(err);
        }
    }
}

#[test]
fn test_rewriting_pass_replaces_subtrees_in_place() {
    let mut ast = Ast::new();

    // return (a - b) * 2 + c * 2;
    let a = ast.simple_name("a");
    let b = ast.simple_name("b");
    let difference = ast.infix(None, Operator::Minus, a, b).unwrap();
    let grouped = ast.parenthesized(difference).unwrap();
    let two = ast.number_literal("2");
    let first = ast.infix(None, Operator::Times, grouped, two).unwrap();
    let c = ast.simple_name("c");
    let two = ast.number_literal("2");
    let second = ast.infix(None, Operator::Times, c, two).unwrap();
    let total = ast.infix(None, Operator::Plus, first, second).unwrap();
    let ret = ast.return_statement(Some(total)).unwrap();
    assert_eq!(ast.to_source(ret).unwrap(), "return (a - b) * 2 + c * 2;");

    let mut pass = StrengthReduction::default();
    ast.accept_mut(ret, &mut pass).unwrap();

    assert_eq!(pass.error, None);
    assert_eq!(pass.rewritten, 2);
    assert_eq!(
        ast.to_source(ret).unwrap(),
        "return (a - b) + (a - b) + (c + c);"
    );
    assert!(!ast.contains(first));
    assert!(!ast.contains(a));
    assert_eq!(ast.preorder(ret).unwrap().len(), ast.len());
}

/// Records the depth of every node and the bindings still unresolved.
struct Census<'t> {
    depth: usize,
    max_depth: usize,
    unresolved: Vec<Kind>,
    resolved: Vec<TypeRef<'t>>,
}

impl<'t> TreeVisitor<'t> for Census<'t> {
    fn visit(&mut self, ast: &Ast<'t>, node: NodeId) -> bool {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        match ast.type_binding(node).unwrap() {
            Some(binding) => self.resolved.push(binding),
            None => self.unresolved.push(ast.kind(node).unwrap()),
        }
        true
    }

    fn end_visit(&mut self, _ast: &Ast<'t>, _node: NodeId) {
        self.depth -= 1;
    }
}

#[test]
fn test_read_only_pass_sees_every_node() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let mut ast = Ast::new();

    // flag ? i + j + k : 0
    let i = ast.simple_name("i");
    let j = ast.simple_name("j");
    let k = ast.simple_name("k");
    let sum = ast.infix(Some(types.int()), Operator::Plus, i, j).unwrap();
    ast.extended_operands_mut(sum).unwrap().push(k).unwrap();
    let flag = ast.simple_name("flag");
    ast.set_type_binding(flag, Some(types.boolean())).unwrap();
    let zero = ast.number_literal("0");
    ast.set_type_binding(zero, Some(types.int())).unwrap();
    let choice = ast
        .conditional(Some(types.int()), flag, sum, zero)
        .unwrap();

    let mut census = Census {
        depth: 0,
        max_depth: 0,
        unresolved: Vec::new(),
        resolved: Vec::new(),
    };
    ast.accept(choice, &mut census).unwrap();

    assert_eq!(census.depth, 0);
    assert_eq!(census.max_depth, 3);
    assert_eq!(
        census.unresolved,
        vec![Kind::SimpleName, Kind::SimpleName, Kind::SimpleName]
    );
    let names: Vec<String> = census.resolved.iter().map(|b| b.to_string()).collect();
    assert_eq!(names, vec!["int", "boolean", "int", "int"]);
}

#[test]
fn test_copy_then_rewrite_leaves_the_original_alone() {
    let mut ast = Ast::new();
    let one = ast.number_literal("1");
    let two = ast.number_literal("2");
    let original = ast.infix(None, Operator::Plus, one, two).unwrap();

    let copy = ast.copy(original).unwrap();
    let x = ast.simple_name("x");
    ast.extended_operands_mut(copy).unwrap().push(x).unwrap();
    let three = ast.number_literal("3");
    ast.set_left_operand(copy, three).unwrap();

    assert_eq!(ast.to_source(original).unwrap(), "1 + 2");
    assert_eq!(ast.to_source(copy).unwrap(), "3 + 2 + x");
    assert_eq!(ast.operands(original).unwrap().as_slice(), &[one, two]);
}
