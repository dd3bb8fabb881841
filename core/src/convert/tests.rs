use core::fmt;

use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::{ConvertError, ConvertOptions, SourceNode, SourceShape, TreeConverter};
use crate::bindings::TypeTable;
use crate::ops::{Operator, UnmappedOperator};
use crate::span::Span;
use crate::test_utils::init_test_logging;
use crate::tree::{Ast, Category, Field, Kind, NodeKind};

/// Operator enumeration of a stand-in external grammar. It deliberately
/// has one operator the IR does not model.
#[derive(Debug, Clone, Copy)]
enum JdtOperator {
    Plus,
    Minus,
    Times,
    Less,
    UnsignedShift,
    InstanceOf,
}

impl fmt::Display for JdtOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JdtOperator::Plus => "+",
            JdtOperator::Minus => "-",
            JdtOperator::Times => "*",
            JdtOperator::Less => "<",
            JdtOperator::UnsignedShift => ">>>",
            JdtOperator::InstanceOf => "instanceof",
        })
    }
}

#[derive(Debug)]
enum JdtKind {
    Number(&'static str),
    Name(&'static str),
    Null,
    Paren(Box<JdtNode>),
    Infix(JdtOperator, Vec<JdtNode>),
    Cond(Box<[JdtNode; 3]>),
    ExprStmt(Box<JdtNode>),
    Return(Option<Box<JdtNode>>),
    Block(Vec<JdtNode>),
    If(Box<JdtNode>, Box<JdtNode>, Option<Box<JdtNode>>),
}

#[derive(Debug)]
struct JdtNode {
    kind: JdtKind,
    type_name: Option<&'static str>,
    span: Option<Span>,
}

impl JdtNode {
    fn new(kind: JdtKind) -> Self {
        Self {
            kind,
            type_name: None,
            span: None,
        }
    }

    fn typed(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    fn at(mut self, start: usize, end: usize) -> Self {
        self.span = Some(Span::new(start, end));
        self
    }
}

impl SourceNode for JdtNode {
    type Operator = JdtOperator;

    fn shape(&self) -> SourceShape<'_, Self> {
        match &self.kind {
            JdtKind::Number(token) => SourceShape::NumberLiteral(*token),
            JdtKind::Name(name) => SourceShape::SimpleName(*name),
            JdtKind::Null => SourceShape::NullLiteral,
            JdtKind::Paren(inner) => SourceShape::Parenthesized(inner),
            JdtKind::Infix(operator, operands) => SourceShape::Infix {
                operator: *operator,
                left: &operands[0],
                right: &operands[1],
                extended: operands[2..].iter().collect(),
            },
            JdtKind::Cond(parts) => SourceShape::Conditional {
                condition: &parts[0],
                then_expression: &parts[1],
                else_expression: &parts[2],
            },
            JdtKind::ExprStmt(expression) => SourceShape::ExpressionStatement(expression),
            JdtKind::Return(expression) => SourceShape::Return(expression.as_deref()),
            JdtKind::Block(statements) => SourceShape::Block(statements.iter().collect()),
            JdtKind::If(condition, then_statement, else_statement) => SourceShape::If {
                condition,
                then_statement,
                else_statement: else_statement.as_deref(),
            },
        }
    }

    fn resolved_type(&self) -> Option<&str> {
        self.type_name
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }
}

fn num(token: &'static str) -> JdtNode {
    JdtNode::new(JdtKind::Number(token)).typed("int")
}

fn name(identifier: &'static str) -> JdtNode {
    JdtNode::new(JdtKind::Name(identifier))
}

fn infix(operator: JdtOperator, operands: Vec<JdtNode>) -> JdtNode {
    JdtNode::new(JdtKind::Infix(operator, operands))
}

fn paren(inner: JdtNode) -> JdtNode {
    JdtNode::new(JdtKind::Paren(Box::new(inner)))
}

/// `a - (a - (... x))` nested exactly `levels` deep, with its rendering.
fn nested_difference(levels: usize) -> (JdtNode, String) {
    let mut node = name("x");
    let mut text = String::from("x");
    let mut depth = 1;
    while depth < levels {
        if levels - depth >= 2 {
            node = infix(JdtOperator::Minus, vec![name("a"), paren(node)]);
            text = format!("a - ({text})");
            depth += 2;
        } else {
            node = paren(node);
            text = format!("({text})");
            depth += 1;
        }
    }
    (node, text)
}

#[test]
fn test_converts_an_infix_chain_with_types_and_spans() {
    init_test_logging();
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let mut ast = Ast::new();

    // a + b + c + d
    let source = infix(
        JdtOperator::Plus,
        vec![
            name("a").at(0, 1),
            name("b").at(4, 5),
            name("c").at(8, 9),
            name("d").at(12, 13),
        ],
    )
    .typed("java.lang.String")
    .at(0, 13);

    let root = TreeConverter::new(&types).convert(&mut ast, &source).unwrap();

    assert!(ast.is_detached(root).unwrap());
    assert_eq!(ast.operator(root).unwrap(), Operator::Plus);
    assert!(core::ptr::eq(
        ast.type_binding(root).unwrap().unwrap(),
        types.declared("java.lang.String")
    ));
    assert_eq!(ast.span(root).unwrap(), Some(&Span::new(0, 13)));

    let names: Vec<&str> = ast
        .operands(root)
        .unwrap()
        .iter()
        .map(|&id| ast.identifier(id).unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(ast.extended_operands(root).unwrap().len(), 2);
    let c = ast.extended_operands(root).unwrap()[0];
    assert_eq!(ast.span(c).unwrap(), Some(&Span::new(8, 9)));
    assert_eq!(ast.len(), 5);
}

#[test]
fn test_every_mappable_operator_round_trips() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let converter = TreeConverter::new(&types);

    for (external, expected) in [
        (JdtOperator::Plus, Operator::Plus),
        (JdtOperator::Times, Operator::Times),
        (JdtOperator::Less, Operator::Less),
        (JdtOperator::UnsignedShift, Operator::RightShiftUnsigned),
    ] {
        let mut ast = Ast::new();
        let source = infix(external, vec![num("1"), num("2")]);
        let root = converter.convert(&mut ast, &source).unwrap();
        assert_eq!(ast.operator(root).unwrap(), expected);
        assert_eq!(ast.operator(root).unwrap().symbol(), external.to_string());
    }
}

#[test]
fn test_unmapped_operator_aborts_without_leaving_nodes_behind() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let mut ast = Ast::new();
    let survivor = ast.simple_name("survivor");

    // (x + y) * (z instanceof T)
    let source = infix(
        JdtOperator::Times,
        vec![
            JdtNode::new(JdtKind::Paren(Box::new(infix(
                JdtOperator::Plus,
                vec![name("x"), name("y")],
            )))),
            infix(JdtOperator::InstanceOf, vec![name("z"), name("T")]).at(10, 24),
        ],
    );

    let err = TreeConverter::new(&types)
        .convert(&mut ast, &source)
        .unwrap_err();

    assert_eq!(
        err,
        ConvertError::UnmappedOperator {
            operator: UnmappedOperator {
                symbol: "instanceof".to_string()
            },
            span: Some(Span::new(10, 24)),
        }
    );
    assert_eq!(err.span(), Some(&Span::new(10, 24)));
    assert_eq!(ast.len(), 1);
    assert_eq!(ast.roots().collect::<Vec<_>>(), vec![survivor]);
}

#[test]
fn test_statements_where_expressions_belong_are_malformed() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let mut ast = Ast::new();

    let source = infix(
        JdtOperator::Plus,
        vec![
            num("1"),
            JdtNode::new(JdtKind::Return(None)).at(4, 11),
        ],
    );
    let err = TreeConverter::new(&types)
        .convert(&mut ast, &source)
        .unwrap_err();

    assert_eq!(
        err,
        ConvertError::MalformedSource {
            expected: Category::Expression,
            found: Kind::ReturnStatement,
            span: Some(Span::new(4, 11)),
        }
    );
    assert!(ast.is_empty());
}

#[test]
fn test_converts_statements() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let mut ast = Ast::new();

    // if (i < n) { return i * 2; } else return null;
    let source = JdtNode::new(JdtKind::If(
        Box::new(infix(JdtOperator::Less, vec![name("i"), name("n")]).typed("boolean")),
        Box::new(JdtNode::new(JdtKind::Block(vec![JdtNode::new(
            JdtKind::Return(Some(Box::new(infix(
                JdtOperator::Times,
                vec![name("i"), num("2")],
            )))),
        )]))),
        Some(Box::new(JdtNode::new(JdtKind::Return(Some(Box::new(
            JdtNode::new(JdtKind::Null).typed("null"),
        )))))),
    ));

    let root = TreeConverter::new(&types).convert(&mut ast, &source).unwrap();

    assert_eq!(ast.kind(root).unwrap(), Kind::IfStatement);
    let condition = ast.slot(root, Field::Expression).unwrap().unwrap();
    assert!(ast.type_binding(condition).unwrap().unwrap().is_boolean());

    let block = ast.slot(root, Field::ThenStatement).unwrap().unwrap();
    let statements = ast.seq(block, Field::Statements).unwrap();
    assert_eq!(statements.len(), 1);
    let returned = ast.slot(statements[0], Field::Expression).unwrap().unwrap();
    assert_eq!(ast.operator(returned).unwrap(), Operator::Times);

    let else_branch = ast.slot(root, Field::ElseStatement).unwrap().unwrap();
    let null = ast.slot(else_branch, Field::Expression).unwrap().unwrap();
    assert_eq!(ast.node(null).unwrap().kind(), &NodeKind::NullLiteral);
    assert!(core::ptr::eq(
        ast.type_binding(null).unwrap().unwrap(),
        types.null()
    ));
    assert_eq!(ast.preorder(root).unwrap().len(), ast.len());
}

#[test]
fn test_converts_conditionals() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let mut ast = Ast::new();

    let source = JdtNode::new(JdtKind::Cond(Box::new([name("ok"), num("1"), num("0")])))
        .typed("int");
    let root = TreeConverter::new(&types).convert(&mut ast, &source).unwrap();

    assert_eq!(ast.kind(root).unwrap(), Kind::ConditionalExpression);
    assert_eq!(ast.children(root).unwrap().len(), 3);
    assert!(core::ptr::eq(ast.type_binding(root).unwrap().unwrap(), types.int()));
}

#[test]
fn test_depth_limit_is_enforced() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let options = ConvertOptions {
        max_depth: 3,
        ..ConvertOptions::default()
    };
    let converter = TreeConverter::with_options(&types, options);

    // Three levels: statement, infix, names.
    let shallow = JdtNode::new(JdtKind::ExprStmt(Box::new(infix(
        JdtOperator::Plus,
        vec![name("a"), name("b")],
    ))));
    let mut ast = Ast::new();
    converter.convert(&mut ast, &shallow).unwrap();

    // Four levels once the operand is parenthesized.
    let deep = JdtNode::new(JdtKind::ExprStmt(Box::new(infix(
        JdtOperator::Plus,
        vec![
            name("a"),
            JdtNode::new(JdtKind::Paren(Box::new(name("b").at(7, 8)))),
        ],
    ))));
    let mut ast = Ast::new();
    let err = converter.convert(&mut ast, &deep).unwrap_err();
    assert_eq!(
        err,
        ConvertError::TooDeep {
            max_depth: 3,
            span: Some(Span::new(7, 8)),
        }
    );
    assert!(ast.is_empty());
}

#[test]
fn test_trees_at_the_default_depth_limit_survive_every_pass() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let converter = TreeConverter::new(&types);
    let max_depth = converter.options().max_depth;
    let mut ast = Ast::new();

    let (source, text) = nested_difference(max_depth);
    let root = converter.convert(&mut ast, &source).unwrap();
    let copy = ast.copy(root).unwrap();
    assert_eq!(ast.preorder(root).unwrap().len() * 2, ast.len());
    assert_eq!(ast.preorder(copy).unwrap().len() * 2, ast.len());
    assert_eq!(ast.to_source(root).unwrap(), text);
    assert_eq!(ast.to_source(copy).unwrap(), text);

    let before = ast.len();
    let (too_deep, _) = nested_difference(max_depth + 1);
    let err = converter.convert(&mut ast, &too_deep).unwrap_err();
    assert!(matches!(err, ConvertError::TooDeep { max_depth: m, .. } if m == max_depth));
    assert_eq!(ast.len(), before);
}

#[test]
fn test_spans_can_be_dropped() {
    let arena = Bump::new();
    let types = TypeTable::new(&arena);
    let options = ConvertOptions {
        keep_spans: false,
        ..ConvertOptions::default()
    };
    let mut ast = Ast::new();

    let source = name("x").at(0, 1);
    let root = TreeConverter::with_options(&types, options)
        .convert(&mut ast, &source)
        .unwrap();
    assert_eq!(ast.span(root).unwrap(), None);
}
