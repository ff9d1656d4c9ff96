//! Conversion between the syntax tree and the object model.
//!
//! The model is printed by lowering it to the syntax tree and running the
//! regular stringifier, so both paths produce the same text. The other
//! direction builds a model from a parsed graph.

use super::parser::ast::{self, AstNode, CommentKind, Quoting};
use super::parser::lexer::is_plain_identifier;
use super::stringify::{stringify, stringify_graph};
use crate::model::{
    AttributeList, AttributeValue, Attributes, Edge, EdgeTarget,
    GraphContainer, ModelError, Node, NodeRef, RootGraph, Subgraph,
};

/// Renders a model element as DOT text.
pub trait ToDot {
    fn to_dot(&self) -> String;
}

/// Lowers a model element to the syntax tree.
pub trait ToAst {
    type Output;
    fn to_ast(&self) -> Self::Output;
}

/// Lowers \p element to the syntax tree. Comments of the element itself are
/// not part of the result, see `dot_from_model` for the root graph.
pub fn from_model<M: ToAst + ?Sized>(element: &M) -> M::Output {
    element.to_ast()
}

fn key_literal(key: &str) -> ast::Literal {
    if is_plain_identifier(key) {
        ast::Literal::unquoted(key)
    } else {
        ast::Literal::quoted(key)
    }
}

fn value_literal(value: &AttributeValue) -> ast::Literal {
    match value {
        AttributeValue::Str(s) => {
            let t = s.trim();
            if t.len() >= 2 && t.starts_with('<') && t.ends_with('>') {
                ast::Literal::html(&t[1..t.len() - 1])
            } else {
                ast::Literal::quoted(s)
            }
        }
        other => ast::Literal::unquoted(&other.to_string()),
    }
}

fn attributes(attrs: &Attributes) -> Vec<ast::Attribute> {
    attrs
        .iter()
        .map(|(k, v)| ast::Attribute::new(key_literal(k), value_literal(v)))
        .collect()
}

fn comment(text: &Option<String>) -> Option<ast::Stmt> {
    text.as_ref()
        .map(|c| ast::Stmt::Comment(ast::Comment::new(CommentKind::Block, c)))
}

fn node_ref(nr: &NodeRef) -> ast::NodeRef {
    let mut r = ast::NodeRef::new(ast::Literal::quoted(&nr.id));
    r.port = nr.port.as_deref().map(ast::Literal::quoted);
    r.compass = nr.compass.as_deref().map(ast::Literal::unquoted);
    r
}

impl ToAst for Node {
    type Output = ast::Node;
    fn to_ast(&self) -> ast::Node {
        ast::Node::new_with_list(
            ast::Literal::quoted(self.id()),
            attributes(&self.attributes),
        )
    }
}

impl ToAst for Edge {
    type Output = ast::Edge;
    fn to_ast(&self) -> ast::Edge {
        let targets = self
            .targets()
            .iter()
            .map(|t| match t {
                EdgeTarget::Node(nr) => ast::EdgeTarget::Ref(node_ref(nr)),
                EdgeTarget::Group(list) => ast::EdgeTarget::Group(
                    ast::NodeRefGroup::new(list.iter().map(node_ref).collect()),
                ),
            })
            .collect();
        ast::Edge::new(targets, attributes(&self.attributes))
    }
}

impl ToAst for AttributeList {
    type Output = ast::AttributeList;
    fn to_ast(&self) -> ast::AttributeList {
        ast::AttributeList::new(self.kind(), attributes(&self.attributes))
    }
}

// The statements of a container: own attributes, the non-empty common
// lists, nodes, subgraphs and then edges. Every element is preceded by its
// comment.
fn body<C: GraphContainer>(container: &C) -> Vec<ast::Stmt> {
    let mut stmts = Vec::new();
    for attr in attributes(container.attributes()) {
        stmts.push(ast::Stmt::Attribute(attr));
    }
    for list in [
        container.graph_attributes(),
        container.edge_attributes(),
        container.node_attributes(),
    ] {
        if list.is_empty() {
            continue;
        }
        stmts.extend(comment(&list.comment));
        stmts.push(ast::Stmt::AttributeList(list.to_ast()));
    }
    for node in container.nodes() {
        stmts.extend(comment(&node.comment));
        stmts.push(ast::Stmt::Node(node.to_ast()));
    }
    for sub in container.subgraphs() {
        stmts.extend(comment(&sub.cluster.comment));
        stmts.push(ast::Stmt::Subgraph(sub.to_ast()));
    }
    for edge in container.edges() {
        stmts.extend(comment(&edge.comment));
        stmts.push(ast::Stmt::Edge(edge.to_ast()));
    }
    stmts
}

impl ToAst for Subgraph {
    type Output = ast::Subgraph;
    fn to_ast(&self) -> ast::Subgraph {
        let id = self.id().map(ast::Literal::quoted);
        ast::Subgraph::new(id, body(self))
    }
}

impl ToAst for RootGraph {
    type Output = ast::Graph;
    fn to_ast(&self) -> ast::Graph {
        let id = self.id().map(ast::Literal::quoted);
        let mut g = ast::Graph::new(self.directed(), id);
        g.strict = self.strict;
        g.children = body(self);
        g
    }
}

/// Lowers \p graph to a document, with the comment of the graph placed in
/// front of it.
pub fn dot_from_model(graph: &RootGraph) -> ast::Dot {
    let mut items = Vec::new();
    if let Some(c) = graph.comment() {
        items.push(ast::DotItem::Comment(ast::Comment::new(
            CommentKind::Block,
            c,
        )));
    }
    items.push(ast::DotItem::Graph(graph.to_ast()));
    ast::Dot::new(items)
}

// Prints \p stmt, preceded by \p text when there is a comment. Statements
// outside of a graph print edges with the directed operator.
fn with_comment(text: &Option<String>, stmt: ast::Stmt) -> String {
    let mut stmts: Vec<ast::Stmt> = comment(text).into_iter().collect();
    stmts.push(stmt);
    stringify(&AstNode::Statements(stmts))
}

impl ToDot for RootGraph {
    fn to_dot(&self) -> String {
        if self.comment().is_none() {
            return stringify_graph(&self.to_ast());
        }
        stringify(&AstNode::Dot(dot_from_model(self)))
    }
}

impl ToDot for Subgraph {
    fn to_dot(&self) -> String {
        let stmt = ast::Stmt::Subgraph(self.to_ast());
        with_comment(&self.cluster.comment, stmt)
    }
}

impl ToDot for Node {
    fn to_dot(&self) -> String {
        with_comment(&self.comment, ast::Stmt::Node(self.to_ast()))
    }
}

impl ToDot for Edge {
    fn to_dot(&self) -> String {
        with_comment(&self.comment, ast::Stmt::Edge(self.to_ast()))
    }
}

/// Builds the object model from a syntax tree, in the manner of a visitor
/// that walks the statements in order.
#[derive(Debug, Default)]
struct ModelBuilder {
    // Comments seen since the last element, joined by newlines.
    pending: Option<String>,
}

// Returns the text of an id. HTML ids keep their delimiters.
fn id_of(lit: &ast::Literal) -> String {
    match lit.quoting {
        Quoting::Html => format!("<{}>", lit.value),
        _ => lit.value.clone(),
    }
}

fn is_numeral(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn value_of(lit: &ast::Literal) -> AttributeValue {
    match lit.quoting {
        Quoting::Unquoted => {
            if is_numeral(&lit.value) {
                if let Result::Ok(x) = lit.value.parse::<i64>() {
                    return AttributeValue::Int(x);
                }
                if let Result::Ok(x) = lit.value.parse::<f64>() {
                    return AttributeValue::Float(x);
                }
            }
            match lit.value.as_str() {
                "true" => AttributeValue::Bool(true),
                "false" => AttributeValue::Bool(false),
                _ => AttributeValue::Str(lit.value.clone()),
            }
        }
        Quoting::Quoted => AttributeValue::Str(lit.value.clone()),
        Quoting::Html => AttributeValue::Str(id_of(lit)),
    }
}

fn attr_pairs(
    list: &[ast::Attribute],
) -> impl Iterator<Item = (String, AttributeValue)> + '_ {
    list.iter().map(|a| (a.key.value.clone(), value_of(&a.value)))
}

fn model_ref(r: &ast::NodeRef) -> NodeRef {
    NodeRef {
        id: id_of(&r.id),
        port: r.port.as_ref().map(id_of),
        compass: r.compass.as_ref().map(|c| c.value.clone()),
    }
}

impl ModelBuilder {
    fn take_comment(&mut self) -> Option<String> {
        self.pending.take()
    }

    fn visit_comment(&mut self, c: &ast::Comment) {
        self.pending = Some(match self.pending.take() {
            Some(prev) => format!("{}\n{}", prev, c.value),
            None => c.value.clone(),
        });
    }

    fn visit_body<C: GraphContainer>(
        &mut self,
        container: &mut C,
        stmts: &[ast::Stmt],
    ) -> Result<(), ModelError> {
        for stmt in stmts {
            self.visit_stmt(container, stmt)?;
        }
        if let Some(_dropped) = self.take_comment() {
            #[cfg(feature = "log")]
            log::debug!("Dropping a trailing comment: {}", _dropped);
        }
        Result::Ok(())
    }

    fn visit_stmt<C: GraphContainer>(
        &mut self,
        container: &mut C,
        stmt: &ast::Stmt,
    ) -> Result<(), ModelError> {
        match stmt {
            ast::Stmt::Comment(c) => self.visit_comment(c),
            ast::Stmt::Attribute(a) => {
                container.set(a.key.value.clone(), value_of(&a.value));
            }
            ast::Stmt::AttributeList(list) => {
                let comment = self.take_comment();
                let target = container.common_attributes_mut(list.kind);
                target.attributes.apply(attr_pairs(&list.children));
                if comment.is_some() {
                    target.comment = comment;
                }
            }
            ast::Stmt::Node(n) => {
                let comment = self.take_comment();
                #[cfg(feature = "log")]
                if n.port.is_some() || n.compass.is_some() {
                    log::debug!("Dropping the port of node {}", n.id.value);
                }
                let node = container.node(&id_of(&n.id));
                node.attributes.apply(attr_pairs(&n.children));
                if comment.is_some() {
                    node.comment = comment;
                }
            }
            ast::Stmt::Edge(e) => {
                let comment = self.take_comment();
                let targets = e
                    .targets
                    .iter()
                    .map(|t| match t {
                        ast::EdgeTarget::Ref(r) => {
                            EdgeTarget::Node(model_ref(r))
                        }
                        ast::EdgeTarget::Group(g) => EdgeTarget::Group(
                            g.children.iter().map(model_ref).collect(),
                        ),
                    })
                    .collect();
                // Parsed endpoints are kept as written, empty ids included.
                let edge = container.cluster().factory.create_edge(targets)?;
                let edge = container.add_edge(edge);
                edge.attributes.apply(attr_pairs(&e.children));
                edge.comment = comment;
            }
            ast::Stmt::Subgraph(s) => {
                let comment = self.take_comment();
                let id = s.id.as_ref().map(id_of);
                let sub = container.subgraph(id.as_deref());
                if comment.is_some() {
                    sub.cluster.comment = comment;
                }
                self.visit_body(sub, &s.children)?;
            }
        }
        Result::Ok(())
    }

    fn visit_graph(
        &mut self,
        g: &ast::Graph,
    ) -> Result<RootGraph, ModelError> {
        let id = g.id.as_ref().map(id_of);
        let mut root = RootGraph::new(g.directed, id.as_deref());
        root.strict = g.strict;
        if let Some(c) = self.take_comment() {
            root.set_comment(&c);
        }
        self.visit_body(&mut root, &g.children)?;
        Result::Ok(root)
    }
}

/// Builds a model from the parsed graph \p graph. Attribute statements set
/// the attributes of their container, attribute statement lists merge into
/// the common lists, and repeated node statements merge their attributes.
/// A comment is attached to the element that follows it.
pub fn to_model(graph: &ast::Graph) -> Result<RootGraph, ModelError> {
    ModelBuilder::default().visit_graph(graph)
}

/// Builds a model for every graph of \p dot. A comment in front of a graph
/// becomes the comment of that graph.
pub fn dot_to_model(dot: &ast::Dot) -> Result<Vec<RootGraph>, ModelError> {
    let mut builder = ModelBuilder::default();
    let mut graphs = Vec::new();
    for item in &dot.children {
        match item {
            ast::DotItem::Comment(c) => builder.visit_comment(c),
            ast::DotItem::Graph(g) => graphs.push(builder.visit_graph(g)?),
        }
    }
    Result::Ok(graphs)
}

#[test]
fn test_value_quoting() {
    let mut n = Node::new("a b");
    n.set("label", "<<b>x</b>>")
        .set("width", 1.5)
        .set("fixedsize", true)
        .set("my key", "v");
    assert_eq!(
        n.to_dot(),
        "\"a b\" [\n  label = <<b>x</b>>;\n  width = 1.5;\n  \
         fixedsize = true;\n  \"my key\" = \"v\";\n];"
    );
}

#[test]
fn test_value_of() {
    assert_eq!(
        value_of(&ast::Literal::unquoted("12")),
        AttributeValue::Int(12)
    );
    assert_eq!(
        value_of(&ast::Literal::unquoted("-.5")),
        AttributeValue::Float(-0.5)
    );
    assert_eq!(
        value_of(&ast::Literal::unquoted("inf")),
        AttributeValue::Str("inf".to_string())
    );
    assert_eq!(
        value_of(&ast::Literal::quoted("12")),
        AttributeValue::Str("12".to_string())
    );
    assert_eq!(
        value_of(&ast::Literal::html("<b>x</b>")),
        AttributeValue::Str("<<b>x</b>>".to_string())
    );
}

#[test]
fn test_comment_precedes_element() {
    let mut e = Edge::new(vec![
        EdgeTarget::Node(NodeRef::new("a")),
        EdgeTarget::Node(NodeRef::new("b").with_compass("ne")),
    ])
    .unwrap();
    e.comment = Some("hello".to_string());
    assert_eq!(e.to_dot(), "/**\n * hello\n */\n\"a\" -> \"b\":ne;");
}
