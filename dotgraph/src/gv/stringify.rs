//! Converts syntax trees back to DOT text.
//!
//! The output is canonical: two-space indentation, one statement per line,
//! attributes inside brackets one per line. Parsing the output and printing
//! it again yields the same text.

use super::parser::ast::{self, AstNode, Quoting};

/// Accumulates the output and tracks the state that the text depends on.
struct Printer {
    out: String,
    indent: usize,
    // The kind of the enclosing root graph, which selects the edge operator.
    directed: bool,
}

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            directed: true,
        }
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    // Starts a new line at the current indentation.
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn literal(&mut self, lit: &ast::Literal) {
        match lit.quoting {
            Quoting::Unquoted => self.push(&lit.value),
            Quoting::Quoted => {
                self.out.push('"');
                for ch in lit.value.chars() {
                    match ch {
                        '"' => self.out.push_str("\\\""),
                        '\n' => self.out.push_str("\\n"),
                        ch => self.out.push(ch),
                    }
                }
                self.out.push('"');
            }
            Quoting::Html => {
                self.out.push('<');
                self.push(&lit.value);
                self.out.push('>');
            }
        }
    }

    // key = value;
    fn attribute(&mut self, attr: &ast::Attribute) {
        self.literal(&attr.key);
        self.push(" = ");
        self.literal(&attr.value);
        self.out.push(';');
    }

    // [ ... ] with one attribute per line, or nothing when empty.
    fn bracketed(&mut self, attrs: &[ast::Attribute]) {
        if attrs.is_empty() {
            return;
        }
        self.push(" [");
        self.indent += 1;
        for attr in attrs {
            self.newline();
            self.attribute(attr);
        }
        self.indent -= 1;
        self.newline();
        self.out.push(']');
    }

    fn attribute_list(&mut self, list: &ast::AttributeList) {
        self.push(list.kind.keyword());
        if list.children.is_empty() {
            self.push(" []");
        } else {
            self.bracketed(&list.children);
        }
        self.out.push(';');
    }

    fn port(
        &mut self,
        port: &Option<ast::Literal>,
        compass: &Option<ast::Literal>,
    ) {
        if let Some(port) = port {
            self.out.push(':');
            self.literal(port);
        }
        if let Some(compass) = compass {
            self.out.push(':');
            self.literal(compass);
        }
    }

    fn node_ref(&mut self, r: &ast::NodeRef) {
        self.literal(&r.id);
        self.port(&r.port, &r.compass);
    }

    fn node_ref_group(&mut self, g: &ast::NodeRefGroup) {
        self.out.push('{');
        for (i, r) in g.children.iter().enumerate() {
            if i > 0 {
                self.out.push(' ');
            }
            self.node_ref(r);
        }
        self.out.push('}');
    }

    fn node(&mut self, n: &ast::Node) {
        self.literal(&n.id);
        self.port(&n.port, &n.compass);
        self.bracketed(&n.children);
        self.out.push(';');
    }

    fn edge(&mut self, e: &ast::Edge) {
        let op = if self.directed { " -> " } else { " -- " };
        for (i, target) in e.targets.iter().enumerate() {
            if i > 0 {
                self.push(op);
            }
            match target {
                ast::EdgeTarget::Ref(r) => self.node_ref(r),
                ast::EdgeTarget::Group(g) => self.node_ref_group(g),
            }
        }
        self.bracketed(&e.children);
        self.out.push(';');
    }

    fn comment(&mut self, c: &ast::Comment) {
        match c.kind {
            ast::CommentKind::Block => {
                self.push("/**");
                for line in c.value.split('\n') {
                    self.newline();
                    if line.is_empty() {
                        self.push(" *");
                    } else {
                        self.push(" * ");
                        self.push(line);
                    }
                }
                self.newline();
                self.push(" */");
            }
            ast::CommentKind::Slash | ast::CommentKind::Macro => {
                let prefix = match c.kind {
                    ast::CommentKind::Macro => "#",
                    _ => "//",
                };
                for (i, line) in c.value.split('\n').enumerate() {
                    if i > 0 {
                        self.newline();
                    }
                    self.push(prefix);
                    if !line.is_empty() {
                        self.out.push(' ');
                        self.push(line);
                    }
                }
            }
        }
    }

    fn stmt(&mut self, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::Attribute(a) => self.attribute(a),
            ast::Stmt::AttributeList(a) => self.attribute_list(a),
            ast::Stmt::Node(n) => self.node(n),
            ast::Stmt::Edge(e) => self.edge(e),
            ast::Stmt::Subgraph(s) => self.subgraph(s),
            ast::Stmt::Comment(c) => self.comment(c),
        }
    }

    // '{' stmt_list '}', or "{}" when empty.
    fn body(&mut self, children: &[ast::Stmt]) {
        if children.is_empty() {
            self.push("{}");
            return;
        }
        self.out.push('{');
        self.indent += 1;
        for stmt in children {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.out.push('}');
    }

    fn subgraph(&mut self, s: &ast::Subgraph) {
        self.push("subgraph ");
        if let Some(id) = &s.id {
            self.literal(id);
            self.out.push(' ');
        }
        self.body(&s.children);
    }

    fn graph(&mut self, g: &ast::Graph) {
        let saved = self.directed;
        self.directed = g.directed;
        if g.strict {
            self.push("strict ");
        }
        self.push(if g.directed { "digraph " } else { "graph " });
        if let Some(id) = &g.id {
            self.literal(id);
            self.out.push(' ');
        }
        self.body(&g.children);
        self.directed = saved;
    }

    fn dot(&mut self, d: &ast::Dot) {
        for (i, item) in d.children.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            match item {
                ast::DotItem::Graph(g) => self.graph(g),
                ast::DotItem::Comment(c) => self.comment(c),
            }
        }
    }

    fn ast_node(&mut self, node: &AstNode) {
        match node {
            AstNode::Literal(l) => self.literal(l),
            AstNode::Attribute(a) => self.attribute(a),
            AstNode::AttributeList(a) => self.attribute_list(a),
            AstNode::Node(n) => self.node(n),
            AstNode::NodeRef(r) => self.node_ref(r),
            AstNode::NodeRefGroup(g) => self.node_ref_group(g),
            AstNode::Edge(e) => self.edge(e),
            AstNode::Subgraph(s) => self.subgraph(s),
            AstNode::Graph(g) => self.graph(g),
            AstNode::Comment(c) => self.comment(c),
            AstNode::Dot(d) => self.dot(d),
            AstNode::Statements(list) => {
                for (i, stmt) in list.iter().enumerate() {
                    if i > 0 {
                        self.newline();
                    }
                    self.stmt(stmt);
                }
            }
        }
    }
}

/// Renders \p node as DOT text. Edges outside of any graph are printed
/// with the directed operator.
pub fn stringify(node: &AstNode) -> String {
    let mut printer = Printer::new();
    printer.ast_node(node);
    printer.out
}

/// Renders \p graph as DOT text.
pub fn stringify_graph(graph: &ast::Graph) -> String {
    let mut printer = Printer::new();
    printer.graph(graph);
    printer.out
}

/// Renders a detached edge, using the operator for the given graph kind.
pub fn stringify_edge(edge: &ast::Edge, directed: bool) -> String {
    let mut printer = Printer::new();
    printer.directed = directed;
    printer.edge(edge);
    printer.out
}

#[test]
fn test_literal_quoting() {
    let s = |l: ast::Literal| stringify(&AstNode::Literal(l));
    assert_eq!(s(ast::Literal::unquoted("hoge")), "hoge");
    assert_eq!(s(ast::Literal::quoted("hoge")), "\"hoge\"");
    assert_eq!(s(ast::Literal::html("hoge")), "<hoge>");
    assert_eq!(s(ast::Literal::quoted("a\"b\nc")), "\"a\\\"b\\nc\"");
}

#[test]
fn test_empty_graph() {
    let g = ast::Graph::new(true, Some(ast::Literal::quoted("G")));
    assert_eq!(stringify_graph(&g), "digraph \"G\" {}");
}
