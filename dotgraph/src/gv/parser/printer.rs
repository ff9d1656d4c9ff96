//! A collection of methods for printing the AST as an indented tree.

use super::ast::{self, Quoting};
use std::fmt::Write;

fn line(out: &mut String, indent: usize, text: &str) {
    let _ = writeln!(out, "{}{}", " ".repeat(indent), text);
}

fn literal(l: &ast::Literal) -> String {
    match l.quoting {
        Quoting::Unquoted => l.value.clone(),
        Quoting::Quoted => format!("{:?}", l.value),
        Quoting::Html => format!("<{}>", l.value),
    }
}

fn node_ref(n: &ast::NodeRef) -> String {
    let mut s = literal(&n.id);
    if let Option::Some(port) = &n.port {
        s.push_str(&format!(" port={}", literal(port)));
    }
    if let Option::Some(compass) = &n.compass {
        s.push_str(&format!(" compass={}", literal(compass)));
    }
    s
}

fn print_attributes(out: &mut String, list: &[ast::Attribute], indent: usize) {
    for (i, att) in list.iter().enumerate() {
        let key = literal(&att.key);
        let text = format!("{}) {} = {}", i, key, literal(&att.value));
        line(out, indent, &text);
    }
}

fn print_edge(out: &mut String, e: &ast::Edge, indent: usize) {
    line(out, indent, &format!("Edge @{}", e.location));
    for target in &e.targets {
        match target {
            ast::EdgeTarget::Ref(r) => {
                line(out, indent + 1, &format!("NodeRef {}", node_ref(r)));
            }
            ast::EdgeTarget::Group(g) => {
                line(out, indent + 1, "NodeRefGroup");
                for r in &g.children {
                    line(out, indent + 2, &format!("NodeRef {}", node_ref(r)));
                }
            }
        }
    }
    print_attributes(out, &e.children, indent + 1);
}

fn print_node(out: &mut String, n: &ast::Node, indent: usize) {
    let mut text = format!("Node {}", literal(&n.id));
    if let Option::Some(port) = &n.port {
        text.push_str(&format!(" port={}", literal(port)));
    }
    if let Option::Some(compass) = &n.compass {
        text.push_str(&format!(" compass={}", literal(compass)));
    }
    line(out, indent, &format!("{} @{}", text, n.location));
    print_attributes(out, &n.children, indent + 1);
}

fn print_attribute_list(
    out: &mut String,
    a: &ast::AttributeList,
    indent: usize,
) {
    let kind = match a.kind {
        ast::AttributeKind::Graph => "Graph",
        ast::AttributeKind::Node => "Node",
        ast::AttributeKind::Edge => "Edge",
    };
    line(out, indent, &format!("AttributeList {}:", kind));
    print_attributes(out, &a.children, indent + 1);
}

fn print_comment(out: &mut String, c: &ast::Comment, indent: usize) {
    line(out, indent, &format!("Comment {:?}: {:?}", c.kind, c.value));
}

fn print_stmt(out: &mut String, stmt: &ast::Stmt, indent: usize) {
    match stmt {
        ast::Stmt::Edge(e) => {
            print_edge(out, e, indent);
        }
        ast::Stmt::Node(n) => {
            print_node(out, n, indent);
        }
        ast::Stmt::Attribute(a) => {
            print_attributes(out, std::slice::from_ref(a), indent);
        }
        ast::Stmt::AttributeList(a) => {
            print_attribute_list(out, a, indent);
        }
        ast::Stmt::Subgraph(g) => {
            let name = g.id.as_ref().map(literal).unwrap_or_default();
            line(out, indent, &format!("Subgraph: {}", name));
            for stmt in &g.children {
                print_stmt(out, stmt, indent + 1);
            }
        }
        ast::Stmt::Comment(c) => {
            print_comment(out, c, indent);
        }
    }
}

fn print_graph(out: &mut String, graph: &ast::Graph, indent: usize) {
    let name = graph.id.as_ref().map(literal).unwrap_or_default();
    let kind = if graph.directed { "Digraph" } else { "Graph" };
    let strict = if graph.strict { " (strict)" } else { "" };
    line(out, indent, &format!("{}{}: {}", kind, strict, name));
    for stmt in &graph.children {
        print_stmt(out, stmt, indent + 1);
    }
}

/// Returns a human readable tree of \p node.
pub fn ast_tree(node: &ast::AstNode) -> String {
    let mut out = String::new();
    match node {
        ast::AstNode::Literal(l) => line(&mut out, 0, &literal(l)),
        ast::AstNode::Attribute(a) => {
            print_attributes(&mut out, std::slice::from_ref(a), 0)
        }
        ast::AstNode::AttributeList(a) => print_attribute_list(&mut out, a, 0),
        ast::AstNode::Node(n) => print_node(&mut out, n, 0),
        ast::AstNode::NodeRef(r) => {
            line(&mut out, 0, &format!("NodeRef {}", node_ref(r)))
        }
        ast::AstNode::NodeRefGroup(g) => {
            line(&mut out, 0, "NodeRefGroup");
            for r in &g.children {
                line(&mut out, 1, &format!("NodeRef {}", node_ref(r)));
            }
        }
        ast::AstNode::Edge(e) => print_edge(&mut out, e, 0),
        ast::AstNode::Subgraph(g) => {
            print_stmt(&mut out, &ast::Stmt::Subgraph(g.clone()), 0)
        }
        ast::AstNode::Graph(g) => print_graph(&mut out, g, 0),
        ast::AstNode::Comment(c) => print_comment(&mut out, c, 0),
        ast::AstNode::Dot(d) => {
            for item in &d.children {
                match item {
                    ast::DotItem::Graph(g) => print_graph(&mut out, g, 0),
                    ast::DotItem::Comment(c) => print_comment(&mut out, c, 0),
                }
            }
        }
        ast::AstNode::Statements(list) => {
            for stmt in list {
                print_stmt(&mut out, stmt, 0);
            }
        }
    }
    out
}

/// Prints the tree of \p node to stdout.
pub fn dump_ast(node: &ast::AstNode) {
    print!("{}", ast_tree(node));
}
