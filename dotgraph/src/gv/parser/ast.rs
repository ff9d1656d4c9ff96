//! An AST that represents the GraphViz file format.
//!
//! Every node kind is its own struct and carries the source range it was
//! parsed from. The tree is immutable once the parser hands it out.

/// A point in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// One-based line number.
    pub line: usize,
    /// One-based column, counted in characters.
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// The source range [start, end) of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column)
    }
}

/// How a literal was (or should be) written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// abc, 1.5
    Unquoted,
    /// "abc"
    Quoted,
    /// <b>abc</b>
    Html,
}

// ID
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: String,
    pub quoting: Quoting,
    pub location: Location,
}

impl Literal {
    pub fn new(value: &str, quoting: Quoting) -> Self {
        Self {
            value: value.to_string(),
            quoting,
            location: Location::default(),
        }
    }
    pub fn unquoted(value: &str) -> Self {
        Self::new(value, Quoting::Unquoted)
    }
    pub fn quoted(value: &str) -> Self {
        Self::new(value, Quoting::Quoted)
    }
    pub fn html(value: &str) -> Self {
        Self::new(value, Quoting::Html)
    }
}

// ID '=' ID
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: Literal,
    pub value: Literal,
    pub location: Location,
}

impl Attribute {
    pub fn new(key: Literal, value: Literal) -> Self {
        Self {
            key,
            value,
            location: Location::default(),
        }
    }
}

// (graph | node | edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Graph,
    Node,
    Edge,
}

impl AttributeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }
}

// (graph | node | edge) [ ... ]
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeList {
    pub kind: AttributeKind,
    pub children: Vec<Attribute>,
    pub location: Location,
}

impl AttributeList {
    pub fn new(kind: AttributeKind, children: Vec<Attribute>) -> Self {
        Self {
            kind,
            children,
            location: Location::default(),
        }
    }
}

// node-name [: port [: compass]] [ ... ]
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Literal,
    pub port: Option<Literal>,
    pub compass: Option<Literal>,
    pub children: Vec<Attribute>,
    pub location: Location,
}

impl Node {
    pub fn new(id: Literal) -> Self {
        Self::new_with_list(id, Vec::new())
    }
    pub fn new_with_list(id: Literal, children: Vec<Attribute>) -> Self {
        Self {
            id,
            port: None,
            compass: None,
            children,
            location: Location::default(),
        }
    }
}

// "first" : "f0" : ne
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub id: Literal,
    pub port: Option<Literal>,
    pub compass: Option<Literal>,
    pub location: Location,
}

impl NodeRef {
    pub fn new(id: Literal) -> Self {
        Self {
            id,
            port: None,
            compass: None,
            location: Location::default(),
        }
    }
    pub fn with_port(mut self, port: Literal) -> Self {
        self.port = Some(port);
        self
    }
    pub fn with_compass(mut self, compass: Literal) -> Self {
        self.compass = Some(compass);
        self
    }
}

// { a b c }
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRefGroup {
    pub children: Vec<NodeRef>,
    pub location: Location,
}

impl NodeRefGroup {
    pub fn new(children: Vec<NodeRef>) -> Self {
        Self {
            children,
            location: Location::default(),
        }
    }
}

/// One endpoint of an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeTarget {
    Ref(NodeRef),
    Group(NodeRefGroup),
}

// a -> b -> { c d } [...]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// At least two entries.
    pub targets: Vec<EdgeTarget>,
    pub children: Vec<Attribute>,
    pub location: Location,
}

impl Edge {
    pub fn new(targets: Vec<EdgeTarget>, children: Vec<Attribute>) -> Self {
        Self {
            targets,
            children,
            location: Location::default(),
        }
    }
}

/// The three comment flavors of the DOT language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// /* ... */
    Block,
    /// // ...
    Slash,
    /// # ...
    Macro,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
    pub location: Location,
}

impl Comment {
    pub fn new(kind: CommentKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            location: Location::default(),
        }
    }
}

/// A statement inside a graph or subgraph body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Attribute(Attribute),
    AttributeList(AttributeList),
    Node(Node),
    Edge(Edge),
    Subgraph(Subgraph),
    Comment(Comment),
}

// subgraph [ ID ] '{' stmt_list '}'
#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub id: Option<Literal>,
    pub children: Vec<Stmt>,
    pub location: Location,
}

impl Subgraph {
    pub fn new(id: Option<Literal>, children: Vec<Stmt>) -> Self {
        Self {
            id,
            children,
            location: Location::default(),
        }
    }
}

// [ strict ] (graph | digraph) [ ID ] '{' stmt_list '}'
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub strict: bool,
    pub directed: bool,
    pub id: Option<Literal>,
    pub children: Vec<Stmt>,
    pub location: Location,
}

impl Graph {
    pub fn new(directed: bool, id: Option<Literal>) -> Self {
        Self {
            strict: false,
            directed,
            id,
            children: Vec::new(),
            location: Location::default(),
        }
    }
}

/// Top-level items of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum DotItem {
    Graph(Graph),
    Comment(Comment),
}

/// A whole document: graphs interleaved with comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub children: Vec<DotItem>,
    pub location: Location,
}

impl Dot {
    pub fn new(children: Vec<DotItem>) -> Self {
        Self {
            children,
            location: Location::default(),
        }
    }

    /// Returns the graphs of the document, skipping comments.
    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.children.iter().filter_map(|item| match item {
            DotItem::Graph(g) => Some(g),
            DotItem::Comment(_) => None,
        })
    }
}

/// Any node of the tree. This is what the parser returns and what the
/// stringifier accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Literal(Literal),
    Attribute(Attribute),
    AttributeList(AttributeList),
    Node(Node),
    NodeRef(NodeRef),
    NodeRefGroup(NodeRefGroup),
    Edge(Edge),
    Subgraph(Subgraph),
    Graph(Graph),
    Comment(Comment),
    Dot(Dot),
    /// A bare statement list, as produced by the `Statements` start rule.
    Statements(Vec<Stmt>),
}

impl AstNode {
    pub fn as_dot(&self) -> Option<&Dot> {
        match self {
            Self::Dot(d) => Some(d),
            _ => None,
        }
    }
    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            Self::Graph(g) => Some(g),
            _ => None,
        }
    }
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Self::Edge(e) => Some(e),
            _ => None,
        }
    }
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }
    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Self::Attribute(a) => Some(a),
            _ => None,
        }
    }

    /// The source range of the node. Statement lists report the range
    /// spanned by their first and last statements.
    pub fn location(&self) -> Location {
        match self {
            Self::Literal(x) => x.location,
            Self::Attribute(x) => x.location,
            Self::AttributeList(x) => x.location,
            Self::Node(x) => x.location,
            Self::NodeRef(x) => x.location,
            Self::NodeRefGroup(x) => x.location,
            Self::Edge(x) => x.location,
            Self::Subgraph(x) => x.location,
            Self::Graph(x) => x.location,
            Self::Comment(x) => x.location,
            Self::Dot(x) => x.location,
            Self::Statements(list) => match (list.first(), list.last()) {
                (Some(first), Some(last)) => {
                    Location::new(first.location().start, last.location().end)
                }
                _ => Location::default(),
            },
        }
    }
}

impl Stmt {
    pub fn location(&self) -> Location {
        match self {
            Self::Attribute(x) => x.location,
            Self::AttributeList(x) => x.location,
            Self::Node(x) => x.location,
            Self::Edge(x) => x.location,
            Self::Subgraph(x) => x.location,
            Self::Comment(x) => x.location,
        }
    }
}

macro_rules! impl_from_for_ast_node {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for AstNode {
                fn from(x: $ty) -> Self {
                    AstNode::$ty(x)
                }
            }
        )*
    };
}

impl_from_for_ast_node!(
    Literal,
    Attribute,
    AttributeList,
    Node,
    NodeRef,
    NodeRefGroup,
    Edge,
    Subgraph,
    Graph,
    Comment,
    Dot
);
