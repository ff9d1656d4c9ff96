use super::ast;
use super::error::{ParseError, SyntaxError};
use super::guard::{Guard, Limits};
use super::lexer::Lexer;
use super::lexer::Token;

/// The grammar rule that parsing starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    /// A whole document: one or more graphs and comments.
    Dot,
    Graph,
    Node,
    Edge,
    Attribute,
    AttributeStatementList,
    /// A bare list of statements, as found inside a graph body.
    Statements,
}

impl std::str::FromStr for StartRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dot" | "dot" => Ok(Self::Dot),
            "Graph" | "graph" => Ok(Self::Graph),
            "Node" | "node" => Ok(Self::Node),
            "Edge" | "edge" => Ok(Self::Edge),
            "Attribute" | "attribute" => Ok(Self::Attribute),
            "AttributeStatementList" | "attribute-list" => {
                Ok(Self::AttributeStatementList)
            }
            "Statements" | "statements" => Ok(Self::Statements),
            _ => Err(format!("Unknown start rule \"{}\"", s)),
        }
    }
}

/// Options for a single call to [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub start_rule: StartRule,
    /// Reported in syntax errors.
    pub filename: Option<String>,
    pub limits: Limits,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_rule: StartRule::Dot,
            filename: None,
            limits: Limits::default(),
        }
    }
}

impl ParseOptions {
    pub fn new(start_rule: StartRule) -> Self {
        Self {
            start_rule,
            ..Self::default()
        }
    }
    pub fn filename(mut self, name: &str) -> Self {
        self.filename = Some(name.to_string());
        self
    }
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
    pub fn max_input_size(mut self, n: usize) -> Self {
        self.limits.max_input_size = n;
        self
    }
    pub fn max_ast_nodes(mut self, n: usize) -> Self {
        self.limits.max_ast_nodes = n;
        self
    }
    pub fn max_html_nesting_depth(mut self, n: usize) -> Self {
        self.limits.max_html_nesting_depth = n;
        self
    }
    pub fn max_edge_chain_depth(mut self, n: usize) -> Self {
        self.limits.max_edge_chain_depth = n;
        self
    }
    pub fn max_subgraph_depth(mut self, n: usize) -> Self {
        self.limits.max_subgraph_depth = n;
        self
    }
}

/// Parses \p input starting at the rule selected in \p options.
///
/// Every call gets its own resource guard, so a failed call never affects
/// the next one.
pub fn parse(
    input: &str,
    options: &ParseOptions,
) -> Result<ast::AstNode, ParseError> {
    #[cfg(feature = "log")]
    log::debug!(
        "Parsing {} bytes from {} as {:?}",
        input.len(),
        options.filename.as_deref().unwrap_or("<input>"),
        options.start_rule
    );
    let guard = Guard::new(options.limits);
    guard.check_input_size(input.len())?;

    let mut parser = DotParser::new(input, guard);
    parser.filename = options.filename.clone();
    let result = parser.process(options.start_rule)?;

    #[cfg(feature = "log")]
    log::debug!("Built {} AST nodes", parser.guard.node_count());
    Result::Ok(result)
}

/// Parses a complete document with the default options.
pub fn parse_dot(input: &str) -> Result<ast::Dot, ParseError> {
    let guard = Guard::new(Limits::default());
    guard.check_input_size(input.len())?;
    let mut parser = DotParser::new(input, guard);
    parser.lex()?;
    let dot = parser.parse_dot()?;
    parser.expect_eof()?;
    Result::Ok(dot)
}

const COMPASS_POINTS: [&str; 10] =
    ["n", "ne", "e", "se", "s", "sw", "w", "nw", "c", "_"];

/// Returns true if \p s is a compass point keyword.
pub fn is_compass(s: &str) -> bool {
    COMPASS_POINTS.contains(&s)
}

// The state needed to resume parsing at an earlier token.
#[derive(Debug, Clone)]
struct Checkpoint<'a> {
    lexer: Lexer<'a>,
    tok: Token,
    loc: ast::Location,
    prev_end: ast::Position,
    nodes: usize,
    comments: usize,
}

/// A recursive descent parser for the DOT language, as specified here:
/// <https://graphviz.org/doc/info/lang.html>
#[derive(Debug, Clone)]
pub struct DotParser<'a> {
    lexer: Lexer<'a>,
    tok: Token,
    // The location of 'tok'.
    loc: ast::Location,
    // The end of the last consumed token.
    prev_end: ast::Position,
    guard: Guard,
    // Comments lexed since the last statement boundary.
    comments: Vec<ast::Comment>,
    // The kind of the enclosing root graph, if any.
    directed: Option<bool>,
    depth: usize,
    filename: Option<String>,
}

impl<'a> DotParser<'a> {
    pub fn new(input: &'a str, guard: Guard) -> Self {
        Self {
            lexer: Lexer::new(input),
            tok: Token::Colon,
            loc: ast::Location::default(),
            prev_end: ast::Position::default(),
            guard,
            comments: Vec::new(),
            directed: None,
            depth: 0,
            filename: None,
        }
    }

    fn error<T>(&self, expected: &[&str]) -> Result<T, ParseError> {
        let found = match &self.tok {
            Token::EOF => None,
            tok => Some(tok.text()),
        };
        Result::Err(ParseError::Syntax(SyntaxError {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found,
            location: self.loc,
            filename: self.filename.clone(),
        }))
    }

    // Records one new AST node that spans from \p start to the end of the
    // last consumed token.
    fn span(
        &mut self,
        start: ast::Position,
    ) -> Result<ast::Location, ParseError> {
        let loc = ast::Location::new(start, self.prev_end);
        self.guard.count_node(loc)?;
        Result::Ok(loc)
    }

    /// Lex the next token, collecting the comments on the way.
    pub fn lex(&mut self) -> Result<(), ParseError> {
        self.prev_end = self.loc.end;
        loop {
            let tok = self.lexer.next_token();
            self.loc = self.lexer.token_location();
            match tok {
                Token::Comment(kind, value) => {
                    self.guard.count_node(self.loc)?;
                    let mut comment = ast::Comment::new(kind, &value);
                    comment.location = self.loc;
                    self.comments.push(comment);
                }
                tok => {
                    self.tok = tok;
                    break;
                }
            }
        }
        if let Token::Error(_) = self.tok {
            return self.error(&[]);
        }
        Result::Ok(())
    }

    fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            lexer: self.lexer,
            tok: self.tok.clone(),
            loc: self.loc,
            prev_end: self.prev_end,
            nodes: self.guard.node_count(),
            comments: self.comments.len(),
        }
    }

    fn restore(&mut self, cp: Checkpoint<'a>) {
        self.lexer = cp.lexer;
        self.tok = cp.tok;
        self.loc = cp.loc;
        self.prev_end = cp.prev_end;
        self.guard.rewind(cp.nodes);
        self.comments.truncate(cp.comments);
    }

    fn take_comments(&mut self) -> Vec<ast::Comment> {
        std::mem::take(&mut self.comments)
    }

    fn is_id_start(&self) -> bool {
        matches!(
            self.tok,
            Token::Identifier(_) | Token::QuotedString(_) | Token::HtmlStart
        )
    }

    fn is_edge_token(&self) -> bool {
        matches!(self.tok, Token::ArrowLine | Token::ArrowRight)
    }

    // ID : identifier | numeral | "string" [ + "string" ]* | <html>
    pub fn parse_id(&mut self) -> Result<ast::Literal, ParseError> {
        let start = self.loc.start;
        let (value, quoting) = match self.tok.clone() {
            Token::Identifier(name) => {
                self.lex()?;
                (name, ast::Quoting::Unquoted)
            }
            Token::QuotedString(s) => {
                let mut value = s;
                self.lex()?;
                while let Token::Plus = self.tok {
                    self.lex()?;
                    if let Token::QuotedString(more) = self.tok.clone() {
                        value.push_str(&more);
                        self.lex()?;
                    } else {
                        return self.error(&["string"]);
                    }
                }
                (value, ast::Quoting::Quoted)
            }
            Token::HtmlStart => {
                let html = match self.lexer.read_html(&self.guard)? {
                    Some(html) => html,
                    None => {
                        self.tok = Token::EOF;
                        self.loc = self.lexer.token_location();
                        return self.error(&["\">\""]);
                    }
                };
                // The lexer consumed the closing '>' as part of the value.
                self.loc.end = self.lexer.position();
                self.lex()?;
                (html, ast::Quoting::Html)
            }
            _ => {
                return self.error(&["identifier"]);
            }
        };
        let mut lit = ast::Literal::new(&value, quoting);
        lit.location = self.span(start)?;
        Result::Ok(lit)
    }

    // [ ':' ID ] [ ':' compass_pt ]
    fn parse_port(
        &mut self,
    ) -> Result<(Option<ast::Literal>, Option<ast::Literal>), ParseError> {
        if !matches!(self.tok, Token::Colon) {
            return Result::Ok((None, None));
        }
        self.lex()?;
        let first = self.parse_id()?;

        if let Token::Colon = self.tok {
            self.lex()?;
            let compass_loc = self.loc;
            let compass = self.parse_id()?;
            if !is_compass(&compass.value) {
                self.loc = compass_loc;
                self.tok = Token::Identifier(compass.value);
                return self.error(&["compass point"]);
            }
            return Result::Ok((Some(first), Some(compass)));
        }

        if first.quoting == ast::Quoting::Unquoted && is_compass(&first.value)
        {
            return Result::Ok((None, Some(first)));
        }
        Result::Ok((Some(first), None))
    }

    //node_id : ID [ port ]
    pub fn parse_node_ref(&mut self) -> Result<ast::NodeRef, ParseError> {
        let nr = self.read_node_id()?;
        self.guard.count_node(nr.location)?;
        Result::Ok(nr)
    }

    // Reads a node_id without recording a tree node for it. Node statements
    // only keep its parts.
    fn read_node_id(&mut self) -> Result<ast::NodeRef, ParseError> {
        let start = self.loc.start;
        let id = self.parse_id()?;
        let (port, compass) = self.parse_port()?;
        let mut nr = ast::NodeRef::new(id);
        nr.port = port;
        nr.compass = compass;
        nr.location = ast::Location::new(start, self.prev_end);
        Result::Ok(nr)
    }

    // '{' node_id* '}'
    fn parse_node_ref_group(
        &mut self,
    ) -> Result<ast::NodeRefGroup, ParseError> {
        let start = self.loc.start;
        if !matches!(self.tok, Token::OpenBrace) {
            return self.error(&["\"{\""]);
        }
        self.lex()?;
        let mut refs = Vec::new();
        loop {
            match self.tok {
                Token::CloseBrace => {
                    self.lex()?;
                    break;
                }
                Token::Comma | Token::Semicolon => {
                    self.lex()?;
                }
                _ if self.is_id_start() => {
                    refs.push(self.parse_node_ref()?);
                }
                _ => {
                    return self.error(&["identifier", "\"}\""]);
                }
            }
        }
        let mut group = ast::NodeRefGroup::new(refs);
        group.location = self.span(start)?;
        Result::Ok(group)
    }

    fn parse_edge_target(&mut self) -> Result<ast::EdgeTarget, ParseError> {
        if let Token::OpenBrace = self.tok {
            return Result::Ok(ast::EdgeTarget::Group(
                self.parse_node_ref_group()?,
            ));
        }
        if self.is_id_start() {
            return Result::Ok(ast::EdgeTarget::Ref(self.parse_node_ref()?));
        }
        self.error(&["identifier", "\"{\""])
    }

    // Makes sure that the edge operator matches the enclosing graph.
    fn check_edge_operator(&self) -> Result<(), ParseError> {
        let (found, expected, graph) = match (&self.tok, self.directed) {
            (Token::ArrowLine, Some(true)) => ("--", "->", "digraph"),
            (Token::ArrowRight, Some(false)) => ("->", "--", "graph"),
            _ => return Result::Ok(()),
        };
        Result::Err(ParseError::EdgeOperator {
            found,
            expected,
            graph,
            location: self.loc,
        })
    }

    //edge_stmt : (node_id | group) edgeRHS [ attr_list ]
    //edgeRHS : edgeop (node_id | group) [ edgeRHS ]
    pub fn parse_edge_stmt(
        &mut self,
        first: ast::EdgeTarget,
        start: ast::Position,
    ) -> Result<ast::Edge, ParseError> {
        let mut targets = vec![first];
        let mut chain = 0;

        while self.is_edge_token() {
            self.check_edge_operator()?;
            chain += 1;
            self.guard.check_edge_chain(chain, self.loc)?;
            // Consume the arrow.
            self.lex()?;
            targets.push(self.parse_edge_target()?);
        }
        if targets.len() < 2 {
            return self.error(&["\"->\"", "\"--\""]);
        }

        let list = self.parse_optional_attr_list()?;
        let mut edge = ast::Edge::new(targets, list);
        edge.location = self.span(start)?;
        Result::Ok(edge)
    }

    // ID '=' ID
    pub fn parse_attribute(&mut self) -> Result<ast::Attribute, ParseError> {
        let start = self.loc.start;
        let key = self.parse_id()?;
        if let Token::Equal = self.tok {
            self.lex()?;
        } else {
            return self.error(&["\"=\""]);
        }
        let value = self.parse_id()?;
        let mut attr = ast::Attribute::new(key, value);
        attr.location = self.span(start)?;
        Result::Ok(attr)
    }

    //attr_list : '[' [ a_list ] ']' [ attr_list ]
    pub fn parse_attr_list(
        &mut self,
    ) -> Result<Vec<ast::Attribute>, ParseError> {
        let mut lst = Vec::new();
        if !matches!(self.tok, Token::OpenBracket) {
            return self.error(&["\"[\""]);
        }

        while let Token::OpenBracket = self.tok {
            self.lex()?;
            loop {
                match self.tok {
                    Token::CloseBracket => {
                        self.lex()?;
                        break;
                    }
                    // Skip separators.
                    Token::Semicolon | Token::Comma => {
                        self.lex()?;
                    }
                    _ if self.is_id_start() => {
                        lst.push(self.parse_attribute()?);
                    }
                    _ => {
                        return self.error(&["identifier", "\"]\""]);
                    }
                }
            }
        }
        Result::Ok(lst)
    }

    fn parse_optional_attr_list(
        &mut self,
    ) -> Result<Vec<ast::Attribute>, ParseError> {
        if let Token::OpenBracket = self.tok {
            return self.parse_attr_list();
        }
        Result::Ok(Vec::new())
    }

    //attr_stmt : (graph | node | edge) attr_list
    pub fn parse_attr_stmt(
        &mut self,
    ) -> Result<ast::AttributeList, ParseError> {
        let start = self.loc.start;
        let kind = match self.tok {
            Token::GraphKW => ast::AttributeKind::Graph,
            Token::NodeKW => ast::AttributeKind::Node,
            Token::EdgeKW => ast::AttributeKind::Edge,
            _ => {
                return self.error(&["\"graph\"", "\"node\"", "\"edge\""]);
            }
        };
        self.lex()?;
        let children = self.parse_attr_list()?;
        let mut list = ast::AttributeList::new(kind, children);
        list.location = self.span(start)?;
        Result::Ok(list)
    }

    //node_stmt : node_id [ attr_list ]
    pub fn parse_node_stmt(&mut self) -> Result<ast::Node, ParseError> {
        let start = self.loc.start;
        let nr = self.read_node_id()?;
        self.finish_node_stmt(nr, start)
    }

    fn finish_node_stmt(
        &mut self,
        nr: ast::NodeRef,
        start: ast::Position,
    ) -> Result<ast::Node, ParseError> {
        let list = self.parse_optional_attr_list()?;
        let mut node = ast::Node::new_with_list(nr.id, list);
        node.port = nr.port;
        node.compass = nr.compass;
        node.location = self.span(start)?;
        Result::Ok(node)
    }

    // stmt : node_stmt | edge_stmt | attr_stmt | ID '=' ID | subgraph
    // Nested subgraphs recurse through here. Keep the frame small.
    pub fn parse_stmt(&mut self) -> Result<ast::Stmt, ParseError> {
        match self.tok {
            _ if self.is_id_start() => self.parse_id_stmt(),
            Token::GraphKW | Token::NodeKW | Token::EdgeKW => {
                Result::Ok(ast::Stmt::AttributeList(self.parse_attr_stmt()?))
            }
            Token::SubgraphKW => {
                Result::Ok(ast::Stmt::Subgraph(self.parse_subgraph()?))
            }
            Token::OpenBrace => {
                // "{ a b } -> c" is an edge, any other braces open an
                // anonymous subgraph.
                if let Some(edge) = self.try_group_edge()? {
                    return Result::Ok(ast::Stmt::Edge(edge));
                }
                Result::Ok(ast::Stmt::Subgraph(self.parse_subgraph()?))
            }
            _ => self.error(&[
                "identifier",
                "\"graph\"",
                "\"node\"",
                "\"edge\"",
                "\"subgraph\"",
                "\"{\"",
                "\"}\"",
            ]),
        }
    }

    // node_stmt | edge_stmt | ID '=' ID
    fn parse_id_stmt(&mut self) -> Result<ast::Stmt, ParseError> {
        let start = self.loc.start;
        let id = self.parse_id()?;
        if let Token::Equal = self.tok {
            self.lex()?;
            let value = self.parse_id()?;
            let mut attr = ast::Attribute::new(id, value);
            attr.location = self.span(start)?;
            return Result::Ok(ast::Stmt::Attribute(attr));
        }

        let (port, compass) = self.parse_port()?;
        let mut nr = ast::NodeRef::new(id);
        nr.port = port;
        nr.compass = compass;

        if self.is_edge_token() {
            nr.location = self.span(start)?;
            let first = ast::EdgeTarget::Ref(nr);
            let edge = self.parse_edge_stmt(first, start)?;
            return Result::Ok(ast::Stmt::Edge(edge));
        }
        let node = self.finish_node_stmt(nr, start)?;
        Result::Ok(ast::Stmt::Node(node))
    }

    // Parses "{ node_id* } edgeRHS" when the braces hold a group followed by
    // an edge operator. Otherwise rewinds to the '{' and returns None.
    fn try_group_edge(&mut self) -> Result<Option<ast::Edge>, ParseError> {
        let cp = self.checkpoint();
        let start = self.loc.start;
        match self.parse_node_ref_group() {
            Result::Ok(group) if self.is_edge_token() => {
                let first = ast::EdgeTarget::Group(group);
                let edge = self.parse_edge_stmt(first, start)?;
                Result::Ok(Some(edge))
            }
            Result::Err(err) if err.is_limit() => Result::Err(err),
            _ => {
                self.restore(cp);
                Result::Ok(None)
            }
        }
    }

    // stmt_list : [ stmt [ ';' ] stmt_list ]
    // Stops at '}' or at the end of the input, without consuming either.
    pub fn parse_stmt_list(&mut self) -> Result<Vec<ast::Stmt>, ParseError> {
        let mut lst = Vec::new();
        loop {
            for c in self.take_comments() {
                lst.push(ast::Stmt::Comment(c));
            }
            match self.tok {
                Token::Semicolon => {
                    // Consume the semicolon.
                    self.lex()?;
                }
                Token::CloseBrace | Token::EOF => {
                    return Result::Ok(lst);
                }
                _ => {
                    let stmt = self.parse_stmt()?;
                    lst.push(stmt);
                }
            }
        }
    }

    // '{' stmt_list '}'
    fn parse_body(&mut self) -> Result<Vec<ast::Stmt>, ParseError> {
        if let Token::OpenBrace = self.tok {
            self.lex()?;
        } else {
            return self.error(&["\"{\""]);
        }
        let list = self.parse_stmt_list()?;
        if let Token::CloseBrace = self.tok {
            self.lex()?;
        } else {
            return self.error(&["\"}\""]);
        }
        Result::Ok(list)
    }

    //subgraph : [ subgraph [ ID ] ] '{' stmt_list '}'
    pub fn parse_subgraph(&mut self) -> Result<ast::Subgraph, ParseError> {
        let start = self.loc.start;
        let mut id = None;

        // Consume the 'subgraph' keyword and the optional name.
        if let Token::SubgraphKW = self.tok {
            self.lex()?;
            if self.is_id_start() {
                id = Some(self.parse_id()?);
            }
        }

        self.depth += 1;
        self.guard.check_subgraph_depth(self.depth, self.loc)?;
        let children = self.parse_body()?;
        self.depth -= 1;

        let mut sg = ast::Subgraph::new(id, children);
        sg.location = self.span(start)?;
        Result::Ok(sg)
    }

    // graph : [ strict ] (graph | digraph) [ ID ] '{' stmt_list '}'
    pub fn parse_graph(&mut self) -> Result<ast::Graph, ParseError> {
        let start = self.loc.start;

        // Consume the 'strict' keyword.
        let strict = matches!(self.tok, Token::StrictKW);
        if strict {
            self.lex()?;
        }

        let directed = match self.tok {
            Token::GraphKW => false,
            Token::DigraphKW => true,
            _ => {
                return if strict {
                    self.error(&["\"graph\"", "\"digraph\""])
                } else {
                    self.error(&["\"strict\"", "\"graph\"", "\"digraph\""])
                };
            }
        };
        self.lex()?;

        // Consume the optional graph name.
        let id = if self.is_id_start() {
            Some(self.parse_id()?)
        } else {
            None
        };

        let saved = self.directed.replace(directed);
        let children = self.parse_body()?;
        self.directed = saved;

        let mut graph = ast::Graph::new(directed, id);
        graph.strict = strict;
        graph.children = children;
        graph.location = self.span(start)?;
        Result::Ok(graph)
    }

    // dot : (comment | graph)+
    pub fn parse_dot(&mut self) -> Result<ast::Dot, ParseError> {
        let start = self.loc.start;
        let mut children = Vec::new();
        loop {
            for c in self.take_comments() {
                children.push(ast::DotItem::Comment(c));
            }
            if let Token::EOF = self.tok {
                break;
            }
            children.push(ast::DotItem::Graph(self.parse_graph()?));
        }
        if !children.iter().any(|c| matches!(c, ast::DotItem::Graph(_))) {
            return self.error(&["\"strict\"", "\"graph\"", "\"digraph\""]);
        }
        let mut dot = ast::Dot::new(children);
        dot.location = self.span(start)?;
        Result::Ok(dot)
    }

    // Skips a trailing statement separator.
    fn skip_terminator(&mut self) -> Result<(), ParseError> {
        if matches!(self.tok, Token::Semicolon | Token::Comma) {
            self.lex()?;
        }
        Result::Ok(())
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        if let Token::EOF = self.tok {
            return Result::Ok(());
        }
        self.error(&["end of input"])
    }

    /// Parses the whole input under \p rule.
    pub fn process(
        &mut self,
        rule: StartRule,
    ) -> Result<ast::AstNode, ParseError> {
        self.lex()?;
        let result = match rule {
            StartRule::Dot => ast::AstNode::Dot(self.parse_dot()?),
            StartRule::Graph => ast::AstNode::Graph(self.parse_graph()?),
            StartRule::Node => {
                let node = self.parse_node_stmt()?;
                self.skip_terminator()?;
                ast::AstNode::Node(node)
            }
            StartRule::Edge => {
                let start = self.loc.start;
                let first = self.parse_edge_target()?;
                let edge = self.parse_edge_stmt(first, start)?;
                self.skip_terminator()?;
                ast::AstNode::Edge(edge)
            }
            StartRule::Attribute => {
                let attr = self.parse_attribute()?;
                self.skip_terminator()?;
                ast::AstNode::Attribute(attr)
            }
            StartRule::AttributeStatementList => {
                let list = self.parse_attr_stmt()?;
                self.skip_terminator()?;
                ast::AstNode::AttributeList(list)
            }
            StartRule::Statements => {
                ast::AstNode::Statements(self.parse_stmt_list()?)
            }
        };
        self.expect_eof()?;
        Result::Ok(result)
    }
}
