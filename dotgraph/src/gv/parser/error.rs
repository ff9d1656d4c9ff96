//! Errors reported by the DOT parser.
//!
//! There are two families. Syntax errors (including the wrong edge operator
//! for the kind of graph) mean the input is malformed. Limit errors mean the
//! input crossed one of the bounds in [`super::Limits`]; callers may retry
//! with relaxed limits.

use super::ast::Location;
use thiserror::Error;

/// Malformed input relative to the grammar.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}{}: {}", file_prefix(.filename), .location, describe(.expected, .found))]
pub struct SyntaxError {
    /// Descriptions of the tokens that would have been accepted.
    pub expected: Vec<String>,
    /// The token that was found instead, or None at the end of the input.
    pub found: Option<String>,
    pub location: Location,
    pub filename: Option<String>,
}

impl SyntaxError {
    pub fn message(&self) -> String {
        describe(&self.expected, &self.found)
    }
}

fn file_prefix(filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!("{}:", name),
        None => String::new(),
    }
}

fn describe(expected: &[String], found: &Option<String>) -> String {
    let found = match found {
        Some(tok) => format!("\"{}\"", tok),
        None => "end of input".to_string(),
    };
    match expected.len() {
        0 => format!("Unexpected {}", found),
        1 => format!("Expected {} but {} found", expected[0], found),
        n => format!(
            "Expected {} or {} but {} found",
            expected[..n - 1].join(", "),
            expected[n - 1],
            found
        ),
    }
}

/// The resource bound that was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    InputSize,
    AstNodes,
    HtmlNesting,
    EdgeChain,
    SubgraphNesting,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InputSize => "input size",
            Self::AstNodes => "AST node count",
            Self::HtmlNesting => "HTML nesting depth",
            Self::EdgeChain => "edge chain depth",
            Self::SubgraphNesting => "subgraph nesting depth",
        };
        write!(f, "{}", name)
    }
}

/// The input exceeded a configured bound.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.message())]
pub struct LimitError {
    pub limit: LimitKind,
    pub observed: usize,
    pub allowed: usize,
    /// Where the bound was crossed. None for checks made before parsing.
    pub location: Option<Location>,
}

impl LimitError {
    pub fn message(&self) -> String {
        let msg = match self.limit {
            LimitKind::InputSize => format!(
                "Input size {} bytes exceeds maximum allowed size of {} bytes",
                self.observed, self.allowed
            ),
            LimitKind::AstNodes => format!(
                "AST node count {} exceeds maximum allowed count of {}",
                self.observed, self.allowed
            ),
            kind => format!(
                "{} {} exceeds maximum allowed depth of {}",
                capitalize(&kind.to_string()),
                self.observed,
                self.allowed
            ),
        };
        match self.location {
            Some(loc) => format!(
                "{} at line {}, column {}",
                msg, loc.start.line, loc.start.column
            ),
            None => msg,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Everything that can go wrong while parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(SyntaxError),

    /// `--` inside a digraph, or `->` inside a graph.
    #[error(
        "{location}: Edge operator \"{found}\" is not allowed in a {graph}, \
         use \"{expected}\""
    )]
    EdgeOperator {
        found: &'static str,
        expected: &'static str,
        graph: &'static str,
        location: Location,
    },

    #[error(transparent)]
    Limit(LimitError),
}

impl ParseError {
    /// Returns true for resource-limit failures, which may succeed when
    /// retried with relaxed limits.
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::Limit(_))
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Syntax(e) => Some(e.location),
            Self::EdgeOperator { location, .. } => Some(*location),
            Self::Limit(e) => e.location,
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<LimitError> for ParseError {
    fn from(e: LimitError) -> Self {
        Self::Limit(e)
    }
}

/// Renders the line that contains \p location followed by a line with a
/// '^' marker under the offending column.
pub fn snippet(source: &str, location: &Location) -> String {
    let line_no = location.start.line.max(1);
    let line = source.lines().nth(line_no - 1).unwrap_or("");
    let marker = " ".repeat(location.start.column.saturating_sub(1));
    format!("{}\n{}^", line, marker)
}

#[test]
fn test_syntax_error_message() {
    let err = SyntaxError {
        expected: vec!["\"{\"".to_string(), "identifier".to_string()],
        found: Some("]".to_string()),
        location: Location::default(),
        filename: Some("a.dot".to_string()),
    };
    assert_eq!(
        err.to_string(),
        "a.dot:0:0: Expected \"{\" or identifier but \"]\" found"
    );
}

#[test]
fn test_snippet() {
    use super::ast::Position;
    let src = "digraph {\n  a -> ;\n}";
    let loc = Location::new(Position::new(17, 2, 8), Position::new(18, 2, 9));
    assert_eq!(snippet(src, &loc), "  a -> ;\n       ^");
}
