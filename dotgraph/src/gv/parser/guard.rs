//! Resource bounds for parsing untrusted input.
//!
//! A [`Guard`] is created for every call to [`super::parse`] and dropped
//! when the call returns, so counters never leak from one call to the next.
//! A limit of zero disables the corresponding check.

use super::ast::Location;
use super::error::{LimitError, LimitKind};

pub const DEFAULT_MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_AST_NODES: usize = 100_000;
pub const DEFAULT_MAX_HTML_NESTING_DEPTH: usize = 100;
pub const DEFAULT_MAX_EDGE_CHAIN_DEPTH: usize = 1000;
pub const DEFAULT_MAX_SUBGRAPH_DEPTH: usize = 64;

/// The configurable bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum input length in bytes.
    pub max_input_size: usize,
    /// Maximum number of syntax tree nodes built by one parse.
    pub max_ast_nodes: usize,
    /// Maximum '<' nesting inside an HTML-like value. The delimiter that
    /// opens the value counts as depth 1.
    pub max_html_nesting_depth: usize,
    /// Maximum number of edge operators in a single edge statement.
    pub max_edge_chain_depth: usize,
    /// Maximum nesting of subgraphs and anonymous blocks.
    pub max_subgraph_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_ast_nodes: DEFAULT_MAX_AST_NODES,
            max_html_nesting_depth: DEFAULT_MAX_HTML_NESTING_DEPTH,
            max_edge_chain_depth: DEFAULT_MAX_EDGE_CHAIN_DEPTH,
            max_subgraph_depth: DEFAULT_MAX_SUBGRAPH_DEPTH,
        }
    }
}

impl Limits {
    /// Limits with every check disabled.
    pub fn unlimited() -> Self {
        Self {
            max_input_size: 0,
            max_ast_nodes: 0,
            max_html_nesting_depth: 0,
            max_edge_chain_depth: 0,
            max_subgraph_depth: 0,
        }
    }
}

/// Returns an error if \p observed is above \p allowed (and the limit is
/// enabled).
fn check(
    limit: LimitKind,
    observed: usize,
    allowed: usize,
    location: Option<Location>,
) -> Result<(), LimitError> {
    if allowed != 0 && observed > allowed {
        #[cfg(feature = "log")]
        log::warn!("Limit exceeded: {} {} > {}", limit, observed, allowed);
        return Result::Err(LimitError {
            limit,
            observed,
            allowed,
            location,
        });
    }
    Result::Ok(())
}

/// Per-call counters.
#[derive(Debug, Clone)]
pub struct Guard {
    limits: Limits,
    nodes: usize,
}

impl Guard {
    pub fn new(limits: Limits) -> Self {
        Self { limits, nodes: 0 }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// The number of syntax tree nodes recorded so far.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Resets the node counter to a previous value. The parser uses this
    /// when it backtracks over nodes it has discarded.
    pub fn rewind(&mut self, nodes: usize) {
        self.nodes = nodes;
    }

    pub fn check_input_size(&self, len: usize) -> Result<(), LimitError> {
        check(LimitKind::InputSize, len, self.limits.max_input_size, None)
    }

    /// Records the construction of one syntax tree node.
    pub fn count_node(&mut self, loc: Location) -> Result<(), LimitError> {
        self.nodes += 1;
        check(
            LimitKind::AstNodes,
            self.nodes,
            self.limits.max_ast_nodes,
            Some(loc),
        )
    }

    pub fn check_html_depth(
        &self,
        depth: usize,
        loc: Location,
    ) -> Result<(), LimitError> {
        check(
            LimitKind::HtmlNesting,
            depth,
            self.limits.max_html_nesting_depth,
            Some(loc),
        )
    }

    pub fn check_edge_chain(
        &self,
        depth: usize,
        loc: Location,
    ) -> Result<(), LimitError> {
        check(
            LimitKind::EdgeChain,
            depth,
            self.limits.max_edge_chain_depth,
            Some(loc),
        )
    }

    pub fn check_subgraph_depth(
        &self,
        depth: usize,
        loc: Location,
    ) -> Result<(), LimitError> {
        check(
            LimitKind::SubgraphNesting,
            depth,
            self.limits.max_subgraph_depth,
            Some(loc),
        )
    }
}

#[test]
fn test_zero_disables() {
    let guard = Guard::new(Limits::unlimited());
    assert!(guard.check_input_size(usize::MAX).is_ok());
    assert!(guard.check_html_depth(1 << 20, Location::default()).is_ok());
}

#[test]
fn test_node_counter() {
    let mut limits = Limits::default();
    limits.max_ast_nodes = 2;
    let mut guard = Guard::new(limits);
    assert!(guard.count_node(Location::default()).is_ok());
    assert!(guard.count_node(Location::default()).is_ok());
    let err = guard.count_node(Location::default()).unwrap_err();
    assert_eq!(err.observed, 3);
    assert_eq!(err.allowed, 2);
    guard.rewind(0);
    assert!(guard.count_node(Location::default()).is_ok());
}
