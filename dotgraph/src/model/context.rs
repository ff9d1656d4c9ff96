//! Pluggable constructors for the elements of a graph.
//!
//! Every container holds a factory and uses it for each node, edge and
//! subgraph it creates. A new subgraph copies the factory of its parent at
//! the moment it is created, so replacing the factory of a container only
//! affects the elements created afterwards in its own subtree.

use super::cluster::Subgraph;
use super::edge::{Edge, EdgeTarget};
use super::error::ModelError;
use super::node::Node;
use std::fmt::Debug;
use std::sync::Arc;

pub trait ModelFactory: Debug + Send + Sync {
    fn create_node(&self, id: &str) -> Node {
        Node::new(id)
    }

    fn create_edge(
        &self,
        targets: Vec<EdgeTarget>,
    ) -> Result<Edge, ModelError> {
        Edge::new(targets)
    }

    fn create_subgraph(&self, id: Option<&str>) -> Subgraph {
        Subgraph::new(id)
    }
}

/// Builds plain elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl ModelFactory for DefaultFactory {}

pub fn default_factory() -> Arc<dyn ModelFactory> {
    Arc::new(DefaultFactory)
}
