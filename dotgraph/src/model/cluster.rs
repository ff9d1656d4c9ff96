//! Graphs and subgraphs, the containers of the object model.

use super::attributes::{AttributeList, AttributeValue, Attributes};
use super::context::{default_factory, ModelFactory};
use super::edge::{resolve_targets, Edge, EdgeTargetLike};
use super::error::ModelError;
use super::node::{Node, NodeKey};
use crate::gv::parser::ast::AttributeKind;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::sync::Arc;

/// The state shared by root graphs and subgraphs.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub(crate) id: Option<String>,
    pub(crate) comment: Option<String>,
    // Attributes of the container itself, printed as "key = value;".
    pub(crate) attributes: Attributes,
    pub(crate) graph_attrs: AttributeList,
    pub(crate) node_attrs: AttributeList,
    pub(crate) edge_attrs: AttributeList,
    pub(crate) nodes: IndexMap<String, Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) subgraphs: Vec<Subgraph>,
    pub(crate) factory: Arc<dyn ModelFactory>,
}

impl Cluster {
    pub fn new(id: Option<&str>) -> Self {
        Self {
            id: id.map(|s| s.to_string()),
            comment: None,
            attributes: Attributes::new(),
            graph_attrs: AttributeList::new(AttributeKind::Graph),
            node_attrs: AttributeList::new(AttributeKind::Node),
            edge_attrs: AttributeList::new(AttributeKind::Edge),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            subgraphs: Vec::new(),
            factory: default_factory(),
        }
    }
}

// The factory is a construction strategy, not content.
impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.comment == other.comment
            && self.attributes == other.attributes
            && self.graph_attrs == other.graph_attrs
            && self.node_attrs == other.node_attrs
            && self.edge_attrs == other.edge_attrs
            && self.nodes == other.nodes
            && self.edges == other.edges
            && self.subgraphs == other.subgraphs
    }
}

/// The operations that root graphs and subgraphs share.
pub trait GraphContainer {
    fn cluster(&self) -> &Cluster;
    fn cluster_mut(&mut self) -> &mut Cluster;

    fn id(&self) -> Option<&str> {
        self.cluster().id.as_deref()
    }

    fn comment(&self) -> Option<&str> {
        self.cluster().comment.as_deref()
    }

    fn set_comment(&mut self, comment: &str) {
        self.cluster_mut().comment = Some(comment.to_string());
    }

    /// The factory used for the elements this container creates.
    fn factory(&self) -> Arc<dyn ModelFactory> {
        self.cluster().factory.clone()
    }

    /// Replaces the factory. Only elements created from now on, in this
    /// container and in subgraphs created from now on, are affected.
    fn set_factory(&mut self, factory: Arc<dyn ModelFactory>) {
        self.cluster_mut().factory = factory;
    }

    fn attributes(&self) -> &Attributes {
        &self.cluster().attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.cluster_mut().attributes
    }

    fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.cluster_mut().attributes.set(key, value);
    }

    fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.cluster().attributes.get(key)
    }

    fn delete(&mut self, key: &str) -> Option<AttributeValue> {
        self.cluster_mut().attributes.delete(key)
    }

    fn apply<I, K, V>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.cluster_mut().attributes.apply(attrs);
    }

    fn graph_attributes(&self) -> &AttributeList {
        &self.cluster().graph_attrs
    }

    fn graph_attributes_mut(&mut self) -> &mut AttributeList {
        &mut self.cluster_mut().graph_attrs
    }

    fn node_attributes(&self) -> &AttributeList {
        &self.cluster().node_attrs
    }

    fn node_attributes_mut(&mut self) -> &mut AttributeList {
        &mut self.cluster_mut().node_attrs
    }

    fn edge_attributes(&self) -> &AttributeList {
        &self.cluster().edge_attrs
    }

    fn edge_attributes_mut(&mut self) -> &mut AttributeList {
        &mut self.cluster_mut().edge_attrs
    }

    /// Returns the common attribute list of kind \p kind.
    fn common_attributes_mut(
        &mut self,
        kind: AttributeKind,
    ) -> &mut AttributeList {
        let c = self.cluster_mut();
        match kind {
            AttributeKind::Graph => &mut c.graph_attrs,
            AttributeKind::Node => &mut c.node_attrs,
            AttributeKind::Edge => &mut c.edge_attrs,
        }
    }

    fn nodes(&self) -> Vec<&Node> {
        self.cluster().nodes.values().collect()
    }

    fn edges(&self) -> &[Edge] {
        &self.cluster().edges
    }

    fn subgraphs(&self) -> &[Subgraph] {
        &self.cluster().subgraphs
    }

    /// Returns true if the container has no elements and no attributes.
    fn is_empty(&self) -> bool {
        let c = self.cluster();
        c.attributes.is_empty()
            && c.graph_attrs.is_empty()
            && c.node_attrs.is_empty()
            && c.edge_attrs.is_empty()
            && c.nodes.is_empty()
            && c.edges.is_empty()
            && c.subgraphs.is_empty()
    }

    // Membership primitives.

    /// Adds \p node, replacing any node with the same id.
    fn add_node(&mut self, node: Node) -> &mut Node {
        let entry = self.cluster_mut().nodes.entry(node.id().to_string());
        match entry {
            Entry::Occupied(mut e) => {
                e.insert(node);
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(node),
        }
    }

    fn add_edge(&mut self, edge: Edge) -> &mut Edge {
        let edges = &mut self.cluster_mut().edges;
        let idx = edges.len();
        edges.push(edge);
        &mut edges[idx]
    }

    fn add_subgraph(&mut self, subgraph: Subgraph) -> &mut Subgraph {
        let subgraphs = &mut self.cluster_mut().subgraphs;
        let idx = subgraphs.len();
        subgraphs.push(subgraph);
        &mut subgraphs[idx]
    }

    fn exist_node<K: NodeKey + ?Sized>(&self, key: &K) -> bool {
        self.cluster().nodes.contains_key(key.node_key())
    }

    fn exist_edge(&self, edge: &Edge) -> bool {
        self.cluster().edges.iter().any(|e| e == edge)
    }

    fn exist_subgraph(&self, subgraph: &Subgraph) -> bool {
        self.cluster().subgraphs.iter().any(|s| s == subgraph)
    }

    /// Removes the node with the id of \p key, which is an id or a node.
    fn remove_node<K: NodeKey + ?Sized>(&mut self, key: &K) -> Option<Node> {
        self.cluster_mut().nodes.shift_remove(key.node_key())
    }

    /// Removes the first edge that is equal to \p edge.
    fn remove_edge(&mut self, edge: &Edge) -> Option<Edge> {
        let edges = &mut self.cluster_mut().edges;
        let idx = edges.iter().position(|e| e == edge)?;
        Some(edges.remove(idx))
    }

    /// Removes the first subgraph that is equal to \p subgraph.
    fn remove_subgraph(&mut self, subgraph: &Subgraph) -> Option<Subgraph> {
        let subgraphs = &mut self.cluster_mut().subgraphs;
        let idx = subgraphs.iter().position(|s| s == subgraph)?;
        Some(subgraphs.remove(idx))
    }

    fn get_node(&self, id: &str) -> Option<&Node> {
        self.cluster().nodes.get(id)
    }

    fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.cluster_mut().nodes.get_mut(id)
    }

    fn get_subgraph(&self, id: &str) -> Option<&Subgraph> {
        self.cluster()
            .subgraphs
            .iter()
            .find(|s| s.id() == Some(id))
    }

    fn get_subgraph_mut(&mut self, id: &str) -> Option<&mut Subgraph> {
        self.cluster_mut()
            .subgraphs
            .iter_mut()
            .find(|s| s.id() == Some(id))
    }

    // Factory methods.

    /// Creates the node \p id, replacing an existing node with that id.
    fn create_node(&mut self, id: &str) -> &mut Node {
        let node = self.cluster().factory.create_node(id);
        self.add_node(node)
    }

    fn create_node_with<I, K, V>(&mut self, id: &str, attrs: I) -> &mut Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let node = self.create_node(id);
        node.attributes.apply(attrs);
        node
    }

    /// Creates an edge between \p targets. Fails if fewer than two of them
    /// can be resolved.
    fn create_edge<I, T>(&mut self, targets: I) -> Result<&mut Edge, ModelError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeTargetLike>,
    {
        let targets = resolve_targets(targets);
        let edge = self.cluster().factory.create_edge(targets)?;
        Result::Ok(self.add_edge(edge))
    }

    fn create_edge_with<I, T, A, K, V>(
        &mut self,
        targets: I,
        attrs: A,
    ) -> Result<&mut Edge, ModelError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeTargetLike>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let edge = self.create_edge(targets)?;
        edge.attributes.apply(attrs);
        Result::Ok(edge)
    }

    /// Creates a subgraph. The subgraph inherits the factory of this
    /// container.
    fn create_subgraph(&mut self, id: Option<&str>) -> &mut Subgraph {
        let factory = self.factory();
        let mut subgraph = factory.create_subgraph(id);
        subgraph.cluster.factory = factory;
        self.add_subgraph(subgraph)
    }

    fn create_subgraph_with<I, K, V>(
        &mut self,
        id: Option<&str>,
        attrs: I,
    ) -> &mut Subgraph
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let subgraph = self.create_subgraph(id);
        subgraph.apply(attrs);
        subgraph
    }

    // Get-or-create helpers.

    /// Returns the node \p id, creating it if needed.
    fn node(&mut self, id: &str) -> &mut Node {
        let factory = self.factory();
        self.cluster_mut()
            .nodes
            .entry(id.to_string())
            .or_insert_with(|| factory.create_node(id))
    }

    /// Returns the node \p id, creating it if needed, after applying
    /// \p attrs to it.
    fn node_with_attrs<I, K, V>(&mut self, id: &str, attrs: I) -> &mut Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let node = self.node(id);
        node.attributes.apply(attrs);
        node
    }

    /// Returns the node \p id, creating it if needed, after passing it to
    /// \p f.
    fn with_node<F>(&mut self, id: &str, f: F) -> &mut Node
    where
        F: FnOnce(&mut Node),
    {
        let node = self.node(id);
        f(&mut *node);
        node
    }

    /// Creates an edge. Edges have no identity, so this always creates.
    fn edge<I, T>(&mut self, targets: I) -> Result<&mut Edge, ModelError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeTargetLike>,
    {
        self.create_edge(targets)
    }

    fn edge_with_attrs<I, T, A, K, V>(
        &mut self,
        targets: I,
        attrs: A,
    ) -> Result<&mut Edge, ModelError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeTargetLike>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.create_edge_with(targets, attrs)
    }

    fn with_edge<I, T, F>(
        &mut self,
        targets: I,
        f: F,
    ) -> Result<&mut Edge, ModelError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeTargetLike>,
        F: FnOnce(&mut Edge),
    {
        let edge = self.create_edge(targets)?;
        f(&mut *edge);
        Result::Ok(edge)
    }

    /// Returns the subgraph \p id, creating it if needed. Anonymous
    /// subgraphs are always created.
    fn subgraph(&mut self, id: Option<&str>) -> &mut Subgraph {
        let found = id.and_then(|id| {
            self.cluster()
                .subgraphs
                .iter()
                .position(|s| s.id() == Some(id))
        });
        match found {
            Some(idx) => &mut self.cluster_mut().subgraphs[idx],
            None => self.create_subgraph(id),
        }
    }

    fn subgraph_with_attrs<I, K, V>(
        &mut self,
        id: Option<&str>,
        attrs: I,
    ) -> &mut Subgraph
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let subgraph = self.subgraph(id);
        subgraph.apply(attrs);
        subgraph
    }

    fn with_subgraph<F>(&mut self, id: Option<&str>, f: F) -> &mut Subgraph
    where
        F: FnOnce(&mut Subgraph),
    {
        let subgraph = self.subgraph(id);
        f(&mut *subgraph);
        subgraph
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub(crate) cluster: Cluster,
}

impl Subgraph {
    pub fn new(id: Option<&str>) -> Self {
        Self {
            cluster: Cluster::new(id),
        }
    }

    /// Returns true if the id starts with "cluster", which asks layout
    /// engines to draw the subgraph as a box.
    pub fn is_cluster(&self) -> bool {
        match &self.cluster.id {
            Some(id) => id.starts_with("cluster"),
            None => false,
        }
    }
}

impl GraphContainer for Subgraph {
    fn cluster(&self) -> &Cluster {
        &self.cluster
    }
    fn cluster_mut(&mut self) -> &mut Cluster {
        &mut self.cluster
    }
}

/// A top-level graph. Whether it is directed is fixed at construction.
/// The strict flag is only recorded and printed, duplicate edges are not
/// merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RootGraph {
    cluster: Cluster,
    directed: bool,
    pub strict: bool,
}

impl RootGraph {
    pub fn new(directed: bool, id: Option<&str>) -> Self {
        Self {
            cluster: Cluster::new(id),
            directed,
            strict: false,
        }
    }

    pub fn digraph(id: Option<&str>) -> Self {
        Self::new(true, id)
    }

    pub fn graph(id: Option<&str>) -> Self {
        Self::new(false, id)
    }

    /// Creates a graph whose elements are built by \p factory.
    pub fn with_factory(
        directed: bool,
        id: Option<&str>,
        factory: Arc<dyn ModelFactory>,
    ) -> Self {
        let mut g = Self::new(directed, id);
        g.cluster.factory = factory;
        g
    }

    pub fn directed(&self) -> bool {
        self.directed
    }
}

impl GraphContainer for RootGraph {
    fn cluster(&self) -> &Cluster {
        &self.cluster
    }
    fn cluster_mut(&mut self) -> &mut Cluster {
        &mut self.cluster
    }
}
