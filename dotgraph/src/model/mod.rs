//! An object model for building graphs in code.
//!
//! Graphs are built through their containers: a [`RootGraph`] or a
//! [`Subgraph`] creates and owns its nodes, edges and subgraphs. Everything
//! keeps its insertion order, which is also the order of the printed DOT.
//!
//! ```rust
//! use dotgraph::model::*;
//!
//! let mut g = RootGraph::digraph(Some("G"));
//! g.node_attributes_mut().set("shape", "box");
//! g.create_node("a").set("label", "A");
//! g.create_edge(["a", "b"]).unwrap();
//! g.subgraph(Some("cluster_0")).create_node("c");
//! assert!(g.to_dot().contains("\"a\" -> \"b\";"));
//! ```

pub mod attributes;
pub mod cluster;
pub mod context;
pub mod edge;
pub mod error;
pub mod node;

pub use crate::gv::convert::ToDot;
pub use crate::gv::parser::ast::AttributeKind;
pub use attributes::{AttributeList, AttributeValue, Attributes};
pub use cluster::{Cluster, GraphContainer, RootGraph, Subgraph};
pub use context::{DefaultFactory, ModelFactory};
pub use edge::{Edge, EdgeTarget, EdgeTargetLike};
pub use error::ModelError;
pub use node::{Node, NodeKey, NodeRef};
