//! Nodes and the references that edges use to point at them.

use super::attributes::{AttributeValue, Attributes};
use crate::gv::parser::parser::is_compass;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    pub attributes: Attributes,
    pub comment: Option<String>,
}

impl Node {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            attributes: Attributes::new(),
            comment: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.attributes.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Returns a reference to the port \p port of this node, for use as an
    /// edge endpoint.
    pub fn port(&self, port: &str) -> NodeRef {
        NodeRef::new(&self.id).with_port(port)
    }

    pub fn to_ref(&self) -> NodeRef {
        NodeRef::new(&self.id)
    }
}

/// A node id with an optional port and compass point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub port: Option<String>,
    pub compass: Option<String>,
}

impl NodeRef {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            port: None,
            compass: None,
        }
    }

    pub fn with_port(mut self, port: &str) -> Self {
        self.port = Some(port.to_string());
        self
    }

    pub fn with_compass(mut self, compass: &str) -> Self {
        self.compass = Some(compass.to_string());
        self
    }

    /// Parses "id", "id:port", "id:compass" or "id:port:compass".
    pub fn parse(s: &str) -> Self {
        let mut parts = s.splitn(3, ':');
        let mut nr = NodeRef::new(parts.next().unwrap_or(""));
        match (parts.next(), parts.next()) {
            (Some(second), None) if is_compass(second) => {
                nr.compass = Some(second.to_string());
            }
            (Some(port), compass) => {
                nr.port = Some(port.to_string());
                nr.compass = compass.map(|c| c.to_string());
            }
            (None, _) => {}
        }
        nr
    }
}

/// Anything that identifies a node inside a container.
pub trait NodeKey {
    fn node_key(&self) -> &str;
}

impl NodeKey for str {
    fn node_key(&self) -> &str {
        self
    }
}

impl NodeKey for String {
    fn node_key(&self) -> &str {
        self
    }
}

impl NodeKey for Node {
    fn node_key(&self) -> &str {
        &self.id
    }
}

impl NodeKey for NodeRef {
    fn node_key(&self) -> &str {
        &self.id
    }
}

#[test]
fn test_parse_node_ref() {
    assert_eq!(NodeRef::parse("a"), NodeRef::new("a"));
    assert_eq!(NodeRef::parse("a:p"), NodeRef::new("a").with_port("p"));
    assert_eq!(NodeRef::parse("a:ne"), NodeRef::new("a").with_compass("ne"));
    assert_eq!(
        NodeRef::parse("a:p:s"),
        NodeRef::new("a").with_port("p").with_compass("s")
    );
}
