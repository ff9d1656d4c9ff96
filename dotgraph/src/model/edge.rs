//! Edges and their endpoints.

use super::attributes::{AttributeValue, Attributes};
use super::error::ModelError;
use super::node::{Node, NodeRef};

/// One endpoint of an edge: a single node or a group of nodes that the
/// edge fans out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeTarget {
    Node(NodeRef),
    Group(Vec<NodeRef>),
}

/// The forms accepted when creating an edge. Strings are parsed as
/// "id[:port[:compass]]" and lists become groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeTargetLike {
    Id(String),
    Ref(NodeRef),
    Group(Vec<NodeRef>),
}

impl From<&str> for EdgeTargetLike {
    fn from(x: &str) -> Self {
        Self::Id(x.to_string())
    }
}

impl From<String> for EdgeTargetLike {
    fn from(x: String) -> Self {
        Self::Id(x)
    }
}

impl From<NodeRef> for EdgeTargetLike {
    fn from(x: NodeRef) -> Self {
        Self::Ref(x)
    }
}

impl From<&Node> for EdgeTargetLike {
    fn from(x: &Node) -> Self {
        Self::Ref(x.to_ref())
    }
}

impl From<Vec<NodeRef>> for EdgeTargetLike {
    fn from(x: Vec<NodeRef>) -> Self {
        Self::Group(x)
    }
}

impl From<Vec<&str>> for EdgeTargetLike {
    fn from(x: Vec<&str>) -> Self {
        Self::Group(x.into_iter().map(NodeRef::parse).collect())
    }
}

impl From<&[&str]> for EdgeTargetLike {
    fn from(x: &[&str]) -> Self {
        Self::Group(x.iter().map(|s| NodeRef::parse(s)).collect())
    }
}

impl From<EdgeTarget> for EdgeTargetLike {
    fn from(x: EdgeTarget) -> Self {
        match x {
            EdgeTarget::Node(n) => Self::Ref(n),
            EdgeTarget::Group(g) => Self::Group(g),
        }
    }
}

impl EdgeTargetLike {
    /// Converts to a target, or None when nothing usable is left.
    pub fn resolve(self) -> Option<EdgeTarget> {
        match self {
            Self::Id(s) => {
                let nr = NodeRef::parse(&s);
                if nr.id.is_empty() {
                    return None;
                }
                Some(EdgeTarget::Node(nr))
            }
            Self::Ref(nr) => {
                if nr.id.is_empty() {
                    return None;
                }
                Some(EdgeTarget::Node(nr))
            }
            Self::Group(list) => {
                let list: Vec<NodeRef> =
                    list.into_iter().filter(|nr| !nr.id.is_empty()).collect();
                if list.is_empty() {
                    return None;
                }
                Some(EdgeTarget::Group(list))
            }
        }
    }
}

/// Resolves every entry of \p targets, dropping the unusable ones.
pub fn resolve_targets<I, T>(targets: I) -> Vec<EdgeTarget>
where
    I: IntoIterator<Item = T>,
    T: Into<EdgeTargetLike>,
{
    targets
        .into_iter()
        .filter_map(|t| t.into().resolve())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    targets: Vec<EdgeTarget>,
    pub attributes: Attributes,
    pub comment: Option<String>,
}

impl Edge {
    /// Creates an edge. Fails unless there are at least two targets.
    pub fn new(targets: Vec<EdgeTarget>) -> Result<Self, ModelError> {
        if targets.len() < 2 {
            return Result::Err(ModelError::NotEnoughTargets(targets.len()));
        }
        Result::Ok(Self {
            targets,
            attributes: Attributes::new(),
            comment: None,
        })
    }

    pub fn targets(&self) -> &[EdgeTarget] {
        &self.targets
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
}

#[test]
fn test_resolve_targets() {
    let targets = resolve_targets(vec![
        EdgeTargetLike::from("a:p"),
        EdgeTargetLike::from(""),
        EdgeTargetLike::from(vec!["b", "c"]),
        EdgeTargetLike::from(Vec::<NodeRef>::new()),
    ]);
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0], EdgeTarget::Node(NodeRef::new("a").with_port("p")));
    assert!(matches!(&targets[1], EdgeTarget::Group(g) if g.len() == 2));
}
