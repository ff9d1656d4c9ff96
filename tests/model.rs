use dotgraph::gv;
use dotgraph::model::*;
use std::sync::Arc;

// Gives every node it creates a box shape.
#[derive(Debug)]
struct BoxFactory;

impl ModelFactory for BoxFactory {
    fn create_node(&self, id: &str) -> Node {
        let mut n = Node::new(id);
        n.set("shape", "box");
        n
    }
}

#[test]
fn cluster_detection() {
    assert!(Subgraph::new(Some("cluster_x")).is_cluster());
    assert!(!Subgraph::new(Some("x_cluster")).is_cluster());
    assert!(!Subgraph::new(None).is_cluster());
}

#[test]
fn edge_arity() {
    let mut g = RootGraph::digraph(None);
    assert_eq!(
        g.create_edge(Vec::<&str>::new()).unwrap_err(),
        ModelError::NotEnoughTargets(0)
    );
    assert_eq!(
        g.create_edge(["a"]).unwrap_err(),
        ModelError::NotEnoughTargets(1)
    );
    assert_eq!(
        ModelError::NotEnoughTargets(1).to_string(),
        "An edge requires at least two targets, got 1"
    );
    // Empty ids are dropped before counting.
    assert!(g.create_edge(["a", ""]).is_err());
    assert!(g.create_edge(["a", "b"]).is_ok());
    assert!(g.create_edge(["a", "b", "c"]).is_ok());
    assert_eq!(g.edges().len(), 2);

    let group: EdgeTargetLike = vec!["b", "c"].into();
    assert!(g.create_edge(vec![EdgeTargetLike::from("a"), group]).is_ok());
}

#[test]
fn factory_inheritance() {
    let mut g = RootGraph::digraph(Some("G"));
    g.create_subgraph(Some("left"));
    g.create_subgraph(Some("right"));

    {
        let left = g.get_subgraph_mut("left").unwrap();
        left.create_node("before");
        left.set_factory(Arc::new(BoxFactory));
        left.create_node("after");
        let inner = left.create_subgraph(Some("inner"));
        inner.create_node("deep");
    }
    g.get_subgraph_mut("right").unwrap().create_node("sibling");
    g.create_node("top");

    let left = g.get_subgraph("left").unwrap();
    assert!(left.get_node("before").unwrap().get("shape").is_none());
    assert_eq!(
        left.get_node("after").unwrap().get("shape"),
        Some(&AttributeValue::from("box"))
    );
    let inner = left.get_subgraph("inner").unwrap();
    assert!(inner.get_node("deep").unwrap().get("shape").is_some());

    let right = g.get_subgraph("right").unwrap();
    assert!(right.get_node("sibling").unwrap().get("shape").is_none());
    assert!(g.get_node("top").unwrap().get("shape").is_none());
}

#[test]
fn graph_level_factory() {
    let mut g = RootGraph::with_factory(true, None, Arc::new(BoxFactory));
    g.subgraph(Some("s")).node("a");
    let s = g.get_subgraph("s").unwrap();
    assert!(s.get_node("a").unwrap().get("shape").is_some());
}

#[test]
fn get_or_create() {
    let mut g = RootGraph::graph(Some("G"));
    g.node("a").set("color", "red");
    g.node("a").set("shape", "box");
    assert_eq!(g.nodes().len(), 1);
    assert_eq!(g.get_node("a").unwrap().attributes.len(), 2);

    g.node_with_attrs("b", vec![("label", "B")]);
    g.with_node("b", |n| {
        n.set("width", 2);
    });
    assert_eq!(
        g.get_node("b").unwrap().get("width"),
        Some(&AttributeValue::Int(2))
    );

    // Creating a node again replaces it.
    g.create_node("a");
    assert!(g.get_node("a").unwrap().attributes.is_empty());

    g.subgraph(Some("s")).node("x");
    g.subgraph(Some("s")).node("y");
    g.subgraph(None);
    g.subgraph(None);
    assert_eq!(g.subgraphs().len(), 3);
    assert_eq!(g.get_subgraph("s").unwrap().nodes().len(), 2);

    g.edge(["a", "b"]).unwrap();
    g.edge_with_attrs(["a", "b"], vec![("color", "blue")]).unwrap();
    g.with_edge(["a", "b"], |e| {
        e.set("weight", 3);
    })
    .unwrap();
    assert_eq!(g.edges().len(), 3);
}

#[test]
fn membership() {
    let mut g = RootGraph::digraph(None);
    let a = g.create_node("a").clone();
    g.create_node("b");
    g.create_node("c");
    assert!(g.exist_node("a"));
    assert!(g.exist_node(&a));

    assert!(g.remove_node(&a).is_some());
    assert!(g.remove_node("b").is_some());
    assert!(g.remove_node("b").is_none());
    let nodes = g.nodes();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["c"]);

    let e = g.create_edge(["c", "d"]).unwrap().clone();
    assert!(g.exist_edge(&e));
    assert_eq!(g.remove_edge(&e), Some(e.clone()));
    assert!(!g.exist_edge(&e));

    let s = g.create_subgraph(Some("s")).clone();
    assert!(g.exist_subgraph(&s));
    assert!(g.remove_subgraph(&s).is_some());
    assert!(g.subgraphs().is_empty());

    g.add_node(Node::new("z"));
    assert!(g.exist_node("z"));
}

#[test]
fn attributes() {
    let mut g = RootGraph::digraph(None);
    g.set("rankdir", "LR");
    g.apply(vec![("splines", "ortho"), ("rankdir", "TB")]);
    assert_eq!(g.get("rankdir").unwrap().as_str(), Some("TB"));
    let keys: Vec<&str> = g.attributes().keys().collect();
    assert_eq!(keys, vec!["rankdir", "splines"]);
    assert!(g.delete("rankdir").is_some());
    assert!(g.get("rankdir").is_none());

    g.common_attributes_mut(AttributeKind::Edge).set("color", "red");
    assert!(g.edge_attributes().get("color").is_some());
    assert!(!g.is_empty());
}

#[test]
fn render_graph() {
    let mut g = RootGraph::digraph(Some("G"));
    g.set("rankdir", "LR");
    g.node_attributes_mut().set("shape", "box");
    g.edge_attributes_mut().set("color", "red");
    g.create_node("a").set("label", "A");
    let b = g.create_node("b").port("p");
    g.create_edge(vec![
        EdgeTargetLike::from("a:sw"),
        EdgeTargetLike::from(b),
    ])
    .unwrap()
    .set("weight", 2);
    g.subgraph(Some("cluster_0")).create_node("c");

    let expected = r#"digraph "G" {
  rankdir = "LR";
  edge [
    color = "red";
  ];
  node [
    shape = "box";
  ];
  "a" [
    label = "A";
  ];
  "b";
  subgraph "cluster_0" {
    "c";
  }
  "a":sw -> "b":"p" [
    weight = 2;
  ];
}"#;
    assert_eq!(g.to_dot(), expected);
}

#[test]
fn render_undirected_and_strict() {
    let mut g = RootGraph::graph(None);
    g.strict = true;
    g.create_edge(["a", "b"]).unwrap();
    assert_eq!(g.to_dot(), "strict graph {\n  \"a\" -- \"b\";\n}");
    assert_eq!(RootGraph::graph(None).to_dot(), "graph {}");
}

#[test]
fn render_comments() {
    let mut g = RootGraph::digraph(None);
    g.set_comment("top");
    g.create_node("a").comment = Some("first\nnode".to_string());
    let expected = "/**\n * top\n */\ndigraph {\n  /**\n   * first\n   \
                    * node\n   */\n  \"a\";\n}";
    assert_eq!(g.to_dot(), expected);
}

#[test]
fn render_elements() {
    let mut n = Node::new("n");
    n.set("label", "<<b>x</b>>");
    assert_eq!(n.to_dot(), "\"n\" [\n  label = <<b>x</b>>;\n];");

    let mut s = Subgraph::new(Some("s"));
    s.create_node("a");
    assert_eq!(s.to_dot(), "subgraph \"s\" {\n  \"a\";\n}");
}

#[test]
fn model_to_text_and_back() {
    let mut g = RootGraph::digraph(Some("G"));
    g.set_comment("a graph");
    g.set("label", "<<i>title</i>>");
    g.graph_attributes_mut().set("fontsize", 12);
    g.node_attributes_mut().set("shape", "box");
    g.create_node("a").set("width", 1.5).set("fixedsize", true);
    g.subgraph(Some("cluster_1")).create_node("b");
    g.create_edge(vec![
        EdgeTargetLike::from("a:p:n"),
        EdgeTargetLike::from(vec!["b", "c"]),
    ])
    .unwrap()
    .comment = Some("an edge".to_string());

    let text = g.to_dot();
    let tree = gv::parse(&text, &gv::ParseOptions::default()).unwrap();
    let graphs = gv::dot_to_model(tree.as_dot().unwrap()).unwrap();
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0], g);
    assert_eq!(graphs[0].to_dot(), text);
}

#[test]
fn parsed_graph_to_model() {
    let text = "graph G { node [color=red]; a [w=1]; a [h=2]; a -- {b c}; \
                subgraph s { x } subgraph s { y } }";
    let tree = gv::parse(text, &gv::ParseOptions::new(gv::StartRule::Graph))
        .unwrap();
    let g = gv::to_model(tree.as_graph().unwrap()).unwrap();
    assert!(!g.directed());
    assert_eq!(g.id(), Some("G"));
    assert_eq!(g.nodes().len(), 1);
    assert_eq!(g.get_node("a").unwrap().attributes.len(), 2);
    assert_eq!(g.edges().len(), 1);
    assert!(matches!(g.edges()[0].targets()[1], EdgeTarget::Group(_)));
    // Subgraphs with the same name are merged.
    assert_eq!(g.subgraphs().len(), 1);
    assert_eq!(g.get_subgraph("s").unwrap().nodes().len(), 2);
    assert_eq!(
        g.node_attributes().get("color"),
        Some(&AttributeValue::from("red"))
    );
}

#[test]
fn parsed_edge_keeps_empty_endpoint() {
    let text = "graph { \"\" -- b }";
    let tree = gv::parse(text, &gv::ParseOptions::new(gv::StartRule::Graph))
        .unwrap();
    let g = gv::to_model(tree.as_graph().unwrap()).unwrap();
    assert_eq!(g.edges().len(), 1);
    assert_eq!(g.edges()[0].targets().len(), 2);
    assert_eq!(g.to_dot(), "graph {\n  \"\" -- \"b\";\n}");
}
