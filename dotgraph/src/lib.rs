/*!
This crate provides a library for parsing and printing GraphViz DOT files.
It parses the whole DOT language (strict graphs, subgraphs, ports and compass
points, HTML-like labels, the three comment styles), prints syntax trees back
as canonical DOT text, and offers an object model for building graphs in
code.

Parsing is protected by a resource guard that bounds the input size, the
number of syntax tree nodes, the nesting of HTML-like strings and subgraphs,
and the length of edge chains. Every limit can be raised or disabled.

The project also comes with a command line utility, `dotfmt`, that
reformats .DOT files.

# Parser example: parse a dot file

This crate provides an API for parsing DOT files. For example,
to load, parse and print the AST:

```rust
    use dotgraph::gv;

    let contents = "digraph { a -> b [label=\"foo\"]; }";
    let options = gv::ParseOptions::default();

    match gv::parse(contents, &options) {
        Result::Err(err) => {
            eprintln!("Error: {}", err);
        }

        Result::Ok(tree) => {
            gv::dump_ast(&tree);
            println!("{}", gv::stringify(&tree));
        }
    }
```

The example above would print the program AST followed by the canonical
text:

```txt
digraph {
  a -> b [
    label = "foo";
  ];
}
```

Errors carry the location of the offending token, and
`gv::parser::error::snippet` renders it:

```txt
digraph { a = ; }
              ^
1:15: Expected identifier but ";" found
```

# Graph Builder example: create a new graph

This code builds a graph with two nodes that are connected with an edge, and
prints it.

```rust
fn simple_graph() {
    use dotgraph::model::*;

    // Create a new graph:
    let mut g = RootGraph::digraph(Some("G"));

    // Define the node styles:
    g.node_attributes_mut().set("shape", "box");
    g.create_node("one").set("label", "one");
    g.create_node("two").set("label", "two");

    // Add an edge between the nodes.
    g.create_edge(["one", "two"]).unwrap().set("color", "red");

    println!("{}", g.to_dot());
}
```

*/

pub mod gv;
pub mod model;

pub use gv::{parse, stringify, ParseOptions, StartRule};
