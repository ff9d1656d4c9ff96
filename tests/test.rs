#[cfg(test)]
mod tests {

    use dotgraph::gv;
    use dotgraph::gv::parser::ast;
    use dotgraph::gv::parser::error::snippet;
    use dotgraph::gv::Lexer;
    use dotgraph::gv::Token;
    use dotgraph::gv::{ParseError, ParseOptions, StartRule};

    fn is_identifier(t: Token, target: &str) -> bool {
        match t {
            Token::Identifier(name) => target == name,
            _ => false,
        }
    }

    fn parse_ok(program: &str) -> ast::AstNode {
        match gv::parse(program, &ParseOptions::default()) {
            Result::Err(err) => {
                if let Some(loc) = err.location() {
                    println!("{}", snippet(program, &loc));
                }
                println!("Error: {}", err);
                panic!();
            }
            Result::Ok(tree) => tree,
        }
    }

    fn parse_rule(program: &str, rule: StartRule) -> ast::AstNode {
        let options = ParseOptions::new(rule);
        match gv::parse(program, &options) {
            Result::Err(err) => {
                println!("Error: {}", err);
                panic!();
            }
            Result::Ok(tree) => tree,
        }
    }

    // Prints, reparses and prints again.
    fn reformat(program: &str) -> (String, String) {
        let first = gv::stringify(&parse_ok(program));
        let second = gv::stringify(&parse_ok(&first));
        (first, second)
    }

    fn get_sample_program2() -> String {
        r##"/* ancestor graph from Caroline Bouvier Kennedy */
        graph G {
            I5 [shape=ellipse,color=red,style=bold,label="Caroline Bouvier Kennedy\nb. 27.11.1957 New York",image="images/165px-Caroline_Kennedy.jpg",labelloc=b];
            I1 [shape=box,color=blue,style=bold,label="John Fitzgerald Kennedy\nb. 29.5.1917 Brookline\nd. 22.11.1963 Dallas",image="images/kennedyface.jpg",labelloc=b];
            I6 [shape=box,color=blue,style=bold,label="John Fitzgerald Kennedy\nb. 25.11.1960 Washington\nd. 16.7.1999 over the Atlantic Ocean, near Aquinnah, MA, USA",image="images/180px-JFKJr2.jpg",labelloc=b];
            I7 [shape=box,color=blue,style=bold,label="Patrick Bouvier Kennedy\nb. 7.8.1963\nd. 9.8.1963"];
            I2 [shape=ellipse,color=red,style=bold,label="Jaqueline Lee Bouvier\nb. 28.7.1929 Southampton\nd. 19.5.1994 New York City",image="images/jacqueline-kennedy-onassis.jpg",labelloc=b];
            I8 [shape=box,color=blue,style=bold,label="Joseph Patrick Kennedy\nb. 6.9.1888 East Boston\nd. 16.11.1969 Hyannis Port",image="images/1025901671.jpg",labelloc=b];
            I10 [shape=box,color=blue,style=bold,label="Joseph Patrick Kennedy Jr\nb. 1915\nd. 1944"];
            I11 [shape=ellipse,color=red,style=bold,label="Rosemary Kennedy\nb. 13.9.1918\nd. 7.1.2005",image="images/rosemary.jpg",labelloc=b];
            I12 [shape=ellipse,color=red,style=bold,label="Kathleen Kennedy\nb. 1920\nd. 1948"];
            I13 [shape=ellipse,color=red,style=bold,label="Eunice Mary Kennedy\nb. 10.7.1921 Brookline"];
            I9 [shape=ellipse,color=red,style=bold,label="Rose Elizabeth Fitzgerald\nb. 22.7.1890 Boston\nd. 22.1.1995 Hyannis Port",image="images/Rose_kennedy.JPG",labelloc=b];
            I15 [shape=box,color=blue,style=bold,label="Aristotle Onassis"];
            I3 [shape=box,color=blue,style=bold,label="John Vernou Bouvier III\nb. 1891\nd. 1957",image="images/BE037819.jpg",labelloc=b];
            I4 [shape=ellipse,color=red,style=bold,label="Janet Norton Lee\nb. 2.10.1877\nd. 3.1.1968",image="images/n48862003257_1275276_1366.jpg",labelloc=b];
             I1 -- I5  [style=bold,color=blue]; 
             I1 -- I6  [style=bold,color=orange]; 
             I2 -- I6  [style=bold,color=orange]; 
             I1 -- I7  [style=bold,color=orange]; 
             I2 -- I7  [style=bold,color=orange]; 
             I1 -- I2  [style=bold,color=violet]; 
             I8 -- I1  [style=bold,color=blue]; 
             I8 -- I10  [style=bold,color=orange]; 
             I9 -- I10  [style=bold,color=orange]; 
             I8 -- I11  [style=bold,color=orange]; 
             I9 -- I11  [style=bold,color=orange]; 
             I8 -- I12  [style=bold,color=orange]; 
             I9 -- I12  [style=bold,color=orange]; 
             I8 -- I13  [style=bold,color=orange]; 
             I9 -- I13  [style=bold,color=orange]; 
             I8 -- I9  [style=bold,color=violet]; 
             I9 -- I1  [style=bold,color=red]; 
             I2 -- I5  [style=bold,color=red]; 
             I2 -- I15  [style=bold,color=violet]; 
             I3 -- I2  [style=bold,color=blue]; 
             I3 -- I4  [style=bold,color=violet]; 
             I4 -- I2  [style=bold,color=red]; 
            }
        "##
        .to_string()
    }

    #[test]
    fn simple() {
        let mut lexer = Lexer::new("a -> b");
        let t0 = lexer.next_token();
        let t1 = lexer.next_token();
        let t2 = lexer.next_token();
        println!("{:?}", t0);
        println!("{:?}", t1);
        println!("{:?}", t2);
        assert!(is_identifier(t0, "a"));
        assert!(matches!(t1, Token::ArrowRight));
        assert!(is_identifier(t2, "b"));
    }
    #[test]
    fn simple_number() {
        let mut lexer = Lexer::new("-12345");
        let t0 = lexer.next_token();
        let t1 = lexer.next_token();
        assert!(is_identifier(t0, "-12345"));
        assert!(matches!(t1, Token::EOF));
    }
    #[test]
    fn simple_float_number() {
        let mut lexer = Lexer::new("1.12 .5");
        let t0 = lexer.next_token();
        let t1 = lexer.next_token();
        let t2 = lexer.next_token();
        assert!(is_identifier(t0, "1.12"));
        assert!(is_identifier(t1, ".5"));
        assert!(matches!(t2, Token::EOF));
    }

    #[test]
    fn simple_program() {
        let mut lexer = Lexer::new("digraph { a -> b; } ");
        assert!(matches!(lexer.next_token(), Token::DigraphKW));
        assert!(matches!(lexer.next_token(), Token::OpenBrace));
        assert!(matches!(lexer.next_token(), Token::Identifier(_)));
        assert!(matches!(lexer.next_token(), Token::ArrowRight));
        assert!(matches!(lexer.next_token(), Token::Identifier(_)));
        assert!(matches!(lexer.next_token(), Token::Semicolon));
        assert!(matches!(lexer.next_token(), Token::CloseBrace));
        assert!(matches!(lexer.next_token(), Token::EOF));
    }

    #[test]
    fn lex_keywords_any_case() {
        let mut lexer = Lexer::new("DiGraph SUBGRAPH Strict nodes");
        assert!(matches!(lexer.next_token(), Token::DigraphKW));
        assert!(matches!(lexer.next_token(), Token::SubgraphKW));
        assert!(matches!(lexer.next_token(), Token::StrictKW));
        assert!(is_identifier(lexer.next_token(), "nodes"));
    }

    #[test]
    fn lex_strings() {
        let mut lexer = Lexer::new(r#""a\"b" "c\\d" "e\
f""#);
        assert_eq!(lexer.next_token(), Token::QuotedString("a\"b".into()));
        assert_eq!(lexer.next_token(), Token::QuotedString("c\\\\d".into()));
        assert_eq!(lexer.next_token(), Token::QuotedString("ef".into()));
        assert_eq!(lexer.next_token(), Token::EOF);
    }

    #[test]
    fn lex_comments() {
        let mut lexer = Lexer::new("// one\n# two\na # b\n/* three */");
        assert_eq!(
            lexer.next_token(),
            Token::Comment(ast::CommentKind::Slash, "one".into())
        );
        assert_eq!(
            lexer.next_token(),
            Token::Comment(ast::CommentKind::Macro, "two".into())
        );
        assert!(is_identifier(lexer.next_token(), "a"));
        // A '#' in the middle of a line is not a comment.
        assert!(matches!(lexer.next_token(), Token::Error(_)));
        assert!(is_identifier(lexer.next_token(), "b"));
        assert_eq!(
            lexer.next_token(),
            Token::Comment(ast::CommentKind::Block, "three".into())
        );
    }

    #[test]
    fn lex_program() {
        let program = get_sample_program2();
        let mut lexer = Lexer::new(&program[..]);
        let mut tok = lexer.next_token();
        let mut counter = 1;
        while !matches!(tok, Token::EOF) {
            println!("{:?}", tok);
            if let Token::Error(_) = tok {
                println!("at {}", lexer.token_location());
                panic!();
            }

            tok = lexer.next_token();
            counter += 1;
        }
        assert_eq!(counter, 630);
    }

    #[test]
    fn parse_program0() {
        parse_ok("graph { a -- b; b -- c;}");
    }

    #[test]
    fn parse_program1() {
        let tree = parse_ok("digraph { a -> b -> c; }");
        let dot = tree.as_dot().unwrap();
        let graph = dot.graphs().next().unwrap();
        assert!(graph.directed);
        if let ast::Stmt::Edge(e) = &graph.children[0] {
            assert_eq!(e.targets.len(), 3);
        } else {
            panic!();
        }
    }

    #[test]
    fn parse_program2() {
        let program = get_sample_program2();
        let tree = parse_ok(&program);
        let dot = tree.as_dot().unwrap();
        assert_eq!(dot.children.len(), 2);
        assert!(matches!(dot.children[0], ast::DotItem::Comment(_)));
        let graph = dot.graphs().next().unwrap();
        assert_eq!(graph.id.as_ref().unwrap().value, "G");
        assert_eq!(graph.children.len(), 14 + 22);
    }

    #[test]
    fn parse_program_fail() {
        let res = gv::parse("graph { } s", &ParseOptions::default());
        match res {
            Result::Err(ParseError::Syntax(err)) => {
                assert_eq!(err.found.as_deref(), Some("s"));
                assert_eq!(err.location.start.column, 11);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn parse_empty_document_fails() {
        assert!(gv::parse("/* only */", &ParseOptions::default()).is_err());
    }

    #[test]
    fn parse_error_location() {
        let program = "digraph {\n  a -> ;\n}";
        let options = ParseOptions::default().filename("x.dot");
        let err = gv::parse(program, &options).unwrap_err();
        let loc = err.location().unwrap();
        assert_eq!(loc.start.line, 2);
        assert_eq!(loc.start.column, 8);
        assert_eq!(snippet(program, &loc), "  a -> ;\n       ^");
        assert!(err.to_string().starts_with("x.dot:2:8: "));
        assert!(!err.is_limit());
    }

    #[test]
    fn parse_wrong_edge_operator() {
        let res = gv::parse("digraph { a -- b }", &ParseOptions::default());
        assert!(matches!(
            res,
            Result::Err(ParseError::EdgeOperator { found: "--", .. })
        ));
        let res = gv::parse("graph { {a b} -> c }", &ParseOptions::default());
        assert!(matches!(
            res,
            Result::Err(ParseError::EdgeOperator { found: "->", .. })
        ));
        let msg = gv::parse("graph { a -> b }", &ParseOptions::default())
            .unwrap_err()
            .to_string();
        assert!(msg.contains("graph"), "{}", msg);
    }

    #[test]
    fn parse_ports_and_compass() {
        let tree = parse_rule("a:p1:ne -> b:sw -> c:\"n\"", StartRule::Edge);
        let edge = tree.as_edge().unwrap();
        let refs: Vec<&ast::NodeRef> = edge
            .targets
            .iter()
            .map(|t| match t {
                ast::EdgeTarget::Ref(r) => r,
                _ => panic!(),
            })
            .collect();
        assert_eq!(refs[0].port.as_ref().unwrap().value, "p1");
        assert_eq!(refs[0].compass.as_ref().unwrap().value, "ne");
        assert!(refs[1].port.is_none());
        assert_eq!(refs[1].compass.as_ref().unwrap().value, "sw");
        // A quoted compass name is a port.
        assert_eq!(refs[2].port.as_ref().unwrap().value, "n");
        assert!(refs[2].compass.is_none());

        assert!(gv::parse("a:p:zz", &ParseOptions::new(StartRule::Node))
            .is_err());
    }

    #[test]
    fn parse_groups_and_subgraphs() {
        let tree = parse_rule(
            "{a b} -> c; subgraph cluster_0 { d } { e };",
            StartRule::Statements,
        );
        let list = match tree {
            ast::AstNode::Statements(list) => list,
            _ => panic!(),
        };
        assert_eq!(list.len(), 3);
        assert!(matches!(&list[0], ast::Stmt::Edge(_)));
        match &list[1] {
            ast::Stmt::Subgraph(s) => {
                assert_eq!(s.id.as_ref().unwrap().value, "cluster_0");
            }
            _ => panic!(),
        }
        match &list[2] {
            ast::Stmt::Subgraph(s) => assert!(s.id.is_none()),
            _ => panic!(),
        }
    }

    #[test]
    fn parse_start_rules() {
        let attr = parse_rule("label = \"x\"", StartRule::Attribute);
        assert_eq!(attr.as_attribute().unwrap().value.value, "x");

        let node = parse_rule("a [shape=box, color=red];", StartRule::Node);
        assert_eq!(node.as_node().unwrap().children.len(), 2);

        let list =
            parse_rule("node [shape=box]", StartRule::AttributeStatementList);
        match list {
            ast::AstNode::AttributeList(l) => {
                assert_eq!(l.kind, ast::AttributeKind::Node)
            }
            _ => panic!(),
        }

        let graph = parse_rule("strict graph { }", StartRule::Graph);
        assert!(graph.as_graph().unwrap().strict);
        assert!(!graph.as_graph().unwrap().directed);
    }

    #[test]
    fn parse_string_concatenation() {
        let attr =
            parse_rule("label = \"a\" + \"b\" + \"c\"", StartRule::Attribute);
        let attr = attr.as_attribute().unwrap();
        assert_eq!(attr.value.value, "abc");
        assert_eq!(attr.value.quoting, ast::Quoting::Quoted);
    }

    #[test]
    fn parse_html_label() {
        let attr = parse_rule("label = <<b>bold</b> x>", StartRule::Attribute);
        let attr = attr.as_attribute().unwrap();
        assert_eq!(attr.value.value, "<b>bold</b> x");
        assert_eq!(attr.value.quoting, ast::Quoting::Html);
    }

    #[test]
    fn parse_comments_are_kept() {
        let tree = parse_ok("// top\ndigraph {\n  /* a */\n  a;\n  # not\n}");
        let dot = tree.as_dot().unwrap();
        assert!(matches!(dot.children[0], ast::DotItem::Comment(_)));
        let graph = dot.graphs().next().unwrap();
        assert_eq!(graph.children.len(), 3);
        assert!(matches!(graph.children[0], ast::Stmt::Comment(_)));
        assert!(matches!(graph.children[1], ast::Stmt::Node(_)));
        assert!(matches!(graph.children[2], ast::Stmt::Comment(_)));
    }

    #[test]
    fn parse_locations() {
        let tree = parse_rule("a -> b", StartRule::Edge);
        let loc = tree.location();
        assert_eq!(loc.start.offset, 0);
        assert_eq!(loc.end.offset, 6);
        assert_eq!(loc.start.line, 1);
        assert_eq!(loc.start.column, 1);
    }

    #[test]
    fn stringify_literals() {
        let s = |l: ast::Literal| gv::stringify(&ast::AstNode::Literal(l));
        assert_eq!(s(ast::Literal::unquoted("hoge")), "hoge");
        assert_eq!(s(ast::Literal::quoted("hoge")), "\"hoge\"");
        assert_eq!(s(ast::Literal::html("hoge")), "<hoge>");
    }

    #[test]
    fn stringify_edge() {
        let a = ast::NodeRef::new(ast::Literal::quoted("id1"))
            .with_port(ast::Literal::quoted("port1"));
        let b = ast::NodeRef::new(ast::Literal::quoted("id2"))
            .with_compass(ast::Literal::unquoted("w"));
        let edge = ast::Edge::new(
            vec![ast::EdgeTarget::Ref(a), ast::EdgeTarget::Ref(b)],
            Vec::new(),
        );
        assert_eq!(
            gv::stringify(&ast::AstNode::Edge(edge.clone())),
            "\"id1\":\"port1\" -> \"id2\":w;"
        );
        assert_eq!(
            gv::stringify_edge(&edge, false),
            "\"id1\":\"port1\" -- \"id2\":w;"
        );
    }

    #[test]
    fn stringify_program() {
        let (first, _) = reformat(
            "strict digraph G { rankdir=LR; node [shape=box]; \
             a:p -> {b c} [label=\"foo\"]; subgraph s { x } }",
        );
        let expected = r#"strict digraph G {
  rankdir = LR;
  node [
    shape = box;
  ];
  a:p -> {b c} [
    label = "foo";
  ];
  subgraph s {
    x;
  }
}"#;
        assert_eq!(first, expected);
    }

    #[test]
    fn stringify_comments() {
        let (first, _) =
            reformat("/* a\n   b */\ngraph {\n// x\n# y\n}\n");
        let expected = "/**\n * a\n * b\n */\ngraph {\n  // x\n  # y\n}";
        assert_eq!(first, expected);
    }

    #[test]
    fn stringify_comment_with_leading_star() {
        let (first, second) = reformat("/* *bold* */\ngraph {}\n");
        assert_eq!(first, "/**\n * *bold*\n */\ngraph {}");
        assert_eq!(first, second);
    }

    #[test]
    fn stringify_is_idempotent() {
        let programs = [
            get_sample_program2(),
            "digraph { a -> b -> {c d}; e [label=<<i>x</i>>]; }".to_string(),
            "graph { subgraph { a -- b } { c } x = \"a\\\"b\" }".to_string(),
            "digraph { \"a b\":\"p q\":s -> c [w=1.5, \"my key\"=\"\"]; }"
                .to_string(),
        ];
        for program in programs.iter() {
            let (first, second) = reformat(program);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn stringify_round_trip_keeps_structure() {
        let program = get_sample_program2();
        let tree = parse_ok(&program);
        let again = parse_ok(&gv::stringify(&tree));
        let g0 = tree.as_dot().unwrap().graphs().next().unwrap();
        let g1 = again.as_dot().unwrap().graphs().next().unwrap();
        assert_eq!(g0.children.len(), g1.children.len());
        for (s0, s1) in g0.children.iter().zip(g1.children.iter()) {
            match (s0, s1) {
                (ast::Stmt::Node(n0), ast::Stmt::Node(n1)) => {
                    assert_eq!(n0.id.value, n1.id.value);
                    assert_eq!(n0.children.len(), n1.children.len());
                    for (a0, a1) in n0.children.iter().zip(&n1.children) {
                        assert_eq!(a0.key.value, a1.key.value);
                        assert_eq!(a0.value.value, a1.value.value);
                    }
                }
                (ast::Stmt::Edge(e0), ast::Stmt::Edge(e1)) => {
                    assert_eq!(e0.targets.len(), e1.targets.len());
                    assert_eq!(e0.children.len(), e1.children.len());
                }
                _ => panic!("statement kinds differ"),
            }
        }
    }
}
