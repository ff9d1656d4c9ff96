//! A module that contains everything that has to do with handling the GraphViz
//! file format (parsing, printing, converting to and from the object model).

pub mod convert;
pub mod parser;
pub mod stringify;

pub use convert::{dot_from_model, dot_to_model, from_model, to_model};
pub use convert::{ToAst, ToDot};
pub use parser::lexer::Lexer;
pub use parser::lexer::Token;
pub use parser::printer::dump_ast;
pub use parser::{parse, parse_dot, ParseError, ParseOptions, StartRule};
pub use parser::{DotParser, Limits};
pub use stringify::{stringify, stringify_edge, stringify_graph};
