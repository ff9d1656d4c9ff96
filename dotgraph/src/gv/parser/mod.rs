//! GraphViz file format parser.

pub mod ast;
pub mod error;
pub mod guard;
pub mod lexer;
pub mod parser;
pub mod printer;

pub use error::{LimitError, LimitKind, ParseError, SyntaxError};
pub use guard::Limits;
pub use lexer::Lexer;
pub use lexer::Token;
pub use parser::{parse, parse_dot, DotParser, ParseOptions, StartRule};
pub use printer::dump_ast;
