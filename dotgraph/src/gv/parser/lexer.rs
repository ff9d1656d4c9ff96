//! The Lexer implementation for the GraphViz file format.

use super::ast::{CommentKind, Location, Position};
use super::error::LimitError;
use super::guard::Guard;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    EOF,
    /// An unquoted identifier or a numeral.
    Identifier(String),
    /// The unescaped content of a "..." string.
    QuotedString(String),
    GraphKW,
    NodeKW,
    EdgeKW,
    DigraphKW,
    StrictKW,
    SubgraphKW,
    Equal,
    Colon,
    Comma,
    Semicolon,
    Plus,
    ArrowRight,
    ArrowLine,
    OpenBracket,
    CloseBracket,
    HtmlStart,
    OpenBrace,
    CloseBrace,
    Comment(CommentKind, String),
    Error(String),
}

impl Token {
    /// A short description of the token for error messages.
    pub fn text(&self) -> String {
        let s = match self {
            Self::EOF => return "end of input".to_string(),
            Self::Identifier(x) => x,
            Self::QuotedString(x) => return format!("\"{}\"", x),
            Self::GraphKW => "graph",
            Self::NodeKW => "node",
            Self::EdgeKW => "edge",
            Self::DigraphKW => "digraph",
            Self::StrictKW => "strict",
            Self::SubgraphKW => "subgraph",
            Self::Equal => "=",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Plus => "+",
            Self::ArrowRight => "->",
            Self::ArrowLine => "--",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
            Self::HtmlStart => "<",
            Self::OpenBrace => "{",
            Self::CloseBrace => "}",
            Self::Comment(_, _) => "comment",
            Self::Error(msg) => msg,
        };
        s.to_string()
    }
}

/// A cursor over the input. Copying a lexer saves its position, which the
/// parser uses to backtrack.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    last: Location,
}

fn is_id_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_id_char(ch: char) -> bool {
    is_id_start(ch) || ch.is_ascii_digit()
}

fn is_keyword(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "graph" | "node" | "edge" | "digraph" | "strict" | "subgraph"
    )
}

/// Returns true if \p s lexes as a single unquoted identifier.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(ch) if is_id_start(ch) => {}
        _ => return false,
    }
    chars.all(is_id_char) && !is_keyword(s)
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            last: Location::default(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    /// The location of the token that was returned last.
    pub fn token_location(&self) -> Location {
        self.last
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.input[self.pos..].chars();
        it.next();
        it.next()
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }

    /// A '#' only starts a comment when it is the first thing on its line.
    fn at_line_start(&self) -> bool {
        let before = &self.input[..self.pos];
        let line = before.rsplit('\n').next().unwrap_or("");
        line.trim().is_empty()
    }

    fn read_line(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            result.push(ch);
            self.read_char();
        }
        result.trim().to_string()
    }

    fn read_block_comment(&mut self) -> Token {
        // Consume the "/*".
        self.read_char();
        self.read_char();
        let start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Token::Error("unterminated comment".to_string());
                }
                Some('*') if self.peek_second() == Some('/') => {
                    break;
                }
                Some(_) => {
                    self.read_char();
                }
            }
        }
        let body = &self.input[start..self.pos];
        self.read_char();
        self.read_char();
        Token::Comment(CommentKind::Block, clean_block_comment(body))
    }

    pub fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if !is_id_char(ch) {
                break;
            }
            result.push(ch);
            self.read_char();
        }
        result
    }

    pub fn read_number(&mut self) -> String {
        let mut result = String::new();
        let mut period = false;
        while let Some(ch) = self.peek() {
            // Only allow one period in each number.
            if ch == '.' {
                if period {
                    break;
                }
                period = true;
            } else if !ch.is_ascii_digit() {
                break;
            }
            result.push(ch);
            self.read_char();
        }
        result
    }

    pub fn read_string(&mut self) -> Token {
        let mut result = String::new();
        // Consume the opening quote.
        self.read_char();
        loop {
            match self.read_char() {
                None => {
                    return Token::Error("unterminated string".to_string());
                }
                Some('"') => {
                    return Token::QuotedString(result);
                }
                Some('\\') => match self.peek() {
                    Some('"') => {
                        self.read_char();
                        result.push('"');
                    }
                    // Line continuation.
                    Some('\n') => {
                        self.read_char();
                    }
                    Some('\r') if self.peek_second() == Some('\n') => {
                        self.read_char();
                        self.read_char();
                    }
                    // Keep every other escape as written, including "\\".
                    Some(ch) => {
                        self.read_char();
                        result.push('\\');
                        result.push(ch);
                    }
                    None => {
                        result.push('\\');
                    }
                },
                Some(ch) => {
                    result.push(ch);
                }
            }
        }
    }

    /// Reads the body of an HTML-like value. The opening '<' has already
    /// been consumed; this consumes everything up to and including the
    /// matching '>'. Returns None if the input ends first.
    pub fn read_html(
        &mut self,
        guard: &Guard,
    ) -> Result<Option<String>, LimitError> {
        let start = self.pos;
        let mut depth = 1;
        loop {
            let here = self.position();
            match self.read_char() {
                None => return Result::Ok(None),
                Some('<') => {
                    depth += 1;
                    let end = self.position();
                    guard.check_html_depth(depth, Location::new(here, end))?;
                }
                Some('>') => {
                    if depth == 1 {
                        let body = &self.input[start..here.offset];
                        return Result::Ok(Some(body.to_string()));
                    }
                    depth -= 1;
                }
                Some(_) => {}
            }
        }
    }

    fn next_token_inner(&mut self) -> Token {
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Token::EOF,
        };
        let tok = match ch {
            '=' => Token::Equal,
            ';' => Token::Semicolon,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '+' => Token::Plus,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            '<' => Token::HtmlStart,
            '"' => {
                return self.read_string();
            }
            '/' => match self.peek_second() {
                Some('*') => {
                    return self.read_block_comment();
                }
                Some('/') => {
                    self.read_char();
                    self.read_char();
                    let text = self.read_line();
                    return Token::Comment(CommentKind::Slash, text);
                }
                _ => {
                    self.read_char();
                    return Token::Error("/".to_string());
                }
            },
            '#' if self.at_line_start() => {
                self.read_char();
                let text = self.read_line();
                return Token::Comment(CommentKind::Macro, text);
            }
            '-' => match self.peek_second() {
                Some('>') => {
                    self.read_char();
                    Token::ArrowRight
                }
                Some('-') => {
                    self.read_char();
                    Token::ArrowLine
                }
                Some(c) if c.is_ascii_digit() || c == '.' => {
                    self.read_char();
                    let mut num = String::from("-");
                    num.push_str(&self.read_number());
                    return Token::Identifier(num);
                }
                _ => {
                    self.read_char();
                    return Token::Error("-".to_string());
                }
            },
            '.' if matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) =>
            {
                return Token::Identifier(self.read_number());
            }
            c if c.is_ascii_digit() => {
                return Token::Identifier(self.read_number());
            }
            c if is_id_start(c) => {
                let name = self.read_identifier();
                return match name.to_ascii_lowercase().as_str() {
                    "graph" => Token::GraphKW,
                    "node" => Token::NodeKW,
                    "edge" => Token::EdgeKW,
                    "digraph" => Token::DigraphKW,
                    "strict" => Token::StrictKW,
                    "subgraph" => Token::SubgraphKW,
                    _ => Token::Identifier(name),
                };
            }
            c => {
                self.read_char();
                return Token::Error(c.to_string());
            }
        };
        self.read_char();
        tok
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.position();
        let tok = self.next_token_inner();
        self.last = Location::new(start, self.position());
        tok
    }
}

/// Strips the decoration of a block comment: the extra '*' of a "/**"
/// opener, the leading '*' of continuation lines, and blank edge lines.
/// Continuation stars are only removed when every non-blank line after the
/// first one carries them, and the first line is never stripped.
fn clean_block_comment(body: &str) -> String {
    let body = body.strip_prefix('*').unwrap_or(body);
    let mut lines: Vec<&str> = body.lines().map(|line| line.trim()).collect();
    let decorated = lines
        .iter()
        .skip(1)
        .filter(|l| !l.is_empty())
        .all(|l| l.starts_with('*'));
    if decorated {
        for line in lines.iter_mut().skip(1) {
            if let Some(rest) = line.strip_prefix('*') {
                *line = rest.strip_prefix(' ').unwrap_or(rest);
            }
        }
    }
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

#[test]
fn test_clean_block_comment() {
    assert_eq!(clean_block_comment(" hello "), "hello");
    assert_eq!(clean_block_comment("*\n * a\n * b\n "), "a\nb");
    assert_eq!(clean_block_comment(""), "");
    assert_eq!(clean_block_comment(" *bold* "), "*bold*");
    assert_eq!(clean_block_comment(" a\n * b "), "a\nb");
    assert_eq!(clean_block_comment("\n *x\n y\n"), "*x\ny");
}
