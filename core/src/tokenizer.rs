use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[&|()]|[^\s&|()]+").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    Operand(String),
    And,
    Or,
    LParen,
    RParen,
}

impl Token {
    /// Binding strength of binary operators; AND binds tighter than OR.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Or => Some(1),
            Token::And => Some(2),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool { self.precedence().is_some() }

    fn ends_operand(&self) -> bool { matches!(self, Token::Operand(_) | Token::RParen) }

    fn starts_operand(&self) -> bool { matches!(self, Token::Operand(_) | Token::LParen) }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(term) => f.write_str(term),
            Token::And => f.write_str("&"),
            Token::Or => f.write_str("|"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// A token and the character offset where it starts in the raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub position: usize,
}

/// Split a raw query into tokens, making implicit concatenation an explicit `And`.
///
/// Whitespace only separates lexemes. An `And` is inserted between an operand or `)`
/// and a following operand or `(`, so `a b`, `a(b)` and `a & b` all read the same.
pub fn tokenize(raw: &str) -> Vec<Lexeme> {
    let mut out: Vec<Lexeme> = Vec::new();
    let mut chars_seen = 0usize;
    let mut byte_seen = 0usize;
    for mat in RE.find_iter(raw) {
        chars_seen += raw[byte_seen..mat.start()].chars().count();
        byte_seen = mat.start();
        let position = chars_seen;
        let token = match mat.as_str() {
            "&" => Token::And,
            "|" => Token::Or,
            "(" => Token::LParen,
            ")" => Token::RParen,
            term => Token::Operand(term.to_string()),
        };
        if let Some(prev) = out.last() {
            if prev.token.ends_operand() && token.starts_operand() {
                out.push(Lexeme { token: Token::And, position });
            }
        }
        out.push(Lexeme { token, position });
    }
    out
}
