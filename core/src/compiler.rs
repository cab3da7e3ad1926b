//! Infix to postfix conversion (shunting-yard).
//!
//! Precedence from lowest to highest: OR, AND. Both are left-associative and
//! parentheses override precedence. The compiler also tracks whether it is
//! waiting for an operand, so a dangling operator is rejected here instead of
//! surfacing later as a stack underflow during evaluation.

use crate::error::{Error, Result};
use crate::tokenizer::{tokenize, Lexeme, Token};
use serde::Serialize;
use std::fmt;

/// A query in reverse-Polish form: operands and binary operators only.
///
/// Only [`compile`] constructs one, so every program holds exactly one more
/// operand than operators and never underflows when evaluated left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostfixProgram(Vec<Token>);

impl PostfixProgram {
    pub fn tokens(&self) -> &[Token] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn operands(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|t| match t {
            Token::Operand(term) => Some(term.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for PostfixProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(" ")?; }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Compile a raw query such as `a (b|c) d` into postfix form.
pub fn compile(raw: &str) -> Result<PostfixProgram> {
    let lexemes = tokenize(raw);
    if lexemes.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let mut output: Vec<Token> = Vec::with_capacity(lexemes.len());
    let mut stack: Vec<Lexeme> = Vec::new();
    let mut open_groups = 0usize;
    let mut expect_operand = true;
    let mut last_position = 0usize;

    for Lexeme { token, position } in lexemes {
        last_position = position;
        match token {
            Token::Operand(_) => {
                output.push(token);
                expect_operand = false;
            }
            Token::LParen => {
                open_groups += 1;
                stack.push(Lexeme { token, position });
            }
            Token::RParen => {
                if open_groups == 0 {
                    return Err(Error::UnbalancedParentheses { position });
                }
                if expect_operand {
                    return Err(Error::MissingOperand { position });
                }
                loop {
                    match stack.pop() {
                        Some(Lexeme { token: Token::LParen, .. }) => break,
                        Some(top) => output.push(top.token),
                        None => return Err(Error::UnbalancedParentheses { position }),
                    }
                }
                open_groups -= 1;
            }
            Token::And | Token::Or => {
                if expect_operand {
                    return Err(Error::MissingOperand { position });
                }
                let prec = token.precedence().unwrap_or(0);
                while let Some(top) = stack.pop() {
                    match top.token.precedence() {
                        Some(top_prec) if top_prec >= prec => output.push(top.token),
                        _ => {
                            stack.push(top);
                            break;
                        }
                    }
                }
                stack.push(Lexeme { token, position });
                expect_operand = true;
            }
        }
    }

    if open_groups > 0 {
        let position = stack
            .iter()
            .rev()
            .find(|l| l.token == Token::LParen)
            .map_or(last_position, |l| l.position);
        return Err(Error::UnbalancedParentheses { position });
    }
    if expect_operand {
        return Err(Error::MissingOperand { position: raw.chars().count() });
    }
    while let Some(top) = stack.pop() {
        output.push(top.token);
    }
    Ok(PostfixProgram(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postfix(raw: &str) -> String {
        compile(raw).unwrap().to_string()
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(postfix("a b|c"), "a b & c |");
        assert_eq!(postfix("a|b c"), "a b c & |");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(postfix("a (b|c)"), "a b c | &");
        assert_eq!(postfix("(a|b) (c|d)"), "a b | c d | &");
    }

    #[test]
    fn operators_are_left_associative() {
        assert_eq!(postfix("a b c"), "a b & c &");
        assert_eq!(postfix("a|b|c"), "a b | c |");
    }

    #[test]
    fn nested_groups() {
        assert_eq!(
            postfix("(ВЫХОДНОЙ|НЕРАБОЧИЙ (1|ПЕРВЫЙ) ДЕНЬ)"),
            "ВЫХОДНОЙ НЕРАБОЧИЙ 1 ПЕРВЫЙ | & ДЕНЬ & |"
        );
    }

    #[test]
    fn single_operand() {
        let prog = compile("  word ").unwrap();
        assert_eq!(prog.tokens(), &[Token::Operand("word".into())]);
    }

    #[test]
    fn unbalanced_parentheses() {
        assert!(matches!(compile("(a|b"), Err(Error::UnbalancedParentheses { position: 0 })));
        assert!(matches!(compile("a)b"), Err(Error::UnbalancedParentheses { position: 1 })));
        assert!(matches!(compile(")a"), Err(Error::UnbalancedParentheses { .. })));
        assert!(matches!(compile("((a)"), Err(Error::UnbalancedParentheses { position: 0 })));
        assert!(matches!(compile("("), Err(Error::UnbalancedParentheses { .. })));
    }

    #[test]
    fn empty_queries() {
        assert!(matches!(compile(""), Err(Error::EmptyQuery)));
        assert!(matches!(compile(" \t "), Err(Error::EmptyQuery)));
    }

    #[test]
    fn dangling_operators() {
        assert!(matches!(compile("|a"), Err(Error::MissingOperand { position: 0 })));
        assert!(matches!(compile("a|"), Err(Error::MissingOperand { position: 2 })));
        assert!(matches!(compile("a||b"), Err(Error::MissingOperand { position: 2 })));
        assert!(matches!(compile("(|a)"), Err(Error::MissingOperand { position: 1 })));
        assert!(matches!(compile("()"), Err(Error::MissingOperand { position: 1 })));
        assert!(matches!(compile("a&|b"), Err(Error::MissingOperand { .. })));
    }

    #[test]
    fn program_serializes_as_token_list() {
        let prog = compile("a|b").unwrap();
        let json = serde_json::to_string(&prog).unwrap();
        assert_eq!(json, r#"[{"Operand":"a"},{"Operand":"b"},"Or"]"#);
    }
}
