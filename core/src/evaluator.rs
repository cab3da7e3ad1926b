//! Postfix evaluation as set algebra over posting sets.

use crate::compiler::{compile, PostfixProgram};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::tokenizer::Token;
use crate::PostingSet;
use std::borrow::Cow;

/// Evaluate a compiled program against the index.
pub fn evaluate(program: &PostfixProgram, index: &Index) -> Result<PostingSet> {
    evaluate_tokens(program.tokens(), index)
}

/// Compile and evaluate a raw query.
pub fn search(raw: &str, index: &Index) -> Result<PostingSet> {
    let program = compile(raw)?;
    tracing::trace!(query = raw, postfix = %program, "compiled query");
    evaluate(&program, index)
}

/// Stack machine over postfix tokens. Operands borrow their posting set from the
/// index; only AND/OR results allocate.
pub fn evaluate_tokens(tokens: &[Token], index: &Index) -> Result<PostingSet> {
    let empty = PostingSet::new();
    let mut stack: Vec<Cow<'_, PostingSet>> = Vec::with_capacity(tokens.len() / 2 + 1);

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Operand(term) => {
                stack.push(Cow::Borrowed(index.lookup(term).unwrap_or(&empty)));
            }
            Token::And | Token::Or => {
                let (right, left) = match (stack.pop(), stack.pop()) {
                    (Some(right), Some(left)) => (right, left),
                    _ => return Err(Error::MalformedProgram(format!("stack underflow at token {i} ({token})"))),
                };
                let combined: PostingSet = if *token == Token::And {
                    let (small, large) = if left.len() <= right.len() { (&left, &right) } else { (&right, &left) };
                    small.iter().filter(|d| large.contains(*d)).copied().collect()
                } else {
                    left.union(&right).copied().collect()
                };
                stack.push(Cow::Owned(combined));
            }
            Token::LParen | Token::RParen => {
                return Err(Error::MalformedProgram(format!("parenthesis at token {i} in postfix program")));
            }
        }
    }

    let result = stack.pop().ok_or_else(|| Error::MalformedProgram("empty program".into()))?;
    if !stack.is_empty() {
        return Err(Error::MalformedProgram(format!("{} values left on the stack", stack.len() + 1)));
    }
    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(s: &str) -> Token { Token::Operand(s.to_string()) }

    fn index() -> Index {
        // a -> {1,2}, b -> {2,3}, c -> {3,4}
        Index::build(["d1\ta\t", "d2\ta b\t", "d3\tb\tc", "d4\t\tc"]).unwrap()
    }

    #[test]
    fn and_intersects_or_unions() {
        let idx = index();
        assert_eq!(search("a b", &idx).unwrap(), PostingSet::from([2]));
        assert_eq!(search("a|c", &idx).unwrap(), PostingSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn unknown_terms_are_empty() {
        let idx = index();
        assert!(search("z", &idx).unwrap().is_empty());
        assert!(search("a z", &idx).unwrap().is_empty());
        assert_eq!(search("z|b", &idx).unwrap(), PostingSet::from([2, 3]));
    }

    #[test]
    fn underflow_is_a_malformed_program() {
        let idx = index();
        let err = evaluate_tokens(&[op("a"), Token::Or], &idx).unwrap_err();
        assert!(err.is_defect());
    }

    #[test]
    fn leftover_values_are_a_malformed_program() {
        let idx = index();
        let err = evaluate_tokens(&[op("a"), op("b")], &idx).unwrap_err();
        assert!(matches!(err, Error::MalformedProgram(_)));
    }

    #[test]
    fn empty_or_parenthesized_programs_are_rejected() {
        let idx = index();
        assert!(evaluate_tokens(&[], &idx).is_err());
        assert!(evaluate_tokens(&[Token::LParen, op("a"), Token::RParen], &idx).is_err());
    }

    #[test]
    fn index_is_untouched_by_evaluation() {
        let idx = index();
        let _ = search("a (b|c)", &idx).unwrap();
        assert_eq!(idx.lookup("a"), Some(&PostingSet::from([1, 2])));
        assert_eq!(idx.lookup("b"), Some(&PostingSet::from([2, 3])));
    }
}
