use thiserror::Error;

/// Errors raised while building the index, compiling queries, or evaluating them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed corpus record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("malformed query record at line {line}: {reason}")]
    MalformedQueryRecord { line: usize, reason: String },

    #[error("malformed object record at line {line}: {reason}")]
    MalformedObjectRecord { line: usize, reason: String },

    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParentheses { position: usize },

    #[error("query is empty")]
    EmptyQuery,

    #[error("expected an operand at position {position}")]
    MissingOperand { position: usize },

    #[error("malformed postfix program: {0}")]
    MalformedProgram(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors scoped to a single query; the rest of the batch can proceed.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedQueryRecord { .. }
                | Error::UnbalancedParentheses { .. }
                | Error::EmptyQuery
                | Error::MissingOperand { .. }
                | Error::MalformedProgram(_)
        )
    }

    /// True when the error signals a compiler/evaluator bug rather than bad input.
    pub fn is_defect(&self) -> bool {
        matches!(self, Error::MalformedProgram(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnbalancedParentheses { position: 3 };
        assert_eq!(err.to_string(), "unbalanced parentheses at position 3");
    }

    #[test]
    fn classification() {
        assert!(Error::EmptyQuery.is_query_error());
        assert!(Error::MalformedProgram("underflow".into()).is_defect());
        assert!(Error::MalformedProgram("underflow".into()).is_query_error());
        let fatal = Error::MalformedRecord { line: 1, reason: "x".into() };
        assert!(!fatal.is_query_error());
        assert!(!fatal.is_defect());
    }
}
