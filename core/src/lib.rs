//! Boolean keyword search over a small in-memory inverted index.
//!
//! Queries such as `term1 term2|term3` are tokenized, converted to postfix
//! form and evaluated as set algebra over posting sets.

pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod index;
pub mod records;
pub mod results;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use compiler::{compile, PostfixProgram};
pub use error::{Error, Result};
pub use evaluator::{evaluate, search};
pub use index::Index;
pub use results::{write_submission, ResultStore};
pub use tokenizer::{tokenize, Lexeme, Token};

pub type DocId = u32;
pub type QueryId = u32;

/// Document ids containing a term, or satisfying a query.
pub type PostingSet = HashSet<DocId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query_id: QueryId,
    pub docs: PostingSet,
}
