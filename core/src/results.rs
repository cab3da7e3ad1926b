use crate::error::Result;
use crate::records::ObjectRecord;
use crate::{DocId, PostingSet, QueryId, QueryResult};
use std::collections::HashMap;
use std::io::{BufRead, Write};

pub const SUBMISSION_HEADER: &str = "ObjectId,Relevance";

/// Per-query result sets, keyed by query id.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: HashMap<QueryId, PostingSet>,
}

impl ResultStore {
    pub fn new() -> Self { Self::default() }

    /// A second result for the same query id replaces the first.
    pub fn insert(&mut self, result: QueryResult) {
        self.results.insert(result.query_id, result.docs);
    }

    pub fn get(&self, query_id: QueryId) -> Option<&PostingSet> {
        self.results.get(&query_id)
    }

    /// `None` when no result was stored for `query_id`.
    pub fn contains(&self, query_id: QueryId, doc_id: DocId) -> Option<bool> {
        self.get(query_id).map(|docs| docs.contains(&doc_id))
    }

    pub fn len(&self) -> usize { self.results.len() }

    pub fn is_empty(&self) -> bool { self.results.is_empty() }
}

impl Extend<QueryResult> for ResultStore {
    fn extend<T: IntoIterator<Item = QueryResult>>(&mut self, iter: T) {
        for result in iter {
            self.insert(result);
        }
    }
}

impl FromIterator<QueryResult> for ResultStore {
    fn from_iter<T: IntoIterator<Item = QueryResult>>(iter: T) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

/// Write `objectId,relevance` rows for every object whose query has a stored result.
///
/// The first line of `objects` is its header and is skipped. Rows for queries with
/// no stored result are omitted. Returns the number of rows written.
pub fn write_submission<R: BufRead, W: Write>(store: &ResultStore, objects: R, mut out: W) -> Result<usize> {
    writeln!(out, "{SUBMISSION_HEADER}")?;
    let mut rows = 0usize;
    for (i, line) in objects.lines().enumerate().skip(1) {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let object = ObjectRecord::parse(&line, i + 1)?;
        if let Some(relevant) = store.contains(object.query_id, object.doc_id) {
            writeln!(out, "{},{}", object.object_id, u8::from(relevant))?;
            rows += 1;
        }
    }
    out.flush()?;
    Ok(rows)
}
