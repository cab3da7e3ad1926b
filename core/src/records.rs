//! Line formats for the corpus, query and object inputs.

use crate::error::{Error, Result};
use crate::{DocId, QueryId};

/// `<marker><digits>\t<title>\t<body>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord<'a> {
    pub doc_id: DocId,
    pub title: &'a str,
    pub body: &'a str,
}

/// `<digits>\t<boolean expression>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord<'a> {
    pub query_id: QueryId,
    pub query: &'a str,
}

/// `<objectId>,<queryId>,<marker><digits>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord<'a> {
    pub object_id: &'a str,
    pub query_id: QueryId,
    pub doc_id: DocId,
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Strips exactly one leading marker character and parses the remaining digits.
pub fn parse_marked_id(field: &str) -> Option<DocId> {
    let mut chars = field.chars();
    chars.next()?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_plain_id(field: &str) -> Option<QueryId> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl<'a> CorpusRecord<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedRecord { line: line_no, reason };
        let mut fields = trim_eol(line).split('\t');
        let (id, title, body) = match (fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(title), Some(body)) => (id, title, body),
            _ => return Err(malformed("expected at least 3 tab-separated fields".into())),
        };
        let doc_id = parse_marked_id(id).ok_or_else(|| malformed(format!("invalid document id {id:?}")))?;
        Ok(Self { doc_id, title, body })
    }
}

impl<'a> QueryRecord<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedQueryRecord { line: line_no, reason };
        let (id, query) = trim_eol(line)
            .split_once('\t')
            .ok_or_else(|| malformed("expected <id>\\t<query>".into()))?;
        let query_id = parse_plain_id(id).ok_or_else(|| malformed(format!("invalid query id {id:?}")))?;
        Ok(Self { query_id, query })
    }
}

impl<'a> ObjectRecord<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedObjectRecord { line: line_no, reason };
        let mut fields = trim_eol(line).split(',');
        let (object_id, query_id, doc_id) = match (fields.next(), fields.next(), fields.next()) {
            (Some(o), Some(q), Some(d)) => (o, q, d),
            _ => return Err(malformed("expected <objectId>,<queryId>,<docId>".into())),
        };
        let query_id = parse_plain_id(query_id).ok_or_else(|| malformed(format!("invalid query id {query_id:?}")))?;
        let doc_id = parse_marked_id(doc_id.trim()).ok_or_else(|| malformed(format!("invalid document id {doc_id:?}")))?;
        Ok(Self { object_id: object_id.trim(), query_id, doc_id })
    }
}
