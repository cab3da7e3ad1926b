use crate::error::Result;
use crate::records::CorpusRecord;
use crate::{DocId, PostingSet};
use std::collections::HashMap;
use std::io::BufRead;

/// Term -> set of documents containing it. Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct Index {
    postings: HashMap<String, PostingSet>,
    num_docs: u32,
}

impl Index {
    pub fn new() -> Self { Self::default() }

    /// Build from corpus lines. Blank lines are skipped; any malformed line aborts the build.
    pub fn build<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() { continue; }
            index.add_record(&CorpusRecord::parse(line, i + 1)?);
        }
        tracing::debug!(num_docs = index.num_docs, num_terms = index.num_terms(), "index built");
        Ok(index)
    }

    /// Same as [`Index::build`], pulling lines from a reader one at a time.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            index.add_record(&CorpusRecord::parse(&line, i + 1)?);
        }
        tracing::debug!(num_docs = index.num_docs, num_terms = index.num_terms(), "index built");
        Ok(index)
    }

    pub fn add_record(&mut self, record: &CorpusRecord<'_>) {
        self.add_document(record.doc_id, record.title, record.body);
    }

    /// Title and body terms land in the same posting set, unweighted.
    pub fn add_document(&mut self, doc_id: DocId, title: &str, body: &str) {
        for term in title.split_whitespace().chain(body.split_whitespace()) {
            match self.postings.get_mut(term) {
                Some(set) => { set.insert(doc_id); }
                None => { self.postings.insert(term.to_string(), PostingSet::from([doc_id])); }
            }
        }
        self.num_docs += 1;
    }

    /// `None` means the term never occurs, which callers treat as an empty set.
    pub fn lookup(&self, term: &str) -> Option<&PostingSet> {
        self.postings.get(term)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Number of corpus records ingested.
    pub fn num_docs(&self) -> u32 { self.num_docs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_title_and_body_terms() {
        let idx = Index::build(["d5\trust\tsystems", "d7\tsystems\trust language"]).unwrap();
        assert_eq!(idx.lookup("rust"), Some(&PostingSet::from([5, 7])));
        assert_eq!(idx.lookup("language"), Some(&PostingSet::from([7])));
        assert_eq!(idx.num_docs(), 2);
        assert_eq!(idx.num_terms(), 3);
    }

    #[test]
    fn repeated_terms_do_not_duplicate_postings() {
        let idx = Index::build(["d1\ta a\ta a a"]).unwrap();
        assert_eq!(idx.lookup("a").map(|s| s.len()), Some(1));
    }

    #[test]
    fn terms_are_case_and_punctuation_sensitive() {
        let idx = Index::build(["d1\tRust,\trust"]).unwrap();
        assert!(idx.lookup("Rust,").is_some());
        assert!(idx.lookup("rust").is_some());
        assert!(idx.lookup("Rust").is_none());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let idx = Index::build(["", "d1\tt\tb", "   "]).unwrap();
        assert_eq!(idx.num_docs(), 1);
    }

    #[test]
    fn malformed_line_aborts_build() {
        let err = Index::build(["d1\tt\tb", "d2 missing tabs"]).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn from_reader_matches_build() {
        let text = "d1\ta b\tc\nd2\tb\td\n";
        let idx = Index::from_reader(text.as_bytes()).unwrap();
        assert_eq!(idx.lookup("b"), Some(&PostingSet::from([1, 2])));
        assert_eq!(idx.lookup("zzz"), None);
    }
}
