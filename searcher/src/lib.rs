use anyhow::{Context, Result};
use boolsearch_core::records::QueryRecord;
use boolsearch_core::{search, write_submission, Error, Index, QueryId, QueryResult, ResultStore};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug, Clone)]
#[command(name = "searcher")]
#[command(about = "Answer boolean keyword queries against a tab-separated corpus", long_about = None)]
pub struct Config {
    /// Corpus, one `<marker><id>\t<title>\t<body>` record per line
    #[arg(long)]
    pub docs_file: PathBuf,
    /// Queries, one `<id>\t<expression>` record per line
    #[arg(long)]
    pub queries_file: PathBuf,
    /// Object list with a header line, then `<objectId>,<queryId>,<docId>` rows
    #[arg(long)]
    pub objects_file: PathBuf,
    /// Output CSV with `ObjectId,Relevance` rows
    #[arg(long)]
    pub submission_file: PathBuf,
    /// Optional JSON run report listing counts and failed queries
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Worker threads for query evaluation (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

/// A query that could not be answered. The rest of the batch is unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct QueryFailure {
    /// Missing when the record itself could not be parsed.
    pub query_id: Option<QueryId>,
    pub line: usize,
    pub query: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub num_docs: u32,
    pub num_terms: usize,
    pub queries_ok: usize,
    pub failures: Vec<QueryFailure>,
    pub rows_written: usize,
}

#[derive(Serialize)]
struct RunReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

pub fn run(config: &Config) -> Result<RunSummary> {
    let start = Instant::now();
    let index = load_index(&config.docs_file)?;
    tracing::info!(
        num_docs = index.num_docs(),
        num_terms = index.num_terms(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "index built"
    );

    let lines = read_lines(&config.queries_file)?;
    let pool = rayon::ThreadPoolBuilder::new().num_threads(config.threads).build()?;
    let outcomes: Vec<std::result::Result<QueryResult, QueryFailure>> = pool.install(|| {
        lines
            .par_iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| answer(line, i + 1, &index))
            .collect()
    });

    let mut store = ResultStore::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => store.insert(result),
            Err(failure) => failures.push(failure),
        }
    }
    let queries_ok = store.len();
    tracing::info!(queries_ok, queries_failed = failures.len(), "queries evaluated");

    let rows_written = write_submission_file(&store, &config.objects_file, &config.submission_file)?;
    tracing::info!(rows_written, output = %config.submission_file.display(), "submission written");

    let summary = RunSummary {
        num_docs: index.num_docs(),
        num_terms: index.num_terms(),
        queries_ok,
        failures,
        rows_written,
    };
    if let Some(path) = &config.report {
        save_report(path, &summary)?;
    }
    Ok(summary)
}

fn load_index(path: &Path) -> Result<Index> {
    let f = File::open(path).with_context(|| format!("opening corpus {}", path.display()))?;
    Index::from_reader(BufReader::new(f)).with_context(|| format!("building index from {}", path.display()))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let f = File::open(path).with_context(|| format!("opening queries {}", path.display()))?;
    let lines = BufReader::new(f).lines().collect::<std::io::Result<Vec<_>>>()?;
    Ok(lines)
}

fn answer(line: &str, line_no: usize, index: &Index) -> std::result::Result<QueryResult, QueryFailure> {
    let failure = |query_id: Option<QueryId>, query: &str, err: &Error| QueryFailure {
        query_id,
        line: line_no,
        query: query.to_string(),
        error: err.to_string(),
    };
    let record = QueryRecord::parse(line, line_no).map_err(|e| {
        tracing::warn!(line = line_no, error = %e, "skipping query record");
        failure(None, line, &e)
    })?;
    match search(record.query, index) {
        Ok(docs) => Ok(QueryResult { query_id: record.query_id, docs }),
        Err(e) => {
            if e.is_defect() {
                tracing::error!(query_id = record.query_id, query = record.query, error = %e, "query evaluation defect");
            } else {
                tracing::warn!(query_id = record.query_id, query = record.query, error = %e, "query rejected");
            }
            Err(failure(Some(record.query_id), record.query, &e))
        }
    }
}

fn write_submission_file(store: &ResultStore, objects: &Path, output: &Path) -> Result<usize> {
    let input = File::open(objects).with_context(|| format!("opening objects {}", objects.display()))?;
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let out = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let rows = write_submission(store, BufReader::new(input), BufWriter::new(out))
        .with_context(|| format!("writing submission from {}", objects.display()))?;
    Ok(rows)
}

fn save_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let report = RunReport {
        generated_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        summary,
    };
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
