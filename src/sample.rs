//! # sample.rs
//!
//! Reading a single htseq-count file into a per-sample count map.
//! It includes:
//! - `CountRecord`: One typed (gene ID, count) row.
//! - `SampleCountMap`: Gene ID to raw count text, in file order.
//! - `SampleCounts`: A sample name together with its counts.
//! - `sample_name_from_path`: Derives the sample name from a file name.
//! - `read_sample`: Parses one file, dropping rows that are not two fields.

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::RunConfig;
use crate::error::{CombineError, Result};

/// Prefix htseq-count uses for its summary counters (`__no_feature`, `__ambiguous`, ...).
pub const SPECIAL_COUNTER_PREFIX: &str = "__";

/// MARK: CountRecord
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CountRecord {
    pub gene_id: String,
    pub count: String,
}

impl CountRecord {
    /// Returns `None` for blank rows, rows that are not exactly two fields, and rows without a gene ID.
    pub fn from_string_record(record: &StringRecord) -> Option<CountRecord> {
        if record.len() != 2 {
            return None;
        }
        let parsed: CountRecord = record.deserialize(None).ok()?;
        if parsed.gene_id.is_empty() {
            return None;
        }
        Some(parsed)
    }

    pub fn is_special_counter(&self) -> bool {
        self.gene_id.starts_with(SPECIAL_COUNTER_PREFIX)
    }
}

/// MARK: SampleCountMap
/// Gene ID to raw count text. Iteration follows the order genes first appeared in the file;
/// a repeated gene ID keeps its position and takes the later value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SampleCountMap {
    gene_ids: Vec<String>,
    counts: HashMap<String, String>,
}

impl SampleCountMap {
    pub fn new() -> Self {
        SampleCountMap::default()
    }

    pub fn insert(&mut self, gene_id: String, count: String) {
        if !self.counts.contains_key(&gene_id) {
            self.gene_ids.push(gene_id.clone());
        }
        self.counts.insert(gene_id, count);
    }

    pub fn get(&self, gene_id: &str) -> Option<&str> {
        self.counts.get(gene_id).map(String::as_str)
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    pub fn len(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_ids.is_empty()
    }
}

impl FromIterator<CountRecord> for SampleCountMap {
    fn from_iter<I: IntoIterator<Item = CountRecord>>(iter: I) -> Self {
        let mut map = SampleCountMap::new();
        for record in iter {
            map.insert(record.gene_id, record.count);
        }
        map
    }
}

/// MARK: SampleCounts
#[derive(Debug, Clone)]
pub struct SampleCounts {
    pub name: String,
    pub path: PathBuf,
    pub counts: SampleCountMap,
}

/// Part of the file's base name before the first occurrence of `pattern`,
/// or the whole base name when the pattern does not occur.
pub fn sample_name_from_path(path: &Path, pattern: &str) -> String {
    let base_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    match base_name.find(pattern) {
        Some(pos) if !pattern.is_empty() => base_name[..pos].to_string(),
        _ => base_name,
    }
}

pub fn open_count_file(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|err| CombineError::file_access(path, err))?;
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(BufReader::new(file));
    Ok(reader)
}

/// Reads one two-column count file.
///
/// # Errors
/// `CombineError::FileAccess` if the file cannot be opened or read.
pub fn read_sample(path: &Path, config: &RunConfig) -> Result<SampleCounts> {
    let name = sample_name_from_path(path, &config.pattern);
    let mut reader = open_count_file(path)?;

    let mut counts = SampleCountMap::new();
    let mut dropped = 0usize;
    for result in reader.records() {
        let record = result.map_err(|err| CombineError::from_csv(path, err))?;
        match CountRecord::from_string_record(&record) {
            Some(rec) if config.skip_special && rec.is_special_counter() => {
                trace!("{}: skipping counter {}", name, rec.gene_id);
            }
            Some(rec) => counts.insert(rec.gene_id, rec.count),
            None => {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                trace!("{}: dropping malformed row at line {}", name, line);
                dropped += 1;
            }
        }
    }

    debug!(
        "Read {} genes for sample '{}' from {} ({} rows dropped)",
        counts.len(),
        name,
        path.display(),
        dropped
    );

    Ok(SampleCounts {
        name,
        path: path.to_path_buf(),
        counts,
    })
}
