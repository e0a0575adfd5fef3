//! # accumulate.rs
//!
//! Runs the extractor over every input file in order and collects the results.
//! A sample name seen a second time is read but its data is discarded.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::Result;
use crate::sample::{SampleCounts, read_sample};

/// MARK: SampleSet
#[derive(Debug, Default)]
pub struct SampleSet {
    /// Samples in first-seen order, one entry per distinct sample name.
    pub samples: Vec<SampleCounts>,
    /// Gene IDs of every processed file concatenated in processing order, duplicates kept.
    pub all_gene_ids: Vec<String>,
    /// Gene IDs of the first processed file.
    pub first_gene_ids: Vec<String>,
    /// Gene IDs of the last processed file.
    pub last_gene_ids: Vec<String>,
    /// Files whose sample name had already been taken.
    pub skipped: Vec<PathBuf>,
}

impl SampleSet {
    pub fn contains(&self, sample_name: &str) -> bool {
        self.samples.iter().any(|s| s.name == sample_name)
    }

    pub fn sample_names(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.name.as_str()).collect()
    }

    /// Adds one extracted sample. Returns `false` when the name is already taken.
    ///
    /// A repeated name keeps its data out of `samples`, but its gene IDs still
    /// count as a processed file for `all_gene_ids` and `last_gene_ids`.
    pub fn push(&mut self, sample: SampleCounts) -> bool {
        let gene_ids = sample.counts.gene_ids().to_vec();
        if self.samples.is_empty() {
            self.first_gene_ids = gene_ids.clone();
        }
        self.all_gene_ids.extend(gene_ids.iter().cloned());
        self.last_gene_ids = gene_ids;

        if self.contains(&sample.name) {
            debug!(
                "Sample '{}' from {} already seen, skipping",
                sample.name,
                sample.path.display()
            );
            self.skipped.push(sample.path);
            return false;
        }
        self.samples.push(sample);
        true
    }
}

/// Extracts every file of the run in input order.
///
/// # Errors
/// The first file that cannot be read aborts the whole run.
pub fn accumulate(config: &RunConfig) -> Result<SampleSet> {
    let mut sample_set = SampleSet::default();
    for path in config.files.iter() {
        let sample = read_sample(path, config)?;
        sample_set.push(sample);
    }
    info!(
        "Read {} samples ({} duplicates skipped), total number of gene_ids: {}",
        sample_set.samples.len(),
        sample_set.skipped.len(),
        sample_set.all_gene_ids.len()
    );
    Ok(sample_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CombineError;
    use crate::sample::{CountRecord, SampleCountMap};
    use std::fs;
    use tempfile::TempDir;

    fn sample(name: &str, genes: &[(&str, &str)]) -> SampleCounts {
        SampleCounts {
            name: name.to_string(),
            path: PathBuf::from(format!("{}_htseq_count.txt", name)),
            counts: genes
                .iter()
                .map(|(g, c)| CountRecord {
                    gene_id: g.to_string(),
                    count: c.to_string(),
                })
                .collect::<SampleCountMap>(),
        }
    }

    #[test]
    fn test_push_tracks_gene_lists() {
        let mut set = SampleSet::default();
        assert!(set.push(sample("A", &[("g1", "1"), ("g2", "2")])));
        assert!(set.push(sample("B", &[("g2", "3"), ("g3", "4")])));
        assert_eq!(set.sample_names(), vec!["A", "B"]);
        assert_eq!(set.first_gene_ids, vec!["g1", "g2"]);
        assert_eq!(set.last_gene_ids, vec!["g2", "g3"]);
        assert_eq!(set.all_gene_ids, vec!["g1", "g2", "g2", "g3"]);
    }

    #[test]
    fn test_duplicate_sample_is_skipped() {
        let mut set = SampleSet::default();
        assert!(set.push(sample("A", &[("g1", "1")])));
        assert!(!set.push(sample("A", &[("g9", "9")])));
        assert_eq!(set.samples.len(), 1);
        assert_eq!(set.samples[0].counts.get("g1"), Some("1"));
        assert_eq!(set.first_gene_ids, vec!["g1"]);
        assert_eq!(set.all_gene_ids, vec!["g1", "g9"]);
        assert_eq!(set.last_gene_ids, vec!["g9"]);
        assert_eq!(set.skipped, vec![PathBuf::from("A_htseq_count.txt")]);
    }

    #[test]
    fn test_accumulate_files_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("sampleA_htseq_count.txt");
        let b = dir.path().join("sampleB_htseq_count.txt");
        fs::write(&a, "geneX\t10\ngeneY\t5\n").unwrap();
        fs::write(&b, "geneX\t7\ngeneZ\t2\n").unwrap();

        let config = RunConfig::with_files(vec![b.clone(), a.clone()]).unwrap();
        let set = accumulate(&config).unwrap();
        assert_eq!(set.sample_names(), vec!["sampleB", "sampleA"]);
        assert_eq!(set.first_gene_ids, vec!["geneX", "geneZ"]);
        assert_eq!(set.last_gene_ids, vec!["geneX", "geneY"]);
    }

    #[test]
    fn test_accumulate_aborts_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("sampleA_htseq_count.txt");
        fs::write(&a, "geneX\t10\n").unwrap();
        let missing = dir.path().join("missing_htseq_count.txt");

        let config = RunConfig::with_files(vec![a, missing]).unwrap();
        let result = accumulate(&config);
        assert!(matches!(result, Err(CombineError::FileAccess { .. })));
    }
}
