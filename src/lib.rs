use tracing::info;

pub mod accumulate;
pub mod config;
pub mod error;
pub mod logging;
pub mod matrix;
pub mod sample;
pub mod writer;

use crate::config::RunConfig;
use crate::error::Result;
use crate::matrix::CountMatrix;

/// Reads every input file and builds the combined table, without writing it.
pub fn combine(config: &RunConfig) -> Result<CountMatrix> {
    let file_list = config
        .files
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>();
    info!("Reading in the input files: {}", file_list.join(", "));

    let sample_set = accumulate::accumulate(config)?;
    Ok(matrix::merge_samples(&sample_set, config.index_mode))
}

/// Runs the whole pipeline: extract, merge, write.
/// Nothing is written if any input file fails.
pub fn run(config: &RunConfig) -> Result<()> {
    let combined = combine(config)?;
    writer::write_matrix(&combined, &config.output, &config.missing_token)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CombineError;
    use std::fs;
    use tempfile::TempDir;

    fn two_sample_run(dir: &TempDir) -> RunConfig {
        let a = dir.path().join("sampleA_htseq_count.txt");
        let b = dir.path().join("sampleB_htseq_count.txt");
        fs::write(&a, "geneX\t10\ngeneY\t5").unwrap();
        fs::write(&b, "geneX\t7\ngeneZ\t2").unwrap();
        let mut config = RunConfig::with_files(vec![a, b]).unwrap();
        config.output = dir.path().join("out.tsv");
        config
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = two_sample_run(&dir);
        run(&config).unwrap();
        let content = fs::read_to_string(&config.output).unwrap();
        assert_eq!(
            content,
            "gene_id\tsampleA\tsampleB\ngeneX\t10\t7\ngeneY\t5\tNA\n"
        );
    }

    #[test]
    fn test_run_duplicate_sample_name() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("sampleA_htseq_count.txt");
        let sub = dir.path().join("rerun");
        fs::create_dir(&sub).unwrap();
        let a_again = sub.join("sampleA_htseq_count.txt");
        fs::write(&a, "geneX\t10\n").unwrap();
        fs::write(&a_again, "geneX\t99\n").unwrap();

        let mut config = RunConfig::with_files(vec![a, a_again]).unwrap();
        config.output = dir.path().join("out.tsv");
        run(&config).unwrap();
        let content = fs::read_to_string(&config.output).unwrap();
        assert_eq!(content, "gene_id\tsampleA\ngeneX\t10\n");
    }

    #[test]
    fn test_run_missing_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = two_sample_run(&dir);
        config.files.push(dir.path().join("gone_htseq_count.txt"));
        let result = run(&config);
        assert!(matches!(result, Err(CombineError::FileAccess { .. })));
        assert!(!config.output.exists());
    }
}
