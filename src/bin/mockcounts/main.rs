use clap::Parser;
use colored::Colorize;
use csv::WriterBuilder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Poisson};
use std::error::Error;
use std::path::Path;
use std::process;

/// Counters htseq-count appends after the gene rows.
const SPECIAL_COUNTERS: [&str; 5] = [
    "__no_feature",
    "__ambiguous",
    "__too_low_aQual",
    "__not_aligned",
    "__alignment_not_unique",
];

#[derive(Debug, Clone, Parser)]
#[command(
    name = "mockcounts",
    about = "Generate mock htseq-count files for testing htseq-combine.",
    version = env!("CARGO_PKG_VERSION")
)]
struct MockConfig {
    /// Number of sample files to write
    #[arg(short, long, default_value_t = 3)]
    samples: usize,
    /// Number of genes per sample before dropout
    #[arg(short, long, default_value_t = 1000)]
    genes: usize,
    /// Directory to write the files into, created if missing
    #[arg(short, long, default_value = "sim_data")]
    output_dir: String,
    /// Seed for reproducible output
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Probability that a gene is left out of a given sample
    #[arg(long, default_value_t = 0.1)]
    dropout: f64,
}

fn main() {
    let config = MockConfig::parse();
    if let Err(e) = generate(&config) {
        eprintln!("Application error: {}", e.to_string().red().bold());
        process::exit(1);
    }
}

fn generate(config: &MockConfig) -> Result<(), Box<dyn Error>> {
    if !(0.0..=1.0).contains(&config.dropout) {
        return Err(format!("dropout must be between 0 and 1, got {}", config.dropout).into());
    }
    let output_dir = Path::new(&config.output_dir);
    std::fs::create_dir_all(output_dir)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // per-gene expression level shared by all samples
    let expression = LogNormal::<f64>::new(3.0, 1.5)?;
    let gene_means: Vec<f64> = (0..config.genes)
        .map(|_| expression.sample(&mut rng).max(0.1))
        .collect();

    for i in 1..=config.samples {
        let path = output_dir.join(format!("sample{}_htseq_count.txt", i));
        let rows = mock_sample(&gene_means, config.dropout, &mut rng)?;
        write_sample(&path, &rows)?;
        println!("✅ Wrote {} genes to {}", rows.len(), path.display());
    }
    Ok(())
}

fn mock_sample(
    gene_means: &[f64],
    dropout: f64,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<(String, u64)>, Box<dyn Error>> {
    let mut rows = Vec::with_capacity(gene_means.len() + SPECIAL_COUNTERS.len());
    for (idx, mean) in gene_means.iter().enumerate() {
        if rng.random_bool(dropout) {
            continue;
        }
        let count = Poisson::new(*mean)?.sample(rng) as u64;
        rows.push((format!("gene{:05}", idx + 1), count));
    }
    for counter in SPECIAL_COUNTERS {
        rows.push((counter.to_string(), rng.random_range(0..10_000)));
    }
    Ok(rows)
}

fn write_sample(path: &Path, rows: &[(String, u64)]) -> Result<(), Box<dyn Error>> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?;
    for (gene_id, count) in rows {
        wtr.write_record([gene_id.as_str(), count.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_sample_is_reproducible() {
        let means = vec![5.0, 50.0, 500.0];
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        let a = mock_sample(&means, 0.0, &mut rng_a).unwrap();
        let b = mock_sample(&means, 0.0, &mut rng_b).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3 + SPECIAL_COUNTERS.len());
        assert_eq!(a[0].0, "gene00001");
    }

    #[test]
    fn test_full_dropout_leaves_only_counters() {
        let means = vec![5.0; 20];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rows = mock_sample(&means, 1.0, &mut rng).unwrap();
        assert_eq!(rows.len(), SPECIAL_COUNTERS.len());
        assert!(rows.iter().all(|(g, _)| g.starts_with("__")));
    }
}
