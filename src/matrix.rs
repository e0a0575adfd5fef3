//! # matrix.rs
//!
//! The combined gene × sample count table and the left join that builds it.
//!
//! The row index is chosen once, up front (see `IndexMode`), and never grows:
//! joining a sample only appends a column. Genes found only in the joined
//! sample are dropped, and genes the sample lacks get a missing cell.

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::accumulate::SampleSet;
use crate::config::IndexMode;
use crate::sample::SampleCountMap;

/// A count, or `None` when the gene has no usable count in that sample.
/// Fractional and negative values are kept as read.
pub type Cell = Option<f64>;

/// MARK: CountMatrix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountMatrix {
    gene_ids: Vec<String>,
    sample_names: Vec<String>,
    /// Column-major: `columns[j][i]` is gene `i` in sample `j`.
    columns: Vec<Vec<Cell>>,
}

impl CountMatrix {
    /// A table with the given rows and no columns.
    pub fn with_index(gene_ids: Vec<String>) -> Self {
        CountMatrix {
            gene_ids,
            sample_names: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    pub fn n_rows(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.sample_names.len()
    }

    pub fn has_sample(&self, sample_name: &str) -> bool {
        self.sample_names.iter().any(|s| s == sample_name)
    }

    pub fn column(&self, sample_name: &str) -> Option<&[Cell]> {
        self.sample_names
            .iter()
            .position(|s| s == sample_name)
            .map(|j| self.columns[j].as_slice())
    }

    pub fn get(&self, gene_id: &str, sample_name: &str) -> Option<Cell> {
        let i = self.gene_ids.iter().position(|g| g == gene_id)?;
        self.column(sample_name).map(|col| col[i])
    }

    /// Rows as (gene ID, cells in column order).
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<Cell>)> + '_ {
        self.gene_ids
            .iter()
            .enumerate()
            .map(|(i, gene_id)| {
                let cells = self.columns.iter().map(|col| col[i]).collect::<Vec<Cell>>();
                (gene_id.as_str(), cells)
            })
    }
}

/// Parses a raw count. Only text that is not a finite number becomes a missing cell.
pub fn parse_count(sample_name: &str, gene_id: &str, raw: &str) -> Cell {
    match raw.trim().parse::<f64>() {
        Ok(count) if count.is_finite() => Some(count),
        _ => {
            warn!(
                "Sample '{}': count '{}' for gene {} is not a number, treating as missing",
                sample_name, raw, gene_id
            );
            None
        }
    }
}

/// Whole numbers print without a decimal point, everything else as the shortest exact form.
pub fn format_count(count: f64) -> String {
    if count == 0.0 {
        "0".to_string()
    } else if count.fract() == 0.0 && count.abs() < 1e15 {
        format!("{:.0}", count)
    } else {
        count.to_string()
    }
}

/// MARK: left_join
/// Left-joins one sample onto the table as a new column labelled `sample_name`.
///
/// Every existing row keeps its place; rows absent from `counts` get `None`,
/// and genes only present in `counts` are dropped. Returns `false`, leaving the
/// table untouched, if a column with this name already exists.
pub fn left_join(matrix: &mut CountMatrix, sample_name: &str, counts: &SampleCountMap) -> bool {
    if matrix.has_sample(sample_name) {
        return false;
    }

    let column: Vec<Cell> = matrix
        .gene_ids
        .iter()
        .map(|gene_id| {
            counts
                .get(gene_id)
                .and_then(|raw| parse_count(sample_name, gene_id, raw))
        })
        .collect();

    matrix.sample_names.push(sample_name.to_string());
    matrix.columns.push(column);
    true
}

/// Picks the initial row index according to `mode`.
pub fn initial_index(sample_set: &SampleSet, mode: IndexMode) -> Vec<String> {
    match mode {
        IndexMode::First => sample_set.first_gene_ids.clone(),
        IndexMode::Last => sample_set.last_gene_ids.clone(),
        IndexMode::Union => sample_set.all_gene_ids.iter().unique().cloned().collect(),
    }
}

/// Builds the combined table: seeds the index, then joins every sample in first-seen order.
pub fn merge_samples(sample_set: &SampleSet, mode: IndexMode) -> CountMatrix {
    info!("Combining samples");
    let index = initial_index(sample_set, mode);
    debug!("Seeding {} rows from the '{}' index", index.len(), mode);

    let mut matrix = CountMatrix::with_index(index);
    let mut processed: Vec<&str> = Vec::new();
    for sample in sample_set.samples.iter() {
        if !processed.is_empty() {
            debug!("All processed samples: '{}'", processed.join(", "));
        }
        debug!("Processing sample '{}'", sample.name);
        if left_join(&mut matrix, &sample.name, &sample.counts) {
            processed.push(&sample.name);
        } else {
            debug!("Sample '{}' already merged, skipping", sample.name);
        }
    }
    debug!("Processed samples: {}", processed.join(", "));

    for (name, column) in matrix.sample_names.iter().zip(matrix.columns.iter()) {
        let missing = column.iter().filter(|cell| cell.is_none()).count();
        debug!(
            "Sample '{}': {} of {} genes missing",
            name,
            missing,
            matrix.n_rows()
        );
    }

    matrix
}
