use csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::{CombineError, Result};
use crate::matrix::{CountMatrix, format_count};

/// Header of the row key column.
pub const GENE_ID_HEADER: &str = "gene_id";

/// Writes the table tab-separated to any writer, missing cells as `missing_token`.
pub fn write_matrix_to<W: Write>(
    matrix: &CountMatrix,
    writer: W,
    missing_token: &str,
) -> std::result::Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    let mut header = vec![GENE_ID_HEADER];
    header.extend(matrix.sample_names().iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (gene_id, cells) in matrix.rows() {
        let mut record = Vec::with_capacity(cells.len() + 1);
        record.push(gene_id.to_string());
        record.extend(cells.iter().map(|cell| match cell {
            Some(count) => format_count(*count),
            None => missing_token.to_string(),
        }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the combined table to `path`.
///
/// # Errors
/// `CombineError::FileAccess` if the file cannot be created or written.
pub fn write_matrix(matrix: &CountMatrix, path: &Path, missing_token: &str) -> Result<()> {
    let file = File::create(path).map_err(|err| CombineError::file_access(path, err))?;
    write_matrix_to(matrix, file, missing_token).map_err(|err| CombineError::from_csv(path, err))?;
    info!(
        "Wrote {} genes x {} samples to {}",
        matrix.n_rows(),
        matrix.n_cols(),
        path.display()
    );
    Ok(())
}
