//! Whitespace-delimited text matrices.
//!
//! One row per line, values separated by tabs or spaces. Blank lines
//! and lines starting with `#` are skipped. Used for MDMR design
//! matrices, outcome matrices and distance matrices.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

use permtest_linalg::DenseMatrix;

/// Read a numeric matrix from a text file.
pub fn read_matrix_txt(path: &Path) -> Result<DenseMatrix> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
    parse_matrix(&contents).with_context(|| format!("In matrix file: {}", path.display()))
}

/// Parse a numeric matrix from text.
pub fn parse_matrix(contents: &str) -> Result<DenseMatrix> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>()
                    .with_context(|| format!("Line {}: invalid number '{}'", line_num + 1, s))
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                bail!(
                    "Line {} has {} fields, expected {}",
                    line_num + 1,
                    row.len(),
                    first.len()
                );
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        bail!("Empty matrix file");
    }
    Ok(DenseMatrix::from_rows(&rows))
}

/// Write a matrix as tab-separated text, one row per line.
pub fn write_matrix_txt(m: &DenseMatrix, header: Option<&[&str]>, path: &Path) -> Result<()> {
    let mut f = std::io::BufWriter::new(
        std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?,
    );
    if let Some(names) = header {
        writeln!(f, "#{}", names.join("\t"))?;
    }
    for i in 0..m.nrows() {
        let row: Vec<String> = m.row(i).iter().map(|v| format!("{}", v)).collect();
        writeln!(f, "{}", row.join("\t"))?;
    }
    f.flush()?;
    Ok(())
}
