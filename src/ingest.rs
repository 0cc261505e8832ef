use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// A parsed tabular source: ordered headers plus one column->value map per row.
///
/// Column order matters for the picks sheet (game columns must be walked in
/// schedule order), so the header list is kept alongside the row maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn read_csv_str(raw: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("read csv header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("read csv record")?;
        let mut row = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("");
            row.insert(header.clone(), value.to_string());
        }
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

pub fn read_csv_file(path: &Path) -> Result<RawTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read csv file {}", path.display()))?;
    read_csv_str(&raw).with_context(|| format!("parse csv file {}", path.display()))
}
