//! Loading the list of names.
//!
//! A `.csv` file is read with headers and the names are taken from one
//! column; any other file is read one name per line. Values are trimmed and
//! composed to NFC, blank values are dropped, order is kept.

use crate::error::InputError;
use crate::normalize::nfc;
use std::fs;
use std::path::Path;

/// Header of the name column in the spreadsheet exports.
pub const DEFAULT_COLUMN: &str = "ФИО";

#[derive(Debug, Clone)]
pub struct InputOptions {
    pub column: String,
    pub delimiter: u8,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

pub fn load_names(path: &Path, options: &InputOptions) -> Result<Vec<String>, InputError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        load_csv(path, options)
    } else {
        load_lines(path)
    }
}

fn load_csv(path: &Path, options: &InputOptions) -> Result<Vec<String>, InputError> {
    let csv_err = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_err)?;
    let wanted = options.column.trim();
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == wanted)
        .ok_or_else(|| InputError::MissingColumn {
            path: path.to_path_buf(),
            column: options.column.clone(),
        })?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if let Some(value) = record.get(column).and_then(clean) {
            names.push(value);
        }
    }
    Ok(names)
}

fn load_lines(path: &Path) -> Result<Vec<String>, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(raw
        .trim_start_matches('\u{feff}')
        .lines()
        .filter_map(clean)
        .collect())
}

fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(nfc(trimmed))
    }
}
