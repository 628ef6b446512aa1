//! Report files for a finished batch.
//!
//! Three files are written into the output directory: `matched.csv`,
//! `unmatched.csv` and `report.json`.

use crate::batch::{BatchReport, BatchWarning, MatchRecord, UnmatchedRecord};
use crate::error::ReportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MATCHED_CSV: &str = "matched.csv";
pub const UNMATCHED_CSV: &str = "unmatched.csv";
pub const REPORT_JSON: &str = "report.json";

/// JSON form of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub photo_folder: PathBuf,
    pub total: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub matched: Vec<MatchRecord>,
    pub unmatched: Vec<UnmatchedRecord>,
    pub warnings: Vec<BatchWarning>,
}

impl ReportDocument {
    pub fn new(report: &BatchReport, photo_folder: &Path) -> Self {
        Self {
            generated_at: Utc::now(),
            photo_folder: photo_folder.to_path_buf(),
            total: report.total(),
            matched_count: report.matched.len(),
            unmatched_count: report.unmatched.len(),
            matched: report.matched.clone(),
            unmatched: report.unmatched.clone(),
            warnings: report.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub matched_csv: PathBuf,
    pub unmatched_csv: PathBuf,
    pub json: PathBuf,
}

pub fn write_reports(
    out_dir: &Path,
    report: &BatchReport,
    photo_folder: &Path,
) -> Result<WrittenReport, ReportError> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let written = WrittenReport {
        matched_csv: out_dir.join(MATCHED_CSV),
        unmatched_csv: out_dir.join(UNMATCHED_CSV),
        json: out_dir.join(REPORT_JSON),
    };
    write_matched_csv(&written.matched_csv, &report.matched)?;
    write_unmatched_csv(&written.unmatched_csv, &report.unmatched)?;
    write_json(&written.json, &ReportDocument::new(report, photo_folder))?;
    Ok(written)
}

pub fn write_matched_csv(path: &Path, records: &[MatchRecord]) -> Result<(), ReportError> {
    let csv_err = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .map_err(csv_err)?;
    writer
        .write_record(["number", "fio", "file", "rule", "similarity", "variant"])
        .map_err(csv_err)?;
    for record in records {
        writer
            .write_record([
                record.number.to_string().as_str(),
                record.fio.as_str(),
                record.file.as_str(),
                record.rule.label(),
                format!("{:.1}", record.similarity).as_str(),
                record.variant.as_str(),
            ])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_unmatched_csv(path: &Path, records: &[UnmatchedRecord]) -> Result<(), ReportError> {
    let csv_err = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(["number", "fio"]).map_err(csv_err)?;
    for record in records {
        writer
            .write_record([record.number.to_string().as_str(), record.fio.as_str()])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json(path: &Path, document: &ReportDocument) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(document).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
