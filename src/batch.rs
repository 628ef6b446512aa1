//! Batch matching of a name list against a photo folder.

use crate::config::MatchConfig;
use crate::error::SearchError;
use crate::matcher::{MatchEngine, MatchRule};
use crate::search::{first_match, list_candidates, Candidate, FileLister, PhotoMatch};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// 1-based position in the input list.
    pub number: usize,
    pub fio: String,
    pub file: String,
    pub rule: MatchRule,
    pub similarity: f64,
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedRecord {
    pub number: usize,
    pub fio: String,
}

/// Conditions reported once per batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchWarning {
    FolderMissing { folder: PathBuf, reason: String },
    EmptyInputList,
}

impl std::fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FolderMissing { folder, reason } => {
                write!(f, "photo folder {} is unavailable: {reason}", folder.display())
            }
            Self::EmptyInputList => f.write_str("the name list is empty"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub matched: Vec<MatchRecord>,
    pub unmatched: Vec<UnmatchedRecord>,
    pub warnings: Vec<BatchWarning>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    /// Closing lines of a run.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Total names: {}", self.total()),
            format!("Matched: {}", self.matched.len()),
            format!("Not matched: {}", self.unmatched.len()),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Send one line per name and the summary to the observer.
    pub verbose: bool,
    /// Search names on the rayon pool.
    pub parallel: bool,
}

/// Receives the side output of a batch.
pub trait BatchObserver: Sync {
    fn log(&self, line: &str);

    fn progress(&self, _done: usize, _total: usize) {}
}

/// Observer that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {
    fn log(&self, _line: &str) {}
}

/// Matches every name against the photos of `folder`.
///
/// Each name takes the first photo, in listing order, accepted by the match
/// rules. A photo may be reported for several names. The folder is listed
/// once; when it cannot be listed every name is unmatched and a single
/// [`BatchWarning::FolderMissing`] is recorded.
pub fn process(
    names: &[String],
    folder: &Path,
    config: &MatchConfig,
    lister: &dyn FileLister,
    options: &BatchOptions,
    observer: &dyn BatchObserver,
) -> BatchReport {
    let mut report = BatchReport::default();
    if names.is_empty() {
        report.warnings.push(BatchWarning::EmptyInputList);
        return report;
    }

    let candidates = match list_candidates(folder, config, lister) {
        Ok(candidates) => candidates,
        Err(SearchError::FolderMissing { folder, source }) => {
            debug!("photo folder {:?} cannot be listed: {}", folder, source);
            report.warnings.push(BatchWarning::FolderMissing {
                folder,
                reason: source.to_string(),
            });
            Vec::new()
        }
    };

    let engine = MatchEngine::from_config(config);
    let total = names.len();
    let done = AtomicUsize::new(0);
    let search = |fio: &String| -> Option<PhotoMatch> {
        let hit = search_one(&engine, fio, &candidates);
        observer.progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
        hit
    };
    let hits: Vec<Option<PhotoMatch>> = if options.parallel {
        names.par_iter().map(search).collect()
    } else {
        names.iter().map(search).collect()
    };

    for (idx, (fio, hit)) in names.iter().zip(hits).enumerate() {
        let number = idx + 1;
        match hit {
            Some(hit) => {
                if options.verbose {
                    observer.log(&format!(
                        "{number}. FIO: '{fio}' -> file: '{}' | Rule: {} | Similarity: {:.1}% | Variant: '{}'",
                        hit.file_name, hit.found.rule, hit.found.similarity, hit.found.variant
                    ));
                }
                report.matched.push(MatchRecord {
                    number,
                    fio: fio.clone(),
                    file: hit.file_name,
                    rule: hit.found.rule,
                    similarity: hit.found.similarity,
                    variant: hit.found.variant,
                });
            }
            None => {
                if options.verbose {
                    observer.log(&format!("{number}. FIO: '{fio}' -> file not found."));
                }
                report.unmatched.push(UnmatchedRecord {
                    number,
                    fio: fio.clone(),
                });
            }
        }
    }

    if options.verbose {
        for line in report.summary_lines() {
            observer.log(&line);
        }
    }
    report
}

fn search_one(engine: &MatchEngine, fio: &str, candidates: &[Candidate]) -> Option<PhotoMatch> {
    if candidates.is_empty() {
        return None;
    }
    let hit = first_match(&engine.prepare(fio), candidates);
    debug!("{fio:?} -> {:?}", hit.as_ref().map(|h| h.file_name.as_str()));
    hit
}
