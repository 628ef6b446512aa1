//! Matches people's full names (FIO) against photo filenames.
//!
//! Names are looked up in a folder of photos with four ordered rules: the
//! full name as a substring of the file stem, then substitution variants of
//! the full name (Kazakh letters typed as their Russian counterparts), then
//! the surname and given name alone, then their variants. The first photo in
//! listing order that satisfies a rule wins.

pub mod batch;
pub mod config;
pub mod error;
pub mod input;
pub mod mapping;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod search;
pub mod similarity;
pub mod variants;

pub use batch::{
    process, BatchObserver, BatchOptions, BatchReport, BatchWarning, MatchRecord,
    SilentObserver, UnmatchedRecord,
};
pub use config::MatchConfig;
pub use error::{ConfigError, InputError, ReportError, SearchError};
pub use mapping::SubstitutionMap;
pub use matcher::{MatchEngine, MatchOutcome, MatchRule, PreparedName, RuleMatch};
pub use normalize::shorten;
pub use search::{find_photo, FileLister, FsLister, PhotoMatch, StaticLister};
pub use similarity::similarity;
pub use variants::{generate_variants, DEFAULT_MAX_SUBS};
