//! First-match photo search over a folder listing.

use crate::config::MatchConfig;
use crate::error::SearchError;
use crate::matcher::{MatchEngine, MatchOutcome, PreparedName, RuleMatch};
use crate::normalize::nfc;
use log::debug;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Source of folder entries.
pub trait FileLister: Sync {
    /// Entry names of `folder`, in whatever order the source yields them.
    fn list_files(&self, folder: &Path) -> io::Result<Vec<String>>;
}

/// Lists the direct children of a folder on disk, unsorted.
///
/// Entries whose name is not valid UTF-8 are skipped, so every listed name
/// is the exact on-disk name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl FileLister for FsLister {
    fn list_files(&self, folder: &Path) -> io::Result<Vec<String>> {
        // walkdir yields nothing below depth 0 for a regular file
        if !fs::metadata(folder)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", folder.display()),
            ));
        }
        let mut names = Vec::new();
        for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => debug!("skipping non UTF-8 entry {:?}", entry.path()),
            }
        }
        Ok(names)
    }
}

/// A fixed listing, returned as given for any folder.
#[derive(Debug, Default, Clone)]
pub struct StaticLister {
    names: Option<Vec<String>>,
}

impl StaticLister {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// A lister whose folder never exists.
    pub fn missing() -> Self {
        Self { names: None }
    }
}

impl FileLister for StaticLister {
    fn list_files(&self, folder: &Path) -> io::Result<Vec<String>> {
        self.names.clone().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", folder.display()),
            )
        })
    }
}

/// A photo chosen for a name.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoMatch {
    /// Entry name as listed on disk.
    pub file_name: String,
    pub found: RuleMatch,
}

/// A listed photo with the form used for matching.
#[derive(Debug, Clone)]
pub struct Candidate {
    file_name: String,
    match_key: String,
}

impl Candidate {
    pub fn new(file_name: String) -> Self {
        let match_key = nfc(&file_name);
        Self {
            file_name,
            match_key,
        }
    }
}

/// Lists `folder` and keeps image entries, preserving listing order.
pub fn list_candidates(
    folder: &Path,
    config: &MatchConfig,
    lister: &dyn FileLister,
) -> Result<Vec<Candidate>, SearchError> {
    let names = lister
        .list_files(folder)
        .map_err(|source| SearchError::folder_missing(folder, source))?;
    let total = names.len();
    let candidates: Vec<Candidate> = names
        .into_iter()
        .filter(|name| config.is_image(name))
        .map(Candidate::new)
        .collect();
    debug!(
        "{:?}: {} entries, {} image candidates",
        folder,
        total,
        candidates.len()
    );
    Ok(candidates)
}

/// The first candidate, in listing order, that any rule accepts.
///
/// Later candidates are never examined once one matches, even if they
/// would score higher.
pub fn first_match(prepared: &PreparedName, candidates: &[Candidate]) -> Option<PhotoMatch> {
    candidates.iter().find_map(|candidate| {
        match prepared.match_file(&candidate.match_key) {
            MatchOutcome::Found(found) => Some(PhotoMatch {
                file_name: candidate.file_name.clone(),
                found,
            }),
            MatchOutcome::NotFound => None,
        }
    })
}

/// Searches `folder` for the photo of `fio`.
///
/// `Ok(None)` means the folder was listed and nothing matched.
pub fn find_photo(
    fio: &str,
    folder: &Path,
    engine: &MatchEngine,
    config: &MatchConfig,
    lister: &dyn FileLister,
) -> Result<Option<PhotoMatch>, SearchError> {
    let candidates = list_candidates(folder, config, lister)?;
    Ok(first_match(&engine.prepare(fio), &candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchRule;

    fn setup() -> (MatchEngine, MatchConfig) {
        let config = MatchConfig::default();
        (MatchEngine::from_config(&config), config)
    }

    #[test]
    fn test_first_match_in_listing_order() {
        let (engine, config) = setup();
        // The second file is an exact, better-scoring match but comes later.
        let lister = StaticLister::new(["Иванов Иван (старое фото).jpg", "Иванов Иван.jpg"]);
        let hit = find_photo("Иванов Иван", Path::new("photos"), &engine, &config, &lister)
            .unwrap()
            .unwrap();
        assert_eq!(hit.file_name, "Иванов Иван (старое фото).jpg");
        assert!(hit.found.similarity < 100.0);
    }

    #[test]
    fn test_earlier_weaker_rule_wins_over_later_exact() {
        let (engine, config) = setup();
        let lister = StaticLister::new(["Иванов Иван.png", "Иванов Иван Иванович.png"]);
        let hit = find_photo("Иванов Иван Иванович", Path::new("p"), &engine, &config, &lister)
            .unwrap()
            .unwrap();
        assert_eq!(hit.file_name, "Иванов Иван.png");
        assert_eq!(hit.found.rule, MatchRule::ShortExact);
    }

    #[test]
    fn test_non_images_skipped() {
        let (engine, config) = setup();
        let lister = StaticLister::new(["Иванов Иван.txt", "Иванов Иван.JPG"]);
        let hit = find_photo("Иванов Иван", Path::new("p"), &engine, &config, &lister)
            .unwrap()
            .unwrap();
        assert_eq!(hit.file_name, "Иванов Иван.JPG");
    }

    #[test]
    fn test_not_found() {
        let (engine, config) = setup();
        let lister = StaticLister::new(["bolatov_asan.jpg"]);
        let hit = find_photo("Асан Болатов", Path::new("p"), &engine, &config, &lister).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_folder_missing() {
        let (engine, config) = setup();
        let err = find_photo(
            "Иванов Иван",
            Path::new("missing"),
            &engine,
            &config,
            &StaticLister::missing(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::FolderMissing { .. }));
    }

    #[test]
    fn test_decomposed_filename_matches_composed_name() {
        let (engine, config) = setup();
        let lister = StaticLister::new(["Ии\u{0306}ван.jpg"]);
        let hit = find_photo("Йван", Path::new("p"), &engine, &config, &lister)
            .unwrap()
            .unwrap();
        assert_eq!(hit.file_name, "Ии\u{0306}ван.jpg");
        assert_eq!(hit.found.rule, MatchRule::FullExact);
    }

    #[test]
    fn test_fs_lister_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Иванов Иван.jpg"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("Deep.jpg"), b"").unwrap();

        let mut names = FsLister.list_files(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["nested", "notes.txt", "Иванов Иван.jpg"]);
    }

    #[test]
    fn test_fs_lister_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(FsLister.list_files(&missing).is_err());
    }

    #[test]
    fn test_fs_lister_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photos.jpg");
        fs::write(&file, b"").unwrap();
        let err = FsLister.list_files(&file).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_lister_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Иванов Иван.jpg"), b"").unwrap();
        let raw = OsStr::from_bytes(b"\xD0broken.jpg");
        // some filesystems refuse invalid UTF-8 names
        if fs::write(dir.path().join(raw), b"").is_err() {
            return;
        }
        let names = FsLister.list_files(dir.path()).unwrap();
        assert_eq!(names, vec!["Иванов Иван.jpg"]);
    }
}
