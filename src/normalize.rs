//! Name and filename normalization helpers.

use unicode_normalization::UnicodeNormalization;

/// Case folding shared by the matcher and the similarity scorer.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Composes decomposed characters (`И` + combining breve becomes `Й`).
pub fn nfc(value: &str) -> String {
    value.nfc().collect()
}

/// Surname and given name: the first two whitespace-separated components.
///
/// Names with fewer than two components are returned unchanged.
pub fn shorten(fio: &str) -> String {
    let mut parts = fio.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) => format!("{first} {second}"),
        _ => fio.to_string(),
    }
}

/// Filename without its last extension.
///
/// Leading dots never start an extension, so `.png` keeps `.png` as its stem.
pub fn file_stem(file_name: &str) -> &str {
    let body_start = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[body_start..].rfind('.') {
        Some(pos) => &file_name[..body_start + pos],
        None => file_name,
    }
}
