//! Room and file naming rules.
//!
//! Versioned files are stored in a folder named after the display name with
//! the first extension separator (`.`) swapped for a folder-safe separator
//! (`-`). The substitution is reversible only when the display name contains
//! no `-` of its own, so such names are rejected up front instead of being
//! silently mis-encoded.

use crate::error::AppError;
use crate::result::AppResult;

/// Separator used in display names before the file extension.
const EXT_SEPARATOR: char = '.';

/// Folder-safe separator substituted for the extension separator.
const FOLDER_SEPARATOR: char = '-';

/// Check whether a room name is a single "word": non-empty, ASCII
/// alphanumeric or underscore only.
pub fn is_valid_room_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Encode a display name (`report.pdf`) into its version-folder name
/// (`report-pdf`).
///
/// Only the first `.` is substituted, so multi-part extensions survive:
/// `logs.tar.gz` becomes `logs-tar.gz`. Names already containing the folder
/// separator would decode ambiguously and are rejected.
pub fn encode_display_name(display: &str) -> AppResult<String> {
    if display.is_empty() {
        return Err(AppError::validation("File name must not be empty"));
    }
    if display.contains(FOLDER_SEPARATOR) {
        return Err(AppError::validation(format!(
            "File name '{display}' contains '{FOLDER_SEPARATOR}', which cannot be encoded reversibly"
        )));
    }
    Ok(match display.split_once(EXT_SEPARATOR) {
        Some((stem, rest)) => format!("{stem}{FOLDER_SEPARATOR}{rest}"),
        None => display.to_string(),
    })
}

/// Decode a version-folder name (`report-pdf`) back into the display name
/// (`report.pdf`). Inverse of [`encode_display_name`].
pub fn decode_folder_name(folder: &str) -> String {
    match folder.split_once(FOLDER_SEPARATOR) {
        Some((stem, rest)) => format!("{stem}{EXT_SEPARATOR}{rest}"),
        None => folder.to_string(),
    }
}

/// Extension part of a display name: everything after the first `.`, if any.
pub fn display_extension(display: &str) -> Option<&str> {
    display.split_once(EXT_SEPARATOR).map(|(_, rest)| rest)
}

/// Parse the version number out of a blob file name (`"3.pdf"` → 3,
/// `"7"` → 7). Returns `None` for entries that are not version blobs,
/// such as the change-note log.
pub fn version_stem(blob_name: &str) -> Option<u64> {
    let stem = blob_name
        .split_once(EXT_SEPARATOR)
        .map_or(blob_name, |(stem, _)| stem);
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_names() {
        assert!(is_valid_room_name("teamalpha"));
        assert!(is_valid_room_name("room_42"));
        assert!(!is_valid_room_name(""));
        assert!(!is_valid_room_name("two words"));
        assert!(!is_valid_room_name("dash-name"));
        assert!(!is_valid_room_name("sneaky/../path"));
    }

    #[test]
    fn encode_decode_round_trip() {
        for display in ["report.pdf", "notes", "logs.tar.gz"] {
            let folder = encode_display_name(display).unwrap();
            assert!(!folder.contains('.') || display.matches('.').count() > 1);
            assert_eq!(decode_folder_name(&folder), display);
        }
    }

    #[test]
    fn encode_keeps_later_dots() {
        assert_eq!(encode_display_name("logs.tar.gz").unwrap(), "logs-tar.gz");
    }

    #[test]
    fn encode_rejects_separator_collision() {
        assert!(encode_display_name("my-file.pdf").is_err());
        assert!(encode_display_name("").is_err());
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(display_extension("report.pdf"), Some("pdf"));
        assert_eq!(display_extension("logs.tar.gz"), Some("tar.gz"));
        assert_eq!(display_extension("noext"), None);
    }

    #[test]
    fn version_stems() {
        assert_eq!(version_stem("3.pdf"), Some(3));
        assert_eq!(version_stem("7"), Some(7));
        assert_eq!(version_stem("12.tar.gz"), Some(12));
        assert_eq!(version_stem("VersionInfo"), None);
        assert_eq!(version_stem("notes.pdf"), None);
    }
}
