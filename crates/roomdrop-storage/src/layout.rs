//! Room storage layout.
//!
//! All paths are relative to the storage provider root:
//!
//! ```text
//! rooms.txt                         room registry, one line per room
//! rooms/<room>/                     a room's directory
//! rooms/<room>/msg-<ts>.txt         messages
//! rooms/<room>/<folder>/<n>.<ext>   version blobs
//! rooms/<room>/<folder>/VersionInfo change-note log
//! rooms/<room>/<batch>.tar.gz       materialized archives
//! _staging/<room>/<batch>/<file>    archive staging area
//! ```
//!
//! Rooms live under `rooms/` so a room can never collide with the registry
//! file or the staging area, whatever its name.

/// Registry file at the storage root.
pub const REGISTRY_FILE: &str = "rooms.txt";

/// Directory containing all room directories.
pub const ROOMS_DIR: &str = "rooms";

/// Directory containing archive staging areas.
pub const STAGING_DIR: &str = "_staging";

/// Change-note log file name inside each version folder.
pub const VERSION_LOG_FILE: &str = "VersionInfo";

/// Prefix for message files inside a room directory.
pub const MESSAGE_PREFIX: &str = "msg-";

/// A room's directory.
pub fn room_dir(room: &str) -> String {
    format!("{ROOMS_DIR}/{room}")
}

/// An entry directly inside a room's directory.
pub fn room_entry(room: &str, name: &str) -> String {
    format!("{ROOMS_DIR}/{room}/{name}")
}

/// A versioned file's folder inside a room.
pub fn version_dir(room: &str, folder: &str) -> String {
    format!("{ROOMS_DIR}/{room}/{folder}")
}

/// A version blob inside a version folder.
pub fn version_blob(room: &str, folder: &str, blob: &str) -> String {
    format!("{ROOMS_DIR}/{room}/{folder}/{blob}")
}

/// The change-note log of a version folder.
pub fn version_log(room: &str, folder: &str) -> String {
    format!("{ROOMS_DIR}/{room}/{folder}/{VERSION_LOG_FILE}")
}

/// The staging directory for an archive batch.
pub fn staging_dir(room: &str, batch: &str) -> String {
    format!("{STAGING_DIR}/{room}/{batch}")
}

/// A staged file within an archive batch.
pub fn staging_file(room: &str, batch: &str, file: &str) -> String {
    format!("{STAGING_DIR}/{room}/{batch}/{file}")
}

/// The materialized archive for a batch, inside the room directory.
pub fn archive_file(room: &str, batch: &str) -> String {
    format!("{ROOMS_DIR}/{room}/{batch}.tar.gz")
}

/// File name of a version blob: the number plus the display extension.
pub fn version_blob_name(version: u64, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{version}.{ext}"),
        None => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_room_scoped() {
        assert_eq!(room_dir("alpha"), "rooms/alpha");
        assert_eq!(version_log("alpha", "report-pdf"), "rooms/alpha/report-pdf/VersionInfo");
        assert_eq!(staging_file("alpha", "bundle", "a.txt"), "_staging/alpha/bundle/a.txt");
        assert_eq!(archive_file("alpha", "bundle"), "rooms/alpha/bundle.tar.gz");
    }

    #[test]
    fn blob_names() {
        assert_eq!(version_blob_name(3, Some("pdf")), "3.pdf");
        assert_eq!(version_blob_name(7, None), "7");
        assert_eq!(version_blob_name(1, Some("tar.gz")), "1.tar.gz");
    }
}
