//! qrpulse storage conventions.
//!
//! Pure functions mapping storage concepts to filesystem paths. The root
//! comes from `QRPULSE_ROOT`, falling back to `~/.qrpulse`.

use std::path::PathBuf;

/// Environment variable overriding the storage root.
pub const ROOT_ENV: &str = "QRPULSE_ROOT";

/// Directory name under `$HOME` when no override is set.
pub const DEFAULT_DIR: &str = ".qrpulse";

/// File name of the persisted history.
pub const HISTORY_FILE: &str = "qr-pulse-history.json";

/// Storage root: `$QRPULSE_ROOT`, else `$HOME/.qrpulse`, else `./.qrpulse`.
pub fn root() -> PathBuf {
    if let Some(dir) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(DEFAULT_DIR)
}

pub fn history_path() -> PathBuf {
    root().join(HISTORY_FILE)
}
