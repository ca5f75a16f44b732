//! Path helpers for the data directory.
//!
//! The data directory holds the JSON store and, when enabled, the log files.
//! It is chosen in this order: an explicit `data_dir` from configuration, the
//! platform data directory (`~/.local/share/ratelist` on Linux), and finally
//! `./.ratelist` when the platform reports none.

use std::path::{Path, PathBuf};

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "ratelist";

/// Fallback directory when no platform data directory exists.
const LOCAL_FALLBACK_DIR: &str = ".ratelist";

/// File name of the JSON key-value store.
pub const STORE_FILE_NAME: &str = "store.json";

/// Returns the data directory, honouring an explicit override.
///
/// # Examples
///
/// ```
/// use ratelist::infrastructure::get_data_dir;
/// use std::path::{Path, PathBuf};
///
/// let dir = get_data_dir(Some(Path::new("/srv/ratelist")));
/// assert_eq!(dir, PathBuf::from("/srv/ratelist"));
/// ```
#[must_use]
pub fn get_data_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return expand_tilde(dir);
    }
    dirs::data_dir().map_or_else(|| PathBuf::from(LOCAL_FALLBACK_DIR), |base| base.join(APP_DIR_NAME))
}

/// Path of the JSON store inside `data_dir`.
#[must_use]
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and every path when the home directory is
/// unknown, are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}
