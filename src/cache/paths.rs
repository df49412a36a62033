// Cache path utilities.
// Resolves platform directories for the shop snapshot and persisted sign-in state.

use std::path::PathBuf;

use directories::ProjectDirs;

/// File name of the shop snapshot.
pub const SHOPS_CACHE_FILE: &str = "Honey_shops_cache.json";

/// File name of the persisted sign-in fields.
pub const AUTH_STATE_FILE: &str = "auth.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "honeyshops")
}

/// Get the base cache directory (~/.cache/honeyshops on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the base data directory, which survives cache cleanup.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the shop snapshot.
pub fn shops_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(SHOPS_CACHE_FILE))
}

/// Path to the persisted sign-in fields.
pub fn auth_state_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(AUTH_STATE_FILE))
}
