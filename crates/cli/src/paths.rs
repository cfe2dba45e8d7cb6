//! Save-root discovery.
//!
//! Thin platform adapter: the rest of the workspace only ever sees the
//! single resolved base directory this module returns.

use std::path::PathBuf;

/// The game's user-data directory, relative to the platform data root.
const USERDATA: &str = "app_userdata/Turing Complete";

#[derive(Debug, thiserror::Error)]
pub enum SaveRootError {
    #[error("save directory not found (searched: {0:?})")]
    NotFound(Vec<PathBuf>),
}

/// Locates the game's save-data root.
///
/// Fatal at startup when absent; no archive is attempted without it.
pub fn save_root() -> Result<PathBuf, SaveRootError> {
    let candidates = candidates();
    candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .ok_or(SaveRootError::NotFound(candidates))
}

fn candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();

    if cfg!(target_os = "windows") {
        // %APPDATA%\Godot\app_userdata\Turing Complete
        if let Some(config) = dirs::config_dir() {
            out.push(config.join("Godot").join(USERDATA));
        }
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/Godot/app_userdata/Turing Complete
        if let Some(data) = dirs::data_dir() {
            out.push(data.join("Godot").join(USERDATA));
        }
    } else {
        // ~/.local/share/godot/app_userdata/Turing Complete
        if let Some(data) = dirs::data_dir() {
            out.push(data.join("godot").join(USERDATA));
        }
        // WSL: the Windows-side save tree mounted under /mnt/c.
        if let Ok(user) = std::env::var("USER") {
            out.push(PathBuf::from(format!(
                "/mnt/c/Users/{user}/AppData/Roaming/godot/{USERDATA}"
            )));
        }
    }

    out
}
