//! Archive-path rendering.

use std::path::{Component, Path};

/// Errors from archive-path rendering.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("{file} is not under the base directory {base}")]
    OutsideBase {
        file: std::path::PathBuf,
        base: std::path::PathBuf,
    },
    #[error("archive path escapes the archive root: {0}")]
    Escapes(std::path::PathBuf),
    #[error("non-UTF-8 path: {0}")]
    NonUtf8(std::path::PathBuf),
}

/// Renders `file` relative to `base` as an archive member name.
///
/// Member names are always `/`-separated and strictly relative: no drive
/// prefix, no root, no `..` segments. Windows `\\?\` prefixes are stripped
/// via `dunce` before the prefix comparison.
pub fn rel_archive_path(file: &Path, base: &Path) -> Result<String, PathError> {
    let file = dunce::simplified(file);
    let base = dunce::simplified(base);

    let rel = file.strip_prefix(base).map_err(|_| PathError::OutsideBase {
        file: file.to_path_buf(),
        base: base.to_path_buf(),
    })?;

    let mut parts: Vec<&str> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(seg) => {
                parts.push(seg.to_str().ok_or_else(|| PathError::NonUtf8(file.to_path_buf()))?)
            }
            Component::CurDir => {}
            _ => return Err(PathError::Escapes(rel.to_path_buf())),
        }
    }

    Ok(parts.join("/"))
}
