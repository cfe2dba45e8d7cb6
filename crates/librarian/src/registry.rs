//! Component registry: one walk over the library, one record per component.

use common::{ComponentId, StateError, StateParser, CIRCUIT_FILE};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors from registry construction.
///
/// A registry is all-or-nothing: any unreadable or unparsable component
/// fails the whole build, because a silently skipped entry would produce an
/// incomplete dependency graph downstream.
#[derive(Debug, thiserror::Error)]
pub enum LibrarianError {
    #[error("component library not found: {0}")]
    LibraryNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse component save {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: StateError,
    },
    #[error("duplicate component id {id}: declared by both {first} and {second}")]
    DuplicateComponent {
        id: ComponentId,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One component in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    pub id: ComponentId,
    /// The component's circuit-data file.
    pub source_path: PathBuf,
    /// Identifiers of the components this component itself places, in
    /// declaration order.
    pub dependencies: Vec<ComponentId>,
}

/// Identifier-keyed component lookup table.
///
/// Built once per invocation and read-only afterwards; shared by reference
/// across every architecture build in the same run.
#[derive(Debug, Default)]
pub struct Registry {
    components: HashMap<ComponentId, ComponentRecord>,
}

impl Registry {
    pub fn get(&self, id: ComponentId) -> Option<&ComponentRecord> {
        self.components.get(&id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Builds the registry by walking `library_dir` for circuit-data files and
/// parsing each one's save header.
///
/// `progress(done, total)` is invoked after each component is indexed; it is
/// purely observational and a no-op closure changes nothing about the
/// result.
///
/// # Errors
/// - [`LibrarianError::LibraryNotFound`] if `library_dir` is not a directory.
/// - [`LibrarianError::Parse`] on the first malformed save file.
/// - [`LibrarianError::DuplicateComponent`] when two files declare the same
///   identifier; neither wins, the build fails.
pub fn build_registry(
    library_dir: &Path,
    parser: &dyn StateParser,
    mut progress: impl FnMut(usize, usize),
) -> Result<Registry, LibrarianError> {
    if !library_dir.is_dir() {
        return Err(LibrarianError::LibraryNotFound(library_dir.to_path_buf()));
    }

    let paths = walk_circuit_files(library_dir)?;
    let total = paths.len();

    let mut registry = Registry::default();
    for (idx, path) in paths.into_iter().enumerate() {
        let bytes = std::fs::read(&path)?;
        let state = parser
            .parse_state(&bytes)
            .map_err(|source| LibrarianError::Parse {
                path: path.clone(),
                source,
            })?;

        if let Some(existing) = registry.components.get(&state.id) {
            return Err(LibrarianError::DuplicateComponent {
                id: state.id,
                first: existing.source_path.clone(),
                second: path,
            });
        }

        registry.components.insert(
            state.id,
            ComponentRecord {
                id: state.id,
                source_path: path,
                dependencies: state.dependencies,
            },
        );
        progress(idx + 1, total);
    }

    Ok(registry)
}

/// Walks a directory for files named `circuit.data`, sorted for a stable
/// indexing order.
fn walk_circuit_files(root: &Path) -> Result<Vec<PathBuf>, LibrarianError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| LibrarianError::Io(e.into()))?;
        let path = entry.path();
        if path.is_file() && path.file_name().and_then(|s| s.to_str()) == Some(CIRCUIT_FILE) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
