//! Archive layout planning.
//!
//! All member names are rendered relative to the save root's *parent*
//! directory, so an extracted archive reproduces the save tree under a
//! single top-level folder named after the save root.

use crate::ArchiveError;
use common::{
    rel_archive_path, PathError, ASSEMBLY_EXT, ASSEMBLY_FILE, CIRCUIT_FILE,
    INSTRUCTION_RULES_FILE,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One file scheduled for archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub source: PathBuf,
    /// `/`-separated member name, always relative.
    pub archive_path: String,
}

/// A fully computed archive: constructed fresh per build, consumed once by
/// [`crate::write_archive`], then discarded.
#[derive(Debug)]
pub struct ArchivePlan {
    pub output_path: PathBuf,
    /// Root files first, closure files after, in resolver order.
    pub entries: Vec<PlanEntry>,
}

/// Plans an architecture archive.
///
/// Root files are the architecture's own `circuit.data`, `assembly.data`,
/// every `*.assembly` program beneath its directory, and
/// `instruction_rules.data` when present. `closure_sources` are the
/// component files computed by the dependency closure, in resolver order;
/// each is remapped under
/// `schematics/component_factory/<architecture>/<path relative to the
/// component factory>`, so the same component referenced by two different
/// architectures never collides in the archive namespace.
pub fn plan_architecture(
    base: &Path,
    architecture: &str,
    closure_sources: &[PathBuf],
    output_path: PathBuf,
) -> Result<ArchivePlan, ArchiveError> {
    let parent = base.parent().unwrap_or(base);
    let arch_dir = base
        .join("schematics")
        .join("architecture")
        .join(architecture);
    let factory = base.join("schematics").join("component_factory");

    let mut sources = vec![arch_dir.join(CIRCUIT_FILE), arch_dir.join(ASSEMBLY_FILE)];
    sources.extend(walk_by_extension(&arch_dir, ASSEMBLY_EXT)?);
    let rules = arch_dir.join(INSTRUCTION_RULES_FILE);
    if rules.exists() {
        sources.push(rules);
    }

    let mut entries = Vec::with_capacity(sources.len() + closure_sources.len());
    for source in sources {
        entries.push(PlanEntry {
            archive_path: rel_archive_path(&source, parent)?,
            source,
        });
    }

    for source in closure_sources {
        let in_factory =
            source
                .strip_prefix(&factory)
                .map_err(|_| PathError::OutsideBase {
                    file: source.clone(),
                    base: factory.clone(),
                })?;
        let mapped = factory.join(architecture).join(in_factory);
        entries.push(PlanEntry {
            archive_path: rel_archive_path(&mapped, parent)?,
            source: source.clone(),
        });
    }

    Ok(ArchivePlan {
        output_path,
        entries,
    })
}

/// Plans a level archive: every circuit-data file beneath the level's
/// directory, verbatim. Levels have no component graph, so no closure is
/// involved.
pub fn plan_level(
    base: &Path,
    level: &str,
    output_path: PathBuf,
) -> Result<ArchivePlan, ArchiveError> {
    let parent = base.parent().unwrap_or(base);
    let level_dir = base.join("schematics").join(level);

    let mut entries = Vec::new();
    for entry in WalkDir::new(&level_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Io(e.into()))?;
        let path = entry.path();
        if path.is_file() && path.file_name().and_then(|s| s.to_str()) == Some(CIRCUIT_FILE) {
            entries.push(PlanEntry {
                archive_path: rel_archive_path(path, parent)?,
                source: path.to_path_buf(),
            });
        }
    }

    Ok(ArchivePlan {
        output_path,
        entries,
    })
}

/// Walks a directory for files with the given extension, sorted for stable
/// plan order.
fn walk_by_extension(root: &Path, ext: &str) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Io(e.into()))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(ext) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
