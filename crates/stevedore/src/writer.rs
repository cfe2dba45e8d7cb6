//! Write-once zip assembly with cleanup on failure.

use crate::{ArchiveError, ArchivePlan};
use std::fs::File;
use std::io;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Policy knobs shared by every archive build in one invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveOptions {
    /// Archive zero-length files instead of skipping them.
    pub include_empty_files: bool,
    /// 0 = silent, 1 = list archived paths, 2 = also list skipped files.
    pub verbosity: u8,
}

/// Writes every planned entry into the output zip.
///
/// Transactional from the caller's perspective: on the first failing entry
/// the writer is dropped (closing the handle) and the partially-written
/// output file is deleted before the error propagates. A zero-length source
/// is skipped unless [`ArchiveOptions::include_empty_files`] is set — a
/// policy decision, not an error.
pub fn write_archive(plan: &ArchivePlan, options: &ArchiveOptions) -> Result<(), ArchiveError> {
    let result = write_entries(plan, options);
    if result.is_err() {
        std::fs::remove_file(&plan.output_path).ok();
    }
    result
}

fn write_entries(plan: &ArchivePlan, options: &ArchiveOptions) -> Result<(), ArchiveError> {
    let file = File::create(&plan.output_path)?;
    let mut zip = ZipWriter::new(file);
    let file_options = FileOptions::default();

    for entry in &plan.entries {
        if std::fs::metadata(&entry.source)?.len() == 0 {
            if !options.include_empty_files {
                if options.verbosity > 1 {
                    println!("Ignoring empty file {}", entry.archive_path);
                }
                continue;
            }
            if options.verbosity > 1 {
                println!("Including empty file {}", entry.archive_path);
            }
        }
        if options.verbosity > 0 {
            println!("{}", entry.archive_path);
        }

        zip.start_file(entry.archive_path.as_str(), file_options)?;
        let mut source = File::open(&entry.source)?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}
