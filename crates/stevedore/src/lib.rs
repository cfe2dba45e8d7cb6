//! # The Stevedore: archive planning & write-once assembly
//!
//! **Role**: turns a set of schematic files into a single portable zip with
//! all-or-nothing semantics — the output either exists complete or not at
//! all.
//!
//! Split in two so the layout decisions stay testable without touching a
//! zip writer:
//! - [`plan`] computes every (source file, archive member name) pair;
//! - [`writer`] consumes a plan once and deletes the partial output on any
//!   failure.
//!
//! The closure file list arrives as plain paths in resolver order, keeping
//! this crate independent of `librarian`.

pub mod plan;
pub mod writer;

pub use plan::{plan_architecture, plan_level, ArchivePlan, PlanEntry};
pub use writer::{write_archive, ArchiveOptions};

/// Errors from archive planning or assembly.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Path(#[from] common::PathError),
}
