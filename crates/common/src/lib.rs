//! Shared record types, the save-state parser seam, and path helpers.
//!
//! Everything downstream (`librarian`, `stevedore`, the CLI) speaks in the
//! types defined here so that the parser and the archive layout stay
//! decoupled from each other.

pub mod paths;
pub mod state;

pub use paths::{rel_archive_path, PathError};
pub use state::{HeaderStateParser, SaveState, StateError, StateParser};

/// Self-declared numeric identifier of a saved schematic.
///
/// Sourced from a component's own save header and reused as a foreign key by
/// every architecture or component that depends on it. Unique within one
/// registry build; never persisted across runs.
pub type ComponentId = i64;

/// Filename of a schematic's circuit data. Discovery matches on this exact
/// name, never on extension.
pub const CIRCUIT_FILE: &str = "circuit.data";

/// Filename of an architecture's assembly program data.
pub const ASSEMBLY_FILE: &str = "assembly.data";

/// Filename of an architecture's instruction rules, present only for
/// architectures that define a custom instruction set.
pub const INSTRUCTION_RULES_FILE: &str = "instruction_rules.data";

/// Extension of auxiliary assembly program files archived alongside an
/// architecture.
pub const ASSEMBLY_EXT: &str = "assembly";
