//! # The Librarian: component registry & dependency closure
//!
//! **Role**: knows every reusable component in the library and can answer,
//! for an architecture's declared dependency list, the complete deduplicated
//! set of component files it transitively requires.
//!
//! Two-step pipeline:
//! 1. **Registry build**: walk the component library once, parse every save
//!    header, index records by identifier ([`registry`]).
//! 2. **Closure resolution**: depth-first walk over the registry from an
//!    architecture's root dependency list ([`closure`]).

pub mod closure;
pub mod registry;

pub use closure::{resolve_closure, ClosureError, Requirer};
pub use registry::{build_registry, ComponentRecord, LibrarianError, Registry};
