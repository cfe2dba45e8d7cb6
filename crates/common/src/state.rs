//! Save-state decoding seam.
//!
//! The full circuit-save body format is an external concern; the packager
//! only ever needs a schematic's identifier and its dependency list. Both
//! live in the fixed header that precedes the body, and [`HeaderStateParser`]
//! decodes exactly that. Anything that can produce a [`SaveState`] from raw
//! bytes can be slotted in behind the [`StateParser`] trait instead.

use crate::ComponentId;

/// Errors from save-state decoding.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("save data truncated: need at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Parsed save header of a component or architecture schematic.
///
/// The original save data is a free-form record; this is the defined subset
/// the packager relies on. A missing field is a [`StateError`] at parse time,
/// never a lookup failure later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveState {
    /// The schematic's self-declared identifier (its save version field).
    pub id: ComponentId,
    /// Identifiers of the components this schematic places, in declaration
    /// order.
    pub dependencies: Vec<ComponentId>,
}

/// Decodes a schematic's raw save bytes into a [`SaveState`].
pub trait StateParser {
    fn parse_state(&self, bytes: &[u8]) -> Result<SaveState, StateError>;
}

/// Decoder for the fixed little-endian save header.
///
/// Layout: identifier (`i64`), dependency count (`u16`), then one `i64` per
/// dependency. The body that follows is ignored.
pub struct HeaderStateParser;

impl StateParser for HeaderStateParser {
    fn parse_state(&self, bytes: &[u8]) -> Result<SaveState, StateError> {
        const HEADER_LEN: usize = 10;

        if bytes.len() < HEADER_LEN {
            return Err(StateError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let id = read_i64(&bytes[0..8]);
        let count = read_u16(&bytes[8..10]) as usize;

        let deps_end = HEADER_LEN + count * 8;
        if bytes.len() < deps_end {
            return Err(StateError::Truncated {
                expected: deps_end,
                actual: bytes.len(),
            });
        }

        let mut dependencies = Vec::with_capacity(count);
        for chunk in bytes[HEADER_LEN..deps_end].chunks_exact(8) {
            dependencies.push(read_i64(chunk));
        }

        Ok(SaveState { id, dependencies })
    }
}

/// Little-endian `i64` from an exactly-8-byte slice. Panics on a length
/// mismatch: a wrong slice here is a caller bug, not a decode of id 0.
fn read_i64(bytes: &[u8]) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    i64::from_le_bytes(buf)
}

/// Little-endian `u16` from an exactly-2-byte slice.
fn read_u16(bytes: &[u8]) -> u16 {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(bytes);
    u16::from_le_bytes(buf)
}
