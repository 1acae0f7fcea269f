//! Error types for the replay decoder.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::wire::SectionKind;

/// Which part of the file header failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
    /// The leading i32 was not the replay magic.
    Magic(i32),
    /// The version byte is not one this decoder understands.
    Version(u8),
}

impl fmt::Display for HeaderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Magic(m) => write!(f, "bad magic 0x{:08X}", *m as u32),
            Self::Version(v) => write!(f, "unsupported version {}", v),
        }
    }
}

/// Main error type for decode operations.
///
/// Every variant is fatal: a decode that produces one of these returns no
/// session at all.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Magic or version mismatch
    #[error("Invalid replay header: {0}")]
    InvalidHeader(HeaderFault),

    /// Input ended in the middle of a field
    #[error("Replay truncated at offset {offset}: needed {needed} more byte(s)")]
    Truncated { offset: u64, needed: usize },

    /// Section tag outside the known range
    #[error("Unknown section tag {tag} at offset {offset}")]
    UnknownSection { tag: u8, offset: u64 },

    /// The first section was not the info block
    #[error("Replay has no leading info section (found {})", .found.map_or("end of input".to_string(), |t| format!("tag {t}")))]
    MissingInfo { found: Option<u8> },

    /// A section tag appeared more than once
    #[error("Section {0:?} appears more than once")]
    DuplicateSection(SectionKind),

    /// Note record with an event type outside good/bad/miss/bomb
    #[error("Unknown note event type {value} at offset {offset}")]
    UnknownNoteEvent { value: i32, offset: u64 },

    /// String length fallback gave up
    #[error("Could not recover string length at offset {offset} after {attempts} attempt(s)")]
    StringRecoveryExhausted { offset: u64, attempts: u32 },

    /// Decode was cancelled through a [`crate::CancelHandle`]
    #[error("Decode cancelled")]
    Cancelled,

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a truncation error.
    pub fn truncated(offset: u64, needed: usize) -> Self {
        Self::Truncated { offset, needed }
    }

    /// True for errors that mean "more bytes would have helped".
    #[inline]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// True for magic/version mismatches.
    #[inline]
    pub fn is_invalid_header(&self) -> bool {
        matches!(self, Self::InvalidHeader(_))
    }
}

/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::InvalidHeader(HeaderFault::Magic(0));
        assert!(e.to_string().contains("magic"));
        assert!(e.to_string().contains("0x00000000"));

        let e = Error::truncated(42, 3);
        assert!(e.to_string().contains("42"));
        assert!(e.to_string().contains("3"));
        assert!(e.is_truncated());

        let e = Error::MissingInfo { found: None };
        assert!(e.to_string().contains("end of input"));
        let e = Error::MissingInfo { found: Some(2) };
        assert!(e.to_string().contains("tag 2"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_invalid_header());
    }
}
