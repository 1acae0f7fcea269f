//! Decoder configuration.

use super::format::*;

/// Tunables shared by the buffer and streaming decoders.
///
/// Both decoders must be given the same options to produce identical
/// sessions from identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    /// Largest string length prefix accepted before the fallback kicks in.
    pub string_ceiling: usize,
    /// Largest player-name length prefix accepted as-is.
    pub name_ceiling: usize,
    /// Nested string-length recoveries allowed before giving up.
    pub max_string_recoveries: u32,
    /// Scan past the declared player-name length for the next field.
    pub legacy_name_scan: bool,
    /// Starting size of the streaming scratch buffer.
    pub stream_initial_capacity: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            string_ceiling: DEFAULT_STRING_CEILING,
            name_ceiling: DEFAULT_NAME_CEILING,
            max_string_recoveries: DEFAULT_MAX_STRING_RECOVERIES,
            legacy_name_scan: true,
            stream_initial_capacity: 8 * 1024,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string_ceiling(mut self, ceiling: usize) -> Self {
        self.string_ceiling = ceiling;
        self
    }

    pub fn name_ceiling(mut self, ceiling: usize) -> Self {
        self.name_ceiling = ceiling;
        self
    }

    pub fn max_string_recoveries(mut self, attempts: u32) -> Self {
        self.max_string_recoveries = attempts;
        self
    }

    pub fn legacy_name_scan(mut self, enabled: bool) -> Self {
        self.legacy_name_scan = enabled;
        self
    }

    /// Zero is bumped to one byte so doubling always makes progress.
    pub fn stream_initial_capacity(mut self, bytes: usize) -> Self {
        self.stream_initial_capacity = bytes.max(1);
        self
    }
}
