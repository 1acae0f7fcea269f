//! Replay metadata block.

/// Everything the replay records about the player, the map and the run.
///
/// Always the first section of a replay.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplayInfo {
    /// Version of the recording mod.
    pub version: String,
    pub game_version: String,
    /// Unix timestamp, stored as text by the producer.
    pub timestamp: String,

    pub player_id: String,
    pub player_name: String,
    pub platform: String,

    pub tracking_system: String,
    pub hmd: String,
    pub controller: String,

    /// Map hash.
    pub hash: String,
    pub song_name: String,
    pub mapper: String,
    pub difficulty: String,

    pub score: i32,
    pub mode: String,
    pub environment: String,
    /// Comma-separated modifier codes.
    pub modifiers: String,
    pub jump_distance: f32,
    pub left_handed: bool,
    pub height: f32,

    /// Song time the run started at.
    pub start_time: f32,
    /// Song time of the fail, `0.0` when the run was not failed.
    pub fail_time: f32,
    pub speed: f32,
}

impl ReplayInfo {
    /// Modifier codes, trimmed, empty entries removed.
    pub fn modifier_list(&self) -> Vec<&str> {
        self.modifiers
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// Check for a modifier code (case-insensitive).
    pub fn has_modifier(&self, code: &str) -> bool {
        self.modifier_list()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(code))
    }

    #[inline]
    pub fn failed(&self) -> bool {
        self.fail_time > 0.0
    }
}
