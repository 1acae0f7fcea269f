//! Replay format constants and section tags.

/// Magic i32 at the start of every replay (little-endian on the wire).
pub const BSOR_MAGIC: i32 = 0x442D_3D69;

/// The only format version this decoder accepts.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the file header in bytes (magic + version).
pub const HEADER_SIZE: usize = 5;

/// Number of section tags a version-1 file may carry, Info included.
pub const SECTION_COUNT: usize = 6;

/// Default upper bound for a string length prefix.
pub const DEFAULT_STRING_CEILING: usize = 300;

/// Default upper bound for the player-name length prefix.
pub const DEFAULT_NAME_CEILING: usize = 1000;

/// Default cap on nested string-length recoveries.
pub const DEFAULT_MAX_STRING_RECOVERIES: u32 = 16;

/// i32 words that terminate the legacy player-name scan.
///
/// They are the length prefixes of the platform identifiers that always
/// follow the name: `steam` (5), `oculus` (6) and `oculuspc` (8).
pub const NAME_SCAN_SENTINELS: [i32; 3] = [6, 5, 8];

/// Wire size of a vec3 (3 x f32).
pub const VEC3_SIZE: usize = 12;

/// Wire size of a quaternion (4 x f32).
pub const QUAT_SIZE: usize = 16;

/// Wire size of one pose (position + rotation).
pub const POSE_SIZE: usize = VEC3_SIZE + QUAT_SIZE;

/// Wire size of one frame record.
pub const FRAME_RECORD_SIZE: usize = 4 + 4 + 3 * POSE_SIZE;

/// Wire size of a note record without cut info.
pub const NOTE_RECORD_MIN_SIZE: usize = 16;

/// Wire size of one wall record.
pub const WALL_RECORD_SIZE: usize = 16;

/// Wire size of one height record.
pub const HEIGHT_RECORD_SIZE: usize = 8;

/// Wire size of one pause record.
pub const PAUSE_RECORD_SIZE: usize = 12;

/// Upper identifier bound for the bomb reclassification rule.
pub const BOMB_ID_LIMIT: i32 = 100_000;

/// Amount added to the identifier of a reclassified bomb.
pub const BOMB_ID_SHIFT: i32 = 4;

/// Top-level section tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionKind {
    Info = 0,
    Frames = 1,
    Notes = 2,
    Walls = 3,
    Heights = 4,
    Pauses = 5,
}

impl SectionKind {
    /// All section kinds in tag order.
    pub const ALL: [SectionKind; SECTION_COUNT] = [
        Self::Info,
        Self::Frames,
        Self::Notes,
        Self::Walls,
        Self::Heights,
        Self::Pauses,
    ];

    /// Map a wire tag to a section kind.
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Info),
            1 => Some(Self::Frames),
            2 => Some(Self::Notes),
            3 => Some(Self::Walls),
            4 => Some(Self::Heights),
            5 => Some(Self::Pauses),
            _ => None,
        }
    }

    /// Wire tag of this section.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Fixed record size, or `None` for info (positional) and notes
    /// (variable, cut info is optional).
    #[inline]
    pub const fn record_size(self) -> Option<usize> {
        match self {
            Self::Info | Self::Notes => None,
            Self::Frames => Some(FRAME_RECORD_SIZE),
            Self::Walls => Some(WALL_RECORD_SIZE),
            Self::Heights => Some(HEIGHT_RECORD_SIZE),
            Self::Pauses => Some(PAUSE_RECORD_SIZE),
        }
    }

    /// Smallest possible record of this section (used to clamp
    /// preallocation against hostile counts).
    #[inline]
    pub const fn min_record_size(self) -> usize {
        match self.record_size() {
            Some(size) => size,
            None => NOTE_RECORD_MIN_SIZE,
        }
    }
}

/// Check whether a decoded note identifier is actually a bomb.
///
/// The producer shares one identifier space between notes and bombs; ids of
/// -1, and ids in `[0, 100000)` ending in 9, belong to bombs.
#[inline]
pub const fn is_bomb_id(note_id: i32) -> bool {
    note_id == -1 || (note_id >= 0 && note_id < BOMB_ID_LIMIT && note_id % 10 == 9)
}
