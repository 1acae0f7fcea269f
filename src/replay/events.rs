//! Note, wall, height and pause events.

use crate::util::Vec3;

/// How a note was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteEventType {
    Good = 0,
    Bad = 1,
    Miss = 2,
    Bomb = 3,
}

impl NoteEventType {
    /// Map a wire value to an event type.
    pub const fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Good),
            1 => Some(Self::Bad),
            2 => Some(Self::Miss),
            3 => Some(Self::Bomb),
            _ => None,
        }
    }

    /// Good and bad cuts carry a [`CutInfo`] record on the wire.
    #[inline]
    pub const fn has_cut_info(self) -> bool {
        matches!(self, Self::Good | Self::Bad)
    }
}

/// Saber kinematics and cut-quality metrics at the moment of a cut.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CutInfo {
    pub speed_ok: bool,
    pub direction_ok: bool,
    pub saber_type_ok: bool,
    pub was_cut_too_soon: bool,
    pub saber_speed: f32,
    pub saber_dir: Vec3,
    pub saber_type: i32,
    pub time_deviation: f32,
    pub cut_dir_deviation: f32,
    pub cut_point: Vec3,
    pub cut_normal: Vec3,
    pub cut_distance_to_center: f32,
    pub cut_angle: f32,
    pub before_cut_rating: f32,
    pub after_cut_rating: f32,
}

impl CutInfo {
    /// All per-cut checks passed.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.speed_ok && self.direction_ok && self.saber_type_ok && !self.was_cut_too_soon
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    pub note_id: i32,
    pub event_time: f32,
    pub spawn_time: f32,
    pub event_type: NoteEventType,
    pub cut: Option<CutInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallEvent {
    pub wall_id: i32,
    /// Player energy when the wall was hit.
    pub energy: f32,
    pub time: f32,
    pub spawn_time: f32,
}

/// Automatic player height change (headset recentering).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightEvent {
    pub height: f32,
    pub time: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PauseEvent {
    /// Pause length in whole seconds.
    pub duration: i64,
    pub time: f32,
}
