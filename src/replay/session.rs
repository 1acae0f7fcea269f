//! Decoded replay aggregate.

use super::events::*;
use super::frame::Frame;
use super::info::ReplayInfo;

/// A fully decoded replay.
///
/// Frames are strictly time-ascending with no zero-time entries; every other
/// sequence is kept in stream order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplaySession {
    pub info: ReplayInfo,
    pub frames: Vec<Frame>,
    pub notes: Vec<NoteEvent>,
    pub walls: Vec<WallEvent>,
    pub heights: Vec<HeightEvent>,
    pub pauses: Vec<PauseEvent>,
}

/// Summary numbers over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplayStats {
    pub frames: usize,
    pub good_cuts: usize,
    pub bad_cuts: usize,
    pub misses: usize,
    pub bomb_hits: usize,
    pub wall_hits: usize,
    pub pauses: usize,
    /// Sum of pause durations in seconds, saturating.
    pub paused_seconds: i64,
    pub average_fps: f32,
    pub duration: f32,
}

impl ReplayStats {
    /// No bad cuts, misses, bombs or walls.
    #[inline]
    pub fn full_combo(&self) -> bool {
        self.bad_cuts == 0 && self.misses == 0 && self.bomb_hits == 0 && self.wall_hits == 0
    }
}

impl ReplaySession {
    /// Time of the last frame, or 0 for a replay without frames.
    pub fn duration(&self) -> f32 {
        self.frames.last().map_or(0.0, |f| f.time)
    }

    /// Index of the last frame at or before `time`.
    pub fn frame_index_at(&self, time: f32) -> Option<usize> {
        let idx = self.frames.partition_point(|f| f.time <= time);
        idx.checked_sub(1)
    }

    /// Interpolated poses at song time `time`, clamped to the recorded range.
    pub fn pose_at(&self, time: f32) -> Option<Frame> {
        let first = self.frames.first()?;
        let Some(idx) = self.frame_index_at(time) else {
            return Some(*first);
        };
        let current = &self.frames[idx];
        match self.frames.get(idx + 1) {
            Some(next) => Some(current.interpolate(next, time)),
            None => Some(*current),
        }
    }

    pub fn stats(&self) -> ReplayStats {
        let mut stats = ReplayStats {
            frames: self.frames.len(),
            wall_hits: self.walls.len(),
            pauses: self.pauses.len(),
            paused_seconds: self
                .pauses
                .iter()
                .fold(0i64, |acc, p| acc.saturating_add(p.duration)),
            duration: self.duration(),
            ..Default::default()
        };

        for note in &self.notes {
            match note.event_type {
                NoteEventType::Good => stats.good_cuts += 1,
                NoteEventType::Bad => stats.bad_cuts += 1,
                NoteEventType::Miss => stats.misses += 1,
                NoteEventType::Bomb => stats.bomb_hits += 1,
            }
        }

        if !self.frames.is_empty() {
            let total: i64 = self.frames.iter().map(|f| i64::from(f.fps)).sum();
            stats.average_fps = total as f32 / self.frames.len() as f32;
        }

        stats
    }
}
