//! Section payload decoders shared by both front-ends.
//!
//! Each `read_*` function decodes exactly one record from a [`ByteReader`].
//! [`BodyBuilder`] owns the per-section sequences and applies the inline
//! post-processing (frame filtering, bomb reclassification) as records are
//! committed, so a record that fails half-way leaves no trace.

use super::format::{SectionKind, BSOR_MAGIC, CURRENT_VERSION, SECTION_COUNT};
use super::options::DecodeOptions;
use super::reader::ByteReader;
use super::recovery::{read_player_name, reclassify_bomb};
use crate::replay::*;
use crate::util::{Error, HeaderFault, Result};

/// Preallocation cap per section; larger sections grow as they decode.
const MAX_PREALLOC: usize = 1 << 16;

/// Validate magic and version. Stops at the first mismatch.
pub fn read_header(r: &mut ByteReader<'_>) -> Result<()> {
    let magic = r.read_i32()?;
    if magic != BSOR_MAGIC {
        return Err(Error::InvalidHeader(HeaderFault::Magic(magic)));
    }
    let version = r.read_u8()?;
    if version != CURRENT_VERSION {
        return Err(Error::InvalidHeader(HeaderFault::Version(version)));
    }
    Ok(())
}

/// The first section must be info; `None` means the input ended first.
pub fn expect_info_tag(tag: Option<u8>) -> Result<()> {
    match tag {
        Some(t) if t == SectionKind::Info.tag() => Ok(()),
        found => Err(Error::MissingInfo { found }),
    }
}

fn read_str(r: &mut ByteReader<'_>, opts: &DecodeOptions) -> Result<String> {
    r.read_string(opts.string_ceiling, opts.max_string_recoveries)
}

/// Decode the info payload (fields are positional, no section length).
pub fn read_info(r: &mut ByteReader<'_>, opts: &DecodeOptions) -> Result<ReplayInfo> {
    Ok(ReplayInfo {
        version: read_str(r, opts)?,
        game_version: read_str(r, opts)?,
        timestamp: read_str(r, opts)?,
        player_id: read_str(r, opts)?,
        player_name: read_player_name(r, opts)?,
        platform: read_str(r, opts)?,
        tracking_system: read_str(r, opts)?,
        hmd: read_str(r, opts)?,
        controller: read_str(r, opts)?,
        hash: read_str(r, opts)?,
        song_name: read_str(r, opts)?,
        mapper: read_str(r, opts)?,
        difficulty: read_str(r, opts)?,
        score: r.read_i32()?,
        mode: read_str(r, opts)?,
        environment: read_str(r, opts)?,
        modifiers: read_str(r, opts)?,
        jump_distance: r.read_f32()?,
        left_handed: r.read_bool()?,
        height: r.read_f32()?,
        start_time: r.read_f32()?,
        fail_time: r.read_f32()?,
        speed: r.read_f32()?,
    })
}

/// Element count at the start of a list section. Negative means empty.
pub fn read_count(r: &mut ByteReader<'_>) -> Result<usize> {
    Ok(r.read_i32()?.max(0) as usize)
}

fn read_pose(r: &mut ByteReader<'_>) -> Result<PoseSample> {
    Ok(PoseSample {
        position: r.read_vec3()?,
        rotation: r.read_quat()?,
    })
}

pub fn read_frame(r: &mut ByteReader<'_>) -> Result<Frame> {
    Ok(Frame {
        time: r.read_f32()?,
        fps: r.read_i32()?,
        head: read_pose(r)?,
        left_hand: read_pose(r)?,
        right_hand: read_pose(r)?,
    })
}

fn read_cut_info(r: &mut ByteReader<'_>) -> Result<CutInfo> {
    Ok(CutInfo {
        speed_ok: r.read_bool()?,
        direction_ok: r.read_bool()?,
        saber_type_ok: r.read_bool()?,
        was_cut_too_soon: r.read_bool()?,
        saber_speed: r.read_f32()?,
        saber_dir: r.read_vec3()?,
        saber_type: r.read_i32()?,
        time_deviation: r.read_f32()?,
        cut_dir_deviation: r.read_f32()?,
        cut_point: r.read_vec3()?,
        cut_normal: r.read_vec3()?,
        cut_distance_to_center: r.read_f32()?,
        cut_angle: r.read_f32()?,
        before_cut_rating: r.read_f32()?,
        after_cut_rating: r.read_f32()?,
    })
}

/// Decode one note record as written, before bomb reclassification.
pub fn read_note(r: &mut ByteReader<'_>) -> Result<NoteEvent> {
    let note_id = r.read_i32()?;
    let event_time = r.read_f32()?;
    let spawn_time = r.read_f32()?;
    let type_offset = r.offset();
    let raw_type = r.read_i32()?;
    let event_type = NoteEventType::from_raw(raw_type).ok_or(Error::UnknownNoteEvent {
        value: raw_type,
        offset: type_offset,
    })?;
    let cut = if event_type.has_cut_info() {
        Some(read_cut_info(r)?)
    } else {
        None
    };
    Ok(NoteEvent {
        note_id,
        event_time,
        spawn_time,
        event_type,
        cut,
    })
}

pub fn read_wall(r: &mut ByteReader<'_>) -> Result<WallEvent> {
    Ok(WallEvent {
        wall_id: r.read_i32()?,
        energy: r.read_f32()?,
        time: r.read_f32()?,
        spawn_time: r.read_f32()?,
    })
}

pub fn read_height(r: &mut ByteReader<'_>) -> Result<HeightEvent> {
    Ok(HeightEvent {
        height: r.read_f32()?,
        time: r.read_f32()?,
    })
}

pub fn read_pause(r: &mut ByteReader<'_>) -> Result<PauseEvent> {
    Ok(PauseEvent {
        duration: r.read_i64()?,
        time: r.read_f32()?,
    })
}

/// Tracks which sections have been seen and accumulates their records.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    seen: [bool; SECTION_COUNT],
    frames: Vec<Frame>,
    notes: Vec<NoteEvent>,
    walls: Vec<WallEvent>,
    heights: Vec<HeightEvent>,
    pauses: Vec<PauseEvent>,
    dropped_frames: usize,
    bombs_reclassified: usize,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the tag at the start of a body section.
    ///
    /// Fails for unknown tags and for a section (Info included) that was
    /// already decoded.
    pub fn begin(&mut self, tag: u8, offset: u64) -> Result<SectionKind> {
        let kind = SectionKind::from_tag(tag).ok_or(Error::UnknownSection { tag, offset })?;
        if kind == SectionKind::Info || self.seen[kind as usize] {
            return Err(Error::DuplicateSection(kind));
        }
        self.seen[kind as usize] = true;
        Ok(kind)
    }

    /// Number of body sections started so far.
    pub fn sections_seen(&self) -> usize {
        self.seen.iter().filter(|s| **s).count()
    }

    /// Reserve room for `count` records, clamped by what `available` bytes
    /// could possibly hold.
    pub fn reserve(&mut self, kind: SectionKind, count: usize, available: Option<usize>) {
        let fits = available.map_or(MAX_PREALLOC, |b| b / kind.min_record_size());
        let n = count.min(fits).min(MAX_PREALLOC);
        match kind {
            SectionKind::Info => {}
            SectionKind::Frames => self.frames.reserve(n),
            SectionKind::Notes => self.notes.reserve(n),
            SectionKind::Walls => self.walls.reserve(n),
            SectionKind::Heights => self.heights.reserve(n),
            SectionKind::Pauses => self.pauses.reserve(n),
        }
    }

    /// Decode one record of `kind` and commit it.
    pub fn read_record(&mut self, kind: SectionKind, r: &mut ByteReader<'_>) -> Result<()> {
        match kind {
            SectionKind::Info => return Err(Error::DuplicateSection(SectionKind::Info)),
            SectionKind::Frames => {
                let frame = read_frame(r)?;
                self.push_frame(frame);
            }
            SectionKind::Notes => {
                let mut note = read_note(r)?;
                if reclassify_bomb(&mut note) {
                    self.bombs_reclassified += 1;
                }
                self.notes.push(note);
            }
            SectionKind::Walls => self.walls.push(read_wall(r)?),
            SectionKind::Heights => self.heights.push(read_height(r)?),
            SectionKind::Pauses => self.pauses.push(read_pause(r)?),
        }
        Ok(())
    }

    /// Keep a frame only when its time is finite, nonzero and past the last
    /// kept frame. Consecutive duplicates are the common drop.
    fn push_frame(&mut self, frame: Frame) {
        let advances = self.frames.last().map_or(true, |last| frame.time > last.time);
        if frame.time.is_finite() && frame.time != 0.0 && advances {
            self.frames.push(frame);
            return;
        }
        tracing::trace!(time = frame.time, "dropping frame");
        self.dropped_frames += 1;
    }

    /// Log the per-section summary once a section is complete.
    pub fn finish_section(&self, kind: SectionKind, declared: usize) {
        match kind {
            SectionKind::Frames => tracing::debug!(
                declared,
                kept = self.frames.len(),
                dropped = self.dropped_frames,
                "frames decoded"
            ),
            SectionKind::Notes => tracing::debug!(
                declared,
                bombs_reclassified = self.bombs_reclassified,
                "notes decoded"
            ),
            _ => tracing::debug!(section = ?kind, declared, "section decoded"),
        }
    }

    pub fn build(self, info: ReplayInfo) -> ReplaySession {
        ReplaySession {
            info,
            frames: self.frames,
            notes: self.notes,
            walls: self.walls,
            heights: self.heights,
            pauses: self.pauses,
        }
    }
}
