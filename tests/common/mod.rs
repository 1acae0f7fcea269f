//! Shared helpers for building replay bytes in tests.

#![allow(dead_code)]

use std::io::Write;
use std::pin::Pin;
use std::task::{Context, Poll};

use byteorder::{LittleEndian, WriteBytesExt};
use tokio::io::{AsyncRead, ReadBuf};

use bsor::replay::{CutInfo, ReplayInfo};
use bsor::util::{Quat, Vec3};
use bsor::wire::BSOR_MAGIC;

/// Byte-level replay writer. Every method appends in wire order.
#[derive(Default)]
pub struct ReplayBuilder {
    buf: Vec<u8>,
}

impl ReplayBuilder {
    /// Starts with a valid magic and version 1.
    pub fn new() -> Self {
        Self::raw().i32(BSOR_MAGIC).u8(1)
    }

    /// Starts empty.
    pub fn raw() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.buf.write_u8(v).unwrap();
        self
    }

    pub fn bool(self, v: bool) -> Self {
        self.u8(v as u8)
    }

    pub fn i32(mut self, v: i32) -> Self {
        self.buf.write_i32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i64(mut self, v: i64) -> Self {
        self.buf.write_i64::<LittleEndian>(v).unwrap();
        self
    }

    pub fn f32(mut self, v: f32) -> Self {
        self.buf.write_f32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.buf.write_all(data).unwrap();
        self
    }

    pub fn string(self, s: &str) -> Self {
        self.i32(s.len() as i32).bytes(s.as_bytes())
    }

    pub fn vec3(self, v: Vec3) -> Self {
        self.f32(v.x).f32(v.y).f32(v.z)
    }

    pub fn quat(self, q: Quat) -> Self {
        self.f32(q.x).f32(q.y).f32(q.z).f32(q.w)
    }

    /// Info tag and payload.
    pub fn info(self, info: &ReplayInfo) -> Self {
        self.u8(0)
            .string(&info.version)
            .string(&info.game_version)
            .string(&info.timestamp)
            .string(&info.player_id)
            .string(&info.player_name)
            .string(&info.platform)
            .string(&info.tracking_system)
            .string(&info.hmd)
            .string(&info.controller)
            .string(&info.hash)
            .string(&info.song_name)
            .string(&info.mapper)
            .string(&info.difficulty)
            .i32(info.score)
            .string(&info.mode)
            .string(&info.environment)
            .string(&info.modifiers)
            .f32(info.jump_distance)
            .bool(info.left_handed)
            .f32(info.height)
            .f32(info.start_time)
            .f32(info.fail_time)
            .f32(info.speed)
    }

    /// Section tag followed by an element count.
    pub fn section(self, tag: u8, count: i32) -> Self {
        self.u8(tag).i32(count)
    }

    /// One frame record; poses are derived from `time` so frames differ.
    pub fn frame(self, time: f32, fps: i32) -> Self {
        let mut b = self.f32(time).i32(fps);
        for hand in 0..3 {
            let pos = Vec3::new(hand as f32 * 0.3, 1.5 + time, -0.25);
            let rot = Quat::from_rotation_y(time + hand as f32);
            b = b.vec3(pos).quat(rot);
        }
        b
    }

    pub fn frames(self, times: &[f32]) -> Self {
        let mut b = self.section(1, times.len() as i32);
        for &t in times {
            b = b.frame(t, 90);
        }
        b
    }

    pub fn cut_info(self, cut: &CutInfo) -> Self {
        self.bool(cut.speed_ok)
            .bool(cut.direction_ok)
            .bool(cut.saber_type_ok)
            .bool(cut.was_cut_too_soon)
            .f32(cut.saber_speed)
            .vec3(cut.saber_dir)
            .i32(cut.saber_type)
            .f32(cut.time_deviation)
            .f32(cut.cut_dir_deviation)
            .vec3(cut.cut_point)
            .vec3(cut.cut_normal)
            .f32(cut.cut_distance_to_center)
            .f32(cut.cut_angle)
            .f32(cut.before_cut_rating)
            .f32(cut.after_cut_rating)
    }

    /// One note record; good (0) and bad (1) get `sample_cut()` appended.
    pub fn note(self, note_id: i32, time: f32, event_type: i32) -> Self {
        let b = self.i32(note_id).f32(time).f32(time - 0.8).i32(event_type);
        if event_type == 0 || event_type == 1 {
            b.cut_info(&sample_cut())
        } else {
            b
        }
    }

    pub fn wall(self, wall_id: i32, energy: f32, time: f32) -> Self {
        self.i32(wall_id).f32(energy).f32(time).f32(time - 1.0)
    }

    pub fn height(self, height: f32, time: f32) -> Self {
        self.f32(height).f32(time)
    }

    pub fn pause(self, duration: i64, time: f32) -> Self {
        self.i64(duration).f32(time)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

pub fn sample_info() -> ReplayInfo {
    ReplayInfo {
        version: "0.9.1".to_string(),
        game_version: "1.34.2".to_string(),
        timestamp: "1700000000".to_string(),
        player_id: "76561198000000001".to_string(),
        player_name: "Nyx".to_string(),
        platform: "oculus".to_string(),
        tracking_system: "Oculus".to_string(),
        hmd: "Quest 3".to_string(),
        controller: "Touch".to_string(),
        hash: "0A1B2C3D4E5F".to_string(),
        song_name: "Starlight Runway".to_string(),
        mapper: "cartographer".to_string(),
        difficulty: "ExpertPlus".to_string(),
        score: 912_345,
        mode: "Standard".to_string(),
        environment: "DefaultEnvironment".to_string(),
        modifiers: "DA,FS".to_string(),
        jump_distance: 18.5,
        left_handed: false,
        height: 1.75,
        start_time: 0.0,
        fail_time: 0.0,
        speed: 0.0,
    }
}

pub fn sample_cut() -> CutInfo {
    CutInfo {
        speed_ok: true,
        direction_ok: true,
        saber_type_ok: true,
        was_cut_too_soon: false,
        saber_speed: 4.25,
        saber_dir: Vec3::new(0.0, -1.0, 0.0),
        saber_type: 1,
        time_deviation: -0.012,
        cut_dir_deviation: 3.5,
        cut_point: Vec3::new(0.1, 1.2, 0.0),
        cut_normal: Vec3::new(1.0, 0.0, 0.0),
        cut_distance_to_center: 0.05,
        cut_angle: 118.0,
        before_cut_rating: 1.0,
        after_cut_rating: 0.93,
    }
}

/// A replay exercising every section with a mix of records.
pub fn full_replay() -> Vec<u8> {
    ReplayBuilder::new()
        .info(&sample_info())
        .frames(&[0.0, 0.011, 0.022, 0.022, 0.033, 0.044])
        .section(2, 5)
        .note(10_502, 1.5, 0)
        .note(20_301, 1.9, 1)
        .note(30_400, 2.4, 2)
        .note(-1, 2.8, 3)
        .note(40_209, 3.1, 0)
        .section(3, 1)
        .wall(7, 0.82, 4.0)
        .section(4, 2)
        .height(1.74, 0.5)
        .height(1.76, 12.0)
        .section(5, 1)
        .pause(3, 5.5)
        .build()
}

/// AsyncRead that hands out at most `chunk` bytes per poll and returns
/// `Pending` on every other poll, so decoders suspend mid-record.
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    stall: bool,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk: chunk.max(1),
            stall: false,
        }
    }
}

impl AsyncRead for ChunkedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.stall {
            self.stall = false;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.stall = true;

        let n = self.chunk.min(self.data.len() - self.pos).min(buf.remaining());
        let start = self.pos;
        buf.put_slice(&self.data[start..start + n]);
        self.pos += n;
        Poll::Ready(Ok(()))
    }
}
