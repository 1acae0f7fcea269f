//! Tracked poses.

use crate::util::{Quat, Vec3};

/// Position and orientation of one tracked device.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoseSample {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for PoseSample {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl PoseSample {
    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Blend towards `other`: linear position, spherical rotation.
    pub fn lerp(&self, other: &PoseSample, t: f32) -> PoseSample {
        PoseSample {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
        }
    }
}

/// One recorded frame: headset and both controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Song time in seconds.
    pub time: f32,
    pub fps: i32,
    pub head: PoseSample,
    pub left_hand: PoseSample,
    pub right_hand: PoseSample,
}

impl Frame {
    /// Interpolate all three poses between `self` and `next` at song time
    /// `time`. Times outside the pair clamp to the nearest frame.
    pub fn interpolate(&self, next: &Frame, time: f32) -> Frame {
        let span = next.time - self.time;
        let t = if span > 0.0 {
            ((time - self.time) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Frame {
            time,
            fps: self.fps,
            head: self.head.lerp(&next.head, t),
            left_hand: self.left_hand.lerp(&next.left_hand, t),
            right_hand: self.right_hand.lerp(&next.right_hand, t),
        }
    }
}
