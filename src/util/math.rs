//! Math type re-exports.
//!
//! Poses are stored with `glam` types so playback code can use them directly.

pub use glam::{Quat, Vec3};
