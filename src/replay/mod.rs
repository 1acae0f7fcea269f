//! Decoded replay data model.
//!
//! - [`ReplaySession`] - root aggregate handed to playback
//! - [`ReplayInfo`] - player, map and run metadata
//! - [`Frame`] / [`PoseSample`] - head and hand tracking
//! - [`NoteEvent`], [`WallEvent`], [`HeightEvent`], [`PauseEvent`]

mod events;
mod frame;
mod info;
mod session;

pub use events::*;
pub use frame::*;
pub use info::*;
pub use session::*;
