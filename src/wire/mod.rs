//! Replay binary format decoding.
//!
//! ## File Structure
//!
//! ```text
//! +------------------+
//! | Magic 0x442D3D69 |  i32 LE
//! +------------------+
//! | Version (1)      |  u8
//! +------------------+
//! | Tag 0 + Info     |  positional strings and scalars
//! +------------------+
//! | Tag + Section    |  i32 count + fixed-layout records,
//! | ...              |  up to five (Frames/Notes/Walls/Heights/Pauses)
//! +------------------+
//! ```
//!
//! Two front-ends share one set of record decoders:
//! [`BufferReplayDecoder`] over a byte slice and [`StreamingReplayDecoder`]
//! over a tokio [`AsyncRead`](tokio::io::AsyncRead). Given the same bytes and
//! the same [`DecodeOptions`] they produce equal [`ReplaySession`]s.

mod buffer;
mod cancel;
mod format;
mod options;
mod reader;
mod recovery;
mod sections;
mod stream;

use std::path::Path;

pub use buffer::*;
pub use cancel::CancelHandle;
pub use format::*;
pub use options::*;
pub use reader::*;
pub use recovery::{read_player_name, reclassify_bomb};
pub use stream::*;

use crate::replay::ReplaySession;
use crate::util::Result;

/// Decode a replay held in memory with default options.
pub fn decode_bytes(data: &[u8]) -> Result<ReplaySession> {
    BufferReplayDecoder::new().decode(data)
}

/// Decode a replay file with default options.
pub fn decode_file(path: impl AsRef<Path>) -> Result<ReplaySession> {
    BufferReplayDecoder::new().open(path)
}
