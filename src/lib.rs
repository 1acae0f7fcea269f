//! # bsor
//!
//! Decoder for the open VR replay format (`.bsor`): head and hand poses plus
//! note, wall, height and pause events recorded during a play session.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math re-exports
//! - [`wire`] - Wire format, primitive reader, recovery heuristics and the
//!   buffer/streaming decoders
//! - [`replay`] - Decoded data model ([`ReplaySession`] and friends)
//!
//! ## Example
//!
//! ```ignore
//! let session = bsor::decode_file("run.bsor")?;
//! println!("{} on {}", session.info.player_name, session.info.song_name);
//!
//! // Or progressively, from any tokio AsyncRead:
//! let (info, body) = bsor::StreamingReplayDecoder::new().decode_header(stream).await?;
//! let session = body.finish().await?;
//! ```

pub mod util;
pub mod wire;
pub mod replay;

// Re-export commonly used types
pub use util::{Error, HeaderFault, Result};
pub use wire::{
    decode_bytes, decode_file, decode_stream, BufferReplayDecoder, CancelHandle, DecodeOptions,
    PendingBody, StreamingReplayDecoder,
};
pub use replay::{ReplayInfo, ReplaySession};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Quat, Vec3};
    pub use crate::wire::{BufferReplayDecoder, StreamingReplayDecoder, DecodeOptions, CancelHandle};
    pub use crate::replay::*;
}
