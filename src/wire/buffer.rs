//! Whole-buffer replay decoder.

use std::fs::File;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

use super::cancel::{check_cancelled, CancelHandle};
use super::format::SECTION_COUNT;
use super::options::DecodeOptions;
use super::reader::ByteReader;
use super::recovery::report_recoveries;
use super::sections::*;
use crate::replay::ReplaySession;
use crate::util::{Error, Result};

/// Synchronous decoder over a fully materialized replay.
///
/// Holds only configuration; every call to [`decode`](Self::decode) works on
/// its own input and local state, so one decoder can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct BufferReplayDecoder {
    options: DecodeOptions,
    cancel: Option<CancelHandle>,
}

impl BufferReplayDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options, cancel: None }
    }

    /// Check `handle` between sections.
    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode a complete replay.
    pub fn decode(&self, data: &[u8]) -> Result<ReplaySession> {
        let _span = tracing::debug_span!("decode_buffer", len = data.len()).entered();
        let cancel = self.cancel.as_ref();
        let mut r = ByteReader::new(data);

        read_header(&mut r)?;
        check_cancelled(cancel)?;

        let tag = if r.is_empty() { None } else { Some(r.read_u8()?) };
        expect_info_tag(tag)?;
        let info = read_info(&mut r, &self.options)?;
        report_recoveries(&r.take_recoveries());
        tracing::debug!(player = %info.player_name, song = %info.song_name, "info decoded");

        let mut body = BodyBuilder::new();
        while body.sections_seen() < SECTION_COUNT - 1 && !r.is_empty() {
            check_cancelled(cancel)?;
            let offset = r.offset();
            let tag = r.read_u8()?;
            let kind = body.begin(tag, offset)?;
            let _section = tracing::debug_span!("section", kind = ?kind, offset).entered();

            let count = read_count(&mut r)?;
            body.reserve(kind, count, Some(r.remaining()));
            for _ in 0..count {
                body.read_record(kind, &mut r)?;
            }
            body.finish_section(kind, count);
        }

        if !r.is_empty() {
            tracing::debug!(trailing = r.remaining(), "ignoring bytes after last section");
        }
        Ok(body.build(info))
    }

    /// Read and decode a replay file.
    ///
    /// With the `mmap` feature the file is memory-mapped instead of copied.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<ReplaySession> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        tracing::debug!(path = %path.display(), "opening replay");

        #[cfg(feature = "mmap")]
        {
            let size = file.metadata()?.len();
            if size > 0 {
                // Safety: the file is opened read-only and only read while mapped
                let mmap = unsafe { Mmap::map(&file) }
                    .map_err(|e| Error::MmapFailed(e.to_string()))?;
                return self.decode(&mmap);
            }
        }

        let mut data = Vec::new();
        (&file).read_to_end(&mut data)?;
        self.decode(&data)
    }
}
