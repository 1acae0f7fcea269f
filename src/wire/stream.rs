//! Progressive replay decoder over an async byte source.
//!
//! The info section is handed back as soon as it has been read; the rest of
//! the body is decoded by a [`PendingBody`] the caller drives (or spawns)
//! while it uses the info, typically to go and fetch the matching map.
//!
//! Records are decoded with the same [`ByteReader`] routines as the buffer
//! decoder, run over whatever part of the stream is buffered. A record that
//! comes back `Truncated` before the source has ended is retried once more
//! bytes have arrived, so both decoders see exactly the same record bytes.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::cancel::{check_cancelled, CancelHandle};
use super::format::SECTION_COUNT;
use super::options::DecodeOptions;
use super::reader::ByteReader;
use super::recovery::report_recoveries;
use super::sections::*;
use crate::replay::{ReplayInfo, ReplaySession};
use crate::util::{Error, Result};

/// Buffered window over an async source.
///
/// `buf[start..end]` holds bytes read but not yet committed; `consumed` is
/// the absolute stream offset of `buf[start]`.
struct StreamCursor<R> {
    source: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    consumed: u64,
    eof: bool,
    cancel: Option<CancelHandle>,
}

impl<R: AsyncRead + Unpin> StreamCursor<R> {
    fn new(source: R, initial_capacity: usize, cancel: Option<CancelHandle>) -> Self {
        Self {
            source,
            buf: vec![0; initial_capacity.max(1)],
            start: 0,
            end: 0,
            consumed: 0,
            eof: false,
            cancel,
        }
    }

    #[inline]
    fn offset(&self) -> u64 {
        self.consumed
    }

    #[inline]
    fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// Pull until at least `needed` more bytes are buffered, the source
    /// ends, or cancellation is requested. The scratch buffer doubles
    /// whenever the bytes would not fit.
    async fn fill(&mut self, needed: usize) -> Result<()> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        let target = self.end + needed.max(1);
        if target > self.buf.len() {
            let mut capacity = self.buf.len();
            while capacity < target {
                capacity *= 2;
            }
            tracing::trace!(from = self.buf.len(), to = capacity, "growing stream buffer");
            self.buf.resize(capacity, 0);
        }

        while self.end < target {
            let n = self.source.read(&mut self.buf[self.end..]).await?;
            if n == 0 {
                tracing::trace!(offset = self.consumed + self.buffered() as u64, "source ended");
                self.eof = true;
                break;
            }
            self.end += n;
            if self.is_cancelled() {
                break;
            }
        }
        Ok(())
    }

    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelHandle::is_cancelled)
    }

    /// Decode one record with `f`, pulling more bytes until it fits.
    ///
    /// `f` must be restartable: it is rerun from the same position after
    /// every refill. Cancellation while waiting for bytes surfaces as the
    /// `Truncated` error of the record being read.
    async fn record<T>(&mut self, mut f: impl FnMut(&mut ByteReader<'_>) -> Result<T>) -> Result<T> {
        loop {
            let (result, used, recoveries) = {
                let mut r = ByteReader::with_base(&self.buf[self.start..self.end], self.consumed);
                let result = f(&mut r);
                (result, r.position(), r.take_recoveries())
            };
            match result {
                Ok(value) => {
                    self.start += used;
                    self.consumed += used as u64;
                    report_recoveries(&recoveries);
                    return Ok(value);
                }
                Err(Error::Truncated { offset, needed }) if !self.eof => {
                    if self.is_cancelled() {
                        return Err(Error::Truncated { offset, needed });
                    }
                    self.fill(needed).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// True once the source has ended and every buffered byte is consumed.
    async fn at_end(&mut self) -> Result<bool> {
        while self.buffered() == 0 {
            if self.eof {
                return Ok(true);
            }
            self.fill(1).await?;
        }
        Ok(false)
    }
}

/// Progressive decoder over a live byte source.
#[derive(Debug, Clone, Default)]
pub struct StreamingReplayDecoder {
    options: DecodeOptions,
    cancel: Option<CancelHandle>,
}

impl StreamingReplayDecoder {
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

    /// Read the header and info section, returning the info together with
    /// the not-yet-decoded rest of the replay.
    pub async fn decode_header<R>(&self, source: R) -> Result<(ReplayInfo, PendingBody<R>)>
    where
        R: AsyncRead + Unpin,
    {
        let options = self.options.clone();
        let mut cursor = StreamCursor::new(
            source,
            options.stream_initial_capacity,
            self.cancel.clone(),
        );

        let info = async {
            cursor.record(read_header).await?;
            check_cancelled(cursor.cancel.as_ref())?;

            let tag = if cursor.at_end().await? {
                None
            } else {
                Some(cursor.record(|r| r.read_u8()).await?)
            };
            expect_info_tag(tag)?;
            let info = cursor.record(|r| read_info(r, &options)).await?;
            tracing::debug!(
                player = %info.player_name,
                song = %info.song_name,
                offset = cursor.offset(),
                "info decoded"
            );
            Ok::<_, Error>(info)
        }
        .instrument(tracing::debug_span!("decode_stream_header"))
        .await?;

        let body = PendingBody {
            cursor,
            info: info.clone(),
        };
        Ok((info, body))
    }

    /// Decode a whole replay from `source`.
    pub async fn decode<R>(&self, source: R) -> Result<ReplaySession>
    where
        R: AsyncRead + Unpin,
    {
        let (_, body) = self.decode_header(source).await?;
        body.finish().await
    }
}

/// The remaining sections of a replay whose info has been decoded.
pub struct PendingBody<R> {
    cursor: StreamCursor<R>,
    info: ReplayInfo,
}

impl<R: AsyncRead + Unpin> PendingBody<R> {
    #[inline]
    pub fn info(&self) -> &ReplayInfo {
        &self.info
    }

    /// Bytes committed so far (header and info).
    #[inline]
    pub fn bytes_consumed(&self) -> u64 {
        self.cursor.offset()
    }

    /// Decode the remaining sections in stream order.
    pub async fn finish(self) -> Result<ReplaySession> {
        let PendingBody { mut cursor, info } = self;
        let span = tracing::debug_span!("decode_stream_body", offset = cursor.offset());

        async move {
            let mut body = BodyBuilder::new();
            while body.sections_seen() < SECTION_COUNT - 1 && !cursor.at_end().await? {
                check_cancelled(cursor.cancel.as_ref())?;
                let offset = cursor.offset();
                let tag = cursor.record(|r| r.read_u8()).await?;
                let kind = body.begin(tag, offset)?;
                tracing::debug!(kind = ?kind, offset, "section start");

                let count = cursor.record(read_count).await?;
                body.reserve(kind, count, None);
                for _ in 0..count {
                    cursor.record(|r| body.read_record(kind, r)).await?;
                }
                body.finish_section(kind, count);
            }

            if cursor.buffered() > 0 {
                tracing::debug!(trailing = cursor.buffered(), "ignoring bytes after last section");
            }
            Ok(body.build(info))
        }
        .instrument(span)
        .await
    }

    /// Finish decoding on the tokio runtime.
    pub fn spawn(self) -> JoinHandle<Result<ReplaySession>>
    where
        R: Send + 'static,
    {
        tokio::spawn(self.finish())
    }
}

/// Decode a replay from an async source with default options.
pub async fn decode_stream<R: AsyncRead + Unpin>(source: R) -> Result<ReplaySession> {
    StreamingReplayDecoder::new().decode(source).await
}
