//! Primitive decoding over a byte slice.
//!
//! [`ByteReader`] is the single cursor every section decoder works against.
//! The buffer decoder points it at the whole file; the streaming decoder
//! points it at whatever window of the stream is currently buffered and
//! retries the record when it comes back [`Error::Truncated`]. For that to be
//! sound, every read here must either succeed with the same value it would
//! produce on the full input, or fail with `Truncated`. Nothing may depend on
//! how much data lies past the bytes it actually needs.

use byteorder::{ByteOrder, LittleEndian};

use crate::util::{Error, Quat, Result, Vec3};

/// A string whose length prefix was rejected and re-read.
///
/// Not an error: the decode continues with the recovered string. Readers
/// collect these so the caller can report them once the surrounding record
/// is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRecovery {
    /// Absolute offset of the rejected length prefix.
    pub offset: u64,
    /// The rejected length value.
    pub declared_len: i64,
    /// 1-based recovery attempt this rejection triggered.
    pub attempt: u32,
}

/// Width of a string length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LengthPrefix {
    /// Signed 4-byte prefix (the normal encoding).
    Wide,
    /// Signed 1-byte prefix (fallback for legacy producers).
    Narrow,
}

/// Little-endian cursor over a byte slice.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Absolute offset of `data[0]` in the whole replay.
    base: u64,
    recoveries: Vec<StringRecovery>,
}

impl<'a> ByteReader<'a> {
    /// Reader over a complete buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Reader over a window that starts `base` bytes into the replay.
    pub fn with_base(data: &'a [u8], base: u64) -> Self {
        Self {
            data,
            pos: 0,
            base,
            recoveries: Vec::new(),
        }
    }

    /// Position relative to the start of the slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute position in the replay.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move back to an earlier position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    /// Drain the string recoveries seen so far.
    pub fn take_recoveries(&mut self) -> Vec<StringRecovery> {
        std::mem::take(&mut self.recoveries)
    }

    /// Consume `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::truncated(self.offset(), len - remaining));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Look at an i32 `ahead` bytes past the cursor without consuming it.
    pub fn peek_i32(&self, ahead: usize) -> Result<i32> {
        let start = self.pos + ahead;
        if start + 4 > self.data.len() {
            let needed = start + 4 - self.data.len();
            return Err(Error::truncated(self.offset() + ahead as u64, needed));
        }
        Ok(LittleEndian::read_i32(&self.data[start..start + 4]))
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Single byte, nonzero is true.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    /// x, y, z
    pub fn read_vec3(&mut self) -> Result<Vec3> {
        let mut v = [0.0f32; 3];
        LittleEndian::read_f32_into(self.read_bytes(12)?, &mut v);
        Ok(Vec3::from_array(v))
    }

    /// x, y, z, w
    pub fn read_quat(&mut self) -> Result<Quat> {
        let mut q = [0.0f32; 4];
        LittleEndian::read_f32_into(self.read_bytes(16)?, &mut q);
        Ok(Quat::from_xyzw(q[0], q[1], q[2], q[3]))
    }

    /// Read an i32-length-prefixed UTF-8 string.
    ///
    /// A length that is negative or above `ceiling` is treated as spurious:
    /// the cursor moves to one byte past where that prefix started and the
    /// string is re-read with a 1-byte length. At most `max_recoveries`
    /// re-reads are attempted. Invalid UTF-8 is replaced, never rejected.
    pub fn read_string(&mut self, ceiling: usize, max_recoveries: u32) -> Result<String> {
        let mut prefix = LengthPrefix::Wide;
        let mut attempt = 0u32;

        loop {
            let start = self.pos;
            let len = match prefix {
                LengthPrefix::Wide => i64::from(self.read_i32()?),
                LengthPrefix::Narrow => i64::from(self.read_u8()? as i8),
            };

            if len >= 0 && len as usize <= ceiling {
                let bytes = self.read_bytes(len as usize)?;
                return Ok(String::from_utf8_lossy(bytes).into_owned());
            }

            let offset = self.base + start as u64;
            if attempt >= max_recoveries {
                return Err(Error::StringRecoveryExhausted { offset, attempts: attempt });
            }
            attempt += 1;
            self.recoveries.push(StringRecovery {
                offset,
                declared_len: len,
                attempt,
            });
            self.pos = start + 1;
            prefix = LengthPrefix::Narrow;
        }
    }
}
