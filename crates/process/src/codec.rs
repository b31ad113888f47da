//! Line framing for renderer output.
//!
//! Splits on `\n` without interpreting the bytes. Content problems (bad
//! UTF-8, over-long lines) become items instead of stream errors, so one
//! bad line never ends the stream; only I/O errors do.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder};

/// One framed unit of renderer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine {
    /// Line bytes without the `\n` (or `\r\n`) terminator.
    Line(Bytes),
    /// A line longer than the codec limit. Its bytes up to the next `\n`
    /// are discarded.
    TooLong,
}

/// `\n`-delimited decoder yielding [`RawLine`]s.
#[derive(Debug, Clone)]
pub struct RawLineCodec {
    inner: AnyDelimiterCodec,
    max_length: usize,
}

impl RawLineCodec {
    pub fn new_with_max_length(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_length),
            max_length,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

fn frame(res: Result<Option<Bytes>, AnyDelimiterCodecError>) -> io::Result<Option<RawLine>> {
    match res {
        Ok(Some(mut chunk)) => {
            if chunk.last() == Some(&b'\r') {
                chunk.truncate(chunk.len() - 1);
            }
            Ok(Some(RawLine::Line(chunk)))
        }
        Ok(None) => Ok(None),
        Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Ok(Some(RawLine::TooLong)),
        Err(AnyDelimiterCodecError::Io(e)) => Err(e),
    }
}

impl Decoder for RawLineCodec {
    type Item = RawLine;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<RawLine>> {
        frame(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> io::Result<Option<RawLine>> {
        frame(self.inner.decode_eof(buf))
    }
}
