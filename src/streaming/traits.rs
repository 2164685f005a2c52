//! The decoder seam of the streaming node.
//!
//! The node owns the bytes; decoders only read them. A [`DecoderFactory`]
//! inspects the buffered bytes and hands back a [`Decoder`] once the stream
//! header is complete, and the decoder then pulls frames from the same
//! buffer on demand.

use ndarray::Array2;

use super::buffers::MemoryBuffer;
use super::error::StreamResult;

/// Stream parameters reported by a decoder once the header is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormatInfo {
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: usize,
    /// Significant bits per sample.
    pub bits_per_sample: u16,
    /// Bytes each sample occupies in the stream, at least
    /// `bits_per_sample / 8`.
    pub container_bytes: u16,
    /// True for floating-point sample data.
    pub is_float: bool,
}

impl AudioFormatInfo {
    /// Bytes occupied by one sample of one channel.
    pub const fn bytes_per_sample(&self) -> usize {
        self.container_bytes as usize
    }

    /// Bytes occupied by one frame (one sample of every channel).
    pub const fn bytes_per_frame(&self) -> usize {
        self.bytes_per_sample() * self.channels
    }
}

/// Decodes sample frames from a [`MemoryBuffer`].
pub trait Decoder {
    /// The stream parameters.
    fn format_info(&self) -> AudioFormatInfo;

    /// Decodes up to `frames` whole frames from the read cursor.
    ///
    /// Returns a `frames x channels` array of samples in `[-1, 1]`. Fewer
    /// rows than requested (possibly none) means the buffer does not hold
    /// more complete frames yet, or that the stream is exhausted.
    fn read_frames(&mut self, buffer: &mut MemoryBuffer, frames: usize) -> StreamResult<Array2<f32>>;
}

/// Builds a [`Decoder`] from the start of a stream.
pub trait DecoderFactory {
    /// The decoder this factory builds.
    type Decoder: Decoder;

    /// Attempts to parse the stream header from the buffer's read cursor.
    ///
    /// Returns `Ok(None)` when more bytes are needed, leaving the cursor where
    /// it was. On success the cursor is left at the first sample byte.
    ///
    /// # Errors
    /// Returns [`StreamError::UnrecognizedStreamFormat`](super::StreamError::UnrecognizedStreamFormat)
    /// when the bytes can never form a valid header.
    fn open(&self, buffer: &mut MemoryBuffer) -> StreamResult<Option<Self::Decoder>>;
}
