//! Push-driven decoding of audio byte streams.
//!
//! A producer pushes byte chunks of any size into an [`AudioStreamNode`].
//! The node buffers them in a [`MemoryBuffer`], waits until its
//! [`DecoderFactory`] recognises the stream header and from then on emits
//! time-dimensioned [`ArrayWithUnits`](crate::ArrayWithUnits) chunks, at
//! most one per push. When the producer is done, [`AudioStreamNode::finish`]
//! drains the rest.
//!
//! # Example
//!
//! ```rust,no_run
//! use audio_dims::streaming::{AudioStreamNode, StreamConfig, StreamResult, WavDecoderFactory};
//!
//! fn decode(chunks: &[Vec<u8>], total: u64) -> StreamResult<usize> {
//!     let mut node = AudioStreamNode::new(WavDecoderFactory, total, StreamConfig::default());
//!     let mut frames = 0;
//!     for bytes in chunks {
//!         if let Some(chunk) = node.push(bytes)? {
//!             frames += chunk.len();
//!         }
//!     }
//!     for chunk in node.finish()? {
//!         frames += chunk?.len();
//!     }
//!     Ok(frames)
//! }
//! ```

pub mod buffers;
pub mod error;
pub mod stream;
pub mod traits;
pub mod wav;

#[cfg(test)]
mod tests;

pub use buffers::{CursorMode, DEFAULT_MAX_RETAINED_BYTES, MemoryBuffer, ReadCount};
pub use error::{StreamError, StreamResult};
pub use stream::{AudioStreamNode, Drain, StreamConfig, StreamState, StreamStats, chunk_size_bytes};
pub use traits::{AudioFormatInfo, Decoder, DecoderFactory};
pub use wav::{WavDecoder, WavDecoderFactory};
