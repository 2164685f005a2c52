//! The push-driven audio decode node.
//!
//! An [`AudioStreamNode`] accepts raw byte chunks from a producer, feeds them
//! into a [`MemoryBuffer`] and, once the decoder collaborator recognises the
//! stream header, turns the buffered bytes into time-dimensioned sample
//! chunks. Each push yields at most one chunk; [`AudioStreamNode::finish`]
//! drains whatever is left.

use std::fmt::{self, Display};
use std::io::Write;

use ndarray::Array2;
use tracing::{debug, trace, warn};

use super::buffers::{DEFAULT_MAX_RETAINED_BYTES, MemoryBuffer};
use super::error::{StreamError, StreamResult};
use super::traits::{AudioFormatInfo, Decoder, DecoderFactory};
use crate::dimension::Dimension;
use crate::repr::{ArrayWithUnits, Reduction};
use crate::time::{Duration, Rate, TICKS_PER_SECOND};
use crate::ArrayResult;

/// Configuration for an [`AudioStreamNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamConfig {
    /// Average all channels into a single `[Time]` axis.
    pub sum_to_mono: bool,
    /// Consumed bytes the buffer keeps before compacting.
    pub max_retained_bytes: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sum_to_mono: true,
            max_retained_bytes: DEFAULT_MAX_RETAINED_BYTES,
        }
    }
}

impl StreamConfig {
    /// Keeps every channel, emitting `[Time, Identity]` chunks for
    /// multi-channel streams.
    pub fn multi_channel() -> Self {
        Self {
            sum_to_mono: false,
            ..Self::default()
        }
    }

    /// Sets whether channels are averaged to mono.
    pub fn with_sum_to_mono(mut self, sum_to_mono: bool) -> Self {
        self.sum_to_mono = sum_to_mono;
        self
    }

    /// Sets the buffer retention limit.
    pub fn with_max_retained_bytes(mut self, bytes: usize) -> Self {
        self.max_retained_bytes = bytes;
        self
    }
}

/// Represents the current state of an audio stream node.
#[derive(Debug, Clone)]
pub enum StreamState {
    /// Bytes are buffered but the header has not been recognised yet.
    AwaitingHeader,
    /// Each push yields at most one chunk.
    Streaming,
    /// The producer has finished; remaining chunks are being drained.
    Draining,
    /// No further output.
    Closed,
    /// A fatal error; every further call returns it again.
    Failed(StreamError),
}

impl StreamState {
    /// Check if the node still accepts bytes
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::AwaitingHeader | Self::Streaming)
    }

    /// Check if the node reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Failed(_))
    }

    /// Check if the node failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingHeader => f.write_str("awaiting header"),
            Self::Streaming => f.write_str("streaming"),
            Self::Draining => f.write_str("draining"),
            Self::Closed => f.write_str("closed"),
            Self::Failed(err) => write!(f, "failed ({err})"),
        }
    }
}

/// Counters for a stream node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Bytes accepted from the producer.
    pub bytes_received: u64,
    /// Chunks emitted downstream.
    pub chunks_emitted: u64,
    /// Frames emitted downstream, summed over all chunks.
    pub frames_emitted: u64,
}

/// Bytes needed to carry `duration` of PCM audio.
///
/// Producers use this to size the chunks they push; the node derives its own
/// chunk length from the first chunk it receives.
pub fn chunk_size_bytes(sample_rate: u32, duration: Duration, bit_depth: u16, channels: usize) -> usize {
    let frames = i128::from(duration.ticks()) * i128::from(sample_rate) / i128::from(TICKS_PER_SECOND);
    let frames = usize::try_from(frames).unwrap_or(0);
    frames * usize::from(bit_depth).div_ceil(8) * channels
}

/// Frames per emitted chunk: whole seconds carried by the first producer
/// chunk, at least one.
fn chunk_frames_for(first_chunk_bytes: usize, format: &AudioFormatInfo) -> usize {
    let sample_rate = format.sample_rate as usize;
    let bytes_per_second = format.bytes_per_frame() * sample_rate;
    let seconds = first_chunk_bytes.checked_div(bytes_per_second).unwrap_or(0);
    seconds.max(1) * sample_rate
}

/// What the node learned from the stream header.
#[derive(Debug, Clone, Copy)]
struct Session {
    format: AudioFormatInfo,
    rate: Rate,
    chunk_frames: usize,
}

enum Phase<D> {
    AwaitingHeader,
    Streaming(D),
    Draining(D),
    Closed,
    Failed(StreamError),
}

impl<D> Phase<D> {
    fn state(&self) -> StreamState {
        match self {
            Self::AwaitingHeader => StreamState::AwaitingHeader,
            Self::Streaming(_) => StreamState::Streaming,
            Self::Draining(_) => StreamState::Draining,
            Self::Closed => StreamState::Closed,
            Self::Failed(err) => StreamState::Failed(err.clone()),
        }
    }
}

/// Decodes a pushed byte stream into time-dimensioned sample chunks.
///
/// ```rust
/// use audio_dims::streaming::{AudioStreamNode, StreamConfig, WavDecoderFactory};
///
/// let mut node = AudioStreamNode::new(WavDecoderFactory, 1024, StreamConfig::default());
/// // Not a WAV header, but too short to tell yet.
/// assert!(node.push(b"RIFF").unwrap().is_none());
/// ```
pub struct AudioStreamNode<F: DecoderFactory> {
    factory: F,
    config: StreamConfig,
    buffer: MemoryBuffer,
    pending: Vec<u8>,
    first_chunk_bytes: Option<usize>,
    session: Option<Session>,
    phase: Phase<F::Decoder>,
    stats: StreamStats,
}

impl<F: DecoderFactory> AudioStreamNode<F> {
    /// Creates a node for a stream the producer declared to be
    /// `content_length` bytes long.
    pub fn new(factory: F, content_length: u64, config: StreamConfig) -> Self {
        Self {
            factory,
            buffer: MemoryBuffer::with_max_retained(content_length, config.max_retained_bytes),
            config,
            pending: Vec::new(),
            first_chunk_bytes: None,
            session: None,
            phase: Phase::AwaitingHeader,
            stats: StreamStats::default(),
        }
    }

    /// The current state.
    pub fn state(&self) -> StreamState {
        self.phase.state()
    }

    /// Counters since creation.
    pub const fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// The configuration the node was created with.
    pub const fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// The buffer the decoder reads from.
    pub const fn buffer(&self) -> &MemoryBuffer {
        &self.buffer
    }

    /// The stream format, once the header has been recognised.
    pub fn format_info(&self) -> Option<AudioFormatInfo> {
        self.session.map(|s| s.format)
    }

    /// The stream sample rate in Hz, once known.
    pub fn sample_rate(&self) -> Option<u32> {
        self.session.map(|s| s.format.sample_rate)
    }

    /// The stream channel count, once known.
    pub fn channels(&self) -> Option<usize> {
        self.session.map(|s| s.format.channels)
    }

    /// Frames per emitted chunk, once known.
    pub fn chunk_frames(&self) -> Option<usize> {
        self.session.map(|s| s.chunk_frames)
    }

    /// The rate of the emitted Time axis, once known.
    pub fn rate(&self) -> Option<Rate> {
        self.session.map(|s| s.rate)
    }

    /// Accepts a producer chunk without decoding anything.
    ///
    /// # Errors
    /// Returns [`StreamError::InvalidState`] once the producer has finished,
    /// or the stored error if the node failed.
    pub fn enqueue(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.ensure_accepting("push bytes")?;
        if self.first_chunk_bytes.is_none() && !bytes.is_empty() {
            self.first_chunk_bytes = Some(bytes.len());
        }
        self.pending.extend_from_slice(bytes);
        self.stats.bytes_received += bytes.len() as u64;
        Ok(())
    }

    /// Moves queued bytes into the buffer and emits at most one chunk.
    ///
    /// `Ok(None)` means not enough data is buffered yet.
    ///
    /// # Errors
    /// Returns [`StreamError::UnrecognizedStreamFormat`] when the buffered
    /// bytes can never form a valid header. That error, and any other fatal
    /// error, moves the node to [`StreamState::Failed`]; after a recoverable
    /// one (see [`StreamError::is_recoverable`]) the call can be retried.
    pub fn process(&mut self) -> StreamResult<Option<ArrayWithUnits<f32>>> {
        self.ensure_accepting("process")?;
        let result = self.step();
        if let Err(err) = &result {
            self.fail_if_fatal(err);
        }
        result
    }

    /// [`enqueue`](Self::enqueue) followed by [`process`](Self::process).
    ///
    /// # Errors
    /// Same as [`enqueue`](Self::enqueue) and [`process`](Self::process).
    pub fn push(&mut self, bytes: &[u8]) -> StreamResult<Option<ArrayWithUnits<f32>>> {
        self.enqueue(bytes)?;
        self.process()
    }

    /// Signals that the producer has no more bytes and returns an iterator
    /// over the remaining chunks.
    ///
    /// The node is [`StreamState::Closed`] once the iterator is exhausted.
    ///
    /// # Errors
    /// Returns [`StreamError::UnrecognizedStreamFormat`] if the stream ended
    /// before a complete header, and [`StreamError::InvalidState`] if the node
    /// is already closed.
    pub fn finish(&mut self) -> StreamResult<Drain<'_, F>> {
        match &self.phase {
            Phase::Failed(err) => return Err(err.clone()),
            Phase::Closed => return Err(StreamError::invalid_state("finish", self.state())),
            Phase::AwaitingHeader | Phase::Streaming(_) | Phase::Draining(_) => {}
        }
        if let Err(err) = self.begin_drain() {
            self.fail_if_fatal(&err);
            return Err(err);
        }
        Ok(Drain { node: self })
    }

    fn ensure_accepting(&self, operation: &'static str) -> StreamResult<()> {
        match &self.phase {
            Phase::AwaitingHeader | Phase::Streaming(_) => Ok(()),
            Phase::Failed(err) => Err(err.clone()),
            Phase::Draining(_) | Phase::Closed => Err(StreamError::invalid_state(operation, self.state())),
        }
    }

    fn step(&mut self) -> StreamResult<Option<ArrayWithUnits<f32>>> {
        self.flush_pending()?;
        if matches!(self.phase, Phase::AwaitingHeader) && !self.try_attach()? {
            return Ok(None);
        }
        let Self {
            phase,
            session: Some(session),
            buffer,
            config,
            stats,
            ..
        } = self
        else {
            return Ok(None);
        };
        match phase {
            Phase::Streaming(decoder) => decode_chunk(decoder, session, buffer, config, stats),
            _ => Ok(None),
        }
    }

    fn begin_drain(&mut self) -> StreamResult<()> {
        self.flush_pending()?;
        if matches!(self.phase, Phase::AwaitingHeader) && !self.try_attach()? {
            return Err(StreamError::unrecognized(format!(
                "stream ended after {} bytes without a complete header",
                self.buffer.bytes_written()
            )));
        }
        if matches!(self.phase, Phase::Streaming(_)) {
            if let Phase::Streaming(decoder) = std::mem::replace(&mut self.phase, Phase::Closed) {
                self.phase = Phase::Draining(decoder);
                debug!(from = %StreamState::Streaming, to = %StreamState::Draining, "stream state changed");
            }
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> StreamResult<()> {
        if !self.pending.is_empty() {
            self.buffer.write_all(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }

    /// Tries to build the decoder from the buffered bytes.
    fn try_attach(&mut self) -> StreamResult<bool> {
        let Some(decoder) = self.factory.open(&mut self.buffer)? else {
            trace!(buffered = self.buffer.bytes_written(), "header incomplete");
            return Ok(false);
        };
        let format = decoder.format_info();
        let rate = Rate::from_sample_rate(format.sample_rate)?;
        let first_chunk_bytes = self.first_chunk_bytes.unwrap_or(0);
        let chunk_frames = chunk_frames_for(first_chunk_bytes, &format);
        debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            bits_per_sample = format.bits_per_sample,
            "attached decoder"
        );
        debug!(chunk_frames, first_chunk_bytes, "resolved chunk size");
        self.session = Some(Session {
            format,
            rate,
            chunk_frames,
        });
        self.transition(Phase::Streaming(decoder));
        Ok(true)
    }

    fn transition(&mut self, next: Phase<F::Decoder>) {
        let previous = std::mem::replace(&mut self.phase, next);
        debug!(from = %previous.state(), to = %self.phase.state(), "stream state changed");
    }

    fn fail_if_fatal(&mut self, err: &StreamError) {
        if err.is_fatal() {
            self.transition(Phase::Failed(err.clone()));
        } else {
            debug!(error = %err, state = %self.state(), "recoverable stream error");
        }
    }

    fn close(&mut self) {
        let declared = self.buffer.content_length();
        let received = self.buffer.bytes_written();
        if declared != received {
            warn!(
                declared,
                received,
                "stream length differs from the declared content length, treating as truncated"
            );
        }
        let trailing = self.buffer.available();
        if trailing > 0 {
            debug!(trailing, "ignoring bytes after the last whole frame");
        }
        self.transition(Phase::Closed);
    }
}

fn decode_chunk<D: Decoder>(
    decoder: &mut D,
    session: &Session,
    buffer: &mut MemoryBuffer,
    config: &StreamConfig,
    stats: &mut StreamStats,
) -> StreamResult<Option<ArrayWithUnits<f32>>> {
    let frames = decoder.read_frames(buffer, session.chunk_frames)?;
    let count = frames.nrows();
    if count == 0 {
        return Ok(None);
    }
    let chunk = wrap_frames(frames, session.rate, config.sum_to_mono)?;
    stats.chunks_emitted += 1;
    stats.frames_emitted += count as u64;
    trace!(frames = count, chunk = stats.chunks_emitted, "emitted chunk");
    Ok(Some(chunk))
}

/// Wraps `frames x channels` samples, averaging the channels away when a
/// single Time axis is wanted.
fn wrap_frames(frames: Array2<f32>, rate: Rate, sum_to_mono: bool) -> ArrayResult<ArrayWithUnits<f32>> {
    let channels = frames.ncols();
    let array = ArrayWithUnits::new(frames, vec![Dimension::Time(rate), Dimension::Identity])?;
    if sum_to_mono || channels == 1 {
        array.reduce_drop_axis(Reduction::Mean, 1)
    } else {
        Ok(array)
    }
}

/// Iterator over the chunks left once the producer has finished.
///
/// Returned by [`AudioStreamNode::finish`]. Dropping it early leaves the node
/// in [`StreamState::Draining`]; calling `finish` again resumes.
pub struct Drain<'a, F: DecoderFactory> {
    node: &'a mut AudioStreamNode<F>,
}

impl<F: DecoderFactory> Iterator for Drain<'_, F> {
    type Item = StreamResult<ArrayWithUnits<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        let AudioStreamNode {
            phase: Phase::Draining(decoder),
            session: Some(session),
            buffer,
            config,
            stats,
            ..
        } = &mut *self.node
        else {
            return None;
        };
        match decode_chunk(decoder, session, buffer, config, stats) {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.node.close();
                None
            }
            Err(err) => {
                self.node.fail_if_fatal(&err);
                Some(Err(err))
            }
        }
    }
}
