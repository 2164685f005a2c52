//! PCM WAV decoding over a [`MemoryBuffer`].
//!
//! The RIFF header is parsed with `hound`; sample data is decoded here so
//! that only whole frames already present in the buffer are consumed.

use std::io::{Seek, SeekFrom};

use hound::{SampleFormat, WavReader};
use ndarray::Array2;
use tracing::debug;

use super::buffers::{MemoryBuffer, ReadCount};
use super::error::{StreamError, StreamResult};
use super::traits::{AudioFormatInfo, Decoder, DecoderFactory};
use crate::stream_error;

/// Opens PCM WAV streams: 8-bit unsigned, 16/24/32-bit signed integer and
/// 32-bit float. 24-bit samples may sit in 3- or 4-byte containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoderFactory;

impl DecoderFactory for WavDecoderFactory {
    type Decoder = WavDecoder;

    fn open(&self, buffer: &mut MemoryBuffer) -> StreamResult<Option<WavDecoder>> {
        let start = buffer.stream_position()?;
        let parsed = WavReader::new(&mut *buffer).map(|reader| (reader.spec(), reader.duration()));
        let (spec, frames) = match parsed {
            Ok(header) => header,
            // hound reports a short header read as a plain I/O error
            Err(hound::Error::IoError(_)) if !buffer.is_complete() => {
                buffer.seek(SeekFrom::Start(start))?;
                return Ok(None);
            }
            Err(err) => return Err(StreamError::unrecognized(err.to_string())),
        };

        let data_start = buffer.logical_position();
        buffer.seek(SeekFrom::Start(start))?;
        let header = buffer.read_count(ReadCount::Bytes(
            usize::try_from(data_start - start).unwrap_or(usize::MAX),
        ));
        let container_bytes = fmt_container_bytes(&header)
            .ok_or_else(|| StreamError::unrecognized("WAV header has no readable fmt chunk"))?;

        let is_float = match (spec.sample_format, spec.bits_per_sample, container_bytes) {
            (SampleFormat::Int, 8, 1) | (SampleFormat::Int, 16, 2) => false,
            (SampleFormat::Int, 24, 3 | 4) | (SampleFormat::Int, 32, 4) => false,
            (SampleFormat::Float, 32, 4) => true,
            (format, bits, bytes) => {
                return Err(StreamError::unrecognized(format!(
                    "unsupported WAV sample format {format:?} with {bits} bits in {bytes}-byte containers"
                )));
            }
        };
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(StreamError::unrecognized(format!(
                "WAV header declares {} channels at {} Hz",
                spec.channels, spec.sample_rate
            )));
        }

        let info = AudioFormatInfo {
            sample_rate: spec.sample_rate,
            channels: usize::from(spec.channels),
            bits_per_sample: spec.bits_per_sample,
            container_bytes,
            is_float,
        };
        debug!(?info, frames, data_offset = data_start, "parsed WAV header");
        Ok(Some(WavDecoder {
            info,
            frames_remaining: u64::from(frames),
        }))
    }
}

/// Bytes per sample container, from the block alignment in the `fmt ` chunk.
fn fmt_container_bytes(header: &[u8]) -> Option<u16> {
    let mut offset = 12usize;
    while let Some(&[a, b, c, d, l0, l1, l2, l3]) = header.get(offset..offset.checked_add(8)?) {
        let len = u32::from_le_bytes([l0, l1, l2, l3]) as usize;
        if [a, b, c, d] == *b"fmt " {
            let body = header.get(offset + 8..offset + 8 + 14)?;
            let channels = u16::from_le_bytes([body[2], body[3]]);
            let block_align = u16::from_le_bytes([body[12], body[13]]);
            return block_align.checked_div(channels);
        }
        offset = offset.checked_add(8 + len)?;
    }
    None
}

/// Decodes interleaved PCM frames into `[-1, 1]` floats.
#[derive(Debug, Clone)]
pub struct WavDecoder {
    info: AudioFormatInfo,
    frames_remaining: u64,
}

impl WavDecoder {
    /// Frames the header declares that have not been decoded yet.
    pub const fn frames_remaining(&self) -> u64 {
        self.frames_remaining
    }

    fn decode_sample(&self, bytes: &[u8]) -> f32 {
        match (self.info.is_float, self.info.bits_per_sample, bytes) {
            (true, _, &[a, b, c, d]) => f32::from_le_bytes([a, b, c, d]),
            (false, 8, &[a]) => (f32::from(a) - 128.0) / 128.0,
            (false, 16, &[a, b]) => f32::from(i16::from_le_bytes([a, b])) / 32_768.0,
            // the low three bytes hold the sample, a fourth container byte is padding
            (false, 24, &[a, b, c] | &[a, b, c, _]) => {
                (i32::from_le_bytes([0, a, b, c]) >> 8) as f32 / 8_388_608.0
            }
            (false, 32, &[a, b, c, d]) => i32::from_le_bytes([a, b, c, d]) as f32 / 2_147_483_648.0,
            _ => 0.0,
        }
    }
}

impl Decoder for WavDecoder {
    fn format_info(&self) -> AudioFormatInfo {
        self.info
    }

    fn read_frames(&mut self, buffer: &mut MemoryBuffer, frames: usize) -> StreamResult<Array2<f32>> {
        let bytes_per_frame = self.info.bytes_per_frame();
        let whole_frames = buffer.available() / bytes_per_frame;
        let remaining = usize::try_from(self.frames_remaining).unwrap_or(usize::MAX);
        let count = frames.min(whole_frames).min(remaining);

        let bytes = buffer.read_count(ReadCount::Bytes(count * bytes_per_frame));
        let samples: Vec<f32> = bytes
            .chunks_exact(self.info.bytes_per_sample())
            .map(|sample| self.decode_sample(sample))
            .collect();
        self.frames_remaining -= count as u64;

        Array2::from_shape_vec((count, self.info.channels), samples)
            .map_err(|e| stream_error!(Decode, "decoded samples do not form whole frames: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavSpecEx, WavWriter};
    use std::io::{Cursor, Write};

    fn header_only(bits: u16, format: SampleFormat) -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: bits,
            sample_format: format,
        };
        let mut cursor = Cursor::new(Vec::new());
        let writer = WavWriter::new(&mut cursor, spec).unwrap();
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    /// 24-bit samples of 0.5 stored in 4-byte containers (WAVE_FORMAT_EXTENSIBLE).
    fn padded_24_bit(frames: usize, channels: u16) -> Vec<u8> {
        let spec = WavSpecEx {
            spec: WavSpec {
                channels,
                sample_rate: 8000,
                bits_per_sample: 24,
                sample_format: SampleFormat::Int,
            },
            bytes_per_sample: 4,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new_with_spec_ex(&mut cursor, spec).unwrap();
        for _ in 0..frames * usize::from(channels) {
            writer.write_sample(4_194_304i32).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    fn open_all(bytes: &[u8]) -> (MemoryBuffer, WavDecoder) {
        let mut buffer = MemoryBuffer::new(bytes.len() as u64);
        buffer.write_all(bytes).unwrap();
        let decoder = WavDecoderFactory.open(&mut buffer).unwrap().unwrap();
        (buffer, decoder)
    }

    #[test]
    fn test_partial_header_needs_more_data() {
        let header = header_only(16, SampleFormat::Int);
        let mut buffer = MemoryBuffer::new(header.len() as u64);
        buffer.write_all(&header[..10]).unwrap();
        assert!(WavDecoderFactory.open(&mut buffer).unwrap().is_none());
        assert_eq!(buffer.logical_position(), 0);

        buffer.write_all(&header[10..]).unwrap();
        let decoder = WavDecoderFactory.open(&mut buffer).unwrap().unwrap();
        assert_eq!(decoder.format_info().sample_rate, 8000);
        assert_eq!(decoder.frames_remaining(), 0);
        assert_eq!(buffer.logical_position(), header.len() as u64);
    }

    #[test]
    fn test_every_header_prefix_waits() {
        for (bits, format) in [(16, SampleFormat::Int), (32, SampleFormat::Float)] {
            let header = header_only(bits, format);
            for cut in 1..header.len() {
                let mut buffer = MemoryBuffer::new(header.len() as u64 + 64);
                buffer.write_all(&header[..cut]).unwrap();
                let opened = WavDecoderFactory.open(&mut buffer);
                assert!(matches!(opened, Ok(None)), "{bits} bits cut at {cut}: {opened:?}");
                assert_eq!(buffer.logical_position(), 0);
            }
        }
    }

    #[test]
    fn test_partial_header_of_complete_stream_is_unrecognized() {
        let header = header_only(16, SampleFormat::Int);
        let mut buffer = MemoryBuffer::new(20);
        buffer.write_all(&header[..20]).unwrap();
        assert!(matches!(
            WavDecoderFactory.open(&mut buffer),
            Err(StreamError::UnrecognizedStreamFormat(_))
        ));
    }

    #[test]
    fn test_garbage_is_unrecognized() {
        let mut buffer = MemoryBuffer::new(64);
        buffer.write_all(&[0x42; 64]).unwrap();
        assert!(matches!(
            WavDecoderFactory.open(&mut buffer),
            Err(StreamError::UnrecognizedStreamFormat(_))
        ));
    }

    #[test]
    fn test_container_size_comes_from_block_alignment() {
        assert_eq!(fmt_container_bytes(&header_only(16, SampleFormat::Int)), Some(2));
        assert_eq!(fmt_container_bytes(&header_only(24, SampleFormat::Int)), Some(3));
        assert_eq!(fmt_container_bytes(&padded_24_bit(0, 2)), Some(4));
        assert_eq!(fmt_container_bytes(b"RIFF\0\0\0\0WAVE"), None);
    }

    #[test]
    fn test_24_bit_in_4_byte_containers() {
        let (mut buffer, mut decoder) = open_all(&padded_24_bit(800, 2));
        let info = decoder.format_info();
        assert_eq!(info.bits_per_sample, 24);
        assert_eq!(info.container_bytes, 4);
        assert_eq!(info.bytes_per_frame(), 8);

        let frames = decoder.read_frames(&mut buffer, 1000).unwrap();
        assert_eq!(frames.dim(), (800, 2));
        assert!(frames.iter().all(|&x| x == 0.5));
        assert_eq!(decoder.frames_remaining(), 0);
    }

    #[test]
    fn test_sample_scaling() {
        let decoder = |bits: u16, container_bytes: u16, is_float: bool| WavDecoder {
            info: AudioFormatInfo {
                sample_rate: 8000,
                channels: 1,
                bits_per_sample: bits,
                container_bytes,
                is_float,
            },
            frames_remaining: 0,
        };
        assert_eq!(decoder(8, 1, false).decode_sample(&[0]), -1.0);
        assert_eq!(decoder(8, 1, false).decode_sample(&[128]), 0.0);
        assert_eq!(decoder(16, 2, false).decode_sample(&i16::MIN.to_le_bytes()), -1.0);
        assert_eq!(decoder(16, 2, false).decode_sample(&16_384i16.to_le_bytes()), 0.5);
        assert_eq!(decoder(24, 3, false).decode_sample(&[0x00, 0x00, 0x80]), -1.0);
        assert_eq!(decoder(24, 3, false).decode_sample(&[0x00, 0x00, 0x40]), 0.5);
        assert_eq!(decoder(24, 4, false).decode_sample(&[0x00, 0x00, 0x40, 0x00]), 0.5);
        assert_eq!(decoder(24, 4, false).decode_sample(&[0x00, 0x00, 0x80, 0xff]), -1.0);
        assert_eq!(decoder(32, 4, false).decode_sample(&i32::MIN.to_le_bytes()), -1.0);
        assert_eq!(decoder(32, 4, true).decode_sample(&0.25f32.to_le_bytes()), 0.25);
    }
}
