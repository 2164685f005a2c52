//! Tests for the streaming node, its buffer and its errors.
//!
//! WAV fixtures are written in memory with `hound`.

use std::f32::consts::PI;
use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavSpecEx, WavWriter};

use super::{AudioStreamNode, DecoderFactory};
use crate::ArrayWithUnits;

mod buffer_tests;

/// Sample encodings the fixtures can produce.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Encoding {
    Int8,
    Int16,
    Int24,
    /// 24 significant bits in 4-byte containers (WAVE_FORMAT_EXTENSIBLE).
    Int24Padded,
    Int32,
    Float32,
}

impl Encoding {
    fn spec(self, sample_rate: u32, channels: u16) -> WavSpecEx {
        let (bits_per_sample, bytes_per_sample, sample_format) = match self {
            Self::Int8 => (8, 1, SampleFormat::Int),
            Self::Int16 => (16, 2, SampleFormat::Int),
            Self::Int24 => (24, 3, SampleFormat::Int),
            Self::Int24Padded => (24, 4, SampleFormat::Int),
            Self::Int32 => (32, 4, SampleFormat::Int),
            Self::Float32 => (32, 4, SampleFormat::Float),
        };
        WavSpecEx {
            spec: WavSpec {
                channels,
                sample_rate,
                bits_per_sample,
                sample_format,
            },
            bytes_per_sample,
        }
    }
}

/// Encodes `frames` (one inner slice per frame) as an in-memory WAV file.
pub(crate) fn wav_bytes(frames: &[Vec<f32>], sample_rate: u32, encoding: Encoding) -> Vec<u8> {
    let channels = frames.first().map_or(1, |f| f.len() as u16);
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new_with_spec_ex(&mut cursor, encoding.spec(sample_rate, channels)).unwrap();
    for sample in frames.iter().flatten().copied() {
        match encoding {
            Encoding::Int8 => writer.write_sample((sample * 128.0) as i8).unwrap(),
            Encoding::Int16 => writer.write_sample((sample * 32_768.0) as i16).unwrap(),
            Encoding::Int24 | Encoding::Int24Padded => {
                writer.write_sample((sample * 8_388_608.0) as i32).unwrap();
            }
            Encoding::Int32 => writer.write_sample((sample * 2_147_483_648.0) as i32).unwrap(),
            Encoding::Float32 => writer.write_sample(sample).unwrap(),
        }
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

/// A mono 16-bit sine tone.
pub(crate) fn sine_wav(seconds: usize, sample_rate: u32, frequency: f32) -> Vec<u8> {
    let frames: Vec<Vec<f32>> = (0..seconds * sample_rate as usize)
        .map(|i| vec![0.5 * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin()])
        .collect();
    wav_bytes(&frames, sample_rate, Encoding::Int16)
}

/// Pushes `bytes` in `chunk`-sized pieces, then drains the node.
pub(crate) fn run_to_end<F: DecoderFactory>(
    node: &mut AudioStreamNode<F>,
    bytes: &[u8],
    chunk: usize,
) -> Vec<ArrayWithUnits<f32>> {
    let mut out: Vec<ArrayWithUnits<f32>> = bytes
        .chunks(chunk)
        .filter_map(|piece| node.push(piece).unwrap())
        .collect();
    for chunk in node.finish().unwrap() {
        out.push(chunk.unwrap());
    }
    out
}

/// Total frames along the Time axis of `chunks`.
pub(crate) fn total_frames(chunks: &[ArrayWithUnits<f32>]) -> usize {
    chunks.iter().map(|c| c.len_of(0)).sum()
}
