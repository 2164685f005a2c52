//! Time-domain audio as a dimension-aware array.

use ndarray::{Array, Axis};

use crate::dimension::Dimension;
use crate::repr::{ArrayWithUnits, Reduction};
use crate::time::{AudioSampleRate, Duration, Rate, TimeSlice};
use crate::{ArrayError, ArrayResult, RealFloat};

/// Audio samples at a standard sample rate.
///
/// Mono audio is a 1-D `[Time]` array; multi-channel audio is a 2-D
/// `[Time, Identity]` array of frames by channels.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples<T: RealFloat> {
    array: ArrayWithUnits<T>,
    sample_rate: AudioSampleRate,
}

impl<T: RealFloat> AudioSamples<T> {
    /// Wraps a 1-D (mono) or 2-D (frames x channels) buffer.
    ///
    /// # Errors
    /// Returns [`ArrayError::DimensionMismatch`] for any other rank.
    pub fn new<D>(data: Array<T, D>, sample_rate: AudioSampleRate) -> ArrayResult<Self>
    where
        D: ndarray::Dimension,
    {
        let time = Dimension::Time(sample_rate.rate());
        let dims = match data.ndim() {
            1 => vec![time],
            2 => vec![time, Dimension::Identity],
            n => {
                return Err(ArrayError::dimension_mismatch(format!(
                    "audio samples must be 1-D or 2-D, got rank {n}"
                )));
            }
        };
        Ok(Self {
            array: ArrayWithUnits::new(data, dims)?,
            sample_rate,
        })
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        if self.array.ndim() == 1 {
            1
        } else {
            self.array.len_of(1)
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.array.len_of(0)
    }

    /// True if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sample rate.
    pub const fn sample_rate(&self) -> AudioSampleRate {
        self.sample_rate
    }

    /// The time-axis rate.
    pub fn rate(&self) -> Rate {
        self.sample_rate.rate()
    }

    /// Total playing time.
    pub fn duration(&self) -> Duration {
        self.rate().span_of(self.len())
    }

    /// Timestamp just past the last frame, measured from the first.
    pub fn end(&self) -> Duration {
        self.duration()
    }

    /// The average of all channels, as mono audio.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidParameter`] if there are no channels to
    /// average.
    pub fn mono(&self) -> ArrayResult<Self> {
        if self.array.ndim() == 1 {
            return Ok(self.clone());
        }
        Ok(Self {
            array: self.array.reduce_drop_axis(Reduction::Mean, 1)?,
            sample_rate: self.sample_rate,
        })
    }

    /// Joins audio end to end.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleRate`] if the sample rates differ and
    /// [`ArrayError::DimensionMismatch`] if the channel layouts differ.
    pub fn concat(parts: &[&Self]) -> ArrayResult<Self> {
        let arrays: Vec<&ArrayWithUnits<T>> = parts.iter().map(|p| &p.array).collect();
        Self::try_from(ArrayWithUnits::concat(&arrays)?)
    }

    /// Appends `others` after this audio.
    ///
    /// # Errors
    /// Same as [`AudioSamples::concat`].
    pub fn concat_with(&self, others: &[&Self]) -> ArrayResult<Self> {
        let mut parts = Vec::with_capacity(others.len() + 1);
        parts.push(self);
        parts.extend_from_slice(others);
        Self::concat(&parts)
    }

    /// The frames that fall inside `slice`.
    ///
    /// # Errors
    /// Propagates slicing errors from [`ArrayWithUnits::slice`].
    pub fn slice_time(&self, slice: TimeSlice) -> ArrayResult<Self> {
        Ok(Self {
            array: self.array.slice(&[slice.into()])?,
            sample_rate: self.sample_rate,
        })
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> Option<ndarray::ArrayViewD<'_, T>> {
        match self.array.ndim() {
            1 if index == 0 => Some(self.array.view()),
            2 if index < self.channels() => Some(self.array.data().index_axis(Axis(1), index)),
            _ => None,
        }
    }

    /// The underlying array.
    pub const fn as_array(&self) -> &ArrayWithUnits<T> {
        &self.array
    }

    /// Consumes the audio, returning the underlying array.
    pub fn into_array(self) -> ArrayWithUnits<T> {
        self.array
    }
}

impl<T: RealFloat> TryFrom<ArrayWithUnits<T>> for AudioSamples<T> {
    type Error = ArrayError;

    fn try_from(array: ArrayWithUnits<T>) -> ArrayResult<Self> {
        let dims = array.dims();
        if dims.is_empty() || dims.len() > 2 {
            return Err(ArrayError::dimension_mismatch(format!(
                "audio samples must be 1-D or 2-D, got rank {}",
                dims.len()
            )));
        }
        let rate = dims[0].rate().ok_or_else(|| {
            ArrayError::dimension_mismatch(format!("first axis must be Time, got {}", dims[0]))
        })?;
        let sample_rate = AudioSampleRate::from_rate(rate).ok_or_else(|| {
            ArrayError::InvalidRate(format!("{rate} is not a standard audio sample rate"))
        })?;
        if let Some(channel_dim) = dims.get(1).filter(|d| !d.is_identity()) {
            return Err(ArrayError::dimension_mismatch(format!(
                "channel axis must be Identity, got {channel_dim}"
            )));
        }
        Ok(Self { array, sample_rate })
    }
}

impl<T: RealFloat> From<AudioSamples<T>> for ArrayWithUnits<T> {
    fn from(audio: AudioSamples<T>) -> Self {
        audio.array
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array3};

    fn stereo_silence(seconds: f64) -> AudioSamples<f64> {
        let frames = (44100.0 * seconds) as usize;
        AudioSamples::new(Array2::zeros((frames, 2)), AudioSampleRate::Hz44100).unwrap()
    }

    #[test]
    fn test_rejects_non_audio_rate() {
        let one_second = Rate::constant(Duration::seconds(1)).unwrap();
        let array = ArrayWithUnits::new(Array1::<f64>::zeros(10), vec![Dimension::Time(one_second)]).unwrap();
        assert!(matches!(
            AudioSamples::try_from(array),
            Err(ArrayError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_rejects_more_than_two_dimensions() {
        let result = AudioSamples::new(Array3::<f32>::zeros((4, 2, 2)), AudioSampleRate::Hz44100);
        assert!(matches!(result, Err(ArrayError::DimensionMismatch(_))));
    }

    #[test]
    fn test_channels_and_rate() {
        let mono = AudioSamples::new(Array1::<f32>::zeros(110_250), AudioSampleRate::Hz44100).unwrap();
        assert_eq!(mono.channels(), 1);
        assert_eq!(mono.sample_rate(), AudioSampleRate::Hz44100);
        assert_eq!(mono.duration(), Duration::milliseconds(2500));

        let stereo = stereo_silence(2.5);
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.len(), 110_250);
        assert!(stereo.channel(1).is_some());
        assert!(stereo.channel(2).is_none());
    }

    #[test]
    fn test_sum_to_mono() {
        let data = Array2::from_shape_fn((100, 2), |(_, c)| if c == 0 { 1.0 } else { 0.0 });
        let stereo = AudioSamples::new(data, AudioSampleRate::Hz48000).unwrap();
        let mono = stereo.mono().unwrap();
        assert_eq!(mono.channels(), 1);
        assert_eq!(mono.sample_rate(), AudioSampleRate::Hz48000);
        assert!(mono.as_array().data().iter().all(|&x| x == 0.5));
    }

    #[test]
    fn test_concat() {
        let a = AudioSamples::new(Array1::<f32>::zeros(44100 * 2), AudioSampleRate::Hz44100).unwrap();
        let b = AudioSamples::new(Array1::<f32>::zeros(44100), AudioSampleRate::Hz44100).unwrap();
        assert_eq!(AudioSamples::concat(&[&a, &b]).unwrap().len(), 44100 * 3);
        assert_eq!(a.concat_with(&[&b]).unwrap().len(), 44100 * 3);

        let c = AudioSamples::new(Array1::<f32>::zeros(44100), AudioSampleRate::Hz11025).unwrap();
        assert!(matches!(
            AudioSamples::concat(&[&a, &c]),
            Err(ArrayError::IncompatibleRate { .. })
        ));
    }

    #[test]
    fn test_sum_along_time_axis_loses_time() {
        let stereo = stereo_silence(2.5);
        let summed = stereo.as_array().reduce_drop_axis(Reduction::Sum, 0).unwrap();
        assert_eq!(summed.dims(), &[Dimension::Identity]);
        assert!(AudioSamples::try_from(summed).is_err());
    }

    #[test]
    fn test_sum_along_channel_axis_keeps_audio() {
        let stereo = stereo_silence(2.5);
        let summed = stereo.as_array().reduce_drop_axis(Reduction::Sum, 1).unwrap();
        let audio = AudioSamples::try_from(summed).unwrap();
        assert_eq!(audio.channels(), 1);
        assert_eq!(audio.sample_rate(), AudioSampleRate::Hz44100);
    }

    #[test]
    fn test_slice_time() {
        let stereo = stereo_silence(10.0);
        let tail = stereo
            .slice_time(TimeSlice::new(Duration::milliseconds(9500), Duration::seconds(1)))
            .unwrap();
        assert_eq!(tail.len(), 22050);
        assert_eq!(tail.channels(), 2);
    }
}
