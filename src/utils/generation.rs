//! Test signal generation.

use ndarray::Array1;
use num_traits::FloatConst;

use crate::audio::AudioSamples;
use crate::time::{AudioSampleRate, Duration};
use crate::{ArrayResult, RealFloat, to_precision};

/// Generates a mono sine wave.
///
/// The number of frames is the number of whole sample periods in `duration`.
///
/// # Arguments
/// * `frequency` - Frequency of the sine wave in Hz
/// * `duration` - Length of the signal
/// * `sample_rate` - Sample rate of the result
/// * `amplitude` - Peak amplitude
///
/// # Errors
/// Returns an error only if the generated buffer cannot be wrapped, which
/// does not happen for a 1-D buffer.
///
/// # Examples
///
/// ```rust
/// use audio_dims::{AudioSampleRate, Duration};
/// use audio_dims::utils::generation::sine_wave;
///
/// let tone = sine_wave(440.0f32, Duration::seconds(1), AudioSampleRate::Hz44100, 0.5).unwrap();
/// assert_eq!(tone.len(), 44100);
/// ```
pub fn sine_wave<F: RealFloat>(
    frequency: F,
    duration: Duration,
    sample_rate: AudioSampleRate,
    amplitude: F,
) -> ArrayResult<AudioSamples<F>> {
    let frames = usize::try_from(duration.div_floor(sample_rate.rate().step())).unwrap_or(0);
    let sample_rate_f = to_precision::<F, _>(sample_rate.hz());
    let two_pi_freq = to_precision::<F, _>(2.0) * F::PI() * frequency;

    let samples = Array1::from_shape_fn(frames, |i| {
        let t = to_precision::<F, _>(i) / sample_rate_f;
        amplitude * (two_pi_freq * t).sin()
    });
    AudioSamples::new(samples, sample_rate)
}
