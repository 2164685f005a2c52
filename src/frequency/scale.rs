//! Ordered partitions of a frequency range into bands.
//!
//! A [`Scale`] always covers one outer band exactly: its member bands are
//! contiguous, strictly increasing and share their edges, so the stop of band
//! `i` is bit-for-bit the start of band `i + 1`.
//!
//! ```rust
//! use audio_dims::{FrequencyBand, Scale};
//!
//! let scale = Scale::linear(FrequencyBand::new(0.0, 10000.0), 100).unwrap();
//! let selected = scale.bands_overlapping(&FrequencyBand::new(1000.0, 5000.0));
//! assert_eq!(selected.len(), 40);
//! assert_eq!(selected[0].start_hz(), 1000.0);
//! ```

use std::fmt::{self, Display};
use std::ops::{Index, Range};

use super::band::FrequencyBand;
use crate::{ArrayError, ArrayResult};

/// How the bands of a [`Scale`] were laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleKind {
    /// Equal-width bands.
    Linear,
    /// Each band is `growth` times wider than the one below it.
    Logarithmic {
        /// Ratio between successive bandwidths.
        growth: f64,
    },
    /// An arbitrary contiguous band list.
    Explicit,
}

/// An ordered, contiguous, non-overlapping sequence of frequency bands.
///
/// Two scales are equal when their band sequences are equal, regardless of
/// how they were constructed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Scale {
    bands: Vec<FrequencyBand>,
    kind: ScaleKind,
}

fn validate_outer(band: &FrequencyBand, n_bands: usize) -> ArrayResult<()> {
    if n_bands == 0 {
        return Err(ArrayError::InvalidScale(
            "a scale needs at least one band".to_string(),
        ));
    }
    if !band.start_hz().is_finite() || !band.stop_hz().is_finite() || band.is_empty() {
        return Err(ArrayError::InvalidScale(format!(
            "outer band {band} must satisfy start_hz < stop_hz"
        )));
    }
    Ok(())
}

impl Scale {
    /// Splits `band` into `n_bands` bands of equal width.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidScale`] if `n_bands` is zero or `band` is
    /// empty.
    pub fn linear(band: FrequencyBand, n_bands: usize) -> ArrayResult<Self> {
        validate_outer(&band, n_bands)?;
        let width = band.bandwidth() / n_bands as f64;
        let edges = (0..=n_bands).map(|k| {
            if k == n_bands {
                band.stop_hz()
            } else {
                band.start_hz() + width * k as f64
            }
        });
        Self::from_edges(edges, ScaleKind::Linear)
    }

    /// Splits `band` into `n_bands` bands whose widths grow geometrically.
    ///
    /// The lowest band is the narrowest when `growth > 1`; each subsequent band
    /// is `growth` times wider than the one before. A growth of exactly one is
    /// equivalent to [`Scale::linear`].
    ///
    /// Only the widths are geometric: the center frequencies form a geometric
    /// progression only when the edges do, which is what [`Scale::geometric`]
    /// builds. Use that for constant-Q style spacing.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidScale`] if `n_bands` is zero, `band` is
    /// empty, `growth` is not a positive finite number, or the growth is so
    /// extreme that the band edges cannot be represented.
    pub fn logarithmic(band: FrequencyBand, n_bands: usize, growth: f64) -> ArrayResult<Self> {
        validate_outer(&band, n_bands)?;
        if !growth.is_finite() || growth <= 0.0 {
            return Err(ArrayError::InvalidScale(format!(
                "growth must be a positive finite number, got {growth}"
            )));
        }
        if growth == 1.0 {
            let linear = Self::linear(band, n_bands)?;
            return Ok(Self {
                kind: ScaleKind::Logarithmic { growth },
                ..linear
            });
        }

        // Widths w, w*g, w*g^2, ... sum to the outer bandwidth.
        let total_growth = growth.powi(n_bands as i32);
        let first_width = band.bandwidth() * (growth - 1.0) / (total_growth - 1.0);
        let edges = (0..=n_bands).map(|k| {
            if k == n_bands {
                band.stop_hz()
            } else {
                band.start_hz() + first_width * (growth.powi(k as i32) - 1.0) / (growth - 1.0)
            }
        });
        Self::from_edges(edges, ScaleKind::Logarithmic { growth })
    }

    /// Splits `band` into `n_bands` bands whose edges form a geometric
    /// progression from `start_hz` to `stop_hz`.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidScale`] if `band.start_hz()` is not
    /// strictly positive, or for the reasons listed on [`Scale::logarithmic`].
    pub fn geometric(band: FrequencyBand, n_bands: usize) -> ArrayResult<Self> {
        validate_outer(&band, n_bands)?;
        if band.start_hz() <= 0.0 {
            return Err(ArrayError::InvalidScale(format!(
                "geometric scales need start_hz > 0, got {}",
                band.start_hz()
            )));
        }
        let growth = (band.stop_hz() / band.start_hz()).powf(1.0 / n_bands as f64);
        Self::logarithmic(band, n_bands, growth)
    }

    /// Builds a scale from an explicit list of contiguous bands.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidScale`] if the list is empty, a band is
    /// empty, or a band does not start exactly where the previous one stops.
    pub fn from_bands(bands: Vec<FrequencyBand>) -> ArrayResult<Self> {
        if bands.is_empty() {
            return Err(ArrayError::InvalidScale(
                "a scale needs at least one band".to_string(),
            ));
        }
        for (i, band) in bands.iter().enumerate() {
            if band.is_empty() {
                return Err(ArrayError::InvalidScale(format!("band {i} ({band}) is empty")));
            }
            if i > 0 && bands[i - 1].stop_hz() != band.start_hz() {
                return Err(ArrayError::InvalidScale(format!(
                    "band {i} ({band}) does not start where band {} ({}) stops",
                    i - 1,
                    bands[i - 1]
                )));
            }
        }
        Ok(Self {
            bands,
            kind: ScaleKind::Explicit,
        })
    }

    fn from_edges(edges: impl Iterator<Item = f64>, kind: ScaleKind) -> ArrayResult<Self> {
        let edges: Vec<f64> = edges.collect();
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ArrayError::InvalidScale(
                "band edges are not strictly increasing".to_string(),
            ));
        }
        let bands = edges
            .windows(2)
            .map(|w| FrequencyBand::new(w[0], w[1]))
            .collect();
        Ok(Self { bands, kind })
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always false; a scale has at least one band.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Alias of [`Scale::len`].
    pub fn n_bands(&self) -> usize {
        self.len()
    }

    /// How the bands were laid out.
    pub const fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// The `index`-th band, lowest first.
    pub fn get(&self, index: usize) -> Option<&FrequencyBand> {
        self.bands.get(index)
    }

    /// All bands, lowest first.
    pub fn bands(&self) -> &[FrequencyBand] {
        &self.bands
    }

    /// Iterates over the bands, lowest first.
    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyBand> {
        self.bands.iter()
    }

    /// Lower edge of the lowest band.
    pub fn start_hz(&self) -> f64 {
        self.bands.first().map_or(0.0, FrequencyBand::start_hz)
    }

    /// Upper edge of the highest band.
    pub fn stop_hz(&self) -> f64 {
        self.bands.last().map_or(0.0, FrequencyBand::stop_hz)
    }

    /// The outer band the scale partitions.
    pub fn frequency_band(&self) -> FrequencyBand {
        FrequencyBand::new(self.start_hz(), self.stop_hz())
    }

    /// Centre frequency of every band, lowest first.
    pub fn center_frequencies(&self) -> Vec<f64> {
        self.bands.iter().map(FrequencyBand::center_frequency).collect()
    }

    /// Indices of every band that intersects `query`, even partially.
    ///
    /// Bands are half-open, so a band that merely touches an edge of `query`
    /// is not included. The range is empty when nothing intersects.
    pub fn overlapping_range(&self, query: &FrequencyBand) -> Range<usize> {
        let start = self.bands.partition_point(|b| b.stop_hz() <= query.start_hz());
        if query.is_empty() {
            return start..start;
        }
        let stop = self.bands.partition_point(|b| b.start_hz() < query.stop_hz());
        start..stop.max(start)
    }

    /// Every band that intersects `query`, in order.
    pub fn bands_overlapping(&self, query: &FrequencyBand) -> &[FrequencyBand] {
        &self.bands[self.overlapping_range(query)]
    }

    /// The scale made of bands `range`, or `None` if the range is empty or out
    /// of bounds.
    pub fn narrow(&self, range: Range<usize>) -> Option<Self> {
        if range.is_empty() || range.end > self.bands.len() {
            return None;
        }
        Some(Self {
            bands: self.bands[range].to_vec(),
            kind: self.kind,
        })
    }

    /// Joins scales end to end, or returns `None` unless each one starts exactly
    /// where the previous one stops.
    pub fn concatenate(scales: &[&Self]) -> Option<Self> {
        let (first, rest) = scales.split_first()?;
        let mut bands = first.bands.clone();
        for scale in rest {
            if scale.start_hz() != bands.last()?.stop_hz() {
                return None;
            }
            bands.extend_from_slice(&scale.bands);
        }
        let kind = if rest.is_empty() {
            first.kind
        } else {
            ScaleKind::Explicit
        };
        Some(Self { bands, kind })
    }
}

impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.bands == other.bands
    }
}

impl Index<usize> for Scale {
    type Output = FrequencyBand;

    fn index(&self, index: usize) -> &FrequencyBand {
        &self.bands[index]
    }
}

impl<'a> IntoIterator for &'a Scale {
    type Item = &'a FrequencyBand;
    type IntoIter = std::slice::Iter<'a, FrequencyBand>;

    fn into_iter(self) -> Self::IntoIter {
        self.bands.iter()
    }
}

impl Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            ScaleKind::Linear => "LinearScale",
            ScaleKind::Logarithmic { .. } => "LogScale",
            ScaleKind::Explicit => "Scale",
        };
        write!(f, "{name}({}, {} bands)", self.frequency_band(), self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partitions(scale: &Scale, outer: FrequencyBand) {
        assert_eq!(scale.start_hz(), outer.start_hz());
        assert_eq!(scale.stop_hz(), outer.stop_hz());
        for pair in scale.bands().windows(2) {
            assert!(pair[0].start_hz() < pair[1].start_hz());
            assert!(pair[0].stop_hz() < pair[1].stop_hz());
            assert_eq!(pair[0].stop_hz(), pair[1].start_hz());
        }
    }

    #[test]
    fn test_linear_scale_partitions_band() {
        for (start, stop, n) in [(20.0, 22050.0, 100), (0.0, 1.0, 1), (0.0, 10000.0, 7), (3.5, 4.25, 333)] {
            let outer = FrequencyBand::new(start, stop);
            let scale = Scale::linear(outer, n).unwrap();
            assert_eq!(scale.len(), n);
            assert_partitions(&scale, outer);
        }
    }

    #[test]
    fn test_logarithmic_scale_partitions_band() {
        let outer = FrequencyBand::new(20.0, 20000.0);
        let scale = Scale::logarithmic(outer, 64, 1.1).unwrap();
        assert_eq!(scale.len(), 64);
        assert_partitions(&scale, outer);
        let ratio = scale[10].bandwidth() / scale[9].bandwidth();
        assert!((ratio - 1.1).abs() < 1e-9);
        assert!(matches!(scale.kind(), ScaleKind::Logarithmic { .. }));
    }

    #[test]
    fn test_geometric_scale_edges() {
        let outer = FrequencyBand::new(100.0, 1600.0);
        let scale = Scale::geometric(outer, 4).unwrap();
        assert_partitions(&scale, outer);
        for (band, expected) in scale.iter().zip([200.0, 400.0, 800.0, 1600.0]) {
            assert!((band.stop_hz() - expected).abs() < 1e-9);
        }
        assert!(Scale::geometric(FrequencyBand::new(0.0, 100.0), 4).is_err());
    }

    #[test]
    fn test_only_geometric_scales_have_geometric_centers() {
        let center_ratios = |scale: &Scale| -> Vec<f64> {
            scale
                .iter()
                .collect::<Vec<_>>()
                .windows(2)
                .map(|w| w[1].center_frequency() / w[0].center_frequency())
                .collect()
        };

        let geometric = Scale::geometric(FrequencyBand::new(100.0, 1600.0), 4).unwrap();
        assert!(center_ratios(&geometric).iter().all(|r| (r - 2.0).abs() < 1e-9));

        let widths_only = Scale::logarithmic(FrequencyBand::new(0.0, 1500.0), 4, 2.0).unwrap();
        let ratios = center_ratios(&widths_only);
        assert!((ratios[0] - ratios[1]).abs() > 0.1);
    }

    #[test]
    fn test_unit_growth_matches_linear() {
        let outer = FrequencyBand::new(0.0, 1000.0);
        assert_eq!(
            Scale::logarithmic(outer, 10, 1.0).unwrap(),
            Scale::linear(outer, 10).unwrap()
        );
    }

    #[test]
    fn test_invalid_scale_parameters() {
        let outer = FrequencyBand::new(20.0, 22050.0);
        assert!(matches!(Scale::linear(outer, 0), Err(ArrayError::InvalidScale(_))));
        assert!(matches!(
            Scale::linear(FrequencyBand::new(100.0, 100.0), 4),
            Err(ArrayError::InvalidScale(_))
        ));
        assert!(Scale::linear(FrequencyBand::new(200.0, 100.0), 4).is_err());
        assert!(Scale::logarithmic(outer, 10, 0.0).is_err());
        assert!(Scale::logarithmic(outer, 10, f64::NAN).is_err());
    }

    #[test]
    fn test_overlapping_bands_include_partial_overlaps() {
        let scale = Scale::linear(FrequencyBand::new(20.0, 22050.0), 100).unwrap();
        let query = FrequencyBand::new(9000.0, 11000.0);
        let range = scale.overlapping_range(&query);
        let selected = scale.bands_overlapping(&query);
        assert_eq!(selected.len(), range.len());
        assert!(selected.first().unwrap().start_hz() <= 9000.0);
        assert!(selected.last().unwrap().stop_hz() >= 11000.0);
        assert_eq!(range, scale.overlapping_range(&query));

        let narrowed = Scale::from_bands(selected.to_vec()).unwrap();
        assert_eq!(narrowed.len(), range.len());
    }

    #[test]
    fn test_band_spanning_bins_selects_exactly_those_bins() {
        let scale = Scale::linear(FrequencyBand::new(20.0, 22050.0), 100).unwrap();
        let wide = FrequencyBand::new(scale[0].start_hz(), scale[9].stop_hz());
        assert_eq!(scale.overlapping_range(&wide), 0..10);
        assert_eq!(scale.overlapping_range(&scale[42]), 42..43);
        assert!(scale.overlapping_range(&FrequencyBand::new(0.0, 10.0)).is_empty());
        assert!(scale.overlapping_range(&FrequencyBand::new(30000.0, 40000.0)).is_empty());
    }

    #[test]
    fn test_narrow_and_concatenate() {
        let scale = Scale::linear(FrequencyBand::new(0.0, 1000.0), 10).unwrap();
        let low = scale.narrow(0..4).unwrap();
        let high = scale.narrow(4..10).unwrap();
        assert!(low.stop_hz() < scale.stop_hz());
        assert_eq!(Scale::concatenate(&[&low, &high]).unwrap(), scale);
        assert!(Scale::concatenate(&[&high, &low]).is_none());
        assert!(scale.narrow(3..3).is_none());
        assert!(scale.narrow(8..11).is_none());
    }

    #[test]
    fn test_from_bands_requires_contiguity() {
        let gap = vec![FrequencyBand::new(0.0, 10.0), FrequencyBand::new(20.0, 30.0)];
        assert!(matches!(Scale::from_bands(gap), Err(ArrayError::InvalidScale(_))));
        assert!(Scale::from_bands(Vec::new()).is_err());
        let explicit = Scale::from_bands(vec![
            FrequencyBand::new(0.0, 10.0),
            FrequencyBand::new(10.0, 30.0),
        ])
        .unwrap();
        assert_eq!(explicit.kind(), ScaleKind::Explicit);
        assert_eq!(explicit.center_frequencies(), vec![5.0, 20.0]);
    }
}
