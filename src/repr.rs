//! The dimension-aware array.
//!
//! [`ArrayWithUnits`] pairs a dynamic-rank `ndarray` buffer with one
//! [`Dimension`] per axis. Every operation returns a new array whose
//! dimensions describe the result: slicing narrows or drops axes, reductions
//! collapse them, broadcasting adopts the dimension of the longer operand and
//! concatenation recomputes the joined axis.
//!
//! # Examples
//!
//! ```rust
//! use audio_dims::{ArrayWithUnits, AxisSelector, Dimension, Duration, FrequencyBand, Rate, Scale};
//! use ndarray::Array2;
//!
//! let rate = Rate::constant(Duration::seconds(1)).unwrap();
//! let scale = Scale::linear(FrequencyBand::new(20.0, 22050.0), 100).unwrap();
//! let tf = ArrayWithUnits::new(
//!     Array2::<f64>::ones((30, 100)),
//!     vec![Dimension::Time(rate), Dimension::Frequency(scale)],
//! )
//! .unwrap();
//!
//! let low = tf
//!     .slice(&[AxisSelector::Full, FrequencyBand::new(100.0, 300.0).into()])
//!     .unwrap();
//! assert_eq!(low.shape()[0], 30);
//! assert!(low.dims()[1].is_frequency());
//! ```

use std::fmt::{self, Display};
use std::ops::Range;

use ndarray::{Array, ArrayD, ArrayView1, ArrayViewD, Axis, IxDyn, Slice, Zip};

use crate::dimension::Dimension;
use crate::frequency::{Scale, Weighting};
use crate::selector::AxisSelector;
use crate::time::Rate;
use crate::{ArrayError, ArrayResult, RealFloat, to_precision};

/// Reductions available to [`ArrayWithUnits::reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Sum of the elements.
    Sum,
    /// Arithmetic mean of the elements.
    Mean,
    /// Largest element.
    Max,
    /// Smallest element.
    Min,
}

impl Reduction {
    fn along<T: RealFloat>(self, data: &ArrayD<T>, axis: usize) -> ArrayResult<ArrayD<T>> {
        let ax = Axis(axis);
        if data.len_of(ax) == 0 && self != Self::Sum {
            return Err(ArrayError::invalid_parameter(
                "axis",
                format!("cannot take the {self} of empty axis {axis}"),
            ));
        }
        let reduced = match self {
            Self::Sum => data.sum_axis(ax),
            Self::Mean => data.mean_axis(ax).ok_or_else(|| {
                ArrayError::invalid_parameter("axis", format!("axis {axis} is empty"))
            })?,
            Self::Max => data.fold_axis(ax, T::neg_infinity(), |&acc, &x| acc.max(x)),
            Self::Min => data.fold_axis(ax, T::infinity(), |&acc, &x| acc.min(x)),
        };
        Ok(reduced)
    }

    fn all<T: RealFloat>(self, data: &ArrayD<T>) -> ArrayResult<T> {
        if data.is_empty() && self != Self::Sum {
            return Err(ArrayError::invalid_parameter(
                "data",
                format!("cannot take the {self} of an empty array"),
            ));
        }
        let value = match self {
            Self::Sum => data.sum(),
            Self::Mean => data
                .mean()
                .ok_or_else(|| ArrayError::invalid_parameter("data", "array is empty"))?,
            Self::Max => data.iter().fold(T::neg_infinity(), |acc, &x| acc.max(x)),
            Self::Min => data.iter().fold(T::infinity(), |acc, &x| acc.min(x)),
        };
        Ok(value)
    }
}

impl Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Max => "max",
            Self::Min => "min",
        };
        f.write_str(name)
    }
}

/// Elementwise arithmetic used by [`ArrayWithUnits::elementwise`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
}

impl BinaryOp {
    /// Applies the operation to a pair of elements.
    pub fn apply<T: RealFloat>(self, a: T, b: T) -> T {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
        }
    }
}

/// How one axis is treated while slicing.
#[derive(Debug)]
enum AxisPlan {
    Keep,
    Range(Range<usize>, Dimension),
    Index(usize),
    List(Vec<usize>),
}

/// An N-dimensional array whose axes carry semantic [`Dimension`]s.
///
/// The number of dimensions always equals the array rank, and every
/// dimension agrees with the length of its axis. Instances are immutable;
/// every transformation returns a new array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayWithUnits<T: RealFloat> {
    data: ArrayD<T>,
    dims: Vec<Dimension>,
}

impl<T: RealFloat> ArrayWithUnits<T> {
    /// Binds `dims` to the axes of `data`.
    ///
    /// # Errors
    /// Returns [`ArrayError::DimensionMismatch`] if the number of dimensions
    /// differs from the rank of `data`, or if a dimension disagrees with the
    /// length of its axis (a frequency scale whose band count differs from the
    /// axis length).
    pub fn new<D>(data: Array<T, D>, dims: Vec<Dimension>) -> ArrayResult<Self>
    where
        D: ndarray::Dimension,
    {
        let data = data.into_dyn();
        if dims.len() != data.ndim() {
            return Err(ArrayError::dimension_mismatch(format!(
                "{} dimensions given for an array of rank {}",
                dims.len(),
                data.ndim()
            )));
        }
        for (axis, dim) in dims.iter().enumerate() {
            dim.validate(axis, data.len_of(Axis(axis)))?;
        }
        Ok(Self { data, dims })
    }

    /// Builds an array from `data` reusing the dimensions of `template`.
    ///
    /// # Errors
    /// Returns [`ArrayError::DimensionMismatch`] if `data` and `template` have
    /// different shapes.
    pub fn from_example<D>(data: Array<T, D>, template: &Self) -> ArrayResult<Self>
    where
        D: ndarray::Dimension,
    {
        if data.shape() != template.shape() {
            return Err(ArrayError::dimension_mismatch(format!(
                "shape {:?} does not match template shape {:?}",
                data.shape(),
                template.shape()
            )));
        }
        Self::new(data, template.dims.clone())
    }

    /// The raw buffer.
    pub const fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// A view of the raw buffer.
    pub fn view(&self) -> ArrayViewD<'_, T> {
        self.data.view()
    }

    /// One dimension per axis.
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// The dimension of `axis`.
    pub fn dim(&self, axis: usize) -> Option<&Dimension> {
        self.dims.get(axis)
    }

    /// Axis lengths.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of `axis`.
    ///
    /// # Panics
    /// Panics if `axis` is out of bounds.
    pub fn len_of(&self, axis: usize) -> usize {
        self.data.len_of(Axis(axis))
    }

    /// The element at `index`, if in bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.data.get(IxDyn(index))
    }

    /// The first time axis and its rate.
    pub fn time_axis(&self) -> Option<(usize, &Rate)> {
        self.dims
            .iter()
            .enumerate()
            .find_map(|(axis, dim)| dim.rate().map(|rate| (axis, rate)))
    }

    /// The first frequency axis and its scale.
    pub fn frequency_axis(&self) -> Option<(usize, &Scale)> {
        self.dims
            .iter()
            .enumerate()
            .find_map(|(axis, dim)| dim.scale().map(|scale| (axis, scale)))
    }

    /// Splits the array into its buffer and dimensions.
    pub fn into_parts(self) -> (ArrayD<T>, Vec<Dimension>) {
        (self.data, self.dims)
    }

    /// Consumes the array, returning the raw buffer.
    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    fn check_axis(&self, axis: usize) -> ArrayResult<()> {
        if axis >= self.ndim() {
            return Err(ArrayError::invalid_parameter(
                "axis",
                format!("axis {axis} does not exist in an array of rank {}", self.ndim()),
            ));
        }
        Ok(())
    }

    /// Selects a sub-array, one selector per axis.
    ///
    /// Missing trailing selectors keep their axes whole, and a single
    /// [`AxisSelector::Ellipsis`] expands to as many whole axes as needed.
    /// Axes selected by [`AxisSelector::Index`] are dropped, axes selected by
    /// [`AxisSelector::List`] become [`Dimension::Identity`], and range or
    /// domain selections narrow the axis's dimension.
    ///
    /// # Errors
    /// - [`ArrayError::AmbiguousSlice`] for more than one ellipsis.
    /// - [`ArrayError::DimensionMismatch`] for more selectors than axes, or a
    ///   domain selector applied to an axis of another domain.
    /// - [`ArrayError::IndexOutOfBounds`] for an index or list entry outside
    ///   its axis.
    pub fn slice(&self, selectors: &[AxisSelector]) -> ArrayResult<Self> {
        let plans = self.plan_slice(selectors)?;

        let mut view = self.data.view();
        for (axis, plan) in plans.iter().enumerate() {
            if let AxisPlan::Range(range, _) = plan {
                view.slice_axis_inplace(Axis(axis), Slice::from(range.clone()));
            }
        }
        let mut data = view.to_owned();
        for (axis, plan) in plans.iter().enumerate() {
            if let AxisPlan::List(indices) = plan {
                data = data.select(Axis(axis), indices);
            }
        }
        for (axis, plan) in plans.iter().enumerate().rev() {
            if let AxisPlan::Index(index) = plan {
                data = data.index_axis_move(Axis(axis), *index);
            }
        }

        let dims = plans
            .into_iter()
            .zip(&self.dims)
            .filter_map(|(plan, dim)| match plan {
                AxisPlan::Keep => Some(dim.clone()),
                AxisPlan::Range(_, narrowed) => Some(narrowed),
                AxisPlan::Index(_) => None,
                AxisPlan::List(_) => Some(Dimension::Identity),
            })
            .collect();
        Ok(Self { data, dims })
    }

    fn plan_slice(&self, selectors: &[AxisSelector]) -> ArrayResult<Vec<AxisPlan>> {
        let ndim = self.ndim();
        let ellipses = selectors
            .iter()
            .filter(|s| matches!(s, AxisSelector::Ellipsis))
            .count();
        if ellipses > 1 {
            return Err(ArrayError::AmbiguousSlice(ellipses));
        }
        let explicit = selectors.len() - ellipses;
        if explicit > ndim {
            return Err(ArrayError::dimension_mismatch(format!(
                "{explicit} selectors given for an array of rank {ndim}"
            )));
        }

        let mut plans = Vec::with_capacity(ndim);
        for selector in selectors {
            if matches!(selector, AxisSelector::Ellipsis) {
                plans.extend((explicit..ndim).map(|_| AxisPlan::Keep));
                continue;
            }
            let axis = plans.len();
            plans.push(self.plan_axis(axis, selector)?);
        }
        while plans.len() < ndim {
            plans.push(AxisPlan::Keep);
        }
        Ok(plans)
    }

    fn plan_axis(&self, axis: usize, selector: &AxisSelector) -> ArrayResult<AxisPlan> {
        let len = self.len_of(axis);
        let dim = &self.dims[axis];
        let out_of_bounds = |index: isize| ArrayError::IndexOutOfBounds { axis, index, len };
        let plan = match selector {
            AxisSelector::Full | AxisSelector::Ellipsis => AxisPlan::Keep,
            AxisSelector::Index(index) => AxisPlan::Index(
                AxisSelector::resolve_index(*index, len).ok_or_else(|| out_of_bounds(*index))?,
            ),
            AxisSelector::Range { start, end } => {
                let range = AxisSelector::clamp_range(*start, *end, len);
                let narrowed = dim.narrow(range.clone());
                AxisPlan::Range(range, narrowed)
            }
            AxisSelector::List(indices) => {
                if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
                    return Err(out_of_bounds(bad as isize));
                }
                AxisPlan::List(indices.clone())
            }
            AxisSelector::Domain(range) => {
                let (indices, narrowed) = dim.select(range, len)?;
                AxisPlan::Range(indices, narrowed)
            }
        };
        Ok(plan)
    }

    /// Reduces along `axis`, or over every element when `axis` is `None`.
    ///
    /// With an axis, the reduced axis stays in place with length one and its
    /// dimension becomes [`Dimension::after_reduction`]; the other axes keep
    /// their dimensions. Without an axis, the result is a single element under
    /// one [`Dimension::Identity`] axis.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidParameter`] if `axis` does not exist, or if
    /// a mean, max or min is taken over no elements.
    pub fn reduce(&self, op: Reduction, axis: Option<usize>) -> ArrayResult<Self> {
        match axis {
            Some(axis) => {
                self.check_axis(axis)?;
                let data = op.along(&self.data, axis)?.insert_axis(Axis(axis));
                let mut dims = self.dims.clone();
                dims[axis] = dims[axis].after_reduction();
                Ok(Self { data, dims })
            }
            None => {
                let value = op.all(&self.data)?;
                Ok(Self {
                    data: ArrayD::from_elem(IxDyn(&[1]), value),
                    dims: vec![Dimension::Identity],
                })
            }
        }
    }

    /// Reduces along `axis` and removes it, together with its dimension.
    ///
    /// # Errors
    /// Same as [`ArrayWithUnits::reduce`].
    pub fn reduce_drop_axis(&self, op: Reduction, axis: usize) -> ArrayResult<Self> {
        self.check_axis(axis)?;
        let data = op.along(&self.data, axis)?;
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Ok(Self { data, dims })
    }

    /// Combines two arrays element by element, broadcasting where allowed.
    ///
    /// Both operands must have the same rank. Per axis, the operands must
    /// either agree on length and dimension, have one side of length one (which
    /// adopts the other side's length and dimension), or have equal lengths
    /// with one side [`Dimension::Identity`] (which adopts the other side's
    /// dimension).
    ///
    /// # Errors
    /// Returns [`ArrayError::Broadcast`] for any other combination.
    pub fn elementwise(&self, other: &Self, op: BinaryOp) -> ArrayResult<Self> {
        if self.ndim() != other.ndim() {
            return Err(ArrayError::broadcast(format!(
                "operands have ranks {} and {}",
                self.ndim(),
                other.ndim()
            )));
        }

        let mut shape = Vec::with_capacity(self.ndim());
        let mut dims = Vec::with_capacity(self.ndim());
        for (axis, (left, right)) in self.dims.iter().zip(&other.dims).enumerate() {
            let (left_len, right_len) = (self.len_of(axis), other.len_of(axis));
            let (len, dim) = if left_len == right_len && (left == right || right.is_identity()) {
                (left_len, left)
            } else if left_len == right_len && left.is_identity() {
                (right_len, right)
            } else if left_len == 1 {
                (right_len, right)
            } else if right_len == 1 {
                (left_len, left)
            } else {
                return Err(ArrayError::broadcast(format!(
                    "axis {axis}: cannot broadcast {left} (len {left_len}) with {right} (len {right_len})"
                )));
            };
            shape.push(len);
            dims.push(dim.clone());
        }

        let target = IxDyn(&shape);
        let broadcast_error = || ArrayError::broadcast(format!("cannot broadcast to shape {shape:?}"));
        let left = self.data.broadcast(target.clone()).ok_or_else(broadcast_error)?;
        let right = other.data.broadcast(target).ok_or_else(broadcast_error)?;
        let data = Zip::from(&left)
            .and(&right)
            .map_collect(|&a, &b| op.apply(a, b));
        Ok(Self { data, dims })
    }

    /// Combines every lane along `axis` with a bare vector, leaving the
    /// dimensions untouched. `axis` defaults to the last axis.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidParameter`] if the axis does not exist and
    /// [`ArrayError::Broadcast`] if the vector length differs from the axis
    /// length.
    pub fn apply_vector(&self, axis: Option<usize>, vector: &[T], op: BinaryOp) -> ArrayResult<Self> {
        let axis = match axis {
            Some(axis) => axis,
            None => self.ndim().checked_sub(1).ok_or_else(|| {
                ArrayError::invalid_parameter("axis", "a scalar array has no last axis")
            })?,
        };
        self.check_axis(axis)?;
        if vector.len() != self.len_of(axis) {
            return Err(ArrayError::broadcast(format!(
                "vector of length {} does not match axis {axis} of length {}",
                vector.len(),
                self.len_of(axis)
            )));
        }

        let vector = ArrayView1::from(vector);
        let mut data = self.data.clone();
        for mut lane in data.lanes_mut(Axis(axis)) {
            lane.zip_mut_with(&vector, |x, &v| *x = op.apply(*x, v));
        }
        Ok(Self {
            data,
            dims: self.dims.clone(),
        })
    }

    /// Combines every element with `scalar`.
    pub fn apply_scalar(&self, scalar: T, op: BinaryOp) -> Self {
        self.map(|x| op.apply(x, scalar))
    }

    /// Applies `f` to every element, keeping the dimensions.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            data: self.data.mapv(f),
            dims: self.dims.clone(),
        }
    }

    /// Scales every band of the frequency axis by the weighting's gain for that
    /// band, broadcasting across the other axes.
    ///
    /// # Errors
    /// Returns [`ArrayError::DimensionMismatch`] if the array has no frequency
    /// axis.
    pub fn weighted<W>(&self, weighting: &W) -> ArrayResult<Self>
    where
        W: Weighting + ?Sized,
    {
        let (axis, scale) = self.frequency_axis().ok_or_else(|| {
            ArrayError::dimension_mismatch("weighting requires a frequency axis")
        })?;
        let weights: Vec<T> = weighting
            .weights(scale)
            .into_iter()
            .map(to_precision::<T, _>)
            .collect();
        self.apply_vector(Some(axis), &weights, BinaryOp::Mul)
    }

    /// Joins arrays along their first axis.
    ///
    /// # Errors
    /// See [`ArrayWithUnits::concat_along`].
    pub fn concat(arrays: &[&Self]) -> ArrayResult<Self> {
        Self::concat_along(arrays, 0)
    }

    /// Joins arrays along `axis`.
    ///
    /// Every other axis must have the same length and dimension in all inputs.
    /// The joined axis's dimension is [`Dimension::concat`] of the inputs'.
    ///
    /// # Errors
    /// - [`ArrayError::InvalidParameter`] for no inputs or a missing axis.
    /// - [`ArrayError::DimensionMismatch`] for differing ranks, other axes or
    ///   dimension kinds.
    /// - [`ArrayError::IncompatibleRate`] for time axes with different rates.
    pub fn concat_along(arrays: &[&Self], axis: usize) -> ArrayResult<Self> {
        let Some((first, rest)) = arrays.split_first() else {
            return Err(ArrayError::invalid_parameter(
                "arrays",
                "need at least one array to concatenate",
            ));
        };
        first.check_axis(axis)?;
        for other in rest {
            if other.ndim() != first.ndim() {
                return Err(ArrayError::dimension_mismatch(format!(
                    "cannot concatenate arrays of rank {} and {}",
                    first.ndim(),
                    other.ndim()
                )));
            }
        }

        let joined = arrays.iter().map(|a| &a.dims[axis]).collect::<Vec<_>>();
        let joined = Dimension::concat(&joined)?;

        for other in rest {
            for i in (0..first.ndim()).filter(|&i| i != axis) {
                if other.dims[i] != first.dims[i] || other.len_of(i) != first.len_of(i) {
                    return Err(ArrayError::dimension_mismatch(format!(
                        "axis {i} differs: {} (len {}) vs {} (len {})",
                        first.dims[i],
                        first.len_of(i),
                        other.dims[i],
                        other.len_of(i)
                    )));
                }
            }
        }

        let views: Vec<ArrayViewD<'_, T>> = arrays.iter().map(|a| a.data.view()).collect();
        let data = ndarray::concatenate(Axis(axis), &views)
            .map_err(|e| ArrayError::dimension_mismatch(e.to_string()))?;

        let mut dims = first.dims.clone();
        dims[axis] = joined;
        Ok(Self { data, dims })
    }
}
