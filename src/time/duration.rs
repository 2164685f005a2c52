//! Fixed-resolution integer time arithmetic.
//!
//! Every [`Duration`] is an integer count of ticks, where one tick is
//! `1 / 705_600_000_000` of a second. The resolution is chosen so that the
//! sample period of every common audio rate (8 kHz through 192 kHz, including
//! the 44.1 kHz family) is a whole number of ticks, which keeps repeated
//! scaling and slicing free of floating-point drift.
//!
//! ```rust
//! use audio_dims::Duration;
//!
//! let step = Duration::seconds(1) / 44100;
//! assert_eq!(step * 44100, Duration::seconds(1));
//! assert_eq!(Duration::milliseconds(1500) / Duration::seconds(1), 1.5);
//! ```

use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i64 = 705_600_000_000;

const TICKS_PER_MILLISECOND: i64 = TICKS_PER_SECOND / 1_000;
const TICKS_PER_MICROSECOND: i64 = TICKS_PER_SECOND / 1_000_000;
const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;

/// Units a [`Duration`] can be declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    /// 3600 seconds.
    Hours,
    /// 60 seconds.
    Minutes,
    /// One second.
    Seconds,
    /// 1e-3 seconds.
    Milliseconds,
    /// 1e-6 seconds.
    Microseconds,
    /// The base resolution, `1 / TICKS_PER_SECOND` seconds.
    Ticks,
}

impl TimeUnit {
    /// Number of ticks in one unit.
    pub const fn ticks(self) -> i64 {
        match self {
            Self::Hours => TICKS_PER_HOUR,
            Self::Minutes => TICKS_PER_MINUTE,
            Self::Seconds => TICKS_PER_SECOND,
            Self::Milliseconds => TICKS_PER_MILLISECOND,
            Self::Microseconds => TICKS_PER_MICROSECOND,
            Self::Ticks => 1,
        }
    }
}

/// An exact span of elapsed time, stored as a signed tick count.
///
/// Arithmetic never rounds except where it must: integer division and
/// [`Duration::mul_ratio`] truncate toward zero at tick resolution.
///
/// The representable range is [`Duration::MIN`] to [`Duration::MAX`], about
/// 151 days either way. Constructors and the arithmetic operators saturate
/// at those bounds; use [`Duration::checked_add`], [`Duration::checked_sub`]
/// or [`Duration::checked_mul`] to detect overflow instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    ticks: i64,
}

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self { ticks: 0 };

    /// The longest representable duration.
    pub const MAX: Self = Self { ticks: i64::MAX };

    /// The most negative representable duration.
    pub const MIN: Self = Self { ticks: i64::MIN };

    /// Creates a duration from `count` units, saturating at the
    /// representable range.
    pub const fn new(count: i64, unit: TimeUnit) -> Self {
        Self {
            ticks: count.saturating_mul(unit.ticks()),
        }
    }

    /// Creates a duration from `count` units, or `None` if it does not fit.
    pub const fn checked_new(count: i64, unit: TimeUnit) -> Option<Self> {
        match count.checked_mul(unit.ticks()) {
            Some(ticks) => Some(Self { ticks }),
            None => None,
        }
    }

    /// Creates a duration from a raw tick count.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Creates a duration of `count` hours.
    pub const fn hours(count: i64) -> Self {
        Self::new(count, TimeUnit::Hours)
    }

    /// Creates a duration of `count` minutes.
    pub const fn minutes(count: i64) -> Self {
        Self::new(count, TimeUnit::Minutes)
    }

    /// Creates a duration of `count` seconds.
    pub const fn seconds(count: i64) -> Self {
        Self::new(count, TimeUnit::Seconds)
    }

    /// Creates a duration of `count` milliseconds.
    pub const fn milliseconds(count: i64) -> Self {
        Self::new(count, TimeUnit::Milliseconds)
    }

    /// Creates a duration of `count` microseconds.
    pub const fn microseconds(count: i64) -> Self {
        Self::new(count, TimeUnit::Microseconds)
    }

    /// The raw tick count.
    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    /// True if this duration is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.ticks > 0
    }

    /// The duration in (possibly fractional) seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.ticks as f64 / TICKS_PER_SECOND as f64
    }

    /// `self + rhs`, or `None` on overflow.
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.ticks.checked_add(rhs.ticks) {
            Some(ticks) => Some(Self { ticks }),
            None => None,
        }
    }

    /// `self - rhs`, or `None` on overflow.
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.ticks.checked_sub(rhs.ticks) {
            Some(ticks) => Some(Self { ticks }),
            None => None,
        }
    }

    /// `self * rhs`, or `None` on overflow.
    pub const fn checked_mul(self, rhs: i64) -> Option<Self> {
        match self.ticks.checked_mul(rhs) {
            Some(ticks) => Some(Self { ticks }),
            None => None,
        }
    }

    /// Scales this duration by `numerator / denominator`.
    ///
    /// The product is formed in 128 bits before dividing, so scaling by a
    /// ratio and back again returns the original value whenever the result is
    /// representable at tick resolution. Results outside the representable
    /// range saturate.
    ///
    /// # Panics
    /// Panics if `denominator` is zero.
    pub fn mul_ratio(self, numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "mul_ratio: zero denominator");
        let scaled = i128::from(self.ticks) * i128::from(numerator) / i128::from(denominator);
        Self {
            ticks: scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
        }
    }

    /// How many whole `step`s fit in this duration, rounding toward negative
    /// infinity.
    pub(crate) const fn div_floor(self, step: Self) -> i64 {
        self.ticks.div_euclid(step.ticks)
    }

    /// How many `step`s are needed to cover this duration, rounding toward
    /// positive infinity.
    pub(crate) const fn div_ceil(self, step: Self) -> i64 {
        let q = self.ticks.div_euclid(step.ticks);
        if self.ticks.rem_euclid(step.ticks) == 0 {
            q
        } else {
            q + 1
        }
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_add(rhs.ticks),
        }
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_sub(rhs.ticks),
        }
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            ticks: self.ticks.saturating_neg(),
        }
    }
}

impl Mul<i64> for Duration {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self {
            ticks: self.ticks.saturating_mul(rhs),
        }
    }
}

impl Div<i64> for Duration {
    type Output = Self;

    fn div(self, rhs: i64) -> Self {
        Self {
            ticks: self.ticks / rhs,
        }
    }
}

/// Dividing one duration by another yields a dimensionless ratio.
impl Div for Duration {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.ticks as f64 / rhs.ticks as f64
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ticks % TICKS_PER_SECOND == 0 {
            write!(f, "{}s", self.ticks / TICKS_PER_SECOND)
        } else if self.ticks % TICKS_PER_MILLISECOND == 0 {
            write!(f, "{}ms", self.ticks / TICKS_PER_MILLISECOND)
        } else if self.ticks % TICKS_PER_MICROSECOND == 0 {
            write!(f, "{}us", self.ticks / TICKS_PER_MICROSECOND)
        } else {
            write!(f, "{} ticks", self.ticks)
        }
    }
}
