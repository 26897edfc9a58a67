use crate::error::{GeometryError, Result};

/// Which bounds of an [`Interval`] are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    /// `[lower, upper]`
    Closed,
    /// `(lower, upper)`
    Open,
    /// `(lower, upper]`
    HalfOpenLeft,
    /// `[lower, upper)`
    HalfOpenRight,
}

impl IntervalKind {
    fn includes_lower(self) -> bool {
        matches!(self, Self::Closed | Self::HalfOpenRight)
    }

    fn includes_upper(self) -> bool {
        matches!(self, Self::Closed | Self::HalfOpenLeft)
    }
}

/// A range of real values with open or closed ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lower: f64,
    upper: f64,
    kind: IntervalKind,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is NaN or `lower > upper`.
    pub fn new(lower: f64, upper: f64, kind: IntervalKind) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(GeometryError::Undefined("Interval").into());
        }
        if lower > upper {
            return Err(GeometryError::InvalidArgument(format!(
                "interval lower bound {lower} exceeds upper bound {upper}"
            ))
            .into());
        }
        Ok(Self { lower, upper, kind })
    }

    /// Creates `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// See [`Interval::new`].
    pub fn closed(lower: f64, upper: f64) -> Result<Self> {
        Self::new(lower, upper, IntervalKind::Closed)
    }

    /// Creates `(lower, upper)`.
    ///
    /// # Errors
    ///
    /// See [`Interval::new`].
    pub fn open(lower: f64, upper: f64) -> Result<Self> {
        Self::new(lower, upper, IntervalKind::Open)
    }

    /// Creates `(lower, upper]`.
    ///
    /// # Errors
    ///
    /// See [`Interval::new`].
    pub fn half_open_left(lower: f64, upper: f64) -> Result<Self> {
        Self::new(lower, upper, IntervalKind::HalfOpenLeft)
    }

    /// Creates `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// See [`Interval::new`].
    pub fn half_open_right(lower: f64, upper: f64) -> Result<Self> {
        Self::new(lower, upper, IntervalKind::HalfOpenRight)
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[must_use]
    pub fn kind(&self) -> IntervalKind {
        self.kind
    }

    /// Returns `true` if `value` lies inside the interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let above = if self.kind.includes_lower() {
            value >= self.lower
        } else {
            value > self.lower
        };
        let below = if self.kind.includes_upper() {
            value <= self.upper
        } else {
            value < self.upper
        };
        above && below
    }

    /// Returns `true` if every value of `other` lies inside this interval.
    #[must_use]
    pub fn contains_interval(&self, other: &Interval) -> bool {
        let lower_ok = if other.lower == self.lower {
            self.kind.includes_lower() || !other.kind.includes_lower()
        } else {
            other.lower > self.lower
        };
        let upper_ok = if other.upper == self.upper {
            self.kind.includes_upper() || !other.kind.includes_upper()
        } else {
            other.upper < self.upper
        };
        lower_ok && upper_ok
    }

    /// Returns `true` if the two intervals share at least one value.
    #[must_use]
    pub fn intersects(&self, other: &Interval) -> bool {
        let left_ok = if self.upper == other.lower {
            self.kind.includes_upper() && other.kind.includes_lower()
        } else {
            self.upper > other.lower
        };
        let right_ok = if other.upper == self.lower {
            other.kind.includes_upper() && self.kind.includes_lower()
        } else {
            other.upper > self.lower
        };
        left_ok && right_ok
    }

    /// Samples `size` evenly spaced values, honoring which ends are
    /// included.
    ///
    /// A closed interval with `size == 1` yields `[lower]`.
    #[must_use]
    pub fn generate_array_with_size(&self, size: usize) -> Vec<f64> {
        if size == 0 {
            return Vec::new();
        }
        #[allow(clippy::cast_precision_loss)]
        let n = size as f64;
        let span = self.upper - self.lower;
        let (start, step) = match self.kind {
            IntervalKind::Closed => {
                if size == 1 {
                    return vec![self.lower];
                }
                (self.lower, span / (n - 1.0))
            }
            IntervalKind::Open => {
                let step = span / (n + 1.0);
                (self.lower + step, step)
            }
            IntervalKind::HalfOpenLeft => {
                let step = span / n;
                (self.lower + step, step)
            }
            IntervalKind::HalfOpenRight => (self.lower, span / n),
        };
        #[allow(clippy::cast_precision_loss)]
        let mut values: Vec<f64> = (0..size).map(|i| start + step * i as f64).collect();
        // Pin the closed end so the last sample equals the bound exactly.
        if matches!(self.kind, IntervalKind::Closed | IntervalKind::HalfOpenLeft) {
            if let Some(last) = values.last_mut() {
                *last = self.upper;
            }
        }
        values
    }
}
