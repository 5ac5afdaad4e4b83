//! Bounds of a bounded fit field
//!
//! A `Bounds` value describes the closed region a bounded field may take during
//! optimization. An infinite side means the field is unconstrained on that side.
//! Besides containment checks it knows how to pick a default value that lies
//! inside the region, which is used when a bounded field has no usable declared
//! default.

use thiserror::Error;

/// Errors that can occur when declaring bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not be greater than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Bound must not be NaN")]
    NotANumber,
}

/// Represents the bounds constraints on a fit field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower bound, `-∞` if unbounded from below
    pub min: f64,

    /// Upper bound, `+∞` if unbounded from above
    pub max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

impl Bounds {
    /// Create new bounds with min and max values
    ///
    /// # Arguments
    ///
    /// * `min` - Lower bound, may be `-∞`
    /// * `max` - Upper bound, may be `+∞`
    ///
    /// # Returns
    ///
    /// A new `Bounds` object if min <= max, or an error otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::bounds::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert_eq!(bounds.min, 0.0);
    /// assert_eq!(bounds.max, 10.0);
    /// assert!(Bounds::new(1.0, 0.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min.is_nan() || max.is_nan() {
            return Err(BoundsError::NotANumber);
        }
        if min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Create bounds where a missing side means unbounded on that side
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::bounds::Bounds;
    ///
    /// let bounds = Bounds::from_options(Some(0.0), None).unwrap();
    /// assert_eq!(bounds.min, 0.0);
    /// assert_eq!(bounds.max, f64::INFINITY);
    /// ```
    pub fn from_options(min: Option<f64>, max: Option<f64>) -> Result<Self, BoundsError> {
        Self::new(
            min.unwrap_or(f64::NEG_INFINITY),
            max.unwrap_or(f64::INFINITY),
        )
    }

    /// The lower bound, or `None` if unbounded from below
    pub fn min_option(&self) -> Option<f64> {
        self.has_lower_bound().then_some(self.min)
    }

    /// The upper bound, or `None` if unbounded from above
    pub fn max_option(&self) -> Option<f64> {
        self.has_upper_bound().then_some(self.max)
    }

    /// Create an unbounded region (negative infinity to positive infinity)
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create bounds with only a minimum value
    pub fn min_only(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// Create bounds with only a maximum value
    pub fn max_only(max: f64) -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max,
        }
    }

    /// Check if the field is bounded from below
    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    /// Check if the field is bounded from above
    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Whether these bounds impose any constraint at all
    ///
    /// Bounds with both sides infinite do not restrict the field.
    pub fn is_actually_bounded(&self) -> bool {
        self.has_lower_bound() || self.has_upper_bound()
    }

    /// Check if a value lies in the bounded region
    ///
    /// Both ends are inclusive. Infinite sides are not checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::bounds::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 1.0).unwrap();
    /// assert!(bounds.contains(0.0));
    /// assert!(bounds.contains(1.0));
    /// assert!(!bounds.contains(1.5));
    /// ```
    pub fn contains(&self, value: f64) -> bool {
        let mut res = true;
        if self.has_lower_bound() {
            res &= value >= self.min;
        }
        if self.has_upper_bound() {
            res &= value <= self.max;
        }
        res
    }

    /// Compute a default value inside the bounded region
    ///
    /// # Returns
    ///
    /// The midpoint if both sides are finite, a distance of 1 from the finite
    /// side if only one side is finite, and 0 if the region is unbounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::bounds::Bounds;
    ///
    /// assert_eq!(Bounds::new(0.0, 1.0).unwrap().bounds_default(), 0.5);
    /// assert_eq!(Bounds::min_only(2.0).bounds_default(), 3.0);
    /// assert_eq!(Bounds::max_only(2.0).bounds_default(), 1.0);
    /// assert_eq!(Bounds::unbounded().bounds_default(), 0.0);
    /// ```
    pub fn bounds_default(&self) -> f64 {
        match (self.has_lower_bound(), self.has_upper_bound()) {
            (true, true) => 0.5 * (self.min + self.max),
            (true, false) => self.min + 1.0,
            (false, true) => self.max - 1.0,
            (false, false) => 0.0,
        }
    }

    /// Resolve the default value of a bounded field
    ///
    /// # Arguments
    ///
    /// * `declared` - The default declared for the field, if any
    ///
    /// # Returns
    ///
    /// `declared` if it is present and within the bounds, otherwise
    /// [`Bounds::bounds_default`].
    pub fn resolve_default(&self, declared: Option<f64>) -> f64 {
        match declared {
            Some(value) if self.contains(value) => value,
            _ => self.bounds_default(),
        }
    }
}
