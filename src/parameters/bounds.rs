//! Advisory bounds for parameter payloads.
//!
//! Bounds are identity metadata attached to a parameter at construction.
//! They are never enforced on assignment, since automatic enforcement would
//! overconstrain non-numeric payloads such as callables and opaque values;
//! they are checked only when a caller explicitly validates.

use crate::error::{Result, SimCoreError};
use crate::parameters::payload::ParamValue;
use serde::{Deserialize, Serialize};
use std::f64::{INFINITY, NEG_INFINITY};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must be less than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },
}

impl From<BoundsError> for SimCoreError {
    fn from(err: BoundsError) -> Self {
        SimCoreError::OutOfBounds(err.to_string())
    }
}

/// Represents the advisory bounds on a parameter.
///
/// An absent bound is stored as the corresponding infinity; accessors on
/// [`Value`](crate::parameters::Value) translate infinities back to `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum advisable value for the parameter
    pub min: f64,

    /// Maximum advisable value for the parameter
    pub max: f64,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;

        // Infinities serialize as null so the JSON form matches the
        // canonical mapping keys (min_value/max_value default to null).
        if self.min == NEG_INFINITY {
            state.serialize_field("min", &serde_json::Value::Null)?;
        } else {
            state.serialize_field("min", &self.min)?;
        }

        if self.max == INFINITY {
            state.serialize_field("max", &serde_json::Value::Null)?;
        } else {
            state.serialize_field("max", &self.max)?;
        }

        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;

        Ok(Bounds {
            min: helper.min.unwrap_or(NEG_INFINITY),
            max: helper.max.unwrap_or(INFINITY),
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }
}

impl Bounds {
    /// Create new bounds with optional min and max values.
    ///
    /// # Examples
    ///
    /// ```
    /// use simcore::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(Some(0.0), Some(20.0e6)).unwrap();
    /// assert_eq!(bounds.min, 0.0);
    /// assert_eq!(bounds.max, 20.0e6);
    ///
    /// assert!(Bounds::new(Some(10.0), Some(0.0)).is_err());
    /// ```
    pub fn new(min: Option<f64>, max: Option<f64>) -> std::result::Result<Self, BoundsError> {
        let min = min.unwrap_or(NEG_INFINITY);
        let max = max.unwrap_or(INFINITY);

        if min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Create an unbounded constraint (negative infinity to positive infinity)
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create bounds with only a lower limit
    pub fn min_only(min: f64) -> Self {
        Self {
            min,
            max: INFINITY,
        }
    }

    /// Create bounds with only an upper limit
    pub fn max_only(max: f64) -> Self {
        Self {
            min: NEG_INFINITY,
            max,
        }
    }

    /// Whether no bound is set in either direction
    pub fn is_unbounded(&self) -> bool {
        self.min == NEG_INFINITY && self.max == INFINITY
    }

    /// The lower bound, or `None` when unbounded below
    pub fn lower(&self) -> Option<f64> {
        if self.min == NEG_INFINITY {
            None
        } else {
            Some(self.min)
        }
    }

    /// The upper bound, or `None` when unbounded above
    pub fn upper(&self) -> Option<f64> {
        if self.max == INFINITY {
            None
        } else {
            Some(self.max)
        }
    }

    fn check_scalar(&self, value: f64) -> std::result::Result<(), BoundsError> {
        if value < self.min || value > self.max {
            return Err(BoundsError::ValueOutsideBounds {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Check a payload against these bounds.
    ///
    /// Numeric payloads are compared directly, sequences element-wise.
    /// Callable and opaque payloads always pass: bounds constrain numeric
    /// quantities only.
    pub fn check(&self, value: &ParamValue) -> Result<()> {
        match value {
            ParamValue::Numeric(x) => self.check_scalar(*x)?,
            ParamValue::Sequence(xs) => {
                for x in xs {
                    self.check_scalar(*x)?;
                }
            }
            ParamValue::Callable(_) | ParamValue::Opaque(_) => {}
        }
        Ok(())
    }
}
