//! Convergence status tags for parameter values.
//!
//! A status classifies a parameter's role in the solving process run by an
//! external driver. The parameter itself never solves anything; it preserves
//! and exposes this tag so the driver can classify each degree of freedom.

use crate::error::{Result, SimCoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a parameter value in the enclosing solving process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueStatus {
    /// Value not yet determined; the driver must solve for it.
    Unknown,
    /// Externally imposed specification; the driver must not overwrite it.
    Fixed,
    /// Produced by evaluating the element's model; may be overwritten each iteration.
    Calculated,
    /// Derived deterministically from other parameters.
    Depend,
}

impl ValueStatus {
    /// Parse a status token, case-insensitively.
    ///
    /// This is the single entry point for every place a textual status is
    /// accepted: construction, mapping-based construction, and element-level
    /// writes.
    ///
    /// # Examples
    ///
    /// ```
    /// use simcore::parameters::ValueStatus;
    ///
    /// assert_eq!(ValueStatus::from_input("calculated").unwrap(), ValueStatus::Calculated);
    /// assert_eq!(ValueStatus::from_input("FIXED").unwrap(), ValueStatus::Fixed);
    /// assert!(ValueStatus::from_input("pending").is_err());
    /// ```
    pub fn from_input(input: &str) -> Result<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" => Ok(ValueStatus::Unknown),
            "FIXED" => Ok(ValueStatus::Fixed),
            "CALCULATED" => Ok(ValueStatus::Calculated),
            "DEPEND" => Ok(ValueStatus::Depend),
            _ => Err(SimCoreError::InvalidStatus(format!(
                "'{}' (expected one of UNKNOWN, FIXED, CALCULATED, DEPEND)",
                input
            ))),
        }
    }

    /// The canonical upper-case name of this status.
    pub fn name(&self) -> &'static str {
        match self {
            ValueStatus::Unknown => "UNKNOWN",
            ValueStatus::Fixed => "FIXED",
            ValueStatus::Calculated => "CALCULATED",
            ValueStatus::Depend => "DEPEND",
        }
    }

    /// Whether the driver must solve for this value.
    pub fn is_solvable(&self) -> bool {
        matches!(self, ValueStatus::Unknown)
    }

    /// Whether the driver must not overwrite this value during an evaluation step.
    pub fn is_immutable_this_step(&self) -> bool {
        matches!(self, ValueStatus::Fixed)
    }

    /// Whether the value has been determined (any status other than UNKNOWN).
    pub fn is_known(&self) -> bool {
        !matches!(self, ValueStatus::Unknown)
    }
}

impl Default for ValueStatus {
    fn default() -> Self {
        ValueStatus::Unknown
    }
}

impl fmt::Display for ValueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueStatus {
    type Err = SimCoreError;

    fn from_str(s: &str) -> Result<Self> {
        ValueStatus::from_input(s)
    }
}
