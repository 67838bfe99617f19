//! # Parameter System
//!
//! This module provides the atomic unit of the substrate: a named,
//! dimensioned, bounded payload with a convergence status and an optional
//! one-deep history of its previous state.
//!
//! ## Core Components
//!
//! - [`Value`]: an individual parameter with payload, status, history, and
//!   advisory bounds
//! - [`ValueStatus`]: the tag classifying a parameter's role in the external
//!   solving process (UNKNOWN, FIXED, CALCULATED, DEPEND)
//! - [`ParamValue`] and [`ValueType`]: the closed payload sum type (numeric
//!   scalar, numeric sequence, callable, opaque JSON) and its derived
//!   runtime tag
//! - [`Bounds`]: advisory min/max limits, checked only on explicit request
//!
//! ## Example Usage
//!
//! ```rust
//! use simcore::parameters::{Value, ValueStatus};
//!
//! let mut pressure = Value::new("P", Some("Pa"), 101_325.0)
//!     .with_status(ValueStatus::Fixed);
//!
//! // Reads never mutate
//! let (payload, status) = pressure.state();
//! assert_eq!(payload.as_f64(), Some(101_325.0));
//! assert!(status.is_immutable_this_step());
//!
//! // Writes replace payload and status as one atomic pair
//! pressure.set_state(2.0e5, ValueStatus::Calculated);
//! assert_eq!(pressure.previous_value().unwrap().as_f64(), Some(101_325.0));
//! assert_eq!(pressure.previous_status(), Some(ValueStatus::Fixed));
//! ```

pub mod bounds;
pub mod payload;
pub mod status;
pub mod value;


// Re-export key types
pub use bounds::{Bounds, BoundsError};
pub use payload::{CallableValue, ParamValue, ValueType};
pub use status::ValueStatus;
pub use value::Value;
