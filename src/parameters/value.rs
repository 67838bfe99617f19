//! Parameter definition and implementation
//!
//! This module provides the `Value` struct, the atomic unit of the substrate:
//! a named, dimensioned, bounded payload with a convergence status and an
//! optional one-deep history of its previous state. Ports bundle values at an
//! element interface; elements own values directly as model parameters.

use crate::error::{Result, SimCoreError};
use crate::parameters::bounds::Bounds;
use crate::parameters::payload::{ParamValue, ValueType};
use crate::parameters::status::ValueStatus;
use log::trace;
use std::fmt;

/// A named, dimensioned, status-tracked parameter.
///
/// `name` and `dimension` are immutable identity metadata fixed at
/// construction; only the payload and status mutate over the parameter's
/// lifecycle, always together through [`set_state`](Value::set_state) (or
/// payload-only through [`set_value`](Value::set_value)). When history is
/// enabled the prior (payload, status) pair is archived on every mutation.
///
/// # Examples
///
/// ```
/// use simcore::parameters::{Value, ValueStatus};
///
/// let mut pressure = Value::new("Pressure", Some("Pa"), 10.0e6)
///     .with_status(ValueStatus::Calculated)
///     .with_bounds(Some(0.0), Some(20.0e6))
///     .unwrap();
///
/// assert_eq!(pressure.status(), ValueStatus::Calculated);
/// assert!(pressure.residual().unwrap().is_none());
///
/// pressure.set_state(10.5e6, ValueStatus::Calculated);
/// let residual = pressure.residual().unwrap().unwrap();
/// assert_eq!(residual.as_f64(), Some(0.5e6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    name: String,
    dimension: Option<String>,
    description: String,
    value: ParamValue,
    status: ValueStatus,
    store_prev: bool,
    previous: Option<(ParamValue, ValueStatus)>,
    bounds: Bounds,
}

impl Value {
    /// Create a new parameter with the given name, dimension, and payload.
    ///
    /// The dimension is required but nullable: `None` marks a dimensionless
    /// or non-numeric parameter. Status defaults to UNKNOWN, history is
    /// enabled, and no bounds are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use simcore::parameters::{Value, ValueStatus, ValueType};
    ///
    /// let flow = Value::new("G", Some("kg/s"), 50.0);
    /// assert_eq!(flow.name(), "G");
    /// assert_eq!(flow.dimension(), Some("kg/s"));
    /// assert_eq!(flow.status(), ValueStatus::Unknown);
    /// assert_eq!(flow.value_type(), ValueType::Numeric);
    /// assert!(flow.store_prev());
    /// ```
    pub fn new(name: &str, dimension: Option<&str>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.to_string(),
            dimension: dimension.map(str::to_string),
            description: String::new(),
            value: value.into(),
            status: ValueStatus::Unknown,
            store_prev: true,
            previous: None,
            bounds: Bounds::unbounded(),
        }
    }

    /// Set the initial status (builder style).
    pub fn with_status(mut self, status: ValueStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the description (builder style).
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Attach advisory bounds (builder style). Fails if min > max.
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        self.bounds = Bounds::new(min, max)?;
        Ok(self)
    }

    /// Disable history tracking (builder style).
    pub fn without_history(mut self) -> Self {
        self.store_prev = false;
        self
    }

    /// Construct a parameter from a flat JSON mapping.
    ///
    /// Canonical keys: `value` (required), `dimension` (required, nullable),
    /// `name` (required), `description` (default empty), `status` (default
    /// UNKNOWN), `store_prev` (default true), `min_value` and `max_value`
    /// (default null). A `dimension` present with a null payload is valid
    /// and distinct from an absent key.
    ///
    /// # Examples
    ///
    /// ```
    /// use simcore::parameters::{Value, ValueStatus};
    /// use serde_json::json;
    ///
    /// let value = Value::from_mapping(&json!({
    ///     "value": 10.0e6,
    ///     "dimension": "Pa",
    ///     "name": "Pressure",
    ///     "status": "calculated",
    ///     "min_value": 0.0,
    ///     "max_value": 20.0e6,
    /// })).unwrap();
    ///
    /// assert_eq!(value.status(), ValueStatus::Calculated);
    /// assert_eq!(value.min(), Some(0.0));
    /// ```
    pub fn from_mapping(data: &serde_json::Value) -> Result<Self> {
        let map = data
            .as_object()
            .ok_or_else(|| SimCoreError::Other("expected a JSON object".to_string()))?;

        for key in ["value", "dimension", "name"] {
            if !map.contains_key(key) {
                return Err(SimCoreError::MissingField(key.to_string()));
            }
        }

        let name = map["name"]
            .as_str()
            .ok_or_else(|| SimCoreError::Other("'name' must be a string".to_string()))?;
        let dimension = match &map["dimension"] {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.as_str()),
            other => {
                return Err(SimCoreError::Other(format!(
                    "'dimension' must be a string or null, got {}",
                    other
                )))
            }
        };

        let status = match map.get("status") {
            None | Some(serde_json::Value::Null) => ValueStatus::Unknown,
            Some(serde_json::Value::String(s)) => ValueStatus::from_input(s)?,
            Some(other) => {
                return Err(SimCoreError::InvalidStatus(format!(
                    "unsupported status form: {}",
                    other
                )))
            }
        };

        let store_prev = match map.get("store_prev") {
            None | Some(serde_json::Value::Null) => true,
            Some(v) => v
                .as_bool()
                .ok_or_else(|| SimCoreError::Other("'store_prev' must be a boolean".to_string()))?,
        };

        let min = map.get("min_value").and_then(|v| v.as_f64());
        let max = map.get("max_value").and_then(|v| v.as_f64());

        let mut value = Value::new(name, dimension, ParamValue::from_json(map["value"].clone()))
            .with_status(status)
            .with_bounds(min, max)?;
        if let Some(serde_json::Value::String(d)) = map.get("description") {
            value = value.with_description(d);
        }
        value.store_prev = store_prev;

        Ok(value)
    }

    /// The JSON mapping form of this parameter, using the canonical keys.
    /// Callable payloads are rendered by signature.
    pub fn to_mapping(&self) -> serde_json::Value {
        serde_json::json!({
            "value": self.value.to_json(),
            "dimension": self.dimension,
            "name": self.name,
            "description": self.description,
            "status": self.status.name().to_lowercase(),
            "store_prev": self.store_prev,
            "min_value": self.bounds.lower(),
            "max_value": self.bounds.upper(),
        })
    }

    /// The current payload.
    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    /// The previously archived payload, if history is enabled and a
    /// mutation has occurred.
    pub fn previous_value(&self) -> Option<&ParamValue> {
        self.previous.as_ref().map(|(v, _)| v)
    }

    /// The current status.
    pub fn status(&self) -> ValueStatus {
        self.status
    }

    /// The previously archived status, if any.
    pub fn previous_status(&self) -> Option<ValueStatus> {
        self.previous.as_ref().map(|(_, s)| *s)
    }

    /// The parameter name (immutable identity).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The physical unit label, or `None` for dimensionless parameters.
    pub fn dimension(&self) -> Option<&str> {
        self.dimension.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The lower advisory bound, if set.
    pub fn min(&self) -> Option<f64> {
        self.bounds.lower()
    }

    /// The upper advisory bound, if set.
    pub fn max(&self) -> Option<f64> {
        self.bounds.upper()
    }

    /// The runtime type of the current payload, derived on demand.
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Whether history tracking is enabled.
    pub fn store_prev(&self) -> bool {
        self.store_prev
    }

    /// The current (payload, status) pair as a single read.
    pub fn state(&self) -> (&ParamValue, ValueStatus) {
        (&self.value, self.status)
    }

    pub fn is_callable(&self) -> bool {
        self.value.is_callable()
    }

    /// The declared argument signature, when the payload is callable.
    pub fn callable_signature(&self) -> Option<&str> {
        match &self.value {
            ParamValue::Callable(c) => Some(c.signature()),
            _ => None,
        }
    }

    /// Atomically replace payload and status as a pair.
    ///
    /// When history is enabled the prior pair is archived first. No type or
    /// bounds check is applied: the payload is opaque by design, and bounds
    /// are advisory (see [`validate`](Value::validate)).
    pub fn set_state(&mut self, value: impl Into<ParamValue>, status: ValueStatus) {
        if self.store_prev {
            self.previous = Some((self.value.clone(), self.status));
        }
        self.value = value.into();
        self.status = status;
        trace!("{}: set to {} [{}]", self.name, self.value, self.status);
    }

    /// Replace the payload, keeping the current status.
    pub fn set_value(&mut self, value: impl Into<ParamValue>) {
        let status = self.status;
        self.set_state(value, status);
    }

    /// Enable or disable history tracking.
    ///
    /// Disabling clears the archived pair, so previous-state accessors
    /// return `None` from then on.
    pub fn set_store_prev(&mut self, flag: bool) {
        self.store_prev = flag;
        if !flag {
            self.previous = None;
        }
    }

    /// Drop the archived previous state.
    pub fn reset_history(&mut self) {
        self.previous = None;
    }

    /// Rebind the advisory bounds, validating the current payload against
    /// them. On failure the existing bounds are kept.
    pub fn set_bounds(&mut self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        let bounds = Bounds::new(min, max)?;
        bounds.check(&self.value)?;
        self.bounds = bounds;
        Ok(())
    }

    /// Explicitly check the current payload against the advisory bounds.
    pub fn validate(&self) -> Result<()> {
        self.bounds.check(&self.value)
    }

    /// The difference between the current and previously archived payload.
    ///
    /// Returns `Ok(None)` when history is disabled or no previous payload
    /// has been recorded yet; fails with `NonNumericResidual` when the two
    /// payloads are not subtractable. Drivers use this as a per-parameter
    /// convergence signal.
    pub fn residual(&self) -> Result<Option<ParamValue>> {
        if !self.store_prev {
            return Ok(None);
        }
        let previous = match &self.previous {
            Some((v, _)) => v,
            None => return Ok(None),
        };
        self.value
            .subtract(previous)
            .map(Some)
            .map_err(|err| match err {
                SimCoreError::NonNumericResidual(msg) => {
                    SimCoreError::NonNumericResidual(format!("parameter '{}': {}", self.name, msg))
                }
                other => other,
            })
    }

    /// Apply a callable payload to the given arguments.
    pub fn invoke(&self, args: &[f64]) -> Result<f64> {
        match &self.value {
            ParamValue::Callable(c) => Ok(c.call(args)),
            other => Err(SimCoreError::NotCallable(format!(
                "parameter '{}' holds a {} payload",
                self.name,
                other.value_type()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value(name={:?}, dimension={}, value={}, status={}",
            self.name,
            match &self.dimension {
                Some(d) => format!("{:?}", d),
                None => "None".to_string(),
            },
            self.value,
            self.status,
        )?;
        if let Some(sig) = self.callable_signature() {
            write!(f, ", callable={}", sig)?;
        }
        write!(f, ")")
    }
}
