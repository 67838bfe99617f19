//! Interface groups.
//!
//! A `Port` is an ordered, named bundle of parameters representing one
//! connection point of an element, e.g. an inlet or outlet stream. A port
//! exclusively owns its parameters and adds no behavior of its own beyond
//! lookup and solver-facing bookkeeping queries; all mutation goes through
//! the parameters themselves.

use crate::error::{Result, SimCoreError};
use crate::parameters::{Value, ValueStatus};
use log::debug;
use std::fmt;
use std::ops::Index;

/// Key for looking a parameter up within a port: by position or by name.
///
/// Parameter order within a port is significant and stable, and names need
/// not be unique; indexed access is the canonical path when they are not
/// (name lookup returns the first match).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for ParamKey<'_> {
    fn from(index: usize) -> Self {
        ParamKey::Index(index)
    }
}

impl<'a> From<&'a str> for ParamKey<'a> {
    fn from(name: &'a str) -> Self {
        ParamKey::Name(name)
    }
}

impl fmt::Display for ParamKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Index(i) => write!(f, "index {}", i),
            ParamKey::Name(n) => write!(f, "name '{}'", n),
        }
    }
}

/// An ordered, named bundle of owned parameters.
///
/// # Examples
///
/// ```
/// use simcore::port::Port;
/// use simcore::parameters::Value;
///
/// let inlet = Port::new(
///     "in1",
///     vec![
///         Value::new("P", Some("Pa"), 101_325.0),
///         Value::new("G", Some("kg/s"), 50.0),
///     ],
/// );
///
/// assert_eq!(inlet.name(), "in1");
/// assert_eq!(inlet.get("G").unwrap().value().as_f64(), Some(50.0));
/// assert_eq!(inlet.get(0).unwrap().name(), "P");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    name: String,
    values: Vec<Value>,
}

impl Port {
    /// Create a new port owning the given parameters in the given order.
    pub fn new(name: &str, values: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }

    /// Create an empty port.
    pub fn empty(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    /// Append a parameter, preserving insertion order.
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// The port name (immutable identity).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up an owned parameter by index or name.
    pub fn get<'a>(&self, key: impl Into<ParamKey<'a>>) -> Result<&Value> {
        let key = key.into();
        self.find(key)
            .ok_or_else(|| self.not_found(key))
    }

    /// Mutable counterpart of [`get`](Port::get).
    pub fn get_mut<'a>(&mut self, key: impl Into<ParamKey<'a>>) -> Result<&mut Value> {
        let key = key.into();
        match self.find_index(key) {
            Some(i) => Ok(&mut self.values[i]),
            None => Err(self.not_found(key)),
        }
    }

    fn find(&self, key: ParamKey<'_>) -> Option<&Value> {
        self.find_index(key).map(|i| &self.values[i])
    }

    fn find_index(&self, key: ParamKey<'_>) -> Option<usize> {
        match key {
            ParamKey::Index(i) if i < self.values.len() => Some(i),
            ParamKey::Index(_) => None,
            ParamKey::Name(name) => self.values.iter().position(|v| v.name() == name),
        }
    }

    fn not_found(&self, key: ParamKey<'_>) -> SimCoreError {
        SimCoreError::NotFound(format!(
            "port '{}' has no parameter with {}",
            self.name, key
        ))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.values.iter_mut()
    }

    /// Names of parameters carrying any of the given statuses.
    pub fn list_by_status(&self, statuses: &[ValueStatus]) -> Vec<&str> {
        self.values
            .iter()
            .filter(|v| statuses.contains(&v.status()))
            .map(|v| v.name())
            .collect()
    }

    /// Names of parameters with a status other than UNKNOWN.
    pub fn list_known(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|v| v.status().is_known())
            .map(|v| v.name())
            .collect()
    }

    /// Names of parameters still awaiting a value.
    pub fn list_unknown(&self) -> Vec<&str> {
        self.list_by_status(&[ValueStatus::Unknown])
    }

    /// True when every parameter in the port has a known status.
    pub fn is_calculated(&self) -> bool {
        self.values.iter().all(|v| v.status().is_known())
    }

    /// Revert CALCULATED and DEPEND parameters (optionally FIXED too) to
    /// UNKNOWN, keeping their payloads.
    pub fn reset(&mut self, reset_fixed: bool) {
        debug!("resetting port '{}' (reset_fixed={})", self.name, reset_fixed);
        for value in &mut self.values {
            let status = value.status();
            let resettable = matches!(status, ValueStatus::Calculated | ValueStatus::Depend)
                || (reset_fixed && status == ValueStatus::Fixed);
            if resettable {
                let current = value.value().clone();
                value.set_state(current, ValueStatus::Unknown);
            }
        }
    }

    /// Structural compatibility: same parameter count and the same
    /// name-to-dimension mapping. Used when wiring one element's outlet to
    /// another's inlet.
    pub fn is_compatible(&self, other: &Port) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.values.iter().all(|v| {
            other
                .iter()
                .any(|o| o.name() == v.name() && o.dimension() == v.dimension())
        })
    }
}

impl Index<usize> for Port {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a Port {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.values.iter().map(|v| v.name()).collect();
        write!(f, "Port(name={:?}, values={:?})", self.name, names)
    }
}
