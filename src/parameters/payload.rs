//! Parameter payloads.
//!
//! A parameter stores an opaque payload: a numeric scalar, an ordered numeric
//! sequence, a callable transform, or an arbitrary JSON value. The payload is
//! deliberately untyped at the [`Value`](crate::parameters::Value) level so
//! that scalars, sequences, and callables share one primitive; the runtime
//! type is always derivable through [`ParamValue::value_type`].

use crate::error::{Result, SimCoreError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Runtime type tag of a payload, derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Numeric,
    Sequence,
    Callable,
    Opaque,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Numeric => "numeric",
            ValueType::Sequence => "sequence",
            ValueType::Callable => "callable",
            ValueType::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// A cloneable function payload with a declared signature for display.
///
/// The signature is purely diagnostic (e.g. `"f(x)"` or `"interp(t, y)"`);
/// it is what the string representation of a callable-valued parameter
/// renders, and what two callables are compared by.
#[derive(Clone)]
pub struct CallableValue {
    func: Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>,
    signature: String,
}

impl CallableValue {
    pub fn new<F>(signature: &str, func: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            signature: signature.to_string(),
        }
    }

    /// The declared argument signature, e.g. `"f(x)"`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Apply the function to the given arguments.
    pub fn call(&self, args: &[f64]) -> f64 {
        (self.func)(args)
    }
}

impl fmt::Debug for CallableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableValue")
            .field("signature", &self.signature)
            .finish()
    }
}

// Callables have no usable value equality; compare by declared signature.
impl PartialEq for CallableValue {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

/// The payload of a parameter: a closed sum over the shapes the substrate
/// supports.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A numeric scalar.
    Numeric(f64),
    /// An ordered numeric sequence.
    Sequence(Vec<f64>),
    /// A function payload, e.g. a unary transform handed to an element model.
    Callable(CallableValue),
    /// Anything else, held as a JSON value.
    Opaque(serde_json::Value),
}

impl ParamValue {
    /// Build a callable payload from a signature string and a closure.
    ///
    /// # Examples
    ///
    /// ```
    /// use simcore::parameters::ParamValue;
    ///
    /// let square = ParamValue::callable("f(x)", |args| args[0] * args[0]);
    /// assert!(square.is_callable());
    /// ```
    pub fn callable<F>(signature: &str, func: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        ParamValue::Callable(CallableValue::new(signature, func))
    }

    /// The runtime type tag of this payload.
    pub fn value_type(&self) -> ValueType {
        match self {
            ParamValue::Numeric(_) => ValueType::Numeric,
            ParamValue::Sequence(_) => ValueType::Sequence,
            ParamValue::Callable(_) => ValueType::Callable,
            ParamValue::Opaque(_) => ValueType::Opaque,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, ParamValue::Callable(_))
    }

    /// The scalar value, if this payload is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Numeric(x) => Some(*x),
            _ => None,
        }
    }

    /// The sequence contents, if this payload is a sequence.
    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            ParamValue::Sequence(xs) => Some(xs),
            _ => None,
        }
    }

    /// Map a JSON value onto a payload: numbers become scalars, uniform
    /// numeric arrays become sequences, everything else stays opaque.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(ref n) => match n.as_f64() {
                Some(x) => ParamValue::Numeric(x),
                None => ParamValue::Opaque(value),
            },
            serde_json::Value::Array(ref items) => {
                let numbers: Option<Vec<f64>> = items.iter().map(|v| v.as_f64()).collect();
                match numbers {
                    Some(xs) => ParamValue::Sequence(xs),
                    None => ParamValue::Opaque(value),
                }
            }
            other => ParamValue::Opaque(other),
        }
    }

    /// The JSON form of this payload. Callables are rendered by signature,
    /// since a function body cannot cross a serialization boundary.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Numeric(x) => serde_json::json!(x),
            ParamValue::Sequence(xs) => serde_json::json!(xs),
            ParamValue::Callable(c) => serde_json::json!(format!("<callable {}>", c.signature())),
            ParamValue::Opaque(v) => v.clone(),
        }
    }

    /// Element-wise difference against a previous payload, used for residuals.
    ///
    /// Only Numeric−Numeric and equal-length Sequence−Sequence are
    /// subtractable; everything else is a `NonNumericResidual` failure.
    pub(crate) fn subtract(&self, previous: &ParamValue) -> Result<ParamValue> {
        match (self, previous) {
            (ParamValue::Numeric(a), ParamValue::Numeric(b)) => Ok(ParamValue::Numeric(a - b)),
            (ParamValue::Sequence(a), ParamValue::Sequence(b)) if a.len() == b.len() => Ok(
                ParamValue::Sequence(a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()),
            ),
            (ParamValue::Sequence(a), ParamValue::Sequence(b)) => {
                Err(SimCoreError::NonNumericResidual(format!(
                    "sequence lengths differ: {} vs {}",
                    a.len(),
                    b.len()
                )))
            }
            (a, b) => Err(SimCoreError::NonNumericResidual(format!(
                "cannot subtract {} from {}",
                b.value_type(),
                a.value_type()
            ))),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Numeric(x)
    }
}

impl From<i64> for ParamValue {
    fn from(x: i64) -> Self {
        ParamValue::Numeric(x as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(x: i32) -> Self {
        ParamValue::Numeric(x as f64)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(xs: Vec<f64>) -> Self {
        ParamValue::Sequence(xs)
    }
}

impl From<&[f64]> for ParamValue {
    fn from(xs: &[f64]) -> Self {
        ParamValue::Sequence(xs.to_vec())
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        ParamValue::from_json(v)
    }
}

impl From<CallableValue> for ParamValue {
    fn from(c: CallableValue) -> Self {
        ParamValue::Callable(c)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Numeric(x) => write!(f, "{}", x),
            ParamValue::Sequence(xs) => write!(f, "{:?}", xs),
            ParamValue::Callable(c) => write!(f, "<callable {}>", c.signature()),
            ParamValue::Opaque(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}
