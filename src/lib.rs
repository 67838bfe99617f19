//! # simcore
//!
//! `simcore` is the parameter/port/element substrate underneath an
//! engineering process simulator: pressure, flow, and similar physical
//! quantities flowing through connected computational elements.
//!
//! The library provides:
//! - A typed, bounded, status-tracked parameter primitive ([`parameters::Value`])
//! - An ordered, named parameter bundle marking one connection point of an
//!   element ([`port::Port`])
//! - A composition primitive wiring ports and internal parameters into a
//!   solvable unit ([`element::Element`]), addressable by coordinate or by
//!   structured parameter address
//!
//! What it deliberately does not provide: the solver/iteration driver that
//! walks a network of elements to convergence, persistence, plotting, or any
//! user-facing tooling. Those are consumers of this substrate. The contract
//! between the two sides is the [`parameters::ValueStatus`] tag on every
//! parameter and the per-parameter residual used as a convergence signal.
//!
//! ## Basic Usage
//!
//! ```
//! use simcore::element::{Element, ParamAddr};
//! use simcore::parameters::{Value, ValueStatus};
//! use simcore::port::Port;
//!
//! let inlet = Port::new("in1", vec![Value::new("P", Some("Pa"), 3.0e5)]);
//! let outlet = Port::new("out1", vec![Value::new("P", Some("Pa"), 0.0)]);
//! let mut valve = Element::new("valve1", vec![inlet], vec![outlet], vec![]);
//!
//! let addr = ParamAddr::parse("P_1_0").unwrap();
//! valve.write(&addr, 2.8e5, ValueStatus::Calculated).unwrap();
//! assert_eq!(valve.read(&addr).unwrap().as_f64(), Some(2.8e5));
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Interface groups and computational nodes
pub mod element;
pub mod port;

// Re-exports for convenience
pub use element::{Element, ParamAddr, PortCoord, PortGroup};
pub use error::{Result, SimCoreError};
pub use parameters::{ParamValue, Value, ValueStatus, ValueType};
pub use port::{ParamKey, Port};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
