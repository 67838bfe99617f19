//! Computational nodes.
//!
//! An `Element` is a named unit exposing input ports, output ports, a set of
//! element-level parameters, and a free-form configuration mapping. It deeply
//! owns everything it is constructed with, and offers two complementary
//! addressing schemes into its nested parameters: coordinate navigation
//! through ports, and direct structured addressing with [`ParamAddr`]. Both
//! always resolve to the same owned instance.
//!
//! The element performs no solving and no propagation: a write touches
//! exactly the addressed parameter, and walking the element graph to
//! convergence is the business of an external driver.

use crate::error::{Result, SimCoreError};
use crate::parameters::{ParamValue, Value, ValueStatus};
use crate::port::Port;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which of an element's two port collections a coordinate refers to.
///
/// The wire encoding is `0` for inputs and `1` for outputs, matching the
/// textual parameter address form `<name>_<group>_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortGroup {
    Input,
    Output,
}

impl PortGroup {
    /// Decode a group from its wire index (0 = input, 1 = output).
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(PortGroup::Input),
            1 => Ok(PortGroup::Output),
            other => Err(SimCoreError::NotFound(format!(
                "port group index {} (expected 0 for input or 1 for output)",
                other
            ))),
        }
    }

    /// The wire index of this group.
    pub fn index(&self) -> usize {
        match self {
            PortGroup::Input => 0,
            PortGroup::Output => 1,
        }
    }
}

/// Coordinate of one port: a group selector plus a position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortCoord {
    pub group: PortGroup,
    pub index: usize,
}

impl PortCoord {
    pub fn new(group: PortGroup, index: usize) -> Self {
        Self { group, index }
    }

    /// Coordinate of the `index`-th input port.
    pub fn input(index: usize) -> Self {
        Self::new(PortGroup::Input, index)
    }

    /// Coordinate of the `index`-th output port.
    pub fn output(index: usize) -> Self {
        Self::new(PortGroup::Output, index)
    }
}

/// Structured address of one parameter inside an element's ports.
///
/// This replaces the synthesized attribute-name pattern `<name>_<g>_<i>` of
/// a dynamic-language binding with an explicit key; [`ParamAddr::parse`]
/// still accepts the textual form. Reads and writes through an address are
/// symmetric and target the identical owned parameter that coordinate
/// navigation reaches.
///
/// # Examples
///
/// ```
/// use simcore::element::{ParamAddr, PortGroup};
///
/// let addr = ParamAddr::parse("val2_0_0").unwrap();
/// assert_eq!(addr.name, "val2");
/// assert_eq!(addr.group, PortGroup::Input);
/// assert_eq!(addr.index, 0);
/// assert_eq!(addr.to_string(), "val2_0_0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamAddr {
    /// Parameter name within the addressed port.
    pub name: String,
    /// Input or output port collection.
    pub group: PortGroup,
    /// Position of the port within its collection.
    pub index: usize,
}

impl ParamAddr {
    pub fn new(name: &str, group: PortGroup, index: usize) -> Self {
        Self {
            name: name.to_string(),
            group,
            index,
        }
    }

    /// Address into the `index`-th input port.
    pub fn input(name: &str, index: usize) -> Self {
        Self::new(name, PortGroup::Input, index)
    }

    /// Address into the `index`-th output port.
    pub fn output(name: &str, index: usize) -> Self {
        Self::new(name, PortGroup::Output, index)
    }

    /// Parse the textual form `<name>_<group>_<index>`.
    ///
    /// The name may itself contain underscores; the two trailing numeric
    /// fields are split off from the right.
    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = text.rsplitn(3, '_');
        let index = fields.next();
        let group = fields.next();
        let name = fields.next();

        let (name, group, index) = match (name, group, index) {
            (Some(n), Some(g), Some(i)) if !n.is_empty() => (n, g, i),
            _ => {
                return Err(SimCoreError::NotFound(format!(
                    "'{}' is not a <name>_<group>_<index> parameter address",
                    text
                )))
            }
        };

        let group: usize = group.parse().map_err(|_| {
            SimCoreError::NotFound(format!("'{}' has a non-numeric group field", text))
        })?;
        let index: usize = index.parse().map_err(|_| {
            SimCoreError::NotFound(format!("'{}' has a non-numeric index field", text))
        })?;

        Ok(Self {
            name: name.to_string(),
            group: PortGroup::from_index(group)?,
            index,
        })
    }

    /// The coordinate of the port this address points into.
    pub fn coord(&self) -> PortCoord {
        PortCoord::new(self.group, self.index)
    }
}

impl fmt::Display for ParamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.name, self.group.index(), self.index)
    }
}

/// A named computational node owning ports, parameters, and configuration.
///
/// # Examples
///
/// ```
/// use simcore::element::{Element, ParamAddr};
/// use simcore::parameters::{Value, ValueStatus};
/// use simcore::port::Port;
///
/// let mut valve = Element::new(
///     "valve1",
///     vec![Port::new("in1", vec![Value::new("P", Some("Pa"), 3.0e5)])],
///     vec![Port::new("out1", vec![Value::new("P", Some("Pa"), 0.0)])],
///     vec![Value::new("zeta", None, 2.5).with_status(ValueStatus::Fixed)],
/// );
///
/// let addr = ParamAddr::output("P", 0);
/// valve.write(&addr, 2.8e5, ValueStatus::Calculated).unwrap();
/// assert_eq!(valve.read(&addr).unwrap().as_f64(), Some(2.8e5));
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    description: String,
    in_ports: Vec<Port>,
    out_ports: Vec<Port>,
    parameters: Vec<Value>,
    config: HashMap<String, serde_json::Value>,
}

impl Element {
    /// Create a new element taking ownership of the supplied ports and
    /// parameters.
    pub fn new(
        name: &str,
        in_ports: Vec<Port>,
        out_ports: Vec<Port>,
        parameters: Vec<Value>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            in_ports,
            out_ports,
            parameters,
            config: HashMap::new(),
        }
    }

    /// Set the description (builder style).
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Seed a configuration entry (builder style).
    pub fn with_config(mut self, key: &str, value: serde_json::Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn in_ports(&self) -> &[Port] {
        &self.in_ports
    }

    pub fn out_ports(&self) -> &[Port] {
        &self.out_ports
    }

    /// The element-level (non-port) parameters.
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    /// The addressed port.
    pub fn port(&self, coord: PortCoord) -> Result<&Port> {
        self.group_ports(coord.group)
            .get(coord.index)
            .ok_or_else(|| self.port_not_found(coord))
    }

    /// The port addressed by a raw `(group, index)` pair, with the group
    /// wire-encoded as 0 for inputs and 1 for outputs.
    pub fn port_pair(&self, group: usize, index: usize) -> Result<&Port> {
        self.port(PortCoord::new(PortGroup::from_index(group)?, index))
    }

    /// Mutable counterpart of [`port`](Element::port).
    pub fn port_mut(&mut self, coord: PortCoord) -> Result<&mut Port> {
        if self.group_ports(coord.group).get(coord.index).is_none() {
            return Err(self.port_not_found(coord));
        }
        Ok(match coord.group {
            PortGroup::Input => &mut self.in_ports[coord.index],
            PortGroup::Output => &mut self.out_ports[coord.index],
        })
    }

    /// The port at a flat position across inputs then outputs.
    pub fn port_at(&self, flat_index: usize) -> Result<&Port> {
        if flat_index < self.in_ports.len() {
            return Ok(&self.in_ports[flat_index]);
        }
        self.out_ports
            .get(flat_index - self.in_ports.len())
            .ok_or_else(|| {
                SimCoreError::NotFound(format!(
                    "element '{}' has no port at flat index {}",
                    self.name, flat_index
                ))
            })
    }

    /// The first port with the given name, searching inputs then outputs.
    pub fn port_by_name(&self, name: &str) -> Result<&Port> {
        self.in_ports
            .iter()
            .chain(self.out_ports.iter())
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                SimCoreError::NotFound(format!("element '{}' has no port '{}'", self.name, name))
            })
    }

    /// The parameter a structured address points to.
    pub fn get(&self, addr: &ParamAddr) -> Result<&Value> {
        self.port(addr.coord())?.get(addr.name.as_str())
    }

    /// Mutable counterpart of [`get`](Element::get).
    pub fn get_mut(&mut self, addr: &ParamAddr) -> Result<&mut Value> {
        let coord = addr.coord();
        if self.group_ports(coord.group).get(coord.index).is_none() {
            return Err(self.port_not_found(coord));
        }
        let port = match coord.group {
            PortGroup::Input => &mut self.in_ports[coord.index],
            PortGroup::Output => &mut self.out_ports[coord.index],
        };
        port.get_mut(addr.name.as_str())
    }

    /// Read the current payload of the addressed parameter.
    pub fn read(&self, addr: &ParamAddr) -> Result<&ParamValue> {
        Ok(self.get(addr)?.value())
    }

    /// Atomically write payload and status to the addressed parameter.
    ///
    /// Only the single targeted parameter changes; no other parameter is
    /// touched, and nothing propagates across ports or elements.
    pub fn write(
        &mut self,
        addr: &ParamAddr,
        value: impl Into<ParamValue>,
        status: ValueStatus,
    ) -> Result<()> {
        debug!("{}: write {} [{}]", self.name, addr, status);
        self.get_mut(addr)?.set_state(value, status);
        Ok(())
    }

    /// The element-level parameter with the given name.
    pub fn parameter(&self, name: &str) -> Result<&Value> {
        self.parameters
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| self.parameter_not_found(name))
    }

    /// Mutable counterpart of [`parameter`](Element::parameter).
    pub fn parameter_mut(&mut self, name: &str) -> Result<&mut Value> {
        let missing = self.parameter_not_found(name);
        self.parameters
            .iter_mut()
            .find(|v| v.name() == name)
            .ok_or(missing)
    }

    /// Resolve a textual target to a parameter: an element-level parameter
    /// name first, then the `<name>_<group>_<index>` port address form.
    pub fn resolve(&self, target: &str) -> Result<&Value> {
        if let Some(param) = self.parameters.iter().find(|v| v.name() == target) {
            return Ok(param);
        }
        let addr = ParamAddr::parse(target)?;
        self.get(&addr)
    }

    /// Mutable counterpart of [`resolve`](Element::resolve).
    pub fn resolve_mut(&mut self, target: &str) -> Result<&mut Value> {
        if self.parameters.iter().any(|v| v.name() == target) {
            return self.parameter_mut(target);
        }
        let addr = ParamAddr::parse(target)?;
        self.get_mut(&addr)
    }

    /// Read an auxiliary configuration entry.
    pub fn config(&self, key: &str) -> Option<&serde_json::Value> {
        self.config.get(key)
    }

    /// Set an auxiliary configuration entry.
    pub fn set_config(&mut self, key: &str, value: serde_json::Value) {
        self.config.insert(key.to_string(), value);
    }

    /// Revert CALCULATED and DEPEND parameters (optionally FIXED too) to
    /// UNKNOWN across every port and element-level parameter.
    pub fn reset(&mut self, reset_fixed: bool) {
        debug!("resetting element '{}'", self.name);
        for port in self.in_ports.iter_mut().chain(self.out_ports.iter_mut()) {
            port.reset(reset_fixed);
        }
        for value in &mut self.parameters {
            let status = value.status();
            let resettable = matches!(status, ValueStatus::Calculated | ValueStatus::Depend)
                || (reset_fixed && status == ValueStatus::Fixed);
            if resettable {
                let current = value.value().clone();
                value.set_state(current, ValueStatus::Unknown);
            }
        }
    }

    fn group_ports(&self, group: PortGroup) -> &[Port] {
        match group {
            PortGroup::Input => &self.in_ports,
            PortGroup::Output => &self.out_ports,
        }
    }

    fn port_not_found(&self, coord: PortCoord) -> SimCoreError {
        SimCoreError::NotFound(format!(
            "element '{}' has no {:?} port at index {}",
            self.name, coord.group, coord.index
        ))
    }

    fn parameter_not_found(&self, name: &str) -> SimCoreError {
        SimCoreError::NotFound(format!(
            "element '{}' has no parameter '{}'",
            self.name, name
        ))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Element({}, in={}, out={}, params={})",
            self.name,
            self.in_ports.len(),
            self.out_ports.len(),
            self.parameters.len()
        )
    }
}
