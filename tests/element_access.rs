//! End-to-end tests for element construction and the two parameter
//! addressing schemes.
//!
//! These exercise the public API the way a driver and a model author use
//! it: assemble ports and elements declaratively, then read and write
//! nested parameter state each iteration.

use simcore::element::{Element, ParamAddr, PortCoord, PortGroup};
use simcore::error::SimCoreError;
use simcore::parameters::{Value, ValueStatus};
use simcore::port::Port;
use serde_json::json;

fn stream_port(name: &str) -> Port {
    Port::new(
        name,
        vec![
            Value::new("val1", Some("Pa"), 1.0),
            Value::new("val2", Some("kg/s"), 2.0),
            Value::new("val3", Some("K"), 3.0),
        ],
    )
}

fn two_by_two_element() -> Element {
    Element::new(
        "mixer1",
        vec![stream_port("in1"), stream_port("in2")],
        vec![stream_port("out1"), stream_port("out2")],
        vec![Value::new("zeta", None, 2.5).with_status(ValueStatus::Fixed)],
    )
    .with_description("two-stream mixer")
    .with_config("solver_hint", json!("mass_balance_first"))
}

#[test]
fn write_through_address_is_visible_through_coordinates() {
    let mut element = two_by_two_element();

    // The canonical scenario: write (10, calculated) to val2_0_0
    let addr = ParamAddr::parse("val2_0_0").unwrap();
    element.write(&addr, 10, ValueStatus::Calculated).unwrap();

    assert_eq!(element.read(&addr).unwrap().as_f64(), Some(10.0));
    assert_eq!(
        element.get(&addr).unwrap().status(),
        ValueStatus::Calculated
    );

    // Coordinate-indexed lookup reflects the same change
    let port = element.port(PortCoord::new(PortGroup::Input, 0)).unwrap();
    let param = port.get("val2").unwrap();
    assert_eq!(param.value().as_f64(), Some(10.0));
    assert_eq!(param.status(), ValueStatus::Calculated);
}

#[test]
fn both_schemes_agree_on_every_parameter() {
    let element = two_by_two_element();

    for (g, count) in [(PortGroup::Input, 2usize), (PortGroup::Output, 2usize)] {
        for i in 0..count {
            for name in ["val1", "val2", "val3"] {
                let by_coord = element
                    .port(PortCoord::new(g, i))
                    .unwrap()
                    .get(name)
                    .unwrap()
                    .value()
                    .clone();
                let by_addr = element.read(&ParamAddr::new(name, g, i)).unwrap();
                assert_eq!(&by_coord, by_addr);
            }
        }
    }
}

#[test]
fn lookup_misses_are_not_found() {
    let mut element = two_by_two_element();

    let miss = element.read(&ParamAddr::input("val9", 0));
    assert!(matches!(miss.unwrap_err(), SimCoreError::NotFound(_)));

    let miss = element.read(&ParamAddr::input("val1", 2));
    assert!(matches!(miss.unwrap_err(), SimCoreError::NotFound(_)));

    let miss = element.write(&ParamAddr::output("val1", 9), 1.0, ValueStatus::Depend);
    assert!(matches!(miss.unwrap_err(), SimCoreError::NotFound(_)));

    // A failed write leaves everything untouched
    for port in element.in_ports().iter().chain(element.out_ports()) {
        for param in port {
            assert_eq!(param.status(), ValueStatus::Unknown);
        }
    }
}

#[test]
fn sequence_parameters_allow_further_indexing() {
    let profile = Port::new(
        "out1",
        vec![Value::new("T_profile", Some("K"), vec![300.0, 310.0, 320.0])],
    );
    let element = Element::new("exchanger1", vec![], vec![profile], vec![]);

    let payload = element.read(&ParamAddr::output("T_profile", 0)).unwrap();
    assert_eq!(payload.as_slice().map(|xs| xs[2]), Some(320.0));
}

#[test]
fn config_holds_arbitrary_auxiliary_settings() {
    let mut element = two_by_two_element();

    assert_eq!(element.config("solver_hint"), Some(&json!("mass_balance_first")));

    element.set_config("relaxation", json!(0.7));
    element.set_config("constants", json!({"g": 9.81, "R": 8.314}));

    assert_eq!(element.config("relaxation"), Some(&json!(0.7)));
    assert_eq!(
        element.config("constants").and_then(|v| v.get("R")),
        Some(&json!(8.314))
    );
    assert_eq!(element.config("missing"), None);
}

#[test]
fn driver_iteration_round() {
    let _ = env_logger::builder().is_test(true).try_init();

    // One simulated driver pass: classify, evaluate, test convergence.
    let mut element = two_by_two_element();

    // Specifications imposed from outside
    element
        .write(&ParamAddr::input("val1", 0), 3.0e5, ValueStatus::Fixed)
        .unwrap();

    // Degrees of freedom the driver must solve for
    let unknowns = element
        .port(PortCoord::output(0))
        .unwrap()
        .list_unknown()
        .len();
    assert_eq!(unknowns, 3);

    // Two evaluation passes over one output quantity
    let addr = ParamAddr::output("val2", 0);
    element.write(&addr, 40.0, ValueStatus::Calculated).unwrap();
    element.write(&addr, 40.5, ValueStatus::Calculated).unwrap();

    let residual = element.get(&addr).unwrap().residual().unwrap().unwrap();
    assert!((residual.as_f64().unwrap() - 0.5).abs() < 1e-12);

    // FIXED input must be left alone by a soft reset between runs
    element.reset(false);
    assert_eq!(
        element.get(&ParamAddr::input("val1", 0)).unwrap().status(),
        ValueStatus::Fixed
    );
    assert_eq!(
        element.get(&addr).unwrap().status(),
        ValueStatus::Unknown
    );
}
