//! Lifecycle tests for the parameter primitive: construction, state
//! mutation with history, residuals, and mapping round-trips.

use approx::assert_relative_eq;
use simcore::error::SimCoreError;
use simcore::parameters::{ParamValue, Value, ValueStatus, ValueType};
use serde_json::json;

#[test]
fn state_history_pairs_value_and_status() {
    let mut param = Value::new("h", Some("J/kg"), 100.0);

    param.set_state(110.0, ValueStatus::Calculated);
    param.set_state(112.0, ValueStatus::Depend);

    let (payload, status) = param.state();
    assert_eq!(payload.as_f64(), Some(112.0));
    assert_eq!(status, ValueStatus::Depend);

    // The archived pair is the full prior state, not just the value
    assert_eq!(param.previous_value().and_then(|v| v.as_f64()), Some(110.0));
    assert_eq!(param.previous_status(), Some(ValueStatus::Calculated));
}

#[test]
fn history_off_means_no_previous_state_ever() {
    let mut param = Value::new("h", Some("J/kg"), 100.0).without_history();

    for i in 0..5 {
        param.set_state(100.0 + f64::from(i), ValueStatus::Calculated);
        assert_eq!(param.previous_value(), None);
        assert_eq!(param.previous_status(), None);
    }
}

#[test]
fn residual_is_current_minus_previous() {
    let mut param = Value::new("P", Some("Pa"), 0.0);
    assert!(param.residual().unwrap().is_none());

    param.set_state(1.0e5, ValueStatus::Calculated);
    param.set_state(1.000_25e5, ValueStatus::Calculated);

    let residual = param.residual().unwrap().unwrap();
    assert_relative_eq!(residual.as_f64().unwrap(), 25.0, max_relative = 1e-12);
}

#[test]
fn residual_fails_loudly_on_callables() {
    let mut param = Value::new("transform", None, ParamValue::callable("f(x)", |a| a[0]));
    param.set_state(
        ParamValue::callable("g(x)", |a| a[0] + 1.0),
        ValueStatus::Calculated,
    );

    assert!(matches!(
        param.residual().unwrap_err(),
        SimCoreError::NonNumericResidual(_)
    ));
}

#[test]
fn value_type_always_reflects_current_payload() {
    let mut param = Value::new("x", None, json!({"kind": "table", "rows": 3}));
    assert_eq!(param.value_type(), ValueType::Opaque);

    param.set_value(4.2);
    assert_eq!(param.value_type(), ValueType::Numeric);

    param.set_value(vec![4.2, 4.3]);
    assert_eq!(param.value_type(), ValueType::Sequence);
}

#[test]
fn mapping_construction_applies_documented_defaults() {
    let param = Value::from_mapping(&json!({
        "value": [1.0, 2.0, 3.0],
        "dimension": "m",
        "name": "lengths",
    }))
    .unwrap();

    assert_eq!(param.value_type(), ValueType::Sequence);
    assert_eq!(param.status(), ValueStatus::Unknown);
    assert_eq!(param.description(), "");
    assert!(param.store_prev());
    assert_eq!(param.min(), None);
    assert_eq!(param.max(), None);
}

#[test]
fn canonical_pressure_construction() {
    let param = Value::from_mapping(&json!({
        "value": 10.0e6,
        "name": "Pressure",
        "dimension": "Pa",
        "status": "calculated",
        "store_prev": true,
        "min_value": 0.0,
        "max_value": 20.0e6,
    }))
    .unwrap();

    assert_eq!(param.status(), ValueStatus::Calculated);
    assert!(param.to_string().contains("CALCULATED"));
    assert!(param.residual().unwrap().is_none());
    assert!(param.validate().is_ok());
}

#[test]
fn bounds_checked_only_on_demand() {
    let mut param = Value::new("level", Some("m"), 0.5)
        .with_bounds(Some(0.0), Some(1.0))
        .unwrap();

    // The setter never rejects; validation is the caller's deliberate act
    param.set_state(1.7, ValueStatus::Calculated);
    assert_eq!(param.value().as_f64(), Some(1.7));
    assert!(param.validate().is_err());

    param.set_state(0.9, ValueStatus::Calculated);
    assert!(param.validate().is_ok());
}
