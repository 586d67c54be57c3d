use std::sync::Arc;

use serde_json::{Map, Value};

/// One full machine state as published by the simulator's event stream.
///
/// Snapshots are never mutated after construction; the stream replaces the
/// current one wholesale and readers hold a cheap clone of the [`Arc`].
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot(Arc<Value>);

impl Snapshot {
    /// Parses an event payload and applies the client-side derivations.
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(payload)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(mut value: Value) -> Self {
        derive_cycling_pulse(&mut value);
        Self(Arc::new(value))
    }

    pub fn empty() -> Self {
        Self(Arc::new(Value::Object(Map::new())))
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    pub fn unit(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// The simulator reports the cycling unit as a bare phase counter. Indicators
/// address the pulse instead, which is half the phase rounded down.
fn derive_cycling_pulse(value: &mut Value) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    let Some(cycling) = root.get("cycling") else {
        return;
    };

    let phase = match cycling {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let mut derived = Map::new();
    if let Some(phase) = phase.filter(|p| p.is_finite()) {
        let pulse = (phase / 2.0).floor() as i64;
        derived.insert("pulse".into(), Value::from(pulse));
    }
    root.insert("cycling".into(), Value::Object(derived));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cycling_pulse_is_half_phase() {
        let snapshot = Snapshot::parse(r#"{"cycling": "10"}"#).unwrap();
        assert_eq!(snapshot.unit("cycling"), Some(&json!({"pulse": 5})));
    }

    #[test]
    fn test_cycling_pulse_rounds_down() {
        let snapshot = Snapshot::parse(r#"{"cycling": "11"}"#).unwrap();
        assert_eq!(snapshot.unit("cycling"), Some(&json!({"pulse": 5})));

        let snapshot = Snapshot::parse(r#"{"cycling": 3}"#).unwrap();
        assert_eq!(snapshot.unit("cycling"), Some(&json!({"pulse": 1})));
    }

    #[test]
    fn test_non_numeric_cycling_has_no_pulse() {
        let snapshot = Snapshot::parse(r#"{"cycling": "idle"}"#).unwrap();
        assert_eq!(snapshot.unit("cycling"), Some(&json!({})));
    }

    #[test]
    fn test_other_units_untouched() {
        let snapshot =
            Snapshot::parse(r#"{"acc": [{"sign": true}], "mp": {"a": 1}}"#)
                .unwrap();
        assert_eq!(snapshot.unit("acc"), Some(&json!([{"sign": true}])));
        assert_eq!(snapshot.unit("cycling"), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(Snapshot::parse("data: {").is_err());
    }
}
