//! Declarative addresses into a [`Snapshot`] and the predicates compiled from
//! them.
//!
//! A [`StatePath`] reads `snapshot[unit][unit_index][field][field_index]`,
//! skipping any step that is absent, and compares the leaf against
//! `eq_value` with loose equality so that `"5"`, `5` and `5.0` agree and
//! `"1"`, `1` and `true` agree.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::snapshot::Snapshot;

/// Unit name reserved for indicators that are drawn but not yet wired to any
/// machine state. Such indicators are always off.
pub const UNWIRED_UNIT: &str = "nil";

pub type Predicate = Arc<dyn Fn(&Snapshot) -> bool + Send + Sync>;

/// One navigation step: a position in an array (or string) or a key in an
/// object.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PathKey {
    Index(usize),
    Name(String),
}

impl PathKey {
    fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index(i) => Some(*i),
            PathKey::Name(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(i) => write!(f, "{}", i),
            PathKey::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatePath {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_index: Option<PathKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<PathKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_index: Option<PathKey>,
    #[serde(default = "default_eq_value", alias = "equalsValue")]
    pub eq_value: Value,
}

impl StatePath {
    pub fn new(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            unit_index: None,
            field: None,
            field_index: None,
            eq_value: default_eq_value(),
        }
    }

    pub fn unit_index(mut self, index: usize) -> Self {
        self.unit_index = Some(PathKey::Index(index));
        self
    }

    pub fn field(mut self, name: &str) -> Self {
        self.field = Some(PathKey::Name(name.to_string()));
        self
    }

    pub fn field_index(mut self, index: usize) -> Self {
        self.field_index = Some(PathKey::Index(index));
        self
    }

    pub fn equals(mut self, value: impl Into<Value>) -> Self {
        self.eq_value = value.into();
        self
    }

    pub fn is_unwired(&self) -> bool {
        self.unit == UNWIRED_UNIT
    }

    /// Walks the snapshot along this path. `None` when the path is unwired or
    /// any step is missing from the snapshot.
    pub fn resolve<'a>(
        &self,
        snapshot: &'a Snapshot,
    ) -> Option<Cow<'a, Value>> {
        if self.is_unwired() {
            return None;
        }

        let mut node = Cow::Borrowed(snapshot.unit(&self.unit)?);
        for key in [&self.unit_index, &self.field, &self.field_index]
            .into_iter()
            .flatten()
        {
            node = descend(node, key)?;
        }

        Some(node)
    }

    pub fn evaluate(&self, snapshot: &Snapshot) -> bool {
        self.resolve(snapshot)
            .is_some_and(|leaf| loose_eq(&leaf, &self.eq_value))
    }

    pub fn compile(self) -> Predicate {
        if self.is_unwired() {
            return Arc::new(|_: &Snapshot| false);
        }
        Arc::new(move |snapshot: &Snapshot| self.evaluate(snapshot))
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unit)?;
        for key in [&self.unit_index, &self.field, &self.field_index]
            .into_iter()
            .flatten()
        {
            write!(f, "[{}]", key)?;
        }
        write!(f, " == {}", self.eq_value)
    }
}

fn default_eq_value() -> Value {
    Value::Bool(true)
}

fn descend<'a>(
    node: Cow<'a, Value>,
    key: &PathKey,
) -> Option<Cow<'a, Value>> {
    match node {
        Cow::Borrowed(value) => child(value, key),
        Cow::Owned(value) => {
            child(&value, key).map(|c| Cow::Owned(c.into_owned()))
        }
    }
}

fn child<'a>(value: &'a Value, key: &PathKey) -> Option<Cow<'a, Value>> {
    match value {
        Value::Array(items) => {
            key.as_index().and_then(|i| items.get(i)).map(Cow::Borrowed)
        }
        Value::Object(map) => map.get(&key.to_string()).map(Cow::Borrowed),
        // Some units report flip-flops as a string of 0/1 digits
        Value::String(s) => key
            .as_index()
            .and_then(|i| s.chars().nth(i))
            .map(|c| Cow::Owned(Value::String(c.to_string()))),
        _ => None,
    }
}

/// Equality with numeric coercion between strings, numbers and booleans.
/// Arrays and objects only equal structurally identical values.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => {
            match (to_number(a), to_number(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Number(_), Value::Number(_))
        | (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_)) => {
            match (to_number(a), to_number(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> Snapshot {
        Snapshot::from_value(value)
    }

    #[test]
    fn test_unwired_is_always_false() {
        let predicate = StatePath::new(UNWIRED_UNIT).equals(false).compile();
        assert!(!predicate(&Snapshot::empty()));
        assert!(!predicate(&snapshot(json!({"nil": false}))));
        assert!(!predicate(&snapshot(json!(null))));
    }

    #[test]
    fn test_unit_index_and_field() {
        let predicate =
            StatePath::new("acc").unit_index(0).field("sign").compile();
        assert!(predicate(&snapshot(json!({"acc": [{"sign": true}]}))));
        assert!(!predicate(&snapshot(json!({"acc": [{"sign": false}]}))));
    }

    #[test]
    fn test_all_presence_combinations() {
        let state = snapshot(json!({
            "flag": true,
            "list": [false, true],
            "unit": {"field": 1, "digits": [0, 7]},
            "units": [{"field": "x", "digits": [3, 4]}],
            "grid": [[1, 2], [3, 4]],
        }));

        // unit only
        assert!(StatePath::new("flag").evaluate(&state));
        // unit + unitIndex
        assert!(StatePath::new("list").unit_index(1).evaluate(&state));
        assert!(!StatePath::new("list").unit_index(0).evaluate(&state));
        // unit + field
        assert!(
            StatePath::new("unit")
                .field("field")
                .equals(1)
                .evaluate(&state)
        );
        // unit + fieldIndex
        assert!(StatePath::new("list").field_index(1).evaluate(&state));
        // unit + field + fieldIndex
        assert!(
            StatePath::new("unit")
                .field("digits")
                .field_index(1)
                .equals(7)
                .evaluate(&state)
        );
        // unit + unitIndex + field
        assert!(
            StatePath::new("units")
                .unit_index(0)
                .field("field")
                .equals("x")
                .evaluate(&state)
        );
        // unit + unitIndex + fieldIndex
        assert!(
            StatePath::new("grid")
                .unit_index(1)
                .field_index(0)
                .equals(3)
                .evaluate(&state)
        );
        // all three
        assert!(
            StatePath::new("units")
                .unit_index(0)
                .field("digits")
                .field_index(0)
                .equals(3)
                .evaluate(&state)
        );
    }

    #[test]
    fn test_missing_path_is_false() {
        let path = StatePath::new("acc").unit_index(3).field("sign");
        let state = snapshot(json!({"acc": [{"sign": true}]}));
        assert!(path.resolve(&state).is_none());
        assert!(!path.evaluate(&state));
        assert!(!path.evaluate(&Snapshot::empty()));
        let scalar = snapshot(json!({"acc": 4}));
        assert!(!StatePath::new("acc").field("sign").evaluate(&scalar));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_eq(&json!("5"), &json!(5)));
        assert!(loose_eq(&json!(5), &json!(5.0)));
        assert!(loose_eq(&json!("1"), &json!(true)));
        assert!(loose_eq(&json!(0), &json!(false)));
        assert!(loose_eq(&json!(" 2 "), &json!(2)));
        assert!(!loose_eq(&json!("a"), &json!(0)));
        assert!(!loose_eq(&json!("1"), &json!("1.0")));
        assert!(!loose_eq(&json!(null), &json!(false)));
        assert!(!loose_eq(&json!([1]), &json!(1)));
    }

    #[test]
    fn test_string_state_is_indexed_by_character() {
        let state = snapshot(json!({"initiate": "0100"}));
        let path = StatePath::new("initiate").unit_index(1);
        assert!(path.evaluate(&state));
        assert!(!StatePath::new("initiate").unit_index(0).evaluate(&state));
        assert!(!StatePath::new("initiate").unit_index(9).evaluate(&state));
    }

    #[test]
    fn test_deserializes_observed_document_keys() {
        let path: StatePath = serde_json::from_value(json!({
            "unit": "cycling",
            "field": "pulse",
            "eqValue": 5,
        }))
        .unwrap();
        assert_eq!(path, StatePath::new("cycling").field("pulse").equals(5));

        let path: StatePath = serde_json::from_value(json!({
            "unit": "acc",
            "unitIndex": 2,
            "field": "decade",
            "fieldIndex": 9,
            "equalsValue": "1",
        }))
        .unwrap();
        assert_eq!(path.unit_index, Some(PathKey::Index(2)));
        assert_eq!(path.field_index, Some(PathKey::Index(9)));
        assert_eq!(path.eq_value, json!("1"));

        let path: StatePath =
            serde_json::from_value(json!({"unit": "mp"})).unwrap();
        assert_eq!(path.eq_value, json!(true));
    }
}
