//! Virtual target: a set of data points written by commands.

use std::collections::BTreeMap;

use serde_json::{Value, json};

/// A simulated backend target.
///
/// Every command stores its value under its code; a status read returns all
/// stored data points in code order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualTarget {
    points: BTreeMap<String, Value>,
}

impl VirtualTarget {
    /// Store `value` under `code`.
    pub fn apply(&mut self, code: &str, value: Value) {
        self.points.insert(code.to_string(), value);
    }

    /// Current value of one data point.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Value> {
        self.points.get(code)
    }

    /// Status payload in the backend's `result` list shape.
    #[must_use]
    pub fn status(&self) -> Value {
        let result: Vec<Value> = self
            .points
            .iter()
            .map(|(code, value)| json!({ "code": code, "value": value }))
            .collect();
        json!({ "success": true, "result": result })
    }
}
