use serde_json::Value;

/// An opaque, ordered unit of document mutation emitted by a producer.
///
/// The engine never parses or merges deltas; it only preserves their order
/// relative to a single producer. The wire crate is responsible for turning
/// these into and out of frames on the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta(Value);

impl Delta {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Delta {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// An immutable `(report_id, report_name)` pair.
///
/// `report_id` is assigned by the producer and is opaque to the engine;
/// `report_name` is the human-meaningful handle consumers connect by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportIdentity {
    pub report_id: String,
    pub report_name: String,
}

impl ReportIdentity {
    pub fn new(report_id: impl Into<String>, report_name: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            report_name: report_name.into(),
        }
    }
}
