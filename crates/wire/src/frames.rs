use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A frame sent by a producer connection.
///
/// The first frame on a producer connection MUST be [`ProducerFrame::NewReport`];
/// every frame after that MUST be [`ProducerFrame::DeltaList`]. Any other
/// shape is a protocol violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProducerFrame {
    NewReport { report_id: String },
    DeltaList { deltas: Vec<Value> },
}

/// A frame sent by the server on a consumer connection.
///
/// The first frame is always [`ConsumerFrame::NewReport`], carrying the
/// current session's `report_id` so the client knows which producer it is
/// watching; every subsequent frame is a [`ConsumerFrame::DeltaList`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsumerFrame {
    NewReport { report_id: String },
    DeltaList { deltas: Vec<Value> },
}

impl ConsumerFrame {
    pub fn new_report(report_id: impl Into<String>) -> Self {
        Self::NewReport {
            report_id: report_id.into(),
        }
    }

    pub fn delta_list(deltas: Vec<Value>) -> Self {
        Self::DeltaList { deltas }
    }
}
