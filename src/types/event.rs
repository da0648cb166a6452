use crate::types::{FieldName, FieldValue, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Event {
    /// Unique per event, even for identical input
    pub id: Uuid,
    pub timestamp: Timestamp,
    pub message: String,
    /// Unique by name, in first-insertion order
    pub fields: Vec<(FieldName, FieldValue)>,
}

impl Event {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Equal apart from the event identifier
    pub fn same_content(&self, other: &Event) -> bool {
        self.timestamp == other.timestamp
            && self.message == other.message
            && self.fields == other.fields
    }
}
