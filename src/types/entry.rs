use crate::{
    context::Context,
    types::{FieldValue, LogLevel, Timestamp},
};
use std::collections::BTreeMap;

/// A record produced by a leveled logger.
#[derive(Clone, Debug)]
pub struct Entry {
    /// When set, the exporter is resolved from this context instead of the current one.
    pub context: Option<Context>,
    pub timestamp: Timestamp,
    pub level: LogLevel,
    pub message: String,
    pub data: BTreeMap<String, FieldValue>,
}

impl Entry {
    pub fn new<M: Into<String>>(level: LogLevel, message: M) -> Self {
        Self {
            context: None,
            timestamp: Timestamp::now(),
            level,
            message: message.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with<K: Into<String>, V: Into<FieldValue>>(mut self, key: K, value: V) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
