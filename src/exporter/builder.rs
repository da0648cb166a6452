use crate::{
    context::Context,
    error::Error,
    exporter::{resolve, Exporter},
    types::{Event, FieldName, FieldValue, Timestamp},
};
use fxhash::FxHashMap;
use internment::Intern;
use std::sync::Arc;
use tracing::trace;
use uuid::Uuid;

/// Accumulates the fields of a single event and delivers it on [`Builder::log`].
#[derive(Debug)]
pub struct Builder {
    exporter: Option<Arc<dyn Exporter>>,
    timestamp: Option<Timestamp>,
    fields: Vec<(FieldName, FieldValue)>,
    index: FxHashMap<FieldName, usize>,
}

impl Builder {
    /// A builder delivering to the exporter resolved from `ctx`.
    pub fn to(ctx: &Context) -> Self {
        Self::new(resolve(ctx))
    }

    pub fn to_exporter(exporter: Arc<dyn Exporter>) -> Self {
        Self::new(Some(exporter))
    }

    fn new(exporter: Option<Arc<dyn Exporter>>) -> Self {
        Self {
            exporter,
            timestamp: None,
            fields: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Use `timestamp` instead of the time [`Builder::log`] is called.
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach a field. A name that is already present has its value replaced.
    pub fn with<K: AsRef<str>, V: Into<FieldValue>>(mut self, name: K, value: V) -> Self {
        let name: FieldName = Intern::from_ref(name.as_ref());
        let value = value.into();
        match self.index.get(&name) {
            Some(&i) => self.fields[i].1 = value,
            None => {
                self.index.insert(name, self.fields.len());
                self.fields.push((name, value));
            }
        }
        self
    }

    /// Finish the event and hand it to the exporter.
    pub fn log<M: Into<String>>(self, message: M) -> Result<(), Error> {
        let exporter = self.exporter.ok_or(Error::NoExporter)?;
        let event = Event {
            id: Uuid::new_v4(),
            timestamp: self.timestamp.unwrap_or_else(Timestamp::now),
            message: message.into(),
            fields: self.fields,
        };
        trace!(id = %event.id, fields = event.fields.len(), "Delivering event");
        exporter.export(event)?;
        Ok(())
    }
}
