//! Leveled-entry formatter adapter.
//!
//! [`EventFormatter`] turns each leveled log entry into one [`crate::Event`]
//! and delivers it while "formatting". The bytes it returns are always empty,
//! so the host logger's own output must go nowhere. For `tracing`:
//!
//! ```
//! use event_logging::{exporter::Capture, Context, EventFormatter};
//! use std::sync::Arc;
//! use tracing_subscriber::filter::LevelFilter;
//!
//! let capture = Arc::new(Capture::default());
//! let subscriber = EventFormatter::default().into_subscriber(LevelFilter::INFO);
//! tracing::subscriber::with_default(subscriber, || {
//!     let _ctx = Context::with_exporter(capture.clone()).enter();
//!     tracing::warn!(path = "/tmp", "disk low");
//! });
//! assert_eq!(capture.events()[0].message, "disk low");
//! ```

use crate::{
    config::{FormatterConfig, LevelMapping},
    context::Context,
    error::Error,
    exporter::Builder,
    types::{Entry, FieldValue, LogLevel, Timestamp},
};
use std::{cell::Cell, collections::BTreeMap, fmt, io, sync::Arc};
use tracing::{
    debug,
    field::{Field, Visit},
    Subscriber,
};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

thread_local! {
    // Set while this thread is delivering an event from the `tracing` host
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

struct DeliveringReset;

impl Drop for DeliveringReset {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(false));
    }
}

/// Converts an entry's level into the value of the level field.
#[derive(Clone)]
pub enum LevelMapper {
    /// The level's ordinal, unchanged.
    Verbatim,
    /// OpenTelemetry severity numbers. Unknown levels keep their ordinal.
    OpenTelemetry,
    Custom(Arc<dyn Fn(LogLevel) -> i64 + Send + Sync>),
}

impl LevelMapper {
    pub fn custom<F: Fn(LogLevel) -> i64 + Send + Sync + 'static>(f: F) -> Self {
        LevelMapper::Custom(Arc::new(f))
    }

    pub fn map(&self, level: LogLevel) -> i64 {
        match self {
            LevelMapper::Verbatim => i32::from(level).into(),
            LevelMapper::OpenTelemetry => match level {
                LogLevel::Trace => 1,
                LogLevel::Debug => 5,
                LogLevel::Info => 9,
                LogLevel::Warning => 13,
                LogLevel::Error => 17,
                LogLevel::Fatal => 21,
                LogLevel::Panic => 24,
                LogLevel::Other(o) => o.into(),
            },
            LevelMapper::Custom(f) => f(level),
        }
    }
}

impl fmt::Debug for LevelMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelMapper::Verbatim => f.write_str("Verbatim"),
            LevelMapper::OpenTelemetry => f.write_str("OpenTelemetry"),
            LevelMapper::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<LevelMapping> for LevelMapper {
    fn from(m: LevelMapping) -> Self {
        match m {
            LevelMapping::Verbatim => LevelMapper::Verbatim,
            LevelMapping::OpenTelemetry => LevelMapper::OpenTelemetry,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EventFormatter {
    level_key: String,
    level_mapper: LevelMapper,
    record_target: bool,
}

impl Default for EventFormatter {
    fn default() -> Self {
        Self::new(&FormatterConfig::default())
    }
}

impl EventFormatter {
    pub fn new(cfg: &FormatterConfig) -> Self {
        Self {
            level_key: cfg.level_key.clone(),
            level_mapper: cfg.level_mapping.into(),
            record_target: cfg.record_target,
        }
    }

    pub fn with_level_mapper(mut self, mapper: LevelMapper) -> Self {
        self.level_mapper = mapper;
        self
    }

    /// Deliver `entry` as an event. The returned bytes are always empty.
    ///
    /// The exporter is resolved from the entry's context if it has one,
    /// otherwise from [`Context::current`]. The event keeps the entry's
    /// timestamp. The level field is attached last, so an entry field with
    /// the same name as the level key is replaced by the level.
    pub fn format(&self, entry: &Entry) -> Result<Vec<u8>, Error> {
        if entry.data.keys().any(|k| k.is_empty()) {
            return Err(Error::EmptyFieldName);
        }
        if let Some(shadowed) = entry.data.get(&self.level_key) {
            debug!(
                level_key = %self.level_key,
                %shadowed,
                "Entry field replaced by the level field"
            );
        }

        let builder = match entry.context.as_ref() {
            Some(ctx) => Builder::to(ctx),
            None => Builder::to(&Context::current()),
        };
        let builder = entry
            .data
            .iter()
            .fold(builder.at(entry.timestamp), |b, (k, v)| b.with(k, v.clone()))
            .with(&self.level_key, self.level_mapper.map(entry.level));
        builder.log(entry.message.as_str())?;
        Ok(Vec::new())
    }

    /// A `tracing` subscriber that delivers every enabled event through this
    /// formatter and writes nothing.
    pub fn into_subscriber(
        self,
        max_level: LevelFilter,
    ) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_writer(io::sink)
            .event_format(self)
            .finish()
    }

    fn entry_from_tracing(&self, event: &tracing::Event<'_>) -> Entry {
        let meta = event.metadata();
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        if self.record_target {
            visitor
                .data
                .insert("target".to_owned(), meta.target().into());
        }
        Entry {
            context: None,
            timestamp: Timestamp::now(),
            level: (*meta.level()).into(),
            message: visitor.message.unwrap_or_default(),
            data: visitor.data,
        }
    }
}

impl<S, N> FormatEvent<S, N> for EventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        _writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        // Events emitted while delivering, e.g. by an exporter, are dropped
        if DELIVERING.with(|d| d.replace(true)) {
            return Ok(());
        }
        let _reset = DeliveringReset;
        // This crate's own diagnostics are not republished as events
        if event.metadata().target().split("::").next() == Some(env!("CARGO_CRATE_NAME")) {
            return Ok(());
        }
        let entry = self.entry_from_tracing(event);
        self.format(&entry).map(|_| ()).map_err(|_| fmt::Error)
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: Option<String>,
    data: BTreeMap<String, FieldValue>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.data.insert(field.name().to_owned(), value);
        }
    }
}

impl Visit for EntryVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string().into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, FieldValue::opaque(value));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verbatim_mapping() {
        let m = LevelMapper::Verbatim;
        assert_eq!(m.map(LogLevel::Warning), 3);
        assert_eq!(m.map(LogLevel::Other(-7)), -7);
    }

    #[test]
    fn otel_mapping() {
        let m = LevelMapper::from(LevelMapping::OpenTelemetry);
        assert_eq!(m.map(LogLevel::Info), 9);
        assert_eq!(m.map(LogLevel::Panic), 24);
        assert_eq!(m.map(LogLevel::Other(30)), 30);
    }

    #[test]
    fn custom_mapping() {
        let m = LevelMapper::custom(|l| 100 - i64::from(i32::from(l)));
        assert_eq!(m.map(LogLevel::Error), 98);
        assert_eq!(format!("{m:?}"), "Custom(..)");
    }
}
