use crate::{
    exporter::{ExportError, Exporter},
    types::{Event, FieldValue},
};
use itertools::Itertools;
use std::{io::Write, sync::Mutex, time::UNIX_EPOCH};

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct Capture {
    events: Mutex<Vec<Event>>,
}

impl Capture {
    /// A copy of the events received so far.
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Drain the events received so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Event>> {
        // Pushes are never partial, so a poisoned lock is still usable
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Exporter for Capture {
    fn export(&self, event: Event) -> Result<(), ExportError> {
        self.lock().push(event);
        Ok(())
    }
}

/// Drops every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl Exporter for Discard {
    fn export(&self, _event: Event) -> Result<(), ExportError> {
        Ok(())
    }
}

/// Writes one logfmt-style line per event:
/// `time=[-]<secs>.<nanos> msg="<message>" key=value ...`
#[derive(Debug)]
pub struct Printer<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> Printer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    pub fn format_line(event: &Event) -> String {
        let (sign, since_epoch) = match event.timestamp.duration_since(UNIX_EPOCH) {
            Ok(d) => ("", d),
            Err(e) => ("-", e.duration()),
        };
        let fields = event
            .fields
            .iter()
            .format_with(" ", |(name, value), f| match value {
                FieldValue::String(s) | FieldValue::Opaque(s) => {
                    f(&format_args!("{}={s:?}", name.as_str()))
                }
                _ => f(&format_args!("{}={value}", name.as_str())),
            });
        let mut line = format!(
            "time={sign}{}.{:09} msg={:?}",
            since_epoch.as_secs(),
            since_epoch.subsec_nanos(),
            event.message
        );
        if !event.fields.is_empty() {
            line.push(' ');
            line.push_str(&fields.to_string());
        }
        line
    }
}

impl<W: Write + Send + std::fmt::Debug> Exporter for Printer<W> {
    fn export(&self, event: Event) -> Result<(), ExportError> {
        let line = Self::format_line(&event);
        let mut out = self
            .out
            .lock()
            .map_err(|_| ExportError::new("printer output lock poisoned"))?;
        writeln!(out, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exporter::Builder;
    use std::{
        sync::Arc,
        time::{Duration, UNIX_EPOCH},
    };

    #[test]
    fn printer_line_format() {
        let printer = Arc::new(Printer::new(Vec::new()));
        Builder::to_exporter(printer.clone())
            .at(UNIX_EPOCH + Duration::new(12, 5))
            .with("path", "/tmp")
            .with("count", 3_u32)
            .with("ok", true)
            .log("disk \"low\"")
            .unwrap();

        let printer = Arc::try_unwrap(printer).unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(
            out,
            "time=12.000000005 msg=\"disk \\\"low\\\"\" path=\"/tmp\" count=3 ok=true\n"
        );
    }

    #[test]
    fn printer_line_without_fields() {
        let printer = Arc::new(Printer::new(Vec::new()));
        Builder::to_exporter(printer.clone())
            .at(UNIX_EPOCH)
            .log("")
            .unwrap();
        let printer = Arc::try_unwrap(printer).unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, "time=0.000000000 msg=\"\"\n");
    }

    #[test]
    fn printer_line_before_epoch() {
        let event = Event {
            id: uuid::Uuid::nil(),
            timestamp: UNIX_EPOCH - Duration::new(1, 500_000_000),
            message: "old".to_owned(),
            fields: vec![],
        };
        assert_eq!(
            Printer::<Vec<u8>>::format_line(&event),
            "time=-1.500000000 msg=\"old\""
        );
    }

    #[test]
    fn discard_accepts_everything() {
        Builder::to_exporter(Arc::new(Discard))
            .with("k", 1)
            .log("gone")
            .unwrap();
    }

    #[test]
    fn capture_take_drains() {
        let cap = Arc::new(Capture::default());
        Builder::to_exporter(cap.clone()).log("a").unwrap();
        assert_eq!(cap.len(), 1);
        assert_eq!(cap.take().len(), 1);
        assert!(cap.is_empty());
    }
}
