use crate::{context::Context, types::Event};
use arc_swap::ArcSwapOption;
use std::{fmt, io, sync::Arc};
use tracing::debug;

pub use builder::Builder;
pub use stock::{Capture, Discard, Printer};

pub mod builder;
pub mod stock;

/// Receives finished events.
pub trait Exporter: Send + Sync + fmt::Debug {
    fn export(&self, event: Event) -> Result<(), ExportError>;

    /// Short label used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// An exporter failed to accept an event.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{0}")]
pub struct ExportError(pub String);

impl ExportError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self(msg.into())
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        Self(format!("IO error ({})", e.kind()))
    }
}

// ArcSwap needs a sized payload
#[derive(Debug)]
struct Registered(Arc<dyn Exporter>);

static DEFAULT: ArcSwapOption<Registered> = ArcSwapOption::const_empty();

/// Install the process-wide fallback exporter, returning the one it replaces.
///
/// Events are delivered here whenever the resolving [`Context`] has no
/// exporter of its own. Call [`take_default`] on shutdown to release it.
pub fn set_default(exporter: Arc<dyn Exporter>) -> Option<Arc<dyn Exporter>> {
    debug!(exporter = exporter.name(), "Installing default exporter");
    DEFAULT
        .swap(Some(Arc::new(Registered(exporter))))
        .map(|r| r.0.clone())
}

/// Remove the process-wide fallback exporter.
pub fn take_default() -> Option<Arc<dyn Exporter>> {
    let prev = DEFAULT.swap(None).map(|r| r.0.clone());
    if prev.is_some() {
        debug!("Removed default exporter");
    }
    prev
}

pub fn default_exporter() -> Option<Arc<dyn Exporter>> {
    DEFAULT.load_full().map(|r| r.0.clone())
}

/// The context's own exporter, else the default one.
pub fn resolve(ctx: &Context) -> Option<Arc<dyn Exporter>> {
    ctx.exporter().cloned().or_else(default_exporter)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_is_the_type_not_the_contents() {
        let cap = Capture::default();
        cap.export(Event {
            id: uuid::Uuid::nil(),
            timestamp: std::time::UNIX_EPOCH,
            message: "buffered".to_owned(),
            fields: vec![],
        })
        .unwrap();
        let exporter: Arc<dyn Exporter> = Arc::new(cap);
        assert!(exporter.name().ends_with("Capture"));
        assert!(!exporter.name().contains("buffered"));
        assert!(Discard.name().ends_with("Discard"));
    }
}
