use crate::exporter::ExportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Key '{key}' has no value (odd number of key/value arguments)")]
    MissingValue { key: String },

    #[error("Argument at index {index} is in key position but is not a string")]
    NonStringKey { index: usize },

    #[error("Field names must not be empty")]
    EmptyFieldName,

    #[error("No exporter is bound to the context and no default exporter is set")]
    NoExporter,

    #[error("The exporter rejected the event ({0})")]
    Export(#[from] ExportError),

    #[error("Invalid configuration ({0})")]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    /// The caller passed arguments that can't form an event.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::MissingValue { .. } | Error::NonStringKey { .. } | Error::EmptyFieldName
        )
    }

    /// The event was well formed but could not be delivered.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Error::NoExporter | Error::Export(_))
    }

    pub(crate) fn missing_value<S: AsRef<str>>(key: S) -> Self {
        Error::MissingValue {
            key: key.as_ref().to_owned(),
        }
    }
}
