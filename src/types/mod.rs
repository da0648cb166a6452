use derive_more::Display;
use internment::Intern;
use num_enum::{FromPrimitive, IntoPrimitive};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use entry::Entry;
pub use event::Event;

pub mod entry;
pub mod event;

/// Wall-clock time of an event
pub type Timestamp = std::time::SystemTime;

pub type FieldName = Intern<String>;

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Display,
    IntoPrimitive,
    FromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(i32)]
pub enum LogLevel {
    #[display("PANIC")]
    Panic = 0,
    #[display("FATAL")]
    Fatal = 1,
    #[display("ERROR")]
    Error = 2,
    #[display("WARNING")]
    Warning = 3,
    #[display("INFO")]
    Info = 4,
    #[display("DEBUG")]
    Debug = 5,
    #[display("TRACE")]
    Trace = 6,
    #[display("{_0}")]
    #[num_enum(catch_all)]
    Other(i32),
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => LogLevel::Error,
            tracing::Level::WARN => LogLevel::Warning,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::TRACE => LogLevel::Trace,
        }
    }
}

#[derive(Clone, PartialEq, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum FieldValue {
    UnsignedInteger(u64),
    SignedInteger(i64),
    F64(OrderedFloat<f64>),
    Bool(bool),
    String(String),
    /// Any other value, captured by its `Debug` rendering
    Opaque(String),
}

impl FieldValue {
    pub fn opaque<T: fmt::Debug + ?Sized>(v: &T) -> Self {
        FieldValue::Opaque(format!("{v:?}"))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::UnsignedInteger(v) => write!(f, "{v}"),
            FieldValue::SignedInteger(v) => write!(f, "{v}"),
            FieldValue::F64(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::String(v) | FieldValue::Opaque(v) => f.write_str(v),
        }
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        FieldValue::UnsignedInteger(v.into())
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        FieldValue::UnsignedInteger(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::UnsignedInteger(v.into())
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UnsignedInteger(v)
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        FieldValue::UnsignedInteger(v as u64)
    }
}

impl From<i8> for FieldValue {
    fn from(v: i8) -> Self {
        FieldValue::SignedInteger(v.into())
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        FieldValue::SignedInteger(v.into())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::SignedInteger(v.into())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::SignedInteger(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::F64(OrderedFloat(v.into()))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::F64(OrderedFloat(v))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_owned())
    }
}

impl From<LogLevel> for FieldValue {
    fn from(v: LogLevel) -> Self {
        FieldValue::SignedInteger(i32::from(v).into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn level_ordinals() {
        assert_eq!(i32::from(LogLevel::Panic), 0);
        assert_eq!(i32::from(LogLevel::Warning), 3);
        assert_eq!(i32::from(LogLevel::Trace), 6);
        assert_eq!(LogLevel::from(4_i32), LogLevel::Info);
        assert_eq!(LogLevel::from(42_i32), LogLevel::Other(42));
        assert_eq!(i32::from(LogLevel::Other(42)), 42);
    }

    #[test]
    fn level_from_tracing() {
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warning);
        assert_eq!(LogLevel::from(tracing::Level::TRACE), LogLevel::Trace);
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Other(9).to_string(), "9");
    }

    #[test]
    fn display_is_unquoted() {
        assert_eq!(FieldValue::from("hello").to_string(), "hello");
        assert_eq!(FieldValue::from(-3_i32).to_string(), "-3");
        assert_eq!(FieldValue::from(1.5_f64).to_string(), "1.5");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::opaque(&Some(1)).to_string(), "Some(1)");
    }
}
