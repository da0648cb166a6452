//! Key/value logger adapter.
//!
//! [`KeyValueLogger`] accepts the alternating `key, value, key, value, ...`
//! argument convention of minimalist structured loggers, optionally led by a
//! [`Context`], and republishes each call as exactly one [`crate::Event`].
//!
//! ```
//! use event_logging::{args, exporter::Capture, Context, KeyValueLogger, Logger};
//! use std::sync::Arc;
//!
//! let capture = Arc::new(Capture::default());
//! let ctx = Context::with_exporter(capture.clone());
//! let logger = KeyValueLogger::default();
//!
//! logger.log(&args![ctx, "msg", "hello", "count", 3]).unwrap();
//! assert_eq!(capture.events()[0].message, "hello");
//! ```

use crate::{
    config::LoggerConfig,
    context::Context,
    error::Error,
    exporter::Builder,
    types::FieldValue,
};
use tracing::debug;

/// One argument of a [`Logger::log`] call.
#[derive(Clone, Debug)]
pub enum Arg {
    Context(Context),
    Value(FieldValue),
}

impl From<Context> for Arg {
    fn from(v: Context) -> Self {
        Arg::Context(v)
    }
}

impl From<&Context> for Arg {
    fn from(v: &Context) -> Self {
        Arg::Context(v.clone())
    }
}

impl From<FieldValue> for Arg {
    fn from(v: FieldValue) -> Self {
        Arg::Value(v)
    }
}

macro_rules! arg_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(v.into())
                }
            }
        )*
    };
}

arg_from_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, f32, f64, bool, String, &str);

/// Build a `Vec<Arg>` from a list of expressions.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::logger::Arg::from($arg)),*]
    };
}

/// A logger taking a loosely typed list of alternating keys and values.
pub trait Logger {
    fn log(&self, args: &[Arg]) -> Result<(), Error>;
}

#[derive(Clone, Debug)]
pub struct KeyValueLogger {
    message_keys: Vec<String>,
}

impl Default for KeyValueLogger {
    fn default() -> Self {
        Self::new(&LoggerConfig::default())
    }
}

impl KeyValueLogger {
    pub fn new(cfg: &LoggerConfig) -> Self {
        Self {
            message_keys: cfg.message_keys.clone(),
        }
    }

    fn is_message_key(&self, key: &str) -> bool {
        self.message_keys.iter().any(|k| k == key)
    }

    /// Log an explicit list of fields to the exporter resolved from `ctx`.
    ///
    /// Message keys are handled as in [`Logger::log`].
    pub fn log_fields<I, K, V>(&self, ctx: &Context, fields: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let fields: Vec<(K, FieldValue)> = fields
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect();
        if fields.iter().any(|(k, _)| k.as_ref().is_empty()) {
            return Err(Error::EmptyFieldName);
        }
        self.deliver(ctx, fields)
    }

    fn deliver<K: AsRef<str>>(
        &self,
        ctx: &Context,
        fields: Vec<(K, FieldValue)>,
    ) -> Result<(), Error> {
        let mut builder = Builder::to(ctx);
        let mut message = String::new();
        for (key, value) in fields {
            if self.is_message_key(key.as_ref()) {
                message = value.to_string();
            } else {
                builder = builder.with(key, value);
            }
        }
        builder.log(message)
    }
}

impl Logger for KeyValueLogger {
    /// If the first argument is a [`Context`] it is used to resolve the
    /// exporter, otherwise [`Context::current`] is.
    ///
    /// The remaining arguments are read as `key, value` pairs. The whole list
    /// is checked before anything is built, so malformed input never results
    /// in a partial event.
    fn log(&self, args: &[Arg]) -> Result<(), Error> {
        let (ctx, pairs, offset) = match args.split_first() {
            Some((Arg::Context(ctx), rest)) => (ctx.clone(), rest, 1),
            _ => (Context::current(), args, 0),
        };

        let mut fields = Vec::with_capacity(pairs.len() / 2);
        for (i, pair) in pairs.chunks(2).enumerate() {
            let index = offset + 2 * i;
            let key = match &pair[0] {
                Arg::Value(FieldValue::String(k)) => k.as_str(),
                other => {
                    debug!(index, arg = ?other, "Rejected non-string key");
                    return Err(Error::NonStringKey { index });
                }
            };
            if key.is_empty() {
                return Err(Error::EmptyFieldName);
            }
            let value = match pair.get(1) {
                Some(Arg::Value(v)) => v.clone(),
                Some(Arg::Context(c)) => FieldValue::opaque(c),
                None => {
                    debug!(key, "Rejected key without a value");
                    return Err(Error::missing_value(key));
                }
            };
            fields.push((key, value));
        }

        self.deliver(&ctx, fields)
    }
}
