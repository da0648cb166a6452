#![doc = include_str!("../README.md")]

pub use crate::config::*;
pub use crate::context::{Context, ContextGuard};
pub use crate::error::Error;
pub use crate::exporter::{Builder, ExportError, Exporter};
pub use crate::formatter::{EventFormatter, LevelMapper};
pub use crate::logger::{Arg, KeyValueLogger, Logger};
pub use crate::types::*;

pub mod config;
pub mod context;
pub mod error;
pub mod exporter;
pub mod formatter;
pub mod logger;
pub mod types;
