//! dictconv - Format converter for CMU-style pronunciation dictionaries
//!
//! Parses word/phoneme dictionaries written in several near-identical line
//! dialects, auto-detecting the source grammar per file, and re-emits them
//! in any supported target dialect.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod dialect;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;
pub mod record;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use dialect::{dialect_names, find_dialect, Dialect, WordCase, DIALECTS};
pub use error::Result;
pub use record::Record;
