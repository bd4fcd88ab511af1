//! File conversion pipeline.
//!
//! This module orchestrates the single-pass conversion:
//!
//! - Parse each input line into a record (auto-detecting the source grammar)
//! - Render each record in the target dialect and write it out
//! - Route malformed-line messages to a separate diagnostics sink
//!
//! The main entry point is [`convert_file`] which processes a buffered reader
//! and writes converted output to any `Write` implementation.

pub mod pipeline;

pub use pipeline::{convert_file, ConvertStats};
