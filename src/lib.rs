//! # jarscan
//!
//! Search JAR archives and Java source trees for text, raw bytes, and
//! package names.
//!
//! ## Architecture
//!
//! - **scan**: recursive discovery of JAR archives and `.java` files
//! - **archive**: mmap-backed ZIP entry reading with per-archive error isolation
//! - **matcher**: match extraction modes (package names, text lines, raw bytes)
//! - **pipeline**: parallel fan-out of one scan task per source, deterministic merge
//! - **report**: aggregation, display limits, and text/JSON rendering
//! - **cli**: command-line surface
//! - **config**: path and limit resolution

pub mod archive;
pub mod cli;
pub mod config;
pub mod matcher;
pub mod pipeline;
pub mod report;
pub mod scan;
