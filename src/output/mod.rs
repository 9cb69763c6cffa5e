//! Report output channels
//!
//! - `text`: human-readable console report
//! - `csv`: append-only CSV log for later analysis

pub mod csv;
pub mod text;
