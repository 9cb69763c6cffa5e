//! Utility modules

pub mod format;
