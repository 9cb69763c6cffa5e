//! CSV output formatting
//!
//! This module provides the CSV log of a load test: one header row, one row
//! per periodic report and one `Total` row for the final summary. Every field
//! is comma-terminated so rows can be concatenated column by column.
//!
//! Features:
//! - Header row fixes the column layout for the whole file
//! - Per-operation rate and percent-under-threshold columns
//! - Open, write and close on every call; no handle is held between reports

use crate::error::ReportError;
use crate::report::snapshot::{FinalSnapshot, PeriodicSnapshot};
use crate::util::format::format_csv_timestamp;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write the header row
///
/// `Timestamp,Seconds,Inserted,Total,` then, per operation type,
/// `<op>_rate,` followed by `<op>_percent_under_<t>ms,` per threshold.
pub fn write_header<W: Write>(
    out: &mut W,
    op_types: &[String],
    thresholds_ms: &[u64],
) -> io::Result<()> {
    write!(out, "Timestamp,Seconds,Inserted,Total,")?;
    for op in op_types {
        write!(out, "{}_rate,", op)?;
        for threshold in thresholds_ms {
            write!(out, "{}_percent_under_{}ms,", op, threshold)?;
        }
    }
    writeln!(out)
}

/// Write one periodic row
pub fn write_periodic_row<W: Write>(out: &mut W, snapshot: &PeriodicSnapshot) -> io::Result<()> {
    write!(
        out,
        "{},{},{},{},",
        format_csv_timestamp(&snapshot.time),
        snapshot.seconds_elapsed,
        snapshot.inserted,
        snapshot.total
    )?;
    for op in &snapshot.ops {
        write!(out, "{},", op.rate)?;
        for pct in &op.percent_under {
            write!(out, "{:.2},", pct)?;
        }
    }
    writeln!(out)
}

/// Write the final `Total` row
///
/// Each operation type gets its average rate followed by one empty field.
/// This row does not line up with the per-threshold columns of the header
/// when more than one threshold is configured; consumers rely on the
/// existing layout, so it is kept as is.
pub fn write_final_row<W: Write>(out: &mut W, snapshot: &FinalSnapshot) -> io::Result<()> {
    write!(
        out,
        "Total,{},{},{},",
        snapshot.seconds_elapsed, snapshot.inserted, snapshot.total
    )?;
    for op in &snapshot.ops {
        write!(out, "{},,", op.average_rate)?;
    }
    writeln!(out)
}

/// CSV log file
///
/// The header truncates the file; every later row is appended. The file is
/// opened and closed around each write so a crash between reports leaves
/// only complete rows behind.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the file and write the header row
    pub fn write_header(&self, op_types: &[String], thresholds_ms: &[u64]) -> Result<(), ReportError> {
        let file = File::create(&self.path).map_err(|source| ReportError::LogOpen {
            path: self.path.clone(),
            source,
        })?;
        self.write_with(file, |w| write_header(w, op_types, thresholds_ms))
    }

    /// Append one periodic row
    pub fn append_periodic(&self, snapshot: &PeriodicSnapshot) -> Result<(), ReportError> {
        self.append_with(|w| write_periodic_row(w, snapshot))
    }

    /// Append the final `Total` row
    pub fn append_final(&self, snapshot: &FinalSnapshot) -> Result<(), ReportError> {
        self.append_with(|w| write_final_row(w, snapshot))
    }

    fn append_with<F>(&self, write: F) -> Result<(), ReportError>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ReportError::LogOpen {
                path: self.path.clone(),
                source,
            })?;
        self.write_with(file, write)
    }

    fn write_with<F>(&self, file: File, write: F) -> Result<(), ReportError>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let mut writer = BufWriter::new(file);
        write(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|source| ReportError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }
}
