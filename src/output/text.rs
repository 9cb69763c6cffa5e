//! Human-readable console output

use crate::report::snapshot::{FinalSnapshot, PeriodicSnapshot};
use crate::util::format::{format_clock, format_number};
use std::io::{self, Write};

/// Line printed before every report
pub const SEPARATOR: &str = "------------------------";

/// Write one periodic report
///
/// ```text
/// ------------------------
/// After 30 seconds (14:07:09), 1,200 new documents inserted - collection has 6,200 in total
/// 40 inserts per second since last report
///     97.50% in under 50 milliseconds
///
/// ```
pub fn write_periodic<W: Write>(
    out: &mut W,
    snapshot: &PeriodicSnapshot,
    thresholds_ms: &[u64],
) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(
        out,
        "After {} seconds ({}), {} new documents inserted - collection has {} in total",
        format_number(snapshot.seconds_elapsed),
        format_clock(&snapshot.time),
        format_number(snapshot.inserted),
        format_number(snapshot.total),
    )?;

    for op in &snapshot.ops {
        writeln!(
            out,
            "{} {} per second since last report",
            format_number(op.rate),
            op.op_type
        )?;
        for (pct, threshold) in op.percent_under.iter().zip(thresholds_ms) {
            writeln!(out, "    {:.2}% in under {} milliseconds", pct, threshold)?;
        }
    }

    writeln!(out)?;
    out.flush()
}

/// Write the final summary
pub fn write_final<W: Write>(out: &mut W, snapshot: &FinalSnapshot) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(
        out,
        "After {} seconds, {} new documents inserted - collection has {} in total",
        snapshot.seconds_elapsed, snapshot.inserted, snapshot.total,
    )?;

    for op in &snapshot.ops {
        writeln!(out, "{} {} per second on average", op.average_rate, op.op_type)?;
    }

    writeln!(out)?;
    out.flush()
}
