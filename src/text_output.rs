//! Plain-text summary of a trace report

use std::fmt;

use crate::reconstruct::Segment;
use crate::report::TraceReport;

/// Aligned tables, one per view
pub struct Summary<'a>(pub &'a TraceReport);

fn write_segments(f: &mut fmt::Formatter<'_>, segments: &[Segment]) -> fmt::Result {
    writeln!(f, "{:>10} {:>10} {:>8}  task", "start", "end", "ticks")?;
    writeln!(f, "---------- ---------- --------  ----------------")?;
    for s in segments {
        writeln!(
            f,
            "{:>10} {:>10} {:>8}  {}",
            s.start,
            s.end,
            s.duration(),
            s.subject
        )?;
    }
    Ok(())
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(
            f,
            "events: {}  range: [{}, {}]",
            report.event_count, report.bounds.xmin, report.bounds.xmax
        )?;
        for (kind, count) in &report.events_by_kind {
            writeln!(f, "  {:<36} {:>8}", kind.canonical_name(), count)?;
        }

        writeln!(f, "\n=== CPU ({} segments) ===", report.cpu.len())?;
        write_segments(f, &report.cpu)?;

        writeln!(
            f,
            "\n=== Lifecycle ({} tasks) ===",
            report.lifecycle.segments.len()
        )?;
        write_segments(f, &report.lifecycle.segments)?;
        for edge in &report.lifecycle.delete_edges {
            writeln!(
                f,
                "  deleted at {}: {} -> {}",
                edge.tick, edge.actor, edge.target
            )?;
        }

        for (reason, segments) in &report.blocking {
            writeln!(
                f,
                "\n=== Blocking: {} ({} intervals) ===",
                reason,
                segments.len()
            )?;
            write_segments(f, segments)?;
        }

        Ok(())
    }
}

/// Render the report as aligned tables, one per view
pub fn render_summary(report: &TraceReport) -> String {
    Summary(report).to_string()
}
