//! Full analysis pipeline
//!
//! trace text -> event stream -> bounds -> three views -> task filter

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::config::TraceConfig;
use crate::error::Result;
use crate::event::{EventKind, Tick};
use crate::filter::View;
use crate::reconstruct::{
    run, BlockReason, BlockingTimeline, BlockingTracker, Bounds, CpuTimeline, Lifecycle,
    LifecycleTracker, Segment,
};
use crate::stream::{EventStream, TraceSource};

/// Reconstructed views of one trace, ready for an external renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceReport {
    pub bounds: Bounds,
    /// Smallest and largest tick seen (`None` for a trace without events)
    pub data_range: Option<(Tick, Tick)>,
    pub event_count: usize,
    pub events_by_kind: BTreeMap<EventKind, usize>,
    pub cpu: Vec<Segment>,
    pub lifecycle: Lifecycle,
    pub blocking: BTreeMap<BlockReason, Vec<Segment>>,
}

/// Report together with the event stream it was built from
#[derive(Debug, Clone)]
pub struct Analysis {
    pub stream: EventStream,
    pub report: TraceReport,
}

/// Analyze an in-memory trace
pub fn analyze(source: &TraceSource, config: &TraceConfig) -> Result<Analysis> {
    let stream = EventStream::build(source.lines());
    let data_range = stream.tick_range();
    let bounds = config.resolve_bounds(data_range)?;
    let filter = config.filter();

    let events = stream.events();
    let cpu = run(CpuTimeline::new(bounds), events);
    let lifecycle = run(LifecycleTracker::new(bounds.xmax), events);
    let blocking = run(BlockingTracker::new(), events);

    let cpu = filter.segments(View::Cpu, cpu);
    let lifecycle = filter.lifecycle(lifecycle);
    let blocking = BlockingTimeline {
        segments: filter.segments(View::Blocking, blocking.segments),
    }
    .into_by_classification();

    info!(
        events = stream.len(),
        xmin = bounds.xmin,
        xmax = bounds.xmax,
        cpu_segments = cpu.len(),
        lifecycles = lifecycle.segments.len(),
        "trace analyzed"
    );

    let report = TraceReport {
        bounds,
        data_range,
        event_count: stream.len(),
        events_by_kind: stream.kind_counts(),
        cpu,
        lifecycle,
        blocking,
    };
    Ok(Analysis { stream, report })
}

/// Read and analyze a trace file
pub fn analyze_file(path: impl AsRef<Path>, config: &TraceConfig) -> Result<Analysis> {
    let source = TraceSource::from_path(path)?;
    analyze(&source, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraceError;

    const TRACE: &str = "\
EVT_TASK_CREATE, 100, , Main, Worker1, ,
EVT_TASK_CREATE, 100, , Main, Flush, ,
traceTASK_SWITCHED_IN, 110, , Worker1, , ,
EVT_QUEUE_SEND, 120, , Worker1, q0, 1,
traceTASK_SWITCHED_OUT, 121, , Worker1, , ,
traceTASK_SWITCHED_IN, 130, , Flush, , ,
traceTASK_SWITCHED_OUT, 135, , Flush, , ,
traceTASK_SWITCHED_IN, 140, , Worker1, , ,
EVT_TASK_DELETE, 500, , Main, Worker1, ,
";

    #[test]
    fn test_analyze_builds_all_views() {
        let analysis = analyze(&TraceSource::from_text(TRACE), &TraceConfig::default()).unwrap();
        let report = analysis.report;

        assert_eq!(report.event_count, 9);
        assert_eq!(report.data_range, Some((100, 500)));
        assert_eq!(report.bounds, Bounds { xmin: 90, xmax: 510 });
        assert_eq!(report.events_by_kind[&EventKind::TaskSwitchedIn], 3);

        assert_eq!(report.cpu.first().unwrap().start, 90);
        assert_eq!(report.cpu.last().unwrap().end, 510);

        assert_eq!(
            report.lifecycle.segments,
            vec![Segment::new("Worker1", 100, 500), Segment::new("Flush", 100, 510)]
        );
        assert_eq!(
            report.blocking[&BlockReason::Queue],
            vec![Segment::classified("Worker1", 121, 140, BlockReason::Queue)]
        );
        assert!(report.blocking[&BlockReason::Delay].is_empty());
    }

    #[test]
    fn test_excluded_tasks_are_removed_from_views() {
        let mut config = TraceConfig::default();
        config.exclude.all.push("Flush".to_string());
        let report = analyze(&TraceSource::from_text(TRACE), &config)
            .unwrap()
            .report;

        assert!(report.cpu.iter().all(|s| s.subject != "Flush"));
        assert_eq!(report.lifecycle.segments.len(), 1);
        // Events are still counted; only the views are filtered
        assert_eq!(report.event_count, 9);
    }

    #[test]
    fn test_empty_trace() {
        let report = analyze(&TraceSource::from_text("nothing here\n"), &TraceConfig::default())
            .unwrap()
            .report;
        assert_eq!(report.event_count, 0);
        assert_eq!(report.data_range, None);
        assert_eq!(report.cpu, vec![Segment::new("IDLE", -10, 10)]);
        assert!(report.lifecycle.segments.is_empty());
    }

    #[test]
    fn test_max_tick_line_is_not_fatal() {
        let source = TraceSource::from_text("traceTASK_SWITCHED_IN, 9223372036854775807, , A, , ,\n");
        let report = analyze(&source, &TraceConfig::default()).unwrap().report;

        assert_eq!(
            report.bounds,
            Bounds {
                xmin: i64::MAX - 10,
                xmax: i64::MAX
            }
        );
        assert_eq!(
            report.cpu,
            vec![
                Segment::new("IDLE", i64::MAX - 10, i64::MAX),
                Segment::new("A", i64::MAX, i64::MAX),
            ]
        );
    }

    #[test]
    fn test_full_tick_range_renders() {
        let source = TraceSource::from_text(
            "traceTASK_SWITCHED_IN, 9223372036854775807, , A, , ,\n\
             traceTASK_SWITCHED_IN, -9223372036854775808, , B, , ,\n",
        );
        let report = analyze(&source, &TraceConfig::default()).unwrap().report;

        assert_eq!(
            report.bounds,
            Bounds {
                xmin: i64::MIN,
                xmax: i64::MAX
            }
        );
        assert_eq!(report.cpu[1], Segment::new("B", i64::MIN, i64::MAX));
        assert_eq!(report.cpu[1].duration(), i64::MAX);

        let text = crate::text_output::render_summary(&report);
        assert!(text.contains("range: [-9223372036854775808, 9223372036854775807]"));
    }

    #[test]
    fn test_analyze_file_missing_input() {
        let err = analyze_file("/nonexistent/raw_log.txt", &TraceConfig::default()).unwrap_err();
        assert!(matches!(err, TraceError::InputNotFound { .. }));
    }

    #[test]
    fn test_report_serializes() {
        let report = analyze(&TraceSource::from_text(TRACE), &TraceConfig::default())
            .unwrap()
            .report;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["bounds"]["xmin"], 90);
        assert_eq!(json["events_by_kind"]["EVT_TASK_CREATE"], 2);
        assert_eq!(json["blocking"]["QUEUE"][0]["subject"], "Worker1");
        assert_eq!(json["lifecycle"]["delete_edges"][0]["actor"], "Main");
    }
}
