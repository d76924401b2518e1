// End-to-end reconstruction scenarios, driven from raw trace text
//
// Helpers here are shared with the per-reconstructor unit tests.

use super::*;
use crate::event::EventKind;
use crate::stream::{EventStream, TraceSource};

pub(crate) fn event_at(kind: EventKind, tick: Option<Tick>, task: &str) -> NormalizedEvent {
    NormalizedEvent {
        kind,
        tick,
        timestamp: String::new(),
        task_id: task.to_string(),
        object: String::new(),
        value: String::new(),
        src: String::new(),
        source_ordinal: 0,
        raw_line: String::new(),
    }
}

pub(crate) fn event(kind: EventKind, tick: Tick, task: &str) -> NormalizedEvent {
    event_at(kind, Some(tick), task)
}

pub(crate) fn lifecycle_event(kind: EventKind, tick: Tick, actor: &str, object: &str) -> NormalizedEvent {
    NormalizedEvent {
        object: object.to_string(),
        ..event(kind, tick, actor)
    }
}

fn stream(text: &str) -> EventStream {
    EventStream::build(TraceSource::from_text(text).lines())
}

/// Task created by Main, later deleted by Main
#[test]
fn test_create_delete_scenario() {
    let s = stream(
        "EVT_TASK_CREATE, 100, , Main, Worker1, ,\n\
         traceTASK_SWITCHED_IN, 200, , Worker1, , ,\n\
         EVT_TASK_DELETE, 500, , Main, Worker1, ,\n",
    );
    let life = run(LifecycleTracker::new(510), s.events());
    assert_eq!(life.segments, vec![Segment::new("Worker1", 100, 500)]);
    assert_eq!(
        life.delete_edges,
        vec![DeleteEdge {
            tick: 500,
            actor: "Main".to_string(),
            target: "Worker1".to_string(),
        }]
    );
}

/// Receive logged after the switch-out cannot explain that switch-out
#[test]
fn test_classification_after_switch_out_is_not_consumed() {
    let s = stream(
        "traceTASK_SWITCHED_OUT, 10, , Worker1, , ,\n\
         EVT_QUEUE_RECEIVE, 10, , Worker1, , ,\n\
         traceTASK_SWITCHED_IN, 20, , Worker1, , ,\n",
    );
    let blocking = run(BlockingTracker::new(), s.events());
    assert!(blocking.segments.is_empty());
}

/// Send, switch out, switch back in
#[test]
fn test_queue_wait_scenario() {
    let s = stream(
        "EVT_QUEUE_SEND, 5, , Worker1, , ,\n\
         traceTASK_SWITCHED_OUT, 6, , Worker1, , ,\n\
         traceTASK_SWITCHED_IN, 15, , Worker1, , ,\n",
    );
    let blocking = run(BlockingTracker::new(), s.events());
    assert_eq!(
        blocking.segments,
        vec![Segment::classified("Worker1", 6, 15, BlockReason::Queue)]
    );
}

/// Out-of-order ticks in the file are replayed in tick order
#[test]
fn test_unsorted_file_is_reconstructed_in_tick_order() {
    let s = stream(
        "traceTASK_SWITCHED_IN, 15, , Worker1, , ,\n\
         EVT_TASK_DELAY, 5, , Worker1, , ,\n\
         traceTASK_SWITCHED_OUT, 6, , Worker1, , ,\n",
    );
    let blocking = run(BlockingTracker::new(), s.events());
    assert_eq!(
        blocking.segments,
        vec![Segment::classified("Worker1", 6, 15, BlockReason::Delay)]
    );
}

/// Mixed free-text and structured lines feed the CPU view
#[test]
fn test_cpu_view_from_mixed_formats() {
    let s = stream(
        "boot: scheduler started\n\
         traceTASK_SWITCHED_IN 10 Worker1\n\
         [tick=20] EVT_TASK_SWITCHED_OUT task=Worker1\n\
         traceTASK_SWITCHED_IN, 30, , IDLE, , ,\n",
    );
    let cpu = run(CpuTimeline::new(Bounds { xmin: 0, xmax: 40 }), s.events());
    assert_eq!(
        cpu,
        vec![
            Segment::new("IDLE", 0, 10),
            Segment::new("Worker1", 10, 20),
            Segment::new("IDLE", 20, 30),
            Segment::new("IDLE", 30, 40),
        ]
    );
}

/// The three views do not share state
#[test]
fn test_views_are_independent() {
    let s = stream(
        "EVT_TASK_CREATE, 1, , Main, Worker1, ,\n\
         EVT_TASK_DELAY, 2, , Worker1, , ,\n\
         traceTASK_SWITCHED_OUT, 3, , Worker1, , ,\n\
         traceTASK_SWITCHED_IN, 9, , Worker1, , ,\n",
    );
    let events = s.events();
    let cpu = run(CpuTimeline::new(Bounds { xmin: 0, xmax: 12 }), events);
    let life = run(LifecycleTracker::new(12), events);
    let blocking = run(BlockingTracker::new(), events);

    assert_eq!(cpu.len(), 3);
    assert_eq!(life.segments, vec![Segment::new("Worker1", 1, 12)]);
    assert_eq!(blocking.segments.len(), 1);
    // Events are read-only input; running again gives the same answer
    assert_eq!(run(BlockingTracker::new(), events), blocking);
}

#[test]
fn test_segment_duration_saturates() {
    assert_eq!(Segment::new("A", 10, 25).duration(), 15);
    assert_eq!(Segment::new("A", i64::MIN, i64::MAX).duration(), i64::MAX);
    assert_eq!(Segment::new("A", i64::MAX, i64::MIN).duration(), i64::MIN);
}
