//! Blocked/waiting interval inference
//!
//! A task's wait is attributed to the blocking API call it made most recently
//! before switching out. A switch-out with no pending call (preemption, plain
//! yield) is not classified and produces nothing.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

use super::{Reconstructor, Segment};
use crate::event::{EventKind, NormalizedEvent, Tick};

/// Inferred reason a task was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockReason {
    Queue,
    Delay,
}

impl BlockReason {
    /// Reason implied by an API call, if the event is a blocking-capable call
    pub fn from_event(kind: EventKind) -> Option<Self> {
        if kind.is_queue_call() {
            Some(BlockReason::Queue)
        } else if kind.is_delay_call() {
            Some(BlockReason::Delay)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockReason::Queue => "QUEUE",
            BlockReason::Delay => "DELAY",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified wait intervals in the order they closed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockingTimeline {
    pub segments: Vec<Segment>,
}

impl BlockingTimeline {
    /// Segments grouped by classification. Every reason has an entry, even
    /// when no interval was classified with it.
    pub fn into_by_classification(self) -> BTreeMap<BlockReason, Vec<Segment>> {
        let mut grouped: BTreeMap<BlockReason, Vec<Segment>> =
            [BlockReason::Queue, BlockReason::Delay]
                .into_iter()
                .map(|reason| (reason, Vec::new()))
                .collect();
        for segment in self.segments {
            if let Some(reason) = segment.classification {
                grouped.entry(reason).or_default().push(segment);
            }
        }
        grouped
    }
}

/// Per-task state machine over one global pass of the stream
#[derive(Debug, Default)]
pub struct BlockingTracker {
    /// Latest unconsumed blocking call per task
    last_blocking_api: HashMap<String, BlockReason>,
    /// Wait opened at switch-out, closed at the next switch-in
    open_block: HashMap<String, (BlockReason, Tick)>,
    segments: Vec<Segment>,
}

impl BlockingTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reconstructor for BlockingTracker {
    type Output = BlockingTimeline;

    fn update(&mut self, event: &NormalizedEvent) {
        let task = &event.task_id;
        let tick = event.ordering_tick();

        if let Some(reason) = BlockReason::from_event(event.kind) {
            // A later call silently replaces an earlier unconsumed one
            self.last_blocking_api.insert(task.clone(), reason);
            return;
        }

        match event.kind {
            EventKind::TaskSwitchedOut => {
                if let Some(reason) = self.last_blocking_api.remove(task) {
                    self.open_block.insert(task.clone(), (reason, tick));
                }
            }
            EventKind::TaskSwitchedIn => {
                if let Some((reason, start)) = self.open_block.remove(task) {
                    self.segments
                        .push(Segment::classified(task.clone(), start, tick, reason));
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> BlockingTimeline {
        debug!(
            segments = self.segments.len(),
            unclosed = self.open_block.len(),
            "reconstructed blocking intervals"
        );
        BlockingTimeline {
            segments: self.segments,
        }
    }
}
