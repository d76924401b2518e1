//! CPU occupancy timeline

use tracing::debug;

use super::{Bounds, Reconstructor, Segment};
use crate::event::{EventKind, NormalizedEvent, Tick};

/// Task name used whenever no task holds the CPU
pub const IDLE_TASK: &str = "IDLE";

/// Turns switch-in/switch-out events into back-to-back occupancy segments.
///
/// The emitted segments tile `[xmin, xmax]`: the first starts at `xmin`, the
/// last ends at `xmax`, and each one starts where the previous ended. Unmatched
/// switches only add short or zero-length segments.
#[derive(Debug)]
pub struct CpuTimeline {
    current: String,
    segment_start: Tick,
    xmax: Tick,
    segments: Vec<Segment>,
}

impl CpuTimeline {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            current: IDLE_TASK.to_string(),
            segment_start: bounds.xmin,
            xmax: bounds.xmax,
            segments: Vec::new(),
        }
    }

    fn switch_to(&mut self, task: &str, tick: Tick) {
        let previous = std::mem::replace(&mut self.current, task.to_string());
        self.segments
            .push(Segment::new(previous, self.segment_start, tick));
        self.segment_start = tick;
    }
}

impl Reconstructor for CpuTimeline {
    type Output = Vec<Segment>;

    fn update(&mut self, event: &NormalizedEvent) {
        let tick = event.ordering_tick();
        match event.kind {
            EventKind::TaskSwitchedIn => self.switch_to(&event.task_id, tick),
            EventKind::TaskSwitchedOut => self.switch_to(IDLE_TASK, tick),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        let xmax = self.xmax;
        self.switch_to(IDLE_TASK, xmax);
        debug!(segments = self.segments.len(), "reconstructed CPU timeline");
        self.segments
    }
}
