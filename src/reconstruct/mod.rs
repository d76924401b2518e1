//! Timeline reconstruction from an ordered event stream
//!
//! Three independent single-pass reconstructors:
//! - [`CpuTimeline`]: which task held the CPU over time
//! - [`LifecycleTracker`]: when each task was created and deleted
//! - [`BlockingTracker`]: when each task waited, and on what
//!
//! Each owns its running state and is consumed by [`Reconstructor::finish`],
//! so independent traces can be processed concurrently without interference.
//! None of them mutate the events they are fed.

mod blocking;
mod cpu;
mod lifecycle;

pub use blocking::{BlockReason, BlockingTimeline, BlockingTracker};
pub use cpu::{CpuTimeline, IDLE_TASK};
pub use lifecycle::{DeleteEdge, Lifecycle, LifecycleTracker};

use serde::Serialize;

use crate::event::{NormalizedEvent, Tick};

/// A span of ticks attributed to one task.
///
/// `end` may equal or even precede `start`; zero-length spans are real data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub subject: String,
    pub start: Tick,
    pub end: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<BlockReason>,
}

impl Segment {
    pub fn new(subject: impl Into<String>, start: Tick, end: Tick) -> Self {
        Self {
            subject: subject.into(),
            start,
            end,
            classification: None,
        }
    }

    pub fn classified(subject: impl Into<String>, start: Tick, end: Tick, reason: BlockReason) -> Self {
        Self {
            classification: Some(reason),
            ..Self::new(subject, start, end)
        }
    }

    pub fn duration(&self) -> Tick {
        self.end.saturating_sub(self.start)
    }
}

/// Tick range the views are reconstructed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub xmin: Tick,
    pub xmax: Tick,
}

/// Single-pass consumer of stream-ordered events
pub trait Reconstructor {
    type Output;

    /// Feed the next event in stream order
    fn update(&mut self, event: &NormalizedEvent);

    /// Close any open state and return the reconstructed view
    fn finish(self) -> Self::Output;
}

/// Feed every event to `reconstructor` and finish it
pub fn run<R: Reconstructor>(mut reconstructor: R, events: &[NormalizedEvent]) -> R::Output {
    for event in events {
        reconstructor.update(event);
    }
    reconstructor.finish()
}

#[cfg(test)]
mod tests;
