//! Event stream construction
//!
//! Reads a trace, normalizes every line in file order and sorts the surviving
//! events by tick. The sort is stable so events sharing a tick keep their file
//! order, which the reconstructors rely on.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{Result, TraceError};
use crate::event::{EventKind, NormalizedEvent, RawLine, Tick};
use crate::normalize::normalize;

/// Raw trace text, decoded leniently
#[derive(Debug, Clone)]
pub struct TraceSource {
    text: String,
}

impl TraceSource {
    /// Read a trace file. Invalid UTF-8 is replaced rather than rejected.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| TraceError::from_open(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "read trace file");
        Ok(Self {
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Lines numbered from 1
    pub fn lines(&self) -> impl Iterator<Item = RawLine<'_>> {
        self.text
            .lines()
            .enumerate()
            .map(|(i, text)| RawLine::new(i + 1, text))
    }
}

/// Normalized events in stream order (tick ascending, file order within a tick)
#[derive(Debug, Clone, Default)]
pub struct EventStream {
    events: Vec<NormalizedEvent>,
}

impl EventStream {
    /// Normalize `lines` and order the resulting events
    pub fn build<'a>(lines: impl IntoIterator<Item = RawLine<'a>>) -> Self {
        let mut seen = 0usize;
        let mut events = Vec::new();

        for line in lines {
            seen += 1;
            match normalize(line) {
                Some(event) => events.push(event),
                None => trace!(ordinal = line.ordinal, "dropped unrecognized line"),
            }
        }

        // Stable: equal ticks stay in file order
        events.sort_by_key(NormalizedEvent::ordering_tick);

        debug!(
            lines = seen,
            events = events.len(),
            dropped = seen - events.len(),
            "built event stream"
        );
        Self { events }
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in their original file order
    pub fn in_file_order(&self) -> Vec<&NormalizedEvent> {
        let mut ordered: Vec<&NormalizedEvent> = self.events.iter().collect();
        ordered.sort_by_key(|e| e.source_ordinal);
        ordered
    }

    /// Smallest and largest ordering tick, `None` for an empty stream
    pub fn tick_range(&self) -> Option<(Tick, Tick)> {
        // Sorted by ordering tick, so the ends are the extremes
        let first = self.events.first()?.ordering_tick();
        let last = self.events.last()?.ordering_tick();
        Some((first, last))
    }

    /// Number of events per kind
    pub fn kind_counts(&self) -> BTreeMap<EventKind, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }
}
