//! Task exclusion for the reconstructed views
//!
//! Supports:
//! - names excluded from every view (e.g. a trace flush task)
//! - names excluded from one view only (e.g. `IDLE` from blocking)
//!
//! Filtering runs after reconstruction, so the CPU tiling is computed over
//! every task before excluded subjects are dropped from the report.

use std::collections::HashSet;

use crate::reconstruct::{Lifecycle, Segment};

/// Reconstructed view a filter rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Cpu,
    Lifecycle,
    Blocking,
}

/// Task filter that determines which subjects appear in each view
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    all: HashSet<String>,
    cpu: HashSet<String>,
    lifecycle: HashSet<String>,
    blocking: HashSet<String>,
}

impl TaskFilter {
    /// Create a filter that keeps every task
    pub fn none() -> Self {
        Self::default()
    }

    /// Exclude `names` from every view
    pub fn excluding<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self::none();
        filter.exclude_everywhere(names);
        filter
    }

    pub fn exclude_everywhere<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all.extend(names.into_iter().map(Into::into));
    }

    pub fn exclude_from<I, S>(&mut self, view: View, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = match view {
            View::Cpu => &mut self.cpu,
            View::Lifecycle => &mut self.lifecycle,
            View::Blocking => &mut self.blocking,
        };
        set.extend(names.into_iter().map(Into::into));
    }

    /// Check if a task should appear in a view
    pub fn should_show(&self, view: View, task: &str) -> bool {
        let per_view = match view {
            View::Cpu => &self.cpu,
            View::Lifecycle => &self.lifecycle,
            View::Blocking => &self.blocking,
        };
        !self.all.contains(task) && !per_view.contains(task)
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
            && self.cpu.is_empty()
            && self.lifecycle.is_empty()
            && self.blocking.is_empty()
    }

    /// Drop segments whose subject is excluded from `view`
    pub fn segments(&self, view: View, segments: Vec<Segment>) -> Vec<Segment> {
        segments
            .into_iter()
            .filter(|s| self.should_show(view, &s.subject))
            .collect()
    }

    /// Drop lifecycle segments and delete edges for excluded targets
    pub fn lifecycle(&self, lifecycle: Lifecycle) -> Lifecycle {
        Lifecycle {
            segments: self.segments(View::Lifecycle, lifecycle.segments),
            delete_edges: lifecycle
                .delete_edges
                .into_iter()
                .filter(|edge| self.should_show(View::Lifecycle, &edge.target))
                .collect(),
        }
    }
}
