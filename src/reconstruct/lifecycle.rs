//! Task existence intervals

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::{Reconstructor, Segment};
use crate::event::{EventKind, NormalizedEvent, Tick};

/// "Who deleted whom" annotation for one delete event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteEdge {
    pub tick: Tick,
    /// Task that issued the delete
    pub actor: String,
    /// Task that was deleted
    pub target: String,
}

/// Lifecycle view: one segment per created task plus delete annotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lifecycle {
    pub segments: Vec<Segment>,
    pub delete_edges: Vec<DeleteEdge>,
}

/// Pairs create and delete events by the task they name (`object`).
///
/// The first create for a name wins and later duplicates are ignored; the
/// last delete wins. A task never deleted lives until `xmax`.
#[derive(Debug)]
pub struct LifecycleTracker {
    xmax: Tick,
    /// Creation order is preserved for output
    created: Vec<(String, Tick)>,
    seen: HashSet<String>,
    deleted: HashMap<String, Tick>,
    delete_edges: Vec<DeleteEdge>,
}

impl LifecycleTracker {
    pub fn new(xmax: Tick) -> Self {
        Self {
            xmax,
            created: Vec::new(),
            seen: HashSet::new(),
            deleted: HashMap::new(),
            delete_edges: Vec::new(),
        }
    }
}

impl Reconstructor for LifecycleTracker {
    type Output = Lifecycle;

    fn update(&mut self, event: &NormalizedEvent) {
        let tick = event.ordering_tick();
        match event.kind {
            EventKind::TaskCreate => {
                if self.seen.insert(event.object.clone()) {
                    self.created.push((event.object.clone(), tick));
                }
            }
            EventKind::TaskDelete => {
                self.deleted.insert(event.object.clone(), tick);
                self.delete_edges.push(DeleteEdge {
                    tick,
                    actor: event.task_id.clone(),
                    target: event.object.clone(),
                });
            }
            _ => {}
        }
    }

    fn finish(self) -> Lifecycle {
        let segments: Vec<Segment> = self
            .created
            .into_iter()
            .map(|(task, start)| {
                let end = self.deleted.get(&task).copied().unwrap_or(self.xmax);
                Segment::new(task, start, end)
            })
            .collect();

        debug!(
            tasks = segments.len(),
            deletes = self.delete_edges.len(),
            "reconstructed task lifecycles"
        );
        Lifecycle {
            segments,
            delete_edges: self.delete_edges,
        }
    }
}
