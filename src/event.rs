//! Canonical trace event model
//!
//! Every recognized log line becomes one [`NormalizedEvent`]. The set of event
//! kinds is closed: lines naming anything else are never turned into events.

use serde::Serialize;
use std::fmt;

/// Scheduler tick count
pub type Tick = i64;

/// One input line with its 1-based position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub ordinal: usize,
    pub text: &'a str,
}

impl<'a> RawLine<'a> {
    pub fn new(ordinal: usize, text: &'a str) -> Self {
        Self { ordinal, text }
    }
}

/// Kind of scheduler event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EventKind {
    #[serde(rename = "EVT_QUEUE_SEND")]
    QueueSend,
    #[serde(rename = "EVT_QUEUE_SEND_FAILED")]
    QueueSendFailed,
    #[serde(rename = "EVT_QUEUE_SEND_FROM_ISR")]
    QueueSendFromIsr,
    #[serde(rename = "EVT_QUEUE_SEND_FROM_ISR_FAILED")]
    QueueSendFromIsrFailed,
    #[serde(rename = "EVT_QUEUE_RECEIVE")]
    QueueReceive,
    #[serde(rename = "EVT_QUEUE_RECEIVE_FAILED")]
    QueueReceiveFailed,
    #[serde(rename = "EVT_QUEUE_RECEIVE_FROM_ISR")]
    QueueReceiveFromIsr,
    #[serde(rename = "EVT_QUEUE_RECEIVE_FROM_ISR_FAILED")]
    QueueReceiveFromIsrFailed,
    #[serde(rename = "EVT_TASK_INCREMENT_TICK")]
    TaskIncrementTick,
    #[serde(rename = "EVT_TASK_CREATE")]
    TaskCreate,
    #[serde(rename = "EVT_TASK_CREATE_FAILED")]
    TaskCreateFailed,
    #[serde(rename = "EVT_TASK_DELETE")]
    TaskDelete,
    #[serde(rename = "EVT_TASK_DELAY")]
    TaskDelay,
    #[serde(rename = "EVT_TASK_DELAY_UNTIL")]
    TaskDelayUntil,
    #[serde(rename = "traceTASK_SWITCHED_IN")]
    TaskSwitchedIn,
    #[serde(rename = "traceTASK_SWITCHED_OUT")]
    TaskSwitchedOut,
}

/// Raw spellings accepted in trace files, paired with the kind they map to.
///
/// The switch pair has two spellings each; every other kind has one.
pub const RAW_SPELLINGS: &[(&str, EventKind)] = &[
    ("EVT_QUEUE_SEND", EventKind::QueueSend),
    ("EVT_QUEUE_SEND_FAILED", EventKind::QueueSendFailed),
    ("EVT_QUEUE_SEND_FROM_ISR", EventKind::QueueSendFromIsr),
    ("EVT_QUEUE_SEND_FROM_ISR_FAILED", EventKind::QueueSendFromIsrFailed),
    ("EVT_QUEUE_RECEIVE", EventKind::QueueReceive),
    ("EVT_QUEUE_RECEIVE_FAILED", EventKind::QueueReceiveFailed),
    ("EVT_QUEUE_RECEIVE_FROM_ISR", EventKind::QueueReceiveFromIsr),
    (
        "EVT_QUEUE_RECEIVE_FROM_ISR_FAILED",
        EventKind::QueueReceiveFromIsrFailed,
    ),
    ("EVT_TASK_INCREMENT_TICK", EventKind::TaskIncrementTick),
    ("EVT_TASK_CREATE", EventKind::TaskCreate),
    ("EVT_TASK_CREATE_FAILED", EventKind::TaskCreateFailed),
    ("EVT_TASK_DELETE", EventKind::TaskDelete),
    ("EVT_TASK_DELAY", EventKind::TaskDelay),
    ("EVT_TASK_DELAY_UNTIL", EventKind::TaskDelayUntil),
    ("EVT_TASK_SWITCHED_IN", EventKind::TaskSwitchedIn),
    ("EVT_TASK_SWITCHED_OUT", EventKind::TaskSwitchedOut),
    ("traceTASK_SWITCHED_IN", EventKind::TaskSwitchedIn),
    ("traceTASK_SWITCHED_OUT", EventKind::TaskSwitchedOut),
];

impl EventKind {
    /// Look up an exact raw spelling
    pub fn from_raw(raw: &str) -> Option<Self> {
        RAW_SPELLINGS
            .iter()
            .find(|(spelling, _)| *spelling == raw)
            .map(|(_, kind)| *kind)
    }

    /// Look up a keyword found in free text.
    ///
    /// Same as [`EventKind::from_raw`], except that the switch pair also
    /// matches regardless of case.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::from_raw(keyword).or_else(|| {
            RAW_SPELLINGS
                .iter()
                .filter(|(_, kind)| kind.is_switch())
                .find(|(spelling, _)| spelling.eq_ignore_ascii_case(keyword))
                .map(|(_, kind)| *kind)
        })
    }

    /// Spelling written to the normalized event table
    pub fn canonical_name(self) -> &'static str {
        match self {
            EventKind::QueueSend => "EVT_QUEUE_SEND",
            EventKind::QueueSendFailed => "EVT_QUEUE_SEND_FAILED",
            EventKind::QueueSendFromIsr => "EVT_QUEUE_SEND_FROM_ISR",
            EventKind::QueueSendFromIsrFailed => "EVT_QUEUE_SEND_FROM_ISR_FAILED",
            EventKind::QueueReceive => "EVT_QUEUE_RECEIVE",
            EventKind::QueueReceiveFailed => "EVT_QUEUE_RECEIVE_FAILED",
            EventKind::QueueReceiveFromIsr => "EVT_QUEUE_RECEIVE_FROM_ISR",
            EventKind::QueueReceiveFromIsrFailed => "EVT_QUEUE_RECEIVE_FROM_ISR_FAILED",
            EventKind::TaskIncrementTick => "EVT_TASK_INCREMENT_TICK",
            EventKind::TaskCreate => "EVT_TASK_CREATE",
            EventKind::TaskCreateFailed => "EVT_TASK_CREATE_FAILED",
            EventKind::TaskDelete => "EVT_TASK_DELETE",
            EventKind::TaskDelay => "EVT_TASK_DELAY",
            EventKind::TaskDelayUntil => "EVT_TASK_DELAY_UNTIL",
            EventKind::TaskSwitchedIn => "traceTASK_SWITCHED_IN",
            EventKind::TaskSwitchedOut => "traceTASK_SWITCHED_OUT",
        }
    }

    pub fn is_switch(self) -> bool {
        matches!(self, EventKind::TaskSwitchedIn | EventKind::TaskSwitchedOut)
    }

    /// Queue API calls, including the failed and ISR variants
    pub fn is_queue_call(self) -> bool {
        matches!(
            self,
            EventKind::QueueSend
                | EventKind::QueueSendFailed
                | EventKind::QueueSendFromIsr
                | EventKind::QueueSendFromIsrFailed
                | EventKind::QueueReceive
                | EventKind::QueueReceiveFailed
                | EventKind::QueueReceiveFromIsr
                | EventKind::QueueReceiveFromIsrFailed
        )
    }

    pub fn is_delay_call(self) -> bool {
        matches!(self, EventKind::TaskDelay | EventKind::TaskDelayUntil)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A canonical event extracted from one trace line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEvent {
    #[serde(rename = "eventtype")]
    pub kind: EventKind,
    /// `None` when no heuristic could recover a numeric tick
    pub tick: Option<Tick>,
    pub timestamp: String,
    /// Task that raised the event
    #[serde(rename = "taskid")]
    pub task_id: String,
    /// For create/delete, the task being created or deleted
    pub object: String,
    pub value: String,
    pub src: String,
    /// 1-based line number in the source file
    pub source_ordinal: usize,
    pub raw_line: String,
}

impl NormalizedEvent {
    /// Tick used for ordering and reconstruction; an absent tick sorts as 0
    pub fn ordering_tick(&self) -> Tick {
        self.tick.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_raw_spelling() {
        let kinds: std::collections::BTreeSet<_> =
            RAW_SPELLINGS.iter().map(|(_, kind)| *kind).collect();
        assert_eq!(kinds.len(), 16);
    }

    #[test]
    fn test_canonical_name_round_trips_through_from_raw() {
        for (_, kind) in RAW_SPELLINGS {
            assert_eq!(EventKind::from_raw(kind.canonical_name()), Some(*kind));
        }
    }

    #[test]
    fn test_both_switch_spellings_map_to_same_kind() {
        assert_eq!(
            EventKind::from_raw("EVT_TASK_SWITCHED_IN"),
            EventKind::from_raw("traceTASK_SWITCHED_IN")
        );
        assert_eq!(
            EventKind::from_raw("EVT_TASK_SWITCHED_OUT"),
            Some(EventKind::TaskSwitchedOut)
        );
    }

    #[test]
    fn test_from_raw_is_case_sensitive() {
        assert_eq!(EventKind::from_raw("evt_task_create"), None);
        assert_eq!(EventKind::from_raw("TRACETASK_SWITCHED_IN"), None);
    }

    #[test]
    fn test_from_keyword_ignores_case_for_switch_pair_only() {
        assert_eq!(
            EventKind::from_keyword("TRACETASK_SWITCHED_IN"),
            Some(EventKind::TaskSwitchedIn)
        );
        assert_eq!(
            EventKind::from_keyword("evt_task_switched_out"),
            Some(EventKind::TaskSwitchedOut)
        );
        assert_eq!(EventKind::from_keyword("evt_task_delay"), None);
    }

    #[test]
    fn test_classification_helpers() {
        assert!(EventKind::QueueReceiveFromIsrFailed.is_queue_call());
        assert!(EventKind::QueueSendFailed.is_queue_call());
        assert!(!EventKind::TaskDelay.is_queue_call());
        assert!(EventKind::TaskDelayUntil.is_delay_call());
        assert!(!EventKind::TaskCreate.is_switch());
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(
            EventKind::TaskSwitchedIn.to_string(),
            "traceTASK_SWITCHED_IN"
        );
        assert_eq!(EventKind::TaskDelete.to_string(), "EVT_TASK_DELETE");
    }

    #[test]
    fn test_absent_tick_orders_as_zero() {
        let event = NormalizedEvent {
            kind: EventKind::TaskDelay,
            tick: None,
            timestamp: String::new(),
            task_id: "Worker1".to_string(),
            object: String::new(),
            value: String::new(),
            src: String::new(),
            source_ordinal: 3,
            raw_line: "EVT_TASK_DELAY Worker1".to_string(),
        };
        assert_eq!(event.ordering_tick(), 0);
        assert_eq!(event.tick, None);
    }
}
