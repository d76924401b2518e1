//! Tolerant trace line normalizer
//!
//! Turns one raw log line into at most one [`NormalizedEvent`]. Two shapes are
//! understood:
//!
//! - 7-field pseudo-CSV: `eventtype, tick, timestamp, taskid, object, value, src`
//! - free text carrying an event keyword, optional `key=value` / `key:value`
//!   pairs and/or a bracketed tick
//!
//! Extraction is an ordered chain of strategies; the first one that yields an
//! event wins. Missing ticks and task ids fall back to best-effort heuristics
//! tuned to the log formats seen in practice (event keyword, then tick, then
//! task name). Those heuristics are intentionally loose and must stay that way
//! for output compatibility with existing traces.
//!
//! # Example
//!
//! ```
//! use tickscope::event::{EventKind, RawLine};
//! use tickscope::normalize::normalize;
//!
//! let event = normalize(RawLine::new(1, "traceTASK_SWITCHED_IN 12345 IDLE")).unwrap();
//! assert_eq!(event.kind, EventKind::TaskSwitchedIn);
//! assert_eq!(event.tick, Some(12345));
//! assert_eq!(event.task_id, "IDLE");
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::event::{EventKind, NormalizedEvent, RawLine, Tick, RAW_SPELLINGS};

/// Keys whose value is taken as the task id, in priority order
const TASK_ID_KEYS: [&str; 3] = ["taskid", "task", "task_name"];

struct Patterns {
    structured: Regex,
    keyword: Regex,
    key_value: Regex,
    bracket_tick: Regex,
    first_int: Regex,
    token: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        structured: Regex::new(
            r"^\s*([^,]+),\s*([^,]+),\s*([^,]*),\s*([^,]*),\s*([^,]*),\s*([^,]*),\s*(.*?)\s*$",
        )
        .expect("valid structured line regex"),
        keyword: Regex::new(&keyword_pattern()).expect("valid event keyword regex"),
        key_value: Regex::new(r"\b([a-zA-Z_]+)\s*[:=]\s*([^\s,\]\[]+)")
            .expect("valid key/value regex"),
        bracket_tick: Regex::new(r"\[?\s*tick[:=]?\s*([0-9]+)\s*\]?|\[\s*([0-9]+)\s*\]")
            .expect("valid bracketed tick regex"),
        first_int: Regex::new(r"\b([0-9]{1,10})\b").expect("valid integer regex"),
        token: Regex::new(r"\b[A-Za-z0-9_]+\b").expect("valid token regex"),
    })
}

/// Alternation of every raw spelling as a standalone word. The switch pair
/// is matched case-insensitively, everything else exactly.
fn keyword_pattern() -> String {
    let exact: Vec<String> = RAW_SPELLINGS
        .iter()
        .filter(|(_, kind)| !kind.is_switch())
        .map(|(spelling, _)| regex::escape(spelling))
        .collect();
    let switch: Vec<String> = RAW_SPELLINGS
        .iter()
        .filter(|(_, kind)| kind.is_switch())
        .map(|(spelling, _)| regex::escape(spelling))
        .collect();
    format!(r"\b(?:{}|(?i:{}))\b", exact.join("|"), switch.join("|"))
}

/// Normalize one trace line.
///
/// Returns `None` for blank lines and for any line that names no recognized
/// event. Pure: the same line always yields the same result.
pub fn normalize(line: RawLine<'_>) -> Option<NormalizedEvent> {
    structured(line).or_else(|| free_text(line))
}

/// First recognized event keyword in the line, as written
fn find_keyword(text: &str) -> Option<(&str, EventKind)> {
    patterns()
        .keyword
        .find_iter(text)
        .find_map(|m| EventKind::from_keyword(m.as_str()).map(|kind| (m.as_str(), kind)))
}

/// `key=value` / `key:value` pairs anywhere in the line, keys lower-cased.
/// A repeated key keeps its last value.
fn scratch_map(text: &str) -> HashMap<String, String> {
    patterns()
        .key_value
        .captures_iter(text)
        .map(|caps| (caps[1].to_ascii_lowercase(), caps[2].to_string()))
        .collect()
}

/// Positional fields of a 7-field pseudo-CSV line, untrimmed
struct StructuredFields<'a> {
    eventtype: &'a str,
    tick: &'a str,
    timestamp: &'a str,
    task_id: &'a str,
    object: &'a str,
    value: &'a str,
    src: &'a str,
}

impl<'a> StructuredFields<'a> {
    fn split(text: &'a str) -> Option<Self> {
        let caps = patterns().structured.captures(text)?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        Some(Self {
            eventtype: field(1),
            tick: field(2),
            timestamp: field(3),
            task_id: field(4),
            object: field(5),
            value: field(6),
            src: field(7),
        })
    }
}

/// Strategy 1: positional 7-field layout
fn structured(line: RawLine<'_>) -> Option<NormalizedEvent> {
    let fields = StructuredFields::split(line.text)?;
    let kind = EventKind::from_raw(fields.eventtype.trim())
        .or_else(|| find_keyword(line.text).map(|(_, kind)| kind))?;

    let kv = scratch_map(line.text);
    let tick = match fields.tick.trim() {
        "" => best_effort_tick(line.text, &kv),
        explicit => explicit.to_string(),
    };
    let task_id = match fields.task_id.trim() {
        "" => best_effort_task_id(line.text, &kv),
        explicit => explicit.to_string(),
    };

    Some(NormalizedEvent {
        kind,
        tick: coerce_tick(&tick),
        timestamp: fields.timestamp.trim().to_string(),
        task_id: task_id.trim().to_string(),
        object: fields.object.trim().to_string(),
        value: fields.value.trim().to_string(),
        src: fields.src.trim().to_string(),
        source_ordinal: line.ordinal,
        raw_line: line.text.trim().to_string(),
    })
}

/// Strategy 2: keyword anywhere in free text
fn free_text(line: RawLine<'_>) -> Option<NormalizedEvent> {
    let (_, kind) = find_keyword(line.text)?;

    let kv = scratch_map(line.text);
    let field = |key: &str| kv.get(key).map_or("", |v| v.trim()).to_string();

    Some(NormalizedEvent {
        kind,
        tick: coerce_tick(&best_effort_tick(line.text, &kv)),
        timestamp: field("timestamp"),
        task_id: best_effort_task_id(line.text, &kv).trim().to_string(),
        object: field("object"),
        value: field("value"),
        src: field("src"),
        source_ordinal: line.ordinal,
        raw_line: line.text.trim().to_string(),
    })
}

/// Tick from, in order: an all-digit `tick` pair, a bracketed tick, the
/// first run of 1-10 digits. Empty when none apply.
fn best_effort_tick(text: &str, kv: &HashMap<String, String>) -> String {
    if let Some(tick) = kv.get("tick") {
        if !tick.is_empty() && tick.bytes().all(|b| b.is_ascii_digit()) {
            return tick.clone();
        }
    }

    let p = patterns();
    if let Some(caps) = p.bracket_tick.captures(text) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            return m.as_str().to_string();
        }
    }

    p.first_int
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Task id from a task key, or else the last non-numeric token in the line.
///
/// The event keyword is skipped only when it is the first remaining token.
fn best_effort_task_id(text: &str, kv: &HashMap<String, String>) -> String {
    if let Some(task) = TASK_ID_KEYS.iter().find_map(|key| kv.get(*key)) {
        return task.clone();
    }

    let mut tokens: Vec<&str> = patterns()
        .token
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| !t.bytes().all(|b| b.is_ascii_digit()))
        .collect();

    if let Some((keyword, _)) = find_keyword(text) {
        if tokens.first() == Some(&keyword) {
            tokens.remove(0);
        }
    }

    tokens.last().map(|t| t.to_string()).unwrap_or_default()
}

/// Integer tick, or `None` for empty/non-numeric text. Never defaults to 0.
fn coerce_tick(raw: &str) -> Option<Tick> {
    raw.trim().parse::<Tick>().ok()
}
