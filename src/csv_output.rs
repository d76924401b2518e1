//! CSV output for the normalized event table
//!
//! Fixed columns `eventtype,tick,timestamp,taskid,object,value,src`, plus an
//! optional `raw_line` column for debugging the parser.

use crate::event::NormalizedEvent;

const COLUMNS: [&str; 7] = [
    "eventtype",
    "tick",
    "timestamp",
    "taskid",
    "object",
    "value",
    "src",
];

/// CSV formatter for normalized events
#[derive(Debug)]
pub struct CsvOutput<'a> {
    events: Vec<&'a NormalizedEvent>,
    include_raw_line: bool,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter
    pub fn new(include_raw_line: bool) -> Self {
        Self {
            events: Vec::new(),
            include_raw_line,
        }
    }

    /// Add an event to the output
    pub fn add_event(&mut self, event: &'a NormalizedEvent) {
        self.events.push(event);
    }

    /// Generate CSV header row based on enabled flags
    fn header(&self) -> String {
        let mut headers = COLUMNS.to_vec();
        if self.include_raw_line {
            headers.push("raw_line");
        }
        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format an event as CSV row; an absent tick is an empty field
    fn format_event(&self, event: &NormalizedEvent) -> String {
        let mut fields = vec![
            event.kind.canonical_name().to_string(),
            event.tick.map(|t| t.to_string()).unwrap_or_default(),
            Self::escape_field(&event.timestamp),
            Self::escape_field(&event.task_id),
            Self::escape_field(&event.object),
            Self::escape_field(&event.value),
            Self::escape_field(&event.src),
        ];

        if self.include_raw_line {
            fields.push(Self::escape_field(&event.raw_line));
        }

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for event in &self.events {
            output.push_str(&self.format_event(event));
            output.push('\n');
        }

        output
    }
}

impl<'a> FromIterator<&'a NormalizedEvent> for CsvOutput<'a> {
    fn from_iter<I: IntoIterator<Item = &'a NormalizedEvent>>(iter: I) -> Self {
        let mut output = Self::new(false);
        output.events.extend(iter);
        output
    }
}
