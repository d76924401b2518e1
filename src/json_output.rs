//! JSON output format for trace reports

use serde::Serialize;

use crate::report::TraceReport;

/// Complete JSON document for one analyzed trace
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// Path of the analyzed trace, as given on the command line
    pub trace: &'a str,
    #[serde(flatten)]
    pub report: &'a TraceReport,
}

impl<'a> JsonOutput<'a> {
    pub fn new(trace: &'a str, report: &'a TraceReport) -> Self {
        Self { trace, report }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
