//! Operator log sink
//!
//! Collects runner log lines and console notices in exactly the order they
//! are handed over. Nothing is buffered, reordered or de-duplicated; the log
//! only shrinks when the operator clears it.

use ferry_core::domain::log::{LogEntry, LogOrigin, Severity};

/// Marker rules for runner lines, first match wins
const SEVERITY_RULES: &[(&str, Severity)] = &[
    ("❌", Severity::Error),
    ("[FAIL]", Severity::Error),
    ("Error", Severity::Error),
    ("⚠", Severity::Warning),
    ("[WARNING]", Severity::Warning),
    ("✅", Severity::Success),
    ("[SUCCESS]", Severity::Success),
    ("➡", Severity::Info),
    ("🚀", Severity::Info),
];

const SYSTEM_PREFIX: &str = "[SYSTEM] ";

/// Severity of a runner line, read from its markers
pub fn classify(text: &str) -> Severity {
    SEVERITY_RULES
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Neutral)
}

/// Removes pictographs and decorative symbols from a runner line
pub fn strip_decorations(text: &str) -> String {
    text.chars().filter(|c| !is_decoration(*c)).collect()
}

fn is_decoration(c: char) -> bool {
    matches!(c as u32, 0x1F300..=0x1FAFF | 0x2000..=0x2BFF)
}

/// Append-only operator log
#[derive(Debug, Default)]
pub struct LogSink {
    entries: Vec<LogEntry>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one runner line
    ///
    /// Absent or empty input (line terminators aside) appends nothing.
    /// Severity is read from the original text, before decorations are
    /// stripped.
    pub fn ingest<'a>(&mut self, raw: impl Into<Option<&'a str>>) -> Option<&LogEntry> {
        let raw = raw.into()?.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            return None;
        }

        let severity = classify(raw);
        Some(self.push(severity, LogOrigin::Stream, strip_decorations(raw)))
    }

    /// Appends a console-originated line with a caller-chosen severity
    pub fn system_notice(&mut self, text: &str, severity: Severity) -> &LogEntry {
        self.push(
            severity,
            LogOrigin::System,
            format!("{}{}", SYSTEM_PREFIX, text),
        )
    }

    /// Drops every entry, returning how many were discarded
    pub fn clear(&mut self) -> usize {
        let discarded = self.entries.len();
        self.entries.clear();
        discarded
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, severity: Severity, origin: LogOrigin, text: String) -> &LogEntry {
        self.entries.push(LogEntry {
            timestamp: chrono::Utc::now(),
            severity,
            origin,
            text,
        });
        &self.entries[self.entries.len() - 1]
    }
}
