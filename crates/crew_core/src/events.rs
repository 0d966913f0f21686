use chrono::{DateTime, NaiveDateTime};

use crate::WireEvent;

const CLOCK_FORMAT: &str = "%H:%M:%S";

/// A status update received from the backend for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    timestamp: Option<NaiveDateTime>,
    message: String,
}

impl Event {
    pub fn new(timestamp: Option<NaiveDateTime>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Converts a wire event, keeping the message even when the timestamp
    /// cannot be parsed.
    pub fn from_wire(event: &WireEvent) -> Self {
        Self::new(
            event.timestamp.as_deref().and_then(parse_timestamp),
            event.data.clone(),
        )
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `HH:MM:SS`, or `--:--:--` when the backend sent no usable timestamp.
    pub fn clock_label(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format(CLOCK_FORMAT).to_string(),
            None => "--:--:--".to_string(),
        }
    }
}

/// Accepts both naive ISO-8601 (`2024-05-01T12:00:00.123456`) and RFC 3339
/// with an offset; the offset's wall-clock time is kept.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Append-only, arrival-ordered log of events for one job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventLog {
    entries: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the tail of `incoming` that the log has not seen yet.
    ///
    /// The backend resends its whole list on every poll. A list shorter than
    /// the log never removes entries. Returns the number of events appended.
    pub fn sync_from(&mut self, incoming: &[WireEvent]) -> usize {
        let known = self.entries.len();
        let Some(fresh) = incoming.get(known..) else {
            return 0;
        };
        self.entries.extend(fresh.iter().map(Event::from_wire));
        fresh.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Event] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Event> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(timestamp: Option<&str>, data: &str) -> WireEvent {
        WireEvent {
            timestamp: timestamp.map(str::to_string),
            data: data.to_string(),
        }
    }

    #[test]
    fn parses_python_and_rfc3339_timestamps() {
        let naive = Event::from_wire(&wire(Some("2024-05-01T09:08:07.123456"), "a"));
        assert_eq!(naive.clock_label(), "09:08:07");

        let offset = Event::from_wire(&wire(Some("2024-05-01T23:59:01+02:00"), "b"));
        assert_eq!(offset.clock_label(), "23:59:01");

        let broken = Event::from_wire(&wire(Some("yesterday"), "c"));
        assert_eq!(broken.timestamp(), None);
        assert_eq!(broken.clock_label(), "--:--:--");
        assert_eq!(broken.message(), "c");
    }

    #[test]
    fn sync_appends_only_unseen_tail() {
        let mut log = EventLog::new();
        let first = vec![wire(None, "one")];
        let second = vec![wire(None, "one"), wire(None, "two"), wire(None, "three")];

        assert_eq!(log.sync_from(&first), 1);
        assert_eq!(log.sync_from(&second), 2);
        assert_eq!(log.sync_from(&second), 0);

        let messages: Vec<_> = log.iter().map(Event::message).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }

    #[test]
    fn shorter_incoming_list_never_truncates() {
        let mut log = EventLog::new();
        log.sync_from(&[wire(None, "one")]);
        log.sync_from(&[wire(None, "one"), wire(None, "two")]);
        assert_eq!(log.sync_from(&[]), 0);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(Event::message), Some("two"));
    }
}
