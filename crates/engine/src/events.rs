use std::collections::VecDeque;

/// One recorded engine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    /// 1-based index of the event-handling turn that produced the event.
    pub turn: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Bounded in-memory event log for traceability.
///
/// The oldest events are dropped once the capacity is reached, so a
/// long-running session can't grow without bound.
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<EngineEvent>,
    max_len: usize,
}

impl EventLog {
    pub fn new(max_len: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_len: max_len.max(1),
        }
    }

    pub fn record(&mut self, turn: u64, kind: &'static str, message: impl Into<String>) {
        if self.events.len() == self.max_len {
            self.events.pop_front();
        }
        self.events.push_back(EngineEvent {
            turn,
            kind,
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventLog;

    #[test]
    fn records_with_turn_index() {
        let mut log = EventLog::new(8);
        log.record(3, "select", "building 42");
        assert_eq!(log.len(), 1);
        let event = log.iter().next().unwrap();
        assert_eq!(event.turn, 3);
        assert_eq!(event.kind, "select");
    }

    #[test]
    fn oldest_events_fall_off_at_capacity() {
        let mut log = EventLog::new(2);
        log.record(1, "a", "");
        log.record(2, "b", "");
        log.record(3, "c", "");

        let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["b", "c"]);
    }

    #[test]
    fn drain_empties_the_log() {
        let mut log = EventLog::new(4);
        log.record(1, "a", "");
        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }
}
