use crate::midi::{MidiError, MidiMessage, MidiSource, Result, TimedMessage};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Replays a fixed script of messages, then reports a disconnect.
pub struct MockMidiEngine {
    queue: VecDeque<TimedMessage>,
}

impl MockMidiEngine {
    /// Each message is stamped `offset` after a common base instant.
    pub fn new(script: Vec<(Duration, MidiMessage)>) -> Self {
        let base = Instant::now();
        Self {
            queue: script
                .into_iter()
                .map(|(offset, message)| TimedMessage::new(base + offset, message))
                .collect(),
        }
    }

    /// Messages spaced `interval` apart.
    pub fn evenly_spaced(messages: Vec<MidiMessage>, interval: Duration) -> Self {
        let script = messages
            .into_iter()
            .enumerate()
            .map(|(i, message)| (interval * i as u32, message))
            .collect();
        Self::new(script)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn list_devices() -> Vec<String> {
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()]
    }
}

impl MidiSource for MockMidiEngine {
    fn recv(&mut self) -> Result<TimedMessage> {
        self.queue.pop_front().ok_or(MidiError::Disconnected)
    }
}
