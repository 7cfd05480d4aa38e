// monitor.rs

use crate::midi::{MidiMessage, TimedMessage};
use crate::transport::{BoundaryObserver, Position, PositionTracker, TransportEvent};
use log::{debug, trace};
use std::time::Instant;

const SUSTAIN_PEDAL: u8 = 64;
const ALL_NOTES_OFF: u8 = 123;

/// Logs grid crossings and keeps a running count of them.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    sixteenths: u64,
    bars: u64,
}

impl LoggingObserver {
    pub fn sixteenths_seen(&self) -> u64 {
        self.sixteenths
    }

    pub fn bars_seen(&self) -> u64 {
        self.bars
    }
}

impl BoundaryObserver for LoggingObserver {
    fn on_sixteenth(&mut self) {
        self.sixteenths += 1;
        trace!("Sixteenth boundary #{}", self.sixteenths);
    }

    fn on_bar(&mut self) {
        self.bars += 1;
        debug!("Bar boundary #{}", self.bars);
    }
}

/// Turns incoming MIDI into human-readable lines stamped with the tracked song position.
///
/// Transport messages drive the [`PositionTracker`]; note and controller messages only
/// update the held-note and controller tables.
pub struct MidiMonitor<O = LoggingObserver> {
    tracker: PositionTracker<O>,
    keys: [[u8; 128]; 16],
    ccs: [[u8; 128]; 16],
    started_at: Instant,
    show_clock: bool,
}

impl MidiMonitor<LoggingObserver> {
    pub fn new(show_clock: bool) -> Self {
        Self::with_tracker(PositionTracker::with_observer(LoggingObserver::default()), show_clock)
    }
}

impl<O: BoundaryObserver> MidiMonitor<O> {
    pub fn with_tracker(tracker: PositionTracker<O>, show_clock: bool) -> Self {
        Self {
            tracker,
            keys: [[0; 128]; 16],
            ccs: [[0; 128]; 16],
            started_at: Instant::now(),
            show_clock,
        }
    }

    /// Processes one message and returns the line to print, if any.
    pub fn handle(&mut self, timed: &TimedMessage) -> Option<String> {
        let at = timed.received_at;

        if let Some(event) = TransportEvent::from_midi(&timed.message) {
            return self.handle_transport(event, at);
        }

        match timed.message {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity: 0,
            } => {
                let note_off = MidiMessage::NoteOff {
                    channel,
                    note,
                    velocity: 0,
                };
                self.set_velocity(channel, note, 0);
                Some(self.stamp("", &note_off, at))
            }
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => {
                self.set_velocity(channel, note, velocity);
                Some(self.stamp("", &timed.message, at))
            }
            MidiMessage::NoteOff { channel, note, .. } => {
                self.set_velocity(channel, note, 0);
                Some(self.stamp("", &timed.message, at))
            }
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => {
                self.ccs[usize::from(channel & 0x0F)][usize::from(controller & 0x7F)] = value;
                let label = match controller {
                    SUSTAIN_PEDAL if value >= 64 => "Pedal Down - ",
                    SUSTAIN_PEDAL => "Pedal Up - ",
                    ALL_NOTES_OFF => "All Notes Off - ",
                    _ => "",
                };
                Some(self.stamp(label, &timed.message, at))
            }
            MidiMessage::PitchBend { .. } | MidiMessage::ProgramChange { .. } => {
                Some(self.stamp("", &timed.message, at))
            }
            _ => {
                debug!("Ignoring MIDI message: {}", timed.message);
                None
            }
        }
    }

    fn handle_transport(&mut self, event: TransportEvent, at: Instant) -> Option<String> {
        if event == TransportEvent::Start {
            self.started_at = at;
        }
        self.tracker.handle_at(event, at);

        if event == TransportEvent::Clock && !self.show_clock {
            return None;
        }
        Some(self.stamp("", &event, at))
    }

    fn set_velocity(&mut self, channel: u8, note: u8, velocity: u8) {
        self.keys[usize::from(channel & 0x0F)][usize::from(note & 0x7F)] = velocity;
    }

    fn stamp(&self, label: &str, what: &dyn std::fmt::Display, at: Instant) -> String {
        format!(
            "{}{} - {} ({:.3?})",
            label,
            what,
            self.tracker.position(),
            at.saturating_duration_since(self.started_at)
        )
    }

    pub fn position(&self) -> Position {
        self.tracker.position()
    }

    /// Velocity of a held note, 0 when released
    pub fn velocity(&self, channel: u8, note: u8) -> u8 {
        self.keys[usize::from(channel & 0x0F)][usize::from(note & 0x7F)]
    }

    pub fn cc_value(&self, channel: u8, controller: u8) -> u8 {
        self.ccs[usize::from(channel & 0x0F)][usize::from(controller & 0x7F)]
    }

    pub fn tracker(&self) -> &PositionTracker<O> {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, millis: u64, message: MidiMessage) -> TimedMessage {
        TimedMessage::new(base + Duration::from_millis(millis), message)
    }

    #[test]
    fn test_pedal_labels() {
        let mut monitor = MidiMonitor::new(false);
        let base = Instant::now();
        let down = monitor
            .handle(&at(
                base,
                0,
                MidiMessage::ControlChange {
                    channel: 0,
                    controller: 64,
                    value: 127,
                },
            ))
            .unwrap();
        assert!(down.starts_with("Pedal Down - CC ch=1 num=64 val=127 - 0.0"));

        let up = monitor
            .handle(&at(
                base,
                1,
                MidiMessage::ControlChange {
                    channel: 0,
                    controller: 64,
                    value: 0,
                },
            ))
            .unwrap();
        assert!(up.starts_with("Pedal Up - "));
        assert_eq!(monitor.cc_value(0, 64), 0);
    }

    #[test]
    fn test_all_notes_off_label() {
        let mut monitor = MidiMonitor::new(false);
        let line = monitor
            .handle(&TimedMessage::now(MidiMessage::ControlChange {
                channel: 2,
                controller: 123,
                value: 0,
            }))
            .unwrap();
        assert!(line.starts_with("All Notes Off - CC ch=3 num=123"));
    }

    #[test]
    fn test_note_on_with_zero_velocity_is_note_off() {
        let mut monitor = MidiMonitor::new(false);
        let base = Instant::now();
        monitor.handle(&at(
            base,
            0,
            MidiMessage::NoteOn {
                channel: 1,
                note: 60,
                velocity: 90,
            },
        ));
        assert_eq!(monitor.velocity(1, 60), 90);

        let line = monitor
            .handle(&at(
                base,
                5,
                MidiMessage::NoteOn {
                    channel: 1,
                    note: 60,
                    velocity: 0,
                },
            ))
            .unwrap();
        assert!(line.starts_with("NoteOff ch=2 note=60 vel=0"));
        assert_eq!(monitor.velocity(1, 60), 0);
    }

    #[test]
    fn test_clock_lines_hidden_by_default() {
        let mut monitor = MidiMonitor::new(false);
        assert!(monitor.handle(&TimedMessage::now(MidiMessage::Start)).is_some());
        assert!(monitor.handle(&TimedMessage::now(MidiMessage::Clock)).is_none());

        let mut verbose = MidiMonitor::new(true);
        verbose.handle(&TimedMessage::now(MidiMessage::Start));
        assert!(verbose.handle(&TimedMessage::now(MidiMessage::Clock)).is_some());
    }

    #[test]
    fn test_other_messages_produce_no_line() {
        let mut monitor = MidiMonitor::new(false);
        assert!(monitor
            .handle(&TimedMessage::now(MidiMessage::Other(vec![0xFE])))
            .is_none());
    }
}
