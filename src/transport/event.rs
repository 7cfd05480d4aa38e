use crate::midi::MidiMessage;
use std::fmt;

/// The transport messages that drive a [`PositionTracker`](super::PositionTracker)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// Timing clock pulse (0xF8)
    Clock,
    Start,
    Stop,
    Continue,
    /// Song Position Pointer, absolute position in sixteenth notes
    SongPosition(u16),
}

impl TransportEvent {
    /// Selects the transport messages; everything else never reaches the tracker.
    pub fn from_midi(msg: &MidiMessage) -> Option<Self> {
        match msg {
            MidiMessage::Clock => Some(TransportEvent::Clock),
            MidiMessage::Start => Some(TransportEvent::Start),
            MidiMessage::Stop => Some(TransportEvent::Stop),
            MidiMessage::Continue => Some(TransportEvent::Continue),
            MidiMessage::SongPosition(target) => Some(TransportEvent::SongPosition(*target)),
            _ => None,
        }
    }
}

impl fmt::Display for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportEvent::Clock => write!(f, "Clock"),
            TransportEvent::Start => write!(f, "Start"),
            TransportEvent::Stop => write!(f, "Stop"),
            TransportEvent::Continue => write!(f, "Continue"),
            TransportEvent::SongPosition(target) => write!(f, "SPP {}", target),
        }
    }
}
