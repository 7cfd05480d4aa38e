use std::fmt;
use std::time::Instant;

/// Represents a decoded MIDI message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note On message with note number and velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off message with note number and velocity
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Control Change message with controller number and value
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    /// Program Change message with program number
    ProgramChange { channel: u8, program: u8 },
    /// Pitch wheel, 14 bits with 8192 at centre
    PitchBend { channel: u8, value: u16 },
    /// Song Position Pointer, in sixteenth notes
    SongPosition(u16),
    /// MIDI Clock timing message
    Clock,
    /// MIDI Start message
    Start,
    /// MIDI Continue message
    Continue,
    /// MIDI Stop message
    Stop,
    /// Anything not decoded above, kept as raw bytes
    Other(Vec<u8>),
}

impl MidiMessage {
    /// Decodes one complete MIDI message. Never fails: short or unknown input becomes `Other`.
    pub fn parse(data: &[u8]) -> MidiMessage {
        let status = match data.first() {
            Some(&status) => status,
            None => return MidiMessage::Other(Vec::new()),
        };

        match status {
            0xF8 => return MidiMessage::Clock,
            0xFA => return MidiMessage::Start,
            0xFB => return MidiMessage::Continue,
            0xFC => return MidiMessage::Stop,
            0xF2 if data.len() >= 3 => {
                return MidiMessage::SongPosition(fourteen_bit(data[1], data[2]));
            }
            _ => {}
        }

        let channel = status & 0x0F;
        match status & 0xF0 {
            0x90 if data.len() >= 3 => MidiMessage::NoteOn {
                channel,
                note: data[1] & 0x7F,
                velocity: data[2] & 0x7F,
            },
            0x80 if data.len() >= 3 => MidiMessage::NoteOff {
                channel,
                note: data[1] & 0x7F,
                velocity: data[2] & 0x7F,
            },
            0xB0 if data.len() >= 3 => MidiMessage::ControlChange {
                channel,
                controller: data[1] & 0x7F,
                value: data[2] & 0x7F,
            },
            0xC0 if data.len() >= 2 => MidiMessage::ProgramChange {
                channel,
                program: data[1] & 0x7F,
            },
            0xE0 if data.len() >= 3 => MidiMessage::PitchBend {
                channel,
                value: fourteen_bit(data[1], data[2]),
            },
            _ => MidiMessage::Other(data.to_vec()),
        }
    }
}

fn fourteen_bit(lsb: u8, msb: u8) -> u16 {
    u16::from(lsb & 0x7F) | (u16::from(msb & 0x7F) << 7)
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => write!(f, "NoteOn ch={} note={} vel={}", channel + 1, note, velocity),
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => write!(f, "NoteOff ch={} note={} vel={}", channel + 1, note, velocity),
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => write!(f, "CC ch={} num={} val={}", channel + 1, controller, value),
            MidiMessage::ProgramChange { channel, program } => {
                write!(f, "ProgramChange ch={} program={}", channel + 1, program)
            }
            MidiMessage::PitchBend { channel, value } => {
                write!(f, "PitchWheel ch={} val={}", channel + 1, value)
            }
            MidiMessage::SongPosition(target) => write!(f, "SPP {}", target),
            MidiMessage::Clock => write!(f, "Clock"),
            MidiMessage::Start => write!(f, "Start"),
            MidiMessage::Continue => write!(f, "Continue"),
            MidiMessage::Stop => write!(f, "Stop"),
            MidiMessage::Other(bytes) => write!(f, "Other {:02X?}", bytes),
        }
    }
}

/// A decoded message stamped with the instant it arrived from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedMessage {
    pub received_at: Instant,
    pub message: MidiMessage,
}

impl TimedMessage {
    pub fn new(received_at: Instant, message: MidiMessage) -> Self {
        Self {
            received_at,
            message,
        }
    }

    pub fn now(message: MidiMessage) -> Self {
        Self::new(Instant::now(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_position_is_fourteen_bits() {
        assert_eq!(
            MidiMessage::parse(&[0xF2, 0x28, 0x00]),
            MidiMessage::SongPosition(40)
        );
        assert_eq!(
            MidiMessage::parse(&[0xF2, 0x7F, 0x7F]),
            MidiMessage::SongPosition(16383)
        );
        assert_eq!(
            MidiMessage::parse(&[0xF2, 0x00, 0x01]),
            MidiMessage::SongPosition(128)
        );
    }

    #[test]
    fn test_truncated_song_position_is_other() {
        assert_eq!(
            MidiMessage::parse(&[0xF2, 0x28]),
            MidiMessage::Other(vec![0xF2, 0x28])
        );
    }

    #[test]
    fn test_pitch_bend_centre() {
        assert_eq!(
            MidiMessage::parse(&[0xE3, 0x00, 0x40]),
            MidiMessage::PitchBend {
                channel: 3,
                value: 8192
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(MidiMessage::parse(&[]), MidiMessage::Other(vec![]));
    }

    #[test]
    fn test_display_uses_one_based_channels() {
        let msg = MidiMessage::ControlChange {
            channel: 0,
            controller: 64,
            value: 127,
        };
        assert_eq!(msg.to_string(), "CC ch=1 num=64 val=127");
        assert_eq!(MidiMessage::SongPosition(40).to_string(), "SPP 40");
        assert_eq!(MidiMessage::Other(vec![0xFE]).to_string(), "Other [FE]");
    }
}
