use super::TimedMessage;
use std::error::Error;
use std::fmt;

/// Custom error type for MIDI input operations
#[derive(Debug)]
pub enum MidiError {
    /// Error when opening or connecting to a MIDI device
    ConnectionError(String),
    /// No input port matched the requested device
    DeviceNotFound(String),
    /// The input stream was closed
    Disconnected,
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::ConnectionError(msg) => write!(f, "MIDI connection error: {}", msg),
            MidiError::DeviceNotFound(msg) => write!(f, "MIDI device not found: {}", msg),
            MidiError::Disconnected => write!(f, "MIDI input disconnected"),
        }
    }
}

impl Error for MidiError {}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl<T> From<midir::ConnectError<T>> for MidiError {
    fn from(e: midir::ConnectError<T>) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl From<midir::PortInfoError> for MidiError {
    fn from(e: midir::PortInfoError) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl From<crossbeam::channel::RecvError> for MidiError {
    fn from(_: crossbeam::channel::RecvError) -> Self {
        MidiError::Disconnected
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// A stream of decoded MIDI messages, delivered in wire order
pub trait MidiSource: Send {
    /// Blocks until the next message arrives.
    ///
    /// Returns [`MidiError::Disconnected`] once the stream is closed.
    fn recv(&mut self) -> Result<TimedMessage>;
}
