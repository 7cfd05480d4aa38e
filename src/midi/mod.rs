//! MIDI input for songposrs
//!
//! This module provides the event source side of the program, including:
//! - Typed MIDI messages and a total byte decoder
//! - Error handling for device and stream failures
//! - Real MIDI device input via midir
//! - A scripted mock source for testing
//!
//! The main components are:
//! - [`MidiSource`] trait for receiving timestamped MIDI messages
//! - [`MidirEngine`] for real MIDI device communication
//! - [`MockMidiEngine`] for testing
//!
mod engine;
mod message;
pub mod midir_engine;
pub mod mock_engine;

// Re-export main types from engine
pub use engine::{MidiError, MidiSource, Result};
pub use message::{MidiMessage, TimedMessage};

// Re-export concrete implementations
pub use midir_engine::MidirEngine;
pub use mock_engine::MockMidiEngine;

// Set default engine type
pub type DefaultMidiEngine = MidirEngine;
