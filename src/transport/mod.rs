//! Transport position tracking
//!
//! This module follows an external MIDI transport and estimates the song position, including:
//! - Sixteenth notes elapsed since the last Start or Song Position Pointer
//! - Sub-sixteenth tick phase
//! - Play state and priming-pulse handling around Start/Stop/Continue
//!
//! The transport system uses the MIDI standard of 24 PPQN (Pulses Per Quarter Note)
//! for timing resolution, which gives 6 pulses per sixteenth note.

mod event;
mod tracker;

use std::time::Duration;

pub use event::TransportEvent;
pub use tracker::{BoundaryObserver, NoopObserver, Position, PositionTracker};

// MIDI standard timing resolution
/// Clock pulses per quarter note (24 PPQN); a beat is always a quarter note here.
pub const TICKS_PER_BEAT: u32 = 24;
pub const TICKS_PER_SIXTEENTH: u8 = (TICKS_PER_BEAT / 4) as u8;
pub const SIXTEENTHS_PER_BAR: u64 = 16;

/// A Continue arriving no later than this after a Stop is treated as a loop-back.
pub const LOOP_GAP_THRESHOLD: Duration = Duration::from_millis(1);
