use super::{TransportEvent, LOOP_GAP_THRESHOLD, SIXTEENTHS_PER_BAR, TICKS_PER_SIXTEENTH};
use log::{debug, trace};
use std::fmt;
use std::time::Instant;

/// Hooks fired when the tracked position crosses the sixteenth-note grid.
///
/// Both hooks run synchronously inside [`PositionTracker::handle`] and default to no-ops.
pub trait BoundaryObserver {
    /// Called once per completed sixteenth note.
    fn on_sixteenth(&mut self) {}

    /// Called once per 16 completed sixteenths, right after `on_sixteenth`.
    fn on_bar(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BoundaryObserver for NoopObserver {}

/// Read-only snapshot of the tracked position
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub sixteenths: u64,
    pub tick: u8,
    pub playing: bool,
}

impl Position {
    /// Zero-based bar on the fixed 16-sixteenth grid
    pub fn bar(&self) -> u64 {
        self.sixteenths / SIXTEENTHS_PER_BAR
    }

    pub fn sixteenth_in_bar(&self) -> u64 {
        self.sixteenths % SIXTEENTHS_PER_BAR
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sixteenths, self.tick)
    }
}

/// Follows an external MIDI transport and estimates the song position.
///
/// MIDI clock carries no phase information, so the tracker has to infer it:
///
/// - Every Start/Continue is followed by a priming pulse that does not advance the song.
///   While `is_ticking` is false the next pulse is absorbed instead of counted.
/// - When a host loops it sends Stop, jumps back without a pulse and sends Continue within
///   a millisecond. In that case the priming pulse was already consumed by the stream
///   before the Stop, so the next pulse has to count. A longer gap is a genuine pause.
/// - Song Position Pointer only has sixteenth-note resolution. When the host seeks or pauses
///   anywhere other than an exact sixteenth, the position is an estimate.
///
/// Start deliberately leaves `is_ticking` alone, so a Start that arrives while already
/// ticking counts the very next pulse.
#[derive(Debug, Default)]
pub struct PositionTracker<O = NoopObserver> {
    is_playing: bool,
    is_ticking: bool,
    sixteenths_elapsed: u64,
    tick_phase: u8,
    last_stop: Option<Instant>,
    observer: O,
}

impl PositionTracker<NoopObserver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: BoundaryObserver> PositionTracker<O> {
    pub fn with_observer(observer: O) -> Self {
        Self {
            is_playing: false,
            is_ticking: false,
            sixteenths_elapsed: 0,
            tick_phase: 0,
            last_stop: None,
            observer,
        }
    }

    /// Applies one transport event received now.
    pub fn handle(&mut self, event: TransportEvent) {
        self.handle_at(event, Instant::now());
    }

    /// Applies one transport event received at `now`.
    ///
    /// Events must be applied in arrival order.
    pub fn handle_at(&mut self, event: TransportEvent, now: Instant) {
        match event {
            TransportEvent::Clock => self.handle_clock(),
            TransportEvent::SongPosition(target) => self.handle_song_position(target),
            TransportEvent::Start => self.handle_start(),
            TransportEvent::Continue => self.handle_continue(now),
            TransportEvent::Stop => self.handle_stop(now),
        }
    }

    fn handle_clock(&mut self) {
        if !self.is_playing {
            return;
        }

        if !self.is_ticking {
            trace!("Priming pulse absorbed");
            self.is_ticking = true;
            return;
        }

        self.tick_phase = (self.tick_phase + 1) % TICKS_PER_SIXTEENTH;
        if self.tick_phase == 0 {
            self.sixteenths_elapsed += 1;
            self.observer.on_sixteenth();

            if self.sixteenths_elapsed % SIXTEENTHS_PER_BAR == 0 {
                self.observer.on_bar();
            }
        }
    }

    fn handle_song_position(&mut self, target: u16) {
        debug!(
            "Song position pointer: {} -> {}",
            self.sixteenths_elapsed, target
        );
        self.tick_phase = 0;
        self.sixteenths_elapsed = u64::from(target);
    }

    fn handle_start(&mut self) {
        debug!("Transport started (ticking={})", self.is_ticking);
        self.sixteenths_elapsed = 0;
        self.tick_phase = 0;
        self.is_playing = true;
    }

    fn handle_continue(&mut self, now: Instant) {
        self.is_playing = true;

        let paused = match self.last_stop {
            Some(stopped_at) => now.saturating_duration_since(stopped_at) > LOOP_GAP_THRESHOLD,
            None => true,
        };

        if paused {
            self.is_ticking = false;
            debug!("Transport resumed, waiting for priming pulse");
        } else {
            debug!("Transport looped, next pulse counts");
        }
    }

    fn handle_stop(&mut self, now: Instant) {
        self.last_stop = Some(now);
        self.is_playing = false;
        debug!("Transport stopped at {}", self.position());
    }

    pub fn position(&self) -> Position {
        Position {
            sixteenths: self.sixteenths_elapsed,
            tick: self.tick_phase,
            playing: self.is_playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_ticking(&self) -> bool {
        self.is_ticking
    }

    pub fn sixteenths_elapsed(&self) -> u64 {
        self.sixteenths_elapsed
    }

    pub fn tick_phase(&self) -> u8 {
        self.tick_phase
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
