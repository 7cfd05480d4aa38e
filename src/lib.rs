pub mod cli;
pub mod config;
pub mod event_loop;
pub mod logging;
pub mod midi;
pub mod monitor;
pub mod transport;
pub mod ui;

use std::sync::{Arc, Mutex};

pub use cli::{select_port, Args};
pub use event_loop::{EventLoop, LineSink, StdoutSink};
pub use monitor::{LoggingObserver, MidiMonitor};
pub use transport::{Position, PositionTracker, TransportEvent};

/// A tracker behind the one lock that serialises events arriving from other threads
pub type SharedTracker<O = transport::NoopObserver> = Arc<Mutex<PositionTracker<O>>>;

pub fn create_shared_tracker() -> SharedTracker {
    Arc::new(Mutex::new(PositionTracker::new()))
}
