// event_loop.rs

use crate::midi::{MidiError, MidiSource, Result};
use crate::monitor::MidiMonitor;
use crate::transport::{BoundaryObserver, Position};
use log::{debug, error, info};

/// Destination for monitor lines and position updates
pub trait LineSink {
    fn emit(&mut self, line: &str);

    /// Called after every processed message with the current position.
    fn position_changed(&mut self, _position: Position) {}
}

/// Prints monitor lines to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{}", line);
    }
}

impl LineSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Single consumer of a MIDI stream: every message is applied in arrival order.
pub struct EventLoop<S, O, W> {
    source: S,
    monitor: MidiMonitor<O>,
    sink: W,
}

impl<S, O, W> EventLoop<S, O, W>
where
    S: MidiSource,
    O: BoundaryObserver,
    W: LineSink,
{
    pub fn new(source: S, monitor: MidiMonitor<O>, sink: W) -> Self {
        EventLoop {
            source,
            monitor,
            sink,
        }
    }

    /// Runs until the source disconnects and returns the number of messages processed.
    pub fn run(&mut self) -> Result<u64> {
        let mut processed = 0;
        loop {
            // Block until a message is received.
            match self.source.recv() {
                Ok(timed) => {
                    if let Some(line) = self.monitor.handle(&timed) {
                        self.sink.emit(&line);
                    }
                    self.sink.position_changed(self.monitor.position());
                    processed += 1;
                }
                Err(MidiError::Disconnected) => {
                    info!("MIDI input closed after {} messages", processed);
                    return Ok(processed);
                }
                Err(e) => {
                    error!("MIDI input error: {}", e);
                    return Err(e);
                }
            }

            if processed % 1000 == 0 {
                debug!(
                    "Processed {} messages, position {}",
                    processed,
                    self.monitor.position()
                );
            }
        }
    }

    pub fn monitor(&self) -> &MidiMonitor<O> {
        &self.monitor
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_parts(self) -> (S, MidiMonitor<O>, W) {
        (self.source, self.monitor, self.sink)
    }
}
