use crate::midi::{MidiError, MidiMessage, MidiSource, Result, TimedMessage};
use crossbeam::channel::{unbounded, Receiver};
use log::{debug, info};
use midir::{Ignore, MidiInput, MidiInputConnection};
use std::time::Instant;

/// Reads MIDI from a hardware or virtual input port.
///
/// Decoding happens on midir's callback thread; messages are stamped there and queued so
/// the consumer sees them in wire order with their true arrival time.
pub struct MidirEngine {
    _connection: MidiInputConnection<()>,
    rx: Receiver<TimedMessage>,
    port_name: String,
}

impl MidirEngine {
    /// Connects to the input port at `port_index`, as listed by [`MidirEngine::list_devices`].
    pub fn connect(port_index: usize) -> Result<Self> {
        let mut midi_in = MidiInput::new("songposrs-in")?;
        // Clock and the other real-time messages must not be filtered
        midi_in.ignore(Ignore::None);

        let in_ports = midi_in.ports();
        let in_port = in_ports.get(port_index).ok_or_else(|| {
            MidiError::DeviceNotFound(format!(
                "no input port {} ({} available)",
                port_index,
                in_ports.len()
            ))
        })?;
        let port_name = midi_in.port_name(in_port)?;
        info!("Connecting to MIDI input {} - {}", port_index, port_name);

        let (tx, rx) = unbounded();
        let connection = midi_in.connect(
            in_port,
            "songposrs-input",
            move |_stamp, bytes, _| {
                let message = MidiMessage::parse(bytes);
                // Only fails once the engine is dropped
                let _ = tx.send(TimedMessage::new(Instant::now(), message));
            },
            (),
        )?;

        Ok(MidirEngine {
            _connection: connection,
            rx,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Lists input port names in port-index order.
    pub fn list_devices() -> Vec<String> {
        let mut devices = Vec::new();

        match MidiInput::new("songposrs-list") {
            Ok(midi_in) => {
                for port in midi_in.ports() {
                    match midi_in.port_name(&port) {
                        Ok(name) => devices.push(name),
                        Err(e) => debug!("Skipping unnamed input port: {}", e),
                    }
                }
            }
            Err(e) => debug!("Unable to enumerate MIDI inputs: {}", e),
        }

        devices
    }
}

impl MidiSource for MidirEngine {
    fn recv(&mut self) -> Result<TimedMessage> {
        Ok(self.rx.recv()?)
    }
}
