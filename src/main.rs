use chrono::Local;
use clap::Parser;
use songposrs::{
    cli::{prompt_for_port, select_port, Args},
    config::Config,
    logging,
    midi::{DefaultMidiEngine, MidiSource},
    ui::PositionDisplay,
    EventLoop, LineSink, MidiMonitor, StdoutSink,
};
use std::io::IsTerminal;

fn main() {
    let args = parse_command_line_arguments();
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => exit_with_error(format!("Error loading configuration: {}", e)),
    };
    initialize_logging(&config);

    let devices = get_available_devices();
    list_available_devices(&devices);
    if config.list_devices {
        return;
    }

    let port_index = choose_input_port(&config, &devices);
    let engine = match DefaultMidiEngine::connect(port_index) {
        Ok(engine) => engine,
        Err(e) => exit_with_error(format!("Error connecting to MIDI device: {}", e)),
    };

    log::info!(
        "Listening for MIDI on {} - {}",
        port_index,
        engine.port_name()
    );
    println!(
        "Listening for MIDI on {} - {} (since {})\n",
        port_index,
        engine.port_name(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("Press Ctrl+C to exit...");

    let monitor = MidiMonitor::new(config.show_clock);
    if config.display {
        run_application_loop(engine, monitor, PositionDisplay::new());
    } else {
        run_application_loop(engine, monitor, StdoutSink);
    }
}

fn parse_command_line_arguments() -> Args {
    Args::parse()
}

fn initialize_logging(config: &Config) {
    match logging::init_logger(config.log_level) {
        Ok(path) => log::info!("Application starting, logging to {}", path.display()),
        Err(e) => eprintln!("Warning: file logging disabled: {}", e),
    }
}

fn get_available_devices() -> Vec<String> {
    DefaultMidiEngine::list_devices()
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI input devices:");
    for (index, device) in devices.iter().enumerate() {
        println!("  {} - {}", index, device);
    }
    println!();
}

fn choose_input_port(config: &Config, devices: &[String]) -> usize {
    if config.device.is_none() && devices.len() > 1 && std::io::stdin().is_terminal() {
        if let Some(index) = prompt_for_port(devices) {
            return index;
        }
    }

    if config.device.is_none() && !devices.is_empty() {
        println!("No device specified. Using the default device");
    }

    match select_port(config.device.as_deref(), devices) {
        Ok(index) => index,
        Err(error_msg) => exit_with_error(error_msg),
    }
}

fn run_application_loop<S: MidiSource, W: LineSink>(source: S, monitor: MidiMonitor, sink: W) {
    let mut event_loop = EventLoop::new(source, monitor, sink);
    match event_loop.run() {
        Ok(processed) => log::info!("Application stopping after {} messages", processed),
        Err(e) => exit_with_error(format!("Error reading MIDI input: {}", e)),
    }
}

fn exit_with_error(error_msg: String) -> ! {
    log::error!("{}", error_msg);
    eprintln!("{}", error_msg);
    std::process::exit(1);
}
