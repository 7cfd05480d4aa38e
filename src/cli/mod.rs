use clap::Parser;
use dialoguer::Select;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input device to listen on, by index or by (partial) name
    #[arg(long)]
    pub device: Option<String>,

    /// List available MIDI input devices
    #[arg(long)]
    pub device_list: bool,

    /// Print a line for every MIDI clock pulse
    #[arg(long)]
    pub show_clock: bool,

    /// Show a live position display
    #[arg(long)]
    pub display: bool,

    /// File log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Settings file to read
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Resolves a device selector to an input port index.
///
/// Without a selector the first port is used. A numeric selector is tried as an index
/// before being matched against port names.
pub fn select_port(selector: Option<&str>, devices: &[String]) -> Result<usize, String> {
    if devices.is_empty() {
        return Err("Error: No MIDI input devices available".to_string());
    }

    let selector = match selector {
        Some(selector) => selector,
        None => return Ok(0),
    };

    if let Ok(index) = selector.parse::<usize>() {
        if index < devices.len() {
            return Ok(index);
        }
    }

    if let Some(index) = devices.iter().position(|d| d.contains(selector)) {
        return Ok(index);
    }

    let mut error_msg = format!(
        "Error: Device '{}' not found in available devices:\n",
        selector
    );
    for (index, device) in devices.iter().enumerate() {
        error_msg.push_str(&format!("  {} - {}\n", index, device));
    }
    Err(error_msg)
}

/// Asks the user to pick an input port. Returns `None` if the prompt was dismissed.
pub fn prompt_for_port(devices: &[String]) -> Option<usize> {
    match Select::new()
        .with_prompt("Select a MIDI input")
        .items(devices)
        .default(0)
        .interact_opt()
    {
        Ok(choice) => choice,
        Err(e) => {
            log::error!("Device prompt failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<String> {
        vec![
            "Midi Through Port-0".to_string(),
            "Reaper MIDI Out".to_string(),
        ]
    }

    #[test]
    fn test_default_is_first_port() {
        assert_eq!(select_port(None, &devices()), Ok(0));
    }

    #[test]
    fn test_select_by_index_and_name() {
        assert_eq!(select_port(Some("1"), &devices()), Ok(1));
        assert_eq!(select_port(Some("Reaper"), &devices()), Ok(1));
    }

    #[test]
    fn test_unknown_device_lists_choices() {
        let err = select_port(Some("Nonexistent"), &devices()).unwrap_err();
        assert!(err.contains("'Nonexistent' not found"));
        assert!(err.contains("  1 - Reaper MIDI Out"));
    }

    #[test]
    fn test_out_of_range_index_is_not_a_match() {
        assert!(select_port(Some("7"), &devices()).is_err());
    }

    #[test]
    fn test_no_devices() {
        assert!(select_port(None, &[]).is_err());
    }
}
