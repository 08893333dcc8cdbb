//! List audio input devices.

use anyhow::Result;
use hark_core::list_input_devices;

pub fn run() -> Result<()> {
    let devices = list_input_devices()?;

    println!("Audio input devices:");
    for device in &devices {
        let marker = if device.is_default { "*" } else { " " };
        println!("  {marker} {}", device.name);
    }
    println!();
    println!("* = system default. Pick one with: hark --device <NAME>");
    println!("or make it stick with: hark config --device <NAME>");

    Ok(())
}
