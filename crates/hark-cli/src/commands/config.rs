//! Show or update persistent settings.

use anyhow::Result;
use hark_core::settings::ENDPOINT_ENV_VAR;
use hark_core::{Settings, validate_endpoint};

use crate::args::ConfigArgs;

pub fn run(args: ConfigArgs) -> Result<()> {
    let mut settings = Settings::load();

    if args.is_show() {
        show(&settings);
        return Ok(());
    }

    if let Some(endpoint) = args.endpoint {
        // Reject obviously broken URLs now instead of at upload time.
        let endpoint = validate_endpoint(&endpoint)?;
        settings.endpoint = Some(endpoint);
    }
    if args.clear_device {
        settings.device = None;
    }
    if let Some(device) = args.device {
        settings.device = Some(device);
    }
    if let Some(max_secs) = args.max_secs {
        settings.max_secs = max_secs;
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }

    settings.save()?;
    println!("Settings saved.");
    Ok(())
}

fn show(settings: &Settings) {
    println!("Current configuration:");
    match &settings.endpoint {
        Some(endpoint) => println!("  endpoint: {endpoint}"),
        None => match std::env::var(ENDPOINT_ENV_VAR) {
            Ok(url) if !url.trim().is_empty() => {
                println!("  endpoint: {url} (from {ENDPOINT_ENV_VAR})");
            }
            _ => println!("  endpoint: (not set)"),
        },
    }
    match &settings.device {
        Some(device) => println!("  device:   {device}"),
        None => println!("  device:   (system default)"),
    }
    if settings.max_secs == 0 {
        println!("  max-secs: unlimited");
    } else {
        println!("  max-secs: {}", settings.max_secs);
    }
    println!("  timeout:  {}s", settings.timeout_secs);

    if let Some(path) = Settings::path() {
        println!();
        println!("Settings file: {}", path.display());
    }
}
