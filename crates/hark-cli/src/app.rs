//! Resolution of effective run configuration from flags, settings, and env.

use std::time::Duration;

use anyhow::Result;
use hark_core::Settings;
use hark_core::settings::ENDPOINT_ENV_VAR;

use crate::args::RecordArgs;

/// Effective configuration for one record session.
pub struct SessionConfig {
    pub endpoint: String,
    pub device: Option<String>,
    pub max_secs: u64,
    pub timeout: Duration,
}

/// Merge flags over the settings file over the environment.
///
/// A missing endpoint is fatal here, before the terminal is touched, so the
/// user sees the setup hint as plain output.
pub fn resolve_session_config(args: &RecordArgs) -> Result<SessionConfig> {
    let settings = Settings::load();

    let endpoint = args
        .endpoint
        .clone()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| settings.resolve_endpoint());

    let Some(endpoint) = endpoint else {
        eprintln!("Error: No transcription endpoint configured.");
        eprintln!("\nSet the endpoint with:");
        eprintln!("  hark config --endpoint http://localhost:8765/transcribe\n");
        eprintln!("Or set the {ENDPOINT_ENV_VAR} environment variable.");
        std::process::exit(1);
    };

    Ok(SessionConfig {
        endpoint,
        device: args.device.clone().or_else(|| settings.device.clone()),
        max_secs: args.max_secs.unwrap_or(settings.max_secs),
        timeout: Duration::from_secs(args.timeout.unwrap_or(settings.timeout_secs)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings_defaults() {
        let args = RecordArgs {
            endpoint: Some("http://localhost:1234/t".into()),
            device: Some("Front Mic".into()),
            max_secs: Some(30),
            timeout: Some(10),
            output: None,
        };
        let config = resolve_session_config(&args).unwrap();
        assert_eq!(config.endpoint, "http://localhost:1234/t");
        assert_eq!(config.device.as_deref(), Some("Front Mic"));
        assert_eq!(config.max_secs, 30);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
