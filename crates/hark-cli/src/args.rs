//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hark", version)]
#[command(about = "Record your voice, watch the waveform, get a transcript")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Flags for the default record screen
    #[command(flatten)]
    pub record: RecordArgs,

    /// Enable verbose debug output on stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List audio input devices
    Devices,

    /// Show or update configuration
    Config(ConfigArgs),
}

#[derive(Args, Default)]
pub struct RecordArgs {
    /// Microphone device name (default: configured or system default)
    #[arg(long)]
    pub device: Option<String>,

    /// Transcription endpoint URL for this run
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Also save each recording as a WAV file at this path
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum recording length in seconds for this run (0 = unlimited)
    #[arg(long)]
    pub max_secs: Option<u64>,

    /// Upload timeout in seconds for this run
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Set the transcription endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Set the default microphone device
    #[arg(long)]
    pub device: Option<String>,

    /// Clear the configured device (back to system default)
    #[arg(long)]
    pub clear_device: bool,

    /// Set the recording length cap in seconds (0 = unlimited)
    #[arg(long)]
    pub max_secs: Option<u64>,

    /// Set the upload timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ConfigArgs {
    /// True when no mutating flag was given, i.e. the user wants to see the
    /// current configuration.
    pub fn is_show(&self) -> bool {
        self.endpoint.is_none()
            && self.device.is_none()
            && !self.clear_device
            && self.max_secs.is_none()
            && self.timeout.is_none()
    }
}
