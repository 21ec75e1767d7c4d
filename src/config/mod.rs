//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{DEFAULT_FRAME_MS, DEFAULT_MEDIA_ROOT, MAX_FRAME_MS, MIN_FRAME_MS};

/// CLI options for the SonicTerm presentation.
#[derive(Debug, Parser, Clone)]
#[command(about = "SonicTerm: ten terms for a sonic archive", author, version)]
pub struct AppConfig {
    /// Directory that the audio/ and gifs/ paths resolve against
    #[arg(
        long = "media-root",
        env = "SONICTERM_MEDIA_ROOT",
        default_value = DEFAULT_MEDIA_ROOT
    )]
    pub media_root: PathBuf,

    /// Preferred audio output device name
    #[arg(long = "output-device", env = "SONICTERM_OUTPUT_DEVICE")]
    pub output_device: Option<String>,

    /// Print detected audio output devices and exit
    #[arg(long = "list-output-devices", default_value_t = false)]
    pub list_output_devices: bool,

    /// Print the term catalog as JSON and exit
    #[arg(long = "list-terms", default_value_t = false)]
    pub list_terms: bool,

    /// Print environment diagnostics and exit
    #[arg(long = "doctor", default_value_t = false)]
    pub doctor: bool,

    /// Do not open an audio device; hovering stays silent
    #[arg(long = "mute", env = "SONICTERM_MUTE", default_value_t = false)]
    pub mute: bool,

    /// Skip GIF decoding and draw every circle as a flat fill
    #[arg(long = "no-visuals", default_value_t = false)]
    pub no_visuals: bool,

    /// Redraw interval while animating (milliseconds)
    #[arg(long = "frame-ms", default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "SONICTERM_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "SONICTERM_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging panic payloads and other content (debug log only)
    #[arg(
        long = "log-content",
        env = "SONICTERM_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}
