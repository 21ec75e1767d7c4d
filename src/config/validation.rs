use super::defaults::{MAX_DEVICE_NAME_BYTES, MAX_FRAME_MS, MIN_FRAME_MS};
use super::AppConfig;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::time::Duration;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_FRAME_MS..=MAX_FRAME_MS).contains(&self.frame_ms) {
            bail!(
                "--frame-ms must be between {MIN_FRAME_MS} and {MAX_FRAME_MS}, got {}",
                self.frame_ms
            );
        }

        if !self.media_root.is_dir() {
            bail!(
                "--media-root '{}' is not a directory",
                self.media_root.display()
            );
        }
        self.media_root = self.media_root.canonicalize().with_context(|| {
            format!(
                "failed to canonicalize media root '{}'",
                self.media_root.display()
            )
        })?;

        if let Some(device) = &self.output_device {
            if device.trim().is_empty() {
                bail!("--output-device must not be empty");
            }
            if device.len() > MAX_DEVICE_NAME_BYTES || device.chars().any(char::is_control) {
                bail!(
                    "--output-device must be <={MAX_DEVICE_NAME_BYTES} bytes with no control characters"
                );
            }
        }

        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }
}
