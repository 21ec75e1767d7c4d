//! `--doctor` output: terminal capabilities, resolved config, media files
//! and audio output devices.

use crate::audio::Mixer;
use crate::catalog::{catalog, TermRecord};
use crate::config::AppConfig;
use crate::{crash_log_path, log_file_path};
use crossterm::terminal::size as terminal_size;
use std::{env, fmt::Display, path::Path};

pub struct DoctorReport {
    lines: Vec<String>,
}

impl DoctorReport {
    pub fn new(title: &str) -> Self {
        Self {
            lines: vec![title.to_string()],
        }
    }

    pub fn section(&mut self, title: &str) {
        self.lines.push(String::new());
        self.lines.push(format!("{title}:"));
    }

    pub fn push_kv(&mut self, key: &str, value: impl Display) {
        self.lines.push(format!("  {key}: {value}"));
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Whether a term's audio and GIF files exist under `media_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaStatus {
    pub number: u8,
    pub audio: bool,
    pub gif: bool,
}

pub fn media_status(records: &[TermRecord], media_root: &Path) -> Vec<MediaStatus> {
    records
        .iter()
        .map(|record| MediaStatus {
            number: record.number,
            audio: record.audio_path(media_root).is_file(),
            gif: record.gif_path(media_root).is_file(),
        })
        .collect()
}

fn found(present: bool) -> &'static str {
    if present {
        "ok"
    } else {
        "missing"
    }
}

pub fn doctor_report(config: &AppConfig) -> DoctorReport {
    let mut report = DoctorReport::new("SonicTerm Doctor");
    report.push_kv("version", env!("CARGO_PKG_VERSION"));
    report.push_kv("os", format!("{}/{}", env::consts::OS, env::consts::ARCH));

    let mut resolved = config.clone();
    let validation = resolved.validate();
    if validation.is_err() {
        resolved = config.clone();
    }

    report.section("Terminal");
    match terminal_size() {
        Ok((cols, rows)) => report.push_kv("size", format!("{cols}x{rows}")),
        Err(err) => report.push_kv("size", format!("error: {err}")),
    }
    if let Ok(term) = env::var("TERM") {
        report.push_kv("term", term);
    }
    report.push_kv("color_mode", detect_color_mode());
    report.push_kv("unicode", detect_unicode_support());

    report.section("Config");
    match &validation {
        Ok(()) => report.push_kv("validation", "ok"),
        Err(err) => report.push_kv("validation", format!("error: {err}")),
    }
    report.push_kv("media_root", resolved.media_root.display());
    report.push_kv("frame_ms", resolved.frame_ms);
    report.push_kv("visuals", if resolved.no_visuals { "off" } else { "on" });
    report.push_kv(
        "logs",
        if resolved.logging_enabled() {
            "enabled"
        } else {
            "disabled"
        },
    );
    report.push_kv("log_file", log_file_path().display());
    report.push_kv("crash_log", crash_log_path().display());

    report.section("Media");
    let statuses = media_status(catalog(), &resolved.media_root);
    let complete = statuses.iter().filter(|s| s.audio && s.gif).count();
    report.push_kv("complete", format!("{complete}/{}", statuses.len()));
    for status in &statuses {
        report.push_line(format!(
            "  term {:>2}: audio {}, gif {}",
            status.number,
            found(status.audio),
            found(status.gif)
        ));
    }

    report.section("Audio");
    if resolved.mute {
        report.push_kv("output", "muted");
    }
    report.push_kv(
        "output_device",
        resolved.output_device.as_deref().unwrap_or("default"),
    );
    match Mixer::list_devices() {
        Ok(devices) if devices.is_empty() => report.push_kv("devices", "none"),
        Ok(devices) => {
            report.push_kv("device_count", devices.len());
            report.push_line("  devices:");
            for name in devices {
                report.push_line(format!("    - {name}"));
            }
        }
        Err(err) => report.push_kv("devices", format!("error: {err}")),
    }

    report
}

fn detect_color_mode() -> String {
    if env::var_os("NO_COLOR").is_some() {
        return "none (NO_COLOR)".to_string();
    }
    if let Ok(colorterm) = env::var("COLORTERM") {
        if matches!(colorterm.to_lowercase().as_str(), "truecolor" | "24bit") {
            return format!("truecolor (COLORTERM={colorterm})");
        }
    }
    match env::var("TERM") {
        Ok(term) if term.contains("256color") => format!("256 (TERM={term})"),
        Ok(term) if term == "dumb" => "none (TERM=dumb)".to_string(),
        Ok(term) => format!("ansi (TERM={term})"),
        Err(_) => "ansi (default)".to_string(),
    }
}

fn detect_unicode_support() -> String {
    for key in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Ok(value) = env::var(key) {
            let upper = value.to_ascii_uppercase();
            if upper.contains("UTF-8") || upper.contains("UTF8") {
                return format!("likely ({key}={value})");
            }
            return format!("unknown ({key}={value})");
        }
    }
    "unknown (locale env not set)".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn report_renders_sections_in_order() {
        let mut report = DoctorReport::new("Title");
        report.section("First");
        report.push_kv("key", 3);
        report.push_line("  raw");
        assert_eq!(report.render(), "Title\n\nFirst:\n  key: 3\n  raw");
    }

    #[test]
    fn media_status_checks_both_files() {
        let root = env::temp_dir().join(format!("sonicterm_doctor_{}", std::process::id()));
        fs::create_dir_all(root.join("audio")).expect("audio dir");
        fs::create_dir_all(root.join("gifs")).expect("gif dir");
        let first = &catalog()[0];
        fs::write(first.audio_path(&root), b"RIFF").expect("audio file");

        let statuses = media_status(&catalog()[..2], &root);
        assert_eq!(
            statuses[0],
            MediaStatus {
                number: 1,
                audio: true,
                gif: false
            }
        );
        assert!(!statuses[1].audio && !statuses[1].gif);
        let _ = fs::remove_dir_all(&root);
    }
}
