//! SonicTerm entrypoint.
//!
//! Reveals the ten terms one by one in a full-screen terminal view. Moving
//! the mouse over a term's circle fades its sound in; moving away fades it
//! out again.
//!
//! # Architecture
//!
//! - Input thread: reads terminal events and forwards them over a channel
//! - Main thread: owns the presentation, runs timers, draws frames
//! - Audio callback: mixes the looping clips at their current volumes

mod cli_utils;
mod event_loop;
mod input;
mod layout;
mod render;
mod scroll;
mod theme;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::bounded;
use crossterm::terminal::size as terminal_size;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use sonicterm::audio::{AudioOutput, Mixer, NullOutput};
use sonicterm::catalog::catalog;
use sonicterm::config::AppConfig;
use sonicterm::doctor::doctor_report;
use sonicterm::terminal_restore::TerminalRestoreGuard;
use sonicterm::view::ViewBuilder;
use sonicterm::{init_logging, log_debug, log_file_path, Presentation};
use std::io;
use std::time::Instant;

use crate::cli_utils::{list_output_devices, print_terms};
use crate::event_loop::{run_event_loop, EventLoopState};
use crate::input::spawn_input_thread;

/// Max pending input events before the reader thread blocks.
const INPUT_CHANNEL_CAPACITY: usize = 256;

/// Open the configured output, or a silent one. The string is shown in the
/// status bar.
fn open_output(config: &AppConfig) -> (Box<dyn AudioOutput>, String) {
    if config.mute {
        return (Box::new(NullOutput::new()), "muted".to_string());
    }
    match Mixer::open(config.output_device.as_deref()) {
        Ok(mixer) => {
            let note = format!("audio: {}", mixer.device_name());
            log_debug(&format!(
                "output device {} at {}Hz",
                mixer.device_name(),
                mixer.sample_rate()
            ));
            (Box::new(mixer), note)
        }
        Err(err) => {
            log_debug(&format!("audio output unavailable: {err:#}"));
            (Box::new(NullOutput::new()), "no audio output".to_string())
        }
    }
}

fn main() -> Result<()> {
    let mut config = AppConfig::parse();
    if config.list_terms {
        return print_terms();
    }
    if config.list_output_devices {
        return list_output_devices();
    }
    if config.doctor {
        println!("{}", doctor_report(&config).render());
        return Ok(());
    }

    config.validate()?;
    init_logging(&config);
    log_debug("=== SonicTerm started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));
    log_debug(&format!("media root: {}", config.media_root.display()));

    let (output, audio_note) = open_output(&config);
    let mut builder = ViewBuilder::new(&config.media_root);
    if config.no_visuals {
        builder = builder.without_visuals();
    }
    let presentation = Presentation::new(catalog(), builder, output);

    let terminal_guard = TerminalRestoreGuard::new();
    let mut stdout = io::stdout();
    terminal_guard.enter(&mut stdout)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (cols, rows) = terminal_size()?;
    let mut state = EventLoopState::new(
        presentation,
        Rect::new(0, 0, cols, rows),
        config.frame_interval(),
        audio_note,
        Instant::now(),
    );

    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let _input_handle = spawn_input_thread(input_tx);

    let result = run_event_loop(&mut terminal, &mut state, &input_rx);

    drop(terminal);
    terminal_guard.restore();
    log_debug("=== SonicTerm exiting ===");
    result
}
