//! Terminal presentation of ten terms for a sonic archive.
//!
//! Terms are revealed one at a time; hovering a term's circle fades its
//! looping sound clip in, and leaving fades it out again.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod doctor;
pub mod hover;
mod lock;
mod logging;
pub mod presentation;
pub mod reveal;
pub mod scheduler;
mod telemetry;
pub mod terminal_restore;
pub mod view;
pub mod visual;

pub(crate) use lock::lock_or_recover;
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use presentation::{Effect, Presentation};
