//! File logging kept out of the alternate screen.
//!
//! Debug lines go to `$TMPDIR/sonicterm_tui.log`, panics to
//! `$TMPDIR/sonicterm_crash.log`. Both files are size capped and truncated
//! in place once they grow past the cap.

use crate::config::AppConfig;
use std::{
    env, fs,
    io::Write,
    panic,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const DEBUG_LOG_MAX_BYTES: u64 = 2 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 128 * 1024;

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_SINK: OnceLock<Mutex<Option<CappedFile>>> = OnceLock::new();

pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("sonicterm_tui.log")
}

pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("sonicterm_crash.log")
}

/// Append-only file that starts over once `cap` bytes would be exceeded.
struct CappedFile {
    path: PathBuf,
    file: fs::File,
    cap: u64,
    len: u64,
}

impl CappedFile {
    fn open(path: &Path, cap: u64) -> Option<Self> {
        let mut len = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        if len > cap {
            let _ = fs::remove_file(path);
            len = 0;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()?;
        Some(Self {
            path: path.to_path_buf(),
            file,
            cap,
            len,
        })
    }

    fn append(&mut self, line: &str) {
        let incoming = line.len() as u64;
        if self.len.saturating_add(incoming) > self.cap {
            match fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)
            {
                Ok(file) => {
                    self.file = file;
                    self.len = 0;
                }
                Err(_) => return,
            }
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.len = self.len.saturating_add(incoming);
        }
    }
}

fn debug_sink() -> &'static Mutex<Option<CappedFile>> {
    DEBUG_SINK.get_or_init(|| Mutex::new(None))
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn apply(enabled: bool, content_enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
    CONTENT_ENABLED.store(enabled && content_enabled, Ordering::Relaxed);
    let mut sink = debug_sink()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *sink = if enabled {
        CappedFile::open(&log_file_path(), DEBUG_LOG_MAX_BYTES)
    } else {
        None
    };
}

/// Turn file logging and JSON tracing on or off from the parsed CLI.
pub fn init_logging(config: &AppConfig) {
    apply(config.logging_enabled(), config.log_content);
    crate::telemetry::init_tracing(config);
}

pub fn log_debug(msg: &str) {
    if !DEBUG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format!("[{}] {msg}\n", unix_seconds());
    let mut sink = debug_sink()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(file) = sink.as_mut() {
        file.append(&line);
    }
}

/// Like [`log_debug`], but only when `--log-content` was also given.
pub fn log_debug_content(msg: &str) {
    if CONTENT_ENABLED.load(Ordering::Relaxed) {
        log_debug(msg);
    }
}

fn panic_payload(info: &panic::PanicHookInfo<'_>) -> String {
    if !CONTENT_ENABLED.load(Ordering::Relaxed) {
        return "payload omitted (log-content disabled)".to_string();
    }
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string payload".to_string())
}

/// Record where a panic happened. The payload is kept only with `--log-content`.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !DEBUG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let line = format!(
        "[{}] sonicterm v{} panicked at {location}: {}\n",
        unix_seconds(),
        env!("CARGO_PKG_VERSION"),
        panic_payload(info)
    );
    if let Some(mut file) = CappedFile::open(&crash_log_path(), CRASH_LOG_MAX_BYTES) {
        file.append(&line);
    }
}

#[cfg(test)]
pub(crate) fn set_logging_for_tests(enabled: bool, content_enabled: bool) {
    apply(enabled, content_enabled);
}
