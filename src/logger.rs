// src/logger.rs
//
// Run log: every line goes to stdout and to `<debug dir>/automation.log`,
// stamped with the time elapsed since start-up. Backed by the `log` facade, so
// `RUST_LOG` can override the level.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use env_logger::{Builder, Env, Target};

use crate::config::consts::LOG_FILE;

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::log::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::log::error!($($arg)*)
    };
}

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(f) = self.file.as_mut() {
            // A full disk must not take stdout logging down with it.
            let _ = f.write_all(buf);
        }
        io::stdout().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(f) = self.file.as_mut() {
            let _ = f.flush();
        }
        io::stdout().flush()
    }
}

/// Install the global logger. Later calls are no-ops.
pub fn init(dir: &Path, verbose: bool) {
    start();

    let opened = fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE))
    });
    let (file, open_err) = match opened {
        Ok(f) => (Some(f), None),
        Err(e) => (None, Some(e)),
    };

    let level = if verbose { "debug" } else { "info" };
    let installed = Builder::from_env(Env::default().default_filter_or(format!("rt_scrape={level},warn")))
        .format(|buf, record| {
            let elapsed = fmt_elapsed(start().elapsed().as_millis());
            writeln!(buf, "[{elapsed}][{}] {}", record.level(), record.args())
        })
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init();

    if installed.is_err() {
        return;
    }
    match open_err {
        Some(e) => logw!("Run log disabled, could not open {}: {e}", dir.join(LOG_FILE).display()),
        None => logd!("Logging to {}", dir.join(LOG_FILE).display()),
    }
}
