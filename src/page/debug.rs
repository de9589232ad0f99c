// src/page/debug.rs
//
// Best-effort page captures. Nothing in here may fail a run: every error is
// logged and dropped.

use std::{fs, io, path::{Path, PathBuf}};

use thiserror::Error;

use super::{AdapterError, PageAdapter};
use crate::core::sanitize::sanitize_term_filename;
use crate::data::Term;

#[derive(Debug, Error)]
enum SnapshotError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Write `<dir>/<label>_<term>.html` (and `.png` when a screenshot was taken).
/// Returns the markup path on success.
pub fn save_snapshot(
    page: &mut dyn PageAdapter,
    dir: &Path,
    label: &str,
    term: &Term,
) -> Option<PathBuf> {
    match try_save(page, dir, label, term) {
        Ok(path) => {
            logd!("Saved {label} snapshot for '{term}' to {}", path.display());
            Some(path)
        }
        Err(e) => {
            logw!("Could not save {label} snapshot for '{term}': {e}");
            None
        }
    }
}

fn try_save(
    page: &mut dyn PageAdapter,
    dir: &Path,
    label: &str,
    term: &Term,
) -> Result<PathBuf, SnapshotError> {
    let snap = page.snapshot()?;
    fs::create_dir_all(dir)?;

    let stem = format!("{label}_{}", sanitize_term_filename(term.as_str()));
    if let Some(png) = &snap.screenshot {
        fs::write(dir.join(format!("{stem}.png")), png)?;
    }
    let html = dir.join(format!("{stem}.html"));
    fs::write(&html, snap.markup.as_bytes())?;
    Ok(html)
}
