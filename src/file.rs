// src/file.rs
//
// Result sink. Every write is a full rewrite of the output file: records go to
// a sibling `.partial` file first, which is then renamed over the target, so a
// crash never leaves a half-written artifact behind.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::data::ResultRecord;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> SinkError + '_ {
    move |source| SinkError::Io { path: path.to_path_buf(), source }
}

/// Create or truncate `path` so the run starts from an empty artifact.
pub fn reset_output(path: &Path) -> Result<(), SinkError> {
    prepare_parent(path)?;
    File::create(path).map_err(io_err(path))?;
    Ok(())
}

/// Overwrite `path` with every record collected so far.
pub fn write_all(records: &[ResultRecord], path: &Path) -> Result<(), SinkError> {
    prepare_parent(path)?;

    let partial = partial_path(path);
    let file = File::create(&partial).map_err(io_err(&partial))?;
    let mut out = BufWriter::new(file);
    write_records(&mut out, records).map_err(io_err(&partial))?;
    out.flush().map_err(io_err(&partial))?;
    drop(out);

    fs::rename(&partial, path).map_err(io_err(path))?;
    Ok(())
}

/// One block per record: term line, outcome line(s), blank separator.
pub fn write_records<W: Write>(out: &mut W, records: &[ResultRecord]) -> io::Result<()> {
    for r in records {
        writeln!(out, "{}", r.term)?;
        writeln!(out, "{}", r.outcome)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn render(records: &[ResultRecord]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_records(&mut buf, records);
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn ensure_directory(dir: &Path) -> Result<(), SinkError> {
    if dir.exists() && !dir.is_dir() {
        return Err(SinkError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    Ok(())
}

fn prepare_parent(path: &Path) -> Result<(), SinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
