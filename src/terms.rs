// src/terms.rs

use std::{fs, path::{Path, PathBuf}};

use thiserror::Error;

use crate::data::Term;

#[derive(Debug, Error)]
pub enum TermsError {
    #[error("could not read search terms from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load search terms from a line-delimited file.
/// Lines are trimmed, blank lines dropped, file order kept.
pub fn load(path: &Path) -> Result<Vec<Term>, TermsError> {
    let text = fs::read_to_string(path)
        .map_err(|source| TermsError::Io { path: path.to_path_buf(), source })?;
    let terms = parse(&text);
    logf!("Loaded {} search terms from {}", terms.len(), path.display());
    Ok(terms)
}

/// Parse file contents into terms
pub fn parse(text: &str) -> Vec<Term> {
    text.lines().filter_map(Term::new).collect()
}
