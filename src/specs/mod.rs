// src/specs/mod.rs
//! # Extractor “specs” module
//!
//! Each spec pulls **one field** off an object's properties page and knows
//! *which folder tab* holds it and *how to shape* what the page adapter reads.
//!
//! ## What lives here
//! - The [`Extractor`] strategy trait and the [`ExtractorSpec`] each one carries
//!   (registry key, output file, folder tab, field location).
//! - Light shaping of raw text: trimming, and for multi-part fields, assembling
//!   the parts into one value.
//! - The [`Registry`] mapping CLI keys to extractors.
//!
//! ## What does **not** live here
//! - **Navigation and retries.** Searching, validating, refreshing and the
//!   attempt budget belong to `runner`; a spec's `read` runs once per attempt
//!   on a page whose folder tab is already open.
//! - **Browser details.** Selectors and clicks sit behind `page::PageAdapter`.
//!
//! ## Conventions
//! - Empty fields are reported as `AdapterError::Empty` so the runner retries
//!   them like a slow render.
//! - Keys are lowercase; lookup lowercases its input.
//!
//! ## Current specs
//! - `ports` – "Ports and Links" block from the View tab.
//! - `racks` – row and rack names from the "Rackspace allocation" block.
//! - `rackspace` – rack number heading on the Rackspace tab.
use thiserror::Error;

use crate::page::{AdapterError, Field, FolderTab, PageAdapter};

pub mod ports;
pub mod racks;
pub mod rackspace;

/// Static description of one extraction strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractorSpec {
    pub key: &'static str,
    /// Default output file for this extractor's results.
    pub output: &'static str,
    pub tab: FolderTab,
    pub field: Field,
}

pub trait Extractor {
    fn spec(&self) -> &ExtractorSpec;

    /// Read and shape the field. Called with the spec's folder tab open.
    fn read(&self, page: &mut dyn PageAdapter) -> Result<String, AdapterError>;

    fn key(&self) -> &'static str {
        self.spec().key
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown extractor '{key}' (available: {})", available.join(", "))]
    NotFound { key: String, available: Vec<&'static str> },
}

/// Key → extractor table, filled once at startup.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Box<dyn Extractor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `extractor`, replacing any earlier one with the same key.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        let key = extractor.key();
        match self.entries.iter().position(|e| e.key() == key) {
            Some(i) => self.entries[i] = extractor,
            None => self.entries.push(extractor),
        }
    }

    pub fn lookup(&self, key: &str) -> Result<&dyn Extractor, RegistryError> {
        let wanted = key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.key() == wanted)
            .map(|e| &**e)
            .ok_or_else(|| RegistryError::NotFound { key: key.to_string(), available: self.keys() })
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key()).collect()
    }
}

/// The built-in extractors.
pub fn registry() -> Registry {
    let mut reg = Registry::new();
    reg.register(Box::new(ports::Ports));
    reg.register(Box::new(racks::Racks));
    reg.register(Box::new(rackspace::Rackspace));
    reg
}

/// Single-part field, trimmed; blank counts as not rendered yet.
pub(crate) fn read_trimmed(
    page: &mut dyn PageAdapter,
    spec: &ExtractorSpec,
) -> Result<String, AdapterError> {
    let parts = page.read_field(&spec.field)?;
    let text = parts.first().map(|s| s.trim()).unwrap_or_default();
    if text.is_empty() {
        return Err(AdapterError::Empty { what: spec.key.to_string() });
    }
    Ok(text.to_string())
}
