// src/page/mod.rs
//! # Page adapter
//!
//! Everything the run loop knows about the asset site goes through
//! [`PageAdapter`]: one trait method per navigation primitive, each returning
//! a `Result` so the caller decides what a failure means for the term at hand.
//!
//! ## Error contract
//! - [`AdapterError::Session`] means the browser itself is gone. It is the only
//!   variant the run loop treats as fatal.
//! - [`AdapterError::NotFound`] and [`AdapterError::Empty`] are transient: the
//!   page may still be rendering, so extraction retries them.
//! - [`AdapterError::LabelMismatch`] and [`AdapterError::ClickFailed`] are
//!   definitive answers about the current page and never retried.
//!
//! ## Matching rules
//! - Folder tab labels match on a case-sensitive substring of the keyword
//!   ("View", "Rackspace").
//! - Section headings match case-insensitively after whitespace normalization
//!   (see `core::sanitize::fold_heading`).
//!
//! `chrome` holds the real implementation; tests drive the run loop with
//! scripted fakes.

use std::time::Duration;

use thiserror::Error;

use crate::data::Term;

pub mod chrome;
pub mod debug;

pub use chrome::ChromeAdapter;

/// One entry of the `ul#foldertab` strip on an object's properties page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FolderTab {
    /// 1-based position in the strip.
    pub position: usize,
    /// Substring the tab label must contain.
    pub keyword: &'static str,
}

/// Where a field lives once its folder tab is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Text of the block whose `h2` reads `heading`.
    Section { heading: &'static str },
    /// Link texts inside the section's `h2`, one per href fragment, in order.
    SectionLinks { heading: &'static str, hrefs: &'static [&'static str] },
    /// Text of the first element matching a CSS selector.
    Element { css: &'static str },
}

/// Page capture for post-mortem debugging.
#[derive(Clone, Debug, Default)]
pub struct PageSnapshot {
    pub screenshot: Option<Vec<u8>>,
    pub markup: String,
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{what} not found within {waited:?}")]
    NotFound { what: String, waited: Duration },

    #[error("{what} is empty")]
    Empty { what: String },

    #[error("tab {position} reads {found:?}, expected {expected:?}")]
    LabelMismatch { position: usize, expected: &'static str, found: String },

    #[error("could not click {what}: {reason}")]
    ClickFailed { what: String, reason: String },

    #[error("browser session lost: {0}")]
    Session(String),
}

impl AdapterError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

pub trait PageAdapter {
    /// Open a fresh tab and load the site's entry page in it.
    fn open_context(&mut self) -> Result<(), AdapterError>;

    /// Type `term` into the search box and submit.
    fn search(&mut self, term: &Term) -> Result<(), AdapterError>;

    /// Is the current view an object's properties page?
    fn is_properties_page(&mut self) -> Result<bool, AdapterError>;

    /// Follow the first link of a search result listing.
    fn click_first_result(&mut self) -> Result<(), AdapterError>;

    /// Check the tab label against `tab.keyword`, then activate it.
    fn open_tab(&mut self, tab: FolderTab) -> Result<(), AdapterError>;

    /// Raw text(s) of `field` on the current page.
    fn read_field(&mut self, field: &Field) -> Result<Vec<String>, AdapterError>;

    fn refresh(&mut self) -> Result<(), AdapterError>;

    fn snapshot(&mut self) -> Result<PageSnapshot, AdapterError>;

    /// Close tabs until at most `ceiling` remain. The first tab is never closed.
    /// Returns how many were closed.
    fn close_surplus(&mut self, ceiling: usize) -> Result<usize, AdapterError>;
}
