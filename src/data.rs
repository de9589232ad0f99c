// src/data.rs
//! In-memory shapes shared by every stage of a run.
//!
//! A run turns an ordered list of [`Term`]s into an equally long, equally
//! ordered list of [`ResultRecord`]s. Nothing here talks to the browser or the
//! filesystem.

use std::fmt;

/// One search query (IP address, asset tag, ...). Always trimmed, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term(String);

impl Term {
    /// Trim `raw`; `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let t = raw.trim();
        if t.is_empty() { None } else { Some(Self(t.to_string())) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a term produced no value. The `Display` text is what lands in the output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// Search box never showed up.
    SearchFailed,
    /// Not on the properties page and there was no first search result to fall back to.
    NoResultFound,
    /// Fallback click worked but the properties page still did not load.
    PropertiesPageNotFound,
    /// Folder tab label did not carry the expected keyword: the term is some other kind of object.
    NotAssigned,
    /// Folder tab was there but could not be activated.
    TabClickFailed,
    /// A retry landed somewhere other than the properties page.
    NotOnPropertiesPage,
    /// The search box vanished while retrying.
    RetrySearchFailed { attempts: u32 },
    /// Every attempt timed out waiting for the field.
    ExtractionExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchFailed => f.write_str("search failed"),
            Self::NoResultFound => f.write_str("no result found"),
            Self::PropertiesPageNotFound => f.write_str("properties page not found"),
            Self::NotAssigned => f.write_str("not an assigned identifier"),
            Self::TabClickFailed => f.write_str("failed to click tab"),
            Self::NotOnPropertiesPage => f.write_str("not on properties page"),
            Self::RetrySearchFailed { attempts } => write!(f, "not found after {attempts} attempts"),
            Self::ExtractionExhausted => f.write_str("extraction exhausted"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(FailureReason),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(text) => f.write_str(text),
            Self::Failure(reason) => reason.fmt(f),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRecord {
    pub term: Term,
    pub outcome: Outcome,
}

impl ResultRecord {
    pub fn new(term: Term, outcome: Outcome) -> Self {
        Self { term, outcome }
    }
}

/// Records collected by one run, in input order.
///
/// Every consumed term pushes exactly one record, so `records().len()` is the
/// number of terms processed so far.
#[derive(Debug, Default)]
pub struct RunState {
    records: Vec<ResultRecord>,
}

impl RunState {
    pub fn with_capacity(n: usize) -> Self {
        Self { records: Vec::with_capacity(n) }
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }
}
