// src/runner.rs
//! Run loop: one term at a time, in input order.
//!
//! Per term the orchestrator walks
//! `open context → search → validate (→ fallback) → extract (→ retry)`
//! and always ends with tab cleanup. Every per-term problem becomes an
//! [`Outcome::Failure`]; only a lost browser session ([`RunError::Session`])
//! stops the run, and even then the records gathered so far are flushed first.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    config::{ConfigError, RunOptions},
    data::{FailureReason, Outcome, ResultRecord, RunState, Term},
    file::{self, SinkError},
    page::{debug, AdapterError, PageAdapter},
    progress::Progress,
    specs::{Extractor, RegistryError},
    terms::TermsError,
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Terms(#[from] TermsError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("browser session failed: {0}")]
    Session(AdapterError),
}

/// Summary of what was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub processed: usize,
    pub succeeded: usize,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.processed - self.succeeded
    }
}

/// Split a fatal adapter error off into `RunError`; hand everything else back.
fn settle<T>(res: Result<T, AdapterError>) -> Result<Result<T, AdapterError>, RunError> {
    match res {
        Err(e) if e.is_fatal() => Err(RunError::Session(e)),
        other => Ok(other),
    }
}

fn fail(reason: FailureReason) -> Result<Outcome, RunError> {
    Ok(Outcome::Failure(reason))
}

pub struct Orchestrator<'a> {
    options: &'a RunOptions,
    extractor: &'a dyn Extractor,
    output: PathBuf,
}

impl<'a> Orchestrator<'a> {
    pub fn new(options: &'a RunOptions, extractor: &'a dyn Extractor) -> Self {
        let output = options.output_for(extractor.spec());
        Self { options, extractor, output }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Process every term and write the results.
    ///
    /// Options are validated before anything is touched. The output file is
    /// then truncated, rewritten every `options.checkpoint_every` terms and
    /// once more at the end.
    pub fn run(
        &self,
        terms: &[Term],
        page: &mut dyn PageAdapter,
        progress: &mut dyn Progress,
    ) -> Result<RunSummary, RunError> {
        self.options.validate()?;
        let key = self.extractor.key();
        file::reset_output(&self.output)?;

        let mut state = RunState::with_capacity(terms.len());
        progress.begin(terms.len());

        for (i, term) in terms.iter().enumerate() {
            logf!("Processing term {}/{}: '{term}' with {key}", i + 1, terms.len());

            let outcome = match self.process(term, page) {
                Ok(outcome) => outcome,
                Err(e) => return Err(self.abort(&state, e)),
            };
            state.push(ResultRecord::new(term.clone(), outcome));
            if let Some(record) = state.records().last() {
                progress.item_done(i, record);
            }

            // Cleanup runs whatever the outcome was.
            match settle(page.close_surplus(self.options.tab_limit)) {
                Err(e) => return Err(self.abort(&state, e)),
                Ok(Err(e)) => logw!("Tab cleanup after '{term}' failed: {e}"),
                Ok(Ok(_)) => {}
            }

            if state.processed() % self.options.checkpoint_every == 0 {
                logf!("Saving intermediate results after {} terms", state.processed());
                file::write_all(state.records(), &self.output)?;
                progress.checkpoint(state.processed(), &self.output);
            }
        }

        logf!("Final save of {} results to {}", state.processed(), self.output.display());
        file::write_all(state.records(), &self.output)?;
        progress.finish();

        Ok(RunSummary {
            output: self.output.clone(),
            processed: state.processed(),
            succeeded: state.succeeded(),
        })
    }

    /// Flush what we have, then hand the fatal error back.
    fn abort(&self, state: &RunState, err: RunError) -> RunError {
        loge!("Run aborted after {} terms: {err}", state.processed());
        match file::write_all(state.records(), &self.output) {
            Ok(()) => logf!("Saved {} results before exiting", state.processed()),
            Err(e) => loge!("Could not save results before exiting: {e}"),
        }
        err
    }

    /// Navigate to `term`'s properties page and extract the field.
    /// `Err` when the options are invalid or the browser session is gone.
    pub fn process_term(&self, term: &Term, page: &mut dyn PageAdapter) -> Result<Outcome, RunError> {
        self.options.validate()?;
        self.process(term, page)
    }

    fn process(&self, term: &Term, page: &mut dyn PageAdapter) -> Result<Outcome, RunError> {
        if let Err(e) = settle(page.open_context())? {
            logw!("Could not open a fresh tab for '{term}': {e}");
        }

        if let Err(e) = settle(page.search(term))? {
            loge!("Search failed for '{term}': {e}");
            return fail(FailureReason::SearchFailed);
        }

        if !settle(page.is_properties_page())?.unwrap_or(false) {
            debug::save_snapshot(page, &self.options.debug_dir, "properties_check_failed", term);
            logf!("Properties page not detected for '{term}', trying first search result");

            if let Err(e) = settle(page.click_first_result())? {
                loge!("No usable search result for '{term}': {e}");
                debug::save_snapshot(page, &self.options.debug_dir, "no_search_result", term);
                return fail(FailureReason::NoResultFound);
            }
            if !settle(page.is_properties_page())?.unwrap_or(false) {
                loge!("Still not on a properties page for '{term}' after following the first result");
                return fail(FailureReason::PropertiesPageNotFound);
            }
        }

        self.extract(term, page)
    }

    /// Bounded retry around one extraction attempt.
    ///
    /// Tab-label mismatches and click failures end the term at once. Missing or
    /// empty fields are retried after refresh + search + validate, up to
    /// `options.max_attempts` attempts in total.
    fn extract(&self, term: &Term, page: &mut dyn PageAdapter) -> Result<Outcome, RunError> {
        let max = self.options.max_attempts;
        let spec = self.extractor.spec();

        for attempt in 1..=max {
            let result = match page.open_tab(spec.tab) {
                Ok(()) => self.extractor.read(page),
                Err(e) => Err(e),
            };

            let err = match settle(result)? {
                Ok(text) => {
                    logf!("Extracted {} for '{term}' (attempt {attempt})", spec.key);
                    return Ok(Outcome::Success(text));
                }
                Err(e) => e,
            };

            match &err {
                AdapterError::LabelMismatch { .. } => {
                    logw!("'{term}' is not an assigned object: {err}");
                    return fail(FailureReason::NotAssigned);
                }
                AdapterError::ClickFailed { .. } => {
                    loge!("'{term}': {err}");
                    return fail(FailureReason::TabClickFailed);
                }
                _ => logw!("[{term}] Attempt {attempt}/{max} failed: {err}"),
            }

            if attempt == max {
                break;
            }

            logf!("Retrying search for '{term}'");
            if let Err(e) = settle(page.refresh())? {
                logw!("Refresh failed for '{term}': {e}");
            }
            if let Err(e) = settle(page.search(term))? {
                loge!("Retry search failed for '{term}': {e}");
                return fail(FailureReason::RetrySearchFailed { attempts: attempt });
            }
            if !settle(page.is_properties_page())?.unwrap_or(false) {
                loge!("Retry for '{term}' did not land on a properties page");
                return fail(FailureReason::NotOnPropertiesPage);
            }
        }

        loge!("All {max} attempts failed for '{term}'");
        fail(FailureReason::ExtractionExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::registry;

    #[test]
    fn summary_counts_failures() {
        let s = RunSummary { output: PathBuf::from("results_ports.txt"), processed: 7, succeeded: 5 };
        assert_eq!(s.failed(), 2);
    }

    #[test]
    fn boundary_errors_convert() {
        let err: RunError = registry().lookup("cables").err().unwrap().into();
        assert!(matches!(err, RunError::Registry(_)));
        assert!(err.to_string().starts_with("unknown extractor 'cables'"));

        let err: RunError = ConfigError::ZeroLimit("tab limit").into();
        assert_eq!(err.to_string(), "tab limit must be at least 1");

        assert!(matches!(settle::<()>(Err(AdapterError::Session("gone".into()))), Err(RunError::Session(_))));
        assert!(matches!(settle::<()>(Err(AdapterError::Empty { what: "x".into() })), Ok(Err(_))));
    }
}
