// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::Duration;

use rt_scrape::config::RunOptions;
use rt_scrape::data::Term;
use rt_scrape::page::{AdapterError, Field, FolderTab, PageAdapter, PageSnapshot};

/// What one `read_field` call returns.
#[derive(Clone, Debug)]
pub enum Read {
    Text(&'static str),
    Links(&'static str, &'static str),
    Missing,
    Empty,
    Fatal,
}

/// Scripted page behaviour for one term. Queues fall back to their default
/// once drained: searches and properties checks succeed, reads are missing.
#[derive(Clone, Debug)]
pub struct Script {
    searches: VecDeque<bool>,
    properties: VecDeque<bool>,
    first_result_ok: bool,
    label_ok: bool,
    tab_click_ok: bool,
    reads: VecDeque<Read>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            searches: VecDeque::new(),
            properties: VecDeque::new(),
            first_result_ok: true,
            label_ok: true,
            tab_click_ok: true,
            reads: VecDeque::new(),
        }
    }
}

impl Script {
    pub fn reads(reads: impl IntoIterator<Item = Read>) -> Self {
        Self { reads: reads.into_iter().collect(), ..Self::default() }
    }

    pub fn searches(mut self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.searches = outcomes.into_iter().collect();
        self
    }

    pub fn properties(mut self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.properties = outcomes.into_iter().collect();
        self
    }

    pub fn no_first_result(mut self) -> Self {
        self.first_result_ok = false;
        self
    }

    pub fn wrong_label(mut self) -> Self {
        self.label_ok = false;
        self
    }

    pub fn unclickable_tab(mut self) -> Self {
        self.tab_click_ok = false;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calls {
    pub open_context: usize,
    pub search: usize,
    pub is_properties_page: usize,
    pub click_first_result: usize,
    pub open_tab: usize,
    pub read_field: usize,
    pub refresh: usize,
    pub snapshot: usize,
    pub close_surplus: usize,
}

pub struct FakePage {
    scripts: HashMap<String, Script>,
    current: Option<String>,
    pub calls: Calls,
    /// Tabs currently open, first tab included.
    pub tabs: usize,
    /// Highest tab count observed right after a cleanup.
    pub peak_after_cleanup: usize,
    pub opened_tabs: Vec<FolderTab>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            current: None,
            calls: Calls::default(),
            tabs: 1,
            peak_after_cleanup: 0,
            opened_tabs: Vec::new(),
        }
    }

    pub fn script(mut self, term: &str, script: Script) -> Self {
        self.scripts.insert(term.to_string(), script);
        self
    }

    fn script_mut(&mut self) -> &mut Script {
        let key = self.current.clone().unwrap_or_default();
        self.scripts.entry(key).or_default()
    }
}

impl PageAdapter for FakePage {
    fn open_context(&mut self) -> Result<(), AdapterError> {
        self.calls.open_context += 1;
        self.tabs += 1;
        Ok(())
    }

    fn search(&mut self, term: &Term) -> Result<(), AdapterError> {
        self.calls.search += 1;
        self.current = Some(term.as_str().to_string());
        if self.script_mut().searches.pop_front().unwrap_or(true) {
            Ok(())
        } else {
            Err(AdapterError::NotFound { what: "search box".into(), waited: Duration::ZERO })
        }
    }

    fn is_properties_page(&mut self) -> Result<bool, AdapterError> {
        self.calls.is_properties_page += 1;
        Ok(self.script_mut().properties.pop_front().unwrap_or(true))
    }

    fn click_first_result(&mut self) -> Result<(), AdapterError> {
        self.calls.click_first_result += 1;
        if self.script_mut().first_result_ok {
            Ok(())
        } else {
            Err(AdapterError::NotFound { what: "first search result".into(), waited: Duration::ZERO })
        }
    }

    fn open_tab(&mut self, tab: FolderTab) -> Result<(), AdapterError> {
        self.calls.open_tab += 1;
        self.opened_tabs.push(tab);
        let script = self.script_mut();
        if !script.label_ok {
            return Err(AdapterError::LabelMismatch {
                position: tab.position,
                expected: tab.keyword,
                found: "Log".into(),
            });
        }
        if !script.tab_click_ok {
            return Err(AdapterError::ClickFailed {
                what: format!("folder tab {}", tab.position),
                reason: "element detached".into(),
            });
        }
        Ok(())
    }

    fn read_field(&mut self, _field: &Field) -> Result<Vec<String>, AdapterError> {
        self.calls.read_field += 1;
        match self.script_mut().reads.pop_front().unwrap_or(Read::Missing) {
            Read::Text(t) => Ok(vec![t.to_string()]),
            Read::Links(a, b) => Ok(vec![a.to_string(), b.to_string()]),
            Read::Empty => Ok(vec!["   ".to_string()]),
            Read::Missing => {
                Err(AdapterError::NotFound { what: "field".into(), waited: Duration::ZERO })
            }
            Read::Fatal => Err(AdapterError::Session("connection closed".into())),
        }
    }

    fn refresh(&mut self) -> Result<(), AdapterError> {
        self.calls.refresh += 1;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<PageSnapshot, AdapterError> {
        self.calls.snapshot += 1;
        Ok(PageSnapshot { screenshot: None, markup: "<html><body>search results</body></html>".into() })
    }

    fn close_surplus(&mut self, ceiling: usize) -> Result<usize, AdapterError> {
        self.calls.close_surplus += 1;
        let closed = self.tabs.saturating_sub(ceiling.max(1));
        self.tabs -= closed;
        self.peak_after_cleanup = self.peak_after_cleanup.max(self.tabs);
        Ok(closed)
    }
}

pub fn terms(raw: &[&str]) -> Vec<Term> {
    raw.iter().filter_map(|t| Term::new(t)).collect()
}

/// Options pointing output and debug captures into `dir`, no real waiting.
pub fn options(dir: &Path, output: &str) -> RunOptions {
    RunOptions {
        output: Some(dir.join(output)),
        debug_dir: dir.join("debug"),
        settle: Duration::ZERO,
        poll: Duration::ZERO,
        wait: Duration::ZERO,
        ..RunOptions::default()
    }
}
