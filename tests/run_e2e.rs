// tests/run_e2e.rs
mod common;

use std::fs;
use std::path::Path;

use common::{FakePage, Read, Script, options, terms};
use rt_scrape::config::ConfigError;
use rt_scrape::data::ResultRecord;
use rt_scrape::progress::{NullProgress, Progress};
use rt_scrape::runner::{Orchestrator, RunError};
use rt_scrape::specs::{ports, rackspace};

/// Records every callback and what the output file held at each checkpoint.
#[derive(Default)]
struct Recorder {
    total: Option<usize>,
    done: Vec<String>,
    checkpoints: Vec<(usize, usize)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.total = Some(total);
    }

    fn item_done(&mut self, _index: usize, record: &ResultRecord) {
        self.done.push(record.term.to_string());
    }

    fn checkpoint(&mut self, written: usize, path: &Path) {
        let blocks = fs::read_to_string(path).unwrap().matches("\n\n").count();
        self.checkpoints.push((written, blocks));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn writes_one_block_per_term_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), "results_ports.txt");
    let orch = Orchestrator::new(&opts, &ports::Ports);
    let mut page = FakePage::new().script("10.0.0.1", Script::reads([Read::Text("PortA\nPortB")]));

    let summary = orch
        .run(&terms(&["10.0.0.1", "10.0.0.2"]), &mut page, &mut NullProgress)
        .unwrap();

    let text = fs::read_to_string(dir.path().join("results_ports.txt")).unwrap();
    assert_eq!(text, "10.0.0.1\nPortA\nPortB\n\n10.0.0.2\nextraction exhausted\n\n");
    assert_eq!((summary.processed, summary.succeeded, summary.failed()), (2, 1, 1));
    assert_eq!(summary.output, dir.path().join("results_ports.txt"));
}

#[test]
fn checkpoints_hold_every_processed_term() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path(), "rack_numbers.txt");
    opts.checkpoint_every = 3;
    let orch = Orchestrator::new(&opts, &rackspace::Rackspace);
    let list = terms(&["s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
    let mut page = FakePage::new();
    for t in &list {
        page = page.script(t.as_str(), Script::reads([Read::Text("R1")]));
    }
    let mut rec = Recorder::default();

    orch.run(&list, &mut page, &mut rec).unwrap();

    assert_eq!(rec.total, Some(7));
    assert_eq!(rec.done, vec!["s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
    assert_eq!(rec.checkpoints, vec![(3, 3), (6, 6)]);
    assert!(rec.finished);

    let text = fs::read_to_string(dir.path().join("rack_numbers.txt")).unwrap();
    assert_eq!(text.matches("\nR1\n\n").count(), 7);
}

#[test]
fn lost_session_flushes_what_was_done() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), "results_ports.txt");
    let orch = Orchestrator::new(&opts, &ports::Ports);
    let mut page = FakePage::new()
        .script("a", Script::reads([Read::Text("eth0")]))
        .script("b", Script::reads([Read::Fatal]));
    let mut rec = Recorder::default();

    let err = orch.run(&terms(&["a", "b", "c"]), &mut page, &mut rec).unwrap_err();

    assert!(matches!(err, RunError::Session(_)));
    assert!(!rec.finished);
    let text = fs::read_to_string(dir.path().join("results_ports.txt")).unwrap();
    assert_eq!(text, "a\neth0\n\n");
    assert!(!dir.path().join("results_ports.txt.partial").exists());
}

#[test]
fn stale_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results_ports.txt");
    fs::write(&out, "old\nstuff\n\nmore\nold stuff\n\n").unwrap();
    let opts = options(dir.path(), "results_ports.txt");
    let orch = Orchestrator::new(&opts, &ports::Ports);

    let summary = orch.run(&[], &mut FakePage::new(), &mut NullProgress).unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn output_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), "nested/out/results_ports.txt");
    let orch = Orchestrator::new(&opts, &ports::Ports);
    let mut page = FakePage::new().script("x", Script::reads([Read::Text("p1")]));

    orch.run(&terms(&["x"]), &mut page, &mut NullProgress).unwrap();

    let text = fs::read_to_string(dir.path().join("nested/out/results_ports.txt")).unwrap();
    assert_eq!(text, "x\np1\n\n");
}

#[test]
fn default_output_comes_from_extractor() {
    let opts = rt_scrape::config::RunOptions::default();
    let orch = Orchestrator::new(&opts, &rackspace::Rackspace);
    assert_eq!(orch.output(), Path::new("rack_numbers.txt"));
}

#[test]
fn zero_checkpoint_interval_is_rejected_before_output_is_touched() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results_ports.txt");
    fs::write(&out, "a\neth0\n\n").unwrap();
    let mut opts = options(dir.path(), "results_ports.txt");
    opts.checkpoint_every = 0;
    let orch = Orchestrator::new(&opts, &ports::Ports);
    let mut page = FakePage::new();

    let err = orch.run(&terms(&["a"]), &mut page, &mut NullProgress).unwrap_err();

    assert!(matches!(err, RunError::Config(ConfigError::ZeroLimit("checkpoint interval"))));
    assert_eq!(fs::read_to_string(&out).unwrap(), "a\neth0\n\n");
    assert_eq!(page.calls.open_context, 0);
}
