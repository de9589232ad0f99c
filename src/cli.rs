// src/cli.rs
use std::{io, path::PathBuf, time::Duration};

use clap::{error::ErrorKind, CommandFactory, Parser};

use crate::{
    config::{consts::*, Credentials, RunOptions},
    logger,
    page::ChromeAdapter,
    progress::LogProgress,
    runner::{Orchestrator, RunError, RunSummary},
    specs::{Extractor, Registry},
    terms,
};

/// Pull asset metadata out of RackTables for every term in a search file.
#[derive(Parser, Debug)]
#[command(name = "rt_scrape", version, about)]
pub struct Args {
    /// Extractor to run (ports, racks, rackspace)
    pub extractor: Option<String>,

    /// Search terms, one per line
    #[arg(short, long, default_value = SEARCH_FILE)]
    pub input: PathBuf,

    /// Output file [default: the extractor's own, e.g. results_ports.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Where the run log and failure snapshots go
    #[arg(long, default_value = DEBUG_DIR)]
    pub debug_dir: PathBuf,

    /// Asset site host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Seconds to wait for page elements
    #[arg(long, default_value_t = WAIT_SECS)]
    pub wait_secs: u64,

    /// Most browser tabs kept open between terms
    #[arg(long, default_value_t = TAB_LIMIT)]
    pub tab_limit: usize,

    /// Save results every N terms
    #[arg(long, default_value_t = CHECKPOINT_EVERY)]
    pub checkpoint_every: usize,

    /// Extraction attempts per term
    #[arg(long, default_value_t = MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, env = USERNAME_VAR, hide_env_values = true)]
    pub username: Option<String>,

    #[arg(long, env = PASSWORD_VAR, hide_env_values = true)]
    pub password: Option<String>,

    /// Why `.env` could not be used, if it exists but is broken.
    #[arg(skip)]
    pub env_file_error: Option<String>,
}

impl Args {
    /// Parse the command line, with `.env` loaded first so clap sees its values.
    pub fn load() -> Self {
        let env_file_error = env_file_problem(dotenvy::dotenv());
        Self { env_file_error, ..Self::parse() }
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            debug_dir: self.debug_dir.clone(),
            host: self.host.clone(),
            headless: !self.headful,
            tab_limit: self.tab_limit,
            checkpoint_every: self.checkpoint_every,
            max_attempts: self.max_attempts,
            wait: Duration::from_secs(self.wait_secs),
            ..RunOptions::default()
        }
    }

    /// Pick the extractor named on the command line.
    /// Missing or unknown keys come back as a clap usage error listing the valid keys.
    pub fn extractor<'r>(&self, registry: &'r Registry) -> Result<&'r dyn Extractor, clap::Error> {
        let mut cmd = Self::command();
        let Some(key) = self.extractor.as_deref() else {
            let msg = format!("missing extractor; available: {}", registry.keys().join(", "));
            return Err(cmd.error(ErrorKind::MissingRequiredArgument, msg));
        };
        registry
            .lookup(key)
            .map_err(|e| cmd.error(ErrorKind::InvalidValue, e.to_string()))
    }
}

/// A missing `.env` is fine; anything else about it is worth reporting.
pub fn env_file_problem(loaded: Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match loaded {
        Ok(_) => None,
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => Some(e.to_string()),
    }
}

/// Load terms, start Chrome and run `extractor` over every term.
pub fn run(args: &Args, extractor: &dyn Extractor) -> Result<RunSummary, RunError> {
    let options = args.options();
    logger::init(&options.debug_dir, args.verbose);
    if let Some(e) = &args.env_file_error {
        logw!("Ignoring .env file: {e}");
    }
    options.validate()?;

    let creds = Credentials::new(
        args.username.as_deref().unwrap_or_default(),
        args.password.as_deref().unwrap_or_default(),
    )?;
    let terms = terms::load(&options.input)?;

    let mut page = ChromeAdapter::launch(options.base_url(&creds), &options)
        .map_err(RunError::Session)?;
    let orchestrator = Orchestrator::new(&options, extractor);
    logf!("Running {} over {} terms into {}", extractor.key(), terms.len(), orchestrator.output().display());

    let summary = orchestrator.run(&terms, &mut page, &mut LogProgress::default())?;
    logf!(
        "Done: {} processed, {} ok, {} failed → {}",
        summary.processed,
        summary.succeeded,
        summary.failed(),
        summary.output.display()
    );
    Ok(summary)
}
