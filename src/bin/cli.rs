// src/bin/cli.rs
use rt_scrape::{cli, specs};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = cli::Args::load();
    let registry = specs::registry();
    let extractor = args.extractor(&registry).unwrap_or_else(|e| e.exit());

    cli::run(&args, extractor)?;
    Ok(())
}
