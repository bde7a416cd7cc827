mod checker;
mod cli;
mod color;
mod config;
mod data;
mod error;
mod report;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;

use checker::Outcome;
use cli::Cli;
use config::CheckerConfig;
use report::{MessageTemplates, ReportSink};

/// A present but empty table stopped the run.
const EXIT_EMPTY_TABLE: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("proto-checker error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    color::apply_mode(cli.color);

    let mut config = CheckerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_overrides(&mut config);

    let mut sink = ReportSink::new(io::stdout().lock(), MessageTemplates::default());
    let result = checker::run_checks(&config, &mut sink);
    let seen = sink.summary();
    info!(
        "{} report lines, {} duplicates, {} missing keys",
        sink.lines().len(),
        seen.duplicates,
        seen.missing
    );
    let summary = sink
        .flush_to_log(&config.log_file)
        .with_context(|| format!("writing {}", config.log_file.display()))?;

    let outcome = result.context("checking tables")?;
    info!("run {outcome:?}");

    Ok(match outcome {
        Outcome::Aborted => ExitCode::from(EXIT_EMPTY_TABLE),
        Outcome::Completed if cli.fail_on_findings && summary.has_findings() => ExitCode::FAILURE,
        Outcome::Completed => ExitCode::SUCCESS,
    })
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}
