mod acquire;
mod cli;
mod error;
mod pipeline;

use crate::cli::Args;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use exn::ResultExt;
use presave_config::Config;
use presave_fetch::{AssumeYes, Confirm, HttpFetcher, StdinConfirm};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        },
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.default_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(&args) {
        Ok(summary) => {
            tracing::info!(
                corpus = %summary.corpus,
                test_batches = summary.test_batches,
                train_batches = summary.train_batches,
                "Done"
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<pipeline::Summary> {
    let mut config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    args.apply(&mut config);
    config.validate().or_raise(|| ErrorKind::Config)?;
    tracing::debug!(?config, "Configuration loaded");

    let fetcher = HttpFetcher::new();
    let confirm: &dyn Confirm = if args.yes { &AssumeYes } else { &StdinConfirm };
    pipeline::run(&config, &fetcher, confirm)
}
