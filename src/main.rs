mod app;
mod error;
mod manager;
mod models;
mod worker;

use anyhow::Context;
use crossbeam_channel::unbounded;
use log::info;
use tracing_subscriber::EnvFilter;

use app::cli;
use app::config::Config;
use manager::job_control::JobControl;
use worker::reaper;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env();
    let (sender, receiver) = unbounded();
    // Before anything else spawns a thread, see reaper::install.
    reaper::install(sender).context("cannot install child exit handler")?;
    info!("Shell started, tracking up to {} jobs.", config.max_jobs);

    let jobs = JobControl::new(config.max_jobs, receiver);
    cli::run_cli(jobs, &config)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
