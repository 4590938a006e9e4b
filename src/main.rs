use anyhow::Result;
use clap::Parser;
use gdpmelt::{cli::Cli, pipeline};
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging (stderr, so stdout carries only the report) ──
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 2) resolve configuration ────────────────────────────────────
    let cfg = Cli::parse().resolve()?;
    info!(input = %cfg.input.display(), "startup");

    // ─── 3) load, reshape, report, export ────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let reshaped = pipeline::run(&cfg, &mut out)?;

    info!(long_rows = reshaped.long.len(), "all done");
    Ok(())
}
