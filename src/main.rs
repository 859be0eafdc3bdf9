use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use svg2font::{Args, Config};

fn run(config: &Config) -> anyhow::Result<()> {
    svg2font::svg_to_font(config)
        .with_context(|| format!("Failed to convert SVGs in {}", config.source.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let config = Config::from(Args::parse());

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:?}");
            ExitCode::FAILURE
        }
    }
}
