//! Scripted drag driver for the snapline engine.
//!
//! Usage: `snapline [config.json]`. Set `RUST_LOG=debug` to see snap decisions.

mod demo;

use snapline_core::{ConfigError, EngineConfig};
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn load_config(path: Option<String>) -> Result<EngineConfig, AppError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|source| AppError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(EngineConfig::from_json(&json)?)
}

fn run_session(path: Option<String>) -> Result<demo::DemoReport, AppError> {
    let config = load_config(path)?;
    Ok(demo::run(config)?)
}

fn main() {
    env_logger::init();
    log::info!("Starting snapline");

    let report = match run_session(std::env::args().nth(1)) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("snapline: {}", e);
            std::process::exit(1);
        }
    };

    let snapped = report
        .steps
        .iter()
        .filter(|step| step.requested != step.corrected)
        .count();
    println!(
        "{} move ticks, {} snapped, {} guide primitives left after release",
        report.steps.len(),
        snapped,
        report.guides_after_release
    );
}
