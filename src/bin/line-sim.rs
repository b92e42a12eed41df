use line_sim::{simulate, ExecutionConfig, LineSimError, SimulationConfig};
use log::{error, info};
use std::process::ExitCode;

fn usage() -> String {
    "usage: line-sim <config.json> [seed]".to_string()
}

fn run() -> Result<String, String> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or_else(usage)?;
    let seed = match args.next() {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| format!("invalid seed '{}': {}", raw, e))?,
        ),
        None => None,
    };

    let config = SimulationConfig::from_json_file(&path).map_err(|e| e.to_string())?;
    info!("Loaded {} operation(s) from {}", config.operations.len(), path);

    let execution = ExecutionConfig::new().with_optional_seed(seed);
    match simulate(&config, execution) {
        Ok(results) => serde_json::to_string_pretty(&results).map_err(|e| e.to_string()),
        Err(LineSimError::ValidationFailed { report, .. }) => {
            let messages: Vec<String> = report
                .errors
                .iter()
                .map(|issue| format!("  - {}", issue.message))
                .collect();
            Err(format!("config rejected:\n{}", messages.join("\n")))
        }
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> ExitCode {
    // Results go to stdout, so logs stay quiet unless RUST_LOG asks otherwise
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}
