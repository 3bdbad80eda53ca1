//! coffer CLI: replays governance scenarios against an in-memory engine.

mod scenario;

use anyhow::Context;
use clap::Parser;
use coffer_governance::GovernanceConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coffer", about = "Treasury governance scenario runner")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "COFFER_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML governance configuration. Defaults apply when omitted.
    #[arg(long, env = "COFFER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario file and print a JSON report.
    Simulate {
        /// Scenario TOML file.
        scenario: PathBuf,
    },
    /// Print the default configuration as TOML.
    #[command(name = "default-config")]
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    coffer_utils::init_tracing(&cli.log_level);

    let config = match cli.config {
        Some(ref path) => {
            let config = GovernanceConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded config");
            config
        }
        None => GovernanceConfig::default(),
    };

    match cli.command {
        Command::Simulate { scenario } => {
            let parsed = scenario::Scenario::from_toml_file(&scenario)?;
            tracing::info!(
                scenario = %scenario.display(),
                steps = parsed.steps.len(),
                window = %coffer_utils::format_duration(config.voting_window_secs),
                "replaying scenario"
            );
            let report = scenario::run(&parsed, config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            let mismatches = report.mismatches();
            if mismatches > 0 {
                anyhow::bail!("{mismatches} step(s) did not match their expectation");
            }
        }
        Command::DefaultConfig => {
            print!("{}", GovernanceConfig::default().to_toml_string());
        }
    }

    Ok(())
}
