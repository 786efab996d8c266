//! # DWA Rule CLI
//!
//! Runs the audit-logging compliance rule against a warehouse snapshot
//! file instead of live provider APIs. Useful for dry runs and for
//! inspecting what a rule invocation would submit.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::info;

use dwa_rule::prelude::*;

#[derive(Debug, Parser)]
#[command(
    name = "dwa-rule",
    version,
    about = "Audit-logging compliance check for data-warehouse clusters"
)]
struct Cli {
    /// Trigger event JSON file
    event: PathBuf,

    /// Warehouse snapshot JSON backing the provider APIs
    #[arg(long)]
    fixture: PathBuf,

    /// Delay between provider calls in milliseconds (0 disables throttling)
    #[arg(long, default_value_t = 0)]
    throttle_ms: u64,

    /// Page size for the cluster listing
    #[arg(long, default_value_t = 50)]
    page_size: u32,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let event_text = fs::read_to_string(&cli.event)?;
    let event: RuleEvent = serde_json::from_str(&event_text)?;

    let snapshot_text = fs::read_to_string(&cli.fixture)?;
    let provider = FixtureProvider::from_json(&snapshot_text)?;

    let config = RuleConfig::default()
        .with_throttle(Duration::from_millis(cli.throttle_ms))
        .with_list_page_size(cli.page_size);

    info!(
        "running rule {} for account {}",
        event.config_rule_name, event.account_id
    );

    let handler = RuleHandler::new(&provider, &provider, config);
    match handler.handle(&event) {
        Ok(evaluations) => {
            print_json(&evaluations, cli.pretty)?;
            let submitted: usize = provider
                .submissions()
                .iter()
                .map(|batch| batch.evaluations.len())
                .sum();
            info!(
                "{} evaluation(s) processed, {} submitted",
                evaluations.len(),
                submitted
            );
            Ok(())
        }
        Err(response) => {
            print_json(&response, cli.pretty)?;
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
