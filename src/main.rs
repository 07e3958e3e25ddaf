//! TheraMind questionnaire replay runner.
//!
//! ```text
//! theramind-questionnaire <script.yaml>
//! ```
//!
//! Loads configuration from the environment, replays the script and prints
//! the resulting assessment record as JSON on stdout. Logs go to stderr.

use std::error::Error;

use theramind_questionnaire::config::AppConfig;
use theramind_questionnaire::replay::{replay, ReplayScript};
use theramind_questionnaire::telemetry::init_tracing;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let script_path = std::env::args()
        .nth(1)
        .ok_or("usage: theramind-questionnaire <script.yaml>")?;

    let config = AppConfig::load()?;
    init_tracing(&config.telemetry)?;

    let script = ReplayScript::from_file(&script_path).await?;
    let outcome = replay(&config, script).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
