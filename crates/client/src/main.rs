//! `skirmish` binary.
//!
//! Loads the content directory, builds the configured encounter, and plays
//! it out in the terminal. Settings come from the environment (a `.env` file
//! is read first):
//!
//! ```bash
//! SKIRMISH_ENCOUNTER=brute SKIRMISH_SEED=7 skirmish
//! SKIRMISH_AI_ONLY=true SKIRMISH_EXPORT=fight.json skirmish
//! ```
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use skirmish_client::logging::{self, LogTarget};
use skirmish_client::{Narrator, StdinController, session_outcome};
use skirmish_runtime::{RuntimeConfig, SessionBuilder, SessionOutcome, StepResult};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();
    let log_dir = std::env::var_os("SKIRMISH_LOG_DIR").map(PathBuf::from);
    let target = LogTarget::choose(!config.ai_only, log_dir, config.seed);
    let _guard = logging::init(&target)?;

    let export = config.export_path.clone();
    let mut session = SessionBuilder::from_content_dir(config)?
        .controller(Arc::new(StdinController::new()))
        .build()?;

    let mut narrator = Narrator::new(session.engine());
    let mut shown = 0;
    loop {
        let step = session.step().await?;
        for event in &session.history()[shown..] {
            if let Some(line) = narrator.render(&event.event) {
                println!("{line}");
            }
        }
        shown = session.history().len();
        if let StepResult::Finished(_) = step {
            break;
        }
    }

    // Decided outcomes were already narrated by the closing event.
    if let Some(outcome @ SessionOutcome::Stalemate { .. }) = session.outcome() {
        println!("{}", session_outcome(outcome));
    }

    if let Some(path) = export {
        let json = session.export_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing combat record to {}", path.display()))?;
        info!(path = %path.display(), "combat record exported");
        println!("Combat record written to {}", path.display());
    }
    Ok(())
}
