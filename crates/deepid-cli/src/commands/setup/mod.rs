//! First-run setup wizard
//!
//! Walks through the API key, environment and polling limits, then saves
//! everything to the settings file.

mod interactive;

use anyhow::Result;
use deepid_core::{Environment, Settings};

use crate::app;

pub fn run() -> Result<()> {
    app::header("deepid setup");
    let mut settings = Settings::load();

    // Step 1: API key
    let replace_key = match settings.masked_api_key() {
        Some(masked) => interactive::confirm(&format!("Replace stored API key ({masked})?"), false)?,
        None => true,
    };
    if replace_key {
        settings.api_key = Some(interactive::password("DeepID API key")?.trim().to_string());
    }

    // Step 2: environment
    let environments = Environment::all();
    let current = environments
        .iter()
        .position(|e| *e == settings.environment)
        .unwrap_or(0);
    let choice = interactive::select("Which environment?", environments, current)?;
    settings.environment = environments[choice];

    // Step 3: polling limits
    settings.max_retries = interactive::input("Status checks per file", settings.max_retries)?;
    settings.retry_delay_secs =
        interactive::input("Seconds between status checks", settings.retry_delay_secs)?;
    settings.run_description =
        interactive::confirm("Request written explanations?", settings.run_description)?;

    settings.save()?;

    println!();
    app::success(&format!(
        "Configuration saved to {}. Run 'deepid <folder>' to analyze media.",
        Settings::path().display()
    ));
    Ok(())
}
