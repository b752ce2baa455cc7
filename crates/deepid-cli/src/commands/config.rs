use anyhow::Result;
use deepid_core::Settings;

use crate::app;
use crate::args::ConfigArgs;

pub fn run(args: ConfigArgs) -> Result<()> {
    let mut settings = Settings::load();
    let changed = apply(&mut settings, &args);

    if changed {
        settings.save()?;
        app::success(&format!("Settings saved to {}", Settings::path().display()));
    }
    if args.show || !changed {
        show(&settings);
    }
    Ok(())
}

/// Returns whether anything was modified
fn apply(settings: &mut Settings, args: &ConfigArgs) -> bool {
    let mut changed = false;

    if let Some(key) = &args.api_key {
        settings.api_key = Some(key.trim().to_string());
        changed = true;
    }
    if args.clear_api_key {
        settings.api_key = None;
        changed = true;
    }
    if let Some(env) = args.environment {
        settings.environment = env;
        changed = true;
    }
    if let Some(url) = &args.api_url {
        settings.api_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
        changed = true;
    }
    if let Some(max_retries) = args.max_retries {
        settings.max_retries = max_retries;
        changed = true;
    }
    if let Some(delay) = args.retry_delay {
        settings.retry_delay_secs = delay;
        changed = true;
    }
    if let Some(dir) = &args.results_dir {
        settings.results_dir = dir.clone();
        changed = true;
    }
    if let Some(enabled) = args.run_description {
        settings.run_description = enabled;
        changed = true;
    }

    changed
}

fn show(settings: &Settings) {
    let key = match (settings.masked_api_key(), settings.get_api_key()) {
        (Some(masked), _) => masked,
        (None, Some(_)) => format!("(from {})", deepid_core::config::API_KEY_ENV_VAR),
        (None, None) => "(not set)".to_string(),
    };

    println!("api key:         {key}");
    println!("environment:     {}", settings.environment);
    println!("api url:         {}", settings.base_url());
    println!("max retries:     {}", settings.max_retries);
    println!("retry delay:     {}s", settings.retry_delay_secs);
    println!("results dir:     {}", settings.results_dir.display());
    println!("run description: {}", settings.run_description);
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepid_core::Environment;

    #[test]
    fn test_no_flags_changes_nothing() {
        let mut settings = Settings::default();
        assert!(!apply(&mut settings, &ConfigArgs::default()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_flags_are_applied() {
        let mut settings = Settings {
            api_url: Some("http://localhost:9000".to_string()),
            ..Default::default()
        };
        let args = ConfigArgs {
            api_key: Some("  dk_test_key  ".to_string()),
            environment: Some(Environment::Staging),
            api_url: Some(String::new()),
            run_description: Some(true),
            ..Default::default()
        };

        assert!(apply(&mut settings, &args));
        assert_eq!(settings.api_key.as_deref(), Some("dk_test_key"));
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.api_url, None);
        assert!(settings.run_description);
    }
}
