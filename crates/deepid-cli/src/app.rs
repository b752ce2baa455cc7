use anyhow::Result;
use console::style;
use deepid_core::config::API_KEY_ENV_VAR;
use deepid_core::{DeepIdClient, Settings};

use crate::args::ScanArgs;

/// Apply per-run flags on top of stored settings
pub fn apply_overrides(settings: &mut Settings, args: &ScanArgs) {
    if let Some(env) = args.environment {
        settings.environment = env;
    }
    if let Some(url) = &args.api_url {
        settings.api_url = Some(url.clone());
    }
    if let Some(max_retries) = args.max_retries {
        settings.max_retries = max_retries;
    }
    if let Some(delay) = args.retry_delay {
        settings.retry_delay_secs = delay;
    }
    if let Some(dir) = &args.results_dir {
        settings.results_dir = dir.clone();
    }
    if args.run_description {
        settings.run_description = true;
    }
}

/// Build the API client, or explain how to configure a key and exit
pub fn create_client(settings: &Settings) -> Result<DeepIdClient> {
    let Some(api_key) = settings.get_api_key() else {
        eprintln!("Error: No DeepID API key configured.");
        eprintln!("\nSet your key with:");
        eprintln!("  deepid config --api-key YOUR_KEY\n");
        eprintln!("Or set the {} environment variable.", API_KEY_ENV_VAR);
        std::process::exit(1);
    };

    DeepIdClient::new(&api_key, &settings.base_url())
}

/// Print a styled header
pub fn header(text: &str) {
    println!();
    println!("{}", style(text).bold().cyan());
    println!();
}

/// Print a success message
pub fn success(text: &str) {
    println!("{} {}", style("✓").green().bold(), text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepid_core::{Environment, Modality};
    use std::path::PathBuf;

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let mut settings = Settings {
            max_retries: 7,
            ..Default::default()
        };
        let args = ScanArgs {
            folder: Some(PathBuf::from("media")),
            only: Some(Modality::Image),
            retry_delay: Some(1),
            environment: Some(Environment::Staging),
            ..Default::default()
        };

        apply_overrides(&mut settings, &args);
        assert_eq!(settings.max_retries, 7);
        assert_eq!(settings.retry_delay_secs, 1);
        assert_eq!(settings.environment, Environment::Staging);
        assert!(!settings.run_description);
    }
}
