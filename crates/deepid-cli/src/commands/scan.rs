use anyhow::Result;
use deepid_core::{BatchOptions, BatchRunner, ResultStatus, Settings};

use crate::app;
use crate::args::ScanArgs;
use crate::progress::ConsoleProgress;

pub fn run(args: ScanArgs) -> Result<()> {
    let Some(folder) = args.folder.clone() else {
        anyhow::bail!("No folder given. Usage: deepid <FOLDER>");
    };
    if !folder.is_dir() {
        eprintln!("Error: {} is not a valid folder.", folder.display());
        std::process::exit(1);
    }

    let mut settings = Settings::load();
    app::apply_overrides(&mut settings, &args);
    let client = app::create_client(&settings)?;

    let options = BatchOptions {
        poll: settings.poll_config(),
        results_dir: settings.results_dir.clone(),
        run_description: settings.run_description,
        only: args.only,
    };
    deepid_core::verbose!(
        "Using {} ({}), up to {} status checks every {}s ({}s max per file)",
        client.base_url(),
        settings.environment,
        options.poll.max_retries,
        options.poll.retry_delay.as_secs(),
        options.poll.max_wait().as_secs()
    );

    let summary = BatchRunner::new(&client, options, &ConsoleProgress).process_folder(&folder)?;

    println!(
        "\n{} file(s): {} processed, {} without results, {} failed submissions, {} errors ({} skipped)",
        summary.rows.len(),
        summary.processed(),
        summary.count(&ResultStatus::NoResults),
        summary.count(&ResultStatus::SubmissionFailed),
        summary.errors(),
        summary.skipped
    );
    Ok(())
}
