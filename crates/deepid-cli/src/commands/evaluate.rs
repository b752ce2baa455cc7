use anyhow::Result;
use deepid_core::evaluate::{self, EvaluationReport};
use deepid_core::verbose::is_quiet;

use crate::args::EvaluateArgs;

pub fn run(args: EvaluateArgs) -> Result<()> {
    let records = evaluate::load_records(&args.input)?;
    let report = evaluate::evaluate(&records)?;

    let output = args
        .output
        .unwrap_or_else(|| evaluate::default_output_dir(&args.input));
    let written = evaluate::write_report(&report, &output)?;

    if !is_quiet() {
        print_report(&report);
        for path in &written {
            println!("  {}", path.display());
        }
    }
    println!("Reports saved in folder: {}", output.display());
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("Records:            {}", report.records);
    println!("ROC AUC:            {:.3}", report.roc_auc);
    println!("Average precision:  {:.3}", report.average_precision);
    println!("Detection accuracy: {:.3}", report.detection.accuracy());
    if let Some(generator) = &report.generator {
        println!(
            "Generator accuracy: {:.3} over {} generators",
            generator.accuracy(),
            generator.labels.len()
        );
    }
}
