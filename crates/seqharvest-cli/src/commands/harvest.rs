use crate::cli::Cli;
use crate::config::PartialHarvestConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use seqharvest::{
    engine::progress::ProgressReporter,
    workflows::{self, harvest::HarvestSummary},
};
use tracing::{info, warn};

pub fn run(args: &Cli) -> Result<()> {
    let partial_config = PartialHarvestConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let final_config = partial_config.merge_with_cli(args)?;

    let progress_handler = CliProgressHandler::new(!(args.no_progress || args.quiet));
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Harvesting {}...", final_config.input_path.display());
    info!("Invoking the core harvest workflow...");

    let result = workflows::harvest::run(&final_config, &reporter);
    progress_handler.clear();
    let summary = result?;

    info!(
        "Workflow finished with {} distinct variant(s).",
        summary.variants
    );
    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &HarvestSummary) {
    let stats = &summary.stats;
    println!(
        "Parsed {} record(s): {} accepted, {} rejected ({} length mismatch, {} missing residues, {} unscored).",
        stats.records,
        stats.accepted,
        stats.rejected(),
        stats.length_mismatches,
        stats.missing_residues,
        stats.unscored
    );

    match (summary.master_len, summary.region_count) {
        (Some(len), Some(regions)) => println!(
            "Master sequence: {} residue(s), {} variable region(s).",
            len, regions
        ),
        _ => {
            warn!("The input contained no SEQUENCE line.");
            println!("Warning: no master sequence was found in the input.");
        }
    }

    println!(
        "✓ {} variant(s) written to: {}",
        summary.variants,
        summary.json_path.display()
    );
    println!(
        "✓ {} shortlisted variant(s) written to: {}",
        summary.shortlisted,
        summary.shortlist_path.display()
    );

    if let Some(best) = &summary.best {
        println!(
            "  Best variant {} (Score: {:.3}, seen {} time(s))",
            best.key, best.min_score, best.observations
        );
    } else {
        println!("Warning: no record was accepted; both outputs are empty.");
    }
}
