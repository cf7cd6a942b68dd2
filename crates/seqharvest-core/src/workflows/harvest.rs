use crate::core::io::export::JsonExporter;
use crate::core::io::silent::{ParseStats, ParsedSilentFile, SilentError, SilentParser};
use crate::core::io::traits::TableExporter;
use crate::core::models::table::ScoreTable;
use crate::engine::config::HarvestConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// The best-ranked variant of a harvest, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct BestVariant {
    pub key: String,
    pub min_score: f64,
    pub observations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSummary {
    pub stats: ParseStats,
    pub master_len: Option<usize>,
    pub region_count: Option<usize>,
    pub variants: usize,
    pub shortlisted: usize,
    pub best: Option<BestVariant>,
    pub json_path: PathBuf,
    pub shortlist_path: PathBuf,
}

/// Reads the configured silent file, aggregates its models, and writes the JSON
/// aggregate followed by the ranked shortlist.
///
/// A parse failure aborts before either artifact is written. A shortlist failure (e.g. a
/// region-count mismatch) leaves the already written JSON in place.
#[instrument(skip_all, name = "harvest_workflow")]
pub fn run(config: &HarvestConfig, reporter: &ProgressReporter) -> Result<HarvestSummary, EngineError> {
    // === Phase 1: Stream the silent file into the score table ===
    reporter.report(Progress::PhaseStart { name: "Parsing" });
    info!("Reading silent file {:?}", config.input_path);

    let input_error = |source: SilentError| EngineError::Input {
        path: config.input_path.clone(),
        source,
    };
    let parsed = SilentParser::read_from_path_with(&config.input_path, |outcome| {
        reporter.report(Progress::RecordFlushed(outcome))
    })
    .map_err(input_error)?;
    reporter.report(Progress::PhaseFinish);

    let ParsedSilentFile {
        regions,
        table,
        stats,
    } = parsed;
    info!(
        "Parsed {} line(s): {} record(s), {} accepted, {} rejected, {} distinct variant(s) from {} observation(s).",
        stats.lines,
        stats.records,
        stats.accepted,
        stats.rejected(),
        table.len(),
        table.total_observations()
    );
    if regions.is_none() {
        warn!("No SEQUENCE line found; no record could be matched to a master sequence.");
    }
    if table.is_empty() {
        warn!("No records were accepted; both artifacts will be empty.");
        reporter.report(Progress::Message(
            "No records were accepted; both artifacts will be empty.".to_string(),
        ));
    }

    // === Phase 2: Write the full aggregate, then the shortlist ===
    reporter.report(Progress::PhaseStart { name: "Exporting" });
    write_artifacts(config, &table)?;
    reporter.report(Progress::PhaseFinish);

    let ranked = table.ranked();
    let best = ranked.first().map(|entry| BestVariant {
        key: entry.key.to_string(),
        min_score: entry.min_score,
        observations: entry.observations,
    });

    Ok(HarvestSummary {
        stats,
        master_len: regions.as_ref().map(|r| r.master_len()),
        region_count: regions.as_ref().map(|r| r.len()),
        variants: table.len(),
        shortlisted: ranked.len().min(config.shortlist.top_n),
        best,
        json_path: config.output.json_path.clone(),
        shortlist_path: config.output.shortlist_path.clone(),
    })
}

/// Parses `reader` with a fresh parser, reporting each record flush.
pub fn parse_stream(
    reader: &mut impl BufRead,
    reporter: &ProgressReporter,
) -> Result<ParsedSilentFile, SilentError> {
    SilentParser::read_from_with(reader, |outcome| {
        reporter.report(Progress::RecordFlushed(outcome))
    })
}

fn write_artifacts(config: &HarvestConfig, table: &ScoreTable) -> Result<(), EngineError> {
    let json_path = &config.output.json_path;
    debug!("Writing {} variant(s) to {:?}", table.len(), json_path);
    JsonExporter
        .write_to_path(table, json_path)
        .map_err(|source| EngineError::Export {
            artifact: "JSON aggregate",
            path: json_path.clone(),
            source,
        })?;

    let shortlist_path = &config.output.shortlist_path;
    debug!(
        "Writing top {} variant(s) with {} region(s) to {:?}",
        config.shortlist.top_n, config.shortlist.regions, shortlist_path
    );
    config
        .shortlist
        .exporter()
        .write_to_path(table, shortlist_path)
        .map_err(|source| EngineError::Export {
            artifact: "shortlist",
            path: shortlist_path.clone(),
            source,
        })?;
    Ok(())
}
