use super::traits::TableExporter;
use crate::core::models::table::ScoreTable;
use std::io::{self, Write};
use thiserror::Error;

pub const DEFAULT_TOP_N: usize = 100;
pub const DEFAULT_SHORTLIST_REGIONS: usize = 2;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "Variant {key} has {found} region(s), but the shortlist schema expects {expected}"
    )]
    RegionCount {
        key: String,
        expected: usize,
        found: usize,
    },
}

/// Writes every variant and its full score list as a single JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl TableExporter for JsonExporter {
    type Error = ExportError;

    fn write_to(&self, table: &ScoreTable, writer: &mut impl Write) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut *writer, table)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Writes the best-scoring variants as `name,seq1,...,seqK` rows, ranked by the minimum
/// observed score.
///
/// Every shortlisted variant must have exactly `regions` regions; otherwise the export
/// fails with [`ExportError::RegionCount`] before any row is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortlistExporter {
    pub top_n: usize,
    pub regions: usize,
}

impl Default for ShortlistExporter {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            regions: DEFAULT_SHORTLIST_REGIONS,
        }
    }
}

impl ShortlistExporter {
    pub fn header(&self) -> Vec<String> {
        std::iter::once("name".to_string())
            .chain((1..=self.regions).map(|i| format!("seq{}", i)))
            .collect()
    }
}

impl TableExporter for ShortlistExporter {
    type Error = ExportError;

    fn write_to(&self, table: &ScoreTable, writer: &mut impl Write) -> Result<(), Self::Error> {
        self.validate(table)?;
        let ranked = table.ranked();
        let shortlist = &ranked[..ranked.len().min(self.top_n)];

        let mut csv_writer = csv::Writer::from_writer(&mut *writer);
        csv_writer.write_record(self.header())?;
        for entry in shortlist {
            let name = format!("seq_{}", entry.rank);
            csv_writer.write_record(
                std::iter::once(name.as_str())
                    .chain(entry.key.regions().iter().map(String::as_str)),
            )?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn validate(&self, table: &ScoreTable) -> Result<(), Self::Error> {
        let ranked = table.ranked();
        match ranked
            .iter()
            .take(self.top_n)
            .find(|entry| entry.key.region_count() != self.regions)
        {
            Some(bad) => Err(ExportError::RegionCount {
                key: bad.key.to_string(),
                expected: self.regions,
                found: bad.key.region_count(),
            }),
            None => Ok(()),
        }
    }
}
