use crate::core::models::table::ScoreTable;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for writing a score table to an output artifact.
///
/// Implementors carry their own output options (e.g. how many entries to keep) and
/// handle the format-specific serialization.
pub trait TableExporter {
    /// The error type for export operations.
    type Error: Error + From<io::Error>;

    /// Writes the score table to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the writer reports an I/O error.
    fn write_to(&self, table: &ScoreTable, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Checks that the table can be exported without touching any output.
    ///
    /// The default accepts every table.
    fn validate(&self, _table: &ScoreTable) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Writes the score table to a file path, creating or truncating the file.
    ///
    /// The table is validated first, so a rejected table leaves an existing file untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the file cannot be created, or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        &self,
        table: &ScoreTable,
        path: P,
    ) -> Result<(), Self::Error> {
        self.validate(table)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(table, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
