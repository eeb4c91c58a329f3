// CSV output.
// Writes whole rows and flushes after each so an interrupted run leaves a parseable file.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fields::Field;

/// Row sink over any writer.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create or truncate the output file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Write one record and flush it through to the writer.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(row)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| Error::Other(err.to_string()))
    }
}

/// Header for flat mode: the field names in selection order.
pub fn flat_header(fields: &[Field]) -> Vec<String> {
    fields.iter().map(|f| f.as_str().to_string()).collect()
}

/// Header for evolution mode: each field for both sides of the pair, then
/// a delta column per selected stat.
pub fn evolution_header(fields: &[Field]) -> Vec<String> {
    let mut header: Vec<String> = fields
        .iter()
        .flat_map(|f| [format!("pre_evolution_{}", f), format!("evolution_{}", f)])
        .collect();
    header.extend(
        fields
            .iter()
            .filter(|f| f.is_stat())
            .map(|f| format!("{}_delta", f)),
    );
    header
}

/// First `max_lines` lines of a written CSV file.
pub fn preview(path: &Path, max_lines: usize) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .take(max_lines)
        .map(str::to_string)
        .collect())
}
