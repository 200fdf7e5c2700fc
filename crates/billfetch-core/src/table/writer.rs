use crate::task::OutputResult;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

/// Fixed column order of the results table.
pub const OUTPUT_COLUMNS: [&str; 3] = ["siteName", "siteURL", "status"];

pub struct TableWriter;

impl TableWriter {
    /// Write the results table to a fresh file, one row per result in input
    /// order. Never overwrites: an existing destination is an error and the
    /// file is left untouched.
    pub fn to_file(path: &Path, results: &[OutputResult]) -> Result<()> {
        tracing::debug!("Writing results table to: {}", path.display());

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.to_path_buf()),
                _ => Error::Io(e),
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        writer.write_record(OUTPUT_COLUMNS)?;
        for result in results {
            let status = result.status.to_string();
            writer.write_record([
                result.site_name.as_str(),
                result.site_url.as_str(),
                status.as_str(),
            ])?;
        }
        writer.flush()?;

        tracing::info!(
            "Successfully wrote {} result row(s) to {}",
            results.len(),
            path.display()
        );
        Ok(())
    }
}
