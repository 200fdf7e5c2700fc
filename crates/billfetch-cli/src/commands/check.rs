use anyhow::Result;
use billfetch_core::Error;
use billfetch_core::table::TableReader;
use billfetch_core::validate::validate_rows;
use console::style;
use std::path::Path;

/// Read and validate a table without touching directories or running any
/// agent.
pub fn execute(file: &Path) -> Result<()> {
    let rows = TableReader::from_file(file)?;

    match validate_rows(&rows) {
        Ok(tasks) => {
            println!(
                "{} {} task(s) in {}",
                style("Table is valid:").green().bold(),
                tasks.len(),
                file.display()
            );
            Ok(())
        }
        Err(Error::Validation(errors)) => {
            super::report_validation_errors(&errors);
            anyhow::bail!("validation failed with {} error(s)", errors.len());
        }
        Err(e) => Err(e.into()),
    }
}
