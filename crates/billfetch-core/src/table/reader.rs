use crate::task::RawRow;
use crate::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct TableReader;

impl TableReader {
    /// Read a header-first CSV file into one raw row per data line,
    /// preserving input order.
    pub fn from_file(path: &Path) -> Result<Vec<RawRow>> {
        tracing::debug!("Reading input table from: {}", path.display());

        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Parse a header-first CSV table from any reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Vec<RawRow>> {
        // flexible: a short row surfaces as a missing field during
        // validation instead of a hard parse error here.
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<RawRow>() {
            rows.push(record?);
        }

        tracing::info!("Successfully read {} data row(s)", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
siteName,siteURL,username,password,navHelper
Acme,https://acme.test,u,p,download latest invoice
Globex,https://globex.test,admin,hunter2,download the bill
";

    #[test]
    fn test_read_rows_in_order() {
        let rows = TableReader::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["siteName"], "Acme");
        assert_eq!(rows[1]["siteName"], "Globex");
        assert_eq!(rows[1]["password"], "hunter2");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let err = TableReader::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::NotFound(p) if p == path));
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let rows = TableReader::from_file(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let rows =
            TableReader::from_reader("siteName,siteURL,username,password,navHelper\n".as_bytes())
                .unwrap();
        assert!(rows.is_empty());
    }
}
