use crate::{Error, Result};
use std::path::{Path, PathBuf};

pub const INPUT_DIR: &str = "input";
pub const OUTPUT_DIR: &str = "output";
pub const INPUT_FILENAME: &str = "source.csv";
pub const OUTPUT_FILENAME: &str = "output.csv";

/// Identifier scoping one pipeline run to its own output subdirectory.
///
/// Must be unique across runs; the generated form pairs the wall clock with a
/// random suffix so rapid repeated invocations cannot collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId(String);

impl RunId {
    pub fn generate() -> Self {
        let seconds = chrono::Utc::now().timestamp();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{seconds}-{}", &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory layout of one run: `<base>/input` plus a fresh
/// `<base>/output/<run_id>` subdirectory.
#[derive(Debug, Clone)]
pub struct RunLayout {
    input_dir: PathBuf,
    run_dir: PathBuf,
}

impl RunLayout {
    /// Create the input, output and run-scoped directories under `base`.
    pub fn prepare(base: &Path, run_id: &RunId) -> Result<Self> {
        let input_dir = base.join(INPUT_DIR);
        let output_dir = base.join(OUTPUT_DIR);
        let run_dir = output_dir.join(run_id.as_str());

        std::fs::create_dir_all(&input_dir)
            .map_err(|e| Error::Layout(format!("creating '{}': {e}", input_dir.display())))?;

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(Error::Layout(format!(
                "output path '{}' exists but is not a directory",
                output_dir.display()
            )));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| Error::Layout(format!("creating '{}': {e}", output_dir.display())))?;
        std::fs::create_dir_all(&run_dir)
            .map_err(|e| Error::Layout(format!("creating '{}': {e}", run_dir.display())))?;

        tracing::debug!("Run directory: {}", run_dir.display());
        Ok(Self { input_dir, run_dir })
    }

    pub fn input_file(&self) -> PathBuf {
        self.input_dir.join(INPUT_FILENAME)
    }

    /// Run-scoped output directory; also the parent of per-site download
    /// directories.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn output_file(&self) -> PathBuf {
        self.run_dir.join(OUTPUT_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_directories() {
        let base = tempfile::tempdir().unwrap();
        let run_id = RunId::from("12345-abcd".to_string());

        let layout = RunLayout::prepare(base.path(), &run_id).unwrap();

        assert!(base.path().join(INPUT_DIR).is_dir());
        assert!(base.path().join(OUTPUT_DIR).join("12345-abcd").is_dir());
        assert_eq!(layout.input_file(), base.path().join("input/source.csv"));
        assert_eq!(
            layout.output_file(),
            base.path().join("output/12345-abcd/output.csv")
        );
    }

    #[test]
    fn test_prepare_is_idempotent_for_existing_dirs() {
        let base = tempfile::tempdir().unwrap();
        let run_id = RunId::from("run".to_string());

        RunLayout::prepare(base.path(), &run_id).unwrap();
        RunLayout::prepare(base.path(), &run_id).unwrap();
    }

    #[test]
    fn test_output_path_as_file_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        std::fs::write(base.path().join(OUTPUT_DIR), b"in the way").unwrap();

        let err = RunLayout::prepare(base.path(), &RunId::generate()).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn test_generated_run_ids_are_unique() {
        let a = RunId::generate();
        let b = RunId::generate();
        assert_ne!(a, b);
    }
}
