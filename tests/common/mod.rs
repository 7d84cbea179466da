#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const CASE_HEADER: &str = "CASE_NUMBER;CASE_STATUS;SOC_NAME;WORKSITE_STATE";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    /// Writing the same name again replaces the file.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a case file with [`CASE_HEADER`] and one row per
    /// `(status, occupation, state)` triple.
    pub fn write_cases(&self, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
        let mut contents = String::from(CASE_HEADER);
        for (idx, (status, occupation, state)) in rows.iter().enumerate() {
            contents.push_str(&format!("\nI-{idx};{status};{occupation};{state}"));
        }
        contents.push('\n');
        self.write(name, &contents)
    }
}

/// The ten certified rows whose worksite states are
/// `FL, FL, AL, CA, DE, GA, MD, NJ, TX, WA`.
pub fn ten_state_rows() -> Vec<(&'static str, &'static str, &'static str)> {
    ["FL", "FL", "AL", "CA", "DE", "GA", "MD", "NJ", "TX", "WA"]
        .into_iter()
        .enumerate()
        .map(|(idx, state)| {
            let occupation = if idx % 3 == 0 {
                "SOFTWARE DEVELOPERS, APPLICATIONS"
            } else {
                "COMPUTER SYSTEMS ANALYSTS"
            };
            ("CERTIFIED", occupation, state)
        })
        .collect()
}
