//! Shared helpers for the `dsreg` integration tests.
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const CLEAN_DATASETS: &str = r#"[
    {"id": "dataset-1", "title": "Census Microdata", "provider": "provider-1"},
    {"id": "dataset-2", "title": "Household Survey", "provider": "provider-2",
     "url": "https://example.org/surveys/household",
     "original": {"joins_to": ["dataset-1"]}}
]"#;

pub const CLEAN_PROVIDERS: &str = r#"[
    {"id": "provider-1", "title": "Statistics Office"},
    {"id": "provider-2", "title": "Survey Institute", "ror": "https://ror.org/05abcde12"}
]"#;

/// A registry written to a temporary directory.
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new(datasets: &str, providers: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("datasets.json"), datasets).expect("write datasets");
        std::fs::write(dir.path().join("providers.json"), providers).expect("write providers");
        Self { dir }
    }

    pub fn clean() -> Self {
        Self::new(CLEAN_DATASETS, CLEAN_PROVIDERS)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("read fixture")
    }

    /// Runs `dsreg` with the fixture directory as the working directory.
    pub fn run(&self, args: &[&str]) -> Output {
        dsreg(self.dir.path(), args)
    }
}

/// Runs the `dsreg` binary in `cwd` with a clean environment.
pub fn dsreg(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dsreg"))
        .args(args)
        .current_dir(cwd)
        .env_remove("DSREG_DATASETS")
        .env_remove("DSREG_PROVIDERS")
        .env_remove("DSREG_REVISION")
        .env_remove("DSREG_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("run dsreg")
}

pub fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

pub fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}
