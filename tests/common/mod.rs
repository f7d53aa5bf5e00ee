#![allow(dead_code)]

pub mod mock_source;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::fs;
use tempfile::TempDir;

/// Write `lines` to `dir/name`, one per line
pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Isolated environment for running the CLI binary
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        Self {
            temp_dir,
            config_dir,
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("addrmatch").join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.config_dir.join("addrmatch").join("audit.log")
    }

    /// Run the binary with config isolated under the temp dir
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_addrmatch"))
            .args(args)
            .env("XDG_CONFIG_HOME", &self.config_dir)
            .env("ADDRMATCH_CONFIG", self.config_file())
            .output()
            .expect("Failed to run addrmatch")
    }
}
