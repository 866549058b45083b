use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("element").expect("Failed to find element binary");

        // Set the database path via environment variable
        cmd.env("ELEMENT_DATABASE_PATH", &self.db_path);

        cmd
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a command and returns its stdout as a string
    pub fn run_and_read(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run command");
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

/// Pulls the first UUID out of command output (add commands print the full
/// task ID on creation).
pub fn extract_uuid(output: &str) -> Option<String> {
    let is_uuid_char = |c: char| c.is_ascii_hexdigit() || c == '-';
    let chars: Vec<char> = output.chars().collect();

    let mut start = 0;
    while start < chars.len() {
        if is_uuid_char(chars[start]) {
            let mut end = start;
            while end < chars.len() && is_uuid_char(chars[end]) {
                end += 1;
            }
            let candidate: String = chars[start..end].iter().collect();
            if candidate.len() == 36 && candidate.matches('-').count() == 4 {
                return Some(candidate);
            }
            start = end;
        }
        start += 1;
    }
    None
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output indicates successful task creation
    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created task")
            .or(predicate::str::contains("Created recurring task"))
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
