use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway data directory for one test
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    /// Create a fresh home and run `td init` in it
    pub fn init() -> Self {
        let home = Self::empty();
        home.cmd().arg("init").assert().success();
        home
    }

    /// Create a fresh home without initializing
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// A td command pointed at this home, isolated from the caller's env
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("td").expect("td binary");
        cmd.env("TD_DATA_DIR", self.dir.path());
        cmd.env_remove("TD_ACCOUNT");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Sign up an account (implicitly logs in)
    pub fn signup(&self, username: &str, password: &str) {
        self.cmd()
            .args(["signup", username, "--password", password])
            .assert()
            .success();
    }

    /// Create a task and return its id
    pub fn create_task(&self, title: &str, description: &str, priority: &str) -> String {
        let output = self
            .cmd()
            .args([
                "task",
                "new",
                title,
                "--description",
                description,
                "--priority",
                priority,
                "--json",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: serde_json::Value =
            serde_json::from_slice(&output).expect("task new json output");
        value["data"]["task"]["id"]
            .as_str()
            .expect("task id in output")
            .to_string()
    }

    pub fn tasks_file(&self, account: &str) -> PathBuf {
        self.dir.path().join("tasks").join(format!("{account}.json"))
    }
}
