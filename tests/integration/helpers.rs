use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Scratch directory holding config files for one test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// The binary, run inside the workspace with colors and env overrides off.
    #[allow(deprecated)]
    pub fn errflags(&self) -> Command {
        let mut cmd = Command::cargo_bin("errflags").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("ERRFLAGS_LOG_LEVEL")
            .env_remove("ERRFLAGS_LOG_OUTPUT")
            .env_remove("ERRFLAGS_LOG_COLORS");
        cmd
    }
}
