use std::path::{Path, PathBuf};
use std::process::Command;

use crate::git::Repo;

/// A temporary git repository for testing.
///
/// Shells out to real `git` with isolated config so tests are unaffected
/// by local settings (GPG signing, aliases, hooks). A second repository can
/// be cloned from the first with [`TestRepo::clone_of`], giving a working
/// `origin` remote over the file transport — no network involved.
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    /// Create a git Command with isolated config (ignores global/system settings).
    fn git_command(dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir);
        cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
        cmd.env("GIT_CONFIG_SYSTEM", "/dev/null");
        cmd
    }

    fn configure_user(dir: &Path) {
        Self::git_command(dir)
            .args(["config", "user.email", "test@example.com"])
            .status()
            .expect("Failed to configure git email");
        Self::git_command(dir)
            .args(["config", "user.name", "Test User"])
            .status()
            .expect("Failed to configure git name");
    }

    /// Create a new repository on `master` with one committed file.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let status = Self::git_command(dir.path())
            .args(["init", "-b", "master"])
            .status()
            .expect("Failed to run git init");
        assert!(status.success(), "git init failed");

        Self::configure_user(dir.path());

        let fixture = Self { dir };
        fixture.commit_file("seed.txt", "seed", "Initial commit");
        fixture
    }

    /// Clone `origin` into a fresh temp dir; `origin` becomes the remote.
    pub fn clone_of(origin: &TestRepo) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let origin_path = origin.path().display().to_string();

        let status = Self::git_command(dir.path())
            .args(["clone", origin_path.as_str(), "."])
            .status()
            .expect("Failed to run git clone");
        assert!(status.success(), "git clone failed");

        Self::configure_user(dir.path());

        Self { dir }
    }

    /// Canonicalized repository path (resolves /var -> /private/var on macOS).
    pub fn path(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize path")
    }

    /// Handle used by the code under test.
    pub fn repo(&self) -> Repo {
        Repo::new(self.path())
    }

    /// Run `git <args>` in the fixture, asserting success, returning stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Self::git_command(&self.path())
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Write a file without committing (dirties the tree when tracked).
    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).expect("Failed to write file");
    }

    /// Write, stage, and commit a file. Returns the new HEAD sha.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> String {
        self.write_file(name, content);
        self.git(&["add", name]);
        self.git(&["commit", "-m", message]);
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Current HEAD sha.
    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Sha a revision expression resolves to.
    pub fn sha_of(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev]).trim().to_string()
    }
}
