#![allow(dead_code)]

use git_fuse::commands::fuse::{self, FuseOptions, FuseSummary};
use git_fuse::config::UnresolvedParentPolicy;
use git_fuse::error::GitFuseError;
use git_fuse::git::find_repository_in_path;
use git_fuse::git::repository::Repository as FuseRepository;
use git2::{Repository, RepositoryInitOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestRepo {
    // Removed with the repository when the test ends
    _dir: TempDir,
    path: PathBuf,
}

impl TestRepo {
    /// Empty repository on `master` with a test identity configured
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("repo");

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo =
            Repository::init_opts(&path, &opts).expect("failed to initialize git2 repository");
        let mut config = repo.config().expect("failed to open repository config");
        config
            .set_str("user.name", "Test User")
            .expect("failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("failed to set commit.gpgsign");

        Self { _dir: dir, path }
    }

    /// Repository whose first commit adds a file named `name` containing `name`,
    /// with commit message `name`.
    pub fn with_initial_commit(name: &str) -> Self {
        let repo = Self::new();
        repo.commit_file(name, name, name);
        repo
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn git(&self, args: &[&str]) -> Result<String, String> {
        self.git_with_env(args, &[])
    }

    pub fn git_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<String, String> {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.path).args(args);
        for (key, value) in envs {
            command.env(key, value);
        }
        let output = command
            .output()
            .unwrap_or_else(|_| panic!("Failed to execute git command: {:?}", args));

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(file_path, contents).expect("failed to write file");
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.path.join(name))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", name, e))
    }

    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> String {
        self.write_file(name, contents);
        self.git(&["add", name]).expect("git add should succeed");
        self.git(&["commit", "-m", message])
            .expect("git commit should succeed");
        self.head_sha()
    }

    pub fn head_sha(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
            .expect("rev-parse HEAD should succeed")
            .trim()
            .to_string()
    }

    pub fn open(&self) -> Repository {
        Repository::open(&self.path).expect("failed to open git2 repository")
    }

    pub fn fuse_repo(&self) -> FuseRepository {
        find_repository_in_path(&self.path_str()).expect("failed to open repository handle")
    }

    /// Fuse `branch` of `source` under `dir` with progress captured in a string
    pub fn fuse(
        &self,
        source: &TestRepo,
        branch: &str,
        dir: &str,
    ) -> (Result<FuseSummary, GitFuseError>, String) {
        self.fuse_with_policy(source, branch, dir, UnresolvedParentPolicy::Abort)
    }

    pub fn fuse_with_policy(
        &self,
        source: &TestRepo,
        branch: &str,
        dir: &str,
        policy: UnresolvedParentPolicy,
    ) -> (Result<FuseSummary, GitFuseError>, String) {
        let options = FuseOptions {
            source: source.path_str(),
            branch: branch.to_string(),
            target_dir: dir.to_string(),
            unresolved_parents: policy,
        };
        let mut output: Vec<u8> = Vec::new();
        let result = fuse::run(&self.fuse_repo(), &options, &mut output);
        (result, String::from_utf8_lossy(&output).to_string())
    }

    /// History of HEAD rendered as `message{parent, parent}`, parents sorted by
    /// their rendering so the result does not depend on parent order.
    pub fn graph(&self) -> String {
        let repo = self.open();
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("HEAD should point at a commit");
        render_graph(&head)
    }
}

fn render_graph(commit: &git2::Commit<'_>) -> String {
    let mut parents: Vec<String> = commit.parents().map(|p| render_graph(&p)).collect();
    parents.sort();
    format!(
        "{}{{{}}}",
        commit.message().unwrap_or("").trim_end(),
        parents.join(", ")
    )
}

/// Source repository with a split and a merge:
///
/// ```text
/// source --- add a ---\
///       \              merged   (master)
///        --- add b ---/
/// ```
///
/// `file` ends up as "a\nb\n" on master.
pub fn merge_source_repo() -> TestRepo {
    let source = TestRepo::with_initial_commit("source");

    source.git(&["checkout", "-b", "a"]).unwrap();
    source.commit_file("file", "a\n", "add a");

    source.git(&["checkout", "master"]).unwrap();
    source.commit_file("file", "b\n", "add b");

    // add/add conflict on `file`, resolved by hand
    let _ = source.git(&["merge", "a"]);
    source.write_file("file", "a\nb\n");
    source.git(&["commit", "-a", "-m", "merged"]).unwrap();

    source
}

pub fn path_exists(root: &Path, relative: &str) -> bool {
    root.join(relative).exists()
}
