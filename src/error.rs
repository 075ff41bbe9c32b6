use std::fmt;

#[derive(Debug)]
pub enum GitFuseError {
    #[cfg(feature = "test-support")]
    GitError(git2::Error),
    IoError(std::io::Error),
    /// Errors from invoking the git CLI that exited with a non-zero status.
    /// Fetch and ls-remote failures (transport errors) surface here unmodified.
    GitCliError {
        code: Option<i32>,
        stderr: String,
        args: Vec<String>,
    },
    /// The source remote does not advertise the requested branch
    BranchNotFound {
        source: String,
        branch: String,
    },
    /// A source commit has a parent that was never rewritten
    UnresolvedParent {
        commit: String,
        parent: String,
    },
    InvalidTargetDir(String),
    /// HEAD is detached or points at an unborn branch
    NoTargetBranch(String),
    JsonError(serde_json::Error),
    FromUtf8Error(std::string::FromUtf8Error),
    Generic(String),
}

impl fmt::Display for GitFuseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "test-support")]
            GitFuseError::GitError(e) => write!(f, "Git error: {}", e),
            GitFuseError::IoError(e) => write!(f, "IO error: {}", e),
            GitFuseError::GitCliError { code, stderr, args } => match code {
                Some(c) => write!(
                    f,
                    "Git CLI ({}) failed with exit code {}: {}",
                    args.join(" "),
                    c,
                    stderr.trim_end()
                ),
                None => write!(
                    f,
                    "Git CLI ({}) failed: {}",
                    args.join(" "),
                    stderr.trim_end()
                ),
            },
            GitFuseError::BranchNotFound { source, branch } => {
                write!(f, "no branch '{}' in source repository {}", branch, source)
            }
            GitFuseError::UnresolvedParent { commit, parent } => write!(
                f,
                "commit {} has parent {} which was not rewritten",
                commit, parent
            ),
            GitFuseError::InvalidTargetDir(e) => write!(f, "invalid target directory: {}", e),
            GitFuseError::NoTargetBranch(e) => write!(f, "no target branch: {}", e),
            GitFuseError::JsonError(e) => write!(f, "JSON error: {}", e),
            GitFuseError::FromUtf8Error(e) => write!(f, "From UTF-8 error: {}", e),
            GitFuseError::Generic(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GitFuseError {}

#[cfg(feature = "test-support")]
impl From<git2::Error> for GitFuseError {
    fn from(err: git2::Error) -> Self {
        GitFuseError::GitError(err)
    }
}

impl From<std::io::Error> for GitFuseError {
    fn from(err: std::io::Error) -> Self {
        GitFuseError::IoError(err)
    }
}

impl From<serde_json::Error> for GitFuseError {
    fn from(err: serde_json::Error) -> Self {
        GitFuseError::JsonError(err)
    }
}

impl From<std::string::FromUtf8Error> for GitFuseError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        GitFuseError::FromUtf8Error(err)
    }
}
