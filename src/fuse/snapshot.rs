use crate::error::GitFuseError;
use crate::git::repository::{Repository, TreeEntry};

/// The target branch as it was before fusing. Captured once; every rewritten
/// commit fuses against these same base entries.
#[derive(Debug, Clone)]
pub struct TargetHeadSnapshot {
    /// Branch HEAD pointed at, e.g. `refs/heads/master`
    pub refname: String,
    pub head: String,
    pub tree: String,
    pub entries: Vec<TreeEntry>,
}

impl TargetHeadSnapshot {
    pub fn capture(repo: &Repository) -> Result<Self, GitFuseError> {
        let head_ref = repo.head()?;
        if !head_ref.is_branch() {
            return Err(GitFuseError::NoTargetBranch(
                "HEAD is detached; check out the branch to fuse into".to_string(),
            ));
        }
        let refname = head_ref.name().to_string();
        let head = head_ref.target()?.ok_or_else(|| {
            GitFuseError::NoTargetBranch(format!("{} has no commits yet", refname))
        })?;

        let tree = repo.find_commit(head.clone())?.tree()?;
        let entries = tree.entries()?;

        Ok(TargetHeadSnapshot {
            refname,
            head,
            tree: tree.id(),
            entries,
        })
    }
}
