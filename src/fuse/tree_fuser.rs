use std::collections::{BTreeMap, HashMap};

use crate::error::GitFuseError;
use crate::git::repository::{Repository, TreeEntry};

/// Reject names that cannot be a single top-level tree entry
pub fn validate_target_dir(name: &str) -> Result<(), GitFuseError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name must not be . or ..")
    } else if name.contains('/') || name.contains('\\') {
        Some("name must be a single path component")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else if name.eq_ignore_ascii_case(".git") {
        Some(".git is reserved")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(GitFuseError::InvalidTargetDir(format!(
            "'{}': {}",
            name, reason
        ))),
        None => Ok(()),
    }
}

/// Entries of a fused tree: every base entry verbatim, plus `dir` pointing at
/// `source_tree`. A base entry named `dir` is replaced by the subdirectory.
pub fn fused_entries(base: &[TreeEntry], dir: &str, source_tree: &str) -> Vec<TreeEntry> {
    let mut by_name: BTreeMap<&str, TreeEntry> = base
        .iter()
        .map(|entry| (entry.name.as_str(), entry.clone()))
        .collect();
    by_name.insert(dir, TreeEntry::subtree(dir, source_tree));
    by_name.into_values().collect()
}

/// Builds fused trees against one fixed base tree.
///
/// Results are memoized by source tree id: the fused tree is a pure function of
/// (source tree, directory, base), and the latter two never change for a fuser.
pub struct TreeFuser<'a> {
    repo: &'a Repository,
    target_dir: String,
    base: Vec<TreeEntry>,
    cache: HashMap<String, String>,
}

impl<'a> TreeFuser<'a> {
    pub fn new(
        repo: &'a Repository,
        target_dir: &str,
        base: Vec<TreeEntry>,
    ) -> Result<Self, GitFuseError> {
        validate_target_dir(target_dir)?;
        Ok(TreeFuser {
            repo,
            target_dir: target_dir.to_string(),
            base,
            cache: HashMap::new(),
        })
    }

    pub fn target_dir(&self) -> &str {
        &self.target_dir
    }

    /// True when the base tree already has an entry the subdirectory will replace
    pub fn shadows_base_entry(&self) -> bool {
        self.base.iter().any(|entry| entry.name == self.target_dir)
    }

    pub fn fuse(&mut self, source_tree: &str) -> Result<String, GitFuseError> {
        if let Some(fused) = self.cache.get(source_tree) {
            return Ok(fused.clone());
        }
        let entries = fused_entries(&self.base, &self.target_dir, source_tree);
        let fused = self.repo.mktree(&entries)?;
        self.cache.insert(source_tree.to_string(), fused.clone());
        Ok(fused)
    }
}
