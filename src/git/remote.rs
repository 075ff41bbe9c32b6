use crate::error::GitFuseError;
use crate::git::repository::Repository;
use crate::utils::debug_log;

/// Fully qualified ref name for a branch given either as `main` or `refs/heads/main`
pub fn branch_refname(branch: &str) -> String {
    if branch.starts_with("refs/heads/") {
        branch.to_string()
    } else {
        format!("refs/heads/{}", branch)
    }
}

/// Look up `refname` in a remote's advertised heads
pub fn find_advertised<'h>(heads: &'h [(String, String)], refname: &str) -> Option<&'h str> {
    heads
        .iter()
        .find(|(name, _)| name == refname)
        .map(|(_, oid)| oid.as_str())
}

/// Fetch `branch` from `source` into the local object store and return the oid of
/// its tip. No local branch or remote-tracking ref is created or moved.
///
/// The branch is looked up with `ls-remote` before fetching, so an absent branch
/// is reported as `BranchNotFound` instead of a fetch failure. After the fetch the
/// advertised tip must be present locally.
pub fn resolve_source_tip(
    repo: &Repository,
    source: &str,
    branch: &str,
) -> Result<String, GitFuseError> {
    let refname = branch_refname(branch);

    let heads = repo.ls_remote_heads(source)?;
    let tip = find_advertised(&heads, &refname)
        .ok_or_else(|| GitFuseError::BranchNotFound {
            source: source.to_string(),
            branch: branch.to_string(),
        })?
        .to_string();
    debug_log(&format!("{} advertises {} at {}", source, refname, tip));

    repo.fetch_objects(source, &refname)?;

    if !repo.has_commit(&tip) {
        return Err(GitFuseError::Generic(format!(
            "{} moved while fetching from {}; expected {} to be available",
            refname, source, tip
        )));
    }

    Ok(tip)
}
