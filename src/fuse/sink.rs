use crate::error::GitFuseError;
use crate::fuse::snapshot::TargetHeadSnapshot;
use crate::git::repository::Repository;
use crate::utils::debug_log;

#[derive(Debug, Default)]
pub struct SinkReport {
    /// Paths written to the working tree because they were missing on disk
    pub materialized: Vec<String>,
}

/// Point the snapshot's branch at `new_tip`, reset the index to it and write out
/// any file under `target_dir` that is missing from the working tree.
///
/// The ref update is compare-and-swap against the snapshot head, so a branch that
/// moved since the snapshot is left alone and the call fails.
pub fn apply(
    repo: &Repository,
    snapshot: &TargetHeadSnapshot,
    new_tip: &str,
    target_dir: &str,
    log_message: &str,
) -> Result<SinkReport, GitFuseError> {
    repo.update_ref(&snapshot.refname, new_tip, &snapshot.head, log_message)?;
    debug_log(&format!("{} -> {}", snapshot.refname, new_tip));

    repo.read_tree(new_tip)?;

    let workdir = repo.workdir();
    let missing: Vec<String> = repo
        .ls_files(target_dir)?
        .into_iter()
        .filter(|path| workdir.join(path).symlink_metadata().is_err())
        .collect();
    repo.checkout_index(&missing)?;
    debug_log(&format!(
        "Materialized {} missing paths under {}/",
        missing.len(),
        target_dir
    ));

    Ok(SinkReport {
        materialized: missing,
    })
}
