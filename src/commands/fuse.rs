use std::io::Write;
use std::path::Path;

use crate::config::UnresolvedParentPolicy;
use crate::error::GitFuseError;
use crate::fuse::rewriter::rewrite_history;
use crate::fuse::sink;
use crate::fuse::snapshot::TargetHeadSnapshot;
use crate::fuse::tree_fuser::{TreeFuser, validate_target_dir};
use crate::git::remote::resolve_source_tip;
use crate::git::repository::Repository;
use crate::spinner::Spinner;
use crate::utils::{short_oid, warn_log};

#[derive(Debug, Clone)]
pub struct FuseOptions {
    /// URL or path of the source repository
    pub source: String,
    pub branch: String,
    pub target_dir: String,
    pub unresolved_parents: UnresolvedParentPolicy,
}

#[derive(Debug, Clone)]
pub struct FuseSummary {
    pub previous_head: String,
    pub source_tip: String,
    pub new_tip: String,
    pub rewritten: usize,
    pub skipped: Vec<String>,
    /// Size of the final commit map, sentinel included
    pub mapped: usize,
    pub materialized: Vec<String>,
}

/// Local paths are made absolute because every git call runs from the target's
/// workdir, not from the caller's current directory.
pub fn normalize_source(source: &str, cwd: &Path) -> String {
    let path = Path::new(source);
    if path.is_absolute() || !cwd.join(path).exists() {
        return source.to_string();
    }
    cwd.join(path)
        .canonicalize()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| source.to_string())
}

/// Fuse `options.branch` of `options.source` under `options.target_dir` of the
/// branch checked out in `repo`. Progress lines go to `output`.
///
/// Everything up to the final ref update only adds objects; any error before it
/// leaves the target branch, index and working tree as they were.
pub fn run(
    repo: &Repository,
    options: &FuseOptions,
    output: &mut dyn Write,
) -> Result<FuseSummary, GitFuseError> {
    validate_target_dir(&options.target_dir)?;

    let snapshot = TargetHeadSnapshot::capture(repo)?;

    let spinner = Spinner::new(&format!(
        "Fetching {} from {}",
        options.branch, options.source
    ));
    let source_tip = match resolve_source_tip(repo, &options.source, &options.branch) {
        Ok(tip) => {
            spinner.success(&format!("Fetched {} at {}", options.branch, short_oid(&tip)));
            tip
        }
        Err(e) => {
            spinner.error(&format!("Could not fetch {}", options.branch));
            return Err(e);
        }
    };

    let mut fuser = TreeFuser::new(repo, &options.target_dir, snapshot.entries.clone())?;
    if fuser.shadows_base_entry() {
        warn_log(&format!(
            "'{}' already exists in {}; the fused history replaces it",
            options.target_dir, snapshot.refname
        ));
    }

    let outcome = rewrite_history(
        repo,
        &snapshot,
        &mut fuser,
        options.unresolved_parents,
        &source_tip,
        output,
    )?;

    let log_message = format!(
        "git-fuse: fuse {}#{} into {}/",
        options.source, options.branch, options.target_dir
    );
    let report = sink::apply(
        repo,
        &snapshot,
        &outcome.tip,
        fuser.target_dir(),
        &log_message,
    )?;

    Ok(FuseSummary {
        previous_head: snapshot.head,
        source_tip,
        new_tip: outcome.tip,
        rewritten: outcome.rewritten,
        skipped: outcome.skipped,
        mapped: outcome.commit_map.len(),
        materialized: report.materialized,
    })
}
