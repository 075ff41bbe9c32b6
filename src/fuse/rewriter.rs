use std::collections::HashMap;
use std::io::Write;

use crate::config::UnresolvedParentPolicy;
use crate::error::GitFuseError;
use crate::fuse::snapshot::TargetHeadSnapshot;
use crate::fuse::tree_fuser::TreeFuser;
use crate::git::repository::{Repository, Time};
use crate::utils::{debug_log, short_oid, truncate_subject, warn_log};

/// Original commit id -> rewritten commit id.
///
/// Seeded with `head -> head` for the target head: that entry is the graft point
/// for parentless source commits and for any source commit that already has the
/// target head as a parent. Entries are only ever added.
#[derive(Debug, Clone)]
pub struct CommitMap {
    map: HashMap<String, String>,
}

impl CommitMap {
    pub fn seeded(target_head: &str) -> Self {
        let mut map = HashMap::new();
        map.insert(target_head.to_string(), target_head.to_string());
        CommitMap { map }
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.map.get(original).map(String::as_str)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.map.contains_key(original)
    }

    pub fn insert(&mut self, original: &str, rewritten: &str) -> Result<(), GitFuseError> {
        if let Some(existing) = self.map.get(original) {
            return Err(GitFuseError::Generic(format!(
                "commit {} was already rewritten to {}",
                original, existing
            )));
        }
        self.map.insert(original.to_string(), rewritten.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// New parent list for a commit with original `parents`.
///
/// Roots graft onto `graft_point`. Otherwise every parent must map; the error
/// carries the first parent that does not.
pub fn map_parents(
    commit_map: &CommitMap,
    parents: &[String],
    graft_point: &str,
) -> Result<Vec<String>, String> {
    if parents.is_empty() {
        return Ok(vec![graft_point.to_string()]);
    }

    let mapped: Vec<Option<&str>> = parents.iter().map(|p| commit_map.get(p)).collect();
    match mapped.iter().copied().collect::<Option<Vec<&str>>>() {
        Some(all) => Ok(all.into_iter().map(str::to_string).collect()),
        None => {
            let missing = parents
                .iter()
                .zip(&mapped)
                .find(|(_, m)| m.is_none())
                .map(|(p, _)| p.clone())
                .unwrap_or_default();
            Err(missing)
        }
    }
}

#[derive(Debug)]
pub struct RewriteOutcome {
    pub tip: String,
    pub commit_map: CommitMap,
    pub rewritten: usize,
    /// Commits dropped under `UnresolvedParentPolicy::Skip`, in walk order
    pub skipped: Vec<String>,
}

/// One line per rewritten commit:
/// `added: <short oid> <commit time>: <subject>`
pub fn progress_line(original: &str, time: Time, message: &str) -> String {
    let when = match time.to_datetime() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S %z").to_string(),
        None => time.to_git_date(),
    };
    format!(
        "added: {} {}: {}",
        short_oid(original),
        when,
        truncate_subject(message)
    )
}

/// Rewrite every commit reachable from `source_tip`, ancestors first, so that
/// each one carries the snapshot's content plus its own tree under the fuser's
/// directory. Only new objects are written; no reference moves.
pub fn rewrite_history(
    repo: &Repository,
    snapshot: &TargetHeadSnapshot,
    fuser: &mut TreeFuser<'_>,
    policy: UnresolvedParentPolicy,
    source_tip: &str,
    output: &mut dyn Write,
) -> Result<RewriteOutcome, GitFuseError> {
    let walk = repo.rev_list_topo_reverse(source_tip)?;
    debug_log(&format!(
        "Rewriting {} commits from {} onto {}",
        walk.len(),
        short_oid(source_tip),
        short_oid(&snapshot.head)
    ));

    replay_walk(
        walk,
        &snapshot.head,
        source_tip,
        policy,
        |oid, new_parents| {
            let commit = repo.find_commit(oid.to_string())?;
            let fused_tree = fuser.fuse(&commit.tree()?.id())?;
            let new_oid =
                repo.write_commit_object(&commit.rewritten_object(&fused_tree, new_parents)?)?;

            writeln!(
                output,
                "{}",
                progress_line(oid, commit.time()?, &commit.message()?)
            )?;
            debug_log(&format!(
                "{} -> {} (parents {:?})",
                short_oid(oid),
                short_oid(&new_oid),
                new_parents.iter().map(|p| short_oid(p)).collect::<Vec<_>>()
            ));
            Ok(new_oid)
        },
    )
}

/// Drive `rewrite` over `walk` (commit, original parents) in the given order,
/// mapping parents through the commit map as it grows.
///
/// `rewrite` receives the original id and the already mapped parents and
/// returns the new id. Commits whose parents do not all map are handled per
/// `policy`; under `Skip` their descendants fall out with them.
pub fn replay_walk<F>(
    walk: Vec<(String, Vec<String>)>,
    graft_point: &str,
    source_tip: &str,
    policy: UnresolvedParentPolicy,
    mut rewrite: F,
) -> Result<RewriteOutcome, GitFuseError>
where
    F: FnMut(&str, &[String]) -> Result<String, GitFuseError>,
{
    let mut commit_map = CommitMap::seeded(graft_point);
    let mut rewritten = 0usize;
    let mut skipped = Vec::new();

    for (oid, parents) in walk {
        if commit_map.contains(&oid) {
            // Only the graft point itself can already be mapped
            debug_log(&format!("{} is the graft point, not rewriting", short_oid(&oid)));
            continue;
        }

        let new_parents = match map_parents(&commit_map, &parents, graft_point) {
            Ok(new_parents) => new_parents,
            Err(missing) => match policy {
                UnresolvedParentPolicy::Abort => {
                    return Err(GitFuseError::UnresolvedParent {
                        commit: oid,
                        parent: missing,
                    });
                }
                UnresolvedParentPolicy::Skip => {
                    warn_log(&format!(
                        "skipping {}: parent {} was not rewritten",
                        short_oid(&oid),
                        short_oid(&missing)
                    ));
                    skipped.push(oid);
                    continue;
                }
            },
        };

        let new_oid = rewrite(&oid, &new_parents)?;
        commit_map.insert(&oid, &new_oid)?;
        rewritten += 1;
    }

    let tip = commit_map
        .get(source_tip)
        .map(str::to_string)
        .ok_or_else(|| GitFuseError::UnresolvedParent {
            commit: source_tip.to_string(),
            parent: skipped.first().cloned().unwrap_or_default(),
        })?;

    Ok(RewriteOutcome {
        tip,
        commit_map,
        rewritten,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_commit_map_is_seeded_with_sentinel() {
        let map = CommitMap::seeded("head");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("head"), Some("head"));
        assert!(!map.is_empty());
    }

    #[test]
    fn test_commit_map_refuses_overwrite() {
        let mut map = CommitMap::seeded("head");
        map.insert("a", "a2").unwrap();
        assert!(map.insert("a", "a3").is_err());
        assert!(map.insert("head", "x").is_err());
        assert_eq!(map.get("a"), Some("a2"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_map_parents_root_grafts_onto_head() {
        let map = CommitMap::seeded("head");
        assert_eq!(map_parents(&map, &[], "head"), Ok(oids(&["head"])));
    }

    #[test]
    fn test_map_parents_preserves_order() {
        let mut map = CommitMap::seeded("head");
        map.insert("p1", "n1").unwrap();
        map.insert("p2", "n2").unwrap();
        assert_eq!(
            map_parents(&map, &oids(&["p2", "p1"]), "head"),
            Ok(oids(&["n2", "n1"]))
        );
    }

    #[test]
    fn test_map_parents_reports_first_missing() {
        let mut map = CommitMap::seeded("head");
        map.insert("p1", "n1").unwrap();
        assert_eq!(
            map_parents(&map, &oids(&["p1", "gone", "also-gone"]), "head"),
            Err("gone".to_string())
        );
    }

    #[test]
    fn test_map_parents_through_sentinel() {
        let map = CommitMap::seeded("head");
        assert_eq!(
            map_parents(&map, &oids(&["head"]), "head"),
            Ok(oids(&["head"]))
        );
    }

    #[test]
    fn test_progress_line_format() {
        let line = progress_line(
            "0123456789abcdef0123456789abcdef01234567",
            Time::new(1700000000, 60),
            "add a\n\nlonger body\n",
        );
        assert_eq!(line, "added: 01234567 2023-11-14 23:13:20 +0100: add a");
    }

    #[test]
    fn test_progress_line_truncates_subject() {
        let subject = "s".repeat(100);
        let line = progress_line("abcdef0123", Time::new(0, 0), &subject);
        assert!(line.ends_with(&format!("{}...", "s".repeat(72))));
    }

    /// Walk from `(commit, "space separated parents")` pairs
    fn walk(entries: &[(&str, &str)]) -> Vec<(String, Vec<String>)> {
        entries
            .iter()
            .map(|(oid, parents)| {
                (
                    oid.to_string(),
                    parents.split_whitespace().map(str::to_string).collect(),
                )
            })
            .collect()
    }

    // Rewritten ids are the original id with a trailing apostrophe
    fn primed(oid: &str, _parents: &[String]) -> Result<String, GitFuseError> {
        Ok(format!("{}'", oid))
    }

    #[test]
    fn test_replay_walk_maps_parents_in_order() {
        let history = walk(&[("a", ""), ("b", "a"), ("c", "a"), ("m", "c b")]);
        let mut seen = Vec::new();
        let outcome = replay_walk(
            history,
            "head",
            "m",
            UnresolvedParentPolicy::Abort,
            |oid, parents| {
                seen.push((oid.to_string(), parents.to_vec()));
                primed(oid, parents)
            },
        )
        .unwrap();

        assert_eq!(outcome.tip, "m'");
        assert_eq!(outcome.rewritten, 4);
        assert_eq!(outcome.commit_map.len(), 5);
        assert!(outcome.skipped.is_empty());
        assert_eq!(seen[0], ("a".to_string(), oids(&["head"])));
        assert_eq!(seen[3], ("m".to_string(), oids(&["c'", "b'"])));
    }

    #[test]
    fn test_replay_walk_skips_graft_point() {
        let history = walk(&[("head", ""), ("x", "head")]);
        let outcome =
            replay_walk(history, "head", "x", UnresolvedParentPolicy::Abort, primed).unwrap();

        assert_eq!(outcome.rewritten, 1);
        assert_eq!(outcome.tip, "x'");
        assert_eq!(outcome.commit_map.get("head"), Some("head"));
    }

    #[test]
    fn test_replay_walk_abort_on_out_of_order_walk() {
        // b is listed before its parent a
        let history = walk(&[("b", "a"), ("a", ""), ("c", "b")]);
        let mut calls = 0;
        let result = replay_walk(
            history,
            "head",
            "c",
            UnresolvedParentPolicy::Abort,
            |oid, parents| {
                calls += 1;
                primed(oid, parents)
            },
        );

        match result {
            Err(GitFuseError::UnresolvedParent { commit, parent }) => {
                assert_eq!(commit, "b");
                assert_eq!(parent, "a");
            }
            other => panic!("expected UnresolvedParent, got {:?}", other),
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_replay_walk_skip_drops_descendants() {
        let history = walk(&[
            ("b", "a"),
            ("a", ""),
            ("c", "b"),
            ("m", "a c"),
            ("d", "a"),
        ]);
        let outcome =
            replay_walk(history, "head", "d", UnresolvedParentPolicy::Skip, primed).unwrap();

        assert_eq!(outcome.skipped, oids(&["b", "c", "m"]));
        assert_eq!(outcome.rewritten, 2);
        assert_eq!(outcome.tip, "d'");
        assert_eq!(outcome.commit_map.get("a"), Some("a'"));
        assert!(!outcome.commit_map.contains("c"));
        assert!(!outcome.commit_map.contains("m"));
    }

    #[test]
    fn test_replay_walk_skip_fails_when_tip_is_dropped() {
        let history = walk(&[("b", "a"), ("a", ""), ("c", "b")]);
        let result = replay_walk(history, "head", "c", UnresolvedParentPolicy::Skip, primed);

        match result {
            Err(GitFuseError::UnresolvedParent { commit, parent }) => {
                assert_eq!(commit, "c");
                assert_eq!(parent, "b");
            }
            other => panic!("expected UnresolvedParent, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_walk_propagates_rewrite_errors() {
        let history = walk(&[("a", "")]);
        let result = replay_walk(history, "head", "a", UnresolvedParentPolicy::Skip, |_, _| {
            Err(GitFuseError::Generic("store unavailable".to_string()))
        });
        assert!(matches!(result, Err(GitFuseError::Generic(_))));
    }
}
