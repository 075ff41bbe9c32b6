use crate::config;
use crate::error::GitFuseError;

use std::cell::OnceCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use chrono::{DateTime, FixedOffset, TimeZone};

/// Mode git uses for directory entries inside a tree
pub const TREE_MODE: &str = "040000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    seconds: i64,
    offset_minutes: i32,
}

impl Time {
    pub fn new(seconds: i64, offset_minutes: i32) -> Self {
        Time {
            seconds,
            offset_minutes,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Format as "<unix-seconds> <±HHMM>", the raw form git stores and accepts
    pub fn to_git_date(&self) -> String {
        let sign = if self.offset_minutes >= 0 { '+' } else { '-' };
        let abs = self.offset_minutes.abs();
        format!("{} {}{:02}{:02}", self.seconds, sign, abs / 60, abs % 60)
    }

    /// The instant in the signer's own timezone
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60)?;
        offset.timestamp_opt(self.seconds, 0).single()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    email: String,
    when: Time,
}

impl Signature {
    pub fn new(name: &str, email: &str, when: Time) -> Self {
        Signature {
            name: name.to_string(),
            email: email.to_string(),
            when,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn when(&self) -> Time {
        self.when
    }

    /// Parse the identity part of an `author`/`committer` header:
    /// `Name <email> 1700000000 +0100`
    pub fn parse_ident(ident: &str) -> Result<Signature, GitFuseError> {
        let malformed = || GitFuseError::Generic(format!("Malformed identity line: {}", ident));

        let email_start = ident.find('<').ok_or_else(malformed)?;
        let email_end = ident.rfind('>').ok_or_else(malformed)?;
        if email_end < email_start {
            return Err(malformed());
        }
        let name = ident[..email_start].trim();
        let email = &ident[email_start + 1..email_end];

        let mut date = ident[email_end + 1..].split_whitespace();
        let seconds = date
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(malformed)?;
        let offset_minutes = date.next().map(parse_tz_offset).unwrap_or(Some(0));
        let offset_minutes = offset_minutes.ok_or_else(malformed)?;

        Ok(Signature::new(name, email, Time::new(seconds, offset_minutes)))
    }
}

/// "+0130" -> 90, "-0800" -> -480
fn parse_tz_offset(tz: &str) -> Option<i32> {
    let (sign, digits) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    Some(sign * (hours * 60 + minutes))
}

/// Parsed content of a commit object, as read with `git cat-file commit`
#[derive(Debug, Clone)]
pub struct CommitData {
    pub tree: String,
    pub parents: Vec<String>,
    pub author: Signature,
    pub committer: Signature,
    /// Raw message bytes, exactly as stored
    pub message: Vec<u8>,
    /// The whole object as read, headers included
    pub raw: Vec<u8>,
}

impl CommitData {
    pub fn parse(raw: &[u8]) -> Result<CommitData, GitFuseError> {
        let header_end = find_subslice(raw, b"\n\n");
        let (headers, message) = match header_end {
            Some(idx) => (&raw[..idx], raw[idx + 2..].to_vec()),
            None => (raw, Vec::new()),
        };
        let headers = String::from_utf8_lossy(headers);

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            // Continuation lines of multi-line headers (e.g. gpgsig) start with a space
            if line.starts_with(' ') {
                continue;
            }
            match line.split_once(' ') {
                Some(("tree", oid)) => tree = Some(oid.trim().to_string()),
                Some(("parent", oid)) => parents.push(oid.trim().to_string()),
                Some(("author", ident)) => author = Some(Signature::parse_ident(ident)?),
                Some(("committer", ident)) => committer = Some(Signature::parse_ident(ident)?),
                _ => {}
            }
        }

        Ok(CommitData {
            tree: tree
                .ok_or_else(|| GitFuseError::Generic("Commit object has no tree".to_string()))?,
            parents,
            author: author
                .ok_or_else(|| GitFuseError::Generic("Commit object has no author".to_string()))?,
            committer: committer.ok_or_else(|| {
                GitFuseError::Generic("Commit object has no committer".to_string())
            })?,
            message,
            raw: raw.to_vec(),
        })
    }

    /// This commit's object bytes with `tree` and the parent list replaced.
    ///
    /// Every other header (author, committer, encoding, mergetag, ...) and the
    /// message are copied byte for byte. Signatures are dropped since they cannot
    /// cover the new content.
    pub fn rewritten_object(
        &self,
        tree: &str,
        parents: &[String],
    ) -> Result<Vec<u8>, GitFuseError> {
        let (headers, message) = match find_subslice(&self.raw, b"\n\n") {
            Some(idx) => (&self.raw[..idx], &self.raw[idx + 2..]),
            None => (self.raw.strip_suffix(b"\n").unwrap_or(&self.raw[..]), &[][..]),
        };

        let mut out = Vec::with_capacity(self.raw.len());
        let mut wrote_tree = false;
        let mut in_signature = false;
        for line in headers.split(|b| *b == b'\n') {
            if line.starts_with(b" ") {
                if !in_signature {
                    out.extend_from_slice(line);
                    out.push(b'\n');
                }
                continue;
            }
            in_signature = false;
            let key = line.split(|b| *b == b' ').next().unwrap_or(&[]);
            match key {
                b"tree" => {
                    out.extend_from_slice(format!("tree {}\n", tree).as_bytes());
                    for parent in parents {
                        out.extend_from_slice(format!("parent {}\n", parent).as_bytes());
                    }
                    wrote_tree = true;
                }
                b"parent" => {}
                b"gpgsig" | b"gpgsig-sha256" => in_signature = true,
                _ => {
                    out.extend_from_slice(line);
                    out.push(b'\n');
                }
            }
        }
        if !wrote_tree {
            return Err(GitFuseError::Generic("Commit object has no tree".to_string()));
        }

        out.push(b'\n');
        out.extend_from_slice(message);
        Ok(out)
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub struct Commit<'a> {
    repo: &'a Repository,
    oid: String,
    data: OnceCell<CommitData>,
}

impl<'a> Commit<'a> {
    pub fn id(&self) -> String {
        self.oid.clone()
    }

    // Lazily read and parse the commit object
    fn data(&self) -> Result<&CommitData, GitFuseError> {
        if let Some(data) = self.data.get() {
            return Ok(data);
        }
        let mut args = self.repo.global_args_for_exec();
        args.push("cat-file".to_string());
        args.push("commit".to_string());
        args.push(self.oid.clone());
        let output = exec_git(&args)?;
        let parsed = CommitData::parse(&output.stdout)?;
        Ok(self.data.get_or_init(|| parsed))
    }

    pub fn tree(&self) -> Result<Tree<'a>, GitFuseError> {
        Ok(Tree {
            repo: self.repo,
            oid: self.data()?.tree.clone(),
        })
    }

    /// Object bytes for a copy of this commit on `tree` with `parents`
    pub fn rewritten_object(
        &self,
        tree: &str,
        parents: &[String],
    ) -> Result<Vec<u8>, GitFuseError> {
        self.data()?.rewritten_object(tree, parents)
    }

    pub fn message(&self) -> Result<String, GitFuseError> {
        Ok(String::from_utf8_lossy(&self.data()?.message).to_string())
    }

    // Get the commit time (i.e. committer time) of a commit.
    pub fn time(&self) -> Result<Time, GitFuseError> {
        Ok(self.data()?.committer.when())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    // File mode as provided by git ls-tree (e.g. 100644, 100755, 120000, 040000, 160000)
    pub mode: String,
    // One of: blob, tree, commit (gitlink)
    pub object_type: String,
    // Object id that this tree entry points to
    pub oid: String,
    pub name: String,
}

impl TreeEntry {
    pub fn subtree(name: &str, oid: &str) -> Self {
        TreeEntry {
            mode: TREE_MODE.to_string(),
            object_type: "tree".to_string(),
            oid: oid.to_string(),
            name: name.to_string(),
        }
    }

    pub fn id(&self) -> String {
        self.oid.clone()
    }

    /// One `git mktree -z` input record, without the terminating NUL
    fn to_mktree_record(&self) -> String {
        format!(
            "{} {} {}\t{}",
            self.mode, self.object_type, self.oid, self.name
        )
    }
}

/// Parse `git ls-tree -z` output. Each record: "<mode> <type> <object>\t<file>\0"
pub fn parse_ls_tree(bytes: &[u8]) -> Result<Vec<TreeEntry>, GitFuseError> {
    let mut entries = Vec::new();
    for chunk in bytes.split(|b| *b == 0u8) {
        if chunk.is_empty() {
            continue;
        }
        let mut parts = chunk.splitn(2, |b| *b == b'\t');
        let meta = String::from_utf8_lossy(parts.next().unwrap_or(&[])).to_string();
        let name = String::from_utf8_lossy(parts.next().unwrap_or(&[])).to_string();

        let mut meta_iter = meta.split_whitespace();
        let (mode, object_type, oid) = match (meta_iter.next(), meta_iter.next(), meta_iter.next())
        {
            (Some(mode), Some(object_type), Some(oid)) if !name.is_empty() => {
                (mode, object_type, oid)
            }
            _ => {
                return Err(GitFuseError::Generic(format!(
                    "Unexpected ls-tree record: {}",
                    String::from_utf8_lossy(chunk)
                )));
            }
        };

        entries.push(TreeEntry {
            mode: mode.to_string(),
            object_type: object_type.to_string(),
            oid: oid.to_string(),
            name,
        });
    }
    Ok(entries)
}

pub struct Tree<'a> {
    repo: &'a Repository,
    oid: String,
}

impl<'a> Tree<'a> {
    // Get the id of the tree
    pub fn id(&self) -> String {
        self.oid.clone()
    }

    /// Top-level entries of this tree
    pub fn entries(&self) -> Result<Vec<TreeEntry>, GitFuseError> {
        let mut args = self.repo.global_args_for_exec();
        args.push("ls-tree".to_string());
        args.push("-z".to_string());
        args.push(self.oid.clone());
        let output = exec_git(&args)?;
        parse_ls_tree(&output.stdout)
    }
}

pub struct Reference<'a> {
    repo: &'a Repository,
    ref_name: String,
}

impl<'a> Reference<'a> {
    pub fn name(&self) -> &str {
        &self.ref_name
    }

    pub fn is_branch(&self) -> bool {
        self.ref_name.starts_with("refs/heads/")
    }

    /// Commit the reference points at, or `None` for an unborn branch
    pub fn target(&self) -> Result<Option<String>, GitFuseError> {
        let mut args = self.repo.global_args_for_exec();
        args.push("rev-parse".to_string());
        args.push("-q".to_string());
        args.push("--verify".to_string());
        args.push(format!("{}^{{commit}}", self.ref_name));
        match exec_git(&args) {
            Ok(output) => Ok(Some(String::from_utf8(output.stdout)?.trim().to_string())),
            // rev-parse -q --verify exits 1 without output when the ref does not resolve
            Err(GitFuseError::GitCliError { code: Some(1), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Handle over one non-bare git repository. Every operation shells out to git with
/// `-C <workdir>`, so the handle carries no open state beyond paths.
#[derive(Debug, Clone)]
pub struct Repository {
    global_args: Vec<String>,
    git_dir: PathBuf,
    workdir: PathBuf,
}

impl Repository {
    // Util for preparing global args for execution
    pub fn global_args_for_exec(&self) -> Vec<String> {
        let mut args = self.global_args.clone();
        if !args.iter().any(|arg| arg == "--no-pager") {
            args.push("--no-pager".to_string());
        }
        args
    }

    // Returns the path to the .git folder
    pub fn path(&self) -> &Path {
        self.git_dir.as_path()
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.as_path()
    }

    // Retrieve the reference pointed at by HEAD.
    // If HEAD is a symbolic ref, return the refname (e.g., "refs/heads/main").
    // Otherwise, return "HEAD".
    pub fn head(&self) -> Result<Reference<'_>, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("symbolic-ref".to_string());
        args.push("-q".to_string());
        args.push("HEAD".to_string());

        match exec_git(&args) {
            Ok(output) => Ok(Reference {
                repo: self,
                ref_name: String::from_utf8(output.stdout)?.trim().to_string(),
            }),
            Err(GitFuseError::GitCliError { code: Some(1), .. }) => Ok(Reference {
                repo: self,
                ref_name: "HEAD".to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    // Internal util to get the git object type for a given OID
    fn object_type(&self, oid: &str) -> Result<String, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("cat-file".to_string());
        args.push("-t".to_string());
        args.push(oid.to_string());
        let output = exec_git(&args)?;
        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    /// True when `oid` names a commit present in the local object store
    pub fn has_commit(&self, oid: &str) -> bool {
        matches!(self.object_type(oid).as_deref(), Ok("commit"))
    }

    // Lookup one of the commits in a repository.
    pub fn find_commit(&self, oid: String) -> Result<Commit<'_>, GitFuseError> {
        let typ = self.object_type(&oid)?;
        if typ != "commit" {
            return Err(GitFuseError::Generic(format!(
                "Object is not a commit: {} (type: {})",
                oid, typ
            )));
        }
        Ok(Commit {
            repo: self,
            oid,
            data: OnceCell::new(),
        })
    }

    /// Write a tree object from the given entries and return its id.
    /// Entry names must be unique; git sorts them into canonical order.
    pub fn mktree(&self, entries: &[TreeEntry]) -> Result<String, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("mktree".to_string());
        args.push("-z".to_string());
        // Gitlink entries name commits of other repositories, absent from this store
        args.push("--missing".to_string());

        let mut stdin = Vec::new();
        for entry in entries {
            stdin.extend_from_slice(entry.to_mktree_record().as_bytes());
            stdin.push(0);
        }
        let output = exec_git_stdin(&args, &stdin)?;
        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    /// Store raw commit object bytes and return the new commit's id.
    /// Nothing is re-encoded: identities, `encoding` and message stay as given.
    pub fn write_commit_object(&self, object: &[u8]) -> Result<String, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("hash-object".to_string());
        args.push("-t".to_string());
        args.push("commit".to_string());
        args.push("-w".to_string());
        args.push("--stdin".to_string());
        let output = exec_git_stdin(&args, object)?;
        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    /// Move `ref_name` from `old_oid` to `new_oid`, failing if it no longer
    /// points at `old_oid`.
    pub fn update_ref(
        &self,
        ref_name: &str,
        new_oid: &str,
        old_oid: &str,
        log_message: &str,
    ) -> Result<(), GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("update-ref".to_string());
        args.push("-m".to_string());
        args.push(log_message.to_string());
        args.push(ref_name.to_string());
        args.push(new_oid.to_string());
        args.push(old_oid.to_string());
        exec_git(&args)?;
        Ok(())
    }

    /// Replace the index with the tree of `treeish`, leaving the working tree alone
    pub fn read_tree(&self, treeish: &str) -> Result<(), GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("read-tree".to_string());
        args.push(treeish.to_string());
        exec_git(&args)?;
        Ok(())
    }

    /// Paths in the index under directory `dir`, relative to the workdir.
    /// `dir` is matched literally; glob and `:` magic characters have no meaning.
    pub fn ls_files(&self, dir: &str) -> Result<Vec<String>, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("--literal-pathspecs".to_string());
        args.push("ls-files".to_string());
        args.push("-z".to_string());
        args.push("--".to_string());
        args.push(dir.to_string());
        let output = exec_git(&args)?;
        Ok(output
            .stdout
            .split(|b| *b == 0u8)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| String::from_utf8_lossy(chunk).to_string())
            .collect())
    }

    /// Write the indexed content of `paths` into the working tree
    pub fn checkout_index(&self, paths: &[String]) -> Result<(), GitFuseError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = self.global_args_for_exec();
        args.push("checkout-index".to_string());
        args.push("-f".to_string());
        args.push("-z".to_string());
        args.push("--stdin".to_string());

        let mut stdin = Vec::new();
        for path in paths {
            stdin.extend_from_slice(path.as_bytes());
            stdin.push(0);
        }
        exec_git_stdin(&args, &stdin)?;
        Ok(())
    }

    /// Every commit reachable from `tip` with its parents, ancestors first
    pub fn rev_list_topo_reverse(
        &self,
        tip: &str,
    ) -> Result<Vec<(String, Vec<String>)>, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("rev-list".to_string());
        args.push("--topo-order".to_string());
        args.push("--reverse".to_string());
        args.push("--parents".to_string());
        args.push(tip.to_string());
        args.push("--".to_string());
        let output = exec_git(&args)?;
        Ok(parse_rev_list_parents(&String::from_utf8(output.stdout)?))
    }

    /// Heads advertised by a remote location, as `(refname, oid)` pairs
    pub fn ls_remote_heads(&self, remote: &str) -> Result<Vec<(String, String)>, GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("ls-remote".to_string());
        args.push("--heads".to_string());
        args.push(remote.to_string());
        let output = exec_git(&args)?;
        Ok(String::from_utf8(output.stdout)?
            .lines()
            .filter_map(|line| {
                let (oid, refname) = line.split_once('\t')?;
                Some((refname.trim().to_string(), oid.trim().to_string()))
            })
            .collect())
    }

    /// Fetch the objects behind `refspec` from `remote` without creating any local ref
    pub fn fetch_objects(&self, remote: &str, refspec: &str) -> Result<(), GitFuseError> {
        let mut args = self.global_args_for_exec();
        args.push("fetch".to_string());
        args.push("--quiet".to_string());
        args.push("--no-tags".to_string());
        if self.git_supports_no_write_fetch_head() {
            args.push("--no-write-fetch-head".to_string());
        }
        args.push(remote.to_string());
        args.push(refspec.to_string());
        exec_git(&args)?;
        Ok(())
    }

    /// Get the git version as a tuple (major, minor, patch).
    /// Returns None if the version cannot be parsed.
    pub fn git_version(&self) -> Option<(u32, u32, u32)> {
        let args = vec!["--version".to_string()];
        let output = exec_git(&args).ok()?;
        let version_str = String::from_utf8(output.stdout).ok()?;
        parse_git_version(&version_str)
    }

    /// `fetch --no-write-fetch-head` was added in git 2.29.0.
    fn git_supports_no_write_fetch_head(&self) -> bool {
        match self.git_version() {
            Some((major, minor, _)) => major > 2 || (major == 2 && minor >= 29),
            None => false,
        }
    }
}

/// Parse `git rev-list --parents` output: "<oid> <parent>*" per line
pub fn parse_rev_list_parents(stdout: &str) -> Vec<(String, Vec<String>)> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut oids = line.split_whitespace().map(|s| s.to_string());
            let oid = oids.next()?;
            Some((oid, oids.collect()))
        })
        .collect()
}

pub fn find_repository_in_path(path: &str) -> Result<Repository, GitFuseError> {
    let global_args = vec!["-C".to_string(), path.to_string()];

    let mut rev_parse_args = global_args.clone();
    rev_parse_args.push("rev-parse".to_string());
    rev_parse_args.push("--is-bare-repository".to_string());
    rev_parse_args.push("--absolute-git-dir".to_string());
    rev_parse_args.push("--show-toplevel".to_string());

    let output = exec_git(&rev_parse_args)?;
    let stdout = String::from_utf8(output.stdout)?;
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());

    if lines.next() == Some("true") {
        return Err(GitFuseError::Generic(format!(
            "Cannot fuse into bare repository at {}",
            path
        )));
    }
    let git_dir = lines.next().map(PathBuf::from).ok_or_else(|| {
        GitFuseError::Generic("Missing --absolute-git-dir output from git rev-parse".to_string())
    })?;
    let workdir = lines.next().map(PathBuf::from).ok_or_else(|| {
        GitFuseError::Generic(format!("No working directory for repository at {}", path))
    })?;

    if !workdir.is_dir() {
        return Err(GitFuseError::Generic(format!(
            "Work directory does not exist: {}",
            workdir.display()
        )));
    }

    Ok(Repository {
        // Ensure all internal git commands use the repository root consistently
        global_args: vec!["-C".to_string(), workdir.display().to_string()],
        git_dir,
        workdir,
    })
}

/// Helper to execute a git command
pub fn exec_git(args: &[String]) -> Result<Output, GitFuseError> {
    let mut cmd = Command::new(config::Config::get().git_cmd());
    cmd.args(args);

    let output = cmd.output().map_err(GitFuseError::IoError)?;
    check_status(output, args)
}

/// Helper to execute a git command with data provided on stdin
pub fn exec_git_stdin(args: &[String], stdin_data: &[u8]) -> Result<Output, GitFuseError> {
    exec_git_stdin_with_env(args, &[], stdin_data)
}

/// Helper to execute a git command with data provided on stdin and additional environment variables
pub fn exec_git_stdin_with_env(
    args: &[String],
    env: &[(String, String)],
    stdin_data: &[u8],
) -> Result<Output, GitFuseError> {
    let mut cmd = Command::new(config::Config::get().git_cmd());
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    for (k, v) in env.iter() {
        cmd.env(k, v);
    }

    let mut child = cmd.spawn().map_err(GitFuseError::IoError)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(stdin_data).map_err(GitFuseError::IoError)?;
        // stdin is dropped here so the child sees EOF
    }

    let output = child.wait_with_output().map_err(GitFuseError::IoError)?;
    check_status(output, args)
}

fn check_status(output: Output, args: &[String]) -> Result<Output, GitFuseError> {
    if !output.status.success() {
        let code = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(GitFuseError::GitCliError {
            code,
            stderr,
            args: args.to_vec(),
        });
    }
    Ok(output)
}

/// Parse git version string (e.g., "git version 2.39.3 (Apple Git-146)") to extract major, minor, patch.
/// Returns None if the version cannot be parsed.
fn parse_git_version(version_str: &str) -> Option<(u32, u32, u32)> {
    let parts: Vec<&str> = version_str.trim().split_whitespace().collect();
    let version_part = parts.get(2)?;

    // "2.39.3" or "2.39.3.windows.1"
    let version_nums: Vec<&str> = version_part.split('.').collect();
    if version_nums.len() < 2 {
        return None;
    }

    let major = version_nums.first()?.parse::<u32>().ok()?;
    let minor = version_nums.get(1)?.parse::<u32>().ok()?;
    let patch = version_nums
        .get(2)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    Some((major, minor, patch))
}
