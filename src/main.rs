use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use git_fuse::commands::fuse::{self, FuseOptions, normalize_source};
use git_fuse::config::{Config, UnresolvedParentPolicy};
use git_fuse::git::find_repository_in_path;
use git_fuse::utils::{debug_log, short_oid};

#[derive(Parser)]
#[command(name = "git-fuse")]
#[command(version)]
#[command(
    about = "Fuse the history of a branch from another repository into a subdirectory",
    long_about = None
)]
struct Cli {
    /// URL or path of the source repository
    source: String,

    /// Subdirectory that receives the source history
    directory: String,

    /// Branch of the source repository to fuse (default: configured default branch)
    #[arg(short, long)]
    branch: Option<String>,

    /// Target repository (default: current directory)
    #[arg(short = 'C', value_name = "PATH")]
    repo: Option<PathBuf>,

    /// Do not print a line per rewritten commit
    #[arg(short, long)]
    quiet: bool,

    /// Drop commits whose parents could not be rewritten instead of aborting
    #[arg(long)]
    skip_unresolved: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = Config::get();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: cannot read current directory: {}", e);
            std::process::exit(1);
        }
    };
    let repo_path = cli.repo.clone().unwrap_or_else(|| cwd.clone());

    let repo = match find_repository_in_path(&repo_path.to_string_lossy()) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("error: failed to find repository: {}", e);
            std::process::exit(1);
        }
    };

    let options = FuseOptions {
        source: normalize_source(&cli.source, &cwd),
        branch: cli
            .branch
            .clone()
            .unwrap_or_else(|| config.default_branch().to_string()),
        target_dir: cli.directory.clone(),
        unresolved_parents: if cli.skip_unresolved {
            UnresolvedParentPolicy::Skip
        } else {
            config.unresolved_parents()
        },
    };
    debug_log(&format!("{:?} in {}", options, repo.path().display()));

    let stdout = std::io::stdout();
    let mut stdout_lock = stdout.lock();
    let mut sink = std::io::sink();
    let output: &mut dyn Write = if cli.quiet {
        &mut sink
    } else {
        &mut stdout_lock
    };

    match fuse::run(&repo, &options, output) {
        Ok(summary) => {
            debug_log(&format!(
                "{} commits rewritten, {} skipped, {} -> {}",
                summary.rewritten,
                summary.skipped.len(),
                short_oid(&summary.previous_head),
                short_oid(&summary.new_tip)
            ));
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
