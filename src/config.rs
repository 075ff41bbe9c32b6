use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Branch fused when neither the CLI, the config file, the environment nor git's
/// `init.defaultBranch` name one.
pub const FALLBACK_DEFAULT_BRANCH: &str = "master";

pub struct Config {
    git_path: String,
    default_branch: String,
    unresolved_parents: UnresolvedParentPolicy,
}

/// What to do with a source commit whose parent has no rewritten counterpart.
///
/// Under a dependency-ordered walk this never happens, so `Abort` is the default.
/// `Skip` drops the commit and, transitively, every descendant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UnresolvedParentPolicy {
    #[default]
    Abort,
    Skip,
}

impl UnresolvedParentPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnresolvedParentPolicy::Abort => "abort",
            UnresolvedParentPolicy::Skip => "skip",
        }
    }

    fn from_str(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "abort" => Some(UnresolvedParentPolicy::Abort),
            "skip" => Some(UnresolvedParentPolicy::Skip),
            _ => None,
        }
    }
}

/// Contents of `~/.git-fuse/config.json`
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_parents: Option<String>,
}

/// `GIT_FUSE_*` environment overrides. Each field takes precedence over the file.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct EnvConfig {
    #[serde(default)]
    pub git_path: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub unresolved_parents: Option<String>,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    /// Access the global configuration. Lazily initializes if not already initialized.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(build_config)
    }

    /// Returns the command to invoke git.
    pub fn git_cmd(&self) -> &str {
        &self.git_path
    }

    /// Source branch used when none is given on the command line.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    pub fn unresolved_parents(&self) -> UnresolvedParentPolicy {
        self.unresolved_parents
    }
}

fn build_config() -> Config {
    let file_cfg = load_file_config();
    let env_cfg = load_env_config();
    let git_default_branch = git_init_default_branch();
    build_config_from(file_cfg.as_ref(), &env_cfg, git_default_branch)
}

fn build_config_from(
    file_cfg: Option<&FileConfig>,
    env_cfg: &EnvConfig,
    git_default_branch: Option<String>,
) -> Config {
    let git_path = resolve_git_path(file_cfg, env_cfg);

    let default_branch = env_cfg
        .default_branch
        .clone()
        .or_else(|| file_cfg.and_then(|c| c.default_branch.clone()))
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .or(git_default_branch)
        .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string());

    let unresolved_parents = env_cfg
        .unresolved_parents
        .as_deref()
        .or_else(|| file_cfg.and_then(|c| c.unresolved_parents.as_deref()))
        .map(|value| {
            UnresolvedParentPolicy::from_str(value).unwrap_or_else(|| {
                eprintln!(
                    "Warning: Invalid unresolved_parents value '{}', using '{}'",
                    value,
                    UnresolvedParentPolicy::default().as_str()
                );
                UnresolvedParentPolicy::default()
            })
        })
        .unwrap_or_default();

    Config {
        git_path,
        default_branch,
        unresolved_parents,
    }
}

fn load_env_config() -> EnvConfig {
    match envy::prefixed("GIT_FUSE_").from_env::<EnvConfig>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Warning: Ignoring GIT_FUSE_* environment overrides: {}", e);
            EnvConfig::default()
        }
    }
}

/// `init.defaultBranch` from the user's global git configuration, if set.
fn git_init_default_branch() -> Option<String> {
    let globals = gix_config::File::from_globals().ok()?;
    globals
        .string("init.defaultBranch")
        .map(|cow| cow.to_string())
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
}

fn resolve_git_path(file_cfg: Option<&FileConfig>, env_cfg: &EnvConfig) -> String {
    // 1) Explicit override from the environment, then the config file
    let configured = env_cfg
        .git_path
        .as_deref()
        .or_else(|| file_cfg.and_then(|c| c.git_path.as_deref()));
    if let Some(path) = configured {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            if is_executable(Path::new(trimmed)) {
                return trimmed.to_string();
            }
            eprintln!(
                "Warning: Configured git_path '{}' is not executable, probing standard locations",
                trimmed
            );
        }
    }

    // 2) Probe common locations across platforms
    let candidates: &[&str] = &[
        "/opt/homebrew/bin/git",
        "/usr/local/bin/git",
        "/usr/bin/git",
        "/bin/git",
        r"C:\\Program Files\\Git\\bin\\git.exe",
        r"C:\\Program Files (x86)\\Git\\bin\\git.exe",
    ];

    if let Some(found) = candidates.iter().map(Path::new).find(|p| is_executable(p)) {
        return found.to_string_lossy().to_string();
    }

    // 3) Let the OS search PATH
    "git".to_string()
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_file_path()?;
    let data = fs::read(&path).ok()?;
    match serde_json::from_slice::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!("Warning: Ignoring invalid {}: {}", path.display(), e);
            None
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".git-fuse").join("config.json"))
}

fn is_executable(path: &Path) -> bool {
    path.exists() && path.is_file()
}
