use std::io::IsTerminal;

static DEBUG_ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
static IS_TERMINAL: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

/// Maximum number of characters of a commit subject shown in progress lines
pub const SUBJECT_MAX_CHARS: usize = 72;

fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| {
        (cfg!(debug_assertions) || std::env::var("GIT_FUSE_DEBUG").unwrap_or_default() == "1")
            && std::env::var("GIT_FUSE_DEBUG").unwrap_or_default() != "0"
    })
}

/// Debug logging utility function
///
/// Prints debug messages with a colored prefix when debug assertions are enabled or when
/// the `GIT_FUSE_DEBUG` environment variable is set to "1". `GIT_FUSE_DEBUG=0` silences
/// debug builds too.
pub fn debug_log(msg: &str) {
    if is_debug_enabled() {
        eprintln!("\x1b[1;33m[git-fuse]\x1b[0m {}", msg);
    }
}

/// Warnings are always shown, independent of the debug switch.
pub fn warn_log(msg: &str) {
    eprintln!("\x1b[1;33m[git-fuse]\x1b[0m warning: {}", msg);
}

pub fn is_interactive_terminal() -> bool {
    *IS_TERMINAL.get_or_init(|| std::io::stderr().is_terminal())
}

/// First line of a commit message, cut to `SUBJECT_MAX_CHARS` characters with a
/// trailing "..." when anything was cut.
pub fn truncate_subject(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or("");
    let mut chars = first_line.char_indices();
    match chars.nth(SUBJECT_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &first_line[..cut]),
        None => first_line.to_string(),
    }
}

/// Short form of an object id as shown in progress output
pub fn short_oid(oid: &str) -> &str {
    oid.get(..8).unwrap_or(oid)
}
