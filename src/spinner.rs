use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::is_interactive_terminal;

/// Spinner shown on stderr while waiting on the network. Hidden when stderr is
/// not a terminal so piped output stays clean.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if is_interactive_terminal() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                pb.set_style(
                    style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
                );
            }
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());

        Self { pb }
    }

    pub fn success(&self, message: &str) {
        self.pb.finish_and_clear();
        if !self.pb.is_hidden() {
            eprintln!("\x1b[1;32m✓ {}\x1b[0m", message);
        }
    }

    pub fn error(&self, message: &str) {
        self.pb.finish_and_clear();
        if !self.pb.is_hidden() {
            eprintln!("\x1b[1;31m✗ {}\x1b[0m", message);
        }
    }
}
