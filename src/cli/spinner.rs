use std::borrow::Cow;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Tick interval for spinner animation.
const TICK_MS: u64 = 80;

/// Indentation prefix for sub-operation output lines.
const INDENT: &str = "  ";

/// 256-color index for spinner dots (208 = orange).
const SPINNER_COLOR: u8 = 208;

/// Create an indented spinner under a `>` header line.
#[must_use]
pub fn start(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
            .template(&format!("{INDENT}{{spinner:.{SPINNER_COLOR}}} {{msg}}"))
            .expect("valid template"),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(TICK_MS));
    pb
}

/// Finish the spinner with a green "ok" prefix.
pub fn finish_ok(pb: &ProgressBar, message: &str) {
    pb.finish_and_clear();
    println!("{INDENT}{} {message}", "ok".green());
}

/// Finish the spinner with a red "failed" prefix.
pub fn finish_failed(pb: &ProgressBar, message: &str) {
    pb.finish_and_clear();
    println!("{INDENT}{} {message}", "failed".red());
}
