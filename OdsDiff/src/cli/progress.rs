//! CLI progress display utilities
//!
//! Yarnish-style step lines with emojis, plus a bar for per-sheet work.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/parsing operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for extraction/packaging operations
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Gear - for comparison operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/5] 📦 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

// =============================================================================
// Progress Styles
// =============================================================================

/// Progress bar style for determinate progress
///
/// Format: `Comparing [████████░░░░░░░░] 1/2 Sheet1`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
        .expect("valid template")
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_prefix(prefix.to_string());
    pb
}
