//! CLI command for diffing two ODS files

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use console::style;
use indicatif::ProgressBar;

use super::OutputFormat;
use super::progress::{
    DISK, GEAR, LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar,
};
use crate::config::DiffConfig;
use crate::diff::{self, DiffPhase, DiffProgress};

const TOTAL_STEPS: usize = 5;

/// Diff two files and print the report
pub fn compare(
    origin: &Path,
    modified: &Path,
    config: &DiffConfig,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let show_progress = !quiet && format == OutputFormat::Text;

    if show_progress {
        print_banner(origin, modified, &config.output_path(origin, modified)?);
    }

    let bar: Mutex<Option<ProgressBar>> = Mutex::new(None);
    let on_progress = |progress: &DiffProgress| {
        if show_progress {
            display_progress(progress, &bar);
        }
    };

    let result = diff::diff_files_with_progress(origin, modified, config, &on_progress);
    if let Ok(mut bar) = bar.lock() {
        if let Some(pb) = bar.take() {
            pb.finish_and_clear();
        }
    }
    let report = result?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if quiet {
                println!("{}", report.output.display());
            } else {
                println!();
                println!("{report}");
                print_done(start.elapsed());
            }
        }
    }

    Ok(())
}

fn display_progress(progress: &DiffProgress, bar: &Mutex<Option<ProgressBar>>) {
    match progress.phase {
        DiffPhase::Extracting => print_step(1, TOTAL_STEPS, PACKAGE, "Extracting documents..."),
        DiffPhase::Parsing => print_step(2, TOTAL_STEPS, LOOKING_GLASS, "Parsing content..."),
        DiffPhase::Comparing => {
            let Ok(mut bar) = bar.lock() else {
                return;
            };
            if progress.current == 0 {
                print_step(
                    3,
                    TOTAL_STEPS,
                    GEAR,
                    &format!("Comparing {} sheet(s)...", progress.total),
                );
                *bar = Some(simple_bar(progress.total as u64, "Comparing"));
            } else if let Some(pb) = bar.as_ref() {
                pb.set_position(progress.current as u64);
                if let Some(item) = &progress.current_item {
                    pb.set_message(item.clone());
                }
            }
        }
        DiffPhase::Writing => {
            if let Ok(mut bar) = bar.lock() {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
            print_step(4, TOTAL_STEPS, DISK, "Writing content...");
        }
        DiffPhase::Packaging => print_step(5, TOTAL_STEPS, PACKAGE, "Packaging output..."),
        DiffPhase::Complete => {}
    }
}

fn print_banner(origin: &Path, modified: &Path, output: &Path) {
    let absolute = |path: &Path| std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    println!("{}", style("---").blue());
    println!("{}", style("odsdiff: Make a diff between two .ods files.").blue());
    println!("> Original file path: {}", absolute(origin).display());
    println!("> Modified file path: {}", absolute(modified).display());
    println!("> Output file path:   {}", absolute(output).display());
    println!("{}", style("---").blue());
    println!();
}
