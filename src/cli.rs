use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};

use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONTENT_ID, Settings};
use crate::console::{ARROW, CHECKMARK, CROSS, Console, INFO, MEMO, ROCKET, WARNING};
use crate::extractor::Extractor;
use crate::models::{Args, ExtractionOutcome, ExtractionRequest};
use crate::paths::{
    build_extraction_target_path, default_cache_root, prompt_cache_root, resolve_archive_path,
    select_base_dir,
};

const RULE_WIDTH: usize = 60;

/// Install the stderr log subscriber. `-v` steps from WARN down to TRACE.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main CLI entry point. Every failure is reported on the console; nothing
/// propagates to the caller.
pub fn run<C: Console>(args: &Args, console: &mut C) {
    if let Err(error) = seed_cache(args, console) {
        warn!("{error:#}");
        console.print_line("");
        console.print_line(&"=".repeat(RULE_WIDTH));
        console.print_line(&format!("{CROSS}Unexpected error: {error:#}"));
        console.print_line(&"=".repeat(RULE_WIDTH));
    }

    if !args.no_pause {
        console.print_line("");
        console.print_line(&format!("{MEMO}Press Enter to exit..."));
        // Nothing left to do whether or not a line arrives
        let _ = console.prompt("");
    }
}

fn seed_cache<C: Console>(args: &Args, console: &mut C) -> Result<ExtractionOutcome> {
    let default_archive = format!("{DEFAULT_CONTENT_ID}.zip");
    let base = select_base_dir(&[CONFIG_FILE_NAME, default_archive.as_str()]);
    let base_dir = args
        .archive
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base.base_dir());

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(&base_dir)?,
    };

    let archive = args
        .archive
        .clone()
        .unwrap_or_else(|| resolve_archive_path(base.as_ref(), &settings.archive_name));

    print_banner(console, &settings);

    let cache_root = choose_cache_root(args, console)?;
    let destination = build_extraction_target_path(&cache_root, &settings);

    console.clear();
    console.set_title(&settings.title);
    console.print_line(&"=".repeat(RULE_WIDTH));
    console.print_line(&format!("{ROCKET}Starting file extraction..."));
    console.print_line(&"=".repeat(RULE_WIDTH));

    let request = ExtractionRequest::new(archive, destination);
    info!(
        archive = %request.source_archive.display(),
        destination = %request.destination.display(),
        "extracting"
    );
    let outcome = Extractor::new().extract(&request);

    console.clear();
    report(console, &outcome);
    Ok(outcome)
}

fn print_banner<C: Console>(console: &mut C, settings: &Settings) {
    console.print_line(&"=".repeat(RULE_WIDTH));
    console.print_line(&settings.title);
    console.print_line(&"=".repeat(RULE_WIDTH));
    console.print_line("");
    console.print_line(&format!("{INFO}This tool only works for:"));
    console.print_line(&format!("World Name: {}", settings.world_name));
    console.print_line(&format!("World ID: {}", settings.world_id));
    console.print_line(&"-".repeat(RULE_WIDTH));
    console.print_line("");
}

fn choose_cache_root<C: Console>(args: &Args, console: &mut C) -> Result<PathBuf> {
    if let Some(root) = &args.cache_root {
        if root.exists() {
            return Ok(root.clone());
        }
        warn!(path = %root.display(), "cache root given on the command line does not exist");
        console.print_line(&format!(
            "{WARNING}{} does not exist, asking instead.",
            root.display()
        ));
    }

    let default = default_cache_root();
    prompt_cache_root(console, default.as_deref(), Path::exists)
}

fn report<C: Console>(console: &mut C, outcome: &ExtractionOutcome) {
    console.print_line(&"=".repeat(RULE_WIDTH));
    match outcome {
        ExtractionOutcome::Succeeded { .. } => {
            console.print_line(&format!("{CHECKMARK}Process completed successfully"));
            console.print_line(&format!("{ARROW}You can now start the game."));
        }
        ExtractionOutcome::Failed(error) => {
            console.print_line(&format!("{CROSS}Cache extraction failed:"));
            console.print_line(&format!("{WARNING}Error details: {error}"));
        }
    }
    console.print_line(&"=".repeat(RULE_WIDTH));
}
