mod changeset;
mod cli;
mod config;
mod constants;
mod context;
mod exec;
mod fallback;
mod gemini;
mod git;
mod message;
mod review;
mod ui;

use crate::changeset::{ChangeSet, FileChange};
use crate::cli::Cli;
use crate::config::RunConfig;
use crate::constants::{API_TIMEOUT_SECS, DIFF_SIZE_MAXIMUM_BYTES, DIFF_SIZE_WARNING_BYTES};
use crate::context::CommitContext;
use crate::exec::ExecStatus;
use crate::message::CandidateMessage;
use crate::review::ReviewOutcome;
use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use num_format::{Locale, ToFormattedString};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

enum RunStatus {
    Done,
    Cancelled,
}

fn main() {
    match run() {
        Ok(RunStatus::Done) => {}
        Ok(RunStatus::Cancelled) => std::process::exit(2),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<RunStatus> {
    let config = RunConfig::from_cli(Cli::parse_args());
    let root = Path::new(".");

    git::sanity_check(root)?;

    // explicit message: no generation, no review
    if let Some(text) = &config.message {
        let outcome = ReviewOutcome::Accepted(CandidateMessage::parse(text));
        return finish(root, outcome, &config, false);
    }

    let changeset = git::snapshot(root)?;
    if changeset.files.is_empty() {
        info!("no changes detected, nothing to commit");
        return Ok(RunStatus::Done);
    }

    let interactive = !config.dry_run;
    if interactive
        && (!std::io::stdin().is_terminal() || !std::io::stdout().is_terminal())
    {
        bail!("interactive terminal required (use --message or --dry-run)");
    }

    let file_count = changeset.files.len();
    status!(
        "generating commit message from {} touching {} {}...",
        changeset.source(),
        file_count,
        if file_count == 1 { "file" } else { "files" }
    );

    if !check_diff_size(&changeset, interactive)? {
        return Ok(RunStatus::Cancelled);
    }

    // settle staging intent up front; the actual `git add` only happens
    // in the executor, after approval
    let stage_confirmed = if !changeset.is_staged && !config.auto_stage && interactive {
        status!("changes are not staged, stage all of them on commit?");
        if ui::prompt(&["YES", "no"])? == 'y' {
            true
        } else {
            info!("nothing staged, nothing to commit");
            return Ok(RunStatus::Cancelled);
        }
    } else {
        false
    };

    let display_lines = file_lines(&changeset.files);
    let ChangeSet {
        files,
        branch,
        recent_subjects,
        ..
    } = changeset;
    let context = context::build(files, branch, recent_subjects);

    if config.show_prompt {
        use colored::Colorize;
        use std::io::Write;
        let _ = writeln!(std::io::stdout(), "\n{}", gemini::build_prompt(&context).dimmed());
    }

    let candidate = generate(&config, &context);
    drop(context);

    let outcome = if config.dry_run {
        ReviewOutcome::Accepted(candidate)
    } else {
        review::review(candidate, &display_lines)?
    };

    finish(root, outcome, &config, stage_confirmed)
}

fn finish(
    root: &Path,
    outcome: ReviewOutcome,
    config: &RunConfig,
    stage_confirmed: bool,
) -> Result<RunStatus> {
    match exec::execute(root, outcome, config, stage_confirmed)? {
        ExecStatus::Cancelled => Ok(RunStatus::Cancelled),
        ExecStatus::Committed | ExecStatus::Pushed | ExecStatus::DryRun => Ok(RunStatus::Done),
    }
}

/// try the remote model, fall back to local generation on any failure
///
/// the fallback decision lives here, not inside the remote generator, so
/// both paths stay independently testable and the failure gets logged
fn generate(config: &RunConfig, context: &CommitContext) -> CandidateMessage {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner}")
            .expect("invalid spinner template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = gemini::generate(
        context,
        config.credential.as_deref(),
        Duration::from_secs(API_TIMEOUT_SECS),
    );

    spinner.finish_and_clear();

    match result {
        Ok(message) => message,
        Err(e) => {
            warning!("remote generation failed ({e}), using local fallback");
            fallback::generate(context)
        }
    }
}

/// guard against pathological diffs before anything leaves the machine
fn check_diff_size(changeset: &ChangeSet, interactive: bool) -> Result<bool> {
    let size = changeset.diff_size();
    if size > DIFF_SIZE_MAXIMUM_BYTES {
        bail!(
            "diff is too large ({} chars, max {})",
            size.to_formatted_string(&Locale::en),
            DIFF_SIZE_MAXIMUM_BYTES.to_formatted_string(&Locale::en)
        );
    }
    if size > DIFF_SIZE_WARNING_BYTES {
        warning!(
            "diff is large ({} chars), this may use many tokens",
            size.to_formatted_string(&Locale::en)
        );
        if interactive && ui::prompt(&["continue", "abort"])? == 'a' {
            return Ok(false);
        }
    }
    Ok(true)
}

fn file_lines(files: &[FileChange]) -> Vec<String> {
    files
        .iter()
        .map(|file| match &file.old_path {
            Some(old) => format!("{} {} → {}", file.status.symbol(), old, file.path),
            None => format!("{} {}", file.status.symbol(), file.path),
        })
        .collect()
}
