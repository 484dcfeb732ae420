use crate::config::RunConfig;
use crate::constants::PUSH_REMOTE;
use crate::git::{self, GitError};
use crate::message::CandidateMessage;
use crate::review::ReviewOutcome;
use crate::{info, status};
use std::path::Path;

/// what the executor ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    Committed,
    Pushed,
    DryRun,
    Cancelled,
}

/// carry out the approved outcome: stage, commit, push
///
/// rejection is a no-op; dry-run reports the planned actions without a
/// single mutating call. commit and push failures are surfaced, never
/// retried — the commit success is reported before the push runs so a
/// failed push still shows the partial progress.
pub fn execute(
    path: &Path,
    outcome: ReviewOutcome,
    config: &RunConfig,
    stage_confirmed: bool,
) -> Result<ExecStatus, GitError> {
    let message = match outcome {
        ReviewOutcome::Rejected => {
            status!("commit cancelled, repository untouched");
            return Ok(ExecStatus::Cancelled);
        }
        ReviewOutcome::Accepted(message) | ReviewOutcome::Edited(message) => message,
    };

    let want_stage = config.auto_stage || stage_confirmed;

    if config.dry_run {
        report_dry_run(&message, config, want_stage);
        return Ok(ExecStatus::DryRun);
    }

    if want_stage && !git::has_staged_changes(path)? {
        git::stage_all(path)?;
        status!("staged all changes");
    }

    if !git::has_staged_changes(path)? {
        return Err(GitError::NothingToCommit);
    }

    git::commit(path, &message.render())?;
    status!("committed: {}", message.summary());

    if config.auto_push {
        let branch = git::current_branch(path)?;
        git::push(path, PUSH_REMOTE, &branch)?;
        status!("pushed to {}/{}", PUSH_REMOTE, branch);
        return Ok(ExecStatus::Pushed);
    }

    Ok(ExecStatus::Committed)
}

fn report_dry_run(message: &CandidateMessage, config: &RunConfig, want_stage: bool) {
    status!("dry run, no changes will be made");
    if want_stage {
        info!("would stage all changes");
    }
    info!("would commit: {}", message.summary());
    if config.auto_push {
        info!("would push to {}", PUSH_REMOTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::CommitType;
    use std::fs;
    use tempfile::TempDir;

    fn config(auto_stage: bool, auto_push: bool, dry_run: bool) -> RunConfig {
        RunConfig {
            auto_stage,
            auto_push,
            dry_run,
            message: None,
            credential: None,
            show_prompt: false,
        }
    }

    fn accepted() -> ReviewOutcome {
        ReviewOutcome::Accepted(CandidateMessage::new(CommitType::Fix, "x"))
    }

    #[test]
    fn rejected_outcome_is_a_no_op() {
        // not even a repository: a rejection must touch nothing
        let dir = TempDir::new().unwrap();
        let result = execute(dir.path(), ReviewOutcome::Rejected, &config(true, true, false), true);
        assert_eq!(result.unwrap(), ExecStatus::Cancelled);
    }

    #[test]
    fn dry_run_never_calls_the_vcs() {
        // would fail on has_staged_changes if any call were made
        let dir = TempDir::new().unwrap();
        for (auto_stage, auto_push) in [(false, false), (true, false), (false, true), (true, true)]
        {
            let result = execute(
                dir.path(),
                accepted(),
                &config(auto_stage, auto_push, true),
                true,
            );
            assert_eq!(result.unwrap(), ExecStatus::DryRun);
        }
    }

    #[test]
    fn dry_run_reports_for_edited_outcome_too() {
        let dir = TempDir::new().unwrap();
        let outcome = ReviewOutcome::Edited(CandidateMessage::new(CommitType::Docs, "y"));
        let result = execute(dir.path(), outcome, &config(false, false, true), false);
        assert_eq!(result.unwrap(), ExecStatus::DryRun);
    }

    #[test]
    fn nothing_to_commit_when_staging_finds_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        let mut git_config = repo.config().unwrap();
        git_config.set_str("user.name", "Test User").unwrap();
        git_config.set_str("user.email", "test@example.com").unwrap();

        // clean tree: auto-stage stages nothing, commit step must refuse
        fs::write(dir.path().join("file.txt"), "content").unwrap();
        crate::git::stage_all(dir.path()).unwrap();
        crate::git::commit(dir.path(), "chore: seed").unwrap();

        let result = execute(dir.path(), accepted(), &config(true, false, false), false);
        assert!(matches!(result.unwrap_err(), GitError::NothingToCommit));
    }
}
