use crate::changeset::{ChangeSet, ChangeStatus, FileChange};
use crate::constants::RECENT_COMMIT_LIMIT;
use git2::{Delta, DiffFindOptions, DiffFormat, DiffOptions, Repository, RepositoryState};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository: {0}")]
    NotARepository(String),
    #[error("failed to inspect repository: {0}")]
    InspectionFailed(String),
    #[error("nothing to commit (no staged changes)")]
    NothingToCommit,
    #[error("commit failed: {0}")]
    CommitFailed(String),
    #[error("push failed: {0}")]
    PushFailed(String),
}

fn inspection(e: git2::Error) -> GitError {
    GitError::InspectionFailed(e.message().to_string())
}

/// check that we're in a usable git repository before doing anything else
pub fn sanity_check(path: &Path) -> Result<(), GitError> {
    let repo =
        Repository::discover(path).map_err(|e| GitError::NotARepository(e.message().to_string()))?;

    if repo.state() != RepositoryState::Clean {
        return Err(GitError::InspectionFailed(
            "repository is in the middle of an operation (merge, rebase, etc)".to_string(),
        ));
    }
    if repo.head_detached().unwrap_or(false) {
        return Err(GitError::InspectionFailed(
            "repository is in detached HEAD state".to_string(),
        ));
    }
    Ok(())
}

/// snapshot the pending changes and the history context around them
///
/// staged changes win; with nothing staged the unstaged changes (including
/// untracked files) are used instead. an empty repository state yields an
/// empty file list, not an error — callers decide whether that is terminal.
pub fn snapshot(path: &Path) -> Result<ChangeSet, GitError> {
    let repo =
        Repository::discover(path).map_err(|e| GitError::NotARepository(e.message().to_string()))?;

    let branch = branch_name(&repo);
    let recent_subjects = recent_subjects(&repo, RECENT_COMMIT_LIMIT);

    let staged = staged_diff(&repo)?;
    let staged_files = collect_files(&staged);
    if !staged_files.is_empty() {
        let files = attach_hunks(&staged, staged_files)?;
        return Ok(ChangeSet {
            files,
            branch,
            recent_subjects,
            is_staged: true,
        });
    }

    let unstaged = unstaged_diff(&repo)?;
    let unstaged_files = collect_files(&unstaged);
    let files = attach_hunks(&unstaged, unstaged_files)?;
    Ok(ChangeSet {
        files,
        branch,
        recent_subjects,
        is_staged: false,
    })
}

/// current branch short name; resolves the symbolic HEAD for unborn branches
pub fn current_branch(path: &Path) -> Result<String, GitError> {
    let repo =
        Repository::discover(path).map_err(|e| GitError::NotARepository(e.message().to_string()))?;
    Ok(branch_name(&repo))
}

fn branch_name(repo: &Repository) -> String {
    if let Ok(head) = repo.head()
        && let Some(name) = head.shorthand()
    {
        return name.to_string();
    }
    // unborn branch: HEAD exists only as a symbolic reference
    repo.find_reference("HEAD")
        .ok()
        .and_then(|r| r.symbolic_target().map(str::to_string))
        .map(|target| {
            target
                .strip_prefix("refs/heads/")
                .unwrap_or(&target)
                .to_string()
        })
        .unwrap_or_else(|| "HEAD".to_string())
}

/// most recent commit subject lines, skipping merge commits
fn recent_subjects(repo: &Repository, limit: usize) -> Vec<String> {
    let mut subjects = Vec::new();
    let Ok(mut walk) = repo.revwalk() else {
        return subjects;
    };
    if walk.push_head().is_err() {
        // no commits yet
        return subjects;
    }
    for oid in walk.flatten() {
        let Ok(commit) = repo.find_commit(oid) else {
            continue;
        };
        if commit.parent_count() > 1 {
            continue;
        }
        if let Some(summary) = commit.summary() {
            subjects.push(summary.to_string());
        }
        if subjects.len() == limit {
            break;
        }
    }
    subjects
}

fn staged_diff(repo: &Repository) -> Result<git2::Diff<'_>, GitError> {
    // unborn branch (no commits yet): compare the index against an empty tree
    let tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree().map_err(inspection)?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(inspection(e)),
    };

    let mut diff = repo
        .diff_tree_to_index(tree.as_ref(), None, None)
        .map_err(inspection)?;
    detect_renames(&mut diff)?;
    Ok(diff)
}

fn unstaged_diff(repo: &Repository) -> Result<git2::Diff<'_>, GitError> {
    let mut opts = DiffOptions::new();
    opts.include_untracked(true);
    opts.recurse_untracked_dirs(true);
    opts.show_untracked_content(true);
    let mut diff = repo
        .diff_index_to_workdir(None, Some(&mut opts))
        .map_err(inspection)?;
    detect_renames(&mut diff)?;
    Ok(diff)
}

fn detect_renames(diff: &mut git2::Diff) -> Result<(), GitError> {
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    find_opts.rename_threshold(50); // 50% similarity (git default)
    find_opts.copy_threshold(50);
    diff.find_similar(Some(&mut find_opts)).map_err(inspection)
}

/// extract the file list from a diff; renames collapse to a single entry
fn collect_files(diff: &git2::Diff) -> Vec<FileChange> {
    let mut files = Vec::new();

    for delta in diff.deltas() {
        let status = match delta.status() {
            Delta::Deleted => ChangeStatus::Deleted,
            Delta::Modified | Delta::Typechange => ChangeStatus::Modified,
            Delta::Renamed => ChangeStatus::Renamed,
            Delta::Added | Delta::Copied | Delta::Untracked => ChangeStatus::Added,
            _ => continue, // skip ignored, unmodified, etc.
        };

        let (path, old_path) = match status {
            ChangeStatus::Renamed => (
                delta.new_file().path(),
                delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string()),
            ),
            ChangeStatus::Deleted => (delta.old_file().path(), None),
            _ => (delta.new_file().path(), None),
        };

        if let Some(path) = path {
            files.push(FileChange {
                status,
                path: path.to_string_lossy().to_string(),
                old_path,
                hunk: None,
            });
        }
    }

    files
}

/// fill in per-file hunk text, leaving it out for binary and noise files
fn attach_hunks(diff: &git2::Diff, mut files: Vec<FileChange>) -> Result<Vec<FileChange>, GitError> {
    let mut hunks: HashMap<String, String> = HashMap::new();
    let mut skipped: Vec<String> = Vec::new();

    for delta in diff.deltas() {
        let is_binary = delta.new_file().is_binary() || delta.old_file().is_binary();
        if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
            let path = path.to_string_lossy().to_string();
            if is_binary || is_noise_file(&path) {
                skipped.push(path);
            }
        }
    }

    diff.print(DiffFormat::Patch, |delta, _hunk, line| {
        let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) else {
            return true;
        };
        let path = path.to_string_lossy().to_string();
        if skipped.contains(&path) {
            return true;
        }

        let entry = hunks.entry(path).or_default();
        let content = std::str::from_utf8(line.content()).unwrap_or("");
        match line.origin() {
            // content lines keep their origin marker
            '+' | '-' | ' ' => entry.push(line.origin()),
            _ => {}
        }
        entry.push_str(content);
        true
    })
    .map_err(inspection)?;

    for file in &mut files {
        file.hunk = hunks
            .remove(&file.path)
            .map(|h| h.trim_end_matches('\n').to_string());
    }
    Ok(files)
}

/// lock files and minified assets carry no signal worth sending anywhere
fn is_noise_file(path: &str) -> bool {
    let lower = path.to_lowercase();

    if lower.ends_with("-lock.json") || lower.ends_with("-lock.yaml") {
        return true;
    }
    if let Some(ext) = Path::new(&lower).extension()
        && ext == "lock"
    {
        return true;
    }
    lower.ends_with(".min.js")
        || lower.ends_with(".min.css")
        || lower.ends_with("-min.js")
        || lower.ends_with("-min.css")
}

/// whether the index differs from HEAD
pub fn has_staged_changes(path: &Path) -> Result<bool, GitError> {
    let repo =
        Repository::discover(path).map_err(|e| GitError::NotARepository(e.message().to_string()))?;
    let diff = staged_diff(&repo)?;
    let stats = diff.stats().map_err(inspection)?;
    Ok(stats.files_changed() > 0)
}

/// stage everything in the working tree, additions and removals alike
pub fn stage_all(path: &Path) -> Result<(), GitError> {
    let repo =
        Repository::discover(path).map_err(|e| GitError::NotARepository(e.message().to_string()))?;
    let mut index = repo.index().map_err(inspection)?;

    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .map_err(inspection)?;
    // add_all does not drop entries for deleted files; update_all does
    index.update_all(["*"].iter(), None).map_err(inspection)?;
    index.write().map_err(inspection)
}

/// create a commit with the given message
///
/// uses the git binary rather than git2 so commit signing (gpg/ssh) and
/// hooks (pre-commit, commit-msg, etc.) work as expected
pub fn commit(path: &Path, message: &str) -> Result<(), GitError> {
    let status = std::process::Command::new("git")
        .arg("commit")
        .arg("--message")
        .arg(message)
        .current_dir(path)
        .status();

    match status {
        Ok(exit) if exit.success() => Ok(()),
        Ok(exit) => Err(GitError::CommitFailed(format!(
            "git commit exited with {exit}"
        ))),
        Err(e) => Err(GitError::CommitFailed(format!("failed to run git: {e}"))),
    }
}

/// push the branch; the git binary handles credential helpers and remotes
pub fn push(path: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    let status = std::process::Command::new("git")
        .arg("push")
        .arg(remote)
        .arg(branch)
        .current_dir(path)
        .status();

    match status {
        Ok(exit) if exit.success() => Ok(()),
        Ok(exit) => Err(GitError::PushFailed(format!(
            "git push exited with {exit}"
        ))),
        Err(e) => Err(GitError::PushFailed(format!("failed to run git: {e}"))),
    }
}

#[cfg(test)]
mod tests;
