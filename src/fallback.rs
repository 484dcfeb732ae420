use crate::changeset::{ChangeStatus, FileChange};
use crate::constants::MAX_LINE_LENGTH;
use crate::context::{ChangeHint, CommitContext};
use crate::message::{CandidateMessage, CommitType};
use std::path::Path;

/// synthesize a commit message from the context alone, no network
///
/// deterministic: the same context always yields the same message. worst
/// case is `chore: update files` when nothing gives a signal.
pub fn generate(context: &CommitContext) -> CandidateMessage {
    let kind = derive_type(context);
    let subject = build_subject(kind, &context.files);
    CandidateMessage::new(kind, subject)
}

fn derive_type(context: &CommitContext) -> CommitType {
    match context.hint {
        ChangeHint::Docs => return CommitType::Docs,
        ChangeHint::Tests => return CommitType::Test,
        ChangeHint::Config => return CommitType::Chore,
        ChangeHint::Source | ChangeHint::Mixed => {}
    }

    let files = &context.files;
    if files.is_empty() {
        return CommitType::Chore;
    }
    if files.iter().all(|f| f.status == ChangeStatus::Deleted) {
        return CommitType::Refactor;
    }
    if files.iter().any(|f| f.status == ChangeStatus::Added) {
        return CommitType::Feat;
    }
    if files.iter().all(|f| f.status == ChangeStatus::Modified) {
        return CommitType::Fix;
    }
    CommitType::Chore
}

fn build_subject(kind: CommitType, files: &[FileChange]) -> String {
    if files.is_empty() {
        return "update files".to_string();
    }

    let verb = dominant_verb(files);
    let target = most_changed(files);
    let base = Path::new(&target.path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| target.path.clone());

    let description = match files.len() {
        1 => base,
        2 => format!("{base} and 1 more file"),
        n => format!("{base} and {} more files", n - 1),
    };

    let subject = format!("{verb} {description}");
    truncate_subject(subject, kind)
}

/// pick the verb from the most common change status; ties break in
/// A, M, D, R order
fn dominant_verb(files: &[FileChange]) -> &'static str {
    let order = [
        (ChangeStatus::Added, "add"),
        (ChangeStatus::Modified, "update"),
        (ChangeStatus::Deleted, "remove"),
        (ChangeStatus::Renamed, "rename"),
    ];
    let mut best = order[0];
    let mut best_count = 0usize;
    for entry in order {
        let count = files.iter().filter(|f| f.status == entry.0).count();
        if count > best_count {
            best = entry;
            best_count = count;
        }
    }
    best.1
}

/// the file with the most changed hunk lines wins; ties resolve to the
/// lexicographically smallest path
fn most_changed(files: &[FileChange]) -> &FileChange {
    let mut best = &files[0];
    let mut best_score = changed_lines(best);
    for file in &files[1..] {
        let score = changed_lines(file);
        if score > best_score || (score == best_score && file.path < best.path) {
            best = file;
            best_score = score;
        }
    }
    best
}

fn changed_lines(file: &FileChange) -> usize {
    let Some(hunk) = &file.hunk else { return 0 };
    hunk.lines()
        .filter(|line| {
            (line.starts_with('+') && !line.starts_with("+++"))
                || (line.starts_with('-') && !line.starts_with("---"))
        })
        .count()
}

fn truncate_subject(mut subject: String, kind: CommitType) -> String {
    let prefix_len = match kind {
        CommitType::Other => 0,
        other => other.as_str().len() + 2,
    };
    let budget = MAX_LINE_LENGTH.saturating_sub(prefix_len);
    if subject.len() > budget {
        let mut cut = budget.saturating_sub(3);
        while cut > 0 && !subject.is_char_boundary(cut) {
            cut -= 1;
        }
        subject.truncate(cut);
        subject.push_str("...");
    }
    subject
}
