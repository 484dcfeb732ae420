use crate::changeset::FileChange;
use crate::constants::{HUNK_LIMIT_CHARS, RECENT_COMMIT_LIMIT};
use std::fmt;
use std::path::Path;

/// coarse classification of a changed path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Docs,
    Tests,
    Config,
    Source,
}

/// what kind of change the set as a whole looks like, by majority vote
/// over file categories; ties resolve to `Mixed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeHint {
    Docs,
    Tests,
    Config,
    Source,
    Mixed,
}

impl fmt::Display for ChangeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeHint::Docs => "docs-only",
            ChangeHint::Tests => "test-only",
            ChangeHint::Config => "config-only",
            ChangeHint::Source => "source-only",
            ChangeHint::Mixed => "mixed",
        })
    }
}

/// normalized input for message generation
///
/// immutable once built; the pipeline drops it after a candidate message
/// has been produced
#[derive(Debug)]
pub struct CommitContext {
    pub files: Vec<FileChange>,
    pub branch: String,
    pub recent_subjects: Vec<String>,
    pub hint: ChangeHint,
}

/// build a commit context from inspected state
///
/// normalizes paths, drops duplicate entries for the same path (insertion
/// order wins), truncates oversized hunks, and derives the change-type hint.
/// always succeeds on well-formed input.
pub fn build(
    files: Vec<FileChange>,
    branch: String,
    mut recent_subjects: Vec<String>,
) -> CommitContext {
    let mut normalized: Vec<FileChange> = Vec::with_capacity(files.len());
    for mut file in files {
        file.path = normalize_path(&file.path);
        if let Some(old) = file.old_path.take() {
            file.old_path = Some(normalize_path(&old));
        }
        if normalized.iter().any(|f| f.path == file.path) {
            continue;
        }
        if let Some(hunk) = file.hunk.as_mut()
            && hunk.len() > HUNK_LIMIT_CHARS
        {
            truncate_at_char_boundary(hunk, HUNK_LIMIT_CHARS);
            hunk.push_str("\n[diff truncated]");
        }
        normalized.push(file);
    }

    recent_subjects.truncate(RECENT_COMMIT_LIMIT);

    let hint = derive_hint(&normalized);
    CommitContext {
        files: normalized,
        branch,
        recent_subjects,
        hint,
    }
}

fn normalize_path(path: &str) -> String {
    path.trim().trim_start_matches("./").replace('\\', "/")
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    let mut cut = max;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

/// classify a path by where it lives and what extension it carries
pub fn categorize(path: &str) -> FileCategory {
    let lower = path.to_lowercase();
    let file_name = Path::new(&lower)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = Path::new(&lower)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    let in_dir = |dir: &str| {
        lower.starts_with(&format!("{dir}/")) || lower.contains(&format!("/{dir}/"))
    };

    if in_dir("tests") || in_dir("test") || file_name.starts_with("test_") {
        return FileCategory::Tests;
    }
    if in_dir("docs") || in_dir("doc") || file_name.starts_with("readme") {
        return FileCategory::Docs;
    }
    match extension.as_str() {
        "md" | "markdown" | "rst" | "adoc" => FileCategory::Docs,
        "toml" | "yaml" | "yml" | "json" | "ini" | "cfg" | "lock" => FileCategory::Config,
        _ => {
            if file_name == "makefile" || file_name == "dockerfile" || lower.starts_with(".github/")
            {
                FileCategory::Config
            } else {
                FileCategory::Source
            }
        }
    }
}

fn derive_hint(files: &[FileChange]) -> ChangeHint {
    let mut counts = [0usize; 4];
    for file in files {
        counts[categorize(&file.path) as usize] += 1;
    }

    let best = counts.iter().copied().max().unwrap_or(0);
    if best == 0 {
        return ChangeHint::Mixed;
    }
    if counts.iter().filter(|&&c| c == best).count() > 1 {
        return ChangeHint::Mixed;
    }
    match counts.iter().position(|&c| c == best) {
        Some(0) => ChangeHint::Docs,
        Some(1) => ChangeHint::Tests,
        Some(2) => ChangeHint::Config,
        _ => ChangeHint::Source,
    }
}
