use super::*;
use std::fs;
use tempfile::TempDir;

/// helper to initialise a test git repository
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    // configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

fn create_file(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// helper to commit everything currently in the working tree
fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parent_commit = repo.head().ok().and_then(|h| h.peel_to_commit().ok());

    if let Some(parent) = parent_commit {
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )
        .unwrap();
    } else {
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])
            .unwrap();
    }
}

#[test]
fn rename_is_a_single_entry() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("old_name.txt"), "file content");
    commit_all(&repo, "initial commit");

    fs::rename(
        repo_path.join("old_name.txt"),
        repo_path.join("new_name.txt"),
    )
    .unwrap();

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new("old_name.txt")).unwrap();
    index.add_path(Path::new("new_name.txt")).unwrap();
    index.write().unwrap();

    let changeset = snapshot(repo_path).unwrap();
    assert!(changeset.is_staged);
    assert_eq!(changeset.files.len(), 1, "rename collapses to one entry");

    let file = &changeset.files[0];
    assert_eq!(file.status, ChangeStatus::Renamed);
    assert_eq!(file.path, "new_name.txt");
    assert_eq!(file.old_path, Some("old_name.txt".to_string()));
}

#[test]
fn mixed_operations_are_all_reported() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("to_modify.txt"), "original");
    create_file(&repo_path.join("to_delete.txt"), "delete me");
    create_file(&repo_path.join("to_rename.txt"), "rename me");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("to_modify.txt"), "modified");
    fs::remove_file(repo_path.join("to_delete.txt")).unwrap();
    fs::rename(
        repo_path.join("to_rename.txt"),
        repo_path.join("renamed.txt"),
    )
    .unwrap();
    create_file(&repo_path.join("new_file.txt"), "new");

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.remove_path(Path::new("to_delete.txt")).unwrap();
    index.remove_path(Path::new("to_rename.txt")).unwrap();
    index.write().unwrap();

    let changeset = snapshot(repo_path).unwrap();
    assert_eq!(changeset.files.len(), 4, "expected M, D, R, A entries");

    let status_of = |path: &str| {
        changeset
            .files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.status)
    };
    assert_eq!(status_of("to_modify.txt"), Some(ChangeStatus::Modified));
    assert_eq!(status_of("to_delete.txt"), Some(ChangeStatus::Deleted));
    assert_eq!(status_of("renamed.txt"), Some(ChangeStatus::Renamed));
    assert_eq!(status_of("new_file.txt"), Some(ChangeStatus::Added));
}

#[test]
fn text_files_carry_hunks() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("code.rs"), "fn main() {}\n");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("code.rs"), "fn main() { run(); }\n");

    let changeset = snapshot(repo_path).unwrap();
    assert!(!changeset.is_staged);

    let file = &changeset.files[0];
    let hunk = file.hunk.as_ref().expect("text file should carry a hunk");
    assert!(hunk.contains("+fn main() { run(); }"));
    assert!(hunk.contains("-fn main() {}"));
    assert!(changeset.diff_size() > 0);
}

#[test]
fn binary_files_carry_no_hunk() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    let binary_content = vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01];
    fs::write(repo_path.join("data.bin"), binary_content).unwrap();
    create_file(&repo_path.join("text.txt"), "text content");

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let changeset = snapshot(repo_path).unwrap();

    let binary = changeset.files.iter().find(|f| f.path == "data.bin").unwrap();
    assert!(binary.hunk.is_none(), "binary diff should be dropped");

    let text = changeset.files.iter().find(|f| f.path == "text.txt").unwrap();
    assert!(text.hunk.is_some(), "text diff should be kept");
}

#[test]
fn lock_files_carry_no_hunk() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("Cargo.lock"), "lock content");
    create_file(&repo_path.join("src.rs"), "code content");

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let changeset = snapshot(repo_path).unwrap();

    let lock = changeset
        .files
        .iter()
        .find(|f| f.path == "Cargo.lock")
        .unwrap();
    assert!(lock.hunk.is_none());

    let code = changeset.files.iter().find(|f| f.path == "src.rs").unwrap();
    assert!(code.hunk.is_some());
}

#[test]
fn staged_changes_win_over_unstaged() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("staged.txt"), "original");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("staged.txt"), "staged edit");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("staged.txt")).unwrap();
    index.write().unwrap();

    create_file(&repo_path.join("unstaged.txt"), "unstaged file");

    let changeset = snapshot(repo_path).unwrap();
    assert!(changeset.is_staged);
    assert_eq!(changeset.files.len(), 1);
    assert_eq!(changeset.files[0].path, "staged.txt");
}

#[test]
fn clean_repository_yields_empty_file_list() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("file.txt"), "content");
    commit_all(&repo, "initial commit");

    let changeset = snapshot(repo_path).unwrap();
    assert!(changeset.files.is_empty());
}

#[test]
fn recent_subjects_are_newest_first_and_capped() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    for i in 0..8 {
        create_file(&repo_path.join("file.txt"), &format!("rev {i}"));
        commit_all(&repo, &format!("commit {i}"));
    }

    let changeset = snapshot(repo_path).unwrap();
    assert_eq!(changeset.recent_subjects.len(), RECENT_COMMIT_LIMIT);
    assert_eq!(changeset.recent_subjects[0], "commit 7");
    assert_eq!(changeset.recent_subjects[4], "commit 3");
}

#[test]
fn unborn_branch_reports_staged_additions() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("first.txt"), "hello");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("first.txt")).unwrap();
    index.write().unwrap();

    let changeset = snapshot(repo_path).unwrap();
    assert!(changeset.is_staged);
    assert_eq!(changeset.files.len(), 1);
    assert_eq!(changeset.files[0].status, ChangeStatus::Added);
    assert!(changeset.recent_subjects.is_empty());
}

#[test]
fn stage_all_covers_deletions_and_additions() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("to_delete.txt"), "delete me");
    create_file(&repo_path.join("to_modify.txt"), "original");
    commit_all(&repo, "initial commit");

    fs::remove_file(repo_path.join("to_delete.txt")).unwrap();
    create_file(&repo_path.join("to_modify.txt"), "modified");
    create_file(&repo_path.join("brand_new.txt"), "new");

    assert!(!has_staged_changes(repo_path).unwrap());
    stage_all(repo_path).unwrap();
    assert!(has_staged_changes(repo_path).unwrap());

    let changeset = snapshot(repo_path).unwrap();
    assert!(changeset.is_staged);
    assert_eq!(changeset.files.len(), 3);
    let status_of = |path: &str| {
        changeset
            .files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.status)
    };
    assert_eq!(status_of("to_delete.txt"), Some(ChangeStatus::Deleted));
    assert_eq!(status_of("to_modify.txt"), Some(ChangeStatus::Modified));
    assert_eq!(status_of("brand_new.txt"), Some(ChangeStatus::Added));
}

#[test]
fn sanity_check_rejects_non_repository() {
    let temp_dir = TempDir::new().unwrap();
    let err = sanity_check(temp_dir.path()).unwrap_err();
    assert!(matches!(err, GitError::NotARepository(_)));
}

#[test]
fn branch_name_resolves_before_first_commit() {
    let (temp_dir, _repo) = setup_test_repo();
    let branch = current_branch(temp_dir.path()).unwrap();
    assert!(!branch.is_empty());
    assert_ne!(branch, "refs/heads/master");
}
