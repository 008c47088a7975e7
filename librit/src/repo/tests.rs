use super::*;
use crate::test_utils::*;

#[test]
fn test_init_creates_layout() -> RitResult<()> {
    let dir = tempfile::tempdir()?;
    let summary = RitRepo::init(dir.path())?;
    assert!(!summary.reinitialized);

    let gitdir = dir.path().join(".git");
    assert!(gitdir.join("objects").is_dir());
    assert!(gitdir.join("refs/heads").is_dir());
    assert!(gitdir.join("refs/tags").is_dir());
    assert!(gitdir.join("logs").is_dir());
    assert_eq!(std::fs::read_to_string(gitdir.join("HEAD"))?, "ref: refs/heads/main\n");

    // reinitializing is a no-op
    let summary = RitRepo::init(dir.path())?;
    assert!(summary.reinitialized);
    Ok(())
}

#[test]
fn test_find_walks_up_to_repo_root() -> RitResult<()> {
    let dir = tempfile::tempdir()?;
    RitRepo::init(dir.path())?;
    let nested = dir.path().join("some/nested/dir");
    std::fs::create_dir_all(&nested)?;

    let repo = RitRepo::find(&nested)?;
    assert_eq!(repo.workdir(), dir.path().canonicalize()?);

    let outside = tempfile::tempdir()?;
    assert!(RitRepo::find(outside.path()).is_err());
    Ok(())
}

#[test]
fn test_head_states() -> RitResult<()> {
    with_empty_repo(|repo| {
        let branch = crate::refs::SymbolicRef::new_branch("main");
        assert_eq!(repo.resolve_head()?, HeadState::Unborn { branch: branch.clone() });

        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        assert_eq!(repo.resolve_head()?, HeadState::Attached { branch, oid: c1 });

        repo.checkout(&c1.to_hex(), Default::default())?;
        assert_eq!(repo.resolve_head()?, HeadState::Detached(c1));
        Ok(())
    })
}

#[test]
fn test_flatten_tree_nested() -> RitResult<()> {
    with_sample_repo(|repo| {
        let files = repo.flatten_tree(repo.head_tree()?)?;
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["a.txt", "dir/b.txt"]);
        assert!(files.values().all(|entry| entry.mode == crate::obj::FileMode::REG));
        Ok(())
    })
}

#[test]
fn test_flatten_unknown_tree_is_empty() -> RitResult<()> {
    with_empty_repo(|repo| {
        assert!(repo.flatten_tree(Oid::UNKNOWN)?.is_empty());
        Ok(())
    })
}

#[test]
fn test_worktree_files_skips_gitdir_and_ignored() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "kept.txt" => "kept\n");
        touch!(repo: "build/out.bin" => "binary\n");
        touch!(repo: ".gitignore" => "build/\n");

        let files = repo.worktree_files()?;
        assert_eq!(files, vec![".gitignore".to_owned(), "kept.txt".to_owned()]);
        Ok(())
    })
}

#[test]
fn test_repo_state_tracks_merge_head() -> RitResult<()> {
    with_sample_repo(|repo| {
        assert_eq!(repo.repo_state(), RepoState::Clean);
        repo.write_state_file(MERGE_HEAD_FILE, "whatever")?;
        assert_eq!(repo.repo_state(), RepoState::Merging);
        repo.clear_merge_state()?;
        assert_eq!(repo.repo_state(), RepoState::Clean);
        Ok(())
    })
}
