use super::*;
use crate::error::{RitError, RitErrorExt};
use crate::test_utils::*;

#[test]
fn test_initial_commit() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "a.txt" => "hello\n");
        repo.add("a.txt")?;
        let summary = repo.commit(CommitOpts { message: Some("m".to_owned()) })?;

        assert!(summary.is_root);
        assert_eq!(summary.branch, "main");
        assert_eq!(repo.resolve_rev_oid("main")?, summary.oid);

        let commit = repo.read_commit(summary.oid)?;
        assert!(commit.parents.is_empty());
        assert_eq!(commit.message, "m\n");
        Ok(())
    })
}

#[test]
fn test_commit_requires_message() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "a.txt" => "hello\n");
        repo.add("a.txt")?;
        let err = repo.commit(CommitOpts::default()).unwrap_err();
        assert_eq!(err.try_into_rit_error()?, RitError::MissingMessage);
        Ok(())
    })
}

#[test]
fn test_commit_chains_parent() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        let c2 = commit_file(repo, "a.txt", "two\n", "second")?;
        let commit = repo.read_commit(c2)?;
        assert_eq!(commit.first_parent(), Some(c1));
        Ok(())
    })
}

#[test]
fn test_empty_commit_refused() -> RitResult<()> {
    with_empty_repo(|repo| {
        // nothing staged at all
        let err = repo.commit(CommitOpts { message: Some("m".to_owned()) }).unwrap_err();
        assert_eq!(err.try_into_rit_error()?, RitError::NothingToCommit);

        // no changes since the last commit
        commit_file(repo, "a.txt", "one\n", "first")?;
        let err = repo.commit(CommitOpts { message: Some("m".to_owned()) }).unwrap_err();
        assert_eq!(err.try_into_rit_error()?, RitError::NothingToCommit);
        Ok(())
    })
}

#[test]
fn test_commit_on_detached_head_refused() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        repo.checkout(&c1.to_hex(), Default::default())?;
        touch!(repo: "a.txt" => "changed\n");
        repo.add("a.txt")?;
        let err = repo.commit(CommitOpts { message: Some("m".to_owned()) }).unwrap_err();
        assert_eq!(err.try_into_rit_error()?, RitError::DetachedHead);
        Ok(())
    })
}

#[test]
fn test_commit_message_is_normalized() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "a.txt" => "hello\n");
        repo.add("a.txt")?;
        let summary =
            repo.commit(CommitOpts { message: Some("subject\n\nbody text\n\n\n".to_owned()) })?;
        let commit = repo.read_commit(summary.oid)?;
        assert_eq!(commit.message, "subject\n\nbody text\n");
        assert_eq!(commit.subject(), "subject");
        Ok(())
    })
}

#[test]
fn test_init_add_commit_deterministic_hashes() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "a.txt" => "hello\n");
        repo.add("a.txt")?;
        let summary = repo.commit(CommitOpts { message: Some("m".to_owned()) })?;

        // the blob and tree hashes are functions of the content alone
        let blob_oid = repo.hash_blob_from_worktree("a.txt")?;
        assert_eq!(blob_oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
        let tree = repo.read_commit(summary.oid)?.tree;
        assert_eq!(tree.to_hex(), "2e81171448eb9f2ee3821e3d447aa6b2fe3ddba1");

        // refs/heads/main holds the new commit and the index has one stage-0 entry
        assert_eq!(repo.resolve_rev_oid("refs/heads/main")?, summary.oid);
        let index = repo.index()?;
        assert_eq!(index.len(), 1);
        let entry = index.find_entry("a.txt", crate::index::MergeStage::None).unwrap();
        assert_eq!(entry.oid, blob_oid);
        Ok(())
    })
}
