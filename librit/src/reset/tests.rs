use super::*;
use crate::index::MergeStage;
use crate::test_utils::*;

#[test]
fn test_soft_reset_moves_ref_only() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        let c2 = commit_file(repo, "a.txt", "two\n", "second")?;

        repo.reset("HEAD~1", ResetKind::Soft)?;
        assert_eq!(repo.resolve_rev_oid("main")?, c1);
        // index and worktree still hold c2's content
        assert_eq!(read_file!(repo: "a.txt"), "two\n");
        let index = repo.index()?;
        let staged = index.find_entry("a.txt", MergeStage::None).unwrap().oid;
        assert_eq!(staged, repo.flatten_tree(repo.read_commit(c2)?.tree)?["a.txt"].oid);
        Ok(())
    })
}

#[test]
fn test_mixed_reset_rewrites_index() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        commit_file(repo, "a.txt", "two\n", "second")?;

        repo.reset("HEAD~1", ResetKind::Mixed)?;
        assert_eq!(repo.resolve_rev_oid("main")?, c1);
        // the index matches c1, the worktree still has the newer content
        let index = repo.index()?;
        let staged = index.find_entry("a.txt", MergeStage::None).unwrap().oid;
        assert_eq!(staged, repo.flatten_tree(repo.read_commit(c1)?.tree)?["a.txt"].oid);
        assert_eq!(read_file!(repo: "a.txt"), "two\n");
        Ok(())
    })
}

#[test]
fn test_hard_reset_restores_everything() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        let c2 = commit_file(repo, "b.txt", "new file\n", "second")?;

        repo.reset("HEAD~1", ResetKind::Hard)?;
        assert_eq!(repo.resolve_rev_oid("main")?, c1);
        assert_eq!(read_file!(repo: "a.txt"), "one\n");
        assert!(!repo.to_fs_path("b.txt").exists());

        // index and worktree reflect tree(c1) exactly
        let index = repo.index()?;
        assert_eq!(index.write_tree()?, repo.read_commit(c1)?.tree);

        // the dropped commit object stays reachable through the odb
        assert!(repo.obj_exists(c2)?);
        Ok(())
    })
}

#[test]
fn test_hard_reset_exits_merge_state() -> RitResult<()> {
    with_empty_repo(|repo| {
        let base = commit_file(repo, "a.txt", "X\n", "base")?;
        let ours = commit_file(repo, "a.txt", "Y\n", "ours")?;
        repo.checkout("b", crate::checkout::CheckoutOpts {
            create: true,
            base: Some(base.to_hex()),
        })?;
        commit_file(repo, "a.txt", "Z\n", "theirs")?;
        repo.checkout("main", Default::default())?;
        repo.merge("b")?.into_conflicts();

        // soft/mixed are refused mid-merge, hard abandons it
        assert!(repo.reset("HEAD", ResetKind::Mixed).is_err());
        repo.reset("HEAD", ResetKind::Hard)?;

        assert_eq!(repo.repo_state(), crate::repo::RepoState::Clean);
        assert_eq!(read_file!(repo: "a.txt"), "Y\n");
        assert!(!repo.index()?.has_conflicts());
        assert_eq!(repo.resolve_rev_oid("main")?, ours);
        Ok(())
    })
}

#[test]
fn test_reset_writes_reflog() -> RitResult<()> {
    with_empty_repo(|repo| {
        commit_file(repo, "a.txt", "one\n", "first")?;
        commit_file(repo, "a.txt", "two\n", "second")?;
        repo.reset("HEAD~1", ResetKind::Hard)?;

        let reflog =
            repo.refdb().read_reflog(&crate::refs::SymbolicRef::new_branch("main"))?;
        assert_eq!(reflog.get(0).unwrap().msg, "reset: moving to HEAD~1");
        Ok(())
    })
}
