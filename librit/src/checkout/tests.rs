use super::*;
use crate::test_utils::*;

#[test]
fn test_checkout_branch_switches_worktree_and_head() -> RitResult<()> {
    with_empty_repo(|repo| {
        commit_file(repo, "a.txt", "main content\n", "first")?;
        repo.checkout("other", CheckoutOpts { create: true, base: None })?;
        commit_file(repo, "a.txt", "other content\n", "second")?;
        commit_file(repo, "extra.txt", "only here\n", "third")?;

        let summary = repo.checkout("main", Default::default())?;
        assert_eq!(summary.branch.as_deref(), Some("main"));
        assert_eq!(read_file!(repo: "a.txt"), "main content\n");
        assert!(!repo.to_fs_path("extra.txt").exists());
        assert_eq!(repo.read_head()?.to_string(), "refs/heads/main");
        Ok(())
    })
}

#[test]
fn test_checkout_is_idempotent() -> RitResult<()> {
    with_sample_repo(|repo| {
        repo.checkout("other", CheckoutOpts { create: true, base: None })?;
        commit_file(repo, "dir/b.txt", "changed\n", "change")?;

        repo.checkout("main", Default::default())?;
        let index_bytes = std::fs::read(repo.index_path())?;
        let a = read_file!(repo: "a.txt");
        let b = read_file!(repo: "dir/b.txt");

        repo.checkout("main", Default::default())?;
        assert_eq!(std::fs::read(repo.index_path())?, index_bytes);
        assert_eq!(read_file!(repo: "a.txt"), a);
        assert_eq!(read_file!(repo: "dir/b.txt"), b);
        Ok(())
    })
}

#[test]
fn test_detached_checkout_writes_raw_hash() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        commit_file(repo, "a.txt", "two\n", "second")?;

        let summary = repo.checkout(&c1.to_hex(), Default::default())?;
        assert_eq!(summary.branch, None);
        assert_eq!(summary.oid, c1);
        assert_eq!(repo.read_head()?, crate::refs::RitRef::Direct(c1));
        assert_eq!(read_file!(repo: "a.txt"), "one\n");
        Ok(())
    })
}

#[test]
fn test_checkout_prunes_emptied_directories() -> RitResult<()> {
    with_empty_repo(|repo| {
        commit_file(repo, "a.txt", "a\n", "first")?;
        repo.checkout("deep", CheckoutOpts { create: true, base: None })?;
        commit_file(repo, "nested/dir/file.txt", "deep\n", "second")?;

        repo.checkout("main", Default::default())?;
        assert!(!repo.to_fs_path("nested").exists());
        Ok(())
    })
}

#[test]
fn test_checkout_b_with_base() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        commit_file(repo, "a.txt", "two\n", "second")?;

        let summary = repo.checkout(
            "from-old",
            CheckoutOpts { create: true, base: Some(c1.to_hex()) },
        )?;
        assert!(summary.created);
        assert_eq!(summary.oid, c1);
        assert_eq!(read_file!(repo: "a.txt"), "one\n");
        assert_eq!(repo.resolve_rev_oid("from-old")?, c1);
        Ok(())
    })
}

#[test]
fn test_checkout_tree_overwrites_modified_files() -> RitResult<()> {
    with_sample_repo(|repo| {
        let head = repo.fully_resolve_head()?;
        touch!(repo: "a.txt" => "scribbled over\n");
        touch!(repo: "untracked.txt" => "stray\n");

        repo.checkout_tree(head)?;
        assert_eq!(read_file!(repo: "a.txt"), "first file\n");
        // untracked non-ignored files are swept by the sync
        assert!(!repo.to_fs_path("untracked.txt").exists());
        Ok(())
    })
}
