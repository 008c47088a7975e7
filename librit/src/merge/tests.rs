use super::*;
use crate::checkout::CheckoutOpts;
use crate::index::MergeStage;
use crate::repo::RepoState;
use crate::test_utils::*;

fn checkout_new(repo: &RitRepo, name: &str, base: Option<&str>) -> RitResult<()> {
    repo.checkout(name, CheckoutOpts { create: true, base: base.map(str::to_owned) })?;
    Ok(())
}

#[test]
fn test_merge_base_linear_history() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        let c2 = commit_file(repo, "a.txt", "two\n", "second")?;
        assert_eq!(repo.merge_base(c1, c2)?, Some(c1));
        assert_eq!(repo.merge_base(c2, c1)?, Some(c1));
        assert_eq!(repo.merge_base(c2, c2)?, Some(c2));
        Ok(())
    })
}

#[test]
fn test_merge_base_branched_history() -> RitResult<()> {
    with_empty_repo(|repo| {
        commit_file(repo, "a.txt", "one\n", "first")?;
        let fork = commit_file(repo, "a.txt", "two\n", "second")?;
        let ours = commit_file(repo, "b.txt", "ours\n", "ours")?;

        checkout_new(repo, "other", Some(&fork.to_hex()))?;
        let theirs = commit_file(repo, "c.txt", "theirs\n", "theirs")?;

        // symmetric when unique
        assert_eq!(repo.merge_base(ours, theirs)?, Some(fork));
        assert_eq!(repo.merge_base(theirs, ours)?, Some(fork));
        Ok(())
    })
}

#[test]
fn test_merge_up_to_date() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        commit_file(repo, "a.txt", "two\n", "second")?;
        checkout_new(repo, "old", Some(&c1.to_hex()))?;
        repo.checkout("main", Default::default())?;

        // merging our own ancestor is a no-op
        assert_eq!(repo.merge("old")?, MergeResults::AlreadyUpToDate);
        assert_eq!(repo.merge("main")?, MergeResults::AlreadyUpToDate);
        Ok(())
    })
}

#[test]
fn test_fast_forward_merge() -> RitResult<()> {
    with_empty_repo(|repo| {
        let c1 = commit_file(repo, "a.txt", "one\n", "first")?;
        checkout_new(repo, "f", None)?;
        let c2 = commit_file(repo, "a.txt", "two\n", "feature work")?;
        repo.checkout("main", Default::default())?;

        match repo.merge("f")? {
            MergeResults::FastForward { from, to } => {
                assert_eq!(from, c1);
                assert_eq!(to, c2);
            }
            other => panic!("expected fast-forward, got {:?}", other),
        }

        // the branch ref advanced and the worktree matches the source tree
        assert_eq!(repo.resolve_rev_oid("main")?, c2);
        assert_eq!(repo.head_tree()?, repo.read_commit(c2)?.tree);
        assert_eq!(read_file!(repo: "a.txt"), "two\n");
        Ok(())
    })
}

#[test]
fn test_clean_three_way_merge_commits_itself() -> RitResult<()> {
    with_empty_repo(|repo| {
        let base = commit_file(repo, "a.txt", "base\n", "base")?;
        let ours = commit_file(repo, "b.txt", "ours\n", "our side")?;

        checkout_new(repo, "b", Some(&base.to_hex()))?;
        let theirs = commit_file(repo, "c.txt", "theirs\n", "their side")?;

        repo.checkout("main", Default::default())?;
        let merged = match repo.merge("b")? {
            MergeResults::Merged(oid) => oid,
            other => panic!("expected merge commit, got {:?}", other),
        };

        let commit = repo.read_commit(merged)?;
        assert_eq!(commit.parents.as_slice(), &[ours, theirs]);
        assert_eq!(commit.subject(), "Merge branch 'b'");

        // both sides' files are present and the merge state is gone
        assert_eq!(read_file!(repo: "b.txt"), "ours\n");
        assert_eq!(read_file!(repo: "c.txt"), "theirs\n");
        assert_eq!(repo.repo_state(), RepoState::Clean);
        assert_eq!(repo.resolve_rev_oid("main")?, merged);
        Ok(())
    })
}

#[test]
fn test_conflicting_merge_materializes_markers_and_stages() -> RitResult<()> {
    with_empty_repo(|repo| {
        let base = commit_file(repo, "a.txt", "X\n", "base")?;
        let ours = commit_file(repo, "a.txt", "Y\n", "ours")?;

        checkout_new(repo, "b", Some(&base.to_hex()))?;
        let theirs = commit_file(repo, "a.txt", "Z\n", "theirs")?;

        repo.checkout("main", Default::default())?;
        let conflicts = repo.merge("b")?.into_conflicts();
        assert_eq!(conflicts.paths, vec!["a.txt".to_owned()]);

        // the working file holds the whole-file conflict block
        assert_eq!(
            read_file!(repo: "a.txt"),
            "<<<<<<< HEAD\nY\n=======\nZ\n>>>>>>> b\n"
        );

        // stages 1/2/3 are present with the base/target/source blobs
        let index = repo.index()?;
        let stage = |stage| index.find_entry("a.txt", stage).map(|entry| entry.oid);
        let blob_at = |commit| -> RitResult<_> {
            Ok(repo.flatten_tree(repo.read_commit(commit)?.tree)?["a.txt"].oid)
        };
        assert_eq!(stage(MergeStage::Base), Some(blob_at(base)?));
        assert_eq!(stage(MergeStage::Target), Some(blob_at(ours)?));
        assert_eq!(stage(MergeStage::Source), Some(blob_at(theirs)?));
        assert!(stage(MergeStage::None).is_none());

        // all four merge-state files exist and record the right commits
        assert_eq!(repo.repo_state(), RepoState::Merging);
        assert_eq!(repo.read_state_file_oid(MERGE_HEAD_FILE)?, Some(theirs));
        assert_eq!(repo.read_state_file_oid(ORIG_HEAD_FILE)?, Some(ours));
        assert!(repo.state_file_path(MERGE_MODE_FILE).exists());
        let merge_msg = std::fs::read_to_string(repo.state_file_path(MERGE_MSG_FILE))?;
        assert_eq!(merge_msg, "Merge branch 'b'\n\n# Conflicts:\n#\ta.txt\n");
        Ok(())
    })
}

#[test]
fn test_commit_concludes_conflicted_merge() -> RitResult<()> {
    with_empty_repo(|repo| {
        let base = commit_file(repo, "a.txt", "X\n", "base")?;
        let ours = commit_file(repo, "a.txt", "Y\n", "ours")?;
        checkout_new(repo, "b", Some(&base.to_hex()))?;
        let theirs = commit_file(repo, "a.txt", "Z\n", "theirs")?;
        repo.checkout("main", Default::default())?;
        repo.merge("b")?.into_conflicts();

        // committing with conflicts still present is refused
        assert!(repo.commit(crate::commit::CommitOpts::default()).is_err());

        // resolve and commit without -m; the message comes from MERGE_MSG
        touch!(repo: "a.txt" => "resolved\n");
        repo.add("a.txt")?;
        let summary = repo.commit(crate::commit::CommitOpts::default())?;

        assert!(summary.is_merge);
        assert_eq!(summary.subject, "Merge branch 'b'");
        let commit = repo.read_commit(summary.oid)?;
        assert_eq!(commit.parents.as_slice(), &[ours, theirs]);
        assert_eq!(repo.repo_state(), RepoState::Clean);
        assert!(!repo.state_file_path(ORIG_HEAD_FILE).exists());
        Ok(())
    })
}

#[test]
fn test_merge_refused_while_merging() -> RitResult<()> {
    with_empty_repo(|repo| {
        let base = commit_file(repo, "a.txt", "X\n", "base")?;
        commit_file(repo, "a.txt", "Y\n", "ours")?;
        checkout_new(repo, "b", Some(&base.to_hex()))?;
        commit_file(repo, "a.txt", "Z\n", "theirs")?;
        repo.checkout("main", Default::default())?;
        repo.merge("b")?.into_conflicts();

        assert!(repo.merge("b").is_err());
        Ok(())
    })
}

#[test]
fn test_merge_take_source_deletion() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "a.txt" => "keep\n");
        touch!(repo: "b.txt" => "doomed\n");
        repo.add(".")?;
        let base = commit!(repo: "base").oid;
        commit_file(repo, "a.txt", "ours\n", "ours")?;

        checkout_new(repo, "b", Some(&base.to_hex()))?;
        repo.rm("b.txt")?;
        commit!(repo: "delete b");

        repo.checkout("main", Default::default())?;
        match repo.merge("b")? {
            MergeResults::Merged(..) => {}
            other => panic!("expected clean merge, got {:?}", other),
        }

        // the deletion came over from the source side
        assert!(!repo.to_fs_path("b.txt").exists());
        assert!(!repo.index()?.contains_path("b.txt"));
        assert_eq!(read_file!(repo: "a.txt"), "ours\n");
        Ok(())
    })
}

#[test]
fn test_merge_unrelated_histories_refused() -> RitResult<()> {
    with_empty_repo(|repo| {
        commit_file(repo, "a.txt", "one\n", "first")?;

        // an unrelated root: a branch created from a literal unborn state is
        // not expressible, so build one via a second root commit
        let gitdir_head = repo.gitdir().join("HEAD");
        std::fs::write(&gitdir_head, "ref: refs/heads/orphan\n")?;
        let orphan = commit_file(repo, "z.txt", "zzz\n", "orphan root")?;
        assert!(repo.read_commit(orphan)?.is_root());

        repo.checkout("main", Default::default())?;
        assert!(repo.merge("orphan").is_err());
        Ok(())
    })
}
