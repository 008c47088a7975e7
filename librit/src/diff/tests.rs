use super::*;
use crate::test_utils::*;
use crate::xdiff::apply_trace;

#[test]
fn test_tree_diff_modification_create_delete() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "modified.txt" => "before\n");
        touch!(repo: "deleted.txt" => "doomed\n");
        repo.add(".")?;
        let base = commit!(repo: "base").oid;

        touch!(repo: "modified.txt" => "after\n");
        touch!(repo: "created.txt" => "fresh\n");
        repo.add(".")?;
        rm_file!(repo: "deleted.txt");
        repo.add("deleted.txt")?;
        let target = commit!(repo: "target").oid;

        let diff = repo.commit_diff(base, target)?;
        assert_eq!(diff.paths().collect::<Vec<_>>(), vec![
            "created.txt",
            "deleted.txt",
            "modified.txt"
        ]);

        let created = diff.file_diff("created.txt").unwrap();
        assert!(created.created() && !created.deleted());
        assert_eq!(created.num_insertions(), 2);
        assert_eq!(created.num_deletions(), 0);

        let deleted = diff.file_diff("deleted.txt").unwrap();
        assert!(deleted.deleted() && !deleted.created());
        assert_eq!(deleted.num_insertions(), 0);
        assert_eq!(deleted.num_deletions(), 2);

        let modified = diff.file_diff("modified.txt").unwrap();
        assert!(!modified.created() && !modified.deleted());
        assert_eq!((modified.num_insertions(), modified.num_deletions()), (1, 1));
        Ok(())
    })
}

#[test]
fn test_tree_diff_skips_unchanged_paths() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "same.txt" => "constant\n");
        touch!(repo: "other.txt" => "x\n");
        repo.add(".")?;
        let base = commit!(repo: "base").oid;

        touch!(repo: "other.txt" => "y\n");
        repo.add(".")?;
        let target = commit!(repo: "target").oid;

        let diff = repo.commit_diff(base, target)?;
        assert!(diff.file_diff("same.txt").is_none());
        assert!(diff.file_diff("other.txt").is_some());
        Ok(())
    })
}

#[test]
fn test_file_diff_trace_applies_to_base() -> RitResult<()> {
    with_empty_repo(|repo| {
        touch!(repo: "f.txt" => "a\nb\nc\n");
        repo.add(".")?;
        let base = commit!(repo: "base").oid;

        touch!(repo: "f.txt" => "a\nx\nc\nd\n");
        repo.add(".")?;
        let target = commit!(repo: "target").oid;

        let diff = repo.commit_diff(base, target)?;
        let file_diff = diff.file_diff("f.txt").unwrap();
        let base_lines = file_diff.base.as_ref().unwrap().lines();
        let target_lines = file_diff.target.as_ref().unwrap().lines();
        assert_eq!(apply_trace(&base_lines, &target_lines, &file_diff.trace), target_lines);
        Ok(())
    })
}

#[test]
fn test_diff_index_worktree_sees_unstaged_edit() -> RitResult<()> {
    with_sample_repo(|repo| {
        assert!(repo.diff_index_worktree()?.is_empty());

        touch!(repo: "a.txt" => "edited but not staged\n");
        let diff = repo.diff_index_worktree()?;
        assert_eq!(diff.paths().collect::<Vec<_>>(), vec!["a.txt"]);

        repo.add("a.txt")?;
        assert!(repo.diff_index_worktree()?.is_empty());
        Ok(())
    })
}

#[test]
fn test_diff_head_index_sees_staged_edit() -> RitResult<()> {
    with_sample_repo(|repo| {
        assert!(repo.diff_head_index()?.is_empty());

        touch!(repo: "new.txt" => "brand new\n");
        repo.add("new.txt")?;
        let diff = repo.diff_head_index()?;
        let file_diff = diff.file_diff("new.txt").unwrap();
        assert!(file_diff.created());
        Ok(())
    })
}

#[test]
fn test_diffs_collapse_conflict_stages() -> RitResult<()> {
    with_empty_repo(|repo| {
        let base = commit_file(repo, "a.txt", "X\n", "base")?;
        commit_file(repo, "a.txt", "Y\n", "ours")?;
        repo.checkout("b", crate::checkout::CheckoutOpts {
            create: true,
            base: Some(base.to_hex()),
        })?;
        commit_file(repo, "a.txt", "Z\n", "theirs")?;
        repo.checkout("main", Default::default())?;
        repo.merge("b")?.into_conflicts();

        // the conflicted path holds three staged rows; neither diff may
        // report it once per stage
        touch!(repo: "other.txt" => "unstaged edit target\n");
        repo.add("other.txt")?;
        touch!(repo: "other.txt" => "now edited again\n");

        let unstaged = repo.diff_index_worktree()?;
        assert_eq!(unstaged.paths().collect::<Vec<_>>(), vec!["other.txt"]);

        let staged = repo.diff_head_index()?;
        assert_eq!(staged.paths().collect::<Vec<_>>(), vec!["other.txt"]);
        Ok(())
    })
}

#[test]
fn test_empty_blob_diff_lines() {
    // "" splits to one empty line, like the line model requires
    assert_eq!(split_lines(b""), vec![b"" as &[u8]]);
    assert_eq!(split_lines(b"a\n"), vec![b"a" as &[u8], b""]);
}
