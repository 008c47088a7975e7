use super::*;
use crate::test_utils::*;

#[test]
fn test_clean_repo_status_is_empty() -> RitResult<()> {
    with_sample_repo(|repo| {
        let status = repo.status()?;
        assert!(status.is_empty());
        assert_eq!(status.branch.as_deref(), Some("main"));
        Ok(())
    })
}

#[test]
fn test_status_sections() -> RitResult<()> {
    with_sample_repo(|repo| {
        // staged: a new file added to the index
        touch!(repo: "staged.txt" => "staged\n");
        repo.add("staged.txt")?;

        // unstaged: a tracked file edited on disk
        touch!(repo: "a.txt" => "edited\n");

        // untracked: present on disk, absent from the index
        touch!(repo: "untracked.txt" => "stray\n");

        let status = repo.status()?;
        assert_eq!(status.staged, vec![("staged.txt".to_owned(), ChangeKind::Created)]);
        assert_eq!(status.unstaged, vec![("a.txt".to_owned(), ChangeKind::Modified)]);
        assert_eq!(status.untracked, vec!["untracked.txt".to_owned()]);
        Ok(())
    })
}

#[test]
fn test_status_sees_deletion() -> RitResult<()> {
    with_sample_repo(|repo| {
        rm_file!(repo: "a.txt");
        let status = repo.status()?;
        assert_eq!(status.unstaged, vec![("a.txt".to_owned(), ChangeKind::Deleted)]);
        Ok(())
    })
}

#[test]
fn test_status_reports_conflicts() -> RitResult<()> {
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

        let status = repo.status()?;
        assert_eq!(status.conflicted, vec!["a.txt".to_owned()]);
        Ok(())
    })
}
