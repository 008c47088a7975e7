use crate::error::RitResult;
use crate::repo::RitRepo;

impl RitRepo {
    /// stage every worktree file matched by `pathspec` (a file, a directory,
    /// or `.` for everything); deleted-but-tracked matches are unstaged
    pub fn add(&self, pathspec: &str) -> RitResult<Vec<String>> {
        let pathspec = pathspec.strip_prefix("./").unwrap_or(pathspec);
        let matched = self.match_pathspec(pathspec)?;
        ensure!(
            !matched.is_empty(),
            "fatal: pathspec '{}' did not match any files",
            pathspec
        );

        let mut index = self.index()?;
        let mut staged = vec![];
        for m in matched {
            if self.to_fs_path(&m).exists() {
                index.add_worktree_file(&m)?;
            } else {
                index.remove_entries_for_path(&m);
            }
            staged.push(m);
        }
        index.save()?;
        Ok(staged)
    }

    /// unstage and delete a tracked file
    pub fn rm(&self, unix_path: &str) -> RitResult<()> {
        let mut index = self.index()?;
        ensure!(
            index.remove_entries_for_path(unix_path),
            "fatal: pathspec '{}' did not match any files",
            unix_path
        );
        index.save()?;
        let abs = self.to_fs_path(unix_path);
        if abs.exists() {
            std::fs::remove_file(abs)?;
        }
        Ok(())
    }

    /// `restore --staged`: drop the index entry, leaving the worktree alone
    pub fn restore_staged(&self, unix_path: &str) -> RitResult<()> {
        let mut index = self.index()?;
        ensure!(
            index.remove_entries_for_path(unix_path),
            "fatal: pathspec '{}' did not match any files",
            unix_path
        );
        index.save()
    }

    /// worktree files matched by the pathspec, plus tracked files under it
    /// that have been deleted from disk
    fn match_pathspec(&self, pathspec: &str) -> RitResult<Vec<String>> {
        let worktree = self.worktree_files()?;
        let index = self.index()?;

        let matches = |p: &str| {
            pathspec == "." || p == pathspec || p.starts_with(&format!("{}/", pathspec))
        };

        let mut matched = worktree.into_iter().filter(|p| matches(p)).collect::<Vec<_>>();
        for entry in index.entries() {
            if matches(&entry.path) && !self.to_fs_path(&entry.path).exists() {
                matched.push(entry.path.clone());
            }
        }
        matched.sort();
        matched.dedup();
        Ok(matched)
    }
}
