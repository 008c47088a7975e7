use crate::error::RitResult;
use crate::repo::{HeadState, RitRepo};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

/// the three status sections plus conflict markers; rendering lives in the CLI
#[derive(Debug, Default, PartialEq)]
pub struct RitStatus {
    pub branch: Option<String>,
    /// HEAD vs index
    pub staged: Vec<(String, ChangeKind)>,
    /// index vs worktree, for tracked paths
    pub unstaged: Vec<(String, ChangeKind)>,
    /// worktree paths absent from the index (and not ignored)
    pub untracked: Vec<String>,
    /// paths with unresolved merge stages
    pub conflicted: Vec<String>,
}

impl RitStatus {
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
            && self.unstaged.is_empty()
            && self.untracked.is_empty()
            && self.conflicted.is_empty()
    }
}

impl RitRepo {
    pub fn status(&self) -> RitResult<RitStatus> {
        let branch = match self.resolve_head()? {
            HeadState::Attached { branch, .. } | HeadState::Unborn { branch } =>
                Some(branch.short().to_owned()),
            HeadState::Detached(..) => None,
        };

        let mut status = RitStatus { branch, ..Default::default() };

        let index = self.index()?;
        status.conflicted = index.conflicted_paths();

        for diff in self.diff_head_index()?.file_diffs() {
            if status.conflicted.contains(&diff.path) {
                continue;
            }
            let kind = if diff.created() {
                ChangeKind::Created
            } else if diff.deleted() {
                ChangeKind::Deleted
            } else {
                ChangeKind::Modified
            };
            status.staged.push((diff.path.clone(), kind));
        }

        for diff in self.diff_index_worktree()?.file_diffs() {
            if status.conflicted.contains(&diff.path) {
                continue;
            }
            if diff.created() {
                status.untracked.push(diff.path.clone());
            } else if diff.deleted() {
                status.unstaged.push((diff.path.clone(), ChangeKind::Deleted));
            } else {
                status.unstaged.push((diff.path.clone(), ChangeKind::Modified));
            }
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests;
