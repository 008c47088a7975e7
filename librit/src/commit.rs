use crate::error::{RitError, RitResult};
use crate::obj::Oid;
use crate::refs::{RefUpdateCause, RefUpdateCommitKind};
use crate::repo::{HeadState, RepoState, RitRepo, MERGE_HEAD_FILE, MERGE_MSG_FILE};
use smallvec::SmallVec;

#[derive(Debug, Default)]
pub struct CommitOpts {
    /// None is only allowed in merge mode, where MERGE_MSG supplies the message
    pub message: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct CommitSummary {
    pub oid: Oid,
    pub branch: String,
    pub is_root: bool,
    pub is_merge: bool,
    pub subject: String,
}

impl RitRepo {
    pub fn commit(&self, opts: CommitOpts) -> RitResult<CommitSummary> {
        let merging = self.repo_state() == RepoState::Merging;

        let message = match opts.message {
            Some(message) => normalize_message(&message),
            None if merging => self.read_merge_msg()?,
            None => bail!(RitError::MissingMessage),
        };

        let branch = match self.resolve_head()? {
            HeadState::Attached { branch, .. } | HeadState::Unborn { branch } => branch,
            HeadState::Detached(..) => bail!(RitError::DetachedHead),
        };

        let index = self.index()?;
        if index.has_conflicts() {
            bail!(
                "error: Committing is not possible because you have unmerged files: {}",
                index.conflicted_paths().join(", ")
            );
        }

        let parent = self.try_fully_resolve_head()?;
        let tree = index.write_tree()?;

        if !merging {
            let head_tree = self.head_tree()?;
            let is_empty_commit =
                tree == head_tree || (head_tree.is_unknown() && tree == Oid::EMPTY_TREE);
            if is_empty_commit {
                bail!(RitError::NothingToCommit);
            }
        }

        let mut parents = SmallVec::new();
        parents.extend(parent);
        let merge_parent =
            if merging { self.read_state_file_oid(MERGE_HEAD_FILE)? } else { None };
        parents.extend(merge_parent);

        let oid = self.write_commit(tree, parents, message.clone())?;
        let commit = self.read_commit(oid)?;

        let kind = if merging {
            RefUpdateCommitKind::Merge
        } else if parent.is_none() {
            RefUpdateCommitKind::Initial
        } else {
            RefUpdateCommitKind::Normal
        };
        self.update_ref(
            &branch,
            oid,
            RefUpdateCause::Commit { subject: commit.subject().to_owned(), kind },
        )?;

        if merging {
            self.clear_merge_state()?;
        }

        Ok(CommitSummary {
            oid,
            branch: branch.short().to_owned(),
            is_root: parent.is_none(),
            is_merge: merging,
            subject: commit.subject().to_owned(),
        })
    }

    /// the default merge commit message: MERGE_MSG stripped of `#` comment lines
    fn read_merge_msg(&self) -> RitResult<String> {
        let path = self.state_file_path(MERGE_MSG_FILE);
        ensure!(path.exists(), RitError::MissingMessage);
        let raw = std::fs::read_to_string(path)?;
        let msg =
            raw.lines().filter(|line| !line.starts_with('#')).collect::<Vec<_>>().join("\n");
        Ok(normalize_message(&msg))
    }
}

/// commit messages are stored with a single trailing newline
fn normalize_message(message: &str) -> String {
    format!("{}\n", message.trim_end())
}

#[cfg(test)]
mod tests;
