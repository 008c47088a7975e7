use crate::error::RitResult;
use crate::obj::Oid;
use crate::refs::RefUpdateCause;
use crate::repo::{RepoState, RitRepo};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum ResetKind {
    /// move the ref only
    Soft,
    /// move the ref and rebuild the index from the target tree
    Mixed,
    /// additionally make the working tree match
    Hard,
}

impl Default for ResetKind {
    fn default() -> Self {
        ResetKind::Mixed
    }
}

#[derive(Debug, PartialEq)]
pub struct ResetSummary {
    pub oid: Oid,
    pub subject: String,
}

impl RitRepo {
    /// point the current branch (or a detached HEAD) at `rev`, adjusting the
    /// index and working tree according to `kind`
    pub fn reset(&self, rev: &str, kind: ResetKind) -> RitResult<ResetSummary> {
        let target = self.resolve_rev_oid(rev)?;
        let commit = self.read_commit(target)?;

        if self.repo_state() == RepoState::Merging {
            // a hard reset is the documented escape hatch out of a conflicted merge
            ensure!(
                kind == ResetKind::Hard,
                "fatal: cannot reset in the middle of a merge (use --hard to abandon it)"
            );
            self.clear_merge_state()?;
        }

        // index and worktree are written before the ref moves so a reader
        // that observes the advanced ref also observes the matching state
        match kind {
            ResetKind::Soft => {}
            ResetKind::Mixed => {
                let mut index = self.index()?;
                index.read_tree(commit.tree)?;
                index.save()?;
            }
            ResetKind::Hard => self.checkout_tree(target)?,
        }

        self.update_current_ref(target, RefUpdateCause::Reset { target: rev.to_owned() })?;

        Ok(ResetSummary { oid: target, subject: commit.subject().to_owned() })
    }
}

#[cfg(test)]
mod tests;
