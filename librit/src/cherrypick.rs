use crate::commit::CommitOpts;
use crate::error::{RitError, RitResult};
use crate::merge::MergeConflicts;
use crate::obj::Oid;
use crate::repo::{HeadState, RitRepo, CHERRY_PICK_HEAD_FILE};
use log::debug;

#[derive(Debug, PartialEq)]
pub enum CherryPickResults {
    Picked(Oid),
    Conflicts(MergeConflicts),
}

#[derive(Debug, PartialEq)]
pub enum RebaseResults {
    AlreadyUpToDate,
    Rebased { onto: Oid, picked: usize },
    Conflicts(MergeConflicts),
}

impl RitRepo {
    /// replay the changes a commit made over its selected parent onto HEAD;
    /// multi-parent commits require an explicit `-m` mainline (1-based)
    pub fn cherry_pick(&self, rev: &str, mainline: Option<usize>) -> RitResult<CherryPickResults> {
        let picked = self.resolve_rev_oid(rev)?;
        let commit = self.read_commit(picked)?;

        let parent = match commit.parents.len() {
            0 => bail!("fatal: cannot cherry-pick a root commit"),
            1 => commit.parents[0],
            _ => match mainline {
                Some(m) => *commit.parents.get(m - 1).ok_or_else(|| {
                    anyhow!("error: commit {} does not have parent {}", picked, m)
                })?,
                None => bail!(RitError::MergeWithoutMainline(picked)),
            },
        };

        let head = self.fully_resolve_head()?;
        debug!("cherry_pick(picked: {}, parent: {}, head: {})", picked, parent, head);

        self.write_state_file(CHERRY_PICK_HEAD_FILE, &format!("{}\n", picked))?;

        // the picked commit's diff against its parent replays as a three-way
        // merge with that parent as the base
        let conflicts =
            self.apply_tree_merge(parent, head, picked, "HEAD", &picked.to_string())?;

        if !conflicts.is_empty() {
            return Ok(CherryPickResults::Conflicts(MergeConflicts { paths: conflicts }));
        }

        let summary =
            self.commit(CommitOpts { message: Some(commit.message.clone()) })?;
        self.delete_state_file(CHERRY_PICK_HEAD_FILE)?;
        Ok(CherryPickResults::Picked(summary.oid))
    }

    /// transplant the current branch onto `rev` by cherry-picking each commit
    /// since the merge base onto a temporary branch, then moving the branch
    pub fn rebase(&self, rev: &str) -> RitResult<RebaseResults> {
        const TEMP_BRANCH: &str = "REBASE";

        let branch = match self.resolve_head()? {
            HeadState::Attached { branch, .. } => branch,
            HeadState::Unborn { .. } | HeadState::Detached(..) =>
                bail!(RitError::DetachedHead),
        };
        let branch_name = branch.short().to_owned();

        let source = self.resolve_rev_oid(rev)?;
        let target = self.fully_resolve_head()?;
        if source == target {
            return Ok(RebaseResults::AlreadyUpToDate);
        }

        let base = self
            .merge_base(target, source)?
            .ok_or_else(|| anyhow!("fatal: refusing to rebase onto an unrelated history"))?;
        if base == target {
            // nothing of ours to replay; this is just a fast-forward
            self.reset(&source.to_string(), crate::reset::ResetKind::Hard)?;
            return Ok(RebaseResults::Rebased { onto: source, picked: 0 });
        }

        // first-parent chain from our tip back to (exclusive) the merge base
        let mut to_pick = vec![];
        let mut current = target;
        while current != base {
            to_pick.push(current);
            current = self
                .read_commit(current)?
                .first_parent()
                .ok_or_else(|| anyhow!("fatal: reached a root commit before the merge base"))?;
        }

        self.checkout(TEMP_BRANCH, crate::checkout::CheckoutOpts {
            create: true,
            base: Some(rev.to_owned()),
        })?;

        let mut picked = 0;
        for &oid in to_pick.iter().rev() {
            match self.cherry_pick(&oid.to_string(), None)? {
                CherryPickResults::Picked(..) => picked += 1,
                CherryPickResults::Conflicts(conflicts) =>
                    return Ok(RebaseResults::Conflicts(conflicts)),
            }
        }

        let onto = self.fully_resolve_head()?;
        self.branch_force(&branch_name)?;
        self.checkout(&branch_name, Default::default())?;
        self.branch_delete(TEMP_BRANCH)?;
        Ok(RebaseResults::Rebased { onto, picked })
    }
}
