use super::Cmd;
use anyhow::bail;
use clap::Args;
use librit::cherrypick::{CherryPickResults, RebaseResults};
use librit::error::{RitError, RitResult};
use librit::merge::MergeResults;
use librit::repo::RitRepo;

#[derive(Args, Debug)]
pub struct RitMergeCliOpts {
    rev: String,
}

impl Cmd for RitMergeCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        match repo.merge(&self.rev)? {
            MergeResults::AlreadyUpToDate => {
                println!("Already up to date.");
                Ok(())
            }
            MergeResults::FastForward { from, to } => {
                println!("Updating {:#}..{:#}", from, to);
                println!("Fast-forward");
                let diff = repo.commit_diff(from, to)?;
                super::cli_diff::print_visual_summary(&diff);
                super::cli_diff::print_numerical_summary(&diff);
                super::cli_diff::print_existence_changes(&diff);
                Ok(())
            }
            MergeResults::Merged(oid) => {
                println!("Merge made by the 'simple' strategy.");
                let commit = repo.read_commit(oid)?;
                let diff = repo.commit_diff(commit.parents[0], oid)?;
                super::cli_diff::print_numerical_summary(&diff);
                Ok(())
            }
            MergeResults::Conflicts(conflicts) => {
                for path in &conflicts.paths {
                    println!("Auto-merging {}", path);
                }
                // the conflict display carries the per-file CONFLICT lines
                // and the closing message; conflicts exit with status 1
                bail!(RitError::MergeConflicts(conflicts))
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct RitMergeBaseCliOpts {
    rev1: String,
    rev2: String,
}

impl Cmd for RitMergeBaseCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let a = repo.resolve_rev_oid(&self.rev1)?;
        let b = repo.resolve_rev_oid(&self.rev2)?;
        match repo.merge_base(a, b)? {
            Some(base) => {
                println!("{}", base);
                Ok(())
            }
            None => bail!("fatal: no common ancestor"),
        }
    }
}

#[derive(Args, Debug)]
pub struct RitCherryPickCliOpts {
    /// parent number (1-based) to diff a merge commit against
    #[arg(short = 'm')]
    mainline: Option<usize>,
    rev: String,
}

impl Cmd for RitCherryPickCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        match repo.cherry_pick(&self.rev, self.mainline)? {
            CherryPickResults::Picked(oid) => {
                let commit = repo.read_commit(oid)?;
                println!("[{:#}] {}", oid, commit.subject());
                Ok(())
            }
            CherryPickResults::Conflicts(conflicts) => bail!(RitError::MergeConflicts(conflicts)),
        }
    }
}

#[derive(Args, Debug)]
pub struct RitRebaseCliOpts {
    rev: String,
}

impl Cmd for RitRebaseCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        match repo.rebase(&self.rev)? {
            RebaseResults::AlreadyUpToDate => {
                println!("Already up to date.");
                Ok(())
            }
            RebaseResults::Rebased { onto, picked } => {
                println!("Successfully rebased {} commit(s) onto {:#}.", picked, onto);
                Ok(())
            }
            RebaseResults::Conflicts(conflicts) => bail!(RitError::MergeConflicts(conflicts)),
        }
    }
}
