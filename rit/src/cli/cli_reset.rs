use super::Cmd;
use clap::Args;
use librit::error::RitResult;
use librit::repo::RitRepo;
use librit::reset::ResetKind;

#[derive(Args, Debug)]
pub struct RitResetCliOpts {
    #[arg(long, conflicts_with_all = ["mixed", "hard"])]
    soft: bool,
    #[arg(long, conflicts_with = "hard")]
    mixed: bool,
    #[arg(long)]
    hard: bool,
    rev: String,
}

impl Cmd for RitResetCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let kind = if self.soft {
            ResetKind::Soft
        } else if self.hard {
            ResetKind::Hard
        } else {
            ResetKind::Mixed
        };
        let summary = repo.reset(&self.rev, kind)?;
        if kind == ResetKind::Hard {
            println!("HEAD is now at {:#} {}", summary.oid, summary.subject);
        }
        Ok(())
    }
}
