use super::Cmd;
use clap::Args;
use librit::error::RitResult;
use librit::refs::SymbolicRef;
use librit::repo::RitRepo;
use owo_colors::OwoColorize;

#[derive(Args, Debug)]
pub struct RitReflogCliOpts {
    /// HEAD or a branch name; defaults to HEAD
    reference: Option<String>,
}

impl Cmd for RitReflogCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let name = self.reference.unwrap_or_else(|| "HEAD".to_owned());
        let sym = if name == "HEAD" {
            SymbolicRef::HEAD
        } else {
            SymbolicRef::new_branch(&name)
        };

        let reflog = repo.refdb().read_reflog(&sym)?;
        for (i, entry) in reflog.entries().iter().rev().enumerate() {
            println!(
                "{} {}@{{{}}}: {}",
                entry.new_oid.short().yellow(),
                name,
                i,
                entry.msg
            );
        }
        Ok(())
    }
}
