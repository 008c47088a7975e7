use super::Cmd;
use clap::Args;
use librit::checkout::CheckoutOpts;
use librit::error::RitResult;
use librit::repo::RitRepo;

#[derive(Args, Debug)]
pub struct RitCheckoutCliOpts {
    /// create the branch before switching
    #[arg(short = 'b')]
    create: bool,
    name: String,
    /// revision the new branch starts from
    base: Option<String>,
}

impl Cmd for RitCheckoutCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let summary =
            repo.checkout(&self.name, CheckoutOpts { create: self.create, base: self.base })?;
        match summary.branch {
            Some(branch) if summary.created =>
                println!("Switched to a new branch '{}'", branch),
            Some(branch) => println!("Switched to branch '{}'", branch),
            None => println!("HEAD is now at {:#}", summary.oid),
        }
        Ok(())
    }
}
