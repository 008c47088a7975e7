use super::Cmd;
use clap::Args;
use librit::error::RitResult;
use librit::repo::RitRepo;
use owo_colors::OwoColorize;

#[derive(Args, Debug)]
pub struct RitBranchCliOpts {
    /// delete the branch
    #[arg(short = 'd')]
    delete: bool,
    /// move an existing branch to HEAD's commit
    #[arg(long)]
    force: bool,
    branch_name: Option<String>,
    /// revision the new branch starts from
    base: Option<String>,
}

impl Cmd for RitBranchCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        if self.delete {
            let name =
                self.branch_name.ok_or_else(|| anyhow::anyhow!("fatal: branch name required"))?;
            let oid = repo.branch_delete(&name)?;
            println!("Deleted branch {} (was {:#}).", name, oid);
            return Ok(());
        }

        let name = match self.branch_name {
            Some(name) => name,
            None => {
                for listing in repo.branch_list()? {
                    if listing.is_current {
                        println!("* {}", listing.name.green());
                    } else {
                        println!("  {}", listing.name);
                    }
                }
                return Ok(());
            }
        };

        if self.force {
            repo.branch_force(&name)?;
        } else {
            repo.branch_create(&name, self.base.as_deref())?;
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RitTagCliOpts {
    /// delete the tag
    #[arg(short = 'd')]
    delete: bool,
    tag_name: Option<String>,
}

impl Cmd for RitTagCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        match self.tag_name {
            None => {
                for (name, _) in repo.tag_list()? {
                    println!("{}", name);
                }
            }
            Some(name) if self.delete => {
                let oid = repo.tag_delete(&name)?;
                println!("Deleted tag '{}' (was {:#})", name, oid);
            }
            Some(name) => {
                repo.tag_create(&name)?;
            }
        }
        Ok(())
    }
}
