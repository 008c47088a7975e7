use super::Cmd;
use clap::Args;
use librit::error::RitResult;
use librit::repo::{RepoState, RitRepo};
use librit::status::ChangeKind;
use owo_colors::OwoColorize;

#[derive(Args, Debug)]
pub struct RitStatusCliOpts {}

fn change_word(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Created => "new file",
        ChangeKind::Modified => "modified",
        ChangeKind::Deleted => "deleted",
    }
}

impl Cmd for RitStatusCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let status = repo.status()?;

        match &status.branch {
            Some(branch) => println!("On branch {}", branch),
            None => println!("HEAD detached at {:#}", repo.fully_resolve_head()?),
        }

        if repo.repo_state() == RepoState::Merging {
            println!("You have unmerged paths.");
        }

        if !status.staged.is_empty() {
            println!("Changes to be committed:");
            for (path, kind) in &status.staged {
                println!("\t{}", format!("{}:   {}", change_word(*kind), path).green());
            }
        }

        if !status.conflicted.is_empty() {
            println!("Unmerged paths:");
            for path in &status.conflicted {
                println!("\t{}", format!("both modified:   {}", path).red());
            }
        }

        if !status.unstaged.is_empty() {
            println!("Changes not staged for commit:");
            for (path, kind) in &status.unstaged {
                println!("\t{}", format!("{}:   {}", change_word(*kind), path).red());
            }
        }

        if !status.untracked.is_empty() {
            println!("Untracked files:");
            for path in &status.untracked {
                println!("\t{}", path.red());
            }
        }

        if status.is_empty() {
            println!("nothing to commit, working tree clean");
        }
        Ok(())
    }
}
