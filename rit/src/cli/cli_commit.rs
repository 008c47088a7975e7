use super::Cmd;
use clap::Args;
use librit::commit::CommitOpts;
use librit::error::RitResult;
use librit::repo::RitRepo;

#[derive(Args, Debug)]
pub struct RitCommitCliOpts {
    /// commit message; may be repeated, paragraphs are joined
    #[arg(short = 'm')]
    message: Vec<String>,
}

impl Cmd for RitCommitCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let message =
            if self.message.is_empty() { None } else { Some(self.message.join("\n\n")) };
        let summary = repo.commit(CommitOpts { message })?;

        let root = if summary.is_root { " (root-commit)" } else { "" };
        println!("[{}{} {}] {}", summary.branch, root, summary.oid.short(), summary.subject);

        if !summary.is_root {
            let parent = repo.read_commit(summary.oid)?.first_parent().unwrap();
            let diff = repo.commit_diff(parent, summary.oid)?;
            super::cli_diff::print_numerical_summary(&diff);
            super::cli_diff::print_existence_changes(&diff);
        }
        Ok(())
    }
}
