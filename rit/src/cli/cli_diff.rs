use super::Cmd;
use clap::Args;
use librit::diff::{FileDiff, TreeDiff};
use librit::error::RitResult;
use librit::repo::RitRepo;
use librit::xdiff::DiffTraceAction;
use owo_colors::OwoColorize;

#[derive(Args, Debug)]
pub struct RitDiffCliOpts {
    rev1: Option<String>,
    rev2: Option<String>,
}

#[derive(Args, Debug)]
pub struct RitShowCliOpts {
    rev: String,
    /// suppress the diff
    #[arg(long)]
    quiet: bool,
}

impl Cmd for RitDiffCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let diff = match (&self.rev1, &self.rev2) {
            // with no revisions, compare the index against the working tree
            (None, None) => repo.diff_index_worktree()?,
            (Some(rev1), None) => {
                let base = repo.resolve_rev_oid(rev1)?;
                let target = repo.fully_resolve_head()?;
                repo.commit_diff(base, target)?
            }
            (Some(rev1), Some(rev2)) => {
                let base = repo.resolve_rev_oid(rev1)?;
                let target = repo.resolve_rev_oid(rev2)?;
                repo.commit_diff(base, target)?
            }
            (None, Some(..)) => unreachable!("clap enforces positional order"),
        };
        print_tree_diff(&diff);
        Ok(())
    }
}

impl Cmd for RitShowCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let oid = repo.resolve_rev_oid(&self.rev)?;
        let commit = repo.read_commit(oid)?;
        super::cli_log::print_commit(oid, &commit, false);
        if !self.quiet {
            match commit.first_parent() {
                Some(parent) => {
                    let diff = repo.commit_diff(parent, oid)?;
                    print_tree_diff(&diff);
                }
                None => {
                    let diff = repo.commit_diff(librit::obj::Oid::UNKNOWN, oid)?;
                    print_tree_diff(&diff);
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn print_tree_diff(diff: &TreeDiff) {
    for file_diff in diff.file_diffs() {
        print_file_diff(file_diff);
    }
}

fn lossy_lines(bytes: &[u8]) -> Vec<String> {
    bytes.split(|&b| b == b'\n').map(|line| String::from_utf8_lossy(line).into_owned()).collect()
}

fn print_file_diff(diff: &FileDiff) {
    let path = &diff.path;
    println!("diff --git a/{} b/{}", path, path);
    let short = |side: &Option<librit::diff::DiffSide>| {
        side.as_ref().map(|s| s.oid.short()).unwrap_or_else(|| "0000000".to_owned())
    };
    println!("index {}..{}", short(&diff.base), short(&diff.target));
    println!("--- {}", if diff.base.is_some() { format!("a/{}", path) } else { "/dev/null".to_owned() });
    println!("+++ {}", if diff.target.is_some() { format!("b/{}", path) } else { "/dev/null".to_owned() });

    let base_lines = diff.base.as_ref().map(|s| lossy_lines(&s.bytes)).unwrap_or_default();
    let target_lines = diff.target.as_ref().map(|s| lossy_lines(&s.bytes)).unwrap_or_default();
    println!(
        "{}",
        format!("@@ -1,{} +1,{} @@", base_lines.len(), target_lines.len()).cyan()
    );

    let (mut base_idx, mut target_idx) = (0, 0);
    for action in &diff.trace {
        match action {
            DiffTraceAction::Delete => {
                println!("{}", format!("-{}", base_lines[base_idx]).red());
                base_idx += 1;
            }
            DiffTraceAction::Add => {
                println!("{}", format!("+{}", target_lines[target_idx]).green());
                target_idx += 1;
            }
            DiffTraceAction::Match => {
                println!(" {}", base_lines[base_idx]);
                base_idx += 1;
                target_idx += 1;
            }
        }
    }
}

pub(crate) fn print_numerical_summary(diff: &TreeDiff) {
    let mut parts = vec![format!("{} files changed", diff.file_diffs().len())];
    if diff.num_insertions() > 0 {
        parts.push(format!("{} insertions(+)", diff.num_insertions()));
    }
    if diff.num_deletions() > 0 {
        parts.push(format!("{} deletions(-)", diff.num_deletions()));
    }
    println!(" {}", parts.join(", "));
}

pub(crate) fn print_existence_changes(diff: &TreeDiff) {
    for file_diff in diff.file_diffs() {
        if file_diff.created() {
            println!("create mode 100644 {}", file_diff.path);
        } else if file_diff.deleted() {
            println!("delete mode 100644 {}", file_diff.path);
        }
    }
}

pub(crate) fn print_visual_summary(diff: &TreeDiff) {
    let width =
        diff.file_diffs().iter().map(|file_diff| file_diff.path.len()).max().unwrap_or(0);
    for file_diff in diff.file_diffs() {
        let plus = "+".repeat(file_diff.num_insertions());
        let minus = "-".repeat(file_diff.num_deletions());
        println!(
            " {:width$} | {} {}{}",
            file_diff.path,
            file_diff.num_changes(),
            plus.green(),
            minus.red(),
            width = width
        );
    }
}
