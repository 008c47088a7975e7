use super::Cmd;
use chrono::{DateTime, FixedOffset};
use clap::Args;
use librit::error::RitResult;
use librit::obj::{Commit, Oid};
use librit::repo::RitRepo;
use librit::rev::RevWalk;
use owo_colors::OwoColorize;

#[derive(Args, Debug)]
pub struct RitLogCliOpts {
    rev: Option<String>,
    /// limit the number of commits shown
    #[arg(short = 'n')]
    max_count: Option<usize>,
    /// only show commits whose message contains the pattern
    #[arg(long)]
    grep: Option<String>,
    #[arg(long)]
    oneline: bool,
    /// oldest first
    #[arg(long)]
    reverse: bool,
}

impl Cmd for RitLogCliOpts {
    fn exec(self, repo: &RitRepo) -> RitResult<()> {
        let root = match &self.rev {
            Some(rev) => repo.resolve_rev_oid(rev)?,
            None => repo.fully_resolve_head()?,
        };

        let mut commits = vec![];
        for entry in RevWalk::new(repo, root)? {
            let (oid, commit) = entry?;
            if let Some(pattern) = &self.grep {
                if !commit.message.contains(pattern.as_str()) {
                    continue;
                }
            }
            commits.push((oid, commit));
            if let Some(n) = self.max_count {
                if commits.len() == n {
                    break;
                }
            }
        }

        if self.reverse {
            commits.reverse();
        }

        for (oid, commit) in &commits {
            if self.oneline {
                println!("{} {}", oid.short().yellow(), commit.subject());
            } else {
                print_commit(*oid, commit, true);
            }
        }
        Ok(())
    }
}

fn format_date(commit: &Commit) -> String {
    let time = &commit.author.time;
    let offset = FixedOffset::east_opt(time.offset.minutes() * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    match DateTime::from_timestamp(time.time.as_secs(), 0) {
        Some(utc) => utc.with_timezone(&offset).format("%a %b %-d %H:%M:%S %Y %z").to_string(),
        None => format!("{}", time),
    }
}

pub(crate) fn print_commit(oid: Oid, commit: &Commit, trailing_blank: bool) {
    println!("{}", format!("commit {}", oid).yellow());
    if commit.parents.len() > 1 {
        let parents =
            commit.parents.iter().map(|p| p.short()).collect::<Vec<_>>().join(" ");
        println!("Merge: {}", parents);
    }
    println!("Author: {} <{}>", commit.author.name, commit.author.email);
    println!("Date:   {}", format_date(commit));
    println!();
    for line in commit.message.trim_end().lines() {
        println!("    {}", line);
    }
    if trailing_blank {
        println!();
    }
}
