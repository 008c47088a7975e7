mod cli_branch;
mod cli_checkout;
mod cli_commit;
mod cli_diff;
mod cli_log;
mod cli_merge;
mod cli_reflog;
mod cli_reset;
mod cli_status;

use anyhow::{anyhow, ensure};
use clap::{Parser, Subcommand};
use cli_branch::{RitBranchCliOpts, RitTagCliOpts};
use cli_checkout::RitCheckoutCliOpts;
use cli_commit::RitCommitCliOpts;
use cli_diff::{RitDiffCliOpts, RitShowCliOpts};
use cli_log::RitLogCliOpts;
use cli_merge::{RitCherryPickCliOpts, RitMergeBaseCliOpts, RitMergeCliOpts, RitRebaseCliOpts};
use cli_reflog::RitReflogCliOpts;
use cli_reset::RitResetCliOpts;
use cli_status::RitStatusCliOpts;
use librit::cmd::{CatFileMode, HashObjectOpts, LsFilesOpts, UpdateIndexOpts};
use librit::error::RitResult;
use librit::obj::{FileMode, Oid, RitId};
use librit::repo::RitRepo;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

// parsed options are converted into the library's typed inputs here; the
// engine itself knows nothing about flags
pub trait Cmd {
    fn exec(self, repo: &RitRepo) -> RitResult<()>;
}

#[derive(Parser, Debug)]
#[command(name = "rit", version, about = "a content-addressed version control engine")]
struct RitCliOpts {
    #[command(subcommand)]
    subcmd: RitSubCmd,
}

#[derive(Subcommand, Debug)]
enum RitSubCmd {
    /// create an empty repository
    Init { path: Option<PathBuf> },
    /// hash a file (or stdin) as a blob, optionally storing it
    HashObject {
        #[arg(short = 'w')]
        write: bool,
        #[arg(long)]
        stdin: bool,
        path: Option<PathBuf>,
    },
    /// inspect an object by hash
    CatFile {
        #[arg(short = 'p', conflicts_with = "ty")]
        pretty: bool,
        #[arg(short = 't')]
        ty: bool,
        hash: String,
    },
    /// write the index out as a tree
    WriteTree,
    /// show the entries of the index
    ReadIndex,
    /// manipulate index entries directly
    UpdateIndex {
        #[arg(long)]
        add: bool,
        #[arg(long)]
        remove: bool,
        #[arg(long, num_args = 3, value_names = ["MODE", "OID", "PATH"])]
        cacheinfo: Option<Vec<String>>,
        args: Vec<String>,
    },
    /// point a reference at a commit
    UpdateRef { refname: String, value: String },
    /// resolve a revision to a commit hash
    RevParse { rev: String },
    /// stage files
    Add { pathspec: String },
    /// unstage a file and remove it from the worktree
    Rm { path: String },
    /// unstage a file (`--staged`) without touching the worktree
    Restore {
        #[arg(long)]
        staged: bool,
        path: String,
    },
    /// list index entries
    LsFiles {
        #[arg(short = 's')]
        stage: bool,
        #[arg(long)]
        abbrev: bool,
    },
    Status(RitStatusCliOpts),
    Commit(RitCommitCliOpts),
    Log(RitLogCliOpts),
    Diff(RitDiffCliOpts),
    Show(RitShowCliOpts),
    Branch(RitBranchCliOpts),
    Tag(RitTagCliOpts),
    Checkout(RitCheckoutCliOpts),
    Merge(RitMergeCliOpts),
    MergeBase(RitMergeBaseCliOpts),
    CherryPick(RitCherryPickCliOpts),
    Rebase(RitRebaseCliOpts),
    Reset(RitResetCliOpts),
    Reflog(RitReflogCliOpts),
}

pub fn run<T: Into<OsString> + Clone>(args: impl IntoIterator<Item = T>) -> RitResult<()> {
    let opts = RitCliOpts::parse_from(args);

    if let RitSubCmd::Init { path } = &opts.subcmd {
        let summary = RitRepo::init(path.clone().unwrap_or_else(|| PathBuf::from(".")))?;
        if summary.reinitialized {
            println!("Reinitialized existing rit repository in {}", summary.path.display());
        } else {
            println!("Initialized empty rit repository in {}", summary.path.display());
        }
        return Ok(());
    }

    let repo = RitRepo::find(".")?;
    match opts.subcmd {
        RitSubCmd::Init { .. } => unreachable!(),
        RitSubCmd::HashObject { write, stdin, path } => {
            let oid = repo.hash_object(HashObjectOpts { write, stdin, path })?;
            println!("{}", oid);
            Ok(())
        }
        RitSubCmd::CatFile { pretty, ty, hash } => {
            ensure!(pretty || ty, "error: need either -p or -t");
            let id = RitId::from_str(&hash)?;
            let mode = if ty { CatFileMode::Type } else { CatFileMode::Pretty };
            let out = repo.cat_file(id, mode)?;
            use std::io::Write;
            std::io::stdout().write_all(&out)?;
            Ok(())
        }
        RitSubCmd::WriteTree => {
            println!("{}", repo.write_tree()?);
            Ok(())
        }
        RitSubCmd::ReadIndex => {
            print!("{}", repo.ls_files(LsFilesOpts { stage: true, abbrev: false })?);
            Ok(())
        }
        RitSubCmd::UpdateIndex { add, remove, cacheinfo, args } => {
            let opts = if let Some(info) = cacheinfo {
                UpdateIndexOpts::CacheInfo {
                    mode: info[0].parse::<FileMode>()?,
                    oid: info[1].parse::<Oid>()?,
                    path: info[2].clone(),
                }
            } else {
                let path = args
                    .first()
                    .cloned()
                    .ok_or_else(|| anyhow!("fatal: update-index requires a path"))?;
                if remove && !repo.to_fs_path(&path).exists() {
                    UpdateIndexOpts::Remove { path }
                } else {
                    ensure!(
                        add || repo.to_fs_path(&path).exists(),
                        "error: {} does not exist and --remove not passed",
                        path
                    );
                    UpdateIndexOpts::Add { path }
                }
            };
            repo.update_index(opts)
        }
        RitSubCmd::UpdateRef { refname, value } => {
            repo.update_ref_cmd(&refname, &value)?;
            Ok(())
        }
        RitSubCmd::RevParse { rev } => {
            let resolved = repo.resolve_rev(&rev)?;
            if resolved.ambiguous {
                eprintln!("warning: refname '{}' is ambiguous.", rev);
            }
            println!("{}", resolved.oid);
            Ok(())
        }
        RitSubCmd::Add { pathspec } => {
            repo.add(&pathspec)?;
            Ok(())
        }
        RitSubCmd::Rm { path } => repo.rm(&path),
        RitSubCmd::Restore { staged, path } => {
            ensure!(staged, "fatal: only --staged restores are supported");
            repo.restore_staged(&path)
        }
        RitSubCmd::LsFiles { stage, abbrev } => {
            print!("{}", repo.ls_files(LsFilesOpts { stage, abbrev })?);
            Ok(())
        }
        RitSubCmd::Status(opts) => opts.exec(&repo),
        RitSubCmd::Commit(opts) => opts.exec(&repo),
        RitSubCmd::Log(opts) => opts.exec(&repo),
        RitSubCmd::Diff(opts) => opts.exec(&repo),
        RitSubCmd::Show(opts) => opts.exec(&repo),
        RitSubCmd::Branch(opts) => opts.exec(&repo),
        RitSubCmd::Tag(opts) => opts.exec(&repo),
        RitSubCmd::Checkout(opts) => opts.exec(&repo),
        RitSubCmd::Merge(opts) => opts.exec(&repo),
        RitSubCmd::MergeBase(opts) => opts.exec(&repo),
        RitSubCmd::CherryPick(opts) => opts.exec(&repo),
        RitSubCmd::Rebase(opts) => opts.exec(&repo),
        RitSubCmd::Reset(opts) => opts.exec(&repo),
        RitSubCmd::Reflog(opts) => opts.exec(&repo),
    }
}
