use super::{is_valid_name, RitRef, RitReflog, SymbolicRef, SymbolicRefKind};
use crate::error::{RitError, RitResult, RitResultExt};
use crate::lockfile::Lockfile;
use crate::obj::Oid;
use crate::path;
use crate::repo::RitRepo;
use crate::serialize::{Deserialize, Serialize};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};
use std::fs::OpenOptions;
use std::io::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;
use walkdir::WalkDir;

/// why a reference moved; becomes the reflog message
#[derive(Debug, Clone)]
pub enum RefUpdateCause {
    Commit { subject: String, kind: RefUpdateCommitKind },
    BranchCreate { from: String },
    Reset { target: String },
    Checkout { from: String, to: String },
    FastForwardMerge { rev: String },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RefUpdateCommitKind {
    Normal,
    Initial,
    Merge,
}

impl Display for RefUpdateCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RefUpdateCause::Commit { subject, kind } => match kind {
                RefUpdateCommitKind::Normal => write!(f, "commit: {}", subject),
                RefUpdateCommitKind::Initial => write!(f, "commit (initial): {}", subject),
                RefUpdateCommitKind::Merge => write!(f, "commit (merge): {}", subject),
            },
            RefUpdateCause::BranchCreate { from } => write!(f, "branch: Created from {}", from),
            RefUpdateCause::Reset { target } => write!(f, "reset: moving to {}", target),
            RefUpdateCause::Checkout { from, to } =>
                write!(f, "checkout: moving from {} to {}", from, to),
            RefUpdateCause::FastForwardMerge { rev } => write!(f, "merge {}: Fast-forward", rev),
        }
    }
}

pub struct RitRefDb<'r> {
    repo: &'r RitRepo,
}

impl<'r> RitRefDb<'r> {
    pub fn new(repo: &'r RitRepo) -> Self {
        Self { repo }
    }

    fn ref_path(&self, sym: &SymbolicRef) -> PathBuf {
        path::to_fs_path(self.repo.gitdir(), sym.path())
    }

    fn log_path(&self, sym: &SymbolicRef) -> PathBuf {
        path::to_fs_path(&self.repo.gitdir().join("logs"), sym.path())
    }

    pub fn exists(&self, sym: &SymbolicRef) -> bool {
        self.ref_path(sym).exists()
    }

    pub fn read(&self, sym: &SymbolicRef) -> RitResult<RitRef> {
        let path = self.ref_path(sym);
        if !path.exists() {
            bail!(RitError::NonExistentSymRef(sym.clone()))
        }
        RitRef::deserialize_unbuffered(std::fs::File::open(path)?)
    }

    /// write `to` into the ref file; intermediate directories are created,
    /// absolute reference paths are rejected
    pub fn update(&self, sym: &SymbolicRef, to: &RitRef) -> RitResult<()> {
        ensure!(
            !sym.path().starts_with('/'),
            "fatal: '{}' is not a valid reference name",
            sym.path()
        );
        Lockfile::with_mut(self.ref_path(sym), |lockfile| to.serialize(lockfile))
    }

    pub fn create(&self, sym: &SymbolicRef, from: &RitRef) -> RitResult<()> {
        if self.exists(sym) {
            bail!("a reference `{}` already exists", sym);
        }
        self.update(sym, from)
    }

    pub fn delete(&self, sym: &SymbolicRef) -> RitResult<()> {
        std::fs::remove_file(self.ref_path(sym))?;
        self.delete_reflog(sym)?;
        Ok(())
    }

    /// fully resolve a reference down to an oid, following `ref:` indirection
    pub fn resolve(&self, reference: &RitRef) -> RitResult<Oid> {
        match reference {
            RitRef::Direct(oid) => Ok(*oid),
            RitRef::Symbolic(sym) => {
                let next = self.read(sym)?;
                self.resolve(&next)
            }
        }
    }

    pub fn try_resolve(&self, reference: &RitRef) -> RitResult<Option<Oid>> {
        match self.resolve(reference) {
            Ok(oid) => Ok(Some(oid)),
            Err(err) if err.is_not_found_err() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// all branches under `refs/heads`, sorted by name
    pub fn ls_branches(&self) -> RitResult<Vec<(String, Oid)>> {
        let heads_dir = self.repo.gitdir().join("refs").join("heads");
        let mut branches = vec![];
        if !heads_dir.exists() {
            return Ok(branches);
        }
        for entry in WalkDir::new(&heads_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = path::to_unix_str(entry.path().strip_prefix(&heads_dir)?);
            let sym = SymbolicRef::new_branch(&name);
            let oid = self.resolve(&RitRef::Symbolic(sym))?;
            branches.push((name, oid));
        }
        Ok(branches.into_iter().sorted().collect())
    }

    pub fn ls_tags(&self) -> RitResult<Vec<(String, Oid)>> {
        let tags_dir = self.repo.gitdir().join("refs").join("tags");
        let mut tags = vec![];
        if !tags_dir.exists() {
            return Ok(tags);
        }
        for entry in WalkDir::new(&tags_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = path::to_unix_str(entry.path().strip_prefix(&tags_dir)?);
            let oid = self.resolve(&RitRef::Symbolic(SymbolicRef::new_tag(&name)))?;
            tags.push((name, oid));
        }
        Ok(tags.into_iter().sorted().collect())
    }

    /// append a reflog line for `sym`; branch updates are mirrored into
    /// `logs/HEAD` when HEAD is attached to that branch
    pub fn append_reflog(
        &self,
        sym: &SymbolicRef,
        prev: Oid,
        new: Oid,
        msg: &str,
    ) -> RitResult<()> {
        let committer = self.repo.signature()?;
        let line = format!("{} {} {}\t{}\n", prev, new, committer, msg);

        if sym.kind() != SymbolicRefKind::Head {
            self.append_log_line(sym, &line)?;
        }

        let mirror_into_head = match sym.kind() {
            SymbolicRefKind::Head => true,
            SymbolicRefKind::Branch => match self.repo.read_head()? {
                RitRef::Symbolic(head_sym) => head_sym == *sym,
                RitRef::Direct(..) => false,
            },
            _ => false,
        };
        if mirror_into_head {
            self.append_log_line(&SymbolicRef::HEAD, &line)?;
        }
        Ok(())
    }

    fn append_log_line(&self, sym: &SymbolicRef, line: &str) -> RitResult<()> {
        let log_path = self.log_path(sym);
        log_path.parent().map(std::fs::create_dir_all).transpose()?;
        let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn read_reflog(&self, sym: &SymbolicRef) -> RitResult<RitReflog> {
        let log_path = self.log_path(sym);
        if !log_path.exists() {
            return Ok(RitReflog::default());
        }
        RitReflog::from_str(&std::fs::read_to_string(log_path)?)
    }

    pub fn delete_reflog(&self, sym: &SymbolicRef) -> RitResult<()> {
        let log_path = self.log_path(sym);
        if log_path.exists() {
            std::fs::remove_file(log_path)?;
        }
        Ok(())
    }

    pub fn validate_name(&self, name: &str) -> RitResult<()> {
        ensure!(is_valid_name(name), "fatal: '{}' is not a valid branch name", name);
        Ok(())
    }
}
