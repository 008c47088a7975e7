use crate::error::RitResult;
use crate::index::RitIndex;
use crate::obj::{
    Blob, Commit, FileMode, Oid, PartialOid, RitId, RitObjHeader, RitObjKind, WritableObject,
};
use crate::odb::RitObjDb;
use crate::path;
use crate::refs::{RefUpdateCause, RitRef, RitRefDb, SymbolicRef};
use crate::signature::{RitSignature, RitTime};
use anyhow::Context;
use log::debug;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const RIT_INDEX_FILE_PATH: &str = "index";
pub const RIT_HEAD_FILE_PATH: &str = "HEAD";
pub const RIT_OBJECTS_DIR_PATH: &str = "objects";
pub const RIT_DEFAULT_BRANCH: &str = "main";

pub const MERGE_HEAD_FILE: &str = "MERGE_HEAD";
pub const ORIG_HEAD_FILE: &str = "ORIG_HEAD";
pub const MERGE_MODE_FILE: &str = "MERGE_MODE";
pub const MERGE_MSG_FILE: &str = "MERGE_MSG";
pub const CHERRY_PICK_HEAD_FILE: &str = "CHERRY_PICK_HEAD";

pub struct RitRepo {
    workdir: PathBuf,
    gitdir: PathBuf,
    index_path: PathBuf,
    odb: RitObjDb,
    // commits are read repeatedly during history traversals; parse each once
    commit_cache: RefCell<FxHashMap<Oid, Rc<Commit>>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RepoState {
    Clean,
    Merging,
}

/// what `HEAD` currently points at
#[derive(Debug, PartialEq, Clone)]
pub enum HeadState {
    /// on a branch that has at least one commit
    Attached { branch: SymbolicRef, oid: Oid },
    /// on a branch with no commits yet
    Unborn { branch: SymbolicRef },
    /// a raw commit hash in HEAD
    Detached(Oid),
}

#[derive(Debug, PartialEq)]
pub struct InitSummary {
    pub path: PathBuf,
    pub reinitialized: bool,
}

impl RitRepo {
    pub fn init(path: impl AsRef<Path>) -> RitResult<InitSummary> {
        let workdir = path.as_ref();
        std::fs::create_dir_all(workdir)?;
        let workdir = workdir.canonicalize()?;
        ensure!(!workdir.is_file(), "`{}` is not a directory", workdir.display());

        let gitdir = workdir.join(".git");
        if gitdir.exists() {
            return Ok(InitSummary { path: workdir, reinitialized: true });
        }

        std::fs::create_dir(&gitdir)?;
        std::fs::create_dir_all(gitdir.join(RIT_OBJECTS_DIR_PATH))?;
        std::fs::create_dir_all(gitdir.join("refs/heads"))?;
        std::fs::create_dir_all(gitdir.join("refs/tags"))?;
        std::fs::create_dir_all(gitdir.join("logs"))?;

        let mut desc = std::fs::File::create(gitdir.join("description"))?;
        writeln!(desc, "Unnamed repository; edit this file 'description' to name the repository.")?;

        let mut head = std::fs::File::create(gitdir.join(RIT_HEAD_FILE_PATH))?;
        writeln!(head, "ref: refs/heads/{}", RIT_DEFAULT_BRANCH)?;

        Ok(InitSummary { path: workdir, reinitialized: false })
    }

    pub fn load(path: impl AsRef<Path>) -> RitResult<Self> {
        let workdir = path.as_ref().canonicalize()?;
        let gitdir = workdir.join(".git");
        ensure!(
            gitdir.exists(),
            "fatal: not a rit repository (or any of the parent directories): .git"
        );
        let index_path = gitdir.join(RIT_INDEX_FILE_PATH);
        let odb = RitObjDb::new(gitdir.join(RIT_OBJECTS_DIR_PATH));
        Ok(Self { workdir, gitdir, index_path, odb, commit_cache: Default::default() })
    }

    /// recursively searches parent directories for a repository
    pub fn find(path: impl AsRef<Path>) -> RitResult<Self> {
        let path = path.as_ref();
        let canonical = path.canonicalize().with_context(|| {
            format!("failed to find rit repository in nonexistent path `{}`", path.display())
        })?;
        let mut current = canonical.as_path();
        loop {
            if current.join(".git").exists() {
                return Self::load(current);
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => bail!("fatal: not a rit repository (or any of the parent directories): .git"),
            }
        }
    }

    #[inline]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    #[inline]
    pub fn gitdir(&self) -> &Path {
        &self.gitdir
    }

    #[inline]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn index(&self) -> RitResult<RitIndex<'_>> {
        RitIndex::load(self)
    }

    pub fn refdb(&self) -> RitRefDb<'_> {
        RitRefDb::new(self)
    }

    pub fn repo_state(&self) -> RepoState {
        if self.gitdir.join(MERGE_HEAD_FILE).exists() {
            RepoState::Merging
        } else {
            RepoState::Clean
        }
    }

    // ===== object database =====

    pub fn write_obj(&self, obj: &dyn WritableObject) -> RitResult<Oid> {
        self.odb.write(obj)
    }

    pub fn read_obj(&self, id: impl Into<RitId>) -> RitResult<RitObjKind> {
        RitObjKind::from_raw(self.odb.read_raw(id.into())?)
    }

    pub fn read_obj_header(&self, id: impl Into<RitId>) -> RitResult<RitObjHeader> {
        self.odb.read_header(id.into())
    }

    pub fn obj_exists(&self, id: impl Into<RitId>) -> RitResult<bool> {
        self.odb.exists(id)
    }

    pub fn expand_prefix(&self, prefix: PartialOid) -> RitResult<Oid> {
        self.odb.expand_prefix(prefix)
    }

    pub fn read_commit(&self, oid: Oid) -> RitResult<Rc<Commit>> {
        if let Some(commit) = self.commit_cache.borrow().get(&oid) {
            return Ok(Rc::clone(commit));
        }
        let commit = Rc::new(self.read_obj(oid)?.try_into_commit(oid)?);
        self.commit_cache.borrow_mut().insert(oid, Rc::clone(&commit));
        Ok(commit)
    }

    pub fn read_blob(&self, oid: Oid) -> RitResult<Blob> {
        Ok(self.read_obj(oid)?.into_blob())
    }

    /// flatten a tree into `{ unix path -> (mode, oid) }`;
    /// `Oid::UNKNOWN` flattens to the empty mapping
    pub fn flatten_tree(&self, tree_oid: Oid) -> RitResult<BTreeMap<String, TreeFileEntry>> {
        let mut files = BTreeMap::new();
        if tree_oid.is_unknown() {
            return Ok(files);
        }
        let mut worklist = vec![(String::new(), tree_oid)];
        while let Some((prefix, oid)) = worklist.pop() {
            let tree = self.read_obj(oid)?.into_tree();
            for entry in &tree.entries {
                let entry_path = if prefix.is_empty() {
                    entry.name.clone()
                } else {
                    format!("{}/{}", prefix, entry.name)
                };
                match entry.mode {
                    FileMode::TREE => worklist.push((entry_path, entry.oid)),
                    FileMode::REG => {
                        files.insert(
                            entry_path,
                            TreeFileEntry { mode: entry.mode, oid: entry.oid },
                        );
                    }
                }
            }
        }
        Ok(files)
    }

    /// create and store a commit object
    pub fn write_commit(
        &self,
        tree: Oid,
        parents: SmallVec<[Oid; 2]>,
        message: String,
    ) -> RitResult<Oid> {
        let author = self.signature()?;
        let committer = author.clone();
        let commit = Commit { tree, parents, author, committer, message };
        self.write_obj(&commit)
    }

    // ===== worktree =====

    pub fn to_fs_path(&self, unix_path: &str) -> PathBuf {
        path::to_fs_path(&self.workdir, unix_path)
    }

    /// read the worktree file at `path` and store it as a blob
    pub fn write_blob_from_worktree(&self, unix_path: &str) -> RitResult<Oid> {
        let bytes = std::fs::read(self.to_fs_path(unix_path))?;
        self.write_obj(&Blob::new(bytes))
    }

    /// hash the worktree file at `path` without storing it
    pub fn hash_blob_from_worktree(&self, unix_path: &str) -> RitResult<Oid> {
        let bytes = std::fs::read(self.to_fs_path(unix_path))?;
        crate::hash::hash_obj(&Blob::new(bytes))
    }

    /// all non-ignored files in the worktree as sorted unix paths
    pub fn worktree_files(&self) -> RitResult<Vec<String>> {
        let mut builder = ignore::WalkBuilder::new(&self.workdir);
        builder
            .hidden(false)
            .require_git(false)
            .git_global(false)
            .git_exclude(false)
            .git_ignore(true)
            .filter_entry(|entry| entry.file_name() != ".git");

        let mut files = vec![];
        for result in builder.build() {
            let entry = result?;
            if entry.file_type().map_or(false, |ft| ft.is_file()) {
                files.push(path::to_unix_str(entry.path().strip_prefix(&self.workdir)?));
            }
        }
        files.sort();
        Ok(files)
    }

    // ===== refs and HEAD =====

    /// the contents of `HEAD`: either a branch pointer or a raw hash
    pub fn read_head(&self) -> RitResult<RitRef> {
        let path = self.gitdir.join(RIT_HEAD_FILE_PATH);
        std::fs::read_to_string(path)?.parse()
    }

    pub fn resolve_head(&self) -> RitResult<HeadState> {
        match self.read_head()? {
            RitRef::Direct(oid) => Ok(HeadState::Detached(oid)),
            RitRef::Symbolic(branch) => match self.refdb().try_resolve(&RitRef::Symbolic(branch.clone()))? {
                Some(oid) => Ok(HeadState::Attached { branch, oid }),
                None => Ok(HeadState::Unborn { branch }),
            },
        }
    }

    pub fn fully_resolve_head(&self) -> RitResult<Oid> {
        match self.resolve_head()? {
            HeadState::Attached { oid, .. } | HeadState::Detached(oid) => Ok(oid),
            HeadState::Unborn { branch } => bail!(
                "fatal: your current branch '{:#}' does not have any commits yet",
                branch
            ),
        }
    }

    pub fn try_fully_resolve_head(&self) -> RitResult<Option<Oid>> {
        match self.resolve_head()? {
            HeadState::Attached { oid, .. } | HeadState::Detached(oid) => Ok(Some(oid)),
            HeadState::Unborn { .. } => Ok(None),
        }
    }

    /// the tree of the HEAD commit, or `Oid::UNKNOWN` before the first commit
    pub fn head_tree(&self) -> RitResult<Oid> {
        match self.try_fully_resolve_head()? {
            Some(oid) => Ok(self.read_commit(oid)?.tree),
            None => Ok(Oid::UNKNOWN),
        }
    }

    pub fn current_branch(&self) -> RitResult<Option<SymbolicRef>> {
        match self.read_head()? {
            RitRef::Symbolic(sym) => Ok(Some(sym)),
            RitRef::Direct(..) => Ok(None),
        }
    }

    /// update a ref and append the reflog line recording why it moved
    pub fn update_ref(
        &self,
        sym: &SymbolicRef,
        to: impl Into<RitRef>,
        cause: RefUpdateCause,
    ) -> RitResult<()> {
        let to = to.into();
        debug!("update_ref({} -> {}, {})", sym, to, cause);
        let refdb = self.refdb();
        let prev = refdb.try_resolve(&RitRef::Symbolic(sym.clone()))?.unwrap_or(Oid::UNKNOWN);
        refdb.update(sym, &to)?;
        let new = refdb.resolve(&to)?;
        refdb.append_reflog(sym, prev, new, &cause.to_string())
    }

    pub fn update_head(&self, to: impl Into<RitRef>, cause: RefUpdateCause) -> RitResult<()> {
        let to = to.into();
        let refdb = self.refdb();
        let prev = self.try_fully_resolve_head()?.unwrap_or(Oid::UNKNOWN);
        refdb.update(&SymbolicRef::HEAD, &to)?;
        let new = refdb.try_resolve(&to)?.unwrap_or(Oid::UNKNOWN);
        refdb.append_reflog(&SymbolicRef::HEAD, prev, new, &cause.to_string())
    }

    /// advance the current branch (or HEAD itself when detached)
    pub fn update_current_ref(&self, to: Oid, cause: RefUpdateCause) -> RitResult<()> {
        match self.current_branch()? {
            Some(branch) => self.update_ref(&branch, to, cause),
            None => self.update_head(to, cause),
        }
    }

    // ===== merge state files =====

    pub fn state_file_path(&self, name: &str) -> PathBuf {
        self.gitdir.join(name)
    }

    pub fn read_state_file_oid(&self, name: &str) -> RitResult<Option<Oid>> {
        let path = self.state_file_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?.trim_end().parse()?))
    }

    pub fn write_state_file(&self, name: &str, contents: &str) -> RitResult<()> {
        Ok(std::fs::write(self.state_file_path(name), contents)?)
    }

    pub fn delete_state_file(&self, name: &str) -> RitResult<()> {
        let path = self.state_file_path(name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn clear_merge_state(&self) -> RitResult<()> {
        for file in [MERGE_MODE_FILE, MERGE_MSG_FILE, MERGE_HEAD_FILE, ORIG_HEAD_FILE] {
            self.delete_state_file(file)?;
        }
        Ok(())
    }

    // ===== identity =====

    pub fn signature(&self) -> RitResult<RitSignature> {
        let name = std::env::var("RIT_AUTHOR_NAME").unwrap_or_else(|_| "Rit User".to_owned());
        let email =
            std::env::var("RIT_AUTHOR_EMAIL").unwrap_or_else(|_| "rit@example.com".to_owned());
        Ok(RitSignature { name, email, time: RitTime::now() })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TreeFileEntry {
    pub mode: FileMode,
    pub oid: Oid,
}

impl std::fmt::Debug for RitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RitRepo")
            .field("workdir", &self.workdir)
            .field("gitdir", &self.gitdir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
