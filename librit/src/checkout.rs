use crate::error::RitResult;
use crate::obj::Oid;
use crate::path;
use crate::refs::{RefUpdateCause, RitRef, SymbolicRef};
use crate::repo::{HeadState, RitRepo};
use log::debug;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct CheckoutOpts {
    /// create the branch before switching to it
    pub create: bool,
    /// revision the new branch starts from; defaults to HEAD
    pub base: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct CheckoutSummary {
    /// None when the checkout detached HEAD
    pub branch: Option<String>,
    pub oid: Oid,
    pub created: bool,
}

/// the planned filesystem effect of a checkout, computed in full before
/// anything is touched
#[derive(Debug, Default)]
struct Migration {
    /// blobs to write, paths relative to the workdir
    writes: Vec<(String, Oid)>,
    /// files to remove (with empty parent directories pruned afterwards)
    removals: BTreeSet<String>,
}

impl RitRepo {
    /// bring the worktree and index into exact correspondence with the tree
    /// of commit `commit_oid`
    pub fn checkout_tree(&self, commit_oid: Oid) -> RitResult<()> {
        let tree_oid = self.read_commit(commit_oid)?.tree;
        self.checkout_tree_oid(tree_oid)
    }

    pub fn checkout_tree_oid(&self, tree_oid: Oid) -> RitResult<()> {
        let target = self.flatten_tree(tree_oid)?;

        let mut migration = Migration::default();

        // files whose content is missing or differs get rewritten
        for (target_path, entry) in &target {
            let abs = self.to_fs_path(target_path);
            if !abs.is_file() || self.hash_blob_from_worktree(target_path)? != entry.oid {
                migration.writes.push((target_path.clone(), entry.oid));
            }
        }

        // indexed paths that are absent from the target tree go away
        let index = self.index()?;
        for entry in index.entries() {
            if !target.contains_key(&entry.path) {
                migration.removals.insert(entry.path.clone());
            }
        }

        // so does everything else lying around that is not ignored
        for worktree_path in self.worktree_files()? {
            if !target.contains_key(&worktree_path) {
                migration.removals.insert(worktree_path);
            }
        }

        debug!(
            "checkout_tree_oid({}) :: {} writes, {} removals",
            tree_oid,
            migration.writes.len(),
            migration.removals.len()
        );
        self.apply_migration(&migration)?;

        // the index now mirrors the target tree exactly, all at stage 0
        let mut index = self.index()?;
        index.read_tree(tree_oid)?;
        index.save()
    }

    fn apply_migration(&self, migration: &Migration) -> RitResult<()> {
        for removal in &migration.removals {
            let abs = self.to_fs_path(removal);
            if abs.exists() {
                std::fs::remove_file(&abs)?;
            }
            self.prune_empty_parents(removal)?;
        }

        for (write_path, oid) in &migration.writes {
            let abs = self.to_fs_path(write_path);
            abs.parent().map(std::fs::create_dir_all).transpose()?;
            let blob = self.read_blob(*oid)?;
            std::fs::write(&abs, blob.bytes())?;
        }

        Ok(())
    }

    fn prune_empty_parents(&self, unix_path: &str) -> RitResult<()> {
        let mut dir = path::parent_dir(unix_path);
        while let Some(current) = dir {
            let abs = self.to_fs_path(current);
            if abs.exists() && std::fs::read_dir(&abs)?.next().is_none() {
                std::fs::remove_dir(&abs)?;
            } else {
                break;
            }
            dir = path::parent_dir(current);
        }
        Ok(())
    }

    /// switch to a branch (creating it with `-b`), or detach at a revision
    pub fn checkout(&self, name: &str, opts: CheckoutOpts) -> RitResult<CheckoutSummary> {
        let prev_desc = match self.resolve_head()? {
            HeadState::Attached { branch, .. } | HeadState::Unborn { branch } =>
                branch.short().to_owned(),
            HeadState::Detached(oid) => oid.to_string(),
        };

        if opts.create {
            self.branch_create(name, opts.base.as_deref())?;
        }

        let branch = SymbolicRef::new_branch(name);
        let refdb = self.refdb();
        if refdb.exists(&branch) {
            let oid = refdb.resolve(&RitRef::Symbolic(branch.clone()))?;
            self.checkout_tree(oid)?;
            self.update_head(
                branch,
                RefUpdateCause::Checkout { from: prev_desc, to: name.to_owned() },
            )?;
            return Ok(CheckoutSummary { branch: Some(name.to_owned()), oid, created: opts.create });
        }

        // not a branch: a detached checkout writes the raw hash into HEAD
        let resolved = self.resolve_rev(name)?;
        let oid = resolved.oid;
        ensure!(self.obj_exists(oid)?, "fatal: reference is not a tree: {}", name);
        self.checkout_tree(oid)?;
        self.update_head(
            oid,
            RefUpdateCause::Checkout { from: prev_desc, to: oid.to_string() },
        )?;
        Ok(CheckoutSummary { branch: None, oid, created: false })
    }
}

#[cfg(test)]
mod tests;
