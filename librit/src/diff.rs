use crate::error::RitResult;
use crate::index::MergeStage;
use crate::obj::Oid;
use crate::repo::RitRepo;
use crate::xdiff::{self, DiffTraceAction};
use std::collections::BTreeSet;

/// one side of a file diff: the blob hash and its bytes
#[derive(Debug, Clone, PartialEq)]
pub struct DiffSide {
    pub oid: Oid,
    pub bytes: Vec<u8>,
}

impl DiffSide {
    pub fn lines(&self) -> Vec<&[u8]> {
        split_lines(&self.bytes)
    }
}

/// split on `\n` with no trailing-newline normalization: a file ending in a
/// newline contributes a final empty line, matching the input
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes.split(|&b| b == b'\n').collect()
}

/// the diff of a single path between two trees; either side may be absent
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiff {
    pub path: String,
    pub base: Option<DiffSide>,
    pub target: Option<DiffSide>,
    pub trace: Vec<DiffTraceAction>,
}

impl FileDiff {
    pub fn new(path: String, base: Option<DiffSide>, target: Option<DiffSide>) -> Self {
        let base_lines = base.as_ref().map(|side| side.lines()).unwrap_or_default();
        let target_lines = target.as_ref().map(|side| side.lines()).unwrap_or_default();
        let trace = xdiff::myers_diff(&base_lines, &target_lines);
        Self { path, base, target, trace }
    }

    pub fn created(&self) -> bool {
        self.base.is_none() && self.target.is_some()
    }

    pub fn deleted(&self) -> bool {
        self.base.is_some() && self.target.is_none()
    }

    pub fn num_insertions(&self) -> usize {
        self.trace.iter().filter(|&&a| a == DiffTraceAction::Add).count()
    }

    pub fn num_deletions(&self) -> usize {
        self.trace.iter().filter(|&&a| a == DiffTraceAction::Delete).count()
    }

    pub fn num_changes(&self) -> usize {
        self.num_insertions() + self.num_deletions()
    }
}

/// the diff of two trees: one FileDiff per path whose blob hash differs
#[derive(Debug, Default, PartialEq)]
pub struct TreeDiff {
    file_diffs: Vec<FileDiff>,
}

impl TreeDiff {
    pub fn file_diffs(&self) -> &[FileDiff] {
        &self.file_diffs
    }

    pub fn file_diff(&self, path: &str) -> Option<&FileDiff> {
        self.file_diffs.iter().find(|diff| diff.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.file_diffs.iter().map(|diff| diff.path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.file_diffs.is_empty()
    }

    pub fn num_insertions(&self) -> usize {
        self.file_diffs.iter().map(FileDiff::num_insertions).sum()
    }

    pub fn num_deletions(&self) -> usize {
        self.file_diffs.iter().map(FileDiff::num_deletions).sum()
    }
}

impl RitRepo {
    /// diff two trees (`Oid::UNKNOWN` stands for the empty tree); paths are
    /// set-unioned and compared by blob hash, renames are not detected
    pub fn tree_diff(&self, base_tree: Oid, target_tree: Oid) -> RitResult<TreeDiff> {
        let base_files = self.flatten_tree(base_tree)?;
        let target_files = self.flatten_tree(target_tree)?;

        let all_paths = base_files
            .keys()
            .chain(target_files.keys())
            .cloned()
            .collect::<BTreeSet<String>>();

        let mut file_diffs = vec![];
        for path in all_paths {
            let base = base_files.get(&path);
            let target = target_files.get(&path);
            match (base, target) {
                (Some(b), Some(t)) if b.oid == t.oid => continue,
                (None, None) => unreachable!(),
                _ => {}
            }
            let side = |entry: Option<&crate::repo::TreeFileEntry>| -> RitResult<_> {
                entry
                    .map(|entry| {
                        Ok(DiffSide {
                            oid: entry.oid,
                            bytes: self.read_blob(entry.oid)?.into_bytes(),
                        })
                    })
                    .transpose()
            };
            let base = side(base)?;
            let target = side(target)?;
            file_diffs.push(FileDiff::new(path, base, target));
        }

        Ok(TreeDiff { file_diffs })
    }

    /// diff two commits by their trees
    pub fn commit_diff(&self, base: Oid, target: Oid) -> RitResult<TreeDiff> {
        let base_tree = if base.is_unknown() { Oid::UNKNOWN } else { self.read_commit(base)?.tree };
        let target_tree =
            if target.is_unknown() { Oid::UNKNOWN } else { self.read_commit(target)?.tree };
        self.tree_diff(base_tree, target_tree)
    }

    /// diff the index against the worktree (unstaged changes); the worktree
    /// side of a pair is hashed on the fly
    pub fn diff_index_worktree(&self) -> RitResult<TreeDiff> {
        let index = self.index()?;
        let worktree_paths = self.worktree_files()?;

        let mut file_diffs = vec![];
        for entry in index.entries() {
            // a conflicted path has stage 1/2/3 rows and no resolved row;
            // comparing each of them against the marker file on disk would
            // yield one diff per stage for the same path
            if entry.stage() != MergeStage::None {
                continue;
            }
            let abs = self.to_fs_path(&entry.path);
            let base = Some(DiffSide {
                oid: entry.oid,
                bytes: self.read_blob(entry.oid)?.into_bytes(),
            });
            if !abs.exists() {
                file_diffs.push(FileDiff::new(entry.path.clone(), base, None));
                continue;
            }
            let worktree_oid = self.hash_blob_from_worktree(&entry.path)?;
            if worktree_oid != entry.oid {
                let bytes = std::fs::read(&abs)?;
                let target = Some(DiffSide { oid: worktree_oid, bytes });
                file_diffs.push(FileDiff::new(entry.path.clone(), base, target));
            }
        }

        for path in worktree_paths {
            if !index.contains_path(&path) {
                let bytes = std::fs::read(self.to_fs_path(&path))?;
                let oid = self.hash_blob_from_worktree(&path)?;
                file_diffs.push(FileDiff::new(path, None, Some(DiffSide { oid, bytes })));
            }
        }

        file_diffs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(TreeDiff { file_diffs })
    }

    /// diff the HEAD tree against the index (staged changes)
    pub fn diff_head_index(&self) -> RitResult<TreeDiff> {
        let head_files = self.flatten_tree(self.head_tree()?)?;
        let index = self.index()?;

        let mut file_diffs = vec![];
        for entry in index.entries() {
            // unresolved conflict stages are not staged content
            if entry.stage() != MergeStage::None {
                continue;
            }
            match head_files.get(&entry.path) {
                Some(head_entry) if head_entry.oid == entry.oid => continue,
                head_entry => {
                    let base = head_entry
                        .map(|e| {
                            Ok::<_, crate::error::RitGenericError>(DiffSide {
                                oid: e.oid,
                                bytes: self.read_blob(e.oid)?.into_bytes(),
                            })
                        })
                        .transpose()?;
                    let target = Some(DiffSide {
                        oid: entry.oid,
                        bytes: self.read_blob(entry.oid)?.into_bytes(),
                    });
                    file_diffs.push(FileDiff::new(entry.path.clone(), base, target));
                }
            }
        }

        for (path, head_entry) in &head_files {
            if !index.contains_path(path) {
                let base = Some(DiffSide {
                    oid: head_entry.oid,
                    bytes: self.read_blob(head_entry.oid)?.into_bytes(),
                });
                file_diffs.push(FileDiff::new(path.clone(), base, None));
            }
        }

        file_diffs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(TreeDiff { file_diffs })
    }
}

#[cfg(test)]
mod tests;
