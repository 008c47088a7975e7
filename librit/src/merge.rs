use crate::commit::CommitOpts;
use crate::diff::FileDiff;
use crate::error::RitResult;
use crate::index::{MergeStage, RitIndexEntry};
use crate::obj::Oid;
use crate::refs::RefUpdateCause;
use crate::repo::{
    RepoState, RitRepo, MERGE_HEAD_FILE, MERGE_MODE_FILE, MERGE_MSG_FILE, ORIG_HEAD_FILE,
};
use log::debug;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// the paths left with stage 1/2/3 entries after a merge attempt
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergeConflicts {
    pub paths: Vec<String>,
}

impl Display for MergeConflicts {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for path in &self.paths {
            writeln!(f, "CONFLICT (content): Merge conflict in {}", path)?;
        }
        write!(f, "Automatic merge failed; fix conflicts and then commit the result.")
    }
}

#[derive(Debug, PartialEq)]
pub enum MergeResults {
    AlreadyUpToDate,
    FastForward { from: Oid, to: Oid },
    Merged(Oid),
    Conflicts(MergeConflicts),
}

impl MergeResults {
    #[cfg(test)]
    pub fn into_conflicts(self) -> MergeConflicts {
        match self {
            MergeResults::Conflicts(conflicts) => conflicts,
            _ => panic!("expected merge to conflict, got {:?}", self),
        }
    }
}

impl RitRepo {
    /// every commit reachable from `from` (inclusive), by iterative traversal
    pub fn reachable_commits(&self, from: Oid) -> RitResult<FxHashSet<Oid>> {
        let mut visited = FxHashSet::default();
        let mut worklist = vec![from];
        while let Some(oid) = worklist.pop() {
            if !visited.insert(oid) {
                continue;
            }
            let commit = self.read_commit(oid)?;
            worklist.extend(commit.parents.iter().copied());
        }
        Ok(visited)
    }

    /// the most recent common ancestor of `a` and `b`, or None for disjoint
    /// histories; ties broken by committer timestamp descending then by hash
    pub fn merge_base(&self, a: Oid, b: Oid) -> RitResult<Option<Oid>> {
        let reachable_a = self.reachable_commits(a)?;
        let reachable_b = self.reachable_commits(b)?;

        let mut best: Option<(i64, Oid)> = None;
        for &oid in reachable_a.intersection(&reachable_b) {
            let time = self.read_commit(oid)?.committer.time.time.as_secs();
            let candidate = (time, oid);
            best = match best {
                None => Some(candidate),
                Some(current) => {
                    let (best_time, best_oid) = current;
                    if time > best_time || (time == best_time && oid.to_hex() < best_oid.to_hex())
                    {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        Ok(best.map(|(_, oid)| oid))
    }

    pub fn merge(&self, rev: &str) -> RitResult<MergeResults> {
        MergeCtxt::new(self, rev)?.merge()
    }
}

struct MergeCtxt<'r> {
    repo: &'r RitRepo,
    /// the revision string the user asked to merge; labels the conflict markers
    source_rev: String,
    source: Oid,
}

impl<'r> MergeCtxt<'r> {
    fn new(repo: &'r RitRepo, rev: &str) -> RitResult<Self> {
        ensure!(
            repo.repo_state() == RepoState::Clean,
            "fatal: You have not concluded your merge (MERGE_HEAD exists)."
        );
        let source = repo.resolve_rev_oid(rev)?;
        Ok(Self { repo, source_rev: rev.to_owned(), source })
    }

    fn merge(self) -> RitResult<MergeResults> {
        let repo = self.repo;
        let target = repo.fully_resolve_head()?;
        let source = self.source;
        debug!("MergeCtxt::merge(target: {}, source: {})", target, source);

        if target == source {
            return Ok(MergeResults::AlreadyUpToDate);
        }

        let base = repo
            .merge_base(target, source)?
            .ok_or_else(|| anyhow!("fatal: refusing to merge unrelated histories"))?;

        if base == source {
            return Ok(MergeResults::AlreadyUpToDate);
        }

        if base == target {
            repo.checkout_tree(source)?;
            repo.update_current_ref(
                source,
                RefUpdateCause::FastForwardMerge { rev: self.source_rev.clone() },
            )?;
            return Ok(MergeResults::FastForward { from: target, to: source });
        }

        self.three_way_merge(base, target, source)
    }

    fn three_way_merge(&self, base: Oid, target: Oid, source: Oid) -> RitResult<MergeResults> {
        let repo = self.repo;
        let conflicts = repo.apply_tree_merge(base, target, source, "HEAD", &self.source_rev)?;

        self.write_merge_state(target, source, &conflicts)?;

        if conflicts.is_empty() {
            // a clean merge commits itself through the normal commit path,
            // which picks up MERGE_MSG and MERGE_HEAD and clears the state files
            let summary = repo.commit(CommitOpts::default())?;
            Ok(MergeResults::Merged(summary.oid))
        } else {
            Ok(MergeResults::Conflicts(MergeConflicts { paths: conflicts }))
        }
    }

    fn write_merge_state(&self, target: Oid, source: Oid, conflicts: &[String]) -> RitResult<()> {
        let repo = self.repo;
        repo.write_state_file(MERGE_HEAD_FILE, &format!("{}\n", source))?;
        repo.write_state_file(ORIG_HEAD_FILE, &format!("{}\n", target))?;
        repo.write_state_file(MERGE_MODE_FILE, "")?;

        let mut msg = format!("Merge branch '{}'\n\n# Conflicts:\n", self.source_rev);
        for path in conflicts {
            msg.push_str(&format!("#\t{}\n", path));
        }
        repo.write_state_file(MERGE_MSG_FILE, &msg)
    }
}

impl RitRepo {
    /// the file-granular three-way reconciliation shared by merge and
    /// cherry-pick: paths changed on one side are taken as-is, paths changed
    /// on both sides conflict as whole files; returns the conflicted paths
    pub(crate) fn apply_tree_merge(
        &self,
        base: Oid,
        target: Oid,
        source: Oid,
        target_label: &str,
        source_label: &str,
    ) -> RitResult<Vec<String>> {
        let base_tree = self.read_commit(base)?.tree;
        let target_tree = self.read_commit(target)?.tree;
        let source_tree = self.read_commit(source)?.tree;

        let target_diff = self.tree_diff(base_tree, target_tree)?;
        let source_diff = self.tree_diff(base_tree, source_tree)?;

        let all_paths = target_diff
            .paths()
            .chain(source_diff.paths())
            .map(str::to_owned)
            .collect::<BTreeSet<String>>();

        let mut index = self.index()?;
        let mut conflicts = vec![];

        for path in &all_paths {
            let on_target = target_diff.file_diff(path);
            let on_source = source_diff.file_diff(path);
            debug!(
                "apply_tree_merge :: {} (target changed: {}, source changed: {})",
                path,
                on_target.is_some(),
                on_source.is_some()
            );
            match (on_target, on_source) {
                (None, None) => unreachable!(),
                // changed in the target only; the worktree already has it
                (Some(..), None) => {}
                // changed in the source only; take the source's version
                (None, Some(source_change)) => match &source_change.target {
                    Some(side) => {
                        let abs = self.to_fs_path(path);
                        abs.parent().map(std::fs::create_dir_all).transpose()?;
                        std::fs::write(&abs, &side.bytes)?;
                        let metadata = abs.metadata()?;
                        index.add_entry(RitIndexEntry::from_metadata(
                            path.clone(),
                            side.oid,
                            &metadata,
                        ));
                    }
                    None => {
                        // deleted in the source
                        let abs = self.to_fs_path(path);
                        if abs.exists() {
                            std::fs::remove_file(abs)?;
                        }
                        index.remove_entries_for_path(path);
                    }
                },
                // both sides touched the path: whole-file conflict
                (Some(target_change), Some(source_change)) => {
                    let markers = conflict_file_bytes(
                        target_label,
                        source_label,
                        target_change,
                        source_change,
                    );
                    let abs = self.to_fs_path(path);
                    abs.parent().map(std::fs::create_dir_all).transpose()?;
                    std::fs::write(&abs, markers)?;

                    index.remove_entries_for_path(path);
                    if let Some(base_side) = &target_change.base {
                        index.add_entry(
                            RitIndexEntry::from_blob(path.clone(), base_side.oid)
                                .with_stage(MergeStage::Base),
                        );
                    }
                    if let Some(target_side) = &target_change.target {
                        index.add_entry(
                            RitIndexEntry::from_blob(path.clone(), target_side.oid)
                                .with_stage(MergeStage::Target),
                        );
                    }
                    if let Some(source_side) = &source_change.target {
                        index.add_entry(
                            RitIndexEntry::from_blob(path.clone(), source_side.oid)
                                .with_stage(MergeStage::Source),
                        );
                    }
                    conflicts.push(path.clone());
                }
            }
        }

        index.save()?;
        Ok(conflicts)
    }
}

/// materialize the conflict-marker block:
/// `<<<<<<< target`, target lines, `=======`, source lines, `>>>>>>> source`
fn conflict_file_bytes(
    target_label: &str,
    source_label: &str,
    target_change: &FileDiff,
    source_change: &FileDiff,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("<<<<<<< {}\n", target_label).as_bytes());
    if let Some(side) = &target_change.target {
        out.extend_from_slice(&side.bytes);
        if !side.bytes.is_empty() && !side.bytes.ends_with(b"\n") {
            out.push(b'\n');
        }
    }
    out.extend_from_slice(b"=======\n");
    if let Some(side) = &source_change.target {
        out.extend_from_slice(&side.bytes);
        if !side.bytes.is_empty() && !side.bytes.ends_with(b"\n") {
            out.push(b'\n');
        }
    }
    out.extend_from_slice(format!(">>>>>>> {}\n", source_label).as_bytes());
    out
}

#[cfg(test)]
mod tests;
