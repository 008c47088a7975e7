use crate::error::RitResult;
use crate::obj::{Commit, Oid};
use crate::repo::RitRepo;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// yields all commits reachable from the roots in reverse chronological order
pub struct RevWalk<'r> {
    repo: &'r RitRepo,
    queue: BinaryHeap<WalkNode>,
    seen: FxHashSet<Oid>,
    // monotically increasing counter used as a tie-break so insertion order
    // decides between equal timestamps
    next_index: usize,
}

struct WalkNode {
    commit: Rc<Commit>,
    oid: Oid,
    index: usize,
}

impl PartialEq for WalkNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WalkNode {
}

impl PartialOrd for WalkNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WalkNode {
    // max-heap: most recent commit first, earliest-queued first on ties
    fn cmp(&self, other: &Self) -> Ordering {
        self.commit
            .committer
            .time
            .cmp(&other.commit.committer.time)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl<'r> RevWalk<'r> {
    pub fn new(repo: &'r RitRepo, root: Oid) -> RitResult<Self> {
        let mut walk =
            Self { repo, queue: BinaryHeap::new(), seen: FxHashSet::default(), next_index: 0 };
        walk.enqueue(root)?;
        Ok(walk)
    }

    fn enqueue(&mut self, oid: Oid) -> RitResult<()> {
        if !self.seen.insert(oid) {
            return Ok(());
        }
        let commit = self.repo.read_commit(oid)?;
        let index = self.next_index;
        self.next_index += 1;
        self.queue.push(WalkNode { commit, oid, index });
        Ok(())
    }

    fn next_inner(&mut self) -> RitResult<Option<(Oid, Rc<Commit>)>> {
        let node = match self.queue.pop() {
            Some(node) => node,
            None => return Ok(None),
        };
        for &parent in &node.commit.parents {
            self.enqueue(parent)?;
        }
        Ok(Some((node.oid, node.commit)))
    }
}

impl<'r> Iterator for RevWalk<'r> {
    type Item = RitResult<(Oid, Rc<Commit>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_inner().transpose()
    }
}
