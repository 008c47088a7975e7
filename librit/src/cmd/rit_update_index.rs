use crate::error::RitResult;
use crate::index::RitIndexEntry;
use crate::obj::{FileMode, Oid};
use crate::repo::RitRepo;

#[derive(Debug)]
pub enum UpdateIndexOpts {
    /// `--add <path>`: stage the worktree file
    Add { path: String },
    /// `--remove <path>`: drop the entry
    Remove { path: String },
    /// `--cacheinfo <mode> <oid> <path>`: stage an entry without touching disk
    CacheInfo { mode: FileMode, oid: Oid, path: String },
}

impl RitRepo {
    pub fn update_index(&self, opts: UpdateIndexOpts) -> RitResult<()> {
        let mut index = self.index()?;
        match opts {
            UpdateIndexOpts::Add { path } => {
                index.add_worktree_file(&path)?;
            }
            UpdateIndexOpts::Remove { path } => {
                index.remove_entries_for_path(&path);
            }
            UpdateIndexOpts::CacheInfo { mode, oid, path } => {
                ensure!(mode.is_file(), "fatal: cacheinfo mode must be a file mode");
                index.add_entry(RitIndexEntry::from_blob(path, oid));
            }
        }
        index.save()
    }
}
