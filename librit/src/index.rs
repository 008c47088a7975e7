mod index_entry;

use crate::error::{RitError, RitResult};
use crate::hash::RIT_HASH_SIZE;
use crate::io::{HashWriter, ReadExt, WriteExt};
use crate::lockfile::Lockfile;
use crate::obj::{FileMode, Oid, Tree, TreeEntry};
use crate::path;
use crate::repo::RitRepo;
use crate::serialize::{Deserialize, Serialize};
pub use index_entry::*;
use num_enum::TryFromPrimitive;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::io::{prelude::*, BufReader};
use std::ops::{Deref, DerefMut};

const RIT_INDEX_HEADER_SIG: &[u8; 4] = b"DIRC";
const RIT_INDEX_VERSION: u32 = 2;

/// the in-memory staging index bound to a repository
#[derive(Debug)]
pub struct RitIndex<'r> {
    pub repo: &'r RitRepo,
    inner: RitIndexInner,
}

impl<'r> Deref for RitIndex<'r> {
    type Target = RitIndexInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'r> DerefMut for RitIndex<'r> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct RitIndexEntries(RitIndexEntriesMap);

/// sorted ascending by filepath (as unsigned bytes), ties broken by stage
type RitIndexEntriesMap = BTreeMap<(String, MergeStage), RitIndexEntry>;

impl Deref for RitIndexEntries {
    type Target = RitIndexEntriesMap;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RitIndexEntries {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<RitIndexEntry> for RitIndexEntries {
    fn from_iter<T: IntoIterator<Item = RitIndexEntry>>(iter: T) -> Self {
        Self(iter.into_iter().map(|entry| (entry.key(), entry)).collect())
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct RitIndexInner {
    entries: RitIndexEntries,
    pub extensions: Vec<RitIndexExtension>,
}

#[derive(Debug, PartialEq, Eq, Ord, PartialOrd, Hash, TryFromPrimitive, Copy, Clone)]
#[repr(u8)]
pub enum MergeStage {
    /// resolved/normal
    None   = 0,
    /// common ancestor version
    Base   = 1,
    /// the current branch's version
    Target = 2,
    /// the incoming version
    Source = 3,
}

impl Default for MergeStage {
    fn default() -> Self {
        Self::None
    }
}

impl MergeStage {
    pub fn is_merging(self) -> bool {
        self as u8 > 0
    }
}

impl Display for MergeStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl RitIndexInner {
    pub fn new(entries: RitIndexEntries, extensions: Vec<RitIndexExtension>) -> Self {
        Self { entries, extensions }
    }

    pub fn entries(&self) -> impl Iterator<Item = &RitIndexEntry> + Clone {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_entry(&self, path: &str, stage: MergeStage) -> Option<&RitIndexEntry> {
        self.entries.get(&(path.to_owned(), stage))
    }

    pub fn entry_by_oid(&self, oid: Oid) -> Option<&RitIndexEntry> {
        self.entries.values().find(|entry| entry.oid == oid)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.keys().any(|(p, _)| p == path)
    }

    pub fn has_conflicts(&self) -> bool {
        self.entries.keys().any(|(_, stage)| stage.is_merging())
    }

    pub fn conflicted_paths(&self) -> Vec<String> {
        let mut paths = self
            .entries
            .keys()
            .filter(|(_, stage)| stage.is_merging())
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();
        paths.dedup();
        paths
    }

    /// if an entry with the same path and stage exists it is replaced;
    /// staging a resolved entry also clears any conflict stages for the path
    pub fn add_entry(&mut self, entry: RitIndexEntry) {
        if entry.stage() == MergeStage::None {
            self.remove_conflict_stages(&entry.path);
        }
        self.remove_collisions(&entry);
        self.entries.insert(entry.key(), entry);
    }

    /// removes all stages of `path`; returns false if nothing was removed
    pub fn remove_entries_for_path(&mut self, path: &str) -> bool {
        let mut removed = false;
        for stage in
            [MergeStage::None, MergeStage::Base, MergeStage::Target, MergeStage::Source]
        {
            removed |= self.entries.remove(&(path.to_owned(), stage)).is_some();
        }
        removed
    }

    fn remove_conflict_stages(&mut self, path: &str) {
        for stage in [MergeStage::Base, MergeStage::Target, MergeStage::Source] {
            self.entries.remove(&(path.to_owned(), stage));
        }
    }

    /// removes collisions where a file was replaced by a directory (or vice versa)
    fn remove_collisions(&mut self, entry: &RitIndexEntry) {
        // a parent directory of this entry can no longer be a file
        let parents = path::parent_components(&entry.path).map(str::to_owned).collect::<Vec<_>>();
        for parent in parents {
            self.entries.remove(&(parent, MergeStage::None));
        }

        // nothing can live under this entry's path anymore
        let dir_prefix = format!("{}/", entry.path);
        let to_remove = self
            .entries
            .range((entry.path.clone(), MergeStage::None)..)
            .take_while(|((p, _), _)| p.starts_with(&dir_prefix) || p == &entry.path)
            .filter(|((p, _), _)| p != &entry.path)
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();
        for key in to_remove {
            self.entries.remove(&key);
        }
    }
}

impl<'r> RitIndex<'r> {
    /// a missing index file loads as an empty index
    pub fn load(repo: &'r RitRepo) -> RitResult<Self> {
        let index_path = repo.index_path();
        let inner = if index_path.exists() {
            RitIndexInner::deserialize_unbuffered(std::fs::File::open(index_path)?)?
        } else {
            RitIndexInner::default()
        };
        Ok(Self { repo, inner })
    }

    pub fn save(&self) -> RitResult<()> {
        Lockfile::with_mut(self.repo.index_path(), |lockfile| self.inner.serialize(lockfile))
    }

    /// stage the worktree file at `path` (repo-relative, unix-separated),
    /// writing its blob into the object database
    pub fn add_worktree_file(&mut self, path: &str) -> RitResult<RitIndexEntry> {
        let abs = self.repo.to_fs_path(path);
        let metadata = abs
            .metadata()
            .map_err(|_| anyhow!("error: {} does not exist and --remove not passed", path))?;
        let oid = self.repo.write_blob_from_worktree(path)?;
        let entry = RitIndexEntry::from_metadata(path.to_owned(), oid, &metadata);
        self.add_entry(entry.clone());
        Ok(entry)
    }

    /// rebuild the index to exactly reflect `tree_oid` at stage 0,
    /// stamping entries with current filesystem metadata where files exist
    pub fn read_tree(&mut self, tree_oid: Oid) -> RitResult<()> {
        let files = self.repo.flatten_tree(tree_oid)?;
        let mut entries = RitIndexEntries::default();
        for (path, tree_entry) in files {
            let abs = self.repo.to_fs_path(&path);
            let entry = match abs.metadata() {
                Ok(metadata) => RitIndexEntry::from_metadata(path, tree_entry.oid, &metadata),
                Err(..) => RitIndexEntry::from_blob(path, tree_entry.oid),
            };
            entries.insert(entry.key(), entry);
        }
        self.inner = RitIndexInner::new(entries, vec![]);
        Ok(())
    }

    /// build the tree for the current entries, writing all subtrees (and the
    /// root) into the object database, and return the root oid
    pub fn write_tree(&self) -> RitResult<Oid> {
        if self.has_conflicts() {
            bail!("cannot write-tree an index that is not fully merged");
        }
        let entries = self.entries().cloned().collect::<Vec<_>>();
        let tree = TreeBuilder::new(self.repo).build_dir(&entries, "")?;
        self.repo.write_obj(&tree)
    }
}

struct TreeBuilder<'r> {
    repo: &'r RitRepo,
}

impl<'r> TreeBuilder<'r> {
    fn new(repo: &'r RitRepo) -> Self {
        Self { repo }
    }

    /// `entries` must be sorted by path and all be under `prefix`
    /// (`prefix` is either empty or ends with a slash)
    fn build_dir(&self, entries: &[RitIndexEntry], prefix: &str) -> RitResult<Tree> {
        let mut tree = Tree::default();
        let mut i = 0;
        while i < entries.len() {
            let entry = &entries[i];
            let rel = &entry.path[prefix.len()..];
            match rel.find('/') {
                None => {
                    tree.entries.insert(TreeEntry {
                        mode: entry.mode,
                        name: rel.to_owned(),
                        oid: entry.oid,
                    });
                    i += 1;
                }
                Some(slash) => {
                    let name = rel[..slash].to_owned();
                    let subdir_prefix = format!("{}{}/", prefix, name);
                    let start = i;
                    while i < entries.len() && entries[i].path.starts_with(&subdir_prefix) {
                        i += 1;
                    }
                    let subtree = self.build_dir(&entries[start..i], &subdir_prefix)?;
                    let oid = self.repo.write_obj(&subtree)?;
                    tree.entries.insert(TreeEntry { mode: FileMode::TREE, name, oid });
                }
            }
        }
        Ok(tree)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RitIndexHeader {
    signature: [u8; 4],
    version: u32,
    entryc: u32,
}

// extensions are carried opaquely so that save(load(f)) == f holds for
// indexes written by other implementations
#[derive(Debug, PartialEq, Clone)]
pub struct RitIndexExtension {
    pub signature: [u8; 4],
    pub size: u32,
    pub data: Vec<u8>,
}

impl RitIndexInner {
    fn parse_header(r: &mut impl BufRead) -> RitResult<RitIndexHeader> {
        let mut signature = [0u8; 4];
        r.read_exact(&mut signature)?;
        ensure!(
            &signature == RIT_INDEX_HEADER_SIG,
            RitError::CorruptIndex("bad header signature".to_owned())
        );
        let version = r.read_u32()?;
        ensure!(version == RIT_INDEX_VERSION, "only index format v2 is supported");
        let entryc = r.read_u32()?;
        Ok(RitIndexHeader { signature, version, entryc })
    }

    fn parse_extensions(mut buf: &[u8]) -> RitResult<Vec<RitIndexExtension>> {
        let mut extensions = vec![];
        while buf.len() >= 8 {
            let signature: [u8; 4] = buf[0..4].try_into().unwrap();
            let size = u32::from_be_bytes(buf[4..8].try_into().unwrap());
            ensure!(
                buf.len() >= 8 + size as usize,
                RitError::CorruptIndex("truncated extension".to_owned())
            );
            let data = buf[8..8 + size as usize].to_vec();
            extensions.push(RitIndexExtension { signature, size, data });
            buf = &buf[8 + size as usize..];
        }
        ensure!(buf.is_empty(), RitError::CorruptIndex("trailing bytes after extensions".to_owned()));
        Ok(extensions)
    }
}

impl Serialize for RitIndexHeader {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        let Self { signature, version, entryc } = self;
        writer.write_all(signature)?;
        writer.write_u32(*version)?;
        writer.write_u32(*entryc)?;
        Ok(())
    }
}

impl Serialize for RitIndexExtension {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        writer.write_all(&self.signature)?;
        writer.write_u32(self.size)?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

impl Serialize for RitIndexInner {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        let mut hash_writer = HashWriter::new_sha1(writer);

        let header = RitIndexHeader {
            signature: *RIT_INDEX_HEADER_SIG,
            version: RIT_INDEX_VERSION,
            entryc: self.entries.len() as u32,
        };
        header.serialize(&mut hash_writer)?;

        for entry in self.entries.values() {
            entry.serialize(&mut hash_writer)?;
        }

        for extension in &self.extensions {
            extension.serialize(&mut hash_writer)?;
        }

        hash_writer.write_hash()?;
        Ok(())
    }
}

impl Deserialize for RitIndexInner {
    fn deserialize(r: &mut impl BufRead) -> RitResult<Self> {
        let mut buf = vec![];
        r.read_to_end(&mut buf)?;
        ensure!(
            buf.len() >= 12 + RIT_HASH_SIZE,
            RitError::CorruptIndex("file too short".to_owned())
        );

        let (bytes, checksum) = buf.split_at(buf.len() - RIT_HASH_SIZE);
        let mut hasher = Sha1::new();
        hasher.update(bytes);
        let actual = Oid::new(hasher.finalize().into());
        let expected = Oid::new(checksum.try_into().unwrap());
        ensure_eq!(actual, expected, RitError::CorruptIndex("bad checksum".to_owned()));

        let mut r = BufReader::new(bytes);
        let header = Self::parse_header(&mut r)?;
        let entries = (0..header.entryc)
            .map(|_| RitIndexEntry::deserialize(&mut r))
            .collect::<Result<Vec<RitIndexEntry>, _>>()?
            .into_iter()
            .collect::<RitIndexEntries>();
        ensure_eq!(
            entries.len() as u32,
            header.entryc,
            RitError::CorruptIndex("duplicate entries".to_owned())
        );

        let remainder = r.read_to_vec()?;
        let extensions = Self::parse_extensions(&remainder)?;

        Ok(Self::new(entries, extensions))
    }
}
