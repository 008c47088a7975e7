use super::MergeStage;
use crate::error::RitResult;
use crate::hash::RIT_HASH_SIZE;
use crate::io::{BufReadExt, ReadExt, WriteExt};
use crate::obj::{FileMode, Oid, TreeEntry};
use crate::serialize::{Deserialize, Serialize};
use crate::time::Timespec;
use std::fmt::{self, Debug, Formatter};
use std::fs::Metadata;
use std::io::prelude::*;
use std::os::unix::fs::MetadataExt;

/// one record of the staging index; doubles as the uniform representation of
/// tree entries and worktree files during diffs
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RitIndexEntry {
    pub ctime: Timespec,
    pub mtime: Timespec,
    pub device: u32,
    pub inode: u32,
    pub mode: FileMode,
    pub uid: u32,
    pub gid: u32,
    pub filesize: u32,
    pub oid: Oid,
    pub flags: RitIndexEntryFlags,
    /// repository-relative, unix-separated
    pub path: String,
}

impl RitIndexEntry {
    pub fn key(&self) -> (String, MergeStage) {
        (self.path.clone(), self.stage())
    }

    pub fn stage(&self) -> MergeStage {
        self.flags.stage()
    }

    /// an entry whose stat fields are taken from the file on disk
    pub fn from_metadata(path: String, oid: Oid, metadata: &Metadata) -> Self {
        Self {
            ctime: Timespec::ctime(metadata),
            mtime: Timespec::mtime(metadata),
            device: metadata.dev() as u32,
            inode: metadata.ino() as u32,
            mode: FileMode::REG,
            uid: metadata.uid(),
            gid: metadata.gid(),
            filesize: metadata.size() as u32,
            oid,
            flags: RitIndexEntryFlags::with_path_len(path.len()),
            path,
        }
    }

    /// an entry with zeroed stat fields; the hash alone identifies the content
    pub fn from_blob(path: String, oid: Oid) -> Self {
        Self {
            ctime: Timespec::zero(),
            mtime: Timespec::zero(),
            device: 0,
            inode: 0,
            mode: FileMode::REG,
            uid: 0,
            gid: 0,
            filesize: 0,
            oid,
            flags: RitIndexEntryFlags::with_path_len(path.len()),
            path,
        }
    }

    pub fn with_stage(mut self, stage: MergeStage) -> Self {
        self.flags = self.flags.set_stage(stage);
        self
    }

    pub fn tree_entry(&self) -> TreeEntry {
        TreeEntry {
            mode: self.mode,
            name: crate::path::file_name(&self.path).to_owned(),
            oid: self.oid,
        }
    }
}

const ENTRY_SIZE_WITHOUT_FILEPATH: usize = std::mem::size_of::<u64>() // ctime
            + std::mem::size_of::<u64>() // mtime
            + std::mem::size_of::<u32>() // device
            + std::mem::size_of::<u32>() // inode
            + std::mem::size_of::<u32>() // mode
            + std::mem::size_of::<u32>() // uid
            + std::mem::size_of::<u32>() // gid
            + std::mem::size_of::<u32>() // filesize
            + RIT_HASH_SIZE // oid
            + std::mem::size_of::<u16>(); // flags

impl RitIndexEntry {
    pub(super) fn padding_len(&self) -> usize {
        Self::padding_len_for_filepath(self.path.len())
    }

    pub(super) fn padding_len_for_filepath(filepath_len: usize) -> usize {
        let entry_size = ENTRY_SIZE_WITHOUT_FILEPATH + filepath_len;
        // +8 not +7: there is always at least one NUL byte terminating the path
        let next_multiple_of_8 = ((entry_size + 8) / 8) * 8;
        let padding_size = next_multiple_of_8 - entry_size;
        assert!(padding_size > 0 && padding_size <= 8);
        padding_size
    }
}

impl Serialize for RitIndexEntry {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        writer.write_timespec(self.ctime)?;
        writer.write_timespec(self.mtime)?;
        writer.write_u32(self.device)?;
        writer.write_u32(self.inode)?;
        writer.write_u32(self.mode.as_u32())?;
        writer.write_u32(self.uid)?;
        writer.write_u32(self.gid)?;
        writer.write_u32(self.filesize)?;
        writer.write_oid(self.oid)?;
        writer.write_u16(self.flags.0)?;
        writer.write_all(self.path.as_bytes())?;
        writer.write_all(&[0u8; 8][..self.padding_len()])?;
        Ok(())
    }
}

impl Deserialize for RitIndexEntry {
    fn deserialize(r: &mut impl BufRead) -> RitResult<RitIndexEntry> {
        let ctime = r.read_timespec()?;
        let mtime = r.read_timespec()?;
        let device = r.read_u32()?;
        let inode = r.read_u32()?;
        let mode = FileMode::new(r.read_u32()?)?;
        let uid = r.read_u32()?;
        let gid = r.read_u32()?;
        let filesize = r.read_u32()?;
        let oid = r.read_oid()?;
        let flags = RitIndexEntryFlags::new(r.read_u16()?);
        let path = r.read_null_terminated_str()?;

        ensure!(path.len() <= 0xfff, "index entry path too long");
        ensure_eq!(flags.path_len() as usize, path.len(), "index entry name length mismatch");

        let entry =
            RitIndexEntry { ctime, mtime, device, inode, mode, uid, gid, filesize, oid, flags, path };

        // the NUL that terminated the path counts as the first padding byte
        let mut padding = [0u8; 8];
        r.read_exact(&mut padding[..entry.padding_len() - 1])?;
        ensure_eq!(u64::from_be_bytes(padding), 0, "nonzero index entry padding");

        Ok(entry)
    }
}

/// 1  bit  assume-valid
/// 1  bit  extended (not emitted in version 2)
/// 2  bits merge stage
/// 12 bits path length, saturating at 0xFFF
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct RitIndexEntryFlags(pub(crate) u16);

impl Debug for RitIndexEntryFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RitIndexEntryFlags")
            .field("assume_valid", &self.assume_valid())
            .field("extended", &self.extended())
            .field("stage", &self.stage())
            .field("path_len", &self.path_len())
            .finish()
    }
}

impl RitIndexEntryFlags {
    pub fn new(u: u16) -> Self {
        Self(u)
    }

    pub fn with_path_len(len: usize) -> Self {
        Self(std::cmp::min(0xFFF, len as u16))
    }

    pub fn assume_valid(self) -> bool {
        self.0 & (1 << 15) != 0
    }

    pub fn extended(self) -> bool {
        self.0 & (1 << 14) != 0
    }

    pub fn stage(self) -> MergeStage {
        let stage = (self.0 & 0x3000) >> 12;
        MergeStage::try_from(stage as u8).unwrap()
    }

    pub fn set_stage(self, stage: MergeStage) -> Self {
        Self((self.0 & !0x3000) | ((stage as u16) << 12))
    }

    pub fn path_len(self) -> u16 {
        self.0 & 0x0FFF
    }
}
