mod blob;
mod commit;
mod obj_id;
mod tree;

pub use blob::*;
pub use commit::*;
pub use obj_id::*;
pub use tree::*;

pub use crate::hash::SHA1Hash as Oid;

use crate::error::{RitError, RitGenericError, RitResult};
use crate::io::BufReadExt;
use crate::serialize::{DeserializeSized, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// the two file modes in use: regular files and subtrees
// the on-disk octal forms are `100644` and `40000`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum FileMode {
    REG  = 0o100644,
    TREE = 0o40000,
}

impl FileMode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn is_file(self) -> bool {
        matches!(self, FileMode::REG)
    }

    pub fn is_tree(self) -> bool {
        matches!(self, FileMode::TREE)
    }

    pub fn new(u: u32) -> RitResult<Self> {
        match u {
            0o100644 => Ok(Self::REG),
            0o40000 => Ok(Self::TREE),
            _ => bail!("unsupported filemode `{:o}`", u),
        }
    }

    pub fn infer_obj_type(self) -> RitObjType {
        match self {
            Self::TREE => RitObjType::Tree,
            Self::REG => RitObjType::Blob,
        }
    }
}

impl Display for FileMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let n = self.as_u32();
        if f.alternate() { write!(f, "{:o}", n) } else { write!(f, "{:06o}", n) }
    }
}

impl Debug for FileMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for FileMode {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(u32::from_str_radix(s, 8)?)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RitObjType {
    Commit,
    Tree,
    Blob,
}

impl Display for RitObjType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            RitObjType::Commit => "commit",
            RitObjType::Tree => "tree",
            RitObjType::Blob => "blob",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RitObjType {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(RitObjType::Commit),
            "tree" => Ok(RitObjType::Tree),
            "blob" => Ok(RitObjType::Blob),
            _ => bail!("unknown object type `{}`", s),
        }
    }
}

#[derive(PartialEq, Debug)]
pub struct RitObjHeader {
    pub obj_type: RitObjType,
    pub size: u64,
}

pub(crate) fn read_obj_header(reader: &mut impl BufRead) -> RitResult<RitObjHeader> {
    let obj_type = reader.read_ascii_str(0x20)?.parse()?;
    let size = reader.read_ascii_num(0x00)?;
    Ok(RitObjHeader { obj_type, size })
}

/// a fully decompressed object whose payload has not been decoded yet
#[derive(Debug)]
pub struct RitRawObj {
    pub oid: Oid,
    pub obj_type: RitObjType,
    pub bytes: Vec<u8>,
}

impl RitRawObj {
    pub fn new(oid: Oid, obj_type: RitObjType, bytes: Vec<u8>) -> Self {
        Self { oid, obj_type, bytes }
    }
}

#[derive(PartialEq, Debug)]
pub enum RitObjKind {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl RitObjKind {
    pub fn from_raw(raw: RitRawObj) -> RitResult<Self> {
        let size = raw.bytes.len() as u64;
        match raw.obj_type {
            RitObjType::Blob =>
                Blob::deserialize_sized(&mut raw.bytes.as_slice(), size).map(Self::Blob),
            RitObjType::Tree =>
                Tree::deserialize_sized(&mut raw.bytes.as_slice(), size).map(Self::Tree),
            RitObjType::Commit =>
                Commit::deserialize_sized(&mut raw.bytes.as_slice(), size).map(Self::Commit),
        }
    }

    pub fn obj_type(&self) -> RitObjType {
        match self {
            RitObjKind::Blob(..) => RitObjType::Blob,
            RitObjKind::Tree(..) => RitObjType::Tree,
            RitObjKind::Commit(..) => RitObjType::Commit,
        }
    }

    pub fn into_commit(self) -> Commit {
        match self {
            Self::Commit(commit) => commit,
            _ => panic!("expected commit, found `{}`", self.obj_type()),
        }
    }

    pub fn try_into_commit(self, oid: Oid) -> RitResult<Commit> {
        match self {
            Self::Commit(commit) => Ok(commit),
            _ => bail!(RitError::ExpectedCommit(oid, self.obj_type())),
        }
    }

    pub fn into_tree(self) -> Tree {
        match self {
            Self::Tree(tree) => tree,
            _ => panic!("expected tree, found `{}`", self.obj_type()),
        }
    }

    pub fn into_blob(self) -> Blob {
        match self {
            Self::Blob(blob) => blob,
            _ => panic!("expected blob, found `{}`", self.obj_type()),
        }
    }
}

impl Serialize for RitObjKind {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        match self {
            RitObjKind::Blob(blob) => blob.serialize(writer),
            RitObjKind::Tree(tree) => tree.serialize(writer),
            RitObjKind::Commit(commit) => commit.serialize(writer),
        }
    }
}

impl WritableObject for RitObjKind {
    fn obj_type(&self) -> RitObjType {
        self.obj_type()
    }
}

pub trait WritableObject: Serialize {
    fn obj_type(&self) -> RitObjType;

    /// serialize the object with its `<kind> <len>\0` framing header
    fn serialize_with_headers(&self) -> RitResult<Vec<u8>> {
        let bytes = self.serialize_to_vec()?;
        let mut buf = vec![];
        write!(buf, "{} {}\0", self.obj_type(), bytes.len())?;
        buf.extend_from_slice(&bytes);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests;
