use crate::error::RitResult;
use crate::io::{BufReadExt, ReadExt};
use crate::obj::{FileMode, Oid, RitObjType, WritableObject};
use crate::serialize::{Deserialize, DeserializeSized, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::io::{prelude::*, BufRead};

/// an ordered directory listing; entry order is byte-wise by name
#[derive(PartialEq, Debug, Default, Clone)]
pub struct Tree {
    pub entries: BTreeSet<TreeEntry>,
}

impl Serialize for Tree {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        for entry in &self.entries {
            entry.serialize(writer)?;
        }
        Ok(())
    }
}

impl DeserializeSized for Tree {
    fn deserialize_sized(r: &mut impl BufRead, size: u64) -> RitResult<Self> {
        let r = &mut r.take(size);
        let mut tree = Self::default();
        while !r.is_at_eof()? {
            tree.entries.insert(TreeEntry::deserialize(r)?);
        }
        Ok(tree)
    }
}

impl WritableObject for Tree {
    fn obj_type(&self) -> RitObjType {
        RitObjType::Tree
    }
}

#[derive(PartialEq, Debug, Clone, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: String,
    pub oid: Oid,
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.as_bytes().cmp(other.name.as_bytes())
    }
}

impl Deserialize for TreeEntry {
    fn deserialize(r: &mut impl BufRead) -> RitResult<Self> {
        let mode = r.read_ascii_str(0x20)?.parse::<FileMode>()?;
        let name = r.read_null_terminated_str()?;
        let oid = r.read_oid()?;
        Ok(Self { mode, name, oid })
    }
}

impl Serialize for TreeEntry {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        // the alternate display form does not zero-pad the mode
        write!(writer, "{:#} {}\0", self.mode, self.name)?;
        writer.write_all(self.oid.as_ref())?;
        Ok(())
    }
}
