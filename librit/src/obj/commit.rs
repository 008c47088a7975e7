use crate::error::RitResult;
use crate::obj::{Oid, RitObjType, WritableObject};
use crate::serialize::{DeserializeSized, Serialize};
use crate::signature::RitSignature;
use smallvec::SmallVec;
use std::io::{prelude::*, BufRead};

#[derive(PartialEq, Clone, Debug)]
pub struct Commit {
    pub tree: Oid,
    /// in order; the first parent is the commit's branch line
    pub parents: SmallVec<[Oid; 2]>,
    pub author: RitSignature,
    pub committer: RitSignature,
    /// the raw message bytes following the blank line, trailing newline included
    pub message: String,
}

impl Commit {
    pub fn first_parent(&self) -> Option<Oid> {
        self.parents.first().copied()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// the first line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

impl Serialize for Commit {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        writeln!(writer, "tree {}", self.tree)?;
        for parent in &self.parents {
            writeln!(writer, "parent {}", parent)?;
        }
        writeln!(writer, "author {}", self.author)?;
        writeln!(writer, "committer {}", self.committer)?;
        writeln!(writer)?;
        write!(writer, "{}", self.message)?;
        Ok(())
    }
}

impl DeserializeSized for Commit {
    fn deserialize_sized(r: &mut impl BufRead, size: u64) -> RitResult<Self> {
        let mut buf = Vec::with_capacity(size as usize);
        r.take(size).read_to_end(&mut buf)?;
        let payload = std::str::from_utf8(&buf)?;

        let (headers, message) = payload
            .split_once("\n\n")
            .ok_or_else(|| anyhow!("commit object is missing the header/message separator"))?;

        let mut tree = None;
        let mut parents = SmallVec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            let (key, value) =
                line.split_once(' ').ok_or_else(|| anyhow!("malformed commit header `{}`", line))?;
            match key {
                "tree" => tree = Some(value.parse()?),
                "parent" => parents.push(value.parse()?),
                "author" => author = Some(value.parse()?),
                "committer" => committer = Some(value.parse()?),
                _ => bail!("unknown commit header `{}`", key),
            }
        }

        Ok(Self {
            tree: tree.ok_or_else(|| anyhow!("commit object has no `tree` header"))?,
            parents,
            author: author.ok_or_else(|| anyhow!("commit object has no `author` header"))?,
            committer: committer
                .ok_or_else(|| anyhow!("commit object has no `committer` header"))?,
            message: message.to_owned(),
        })
    }
}

impl WritableObject for Commit {
    fn obj_type(&self) -> RitObjType {
        RitObjType::Commit
    }
}
