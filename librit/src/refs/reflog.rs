use crate::error::RitGenericError;
use crate::obj::Oid;
use crate::signature::RitSignature;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct RitReflogEntry {
    pub old_oid: Oid,
    pub new_oid: Oid,
    pub committer: RitSignature,
    pub msg: String,
}

impl FromStr for RitReflogEntry {
    type Err = RitGenericError;

    // <old40> <new40> <signature>\t<message>
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (old_oid, s) = s.split_once(' ').ok_or_else(|| anyhow!("malformed reflog line"))?;
        let (new_oid, s) = s.split_once(' ').ok_or_else(|| anyhow!("malformed reflog line"))?;
        let (committer, msg) = s.split_once('\t').ok_or_else(|| anyhow!("malformed reflog line"))?;
        Ok(Self {
            old_oid: old_oid.parse()?,
            new_oid: new_oid.parse()?,
            committer: committer.parse()?,
            msg: msg.to_owned(),
        })
    }
}

/// append-only history of a reference's movements, oldest first
#[derive(Debug, Default, PartialEq)]
pub struct RitReflog {
    entries: Vec<RitReflogEntry>,
}

impl RitReflog {
    pub fn entries(&self) -> &[RitReflogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `n` counts backwards from the most recent entry (`ref@{n}`)
    pub fn get(&self, n: usize) -> Option<&RitReflogEntry> {
        self.entries.iter().rev().nth(n)
    }
}

impl FromStr for RitReflog {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s.lines().map(RitReflogEntry::from_str).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}
