use crate::error::RitGenericError;
use crate::obj::Oid;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// either a full oid or an unambiguous-enough prefix of one
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RitId {
    Full(Oid),
    Partial(PartialOid),
}

impl From<Oid> for RitId {
    fn from(oid: Oid) -> Self {
        Self::Full(oid)
    }
}

impl From<PartialOid> for RitId {
    fn from(prefix: PartialOid) -> Self {
        Self::Partial(prefix)
    }
}

impl Display for RitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RitId::Full(oid) => write!(f, "{}", oid),
            RitId::Partial(prefix) => write!(f, "{}", prefix),
        }
    }
}

impl FromStr for RitId {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 40 {
            Oid::from_str(s).map(Self::Full)
        } else {
            PartialOid::from_str(s).map(Self::Partial)
        }
    }
}

pub const MIN_PREFIX_LEN: usize = 4;

/// a hex oid prefix of between 4 and 39 characters
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PartialOid {
    bytes: [u8; 40],
    len: usize,
}

impl PartialOid {
    pub fn as_str(&self) -> &str {
        // only constructed from a checked ascii hex string
        std::str::from_utf8(&self.bytes[..self.len]).unwrap()
    }

    /// splits into the object directory name and the filename prefix
    pub fn split(&self) -> (&str, &str) {
        self.as_str().split_at(2)
    }
}

impl FromStr for PartialOid {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ensure!(
            s.len() >= MIN_PREFIX_LEN && s.len() < 40,
            "hash prefix must be at least {} and at most 39 hex characters",
            MIN_PREFIX_LEN
        );
        ensure!(
            s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()),
            "invalid hex in hash prefix `{}`",
            s
        );
        let mut bytes = [0; 40];
        bytes[..s.len()].copy_from_slice(s.as_bytes());
        Ok(Self { bytes, len: s.len() })
    }
}

impl Display for PartialOid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
