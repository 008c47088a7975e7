mod refdb;
mod reflog;

pub use refdb::*;
pub use reflog::*;

use crate::error::{RitGenericError, RitResult};
use crate::obj::Oid;
use crate::serialize::{Deserialize, Serialize};
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::io::prelude::*;
use std::str::FromStr;

lazy_static! {
    /// matches anything that makes a reference name invalid:
    /// a component starting with `.`, `..` anywhere, the characters
    /// `*:?[\^~`, whitespace, a trailing `/` or `.lock`, or `@{`
    static ref INVALID_REF_REGEX: Regex =
        Regex::new(r#"^\.|/\.|\.\.|\*|:|\?|\[|\\|\^|~| |\t|/$|\.lock$|@\{"#).unwrap();
}

pub fn is_valid_name(s: &str) -> bool {
    !s.is_empty() && !s.starts_with('/') && !INVALID_REF_REGEX.is_match(s)
}

/// non-validated parsed representation of a reference
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum RitRef {
    /// refers directly to an object
    Direct(Oid),
    /// contains the path of another reference,
    /// e.g. `ref: refs/heads/main` is `Symbolic("refs/heads/main")`
    Symbolic(SymbolicRef),
}

impl RitRef {
    pub const HEAD: Self = Self::Symbolic(SymbolicRef::HEAD);

    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(..))
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(..))
    }

    pub fn into_direct(self) -> Oid {
        match self {
            Self::Direct(oid) => oid,
            Self::Symbolic(sym) => panic!("expected direct reference, found `{}`", sym),
        }
    }
}

impl From<Oid> for RitRef {
    fn from(oid: Oid) -> Self {
        Self::Direct(oid)
    }
}

impl From<SymbolicRef> for RitRef {
    fn from(sym: SymbolicRef) -> Self {
        Self::Symbolic(sym)
    }
}

impl Display for RitRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RitRef::Direct(oid) => write!(f, "{}", oid),
            RitRef::Symbolic(sym) => write!(f, "{}", sym),
        }
    }
}

impl Serialize for RitRef {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        match self {
            RitRef::Direct(oid) => writeln!(writer, "{}", oid)?,
            RitRef::Symbolic(sym) => writeln!(writer, "ref: {}", sym.path())?,
        };
        Ok(())
    }
}

impl Deserialize for RitRef {
    fn deserialize(reader: &mut impl BufRead) -> RitResult<Self> {
        let mut s = String::new();
        reader.read_to_string(&mut s)?;
        s.parse()
    }
}

impl FromStr for RitRef {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // a valid oid is assumed not to be a reference path
        if let Ok(oid) = Oid::from_str(s) {
            return Ok(Self::Direct(oid));
        }
        SymbolicRef::from_str(s).map(Self::Symbolic)
    }
}

// a symbolic ref in a file is of the form `ref: <path>`
const SYMBOLIC_REF_PREFIX: &str = "ref: ";

const REFS_HEADS_PREFIX: &str = "refs/heads/";
const REFS_TAGS_PREFIX: &str = "refs/tags/";
const REFS_REMOTES_PREFIX: &str = "refs/remotes/";

#[derive(Debug, Hash, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub struct SymbolicRef {
    path: String,
    kind: SymbolicRefKind,
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum SymbolicRefKind {
    Head,
    MergeHead,
    Branch,
    Tag,
    Remote,
    Unknown,
}

impl SymbolicRef {
    pub const HEAD: Self = Self { path: String::new(), kind: SymbolicRefKind::Head };

    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        // HEAD is canonicalized to the empty path so it compares equal to the constant
        if path == "HEAD" {
            path = String::new();
        }
        let kind = Self::calculate_kind(&path);
        Self { path, kind }
    }

    pub fn new_branch(name: &str) -> Self {
        Self::new(format!("{}{}", REFS_HEADS_PREFIX, name))
    }

    pub fn new_tag(name: &str) -> Self {
        Self::new(format!("{}{}", REFS_TAGS_PREFIX, name))
    }

    pub fn kind(&self) -> SymbolicRefKind {
        self.kind
    }

    fn calculate_kind(path: &str) -> SymbolicRefKind {
        if path.is_empty() || path == "HEAD" {
            SymbolicRefKind::Head
        } else if path == "MERGE_HEAD" || path == "ORIG_HEAD" || path == "CHERRY_PICK_HEAD" {
            SymbolicRefKind::MergeHead
        } else if path.starts_with(REFS_HEADS_PREFIX) {
            SymbolicRefKind::Branch
        } else if path.starts_with(REFS_TAGS_PREFIX) {
            SymbolicRefKind::Tag
        } else if path.starts_with(REFS_REMOTES_PREFIX) {
            SymbolicRefKind::Remote
        } else {
            SymbolicRefKind::Unknown
        }
    }

    /// the path of the file under `.git` backing this reference
    pub fn path(&self) -> &str {
        if self.kind == SymbolicRefKind::Head && self.path.is_empty() { "HEAD" } else { &self.path }
    }

    pub fn is_branch(&self) -> bool {
        self.kind == SymbolicRefKind::Branch
    }

    /// the abbreviated form shown to users (`refs/heads/x` -> `x`)
    pub fn short(&self) -> &str {
        let path = self.path();
        for prefix in [REFS_HEADS_PREFIX, REFS_TAGS_PREFIX, REFS_REMOTES_PREFIX] {
            if let Some(short) = path.strip_prefix(prefix) {
                return short;
            }
        }
        path
    }
}

impl Display for SymbolicRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() { write!(f, "{}", self.short()) } else { write!(f, "{}", self.path()) }
    }
}

impl FromStr for SymbolicRef {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let r = s.strip_prefix(SYMBOLIC_REF_PREFIX).unwrap_or(s).trim_end();
        Ok(Self::new(r))
    }
}
