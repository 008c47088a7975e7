use crate::merge::MergeConflicts;
use crate::obj::{Oid, PartialOid, RitId, RitObjType};
use crate::refs::SymbolicRef;
use std::fmt::{self, Display, Formatter};

pub type RitResult<T> = Result<T, RitGenericError>;
pub type RitGenericError = anyhow::Error;

// most errors stay as plain `anyhow` messages; this enum exists for the
// conditions callers actually need to match on
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub enum RitError {
    ObjectNotFound(RitId),
    AmbiguousPrefix(PartialOid, Vec<Oid>),
    CorruptObject(Oid, String),
    CorruptIndex(String),
    UnknownRevision(String),
    NonExistentSymRef(SymbolicRef),
    ExpectedCommit(Oid, RitObjType),
    DetachedHead,
    MissingMessage,
    NothingToCommit,
    MergeConflicts(MergeConflicts),
    MergeWithoutMainline(Oid),
}

pub trait RitErrorExt {
    fn try_into_rit_error(self) -> RitResult<RitError>;
    fn try_into_obj_not_found_err(self) -> RitResult<RitId>;
    fn try_into_nonexistent_symref_err(self) -> RitResult<SymbolicRef>;
    fn try_into_merge_conflicts(self) -> RitResult<MergeConflicts>;
}

impl RitErrorExt for RitGenericError {
    fn try_into_rit_error(self) -> RitResult<RitError> {
        self.downcast::<RitError>()
    }

    fn try_into_obj_not_found_err(self) -> RitResult<RitId> {
        match self.try_into_rit_error()? {
            RitError::ObjectNotFound(id) => Ok(id),
            err => Err(anyhow!(err)),
        }
    }

    fn try_into_nonexistent_symref_err(self) -> RitResult<SymbolicRef> {
        match self.try_into_rit_error()? {
            RitError::NonExistentSymRef(sym) => Ok(sym),
            err => Err(anyhow!(err)),
        }
    }

    fn try_into_merge_conflicts(self) -> RitResult<MergeConflicts> {
        match self.try_into_rit_error()? {
            RitError::MergeConflicts(conflicts) => Ok(conflicts),
            err => Err(anyhow!(err)),
        }
    }
}

pub trait RitResultExt {
    fn is_not_found_err(&self) -> bool;
    fn is_unknown_revision_err(&self) -> bool;
}

impl<T> RitResultExt for RitResult<T> {
    fn is_not_found_err(&self) -> bool {
        match self {
            Ok(..) => false,
            Err(err) => err.is_not_found_err(),
        }
    }

    fn is_unknown_revision_err(&self) -> bool {
        match self {
            Ok(..) => false,
            Err(err) => err.is_unknown_revision_err(),
        }
    }
}

impl RitResultExt for RitGenericError {
    fn is_not_found_err(&self) -> bool {
        matches!(
            self.downcast_ref::<RitError>(),
            Some(RitError::ObjectNotFound(..) | RitError::NonExistentSymRef(..))
        )
    }

    fn is_unknown_revision_err(&self) -> bool {
        matches!(self.downcast_ref::<RitError>(), Some(RitError::UnknownRevision(..)))
    }
}

impl std::error::Error for RitError {
}

impl Display for RitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RitError::ObjectNotFound(id) => write!(f, "object with hash `{}` not found", id),
            RitError::AmbiguousPrefix(prefix, candidates) => {
                writeln!(f, "prefix oid `{}` is ambiguous", prefix)?;
                writeln!(f, "hint: the candidates are:")?;
                for candidate in candidates {
                    writeln!(f, "hint:   {}", candidate)?;
                }
                Ok(())
            }
            RitError::CorruptObject(oid, msg) => write!(f, "object `{}` is corrupt: {}", oid, msg),
            RitError::CorruptIndex(msg) => write!(f, "corrupt index: {}", msg),
            RitError::UnknownRevision(rev) => write!(
                f,
                "fatal: ambiguous argument '{}': unknown revision or path not in the working tree.",
                rev
            ),
            RitError::NonExistentSymRef(sym) =>
                write!(f, "failed to resolve symbolic reference `{}`", sym),
            RitError::ExpectedCommit(oid, obj_type) =>
                write!(f, "`{}` is a {}, expected commit", oid, obj_type),
            RitError::DetachedHead => write!(f, "fatal: not on a branch"),
            RitError::MissingMessage => write!(f, "fatal: must supply a message using -m"),
            RitError::NothingToCommit => write!(f, "nothing to commit, working tree clean"),
            RitError::MergeConflicts(conflicts) => write!(f, "{}", conflicts),
            RitError::MergeWithoutMainline(oid) => write!(
                f,
                "error: commit {} is a merge but no -m option was given.",
                oid
            ),
        }
    }
}
