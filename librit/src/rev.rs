mod revwalk;

pub use revwalk::*;

use crate::error::{RitError, RitResult, RitResultExt};
use crate::obj::{Oid, PartialOid};
use crate::repo::RitRepo;
use std::path::Path;
use std::str::FromStr;

// <rev> ::=
//   | HEAD | ORIG_HEAD | MERGE_HEAD | CHERRY_PICK_HEAD
//   | <40-hex-oid>
//   | <hex-prefix>
//   | refs/... | <bare name>       (searched as tag, branch, remote)
//   | <rev>~<n>?
//   | <rev>^<n>?

/// the result of resolving a revision string; `ambiguous` is a warning, the
/// first match (in tag, branch, remote order) is still returned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRev {
    pub oid: Oid,
    pub ambiguous: bool,
}

const SYMBOLIC_REV_FILES: &[&str] = &["HEAD", "ORIG_HEAD", "MERGE_HEAD", "CHERRY_PICK_HEAD"];

impl RitRepo {
    /// resolve a revision string to a commit oid
    pub fn resolve_rev(&self, rev: &str) -> RitResult<ResolvedRev> {
        RevParser::new(self, rev).resolve()
    }

    /// resolve, discarding the ambiguity flag
    pub fn resolve_rev_oid(&self, rev: &str) -> RitResult<Oid> {
        Ok(self.resolve_rev(rev)?.oid)
    }
}

struct RevParser<'a, 'r> {
    repo: &'r RitRepo,
    src: &'a str,
    full: &'a str,
}

impl<'a, 'r> RevParser<'a, 'r> {
    fn new(repo: &'r RitRepo, src: &'a str) -> Self {
        Self { repo, src, full: src }
    }

    fn unknown(&self) -> crate::error::RitGenericError {
        anyhow!(RitError::UnknownRevision(self.full.to_owned()))
    }

    fn resolve(mut self) -> RitResult<ResolvedRev> {
        let base = self.next_segment();
        let (mut oid, ambiguous) = self.resolve_base(base)?;

        while !self.src.is_empty() {
            let (c, rest) = self.src.split_at(1);
            self.src = rest;
            let n = self.accept_num();
            match c {
                // ~N walks N first-parent edges, each step applied sequentially
                "~" => {
                    for _ in 0..n.unwrap_or(1) {
                        let commit = self.repo.read_commit(oid)?;
                        oid = commit.first_parent().ok_or_else(|| self.unknown())?;
                    }
                }
                // ^N selects the Nth parent (1-based)
                "^" => {
                    let n = n.unwrap_or(1);
                    let commit = self.repo.read_commit(oid)?;
                    if n == 0 {
                        continue;
                    }
                    oid = *commit.parents.get(n - 1).ok_or_else(|| self.unknown())?;
                }
                _ => bail!("unexpected token `{}` while parsing revision `{}`", c, self.full),
            }
        }

        Ok(ResolvedRev { oid, ambiguous })
    }

    /// advance past the next `~`/`^`-free segment and return it
    fn next_segment(&mut self) -> &'a str {
        let i = self.src.find(|c| c == '~' || c == '^').unwrap_or(self.src.len());
        let (segment, rest) = self.src.split_at(i);
        self.src = rest;
        segment
    }

    fn accept_num(&mut self) -> Option<usize> {
        let digits = self.src.len() - self.src.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        let (num, rest) = self.src.split_at(digits);
        self.src = rest;
        num.parse().ok()
    }

    fn resolve_base(&self, base: &str) -> RitResult<(Oid, bool)> {
        if SYMBOLIC_REV_FILES.contains(&base) {
            let path = self.repo.gitdir().join(base);
            return match self.read_rev_file(&path)? {
                Some(oid) => Ok((oid, false)),
                None => Err(self.unknown()),
            };
        }

        // a full hash is taken literally, without an existence check
        if let Ok(oid) = Oid::from_str(base) {
            return Ok((oid, false));
        }

        // then a short hash, falling back to the ref search if nothing matches
        // (a branch may well be named `beef`)
        if let Ok(prefix) = PartialOid::from_str(base) {
            match self.repo.expand_prefix(prefix) {
                Ok(oid) => return Ok((oid, false)),
                Err(err) if err.is_not_found_err() => {}
                Err(err) => return Err(err),
            }
        }

        self.resolve_ref_name(base)
    }

    fn resolve_ref_name(&self, name: &str) -> RitResult<(Oid, bool)> {
        let gitdir = self.repo.gitdir();

        // fully qualified references resolve directly
        if name.starts_with("refs/") {
            return match self.read_rev_file(&crate::path::to_fs_path(gitdir, name))? {
                Some(oid) => Ok((oid, false)),
                None => Err(self.unknown()),
            };
        }

        // `heads/foo` style references just need the `refs/` prepended
        if ["heads/", "tags/", "remotes/"].iter().any(|prefix| name.starts_with(prefix)) {
            return self.resolve_ref_name(&format!("refs/{}", name));
        }

        // bare names are searched as tags first, then branches, then remotes;
        // more than one match is ambiguous but the first still wins
        let mut matches = vec![];
        for namespace in ["refs/tags", "refs/heads", "refs/remotes"] {
            let path = crate::path::to_fs_path(gitdir, &format!("{}/{}", namespace, name));
            if let Some(oid) = self.read_rev_file(&path)? {
                matches.push(oid);
            }
        }

        match matches.first() {
            Some(&oid) => Ok((oid, matches.len() > 1)),
            None => Err(self.unknown()),
        }
    }

    /// read a file containing either a hash or a `ref: <path>` indirection
    fn read_rev_file(&self, path: &Path) -> RitResult<Option<Oid>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        let contents = contents.trim_end();
        match contents.strip_prefix("ref: ") {
            Some(target) =>
                self.read_rev_file(&crate::path::to_fs_path(self.repo.gitdir(), target)),
            None => Ok(Some(contents.parse()?)),
        }
    }
}
