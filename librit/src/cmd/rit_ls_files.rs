use crate::error::RitResult;
use crate::repo::RitRepo;
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct LsFilesOpts {
    /// show mode, oid and stage alongside the path
    pub stage: bool,
    /// shorten oids to their 7-character prefix
    pub abbrev: bool,
}

impl RitRepo {
    pub fn ls_files(&self, opts: LsFilesOpts) -> RitResult<String> {
        let index = self.index()?;
        let mut out = String::new();
        for entry in index.entries() {
            if opts.stage {
                let oid =
                    if opts.abbrev { entry.oid.short() } else { entry.oid.to_hex() };
                writeln!(out, "{} {} {}\t{}", entry.mode, oid, entry.stage(), entry.path)?;
            } else {
                writeln!(out, "{}", entry.path)?;
            }
        }
        Ok(out)
    }
}
