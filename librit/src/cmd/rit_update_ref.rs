use crate::error::RitResult;
use crate::obj::Oid;
use crate::refs::{RitRef, SymbolicRef};
use crate::repo::RitRepo;

impl RitRepo {
    /// point `refname` (e.g. `refs/heads/main`) at the commit `value` resolves to
    pub fn update_ref_cmd(&self, refname: &str, value: &str) -> RitResult<Oid> {
        let oid = self.resolve_rev_oid(value)?;
        let sym = SymbolicRef::new(refname);
        self.refdb().update(&sym, &RitRef::Direct(oid))?;
        Ok(oid)
    }
}
