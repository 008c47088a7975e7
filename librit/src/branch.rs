use crate::error::RitResult;
use crate::obj::Oid;
use crate::refs::{RefUpdateCause, RitRef, SymbolicRef};
use crate::repo::{HeadState, RitRepo};

#[derive(Debug, PartialEq)]
pub struct BranchListing {
    pub name: String,
    pub oid: Oid,
    pub is_current: bool,
}

impl RitRepo {
    pub fn branch_list(&self) -> RitResult<Vec<BranchListing>> {
        let current = self.current_branch()?;
        let current_name = current.as_ref().map(|sym| sym.short().to_owned());
        Ok(self
            .refdb()
            .ls_branches()?
            .into_iter()
            .map(|(name, oid)| {
                let is_current = current_name.as_deref() == Some(name.as_str());
                BranchListing { name, oid, is_current }
            })
            .collect())
    }

    /// create `name` pointing at `base` (a revision) or at HEAD's commit
    pub fn branch_create(&self, name: &str, base: Option<&str>) -> RitResult<Oid> {
        let refdb = self.refdb();
        refdb.validate_name(name)?;
        let branch = SymbolicRef::new_branch(name);
        ensure!(!refdb.exists(&branch), "fatal: a branch named '{}' already exists", name);

        let oid = match base {
            Some(rev) => self.resolve_rev_oid(rev)?,
            None => self.fully_resolve_head()?,
        };
        refdb.create(&branch, &RitRef::Direct(oid))?;

        let from = match self.resolve_head()? {
            HeadState::Attached { branch, .. } | HeadState::Unborn { branch } =>
                branch.short().to_owned(),
            HeadState::Detached(head_oid) => head_oid.to_string(),
        };
        let from = base.map(str::to_owned).unwrap_or(from);
        refdb.append_reflog(
            &branch,
            Oid::UNKNOWN,
            oid,
            &RefUpdateCause::BranchCreate { from }.to_string(),
        )?;
        Ok(oid)
    }

    /// move an existing branch to HEAD's commit
    pub fn branch_force(&self, name: &str) -> RitResult<Oid> {
        let branch = SymbolicRef::new_branch(name);
        let oid = self.fully_resolve_head()?;
        self.refdb().update(&branch, &RitRef::Direct(oid))?;
        Ok(oid)
    }

    /// deleting the checked-out branch is forbidden; the branch's reflog goes with it
    pub fn branch_delete(&self, name: &str) -> RitResult<Oid> {
        let current = self.current_branch()?;
        ensure!(
            current.as_ref().map(|sym| sym.short()) != Some(name),
            "error: Cannot delete branch '{}' checked out at '{}'",
            name,
            self.workdir().display()
        );

        let branch = SymbolicRef::new_branch(name);
        let refdb = self.refdb();
        ensure!(refdb.exists(&branch), "fatal: branch '{}' not found.", name);
        let oid = refdb.resolve(&RitRef::Symbolic(branch.clone()))?;
        refdb.delete(&branch)?;
        Ok(oid)
    }

    pub fn tag_list(&self) -> RitResult<Vec<(String, Oid)>> {
        self.refdb().ls_tags()
    }

    pub fn tag_create(&self, name: &str) -> RitResult<Oid> {
        let refdb = self.refdb();
        refdb.validate_name(name)?;
        let tag = SymbolicRef::new_tag(name);
        ensure!(!refdb.exists(&tag), "fatal: tag '{}' already exists", name);
        let oid = self.fully_resolve_head()?;
        refdb.create(&tag, &RitRef::Direct(oid))?;
        Ok(oid)
    }

    pub fn tag_delete(&self, name: &str) -> RitResult<Oid> {
        let tag = SymbolicRef::new_tag(name);
        let refdb = self.refdb();
        ensure!(refdb.exists(&tag), "error: tag '{}' not found.", name);
        let oid = refdb.resolve(&RitRef::Symbolic(tag.clone()))?;
        refdb.delete(&tag)?;
        Ok(oid)
    }
}
