use crate::error::RitResult;
use crate::obj::Oid;
use crate::repo::RitRepo;

impl RitRepo {
    /// write the tree described by the current index into the object database
    pub fn write_tree(&self) -> RitResult<Oid> {
        self.index()?.write_tree()
    }
}
