use crate::error::RitResult;
use crate::obj::{RitId, RitObjKind, RitObjType};
use crate::repo::RitRepo;
use crate::serialize::Serialize;
use std::io::Write;

#[derive(Debug)]
pub enum CatFileMode {
    /// `-t`: print the object's kind
    Type,
    /// `-p`: pretty-print the object's payload
    Pretty,
}

impl RitRepo {
    pub fn cat_file(&self, id: RitId, mode: CatFileMode) -> RitResult<Vec<u8>> {
        match mode {
            CatFileMode::Type => {
                let header = self.read_obj_header(id)?;
                Ok(format!("{}\n", header.obj_type).into_bytes())
            }
            CatFileMode::Pretty => {
                let obj = self.read_obj(id)?;
                match obj {
                    RitObjKind::Blob(blob) => Ok(blob.into_bytes()),
                    RitObjKind::Tree(tree) => {
                        let mut out = vec![];
                        for entry in &tree.entries {
                            writeln!(
                                out,
                                "{} {} {}\t{}",
                                entry.mode,
                                entry.mode.infer_obj_type(),
                                entry.oid,
                                entry.name
                            )?;
                        }
                        Ok(out)
                    }
                    RitObjKind::Commit(commit) => commit.serialize_to_vec(),
                }
            }
        }
    }

    pub fn obj_type_of(&self, id: RitId) -> RitResult<RitObjType> {
        Ok(self.read_obj_header(id)?.obj_type)
    }
}
