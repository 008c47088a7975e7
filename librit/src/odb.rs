use crate::error::{RitError, RitResult, RitResultExt};
use crate::hash;
use crate::lockfile::Lockfile;
use crate::obj::{self, Oid, PartialOid, RitId, RitObjHeader, RitRawObj, WritableObject};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::trace;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;

/// the loose object database under `.git/objects`
pub struct RitObjDb {
    objects_path: PathBuf,
}

impl RitObjDb {
    pub fn new(objects_path: PathBuf) -> Self {
        Self { objects_path }
    }

    // infallible on purpose: `write` needs the path of a not-yet-existing object
    fn obj_path(&self, oid: Oid) -> PathBuf {
        let (dir, file) = oid.split();
        self.objects_path.join(dir).join(file)
    }

    fn locate_obj(&self, id: impl Into<RitId>) -> RitResult<PathBuf> {
        let oid = self.expand_id(id.into())?;
        let path = self.obj_path(oid);
        if path.exists() {
            Ok(path)
        } else {
            Err(anyhow!(RitError::ObjectNotFound(oid.into())))
        }
    }

    /// read and decompress the framed bytes; validates the declared payload length
    pub fn read_raw(&self, id: RitId) -> RitResult<RitRawObj> {
        trace!("RitObjDb::read_raw(id: {})", id);
        let oid = self.expand_id(id)?;
        let bytes = self.read_framed_bytes(oid)?;
        let mut reader = &bytes[..];
        let RitObjHeader { obj_type, size } = obj::read_obj_header(&mut reader)?;
        ensure!(
            reader.len() as u64 == size,
            RitError::CorruptObject(
                oid,
                format!("header declares {} bytes but payload has {}", size, reader.len()),
            )
        );
        Ok(RitRawObj::new(oid, obj_type, reader.to_vec()))
    }

    pub fn read_header(&self, id: RitId) -> RitResult<RitObjHeader> {
        let oid = self.expand_id(id)?;
        let bytes = self.read_framed_bytes(oid)?;
        obj::read_obj_header(&mut &bytes[..])
    }

    fn read_framed_bytes(&self, oid: Oid) -> RitResult<Vec<u8>> {
        let file = File::open(self.locate_obj(oid)?)?;
        let mut bytes = vec![];
        ZlibDecoder::new(file).read_to_end(&mut bytes).map_err(|err| {
            anyhow!(RitError::CorruptObject(oid, format!("zlib decompression failed: {}", err)))
        })?;
        Ok(bytes)
    }

    /// writes are idempotent: an existing object path is never touched again
    pub fn write(&self, obj: &dyn WritableObject) -> RitResult<Oid> {
        let bytes = obj.serialize_with_headers()?;
        let oid = hash::hash_bytes(&bytes);
        let path = self.obj_path(oid);

        if !path.exists() {
            Lockfile::with_mut(&path, |lockfile| {
                let mut encoder = ZlibEncoder::new(lockfile, Compression::default());
                encoder.write_all(&bytes)?;
                encoder.finish()?;
                Ok(())
            })?;
        }

        Ok(oid)
    }

    pub fn exists(&self, id: impl Into<RitId>) -> RitResult<bool> {
        match self.locate_obj(id) {
            Ok(..) => Ok(true),
            Err(err) if err.is_not_found_err() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// all oids in the database that start with `prefix`
    // an empty list is not an error here; expansion decides what to do with it
    pub fn prefix_candidates(&self, prefix: PartialOid) -> RitResult<Vec<Oid>> {
        let (dir, file_prefix) = prefix.split();
        let full_dir = self.objects_path.join(dir);
        if !full_dir.exists() {
            return Ok(vec![]);
        }

        let mut candidates = vec![];
        for entry in std::fs::read_dir(full_dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let filename = entry.file_name();
            let filename = filename.to_str().unwrap();
            if filename.len() == 38 && filename.starts_with(file_prefix) {
                candidates.push(Oid::from_str(&format!("{}{}", dir, filename))?);
            }
        }
        candidates.sort();
        Ok(candidates)
    }

    pub fn expand_prefix(&self, prefix: PartialOid) -> RitResult<Oid> {
        let candidates = self.prefix_candidates(prefix)?;
        match candidates.len() {
            0 => Err(anyhow!(RitError::ObjectNotFound(prefix.into()))),
            1 => Ok(candidates[0]),
            _ => Err(anyhow!(RitError::AmbiguousPrefix(prefix, candidates))),
        }
    }

    pub fn expand_id(&self, id: RitId) -> RitResult<Oid> {
        match id {
            RitId::Full(oid) => Ok(oid),
            RitId::Partial(prefix) => self.expand_prefix(prefix),
        }
    }
}
