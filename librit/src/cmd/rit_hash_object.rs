use crate::error::RitResult;
use crate::hash;
use crate::obj::{Blob, Oid};
use crate::repo::RitRepo;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct HashObjectOpts {
    pub write: bool,
    pub stdin: bool,
    pub path: Option<PathBuf>,
}

impl RitRepo {
    pub fn hash_object(&self, opts: HashObjectOpts) -> RitResult<Oid> {
        let bytes = if opts.stdin {
            let mut buf = vec![];
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        } else {
            let path =
                opts.path.as_ref().ok_or_else(|| anyhow!("fatal: no path given (or --stdin)"))?;
            std::fs::read(path)?
        };
        self.hash_bytes_as_blob(&bytes, opts.write)
    }

    /// hash (and optionally store) raw bytes as a blob
    pub fn hash_bytes_as_blob(&self, bytes: &[u8], write: bool) -> RitResult<Oid> {
        let blob = Blob::new(bytes.to_vec());
        if write { self.write_obj(&blob) } else { hash::hash_obj(&blob) }
    }
}
