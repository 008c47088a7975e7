use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

/// second/nanosecond pair as stored in index entries (big-endian u32 each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timespec {
    pub sec: u32,
    pub nano: u32,
}

impl Timespec {
    pub fn new(sec: u32, nano: u32) -> Self {
        Self { sec, nano }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn ctime(metadata: &Metadata) -> Self {
        Self::new(metadata.ctime() as u32, metadata.ctime_nsec() as u32)
    }

    pub fn mtime(metadata: &Metadata) -> Self {
        Self::new(metadata.mtime() as u32, metadata.mtime_nsec() as u32)
    }
}
