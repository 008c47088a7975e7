use crate::error::RitResult;
use anyhow::Context;
use std::cell::Cell;
use std::fs::{File, OpenOptions};
use std::io::{self, prelude::*};
use std::path::{Path, PathBuf};

const LOCK_FILE_EXT: &str = "lock";

/// guards a file update: writes go to `<path>.lock` which is renamed over the
/// target on commit, so readers never observe a partial write
#[derive(Debug)]
pub struct Lockfile {
    // the file being guarded, None if it does not exist yet
    file: Option<File>,
    lockfile: File,
    path: PathBuf,
    lockfile_path: PathBuf,
    committed: Cell<bool>,
    rolled_back: Cell<bool>,
}

impl Write for Lockfile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lockfile.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lockfile.flush()
    }
}

impl Lockfile {
    fn open(path: impl AsRef<Path>) -> RitResult<Self> {
        let path = path.as_ref();
        assert!(!path.exists() || path.is_file(), "cannot lock a directory");
        let lockfile_path = path.with_extension(LOCK_FILE_EXT);
        path.parent().map(std::fs::create_dir_all).transpose()?;
        let lockfile = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&lockfile_path)
            .or_else(|err| match err.kind() {
                io::ErrorKind::AlreadyExists => Err(err).with_context(|| {
                    format!(
                        "failed to lock file `{}` (`{}` already exists)",
                        path.display(),
                        lockfile_path.display()
                    )
                }),
                _ => Err(err)
                    .with_context(|| format!("failed to create file `{}`", path.display())),
            })?;

        let file = path.exists().then(|| File::open(path)).transpose()?;

        Ok(Self {
            file,
            lockfile,
            lockfile_path,
            path: path.to_path_buf(),
            committed: Cell::new(false),
            rolled_back: Cell::new(false),
        })
    }

    // never hand out mutable access to `self.file`; writes go to the lockfile only
    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    /// run `f` while holding the lock without the intent to write; always rolls back
    pub fn with_readonly<R>(
        path: impl AsRef<Path>,
        f: impl FnOnce(&Self) -> RitResult<R>,
    ) -> RitResult<R> {
        let lockfile = Self::open(path)?;
        let r = f(&lockfile);
        lockfile.rollback();
        r
    }

    /// run `f` with write access; commits on `Ok`, rolls back on `Err`
    pub fn with_mut<R>(
        path: impl AsRef<Path>,
        f: impl FnOnce(&mut Self) -> RitResult<R>,
    ) -> RitResult<R> {
        let mut lockfile = Self::open(path)?;
        match f(&mut lockfile) {
            Ok(r) => {
                lockfile.commit().with_context(|| {
                    format!(
                        "failed to commit lockfile to `{}`; the updated contents are in `{}`",
                        lockfile.path.display(),
                        lockfile.lockfile_path.display()
                    )
                })?;
                Ok(r)
            }
            Err(err) => {
                lockfile.rollback();
                Err(err)
            }
        }
    }

    fn commit(&self) -> io::Result<()> {
        if self.rolled_back.get() {
            return Ok(());
        }
        std::fs::rename(&self.lockfile_path, &self.path)?;
        self.committed.set(true);
        Ok(())
    }

    pub fn rollback(&self) {
        // the actual cleanup happens on drop
        self.rolled_back.set(true);
    }

    fn cleanup(&self) -> RitResult<()> {
        std::fs::remove_file(&self.lockfile_path).with_context(|| {
            format!("failed to remove lockfile `{}`", self.lockfile_path.display())
        })
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        assert!(!self.rolled_back.get() || !self.committed.get());
        if self.rolled_back.get() || !self.committed.get() {
            self.cleanup().unwrap();
        }
    }
}
