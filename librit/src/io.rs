use crate::error::RitResult;
use crate::hash::SHA1Hash;
use crate::obj::Oid;
use crate::time::Timespec;
use sha1::{Digest, Sha1};
use std::io::{self, prelude::*};

// all integer encodings are big-endian
pub(crate) trait ReadExt: Read {
    #[inline]
    fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    #[inline]
    fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    #[inline]
    fn read_timespec(&mut self) -> io::Result<Timespec> {
        let sec = self.read_u32()?;
        let nano = self.read_u32()?;
        Ok(Timespec::new(sec, nano))
    }

    #[inline]
    fn read_oid(&mut self) -> io::Result<Oid> {
        let mut buf = [0; 20];
        self.read_exact(&mut buf)?;
        Ok(Oid::new(buf))
    }

    #[inline]
    fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = vec![];
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }

    #[inline]
    fn read_to_str(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        self.read_to_string(&mut buf)?;
        Ok(buf)
    }
}

impl<R: Read + ?Sized> ReadExt for R {
}

pub(crate) trait BufReadExt: BufRead {
    /// read the bytes up to `sep`, parsing them as a base-10 ascii number
    fn read_ascii_num(&mut self, sep: u8) -> RitResult<u64> {
        let mut buf = vec![];
        let i = self.read_until(sep, &mut buf)?;
        ensure!(i > 1, "missing ascii number before separator");
        Ok(std::str::from_utf8(&buf[..i - 1])?.parse()?)
    }

    /// read the bytes up to `sep`, returning them as an ascii string
    fn read_ascii_str(&mut self, sep: u8) -> RitResult<String> {
        let mut buf = vec![];
        let i = self.read_until(sep, &mut buf)?;
        ensure!(i > 1, "missing ascii string before separator");
        Ok(std::str::from_utf8(&buf[..i - 1])?.to_owned())
    }

    fn read_null_terminated_str(&mut self) -> RitResult<String> {
        let mut buf = vec![];
        let i = self.read_until(0, &mut buf)?;
        ensure!(i > 0 && buf[i - 1] == 0, "unterminated string");
        Ok(std::str::from_utf8(&buf[..i - 1])?.to_owned())
    }

    fn is_at_eof(&mut self) -> io::Result<bool> {
        Ok(self.fill_buf()?.is_empty())
    }
}

impl<R: BufRead + ?Sized> BufReadExt for R {
}

pub(crate) trait WriteExt: Write {
    #[inline]
    fn write_u16(&mut self, u: u16) -> io::Result<()> {
        self.write_all(&u.to_be_bytes())
    }

    #[inline]
    fn write_u32(&mut self, u: u32) -> io::Result<()> {
        self.write_all(&u.to_be_bytes())
    }

    #[inline]
    fn write_timespec(&mut self, t: Timespec) -> io::Result<()> {
        self.write_u32(t.sec)?;
        self.write_u32(t.nano)
    }

    #[inline]
    fn write_oid(&mut self, oid: Oid) -> io::Result<()> {
        self.write_all(oid.as_bytes())
    }
}

impl<W: Write + ?Sized> WriteExt for W {
}

/// hashes all the bytes written through it
pub(crate) struct HashWriter<'a> {
    writer: &'a mut dyn Write,
    hasher: Sha1,
}

impl<'a> Write for HashWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<'a> HashWriter<'a> {
    pub fn new_sha1(writer: &'a mut dyn Write) -> Self {
        Self { writer, hasher: Sha1::new() }
    }

    /// finish by appending the hash of everything written so far
    pub fn write_hash(mut self) -> io::Result<()> {
        let hash = SHA1Hash::new(self.hasher.finalize_reset().into());
        self.writer.write_oid(hash)
    }
}
