use crate::error::RitResult;
use crate::obj::{RitObjType, WritableObject};
use crate::serialize::{DeserializeSized, Serialize};
use std::io::{BufRead, Read, Write};

/// a file's bytes, nothing else
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Blob {
    bytes: Vec<u8>,
}

impl Blob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Serialize for Blob {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()> {
        Ok(writer.write_all(&self.bytes)?)
    }
}

impl DeserializeSized for Blob {
    fn deserialize_sized(reader: &mut impl BufRead, size: u64) -> RitResult<Self> {
        let mut bytes = Vec::with_capacity(size as usize);
        reader.take(size).read_to_end(&mut bytes)?;
        Ok(Self { bytes })
    }
}

impl WritableObject for Blob {
    fn obj_type(&self) -> RitObjType {
        RitObjType::Blob
    }
}
