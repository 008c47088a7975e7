use crate::error::RitResult;
use std::io::{prelude::*, BufReader};

pub trait Serialize {
    fn serialize(&self, writer: &mut dyn Write) -> RitResult<()>;

    fn serialize_to_vec(&self) -> RitResult<Vec<u8>> {
        let mut buf = vec![];
        self.serialize(&mut buf)?;
        Ok(buf)
    }
}

pub trait Deserialize {
    fn deserialize(reader: &mut impl BufRead) -> RitResult<Self>
    where
        Self: Sized;

    fn deserialize_unbuffered(reader: impl Read) -> RitResult<Self>
    where
        Self: Sized,
    {
        Self::deserialize(&mut BufReader::new(reader))
    }
}

/// deserialization where the object's on-disk size is known up front
/// (objects declare their payload length in the framing header)
pub trait DeserializeSized {
    fn deserialize_sized(reader: &mut impl BufRead, size: u64) -> RitResult<Self>
    where
        Self: Sized;

    fn deserialize_from_slice(slice: &[u8]) -> RitResult<Self>
    where
        Self: Sized,
    {
        Self::deserialize_sized(&mut BufReader::new(slice), slice.len() as u64)
    }
}

impl<D: Deserialize> DeserializeSized for D {
    fn deserialize_sized(reader: &mut impl BufRead, _size: u64) -> RitResult<Self>
    where
        Self: Sized,
    {
        Self::deserialize(reader)
    }
}
