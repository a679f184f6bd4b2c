use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use super::{Format, FormatError};

/// Compact binary format backed by bincode's serde bridge.
///
/// Considerably smaller than [`JsonFormat`](super::JsonFormat) for response
/// bodies, which JSON spells out as arrays of numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFormat;

impl Format for BincodeFormat {
    fn serialize<T>(&self, value: &T) -> Result<Bytes, FormatError>
    where
        T: Serialize,
    {
        ::bincode::serde::encode_to_vec(value, ::bincode::config::standard())
            .map(Bytes::from)
            .map_err(|e| FormatError::Serialize(Box::new(e)))
    }

    fn deserialize<T>(&self, data: &[u8]) -> Result<T, FormatError>
    where
        T: DeserializeOwned,
    {
        let (value, _read) =
            ::bincode::serde::decode_from_slice(data, ::bincode::config::standard())
                .map_err(|e| FormatError::Deserialize(Box::new(e)))?;
        Ok(value)
    }
}
