use std::{
    array::TryFromSliceError,
    fmt::{self, Debug, Display, Formatter},
};

use blake2::{
    digest::{consts::U32, Digest as _},
    Blake2b,
};
use hex_fmt::HexFmt;
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::bytesrepr::{self, FromBytes, ToBytes};

type Blake2b256 = Blake2b<U32>;

/// The output of the hash function.
#[derive(Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Digest([u8; Digest::LENGTH]);

impl Digest {
    /// The number of bytes in a `Digest`.
    pub const LENGTH: usize = 32;

    /// Returns the 256-bit Blake2b digest of `data`.
    pub fn hash<T: AsRef<[u8]>>(data: T) -> Digest {
        Digest(Blake2b256::digest(data.as_ref()).into())
    }

    /// Returns the digest of the concatenation of `parts`, without building the concatenation.
    pub fn hash_parts<T: AsRef<[u8]>>(parts: &[T]) -> Digest {
        let mut hasher = Blake2b256::new();
        for part in parts {
            hasher.update(part.as_ref());
        }
        Digest(hasher.finalize().into())
    }

    /// Returns the full lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses the full hex form.
    pub fn from_hex<T: AsRef<[u8]>>(hex_input: T) -> Result<Self, hex::FromHexError> {
        let mut data = [0u8; Digest::LENGTH];
        hex::decode_to_slice(hex_input, &mut data)?;
        Ok(Digest(data))
    }

    /// Returns the raw bytes.
    pub fn value(&self) -> [u8; Digest::LENGTH] {
        self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl<'a> TryFrom<&'a [u8]> for Digest {
    type Error = TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Digest, Self::Error> {
        <[u8; Digest::LENGTH]>::try_from(slice).map(Digest)
    }
}

impl From<[u8; Digest::LENGTH]> for Digest {
    fn from(arr: [u8; Digest::LENGTH]) -> Self {
        Digest(arr)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            HexFmt(&self.0).to_string().serialize(serializer)
        } else {
            self.0[..].serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let hex_string = String::deserialize(deserializer)?;
            Digest::from_hex(hex_string).map_err(SerdeError::custom)
        } else {
            let data = <Vec<u8>>::deserialize(deserializer)?;
            Digest::try_from(data.as_slice()).map_err(D::Error::custom)
        }
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", HexFmt(&self.0))
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:10}", HexFmt(&self.0))
    }
}

impl ToBytes for Digest {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.extend_from_slice(&self.0);
        Ok(())
    }
}

impl FromBytes for Digest {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        <[u8; Digest::LENGTH]>::from_bytes(bytes).map(|(arr, rem)| (Digest(arr), rem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_blake2b_256_test_vector() {
        // Blake2b with 32-byte output over the empty input.
        assert_eq!(
            Digest::hash(b"").to_hex(),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn hash_parts_should_equal_hash_of_concatenation() {
        let whole = Digest::hash(b"payment-bytessession-bytes");
        let parts = Digest::hash_parts(&[&b"payment-bytes"[..], &b"session-bytes"[..]]);
        assert_eq!(whole, parts);
    }

    #[test]
    fn should_round_trip_through_hex_and_json() {
        let digest = Digest::hash(b"abc");
        assert_eq!(Digest::from_hex(digest.to_hex()).unwrap(), digest);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));
        assert_eq!(serde_json::from_str::<Digest>(&json).unwrap(), digest);
    }

    #[test]
    fn should_reject_wrong_hex_length() {
        assert!(Digest::from_hex("abcd").is_err());
    }
}
