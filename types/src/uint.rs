//! Arbitrary-precision unsigned integers: `U128`, `U256` and `U512`.
//!
//! On the wire each is a single length byte followed by that many bytes of little-endian
//! magnitude, with no trailing zero bytes. Zero is therefore the single byte `0x00`.

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::bytesrepr::{self, Error, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

#[allow(
    clippy::assign_op_pattern,
    clippy::ptr_offset_with_cast,
    clippy::manual_range_contains,
    clippy::range_plus_one,
    clippy::transmute_ptr_to_ptr,
    clippy::reversed_empty_ranges
)]
mod macro_code {
    use uint::construct_uint;

    construct_uint! {
        pub struct U512(8);
    }
    construct_uint! {
        pub struct U256(4);
    }
    construct_uint! {
        pub struct U128(2);
    }
}

pub use self::macro_code::{U128, U256, U512};

macro_rules! impl_traits_for_uint {
    ($type:ident, $total_bytes:expr) => {
        impl ToBytes for $type {
            fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                let mut buffer = bytesrepr::allocate_buffer(self)?;
                self.write_bytes(&mut buffer)?;
                Ok(buffer)
            }

            fn serialized_length(&self) -> usize {
                U8_SERIALIZED_LENGTH + (self.bits() + 7) / 8
            }

            fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
                let mut little_endian = [0u8; $total_bytes];
                self.to_little_endian(&mut little_endian);
                let significant = little_endian
                    .iter()
                    .rposition(|byte| *byte != 0)
                    .map_or(0, |index| index + 1);
                // `significant` is at most 64, so the cast is lossless.
                writer.push(significant as u8);
                writer.extend_from_slice(&little_endian[..significant]);
                Ok(())
            }
        }

        impl FromBytes for $type {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
                let (num_bytes, remainder) = u8::from_bytes(bytes)?;
                let num_bytes = num_bytes as usize;
                if num_bytes > $total_bytes {
                    return Err(Error::Formatting);
                }
                let (magnitude, remainder) = bytesrepr::safe_split_at(remainder, num_bytes)?;
                // A trailing zero means the encoder did not trim, so the bytes are not canonical.
                if magnitude.last() == Some(&0) {
                    return Err(Error::Formatting);
                }
                Ok(($type::from_little_endian(magnitude), remainder))
            }
        }

        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    self.to_string().serialize(serializer)
                } else {
                    let bytes = self.to_bytes().map_err(serde::ser::Error::custom)?;
                    bytes.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let decimal = String::deserialize(deserializer)?;
                    $type::from_dec_str(&decimal).map_err(SerdeError::custom)
                } else {
                    let bytes = <Vec<u8>>::deserialize(deserializer)?;
                    bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
                }
            }
        }
    };
}

impl_traits_for_uint!(U128, 16);
impl_traits_for_uint!(U256, 32);
impl_traits_for_uint!(U512, 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_should_encode_as_single_length_byte() {
        assert_eq!(U128::zero().to_bytes().unwrap(), vec![0]);
        assert_eq!(U256::zero().to_bytes().unwrap(), vec![0]);
        assert_eq!(U512::zero().to_bytes().unwrap(), vec![0]);
    }

    #[test]
    fn should_trim_trailing_zero_bytes() {
        assert_eq!(U512::one().to_bytes().unwrap(), vec![1, 1]);
        assert_eq!(U512::from(256u64).to_bytes().unwrap(), vec![2, 0, 1]);
        assert_eq!(
            U512::from(1_000_000_000u64).to_bytes().unwrap(),
            vec![4, 0x00, 0xca, 0x9a, 0x3b]
        );
    }

    #[test]
    fn max_values_should_use_full_width() {
        let bytes = U128::MAX.to_bytes().unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 16);

        let bytes = U512::MAX.to_bytes().unwrap();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 64);
        assert!(bytes[1..].iter().all(|byte| *byte == 0xff));
    }

    #[test]
    fn should_round_trip_boundary_values() {
        for value in [U128::zero(), U128::one(), U128::MAX] {
            let bytes = value.to_bytes().unwrap();
            assert_eq!(bytes.len(), value.serialized_length());
            assert_eq!(bytesrepr::deserialize::<U128>(bytes).unwrap(), value);
        }
        for value in [U256::zero(), U256::one(), U256::MAX] {
            assert_eq!(
                bytesrepr::deserialize::<U256>(value.to_bytes().unwrap()).unwrap(),
                value
            );
        }
        for value in [U512::zero(), U512::one(), U512::MAX] {
            assert_eq!(
                bytesrepr::deserialize::<U512>(value.to_bytes().unwrap()).unwrap(),
                value
            );
        }
    }

    #[test]
    fn should_reject_length_wider_than_type() {
        let mut bytes = vec![17u8];
        bytes.extend([0xffu8; 17]);
        assert_eq!(U128::from_bytes(&bytes), Err(Error::Formatting));
    }

    #[test]
    fn should_reject_untrimmed_magnitude() {
        assert_eq!(U512::from_bytes(&[2, 1, 0]), Err(Error::Formatting));
    }

    #[test]
    fn should_reject_truncated_magnitude() {
        assert_eq!(U256::from_bytes(&[3, 1, 2]), Err(Error::EarlyEndOfStream));
    }

    #[test]
    fn should_serialize_as_decimal_string_in_json() {
        let value = U512::from(123_456_789u64);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"123456789\"");
        assert_eq!(serde_json::from_str::<U512>(&json).unwrap(), value);
    }
}
