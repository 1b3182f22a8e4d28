use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

/// The number of bytes in a [`URef`] address.
pub const UREF_ADDR_LENGTH: usize = 32;
/// The number of bytes in a serialized [`URef`] where the [`AccessRights`] are not `None`.
pub const UREF_SERIALIZED_LENGTH: usize = UREF_ADDR_LENGTH + U8_SERIALIZED_LENGTH;

const FORMATTED_STRING_PREFIX: &str = "uref-";
const ACCESS_RIGHTS_DIGITS: usize = 3;

/// The address of a `URef` (unforgeable reference) on the network.
pub type URefAddr = [u8; UREF_ADDR_LENGTH];

/// Error while parsing a URef from a formatted string.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum URefFromStrError {
    /// Prefix is not "uref-".
    #[error("invalid prefix, expected \"uref-\"")]
    InvalidPrefix,
    /// No access rights as suffix.
    #[error("missing access rights suffix")]
    MissingSuffix,
    /// Access rights are not exactly three octal digits, or name undefined rights.
    #[error("invalid access rights \"{0}\"")]
    InvalidAccessRights(String),
    /// Failed to decode address portion of URef.
    #[error("failed to decode address: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// The access rights a [`URef`] grants, as a bitfield of read, write and add.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessRights(u8);

impl AccessRights {
    /// No permissions.
    pub const NONE: AccessRights = AccessRights(0b000);
    /// Permission to read the value under the associated `URef`.
    pub const READ: AccessRights = AccessRights(0b001);
    /// Permission to write a value under the associated `URef`.
    pub const WRITE: AccessRights = AccessRights(0b010);
    /// Permission to add to the value under the associated `URef`.
    pub const ADD: AccessRights = AccessRights(0b100);
    /// Permission to read or add to the value under the associated `URef`.
    pub const READ_ADD: AccessRights = AccessRights(0b101);
    /// Permission to read or write the value under the associated `URef`.
    pub const READ_WRITE: AccessRights = AccessRights(0b011);
    /// Permission to add to, or write the value under the associated `URef`.
    pub const ADD_WRITE: AccessRights = AccessRights(0b110);
    /// Permission to read, add to, or write the value under the associated `URef`.
    pub const READ_ADD_WRITE: AccessRights = AccessRights(0b111);

    const ALL_BITS: u8 = 0b111;

    /// Returns the access rights for `bits`, or `None` if undefined bits are set.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::ALL_BITS == 0).then_some(AccessRights(bits))
    }

    /// Returns the raw bitfield.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if the `READ` flag is set.
    pub fn is_readable(self) -> bool {
        self.0 & Self::READ.0 != 0
    }

    /// Returns `true` if the `WRITE` flag is set.
    pub fn is_writeable(self) -> bool {
        self.0 & Self::WRITE.0 != 0
    }

    /// Returns `true` if the `ADD` flag is set.
    pub fn is_addable(self) -> bool {
        self.0 & Self::ADD.0 != 0
    }
}

impl Debug for AccessRights {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "AccessRights({:03o})", self.0)
    }
}

impl ToBytes for AccessRights {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.0);
        Ok(())
    }
}

impl FromBytes for AccessRights {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (bits, remainder) = u8::from_bytes(bytes)?;
        let access_rights = AccessRights::from_bits(bits).ok_or(bytesrepr::Error::Formatting)?;
        Ok((access_rights, remainder))
    }
}

/// Represents an unforgeable reference, containing an address in the network's global storage
/// and the [`AccessRights`] of the reference.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct URef(URefAddr, AccessRights);

impl URef {
    /// Constructs a [`URef`] from an address and access rights.
    pub const fn new(address: URefAddr, access_rights: AccessRights) -> Self {
        URef(address, access_rights)
    }

    /// Returns the address of this [`URef`].
    pub fn addr(&self) -> URefAddr {
        self.0
    }

    /// Returns the access rights of this [`URef`].
    pub fn access_rights(&self) -> AccessRights {
        self.1
    }

    /// Formats the address and access rights of the [`URef`] in a unique way that could be used
    /// as a name when storing the given `URef` in a global state.
    pub fn to_formatted_string(self) -> String {
        format!(
            "{}{}-{:03o}",
            FORMATTED_STRING_PREFIX,
            hex::encode(self.addr()),
            self.access_rights().bits()
        )
    }

    /// Parses a string formatted as per `Self::to_formatted_string()` into a `URef`.
    pub fn from_formatted_str(input: &str) -> Result<Self, URefFromStrError> {
        let remainder = input
            .strip_prefix(FORMATTED_STRING_PREFIX)
            .ok_or(URefFromStrError::InvalidPrefix)?;
        let parts: Vec<&str> = remainder.splitn(2, '-').collect();
        let (addr_hex, suffix) = match parts.as_slice() {
            [addr_hex, suffix] => (*addr_hex, *suffix),
            _ => return Err(URefFromStrError::MissingSuffix),
        };
        let mut addr = [0u8; UREF_ADDR_LENGTH];
        hex::decode_to_slice(addr_hex, &mut addr)?;
        let access_rights = parse_access_rights(suffix)?;
        Ok(URef(addr, access_rights))
    }
}

fn parse_access_rights(suffix: &str) -> Result<AccessRights, URefFromStrError> {
    let invalid = || URefFromStrError::InvalidAccessRights(suffix.to_string());
    if suffix.len() != ACCESS_RIGHTS_DIGITS || !suffix.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }
    let bits = u8::from_str_radix(suffix, 8).map_err(|_| invalid())?;
    AccessRights::from_bits(bits).ok_or_else(invalid)
}

impl FromStr for URef {
    type Err = URefFromStrError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        URef::from_formatted_str(input)
    }
}

impl Display for URef {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "URef({}, {:?})",
            hex_fmt::HexFmt(&self.addr()),
            self.access_rights()
        )
    }
}

impl Debug for URef {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ToBytes for URef {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        UREF_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.extend_from_slice(&self.0);
        self.1.write_bytes(writer)
    }
}

impl FromBytes for URef {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (addr, remainder) = URefAddr::from_bytes(bytes)?;
        let (access_rights, remainder) = AccessRights::from_bytes(remainder)?;
        Ok((URef(addr, access_rights), remainder))
    }
}

impl Serialize for URef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_formatted_string().serialize(serializer)
        } else {
            (self.0, self.1 .0).serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for URef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let formatted_string = String::deserialize(deserializer)?;
            URef::from_formatted_str(&formatted_string).map_err(SerdeError::custom)
        } else {
            let (address, bits) = <(URefAddr, u8)>::deserialize(deserializer)?;
            let access_rights = AccessRights::from_bits(bits)
                .ok_or_else(|| SerdeError::custom("invalid access rights"))?;
            Ok(URef(address, access_rights))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(addr_hex: &str, suffix: &str) -> String {
        format!("uref-{}-{}", addr_hex, suffix)
    }

    #[test]
    fn should_parse_formatted_string_to_33_bytes() {
        let uref = URef::from_formatted_str(&formatted(&"a".repeat(64), "007")).unwrap();
        let bytes = uref.to_bytes().unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[32], 7);
        assert!(bytes[..32].iter().all(|byte| *byte == 0xaa));
        assert_eq!(uref.access_rights(), AccessRights::READ_ADD_WRITE);
    }

    #[test]
    fn formatted_string_should_round_trip() {
        let uref = URef::new([3; 32], AccessRights::READ_WRITE);
        let text = uref.to_formatted_string();
        assert!(text.ends_with("-003"));
        assert_eq!(URef::from_formatted_str(&text).unwrap(), uref);
    }

    #[test]
    fn should_reject_missing_prefix() {
        assert_eq!(
            URef::from_formatted_str(&format!("{}-007", "a".repeat(64))),
            Err(URefFromStrError::InvalidPrefix)
        );
        assert_eq!(
            URef::from_formatted_str(&format!("hash-{}-007", "a".repeat(64))),
            Err(URefFromStrError::InvalidPrefix)
        );
    }

    #[test]
    fn should_reject_wrong_hex_length() {
        assert!(matches!(
            URef::from_formatted_str(&formatted(&"a".repeat(63), "007")),
            Err(URefFromStrError::Hex(_))
        ));
        assert!(matches!(
            URef::from_formatted_str(&formatted(&"a".repeat(66), "007")),
            Err(URefFromStrError::Hex(_))
        ));
        assert!(matches!(
            URef::from_formatted_str(&formatted(&"z".repeat(64), "007")),
            Err(URefFromStrError::Hex(_))
        ));
    }

    #[test]
    fn hex_errors_should_compare_by_kind() {
        assert_eq!(
            URef::from_formatted_str(&formatted(&"a".repeat(63), "007")),
            Err(URefFromStrError::Hex(hex::FromHexError::OddLength))
        );
        assert_eq!(
            crate::CLValue::uref(&formatted(&"a".repeat(63), "007")),
            Err(crate::CLValueError::URef(URefFromStrError::Hex(
                hex::FromHexError::OddLength
            )))
        );
    }

    #[test]
    fn should_reject_bad_access_rights_suffix() {
        for suffix in ["07", "0007", "", "abc", "008", "010", "-07"] {
            assert!(
                matches!(
                    URef::from_formatted_str(&formatted(&"a".repeat(64), suffix)),
                    Err(URefFromStrError::InvalidAccessRights(_))
                ),
                "suffix {:?} should be rejected",
                suffix
            );
        }
    }

    #[test]
    fn should_reject_missing_suffix() {
        assert_eq!(
            URef::from_formatted_str(&format!("uref-{}", "a".repeat(64))),
            Err(URefFromStrError::MissingSuffix)
        );
    }

    #[test]
    fn should_reject_undefined_access_bits_in_bytes() {
        let mut bytes = vec![0u8; 32];
        bytes.push(8);
        assert_eq!(URef::from_bytes(&bytes), Err(bytesrepr::Error::Formatting));
    }
}
