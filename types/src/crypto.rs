//! Public keys, secret keys and signatures over the two supported algorithms.
//!
//! Public keys and signatures share one tag space: `0x01` for Ed25519 and `0x02` for Secp256k1.
//! Their wire form is the tag byte followed by the raw key or signature bytes, and their hex
//! form is the hex of that wire form.

use std::fmt::{self, Debug, Display, Formatter};

use ed25519_dalek::{Signer as _, Verifier as _};
use hex_fmt::HexFmt;
use rand::rngs::OsRng;
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

/// The tag for Ed25519 keys and signatures.
pub const ED25519_TAG: u8 = 1;
/// The tag for Secp256k1 keys and signatures.
pub const SECP256K1_TAG: u8 = 2;

/// The length in bytes of an Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;
/// The length in bytes of a compressed Secp256k1 public key.
pub const SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;
/// The length in bytes of a secret key of either algorithm.
pub const SECRET_KEY_LENGTH: usize = 32;
/// The length in bytes of a signature of either algorithm.
pub const SIGNATURE_LENGTH: usize = 64;

/// Cryptographic errors.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// The leading tag byte names neither supported algorithm.
    #[error("unknown algorithm tag {0}")]
    UnknownTag(u8),
    /// The algorithm name is not supported.
    #[error("unknown algorithm name {0}")]
    UnknownAlgorithm(String),
    /// The input was empty where a tag byte was expected.
    #[error("missing algorithm tag")]
    MissingTag,
    /// Key or signature bytes were malformed for their algorithm.
    #[error("invalid {algorithm} {item}: {reason}")]
    Invalid {
        algorithm: AlgorithmTag,
        item: &'static str,
        reason: String,
    },
    /// Hex decoding failed.
    #[error("failed to decode hex: {0}")]
    FromHex(#[from] hex::FromHexError),
    /// The signature does not verify against the given public key and message.
    #[error("signature verification failed")]
    Verification,
    /// The secret key and public key are of different algorithms.
    #[error("secret key and public key algorithms differ")]
    AlgorithmMismatch,
}

/// The algorithm a key or signature belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlgorithmTag {
    Ed25519,
    Secp256k1,
}

impl AlgorithmTag {
    /// Returns the wire tag byte.
    pub fn tag(self) -> u8 {
        match self {
            AlgorithmTag::Ed25519 => ED25519_TAG,
            AlgorithmTag::Secp256k1 => SECP256K1_TAG,
        }
    }

    /// Reads the algorithm from its wire tag byte.
    pub fn from_tag(tag: u8) -> Result<Self, Error> {
        match tag {
            ED25519_TAG => Ok(AlgorithmTag::Ed25519),
            SECP256K1_TAG => Ok(AlgorithmTag::Secp256k1),
            other => Err(Error::UnknownTag(other)),
        }
    }
}

impl Display for AlgorithmTag {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            AlgorithmTag::Ed25519 => write!(formatter, "ed25519"),
            AlgorithmTag::Secp256k1 => write!(formatter, "secp256k1"),
        }
    }
}

impl std::str::FromStr for AlgorithmTag {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(AlgorithmTag::Ed25519),
            "secp256k1" => Ok(AlgorithmTag::Secp256k1),
            _ => Err(Error::UnknownAlgorithm(input.to_string())),
        }
    }
}

fn invalid(algorithm: AlgorithmTag, item: &'static str, reason: impl Display) -> Error {
    Error::Invalid {
        algorithm,
        item,
        reason: reason.to_string(),
    }
}

/// Splits `bytes` into its algorithm tag and the remaining raw bytes.
fn split_tag(bytes: &[u8]) -> Result<(AlgorithmTag, &[u8]), Error> {
    let (tag, raw) = bytes.split_first().ok_or(Error::MissingTag)?;
    Ok((AlgorithmTag::from_tag(*tag)?, raw))
}

/// A secret key; the signing half of a key pair.
#[derive(Clone)]
pub enum SecretKey {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

impl SecretKey {
    /// Constructs an Ed25519 secret key from its 32 raw bytes.
    pub fn ed25519_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let bytes = <[u8; SECRET_KEY_LENGTH]>::try_from(bytes)
            .map_err(|error| invalid(AlgorithmTag::Ed25519, "secret key", error))?;
        Ok(SecretKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(
            &bytes,
        )))
    }

    /// Constructs a Secp256k1 secret key from its 32 raw bytes.
    pub fn secp256k1_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        k256::ecdsa::SigningKey::from_slice(bytes)
            .map(SecretKey::Secp256k1)
            .map_err(|error| invalid(AlgorithmTag::Secp256k1, "secret key", error))
    }

    /// Constructs a secret key of the given algorithm from hex-encoded raw bytes.
    pub fn from_hex(algorithm: AlgorithmTag, input: &str) -> Result<Self, Error> {
        let bytes = hex::decode(input.trim())?;
        match algorithm {
            AlgorithmTag::Ed25519 => SecretKey::ed25519_from_bytes(&bytes),
            AlgorithmTag::Secp256k1 => SecretKey::secp256k1_from_bytes(&bytes),
        }
    }

    /// Generates a new random secret key of the given algorithm.
    pub fn generate(algorithm: AlgorithmTag) -> Self {
        let mut rng = OsRng;
        match algorithm {
            AlgorithmTag::Ed25519 => {
                SecretKey::Ed25519(ed25519_dalek::SigningKey::generate(&mut rng))
            }
            AlgorithmTag::Secp256k1 => {
                SecretKey::Secp256k1(k256::ecdsa::SigningKey::random(&mut rng))
            }
        }
    }

    /// Returns the algorithm of this key.
    pub fn algorithm(&self) -> AlgorithmTag {
        match self {
            SecretKey::Ed25519(_) => AlgorithmTag::Ed25519,
            SecretKey::Secp256k1(_) => AlgorithmTag::Secp256k1,
        }
    }

    /// Returns the raw secret bytes as hex.
    pub fn to_hex(&self) -> String {
        match self {
            SecretKey::Ed25519(key) => hex::encode(key.to_bytes()),
            SecretKey::Secp256k1(key) => hex::encode(key.to_bytes()),
        }
    }
}

impl Debug for SecretKey {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "SecretKey::{}(..)", self.algorithm())
    }
}

/// A public key; the verifying half of a key pair.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(ed25519_dalek::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
}

impl PublicKey {
    /// Returns the algorithm of this key.
    pub fn algorithm(&self) -> AlgorithmTag {
        match self {
            PublicKey::Ed25519(_) => AlgorithmTag::Ed25519,
            PublicKey::Secp256k1(_) => AlgorithmTag::Secp256k1,
        }
    }

    /// Returns the raw key bytes, without the tag. Secp256k1 keys are SEC1-compressed.
    pub fn raw_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => key.as_bytes().to_vec(),
            PublicKey::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// Constructs a public key from its algorithm and raw key bytes.
    pub fn from_raw_bytes(algorithm: AlgorithmTag, raw: &[u8]) -> Result<Self, Error> {
        match algorithm {
            AlgorithmTag::Ed25519 => {
                let raw = <[u8; ED25519_PUBLIC_KEY_LENGTH]>::try_from(raw)
                    .map_err(|error| invalid(algorithm, "public key", error))?;
                ed25519_dalek::VerifyingKey::from_bytes(&raw)
                    .map(PublicKey::Ed25519)
                    .map_err(|error| invalid(algorithm, "public key", error))
            }
            AlgorithmTag::Secp256k1 => {
                if raw.len() != SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH {
                    return Err(invalid(
                        algorithm,
                        "public key",
                        format!("expected {} bytes, got {}", SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH, raw.len()),
                    ));
                }
                k256::ecdsa::VerifyingKey::from_sec1_bytes(raw)
                    .map(PublicKey::Secp256k1)
                    .map_err(|error| invalid(algorithm, "public key", error))
            }
        }
    }

    /// Parses the tagged hex form, e.g. `01` followed by 64 hex chars for Ed25519.
    pub fn from_hex<T: AsRef<[u8]>>(input: T) -> Result<Self, Error> {
        let bytes = hex::decode(input)?;
        let (algorithm, raw) = split_tag(&bytes)?;
        PublicKey::from_raw_bytes(algorithm, raw)
    }

    /// Returns the tagged hex form.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", self.algorithm().tag(), hex::encode(self.raw_bytes()))
    }

    /// Verifies `signature` over `message` against this key.
    pub fn verify<T: AsRef<[u8]>>(&self, message: T, signature: &Signature) -> Result<(), Error> {
        match (self, signature) {
            (PublicKey::Ed25519(key), Signature::Ed25519(signature)) => key
                .verify(message.as_ref(), signature)
                .map_err(|_| Error::Verification),
            (PublicKey::Secp256k1(key), Signature::Secp256k1(signature)) => key
                .verify(message.as_ref(), signature)
                .map_err(|_| Error::Verification),
            _ => Err(Error::AlgorithmMismatch),
        }
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(secret_key: &SecretKey) -> Self {
        match secret_key {
            SecretKey::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            SecretKey::Secp256k1(key) => PublicKey::Secp256k1(*key.verifying_key()),
        }
    }
}

impl Debug for PublicKey {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "PublicKey::{}({})", self.algorithm(), HexFmt(self.raw_bytes()))
    }
}

impl Display for PublicKey {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "PubKey::{}({:10})", self.algorithm(), HexFmt(self.raw_bytes()))
    }
}

impl ToBytes for PublicKey {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                PublicKey::Ed25519(_) => ED25519_PUBLIC_KEY_LENGTH,
                PublicKey::Secp256k1(_) => SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.algorithm().tag());
        writer.extend(self.raw_bytes());
        Ok(())
    }
}

impl FromBytes for PublicKey {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let algorithm = AlgorithmTag::from_tag(tag).map_err(|_| bytesrepr::Error::Formatting)?;
        let length = match algorithm {
            AlgorithmTag::Ed25519 => ED25519_PUBLIC_KEY_LENGTH,
            AlgorithmTag::Secp256k1 => SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH,
        };
        let (raw, remainder) = bytesrepr::safe_split_at(remainder, length)?;
        let public_key = PublicKey::from_raw_bytes(algorithm, raw)
            .map_err(|_| bytesrepr::Error::Formatting)?;
        Ok((public_key, remainder))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_hex().serialize(serializer)
        } else {
            let bytes = self.to_bytes().map_err(serde::ser::Error::custom)?;
            bytes.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let hex_string = String::deserialize(deserializer)?;
            PublicKey::from_hex(hex_string).map_err(SerdeError::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
        }
    }
}

/// An algorithm-tagged signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Ed25519(ed25519_dalek::Signature),
    Secp256k1(k256::ecdsa::Signature),
}

impl Signature {
    /// Returns the algorithm of this signature.
    pub fn algorithm(&self) -> AlgorithmTag {
        match self {
            Signature::Ed25519(_) => AlgorithmTag::Ed25519,
            Signature::Secp256k1(_) => AlgorithmTag::Secp256k1,
        }
    }

    /// Returns the raw signature bytes, without the tag.
    pub fn raw_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        match self {
            Signature::Ed25519(signature) => signature.to_bytes(),
            Signature::Secp256k1(signature) => {
                let mut raw = [0u8; SIGNATURE_LENGTH];
                raw.copy_from_slice(&signature.to_bytes());
                raw
            }
        }
    }

    /// Wraps raw signature bytes with the given algorithm.
    pub fn from_raw_bytes(algorithm: AlgorithmTag, raw: &[u8]) -> Result<Self, Error> {
        match algorithm {
            AlgorithmTag::Ed25519 => ed25519_dalek::Signature::from_slice(raw)
                .map(Signature::Ed25519)
                .map_err(|error| invalid(algorithm, "signature", error)),
            AlgorithmTag::Secp256k1 => k256::ecdsa::Signature::from_slice(raw)
                .map(Signature::Secp256k1)
                .map_err(|error| invalid(algorithm, "signature", error)),
        }
    }

    /// Decodes the wire form: one tag byte followed by the raw signature.
    pub fn from_tagged_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let (algorithm, raw) = split_tag(bytes)?;
        Signature::from_raw_bytes(algorithm, raw)
    }

    /// Returns the wire form: one tag byte followed by the raw signature.
    pub fn to_tagged_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(U8_SERIALIZED_LENGTH + SIGNATURE_LENGTH);
        bytes.push(self.algorithm().tag());
        bytes.extend_from_slice(&self.raw_bytes());
        bytes
    }

    /// Parses the tagged hex form.
    pub fn from_hex<T: AsRef<[u8]>>(input: T) -> Result<Self, Error> {
        let bytes = hex::decode(input)?;
        Signature::from_tagged_bytes(&bytes)
    }

    /// Returns the tagged hex form: `01` or `02` followed by the hex of the raw signature.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", self.algorithm().tag(), hex::encode(self.raw_bytes()))
    }
}

impl Debug for Signature {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Signature::{}({})", self.algorithm(), HexFmt(self.raw_bytes()))
    }
}

impl Display for Signature {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Sig::{}({:10})", self.algorithm(), HexFmt(self.raw_bytes()))
    }
}

impl ToBytes for Signature {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        Ok(self.to_tagged_bytes())
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH + SIGNATURE_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.algorithm().tag());
        writer.extend_from_slice(&self.raw_bytes());
        Ok(())
    }
}

impl FromBytes for Signature {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let algorithm = AlgorithmTag::from_tag(tag).map_err(|_| bytesrepr::Error::Formatting)?;
        let (raw, remainder) = bytesrepr::safe_split_at(remainder, SIGNATURE_LENGTH)?;
        let signature = Signature::from_raw_bytes(algorithm, raw)
            .map_err(|_| bytesrepr::Error::Formatting)?;
        Ok((signature, remainder))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_hex().serialize(serializer)
        } else {
            self.to_tagged_bytes().serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let hex_string = String::deserialize(deserializer)?;
            Signature::from_hex(hex_string).map_err(SerdeError::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Signature::from_tagged_bytes(&bytes).map_err(SerdeError::custom)
        }
    }
}

/// Signs `message` with `secret_key`; the algorithm follows from the key.
pub fn sign<T: AsRef<[u8]>>(message: T, secret_key: &SecretKey) -> Signature {
    match secret_key {
        SecretKey::Ed25519(signing_key) => Signature::Ed25519(signing_key.sign(message.as_ref())),
        SecretKey::Secp256k1(signing_key) => {
            let signature: k256::ecdsa::Signature = signing_key.sign(message.as_ref());
            Signature::Secp256k1(signature)
        }
    }
}

/// Verifies `signature` over `message` against `public_key`.
pub fn verify<T: AsRef<[u8]>>(
    message: T,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<(), Error> {
    public_key.verify(message, signature)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ed25519_secret_key(seed: u8) -> SecretKey {
        SecretKey::ed25519_from_bytes(&[seed; SECRET_KEY_LENGTH]).unwrap()
    }

    pub(crate) fn secp256k1_secret_key(seed: u8) -> SecretKey {
        SecretKey::secp256k1_from_bytes(&[seed; SECRET_KEY_LENGTH]).unwrap()
    }

    #[test]
    fn public_key_wire_form_should_be_tag_then_raw_bytes() {
        let ed25519 = PublicKey::from(&ed25519_secret_key(1));
        let bytes = ed25519.to_bytes().unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], ED25519_TAG);
        assert_eq!(bytesrepr::deserialize::<PublicKey>(bytes).unwrap(), ed25519);

        let secp256k1 = PublicKey::from(&secp256k1_secret_key(2));
        let bytes = secp256k1.to_bytes().unwrap();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], SECP256K1_TAG);
        assert_eq!(bytesrepr::deserialize::<PublicKey>(bytes).unwrap(), secp256k1);
    }

    #[test]
    fn public_key_should_round_trip_through_hex() {
        for secret_key in [ed25519_secret_key(3), secp256k1_secret_key(4)] {
            let public_key = PublicKey::from(&secret_key);
            let hex = public_key.to_hex();
            assert_eq!(PublicKey::from_hex(&hex).unwrap(), public_key);
        }
    }

    #[test]
    fn signature_hex_should_prefix_algorithm_tag() {
        let signature = sign(b"message", &ed25519_secret_key(5));
        let hex = signature.to_hex();
        assert!(hex.starts_with("01"));
        assert_eq!(hex.len(), 2 + 2 * SIGNATURE_LENGTH);
        assert_eq!(Signature::from_hex(&hex).unwrap(), signature);

        let signature = sign(b"message", &secp256k1_secret_key(6));
        let hex = signature.to_hex();
        assert!(hex.starts_with("02"));
        let decoded = Signature::from_hex(&hex).unwrap();
        assert_eq!(decoded.algorithm(), AlgorithmTag::Secp256k1);
        assert_eq!(decoded.raw_bytes(), signature.raw_bytes());
    }

    #[test]
    fn should_reject_unknown_signature_tag() {
        let mut bytes = sign(b"message", &ed25519_secret_key(7)).to_tagged_bytes();
        bytes[0] = 0x03;
        assert_eq!(Signature::from_tagged_bytes(&bytes), Err(Error::UnknownTag(3)));
        assert_eq!(Signature::from_tagged_bytes(&[]), Err(Error::MissingTag));
        assert!(Signature::from_bytes(&bytes).is_err());
    }

    #[test]
    fn should_surface_hex_errors() {
        assert_eq!(
            PublicKey::from_hex("0g"),
            Err(Error::FromHex(hex::FromHexError::InvalidHexCharacter {
                c: 'g',
                index: 1
            }))
        );
        assert_eq!(
            Signature::from_hex("012"),
            Err(Error::FromHex(hex::FromHexError::OddLength))
        );
    }

    #[test]
    fn should_reject_truncated_signature() {
        let bytes = sign(b"message", &ed25519_secret_key(8)).to_tagged_bytes();
        assert!(Signature::from_tagged_bytes(&bytes[..40]).is_err());
        assert_eq!(
            Signature::from_bytes(&bytes[..40]),
            Err(bytesrepr::Error::EarlyEndOfStream)
        );
    }

    #[test]
    fn signatures_should_verify_only_against_signing_key() {
        for (signer, other) in [
            (ed25519_secret_key(9), ed25519_secret_key(10)),
            (secp256k1_secret_key(11), secp256k1_secret_key(12)),
        ] {
            let signature = sign(b"payload", &signer);
            assert!(verify(b"payload", &signature, &PublicKey::from(&signer)).is_ok());
            assert_eq!(
                verify(b"payload", &signature, &PublicKey::from(&other)),
                Err(Error::Verification)
            );
            assert_eq!(
                verify(b"tampered", &signature, &PublicKey::from(&signer)),
                Err(Error::Verification)
            );
        }
    }

    #[test]
    fn should_not_verify_across_algorithms() {
        let signature = sign(b"payload", &ed25519_secret_key(13));
        let public_key = PublicKey::from(&secp256k1_secret_key(14));
        assert_eq!(
            verify(b"payload", &signature, &public_key),
            Err(Error::AlgorithmMismatch)
        );
    }

    #[test]
    fn secret_key_should_round_trip_through_hex() {
        for secret_key in [ed25519_secret_key(15), secp256k1_secret_key(16)] {
            let restored = SecretKey::from_hex(secret_key.algorithm(), &secret_key.to_hex()).unwrap();
            assert_eq!(PublicKey::from(&restored), PublicKey::from(&secret_key));
        }
    }

    #[test]
    fn algorithm_should_parse_from_name() {
        assert_eq!("Ed25519".parse::<AlgorithmTag>().unwrap(), AlgorithmTag::Ed25519);
        assert_eq!("secp256k1".parse::<AlgorithmTag>().unwrap(), AlgorithmTag::Secp256k1);
        assert!("rsa".parse::<AlgorithmTag>().is_err());
    }
}
