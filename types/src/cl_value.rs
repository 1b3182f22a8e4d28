//! Values paired with their [`CLType`] and canonical bytes.

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    bytesrepr::{
        self, Bytes, FromBytes, ToBytes, OPTION_NONE_TAG, OPTION_SOME_TAG, U32_SERIALIZED_LENGTH,
    },
    cl_type::{CLType, CLTyped},
    crypto::PublicKey,
    deploy::MAX_SERIALIZED_SIZE_OF_DEPLOY,
    uint::{U128, U256, U512},
    uref::{URef, URefFromStrError},
};

/// Error while constructing or converting a [`CLValue`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CLValueError {
    /// The bytes are not a valid encoding of the claimed type.
    #[error("CLValue error: {0}")]
    Serialization(#[from] bytesrepr::Error),
    /// A value's type differs from the one required.
    #[error("type mismatch: expected {expected}, found {found}")]
    Type { expected: CLType, found: CLType },
    /// A list type cannot be inferred from zero elements.
    #[error("cannot construct a list from no elements")]
    EmptyList,
    /// A list element's type differs from the first element's type.
    #[error("list element {index} has type {found}, expected {expected}")]
    HeterogeneousList {
        index: usize,
        expected: CLType,
        found: CLType,
    },
    /// The URef text form was malformed.
    #[error("invalid URef: {0}")]
    URef(#[from] URefFromStrError),
}

/// A Casper value: its [`CLType`], its canonical bytes, and a JSON rendering of the same
/// content.
///
/// The bytes are authoritative. The JSON rendering is derived from them on construction and is
/// for display only.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CLValue {
    cl_type: CLType,
    bytes: Bytes,
    parsed: Value,
}

impl CLValue {
    /// Constructs a `CLValue` from `t`.
    ///
    /// The type comes from `T`, so an empty `Vec<T>` is accepted here, whereas
    /// [`CLValue::list`] rejects an empty input with [`CLValueError::EmptyList`].
    pub fn from_t<T: CLTyped + ToBytes>(t: T) -> Result<CLValue, CLValueError> {
        let bytes = t.into_bytes()?;
        CLValue::from_components(T::cl_type(), bytes)
    }

    /// Constructs a `CLValue` from a type and its encoded bytes, checking that the bytes are a
    /// complete and valid encoding of the type.
    pub fn from_components(cl_type: CLType, bytes: Vec<u8>) -> Result<CLValue, CLValueError> {
        let (parsed, remainder) = project(&cl_type, &bytes)?;
        if !remainder.is_empty() {
            return Err(bytesrepr::Error::LeftOverBytes.into());
        }
        Ok(CLValue {
            cl_type,
            bytes: bytes.into(),
            parsed,
        })
    }

    /// Constructs a `U512` value from a `u64`, trimming the trailing zero bytes of its
    /// little-endian form. Produces the same bytes as `from_t(U512::from(value))`.
    pub fn u512_from_u64(value: u64) -> Result<CLValue, CLValueError> {
        let little_endian = value.to_le_bytes();
        let significant = little_endian
            .iter()
            .rposition(|byte| *byte != 0)
            .map_or(0, |index| index + 1);
        let mut bytes = Vec::with_capacity(1 + significant);
        bytes.push(significant as u8);
        bytes.extend_from_slice(&little_endian[..significant]);
        CLValue::from_components(CLType::U512, bytes)
    }

    /// Constructs a `URef` value from its formatted string, e.g. `uref-<64 hex>-007`.
    pub fn uref(formatted: &str) -> Result<CLValue, CLValueError> {
        let uref = URef::from_formatted_str(formatted)?;
        CLValue::from_t(uref)
    }

    /// Constructs a `PublicKey` value.
    pub fn public_key(public_key: &PublicKey) -> Result<CLValue, CLValueError> {
        CLValue::from_t(*public_key)
    }

    /// Constructs a `ByteArray(N)` value, where `N` is the length of `bytes`.
    pub fn byte_array(bytes: Vec<u8>) -> Result<CLValue, CLValueError> {
        let length = u32::try_from(bytes.len()).map_err(|_| bytesrepr::Error::OutOfMemory)?;
        CLValue::from_components(CLType::ByteArray(length), bytes)
    }

    /// Constructs an `Option(inner_type)` value. `inner_type` is required so that an empty
    /// option still carries its full type.
    pub fn option(inner_type: CLType, value: Option<CLValue>) -> Result<CLValue, CLValueError> {
        let bytes = match value {
            None => vec![OPTION_NONE_TAG],
            Some(inner) => {
                if inner.cl_type != inner_type {
                    return Err(CLValueError::Type {
                        expected: inner_type,
                        found: inner.cl_type,
                    });
                }
                let mut bytes = Vec::with_capacity(1 + inner.bytes.len());
                bytes.push(OPTION_SOME_TAG);
                bytes.extend_from_slice(inner.bytes.as_ref());
                bytes
            }
        };
        CLValue::from_components(CLType::option(inner_type), bytes)
    }

    /// Constructs a `List` value whose element type is taken from the first element.
    ///
    /// Every element is checked before any bytes are produced.
    pub fn list(elements: Vec<CLValue>) -> Result<CLValue, CLValueError> {
        let element_type = elements
            .first()
            .map(|first| first.cl_type.clone())
            .ok_or(CLValueError::EmptyList)?;
        if let Some((index, mismatched)) = elements
            .iter()
            .enumerate()
            .find(|(_, element)| element.cl_type != element_type)
        {
            return Err(CLValueError::HeterogeneousList {
                index,
                expected: element_type,
                found: mismatched.cl_type.clone(),
            });
        }

        let total: usize = elements.iter().map(|element| element.bytes.len()).sum();
        let mut bytes = Vec::with_capacity(U32_SERIALIZED_LENGTH + total);
        bytesrepr::write_length_prefix(elements.len(), &mut bytes)?;
        for element in &elements {
            bytes.extend_from_slice(element.bytes.as_ref());
        }
        CLValue::from_components(CLType::list(element_type), bytes)
    }

    /// Constructs a 1-ary tuple value.
    pub fn tuple1(t0: CLValue) -> Result<CLValue, CLValueError> {
        let bytes = t0.bytes.take_inner();
        CLValue::from_components(CLType::tuple1(t0.cl_type), bytes)
    }

    /// Constructs a 2-ary tuple value.
    pub fn tuple2(t0: CLValue, t1: CLValue) -> Result<CLValue, CLValueError> {
        let mut bytes = t0.bytes.take_inner();
        bytes.extend(t1.bytes.take_inner());
        CLValue::from_components(CLType::tuple2(t0.cl_type, t1.cl_type), bytes)
    }

    /// Constructs a 3-ary tuple value.
    pub fn tuple3(t0: CLValue, t1: CLValue, t2: CLValue) -> Result<CLValue, CLValueError> {
        let mut bytes = t0.bytes.take_inner();
        bytes.extend(t1.bytes.take_inner());
        bytes.extend(t2.bytes.take_inner());
        CLValue::from_components(CLType::tuple3(t0.cl_type, t1.cl_type, t2.cl_type), bytes)
    }

    /// Consumes and converts `self` back into its underlying type.
    pub fn into_t<T: CLTyped + FromBytes>(self) -> Result<T, CLValueError> {
        self.to_t()
    }

    /// Returns a clone of the underlying value as its native type.
    pub fn to_t<T: CLTyped + FromBytes>(&self) -> Result<T, CLValueError> {
        let expected = T::cl_type();
        if self.cl_type != expected {
            return Err(CLValueError::Type {
                expected,
                found: self.cl_type.clone(),
            });
        }
        Ok(bytesrepr::deserialize_from_slice(&self.bytes)?)
    }

    /// Returns the type of this value.
    pub fn cl_type(&self) -> &CLType {
        &self.cl_type
    }

    /// Returns the canonical bytes of the value, without the type.
    pub fn inner_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Returns the JSON rendering of the value.
    pub fn parsed(&self) -> &Value {
        &self.parsed
    }

    /// Consumes `self`, returning its type and bytes.
    pub fn destructure(self) -> (CLType, Bytes) {
        (self.cl_type, self.bytes)
    }
}

/// The fewest bytes any value of `cl_type` can occupy.
fn min_serialized_length(cl_type: &CLType) -> usize {
    match cl_type {
        CLType::Bool | CLType::U8 | CLType::U128 | CLType::U256 | CLType::U512 => 1,
        CLType::Option(_) => 1,
        CLType::I32 | CLType::U32 | CLType::String | CLType::List(_) => 4,
        CLType::I64 | CLType::U64 => 8,
        CLType::Unit => 0,
        CLType::URef | CLType::PublicKey => 33,
        CLType::ByteArray(length) => *length as usize,
        CLType::Tuple1(types) => types.iter().map(|t| min_serialized_length(t)).sum(),
        CLType::Tuple2(types) => types.iter().map(|t| min_serialized_length(t)).sum(),
        CLType::Tuple3(types) => types.iter().map(|t| min_serialized_length(t)).sum(),
    }
}

fn project_all<'a>(
    types: &[Box<CLType>],
    mut bytes: &'a [u8],
) -> Result<(Value, &'a [u8]), bytesrepr::Error> {
    let mut values = Vec::with_capacity(types.len());
    for cl_type in types {
        let (value, remainder) = project(cl_type, bytes)?;
        values.push(value);
        bytes = remainder;
    }
    Ok((Value::Array(values), bytes))
}

fn decode<T: FromBytes>(bytes: &[u8]) -> Result<(T, &[u8]), bytesrepr::Error> {
    T::from_bytes(bytes)
}

/// Decodes one value of `cl_type` from the front of `bytes`, returning its JSON rendering and
/// the unconsumed remainder. Fails on any malformed or truncated encoding.
fn project<'a>(cl_type: &CLType, bytes: &'a [u8]) -> Result<(Value, &'a [u8]), bytesrepr::Error> {
    match cl_type {
        CLType::Bool => decode::<bool>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::I32 => decode::<i32>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::I64 => decode::<i64>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::U8 => decode::<u8>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::U32 => decode::<u32>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::U64 => decode::<u64>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::U128 => decode::<U128>(bytes).map(|(v, rem)| (Value::from(v.to_string()), rem)),
        CLType::U256 => decode::<U256>(bytes).map(|(v, rem)| (Value::from(v.to_string()), rem)),
        CLType::U512 => decode::<U512>(bytes).map(|(v, rem)| (Value::from(v.to_string()), rem)),
        CLType::Unit => decode::<()>(bytes).map(|((), rem)| (Value::Null, rem)),
        CLType::String => decode::<String>(bytes).map(|(v, rem)| (Value::from(v), rem)),
        CLType::URef => {
            decode::<URef>(bytes).map(|(v, rem)| (Value::from(v.to_formatted_string()), rem))
        }
        CLType::PublicKey => {
            decode::<PublicKey>(bytes).map(|(v, rem)| (Value::from(v.to_hex()), rem))
        }
        CLType::Option(inner) => {
            let (tag, remainder) = u8::from_bytes(bytes)?;
            match tag {
                OPTION_NONE_TAG => Ok((Value::Null, remainder)),
                OPTION_SOME_TAG => project(inner, remainder),
                _ => Err(bytesrepr::Error::Formatting),
            }
        }
        CLType::List(element_type) => {
            let (count, mut remainder) = u32::from_bytes(bytes)?;
            let count = count as usize;
            // Zero-width elements take no input, so the length check alone cannot bound them.
            if count > MAX_SERIALIZED_SIZE_OF_DEPLOY as usize {
                return Err(bytesrepr::Error::OutOfMemory);
            }
            let min_length = min_serialized_length(element_type);
            if count.saturating_mul(min_length) > remainder.len() {
                return Err(bytesrepr::Error::EarlyEndOfStream);
            }
            let mut values = Vec::with_capacity(count.min(remainder.len()));
            for _ in 0..count {
                let (value, rem) = project(element_type, remainder)?;
                values.push(value);
                remainder = rem;
            }
            Ok((Value::Array(values), remainder))
        }
        CLType::ByteArray(length) => {
            let (array, remainder) = bytesrepr::safe_split_at(bytes, *length as usize)?;
            Ok((Value::from(hex::encode(array)), remainder))
        }
        CLType::Tuple1(types) => project_all(types, bytes),
        CLType::Tuple2(types) => project_all(types, bytes),
        CLType::Tuple3(types) => project_all(types, bytes),
    }
}

impl ToBytes for CLValue {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.bytes.serialized_length() + self.cl_type.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.bytes.write_bytes(writer)?;
        self.cl_type.write_bytes(writer)
    }
}

impl FromBytes for CLValue {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (value_bytes, remainder) = Bytes::from_bytes(bytes)?;
        let (cl_type, remainder) = CLType::from_bytes(remainder)?;
        let cl_value = CLValue::from_components(cl_type, value_bytes.take_inner()).map_err(
            |error| match error {
                CLValueError::Serialization(error) => error,
                _ => bytesrepr::Error::Formatting,
            },
        )?;
        Ok((cl_value, remainder))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CLValueJson {
    cl_type: CLType,
    bytes: Bytes,
    #[serde(default)]
    parsed: Option<Value>,
}

impl Serialize for CLValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CLValueJson {
            cl_type: self.cl_type.clone(),
            bytes: self.bytes.clone(),
            parsed: Some(self.parsed.clone()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CLValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The supplied rendering is discarded and recomputed from the bytes.
        let json = CLValueJson::deserialize(deserializer)?;
        CLValue::from_components(json.cl_type, json.bytes.take_inner()).map_err(SerdeError::custom)
    }
}

/// Renders a list of named values as a JSON object, for display.
pub(crate) fn named_values_to_json<'a>(
    named: impl Iterator<Item = (&'a str, &'a CLValue)>,
) -> Value {
    Value::Object(
        named
            .map(|(name, value)| (name.to_string(), value.parsed.clone()))
            .collect::<Map<String, Value>>(),
    )
}
