//! The closed set of value shapes understood by the execution engine.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    bytesrepr::{self, Bytes, Error, FromBytes, ToBytes, U32_SERIALIZED_LENGTH, U8_SERIALIZED_LENGTH},
    crypto::PublicKey,
    uint::{U128, U256, U512},
    uref::URef,
};

const CL_TYPE_TAG_BOOL: u8 = 0;
const CL_TYPE_TAG_I32: u8 = 1;
const CL_TYPE_TAG_I64: u8 = 2;
const CL_TYPE_TAG_U8: u8 = 3;
const CL_TYPE_TAG_U32: u8 = 4;
const CL_TYPE_TAG_U64: u8 = 5;
const CL_TYPE_TAG_U128: u8 = 6;
const CL_TYPE_TAG_U256: u8 = 7;
const CL_TYPE_TAG_U512: u8 = 8;
const CL_TYPE_TAG_UNIT: u8 = 9;
const CL_TYPE_TAG_STRING: u8 = 10;
const CL_TYPE_TAG_KEY: u8 = 11;
const CL_TYPE_TAG_UREF: u8 = 12;
const CL_TYPE_TAG_OPTION: u8 = 13;
const CL_TYPE_TAG_LIST: u8 = 14;
const CL_TYPE_TAG_BYTE_ARRAY: u8 = 15;
const CL_TYPE_TAG_RESULT: u8 = 16;
const CL_TYPE_TAG_MAP: u8 = 17;
const CL_TYPE_TAG_TUPLE1: u8 = 18;
const CL_TYPE_TAG_TUPLE2: u8 = 19;
const CL_TYPE_TAG_TUPLE3: u8 = 20;
const CL_TYPE_TAG_ANY: u8 = 21;
const CL_TYPE_TAG_PUBLIC_KEY: u8 = 22;

/// Nesting deeper than this is rejected when decoding a [`CLType`].
pub const CL_TYPE_RECURSION_DEPTH: u8 = 50;

/// Casper types, i.e. types which can be stored and manipulated by smart contracts.
///
/// Provides a description of the underlying data type of a [`CLValue`](crate::CLValue).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum CLType {
    /// `bool` primitive.
    Bool,
    /// `i32` primitive.
    I32,
    /// `i64` primitive.
    I64,
    /// `u8` primitive.
    U8,
    /// `u32` primitive.
    U32,
    /// `u64` primitive.
    U64,
    /// [`U128`] large unsigned integer type.
    U128,
    /// [`U256`] large unsigned integer type.
    U256,
    /// [`U512`] large unsigned integer type.
    U512,
    /// `()` primitive.
    Unit,
    /// `String` primitive.
    String,
    /// [`URef`] type.
    URef,
    /// [`PublicKey`] type.
    PublicKey,
    /// `Option` of a `CLType`.
    Option(Box<CLType>),
    /// Variable-length list of a single `CLType` (comparable to a `Vec`).
    List(Box<CLType>),
    /// Fixed-length list of `u8` (comparable to `[u8; N]`).
    ByteArray(u32),
    /// 1-ary tuple of a `CLType`.
    Tuple1([Box<CLType>; 1]),
    /// 2-ary tuple of `CLType`s.
    Tuple2([Box<CLType>; 2]),
    /// 3-ary tuple of `CLType`s.
    Tuple3([Box<CLType>; 3]),
}

impl CLType {
    /// Returns an `Option` of `inner`.
    pub fn option(inner: CLType) -> Self {
        CLType::Option(Box::new(inner))
    }

    /// Returns a `List` of `element`.
    pub fn list(element: CLType) -> Self {
        CLType::List(Box::new(element))
    }

    /// Returns a 1-ary tuple.
    pub fn tuple1(t0: CLType) -> Self {
        CLType::Tuple1([Box::new(t0)])
    }

    /// Returns a 2-ary tuple.
    pub fn tuple2(t0: CLType, t1: CLType) -> Self {
        CLType::Tuple2([Box::new(t0), Box::new(t1)])
    }

    /// Returns a 3-ary tuple.
    pub fn tuple3(t0: CLType, t1: CLType, t2: CLType) -> Self {
        CLType::Tuple3([Box::new(t0), Box::new(t1), Box::new(t2)])
    }

    fn tag(&self) -> u8 {
        match self {
            CLType::Bool => CL_TYPE_TAG_BOOL,
            CLType::I32 => CL_TYPE_TAG_I32,
            CLType::I64 => CL_TYPE_TAG_I64,
            CLType::U8 => CL_TYPE_TAG_U8,
            CLType::U32 => CL_TYPE_TAG_U32,
            CLType::U64 => CL_TYPE_TAG_U64,
            CLType::U128 => CL_TYPE_TAG_U128,
            CLType::U256 => CL_TYPE_TAG_U256,
            CLType::U512 => CL_TYPE_TAG_U512,
            CLType::Unit => CL_TYPE_TAG_UNIT,
            CLType::String => CL_TYPE_TAG_STRING,
            CLType::URef => CL_TYPE_TAG_UREF,
            CLType::PublicKey => CL_TYPE_TAG_PUBLIC_KEY,
            CLType::Option(_) => CL_TYPE_TAG_OPTION,
            CLType::List(_) => CL_TYPE_TAG_LIST,
            CLType::ByteArray(_) => CL_TYPE_TAG_BYTE_ARRAY,
            CLType::Tuple1(_) => CL_TYPE_TAG_TUPLE1,
            CLType::Tuple2(_) => CL_TYPE_TAG_TUPLE2,
            CLType::Tuple3(_) => CL_TYPE_TAG_TUPLE3,
        }
    }

    pub(crate) fn append_bytes(&self, stream: &mut Vec<u8>) -> Result<(), Error> {
        stream.push(self.tag());
        match self {
            CLType::Option(inner) | CLType::List(inner) => inner.append_bytes(stream)?,
            CLType::ByteArray(length) => length.write_bytes(stream)?,
            CLType::Tuple1(types) => append_all(types, stream)?,
            CLType::Tuple2(types) => append_all(types, stream)?,
            CLType::Tuple3(types) => append_all(types, stream)?,
            _ => {}
        }
        Ok(())
    }
}

fn append_all(types: &[Box<CLType>], stream: &mut Vec<u8>) -> Result<(), Error> {
    for cl_type in types {
        cl_type.append_bytes(stream)?;
    }
    Ok(())
}

impl Display for CLType {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            CLType::Option(inner) => write!(formatter, "Option({})", inner),
            CLType::List(inner) => write!(formatter, "List({})", inner),
            CLType::ByteArray(length) => write!(formatter, "ByteArray({})", length),
            CLType::Tuple1([t0]) => write!(formatter, "Tuple1({})", t0),
            CLType::Tuple2([t0, t1]) => write!(formatter, "Tuple2({}, {})", t0, t1),
            CLType::Tuple3([t0, t1, t2]) => write!(formatter, "Tuple3({}, {}, {})", t0, t1, t2),
            simple => write!(formatter, "{:?}", simple),
        }
    }
}

impl ToBytes for CLType {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.append_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                CLType::Bool
                | CLType::I32
                | CLType::I64
                | CLType::U8
                | CLType::U32
                | CLType::U64
                | CLType::U128
                | CLType::U256
                | CLType::U512
                | CLType::Unit
                | CLType::String
                | CLType::URef
                | CLType::PublicKey => 0,
                CLType::Option(inner) | CLType::List(inner) => inner.serialized_length(),
                CLType::ByteArray(_) => U32_SERIALIZED_LENGTH,
                CLType::Tuple1(types) => types.iter().map(|t| t.serialized_length()).sum(),
                CLType::Tuple2(types) => types.iter().map(|t| t.serialized_length()).sum(),
                CLType::Tuple3(types) => types.iter().map(|t| t.serialized_length()).sum(),
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        self.append_bytes(writer)
    }
}

impl FromBytes for CLType {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        depth_limited_from_bytes(0, bytes)
    }
}

fn depth_limited_from_bytes(depth: u8, bytes: &[u8]) -> Result<(CLType, &[u8]), Error> {
    if depth >= CL_TYPE_RECURSION_DEPTH {
        return Err(Error::ExceededRecursionDepth);
    }
    let depth = depth + 1;
    let (tag, remainder) = u8::from_bytes(bytes)?;
    match tag {
        CL_TYPE_TAG_BOOL => Ok((CLType::Bool, remainder)),
        CL_TYPE_TAG_I32 => Ok((CLType::I32, remainder)),
        CL_TYPE_TAG_I64 => Ok((CLType::I64, remainder)),
        CL_TYPE_TAG_U8 => Ok((CLType::U8, remainder)),
        CL_TYPE_TAG_U32 => Ok((CLType::U32, remainder)),
        CL_TYPE_TAG_U64 => Ok((CLType::U64, remainder)),
        CL_TYPE_TAG_U128 => Ok((CLType::U128, remainder)),
        CL_TYPE_TAG_U256 => Ok((CLType::U256, remainder)),
        CL_TYPE_TAG_U512 => Ok((CLType::U512, remainder)),
        CL_TYPE_TAG_UNIT => Ok((CLType::Unit, remainder)),
        CL_TYPE_TAG_STRING => Ok((CLType::String, remainder)),
        CL_TYPE_TAG_UREF => Ok((CLType::URef, remainder)),
        CL_TYPE_TAG_PUBLIC_KEY => Ok((CLType::PublicKey, remainder)),
        CL_TYPE_TAG_OPTION => {
            let (inner, remainder) = depth_limited_from_bytes(depth, remainder)?;
            Ok((CLType::option(inner), remainder))
        }
        CL_TYPE_TAG_LIST => {
            let (element, remainder) = depth_limited_from_bytes(depth, remainder)?;
            Ok((CLType::list(element), remainder))
        }
        CL_TYPE_TAG_BYTE_ARRAY => {
            let (length, remainder) = u32::from_bytes(remainder)?;
            Ok((CLType::ByteArray(length), remainder))
        }
        CL_TYPE_TAG_TUPLE1 => {
            let (t0, remainder) = depth_limited_from_bytes(depth, remainder)?;
            Ok((CLType::tuple1(t0), remainder))
        }
        CL_TYPE_TAG_TUPLE2 => {
            let (t0, remainder) = depth_limited_from_bytes(depth, remainder)?;
            let (t1, remainder) = depth_limited_from_bytes(depth, remainder)?;
            Ok((CLType::tuple2(t0, t1), remainder))
        }
        CL_TYPE_TAG_TUPLE3 => {
            let (t0, remainder) = depth_limited_from_bytes(depth, remainder)?;
            let (t1, remainder) = depth_limited_from_bytes(depth, remainder)?;
            let (t2, remainder) = depth_limited_from_bytes(depth, remainder)?;
            Ok((CLType::tuple3(t0, t1, t2), remainder))
        }
        CL_TYPE_TAG_KEY | CL_TYPE_TAG_RESULT | CL_TYPE_TAG_MAP | CL_TYPE_TAG_ANY => {
            Err(Error::UnsupportedTypeTag(tag))
        }
        _ => Err(Error::Formatting),
    }
}

/// A type which can be described as a [`CLType`].
pub trait CLTyped {
    /// The `CLType` of `Self`.
    fn cl_type() -> CLType;
}

macro_rules! impl_cl_typed {
    ($($type:ty => $cl_type:expr),* $(,)?) => {
        $(
            impl CLTyped for $type {
                fn cl_type() -> CLType {
                    $cl_type
                }
            }
        )*
    };
}

impl_cl_typed! {
    bool => CLType::Bool,
    i32 => CLType::I32,
    i64 => CLType::I64,
    u8 => CLType::U8,
    u32 => CLType::U32,
    u64 => CLType::U64,
    U128 => CLType::U128,
    U256 => CLType::U256,
    U512 => CLType::U512,
    () => CLType::Unit,
    String => CLType::String,
    URef => CLType::URef,
    PublicKey => CLType::PublicKey,
    Bytes => CLType::list(CLType::U8),
}

impl CLTyped for &str {
    fn cl_type() -> CLType {
        CLType::String
    }
}

impl<T: CLTyped> CLTyped for Option<T> {
    fn cl_type() -> CLType {
        CLType::option(T::cl_type())
    }
}

impl<T: CLTyped> CLTyped for Vec<T> {
    fn cl_type() -> CLType {
        CLType::list(T::cl_type())
    }
}

impl<const N: usize> CLTyped for [u8; N] {
    fn cl_type() -> CLType {
        CLType::ByteArray(N as u32)
    }
}

impl<T0: CLTyped> CLTyped for (T0,) {
    fn cl_type() -> CLType {
        CLType::tuple1(T0::cl_type())
    }
}

impl<T0: CLTyped, T1: CLTyped> CLTyped for (T0, T1) {
    fn cl_type() -> CLType {
        CLType::tuple2(T0::cl_type(), T1::cl_type())
    }
}

impl<T0: CLTyped, T1: CLTyped, T2: CLTyped> CLTyped for (T0, T1, T2) {
    fn cl_type() -> CLType {
        CLType::tuple3(T0::cl_type(), T1::cl_type(), T2::cl_type())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nested_types_should_round_trip() {
        let cl_type = CLType::tuple3(
            CLType::option(CLType::list(CLType::U512)),
            CLType::ByteArray(32),
            CLType::tuple1(CLType::PublicKey),
        );
        let bytes = cl_type.to_bytes().unwrap();
        assert_eq!(bytes.len(), cl_type.serialized_length());
        assert_eq!(bytesrepr::deserialize::<CLType>(bytes).unwrap(), cl_type);
    }

    #[test]
    fn should_encode_wire_tags() {
        assert_eq!(CLType::U512.to_bytes().unwrap(), vec![8]);
        assert_eq!(CLType::PublicKey.to_bytes().unwrap(), vec![22]);
        assert_eq!(
            CLType::option(CLType::String).to_bytes().unwrap(),
            vec![13, 10]
        );
        assert_eq!(
            CLType::ByteArray(32).to_bytes().unwrap(),
            vec![15, 32, 0, 0, 0]
        );
        assert_eq!(
            CLType::tuple2(CLType::U8, CLType::Bool).to_bytes().unwrap(),
            vec![19, 3, 0]
        );
    }

    #[test]
    fn unsupported_tags_should_fail_loudly() {
        assert_eq!(CLType::from_bytes(&[11]), Err(Error::UnsupportedTypeTag(11)));
        assert_eq!(CLType::from_bytes(&[17, 3, 3]), Err(Error::UnsupportedTypeTag(17)));
        assert_eq!(CLType::from_bytes(&[99]), Err(Error::Formatting));
    }

    #[test]
    fn should_reject_excessive_nesting() {
        let mut bytes = vec![CL_TYPE_TAG_OPTION; CL_TYPE_RECURSION_DEPTH as usize + 1];
        bytes.push(CL_TYPE_TAG_BOOL);
        assert_eq!(CLType::from_bytes(&bytes), Err(Error::ExceededRecursionDepth));
    }

    #[test]
    fn rust_types_should_describe_themselves() {
        assert_eq!(<Vec<Option<u64>>>::cl_type(), CLType::list(CLType::option(CLType::U64)));
        assert_eq!(<[u8; 32]>::cl_type(), CLType::ByteArray(32));
        assert_eq!(<(u8, String)>::cl_type(), CLType::tuple2(CLType::U8, CLType::String));
    }

    #[test]
    fn should_serialize_to_casper_json_shape() {
        assert_eq!(serde_json::to_string(&CLType::U8).unwrap(), "\"U8\"");
        assert_eq!(
            serde_json::to_string(&CLType::option(CLType::U8)).unwrap(),
            "{\"Option\":\"U8\"}"
        );
        assert_eq!(
            serde_json::to_string(&CLType::ByteArray(32)).unwrap(),
            "{\"ByteArray\":32}"
        );
        let tuple = CLType::tuple2(CLType::U8, CLType::String);
        let json = serde_json::to_string(&tuple).unwrap();
        assert_eq!(json, "{\"Tuple2\":[\"U8\",\"String\"]}");
        assert_eq!(serde_json::from_str::<CLType>(&json).unwrap(), tuple);
    }

    #[test]
    fn display_should_nest() {
        assert_eq!(
            CLType::list(CLType::tuple2(CLType::U8, CLType::ByteArray(4))).to_string(),
            "List(Tuple2(U8, ByteArray(4)))"
        );
    }
}
