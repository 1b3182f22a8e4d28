//! Named arguments passed to an execution item at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    cl_type::CLTyped,
    cl_value::{self, CLValue, CLValueError},
};

/// A single named argument.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NamedArg(String, CLValue);

impl NamedArg {
    /// Returns a new `NamedArg`.
    pub fn new(name: String, value: CLValue) -> Self {
        NamedArg(name, value)
    }

    /// Returns the name of the argument.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the value of the argument.
    pub fn cl_value(&self) -> &CLValue {
        &self.1
    }
}

impl ToBytes for NamedArg {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length() + self.1.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)?;
        self.1.write_bytes(writer)
    }
}

impl FromBytes for NamedArg {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (name, remainder) = String::from_bytes(bytes)?;
        let (cl_value, remainder) = CLValue::from_bytes(remainder)?;
        Ok((NamedArg(name, cl_value), remainder))
    }
}

/// Represents a collection of arguments passed to a smart contract.
///
/// Order of insertion is preserved and is part of the encoding.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct RuntimeArgs(Vec<NamedArg>);

impl RuntimeArgs {
    /// Create an empty [`RuntimeArgs`] instance.
    pub fn new() -> RuntimeArgs {
        RuntimeArgs::default()
    }

    /// Gets the first argument named `name`.
    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0
            .iter()
            .find(|named_arg| named_arg.0 == name)
            .map(|named_arg| &named_arg.1)
    }

    /// Gets the length of the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the collection of arguments is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts a new named argument into the collection.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<(), CLValueError>
    where
        K: Into<String>,
        V: CLTyped + ToBytes,
    {
        let cl_value = CLValue::from_t(value)?;
        self.0.push(NamedArg(key.into(), cl_value));
        Ok(())
    }

    /// Inserts a new named argument whose value is already a [`CLValue`].
    pub fn insert_cl_value<K: Into<String>>(&mut self, key: K, cl_value: CLValue) {
        self.0.push(NamedArg(key.into(), cl_value));
    }

    /// Returns all the named args.
    pub fn named_args(&self) -> impl Iterator<Item = &NamedArg> {
        self.0.iter()
    }

    /// Renders the arguments as a JSON object of name to parsed value.
    pub fn to_json(&self) -> Value {
        cl_value::named_values_to_json(
            self.0
                .iter()
                .map(|named_arg| (named_arg.0.as_str(), &named_arg.1)),
        )
    }
}

impl From<Vec<NamedArg>> for RuntimeArgs {
    fn from(values: Vec<NamedArg>) -> Self {
        RuntimeArgs(values)
    }
}

impl ToBytes for RuntimeArgs {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for RuntimeArgs {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (args, remainder) = Vec::<NamedArg>::from_bytes(bytes)?;
        Ok((RuntimeArgs(args), remainder))
    }
}

/// Builds [`RuntimeArgs`] from `name => value` pairs, evaluating to
/// `Result<RuntimeArgs, CLValueError>`.
///
/// ```
/// # use casper_deploy_types::{runtime_args, U512};
/// let args = runtime_args! { "amount" => U512::from(10), "id" => Some(1u64) }.unwrap();
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! runtime_args {
    () => (Ok::<_, $crate::CLValueError>($crate::RuntimeArgs::new()));
    ( $($key:expr => $value:expr,)+ ) => ($crate::runtime_args!($($key => $value),+));
    ( $($key:expr => $value:expr),* ) => {
        {
            let mut named_args = $crate::RuntimeArgs::new();
            let mut result: Result<(), $crate::CLValueError> = Ok(());
            $(
                if result.is_ok() {
                    result = named_args.insert($key, $value);
                }
            )*
            result.map(|()| named_args)
        }
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{cl_type::CLType, uint::U512};

    #[test]
    fn should_preserve_insertion_order() {
        let args = runtime_args! {
            "b" => 2u8,
            "a" => 1u8,
        }
        .unwrap();
        let names: Vec<&str> = args.named_args().map(NamedArg::name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(args.get("a").unwrap().to_t::<u8>().unwrap(), 1);
        assert!(args.get("c").is_none());
    }

    #[test]
    fn should_encode_count_then_name_value_pairs() {
        let args = runtime_args! { "x" => 7u8 }.unwrap();
        assert_eq!(
            args.to_bytes().unwrap(),
            vec![
                1, 0, 0, 0, // count
                1, 0, 0, 0, b'x', // name
                1, 0, 0, 0, 7, // value bytes
                3, // U8 tag
            ]
        );
        let decoded: RuntimeArgs = bytesrepr::deserialize(args.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn empty_args_should_encode_as_zero_count() {
        let args = runtime_args!().unwrap();
        assert!(args.is_empty());
        assert_eq!(args.to_bytes().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn should_accept_prebuilt_values() {
        let mut args = RuntimeArgs::new();
        let list = CLValue::list(vec![
            CLValue::from_t(1i32).unwrap(),
            CLValue::from_t(2i32).unwrap(),
        ])
        .unwrap();
        args.insert_cl_value("list", list);
        assert_eq!(
            args.get("list").unwrap().cl_type(),
            &CLType::list(CLType::I32)
        );
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn to_json_should_render_parsed_values_by_name() {
        let args = runtime_args! {
            "amount" => U512::from(2_500_000_000u64),
            "id" => Option::<u64>::None,
        }
        .unwrap();
        assert_eq!(
            args.to_json(),
            json!({"amount": "2500000000", "id": null})
        );
    }
}
