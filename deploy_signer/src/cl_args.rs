//! Conversion of TOML-described runtime arguments into [`CLValue`]s.

use anyhow::{anyhow, bail, Context, Error};
use toml::Value;

use casper_deploy_types::{CLType, CLValue, PublicKey, RuntimeArgs, U128, U256, U512};

use crate::config::ArgConfig;

/// Builds the runtime args for `args`, preserving their order.
pub fn runtime_args(args: &[ArgConfig]) -> Result<RuntimeArgs, Error> {
    let mut runtime_args = RuntimeArgs::new();
    for arg in args {
        let cl_value = cl_value(&arg.cl_type, arg.value.as_ref())
            .with_context(|| format!("Error building argument '{}'", arg.name))?;
        runtime_args.insert_cl_value(arg.name.clone(), cl_value);
    }
    Ok(runtime_args)
}

/// Converts `value` to a [`CLValue`] of type `cl_type`.
pub fn cl_value(cl_type: &CLType, value: Option<&Value>) -> Result<CLValue, Error> {
    match (cl_type, value) {
        (CLType::Unit, None) => Ok(CLValue::from_t(())?),
        (CLType::Option(inner), None) => Ok(CLValue::option((**inner).clone(), None)?),
        (CLType::Option(inner), Some(value)) => {
            let inner_value = cl_value(inner, Some(value))?;
            Ok(CLValue::option((**inner).clone(), Some(inner_value))?)
        }
        (_, None) => bail!("missing value for {}", cl_type),
        (_, Some(value)) => present_value(cl_type, value),
    }
}

fn present_value(cl_type: &CLType, value: &Value) -> Result<CLValue, Error> {
    let cl_value = match cl_type {
        CLType::Bool => CLValue::from_t(expect_bool(value)?)?,
        CLType::I32 => CLValue::from_t(i32::try_from(expect_integer(value)?)?)?,
        CLType::I64 => CLValue::from_t(expect_integer(value)?)?,
        CLType::U8 => CLValue::from_t(u8::try_from(expect_integer(value)?)?)?,
        CLType::U32 => CLValue::from_t(u32::try_from(expect_integer(value)?)?)?,
        CLType::U64 => match value {
            Value::String(text) => CLValue::from_t(text.parse::<u64>()?)?,
            _ => CLValue::from_t(u64::try_from(expect_integer(value)?)?)?,
        },
        CLType::U128 => CLValue::from_t(U128::from_dec_str(&decimal(value)?)?)?,
        CLType::U256 => CLValue::from_t(U256::from_dec_str(&decimal(value)?)?)?,
        CLType::U512 => CLValue::from_t(U512::from_dec_str(&decimal(value)?)?)?,
        CLType::Unit => bail!("Unit takes no value"),
        CLType::String => CLValue::from_t(expect_str(value)?.to_string())?,
        CLType::URef => CLValue::uref(expect_str(value)?)?,
        CLType::PublicKey => CLValue::public_key(&PublicKey::from_hex(expect_str(value)?)?)?,
        CLType::ByteArray(length) => {
            let bytes = hex::decode(expect_str(value)?)?;
            if bytes.len() != *length as usize {
                bail!("expected {} bytes, got {}", length, bytes.len());
            }
            CLValue::byte_array(bytes)?
        }
        CLType::List(element_type) => {
            let elements = expect_array(value, None)?
                .iter()
                .map(|element| cl_value(element_type, Some(element)))
                .collect::<Result<Vec<_>, _>>()?;
            CLValue::list(elements)?
        }
        CLType::Tuple1([t0]) => {
            let values = expect_array(value, Some(1))?;
            CLValue::tuple1(cl_value(t0, Some(&values[0]))?)?
        }
        CLType::Tuple2([t0, t1]) => {
            let values = expect_array(value, Some(2))?;
            CLValue::tuple2(
                cl_value(t0, Some(&values[0]))?,
                cl_value(t1, Some(&values[1]))?,
            )?
        }
        CLType::Tuple3([t0, t1, t2]) => {
            let values = expect_array(value, Some(3))?;
            CLValue::tuple3(
                cl_value(t0, Some(&values[0]))?,
                cl_value(t1, Some(&values[1]))?,
                cl_value(t2, Some(&values[2]))?,
            )?
        }
        CLType::Option(_) => cl_value(cl_type, Some(value))?,
    };
    Ok(cl_value)
}

fn expect_bool(value: &Value) -> Result<bool, Error> {
    value
        .as_bool()
        .ok_or_else(|| anyhow!("expected a boolean, got {}", value))
}

fn expect_integer(value: &Value) -> Result<i64, Error> {
    value
        .as_integer()
        .ok_or_else(|| anyhow!("expected an integer, got {}", value))
}

fn expect_str(value: &Value) -> Result<&str, Error> {
    value
        .as_str()
        .ok_or_else(|| anyhow!("expected a string, got {}", value))
}

/// Big integers are written as decimal strings, or as integers when they fit.
fn decimal(value: &Value) -> Result<String, Error> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Integer(integer) if *integer >= 0 => Ok(integer.to_string()),
        _ => bail!("expected a non-negative decimal, got {}", value),
    }
}

fn expect_array(value: &Value, expected_len: Option<usize>) -> Result<&Vec<Value>, Error> {
    let array = value
        .as_array()
        .ok_or_else(|| anyhow!("expected an array, got {}", value))?;
    if let Some(expected_len) = expected_len {
        if array.len() != expected_len {
            bail!("expected {} elements, got {}", expected_len, array.len());
        }
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn arg(toml_text: &str) -> ArgConfig {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn scalars_should_convert() {
        let value = cl_value(&CLType::U8, Some(&Value::Integer(255))).unwrap();
        assert_eq!(value.inner_bytes(), &[255]);
        assert!(cl_value(&CLType::U8, Some(&Value::Integer(256))).is_err());

        let value = cl_value(
            &CLType::U64,
            Some(&Value::String(u64::MAX.to_string())),
        )
        .unwrap();
        assert_eq!(value.to_t::<u64>().unwrap(), u64::MAX);

        let value = cl_value(&CLType::U512, Some(&Value::String("1000".into()))).unwrap();
        assert_eq!(value.inner_bytes(), &[2, 0xe8, 0x03]);

        assert!(cl_value(&CLType::Bool, Some(&Value::Integer(1))).is_err());
        assert!(cl_value(&CLType::String, None).is_err());
    }

    #[test]
    fn options_should_use_absence_for_none() {
        let none = cl_value(&CLType::option(CLType::U64), None).unwrap();
        assert_eq!(none.inner_bytes(), &[0]);
        let some = cl_value(&CLType::option(CLType::U64), Some(&Value::Integer(1))).unwrap();
        assert_eq!(some.inner_bytes(), &[1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn composites_should_convert_from_toml() {
        let list = arg(r#"
            name = "names"
            cl_type = { List = "String" }
            value = ["a", "b"]
        "#);
        let tuple = arg(r#"
            name = "pair"
            cl_type = { Tuple2 = ["Bool", "I32"] }
            value = [true, -1]
        "#);
        let bytes = arg(r#"
            name = "tag"
            cl_type = { ByteArray = 2 }
            value = "beef"
        "#);
        let args = runtime_args(&[list, tuple, bytes]).unwrap();
        assert_eq!(
            args.to_json(),
            json!({"names": ["a", "b"], "pair": [true, -1], "tag": "beef"})
        );
    }

    #[test]
    fn invalid_composites_should_be_rejected() {
        let empty_list = arg(r#"
            name = "empty"
            cl_type = { List = "U8" }
            value = []
        "#);
        let error = runtime_args(&[empty_list]).unwrap_err();
        assert!(format!("{:#}", error).contains("'empty'"));

        let short_tuple = arg(r#"
            name = "short"
            cl_type = { Tuple3 = ["U8", "U8", "U8"] }
            value = [1, 2]
        "#);
        assert!(runtime_args(&[short_tuple]).is_err());

        let wrong_width = arg(r#"
            name = "wide"
            cl_type = { ByteArray = 4 }
            value = "beef"
        "#);
        assert!(runtime_args(&[wrong_width]).is_err());

        let bad_uref = arg(r#"
            name = "purse"
            cl_type = "URef"
            value = "uref-00-007"
        "#);
        assert!(runtime_args(&[bad_uref]).is_err());
    }
}
