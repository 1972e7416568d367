//! Terminal representation cast applied at the root of a registry chain.
//! Only lossless widening is accepted.

use super::ConversionError;
use crate::value::{CqlValue, HostType};
use num_bigint::BigInt;

pub(super) fn widen(value: &CqlValue, target: HostType) -> Result<CqlValue, ConversionError> {
    let widened = match (value, target) {
        (CqlValue::TinyInt(v), HostType::SmallInt) => CqlValue::SmallInt(i16::from(*v)),
        (CqlValue::TinyInt(v), HostType::Int) => CqlValue::Int(i32::from(*v)),
        (CqlValue::TinyInt(v), HostType::BigInt) => CqlValue::BigInt(i64::from(*v)),
        (CqlValue::TinyInt(v), HostType::VarInt) => CqlValue::VarInt(BigInt::from(*v)),

        (CqlValue::SmallInt(v), HostType::Int) => CqlValue::Int(i32::from(*v)),
        (CqlValue::SmallInt(v), HostType::BigInt) => CqlValue::BigInt(i64::from(*v)),
        (CqlValue::SmallInt(v), HostType::VarInt) => CqlValue::VarInt(BigInt::from(*v)),

        (CqlValue::Int(v), HostType::BigInt) => CqlValue::BigInt(i64::from(*v)),
        (CqlValue::Int(v), HostType::VarInt) => CqlValue::VarInt(BigInt::from(*v)),

        (CqlValue::BigInt(v), HostType::VarInt) => CqlValue::VarInt(BigInt::from(*v)),

        (CqlValue::Float(v), HostType::Double) => CqlValue::Double(f64::from(*v)),

        (CqlValue::Set(items), HostType::List) => CqlValue::List(items.clone()),

        _ => return Err(ConversionError::unsupported(value, target)),
    };
    Ok(widened)
}
