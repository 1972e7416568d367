//! Converters and null defaults of the global registry.

use super::{ConversionError, RegistryBuilder};
use crate::value::{CqlDuration, CqlValue, HostType};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use num_bigint::BigInt;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::net::IpAddr;
use uuid::Uuid;

type Converted = Result<CqlValue, ConversionError>;

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .converter(HostType::Boolean, to_boolean)
        .converter(HostType::TinyInt, |v| {
            narrow(v, HostType::TinyInt).map(CqlValue::TinyInt)
        })
        .converter(HostType::SmallInt, |v| {
            narrow(v, HostType::SmallInt).map(CqlValue::SmallInt)
        })
        .converter(HostType::Int, |v| narrow(v, HostType::Int).map(CqlValue::Int))
        .converter(HostType::BigInt, |v| {
            narrow(v, HostType::BigInt).map(CqlValue::BigInt)
        })
        .converter(HostType::VarInt, to_varint)
        .converter(HostType::Float, to_float)
        .converter(HostType::Double, |v| {
            to_f64(v, HostType::Double).map(CqlValue::Double)
        })
        .converter(HostType::Decimal, to_decimal)
        .converter(HostType::Text, |v| Ok(CqlValue::Text(v.to_string())))
        .converter(HostType::Bytes, to_bytes)
        .converter(HostType::Uuid, to_uuid)
        .converter(HostType::Inet, to_inet)
        .converter(HostType::Date, to_date)
        .converter(HostType::Time, to_time)
        .converter(HostType::Timestamp, to_timestamp)
        .converter(HostType::Duration, to_duration)
        .converter(HostType::List, to_list)
        .converter(HostType::Set, to_set)
        .converter(HostType::Tuple, to_tuple)
        .null_default(HostType::Boolean, false)
        .null_default(HostType::TinyInt, CqlValue::TinyInt(0))
        .null_default(HostType::SmallInt, CqlValue::SmallInt(0))
        .null_default(HostType::Int, 0)
        .null_default(HostType::BigInt, 0i64)
        .null_default(HostType::VarInt, CqlValue::VarInt(BigInt::from(0)))
        .null_default(HostType::Float, CqlValue::Float(0.0))
        .null_default(HostType::Double, 0.0)
        .null_default(HostType::Decimal, CqlValue::Decimal(Decimal::ZERO))
        .null_default(HostType::Text, "")
        .null_default(HostType::Bytes, CqlValue::Bytes(Vec::new()))
        .null_default(
            HostType::Duration,
            CqlValue::Duration(CqlDuration {
                months: 0,
                days: 0,
                nanoseconds: 0,
            }),
        )
        .null_default(HostType::List, CqlValue::List(Vec::new()))
        .null_default(HostType::Set, CqlValue::Set(Vec::new()))
        .null_default(HostType::Map, CqlValue::Map(Vec::new()))
        .null_default(HostType::Tuple, CqlValue::Tuple(Vec::new()))
}

fn to_boolean(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(CqlValue::Boolean(true)),
            "false" | "0" => Ok(CqlValue::Boolean(false)),
            _ => Err(ConversionError::invalid(
                value,
                HostType::Boolean,
                "expected true or false",
            )),
        },
        v if v.host_type().is_some_and(|t| t.is_integer()) => {
            Ok(CqlValue::Boolean(to_i128(v, HostType::Boolean)? != 0))
        }
        _ => Err(ConversionError::unsupported(value, HostType::Boolean)),
    }
}

/// Integral view of a value, range-checked later by [`narrow`].
fn to_i128(value: &CqlValue, target: HostType) -> Result<i128, ConversionError> {
    match value {
        CqlValue::Boolean(b) => Ok(i128::from(*b)),
        CqlValue::TinyInt(v) => Ok(i128::from(*v)),
        CqlValue::SmallInt(v) => Ok(i128::from(*v)),
        CqlValue::Int(v) => Ok(i128::from(*v)),
        CqlValue::BigInt(v) => Ok(i128::from(*v)),
        CqlValue::VarInt(v) => {
            i128::try_from(v).map_err(|_| ConversionError::out_of_range(value, target))
        }
        CqlValue::Float(v) => float_to_i128(f64::from(*v), value, target),
        CqlValue::Double(v) => float_to_i128(*v, value, target),
        CqlValue::Decimal(d) => {
            if !d.fract().is_zero() {
                return Err(ConversionError::invalid(
                    value,
                    target,
                    "has a fractional part",
                ));
            }
            d.to_i128()
                .ok_or_else(|| ConversionError::out_of_range(value, target))
        }
        CqlValue::Text(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|e| ConversionError::invalid(value, target, e)),
        CqlValue::Timestamp(ts) => Ok(i128::from(ts.timestamp_millis())),
        _ => Err(ConversionError::unsupported(value, target)),
    }
}

fn float_to_i128(f: f64, value: &CqlValue, target: HostType) -> Result<i128, ConversionError> {
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(ConversionError::invalid(
            value,
            target,
            "not an integral number",
        ));
    }
    if f.abs() >= 1e38 {
        return Err(ConversionError::out_of_range(value, target));
    }
    Ok(f as i128)
}

fn narrow<T: TryFrom<i128>>(value: &CqlValue, target: HostType) -> Result<T, ConversionError> {
    let n = to_i128(value, target)?;
    T::try_from(n).map_err(|_| ConversionError::out_of_range(value, target))
}

fn to_varint(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Text(s) => s
            .trim()
            .parse::<BigInt>()
            .map(CqlValue::VarInt)
            .map_err(|e| ConversionError::invalid(value, HostType::VarInt, e)),
        other => to_i128(other, HostType::VarInt).map(|n| CqlValue::VarInt(BigInt::from(n))),
    }
}

fn to_f64(value: &CqlValue, target: HostType) -> Result<f64, ConversionError> {
    match value {
        CqlValue::TinyInt(v) => Ok(f64::from(*v)),
        CqlValue::SmallInt(v) => Ok(f64::from(*v)),
        CqlValue::Int(v) => Ok(f64::from(*v)),
        CqlValue::BigInt(v) => Ok(*v as f64),
        CqlValue::VarInt(v) => i128::try_from(v)
            .map(|n| n as f64)
            .map_err(|_| ConversionError::out_of_range(value, target)),
        CqlValue::Float(v) => Ok(f64::from(*v)),
        CqlValue::Double(v) => Ok(*v),
        CqlValue::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| ConversionError::out_of_range(value, target)),
        CqlValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ConversionError::invalid(value, target, e)),
        _ => Err(ConversionError::unsupported(value, target)),
    }
}

fn to_float(value: &CqlValue) -> Converted {
    let f = to_f64(value, HostType::Float)?;
    if f.is_finite() && f.abs() > f64::from(f32::MAX) {
        return Err(ConversionError::out_of_range(value, HostType::Float));
    }
    Ok(CqlValue::Float(f as f32))
}

fn to_decimal(value: &CqlValue) -> Converted {
    let target = HostType::Decimal;
    let decimal = match value {
        CqlValue::Float(f) => Decimal::from_f32(*f),
        CqlValue::Double(f) => Decimal::from_f64(*f),
        CqlValue::Text(s) => {
            return s
                .trim()
                .parse::<Decimal>()
                .map(CqlValue::Decimal)
                .map_err(|e| ConversionError::invalid(value, target, e))
        }
        CqlValue::Boolean(_) | CqlValue::Timestamp(_) => {
            return Err(ConversionError::unsupported(value, target))
        }
        other => {
            let n = to_i128(other, target)?;
            Decimal::try_from_i128_with_scale(n, 0).ok()
        }
    };
    decimal
        .map(CqlValue::Decimal)
        .ok_or_else(|| ConversionError::out_of_range(value, target))
}

fn to_bytes(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Text(s) => Ok(CqlValue::Bytes(s.as_bytes().to_vec())),
        CqlValue::Uuid(u) => Ok(CqlValue::Bytes(u.as_bytes().to_vec())),
        _ => Err(ConversionError::unsupported(value, HostType::Bytes)),
    }
}

fn to_uuid(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Text(s) => Uuid::parse_str(s.trim())
            .map(CqlValue::Uuid)
            .map_err(|e| ConversionError::invalid(value, HostType::Uuid, e)),
        CqlValue::Bytes(b) => Uuid::from_slice(b)
            .map(CqlValue::Uuid)
            .map_err(|e| ConversionError::invalid(value, HostType::Uuid, e)),
        _ => Err(ConversionError::unsupported(value, HostType::Uuid)),
    }
}

fn to_inet(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Text(s) => s
            .trim()
            .parse::<IpAddr>()
            .map(CqlValue::Inet)
            .map_err(|e| ConversionError::invalid(value, HostType::Inet, e)),
        CqlValue::Bytes(b) => match b.len() {
            4 => {
                let octets: [u8; 4] = [b[0], b[1], b[2], b[3]];
                Ok(CqlValue::Inet(IpAddr::from(octets)))
            }
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(b);
                Ok(CqlValue::Inet(IpAddr::from(octets)))
            }
            n => Err(ConversionError::invalid(
                value,
                HostType::Inet,
                format!("expected 4 or 16 bytes, got {}", n),
            )),
        },
        _ => Err(ConversionError::unsupported(value, HostType::Inet)),
    }
}

fn to_date(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Timestamp(ts) => Ok(CqlValue::Date(ts.date_naive())),
        CqlValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(CqlValue::Date)
            .map_err(|e| ConversionError::invalid(value, HostType::Date, e)),
        _ => Err(ConversionError::unsupported(value, HostType::Date)),
    }
}

fn to_time(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Timestamp(ts) => Ok(CqlValue::Time(ts.time())),
        CqlValue::Text(s) => s
            .trim()
            .parse::<NaiveTime>()
            .map(CqlValue::Time)
            .map_err(|e| ConversionError::invalid(value, HostType::Time, e)),
        CqlValue::BigInt(nanos) => {
            let secs = u32::try_from(nanos / 1_000_000_000).ok();
            let sub = u32::try_from(nanos % 1_000_000_000).ok();
            secs.zip(sub)
                .and_then(|(s, n)| NaiveTime::from_num_seconds_from_midnight_opt(s, n))
                .map(CqlValue::Time)
                .ok_or_else(|| ConversionError::out_of_range(value, HostType::Time))
        }
        _ => Err(ConversionError::unsupported(value, HostType::Time)),
    }
}

fn to_timestamp(value: &CqlValue) -> Converted {
    let target = HostType::Timestamp;
    match value {
        CqlValue::Int(_) | CqlValue::BigInt(_) => {
            let millis = narrow::<i64>(value, target)?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .map(CqlValue::Timestamp)
                .ok_or_else(|| ConversionError::out_of_range(value, target))
        }
        CqlValue::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .map(|dt| CqlValue::Timestamp(dt.and_utc()))
            .ok_or_else(|| ConversionError::out_of_range(value, target)),
        CqlValue::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(CqlValue::Timestamp(dt.with_timezone(&Utc)));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| CqlValue::Timestamp(dt.and_utc()))
                .ok_or_else(|| {
                    ConversionError::invalid(value, target, "expected RFC 3339 or yyyy-mm-dd")
                })
        }
        _ => Err(ConversionError::unsupported(value, target)),
    }
}

fn to_duration(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Int(_) | CqlValue::BigInt(_) => {
            let nanoseconds = narrow::<i64>(value, HostType::Duration)?;
            Ok(CqlValue::Duration(CqlDuration {
                months: 0,
                days: 0,
                nanoseconds,
            }))
        }
        _ => Err(ConversionError::unsupported(value, HostType::Duration)),
    }
}

fn to_list(value: &CqlValue) -> Converted {
    match value {
        CqlValue::Set(items) | CqlValue::Tuple(items) => Ok(CqlValue::List(items.clone())),
        _ => Err(ConversionError::unsupported(value, HostType::List)),
    }
}

fn to_set(value: &CqlValue) -> Converted {
    match value {
        CqlValue::List(items) | CqlValue::Tuple(items) => {
            let mut unique: Vec<CqlValue> = Vec::with_capacity(items.len());
            for item in items {
                if !unique.contains(item) {
                    unique.push(item.clone());
                }
            }
            Ok(CqlValue::Set(unique))
        }
        _ => Err(ConversionError::unsupported(value, HostType::Set)),
    }
}

fn to_tuple(value: &CqlValue) -> Converted {
    match value {
        CqlValue::List(items) | CqlValue::Set(items) => Ok(CqlValue::Tuple(items.clone())),
        _ => Err(ConversionError::unsupported(value, HostType::Tuple)),
    }
}
