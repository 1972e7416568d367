//! Host-side value model.
//!
//! [`CqlValue`] is what the execution layer binds into statements and decodes
//! out of rows. [`HostType`] names the runtime shape of a value and is the
//! target of every conversion.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

/// Runtime shape of a host value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    VarInt,
    Float,
    Double,
    Decimal,
    Text,
    Bytes,
    Uuid,
    Inet,
    Date,
    Time,
    Timestamp,
    Duration,
    List,
    Set,
    Map,
    Tuple,
}

impl HostType {
    pub const ALL: [HostType; 21] = [
        HostType::Boolean,
        HostType::TinyInt,
        HostType::SmallInt,
        HostType::Int,
        HostType::BigInt,
        HostType::VarInt,
        HostType::Float,
        HostType::Double,
        HostType::Decimal,
        HostType::Text,
        HostType::Bytes,
        HostType::Uuid,
        HostType::Inet,
        HostType::Date,
        HostType::Time,
        HostType::Timestamp,
        HostType::Duration,
        HostType::List,
        HostType::Set,
        HostType::Map,
        HostType::Tuple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostType::Boolean => "boolean",
            HostType::TinyInt => "tinyint",
            HostType::SmallInt => "smallint",
            HostType::Int => "int",
            HostType::BigInt => "bigint",
            HostType::VarInt => "varint",
            HostType::Float => "float",
            HostType::Double => "double",
            HostType::Decimal => "decimal",
            HostType::Text => "text",
            HostType::Bytes => "bytes",
            HostType::Uuid => "uuid",
            HostType::Inet => "inet",
            HostType::Date => "date",
            HostType::Time => "time",
            HostType::Timestamp => "timestamp",
            HostType::Duration => "duration",
            HostType::List => "list",
            HostType::Set => "set",
            HostType::Map => "map",
            HostType::Tuple => "tuple",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            HostType::TinyInt
                | HostType::SmallInt
                | HostType::Int
                | HostType::BigInt
                | HostType::VarInt
        )
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HostType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown host type '{}'", s))
    }
}

/// CQL `duration`: months, days and nanoseconds are independent components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CqlDuration {
    pub months: i32,
    pub days: i32,
    pub nanoseconds: i64,
}

impl fmt::Display for CqlDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mo{}d{}ns", self.months, self.days, self.nanoseconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CqlValue {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    VarInt(BigInt),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Inet(IpAddr),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    Duration(CqlDuration),
    List(Vec<CqlValue>),
    Set(Vec<CqlValue>),
    Map(Vec<(CqlValue, CqlValue)>),
    Tuple(Vec<CqlValue>),
}

impl CqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CqlValue::Null)
    }

    /// Shape of this value, `None` for `Null`.
    pub fn host_type(&self) -> Option<HostType> {
        let host = match self {
            CqlValue::Null => return None,
            CqlValue::Boolean(_) => HostType::Boolean,
            CqlValue::TinyInt(_) => HostType::TinyInt,
            CqlValue::SmallInt(_) => HostType::SmallInt,
            CqlValue::Int(_) => HostType::Int,
            CqlValue::BigInt(_) => HostType::BigInt,
            CqlValue::VarInt(_) => HostType::VarInt,
            CqlValue::Float(_) => HostType::Float,
            CqlValue::Double(_) => HostType::Double,
            CqlValue::Decimal(_) => HostType::Decimal,
            CqlValue::Text(_) => HostType::Text,
            CqlValue::Bytes(_) => HostType::Bytes,
            CqlValue::Uuid(_) => HostType::Uuid,
            CqlValue::Inet(_) => HostType::Inet,
            CqlValue::Date(_) => HostType::Date,
            CqlValue::Time(_) => HostType::Time,
            CqlValue::Timestamp(_) => HostType::Timestamp,
            CqlValue::Duration(_) => HostType::Duration,
            CqlValue::List(_) => HostType::List,
            CqlValue::Set(_) => HostType::Set,
            CqlValue::Map(_) => HostType::Map,
            CqlValue::Tuple(_) => HostType::Tuple,
        };
        Some(host)
    }

    /// Name used in error messages: the host type, or `null`.
    pub fn type_name(&self) -> &'static str {
        self.host_type().map(|t| t.as_str()).unwrap_or("null")
    }

    /// Renders an element nested in a collection; text is quoted there.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            other => write!(f, "{}", other),
        }
    }
}

fn fmt_elements(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: &[CqlValue],
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_nested(f)?;
    }
    f.write_str(close)
}

impl fmt::Display for CqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlValue::Null => f.write_str("NULL"),
            CqlValue::Boolean(b) => write!(f, "{}", b),
            CqlValue::TinyInt(v) => write!(f, "{}", v),
            CqlValue::SmallInt(v) => write!(f, "{}", v),
            CqlValue::Int(v) => write!(f, "{}", v),
            CqlValue::BigInt(v) => write!(f, "{}", v),
            CqlValue::VarInt(v) => write!(f, "{}", v),
            CqlValue::Float(v) => write!(f, "{}", v),
            CqlValue::Double(v) => write!(f, "{}", v),
            CqlValue::Decimal(v) => write!(f, "{}", v),
            CqlValue::Text(s) => f.write_str(s),
            CqlValue::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            CqlValue::Uuid(u) => write!(f, "{}", u),
            CqlValue::Inet(ip) => write!(f, "{}", ip),
            CqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CqlValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            CqlValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            CqlValue::Duration(d) => write!(f, "{}", d),
            CqlValue::List(items) => fmt_elements(f, "[", "]", items),
            CqlValue::Set(items) => fmt_elements(f, "{", "}", items),
            CqlValue::Tuple(items) => fmt_elements(f, "(", ")", items),
            CqlValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.fmt_nested(f)?;
                    f.write_str(": ")?;
                    v.fmt_nested(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for CqlValue {
    fn from(v: bool) -> Self {
        CqlValue::Boolean(v)
    }
}

impl From<i32> for CqlValue {
    fn from(v: i32) -> Self {
        CqlValue::Int(v)
    }
}

impl From<i64> for CqlValue {
    fn from(v: i64) -> Self {
        CqlValue::BigInt(v)
    }
}

impl From<f64> for CqlValue {
    fn from(v: f64) -> Self {
        CqlValue::Double(v)
    }
}

impl From<&str> for CqlValue {
    fn from(v: &str) -> Self {
        CqlValue::Text(v.to_string())
    }
}

impl From<String> for CqlValue {
    fn from(v: String) -> Self {
        CqlValue::Text(v)
    }
}

impl From<Uuid> for CqlValue {
    fn from(v: Uuid) -> Self {
        CqlValue::Uuid(v)
    }
}

impl<T: Into<CqlValue>> From<Option<T>> for CqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_type_roundtrip() {
        for t in HostType::ALL {
            assert_eq!(t.as_str().parse::<HostType>().unwrap(), t);
        }
        assert!("blob".parse::<HostType>().is_err());
    }

    #[test]
    fn test_null_has_no_shape() {
        assert_eq!(CqlValue::Null.host_type(), None);
        assert_eq!(CqlValue::Null.type_name(), "null");
        assert_eq!(CqlValue::from(None::<i32>), CqlValue::Null);
    }

    #[test]
    fn test_display_collections() {
        let list = CqlValue::List(vec![CqlValue::Int(1), CqlValue::Text("a'b".into())]);
        assert_eq!(list.to_string(), "[1, 'a''b']");

        let map = CqlValue::Map(vec![(CqlValue::Text("k".into()), CqlValue::BigInt(2))]);
        assert_eq!(map.to_string(), "{'k': 2}");

        assert_eq!(CqlValue::Bytes(vec![0xca, 0xfe]).to_string(), "0xcafe");
    }
}
