//! Column Type Mapper
//!
//! Static table from CQL native type names to the relational storage type,
//! host type, precision and scale reported to result-set consumers.
//!
//! Lookups never fail: exact name first, then the unparameterized container
//! family (`list<int>` resolves to `list`), then the opaque `blob` mapping.

use crate::value::HostType;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Canonical name of the opaque/binary fallback mapping.
pub const OPAQUE_TYPE: &str = "blob";

const CONTAINER_FAMILIES: [&str; 4] = ["list", "set", "map", "tuple"];

/// Relational storage type, reported through [`StorageType::code`] using the
/// standard SQL type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    Date,
    Time,
    Timestamp,
    LongVarBinary,
    Other,
    Object,
    Struct,
}

impl StorageType {
    pub fn code(&self) -> i32 {
        match self {
            StorageType::Boolean => 16,
            StorageType::TinyInt => -6,
            StorageType::SmallInt => 5,
            StorageType::Integer => 4,
            StorageType::BigInt => -5,
            StorageType::Real => 7,
            StorageType::Double => 8,
            StorageType::Numeric => 2,
            StorageType::Decimal => 3,
            StorageType::Char => 1,
            StorageType::Varchar => 12,
            StorageType::Date => 91,
            StorageType::Time => 92,
            StorageType::Timestamp => 93,
            StorageType::LongVarBinary => -4,
            StorageType::Other => 1111,
            StorageType::Object => 2000,
            StorageType::Struct => 2002,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    pub cql_type: &'static str,
    pub storage_type: StorageType,
    pub host_type: HostType,
    pub precision: i32,
    pub scale: i32,
}

const fn mapping(
    cql_type: &'static str,
    storage_type: StorageType,
    host_type: HostType,
    precision: i32,
    scale: i32,
) -> TypeMapping {
    TypeMapping {
        cql_type,
        storage_type,
        host_type,
        precision,
        scale,
    }
}

const UNBOUNDED: i32 = i32::MAX;

static OPAQUE_MAPPING: TypeMapping = mapping(
    OPAQUE_TYPE,
    StorageType::LongVarBinary,
    HostType::Bytes,
    UNBOUNDED,
    0,
);

static MAPPINGS: Lazy<HashMap<&'static str, TypeMapping>> = Lazy::new(|| {
    use HostType as H;
    use StorageType as S;

    [
        mapping("ascii", S::Varchar, H::Text, UNBOUNDED, 0),
        mapping("bigint", S::BigInt, H::BigInt, 19, 0),
        OPAQUE_MAPPING,
        mapping("boolean", S::Boolean, H::Boolean, 1, 0),
        mapping("counter", S::BigInt, H::BigInt, 19, 0),
        mapping("date", S::Date, H::Date, 10, 0),
        mapping("decimal", S::Decimal, H::Decimal, 38, 0),
        mapping("double", S::Double, H::Double, 15, 0),
        mapping("duration", S::Other, H::Duration, 0, 0),
        mapping("float", S::Real, H::Float, 7, 0),
        mapping("inet", S::Varchar, H::Inet, 39, 0),
        mapping("int", S::Integer, H::Int, 10, 0),
        mapping("smallint", S::SmallInt, H::SmallInt, 5, 0),
        mapping("text", S::Varchar, H::Text, UNBOUNDED, 0),
        mapping("time", S::Time, H::Time, 18, 9),
        mapping("timestamp", S::Timestamp, H::Timestamp, 23, 3),
        mapping("timeuuid", S::Char, H::Uuid, 36, 0),
        mapping("tinyint", S::TinyInt, H::TinyInt, 3, 0),
        mapping("uuid", S::Char, H::Uuid, 36, 0),
        mapping("varchar", S::Varchar, H::Text, UNBOUNDED, 0),
        mapping("varint", S::Numeric, H::VarInt, UNBOUNDED, 0),
        mapping("list", S::Object, H::List, 0, 0),
        mapping("set", S::Object, H::Set, 0, 0),
        mapping("map", S::Object, H::Map, 0, 0),
        mapping("tuple", S::Struct, H::Tuple, 0, 0),
    ]
    .into_iter()
    .map(|m| (m.cql_type, m))
    .collect()
});

/// Lower-cases, drops whitespace and unwraps `frozen<...>`.
fn normalize(native_name: &str) -> String {
    let mut name: String = native_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    while let Some(inner) = name
        .strip_prefix("frozen<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        name = inner.to_string();
    }
    name
}

fn resolve(native_name: &str) -> &'static TypeMapping {
    let name = normalize(native_name);

    if let Some(found) = MAPPINGS.get(name.as_str()) {
        return found;
    }

    let family = name.split('<').next().unwrap_or_default();
    if CONTAINER_FAMILIES.contains(&family) {
        if let Some(found) = MAPPINGS.get(family) {
            return found;
        }
    }

    tracing::debug!(native_type = %native_name, "Unmapped native type, using opaque mapping");
    &OPAQUE_MAPPING
}

/// Canonical family name for a native type; `blob` when unrecognized.
pub fn cql_type_for(native_name: &str) -> &'static str {
    resolve(native_name).cql_type
}

/// Full mapping for a native type, following the same fallback as [`cql_type_for`].
pub fn mapping_for(native_name: &str) -> TypeMapping {
    *resolve(native_name)
}

pub fn host_type_for(canonical_name: &str) -> HostType {
    resolve(canonical_name).host_type
}

pub fn storage_type_for(canonical_name: &str) -> StorageType {
    resolve(canonical_name).storage_type
}

/// Precision of a registered type; 0 for anything not in the table.
pub fn precision_for(canonical_name: &str) -> i32 {
    MAPPINGS
        .get(normalize(canonical_name).as_str())
        .map(|m| m.precision)
        .unwrap_or(0)
}

/// Scale of a registered type; 0 for anything not in the table.
pub fn scale_for(canonical_name: &str) -> i32 {
    MAPPINGS
        .get(normalize(canonical_name).as_str())
        .map(|m| m.scale)
        .unwrap_or(0)
}
