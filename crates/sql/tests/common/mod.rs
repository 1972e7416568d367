use cqlbridge_common::ConnectionDefaults;

#[allow(dead_code)]
pub fn defaults_with_limit(row_limit: u32) -> ConnectionDefaults {
    ConnectionDefaults {
        row_limit,
        ..ConnectionDefaults::default()
    }
}
