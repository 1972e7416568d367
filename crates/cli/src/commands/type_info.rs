//! `type`: show the column mapping for a native type name.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use cqlbridge_core::column_types::{self, OPAQUE_TYPE};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Serialize)]
struct TypeInfo<'a> {
    native_type: &'a str,
    #[serde(flatten)]
    mapping: column_types::TypeMapping,
    storage_code: i32,
    fallback: bool,
}

pub fn type_info(name: &str, format: OutputFormat) -> Result<()> {
    let mapping = column_types::mapping_for(name);
    let info = TypeInfo {
        native_type: name,
        mapping,
        storage_code: mapping.storage_type.code(),
        fallback: mapping.cql_type == OPAQUE_TYPE && !name.trim().eq_ignore_ascii_case(OPAQUE_TYPE),
    };

    if format.is_machine_readable() {
        return output::print_success(format, &info);
    }

    println!(
        "{} {} {}",
        "[Type:".dimmed(),
        name.yellow(),
        "]".dimmed()
    );
    if info.fallback {
        println!("{}", "Not a known type, using the opaque mapping.".yellow());
    }
    println!("  {:<12} {}", "family".dimmed(), mapping.cql_type.bold());
    println!(
        "  {:<12} {:?} ({})",
        "storage".dimmed(),
        mapping.storage_type,
        info.storage_code
    );
    println!("  {:<12} {}", "host".dimmed(), mapping.host_type);
    println!("  {:<12} {}", "precision".dimmed(), mapping.precision);
    println!("  {:<12} {}", "scale".dimmed(), mapping.scale);
    Ok(())
}
