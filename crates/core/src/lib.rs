//! cqlbridge core: the host value model, the type conversion registry and
//! the column type mapper used when binding parameters and decoding rows.
//!
//! ```text
//!  native type name ──► column_types ──► HostType
//!                                          │
//!  CqlValue ──────────► conversion ◄───────┘
//!                       (derived ─► global ─► widening cast)
//! ```

pub mod column_types;
pub mod conversion;
pub mod value;

pub use column_types::{StorageType, TypeMapping};
pub use conversion::{ConversionError, ConversionRegistry, RegistryBuilder};
pub use value::{CqlDuration, CqlValue, HostType};
