//! CLI command implementations.

mod convert;
mod translate;
mod type_info;

pub use convert::convert;
pub use translate::translate;
pub use type_info::type_info;
