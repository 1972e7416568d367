//! Type Conversion Registry
//!
//! Maps a target [`HostType`] to a conversion function and a null-replacement
//! default. Registries are assembled through a [`RegistryBuilder`] and sealed
//! into an immutable [`ConversionRegistry`]; a sealed registry exposes no
//! mutating API. A derived registry consults its own entries first and then
//! delegates to its parent chain, ending at the global registry whose terminal
//! step is a lossless representation cast.

mod cast;
mod converters;
mod error;

pub use error::ConversionError;

use crate::value::{CqlValue, HostType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Conversion closure for one target type.
pub type ConvertFn = Arc<dyn Fn(&CqlValue) -> Result<CqlValue, ConversionError> + Send + Sync>;

/// Name of the root registry built by [`ConversionRegistry::global_defaults`].
pub const GLOBAL_REGISTRY: &str = "global";

/// What a registry knows about one target type. Either half may be absent.
#[derive(Clone, Default)]
pub struct ConverterEntry {
    pub convert: Option<ConvertFn>,
    pub default: Option<CqlValue>,
}

impl fmt::Debug for ConverterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterEntry")
            .field("convert", &self.convert.as_ref().map(|_| "<fn>"))
            .field("default", &self.default)
            .finish()
    }
}

/// Mutable stage of a registry. Registering the same target twice keeps the
/// last registration.
pub struct RegistryBuilder {
    name: String,
    parent: Option<Arc<ConversionRegistry>>,
    entries: HashMap<HostType, ConverterEntry>,
}

impl RegistryBuilder {
    fn new(name: impl Into<String>, parent: Option<Arc<ConversionRegistry>>) -> Self {
        Self {
            name: name.into(),
            parent,
            entries: HashMap::new(),
        }
    }

    /// Register the conversion function for `target`.
    pub fn converter<F>(mut self, target: HostType, f: F) -> Self
    where
        F: Fn(&CqlValue) -> Result<CqlValue, ConversionError> + Send + Sync + 'static,
    {
        self.entries.entry(target).or_default().convert = Some(Arc::new(f));
        self
    }

    /// Register the value substituted for a null when `replace_nulls` is set.
    pub fn null_default(mut self, target: HostType, value: impl Into<CqlValue>) -> Self {
        self.entries.entry(target).or_default().default = Some(value.into());
        self
    }

    pub fn seal(self) -> Arc<ConversionRegistry> {
        tracing::info!(
            registry = %self.name,
            entries = self.entries.len(),
            parent = self.parent.as_ref().map(|p| p.name()).unwrap_or("<root>"),
            "Conversion registry sealed"
        );
        Arc::new(ConversionRegistry {
            name: self.name,
            parent: self.parent,
            entries: self.entries,
        })
    }
}

/// Sealed, read-only registry. Safe to share across threads without locking.
pub struct ConversionRegistry {
    name: String,
    parent: Option<Arc<ConversionRegistry>>,
    entries: HashMap<HostType, ConverterEntry>,
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRegistry")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl ConversionRegistry {
    /// Builder for a root registry with no parent.
    pub fn builder(name: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder::new(name, None)
    }

    /// Builder for a registry that falls back to `parent` for anything it
    /// does not define.
    pub fn derive(parent: &Arc<ConversionRegistry>, name: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder::new(name, Some(Arc::clone(parent)))
    }

    /// Builds the root registry holding the standard converters and null
    /// defaults. Build it once at startup and hand the `Arc` to whoever needs
    /// it; derived registries hold their own reference.
    pub fn global_defaults() -> Arc<ConversionRegistry> {
        converters::register(Self::builder(GLOBAL_REGISTRY)).seal()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<ConversionRegistry>> {
        self.parent.as_ref()
    }

    /// Whether this registry itself (not its parents) converts to `target`.
    pub fn has_converter(&self, target: HostType) -> bool {
        self.entries
            .get(&target)
            .is_some_and(|e| e.convert.is_some())
    }

    /// Null-replacement default for `target`, searching this registry and
    /// then the parent chain.
    pub fn default_for(&self, target: HostType) -> Option<CqlValue> {
        let mut current = Some(self);
        while let Some(registry) = current {
            if let Some(default) = registry.entries.get(&target).and_then(|e| e.default.as_ref()) {
                return Some(default.clone());
            }
            current = registry.parent.as_deref();
        }
        None
    }

    /// Convert `value` to the `target` shape.
    ///
    /// A null converts to null, or to the chain's default for `target` when
    /// `replace_nulls` is set. A value already of the target shape is returned
    /// unchanged.
    pub fn convert(
        &self,
        value: &CqlValue,
        target: HostType,
        replace_nulls: bool,
    ) -> Result<CqlValue, ConversionError> {
        if value.is_null() {
            if replace_nulls {
                return Ok(self.default_for(target).unwrap_or(CqlValue::Null));
            }
            return Ok(CqlValue::Null);
        }

        if value.host_type() == Some(target) {
            return Ok(value.clone());
        }

        self.convert_value(value, target)
    }

    fn convert_value(&self, value: &CqlValue, target: HostType) -> Result<CqlValue, ConversionError> {
        if let Some(convert) = self.entries.get(&target).and_then(|e| e.convert.as_ref()) {
            tracing::trace!(registry = %self.name, %target, "Applying registered converter");
            return convert(value);
        }

        match &self.parent {
            Some(parent) => parent.convert_value(value, target),
            None => cast::widen(value, target),
        }
    }
}
