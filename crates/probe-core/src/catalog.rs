//! The process-wide description of everything under test.
//!
//! A [`Catalog`] bundles the [`TypeRegistry`] with the [`DefaultValues`]
//! factory. It is built once at startup, wrapped in an `Arc`, and only read
//! afterwards; tests and probes hold a clone of the `Arc`.

use crate::defaults::DefaultValues;
use crate::error::ConfigError;
use crate::introspect::{TypeInfo, TypeIntrospector, TypeRegistry};
use crate::value::Value;
use std::sync::Arc;

/// Read-only registry of target types and their default values.
#[derive(Debug, Clone)]
pub struct Catalog {
    registry: TypeRegistry,
    defaults: DefaultValues,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn defaults(&self) -> &DefaultValues {
        &self.defaults
    }
}

impl TypeIntrospector for Catalog {
    fn type_info(&self, type_name: &str) -> Option<&TypeInfo> {
        self.registry.type_info(type_name)
    }
}

/// Builder for [`Catalog`].
#[derive(Debug)]
pub struct CatalogBuilder {
    registry: TypeRegistry,
    defaults: DefaultValues,
    errors: Vec<ConfigError>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            registry: TypeRegistry::new(),
            defaults: DefaultValues::with_std(),
            errors: Vec::new(),
        }
    }
}

impl CatalogBuilder {
    /// Registers a type description.
    pub fn register_type(mut self, info: TypeInfo) -> Self {
        if let Err(e) = self.registry.register(info) {
            self.errors.push(e);
        }
        self
    }

    /// Registers the default-value factory for a reference type.
    pub fn register_default<F>(mut self, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.defaults.register(type_name, factory);
        self
    }

    /// Finishes the catalog, reporting the first registration error.
    pub fn build(mut self) -> Result<Arc<Catalog>, ConfigError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        Ok(Arc::new(Catalog {
            registry: self.registry,
            defaults: self.defaults,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    #[test]
    fn test_build_catalog() {
        let catalog = Catalog::builder()
            .register_type(TypeInfo::new("Unit").constructor("new", vec![], |_| {
                Ok(Value::object("Unit", ()))
            }))
            .register_default("Unit", || Value::object("Unit", ()))
            .build()
            .unwrap();

        assert_eq!(catalog.public_operations("Unit").len(), 1);
        assert!(catalog.defaults().get(&Shape::reference("Unit")).is_some());
        assert!(catalog.defaults().get(&Shape::string()).is_some());
    }

    #[test]
    fn test_duplicate_registration_fails_build() {
        let result = Catalog::builder()
            .register_type(TypeInfo::new("A"))
            .register_type(TypeInfo::new("A"))
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateType(name)) if name == "A"));
    }
}
