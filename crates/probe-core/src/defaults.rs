//! Canonical default values per shape.
//!
//! Primitive kinds always map to their zero value. Reference shapes map to
//! whatever was registered for the type name; an unregistered reference shape
//! yields `None`, and probes substitute the absence marker in that slot.

use crate::shape::Shape;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Maps shapes to one canonical representative value.
///
/// Factories run on every [`DefaultValues::get`], so each caller receives a
/// fresh instance and mutations by one probe never leak into another.
#[derive(Clone, Default)]
pub struct DefaultValues {
    factories: BTreeMap<String, Factory>,
}

impl DefaultValues {
    /// Creates a factory knowing only primitive zero values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory that also knows `String` (`"testing"`).
    pub fn with_std() -> Self {
        let mut defaults = Self::new();
        defaults.register("String", || Value::from("testing"));
        defaults
    }

    /// Registers a factory for a reference type, replacing any previous one.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.factories.insert(type_name.into(), Arc::new(factory));
        self
    }

    /// Returns a canonical value for the shape, or `None` if none is registered.
    pub fn get(&self, shape: &Shape) -> Option<Value> {
        match shape {
            Shape::Void => Some(Value::Unit),
            Shape::Primitive(kind) => Some(Value::zero(*kind)),
            Shape::Reference(name) => self.factories.get(name).map(|factory| factory()),
        }
    }

    /// Like [`DefaultValues::get`], degrading to the absence marker.
    pub fn get_or_null(&self, shape: &Shape) -> Value {
        self.get(shape).unwrap_or(Value::Null)
    }

    /// Returns true if a factory is registered for the reference type.
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
}

impl fmt::Debug for DefaultValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValues")
            .field("registered", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::PrimitiveKind;

    #[test]
    fn test_primitives_map_to_zero() {
        let defaults = DefaultValues::new();
        for kind in PrimitiveKind::all() {
            let value = defaults.get(&Shape::Primitive(*kind)).unwrap();
            assert!(value.fits(&Shape::Primitive(*kind)));
        }
        assert!(matches!(defaults.get(&Shape::i32()), Some(Value::I32(0))));
        assert!(matches!(defaults.get(&Shape::bool()), Some(Value::Bool(false))));
    }

    #[test]
    fn test_unregistered_reference_is_absent() {
        let defaults = DefaultValues::new();
        assert!(defaults.get(&Shape::reference("Member")).is_none());
        assert!(defaults.get_or_null(&Shape::reference("Member")).is_null());
    }

    #[test]
    fn test_std_string_default() {
        let defaults = DefaultValues::with_std();
        assert_eq!(defaults.get(&Shape::string()).unwrap().to_string(), "testing");
        assert!(defaults.is_registered("String"));
    }

    #[test]
    fn test_factories_yield_fresh_values() {
        let mut defaults = DefaultValues::new();
        defaults.register("Counter", || Value::object("Counter", vec![1_u8]));

        let mut first = defaults.get(&Shape::reference("Counter")).unwrap();
        first.downcast_mut::<Vec<u8>>().unwrap().push(2);

        let second = defaults.get(&Shape::reference("Counter")).unwrap();
        assert_eq!(second.downcast_ref::<Vec<u8>>().unwrap(), &vec![1_u8]);
    }
}
