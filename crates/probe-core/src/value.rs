//! Dynamic values passed to and returned from target operations.
//!
//! [`Value::Null`] is the absence marker substituted into reference-shaped
//! slots during null-tolerance probing. Instances of target types travel as
//! [`Object`]s: a type name plus a boxed, cloneable, debuggable instance.

use crate::error::TargetError;
use crate::shape::{PrimitiveKind, Shape};
use std::any::Any;
use std::fmt;

/// A target instance that can be stored in a [`Value`].
///
/// Implemented for every `Clone + Debug + Send + Sync + 'static` type.
pub trait Instance: Any + fmt::Debug + Send + Sync {
    fn clone_box(&self) -> Box<dyn Instance>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Instance for T
where
    T: Any + Clone + fmt::Debug + Send + Sync,
{
    fn clone_box(&self) -> Box<dyn Instance> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn Instance> {
    fn clone(&self) -> Self {
        // Dispatch on the inner instance, not on the box itself.
        (**self).clone_box()
    }
}

/// A typed instance of a registered target type.
#[derive(Debug, Clone)]
pub struct Object {
    type_name: String,
    instance: Box<dyn Instance>,
}

impl Object {
    pub fn new<T: Instance>(type_name: impl Into<String>, instance: T) -> Self {
        Self {
            type_name: type_name.into(),
            instance: Box::new(instance),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.instance).as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.instance).as_any_mut().downcast_mut::<T>()
    }
}

/// A dynamically typed argument or return value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absence marker.
    #[default]
    Null,
    /// The result of an operation returning nothing.
    Unit,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Object(Object),
}

impl Value {
    /// Wraps a target instance.
    pub fn object<T: Instance>(type_name: impl Into<String>, instance: T) -> Self {
        Value::Object(Object::new(type_name, instance))
    }

    /// The zero value for a primitive kind.
    pub fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::I8 => Value::I8(0),
            PrimitiveKind::I16 => Value::I16(0),
            PrimitiveKind::I32 => Value::I32(0),
            PrimitiveKind::I64 => Value::I64(0),
            PrimitiveKind::F32 => Value::F32(0.0),
            PrimitiveKind::F64 => Value::F64(0.0),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value can occupy a slot of the given shape.
    pub fn fits(&self, shape: &Shape) -> bool {
        match (self, shape) {
            (Value::Unit, Shape::Void) => true,
            (Value::Null, Shape::Reference(_)) => true,
            (Value::Str(_), Shape::Reference(name)) => name == "String",
            (Value::Object(obj), Shape::Reference(name)) => obj.type_name() == name,
            (Value::Bool(_), Shape::Primitive(PrimitiveKind::Bool))
            | (Value::Char(_), Shape::Primitive(PrimitiveKind::Char))
            | (Value::I8(_), Shape::Primitive(PrimitiveKind::I8))
            | (Value::I16(_), Shape::Primitive(PrimitiveKind::I16))
            | (Value::I32(_), Shape::Primitive(PrimitiveKind::I32))
            | (Value::I64(_), Shape::Primitive(PrimitiveKind::I64))
            | (Value::F32(_), Shape::Primitive(PrimitiveKind::F32))
            | (Value::F64(_), Shape::Primitive(PrimitiveKind::F64)) => true,
            _ => false,
        }
    }

    /// Name of the value's runtime type, used in error messages.
    pub fn type_label(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Unit => "()",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "String",
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// Borrows a target instance without validating absence first.
    ///
    /// A `Null` receiver or argument raises a raw `NullDereference`.
    pub fn downcast_ref<T: Any>(&self) -> Result<&T, TargetError> {
        match self {
            Value::Object(obj) => obj.downcast_ref::<T>().ok_or_else(|| {
                TargetError::type_mismatch(format!(
                    "expected {}, got {}",
                    std::any::type_name::<T>(),
                    obj.type_name()
                ))
            }),
            Value::Null => Err(TargetError::null_dereference(format!(
                "dereferenced an absent {}",
                std::any::type_name::<T>()
            ))),
            other => Err(TargetError::type_mismatch(format!(
                "expected {}, got {}",
                std::any::type_name::<T>(),
                other.type_label()
            ))),
        }
    }

    /// Mutable counterpart of [`Value::downcast_ref`].
    pub fn downcast_mut<T: Any>(&mut self) -> Result<&mut T, TargetError> {
        match self {
            Value::Object(obj) => {
                let found = obj.type_name().to_string();
                obj.downcast_mut::<T>().ok_or_else(|| {
                    TargetError::type_mismatch(format!(
                        "expected {}, got {}",
                        std::any::type_name::<T>(),
                        found
                    ))
                })
            }
            Value::Null => Err(TargetError::null_dereference(format!(
                "dereferenced an absent {}",
                std::any::type_name::<T>()
            ))),
            other => Err(TargetError::type_mismatch(format!(
                "expected {}, got {}",
                std::any::type_name::<T>(),
                other.type_label()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Unit => write!(f, "()"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{:?}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{:?}", v),
            Value::F64(v) => write!(f, "{:?}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Object(obj) => write!(f, "{:?}", obj.instance),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Positional arguments of one invocation.
///
/// Offers two access styles: `checked_*` validates absence and raises
/// `IllegalArgument`, while the raw accessors raise `NullDereference`. Bindings
/// pick the style matching how the real target treats its inputs.
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    /// Returns the value at `index`.
    pub fn get(&self, index: usize) -> Result<&Value, TargetError> {
        self.0.get(index).ok_or_else(|| {
            TargetError::new(
                crate::error::ErrorKind::IndexOutOfBounds,
                format!("argument {} missing ({} given)", index, self.0.len()),
            )
        })
    }

    /// Rejects an absent argument with `IllegalArgument`.
    pub fn checked(&self, index: usize, name: &str) -> Result<&Value, TargetError> {
        let value = self.get(index)?;
        if value.is_null() {
            return Err(TargetError::illegal_argument(format!(
                "{} must not be null",
                name
            )));
        }
        Ok(value)
    }

    /// Reads a string without validating absence.
    pub fn str(&self, index: usize) -> Result<&str, TargetError> {
        match self.get(index)? {
            Value::Str(s) => Ok(s),
            Value::Null => Err(TargetError::null_dereference(format!(
                "argument {} is absent",
                index
            ))),
            other => Err(TargetError::type_mismatch(format!(
                "argument {}: expected String, got {}",
                index,
                other.type_label()
            ))),
        }
    }

    /// Reads a string, rejecting absence with `IllegalArgument`.
    pub fn checked_str(&self, index: usize, name: &str) -> Result<&str, TargetError> {
        self.checked(index, name)?;
        self.str(index)
    }

    /// Borrows a target instance without validating absence.
    pub fn object<T: Any>(&self, index: usize) -> Result<&T, TargetError> {
        self.get(index)?.downcast_ref::<T>()
    }

    /// Borrows a target instance, rejecting absence with `IllegalArgument`.
    pub fn checked_object<T: Any>(&self, index: usize, name: &str) -> Result<&T, TargetError> {
        self.checked(index, name)?.downcast_ref::<T>()
    }

    pub fn bool(&self, index: usize) -> Result<bool, TargetError> {
        match self.get(index)? {
            Value::Bool(v) => Ok(*v),
            other => Err(TargetError::type_mismatch(format!(
                "argument {}: expected bool, got {}",
                index,
                other.type_label()
            ))),
        }
    }

    pub fn i32(&self, index: usize) -> Result<i32, TargetError> {
        match self.get(index)? {
            Value::I32(v) => Ok(*v),
            other => Err(TargetError::type_mismatch(format!(
                "argument {}: expected i32, got {}",
                index,
                other.type_label()
            ))),
        }
    }

    pub fn i64(&self, index: usize) -> Result<i64, TargetError> {
        match self.get(index)? {
            Value::I64(v) => Ok(*v),
            other => Err(TargetError::type_mismatch(format!(
                "argument {}: expected i64, got {}",
                index,
                other.type_label()
            ))),
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        size: u32,
    }

    #[test]
    fn test_object_downcast() {
        let mut value = Value::object("Widget", Widget { size: 3 });
        assert_eq!(value.downcast_ref::<Widget>().unwrap().size, 3);

        value.downcast_mut::<Widget>().unwrap().size = 7;
        assert_eq!(value.downcast_ref::<Widget>().unwrap(), &Widget { size: 7 });

        let err = value.downcast_ref::<String>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_null_downcast_is_raw_dereference() {
        let err = Value::Null.downcast_ref::<Widget>().unwrap_err();
        assert!(err.is_null_dereference());
    }

    #[test]
    fn test_cloned_objects_are_independent() {
        let original = Value::object("Widget", Widget { size: 1 });
        let mut copy = original.clone();
        copy.downcast_mut::<Widget>().unwrap().size = 99;
        assert_eq!(original.downcast_ref::<Widget>().unwrap().size, 1);
    }

    #[test]
    fn test_fits_shapes() {
        assert!(Value::Null.fits(&Shape::string()));
        assert!(!Value::Null.fits(&Shape::i32()));
        assert!(Value::I32(0).fits(&Shape::i32()));
        assert!(Value::from("x").fits(&Shape::string()));
        assert!(Value::object("Widget", Widget { size: 0 }).fits(&Shape::reference("Widget")));
        assert!(!Value::object("Widget", Widget { size: 0 }).fits(&Shape::reference("Gadget")));
        assert!(Value::Unit.fits(&Shape::Void));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::F64(100.0).to_string(), "100.0");
        assert_eq!(Value::from("testing").to_string(), "testing");
        assert_eq!(
            Value::object("Widget", Widget { size: 2 }).to_string(),
            "Widget { size: 2 }"
        );
        assert_eq!(Value::from(None::<i32>).to_string(), "null");
    }

    #[test]
    fn test_args_access_styles() {
        let args = Args::new(vec![Value::Null, Value::from("name"), Value::I32(4)]);

        let raw = args.str(0).unwrap_err();
        assert_eq!(raw.kind, ErrorKind::NullDereference);

        let checked = args.checked_str(0, "name").unwrap_err();
        assert_eq!(checked.kind, ErrorKind::IllegalArgument);
        assert!(checked.message.contains("name must not be null"));

        assert_eq!(args.checked_str(1, "name").unwrap(), "name");
        assert_eq!(args.i32(2).unwrap(), 4);
        assert_eq!(args.i32(1).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(args.get(5).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
    }
}
