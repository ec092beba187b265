//! Generic probes.
//!
//! Each probe is a [`Test`](crate::Test) whose behavior is fully determined
//! by its target type and a small configuration:
//!
//! - [`StructureCheck`]: declared field layout against expected purposes
//! - [`NullArgumentProbe`]: absence marker in every reference-shaped slot
//! - [`NullReturnProbe`]: no operation may hand back the absence marker

mod null_argument;
mod null_return;
mod structure;

pub use null_argument::NullArgumentProbe;
pub use null_return::{DEFAULT_COMPARATORS, NullReturnProbe};
pub use structure::{FieldPredicate, StructureCheck, StructureFindings};

use crate::catalog::Catalog;
use crate::error::SetupError;
use crate::introspect::{Operation, OperationDescriptor, TypeIntrospector};
use crate::shape::Shape;
use crate::value::Value;

/// A fresh default instance of the target type, used as receiver.
fn fresh_instance(catalog: &Catalog, type_name: &str) -> Result<Value, SetupError> {
    catalog
        .defaults()
        .get(&Shape::reference(type_name))
        .ok_or_else(|| SetupError::NoDefault(type_name.to_string()))
}

fn invokable<'a>(
    catalog: &'a Catalog,
    descriptor: &OperationDescriptor,
) -> Result<&'a Operation, SetupError> {
    catalog
        .operation(descriptor)
        .ok_or_else(|| SetupError::NoInvoker(descriptor.to_string()))
}

/// Renders arguments as ` 'a' 'b'`.
fn quoted(values: &[Value]) -> String {
    values.iter().map(|v| format!(" '{}'", v)).collect()
}
