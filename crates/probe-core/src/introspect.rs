//! Operation discovery.
//!
//! Rust has no runtime reflection, so every target type is described once by a
//! hand-maintained [`TypeInfo`]: its fields, constructors and methods, each
//! operation paired with an invoker closure. A [`TypeRegistry`] collects these
//! descriptions and answers the [`TypeIntrospector`] queries the tests and
//! probes are built on.
//!
//! Descriptor sets are `BTreeSet`s ordered by identity, so repeated queries for
//! the same type always yield the same sequence.

use crate::error::{ConfigError, TargetError};
use crate::shape::{Shape, TypeExpr};
use crate::value::{Args, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Visibility of a field or operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Public,
    Crate,
    Private,
}

/// Whether an operation constructs an instance or is a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Constructor,
    Method { is_static: bool },
}

/// Description of one invokable operation of a type.
///
/// Identity is `(declaring type, name, parameter shapes)`; return shape, kind
/// and visibility do not take part in equality, ordering or hashing.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    declaring_type: String,
    name: String,
    params: Vec<Shape>,
    returns: Shape,
    kind: OperationKind,
    visibility: Visibility,
}

impl OperationDescriptor {
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Shape] {
        &self.params
    }

    pub fn returns(&self) -> &Shape {
        &self.returns
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == OperationKind::Constructor
    }

    pub fn is_method(&self) -> bool {
        !self.is_constructor()
    }

    pub fn is_static(&self) -> bool {
        matches!(self.kind, OperationKind::Method { is_static: true })
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Returns true if at least one parameter is reference-shaped.
    pub fn has_reference_param(&self) -> bool {
        self.params.iter().any(|p| !p.is_primitive())
    }

    fn identity(&self) -> (&str, &str, &[Shape]) {
        (&self.declaring_type, &self.name, &self.params)
    }

    /// Long form including visibility, kind and return shape.
    pub fn signature(&self) -> String {
        let vis = match self.visibility {
            Visibility::Public => "pub ",
            Visibility::Crate => "pub(crate) ",
            Visibility::Private => "",
        };
        let stat = if self.is_static() { "static " } else { "" };
        let params = join_shapes(&self.params);
        match self.kind {
            OperationKind::Constructor => {
                format!("{}{}::{}({})", vis, self.declaring_type, self.name, params)
            }
            OperationKind::Method { .. } => format!(
                "{}{}fn {}::{}({}) -> {}",
                vis, stat, self.declaring_type, self.name, params, self.returns
            ),
        }
    }
}

impl PartialEq for OperationDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for OperationDescriptor {}

impl Hash for OperationDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for OperationDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OperationDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({})",
            self.declaring_type,
            self.name,
            join_shapes(&self.params)
        )
    }
}

fn join_shapes(shapes: &[Shape]) -> String {
    shapes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Metadata of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeExpr,
    pub is_static: bool,
    pub visibility: Visibility,
}

/// Invokes an operation: `(receiver, args) -> return value`.
///
/// Constructors and static methods receive `None` as receiver.
pub type Invoker =
    Arc<dyn Fn(Option<&mut Value>, Args) -> Result<Value, TargetError> + Send + Sync>;

fn invoker<F>(f: F) -> Invoker
where
    F: Fn(Option<&mut Value>, Args) -> Result<Value, TargetError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An operation descriptor paired with its invoker.
#[derive(Clone)]
pub struct Operation {
    descriptor: OperationDescriptor,
    invoker: Invoker,
}

impl Operation {
    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    /// Invokes the operation, converting a panic into a `Panic` target error.
    pub fn invoke(&self, receiver: Option<&mut Value>, args: Args) -> Result<Value, TargetError> {
        let invoker = &self.invoker;
        match catch_unwind(AssertUnwindSafe(|| invoker(receiver, args))) {
            Ok(result) => result,
            Err(payload) => Err(TargetError::from_panic(payload.as_ref())),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// The description of one target type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: String,
    supertype: Option<String>,
    fields: Vec<FieldDescriptor>,
    operations: Vec<Operation>,
}

impl TypeInfo {
    /// Starts describing a type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            fields: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supertype_name(&self) -> Option<&str> {
        self.supertype.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Declares the type this one extends; its public operations are visible
    /// through [`TypeIntrospector::public_operations_in_hierarchy`].
    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.supertype = Some(name.into());
        self
    }

    /// Declares a private instance field.
    pub fn field(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            is_static: false,
            visibility: Visibility::Private,
        });
        self
    }

    /// Declares a static item (a `const` or `static` associated with the type).
    pub fn static_field(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            is_static: true,
            visibility: Visibility::Public,
        });
        self
    }

    /// Declares a public constructor.
    pub fn constructor<F>(self, name: impl Into<String>, params: Vec<Shape>, invoke: F) -> Self
    where
        F: Fn(Args) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        let returns = Shape::Reference(self.name.clone());
        self.operation(
            name.into(),
            params,
            returns,
            OperationKind::Constructor,
            Visibility::Public,
            invoker(move |_, args| invoke(args)),
        )
    }

    /// Declares a public instance method.
    pub fn method<F>(self, name: impl Into<String>, params: Vec<Shape>, returns: Shape, invoke: F) -> Self
    where
        F: Fn(&mut Value, Args) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        self.instance_method(name.into(), params, returns, Visibility::Public, invoke)
    }

    /// Declares a non-public instance method. Never part of the public set.
    pub fn private_method<F>(
        self,
        name: impl Into<String>,
        params: Vec<Shape>,
        returns: Shape,
        invoke: F,
    ) -> Self
    where
        F: Fn(&mut Value, Args) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        self.instance_method(name.into(), params, returns, Visibility::Private, invoke)
    }

    /// Declares a public static method (an associated function).
    pub fn static_method<F>(
        self,
        name: impl Into<String>,
        params: Vec<Shape>,
        returns: Shape,
        invoke: F,
    ) -> Self
    where
        F: Fn(Args) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        self.operation(
            name.into(),
            params,
            returns,
            OperationKind::Method { is_static: true },
            Visibility::Public,
            invoker(move |_, args| invoke(args)),
        )
    }

    fn instance_method<F>(
        self,
        name: String,
        params: Vec<Shape>,
        returns: Shape,
        visibility: Visibility,
        invoke: F,
    ) -> Self
    where
        F: Fn(&mut Value, Args) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        let type_name = self.name.clone();
        self.operation(
            name,
            params,
            returns,
            OperationKind::Method { is_static: false },
            visibility,
            invoker(move |receiver, args| match receiver {
                Some(receiver) => invoke(receiver, args),
                None => Err(TargetError::null_dereference(format!(
                    "instance method on {} invoked without a receiver",
                    type_name
                ))),
            }),
        )
    }

    fn operation(
        mut self,
        name: String,
        params: Vec<Shape>,
        returns: Shape,
        kind: OperationKind,
        visibility: Visibility,
        invoker: Invoker,
    ) -> Self {
        self.operations.push(Operation {
            descriptor: OperationDescriptor {
                declaring_type: self.name.clone(),
                name,
                params,
                returns,
                kind,
                visibility,
            },
            invoker,
        });
        self
    }
}

/// Discovers the operations and fields of target types.
pub trait TypeIntrospector {
    /// Looks up the description of a type.
    fn type_info(&self, type_name: &str) -> Option<&TypeInfo>;

    /// Every public operation declared directly on the type.
    ///
    /// Unknown types and types without public operations yield an empty set.
    fn public_operations(&self, type_name: &str) -> BTreeSet<OperationDescriptor> {
        self.type_info(type_name)
            .map(|info| {
                info.operations()
                    .iter()
                    .map(Operation::descriptor)
                    .filter(|d| d.is_public())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Public operations of the type and all of its supertypes.
    ///
    /// Constructors are never inherited. A supertype method is hidden when a
    /// subtype declares a method with the same name and parameters.
    fn public_operations_in_hierarchy(&self, type_name: &str) -> BTreeSet<OperationDescriptor> {
        let mut result = self.public_operations(type_name);
        let mut seen = BTreeSet::from([type_name.to_string()]);
        let mut current = self
            .type_info(type_name)
            .and_then(|info| info.supertype_name().map(str::to_string));

        while let Some(parent) = current {
            if !seen.insert(parent.clone()) {
                break;
            }
            let inherited: Vec<_> = self
                .public_operations(&parent)
                .into_iter()
                .filter(OperationDescriptor::is_method)
                .filter(|op| {
                    !result
                        .iter()
                        .any(|own| own.name() == op.name() && own.params() == op.params())
                })
                .collect();
            result.extend(inherited);
            current = self
                .type_info(&parent)
                .and_then(|info| info.supertype_name().map(str::to_string));
        }
        result
    }

    /// Fields declared directly on the type, static ones included.
    fn declared_fields(&self, type_name: &str) -> Vec<FieldDescriptor> {
        self.type_info(type_name)
            .map(|info| info.fields().to_vec())
            .unwrap_or_default()
    }

    /// Finds the invokable operation for a descriptor.
    fn operation(&self, descriptor: &OperationDescriptor) -> Option<&Operation> {
        self.type_info(descriptor.declaring_type())?
            .operations()
            .iter()
            .find(|op| op.descriptor() == descriptor)
    }

    /// All public methods with the given name.
    fn methods_named(&self, type_name: &str, name: &str) -> Vec<OperationDescriptor> {
        self.public_operations(type_name)
            .into_iter()
            .filter(|d| d.is_method() && d.name() == name)
            .collect()
    }

    /// The single public method with the given name.
    fn method(&self, type_name: &str, name: &str) -> Result<OperationDescriptor, ConfigError> {
        self.require_type(type_name)?;
        let mut found = self.methods_named(type_name, name);
        if found.len() != 1 {
            return Err(ConfigError::AmbiguousOperation {
                type_name: type_name.to_string(),
                name: name.to_string(),
                found: found.len(),
            });
        }
        Ok(found.remove(0))
    }

    /// Every public method carrying one of the given names.
    fn methods(&self, type_name: &str, names: &[&str]) -> Result<BTreeSet<OperationDescriptor>, ConfigError> {
        self.require_type(type_name)?;
        Ok(names
            .iter()
            .flat_map(|name| self.methods_named(type_name, name))
            .collect())
    }

    /// Every public method with the given name, supertypes included.
    fn methods_named_in_hierarchy(&self, type_name: &str, name: &str) -> Vec<OperationDescriptor> {
        self.public_operations_in_hierarchy(type_name)
            .into_iter()
            .filter(|d| d.is_method() && d.name() == name)
            .collect()
    }

    /// The single public method with the given name, supertypes included.
    fn method_in_hierarchy(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<OperationDescriptor, ConfigError> {
        self.require_type(type_name)?;
        let mut found = self.methods_named_in_hierarchy(type_name, name);
        if found.len() != 1 {
            return Err(ConfigError::AmbiguousOperation {
                type_name: type_name.to_string(),
                name: name.to_string(),
                found: found.len(),
            });
        }
        Ok(found.remove(0))
    }

    /// Every public constructor of the type.
    fn constructors(&self, type_name: &str) -> BTreeSet<OperationDescriptor> {
        self.public_operations(type_name)
            .into_iter()
            .filter(OperationDescriptor::is_constructor)
            .collect()
    }

    /// The public constructor taking exactly the given parameter shapes.
    fn constructor(&self, type_name: &str, params: &[Shape]) -> Result<OperationDescriptor, ConfigError> {
        self.require_type(type_name)?;
        self.constructors(type_name)
            .into_iter()
            .find(|d| d.params() == params)
            .ok_or_else(|| ConfigError::UnknownConstructor {
                type_name: type_name.to_string(),
                params: join_shapes(params),
            })
    }

    /// Fails with [`ConfigError::UnknownType`] if the type is not registered.
    fn require_type(&self, type_name: &str) -> Result<&TypeInfo, ConfigError> {
        self.type_info(type_name)
            .ok_or_else(|| ConfigError::UnknownType(type_name.to_string()))
    }
}

/// The registry of hand-described target types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type description. Names must be unique.
    pub fn register(&mut self, info: TypeInfo) -> Result<(), ConfigError> {
        if info.name().is_empty() {
            return Err(ConfigError::Empty("type name"));
        }
        if self.types.contains_key(info.name()) {
            return Err(ConfigError::DuplicateType(info.name().to_string()));
        }
        self.types.insert(info.name().to_string(), info);
        Ok(())
    }

    /// Names of all registered types.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl TypeIntrospector for TypeRegistry {
    fn type_info(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types.get(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug, Clone)]
    struct Counter {
        count: i32,
    }

    fn counter_type() -> TypeInfo {
        TypeInfo::new("Counter")
            .supertype("Base")
            .field("count", TypeExpr::simple("i32"))
            .static_field("MAX", TypeExpr::simple("i32"))
            .constructor("new", vec![], |_| Ok(Value::object("Counter", Counter { count: 0 })))
            .constructor("with_count", vec![Shape::i32()], |args| {
                Ok(Value::object("Counter", Counter { count: args.i32(0)? }))
            })
            .method("get", vec![], Shape::i32(), |this, _| {
                Ok(Value::I32(this.downcast_ref::<Counter>()?.count))
            })
            .method("add", vec![Shape::i32()], Shape::Void, |this, args| {
                this.downcast_mut::<Counter>()?.count += args.i32(0)?;
                Ok(Value::Unit)
            })
            .method("add", vec![Shape::string()], Shape::Void, |_, args| {
                args.str(0)?;
                Ok(Value::Unit)
            })
            .private_method("reset", vec![], Shape::Void, |this, _| {
                this.downcast_mut::<Counter>()?.count = 0;
                Ok(Value::Unit)
            })
            .static_method("zero", vec![], Shape::i32(), |_| Ok(Value::I32(0)))
            .method("explode", vec![], Shape::Void, |_, _| panic!("counter exploded"))
    }

    fn base_type() -> TypeInfo {
        TypeInfo::new("Base")
            .constructor("new", vec![], |_| Ok(Value::Unit))
            .method("describe", vec![], Shape::string(), |_, _| Ok(Value::from("base")))
            .method("get", vec![], Shape::i32(), |_, _| Ok(Value::I32(-1)))
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(counter_type()).unwrap();
        registry.register(base_type()).unwrap();
        registry
    }

    #[test]
    fn test_public_operations_exclude_private() {
        let registry = registry();
        let ops = registry.public_operations("Counter");
        assert_eq!(ops.len(), 7);
        assert!(ops.iter().all(|d| d.name() != "reset"));
    }

    #[test]
    fn test_public_operations_are_stable() {
        let registry = registry();
        let first: Vec<_> = registry.public_operations("Counter").into_iter().collect();
        let second: Vec<_> = registry.public_operations("Counter").into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_type_yields_empty_set() {
        assert!(registry().public_operations("Nope").is_empty());
    }

    #[test]
    fn test_hierarchy_includes_inherited_methods_only() {
        let registry = registry();
        let ops = registry.public_operations_in_hierarchy("Counter");
        assert!(ops.iter().any(|d| d.name() == "describe"));
        assert!(!ops.iter().any(|d| d.declaring_type() == "Base" && d.is_constructor()));
    }

    #[test]
    fn test_hierarchy_hides_overridden_methods() {
        let registry = registry();
        let get = registry.methods_named_in_hierarchy("Counter", "get");
        assert_eq!(get.len(), 1);
        assert_eq!(get[0].declaring_type(), "Counter");
        assert_eq!(registry.public_operations("Base").len(), 3);
    }

    #[test]
    fn test_descriptor_identity_ignores_return_shape() {
        let a = TypeInfo::new("T").method("f", vec![Shape::i32()], Shape::i32(), |_, _| Ok(Value::Unit));
        let b = TypeInfo::new("T").method("f", vec![Shape::i32()], Shape::string(), |_, _| Ok(Value::Unit));
        assert_eq!(a.operations()[0].descriptor(), b.operations()[0].descriptor());

        let c = TypeInfo::new("T").method("f", vec![Shape::i64()], Shape::i32(), |_, _| Ok(Value::Unit));
        assert_ne!(a.operations()[0].descriptor(), c.operations()[0].descriptor());
    }

    #[test]
    fn test_method_lookup_helpers() {
        let registry = registry();
        assert_eq!(registry.method("Counter", "get").unwrap().name(), "get");
        assert!(matches!(
            registry.method("Counter", "add"),
            Err(ConfigError::AmbiguousOperation { found: 2, .. })
        ));
        assert!(matches!(
            registry.method("Counter", "missing"),
            Err(ConfigError::AmbiguousOperation { found: 0, .. })
        ));
        assert!(matches!(registry.method("Nope", "get"), Err(ConfigError::UnknownType(_))));

        let set = registry.methods("Counter", &["get", "add"]).unwrap();
        assert_eq!(set.len(), 3);

        assert!(registry.method("Counter", "describe").is_err());
        assert_eq!(
            registry.method_in_hierarchy("Counter", "describe").unwrap().declaring_type(),
            "Base"
        );
    }

    #[test]
    fn test_constructor_lookup() {
        let registry = registry();
        assert_eq!(registry.constructors("Counter").len(), 2);
        let ctor = registry.constructor("Counter", &[Shape::i32()]).unwrap();
        assert_eq!(ctor.name(), "with_count");
        assert!(registry.constructor("Counter", &[Shape::string()]).is_err());
    }

    #[test]
    fn test_invoke_through_registry() {
        let registry = registry();
        let ctor = registry.constructor("Counter", &[Shape::i32()]).unwrap();
        let mut counter = registry
            .operation(&ctor)
            .unwrap()
            .invoke(None, Args::new(vec![Value::I32(5)]))
            .unwrap();

        let default_ctor = registry.constructor("Counter", &[]).unwrap();
        assert!(default_ctor.is_constructor());

        let get = registry.method("Counter", "get").unwrap();
        let value = registry.operation(&get).unwrap().invoke(Some(&mut counter), Args::default());
        assert!(matches!(value, Ok(Value::I32(5))));
    }

    #[test]
    fn test_instance_method_without_receiver_is_null_dereference() {
        let registry = registry();
        let get = registry.method("Counter", "get").unwrap();
        let err = registry.operation(&get).unwrap().invoke(None, Args::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NullDereference);
    }

    #[test]
    fn test_panicking_operation_becomes_panic_error() {
        let registry = registry();
        let explode = registry.method("Counter", "explode").unwrap();
        let mut receiver = Value::object("Counter", Counter { count: 0 });
        let err = registry
            .operation(&explode)
            .unwrap()
            .invoke(Some(&mut receiver), Args::default())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Panic);
        assert!(err.message.contains("exploded"));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = registry();
        assert!(matches!(
            registry.register(base_type()),
            Err(ConfigError::DuplicateType(_))
        ));
        assert!(matches!(
            registry.register(TypeInfo::new("")),
            Err(ConfigError::Empty(_))
        ));
    }

    #[test]
    fn test_declared_fields_include_statics() {
        let fields = registry().declared_fields("Counter");
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().any(|f| f.is_static && f.name == "MAX"));
    }

    #[test]
    fn test_signature_rendering() {
        let registry = registry();
        let zero = registry.method("Counter", "zero").unwrap();
        assert_eq!(zero.signature(), "pub static fn Counter::zero() -> i32");
        let ctor = registry.constructor("Counter", &[Shape::i32()]).unwrap();
        assert_eq!(ctor.to_string(), "Counter::with_count(i32)");
    }
}
