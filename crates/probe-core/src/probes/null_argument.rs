use super::{fresh_instance, invokable};
use crate::catalog::Catalog;
use crate::error::{ConfigError, ErrorKind, TestFault};
use crate::introspect::{OperationDescriptor, TypeIntrospector};
use crate::result::{TestResult, TestResultBuilder};
use crate::test::{Test, TestMeta};
use crate::value::{Args, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Invokes every operation with the absence marker in each reference slot.
///
/// Covers every public operation (static methods included) taking at least
/// one reference-shaped parameter, minus the excluded names. Raising an
/// allowed error kind is correct behavior; raising anything else fails the
/// probe. Raising nothing only leaves a note.
#[derive(Debug, Clone)]
pub struct NullArgumentProbe {
    meta: TestMeta,
    catalog: Arc<Catalog>,
    type_name: String,
    allowed: BTreeSet<ErrorKind>,
}

impl NullArgumentProbe {
    /// Creates a probe named `{type}NullParameterChecks`.
    pub fn new(
        catalog: Arc<Catalog>,
        type_name: impl Into<String>,
        allowed: impl IntoIterator<Item = ErrorKind>,
        excludes: &[&str],
    ) -> Result<Self, ConfigError> {
        let type_name = type_name.into();
        let covered: Vec<OperationDescriptor> = catalog
            .public_operations(&type_name)
            .into_iter()
            .filter(OperationDescriptor::has_reference_param)
            .filter(|op| !excludes.contains(&op.name()))
            .collect();
        let meta = TestMeta::new(
            catalog.as_ref(),
            &[type_name.as_str()],
            format!("{}NullParameterChecks", type_name),
            format!(
                "Checks whether 'null' input parameters are handled properly in methods and constructors of {}",
                type_name
            ),
            covered,
        )?;
        Ok(Self {
            meta,
            catalog,
            type_name,
            allowed: allowed.into_iter().collect(),
        })
    }

    pub fn allowed(&self) -> &BTreeSet<ErrorKind> {
        &self.allowed
    }

    fn null_arguments(&self, op: &OperationDescriptor) -> Args {
        let defaults = self.catalog.defaults();
        op.params()
            .iter()
            .map(|shape| {
                if shape.is_primitive() {
                    defaults.get_or_null(shape)
                } else {
                    Value::Null
                }
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn probe(
        &self,
        op: &OperationDescriptor,
        mut result: TestResultBuilder,
    ) -> Result<TestResultBuilder, TestFault> {
        let operation = invokable(&self.catalog, op)?;
        let args = self.null_arguments(op);
        let outcome = if op.is_constructor() || op.is_static() {
            operation.invoke(None, args)
        } else {
            let mut receiver = fresh_instance(&self.catalog, &self.type_name)?;
            operation.invoke(Some(&mut receiver), args)
        };

        let name = op.name();
        match outcome {
            Ok(_) => {
                debug!(operation = %op, "Accepted absent argument");
                result = result.note(format!(
                    "\nCalled '{}' with null value but did not throw exception (may be a problem)",
                    name
                ));
            }
            Err(error) => {
                debug!(operation = %op, error = %error, "Rejected absent argument");
                let null_dereference = error.is_null_dereference();
                if self.allowed.contains(&error.kind) {
                    result = result.expected(error);
                } else {
                    result = result
                        .failure()
                        .unexpected(error)
                        .note(format!("\nunexpected Exception caught by '{}'", name));
                }
                if null_dereference {
                    result = result.note(format!("\nNullDereference caught by '{}'", name));
                }
            }
        }
        Ok(result)
    }
}

impl Test for NullArgumentProbe {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let receiver = fresh_instance(&self.catalog, &self.type_name)?;
        let mut result = TestResult::builder().success().tested_object(&receiver);

        let coverage = self.meta.coverage();
        for op in coverage
            .covered_constructors()
            .iter()
            .chain(coverage.covered_methods())
        {
            result = self.probe(op, result)?;
        }
        Ok(result.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TargetError;
    use crate::introspect::TypeInfo;
    use crate::shape::Shape;

    #[derive(Debug, Clone)]
    struct Tag {
        label: String,
    }

    fn tag_type() -> TypeInfo {
        TypeInfo::new("Tag")
            .constructor("new", vec![Shape::string()], |args| {
                Ok(Value::object(
                    "Tag",
                    Tag {
                        label: args.checked_str(0, "label")?.to_string(),
                    },
                ))
            })
            .method("rename", vec![Shape::string()], Shape::Void, |this, args| {
                this.downcast_mut::<Tag>()?.label = args.str(0)?.to_string();
                Ok(Value::Unit)
            })
            .method("matches", vec![Shape::string(), Shape::bool()], Shape::bool(), |this, args| {
                let label = &this.downcast_ref::<Tag>()?.label;
                Ok(Value::Bool(
                    args.get(0)?.is_null() || args.bool(1)? || label.is_empty(),
                ))
            })
            .method("len", vec![], Shape::i32(), |this, _| {
                Ok(Value::I32(i32::try_from(this.downcast_ref::<Tag>()?.label.len()).unwrap_or(i32::MAX)))
            })
            .static_method("parse", vec![Shape::string()], Shape::reference("Tag"), |args| {
                Ok(Value::object("Tag", Tag { label: args.checked_str(0, "input")?.to_string() }))
            })
    }

    fn catalog(with_default: bool) -> Arc<Catalog> {
        let mut builder = Catalog::builder().register_type(tag_type());
        if with_default {
            builder = builder.register_default("Tag", || {
                Value::object("Tag", Tag { label: "t".into() })
            });
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_covers_reference_taking_operations() {
        let probe = NullArgumentProbe::new(catalog(true), "Tag", [], &["parse"]).unwrap();
        let coverage = probe.meta().coverage();
        assert_eq!(probe.name(), "TagNullParameterChecks");
        assert_eq!(coverage.covered_constructors().len(), 1);
        let names: Vec<_> = coverage.covered_methods().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["matches", "rename"]);
    }

    #[test]
    fn test_allowed_kind_is_expected() {
        let probe = NullArgumentProbe::new(
            catalog(true),
            "Tag",
            [ErrorKind::IllegalArgument, ErrorKind::NullDereference],
            &[],
        )
        .unwrap();
        let result = probe.run();

        assert!(result.successful());
        assert!(result.unexpected_errors().is_empty());
        assert_eq!(result.expected_errors().len(), 3);
        assert!(result.notes().contains("\nNullDereference caught by 'rename'"));
        assert!(result.notes().contains(
            "\nCalled 'matches' with null value but did not throw exception (may be a problem)"
        ));
    }

    #[test]
    fn test_disallowed_kind_fails() {
        let probe = NullArgumentProbe::new(catalog(true), "Tag", [ErrorKind::IllegalArgument], &[]).unwrap();
        let result = probe.run();

        assert!(!result.successful());
        assert_eq!(result.unexpected_errors().len(), 1);
        assert_eq!(result.unexpected_errors()[0].kind, ErrorKind::NullDereference);
        assert!(result.notes().contains("\nunexpected Exception caught by 'rename'"));
        assert!(result.notes().contains("\nNullDereference caught by 'rename'"));
    }

    #[test]
    fn test_missing_receiver_default_aborts_probe() {
        let probe = NullArgumentProbe::new(catalog(false), "Tag", [ErrorKind::IllegalArgument], &[]).unwrap();
        let result = probe.run();
        assert!(!result.successful());
        assert_eq!(
            result.unexpected_errors()[0],
            TargetError::new(
                ErrorKind::Other("SetupError".into()),
                "no default value available for 'Tag'"
            )
        );
    }
}
