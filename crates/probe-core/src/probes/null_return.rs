use super::{fresh_instance, invokable, quoted};
use crate::catalog::Catalog;
use crate::error::{ConfigError, TestFault};
use crate::introspect::{OperationDescriptor, TypeIntrospector};
use crate::result::{TestResult, TestResultBuilder};
use crate::test::{Test, TestMeta};
use crate::value::{Args, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Operation names whose only argument must be another instance of the type.
pub const DEFAULT_COMPARATORS: &[&str] = &["equals", "compareTo"];

/// Invokes every value-returning instance method with default arguments and
/// fails if any of them returns the absence marker or raises an error.
#[derive(Debug, Clone)]
pub struct NullReturnProbe {
    meta: TestMeta,
    catalog: Arc<Catalog>,
    type_name: String,
    comparators: BTreeSet<String>,
}

impl NullReturnProbe {
    /// Creates a probe named `{type}NullReturnChecks`.
    pub fn new(
        catalog: Arc<Catalog>,
        type_name: impl Into<String>,
        excludes: &[&str],
    ) -> Result<Self, ConfigError> {
        let type_name = type_name.into();
        let covered: Vec<OperationDescriptor> = catalog
            .public_operations(&type_name)
            .into_iter()
            .filter(|op| op.is_method() && !op.is_static() && !op.returns().is_void())
            .filter(|op| !excludes.contains(&op.name()))
            .collect();
        let meta = TestMeta::new(
            catalog.as_ref(),
            &[type_name.as_str()],
            format!("{}NullReturnChecks", type_name),
            format!(
                "Checks whether 'null' values are returned from methods of {}",
                type_name
            ),
            covered,
        )?;
        Ok(Self {
            meta,
            catalog,
            type_name,
            comparators: DEFAULT_COMPARATORS.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    /// Replaces the set of comparator operation names.
    pub fn with_comparators(mut self, names: &[&str]) -> Self {
        self.comparators = names.iter().map(|s| (*s).to_string()).collect();
        self
    }

    fn arguments(&self, op: &OperationDescriptor) -> Result<Vec<Value>, TestFault> {
        if self.comparators.contains(op.name()) {
            return Ok(vec![fresh_instance(&self.catalog, &self.type_name)?]);
        }
        let defaults = self.catalog.defaults();
        Ok(op.params().iter().map(|p| defaults.get_or_null(p)).collect())
    }

    fn probe(
        &self,
        op: &OperationDescriptor,
        mut result: TestResultBuilder,
    ) -> Result<TestResultBuilder, TestFault> {
        let operation = invokable(&self.catalog, op)?;
        let args = self.arguments(op)?;
        let mut receiver = fresh_instance(&self.catalog, &self.type_name)?;

        let name = op.name();
        let failed = match operation.invoke(Some(&mut receiver), Args::new(args.clone())) {
            Ok(Value::Null) => {
                debug!(operation = %op, "Returned absent value");
                result = result
                    .failure()
                    .note(format!("\n{} returned a null value", name));
                true
            }
            Ok(_) => false,
            Err(error) => {
                debug!(operation = %op, error = %error, "Raised while probing return value");
                result = result
                    .failure()
                    .unexpected(error)
                    .note(format!("\nunexpected Exception caught by '{}'", name));
                true
            }
        };

        if failed && !args.is_empty() {
            result = result.note(format!(". Parameters used: [{} ]", quoted(&args)));
        }
        Ok(result)
    }
}

impl Test for NullReturnProbe {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let receiver = fresh_instance(&self.catalog, &self.type_name)?;
        let mut result = TestResult::builder().success().tested_object(&receiver);
        for op in self.meta.coverage().covered_methods() {
            result = self.probe(op, result)?;
        }
        Ok(result.build())
    }
}
