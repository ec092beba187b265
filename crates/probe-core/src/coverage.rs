//! Coverage accounting.
//!
//! Methods and constructors are tracked separately; the ratio is
//! `(covered methods + covered constructors) / (all methods + all constructors)`.

use crate::introspect::OperationDescriptor;
use serde::Serialize;
use std::collections::BTreeSet;

/// Covered versus discovered operations of a set of target types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    target_types: BTreeSet<String>,
    all_methods: BTreeSet<OperationDescriptor>,
    all_constructors: BTreeSet<OperationDescriptor>,
    covered_methods: BTreeSet<OperationDescriptor>,
    covered_constructors: BTreeSet<OperationDescriptor>,
}

impl Coverage {
    /// Splits both operation sets into methods and constructors.
    ///
    /// Callers guarantee `covered` is a subset of `all`.
    pub(crate) fn new(
        target_types: impl IntoIterator<Item = String>,
        all: impl IntoIterator<Item = OperationDescriptor>,
        covered: impl IntoIterator<Item = OperationDescriptor>,
    ) -> Self {
        let (all_constructors, all_methods) = all.into_iter().partition(OperationDescriptor::is_constructor);
        let (covered_constructors, covered_methods) =
            covered.into_iter().partition(OperationDescriptor::is_constructor);
        Self {
            target_types: target_types.into_iter().collect(),
            all_methods,
            all_constructors,
            covered_methods,
            covered_constructors,
        }
    }

    /// Unions another coverage into this one.
    pub fn merge(&mut self, other: &Coverage) {
        self.target_types.extend(other.target_types.iter().cloned());
        self.all_methods.extend(other.all_methods.iter().cloned());
        self.all_constructors.extend(other.all_constructors.iter().cloned());
        self.covered_methods.extend(other.covered_methods.iter().cloned());
        self.covered_constructors
            .extend(other.covered_constructors.iter().cloned());
    }

    pub fn target_types(&self) -> &BTreeSet<String> {
        &self.target_types
    }

    pub fn all_methods(&self) -> &BTreeSet<OperationDescriptor> {
        &self.all_methods
    }

    pub fn all_constructors(&self) -> &BTreeSet<OperationDescriptor> {
        &self.all_constructors
    }

    pub fn covered_methods(&self) -> &BTreeSet<OperationDescriptor> {
        &self.covered_methods
    }

    pub fn covered_constructors(&self) -> &BTreeSet<OperationDescriptor> {
        &self.covered_constructors
    }

    pub fn uncovered_methods(&self) -> BTreeSet<OperationDescriptor> {
        self.all_methods
            .difference(&self.covered_methods)
            .cloned()
            .collect()
    }

    pub fn uncovered_constructors(&self) -> BTreeSet<OperationDescriptor> {
        self.all_constructors
            .difference(&self.covered_constructors)
            .cloned()
            .collect()
    }

    pub fn covered_count(&self) -> usize {
        self.covered_methods.len() + self.covered_constructors.len()
    }

    pub fn total_count(&self) -> usize {
        self.all_methods.len() + self.all_constructors.len()
    }

    /// The coverage ratio, or `None` when there is nothing to cover.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> Option<f64> {
        let total = self.total_count();
        if total == 0 {
            return None;
        }
        Some(self.covered_count() as f64 / total as f64)
    }

    /// Coverage as `covered * 100.0 / total`, or `None` when there is nothing to cover.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> Option<f64> {
        let total = self.total_count();
        if total == 0 {
            return None;
        }
        Some(self.covered_count() as f64 * 100.0 / total as f64)
    }

    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary {
            covered: self.covered_count(),
            total: self.total_count(),
            percent: self.percent(),
        }
    }
}

/// Serializable coverage numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub covered: usize,
    pub total: usize,
    pub percent: Option<f64>,
}

/// Formats a coverage percentage the way the report prints it.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:?}", p),
        None => "n/a".to_string(),
    }
}
