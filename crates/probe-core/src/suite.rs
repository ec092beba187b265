//! Named groups of tests.

use crate::coverage::{Coverage, format_percent};
use crate::error::ConfigError;
use crate::result::TestResult;
use crate::test::SharedTest;
use serde::Serialize;
use tracing::{info, warn};

/// Results keyed by test, in run order.
///
/// Keys compare by test name, so inserting a result for a test whose name is
/// already present replaces the earlier entry in place.
#[derive(Debug, Clone, Default)]
pub struct TestResults {
    entries: Vec<(SharedTest, TestResult)>,
}

impl TestResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, test: SharedTest, result: TestResult) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == test) {
            entry.1 = result;
        } else {
            self.entries.push((test, result));
        }
    }

    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.entries
            .iter()
            .find(|(t, _)| t.name() == name)
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SharedTest, &TestResult)> {
        self.entries.iter().map(|(t, r)| (t, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn successes(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.successful()).count()
    }

    pub fn failures(&self) -> usize {
        self.len() - self.successes()
    }

    /// Names of the failed tests, in run order.
    pub fn failed_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, r)| !r.successful())
            .map(|(t, _)| t.name().to_string())
            .collect()
    }

    /// Serializable per-test outcomes.
    pub fn records(&self) -> Vec<TestRecord> {
        self.entries
            .iter()
            .map(|(t, r)| TestRecord {
                name: t.name().to_string(),
                result: r.clone(),
            })
            .collect()
    }
}

/// One test name with its result.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    pub name: String,
    pub result: TestResult,
}

/// A named, ordered group of tests.
#[derive(Debug, Clone)]
pub struct TestSuite {
    name: String,
    tests: Vec<SharedTest>,
}

impl TestSuite {
    /// Creates a suite. Tests sharing a name collapse into the first one.
    pub fn new(name: impl Into<String>, tests: impl IntoIterator<Item = SharedTest>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::Empty("suite name"));
        }
        let mut unique: Vec<SharedTest> = Vec::new();
        for test in tests {
            if unique.contains(&test) {
                warn!(suite = %name, test = test.name(), "Duplicate test name in suite, ignoring");
                continue;
            }
            unique.push(test);
        }
        Ok(Self {
            name,
            tests: unique,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests(&self) -> &[SharedTest] {
        &self.tests
    }

    /// Union of the member tests' coverage.
    pub fn coverage(&self) -> Coverage {
        let mut coverage = Coverage::default();
        for test in &self.tests {
            coverage.merge(test.meta().coverage());
        }
        coverage
    }

    /// Runs every member test, in order.
    pub fn run(&self) -> TestResults {
        info!(suite = %self.name, tests = self.tests.len(), "Running suite");
        let mut results = TestResults::new();
        for test in &self.tests {
            let result = test.run();
            if !result.successful() {
                warn!(suite = %self.name, test = test.name(), "Test failed");
            }
            results.insert(test.clone(), result);
        }
        results
    }

    /// Human-readable summary used in the full-detail report.
    pub fn describe(&self) -> String {
        let coverage = self.coverage();
        let mut out = format!("[TESTSUITE] {}\ncovered classes: [", self.name);
        for ty in coverage.target_types() {
            out.push(' ');
            out.push_str(ty);
        }
        out.push_str(" ]\noverall coverage: ");
        out.push_str(&format_percent(coverage.percent()));
        out.push_str("%\nTests: [");
        for test in &self.tests {
            out.push_str(" '");
            out.push_str(test.name());
            out.push('\'');
        }
        out.push_str(" ]");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::TestFault;
    use crate::introspect::{TypeInfo, TypeIntrospector};
    use crate::shape::Shape;
    use crate::test::{Test, TestMeta};
    use crate::value::Value;
    use std::sync::Arc;

    struct Verdict {
        meta: TestMeta,
        pass: bool,
    }

    impl Test for Verdict {
        fn meta(&self) -> &TestMeta {
            &self.meta
        }

        fn check(&self) -> Result<TestResult, TestFault> {
            Ok(TestResult::builder().result(self.pass).build())
        }
    }

    fn catalog() -> Arc<Catalog> {
        Catalog::builder()
            .register_type(
                TypeInfo::new("Door")
                    .method("open", vec![], Shape::Void, |_, _| Ok(Value::Unit))
                    .method("close", vec![], Shape::Void, |_, _| Ok(Value::Unit)),
            )
            .register_type(TypeInfo::new("Key").method("turn", vec![], Shape::Void, |_, _| Ok(Value::Unit)))
            .build()
            .unwrap()
    }

    fn verdict(catalog: &Catalog, name: &str, target: &str, covers: &[&str], pass: bool) -> SharedTest {
        let covered = catalog.methods(target, covers).unwrap();
        SharedTest::new(Verdict {
            meta: TestMeta::new(catalog, &[target], name, "verdict", covered).unwrap(),
            pass,
        })
    }

    #[test]
    fn test_run_collects_results_in_order() {
        let catalog = catalog();
        let suite = TestSuite::new(
            "Doors",
            [
                verdict(&catalog, "b", "Door", &["open"], true),
                verdict(&catalog, "a", "Door", &["close"], false),
            ],
        )
        .unwrap();

        let results = suite.run();
        assert_eq!(results.len(), 2);
        assert_eq!(results.successes(), 1);
        assert_eq!(results.failures(), 1);
        assert_eq!(results.failed_names(), vec!["a".to_string()]);
        let order: Vec<_> = results.iter().map(|(t, _)| t.name().to_string()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let catalog = catalog();
        let suite = TestSuite::new(
            "Doors",
            [
                verdict(&catalog, "same", "Door", &["open"], true),
                verdict(&catalog, "same", "Door", &["close"], false),
            ],
        )
        .unwrap();
        assert_eq!(suite.tests().len(), 1);
        assert!(suite.run().get("same").unwrap().successful());
    }

    #[test]
    fn test_coverage_unions_members() {
        let catalog = catalog();
        let suite = TestSuite::new(
            "Mixed",
            [
                verdict(&catalog, "door", "Door", &["open"], true),
                verdict(&catalog, "key", "Key", &["turn"], true),
            ],
        )
        .unwrap();
        let coverage = suite.coverage();
        assert_eq!(coverage.total_count(), 3);
        assert_eq!(coverage.covered_count(), 2);
        assert_eq!(
            suite.describe(),
            "[TESTSUITE] Mixed\ncovered classes: [ Door Key ]\n\
             overall coverage: 66.66666666666667%\nTests: [ 'door' 'key' ]"
        );
    }

    #[test]
    fn test_empty_suite_name_rejected() {
        assert!(matches!(TestSuite::new("", []), Err(ConfigError::Empty(_))));
    }

    #[test]
    fn test_results_insert_replaces_same_name() {
        let catalog = catalog();
        let mut results = TestResults::new();
        results.insert(verdict(&catalog, "x", "Door", &[], true), TestResult::builder().success().build());
        results.insert(verdict(&catalog, "x", "Door", &[], false), TestResult::builder().build());
        assert_eq!(results.len(), 1);
        assert!(!results.get("x").unwrap().successful());
    }
}
