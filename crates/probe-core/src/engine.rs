//! The test engine.
//!
//! The engine runs every registered suite and isolated test, one at a time in
//! registration order, then writes the summary report to its sink and,
//! when configured, the full-detail report to a file.

use crate::coverage::Coverage;
use crate::report::{self, ReportLayout, RunSummary};
use crate::result::TestResult;
use crate::suite::{TestResults, TestSuite};
use crate::test::SharedTest;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Orchestrates suites and isolated tests.
pub struct TestEngine {
    sink: Box<dyn Write + Send>,
    full_output: Option<PathBuf>,
    layout: ReportLayout,
    suites: Vec<TestSuite>,
    isolated: Vec<SharedTest>,
}

impl TestEngine {
    pub fn builder() -> TestEngineBuilder {
        TestEngineBuilder::default()
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    pub fn isolated_tests(&self) -> &[SharedTest] {
        &self.isolated
    }

    pub fn full_output(&self) -> Option<&Path> {
        self.full_output.as_deref()
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Union of the coverage of every suite and isolated test.
    pub fn coverage(&self) -> Coverage {
        let mut coverage = Coverage::default();
        for suite in &self.suites {
            coverage.merge(&suite.coverage());
        }
        for test in &self.isolated {
            coverage.merge(test.meta().coverage());
        }
        coverage
    }

    /// Runs everything without reporting.
    pub fn execute(&self) -> EngineResults {
        info!(
            suites = self.suites.len(),
            isolated = self.isolated.len(),
            "Starting test run"
        );
        let suites = self
            .suites
            .iter()
            .map(|suite| (suite.clone(), suite.run()))
            .collect();

        let mut isolated = TestResults::new();
        for test in &self.isolated {
            let result = test.run();
            if !result.successful() {
                warn!(test = test.name(), "Isolated test failed");
            }
            isolated.insert(test.clone(), result);
        }

        let results = EngineResults {
            suites,
            isolated,
            coverage: self.coverage(),
        };
        info!(
            successes = results.total_successes(),
            failures = results.total_failures(),
            "Test run complete"
        );
        results
    }

    /// Runs everything, writes the summary to the sink and the full report
    /// to the configured path.
    ///
    /// Reporting failures are logged and never affect the returned results.
    pub fn run(&mut self) -> EngineResults {
        let results = self.execute();

        let full_output = self.full_output.clone();
        if let Err(e) = self.report(&results) {
            error!(error = %e, "Failed to write summary report");
        }
        if let Some(path) = full_output {
            if let Err(e) = report::write_full_report(&path, &results) {
                error!(error = %e, "Failed to write full test output");
            }
        }
        results
    }

    fn report(&mut self, results: &EngineResults) -> io::Result<()> {
        report::write_summary(
            &mut self.sink,
            &self.layout,
            results,
            self.full_output.as_deref(),
        )?;
        self.sink.flush()
    }

    /// Human-readable summary of what the engine will run.
    pub fn describe(&self) -> String {
        let coverage = self.coverage();
        let mut out = String::from("[TESTENGINE]\ncovered classes: [");
        for ty in coverage.target_types() {
            out.push(' ');
            out.push_str(ty);
        }
        out.push_str(" ]\ntotal coverage: ");
        out.push_str(&crate::coverage::format_percent(coverage.percent()));
        out.push_str("%\nTest Suites: [");
        for suite in &self.suites {
            out.push_str(" '");
            out.push_str(suite.name());
            out.push('\'');
        }
        out.push_str(" ]\nIsolated Tests: [");
        for test in &self.isolated {
            out.push(' ');
            out.push_str(test.name());
        }
        out.push_str(" ]");
        out
    }
}

impl std::fmt::Debug for TestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestEngine")
            .field("full_output", &self.full_output)
            .field("layout", &self.layout)
            .field("suites", &self.suites)
            .field("isolated", &self.isolated)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TestEngine`].
///
/// Suites are identified by name and tests by test name; registering a
/// second suite or test under a name already present is ignored.
pub struct TestEngineBuilder {
    sink: Box<dyn Write + Send>,
    full_output: Option<PathBuf>,
    layout: ReportLayout,
    suites: Vec<TestSuite>,
    isolated: Vec<SharedTest>,
}

impl Default for TestEngineBuilder {
    fn default() -> Self {
        Self {
            sink: Box::new(io::stdout()),
            full_output: None,
            layout: ReportLayout::default(),
            suites: Vec::new(),
            isolated: Vec::new(),
        }
    }
}

impl TestEngineBuilder {
    /// Sets the summary sink (defaults to stdout).
    pub fn sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Enables the full-detail report at `path`.
    pub fn full_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.full_output = Some(path.into());
        self
    }

    pub fn layout(mut self, layout: ReportLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn register_suite(mut self, suite: TestSuite) -> Self {
        if self.suites.iter().any(|s| s.name() == suite.name()) {
            warn!(suite = suite.name(), "Suite already registered, ignoring");
        } else {
            self.suites.push(suite);
        }
        self
    }

    pub fn register_suites(self, suites: impl IntoIterator<Item = TestSuite>) -> Self {
        suites
            .into_iter()
            .fold(self, TestEngineBuilder::register_suite)
    }

    pub fn register_test(mut self, test: SharedTest) -> Self {
        if self.isolated.contains(&test) {
            warn!(test = test.name(), "Isolated test already registered, ignoring");
        } else {
            self.isolated.push(test);
        }
        self
    }

    pub fn register_tests(self, tests: impl IntoIterator<Item = SharedTest>) -> Self {
        tests.into_iter().fold(self, TestEngineBuilder::register_test)
    }

    /// Registers every test of the suite as an isolated test.
    pub fn register_all_as_isolated(self, suite: &TestSuite) -> Self {
        self.register_tests(suite.tests().iter().cloned())
    }

    pub fn build(self) -> TestEngine {
        TestEngine {
            sink: self.sink,
            full_output: self.full_output,
            layout: self.layout,
            suites: self.suites,
            isolated: self.isolated,
        }
    }
}

/// Everything one engine run produced.
#[derive(Debug, Clone)]
pub struct EngineResults {
    suites: Vec<(TestSuite, TestResults)>,
    isolated: TestResults,
    coverage: Coverage,
}

impl EngineResults {
    /// Per-suite results, in registration order.
    pub fn suites(&self) -> &[(TestSuite, TestResults)] {
        &self.suites
    }

    pub fn suite(&self, name: &str) -> Option<&TestResults> {
        self.suites
            .iter()
            .find(|(s, _)| s.name() == name)
            .map(|(_, r)| r)
    }

    pub fn isolated(&self) -> &TestResults {
        &self.isolated
    }

    /// Global coverage of the run.
    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Every result, suites first, then isolated tests.
    pub fn all(&self) -> impl Iterator<Item = (&SharedTest, &TestResult)> {
        self.suites
            .iter()
            .flat_map(|(_, results)| results.iter())
            .chain(self.isolated.iter())
    }

    pub fn total_successes(&self) -> usize {
        self.all().filter(|(_, r)| r.successful()).count()
    }

    pub fn total_failures(&self) -> usize {
        self.all().filter(|(_, r)| !r.successful()).count()
    }

    pub fn total_tests(&self) -> usize {
        self.total_successes() + self.total_failures()
    }

    pub fn all_successful(&self) -> bool {
        self.total_failures() == 0
    }

    /// Names of failed tests in run order; a name appears once even if the
    /// test ran in several places.
    pub fn failed_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (test, result) in self.all() {
            if !result.successful() && !names.iter().any(|n| n == test.name()) {
                names.push(test.name().to_string());
            }
        }
        names
    }

    /// Machine-readable summary of the run.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_results(self)
    }
}
