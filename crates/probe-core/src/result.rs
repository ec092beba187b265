//! Test outcomes.

use crate::error::{ErrorKind, TargetError, TestFault};
use serde::Serialize;
use std::fmt;

/// The immutable outcome of one test run.
///
/// A result does not know which test produced it; aggregators keep that
/// association in their own maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    success: bool,
    unexpected: Vec<TargetError>,
    expected: Vec<TargetError>,
    notes: String,
    tested_objects: Vec<String>,
}

impl TestResult {
    pub fn builder() -> TestResultBuilder {
        TestResultBuilder::default()
    }

    /// A failing result carrying a fault caught at the `run()` boundary.
    pub fn from_fault(fault: &TestFault) -> Self {
        let error = match fault {
            TestFault::Target(e) => e.clone(),
            TestFault::Setup(e) => TargetError::new(ErrorKind::Other("SetupError".into()), e.to_string()),
            TestFault::Config(e) => TargetError::new(ErrorKind::Other("ConfigError".into()), e.to_string()),
            TestFault::Other(msg) => TargetError::new(ErrorKind::Other("TestFault".into()), msg.clone()),
        };
        Self::builder()
            .failure()
            .unexpected(error)
            .note(format!("\ntest aborted: {}", fault))
            .build()
    }

    pub fn successful(&self) -> bool {
        self.success
    }

    pub fn unexpected_errors(&self) -> &[TargetError] {
        &self.unexpected
    }

    pub fn expected_errors(&self) -> &[TargetError] {
        &self.expected
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Snapshots of the objects involved, rendered when they were recorded.
    pub fn tested_objects(&self) -> &[String] {
        &self.tested_objects
    }

    /// Re-opens this result as a builder pre-filled with its contents.
    pub fn to_builder(&self) -> TestResultBuilder {
        TestResultBuilder {
            success: self.success,
            unexpected: self.unexpected.clone(),
            expected: self.expected.clone(),
            notes: self.notes.clone(),
            tested_objects: self.tested_objects.clone(),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Result: [{}]",
            if self.success { "SUCCESS" } else { "FAILURE" }
        )?;
        if !self.unexpected.is_empty() {
            write!(f, "\nThe following unexpected exceptions occurred:")?;
            for e in &self.unexpected {
                write!(f, "\n\t- {}", e)?;
            }
        }
        if !self.expected.is_empty() {
            write!(f, "\nThe following expected exceptions occurred:")?;
            for e in &self.expected {
                write!(f, "\n\t- {}", e)?;
            }
        }
        if !self.notes.trim().is_empty() {
            write!(f, "\nAdditional notes: {}", self.notes)?;
        }
        if !self.tested_objects.is_empty() {
            write!(f, "\nDump of tested objects:")?;
            for obj in &self.tested_objects {
                write!(f, "\n\t- {}", obj)?;
            }
        }
        Ok(())
    }
}

/// Append-only builder for [`TestResult`]. Starts out as a failure.
#[derive(Debug, Clone, Default)]
pub struct TestResultBuilder {
    success: bool,
    unexpected: Vec<TargetError>,
    expected: Vec<TargetError>,
    notes: String,
    tested_objects: Vec<String>,
}

impl TestResultBuilder {
    pub fn success(mut self) -> Self {
        self.success = true;
        self
    }

    pub fn failure(mut self) -> Self {
        self.success = false;
        self
    }

    pub fn result(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Records an error that counts against the test.
    pub fn unexpected(mut self, error: TargetError) -> Self {
        self.unexpected.push(error);
        self
    }

    /// Records an error the test provoked on purpose.
    pub fn expected(mut self, error: TargetError) -> Self {
        self.expected.push(error);
        self
    }

    /// Appends to the notes verbatim.
    pub fn note(mut self, note: impl AsRef<str>) -> Self {
        self.notes.push_str(note.as_ref());
        self
    }

    /// Replaces the notes.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Records a snapshot of an object involved in the run.
    pub fn tested_object(mut self, object: &impl fmt::Display) -> Self {
        self.tested_objects.push(object.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn build(self) -> TestResult {
        TestResult {
            success: self.success,
            unexpected: self.unexpected,
            expected: self.expected,
            notes: self.notes,
            tested_objects: self.tested_objects,
        }
    }
}
