//! # probe-core
//!
//! Introspection-driven test harness.
//!
//! Target types are described once in a [`Catalog`]: their fields and their
//! public constructors and methods, each paired with an invoker. Tests built
//! on top of the catalog know which operations they cover, generic probes
//! synthesize inputs without per-operation code, and the engine aggregates
//! results and coverage into a fixed-format report.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog    │────▶│    Tests    │────▶│  TestSuite  │
//! │ (introspect, │     │  (probes,   │     └─────────────┘
//! │  defaults)   │     │ hand-made)  │            │
//! └──────────────┘     └─────────────┘            ▼
//!                                          ┌─────────────┐     ┌──────────┐
//!                                          │ TestEngine  │────▶│ Reporter │
//!                                          └─────────────┘     └──────────┘
//! ```
//!
//! ## Modules
//!
//! - `introspect`: operation and field descriptors, `TypeIntrospector`
//! - `defaults`: canonical default values per shape
//! - `test`, `result`: the test contract and its outcome record
//! - `probes`: structure, null-argument and null-return probes
//! - `suite`, `engine`: aggregation
//! - `report`: summary and full-detail rendering
//! - `config`: YAML harness configuration

mod catalog;
mod config;
mod coverage;
mod defaults;
mod engine;
mod error;
mod introspect;
pub mod probes;
mod report;
mod result;
mod shape;
mod suite;
mod value;

pub use catalog::{Catalog, CatalogBuilder};
pub use config::HarnessConfig;
pub use coverage::{Coverage, CoverageSummary, format_percent};
pub use defaults::DefaultValues;
pub use engine::{EngineResults, TestEngine, TestEngineBuilder};
pub use error::{ConfigError, ErrorKind, ReportError, SetupError, TargetError, TestFault};
pub use introspect::{
    FieldDescriptor, Invoker, Operation, OperationDescriptor, OperationKind, TypeInfo,
    TypeIntrospector, TypeRegistry, Visibility,
};
pub use probes::{FieldPredicate, NullArgumentProbe, NullReturnProbe, StructureCheck};
pub use report::{
    ReportLayout, RunSummary, SuiteSummary, TablePrinter, render_full_report, write_full_report,
    write_summary,
};
pub use result::{TestResult, TestResultBuilder};
pub use shape::{PrimitiveKind, Shape, TypeExpr};
pub use suite::{TestRecord, TestResults, TestSuite};
pub use test::{SharedTest, Test, TestMeta};
pub use value::{Args, Instance, Object, Value};
