//! # probe-club
//!
//! A club membership domain checked by the probe harness.
//!
//! - `domain`: `Level`, `Sports`, `Member`, `Trainer` and `SportsClub`
//! - `bindings`: the catalog describing those types, with default values
//! - `checks`: probe configurations plus hand-written contract and
//!   shallow-copy tests
//! - `suites`: the five named suites the `probe-club` binary runs
//!
//! ```no_run
//! use probe_core::TestEngine;
//!
//! let catalog = probe_club::catalog()?;
//! let mut engine = TestEngine::builder()
//!     .register_suites(probe_club::suites::all(&catalog)?)
//!     .build();
//! let results = engine.run();
//! assert!(results.all_successful());
//! # Ok::<(), probe_core::ConfigError>(())
//! ```

pub mod bindings;
pub mod checks;
pub mod domain;
pub mod suites;

pub use bindings::catalog;
pub use domain::{ClubError, Level, Member, Sports, SportsClub, SportsMap, Trainer};
