//! Tests of the club domain.
//!
//! The generic probes are configured per type here; the hand-written
//! contract and shallow-copy tests live in their own modules.

mod club_contract;
mod copies;
mod level_contract;
mod member_contract;
mod sports_contract;
mod trainer_contract;

pub use club_contract::SportsClubContractTest;
pub use copies::{MemberShallowCopyTest, SportsClubShallowCopyTest, TrainerShallowCopyTest};
pub use level_contract::LevelContractTest;
pub use member_contract::MemberContractTest;
pub use sports_contract::SportsContractTest;
pub use trainer_contract::TrainerContractTest;

use crate::bindings::{LEVEL, MEMBER, SPORTS, SPORTS_CLUB, TRAINER};
use crate::domain::ClubError;
use probe_core::{
    Catalog, ConfigError, ErrorKind, FieldPredicate, NullArgumentProbe, NullReturnProbe,
    StructureCheck, TargetError, TestResult, TestResultBuilder,
};
use std::fmt;
use std::sync::Arc;

pub fn level_structure(catalog: &Arc<Catalog>) -> Result<StructureCheck, ConfigError> {
    StructureCheck::new(catalog.clone(), LEVEL, 0)
}

pub fn sports_structure(catalog: &Arc<Catalog>) -> Result<StructureCheck, ConfigError> {
    StructureCheck::new(catalog.clone(), SPORTS, 0)
}

pub fn member_structure(catalog: &Arc<Catalog>) -> Result<StructureCheck, ConfigError> {
    Ok(StructureCheck::new(catalog.clone(), MEMBER, 2)?
        .purpose("name", FieldPredicate::type_is("String"))
        .purpose(
            "sports",
            FieldPredicate::generic(&["BTreeMap", "HashMap"], &[SPORTS, LEVEL]),
        ))
}

pub fn trainer_structure(catalog: &Arc<Catalog>) -> Result<StructureCheck, ConfigError> {
    Ok(StructureCheck::new(catalog.clone(), TRAINER, 2)?
        .purpose("member", FieldPredicate::type_is(MEMBER))
        .purpose(
            "accreditations",
            FieldPredicate::generic(&["BTreeMap", "HashMap"], &[SPORTS, LEVEL]),
        ))
}

pub fn club_structure(catalog: &Arc<Catalog>) -> Result<StructureCheck, ConfigError> {
    Ok(StructureCheck::new(catalog.clone(), SPORTS_CLUB, 4)?
        .purpose("name", FieldPredicate::type_is("String"))
        .purpose(
            "members",
            // Either a set of members or a map keyed by member name.
            FieldPredicate::new(|field| {
                let ty = &field.ty;
                let keyed = (ty.is("BTreeMap") || ty.is("HashMap"))
                    && ty.arg(1).is_some_and(|v| v.is(MEMBER));
                let set = (ty.is("BTreeSet") || ty.is("HashSet"))
                    && ty.arg(0).is_some_and(|v| v.is(MEMBER));
                keyed || set
            }),
        )
        .purpose(
            "offered_sports",
            FieldPredicate::generic(&["BTreeMap", "HashMap"], &[SPORTS, LEVEL]),
        )
        .purpose("fee_per_sports", FieldPredicate::type_is_any(&["i64", "u64"])))
}

/// Null-argument probe allowing only `IllegalArgument`.
pub fn null_parameters(
    catalog: &Arc<Catalog>,
    type_name: &str,
    excludes: &[&str],
) -> Result<NullArgumentProbe, ConfigError> {
    NullArgumentProbe::new(
        catalog.clone(),
        type_name,
        [ErrorKind::IllegalArgument],
        excludes,
    )
}

/// Operations taking another instance of the receiver's type. `cmp` is the
/// ordering of `Member` next to the defaults.
pub const COMPARATORS: &[&str] = &["equals", "compareTo", "cmp"];

/// Null-return probe that hands comparators a same-type instance.
pub fn null_returns(
    catalog: &Arc<Catalog>,
    type_name: &str,
    excludes: &[&str],
) -> Result<NullReturnProbe, ConfigError> {
    Ok(NullReturnProbe::new(catalog.clone(), type_name, excludes)?.with_comparators(COMPARATORS))
}

/// Accumulates the outcome of a hand-written contract test.
///
/// Starts out successful; every violated clause flips it to failure and
/// appends a note.
struct Contract {
    result: TestResultBuilder,
}

impl Contract {
    fn new() -> Self {
        Self {
            result: TestResult::builder().success(),
        }
    }

    fn update(&mut self, f: impl FnOnce(TestResultBuilder) -> TestResultBuilder) {
        self.result = f(std::mem::take(&mut self.result));
    }

    fn tested(&mut self, object: &impl fmt::Display) {
        self.update(|r| r.tested_object(object));
    }

    /// Records an expected rejection. Returns false if `outcome` succeeded.
    fn rejects<T>(&mut self, outcome: Result<T, ClubError>) -> bool {
        match outcome {
            Ok(_) => false,
            Err(err) => {
                self.update(|r| r.expected(err.into()));
                true
            }
        }
    }

    fn require(&mut self, holds: bool, note: &str) {
        if !holds {
            self.update(|r| r.failure().note(note));
        }
    }

    fn unexpected(&mut self, err: impl Into<TargetError>) {
        let err = err.into();
        self.update(|r| {
            r.failure()
                .unexpected(err)
                .note("\nThrew unexpected exception")
        });
    }

    /// Folds the outcome of a clause body that may raise.
    fn finish<E: Into<TargetError>>(mut self, body: Result<(), E>) -> TestResult {
        if let Err(err) = body {
            self.unexpected(err);
        }
        self.build()
    }

    fn build(self) -> TestResult {
        self.result.build()
    }
}
