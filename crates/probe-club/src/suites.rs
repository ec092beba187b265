//! The named suites of the club domain.

use crate::bindings::{LEVEL, MEMBER, SPORTS, SPORTS_CLUB, TRAINER};
use crate::checks::{
    self, LevelContractTest, MemberContractTest, MemberShallowCopyTest, SportsClubContractTest,
    SportsClubShallowCopyTest, SportsContractTest, TrainerContractTest, TrainerShallowCopyTest,
};
use probe_core::{Catalog, ConfigError, SharedTest, TestSuite};
use std::sync::Arc;

pub const STRUCTURE_CHECKS: &str = "StructureChecks";
pub const NULL_PARAMETER_CHECKS: &str = "NullParameterChecks";
pub const NULL_RETURN_CHECKS: &str = "NullReturnChecks";
pub const CONTRACT_CHECKS: &str = "ContractChecks";
pub const SHALLOW_COPY_CHECKS: &str = "ShallowCopyChecks";

/// Suite names in run order.
pub const ALL: [&str; 5] = [
    STRUCTURE_CHECKS,
    NULL_PARAMETER_CHECKS,
    NULL_RETURN_CHECKS,
    CONTRACT_CHECKS,
    SHALLOW_COPY_CHECKS,
];

pub fn structure_checks(catalog: &Arc<Catalog>) -> Result<TestSuite, ConfigError> {
    TestSuite::new(
        STRUCTURE_CHECKS,
        [
            SharedTest::new(checks::level_structure(catalog)?),
            SharedTest::new(checks::sports_structure(catalog)?),
            SharedTest::new(checks::member_structure(catalog)?),
            SharedTest::new(checks::club_structure(catalog)?),
            SharedTest::new(checks::trainer_structure(catalog)?),
        ],
    )
}

/// `parse` reads its input without validating it, so it is left out.
pub fn null_parameter_checks(catalog: &Arc<Catalog>) -> Result<TestSuite, ConfigError> {
    TestSuite::new(
        NULL_PARAMETER_CHECKS,
        [
            SharedTest::new(checks::null_parameters(catalog, LEVEL, &["parse"])?),
            SharedTest::new(checks::null_parameters(catalog, SPORTS, &["parse"])?),
            SharedTest::new(checks::null_parameters(catalog, MEMBER, &[])?),
            SharedTest::new(checks::null_parameters(catalog, SPORTS_CLUB, &[])?),
            SharedTest::new(checks::null_parameters(catalog, TRAINER, &[])?),
        ],
    )
}

/// The member lookup reports unknown names as absent, so it is left out.
pub fn null_return_checks(catalog: &Arc<Catalog>) -> Result<TestSuite, ConfigError> {
    TestSuite::new(
        NULL_RETURN_CHECKS,
        [
            SharedTest::new(checks::null_returns(catalog, LEVEL, &[])?),
            SharedTest::new(checks::null_returns(catalog, SPORTS, &[])?),
            SharedTest::new(checks::null_returns(catalog, MEMBER, &[])?),
            SharedTest::new(checks::null_returns(catalog, SPORTS_CLUB, &["member"])?),
            SharedTest::new(checks::null_returns(catalog, TRAINER, &[])?),
        ],
    )
}

pub fn contract_checks(catalog: &Arc<Catalog>) -> Result<TestSuite, ConfigError> {
    TestSuite::new(
        CONTRACT_CHECKS,
        [
            SharedTest::new(LevelContractTest::new(catalog)?),
            SharedTest::new(SportsContractTest::new(catalog)?),
            SharedTest::new(MemberContractTest::new(catalog)?),
            SharedTest::new(SportsClubContractTest::new(catalog)?),
            SharedTest::new(TrainerContractTest::new(catalog)?),
        ],
    )
}

pub fn shallow_copy_checks(catalog: &Arc<Catalog>) -> Result<TestSuite, ConfigError> {
    TestSuite::new(
        SHALLOW_COPY_CHECKS,
        [
            SharedTest::new(MemberShallowCopyTest::new(catalog)?),
            SharedTest::new(SportsClubShallowCopyTest::new(catalog)?),
            SharedTest::new(TrainerShallowCopyTest::new(catalog)?),
        ],
    )
}

/// Builds the suite registered under `name`.
pub fn by_name(catalog: &Arc<Catalog>, name: &str) -> Option<Result<TestSuite, ConfigError>> {
    let build = match name {
        STRUCTURE_CHECKS => structure_checks,
        NULL_PARAMETER_CHECKS => null_parameter_checks,
        NULL_RETURN_CHECKS => null_return_checks,
        CONTRACT_CHECKS => contract_checks,
        SHALLOW_COPY_CHECKS => shallow_copy_checks,
        _ => return None,
    };
    Some(build(catalog))
}

/// Every suite, in run order.
pub fn all(catalog: &Arc<Catalog>) -> Result<Vec<TestSuite>, ConfigError> {
    ALL.iter()
        .filter_map(|name| by_name(catalog, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;

    #[test]
    fn test_all_suites_build_in_order() {
        let catalog = bindings::catalog().unwrap();
        let suites = all(&catalog).unwrap();
        let names: Vec<_> = suites.iter().map(TestSuite::name).collect();
        assert_eq!(names, ALL);
        let sizes: Vec<_> = suites.iter().map(|s| s.tests().len()).collect();
        assert_eq!(sizes, [5, 5, 5, 5, 3]);
    }

    #[test]
    fn test_by_name_rejects_unknown() {
        let catalog = bindings::catalog().unwrap();
        assert!(by_name(&catalog, "Nope").is_none());
        assert!(by_name(&catalog, CONTRACT_CHECKS).is_some());
    }

    #[test]
    fn test_contract_suite_covers_club_and_trainer() {
        let catalog = bindings::catalog().unwrap();
        let suite = contract_checks(&catalog).unwrap();
        let coverage = suite.coverage();
        assert!(coverage.target_types().contains(SPORTS_CLUB));
        assert!(coverage.target_types().contains(TRAINER));
        assert_eq!(coverage.target_types().len(), 5);
    }
}
