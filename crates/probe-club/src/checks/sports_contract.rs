use super::Contract;
use crate::bindings::SPORTS;
use crate::domain::Sports;
use probe_core::{Catalog, ConfigError, Test, TestFault, TestMeta, TestResult, TypeIntrospector};

/// Checks the fee factors and the fee calculation of every sport.
#[derive(Debug, Clone)]
pub struct SportsContractTest {
    meta: TestMeta,
}

impl SportsContractTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let covered = catalog.methods(SPORTS, &["fee_factor", "fee"])?;
        let meta = TestMeta::new(
            catalog,
            &[SPORTS],
            "SportsContractTest",
            "Checks whether the methods of Sports fulfill their basic contracts",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn fee_factor_conforms() -> bool {
    Sports::ALL.iter().all(|sports| {
        let expected = match sports {
            Sports::Climbing => 120,
            Sports::Diving => 180,
            Sports::Golf => 210,
            _ => 100,
        };
        sports.fee_factor() == expected
    })
}

fn fee_conforms() -> bool {
    [0, 1, 999, 1000, 12_345].into_iter().all(|fee_per_sports: i64| {
        Sports::ALL
            .iter()
            .all(|sports| sports.fee(fee_per_sports) == fee_per_sports * sports.fee_factor() / 100)
    })
}

impl Test for SportsContractTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let mut contract = Contract::new();
        contract.require(
            fee_factor_conforms(),
            "\nMethod 'fee_factor' returns a value that deviates from the fee table",
        );
        contract.require(fee_conforms(), "\nMethod 'fee' calculates a wrong result");
        for sports in Sports::ALL {
            contract.tested(&sports);
        }
        Ok(contract.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;

    #[test]
    fn test_sports_contract_passes() {
        let catalog = bindings::catalog().unwrap();
        let test = SportsContractTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert_eq!(result.tested_objects().len(), 10);
        assert_eq!(test.meta().coverage().covered_methods().len(), 2);
    }
}
