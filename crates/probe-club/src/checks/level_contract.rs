use super::Contract;
use crate::bindings::LEVEL;
use crate::domain::Level;
use probe_core::{Catalog, ConfigError, Test, TestFault, TestMeta, TestResult, TypeIntrospector};

/// Checks `next` and the textual form of every level.
#[derive(Debug, Clone)]
pub struct LevelContractTest {
    meta: TestMeta,
}

impl LevelContractTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let covered = catalog.methods(LEVEL, &["mapped_name", "next", "to_string"])?;
        let meta = TestMeta::new(
            catalog,
            &[LEVEL],
            "LevelContractTest",
            "Checks whether the methods of Level fulfill their basic contracts",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn next_conforms() -> bool {
    Level::Beginner.next() == Level::Normal
        && Level::Normal.next() == Level::Advanced
        && Level::Advanced.next() == Level::Professional
        && Level::Professional.next() == Level::Professional
}

fn display_is_mapped_name() -> bool {
    Level::ALL.iter().all(|l| l.to_string() == l.mapped_name())
}

impl Test for LevelContractTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let mut contract = Contract::new();
        contract.require(
            next_conforms(),
            "\nThe 'next' method does not work according to its contract",
        );
        contract.require(
            display_is_mapped_name(),
            "\n'to_string' does not return the mapped name (or the getter is not right)",
        );
        for level in Level::ALL {
            contract.tested(&level);
        }
        Ok(contract.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;

    #[test]
    fn test_level_contract_passes() {
        let catalog = bindings::catalog().unwrap();
        let test = LevelContractTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert_eq!(
            result.tested_objects(),
            ["Beginner", "Normal", "Advanced", "Professional"]
        );
    }

    #[test]
    fn test_parse_stays_uncovered() {
        let catalog = bindings::catalog().unwrap();
        let test = LevelContractTest::new(&catalog).unwrap();
        let uncovered = test.meta().coverage().uncovered_methods();
        assert_eq!(uncovered.len(), 1);
        assert_eq!(uncovered.iter().next().unwrap().name(), "parse");
    }
}
