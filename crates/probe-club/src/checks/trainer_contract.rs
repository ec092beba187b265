use super::Contract;
use crate::bindings::{LEVEL, SPORTS, TRAINER};
use crate::domain::{Level, Sports, SportsMap, Trainer};
use probe_core::{
    Args, Catalog, ConfigError, Operation, OperationDescriptor, SetupError, TargetError, Test,
    TestFault, TestMeta, TestResult, TypeIntrospector, Value,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Checks accreditations and billing of [`Trainer`], and that the operations
/// it inherits from `Member` act on a trainer.
#[derive(Debug, Clone)]
pub struct TrainerContractTest {
    meta: TestMeta,
    catalog: Arc<Catalog>,
    learn: OperationDescriptor,
    sports: OperationDescriptor,
    billable_sports: OperationDescriptor,
}

impl TrainerContractTest {
    pub fn new(catalog: &Arc<Catalog>) -> Result<Self, ConfigError> {
        let mut covered = catalog.methods(
            TRAINER,
            &["accreditations", "billable_sports", "to_string"],
        )?;
        covered.extend(catalog.constructors(TRAINER));
        let meta = TestMeta::new(
            catalog.as_ref(),
            &[TRAINER],
            "TrainerContractTest",
            "Checks whether the methods of Trainer fulfill their basic contracts",
            covered,
        )?;
        Ok(Self {
            meta,
            catalog: catalog.clone(),
            learn: catalog.method_in_hierarchy(TRAINER, "learn")?,
            sports: catalog.method_in_hierarchy(TRAINER, "sports")?,
            billable_sports: catalog.method_in_hierarchy(TRAINER, "billable_sports")?,
        })
    }

    fn operation(&self, descriptor: &OperationDescriptor) -> Result<&Operation, SetupError> {
        self.catalog
            .operation(descriptor)
            .ok_or_else(|| SetupError::NoInvoker(descriptor.to_string()))
    }
}

/// The trainer's operations resolved through its type hierarchy.
struct Resolved<'a> {
    learn: &'a Operation,
    sports: &'a Operation,
    billable_sports: &'a Operation,
}

fn sports(entries: &[(Sports, Level)]) -> SportsMap {
    entries.iter().copied().collect()
}

fn constructor_rejects_empty_inputs(contract: &mut Contract) -> bool {
    contract.rejects(Trainer::new("", &sports(&[(Sports::Golf, Level::Normal)])))
        && contract.rejects(Trainer::new("testName0", &SportsMap::new()))
}

fn constructor_conforms(contract: &mut Contract) -> Result<bool, TargetError> {
    let accreditations = sports(&[
        (Sports::Archery, Level::Normal),
        (Sports::Football, Level::Professional),
        (Sports::Parkour, Level::Beginner),
    ]);
    let trainer = Trainer::new("testName1", &accreditations)?;
    contract.tested(&trainer);
    Ok(trainer.name() == "testName1"
        && trainer.sports() == accreditations
        && trainer.accreditations() == accreditations)
}

fn learning_leaves_accreditations(contract: &mut Contract) -> Result<bool, TargetError> {
    let accreditations = sports(&[
        (Sports::Diving, Level::Beginner),
        (Sports::Handball, Level::Normal),
        (Sports::Mountainbiking, Level::Professional),
        (Sports::Hockey, Level::Advanced),
        (Sports::Golf, Level::Advanced),
    ]);
    let mut trainer = Trainer::new("testName2", &accreditations)?;
    contract.tested(&trainer);

    trainer.learn(Sports::Handball, Level::Advanced);
    if trainer.accreditations() != accreditations || trainer.accreditations() == trainer.sports() {
        return Ok(false);
    }
    trainer.learn(Sports::Basketball, Level::Beginner);
    Ok(trainer.accreditations() == accreditations && trainer.accreditations() != trainer.sports())
}

fn billable_sports_skip_accreditations(contract: &mut Contract) -> Result<bool, TargetError> {
    let mut trainer = Trainer::new(
        "testName3",
        &sports(&[
            (Sports::Climbing, Level::Beginner),
            (Sports::Golf, Level::Normal),
            (Sports::Diving, Level::Professional),
            (Sports::Football, Level::Advanced),
            (Sports::Archery, Level::Advanced),
        ]),
    )?;
    contract.tested(&trainer);

    if !trainer.billable_sports().is_empty() {
        return Ok(false);
    }
    trainer.learn(Sports::Basketball, Level::Beginner);
    trainer.learn(Sports::Hockey, Level::Beginner);
    trainer.learn(Sports::Handball, Level::Beginner);
    trainer.learn(Sports::Golf, Level::Advanced);
    Ok(trainer.billable_sports()
        == BTreeSet::from([Sports::Basketball, Sports::Handball, Sports::Hockey]))
}

fn display_conforms(contract: &mut Contract) -> Result<bool, TargetError> {
    let accreditations = sports(&[
        (Sports::Basketball, Level::Normal),
        (Sports::Climbing, Level::Advanced),
    ]);
    let trainer = Trainer::new("testName4", &accreditations)?;
    contract.tested(&trainer);

    let text = trainer.to_string();
    let Some(rest) = text.strip_prefix("name: testName4, sports: ") else {
        return Ok(false);
    };
    let Some((practiced, accredited)) = rest.split_once(", accreditations: ") else {
        return Ok(false);
    };
    Ok(accreditations.iter().all(|(s, l)| {
        let entry = format!("{}={}", s, l);
        practiced.contains(&entry) && accredited.contains(&entry)
    }))
}

fn inherited_operations_act_on_trainer(
    contract: &mut Contract,
    ops: &Resolved<'_>,
) -> Result<bool, TargetError> {
    let accreditations = sports(&[
        (Sports::Golf, Level::Normal),
        (Sports::Hockey, Level::Advanced),
    ]);
    let trainer = Trainer::new("testName5", &accreditations)?;
    contract.tested(&trainer);
    let mut receiver = Value::object(TRAINER, trainer);

    for (learned, target) in [
        (Sports::Parkour, Level::Beginner),
        (Sports::Golf, Level::Advanced),
    ] {
        ops.learn.invoke(
            Some(&mut receiver),
            Args::new(vec![
                Value::object(SPORTS, learned),
                Value::object(LEVEL, target),
            ]),
        )?;
    }
    let practiced = ops.sports.invoke(Some(&mut receiver), Args::default())?;
    let billable = ops.billable_sports.invoke(Some(&mut receiver), Args::default())?;

    let expected = sports(&[
        (Sports::Golf, Level::Advanced),
        (Sports::Hockey, Level::Advanced),
        (Sports::Parkour, Level::Beginner),
    ]);
    Ok(practiced.downcast_ref::<SportsMap>()? == &expected
        && billable.downcast_ref::<BTreeSet<Sports>>()? == &BTreeSet::from([Sports::Parkour])
        && receiver.downcast_ref::<Trainer>()?.accreditations() == accreditations)
}

fn verify(contract: &mut Contract, ops: &Resolved<'_>) -> Result<(), TargetError> {
    let holds = constructor_rejects_empty_inputs(contract);
    contract.require(holds, "\nConstructor does not reject an empty name or empty accreditations");

    let holds = constructor_conforms(contract)?;
    contract.require(holds, "\nConstructor does not conform to its contract");

    let holds = learning_leaves_accreditations(contract)?;
    contract.require(
        holds,
        "\nMethod 'accreditations' does not return the accreditations map (or it is affected by 'learn')",
    );

    let holds = billable_sports_skip_accreditations(contract)?;
    contract.require(
        holds,
        "\nMethod 'billable_sports' does not return the correct set of sports",
    );

    let holds = display_conforms(contract)?;
    contract.require(
        holds,
        "\n'to_string' returns a string that does not conform to the format",
    );

    let holds = inherited_operations_act_on_trainer(contract, ops)?;
    contract.require(
        holds,
        "\nOperations inherited from Member do not act on the trainer",
    );
    Ok(())
}

impl Test for TrainerContractTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let ops = Resolved {
            learn: self.operation(&self.learn)?,
            sports: self.operation(&self.sports)?,
            billable_sports: self.operation(&self.billable_sports)?,
        };
        let mut contract = Contract::new();
        let body = verify(&mut contract, &ops);
        Ok(contract.finish(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{self, MEMBER};
    use probe_core::ErrorKind;

    #[test]
    fn test_trainer_contract_passes() {
        let catalog = bindings::catalog().unwrap();
        let test = TrainerContractTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert!(result.notes().is_empty());
        assert_eq!(result.expected_errors().len(), 2);
        assert!(
            result
                .expected_errors()
                .iter()
                .all(|e| e.kind == ErrorKind::IllegalArgument)
        );
        assert_eq!(result.tested_objects().len(), 5);
    }

    #[test]
    fn test_resolves_inherited_operations() {
        let catalog = bindings::catalog().unwrap();
        let test = TrainerContractTest::new(&catalog).unwrap();
        assert_eq!(test.learn.declaring_type(), MEMBER);
        assert_eq!(test.sports.declaring_type(), MEMBER);
        assert_eq!(test.billable_sports.declaring_type(), TRAINER);

        let coverage = test.meta().coverage();
        assert_eq!(coverage.covered_methods().len(), 3);
        assert_eq!(coverage.covered_constructors().len(), 1);
        assert_eq!(coverage.ratio(), Some(1.0));
    }
}
