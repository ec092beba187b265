//! Checks that collections handed in or out are copies, so callers cannot
//! reach into the state of a member, a trainer or a club.

use super::Contract;
use crate::bindings::{MEMBER, SPORTS_CLUB, SPORTS_MAP, TRAINER};
use crate::domain::{ClubError, Level, Member, Sports, SportsClub, SportsMap, Trainer};
use probe_core::{
    Catalog, ConfigError, Shape, Test, TestFault, TestMeta, TestResult, TypeIntrospector,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct MemberShallowCopyTest {
    meta: TestMeta,
}

impl MemberShallowCopyTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let mut covered = catalog.methods(MEMBER, &["sports"])?;
        covered.insert(catalog.constructor(
            MEMBER,
            &[Shape::string(), Shape::reference(SPORTS_MAP)],
        )?);
        let meta = TestMeta::new(
            catalog,
            &[MEMBER],
            "MemberShallowCopyTest",
            "Tests whether shallow copies are performed in the Member type wherever this is required",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn constructor_copies(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut sports = SportsMap::from([
        (Sports::Archery, Level::Normal),
        (Sports::Golf, Level::Advanced),
    ]);
    let member = Member::with_sports("testName1", &sports)?;
    contract.tested(&member);

    let original = sports.clone();
    sports.insert(Sports::Hockey, Level::Professional);
    sports.insert(Sports::Archery, Level::Beginner);
    sports.remove(&Sports::Golf);
    Ok(member.sports() == original)
}

fn sports_copies(contract: &mut Contract) -> Result<bool, ClubError> {
    let expected = SportsMap::from([
        (Sports::Basketball, Level::Beginner),
        (Sports::Diving, Level::Professional),
    ]);
    let member = Member::with_sports("testName2", &expected)?;
    contract.tested(&member);

    let mut copy = member.sports();
    copy.insert(Sports::Parkour, Level::Advanced);
    copy.insert(Sports::Diving, Level::Beginner);
    if member.sports() != expected {
        return Ok(false);
    }
    copy.clear();
    Ok(member.sports() == expected)
}

fn verify_member(contract: &mut Contract) -> Result<(), ClubError> {
    let holds = constructor_copies(contract)?;
    contract.require(
        holds,
        "\nTwo-arg constructor does not perform proper shallow copy",
    );
    let holds = sports_copies(contract)?;
    contract.require(holds, "\nMethod 'sports' does not perform proper shallow copy");
    Ok(())
}

impl Test for MemberShallowCopyTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let mut contract = Contract::new();
        let body = verify_member(&mut contract);
        Ok(contract.finish(body))
    }
}

#[derive(Debug, Clone)]
pub struct SportsClubShallowCopyTest {
    meta: TestMeta,
}

impl SportsClubShallowCopyTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let covered = catalog.methods(SPORTS_CLUB, &["members", "sports", "add_member"])?;
        let meta = TestMeta::new(
            catalog,
            &[SPORTS_CLUB],
            "SportsClubShallowCopyTest",
            "Tests whether shallow copies are performed in the SportsClub type wherever this is required",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn members_copies(contract: &mut Contract) -> Result<bool, ClubError> {
    let members = [
        Member::new("memberTestName1")?,
        Member::new("memberTestName2")?,
        Member::new("memberTestName3")?,
    ];
    let mut club = SportsClub::new("testName1", 1000)?;
    for m in &members {
        club.add_member(m.clone());
    }
    contract.tested(&club);

    let mut copy = club.members();
    let intruder = Member::new("memberTestName4")?;
    copy.insert(intruder.clone());
    if club.members().contains(&intruder) {
        return Ok(false);
    }

    copy.remove(&members[2]);
    if !club.members().contains(&members[2]) {
        return Ok(false);
    }

    copy.remove(&intruder);
    copy.insert(members[2].clone());
    Ok(copy == club.members())
}

fn offered_sports_copies(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName2", 1000)?;
    club.offer(Sports::Football, Level::Normal);
    club.offer(Sports::Handball, Level::Advanced);
    contract.tested(&club);

    let expected = BTreeSet::from([Sports::Football, Sports::Handball]);
    let mut copy = club.sports();
    copy.insert(Sports::Climbing);
    copy.remove(&Sports::Football);
    Ok(club.sports() == expected && club.offered_level(Sports::Climbing).is_none())
}

fn added_member_detached(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName3", 1000)?;
    let mut member = Member::with_sports(
        "memberTestName5",
        &SportsMap::from([(Sports::Golf, Level::Beginner)]),
    )?;
    club.add_member(member.clone());
    contract.tested(&club);

    member.learn(Sports::Golf, Level::Professional);
    member.learn(Sports::Mountainbiking, Level::Beginner);
    let stored = club.member(member.name());
    Ok(stored.and_then(|m| m.level(Sports::Golf)) == Some(Level::Beginner)
        && stored.and_then(|m| m.level(Sports::Mountainbiking)).is_none())
}

fn verify_club(contract: &mut Contract) -> Result<(), ClubError> {
    let holds = members_copies(contract)?;
    contract.require(holds, "\nMethod 'members' does not perform proper shallow copy");
    let holds = offered_sports_copies(contract)?;
    contract.require(holds, "\nMethod 'sports' does not perform proper shallow copy");
    let holds = added_member_detached(contract)?;
    contract.require(
        holds,
        "\nMethod 'add_member' keeps a handle the caller can still change",
    );
    Ok(())
}

impl Test for SportsClubShallowCopyTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let mut contract = Contract::new();
        let body = verify_club(&mut contract);
        Ok(contract.finish(body))
    }
}

#[derive(Debug, Clone)]
pub struct TrainerShallowCopyTest {
    meta: TestMeta,
}

impl TrainerShallowCopyTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let mut covered = catalog.methods(TRAINER, &["accreditations", "billable_sports"])?;
        covered.insert(catalog.constructor(
            TRAINER,
            &[Shape::string(), Shape::reference(SPORTS_MAP)],
        )?);
        let meta = TestMeta::new(
            catalog,
            &[TRAINER],
            "TrainerShallowCopyTest",
            "Tests whether shallow copies are performed in the Trainer type wherever this is required",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn trainer_constructor_copies(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut accreditations = SportsMap::from([
        (Sports::Mountainbiking, Level::Beginner),
        (Sports::Parkour, Level::Normal),
        (Sports::Archery, Level::Advanced),
        (Sports::Basketball, Level::Professional),
    ]);
    let trainer = Trainer::new("testName1", &accreditations)?;
    contract.tested(&trainer);

    let original = accreditations.clone();
    accreditations.insert(Sports::Climbing, Level::Beginner);
    accreditations.remove(&Sports::Archery);
    accreditations.insert(Sports::Mountainbiking, Level::Advanced);
    Ok(trainer.accreditations() == original && trainer.sports() == original)
}

fn accreditations_copies(contract: &mut Contract) -> Result<bool, ClubError> {
    let expected = SportsMap::from([
        (Sports::Climbing, Level::Beginner),
        (Sports::Diving, Level::Normal),
        (Sports::Football, Level::Advanced),
        (Sports::Golf, Level::Professional),
    ]);
    let trainer = Trainer::new("testName2", &expected)?;
    contract.tested(&trainer);

    let mut copy = trainer.accreditations();
    copy.insert(Sports::Handball, Level::Beginner);
    if trainer.accreditations().contains_key(&Sports::Handball) {
        return Ok(false);
    }
    copy.remove(&Sports::Golf);
    if !trainer.accreditations().contains_key(&Sports::Golf) {
        return Ok(false);
    }
    copy.insert(Sports::Diving, Level::Advanced);
    Ok(trainer.accreditations() == expected)
}

fn billing_leaves_state(contract: &mut Contract) -> Result<bool, ClubError> {
    let accreditations = SportsMap::from([
        (Sports::Handball, Level::Beginner),
        (Sports::Hockey, Level::Normal),
        (Sports::Mountainbiking, Level::Advanced),
        (Sports::Parkour, Level::Professional),
    ]);
    let mut trainer = Trainer::new("testName3", &accreditations)?;
    contract.tested(&trainer);

    trainer.learn(Sports::Archery, Level::Beginner);
    trainer.learn(Sports::Basketball, Level::Beginner);
    trainer.learn(Sports::Climbing, Level::Beginner);
    trainer.learn(Sports::Hockey, Level::Advanced);
    let before = trainer.sports();
    let billed = trainer.billable_sports();

    Ok(billed.len() == 3
        && trainer.accreditations() == accreditations
        && trainer.sports() == before
        && before.get(&Sports::Hockey) == Some(&Level::Advanced)
        && before.len() == 7)
}

fn verify_trainer(contract: &mut Contract) -> Result<(), ClubError> {
    let holds = trainer_constructor_copies(contract)?;
    contract.require(holds, "\nConstructor does not perform proper shallow copy");
    let holds = accreditations_copies(contract)?;
    contract.require(
        holds,
        "\nMethod 'accreditations' does not perform proper shallow copy",
    );
    let holds = billing_leaves_state(contract)?;
    contract.require(
        holds,
        "\nMethod 'billable_sports' does not perform proper shallow copies internally",
    );
    Ok(())
}

impl Test for TrainerShallowCopyTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let mut contract = Contract::new();
        let body = verify_trainer(&mut contract);
        Ok(contract.finish(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;

    #[test]
    fn test_member_copies_pass() {
        let catalog = bindings::catalog().unwrap();
        let test = MemberShallowCopyTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert_eq!(result.tested_objects().len(), 2);

        let coverage = test.meta().coverage();
        assert_eq!(coverage.covered_constructors().len(), 1);
        assert_eq!(coverage.covered_methods().len(), 1);
    }

    #[test]
    fn test_club_copies_pass() {
        let catalog = bindings::catalog().unwrap();
        let test = SportsClubShallowCopyTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert!(result.notes().is_empty());
        assert_eq!(test.meta().coverage().covered_methods().len(), 3);
    }

    #[test]
    fn test_trainer_copies_pass() {
        let catalog = bindings::catalog().unwrap();
        let test = TrainerShallowCopyTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert_eq!(result.tested_objects().len(), 3);

        let coverage = test.meta().coverage();
        assert_eq!(coverage.covered_constructors().len(), 1);
        assert_eq!(coverage.covered_methods().len(), 2);
        assert_eq!(coverage.ratio().map(|r| r < 1.0), Some(true));
    }
}
