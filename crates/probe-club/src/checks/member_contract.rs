use super::Contract;
use crate::bindings::{MEMBER, hash_of};
use crate::domain::{ClubError, Level, Member, Sports, SportsMap};
use probe_core::{Catalog, ConfigError, Test, TestFault, TestMeta, TestResult, TypeIntrospector};
use std::cmp::Ordering;

/// Checks constructor validation, `learn` and the name-only identity of
/// [`Member`].
#[derive(Debug, Clone)]
pub struct MemberContractTest {
    meta: TestMeta,
}

impl MemberContractTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let mut covered = catalog.methods(
            MEMBER,
            &[
                "name",
                "sports",
                "billable_sports",
                "learn",
                "to_string",
                "cmp",
                "equals",
                "hash",
            ],
        )?;
        covered.extend(catalog.constructors(MEMBER));
        let meta = TestMeta::new(
            catalog,
            &[MEMBER],
            "MemberContractTest",
            "Checks whether the methods of Member fulfill their basic contracts",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn sports(entries: &[(Sports, Level)]) -> SportsMap {
    entries.iter().copied().collect()
}

fn first_constructor_rejects_empty_name(contract: &mut Contract) -> bool {
    contract.rejects(Member::new(""))
}

fn second_constructor_delegates_to_first(contract: &mut Contract) -> bool {
    contract.rejects(Member::with_sports(
        "",
        &sports(&[(Sports::Archery, Level::Beginner)]),
    ))
}

fn second_constructor_rejects_empty_sports(contract: &mut Contract) -> bool {
    contract.rejects(Member::with_sports("testName", &SportsMap::new()))
}

fn name_returns_name(contract: &mut Contract) -> Result<bool, ClubError> {
    let member = Member::new("testName0")?;
    contract.tested(&member);
    Ok(member.name() == "testName0")
}

fn sports_returns_sports(contract: &mut Contract) -> Result<bool, ClubError> {
    let expected: SportsMap = Sports::ALL
        .iter()
        .zip(Level::ALL.iter().cycle())
        .map(|(s, l)| (*s, *l))
        .collect();
    let member = Member::with_sports("testName1", &expected)?;
    contract.tested(&member);
    Ok(member.sports() == expected)
}

fn billable_sports_are_practiced_sports(contract: &mut Contract) -> Result<bool, ClubError> {
    let practiced = sports(&[
        (Sports::Archery, Level::Beginner),
        (Sports::Basketball, Level::Beginner),
        (Sports::Diving, Level::Beginner),
        (Sports::Hockey, Level::Beginner),
        (Sports::Parkour, Level::Beginner),
    ]);
    let member = Member::with_sports("testName2", &practiced)?;
    contract.tested(&member);
    Ok(member.billable_sports().into_iter().eq(practiced.keys().copied()))
}

fn learn_conforms(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut member = Member::with_sports(
        "testName3",
        &sports(&[
            (Sports::Archery, Level::Beginner),
            (Sports::Climbing, Level::Advanced),
            (Sports::Diving, Level::Professional),
            (Sports::Golf, Level::Normal),
            (Sports::Hockey, Level::Professional),
            (Sports::Mountainbiking, Level::Beginner),
        ]),
    )?;
    contract.tested(&member);

    Ok(member.learn(Sports::Basketball, Level::Beginner) == Level::Beginner
        && member.learn(Sports::Football, Level::Advanced) == Level::Beginner
        && member.learn(Sports::Archery, Level::Normal) == Level::Normal
        && member.learn(Sports::Golf, Level::Professional) == Level::Advanced
        && member.learn(Sports::Climbing, Level::Advanced) == Level::Advanced
        && member.learn(Sports::Hockey, Level::Beginner) == Level::Professional)
}

fn display_conforms(contract: &mut Contract) -> Result<bool, ClubError> {
    let practiced = sports(&[
        (Sports::Basketball, Level::Normal),
        (Sports::Football, Level::Beginner),
        (Sports::Handball, Level::Advanced),
        (Sports::Mountainbiking, Level::Beginner),
    ]);
    let member = Member::with_sports("testName4", &practiced)?;
    contract.tested(&member);

    let text = member.to_string();
    let Some(listed) = text.strip_prefix("name: testName4, sports: ") else {
        return Ok(false);
    };
    Ok(practiced
        .iter()
        .all(|(s, l)| listed.contains(&format!("{}={}", s, l))))
}

fn ordering_uses_name_only(contract: &mut Contract) -> Result<bool, ClubError> {
    let first = Member::with_sports("memberA", &sports(&[(Sports::Archery, Level::Beginner)]))?;
    let second = Member::with_sports(
        "memberB",
        &sports(&[(Sports::Basketball, Level::Professional)]),
    )?;
    contract.tested(&first);
    contract.tested(&second);

    if first.cmp(&first) != Ordering::Equal || second.cmp(&second) != Ordering::Equal {
        return Ok(false);
    }
    let same_name = Member::with_sports(
        "memberA",
        &sports(&[(Sports::Parkour, Level::Professional)]),
    )?;
    if first.cmp(&same_name) != Ordering::Equal {
        return Ok(false);
    }
    Ok(first.cmp(&second) == first.name().cmp(second.name())
        && second.cmp(&first) == first.cmp(&second).reverse())
}

fn equality_uses_name_only(contract: &mut Contract) -> Result<bool, ClubError> {
    let first = Member::with_sports("memberC", &sports(&[(Sports::Climbing, Level::Normal)]))?;
    let second = Member::with_sports("memberD", &sports(&[(Sports::Hockey, Level::Normal)]))?;
    contract.tested(&first);
    contract.tested(&second);

    let same_name = Member::with_sports("memberC", &sports(&[(Sports::Diving, Level::Advanced)]))?;
    Ok(first == first.clone()
        && first == same_name
        && (first == second) == (second == first)
        && (first == second) == (first.name() == second.name()))
}

fn hash_uses_name_only(contract: &mut Contract) -> Result<bool, ClubError> {
    let first = Member::with_sports("memberE", &sports(&[(Sports::Football, Level::Professional)]))?;
    let second = Member::with_sports("memberF", &sports(&[(Sports::Golf, Level::Professional)]))?;
    contract.tested(&first);
    contract.tested(&second);

    let same_name = Member::with_sports("memberE", &sports(&[(Sports::Golf, Level::Beginner)]))?;
    Ok(hash_of(&first) == hash_of(&same_name)
        && (hash_of(&first) == hash_of(&second))
            == (hash_of(&first.name()) == hash_of(&second.name())))
}

fn verify(contract: &mut Contract) -> Result<(), ClubError> {
    if !first_constructor_rejects_empty_name(contract) {
        contract.require(false, "\nOne-arg constructor does not reject an empty name");
    } else if !second_constructor_delegates_to_first(contract) {
        contract.require(false, "\nTwo-arg constructor does not delegate to one-arg constructor");
    }
    let holds = second_constructor_rejects_empty_sports(contract);
    contract.require(holds, "\nTwo-arg constructor does not reject empty sports");

    let holds = name_returns_name(contract)?;
    contract.require(holds, "\nMethod 'name' does not return the name of the member");

    let holds = sports_returns_sports(contract)?;
    contract.require(holds, "\nMethod 'sports' does not return the sports of the member");

    let holds = billable_sports_are_practiced_sports(contract)?;
    contract.require(
        holds,
        "\nMethod 'billable_sports' does not return the set of all sports",
    );

    let holds = learn_conforms(contract)?;
    contract.require(holds, "\nMethod 'learn' does not work according to its contract");

    let holds = display_conforms(contract)?;
    contract.require(
        holds,
        "\n'to_string' returns a string that does not conform to the format",
    );

    let holds = ordering_uses_name_only(contract)?;
    contract.require(
        holds,
        "\n'cmp' comparisons are invalid, or do not (just) take 'name' into account",
    );

    let holds = equality_uses_name_only(contract)?;
    contract.require(
        holds,
        "\n'equals' comparisons are invalid, or do not (just) take 'name' into account",
    );

    let holds = hash_uses_name_only(contract)?;
    contract.require(
        holds,
        "\n'hash' hashings are invalid, or do not (just) take 'name' into account",
    );
    Ok(())
}

impl Test for MemberContractTest {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let mut contract = Contract::new();
        let body = verify(&mut contract);
        Ok(contract.finish(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;
    use probe_core::ErrorKind;

    #[test]
    fn test_member_contract_passes() {
        let catalog = bindings::catalog().unwrap();
        let test = MemberContractTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        assert_eq!(result.expected_errors().len(), 3);
        assert!(
            result
                .expected_errors()
                .iter()
                .all(|e| e.kind == ErrorKind::IllegalArgument)
        );
        assert!(result.notes().is_empty());
    }

    #[test]
    fn test_covers_both_constructors() {
        let catalog = bindings::catalog().unwrap();
        let test = MemberContractTest::new(&catalog).unwrap();
        let coverage = test.meta().coverage();
        assert_eq!(coverage.covered_constructors().len(), 2);
        assert_eq!(coverage.covered_methods().len(), 8);
        assert_eq!(coverage.ratio(), Some(1.0));
    }
}
