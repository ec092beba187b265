use super::Contract;
use crate::bindings::SPORTS_CLUB;
use crate::domain::{ClubError, Level, Member, Sports, SportsClub, SportsMap};
use probe_core::{Catalog, ConfigError, Test, TestFault, TestMeta, TestResult, TypeIntrospector};
use std::collections::BTreeSet;

/// Checks membership, offering, billing and registration of [`SportsClub`].
#[derive(Debug, Clone)]
pub struct SportsClubContractTest {
    meta: TestMeta,
}

impl SportsClubContractTest {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        let mut covered = catalog.methods(
            SPORTS_CLUB,
            &[
                "name",
                "fee_per_sports",
                "members",
                "member",
                "sports",
                "offer",
                "calculate_membership_fee",
                "register_sports",
                "add_member",
                "remove_member",
                "to_string",
            ],
        )?;
        covered.extend(catalog.constructors(SPORTS_CLUB));
        let meta = TestMeta::new(
            catalog,
            &[SPORTS_CLUB],
            "SportsClubContractTest",
            "Checks whether the methods of SportsClub fulfill their basic contracts",
            covered,
        )?;
        Ok(Self { meta })
    }
}

fn member(name: &str, entries: &[(Sports, Level)]) -> Result<Member, ClubError> {
    if entries.is_empty() {
        return Member::new(name);
    }
    Member::with_sports(name, &entries.iter().copied().collect::<SportsMap>())
}

fn constructor_rejects_invalid(contract: &mut Contract) -> bool {
    contract.rejects(SportsClub::new("", 100)) && contract.rejects(SportsClub::new("testName", -1))
}

fn accessors_return_values(contract: &mut Contract) -> Result<bool, ClubError> {
    let club = SportsClub::new("testName1", 1234)?;
    contract.tested(&club);
    Ok(club.name() == "testName1" && club.fee_per_sports() == 1234)
}

fn members_returns_members(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName2", 1000)?;
    let members = [
        Member::new("memberTestName1")?,
        Member::new("memberTestName2")?,
        Member::new("memberTestName3")?,
    ];
    for m in &members {
        club.add_member(m.clone());
    }
    contract.tested(&club);
    Ok(club.members() == members.into_iter().collect::<BTreeSet<_>>())
}

fn sports_returns_offered_sports(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName3", 1000)?;
    club.offer(Sports::Golf, Level::Normal);
    club.offer(Sports::Diving, Level::Advanced);
    contract.tested(&club);
    Ok(club.sports() == BTreeSet::from([Sports::Golf, Sports::Diving]))
}

fn offer_keeps_highest_level(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName4", 1000)?;
    contract.tested(&club);
    Ok(club.offer(Sports::Hockey, Level::Normal)
        && club.offer(Sports::Hockey, Level::Advanced)
        && !club.offer(Sports::Hockey, Level::Beginner)
        && club.offered_level(Sports::Hockey) == Some(Level::Advanced))
}

fn membership_fee_rejects_non_member(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName5", 1000)?;
    club.add_member(Member::new("InTheSportsclub1")?);
    let outsider = Member::new("NotInTheSportsclub1")?;
    contract.tested(&club);
    contract.tested(&outsider);
    Ok(contract.rejects(club.calculate_membership_fee(&outsider)))
}

fn membership_fee_sums_offered_sports(contract: &mut Contract) -> Result<bool, ClubError> {
    let fee_per_sports = 1234;
    let mut club = SportsClub::new("testName6", fee_per_sports)?;
    for sports in [Sports::Golf, Sports::Diving, Sports::Archery] {
        club.offer(sports, Level::Professional);
    }
    let requested = member(
        "memberTestName4",
        &[
            (Sports::Golf, Level::Beginner),
            (Sports::Hockey, Level::Normal),
            (Sports::Archery, Level::Advanced),
        ],
    )?;
    club.add_member(requested.clone());
    contract.tested(&club);
    contract.tested(&requested);

    let expected: i64 = requested
        .billable_sports()
        .intersection(&club.sports())
        .map(|s| s.fee(fee_per_sports))
        .sum();
    Ok(club.calculate_membership_fee(&requested)? == expected)
}

fn register_rejects_non_member(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName7", 1000)?;
    club.add_member(Member::new("InTheSportsclub2")?);
    let outsider = Member::new("NotInTheSportsclub2")?;
    contract.tested(&club);
    contract.tested(&outsider);
    Ok(contract.rejects(club.register_sports(&outsider, Sports::Archery, Level::Beginner)))
}

fn register_conforms(contract: &mut Contract) -> Result<bool, ClubError> {
    let works = [
        member("memberTestName5", &[])?,
        member("memberTestName6", &[(Sports::Archery, Level::Normal)])?,
        member("memberTestName7", &[(Sports::Archery, Level::Professional)])?,
    ];
    let fails = [
        member("memberTestName8", &[(Sports::Hockey, Level::Beginner)])?,
        member("memberTestName9", &[(Sports::Basketball, Level::Advanced)])?,
        member("memberTestName10", &[(Sports::Archery, Level::Beginner)])?,
    ];

    let mut club = SportsClub::new("testName8", 1000)?;
    club.offer(Sports::Archery, Level::Professional);
    club.offer(Sports::Basketball, Level::Advanced);
    for m in works.iter().chain(&fails) {
        club.add_member(m.clone());
    }
    contract.tested(&club);

    Ok(club.register_sports(&works[0], Sports::Archery, Level::Beginner)?
        && club.register_sports(&works[1], Sports::Archery, Level::Advanced)?
        && club.register_sports(&works[2], Sports::Archery, Level::Professional)?
        && !club.register_sports(&fails[0], Sports::Hockey, Level::Normal)?
        && !club.register_sports(&fails[1], Sports::Basketball, Level::Professional)?
        && !club.register_sports(&fails[2], Sports::Archery, Level::Advanced)?)
}

fn register_invokes_learn(contract: &mut Contract) -> Result<bool, ClubError> {
    let learners = [
        member("memberTestName11", &[(Sports::Archery, Level::Beginner)])?,
        member("memberTestName12", &[])?,
        member("memberTestName13", &[(Sports::Archery, Level::Normal)])?,
    ];
    let mut club = SportsClub::new("testName9", 1000)?;
    club.offer(Sports::Archery, Level::Professional);
    for m in &learners {
        club.add_member(m.clone());
    }
    contract.tested(&club);

    club.register_sports(&learners[0], Sports::Archery, Level::Normal)?;
    club.register_sports(&learners[1], Sports::Archery, Level::Beginner)?;
    club.register_sports(&learners[2], Sports::Archery, Level::Professional)?;

    let level = |m: &Member| club.member(m.name()).and_then(|m| m.level(Sports::Archery));
    Ok(level(&learners[0]) == Some(Level::Normal)
        && level(&learners[1]) == Some(Level::Beginner)
        && level(&learners[2]) == Some(Level::Advanced))
}

fn add_member_conforms(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName10", 1000)?;
    let members = [
        member("memberTestName14", &[(Sports::Hockey, Level::Normal)])?,
        member("memberTestName15", &[(Sports::Golf, Level::Beginner)])?,
    ];
    for m in &members {
        if !club.add_member(m.clone()) {
            return Ok(false);
        }
    }
    contract.tested(&club);

    // A second member of the same name is rejected.
    if club.add_member(Member::new("memberTestName14")?) {
        return Ok(false);
    }
    Ok(club.members() == members.into_iter().collect::<BTreeSet<_>>())
}

fn remove_member_conforms(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName11", 1000)?;
    let staying = member("memberTestName16", &[(Sports::Basketball, Level::Beginner)])?;
    let leaving = Member::new("memberTestName17")?;
    let outsider = Member::new("memberTestName18")?;
    club.add_member(staying.clone());
    club.add_member(leaving.clone());
    club.offer(Sports::Basketball, Level::Advanced);
    contract.tested(&club);
    contract.tested(&outsider);

    Ok(club.remove_member(&leaving)
        && !club.remove_member(&leaving)
        && !club.remove_member(&outsider)
        && club.members() == BTreeSet::from([staying.clone()])
        && contract.rejects(club.register_sports(&leaving, Sports::Basketball, Level::Beginner))
        && club.register_sports(&staying, Sports::Basketball, Level::Normal)?)
}

fn display_names_club(contract: &mut Contract) -> Result<bool, ClubError> {
    let mut club = SportsClub::new("testName12", 1000)?;
    club.add_member(Member::new("memberTestName19")?);
    contract.tested(&club);
    let text = club.to_string();
    Ok(text.contains("testName12") && text.contains("memberTestName19"))
}

fn verify(contract: &mut Contract) -> Result<(), ClubError> {
    let holds = constructor_rejects_invalid(contract);
    contract.require(
        holds,
        "\nConstructor does not reject an empty name or a negative fee",
    );

    let clauses: [(fn(&mut Contract) -> Result<bool, ClubError>, &str); 12] = [
        (
            accessors_return_values,
            "\nMethods 'name' or 'fee_per_sports' do not return the constructor arguments",
        ),
        (
            members_returns_members,
            "\nMethod 'members' does not return the members",
        ),
        (
            sports_returns_offered_sports,
            "\nMethod 'sports' does not return the offered sports",
        ),
        (
            offer_keeps_highest_level,
            "\nMethod 'offer' does not keep the highest offered level",
        ),
        (
            membership_fee_rejects_non_member,
            "\nMethod 'calculate_membership_fee' does not reject non-members",
        ),
        (
            membership_fee_sums_offered_sports,
            "\nMethod 'calculate_membership_fee' calculates a wrong result",
        ),
        (
            register_rejects_non_member,
            "\nMethod 'register_sports' does not reject non-members",
        ),
        (
            register_conforms,
            "\nMethod 'register_sports' does not work according to its contract",
        ),
        (
            register_invokes_learn,
            "\nMethod 'register_sports' does not let the member learn",
        ),
        (
            add_member_conforms,
            "\nMethod 'add_member' does not work according to its contract",
        ),
        (
            remove_member_conforms,
            "\nMethod 'remove_member' does not work according to its contract",
        ),
        (
            display_names_club,
            "\n'to_string' does not name the club and its members",
        ),
    ];
    for (clause, note) in clauses {
        let holds = clause(contract)?;
        contract.require(holds, note);
    }
    Ok(())
}

impl Test for SportsClubContractTest {
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

    #[test]
    fn test_club_contract_passes() {
        let catalog = bindings::catalog().unwrap();
        let test = SportsClubContractTest::new(&catalog).unwrap();
        let result = test.run();
        assert!(result.successful(), "{}", result);
        // Two constructor rejections, two non-member rejections and the
        // removed member's registration.
        assert_eq!(result.expected_errors().len(), 5);
        assert_eq!(test.meta().coverage().ratio(), Some(1.0));
    }
}
