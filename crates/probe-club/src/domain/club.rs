use super::{ClubError, Level, Member, Sports, format_cents};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A club with members and offered sports.
#[derive(Debug, Clone)]
pub struct SportsClub {
    name: String,
    members: BTreeMap<String, Member>,
    offered_sports: BTreeMap<Sports, Level>,
    fee_per_sports: i64,
}

impl SportsClub {
    pub fn new(name: impl Into<String>, fee_per_sports: i64) -> Result<Self, ClubError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClubError::EmptyName);
        }
        if fee_per_sports < 0 {
            return Err(ClubError::NegativeFee(fee_per_sports));
        }
        Ok(Self {
            name,
            members: BTreeMap::new(),
            offered_sports: BTreeMap::new(),
            fee_per_sports,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fee_per_sports(&self) -> i64 {
        self.fee_per_sports
    }

    /// A copy of the member set.
    pub fn members(&self) -> BTreeSet<Member> {
        self.members.values().cloned().collect()
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// The offered sports.
    pub fn sports(&self) -> BTreeSet<Sports> {
        self.offered_sports.keys().copied().collect()
    }

    /// The highest level up to which `sports` is taught.
    pub fn offered_level(&self, sports: Sports) -> Option<Level> {
        self.offered_sports.get(&sports).copied()
    }

    /// Offers `sports` up to `level`. Returns false if it was already offered
    /// at that level or higher.
    pub fn offer(&mut self, sports: Sports, level: Level) -> bool {
        match self.offered_sports.get(&sports) {
            Some(&current) if current >= level => false,
            _ => {
                self.offered_sports.insert(sports, level);
                true
            }
        }
    }

    /// Adds a member. Returns false if a member of that name exists.
    pub fn add_member(&mut self, member: Member) -> bool {
        if self.members.contains_key(member.name()) {
            return false;
        }
        self.members.insert(member.name().to_string(), member);
        true
    }

    pub fn remove_member(&mut self, member: &Member) -> bool {
        self.members.remove(member.name()).is_some()
    }

    fn require_member(&self, member: &Member) -> Result<&Member, ClubError> {
        self.members
            .get(member.name())
            .ok_or_else(|| ClubError::NotAMember(member.name().to_string()))
    }

    /// Sum of the fees of every offered sport the member practices.
    pub fn calculate_membership_fee(&self, member: &Member) -> Result<i64, ClubError> {
        let member = self.require_member(member)?;
        Ok(member
            .billable_sports()
            .into_iter()
            .filter(|s| self.offered_sports.contains_key(s))
            .map(|s| s.fee(self.fee_per_sports))
            .sum())
    }

    /// Lets a member train `sports` towards `level`.
    ///
    /// Returns false without training if the sport is not offered up to
    /// `level`. Otherwise the member learns and the result tells whether
    /// `level` was reached.
    pub fn register_sports(
        &mut self,
        member: &Member,
        sports: Sports,
        level: Level,
    ) -> Result<bool, ClubError> {
        self.require_member(member)?;
        if self.offered_level(sports).is_none_or(|offered| level > offered) {
            return Ok(false);
        }
        let learned = self
            .members
            .get_mut(member.name())
            .map(|m| m.learn(sports, level));
        Ok(learned == Some(level))
    }
}

impl fmt::Display for SportsClub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {}, fee per sports: {}, members: [",
            self.name,
            format_cents(self.fee_per_sports)
        )?;
        for (i, name) in self.members.keys().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, "], sports: {{")?;
        for (i, (sports, level)) in self.offered_sports.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", sports, level)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SportsMap;

    fn member(name: &str, sports: &[(Sports, Level)]) -> Member {
        Member::with_sports(name, &sports.iter().copied().collect::<SportsMap>()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert_eq!(SportsClub::new("", 10).unwrap_err(), ClubError::EmptyName);
        assert_eq!(
            SportsClub::new("Club", -1).unwrap_err(),
            ClubError::NegativeFee(-1)
        );
    }

    #[test]
    fn test_membership_fee() {
        let mut club = SportsClub::new("Club", 1000).unwrap();
        club.offer(Sports::Golf, Level::Advanced);
        club.offer(Sports::Archery, Level::Beginner);
        let anna = member("Anna", &[(Sports::Golf, Level::Normal), (Sports::Hockey, Level::Normal)]);
        club.add_member(anna.clone());

        assert_eq!(club.calculate_membership_fee(&anna), Ok(2100));
        assert_eq!(
            club.calculate_membership_fee(&Member::new("Bert").unwrap()),
            Err(ClubError::NotAMember("Bert".into()))
        );
    }

    #[test]
    fn test_register_sports() {
        let mut club = SportsClub::new("Club", 1000).unwrap();
        club.offer(Sports::Archery, Level::Professional);
        let normal = member("Anna", &[(Sports::Archery, Level::Normal)]);
        let beginner = member("Bert", &[(Sports::Archery, Level::Beginner)]);
        club.add_member(normal.clone());
        club.add_member(beginner.clone());

        assert_eq!(club.register_sports(&normal, Sports::Archery, Level::Advanced), Ok(true));
        assert_eq!(club.register_sports(&beginner, Sports::Archery, Level::Advanced), Ok(false));
        assert_eq!(club.member("Bert").and_then(|m| m.level(Sports::Archery)), Some(Level::Normal));
        assert_eq!(club.register_sports(&normal, Sports::Hockey, Level::Beginner), Ok(false));
    }

    #[test]
    fn test_add_and_remove() {
        let mut club = SportsClub::new("Club", 1000).unwrap();
        let anna = Member::new("Anna").unwrap();
        assert!(club.add_member(anna.clone()));
        assert!(!club.add_member(anna.clone()));
        assert!(club.remove_member(&anna));
        assert!(!club.remove_member(&anna));
    }

    #[test]
    fn test_display() {
        let mut club = SportsClub::new("Club", 1000).unwrap();
        club.add_member(Member::new("Hans").unwrap());
        club.offer(Sports::Archery, Level::Professional);
        assert_eq!(
            club.to_string(),
            "name: Club, fee per sports: 10.00, members: [Hans], sports: {ARCHERY=Professional}"
        );
    }
}
