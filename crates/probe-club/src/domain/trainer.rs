use super::member::write_sports;
use super::{ClubError, Level, Member, Sports, SportsMap};
use std::collections::BTreeSet;
use std::fmt;

/// A member accredited to teach some sports.
///
/// The accreditations are fixed at construction. Learning only changes the
/// practiced sports, so the two maps drift apart over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    member: Member,
    accreditations: SportsMap,
}

impl Trainer {
    /// Creates a trainer practicing exactly the sports it is accredited for.
    ///
    /// Both maps are independent copies of `accreditations`.
    pub fn new(name: impl Into<String>, accreditations: &SportsMap) -> Result<Self, ClubError> {
        Ok(Self {
            member: Member::with_sports(name, accreditations)?,
            accreditations: accreditations.clone(),
        })
    }

    pub fn as_member(&self) -> &Member {
        &self.member
    }

    pub fn as_member_mut(&mut self) -> &mut Member {
        &mut self.member
    }

    pub fn name(&self) -> &str {
        self.member.name()
    }

    /// A copy of the practiced sports.
    pub fn sports(&self) -> SportsMap {
        self.member.sports()
    }

    /// A copy of the accreditations.
    pub fn accreditations(&self) -> SportsMap {
        self.accreditations.clone()
    }

    /// Practiced sports without an accreditation.
    pub fn billable_sports(&self) -> BTreeSet<Sports> {
        self.member
            .billable_sports()
            .into_iter()
            .filter(|sports| !self.accreditations.contains_key(sports))
            .collect()
    }

    /// See [`Member::learn`].
    pub fn learn(&mut self, sports: Sports, target: Level) -> Level {
        self.member.learn(sports, target)
    }
}

impl fmt::Display for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, accreditations: ", self.member)?;
        write_sports(f, &self.accreditations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accreditations() -> SportsMap {
        SportsMap::from([(Sports::Golf, Level::Normal), (Sports::Diving, Level::Advanced)])
    }

    #[test]
    fn test_new_requires_accreditations() {
        assert_eq!(
            Trainer::new("Tina", &SportsMap::new()).unwrap_err(),
            ClubError::NoSports
        );
        assert_eq!(
            Trainer::new("", &accreditations()).unwrap_err(),
            ClubError::EmptyName
        );
    }

    #[test]
    fn test_learning_leaves_accreditations() {
        let mut tina = Trainer::new("Tina", &accreditations()).unwrap();
        assert!(tina.billable_sports().is_empty());

        assert_eq!(tina.learn(Sports::Golf, Level::Professional), Level::Advanced);
        tina.learn(Sports::Hockey, Level::Beginner);

        assert_eq!(tina.accreditations(), accreditations());
        assert_eq!(tina.sports().get(&Sports::Golf), Some(&Level::Advanced));
        assert_eq!(tina.billable_sports(), BTreeSet::from([Sports::Hockey]));
    }

    #[test]
    fn test_display() {
        let tina = Trainer::new("Tina", &accreditations()).unwrap();
        assert_eq!(
            tina.to_string(),
            "name: Tina, sports: {DIVING=Advanced, GOLF=Normal}, accreditations: {DIVING=Advanced, GOLF=Normal}"
        );
    }
}
