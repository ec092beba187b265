use super::{ClubError, Level, Sports};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The sports a member practices, with their level.
pub type SportsMap = BTreeMap<Sports, Level>;

/// A club member.
///
/// Equality, ordering and hashing consider the name only.
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    sports: SportsMap,
}

impl Member {
    /// Creates a member practicing no sports yet.
    pub fn new(name: impl Into<String>) -> Result<Self, ClubError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClubError::EmptyName);
        }
        Ok(Self {
            name,
            sports: SportsMap::new(),
        })
    }

    /// Creates a member with a copy of `sports`, which must not be empty.
    pub fn with_sports(name: impl Into<String>, sports: &SportsMap) -> Result<Self, ClubError> {
        let mut member = Self::new(name)?;
        if sports.is_empty() {
            return Err(ClubError::NoSports);
        }
        member.sports = sports.clone();
        Ok(member)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A copy of the practiced sports.
    pub fn sports(&self) -> SportsMap {
        self.sports.clone()
    }

    pub fn level(&self, sports: Sports) -> Option<Level> {
        self.sports.get(&sports).copied()
    }

    /// The sports this member is billed for.
    pub fn billable_sports(&self) -> BTreeSet<Sports> {
        self.sports.keys().copied().collect()
    }

    /// Trains `sports` towards `target`.
    ///
    /// A new sport starts at `Beginner`. An existing one advances by a single
    /// level if `target` is above the current level. Returns the level reached.
    pub fn learn(&mut self, sports: Sports, target: Level) -> Level {
        let level = match self.sports.get(&sports) {
            None => Level::Beginner,
            Some(&current) if target > current => current.next(),
            Some(&current) => current,
        };
        self.sports.insert(sports, level);
        level
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Member {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Member {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Writes `{ARCHERY=Beginner, GOLF=Normal}`.
pub(super) fn write_sports(f: &mut fmt::Formatter<'_>, sports: &SportsMap) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (sports, level)) in sports.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", sports, level)?;
    }
    write!(f, "}}")
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name: {}, sports: ", self.name)?;
        write_sports(f, &self.sports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_inputs() {
        assert_eq!(Member::new("").unwrap_err(), ClubError::EmptyName);
        assert_eq!(
            Member::with_sports("Hans", &SportsMap::new()).unwrap_err(),
            ClubError::NoSports
        );
        let sports = SportsMap::from([(Sports::Golf, Level::Normal)]);
        assert_eq!(
            Member::with_sports("", &sports).unwrap_err(),
            ClubError::EmptyName
        );
    }

    #[test]
    fn test_learn() {
        let mut member = Member::with_sports(
            "Hans",
            &SportsMap::from([(Sports::Golf, Level::Normal), (Sports::Hockey, Level::Professional)]),
        )
        .unwrap();
        assert_eq!(member.learn(Sports::Football, Level::Advanced), Level::Beginner);
        assert_eq!(member.learn(Sports::Golf, Level::Professional), Level::Advanced);
        assert_eq!(member.learn(Sports::Hockey, Level::Beginner), Level::Professional);
        assert_eq!(member.level(Sports::Golf), Some(Level::Advanced));
    }

    #[test]
    fn test_identity_is_name() {
        let a = Member::with_sports("Anna", &SportsMap::from([(Sports::Golf, Level::Normal)])).unwrap();
        let b = Member::new("Anna").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert!(Member::new("Bert").unwrap() > a);
    }

    #[test]
    fn test_display() {
        let member = Member::with_sports(
            "Anna",
            &SportsMap::from([(Sports::Golf, Level::Normal), (Sports::Archery, Level::Beginner)]),
        )
        .unwrap();
        assert_eq!(
            member.to_string(),
            "name: Anna, sports: {ARCHERY=Beginner, GOLF=Normal}"
        );
    }
}
