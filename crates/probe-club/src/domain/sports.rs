use super::ClubError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A sport a club may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sports {
    Archery,
    Basketball,
    Climbing,
    Diving,
    Football,
    Golf,
    Handball,
    Hockey,
    Mountainbiking,
    Parkour,
}

impl Sports {
    pub const ALL: [Sports; 10] = [
        Sports::Archery,
        Sports::Basketball,
        Sports::Climbing,
        Sports::Diving,
        Sports::Football,
        Sports::Golf,
        Sports::Handball,
        Sports::Hockey,
        Sports::Mountainbiking,
        Sports::Parkour,
    ];

    pub fn constant_name(self) -> &'static str {
        match self {
            Sports::Archery => "ARCHERY",
            Sports::Basketball => "BASKETBALL",
            Sports::Climbing => "CLIMBING",
            Sports::Diving => "DIVING",
            Sports::Football => "FOOTBALL",
            Sports::Golf => "GOLF",
            Sports::Handball => "HANDBALL",
            Sports::Hockey => "HOCKEY",
            Sports::Mountainbiking => "MOUNTAINBIKING",
            Sports::Parkour => "PARKOUR",
        }
    }

    /// Fee factor in percent of the club's fee per sports.
    pub fn fee_factor(self) -> i64 {
        match self {
            Sports::Climbing => 120,
            Sports::Diving => 180,
            Sports::Golf => 210,
            _ => 100,
        }
    }

    /// The fee for this sport, truncated to whole cents.
    pub fn fee(self, fee_per_sports: i64) -> i64 {
        fee_per_sports * self.fee_factor() / 100
    }
}

impl fmt::Display for Sports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

impl FromStr for Sports {
    type Err = ClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sports::ALL
            .into_iter()
            .find(|sp| sp.constant_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ClubError::UnknownSports(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee() {
        assert_eq!(Sports::Archery.fee(1000), 1000);
        assert_eq!(Sports::Golf.fee(1000), 2100);
        assert_eq!(Sports::Climbing.fee(999), 1198);
    }

    #[test]
    fn test_parse() {
        assert_eq!("golf".parse::<Sports>(), Ok(Sports::Golf));
        assert!("curling".parse::<Sports>().is_err());
    }
}
