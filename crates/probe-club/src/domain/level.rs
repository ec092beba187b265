use super::ClubError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Proficiency in one sport, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Beginner,
    Normal,
    Advanced,
    Professional,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Beginner,
        Level::Normal,
        Level::Advanced,
        Level::Professional,
    ];

    /// Human-readable name, also used by `Display`.
    pub fn mapped_name(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Normal => "Normal",
            Level::Advanced => "Advanced",
            Level::Professional => "Professional",
        }
    }

    /// The constant name, e.g. `BEGINNER`.
    pub fn constant_name(self) -> &'static str {
        match self {
            Level::Beginner => "BEGINNER",
            Level::Normal => "NORMAL",
            Level::Advanced => "ADVANCED",
            Level::Professional => "PROFESSIONAL",
        }
    }

    /// The next higher level. `Professional` stays `Professional`.
    pub fn next(self) -> Self {
        match self {
            Level::Beginner => Level::Normal,
            Level::Normal => Level::Advanced,
            Level::Advanced | Level::Professional => Level::Professional,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mapped_name())
    }
}

impl FromStr for Level {
    type Err = ClubError;

    /// Accepts the constant name or the mapped name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| {
                l.constant_name().eq_ignore_ascii_case(s) || l.mapped_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| ClubError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_saturates() {
        assert_eq!(Level::Beginner.next(), Level::Normal);
        assert_eq!(Level::Advanced.next(), Level::Professional);
        assert_eq!(Level::Professional.next(), Level::Professional);
    }

    #[test]
    fn test_parse() {
        assert_eq!("ADVANCED".parse::<Level>(), Ok(Level::Advanced));
        assert_eq!("normal".parse::<Level>(), Ok(Level::Normal));
        assert_eq!(
            "expert".parse::<Level>(),
            Err(ClubError::UnknownLevel("expert".into()))
        );
    }
}
