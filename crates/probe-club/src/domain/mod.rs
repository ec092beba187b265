//! Club membership domain.
//!
//! Members practice sports at a [`Level`]; a [`SportsClub`] offers sports up
//! to some level and bills each member per practiced, offered sport. A
//! [`Trainer`] is a member accredited for some sports, which it is never
//! billed for.
//! Money amounts are integer cents.

mod club;
mod level;
mod member;
mod sports;
mod trainer;

pub use club::SportsClub;
pub use level::Level;
pub use member::{Member, SportsMap};
pub use sports::Sports;
pub use trainer::Trainer;

use thiserror::Error;

/// Contract violations raised by the domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClubError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("sports must not be empty")]
    NoSports,

    #[error("fee per sports must not be negative, got {0}")]
    NegativeFee(i64),

    #[error("'{0}' is not a member of the club")]
    NotAMember(String),

    #[error("unknown level '{0}'")]
    UnknownLevel(String),

    #[error("unknown sports '{0}'")]
    UnknownSports(String),
}

/// Renders cents as `12.34`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1000), "10.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-1234), "-12.34");
    }
}
