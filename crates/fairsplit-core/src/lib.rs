//! Domain types shared by the fairsplit crates: positions and zones, rated players,
//! formations, pitch geometry, tunable configuration and seeded randomness.

pub use self::{config::*, formation::*, geometry::*, player::*, position::*, seed::*};

pub mod config;
pub mod formation;
pub mod geometry;
pub mod player;
pub mod position;
pub mod seed;

/// One of the two teams being balanced.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Side {
    #[display("A")]
    A,
    #[display("B")]
    B,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid config `{field}`: {reason}")]
pub struct ConfigError {
    pub field: String,
    pub reason: String,
}

impl ConfigError {
    pub fn new<F, R>(field: F, reason: R) -> Self
    where
        F: Into<String>,
        R: Into<String>,
    {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum BalanceError {
    #[display("player count {count} out of range {min}..={max}")]
    PlayerCountOutOfRange {
        count: usize,
        min: usize,
        max: usize,
    },
    #[display("invalid player {player_id}: {reason}")]
    InvalidPlayer {
        player_id: PlayerId,
        reason: String,
    },
    #[display("duplicate player id {player_id}")]
    DuplicatePlayer { player_id: PlayerId },
    #[display("no formation available for team size {team_size}")]
    NoFormation { team_size: usize },
    #[display("invalid configuration: {_0}")]
    InvalidConfig(ConfigError),
    #[display("no valid assignment found in {iterations} iterations")]
    NoValidAssignment { iterations: usize },
}

impl From<ConfigError> for BalanceError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other().index(), 0);
    }

    #[test]
    fn test_config_error_converts_into_balance_error() {
        let err: BalanceError = ConfigError::new("limits.min_players", "must be at least 4").into();
        assert!(err.is_invalid_config());
        assert_eq!(
            err.to_string(),
            "invalid configuration: invalid config `limits.min_players`: must be at least 4"
        );
    }
}
