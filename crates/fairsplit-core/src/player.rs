use serde::{Deserialize, Serialize};

use crate::{
    BalanceError,
    position::{Position, PositionMap, enum_map},
};

/// Opaque player identifier supplied by the caller.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl PlayerId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Underlying attributes that feed the composite scores.
///
/// Values are on the same 0-100 scale as position ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defending,
    Physical,
    Vision,
    Composure,
    Positioning,
    Stamina,
    AttackWorkRate,
    DefenseWorkRate,
}

impl Attribute {
    pub const LEN: usize = 12;
    pub const ALL: [Self; Self::LEN] = [
        Self::Pace,
        Self::Shooting,
        Self::Passing,
        Self::Dribbling,
        Self::Defending,
        Self::Physical,
        Self::Vision,
        Self::Composure,
        Self::Positioning,
        Self::Stamina,
        Self::AttackWorkRate,
        Self::DefenseWorkRate,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

enum_map! {
    /// One value per [`Attribute`].
    pub struct AttributeMap<T> for Attribute;
}

/// A rated player as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePlayer {
    pub id: PlayerId,
    pub name: String,
    /// Rating per position; positions not listed are rated 0.
    pub ratings: PositionMap<f32>,
    /// Attributes; attributes not listed are 0.
    #[serde(default)]
    pub attributes: AttributeMap<f32>,
}

impl CandidatePlayer {
    #[must_use]
    pub fn new<I, N>(id: I, name: N, ratings: PositionMap<f32>) -> Self
    where
        I: Into<PlayerId>,
        N: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            ratings,
            attributes: AttributeMap::default(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeMap<f32>) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn rating(&self, position: Position) -> f32 {
        self.ratings[position]
    }

    /// Checks that every rating and attribute is a finite, non-negative number.
    pub fn validate(&self) -> Result<(), BalanceError> {
        let invalid = |reason: String| BalanceError::InvalidPlayer {
            player_id: self.id.clone(),
            reason,
        };
        for (position, rating) in self.ratings.iter() {
            if !rating.is_finite() || *rating < 0.0 {
                return Err(invalid(format!("rating for {position} is {rating}")));
            }
        }
        for (attribute, value) in self.attributes.iter() {
            if !value.is_finite() || *value < 0.0 {
                return Err(invalid(format!("attribute {attribute:?} is {value}")));
            }
        }
        Ok(())
    }
}

/// Shape of a player's rating profile.
///
/// Invariants: `best_score >= second_best_score >= 0` and `specialization_ratio >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingProfile {
    pub best_score: f32,
    pub best_position: Position,
    pub second_best_score: f32,
    /// `best_score / second_best_score`, or 1.0 without a runner-up.
    pub specialization_ratio: f32,
}

impl RatingProfile {
    /// Derives the profile from per-position ratings.
    ///
    /// Ties for the best rating go to the position declared first.
    #[must_use]
    pub fn from_ratings(ratings: &PositionMap<f32>) -> Self {
        let mut best_position = Position::Gk;
        let mut best_score = f32::NEG_INFINITY;
        for (position, rating) in ratings.iter() {
            if *rating > best_score {
                best_score = *rating;
                best_position = position;
            }
        }
        let best_score = best_score.max(0.0);
        let second_best_score = ratings
            .iter()
            .filter(|(p, _)| *p != best_position)
            .map(|(_, r)| *r)
            .fold(0.0_f32, f32::max)
            .min(best_score);
        let specialization_ratio = if second_best_score > 0.0 {
            best_score / second_best_score
        } else {
            1.0
        };
        Self {
            best_score,
            best_position,
            second_best_score,
            specialization_ratio,
        }
    }

    /// How far a rating falls short of the player's peak.
    #[must_use]
    pub fn gap(&self, rating: f32) -> f32 {
        (self.best_score - rating).max(0.0)
    }
}
