use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    rngs::StdRng,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a reproducible balancing run.
///
/// A 128-bit value written as 32 lowercase hex digits. The same seed, players and
/// configuration always produce the same teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BalanceSeed([u8; 16]);

impl BalanceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed `{input}`: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl fmt::Display for BalanceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for BalanceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self::from_u128(num))
    }
}

impl Serialize for BalanceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BalanceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<BalanceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BalanceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BalanceSeed(seed)
    }
}

/// The two random sources of a run.
///
/// `sampling` drives formation draws, split sampling and weighted candidate picks.
/// `tie_break` is a cryptographically strong generator reserved for breaking ties
/// between positions and between teams.
#[derive(Debug, Clone)]
pub struct BalanceRng {
    pub sampling: Pcg32,
    pub tie_break: StdRng,
}

impl BalanceRng {
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_seed(seed: BalanceSeed) -> Self {
        let value = u128::from_be_bytes(seed.0);
        let tie_break_seed = (value ^ (value >> 64)) as u64;
        Self {
            sampling: Pcg32::from_seed(seed.0),
            tie_break: StdRng::seed_from_u64(tie_break_seed),
        }
    }

    /// Seeds both generators from a fresh random seed, returning it for the run record.
    #[must_use]
    pub fn random() -> (Self, BalanceSeed) {
        let seed: BalanceSeed = rand::rng().random();
        (Self::from_seed(seed), seed)
    }
}
