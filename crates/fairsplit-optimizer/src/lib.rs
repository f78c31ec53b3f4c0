//! Search side of the balancer: finds a good split of a player pool into two teams.
//!
//! # Modules
//!
//! - [`star_split`] - ranks every division of the pool's stars before the search starts
//! - [`assignment`] - builds one candidate pair of teams slot by slot
//! - [`monte_carlo`] - the driver: repeated guided assignment, keeping the best
//! - [`refinement`] - cross-team swap hill-climbing of the winner
//! - [`result`] / [`report`] - the externally facing result and its diagnostic text
//! - [`selection`] - weighted random choice shared by the above
//!
//! # Example
//!
//! ```rust,ignore
//! use fairsplit_core::{BalanceConfig, BalanceSeed};
//! use fairsplit_optimizer::monte_carlo::TeamBalancer;
//!
//! let balancer = TeamBalancer::new(BalanceConfig::default())?;
//! let result = balancer.balance_with_seed(players, BalanceSeed::from_u128(42))?;
//! println!("{}", result.diagnostic_text);
//! ```
//!
//! Randomness comes from a [`fairsplit_core::BalanceRng`]: the same seed, players and
//! configuration always give the same teams.

pub use self::{
    monte_carlo::{TeamBalancer, balance},
    result::{BalanceResult, PositionedPlayer, RunStats, TeamSummary},
};

pub mod assignment;
pub mod monte_carlo;
pub mod refinement;
pub mod report;
pub mod result;
pub mod selection;
pub mod star_split;

#[cfg(test)]
mod test_util;
