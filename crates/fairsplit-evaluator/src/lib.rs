//! Evaluation side of the balancer: how good is a given split of players?
//!
//! The crate is layered bottom-up:
//!
//! 1. **Scoring primitives** ([`scoring`]) - [`scoring::difference_ratio`] and
//!    [`scoring::calibrated_score`], the two functions every metric is built from
//! 2. **Player analytics** ([`player_analytics`]) - per-player composites, zone bests and
//!    star status, computed once per run
//! 3. **Zone classification** ([`zone_classifier`]) - formation-aware specialist type of
//!    each star
//! 4. **Star distribution** ([`star_distribution`]) - penalty for an uneven division of
//!    stars, shared by split pre-ranking and post-hoc evaluation
//! 5. **Team aggregates** ([`team`]) - one-pass sums over a completed team
//! 6. **Balance metrics** ([`balance_metrics`]) - eight calibrated sub-scores and their
//!    weighted combination
//!
//! ```text
//! BalanceMetrics (weighted score)
//!     ↓ compares
//! TeamAggregates × 2
//!     ↓ summarizes
//! Team (slots) + AnalyzedPool (player analytics)
//! ```
//!
//! Nothing here is random: given the same teams and configuration every function
//! returns the same value. Searching for good teams is the optimizer crate's job.

pub mod balance_metrics;
pub mod player_analytics;
pub mod scoring;
pub mod star_distribution;
pub mod team;
pub mod zone_classifier;
