//! Human-readable diagnostics for a balancing result.

use std::fmt::{self, Display, Formatter};

use fairsplit_core::Side;

use crate::result::BalanceResult;

/// Renders the diagnostic report of `result`.
#[must_use]
pub fn format_diagnostics(result: &BalanceResult) -> String {
    Diagnostics(result).to_string()
}

/// [`Display`] adapter behind [`format_diagnostics`].
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics<'a>(pub &'a BalanceResult);

impl Display for Diagnostics<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(
            f,
            "score {:.4} = weighted {:.4} x star multiplier {:.3}",
            result.score, result.metrics.weighted_score, result.star_multiplier
        )?;

        for side in Side::ALL {
            let summary = result.summary(side);
            let formation = match side {
                Side::A => &result.formation_a,
                Side::B => &result.formation_b,
            };
            writeln!(
                f,
                "team {side} ({}): {} players, total {:.1}, {} stars",
                formation.name, summary.player_count, summary.total_rating, summary.star_count
            )?;
            for player in result.team(side) {
                let star = if player.is_star { " *" } else { "" };
                writeln!(
                    f,
                    "  {:<3} {:<24} {:>5.1} (best {} {:.1}){star}",
                    player.position, player.name, player.rating, player.best_position, player.best_score
                )?;
            }
        }

        writeln!(f, "metrics:")?;
        for (name, score) in result.metrics.named_scores() {
            writeln!(f, "  {name:<20} {score:.3}")?;
        }

        let stars = &result.star_distribution;
        writeln!(f, "star distribution {:.3}:", stars.score)?;
        for (name, value) in [
            ("affinity", stars.affinity_balance),
            ("quality", stars.quality_balance),
            ("flexibility", stars.flexibility_balance),
            ("specialist", stars.specialist_balance),
            ("peak talent", stars.peak_talent_balance),
        ] {
            writeln!(f, "  {name:<20} {value:.3}")?;
        }

        let split = &result.star_split_stats;
        writeln!(
            f,
            "star splits: {} stars, {} evaluated{}, best {:.3} mean {:.3} worst {:.3}, exponent {:.2}",
            split.star_count,
            split.evaluated,
            if split.exhaustive { "" } else { " (sampled)" },
            split.best,
            split.mean,
            split.worst,
            split.penalty_exponent,
        )?;

        let stats = &result.stats;
        write!(
            f,
            "run: {}/{} iterations succeeded, best at {}, {} refinement swaps, seed {}",
            stats.successful_iterations,
            stats.iterations,
            stats.best_iteration,
            stats.refinement_swaps,
            stats.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use fairsplit_core::{BalanceConfig, BalanceSeed};

    use super::*;
    use crate::{monte_carlo::TeamBalancer, test_util::squad};

    #[test]
    fn test_report_mentions_every_section() {
        let mut config = BalanceConfig::default();
        config.monte_carlo.max_iterations = 30;
        let result = TeamBalancer::new(config)
            .unwrap()
            .balance_with_seed(squad(2), BalanceSeed::from_u128(1))
            .unwrap();
        let text = format_diagnostics(&result);

        assert_eq!(text, result.diagnostic_text);
        assert!(text.starts_with("score "));
        for needle in [
            "team A (",
            "team B (",
            "positional",
            "talent_distribution",
            "star distribution",
            "peak talent",
            "star splits: 2 stars",
            "refinement swaps",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in\n{text}");
        }
        assert!(text.contains(&result.stats.seed.to_string()));
        assert_eq!(text.matches(" *\n").count(), 2);
    }
}
