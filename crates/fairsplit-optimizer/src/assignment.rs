//! The slot-filling assignment engine.
//!
//! One call builds one candidate pair of teams:
//!
//! 1. **Goalkeepers** - the weakest players by best score take the goalkeeper slots,
//!    each going to the team behind in running score
//! 2. **Outfield** - until every slot is filled, the team behind in score picks next:
//!    it fills its least popular open position (lowest priority counter, ties broken by
//!    the cryptographically strong generator), choosing among the candidates rated
//!    within a proximity threshold of the best one, weighted toward the top
//!
//! Priority counters start at the configured base plus the number of players whose best
//! position it is, and grow each time the position is filled, so scarce positions are
//! filled while good candidates for them are still available.
//!
//! An optional split guidance softly steers stars toward a target side by lowering
//! their selection weight for the other team; it never forbids a pick.

use std::cmp::Ordering;

use arrayvec::ArrayVec;
use fairsplit_core::{
    AlgorithmParams, BalanceRng, CANDIDATE_POOL_CAPACITY, Formation, Position, PositionMap, Side,
    team_sizes,
};
use fairsplit_evaluator::{player_analytics::AnalyzedPool, team::Team};
use rand::{Rng as _, seq::IndexedRandom as _};

use crate::selection::{normalize_l1, weighted_choice};

/// Where each player ended up, indexed by pool index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentState {
    slots: Vec<Option<(Side, Position)>>,
}

impl AssignmentState {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            slots: vec![None; player_count],
        }
    }

    /// Rebuilds the state from the teams' slot structure.
    #[must_use]
    pub fn from_teams(a: &Team, b: &Team, player_count: usize) -> Self {
        let mut state = Self::new(player_count);
        for team in [a, b] {
            for (position, index) in team.players() {
                state.assign(index, team.side, position);
            }
        }
        state
    }

    pub fn assign(&mut self, index: usize, side: Side, position: Position) {
        self.slots[index] = Some((side, position));
    }

    #[must_use]
    pub fn side(&self, index: usize) -> Option<Side> {
        self.slots[index].map(|(side, _)| side)
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<Position> {
        self.slots[index].map(|(_, position)| position)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

/// Two completed teams and the per-player record of who went where.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamPair {
    pub a: Team,
    pub b: Team,
    pub state: AssignmentState,
}

impl TeamPair {
    #[must_use]
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Number of `indices` placed on each side.
    #[must_use]
    pub fn count_on_sides(&self, indices: &[usize]) -> [usize; 2] {
        let mut counts = [0; 2];
        for i in indices {
            if let Some(side) = self.state.side(*i) {
                counts[side.index()] += 1;
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    rating: f32,
    gap: f32,
    best: f32,
}

/// Rating at the position, then smaller gap to the player's peak, then lower best score.
fn compare_candidates(x: &Candidate, y: &Candidate) -> Ordering {
    y.rating
        .total_cmp(&x.rating)
        .then_with(|| x.gap.total_cmp(&y.gap))
        .then_with(|| x.best.total_cmp(&y.best))
        .then_with(|| x.index.cmp(&y.index))
}

struct Builder<'a> {
    pool: &'a AnalyzedPool,
    params: &'a AlgorithmParams,
    guidance: Option<&'a [Option<Side>]>,
    teams: [Team; 2],
    scores: [f32; 2],
    priorities: [PositionMap<u32>; 2],
    available: Vec<usize>,
    state: AssignmentState,
    top_n: usize,
}

impl Builder<'_> {
    fn open_slots(&self, side: Side, position: Position) -> usize {
        self.teams[side.index()].open_slots(position)
    }

    fn has_open_outfield(&self, side: Side) -> bool {
        Position::ALL
            .iter()
            .any(|p| !p.is_goalkeeper() && self.open_slots(side, *p) > 0)
    }

    /// The team behind in running score among `sides`; ties broken at random.
    fn pick_side(&self, sides: &[Side], rng: &mut BalanceRng) -> Option<Side> {
        match sides {
            [] => None,
            [side] => Some(*side),
            _ => {
                let [a, b] = self.scores;
                match a.total_cmp(&b) {
                    Ordering::Less => Some(Side::A),
                    Ordering::Greater => Some(Side::B),
                    Ordering::Equal if rng.tie_break.random() => Some(Side::A),
                    Ordering::Equal => Some(Side::B),
                }
            }
        }
    }

    fn place(&mut self, side: Side, position: Position, available_slot: usize, contribution: f32) {
        let index = self.available.swap_remove(available_slot);
        let t = side.index();
        self.teams[t].slots[position].push(index);
        self.scores[t] += contribution;
        let priority = &mut self.priorities[t][position];
        *priority = priority.saturating_add(self.params.priority_step);
        self.state.assign(index, side, position);
    }

    fn assign_goalkeepers(&mut self, rng: &mut BalanceRng) {
        let pool = self.pool;
        let mut by_best = self.available.clone();
        by_best.sort_by(|x, y| {
            let bx = pool.analytics(*x).profile.best_score;
            let by = pool.analytics(*y).profile.best_score;
            bx.total_cmp(&by).then_with(|| x.cmp(y))
        });

        for index in by_best {
            let open = Side::ALL
                .into_iter()
                .filter(|s| self.open_slots(*s, Position::Gk) > 0)
                .collect::<ArrayVec<Side, 2>>();
            let Some(side) = self.pick_side(&open, rng) else {
                break;
            };
            let Some(slot) = self.available.iter().position(|i| *i == index) else {
                continue;
            };
            let best = pool.analytics(index).profile.best_score;
            self.place(side, Position::Gk, slot, best);
        }
    }

    fn pick_position(&self, side: Side, rng: &mut BalanceRng) -> Option<Position> {
        let priorities = &self.priorities[side.index()];
        let open = Position::ALL
            .into_iter()
            .filter(|p| !p.is_goalkeeper() && self.open_slots(side, *p) > 0)
            .collect::<ArrayVec<Position, { Position::LEN }>>();
        let lowest = open.iter().map(|p| priorities[*p]).min()?;
        let tied = open
            .into_iter()
            .filter(|p| priorities[*p] == lowest)
            .collect::<ArrayVec<Position, { Position::LEN }>>();
        tied.choose(&mut rng.tie_break).copied()
    }

    fn candidates(&self, position: Position) -> ArrayVec<Candidate, CANDIDATE_POOL_CAPACITY> {
        let mut ranked = self
            .available
            .iter()
            .map(|index| {
                let profile = &self.pool.analytics(*index).profile;
                let rating = self.pool.player(*index).rating(position);
                Candidate {
                    index: *index,
                    rating,
                    gap: profile.gap(rating),
                    best: profile.best_score,
                }
            })
            .collect::<Vec<_>>();
        ranked.sort_by(compare_candidates);

        let Some(top) = ranked.first().map(|c| c.rating) else {
            return ArrayVec::new();
        };
        ranked
            .into_iter()
            .take_while(|c| c.rating >= top - self.params.proximity_threshold)
            .take(self.top_n)
            .collect()
    }

    fn assign_outfield(&mut self, rng: &mut BalanceRng) -> Option<()> {
        loop {
            let open = Side::ALL
                .into_iter()
                .filter(|s| self.has_open_outfield(*s))
                .collect::<ArrayVec<Side, 2>>();
            let Some(side) = self.pick_side(&open, rng) else {
                return Some(());
            };
            let position = self.pick_position(side, rng)?;

            let candidates = self.candidates(position);
            let mut weights = candidates
                .iter()
                .zip(&self.params.selection_weights)
                .map(|(c, w)| {
                    let off_target = self
                        .guidance
                        .and_then(|g| g[c.index])
                        .is_some_and(|target| target != side);
                    if off_target {
                        w * (1.0 - self.params.guidance_strength)
                    } else {
                        *w
                    }
                })
                .collect::<ArrayVec<f32, CANDIDATE_POOL_CAPACITY>>();
            normalize_l1(&mut weights);
            let chosen = weighted_choice(&weights, &mut rng.sampling).unwrap_or(0);
            let candidate = candidates.get(chosen)?;

            let slot = self.available.iter().position(|i| *i == candidate.index)?;
            self.place(side, position, slot, candidate.rating);
        }
    }
}

/// Builds one pair of teams, or `None` when the formations do not match the pool.
///
/// `guidance`, when given, holds a target side per pool index (stars only).
#[must_use]
pub fn assign_teams(
    pool: &AnalyzedPool,
    formation_a: &Formation,
    formation_b: &Formation,
    params: &AlgorithmParams,
    guidance: Option<&[Option<Side>]>,
    rng: &mut BalanceRng,
) -> Option<TeamPair> {
    let (size_a, size_b) = team_sizes(pool.len());
    if formation_a.team_size() != size_a || formation_b.team_size() != size_b {
        return None;
    }
    if guidance.is_some_and(|g| g.len() != pool.len()) {
        return None;
    }

    let popularity = PositionMap::from_fn(|p| {
        (0..pool.len())
            .filter(|i| pool.analytics(*i).profile.best_position == p)
            .count()
    });
    let seeded = PositionMap::from_fn(|p| {
        params.base_priorities[p].saturating_add(u32::try_from(popularity[p]).unwrap_or(u32::MAX))
    });

    let mut builder = Builder {
        pool,
        params,
        guidance,
        teams: [
            Team::new(Side::A, formation_a.clone()),
            Team::new(Side::B, formation_b.clone()),
        ],
        scores: [0.0; 2],
        priorities: [seeded, seeded],
        available: (0..pool.len()).collect(),
        state: AssignmentState::new(pool.len()),
        top_n: params.top_n(size_b),
    };

    builder.assign_goalkeepers(rng);
    builder.assign_outfield(rng)?;

    let [a, b] = builder.teams;
    if !(a.is_complete() && b.is_complete() && builder.available.is_empty()) {
        return None;
    }
    Some(TeamPair {
        a,
        b,
        state: builder.state,
    })
}

#[cfg(test)]
mod tests {
    use fairsplit_core::{BalanceConfig, BalanceSeed, CandidatePlayer, FormationCatalog};

    use super::*;
    use crate::test_util::player;

    fn ten_players() -> Vec<CandidatePlayer> {
        vec![
            player("g1", &[(Position::Gk, 65.0)]),
            player("g2", &[(Position::Gk, 62.0)]),
            player("c1", &[(Position::Cb, 80.0), (Position::Fb, 72.0)]),
            player("c2", &[(Position::Cb, 78.0)]),
            player("c3", &[(Position::Cb, 75.0), (Position::Dm, 70.0)]),
            player("c4", &[(Position::Cb, 73.0)]),
            player("m1", &[(Position::Cm, 84.0), (Position::Am, 80.0)]),
            player("m2", &[(Position::Cm, 79.0)]),
            player("s1", &[(Position::St, 88.0)]),
            player("s2", &[(Position::St, 83.0), (Position::W, 80.0)]),
        ]
    }

    #[test]
    fn test_assignment_is_complete() {
        let config = BalanceConfig::default();
        let pool = AnalyzedPool::analyze(ten_players(), &config);
        let catalog = FormationCatalog::builtin();
        let formation = catalog.for_team_size(5)[0];
        for seed in 0..20 {
            let mut rng = BalanceRng::from_seed(BalanceSeed::from_u128(seed));
            let pair = assign_teams(&pool, formation, formation, &config.algorithm, None, &mut rng)
                .unwrap();
            assert!(pair.a.is_complete() && pair.b.is_complete());
            assert!(pair.state.is_complete());
            assert_eq!(pair.a.player_count() + pair.b.player_count(), 10);
            let mut seen = pair
                .a
                .players()
                .chain(pair.b.players())
                .map(|(_, i)| i)
                .collect::<Vec<_>>();
            seen.sort_unstable();
            assert_eq!(seen, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_weakest_players_keep_goal() {
        let config = BalanceConfig::default();
        let pool = AnalyzedPool::analyze(ten_players(), &config);
        let formation = Formation::new(
            "2-1-1",
            &[(Position::Gk, 1), (Position::Cb, 2), (Position::Cm, 1), (Position::St, 1)],
        );
        let mut rng = BalanceRng::from_seed(BalanceSeed::from_u128(1));
        let pair = assign_teams(&pool, &formation, &formation, &config.algorithm, None, &mut rng)
            .unwrap();
        let mut keepers = [pair.a.slots[Position::Gk][0], pair.b.slots[Position::Gk][0]];
        keepers.sort_unstable();
        assert_eq!(keepers, [0, 1]);
        assert_eq!(pair.state.position(0), Some(Position::Gk));
    }

    #[test]
    fn test_mismatched_formation_is_rejected() {
        let config = BalanceConfig::default();
        let pool = AnalyzedPool::analyze(ten_players(), &config);
        let catalog = FormationCatalog::builtin();
        let six = catalog.for_team_size(6)[0];
        let five = catalog.for_team_size(5)[0];
        let mut rng = BalanceRng::from_seed(BalanceSeed::from_u128(0));
        assert!(assign_teams(&pool, six, five, &config.algorithm, None, &mut rng).is_none());
    }

    #[test]
    fn test_same_seed_same_teams() {
        let config = BalanceConfig::default();
        let pool = AnalyzedPool::analyze(ten_players(), &config);
        let formation = FormationCatalog::builtin().for_team_size(5)[1].clone();
        let run = |seed| {
            let mut rng = BalanceRng::from_seed(BalanceSeed::from_u128(seed));
            assign_teams(&pool, &formation, &formation, &config.algorithm, None, &mut rng)
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_full_guidance_strength_keeps_stars_on_target() {
        let config = {
            let mut config = BalanceConfig::default();
            config.algorithm.guidance_strength = 1.0;
            config
        };
        let mut players = ten_players();
        players[8] = player("s1", &[(Position::St, 90.0)]);
        players[9] = player("s2", &[(Position::St, 90.0)]);
        let pool = AnalyzedPool::analyze(players, &config);
        let formation = Formation::new(
            "2-1-1",
            &[(Position::Gk, 1), (Position::Cb, 2), (Position::Cm, 1), (Position::St, 1)],
        );
        let mut guidance = vec![None; 10];
        guidance[8] = Some(Side::B);
        guidance[9] = Some(Side::A);
        for seed in 0..10 {
            let mut rng = BalanceRng::from_seed(BalanceSeed::from_u128(seed));
            let pair = assign_teams(
                &pool,
                &formation,
                &formation,
                &config.algorithm,
                Some(&guidance),
                &mut rng,
            )
            .unwrap();
            assert_eq!(pair.state.side(8), Some(Side::B));
            assert_eq!(pair.state.side(9), Some(Side::A));
        }
    }

    #[test]
    fn test_state_rebuilds_from_teams() {
        let config = BalanceConfig::default();
        let pool = AnalyzedPool::analyze(ten_players(), &config);
        let formation = FormationCatalog::builtin().for_team_size(5)[0].clone();
        let mut rng = BalanceRng::from_seed(BalanceSeed::from_u128(4));
        let pair = assign_teams(&pool, &formation, &formation, &config.algorithm, None, &mut rng)
            .unwrap();
        assert_eq!(AssignmentState::from_teams(&pair.a, &pair.b, 10), pair.state);
    }
}
