//! Hill-climbing over cross-team swaps of outfield players.
//!
//! Each round tries swapping every outfield occupant of team A with every outfield
//! occupant of team B, keeping a swap only when it strictly improves the score. The
//! slot structure never changes, so formations stay satisfied. Rounds stop early once
//! a full pass finds nothing to improve.

use fairsplit_core::{Position, PositionMap};

use crate::assignment::TeamPair;

/// Outcome of [`refine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    pub swaps: usize,
    pub rounds: usize,
    pub score: f32,
}

fn outfield_slots(slots: &PositionMap<Vec<usize>>) -> Vec<(Position, usize)> {
    slots
        .iter()
        .filter(|(position, _)| !position.is_goalkeeper())
        .flat_map(|(position, group)| (0..group.len()).map(move |i| (position, i)))
        .collect()
}

fn swap(pair: &mut TeamPair, (pa, ia): (Position, usize), (pb, ib): (Position, usize)) {
    let a = &mut pair.a.slots[pa][ia];
    let b = &mut pair.b.slots[pb][ib];
    std::mem::swap(a, b);
    let (a, b) = (*a, *b);
    pair.state.assign(a, pair.a.side, pa);
    pair.state.assign(b, pair.b.side, pb);
}

/// Improves `pair` in place, starting from its current `score`.
///
/// `evaluate` scores a candidate pair; higher is better.
pub fn refine<F>(pair: &mut TeamPair, score: f32, max_rounds: usize, mut evaluate: F) -> Refinement
where
    F: FnMut(&TeamPair) -> f32,
{
    let slots_a = outfield_slots(&pair.a.slots);
    let slots_b = outfield_slots(&pair.b.slots);
    let mut outcome = Refinement {
        swaps: 0,
        rounds: 0,
        score,
    };

    for _ in 0..max_rounds {
        outcome.rounds += 1;
        let mut improved = false;
        for sa in &slots_a {
            for sb in &slots_b {
                swap(pair, *sa, *sb);
                let candidate = evaluate(pair);
                if candidate > outcome.score {
                    outcome.score = candidate;
                    outcome.swaps += 1;
                    improved = true;
                    log::debug!(
                        "refinement swap {:?}/{:?}: score {:.4}",
                        sa.0,
                        sb.0,
                        candidate
                    );
                } else {
                    swap(pair, *sa, *sb);
                }
            }
        }
        if !improved {
            break;
        }
    }
    outcome
}
