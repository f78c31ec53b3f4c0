use serde::{Deserialize, Serialize};

use crate::{formation::Formation, position::Position};

/// Layout coordinates on a half pitch, both axes in `0.0..=100.0`.
///
/// `x` runs from the left touchline to the right, `y` from the opponent's goal line (0)
/// to the team's own goal line (100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchPoint {
    pub x: f32,
    pub y: f32,
}

const WIDE_PAIR_X: [f32; 2] = [12.0, 88.0];
const WIDE_SPREAD: (f32, f32) = (10.0, 90.0);

const fn depth(position: Position) -> f32 {
    match position {
        Position::Gk => 95.0,
        Position::Cb => 80.0,
        Position::Fb => 74.0,
        Position::Dm => 64.0,
        Position::Cm => 55.0,
        Position::Wm => 50.0,
        Position::Am => 40.0,
        Position::St => 15.0,
        Position::W => 24.0,
    }
}

/// Horizontal band a central group is spread across.
fn central_band(position: Position, formation: Option<&Formation>) -> (f32, f32) {
    let lacks = |p: Position| formation.is_some_and(|f| f.slot_count(p) == 0);
    match position {
        Position::Cb if lacks(Position::Fb) => (15.0, 85.0),
        Position::Cm if lacks(Position::Wm) => (20.0, 80.0),
        Position::St if lacks(Position::W) => (25.0, 75.0),
        Position::St => (35.0, 65.0),
        _ => (30.0, 70.0),
    }
}

#[expect(clippy::cast_precision_loss)]
fn spread(index: usize, group_size: usize, (lo, hi): (f32, f32)) -> f32 {
    if group_size <= 1 {
        return f32::midpoint(lo, hi);
    }
    let index = index.min(group_size - 1);
    lo + (hi - lo) * index as f32 / (group_size - 1) as f32
}

/// Places the `index`-th of `group_size` players sharing `position`.
///
/// Wide positions hug the touchlines; central groups are spread evenly across a band
/// that widens when the formation leaves the flanks empty.
#[must_use]
pub fn position_coordinates(
    position: Position,
    index: usize,
    group_size: usize,
    formation: Option<&Formation>,
) -> PitchPoint {
    let y = depth(position);
    let x = if position.is_goalkeeper() {
        50.0
    } else if position.is_wide() {
        if group_size == 2 {
            WIDE_PAIR_X[index.min(1)]
        } else {
            spread(index, group_size, WIDE_SPREAD)
        }
    } else {
        spread(index, group_size, central_band(position, formation))
    };
    PitchPoint { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goalkeeper_is_centered() {
        let p = position_coordinates(Position::Gk, 0, 1, None);
        assert_eq!(p, PitchPoint { x: 50.0, y: 95.0 });
    }

    #[test]
    fn test_wide_pair_hugs_touchlines() {
        let left = position_coordinates(Position::Fb, 0, 2, None);
        let right = position_coordinates(Position::Fb, 1, 2, None);
        assert_eq!(left.x, 12.0);
        assert_eq!(right.x, 88.0);
        assert_eq!(left.y, right.y);
    }

    #[test]
    fn test_back_line_widens_without_fullbacks() {
        let with_fb = Formation::new("4", &[(Position::Gk, 1), (Position::Cb, 2), (Position::Fb, 2)]);
        let without_fb = Formation::new("3", &[(Position::Gk, 1), (Position::Cb, 3)]);
        let narrow = position_coordinates(Position::Cb, 0, 2, Some(&with_fb));
        let wide = position_coordinates(Position::Cb, 0, 3, Some(&without_fb));
        assert_eq!(narrow.x, 30.0);
        assert_eq!(wide.x, 15.0);
        assert_eq!(position_coordinates(Position::Cb, 1, 3, Some(&without_fb)).x, 50.0);
    }

    #[test]
    fn test_attackers_are_ahead_of_defenders() {
        let st = position_coordinates(Position::St, 0, 1, None);
        let cb = position_coordinates(Position::Cb, 0, 1, None);
        assert!(st.y < cb.y);
    }
}
