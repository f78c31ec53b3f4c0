use fairsplit_core::{Attribute, AttributeMap, CandidatePlayer, Position, PositionMap, Zone};

/// A player rated only at the listed positions.
pub(crate) fn player(id: &str, entries: &[(Position, f32)]) -> CandidatePlayer {
    let mut ratings = PositionMap::default();
    for (p, r) in entries {
        ratings[*p] = *r;
    }
    CandidatePlayer::new(id, id, ratings)
}

/// A player peaking at `primary`, somewhat weaker across the same zone and weaker
/// still elsewhere.
pub(crate) fn rated(id: &str, primary: Position, base: f32) -> CandidatePlayer {
    let ratings = PositionMap::from_fn(|p| {
        if p == primary {
            base
        } else if p.is_goalkeeper() || primary.is_goalkeeper() {
            25.0
        } else if p.zone() == primary.zone() {
            base - 6.0
        } else {
            base - 14.0
        }
    });
    let (attack, defense) = match primary.zone() {
        Zone::Attack => (80.0, 50.0),
        Zone::Midfield => (70.0, 70.0),
        Zone::Defense | Zone::Goalkeeper => (50.0, 80.0),
    };
    let attributes = AttributeMap::from_fn(|a| match a {
        Attribute::AttackWorkRate => attack,
        Attribute::DefenseWorkRate => defense,
        _ => base - 5.0,
    });
    CandidatePlayer::new(id, id, ratings).with_attributes(attributes)
}

/// Sixteen players: two goalkeepers and fourteen outfield players, the first
/// `star_count` of whom rate high enough to be stars.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn squad(star_count: usize) -> Vec<CandidatePlayer> {
    use Position::{Am, Cb, Cm, Dm, Fb, St, W, Wm};

    const OUTFIELD: [Position; 14] = [St, Cb, Cm, W, Cb, Fb, Fb, Dm, Cm, Wm, Am, St, Cb, Cm];

    let mut players = vec![
        rated("keeper-1", Position::Gk, 70.0),
        rated("keeper-2", Position::Gk, 66.0),
    ];
    for (i, primary) in OUTFIELD.into_iter().enumerate() {
        let base = if i < star_count {
            88.0 + i as f32
        } else {
            72.0 + (i % 7) as f32 * 2.0
        };
        players.push(rated(&format!("player-{i}"), primary, base));
    }
    players
}
