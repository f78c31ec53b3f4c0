//! Formation-aware classification of star players.
//!
//! A star is judged only on the positions the active formation actually fields: a
//! winger-first star in a formation without wingers is classified by what they can play
//! in that formation.

use fairsplit_core::{Position, PositionMap, PositionSet, StarParams, Zone, ZoneMap};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistKind {
    #[display("defensive specialist")]
    DefensiveSpecialist,
    #[display("midfielder")]
    Midfielder,
    #[display("attacking specialist")]
    AttackingSpecialist,
    #[display("all-rounder")]
    AllRounder,
}

impl SpecialistKind {
    pub const LEN: usize = 4;
    pub const ALL: [Self; Self::LEN] = [
        Self::DefensiveSpecialist,
        Self::Midfielder,
        Self::AttackingSpecialist,
        Self::AllRounder,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    const fn for_zone(zone: Zone) -> Self {
        match zone {
            Zone::Defense => Self::DefensiveSpecialist,
            Zone::Midfield => Self::Midfielder,
            Zone::Attack => Self::AttackingSpecialist,
            Zone::Goalkeeper => Self::AllRounder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarClassification {
    pub kind: SpecialistKind,
    /// Best rating per zone over the available positions; 0 for zones the formation
    /// leaves empty.
    pub zone_best: ZoneMap<f32>,
    /// Best rating over all available positions.
    pub best_score: f32,
    /// Share of available outfield positions rated close to the player's best.
    pub flexibility: f32,
}

#[must_use]
pub fn classify(
    ratings: &PositionMap<f32>,
    available: &PositionSet,
    params: &StarParams,
) -> StarClassification {
    let zone_best = ZoneMap::from_fn(|zone| {
        Position::in_zone(zone)
            .filter(|p| available.contains(*p))
            .map(|p| ratings[p])
            .fold(0.0, f32::max)
    });
    let best_score = available
        .positions()
        .map(|p| ratings[p])
        .fold(0.0, f32::max);

    let mut outfield = Zone::OUTFIELD.map(|z| (z, zone_best[z]));
    outfield.sort_by(|a, b| b.1.total_cmp(&a.1));
    let kind = if outfield[0].1 - outfield[1].1 > params.specialist_margin {
        SpecialistKind::for_zone(outfield[0].0)
    } else {
        SpecialistKind::AllRounder
    };

    StarClassification {
        kind,
        zone_best,
        best_score,
        flexibility: flexibility(ratings, available, params.flexibility_margin),
    }
}

#[expect(clippy::cast_precision_loss)]
fn flexibility(ratings: &PositionMap<f32>, available: &PositionSet, margin: f32) -> f32 {
    let outfield = available
        .positions()
        .filter(|p| !p.is_goalkeeper())
        .map(|p| ratings[p])
        .collect::<Vec<_>>();
    let Some(best) = outfield.iter().copied().reduce(f32::max) else {
        return 0.0;
    };
    let close = outfield.iter().filter(|r| **r >= best - margin).count();
    close as f32 / outfield.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(entries: &[(Position, f32)]) -> PositionMap<f32> {
        let mut map = PositionMap::default();
        for (p, r) in entries {
            map[*p] = *r;
        }
        map
    }

    fn all_positions() -> PositionSet {
        PositionSet::from_fn(|_| true)
    }

    #[test]
    fn test_attacking_specialist() {
        let r = ratings(&[(Position::St, 92.0), (Position::W, 88.0), (Position::Cm, 75.0)]);
        let c = classify(&r, &all_positions(), &StarParams::default());
        assert_eq!(c.kind, SpecialistKind::AttackingSpecialist);
        assert_eq!(c.zone_best[Zone::Attack], 92.0);
        assert_eq!(c.best_score, 92.0);
    }

    #[test]
    fn test_all_rounder_when_zones_are_close() {
        let r = ratings(&[(Position::Cm, 89.0), (Position::Cb, 87.0), (Position::St, 70.0)]);
        let c = classify(&r, &all_positions(), &StarParams::default());
        assert_eq!(c.kind, SpecialistKind::AllRounder);
    }

    #[test]
    fn test_classification_follows_available_positions() {
        let r = ratings(&[(Position::W, 93.0), (Position::Wm, 86.0), (Position::Cb, 60.0)]);
        let params = StarParams::default();
        assert_eq!(
            classify(&r, &all_positions(), &params).kind,
            SpecialistKind::AttackingSpecialist
        );

        let no_wingers = PositionSet::from_fn(|p| p != Position::W);
        let c = classify(&r, &no_wingers, &params);
        assert_eq!(c.kind, SpecialistKind::Midfielder);
        assert_eq!(c.best_score, 86.0);
        assert_eq!(c.zone_best[Zone::Attack], 0.0);
    }

    #[test]
    fn test_flexibility_share() {
        let r = ratings(&[(Position::Cm, 90.0), (Position::Am, 87.0), (Position::Dm, 80.0)]);
        let available = PositionSet::from_fn(|p| matches!(p, Position::Cm | Position::Am | Position::Dm | Position::Cb));
        let c = classify(&r, &available, &StarParams::default());
        assert!((c.flexibility - 0.5).abs() < 1e-6);
    }
}
