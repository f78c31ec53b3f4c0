use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::position::{Position, PositionMap, PositionSet, Zone};

/// A named template mapping positions to slot counts for one team size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub name: String,
    pub slots: PositionMap<u8>,
}

impl Formation {
    #[must_use]
    pub fn new<N>(name: N, slots: &[(Position, u8)]) -> Self
    where
        N: Into<String>,
    {
        let mut map = PositionMap::default();
        for (position, count) in slots {
            map[*position] += *count;
        }
        Self {
            name: name.into(),
            slots: map,
        }
    }

    /// Number of players the formation fields.
    #[must_use]
    pub fn team_size(&self) -> usize {
        self.slots.values().map(|c| usize::from(*c)).sum()
    }

    #[must_use]
    pub fn slot_count(&self, position: Position) -> usize {
        usize::from(self.slots[position])
    }

    /// Positions with at least one slot.
    #[must_use]
    pub fn available_positions(&self) -> PositionSet {
        self.slots.map(|_, c| *c > 0)
    }

    /// Total slots in a zone.
    #[must_use]
    pub fn zone_slots(&self, zone: Zone) -> usize {
        Position::in_zone(zone).map(|p| self.slot_count(p)).sum()
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("formation '{name}' has no slots")]
    EmptyFormation { name: String },
    #[display("formation '{name}' must have exactly one goalkeeper slot")]
    GoalkeeperCount { name: String },
    #[display("duplicate formation '{name}' for team size {team_size}")]
    DuplicateFormation { name: String, team_size: usize },
}

/// All formations known to the balancer, grouped implicitly by team size.
/// Deserializes from a formation array through [`FormationCatalog::from_formations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Formation>", into = "Vec<Formation>")]
pub struct FormationCatalog {
    formations: Vec<Formation>,
}

impl TryFrom<Vec<Formation>> for FormationCatalog {
    type Error = CatalogError;

    fn try_from(formations: Vec<Formation>) -> Result<Self, Self::Error> {
        Self::from_formations(formations)
    }
}

impl From<FormationCatalog> for Vec<Formation> {
    fn from(catalog: FormationCatalog) -> Self {
        catalog.formations
    }
}

impl Default for FormationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormationCatalog {
    /// Builds a catalog from caller-supplied formations.
    ///
    /// Every formation must be non-empty with exactly one goalkeeper, and names must be
    /// unique within a team size.
    pub fn from_formations(formations: Vec<Formation>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for formation in &formations {
            let team_size = formation.team_size();
            if team_size == 0 {
                return Err(CatalogError::EmptyFormation {
                    name: formation.name.clone(),
                });
            }
            if formation.slot_count(Position::Gk) != 1 {
                return Err(CatalogError::GoalkeeperCount {
                    name: formation.name.clone(),
                });
            }
            if !seen.insert((team_size, formation.name.as_str())) {
                return Err(CatalogError::DuplicateFormation {
                    name: formation.name.clone(),
                    team_size,
                });
            }
        }
        Ok(Self { formations })
    }

    /// The built-in catalog covering team sizes 5 to 13.
    #[must_use]
    pub fn builtin() -> Self {
        use Position::{Am, Cb, Cm, Dm, Fb, Gk, St, W, Wm};

        let f = Formation::new;
        let formations = vec![
            // 5-a-side
            f("2-1-1", &[(Gk, 1), (Cb, 2), (Cm, 1), (St, 1)]),
            f("1-2-1", &[(Gk, 1), (Cb, 1), (Wm, 2), (St, 1)]),
            // 6-a-side
            f("2-2-1", &[(Gk, 1), (Cb, 2), (Wm, 2), (St, 1)]),
            f("3-1-1", &[(Gk, 1), (Cb, 1), (Fb, 2), (Cm, 1), (St, 1)]),
            // 7-a-side
            f("2-3-1", &[(Gk, 1), (Cb, 2), (Dm, 1), (Wm, 2), (St, 1)]),
            f("3-2-1", &[(Gk, 1), (Cb, 1), (Fb, 2), (Cm, 2), (St, 1)]),
            f("2-2-2", &[(Gk, 1), (Cb, 2), (Cm, 2), (St, 2)]),
            // 8-a-side
            f("3-3-1", &[(Gk, 1), (Cb, 1), (Fb, 2), (Dm, 1), (Wm, 2), (St, 1)]),
            f("2-3-2", &[(Gk, 1), (Cb, 2), (Cm, 1), (Wm, 2), (St, 2)]),
            f("3-2-2", &[(Gk, 1), (Cb, 1), (Fb, 2), (Cm, 2), (St, 2)]),
            // 9-a-side
            f("3-3-2", &[(Gk, 1), (Cb, 1), (Fb, 2), (Dm, 1), (Wm, 2), (St, 2)]),
            f(
                "3-4-1",
                &[(Gk, 1), (Cb, 1), (Fb, 2), (Dm, 1), (Cm, 1), (Wm, 2), (St, 1)],
            ),
            f("4-3-1", &[(Gk, 1), (Cb, 2), (Fb, 2), (Cm, 1), (Wm, 2), (St, 1)]),
            // 10-a-side
            f("4-3-2", &[(Gk, 1), (Cb, 2), (Fb, 2), (Dm, 1), (Wm, 2), (St, 2)]),
            f(
                "3-4-2",
                &[(Gk, 1), (Cb, 1), (Fb, 2), (Dm, 1), (Cm, 1), (Wm, 2), (St, 2)],
            ),
            f("4-4-1", &[(Gk, 1), (Cb, 2), (Fb, 2), (Cm, 2), (Wm, 2), (St, 1)]),
            // 11-a-side
            f("4-4-2", &[(Gk, 1), (Cb, 2), (Fb, 2), (Cm, 2), (Wm, 2), (St, 2)]),
            f(
                "4-3-3",
                &[(Gk, 1), (Cb, 2), (Fb, 2), (Dm, 1), (Cm, 2), (St, 1), (W, 2)],
            ),
            f(
                "4-2-3-1",
                &[(Gk, 1), (Cb, 2), (Fb, 2), (Dm, 2), (Am, 1), (W, 2), (St, 1)],
            ),
            f("3-5-2", &[(Gk, 1), (Cb, 3), (Dm, 1), (Cm, 2), (Wm, 2), (St, 2)]),
            // 12-a-side
            f(
                "4-4-3",
                &[(Gk, 1), (Cb, 2), (Fb, 2), (Cm, 2), (Wm, 2), (St, 1), (W, 2)],
            ),
            f("5-4-2", &[(Gk, 1), (Cb, 3), (Fb, 2), (Cm, 2), (Wm, 2), (St, 2)]),
            // 13-a-side
            f(
                "5-4-3",
                &[(Gk, 1), (Cb, 3), (Fb, 2), (Cm, 2), (Wm, 2), (St, 1), (W, 2)],
            ),
            f(
                "4-5-3",
                &[
                    (Gk, 1),
                    (Cb, 2),
                    (Fb, 2),
                    (Dm, 1),
                    (Cm, 2),
                    (Wm, 2),
                    (St, 1),
                    (W, 2),
                ],
            ),
        ];
        Self { formations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Formation> + '_ {
        self.formations.iter()
    }

    /// All formations fielding exactly `team_size` players.
    #[must_use]
    pub fn for_team_size(&self, team_size: usize) -> Vec<&Formation> {
        self.formations
            .iter()
            .filter(|f| f.team_size() == team_size)
            .collect()
    }

    /// Team sizes the catalog has at least one formation for.
    #[must_use]
    pub fn team_sizes(&self) -> BTreeSet<usize> {
        self.formations.iter().map(Formation::team_size).collect()
    }
}

/// Splits a pool into two team sizes; team A is the smaller side for odd pools.
#[must_use]
pub const fn team_sizes(player_count: usize) -> (usize, usize) {
    let a = player_count / 2;
    (a, player_count - a)
}
