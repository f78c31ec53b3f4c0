use serde::{Deserialize, Serialize};

/// Coarse position group used for aggregate balance checks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    #[display("goalkeeper")]
    Goalkeeper,
    #[display("defense")]
    Defense,
    #[display("midfield")]
    Midfield,
    #[display("attack")]
    Attack,
}

impl Zone {
    pub const LEN: usize = 4;
    pub const ALL: [Self; Self::LEN] = [
        Self::Goalkeeper,
        Self::Defense,
        Self::Midfield,
        Self::Attack,
    ];
    /// Zones that outfield players can be compared in.
    pub const OUTFIELD: [Self; 3] = [Self::Defense, Self::Midfield, Self::Attack];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A playable position slot, declared in zone order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    /// Goalkeeper
    #[display("GK")]
    Gk,
    /// Centre-back
    #[display("CB")]
    Cb,
    /// Full-back
    #[display("FB")]
    Fb,
    /// Defensive midfielder
    #[display("DM")]
    Dm,
    /// Central midfielder
    #[display("CM")]
    Cm,
    /// Wide midfielder
    #[display("WM")]
    Wm,
    /// Attacking midfielder
    #[display("AM")]
    Am,
    /// Striker
    #[display("ST")]
    St,
    /// Winger
    #[display("W")]
    W,
}

impl Position {
    pub const LEN: usize = 9;
    pub const ALL: [Self; Self::LEN] = [
        Self::Gk,
        Self::Cb,
        Self::Fb,
        Self::Dm,
        Self::Cm,
        Self::Wm,
        Self::Am,
        Self::St,
        Self::W,
    ];
    /// The position whose rating measures finishing ability.
    pub const FINISHING: Self = Self::St;

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn zone(self) -> Zone {
        match self {
            Self::Gk => Zone::Goalkeeper,
            Self::Cb | Self::Fb => Zone::Defense,
            Self::Dm | Self::Cm | Self::Wm | Self::Am => Zone::Midfield,
            Self::St | Self::W => Zone::Attack,
        }
    }

    #[must_use]
    pub const fn is_goalkeeper(self) -> bool {
        matches!(self, Self::Gk)
    }

    /// Positions played near the touchline.
    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Fb | Self::Wm | Self::W)
    }

    /// Positions of the given zone, in declaration order.
    pub fn in_zone(zone: Zone) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |p| p.zone() == zone)
    }
}

/// Generates a dense, enum-indexed map serialized as a JSON object.
///
/// Missing keys deserialize to `T::default()`.
macro_rules! enum_map {
    ($(#[$meta:meta])* $vis:vis struct $name:ident<T> for $key:ty;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis struct $name<T>([T; <$key>::LEN]);

        impl<T> $name<T> {
            /// Builds a map by evaluating `f` for every key.
            pub fn from_fn<F>(mut f: F) -> Self
            where
                F: FnMut($key) -> T,
            {
                Self(std::array::from_fn(|i| f(<$key>::ALL[i])))
            }

            /// Iterates over `(key, value)` pairs in declaration order.
            pub fn iter(&self) -> impl Iterator<Item = ($key, &T)> + '_ {
                <$key>::ALL.into_iter().zip(self.0.iter())
            }

            /// Iterates over the values in declaration order.
            pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
                self.0.iter()
            }

            #[must_use]
            pub fn map<U, F>(&self, mut f: F) -> $name<U>
            where
                F: FnMut($key, &T) -> U,
            {
                $name::from_fn(|k| f(k, &self[k]))
            }
        }

        impl<T> std::ops::Index<$key> for $name<T> {
            type Output = T;

            fn index(&self, key: $key) -> &T {
                &self.0[key.index()]
            }
        }

        impl<T> std::ops::IndexMut<$key> for $name<T> {
            fn index_mut(&mut self, key: $key) -> &mut T {
                &mut self.0[key.index()]
            }
        }

        impl<T> serde::Serialize for $name<T>
        where
            T: serde::Serialize,
        {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_map(self.iter())
            }
        }

        impl<'de, T> serde::Deserialize<'de> for $name<T>
        where
            T: serde::Deserialize<'de> + Default,
        {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let mut entries = <std::collections::BTreeMap<$key, T> as serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                Ok(Self::from_fn(|k| entries.remove(&k).unwrap_or_default()))
            }
        }
    };
}

pub(crate) use enum_map;

enum_map! {
    /// One value per [`Position`].
    pub struct PositionMap<T> for Position;
}

enum_map! {
    /// One value per [`Zone`].
    pub struct ZoneMap<T> for Zone;
}

/// Set of positions, e.g. the positions a formation actually uses.
pub type PositionSet = PositionMap<bool>;

impl PositionSet {
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self[position]
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_fn(|p| self[p] || other[p])
    }

    /// Positions in the set, in declaration order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter().filter(|(_, v)| **v).map(|(p, _)| p)
    }
}
