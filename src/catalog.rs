//! Star Wars saga catalog
//!
//! The nine saga films as a static table, plus the two orderings used to map a
//! 1-based position onto a film: chronological (story order) and released
//! (theatrical order).

use crate::modules::{ModuleError, ModuleResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of films in the catalog
pub const MOVIE_COUNT: usize = 9;

/// The trilogy a film belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trilogy {
    Original,
    Prequel,
    Sequel,
}

impl Trilogy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trilogy::Original => "Original",
            Trilogy::Prequel => "Prequel",
            Trilogy::Sequel => "Sequel",
        }
    }
}

impl fmt::Display for Trilogy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Static metadata for a single film
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieRecord {
    /// Release number, 1-based
    pub id: u8,
    /// Box office title
    pub title: &'static str,
    /// Trilogy the film is part of
    pub trilogy: Trilogy,
    /// Position of the film within its trilogy (1..=3)
    pub sequence: u8,
}

/// Films indexed by `id - 1`.
///
/// Entry 7 carries sequence 1: The Force Awakens opens the Sequel trilogy.
pub static MOVIES: [MovieRecord; MOVIE_COUNT] = [
    MovieRecord {
        id: 1,
        title: "Episode IV – A New Hope",
        trilogy: Trilogy::Original,
        sequence: 1,
    },
    MovieRecord {
        id: 2,
        title: "Episode V – The Empire Strikes Back",
        trilogy: Trilogy::Original,
        sequence: 2,
    },
    MovieRecord {
        id: 3,
        title: "Episode VI – Return of the Jedi",
        trilogy: Trilogy::Original,
        sequence: 3,
    },
    MovieRecord {
        id: 4,
        title: "Episode I – The Phantom Menace",
        trilogy: Trilogy::Prequel,
        sequence: 1,
    },
    MovieRecord {
        id: 5,
        title: "Episode II – Attack of the Clones",
        trilogy: Trilogy::Prequel,
        sequence: 2,
    },
    MovieRecord {
        id: 6,
        title: "Episode III – Revenge of the Sith",
        trilogy: Trilogy::Prequel,
        sequence: 3,
    },
    MovieRecord {
        id: 7,
        title: "Episode VII – The Force Awakens",
        trilogy: Trilogy::Sequel,
        sequence: 1,
    },
    MovieRecord {
        id: 8,
        title: "Episode VIII – The Last Jedi",
        trilogy: Trilogy::Sequel,
        sequence: 2,
    },
    MovieRecord {
        id: 9,
        title: "Episode IX – The Rise of Skywalker",
        trilogy: Trilogy::Sequel,
        sequence: 3,
    },
];

const RELEASED_ORDER: [u8; MOVIE_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
const CHRONOLOGICAL_ORDER: [u8; MOVIE_COUNT] = [4, 5, 6, 1, 2, 3, 7, 8, 9];

/// Ordering used to map a position onto a film
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingScheme {
    /// Story order: prequels first
    #[default]
    Chronological,
    /// Theatrical release order
    Released,
}

impl OrderingScheme {
    /// All recognized schemes
    pub const ALL: [OrderingScheme; 2] = [OrderingScheme::Chronological, OrderingScheme::Released];

    /// Movie ids in the order this scheme presents them
    pub fn order(&self) -> &'static [u8; MOVIE_COUNT] {
        match self {
            OrderingScheme::Chronological => &CHRONOLOGICAL_ORDER,
            OrderingScheme::Released => &RELEASED_ORDER,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingScheme::Chronological => "chronological",
            OrderingScheme::Released => "released",
        }
    }
}

impl fmt::Display for OrderingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderingScheme {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chronological" => Ok(OrderingScheme::Chronological),
            "released" => Ok(OrderingScheme::Released),
            other => Err(ModuleError::InvalidScheme(other.to_string())),
        }
    }
}

/// The values reported back for a resolved position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieLookup {
    pub title: &'static str,
    pub trilogy: Trilogy,
    pub trilogy_sequence: u8,
}

impl From<&MovieRecord> for MovieLookup {
    fn from(record: &MovieRecord) -> Self {
        Self {
            title: record.title,
            trilogy: record.trilogy,
            trilogy_sequence: record.sequence,
        }
    }
}

impl fmt::Display for MovieLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} #{})",
            self.title, self.trilogy, self.trilogy_sequence
        )
    }
}

/// Get a film by its release number
pub fn record(id: u8) -> Option<&'static MovieRecord> {
    MOVIES.iter().find(|m| m.id == id)
}

/// Resolve a 1-based position under the given scheme
pub fn lookup(position: i64, scheme: OrderingScheme) -> ModuleResult<MovieLookup> {
    let index = usize::try_from(position)
        .ok()
        .and_then(|p| p.checked_sub(1))
        .filter(|i| *i < MOVIE_COUNT)
        .ok_or(ModuleError::InvalidMovieNumber { movie: position })?;

    let id = scheme.order()[index];
    record(id)
        .map(MovieLookup::from)
        .ok_or(ModuleError::InvalidMovieNumber { movie: position })
}

/// Resolve a position with the scheme given by name.
///
/// The position is validated before the scheme.
pub fn resolve(position: i64, scheme: &str) -> ModuleResult<MovieLookup> {
    if !(1..=MOVIE_COUNT as i64).contains(&position) {
        return Err(ModuleError::InvalidMovieNumber { movie: position });
    }
    lookup(position, scheme.parse()?)
}

/// Iterate `(position, film)` pairs in scheme order
pub fn iter(scheme: OrderingScheme) -> impl Iterator<Item = (usize, &'static MovieRecord)> {
    scheme
        .order()
        .iter()
        .enumerate()
        .filter_map(|(i, id)| record(*id).map(|m| (i + 1, m)))
}
