//! Tournament dataset models.
//!
//! These mirror the JSON document `{ "tournaments": [...] }` one to one.
//! Match records stay as loose key/value maps here; the typed view over a
//! match lives in `calculate::extract`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::position::{Position, Round, Side};

/// Keys in a match record that never name a participant.
pub const RESERVED_KEYS: [&str; 3] = ["winner", "score", "round"];

/// A raw match record: two slot keys plus `winner`, `score` and `round`.
///
/// A `BTreeMap` keeps the slot keys in lexical order, independent of the
/// order they were declared in the source document.
pub type RawMatch = BTreeMap<String, Value>;

/// Returns true if `key` is one of the reserved match keys.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Non-reserved entries of a match whose value is a string, in key order.
pub fn slot_entries(raw: &RawMatch) -> impl Iterator<Item = (&str, &str)> {
    raw.iter()
        .filter(|(key, _)| !is_reserved_key(key))
        .filter_map(|(key, value)| value.as_str().map(|v| (key.as_str(), v)))
}

/// Read a string field from a match, treating non-strings as absent.
pub fn string_field<'a>(raw: &'a RawMatch, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// A slot value names a participant unless it is blank after trimming.
pub fn is_occupied(value: &str) -> bool {
    !value.trim().is_empty()
}

/// The participant in slot `key`, if the slot is occupied.
pub fn occupied_slot<'a>(raw: &'a RawMatch, key: &str) -> Option<&'a str> {
    string_field(raw, key).filter(|v| is_occupied(v))
}

/// One region's rounds. Each list is either empty or complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub quarters: Vec<RawMatch>,

    #[serde(default)]
    pub quartersemi: Vec<RawMatch>,

    #[serde(default)]
    pub semifinal: Vec<RawMatch>,
}

impl Region {
    /// Matches of one regional round. Finals are not regional and yield nothing.
    pub fn round(&self, round: Round) -> &[RawMatch] {
        match round {
            Round::Quarters => &self.quarters,
            Round::QuarterSemi => &self.quartersemi,
            Round::Semifinal => &self.semifinal,
            Round::Finals => &[],
        }
    }
}

/// Both regions plus the final.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketSet {
    #[serde(default)]
    pub west: Region,

    #[serde(default)]
    pub east: Region,

    /// Zero or one match.
    #[serde(default)]
    pub finals: Vec<RawMatch>,
}

impl BracketSet {
    pub fn region(&self, side: Side) -> &Region {
        match side {
            Side::West => &self.west,
            Side::East => &self.east,
        }
    }

    /// Matches of the round that seats `position`: the finals, or one
    /// region's round.
    pub fn matches_for(&self, position: &Position) -> &[RawMatch] {
        match position.round {
            Round::Finals => &self.finals,
            round => self.region(position.side).round(round),
        }
    }

    /// Every match in play order: west and east for each regional round,
    /// then the finals.
    pub fn matches(&self) -> impl Iterator<Item = MatchRef<'_>> {
        let regional = Round::REGIONAL.into_iter().flat_map(move |round| {
            Side::ALL.into_iter().flat_map(move |side| {
                self.region(side)
                    .round(round)
                    .iter()
                    .enumerate()
                    .map(move |(index, raw)| MatchRef {
                        round,
                        side: Some(side),
                        index,
                        raw,
                    })
            })
        });
        let finals = self.finals.iter().enumerate().map(|(index, raw)| MatchRef {
            round: Round::Finals,
            side: None,
            index,
            raw,
        });
        regional.chain(finals)
    }
}

/// A match together with where it sits in the bracket.
#[derive(Debug, Clone, Copy)]
pub struct MatchRef<'a> {
    pub round: Round,
    /// `None` for the finals.
    pub side: Option<Side>,
    pub index: usize,
    pub raw: &'a RawMatch,
}

/// One historical edition of the tournament.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub year: String,

    #[serde(default)]
    pub champion: Option<String>,

    #[serde(default)]
    pub total_participants: u32,

    #[serde(default)]
    pub brackets: BracketSet,
}

impl Tournament {
    /// Numeric year, if the year string parses.
    pub fn year_number(&self) -> Option<u32> {
        year_number(&self.year)
    }

    pub fn has_participants(&self) -> bool {
        self.total_participants > 0
    }

    /// The losing finalist: whichever finalist is not the final's winner.
    ///
    /// `None` when there is no final or its winner matches neither finalist.
    pub fn runner_up(&self) -> Option<&str> {
        let final_match = self.brackets.finals.first()?;
        let winner = string_field(final_match, "winner")?;
        let west = string_field(final_match, "west_finalist");
        let east = string_field(final_match, "east_finalist");

        if west == Some(winner) {
            east
        } else if east == Some(winner) {
            west
        } else {
            None
        }
    }

    /// Find the match, in any round, in which both participants appear.
    pub fn find_match(&self, first: &str, second: &str) -> Option<MatchRef<'_>> {
        self.brackets.matches().find(|m| {
            let players: Vec<&str> = slot_entries(m.raw).map(|(_, name)| name).collect();
            players.contains(&first) && players.contains(&second)
        })
    }

    /// Winner of the match between two participants, if that match exists.
    pub fn match_winner(&self, first: &str, second: &str) -> Option<&str> {
        self.find_match(first, second)
            .and_then(|m| string_field(m.raw, "winner"))
    }
}

/// The loaded dataset: the full tournament collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tournaments: Vec<Tournament>,
}

impl Dataset {
    pub fn new(tournaments: Vec<Tournament>) -> Self {
        Self { tournaments }
    }

    pub fn find(&self, year: &str) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.year == year)
    }

    /// Latest tournament with participants, or the latest overall when none
    /// have any.
    pub fn latest(&self) -> Option<&Tournament> {
        self.tournaments
            .iter()
            .filter(|t| t.has_participants())
            .max_by(|a, b| compare_years(&a.year, &b.year))
            .or_else(|| {
                self.tournaments
                    .iter()
                    .max_by(|a, b| compare_years(&a.year, &b.year))
            })
    }

    /// All years, ascending.
    pub fn years(&self) -> Vec<&str> {
        let mut years: Vec<&str> = self.tournaments.iter().map(|t| t.year.as_str()).collect();
        years.sort_by(|a, b| compare_years(a, b));
        years
    }

    /// Earliest year in the dataset.
    pub fn base_year(&self) -> Option<&str> {
        base_year(&self.tournaments)
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }
}

/// Parse a year string such as `"2014"`.
pub fn year_number(year: &str) -> Option<u32> {
    year.trim().parse().ok()
}

/// Order year strings numerically, falling back to string order for years
/// that do not parse.
pub fn compare_years(a: &str, b: &str) -> std::cmp::Ordering {
    match (year_number(a), year_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Earliest year across a tournament collection.
pub fn base_year(tournaments: &[Tournament]) -> Option<&str> {
    tournaments
        .iter()
        .map(|t| t.year.as_str())
        .min_by(|a, b| compare_years(a, b))
}
