//! Derived per-position statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::position::all_position_ids;

/// One appearance of a participant at a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub year: String,
    pub participant: String,
    pub votes: u32,
    pub won: bool,
}

/// Running state for one position while folding over the tournaments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionAccumulator {
    pub total_votes: u64,
    pub occurrences: u32,
    pub years: Vec<String>,
    pub history: Vec<HistoryEntry>,
}

/// Vote totals keyed by position id. Every bracket position is present.
///
/// Match scores are `u32`; totals across matches are `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoteTotals(BTreeMap<String, u64>);

impl VoteTotals {
    /// All 30 positions at zero.
    pub fn zeroed() -> Self {
        Self(all_position_ids().map(|id| (id.to_string(), 0)).collect())
    }

    /// Total for a position; unknown positions read as zero.
    pub fn get(&self, position_id: &str) -> u64 {
        self.0.get(position_id).copied().unwrap_or(0)
    }

    pub(crate) fn add(&mut self, position_id: &str, votes: u64) {
        if let Some(total) = self.0.get_mut(position_id) {
            *total += votes;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(id, total)| (id.as_str(), *total))
    }

    /// Sum across every position.
    pub fn grand_total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl Default for VoteTotals {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Vote history keyed by position id, each list ordered by year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoteHistory(BTreeMap<String, Vec<HistoryEntry>>);

impl VoteHistory {
    pub(crate) fn from_map(map: BTreeMap<String, Vec<HistoryEntry>>) -> Self {
        Self(map)
    }

    /// History for a position; empty for unknown positions.
    pub fn get(&self, position_id: &str) -> &[HistoryEntry] {
        self.0.get(position_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HistoryEntry])> {
        self.0.iter().map(|(id, h)| (id.as_str(), h.as_slice()))
    }
}

/// How often a tracked participant started from a position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub count: u32,
    /// Years, ascending.
    pub years: Vec<String>,
}

/// Occurrences keyed by position id. Only positions with a hit are present.
pub type OccurrenceMap = BTreeMap<String, Occurrence>;

/// A position's share of the votes in its matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinPercentage {
    /// Two-decimal percentage string, e.g. `"33.33"`.
    pub percentage: String,
    pub own_votes: u64,
    pub opponent_votes: u64,
}

impl WinPercentage {
    pub fn new(own_votes: u64, opponent_votes: u64) -> Self {
        let total = own_votes as f64 + opponent_votes as f64;
        let percentage = if total > 0.0 {
            format!("{:.2}", own_votes as f64 / total * 100.0)
        } else {
            "0.00".to_string()
        };

        Self {
            percentage,
            own_votes,
            opponent_votes,
        }
    }

    /// The percentage as a number.
    pub fn value(&self) -> f64 {
        self.percentage.parse().unwrap_or(0.0)
    }

    /// At least half the votes.
    pub fn is_favoured(&self) -> bool {
        self.value() >= 50.0
    }
}

/// Historical win rate for a position before a given year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinRate {
    /// Rounded percentage, 0 to 100.
    pub win_rate: u32,
    pub position_votes: u64,
    pub total_votes: u64,
    pub match_count: u32,
    /// `"2013"` or `"2013-2017"`.
    pub data_range: String,
}

/// One year's contribution to a position's historical win rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDetail {
    pub year: String,
    pub participant: String,
    pub participant_score: u32,
    pub opponent_score: u32,
    pub full_score: String,
    pub is_winner: bool,
}

/// Full breakdown behind a historical win rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionStats {
    pub position: String,
    pub current_year: String,
    pub total_votes: u64,
    pub position_votes: u64,
    pub match_count: u32,
    /// Zero when there were no votes.
    pub win_rate: u32,
    pub details: Vec<MatchDetail>,
}

/// Integer percentage rounded half up, zero when `total` is zero.
pub fn rounded_percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}
