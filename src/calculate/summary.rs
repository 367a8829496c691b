//! Per-position summaries: matchup percentages, historical win rates and
//! formatted vote history.

use std::collections::BTreeMap;

use tracing::debug;

use super::extract::{BracketMatch, SlotVotes};
use super::matchup::opponent_of;
use crate::models::{
    base_year, compare_years, occupied_slot, rounded_percent, string_field, year_number,
    MatchDetail, Position, PositionStats, RawMatch, Tournament, VoteHistory, VoteTotals,
    WinPercentage, WinRate,
};

/// Text shown for a position that has never been played.
pub const NO_HISTORY: &str = "No voting history available";

/// Share of the matchup's votes held by `position_id`.
///
/// `None` for an unknown position id.
pub fn win_percentage(position_id: &str, totals: &VoteTotals) -> Option<WinPercentage> {
    let opponent = opponent_of(position_id)?;
    Some(WinPercentage::new(
        totals.get(position_id),
        totals.get(opponent),
    ))
}

/// Win percentages for every position.
pub fn all_win_percentages(totals: &VoteTotals) -> BTreeMap<String, WinPercentage> {
    totals
        .iter()
        .filter_map(|(id, _)| win_percentage(id, totals).map(|pct| (id.to_string(), pct)))
        .collect()
}

/// History lines for a position: `"<year> - <participant> - <votes> votes"`,
/// with a trailing check mark for wins, ascending by year.
pub fn history_lines(position_id: &str, history: &VoteHistory) -> Vec<String> {
    let mut entries: Vec<_> = history.get(position_id).iter().collect();
    entries.sort_by(|a, b| compare_years(&a.year, &b.year));

    entries
        .into_iter()
        .map(|entry| {
            let mark = if entry.won { " ✓" } else { "" };
            format!(
                "{} - {} - {} votes{}",
                entry.year, entry.participant, entry.votes, mark
            )
        })
        .collect()
}

/// History lines joined with newlines, or [`NO_HISTORY`].
pub fn formatted_history(position_id: &str, history: &VoteHistory) -> String {
    let lines = history_lines(position_id, history);
    if lines.is_empty() {
        NO_HISTORY.to_string()
    } else {
        lines.join("\n")
    }
}

/// Tournaments strictly before `current_year` and no earlier than
/// `base_year`, ascending. `None` when `current_year` is the base year or
/// either year does not parse.
fn history_window<'t>(
    tournaments: &'t [Tournament],
    current_year: &str,
    base_year: &str,
) -> Option<Vec<&'t Tournament>> {
    let current = year_number(current_year)?;
    let base = year_number(base_year)?;
    if current == base {
        return None;
    }

    let mut window: Vec<&Tournament> = tournaments
        .iter()
        .filter(|t| {
            t.year_number()
                .map(|y| y >= base && y < current)
                .unwrap_or(false)
        })
        .collect();
    window.sort_by(|a, b| compare_years(&a.year, &b.year));
    Some(window)
}

/// The votes at `position` in one tournament, from the first well-formed
/// match that seats someone there, together with that match.
fn votes_at<'t>(
    tournament: &'t Tournament,
    position: &Position,
) -> Option<(&'t RawMatch, SlotVotes<'t>)> {
    tournament
        .brackets
        .matches_for(position)
        .iter()
        .filter(|raw| occupied_slot(raw, position.slot_key).is_some())
        .find_map(|raw| match BracketMatch::parse(raw, position.round) {
            Ok(parsed) => parsed
                .votes()
                .side_for_slot(position.slot_key)
                .map(|side| (raw, side)),
            Err(e) => {
                debug!("Ignoring {} match at {}: {}", tournament.year, position.id, e);
                None
            }
        })
}

/// Per-year breakdown behind [`historical_win_rate_since`].
pub fn position_stats_since(
    position_id: &str,
    tournaments: &[Tournament],
    current_year: &str,
    base_year: &str,
) -> Option<PositionStats> {
    let position = Position::by_id(position_id)?;
    let window = history_window(tournaments, current_year, base_year)?;

    let mut details = Vec::new();
    let mut position_votes: u64 = 0;
    let mut total_votes: u64 = 0;

    for tournament in window {
        let Some((raw, side)) = votes_at(tournament, position) else {
            continue;
        };
        position_votes += u64::from(side.votes);
        total_votes += u64::from(side.votes) + u64::from(side.opponent_votes);

        let full_score = string_field(raw, "score").unwrap_or_default().to_string();
        details.push(MatchDetail {
            year: tournament.year.clone(),
            participant: side.participant.to_string(),
            participant_score: side.votes,
            opponent_score: side.opponent_votes,
            full_score,
            is_winner: side.won,
        });
    }

    Some(PositionStats {
        position: position_id.to_string(),
        current_year: current_year.to_string(),
        total_votes,
        position_votes,
        match_count: details.len() as u32,
        win_rate: rounded_percent(position_votes, total_votes),
        details,
    })
}

/// Per-year breakdown using the dataset's earliest year as the base.
pub fn position_stats(
    position_id: &str,
    tournaments: &[Tournament],
    current_year: &str,
) -> Option<PositionStats> {
    let base = base_year(tournaments)?;
    position_stats_since(position_id, tournaments, current_year, base)
}

/// Historical win rate of `position_id` over the years from `base_year` up
/// to, but excluding, `current_year`.
///
/// `None` when `current_year` is the base year, or when the window holds no
/// matches or no votes for the position.
pub fn historical_win_rate_since(
    position_id: &str,
    tournaments: &[Tournament],
    current_year: &str,
    base_year: &str,
) -> Option<WinRate> {
    let window = history_window(tournaments, current_year, base_year)?;
    let stats = position_stats_since(position_id, tournaments, current_year, base_year)?;
    if stats.match_count == 0 || stats.total_votes == 0 {
        return None;
    }

    let first = window.first()?.year.as_str();
    let last = window.last()?.year.as_str();
    let data_range = if first == last {
        first.to_string()
    } else {
        format!("{}-{}", first, last)
    };

    Some(WinRate {
        win_rate: stats.win_rate,
        position_votes: stats.position_votes,
        total_votes: stats.total_votes,
        match_count: stats.match_count,
        data_range,
    })
}

/// Historical win rate using the dataset's earliest year as the base.
pub fn historical_win_rate(
    position_id: &str,
    tournaments: &[Tournament],
    current_year: &str,
) -> Option<WinRate> {
    let base = base_year(tournaments)?;
    historical_win_rate_since(position_id, tournaments, current_year, base)
}
