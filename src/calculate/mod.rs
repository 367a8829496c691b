//! Statistics calculation engine.
//!
//! Computes derived metrics from a loaded tournament collection:
//! - Per-match vote extraction
//! - Per-position vote totals, history and occurrence maps
//! - Matchup win percentages and historical win rates
//! - Repeat-appearance counts
//!
//! Every function here is a pure fold over the collection it is handed.

pub mod aggregate;
pub mod extract;
pub mod matchup;
pub mod participation;
pub mod summary;

pub use aggregate::{
    accumulate, aggregate_history, aggregate_occurrences, aggregate_votes, champion_positions,
    diagnose, finalist_positions, participant_positions,
};
pub use extract::{extract_match_votes, BracketMatch, MalformedMatch, MatchIssue, MatchVotes, Score};
pub use matchup::{opponent_of, opponent_position};
pub use participation::{appearance_label, count_prior_appearances};
pub use summary::{
    all_win_percentages, formatted_history, historical_win_rate, historical_win_rate_since,
    history_lines, position_stats, position_stats_since, win_percentage, NO_HISTORY,
};
