//! Position aggregation.
//!
//! Folds every match of every tournament into per-position accumulators.
//! Each call builds fresh state from the collection it is given; nothing is
//! cached between calls.

use std::collections::BTreeMap;

use tracing::debug;

use super::extract::{BracketMatch, MatchIssue};
use crate::models::{
    compare_years, slot_entries, HistoryEntry, Occurrence, OccurrenceMap, Position,
    PositionAccumulator, Round, Side, Tournament, VoteHistory, VoteTotals, POSITIONS,
};

/// Accumulators for all 30 positions, keyed by position id.
pub type Accumulators = BTreeMap<&'static str, PositionAccumulator>;

fn empty_accumulators() -> Accumulators {
    POSITIONS
        .iter()
        .map(|p| (p.id, PositionAccumulator::default()))
        .collect()
}

/// Fold vote totals and vote history for every position.
///
/// Each side of a well-formed match credits its own raw score to its
/// position, whether it won or lost. Malformed matches are skipped.
pub fn accumulate(tournaments: &[Tournament]) -> Accumulators {
    let mut accumulators = empty_accumulators();

    for tournament in tournaments {
        for at in tournament.brackets.matches() {
            let parsed = match BracketMatch::parse_at(&at) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(
                        "Skipping {} {:?} {} match {}: {}",
                        tournament.year, at.side, at.round, at.index, e
                    );
                    continue;
                }
            };

            // Parsing guarantees both slot keys are seats of this round.
            for side in parsed.votes().sides() {
                let Some(acc) = Position::by_slot_key(side.slot_key)
                    .and_then(|position| accumulators.get_mut(position.id))
                else {
                    continue;
                };
                acc.total_votes += u64::from(side.votes);
                acc.history.push(HistoryEntry {
                    year: tournament.year.clone(),
                    participant: side.participant.to_string(),
                    votes: side.votes,
                    won: side.won,
                });
            }
        }
    }

    for acc in accumulators.values_mut() {
        acc.history.sort_by(|a, b| compare_years(&a.year, &b.year));
    }

    accumulators
}

/// Total votes per position across all tournaments.
pub fn aggregate_votes(tournaments: &[Tournament]) -> VoteTotals {
    let mut totals = VoteTotals::zeroed();
    for (id, acc) in accumulate(tournaments) {
        totals.add(id, acc.total_votes);
    }
    totals
}

/// Per-position vote history, each list ascending by year.
pub fn aggregate_history(tournaments: &[Tournament]) -> VoteHistory {
    VoteHistory::from_map(
        accumulate(tournaments)
            .into_iter()
            .map(|(id, acc)| (id.to_string(), acc.history))
            .collect(),
    )
}

/// Count the quarters starting slots of a tracked participant.
///
/// `participant_for` names the participant to look for in each tournament
/// (its champion, its runner-up, or a fixed name). Only the quarters round
/// of each region is scanned; a tournament without a name is skipped.
pub fn aggregate_occurrences<'t, F>(tournaments: &'t [Tournament], participant_for: F) -> OccurrenceMap
where
    F: Fn(&'t Tournament) -> Option<&'t str>,
{
    let mut accumulators = empty_accumulators();

    for tournament in tournaments {
        let Some(name) = participant_for(tournament).filter(|n| !n.is_empty()) else {
            continue;
        };

        for side in Side::ALL {
            for raw in tournament.brackets.region(side).round(Round::Quarters) {
                for (key, value) in slot_entries(raw) {
                    if value != name {
                        continue;
                    }
                    let Some(acc) = Position::by_slot_key(key).and_then(|p| accumulators.get_mut(p.id))
                    else {
                        continue;
                    };
                    debug!("{} found at {} in {}", name, key, tournament.year);
                    acc.occurrences += 1;
                    acc.years.push(tournament.year.clone());
                }
            }
        }
    }

    accumulators
        .into_iter()
        .filter(|(_, acc)| acc.occurrences > 0)
        .map(|(id, mut acc)| {
            acc.years.sort_by(|a, b| compare_years(a, b));
            (
                id.to_string(),
                Occurrence {
                    count: acc.occurrences,
                    years: acc.years,
                },
            )
        })
        .collect()
}

/// Quarters starting slots of each year's champion.
pub fn champion_positions(tournaments: &[Tournament]) -> OccurrenceMap {
    aggregate_occurrences(tournaments, |t| t.champion.as_deref())
}

/// Quarters starting slots of each year's runner-up.
pub fn finalist_positions(tournaments: &[Tournament]) -> OccurrenceMap {
    aggregate_occurrences(tournaments, |t| {
        let runner_up = t.runner_up();
        if runner_up.is_none() {
            debug!("No runner-up for {}", t.year);
        }
        runner_up
    })
}

/// Quarters starting slots of one named participant across all years.
pub fn participant_positions(tournaments: &[Tournament], name: &str) -> OccurrenceMap {
    aggregate_occurrences(tournaments, |_| Some(name))
}

/// Every match that aggregation would skip, with the reason.
pub fn diagnose(tournaments: &[Tournament]) -> Vec<MatchIssue> {
    tournaments
        .iter()
        .flat_map(|t| {
            t.brackets.matches().filter_map(move |at| {
                BracketMatch::parse_at(&at)
                    .err()
                    .map(|e| MatchIssue::new(&t.year, &at, e))
            })
        })
        .collect()
}
