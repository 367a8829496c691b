//! Repeat-appearance counting.

use std::collections::BTreeSet;

use crate::models::{slot_entries, Round, Side, Tournament};

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether `normalized` starts in the quarters round of either region.
fn plays_in_quarters(tournament: &Tournament, normalized: &str) -> bool {
    Side::ALL.into_iter().any(|side| {
        tournament
            .brackets
            .region(side)
            .round(Round::Quarters)
            .iter()
            .flat_map(|raw| slot_entries(raw))
            .any(|(_, participant)| normalize(participant) == normalized)
    })
}

/// Number of distinct tournaments, other than `current_year`, in whose
/// quarters round `name` appears. Names compare case-insensitively after
/// trimming.
pub fn count_prior_appearances(name: &str, tournaments: &[Tournament], current_year: &str) -> usize {
    let normalized = normalize(name);
    if normalized.is_empty() {
        return 0;
    }

    tournaments
        .iter()
        .filter(|t| t.year != current_year)
        .filter(|t| plays_in_quarters(t, &normalized))
        .map(|t| t.year.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Display label for a participant: `NAME (n)` from their second appearance
/// on, where `n` counts this one.
pub fn appearance_label(name: &str, prior_appearances: usize) -> String {
    if prior_appearances > 0 {
        format!("{} ({})", name, prior_appearances + 1)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quarters_with(year: &str, names: [&str; 2]) -> Tournament {
        serde_json::from_value(json!({
            "year": year,
            "brackets": {
                "east": {
                    "quarters": [{
                        "east_quarters_pos_1": names[0],
                        "east_quarters_pos_2": names[1],
                        "winner": names[0],
                        "score": "2-1"
                    }]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_counts_other_years() {
        let tournaments = vec![
            quarters_with("2014", ["A", "B"]),
            quarters_with("2016", ["C", "A"]),
            quarters_with("2018", ["A", "D"]),
        ];
        assert_eq!(count_prior_appearances("a", &tournaments, "2018"), 2);
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let tournaments = vec![
            quarters_with("2014", ["  Big Name ", "B"]),
            quarters_with("2015", ["BIG NAME", "C"]),
        ];
        assert_eq!(count_prior_appearances("big name", &tournaments, "2020"), 2);
    }

    #[test]
    fn test_one_count_per_tournament() {
        let tournaments = vec![quarters_with("2014", ["A", "a"])];
        assert_eq!(count_prior_appearances("A", &tournaments, "2015"), 1);
    }

    #[test]
    fn test_later_rounds_ignored() {
        let t: Tournament = serde_json::from_value(json!({
            "year": "2014",
            "brackets": {
                "west": {
                    "semifinal": [{
                        "west_semifinal_pos_1": "A",
                        "west_semifinal_pos_2": "B",
                        "score": "1-0"
                    }]
                },
                "finals": [{ "west_finalist": "A", "east_finalist": "C", "score": "1-0" }]
            }
        }))
        .unwrap();
        assert_eq!(count_prior_appearances("A", &[t], "2015"), 0);
    }

    #[test]
    fn test_empty_name() {
        let tournaments = vec![quarters_with("2014", ["A", "B"])];
        assert_eq!(count_prior_appearances("   ", &tournaments, "2015"), 0);
    }

    #[test]
    fn test_appearance_label() {
        assert_eq!(appearance_label("ALPHA", 0), "ALPHA");
        assert_eq!(appearance_label("ALPHA", 2), "ALPHA (3)");
    }
}
