//! JSON snapshot of every aggregate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculate::{
    aggregate_history, aggregate_votes, all_win_percentages, champion_positions, diagnose,
    finalist_positions, MatchIssue,
};
use crate::models::{Dataset, OccurrenceMap, VoteHistory, VoteTotals, WinPercentage};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub years: Vec<String>,
    pub latest_year: Option<String>,
    pub vote_totals: VoteTotals,
    pub win_percentages: BTreeMap<String, WinPercentage>,
    pub vote_history: VoteHistory,
    pub champion_positions: OccurrenceMap,
    pub finalist_positions: OccurrenceMap,
    pub malformed_matches: Vec<MatchIssue>,
}

impl Report {
    pub fn build(dataset: &Dataset) -> Self {
        let tournaments = &dataset.tournaments;
        let vote_totals = aggregate_votes(tournaments);

        Self {
            generated_at: Utc::now(),
            years: dataset.years().into_iter().map(str::to_string).collect(),
            latest_year: dataset.latest().map(|t| t.year.clone()),
            win_percentages: all_win_percentages(&vote_totals),
            vote_totals,
            vote_history: aggregate_history(tournaments),
            champion_positions: champion_positions(tournaments),
            finalist_positions: finalist_positions(tournaments),
            malformed_matches: diagnose(tournaments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_dataset;

    #[test]
    fn test_report_snapshot() {
        let dataset = parse_dataset(
            r#"{
                "tournaments": [
                    {
                        "year": "2014",
                        "champion": "A",
                        "total_participants": 16,
                        "brackets": {
                            "west": {
                                "quarters": [
                                    { "west_quarters_pos_1": "A", "west_quarters_pos_2": "B", "winner": "A", "score": "5-3" },
                                    { "west_quarters_pos_3": "C", "west_quarters_pos_4": "D", "winner": "C" }
                                ]
                            }
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        let report = Report::build(&dataset);
        assert_eq!(report.years, vec!["2014"]);
        assert_eq!(report.latest_year.as_deref(), Some("2014"));
        assert_eq!(report.vote_totals.get("wqp1"), 5);
        assert_eq!(report.win_percentages["wqp2"].percentage, "37.50");
        assert_eq!(report.champion_positions["wqp1"].count, 1);
        assert_eq!(report.malformed_matches.len(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["vote_totals"]["wqp1"], 5);
        assert_eq!(json["malformed_matches"][0]["error"]["kind"], "missing_score");
    }
}
