//! Typed view over raw match records.
//!
//! A match from a regional round has two `<side>_<round>_pos_<n>` slots; the
//! final has `west_finalist` and `east_finalist`. The first number of the
//! score belongs to slot 1: the lexically-first slot key for regional
//! matches, the west finalist for the final. Who won is read from `winner`,
//! never inferred from the score.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    is_occupied, occupied_slot, slot_entries, string_field, MatchRef, Position, RawMatch, Round,
    Side,
};

/// Why a match was left out of aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MalformedMatch {
    #[error("match has no score")]
    MissingScore,

    #[error("unparsable score: {0:?}")]
    UnparsableScore(String),

    #[error("expected 2 participants, found {0}")]
    ParticipantCount(usize),

    #[error("final is missing west_finalist or east_finalist")]
    MissingFinalist,

    #[error("slot {0:?} does not belong to this round")]
    UnknownSlot(String),
}

/// A parsed `"<int>-<int>"` score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub first: u32,
    pub second: u32,
}

impl FromStr for Score {
    type Err = MalformedMatch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let bad = || MalformedMatch::UnparsableScore(s.to_string());
        if parts.len() != 2 {
            return Err(bad());
        }
        let first = parts[0].trim().parse().map_err(|_| bad())?;
        let second = parts[1].trim().parse().map_err(|_| bad())?;
        Ok(Self { first, second })
    }
}

/// A participant sitting in a match slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'a> {
    pub key: &'a str,
    pub participant: &'a str,
}

/// A well-formed match, tagged by where it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketMatch<'a> {
    Round {
        slot1: Slot<'a>,
        slot2: Slot<'a>,
        winner: Option<&'a str>,
        score: Score,
    },
    Finals {
        west: &'a str,
        east: &'a str,
        winner: Option<&'a str>,
        score: Score,
    },
}

/// Votes credited to each slot of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchVotes<'a> {
    pub slot1_key: &'a str,
    pub slot2_key: &'a str,
    pub participant1: &'a str,
    pub participant2: &'a str,
    pub score1: u32,
    pub score2: u32,
    pub winner: Option<&'a str>,
    pub winner_is_participant1: bool,
}

/// One side of a [`MatchVotes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotVotes<'a> {
    pub slot_key: &'a str,
    pub participant: &'a str,
    pub votes: u32,
    pub opponent_votes: u32,
    pub won: bool,
}

impl<'a> MatchVotes<'a> {
    /// Both sides, slot 1 first.
    pub fn sides(&self) -> [SlotVotes<'a>; 2] {
        [
            SlotVotes {
                slot_key: self.slot1_key,
                participant: self.participant1,
                votes: self.score1,
                opponent_votes: self.score2,
                won: self.winner_is_participant1,
            },
            SlotVotes {
                slot_key: self.slot2_key,
                participant: self.participant2,
                votes: self.score2,
                opponent_votes: self.score1,
                won: self.winner == Some(self.participant2),
            },
        ]
    }

    /// The side occupying `slot_key`.
    pub fn side_for_slot(&self, slot_key: &str) -> Option<SlotVotes<'a>> {
        self.sides().into_iter().find(|s| s.slot_key == slot_key)
    }

    pub fn total_votes(&self) -> u64 {
        u64::from(self.score1) + u64::from(self.score2)
    }
}

impl<'a> BracketMatch<'a> {
    /// Parse a raw record from the given round.
    pub fn parse(raw: &'a RawMatch, round: Round) -> Result<Self, MalformedMatch> {
        let score_text = string_field(raw, "score").ok_or(MalformedMatch::MissingScore)?;
        let score: Score = score_text.parse()?;

        let slots: Vec<Slot<'a>> = slot_entries(raw)
            .filter(|(_, participant)| is_occupied(participant))
            .map(|(key, participant)| Slot { key, participant })
            .collect();
        if slots.len() != 2 {
            return Err(MalformedMatch::ParticipantCount(slots.len()));
        }

        let winner = string_field(raw, "winner");

        if round == Round::Finals {
            let west = occupied_slot(raw, "west_finalist");
            let east = occupied_slot(raw, "east_finalist");
            return match (west, east) {
                (Some(west), Some(east)) => Ok(BracketMatch::Finals {
                    west,
                    east,
                    winner,
                    score,
                }),
                _ => Err(MalformedMatch::MissingFinalist),
            };
        }

        // Both slots must be seats of this round in one region.
        let side = regional_side(slots[0].key, round)?;
        if regional_side(slots[1].key, round)? != side {
            return Err(MalformedMatch::UnknownSlot(slots[1].key.to_string()));
        }

        Ok(BracketMatch::Round {
            slot1: slots[0],
            slot2: slots[1],
            winner,
            score,
        })
    }

    /// Parse a match where it sits in the bracket. A regional match must
    /// also seat its participants in the region it is listed under.
    pub fn parse_at(at: &MatchRef<'a>) -> Result<Self, MalformedMatch> {
        let parsed = Self::parse(at.raw, at.round)?;
        if let (BracketMatch::Round { slot1, .. }, Some(side)) = (&parsed, at.side) {
            if regional_side(slot1.key, at.round)? != side {
                return Err(MalformedMatch::UnknownSlot(slot1.key.to_string()));
            }
        }
        Ok(parsed)
    }

    /// Votes per slot, with the score's first number on slot 1.
    pub fn votes(&self) -> MatchVotes<'a> {
        match *self {
            BracketMatch::Round {
                slot1,
                slot2,
                winner,
                score,
            } => MatchVotes {
                slot1_key: slot1.key,
                slot2_key: slot2.key,
                participant1: slot1.participant,
                participant2: slot2.participant,
                score1: score.first,
                score2: score.second,
                winner,
                winner_is_participant1: winner == Some(slot1.participant),
            },
            BracketMatch::Finals {
                west,
                east,
                winner,
                score,
            } => MatchVotes {
                slot1_key: "west_finalist",
                slot2_key: "east_finalist",
                participant1: west,
                participant2: east,
                score1: score.first,
                score2: score.second,
                winner,
                winner_is_participant1: winner == Some(west),
            },
        }
    }

    pub fn winner(&self) -> Option<&'a str> {
        match *self {
            BracketMatch::Round { winner, .. } | BracketMatch::Finals { winner, .. } => winner,
        }
    }

    /// Votes credited to a named participant, if they played in this match.
    pub fn score_for(&self, participant: &str) -> Option<u32> {
        self.votes()
            .sides()
            .into_iter()
            .find(|s| s.participant == participant)
            .map(|s| s.votes)
    }
}

/// Region of a slot key, provided it names a seat of `round`.
fn regional_side(key: &str, round: Round) -> Result<Side, MalformedMatch> {
    Position::by_slot_key(key)
        .filter(|p| p.round == round)
        .map(|p| p.side)
        .ok_or_else(|| MalformedMatch::UnknownSlot(key.to_string()))
}

/// Extract per-slot votes from one match, or say why it has none.
pub fn extract_match_votes(raw: &RawMatch, round: Round) -> Result<MatchVotes<'_>, MalformedMatch> {
    BracketMatch::parse(raw, round).map(|m| m.votes())
}

/// A malformed match found in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchIssue {
    pub year: String,
    pub side: Option<Side>,
    pub round: Round,
    pub index: usize,
    pub error: MalformedMatch,
}

impl MatchIssue {
    pub(crate) fn new(year: &str, at: &MatchRef<'_>, error: MalformedMatch) -> Self {
        Self {
            year: year.to_string(),
            side: at.side,
            round: at.round,
            index: at.index,
            error,
        }
    }
}

impl std::fmt::Display for MatchIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.side {
            Some(side) => write!(
                f,
                "{} {} {} #{}: {}",
                self.year,
                side,
                self.round,
                self.index + 1,
                self.error
            ),
            None => write!(f, "{} {} #{}: {}", self.year, self.round, self.index + 1, self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawMatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_score_parse() {
        assert_eq!(
            "5-3".parse::<Score>(),
            Ok(Score {
                first: 5,
                second: 3
            })
        );
        assert_eq!(
            " 2 - 4 ".parse::<Score>().map(|s| (s.first, s.second)),
            Ok((2, 4))
        );
    }

    #[test]
    fn test_score_parse_rejects_malformed() {
        for bad in ["5", "5-3-1", "a-b", "-3", "", "5:3"] {
            assert!(bad.parse::<Score>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_round_match_votes() {
        let m = raw(json!({
            "west_quarters_pos_1": "A",
            "west_quarters_pos_2": "B",
            "winner": "A",
            "score": "5-3",
            "round": "quarters"
        }));
        let votes = extract_match_votes(&m, Round::Quarters).unwrap();
        assert_eq!(votes.slot1_key, "west_quarters_pos_1");
        assert_eq!(votes.participant2, "B");
        assert_eq!((votes.score1, votes.score2), (5, 3));
        assert!(votes.winner_is_participant1);
    }

    #[test]
    fn test_first_score_follows_slot_order_not_winner() {
        // Slot 2 won, but the first number still belongs to slot 1.
        let m = raw(json!({
            "east_quartersemi_pos_4": "D",
            "east_quartersemi_pos_3": "C",
            "winner": "D",
            "score": "1-4"
        }));
        let votes = extract_match_votes(&m, Round::QuarterSemi).unwrap();
        assert_eq!(votes.slot1_key, "east_quartersemi_pos_3");
        assert_eq!(votes.score1, 1);
        assert!(!votes.winner_is_participant1);

        let [c, d] = votes.sides();
        assert_eq!((c.participant, c.votes, c.won), ("C", 1, false));
        assert_eq!((d.participant, d.votes, d.won), ("D", 4, true));
    }

    #[test]
    fn test_finals_west_is_slot_one() {
        let m = raw(json!({
            "east_finalist": "B",
            "west_finalist": "A",
            "winner": "B",
            "score": "2-4"
        }));
        let parsed = BracketMatch::parse(&m, Round::Finals).unwrap();
        assert!(matches!(parsed, BracketMatch::Finals { west: "A", east: "B", .. }));

        let votes = parsed.votes();
        assert_eq!(votes.slot1_key, "west_finalist");
        assert_eq!((votes.score1, votes.score2), (2, 4));
        assert!(!votes.winner_is_participant1);
    }

    #[test]
    fn test_missing_score() {
        let m = raw(json!({ "west_quarters_pos_1": "A", "west_quarters_pos_2": "B" }));
        assert_eq!(
            extract_match_votes(&m, Round::Quarters),
            Err(MalformedMatch::MissingScore)
        );
    }

    #[test]
    fn test_unparsable_score() {
        let m = raw(json!({
            "west_quarters_pos_1": "A",
            "west_quarters_pos_2": "B",
            "score": "W-L"
        }));
        assert_eq!(
            extract_match_votes(&m, Round::Quarters),
            Err(MalformedMatch::UnparsableScore("W-L".to_string()))
        );
    }

    #[test]
    fn test_participant_count() {
        let three = raw(json!({
            "west_quarters_pos_1": "A",
            "west_quarters_pos_2": "B",
            "west_quarters_pos_3": "C",
            "winner": "A",
            "score": "3-2"
        }));
        assert_eq!(
            extract_match_votes(&three, Round::Quarters),
            Err(MalformedMatch::ParticipantCount(3))
        );

        let one_blank = raw(json!({
            "west_quarters_pos_1": "A",
            "west_quarters_pos_2": "  ",
            "score": "3-2"
        }));
        assert_eq!(
            extract_match_votes(&one_blank, Round::Quarters),
            Err(MalformedMatch::ParticipantCount(1))
        );
    }

    #[test]
    fn test_finals_with_wrong_keys() {
        let m = raw(json!({
            "west_finalist": "A",
            "east_semifinal_pos_1": "B",
            "winner": "A",
            "score": "3-1"
        }));
        assert_eq!(
            BracketMatch::parse(&m, Round::Finals),
            Err(MalformedMatch::MissingFinalist)
        );
    }

    #[test]
    fn test_unknown_slot_key_rejects_match() {
        // "notes" sorts before the real slot and would otherwise take the
        // first score.
        let m = raw(json!({
            "west_quarters_pos_1": "A",
            "notes": "B",
            "winner": "A",
            "score": "3-2"
        }));
        assert_eq!(
            BracketMatch::parse(&m, Round::Quarters),
            Err(MalformedMatch::UnknownSlot("notes".to_string()))
        );
    }

    #[test]
    fn test_slot_from_another_round_or_region() {
        let wrong_round = raw(json!({
            "west_quarters_pos_1": "A",
            "west_semifinal_pos_2": "B",
            "winner": "A",
            "score": "3-2"
        }));
        assert_eq!(
            BracketMatch::parse(&wrong_round, Round::Quarters),
            Err(MalformedMatch::UnknownSlot("west_semifinal_pos_2".to_string()))
        );

        let mixed_regions = raw(json!({
            "east_quarters_pos_2": "B",
            "west_quarters_pos_1": "A",
            "winner": "A",
            "score": "3-2"
        }));
        assert_eq!(
            BracketMatch::parse(&mixed_regions, Round::Quarters),
            Err(MalformedMatch::UnknownSlot("west_quarters_pos_1".to_string()))
        );
    }

    #[test]
    fn test_parse_at_checks_listed_region() {
        let m = raw(json!({
            "east_quarters_pos_1": "A",
            "east_quarters_pos_2": "B",
            "winner": "A",
            "score": "3-2"
        }));
        let listed_west = MatchRef {
            round: Round::Quarters,
            side: Some(Side::West),
            index: 0,
            raw: &m,
        };
        assert_eq!(
            BracketMatch::parse_at(&listed_west),
            Err(MalformedMatch::UnknownSlot("east_quarters_pos_1".to_string()))
        );

        let listed_east = MatchRef {
            side: Some(Side::East),
            ..listed_west
        };
        assert!(BracketMatch::parse_at(&listed_east).is_ok());
    }

    #[test]
    fn test_max_scores_total_without_overflow() {
        let m = raw(json!({
            "west_quarters_pos_1": "A",
            "west_quarters_pos_2": "B",
            "winner": "A",
            "score": "4294967295-4294967295"
        }));
        let votes = extract_match_votes(&m, Round::Quarters).unwrap();
        assert_eq!(votes.total_votes(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_score_for_participant() {
        let m = raw(json!({
            "west_semifinal_pos_1": "A",
            "west_semifinal_pos_2": "B",
            "winner": "B",
            "score": "2-3"
        }));
        let parsed = BracketMatch::parse(&m, Round::Semifinal).unwrap();
        assert_eq!(parsed.score_for("A"), Some(2));
        assert_eq!(parsed.score_for("B"), Some(3));
        assert_eq!(parsed.score_for("C"), None);
        assert_eq!(parsed.winner(), Some("B"));
    }

    #[test]
    fn test_unknown_winner_marks_nobody() {
        let m = raw(json!({
            "west_quarters_pos_5": "E",
            "west_quarters_pos_6": "F",
            "winner": "Z",
            "score": "2-2"
        }));
        let votes = extract_match_votes(&m, Round::Quarters).unwrap();
        assert!(votes.sides().iter().all(|s| !s.won));
    }

    #[test]
    fn test_vote_conservation() {
        let m = raw(json!({
            "east_quarters_pos_7": "G",
            "east_quarters_pos_8": "H",
            "winner": "H",
            "score": "6-9"
        }));
        let votes = extract_match_votes(&m, Round::Quarters).unwrap();
        let credited: u64 = votes.sides().iter().map(|s| u64::from(s.votes)).sum();
        assert_eq!(credited, 15);
        assert_eq!(votes.total_votes(), 15);
    }

    #[test]
    fn test_issue_display() {
        let m = RawMatch::new();
        let at = MatchRef {
            round: Round::Quarters,
            side: Some(Side::East),
            index: 2,
            raw: &m,
        };
        let issue = MatchIssue::new("2015", &at, MalformedMatch::MissingScore);
        assert_eq!(issue.to_string(), "2015 east quarters #3: match has no score");
    }
}
