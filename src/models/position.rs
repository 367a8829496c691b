//! Bracket position identity map.
//!
//! Every seat in the bracket has a short position id (`wqp3`) that is stable
//! across years, and a slot key (`west_quarters_pos_3`) used inside match
//! records. The finals seats map to `west_finalist` / `east_finalist`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One half of the bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    West,
    East,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::West, Side::East];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::West => "west",
            Side::East => "east",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bracket round, ordered from the opening round to the final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Quarters,
    #[serde(rename = "quartersemi")]
    QuarterSemi,
    Semifinal,
    Finals,
}

impl Round {
    /// Regional rounds, in play order. Finals are not regional.
    pub const REGIONAL: [Round; 3] = [Round::Quarters, Round::QuarterSemi, Round::Semifinal];

    /// Key used for this round in the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Quarters => "quarters",
            Round::QuarterSemi => "quartersemi",
            Round::Semifinal => "semifinal",
            Round::Finals => "finals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Round::Quarters => "Round 1 (Quarters)",
            Round::QuarterSemi => "Round 2 (Quarter-Semis)",
            Round::Semifinal => "Round 3 (Semis)",
            Round::Finals => "Finals",
        }
    }

    /// Number of seats per region in this round (finals: one per region).
    pub fn slots_per_side(&self) -> u8 {
        match self {
            Round::Quarters => 8,
            Round::QuarterSemi => 4,
            Round::Semifinal => 2,
            Round::Finals => 1,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural location of a position: region, round and slot number.
///
/// Finals seats report `round: Finals` with slot 1 (west) or 2 (east).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionInfo {
    pub side: Side,
    pub round: Round,
    pub slot: u8,
}

/// One fixed bracket seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub id: &'static str,
    pub slot_key: &'static str,
    pub side: Side,
    pub round: Round,
    pub slot: u8,
}

const fn pos(id: &'static str, slot_key: &'static str, side: Side, round: Round, slot: u8) -> Position {
    Position {
        id,
        slot_key,
        side,
        round,
        slot,
    }
}

/// All 30 seats in display order.
pub static POSITIONS: [Position; 30] = [
    pos("wqp1", "west_quarters_pos_1", Side::West, Round::Quarters, 1),
    pos("wqp2", "west_quarters_pos_2", Side::West, Round::Quarters, 2),
    pos("wqp3", "west_quarters_pos_3", Side::West, Round::Quarters, 3),
    pos("wqp4", "west_quarters_pos_4", Side::West, Round::Quarters, 4),
    pos("wqp5", "west_quarters_pos_5", Side::West, Round::Quarters, 5),
    pos("wqp6", "west_quarters_pos_6", Side::West, Round::Quarters, 6),
    pos("wqp7", "west_quarters_pos_7", Side::West, Round::Quarters, 7),
    pos("wqp8", "west_quarters_pos_8", Side::West, Round::Quarters, 8),
    pos("eqp1", "east_quarters_pos_1", Side::East, Round::Quarters, 1),
    pos("eqp2", "east_quarters_pos_2", Side::East, Round::Quarters, 2),
    pos("eqp3", "east_quarters_pos_3", Side::East, Round::Quarters, 3),
    pos("eqp4", "east_quarters_pos_4", Side::East, Round::Quarters, 4),
    pos("eqp5", "east_quarters_pos_5", Side::East, Round::Quarters, 5),
    pos("eqp6", "east_quarters_pos_6", Side::East, Round::Quarters, 6),
    pos("eqp7", "east_quarters_pos_7", Side::East, Round::Quarters, 7),
    pos("eqp8", "east_quarters_pos_8", Side::East, Round::Quarters, 8),
    pos("wqsp1", "west_quartersemi_pos_1", Side::West, Round::QuarterSemi, 1),
    pos("wqsp2", "west_quartersemi_pos_2", Side::West, Round::QuarterSemi, 2),
    pos("wqsp3", "west_quartersemi_pos_3", Side::West, Round::QuarterSemi, 3),
    pos("wqsp4", "west_quartersemi_pos_4", Side::West, Round::QuarterSemi, 4),
    pos("eqsp1", "east_quartersemi_pos_1", Side::East, Round::QuarterSemi, 1),
    pos("eqsp2", "east_quartersemi_pos_2", Side::East, Round::QuarterSemi, 2),
    pos("eqsp3", "east_quartersemi_pos_3", Side::East, Round::QuarterSemi, 3),
    pos("eqsp4", "east_quartersemi_pos_4", Side::East, Round::QuarterSemi, 4),
    pos("wsfp1", "west_semifinal_pos_1", Side::West, Round::Semifinal, 1),
    pos("wsfp2", "west_semifinal_pos_2", Side::West, Round::Semifinal, 2),
    pos("esfp1", "east_semifinal_pos_1", Side::East, Round::Semifinal, 1),
    pos("esfp2", "east_semifinal_pos_2", Side::East, Round::Semifinal, 2),
    pos("wfp1", "west_finalist", Side::West, Round::Finals, 1),
    pos("efp1", "east_finalist", Side::East, Round::Finals, 2),
];

impl Position {
    /// Look up a seat by its position id.
    pub fn by_id(id: &str) -> Option<&'static Position> {
        POSITIONS.iter().find(|p| p.id == id)
    }

    /// Look up a seat by its slot key.
    pub fn by_slot_key(key: &str) -> Option<&'static Position> {
        POSITIONS.iter().find(|p| p.slot_key == key)
    }

    /// Look up a seat by its structural location.
    pub fn locate(side: Side, round: Round, slot: u8) -> Option<&'static Position> {
        POSITIONS
            .iter()
            .find(|p| p.side == side && p.round == round && p.slot == slot)
    }

    pub fn info(&self) -> PositionInfo {
        PositionInfo {
            side: self.side,
            round: self.round,
            slot: self.slot,
        }
    }

    pub fn is_finals(&self) -> bool {
        self.round == Round::Finals
    }
}

/// Convert a position id to its slot key. Unknown input is returned unchanged.
pub fn to_slot_key(id: &str) -> &str {
    Position::by_id(id).map(|p| p.slot_key).unwrap_or(id)
}

/// Convert a slot key to its position id. Unknown input is returned unchanged.
pub fn to_position_id(slot_key: &str) -> &str {
    Position::by_slot_key(slot_key).map(|p| p.id).unwrap_or(slot_key)
}

/// The 30 position ids in display order.
pub fn all_position_ids() -> impl Iterator<Item = &'static str> {
    POSITIONS.iter().map(|p| p.id)
}

/// Structural location of a position id, or `None` if it is not a bracket seat.
pub fn round_of(id: &str) -> Option<PositionInfo> {
    Position::by_id(id).map(Position::info)
}
