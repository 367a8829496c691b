//! Bracket-adjacent opponent resolution.
//!
//! Pairings are structural: slots `2k-1` and `2k` meet within a region and
//! round, and the two finalists meet each other. Regions only cross at the
//! final.

use crate::models::{Position, Round, Side, POSITIONS};

/// Position id of the seat that `position_id` faces, or `None` for an
/// unknown id.
pub fn opponent_of(position_id: &str) -> Option<&'static str> {
    let position = Position::by_id(position_id)?;
    opponent_position(position).map(|p| p.id)
}

/// The seat facing `position`.
pub fn opponent_position(position: &Position) -> Option<&'static Position> {
    match position.round {
        Round::Finals => {
            let side = match position.side {
                Side::West => Side::East,
                Side::East => Side::West,
            };
            POSITIONS
                .iter()
                .find(|p| p.round == Round::Finals && p.side == side)
        }
        _ => {
            let slot = if position.slot % 2 == 1 {
                position.slot + 1
            } else {
                position.slot - 1
            };
            Position::locate(position.side, position.round, slot)
        }
    }
}
