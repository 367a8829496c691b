//! Plain-text bracket views.
//!
//! A [`BracketView`] owns the selected mode and renders fresh aggregates
//! from the dataset on every call. Nothing in `calculate` keeps state
//! between views.

mod report;

pub use report::Report;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::calculate::{
    aggregate_votes, appearance_label, champion_positions, count_prior_appearances,
    finalist_positions, historical_win_rate_since, win_percentage, BracketMatch,
};
use crate::models::{
    occupied_slot, string_field, year_number, Dataset, OccurrenceMap, Position, Round, Side,
    Tournament, WinRate, POSITIONS,
};

/// What the bracket shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// The latest tournament with participant data.
    Latest,
    /// One tournament by year.
    Year(String),
    /// Vote percentages over all years.
    Predictor,
    /// Quarters starting slots of champions.
    Champions,
    /// Quarters starting slots of runners-up.
    Finalists,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view mode {0:?} (expected latest, predictor, champions, finalists or a year)")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "latest" => Ok(ViewMode::Latest),
            "predictor" => Ok(ViewMode::Predictor),
            "champions" => Ok(ViewMode::Champions),
            "finalists" => Ok(ViewMode::Finalists),
            _ if year_number(trimmed).is_some() => Ok(ViewMode::Year(trimmed.to_string())),
            _ => Err(UnknownViewMode(s.to_string())),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Latest => write!(f, "latest"),
            ViewMode::Year(year) => write!(f, "{}", year),
            ViewMode::Predictor => write!(f, "predictor"),
            ViewMode::Champions => write!(f, "champions"),
            ViewMode::Finalists => write!(f, "finalists"),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub uppercase_names: bool,
    /// Overrides the dataset's earliest year for win-rate annotations.
    pub base_year: Option<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            uppercase_names: true,
            base_year: None,
        }
    }
}

/// `"62% win rate from this position (Based on 2013-2014 data)"`.
pub fn win_rate_text(rate: &WinRate) -> String {
    format!(
        "{}% win rate from this position (Based on {} data)",
        rate.win_rate, rate.data_range
    )
}

/// `"2 (2014, 2016)"`.
pub fn occurrence_text(positions: &OccurrenceMap, position_id: &str) -> Option<String> {
    positions
        .get(position_id)
        .map(|o| format!("{} ({})", o.count, o.years.join(", ")))
}

/// Display sections in bracket order: each region's rounds, then the final.
fn sections(rounds: &[Round]) -> Vec<(String, Vec<&'static Position>)> {
    let mut sections = Vec::new();
    for side in Side::ALL {
        for round in rounds.iter().copied().filter(|r| *r != Round::Finals) {
            let seats = POSITIONS
                .iter()
                .filter(|p| p.side == side && p.round == round)
                .collect();
            sections.push((
                format!("{} {}", side.as_str().to_uppercase(), round.label()),
                seats,
            ));
        }
    }
    if rounds.contains(&Round::Finals) {
        let seats = POSITIONS.iter().filter(|p| p.is_finals()).collect();
        sections.push((Round::Finals.label().to_string(), seats));
    }
    sections
}

const ALL_ROUNDS: [Round; 4] = [
    Round::Quarters,
    Round::QuarterSemi,
    Round::Semifinal,
    Round::Finals,
];

/// Who sits at a position in one tournament, and how they fared.
struct Seat<'t> {
    participant: &'t str,
    score: Option<u32>,
    won: bool,
}

fn seat_at<'t>(tournament: &'t Tournament, position: &Position) -> Option<Seat<'t>> {
    let (raw, participant) = tournament
        .brackets
        .matches_for(position)
        .iter()
        .find_map(|raw| occupied_slot(raw, position.slot_key).map(|p| (raw, p)))?;
    let score = BracketMatch::parse(raw, position.round)
        .ok()
        .and_then(|m| m.score_for(participant));

    Some(Seat {
        participant,
        score,
        won: string_field(raw, "winner") == Some(participant),
    })
}

/// A dataset plus the mode currently shown.
pub struct BracketView<'d> {
    dataset: &'d Dataset,
    mode: ViewMode,
    options: ViewOptions,
}

impl<'d> BracketView<'d> {
    pub fn new(dataset: &'d Dataset, options: ViewOptions) -> Self {
        Self {
            dataset,
            mode: ViewMode::Latest,
            options,
        }
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// The tournament shown by a year-based mode.
    pub fn tournament(&self) -> Option<&'d Tournament> {
        match &self.mode {
            ViewMode::Latest => self.dataset.latest(),
            ViewMode::Year(year) => self.dataset.find(year),
            _ => None,
        }
    }

    /// Render the current mode.
    pub fn render(&self) -> String {
        let lines = match &self.mode {
            ViewMode::Latest | ViewMode::Year(_) => match self.tournament() {
                Some(tournament) => self.render_tournament(tournament),
                None => vec![match &self.mode {
                    ViewMode::Year(year) => format!("No tournament found for {}", year),
                    _ => "No tournaments loaded".to_string(),
                }],
            },
            ViewMode::Predictor => self.render_predictor(),
            ViewMode::Champions => self.render_occurrences(
                "Champions",
                "Champion Positions",
                &champion_positions(&self.dataset.tournaments),
            ),
            ViewMode::Finalists => self.render_occurrences(
                "Finalists (2nd Place)",
                "Finalist Positions",
                &finalist_positions(&self.dataset.tournaments),
            ),
        };
        lines.join("\n")
    }

    fn display_name(&self, name: &str) -> String {
        if self.options.uppercase_names {
            name.to_uppercase()
        } else {
            name.to_string()
        }
    }

    fn render_no_data(&self, tournament: &Tournament) -> Vec<String> {
        let mut lines = vec![
            "Tournament Data Not Available".to_string(),
            format!(
                "Participant data for {} is not yet available.",
                tournament.year
            ),
        ];
        if let Some(champion) = &tournament.champion {
            lines.push(format!("Champion: {} 🏆", champion));
        }
        lines
    }

    fn render_tournament(&self, tournament: &Tournament) -> Vec<String> {
        let mut lines = vec![format!("=== Tournament {} ===", tournament.year)];
        if !tournament.has_participants() {
            lines.extend(self.render_no_data(tournament));
            return lines;
        }
        if let Some(champion) = &tournament.champion {
            lines.push(format!("Champion: {} 🏆", self.display_name(champion)));
        }

        let base_year = self
            .options
            .base_year
            .as_deref()
            .or_else(|| self.dataset.base_year());

        for (header, seats) in sections(&ALL_ROUNDS) {
            lines.push(String::new());
            lines.push(header);
            for position in seats {
                lines.push(self.seat_line(tournament, position, base_year));
            }
        }
        lines
    }

    fn seat_line(&self, tournament: &Tournament, position: &Position, base_year: Option<&str>) -> String {
        let Some(seat) = seat_at(tournament, position) else {
            return format!("  {:<6} -", position.id);
        };

        let mut name = self.display_name(seat.participant);
        if position.round == Round::Quarters {
            let prior = count_prior_appearances(
                seat.participant,
                &self.dataset.tournaments,
                &tournament.year,
            );
            name = appearance_label(&name, prior);
        }

        let score = seat.score.map(|s| s.to_string()).unwrap_or_default();
        let mark = if seat.won { " ✓" } else { "" };
        let mut line = format!("  {:<6} {:<28} {:>3}{}", position.id, name, score, mark);

        let rate = base_year.and_then(|base| {
            historical_win_rate_since(
                position.id,
                &self.dataset.tournaments,
                &tournament.year,
                base,
            )
        });
        if let Some(rate) = rate {
            line.push_str("  ");
            line.push_str(&win_rate_text(&rate));
        }
        line.trim_end().to_string()
    }

    fn render_predictor(&self) -> Vec<String> {
        let totals = aggregate_votes(&self.dataset.tournaments);
        let mut lines = vec!["=== Vote Percentages (All Years) ===".to_string()];

        for (header, seats) in sections(&ALL_ROUNDS) {
            lines.push(String::new());
            lines.push(format!("{} - Total Votes", header));
            for position in seats {
                let line = match win_percentage(position.id, &totals) {
                    Some(pct) => format!(
                        "  {:<6} {:>6}% {}v",
                        position.id, pct.percentage, pct.own_votes
                    ),
                    None => format!("  {:<6} -", position.id),
                };
                lines.push(line);
            }
        }
        lines
    }

    fn render_occurrences(&self, title: &str, label: &str, positions: &OccurrenceMap) -> Vec<String> {
        let mut lines = vec![format!("=== {} ===", title)];

        for (header, seats) in sections(&[Round::Quarters]) {
            lines.push(String::new());
            lines.push(format!("{} - {}", header, label));
            for position in seats {
                let text = occurrence_text(positions, position.id).unwrap_or_else(|| "-".to_string());
                lines.push(format!("  {:<6} {}", position.id, text));
            }
        }
        lines
    }
}
