use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use csv::Reader;
use serde::Deserialize;
use thiserror::Error;

use crate::schedule::Player;

/// Four courts of four
pub const MAX_PLAYERS: usize = 16;
/// Two courts is the smallest event that gets a schedule
pub const MIN_PLAYERS: usize = 8;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Please enter a valid, unique name.")]
    EmptyName,

    #[error("{0} is already signed up!")]
    AlreadySignedUp(String),

    #[error("Sign-up is full ({max} players)")]
    Full { max: usize },

    #[error("{have} players signed up, at least {need} are needed for a schedule")]
    NotEnoughPlayers { have: usize, need: usize },

    #[error("Failed to read roster: {0}")]
    Csv(#[from] csv::Error),
}

/// Players signed up for one event, in sign-up order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-stored list without re-validating it
    pub fn from_players(players: Vec<Player>) -> Self {
        Roster { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name() == name)
    }

    /// Adds a player; names match exactly after trimming surrounding whitespace
    pub fn sign_up(&mut self, name: &str) -> Result<&Player, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.contains(name) {
            return Err(RosterError::AlreadySignedUp(name.to_string()));
        }
        if self.is_full() {
            return Err(RosterError::Full { max: MAX_PLAYERS });
        }
        self.players.push(Player::new(name));
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }
}

/// The players who get a court, plus the leftover substitutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineup {
    pub players: Vec<Player>,
    pub substitutes: Vec<Player>,
    pub num_courts: usize,
}

impl Lineup {
    /// First `4 * (len / 4)` sign-ups play; later sign-ups become substitutes
    pub fn from_roster(roster: &Roster) -> Result<Self, RosterError> {
        if roster.len() < MIN_PLAYERS {
            return Err(RosterError::NotEnoughPlayers {
                have: roster.len(),
                need: MIN_PLAYERS,
            });
        }
        let num_courts = roster.len() / 4;
        let (players, substitutes) = roster.players().split_at(num_courts * 4);
        Ok(Lineup {
            players: players.to_vec(),
            substitutes: substitutes.to_vec(),
            num_courts,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
}

/// Loads a roster from a CSV file with a `name` column
pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    let mut reader = Reader::from_path(path)?;
    let mut roster = Roster::new();

    for result in reader.deserialize() {
        let row: RosterRow = result?;
        if row.name.trim().is_empty() {
            continue;
        }
        roster.sign_up(&row.name)?;
    }

    Ok(roster)
}

/// The event date: the coming Saturday, or today if today is Saturday
pub fn next_saturday(today: NaiveDate) -> NaiveDate {
    let days_ahead = (7 + Weekday::Sat.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(i64::from(days_ahead))
}

/// Storage key for an event, e.g. "2024-06-01"
pub fn event_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Heading form of an event date, e.g. "Saturday, June 01, 2024"
pub fn event_title(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}
