use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::roster::{event_key, Lineup, Roster, RosterError};
use crate::schedule::{Player, Schedule};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access event store: {0}")]
    Io(#[from] io::Error),

    #[error("Event store is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Everything stored for one event date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventState {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

impl EventState {
    pub fn roster(&self) -> Roster {
        Roster::from_players(self.players.clone())
    }

    /// Signed-up players without a court. Once a schedule is saved these are
    /// the players it does not seat, in sign-up order; before that, the
    /// overflow past the last full court.
    pub fn substitutes(&self) -> Vec<Player> {
        match &self.schedule {
            Some(schedule) => self
                .players
                .iter()
                .filter(|player| !schedule.seats(player))
                .cloned()
                .collect(),
            None => Lineup::from_roster(&self.roster())
                .map(|lineup| lineup.substitutes)
                .unwrap_or_default(),
        }
    }
}

/// Event states keyed by event date, optionally backed by a JSON file.
///
/// Every mutation is applied to a copy and written through; the copy only
/// replaces the in-memory state once the write succeeds.
#[derive(Debug, Default)]
pub struct EventStore {
    path: Option<PathBuf>,
    events: BTreeMap<String, EventState>,
}

impl EventStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let events = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), events = events.len(), "Opened event store");
        Ok(EventStore {
            path: Some(path),
            events,
        })
    }

    pub fn load(&self, date: NaiveDate) -> EventState {
        self.events.get(&event_key(date)).cloned().unwrap_or_default()
    }

    pub fn add_player(&mut self, date: NaiveDate, name: &str) -> Result<Player, StoreError> {
        let mut events = self.events.clone();
        let state = events.entry(event_key(date)).or_default();
        let mut roster = state.roster();
        let player = roster.sign_up(name)?.clone();
        state.players = roster.into_players();

        self.commit(events)?;
        info!(event = %date, player = %player, "Player signed up");
        Ok(player)
    }

    pub fn save_schedule(&mut self, date: NaiveDate, schedule: Schedule) -> Result<(), StoreError> {
        let mut events = self.events.clone();
        events.entry(event_key(date)).or_default().schedule = Some(schedule);
        self.commit(events)
    }

    /// Drops both the roster and the schedule for the event
    pub fn clear(&mut self, date: NaiveDate) -> Result<(), StoreError> {
        let mut events = self.events.clone();
        if events.remove(&event_key(date)).is_some() {
            self.commit(events)?;
        }
        Ok(())
    }

    fn commit(&mut self, events: BTreeMap<String, EventState>) -> Result<(), StoreError> {
        self.write(&events)?;
        self.events = events;
        Ok(())
    }

    fn write(&self, events: &BTreeMap<String, EventState>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(events)?)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "Event store written");
        Ok(())
    }
}
