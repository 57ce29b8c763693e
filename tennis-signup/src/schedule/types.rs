use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pairs::PlayedPairs;

/// Number of timed sessions in one event
pub const NUM_SESSIONS: usize = 4;

/// A signed-up player, identified by exact display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player(String);

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Player {
    fn from(name: &str) -> Self {
        Player::new(name)
    }
}

impl From<String> for Player {
    fn from(name: String) -> Self {
        Player(name)
    }
}

/// Two teammates on one side of a court. Stored sorted so (A, B) == (B, A).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair(Player, Player);

impl Pair {
    pub fn new(a: Player, b: Player) -> Self {
        if a <= b {
            Pair(a, b)
        } else {
            Pair(b, a)
        }
    }
}

/// Four players on one court: slots 0+1 play slots 2+3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourtAssignment([Player; 4]);

impl CourtAssignment {
    pub fn new(players: [Player; 4]) -> Self {
        CourtAssignment(players)
    }

    pub fn players(&self) -> &[Player; 4] {
        &self.0
    }

    pub fn pair1(&self) -> Pair {
        Pair::new(self.0[0].clone(), self.0[1].clone())
    }

    pub fn pair2(&self) -> Pair {
        Pair::new(self.0[2].clone(), self.0[3].clone())
    }

    pub fn pairs(&self) -> [Pair; 2] {
        [self.pair1(), self.pair2()]
    }
}

impl fmt::Display for CourtAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = &self.0;
        write!(f, "{} & {} vs {} & {}", a, b, c, d)
    }
}

/// One timed session: court assignments ordered by court index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "session")]
    pub index: usize,
    pub courts: Vec<CourtAssignment>,
}

/// A complete event schedule, always exactly `NUM_SESSIONS` sessions.
///
/// Serialized as a list of `{ "session": n, "courts": [[..4 names..], ..] }`.
/// Deserializing re-checks every invariant, so a stored schedule with string
/// session keys, missing sessions, or repeated partners never loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Session>", into = "Vec<Session>")]
pub struct Schedule {
    sessions: [Session; NUM_SESSIONS],
}

impl Schedule {
    pub fn sessions(&self) -> &[Session; NUM_SESSIONS] {
        &self.sessions
    }

    /// Whether `player` has a court; every session seats the same players
    pub fn seats(&self, player: &Player) -> bool {
        self.sessions[0]
            .courts
            .iter()
            .any(|court| court.players().contains(player))
    }

    pub fn num_courts(&self) -> usize {
        self.sessions[0].courts.len()
    }

    /// Checks session ordering, per-session booking, and the no-repeat-partner rule
    pub fn check(&self) -> Result<(), ScheduleError> {
        let num_courts = self.num_courts();
        if num_courts == 0 {
            return Err(ScheduleError::Malformed("schedule has no courts".to_string()));
        }

        let mut played = PlayedPairs::new();
        for (position, session) in self.sessions.iter().enumerate() {
            if session.index != position {
                return Err(ScheduleError::Malformed(format!(
                    "session {} stored at position {}",
                    session.index, position
                )));
            }
            if session.courts.len() != num_courts {
                return Err(ScheduleError::Malformed(format!(
                    "session {} has {} courts, expected {}",
                    position,
                    session.courts.len(),
                    num_courts
                )));
            }

            let mut seated = HashSet::new();
            for court in &session.courts {
                for player in court.players() {
                    if !seated.insert(player) {
                        return Err(ScheduleError::Malformed(format!(
                            "{} is booked twice in session {}",
                            player, position
                        )));
                    }
                }
                if !played.admits(court) {
                    return Err(ScheduleError::Malformed(format!(
                        "repeated partners on \"{}\" in session {}",
                        court, position
                    )));
                }
            }
            played.record(&session.courts);
        }
        Ok(())
    }
}

impl TryFrom<Vec<Session>> for Schedule {
    type Error = ScheduleError;

    fn try_from(sessions: Vec<Session>) -> Result<Self, Self::Error> {
        let sessions: [Session; NUM_SESSIONS] = sessions.try_into().map_err(|v: Vec<Session>| {
            ScheduleError::Malformed(format!(
                "expected {} sessions, found {}",
                NUM_SESSIONS,
                v.len()
            ))
        })?;
        let schedule = Schedule { sessions };
        schedule.check()?;
        Ok(schedule)
    }
}

impl From<Schedule> for Vec<Session> {
    fn from(schedule: Schedule) -> Self {
        Vec::from(schedule.sessions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("at least one court is required")]
    NoCourts,

    #[error("{players} players cannot fill {courts} courts of four")]
    RosterSize { players: usize, courts: usize },

    #[error("{0} appears more than once in the roster")]
    DuplicatePlayer(String),

    #[error("unable to generate session {session} without repeating pairs after {attempts} attempts")]
    GenerationFailure { session: usize, attempts: u32 },

    #[error("malformed schedule: {0}")]
    Malformed(String),
}
