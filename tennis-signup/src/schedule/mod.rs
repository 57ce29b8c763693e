pub mod types;
pub mod pairs;
pub mod generator;
pub mod slot_utils;

pub use types::{CourtAssignment, Pair, Player, Schedule, ScheduleError, Session, NUM_SESSIONS};
pub use pairs::PlayedPairs;
pub use generator::{generate_schedule, ScheduleGenerator, MAX_ATTEMPTS};
pub use slot_utils::{court_label, SessionClock};
