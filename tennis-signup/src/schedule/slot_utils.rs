use chrono::{Duration, NaiveTime};

use super::types::NUM_SESSIONS;

/// Event start used when no configuration overrides it (4:00 PM)
pub const DEFAULT_FIRST_SESSION: &str = "16:00";
pub const DEFAULT_SESSION_MINUTES: u32 = 30;

/// Maps session indices to wall-clock windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    first_start: NaiveTime,
    session_minutes: u32,
}

impl Default for SessionClock {
    fn default() -> Self {
        SessionClock {
            first_start: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
            session_minutes: DEFAULT_SESSION_MINUTES,
        }
    }
}

impl SessionClock {
    pub fn new(first_start: NaiveTime, session_minutes: u32) -> Self {
        SessionClock {
            first_start,
            session_minutes,
        }
    }

    /// Parses an `HH:MM` start time
    pub fn parse(first_start: &str, session_minutes: u32) -> Option<Self> {
        let first_start = NaiveTime::parse_from_str(first_start.trim(), "%H:%M").ok()?;
        Some(SessionClock::new(first_start, session_minutes))
    }

    pub fn window(&self, session: usize) -> (NaiveTime, NaiveTime) {
        let length = Duration::minutes(i64::from(self.session_minutes));
        let start = self.first_start + Duration::minutes(i64::from(self.session_minutes) * session as i64);
        (start, start + length)
    }

    /// "4:00-4:30 PM" style label
    pub fn label(&self, session: usize) -> String {
        let (start, end) = self.window(session);
        format!("{}-{}", start.format("%-I:%M"), end.format("%-I:%M %p"))
    }

    pub fn labels(&self) -> Vec<String> {
        (0..NUM_SESSIONS).map(|session| self.label(session)).collect()
    }
}

/// "Court A", "Court B", ...
pub fn court_label(court: usize) -> String {
    let letter = u32::try_from(court)
        .ok()
        .and_then(|offset| char::from_u32('A' as u32 + offset))
        .unwrap_or('?');
    format!("Court {}", letter)
}
