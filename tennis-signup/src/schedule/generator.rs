use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::pairs::PlayedPairs;
use super::types::{CourtAssignment, Player, Schedule, ScheduleError, Session, NUM_SESSIONS};

/// Randomized trials allowed per session before generation gives up
pub const MAX_ATTEMPTS: u32 = 1000;

/// Monte-Carlo court scheduler.
///
/// Each session shuffles the roster, seats it four per court in shuffled
/// order, and keeps the trial only if no team has partnered earlier in the
/// run. A session that exhausts the retry budget fails the whole schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGenerator {
    max_attempts: u32,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        ScheduleGenerator {
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl ScheduleGenerator {
    pub fn new(max_attempts: u32) -> Self {
        ScheduleGenerator { max_attempts }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        players: &[Player],
        num_courts: usize,
        rng: &mut R,
    ) -> Result<Schedule, ScheduleError> {
        check_roster(players, num_courts)?;

        let mut played = PlayedPairs::new();
        let mut sessions = Vec::with_capacity(NUM_SESSIONS);

        for index in 0..NUM_SESSIONS {
            let Some((courts, attempt)) = self.draw_session(players, num_courts, &played, rng) else {
                warn!(
                    session = index,
                    attempts = self.max_attempts,
                    "Retry budget exhausted, no schedule produced"
                );
                return Err(ScheduleError::GenerationFailure {
                    session: index,
                    attempts: self.max_attempts,
                });
            };

            debug!(session = index, attempt, "Session committed");
            played.record(&courts);
            sessions.push(Session { index, courts });
        }

        Schedule::try_from(sessions)
    }

    /// Returns the first admissible trial and the attempt number it took
    fn draw_session<R: Rng + ?Sized>(
        &self,
        players: &[Player],
        num_courts: usize,
        played: &PlayedPairs,
        rng: &mut R,
    ) -> Option<(Vec<CourtAssignment>, u32)> {
        let mut order: Vec<&Player> = players.iter().collect();

        for attempt in 1..=self.max_attempts {
            order.shuffle(rng);
            let courts = seat_courts(&order, num_courts);
            if courts.iter().all(|court| played.admits(court)) {
                return Some((courts, attempt));
            }
        }
        None
    }
}

/// Generates with the default retry budget and the thread-local RNG
pub fn generate_schedule(players: &[Player], num_courts: usize) -> Result<Schedule, ScheduleError> {
    ScheduleGenerator::default().generate(players, num_courts, &mut rand::thread_rng())
}

fn check_roster(players: &[Player], num_courts: usize) -> Result<(), ScheduleError> {
    if num_courts == 0 {
        return Err(ScheduleError::NoCourts);
    }
    if players.len() != 4 * num_courts {
        return Err(ScheduleError::RosterSize {
            players: players.len(),
            courts: num_courts,
        });
    }

    let mut seen = HashSet::new();
    for player in players {
        if !seen.insert(player) {
            return Err(ScheduleError::DuplicatePlayer(player.name().to_string()));
        }
    }
    Ok(())
}

/// Seats the permutation four at a time: first four on court 0, next four on court 1, ...
fn seat_courts(order: &[&Player], num_courts: usize) -> Vec<CourtAssignment> {
    order
        .chunks_exact(4)
        .take(num_courts)
        .map(|group| {
            CourtAssignment::new([
                group[0].clone(),
                group[1].clone(),
                group[2].clone(),
                group[3].clone(),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn roster(count: usize) -> Vec<Player> {
        (1..=count).map(|i| Player::new(format!("Player {}", i))).collect()
    }

    fn assert_invariants(schedule: &Schedule, players: &[Player]) {
        let mut pair_counts = HashMap::new();
        for session in schedule.sessions() {
            let mut seated: Vec<&Player> = session
                .courts
                .iter()
                .flat_map(|court| court.players().iter())
                .collect();
            seated.sort();
            let mut expected: Vec<&Player> = players.iter().collect();
            expected.sort();
            assert_eq!(seated, expected, "session {} must seat everyone once", session.index);

            for court in &session.courts {
                for pair in court.pairs() {
                    *pair_counts.entry(pair).or_insert(0) += 1;
                }
            }
        }
        assert!(pair_counts.values().all(|&count| count == 1));
    }

    #[test]
    fn full_event_sixteen_players_four_courts() {
        let players = roster(16);
        let mut rng = StdRng::seed_from_u64(7);
        let schedule = ScheduleGenerator::default()
            .generate(&players, 4, &mut rng)
            .unwrap();

        assert_eq!(schedule.sessions().len(), NUM_SESSIONS);
        for (index, session) in schedule.sessions().iter().enumerate() {
            assert_eq!(session.index, index);
            assert_eq!(session.courts.len(), 4);
        }
        assert_invariants(&schedule, &players);
        assert_eq!(PlayedPairs::from_schedule(&schedule).len(), 32);
    }

    #[test]
    fn same_seed_same_schedule() {
        let players = roster(12);
        let generator = ScheduleGenerator::default();
        let first = generator
            .generate(&players, 3, &mut StdRng::seed_from_u64(2024))
            .unwrap();
        let second = generator
            .generate(&players, 3, &mut StdRng::seed_from_u64(2024))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unseeded_runs_keep_invariants() {
        let players = roster(16);
        for _ in 0..20 {
            let schedule = generate_schedule(&players, 4).unwrap();
            assert_invariants(&schedule, &players);
        }
    }

    #[test]
    fn eight_players_either_succeed_cleanly_or_fail_outright() {
        let players = roster(8);
        let generator = ScheduleGenerator::default();
        for seed in 0..50 {
            match generator.generate(&players, 2, &mut StdRng::seed_from_u64(seed)) {
                Ok(schedule) => assert_invariants(&schedule, &players),
                Err(err) => assert!(
                    matches!(err, ScheduleError::GenerationFailure { session, attempts: MAX_ATTEMPTS } if session >= 2),
                    "unexpected error {:?}",
                    err
                ),
            }
        }
    }

    #[test]
    fn one_court_runs_out_of_partners_in_last_session() {
        // four players have only three disjoint partnerings
        let players = roster(4);
        let err = ScheduleGenerator::default()
            .generate(&players, 1, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::GenerationFailure {
                session: 3,
                attempts: MAX_ATTEMPTS
            }
        );
    }

    #[test]
    fn zero_budget_fails_first_session() {
        let err = ScheduleGenerator::new(0)
            .generate(&roster(8), 2, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::GenerationFailure {
                session: 0,
                attempts: 0
            }
        );
    }

    #[test]
    fn roster_not_a_multiple_of_four_is_rejected() {
        let players = roster(11);
        let mut rng = StdRng::seed_from_u64(0);
        let generator = ScheduleGenerator::default();

        assert_eq!(
            generator.generate(&players, 2, &mut rng).unwrap_err(),
            ScheduleError::RosterSize { players: 11, courts: 2 }
        );
        assert_eq!(
            generator.generate(&players, 3, &mut rng).unwrap_err(),
            ScheduleError::RosterSize { players: 11, courts: 3 }
        );
    }

    #[test]
    fn zero_courts_and_duplicates_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let generator = ScheduleGenerator::default();
        assert_eq!(
            generator.generate(&[], 0, &mut rng).unwrap_err(),
            ScheduleError::NoCourts
        );

        let mut players = roster(3);
        players.push(Player::new("Player 2"));
        assert_eq!(
            generator.generate(&players, 1, &mut rng).unwrap_err(),
            ScheduleError::DuplicatePlayer("Player 2".to_string())
        );
    }

    #[test]
    fn json_round_trip_restores_integer_sessions() {
        let players = roster(16);
        let schedule = ScheduleGenerator::default()
            .generate(&players, 4, &mut StdRng::seed_from_u64(99))
            .unwrap();

        let json = serde_json::to_string(&schedule).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[2]["session"], serde_json::json!(2));
        assert_eq!(value[0]["courts"].as_array().unwrap().len(), 4);

        let restored: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, schedule);
    }
}
