use std::collections::HashSet;

use super::types::{CourtAssignment, Pair, Schedule};

/// Every teammate pair committed so far in one generation run
#[derive(Debug, Clone, Default)]
pub struct PlayedPairs {
    pairs: HashSet<Pair>,
}

impl PlayedPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the accumulator by replaying a stored schedule
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut played = Self::new();
        for session in schedule.sessions() {
            played.record(&session.courts);
        }
        played
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(pair)
    }

    /// True when neither team on the court has partnered before
    pub fn admits(&self, court: &CourtAssignment) -> bool {
        court.pairs().iter().all(|pair| !self.contains(pair))
    }

    pub fn record(&mut self, courts: &[CourtAssignment]) {
        for court in courts {
            self.pairs.extend(court.pairs());
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::Player;

    fn court(names: [&str; 4]) -> CourtAssignment {
        CourtAssignment::new(names.map(Player::from))
    }

    #[test]
    fn recorded_pairs_block_either_order() {
        let mut played = PlayedPairs::new();
        played.record(&[court(["ann", "bob", "cat", "dan"])]);

        assert_eq!(played.len(), 2);
        assert!(!played.admits(&court(["bob", "ann", "eve", "fay"])));
        assert!(!played.admits(&court(["eve", "fay", "dan", "cat"])));
        assert!(played.admits(&court(["ann", "cat", "bob", "dan"])));
    }

    #[test]
    fn opponents_may_meet_again() {
        let mut played = PlayedPairs::new();
        played.record(&[court(["ann", "bob", "cat", "dan"])]);
        // ann faced cat and dan, never partnered them
        assert!(played.admits(&court(["ann", "cat", "bob", "dan"])));
        assert!(played.admits(&court(["ann", "dan", "bob", "cat"])));
    }

    #[test]
    fn empty_accumulator_admits_everything() {
        let played = PlayedPairs::new();
        assert!(played.is_empty());
        assert!(played.admits(&court(["a", "b", "c", "d"])));
    }
}
