//! Local leaderboard view

use std::collections::HashMap;

use crate::api::Participant;

/// Local copy of the room leaderboard.
///
/// Overwritten by roster polls and incremented locally on kills; the local
/// value is authoritative for the rest of the session, so a stale poll can
/// make a score dip briefly (eventual consistency with the server).
#[derive(Debug, Default, Clone)]
pub struct Scoreboard {
    scores: HashMap<String, u32>,
    connected: Vec<String>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the view with a polled roster
    pub fn apply_roster(&mut self, roster: &[Participant]) {
        self.scores = roster.iter().map(|p| (p.user_name.clone(), p.score)).collect();
        self.connected = roster
            .iter()
            .filter(|p| p.is_connected)
            .map(|p| p.user_name.clone())
            .collect();
    }

    /// Add points for a user, returns the new score
    pub fn add_points(&mut self, user: &str, points: u32) -> u32 {
        let score = self.scores.entry(user.to_string()).or_insert(0);
        *score += points;
        *score
    }

    pub fn score_of(&self, user: &str) -> u32 {
        self.scores.get(user).copied().unwrap_or(0)
    }

    pub fn connected_users(&self) -> &[String] {
        &self.connected
    }

    /// Standings sorted by score descending, name ascending on ties
    pub fn standings(&self) -> Vec<(String, u32)> {
        let mut rows: Vec<(String, u32)> =
            self.scores.iter().map(|(name, score)| (name.clone(), *score)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(name: &str, score: u32, connected: bool) -> Participant {
        Participant { user_name: name.to_string(), score, is_connected: connected }
    }

    #[test]
    fn add_points_returns_the_new_score() {
        let mut board = Scoreboard::new();
        assert_eq!(board.add_points("alice", 10), 10);
        assert_eq!(board.add_points("alice", 10), 20);
        assert_eq!(board.score_of("alice"), 20);
        assert_eq!(board.score_of("nobody"), 0);
    }

    #[test]
    fn roster_overwrites_local_scores() {
        let mut board = Scoreboard::new();
        board.add_points("alice", 30);
        board.apply_roster(&[participant("alice", 10, true), participant("bob", 20, false)]);

        // The server's last accepted value wins until the next local kill
        assert_eq!(board.score_of("alice"), 10);
        assert_eq!(board.connected_users(), ["alice".to_string()]);
    }

    #[test]
    fn standings_sort_by_score_descending() {
        let mut board = Scoreboard::new();
        board.apply_roster(&[
            participant("alice", 10, true),
            participant("bob", 40, true),
            participant("carol", 40, true),
        ]);
        let rows = board.standings();
        assert_eq!(rows[0].0, "bob");
        assert_eq!(rows[1].0, "carol");
        assert_eq!(rows[2], ("alice".to_string(), 10));
    }
}
