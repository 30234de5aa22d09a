//! Leaderboard ranking.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::LeaderboardEntry;

/// A leaderboard row with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub player_name: String,
    pub score: i64,
}

/// Entries ranked by score, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub quiz_id: String,
    pub entries: Vec<RankedEntry>,
}

impl Leaderboard {
    /// Rank entries by score descending. Equal scores keep server order.
    pub fn rank(quiz_id: impl Into<String>, mut entries: Vec<LeaderboardEntry>) -> Self {
        // `sort_by` is stable, so ties stay in the order the server sent them.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, e)| RankedEntry {
                rank: i + 1,
                player_name: e.player_name,
                score: e.score,
            })
            .collect();
        Self {
            quiz_id: quiz_id.into(),
            entries,
        }
    }

    /// Like [`Leaderboard::rank`], but an empty board is an empty result.
    pub fn rank_non_empty(
        quiz_id: impl Into<String>,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<Self, QuizError> {
        if entries.is_empty() {
            return Err(QuizError::EmptyResult("leaderboard entries"));
        }
        Ok(Self::rank(quiz_id, entries))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn leader(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    /// The best-ranked entry for `player_name`, if they are on the board.
    pub fn find_player(&self, player_name: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.player_name == player_name)
    }

    /// The first `n` entries.
    pub fn top(&self, n: usize) -> &[RankedEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.into(),
            score,
        }
    }

    #[test]
    fn ties_keep_server_order() {
        let board = Leaderboard::rank("q1", vec![entry("Bo", 5), entry("Al", 5)]);
        assert_eq!(board.leader().unwrap().player_name, "Bo");
        assert_eq!(board.entries[0].rank, 1);
        assert_eq!(board.entries[1].player_name, "Al");
        assert_eq!(board.entries[1].rank, 2);
    }

    #[test]
    fn sorted_by_score_descending() {
        let board = Leaderboard::rank(
            "q1",
            vec![entry("Cy", 2), entry("Di", 9), entry("Ed", 2), entry("Fa", 4)],
        );
        let names: Vec<&str> = board.entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Di", "Fa", "Cy", "Ed"]);
        let ranks: Vec<usize> = board.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn find_player_and_top() {
        let board = Leaderboard::rank("q1", vec![entry("Bo", 1), entry("Al", 3), entry("Bo", 4)]);
        let bo = board.find_player("Bo").unwrap();
        assert_eq!(bo.score, 4);
        assert_eq!(bo.rank, 1);
        assert!(board.find_player("Zed").is_none());
        assert_eq!(board.top(2).len(), 2);
        assert_eq!(board.top(10).len(), 3);
    }

    #[test]
    fn empty_board() {
        assert!(Leaderboard::rank("q1", vec![]).is_empty());
        assert!(Leaderboard::rank_non_empty("q1", vec![])
            .unwrap_err()
            .is_empty_result());
    }
}
