//! High score leaderboard system
//!
//! Persisted to LocalStorage, tracks the top 10 longest flights.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Distance flown
    pub distance: u64,
    /// Enemies that crossed the screen without hitting the plane
    pub enemies_dodged: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sea_glider_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a distance qualifies for the leaderboard
    pub fn qualifies(&self, distance: u64) -> bool {
        if distance == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|e| distance > e.distance)
            .unwrap_or(true)
    }

    /// Add a new flight to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(
        &mut self,
        distance: u64,
        enemies_dodged: u32,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(distance) {
            return None;
        }

        let entry = HighScoreEntry {
            distance,
            enemies_dodged,
            timestamp,
        };

        // Find insertion point (sorted descending by distance)
        let pos = self.entries.iter().position(|e| distance > e.distance);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the longest flight (if any)
    pub fn top_distance(&self) -> Option<u64> {
        self.entries.first().map(|e| e.distance)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_and_rank() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));

        assert_eq!(scores.add_score(500, 10, 0.0), Some(1));
        assert_eq!(scores.add_score(800, 20, 1.0), Some(1));
        assert_eq!(scores.add_score(600, 5, 2.0), Some(2));
        assert_eq!(scores.top_distance(), Some(800));
    }

    #[test]
    fn test_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for d in 1..=12u64 {
            scores.add_score(d * 100, 0, d as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // Lowest remaining beat the two evicted entries
        assert_eq!(scores.entries.last().unwrap().distance, 300);
        assert!(!scores.qualifies(300));
        assert!(scores.qualifies(301));
    }
}
