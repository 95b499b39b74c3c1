//! Best score tracking
//!
//! Only the single best contemplation score is kept between runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would replace the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a finished run's score. Returns true on a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New best score {} (was {})", score, self.score);
        self.score = score;
        true
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from disk, starting fresh if the file is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(best) => {
                    log::info!("Loaded best score {}", best.score);
                    best
                }
                Err(err) => {
                    log::warn!("Ignoring corrupt best score file {}: {}", path.display(), err);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No best score found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Best score saved ({})", self.score);
        Ok(())
    }
}
