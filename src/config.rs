//! Session configuration

use serde::{Deserialize, Serialize};

use crate::board::{Board, Side};
use crate::error::{Error, Result};

/// Immutable parameters fixed at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Board height in rows
    pub height: usize,

    /// Board width in columns
    pub width: usize,

    /// Run length required to win
    pub win_length: usize,

    /// Maximum search depth beyond a task's two forced plies
    pub search_depth: usize,

    /// Side that makes the first move of the game
    pub first_mover: Side,

    /// Worker thread count; zero evaluates rounds on the coordinator thread
    pub workers: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            height: 6,
            width: 7,
            win_length: 4,
            search_depth: 5,
            first_mover: Side::Machine,
            workers: num_cpus::get().saturating_sub(1),
        }
    }
}

impl SessionConfig {
    /// Check the parameters before a session is built.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 {
            return Err(self.rejected("height must be at least 1"));
        }
        if self.width == 0 {
            return Err(self.rejected("width must be at least 1"));
        }
        if self.win_length < 2 {
            return Err(self.rejected("win length must be at least 2"));
        }
        if self.search_depth == 0 {
            return Err(self.rejected("search depth must be at least 1"));
        }
        Ok(())
    }

    /// Build the empty starting board described by this configuration.
    pub fn build_board(&self) -> Board {
        Board::new(self.height, self.width, self.win_length, self.first_mover)
    }

    fn rejected(&self, message: &str) -> Error {
        Error::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
