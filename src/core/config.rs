//! Engine configuration.
//!
//! Drivers build an `EngineConfig` once at startup and hand it to
//! `GridEngine::new`. Board dimensions can still be chosen per game via
//! `start_game`; the config only supplies the defaults.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Default board width.
pub const DEFAULT_COLUMNS: usize = 4;

/// Default board height.
pub const DEFAULT_ROWS: usize = 4;

/// Tiles placed on an empty board by `start_game`.
pub const DEFAULT_STARTING_TILES: usize = 2;

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Columns used by `start_default`.
    pub columns: usize,

    /// Rows used by `start_default`.
    pub rows: usize,

    /// Tiles spawned when a game starts. Capped at the cell count.
    pub starting_tiles: usize,

    /// Seed for the spawn RNG.
    pub seed: u64,

    /// Append a `MoveRecord` for every successful move.
    pub record_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            starting_tiles: DEFAULT_STARTING_TILES,
            seed: 0,
            record_history: true,
        }
    }
}

impl EngineConfig {
    /// Create a default 4x4 configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set the default board dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Set the number of starting tiles.
    #[must_use]
    pub fn with_starting_tiles(mut self, count: usize) -> Self {
        self.starting_tiles = count;
        self
    }

    /// Disable move history.
    #[must_use]
    pub fn without_history(mut self) -> Self {
        self.record_history = false;
        self
    }

    /// Check the default dimensions.
    pub fn validate(&self) -> EngineResult<()> {
        check_dimensions(self.columns, self.rows).map(|_| ())
    }
}

/// Validate a board size and return its cell count.
pub(crate) fn check_dimensions(columns: usize, rows: usize) -> EngineResult<usize> {
    if columns == 0 || rows == 0 {
        return Err(EngineError::InvalidDimensions { columns, rows });
    }
    columns
        .checked_mul(rows)
        .ok_or(EngineError::InvalidDimensions { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.columns, 4);
        assert_eq!(config.rows, 4);
        assert_eq!(config.starting_tiles, 2);
        assert!(config.record_history);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new(9)
            .with_dimensions(5, 3)
            .with_starting_tiles(4)
            .without_history();

        assert_eq!(config.seed, 9);
        assert_eq!(config.columns, 5);
        assert_eq!(config.rows, 3);
        assert_eq!(config.starting_tiles, 4);
        assert!(!config.record_history);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = EngineConfig::default().with_dimensions(0, 4);
        assert_eq!(
            config.validate(),
            Err(EngineError::InvalidDimensions { columns: 0, rows: 4 })
        );
        assert!(check_dimensions(4, 0).is_err());
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert!(check_dimensions(usize::MAX, 2).is_err());
        assert_eq!(check_dimensions(3, 5), Ok(15));
    }

    #[test]
    fn test_config_serde_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"columns": 6, "seed": 3}"#).unwrap();

        assert_eq!(config.columns, 6);
        assert_eq!(config.rows, 4);
        assert_eq!(config.seed, 3);
        assert!(config.record_history);

        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
