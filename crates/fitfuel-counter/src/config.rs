//! Counter configuration.

use fitfuel_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Inclusive angle band in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleBand {
    pub min: f64,
    pub max: f64,
}

impl AngleBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Transition rule selection for the stage state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Fixed-priority guards in which the straight-pose guard appears twice;
    /// the counting branch is shadowed, so the count never advances.
    #[default]
    Overlapping,
    /// Disjoint up/down guards; a completed down-to-up cycle increments the
    /// count.
    Disjoint,
}

/// Complete counter configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Band treated as a fully extended joint
    pub straight: AngleBand,

    /// Band treated as hips flexed to the bottom of the movement
    pub bottom: AngleBand,

    /// Stage transition rules
    pub rules: RuleSet,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            straight: AngleBand::new(170.0, 185.0),
            bottom: AngleBand::new(85.0, 95.0),
            rules: RuleSet::default(),
        }
    }
}

impl CounterConfig {
    /// Load configuration from file, with `FITFUEL_*` environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("FITFUEL"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("FITFUEL"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that both bands are well-formed degree ranges
    pub fn validate(&self) -> Result<()> {
        for (name, band) in [("straight", self.straight), ("bottom", self.bottom)] {
            if band.min > band.max || band.min < 0.0 || band.max > 360.0 {
                return Err(Error::Config(format!(
                    "{name} band [{}, {}] is not a valid degree range",
                    band.min, band.max
                )));
            }
        }
        Ok(())
    }
}
