use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GrassConfig {
    /// Chance that any one column holds a tree.
    pub obstacle_chance: f64,
    /// Longest allowed run of neighbouring trees.
    pub max_consecutive: u32,
}

impl Default for GrassConfig {
    fn default() -> Self {
        GrassConfig { obstacle_chance: 0.15, max_consecutive: 2 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RoadConfig {
    pub base_speed: f32,
    pub speed_per_lane: f32,
    pub min_interval: f32,
    pub interval_decay_per_lane: f32,
    pub interval_floor: f32,
    /// Vehicle length in tiles.
    pub vehicle_length: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        RoadConfig {
            base_speed: 100.0,
            speed_per_lane: 0.5,
            min_interval: 3.0,
            interval_decay_per_lane: 0.005,
            interval_floor: 1.5,
            vehicle_length: 1.5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RiverConfig {
    pub base_speed: f32,
    pub speed_per_lane: f32,
    pub first_spawn_max: f32,
    pub min_interval: f32,
    pub max_interval: f32,
    /// Log lengths in tiles, one per size class.
    pub log_lengths: [f32; 3],
}

impl Default for RiverConfig {
    fn default() -> Self {
        RiverConfig {
            base_speed: 80.0,
            speed_per_lane: 0.4,
            first_spawn_max: 2.0,
            min_interval: 1.5,
            max_interval: 3.0,
            log_lengths: [2.0, 3.0, 4.0],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RailConfig {
    pub quiet_min: f32,
    pub quiet_max: f32,
    pub warning: f32,
    pub base_speed: f32,
    pub speed_multiplier: f32,
    /// Train length in tiles.
    pub train_length: f32,
}

impl Default for RailConfig {
    fn default() -> Self {
        RailConfig {
            quiet_min: 5.0,
            quiet_max: 10.0,
            warning: 2.0,
            base_speed: 800.0,
            speed_multiplier: 2.5,
            train_length: 10.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ProgressConfig {
    pub xp_per_hop: u32,
    pub first_level_xp: u32,
    pub level_growth: f32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig { xp_per_hop: 10, first_level_xp: 100, level_growth: 1.5 }
    }
}

/// Every tunable of the simulation. Missing JSON fields fall back to the defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub tile_size: f32,
    pub columns: u32,
    pub player_size: f32,
    pub hop_duration: f32,
    pub hop_height: f32,
    pub camera_rate: f32,
    pub camera_lead: f32,
    pub entity_margin: f32,
    pub lane_cull_buffer: f32,
    pub generation_buffer: f32,
    pub safe_lanes: u32,
    pub seed: Option<u64>,
    pub grass: GrassConfig,
    pub road: RoadConfig,
    pub river: RiverConfig,
    pub rail: RailConfig,
    pub progress: ProgressConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: 800.0,
            screen_height: 600.0,
            tile_size: 40.0,
            columns: 20,
            player_size: 30.0,
            hop_duration: 0.15,
            hop_height: 15.0,
            camera_rate: 5.0,
            camera_lead: 0.6,
            entity_margin: 200.0,
            lane_cull_buffer: 200.0,
            generation_buffer: 100.0,
            safe_lanes: 5,
            seed: None,
            grass: GrassConfig::default(),
            road: RoadConfig::default(),
            river: RiverConfig::default(),
            rail: RailConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn column_width(&self) -> f32 {
        self.screen_width / self.columns as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tile_size", self.tile_size)?;
        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        positive("player_size", self.player_size)?;
        positive("hop_duration", self.hop_duration)?;
        positive("road.min_interval", self.road.min_interval)?;
        positive("road.interval_floor", self.road.interval_floor)?;
        positive("river.first_spawn_max", self.river.first_spawn_max)?;
        positive("rail.warning", self.rail.warning)?;
        positive("progress.level_growth", self.progress.level_growth)?;
        positive("camera_rate", self.camera_rate)?;
        non_negative("hop_height", self.hop_height)?;
        non_negative("entity_margin", self.entity_margin)?;
        non_negative("lane_cull_buffer", self.lane_cull_buffer)?;
        non_negative("generation_buffer", self.generation_buffer)?;

        if self.columns == 0 {
            return Err(invalid("columns", "must be at least 1"));
        }
        if self.screen_width < self.tile_size {
            return Err(invalid("screen_width", "narrower than one tile"));
        }
        if self.player_size > self.tile_size {
            return Err(invalid("player_size", "larger than one tile"));
        }
        if !(0.0..=1.0).contains(&self.camera_lead) {
            return Err(invalid("camera_lead", "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.grass.obstacle_chance) {
            return Err(invalid("grass.obstacle_chance", "must lie in [0, 1]"));
        }
        if self.river.min_interval <= 0.0 || self.river.min_interval > self.river.max_interval {
            return Err(invalid("river.min_interval", "must be positive and not above river.max_interval"));
        }
        if self.rail.quiet_min <= 0.0 || self.rail.quiet_min > self.rail.quiet_max {
            return Err(invalid("rail.quiet_min", "must be positive and not above rail.quiet_max"));
        }
        if self.river.log_lengths.iter().any(|l| *l <= 0.0) {
            return Err(invalid("river.log_lengths", "every length must be positive"));
        }
        if self.progress.first_level_xp == 0 {
            return Err(invalid("progress.first_level_xp", "must be at least 1"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be positive, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must not be negative, got {}", value)))
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.column_width(), 40.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "hop_duration": 0.2, "rail": { "warning": 3.0 }, "seed": 7 }"#)
            .unwrap();
        assert_eq!(config.hop_duration, 0.2);
        assert_eq!(config.rail.warning, 3.0);
        assert_eq!(config.rail.quiet_min, 5.0);
        assert_eq!(config.tile_size, 40.0);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn shipped_config_parses() {
        let config = GameConfig::from_json(include_str!("../../assets/config.json")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        match GameConfig::from_json(r#"{ "tile_size": 0 }"#) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "tile_size"),
            other => panic!("expected invalid tile_size, got {:?}", other),
        }
        match GameConfig::from_json(r#"{ "rail": { "quiet_min": 12.0 } }"#) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "rail.quiet_min"),
            other => panic!("expected invalid rail.quiet_min, got {:?}", other),
        }
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_settings_that_would_scroll_backwards() {
        let rejected = |json: &str| match GameConfig::from_json(json) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected {} to be rejected, got {:?}", json, other),
        };
        assert_eq!(rejected(r#"{ "camera_rate": -5.0 }"#), "camera_rate");
        assert_eq!(rejected(r#"{ "camera_rate": 0.0 }"#), "camera_rate");
        assert_eq!(rejected(r#"{ "camera_lead": 1.5 }"#), "camera_lead");
        assert_eq!(rejected(r#"{ "hop_height": -1.0 }"#), "hop_height");
        assert_eq!(rejected(r#"{ "entity_margin": -10.0 }"#), "entity_margin");
        assert_eq!(rejected(r#"{ "lane_cull_buffer": -1.0 }"#), "lane_cull_buffer");
        assert_eq!(rejected(r#"{ "generation_buffer": -1.0 }"#), "generation_buffer");
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let mut config = GameConfig::default();
        config.hop_duration = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.entity_margin = f32::INFINITY;
        assert!(config.validate().is_err());
    }
}
