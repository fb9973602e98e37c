//! Agent tunables and system configuration
//!
//! Settings load from TOML (every field optional, defaults fill the gaps):
//!
//! ```toml
//! seed = 42
//! show_debug = false
//!
//! [grid]
//! width = 64
//! height = 64
//! cell_size = 1.0
//!
//! [ground]
//! move_speed = 3.0
//! patrol_mode = "ping_pong"
//!
//! [drone]
//! drone_hover_height = 5.0
//! ```
//!
//! Environment overrides: `VOID_TACTICS_SEED`, `VOID_TACTICS_DEBUG`.

use crate::error::{AiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How an agent walks its patrol route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolMode {
    /// 0, 1, ..., N-1, 0, 1, ...
    #[default]
    Loop,
    /// 0, 1, ..., N-1, N-2, ..., 0, 1, ...
    PingPong,
    /// Uniformly random next point
    Random,
    /// Random offsets around home; patrol points are ignored
    AreaRoam,
}

/// Per-agent tunables. Distances in meters, angles in degrees, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    // ---- Movement ----
    /// Walk speed (patrol, investigate, return)
    pub move_speed: f32,
    /// Run speed (chase, moving to cover)
    pub chase_speed: f32,
    /// Distance at which a path waypoint counts as reached
    pub waypoint_dist: f32,
    /// Body cube size
    pub body_scale: f32,
    /// Health on spawn
    pub max_health: f32,

    // ---- Detection ----
    /// Player closer than this (and visible) is detected
    pub detect_range: f32,
    /// Player farther than this is lost
    pub lose_range: f32,
    /// Full field-of-view angle for ground agents
    pub fov_angle: f32,
    /// Require an unobstructed physics ray to see the player
    pub require_los: bool,

    // ---- Patrol ----
    pub patrol_mode: PatrolMode,
    pub waypoint_wait_min: f32,
    pub waypoint_wait_max: f32,
    pub area_roam_radius: f32,
    pub look_around_at_wait: bool,
    pub chase_repath_interval: f32,

    // ---- Steering ----
    pub avoid_radius: f32,
    pub avoid_force: f32,

    // ---- Hearing ----
    pub hear_footstep_range: f32,
    pub hear_gunshot_range: f32,
    pub hear_impact_range: f32,

    // ---- Cover ----
    /// Search radius in cells (Chebyshev)
    pub cover_search_radius: i32,
    /// Minimum distance between cover and threat
    pub cover_min_dist: f32,
    pub cover_stay_time: f32,
    pub seek_cover_on_damage: bool,
    pub seek_cover_on_gunfire: bool,
    /// Time under fire in cover before relocating
    pub cover_relocate_time: f32,
    pub cover_peek_interval: f32,
    pub cover_suppression_max: f32,
    /// Threat bearing change that invalidates cover
    pub cover_flank_angle: f32,

    // ---- Drone ----
    pub drone_hover_height: f32,
    pub drone_bob_amplitude: f32,
    /// Bob phase speed in radians per second
    pub drone_bob_speed: f32,
    pub drone_orbit_radius: f32,
    /// Orbit angular speed in radians per second
    pub drone_orbit_speed: f32,
    pub drone_chase_speed: f32,
    pub drone_climb_speed: f32,
    pub drone_dive_speed: f32,
    pub drone_max_pitch: f32,
    pub drone_max_roll: f32,
    /// Forward obstacle lookahead length
    pub drone_obstacle_dist: f32,
    /// Altitude floor above ground
    pub drone_min_altitude: f32,
    /// Altitude ceiling above ground
    pub drone_max_altitude: f32,
    /// Seconds between downwash particle bursts
    pub drone_downwash_rate: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            chase_speed: 5.0,
            waypoint_dist: 0.3,
            body_scale: 0.8,
            max_health: 100.0,

            detect_range: 10.0,
            lose_range: 15.0,
            fov_angle: 120.0,
            require_los: true,

            patrol_mode: PatrolMode::Loop,
            waypoint_wait_min: 1.0,
            waypoint_wait_max: 3.0,
            area_roam_radius: 8.0,
            look_around_at_wait: true,
            chase_repath_interval: 0.5,

            avoid_radius: 1.0,
            avoid_force: 3.0,

            hear_footstep_range: 8.0,
            hear_gunshot_range: 40.0,
            hear_impact_range: 15.0,

            cover_search_radius: 8,
            cover_min_dist: 3.0,
            cover_stay_time: 5.0,
            seek_cover_on_damage: true,
            seek_cover_on_gunfire: true,
            cover_relocate_time: 2.0,
            cover_peek_interval: 1.5,
            cover_suppression_max: 1.0,
            cover_flank_angle: 100.0,

            drone_hover_height: 4.0,
            drone_bob_amplitude: 0.15,
            drone_bob_speed: 2.0,
            drone_orbit_radius: 5.0,
            drone_orbit_speed: 0.6,
            drone_chase_speed: 7.0,
            drone_climb_speed: 3.0,
            drone_dive_speed: 2.0,
            drone_max_pitch: 20.0,
            drone_max_roll: 25.0,
            drone_obstacle_dist: 4.0,
            drone_min_altitude: 1.5,
            drone_max_altitude: 10.0,
            drone_downwash_rate: 0.1,
        }
    }
}

impl AgentSettings {
    /// Preset for flying drones: faster, longer-ranged, no cover behaviour
    pub fn drone() -> Self {
        Self {
            move_speed: 4.0,
            detect_range: 14.0,
            lose_range: 20.0,
            fov_angle: 360.0,
            seek_cover_on_damage: false,
            seek_cover_on_gunfire: false,
            patrol_mode: PatrolMode::AreaRoam,
            ..Default::default()
        }
    }

    /// Set walk and run speeds
    pub fn with_speeds(mut self, move_speed: f32, chase_speed: f32) -> Self {
        self.move_speed = move_speed;
        self.chase_speed = chase_speed;
        self
    }

    /// Set detection and lose ranges
    pub fn with_ranges(mut self, detect_range: f32, lose_range: f32) -> Self {
        self.detect_range = detect_range;
        self.lose_range = lose_range;
        self
    }

    /// Set patrol mode
    pub fn with_patrol_mode(mut self, mode: PatrolMode) -> Self {
        self.patrol_mode = mode;
        self
    }

    /// Set the waypoint wait window
    pub fn with_wait(mut self, min: f32, max: f32) -> Self {
        self.waypoint_wait_min = min;
        self.waypoint_wait_max = max;
        self
    }

    /// Set whether the player must be physically visible
    pub fn with_require_los(mut self, require_los: bool) -> Self {
        self.require_los = require_los;
        self
    }

    /// Check every tunable for a usable range
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("move_speed", self.move_speed),
            ("chase_speed", self.chase_speed),
            ("waypoint_dist", self.waypoint_dist),
            ("body_scale", self.body_scale),
            ("max_health", self.max_health),
            ("detect_range", self.detect_range),
            ("lose_range", self.lose_range),
            ("chase_repath_interval", self.chase_repath_interval),
            ("cover_peek_interval", self.cover_peek_interval),
            ("drone_chase_speed", self.drone_chase_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(AiError::InvalidSettings(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("waypoint_wait_min", self.waypoint_wait_min),
            ("area_roam_radius", self.area_roam_radius),
            ("avoid_radius", self.avoid_radius),
            ("avoid_force", self.avoid_force),
            ("hear_footstep_range", self.hear_footstep_range),
            ("hear_gunshot_range", self.hear_gunshot_range),
            ("hear_impact_range", self.hear_impact_range),
            ("cover_min_dist", self.cover_min_dist),
            ("cover_stay_time", self.cover_stay_time),
            ("cover_relocate_time", self.cover_relocate_time),
            ("cover_suppression_max", self.cover_suppression_max),
            ("drone_bob_amplitude", self.drone_bob_amplitude),
            ("drone_obstacle_dist", self.drone_obstacle_dist),
            ("drone_min_altitude", self.drone_min_altitude),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(AiError::InvalidSettings(format!("{name} must be >= 0, got {value}")));
            }
        }

        if self.fov_angle <= 0.0 || self.fov_angle > 360.0 {
            return Err(AiError::InvalidSettings(format!(
                "fov_angle must be in (0, 360], got {}",
                self.fov_angle
            )));
        }
        if self.waypoint_wait_max < self.waypoint_wait_min {
            return Err(AiError::InvalidSettings(format!(
                "waypoint_wait_max ({}) < waypoint_wait_min ({})",
                self.waypoint_wait_max, self.waypoint_wait_min
            )));
        }
        if self.cover_search_radius < 0 {
            return Err(AiError::InvalidSettings(format!(
                "cover_search_radius must be >= 0, got {}",
                self.cover_search_radius
            )));
        }
        if !(self.drone_min_altitude <= self.drone_hover_height
            && self.drone_hover_height <= self.drone_max_altitude)
        {
            return Err(AiError::InvalidSettings(format!(
                "drone altitudes must satisfy min ({}) <= hover ({}) <= max ({})",
                self.drone_min_altitude, self.drone_hover_height, self.drone_max_altitude
            )));
        }
        if self.detect_range > self.lose_range {
            log::warn!(
                "detect_range ({}) exceeds lose_range ({}); agents will drop targets they just acquired",
                self.detect_range,
                self.lose_range
            );
        }
        Ok(())
    }
}

/// Navigation grid dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    pub origin_x: f32,
    pub origin_z: f32,
    pub ground_y: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            cell_size: 1.0,
            origin_x: 0.0,
            origin_z: 0.0,
            ground_y: 0.0,
        }
    }
}

/// Top-level AI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seed for the system's random generator
    pub seed: u64,
    /// Draw agent debug primitives
    pub show_debug: bool,
    /// Grid used by hosts that let the AI own its grid
    pub grid: GridConfig,
    /// Defaults for ground agents
    pub ground: AgentSettings,
    /// Defaults for drones
    pub drone: AgentSettings,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            show_debug: false,
            grid: GridConfig::default(),
            ground: AgentSettings::default(),
            drone: AgentSettings::drone(),
        }
    }
}

impl AiConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        log::info!("Loaded AI config from {}", path.display());
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `VOID_TACTICS_SEED` and `VOID_TACTICS_DEBUG`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(seed) = std::env::var("VOID_TACTICS_SEED") {
            match seed.parse() {
                Ok(seed) => {
                    self.seed = seed;
                    log::info!("AI seed from env: {}", self.seed);
                }
                Err(_) => log::warn!("Ignoring unparsable VOID_TACTICS_SEED={seed:?}"),
            }
        }
        if let Ok(debug) = std::env::var("VOID_TACTICS_DEBUG") {
            self.show_debug = debug == "1" || debug == "true";
        }
    }

    /// Validate both settings blocks and the grid
    pub fn validate(&self) -> Result<()> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(AiError::InvalidGrid {
                width: self.grid.width,
                height: self.grid.height,
            });
        }
        if !(self.grid.cell_size > 0.0 && self.grid.cell_size.is_finite()) {
            return Err(AiError::InvalidCellSize(self.grid.cell_size));
        }
        self.ground.validate()?;
        self.drone.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AgentSettings::default().validate().is_ok());
        assert!(AgentSettings::drone().validate().is_ok());
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_wait_window_rejected() {
        let settings = AgentSettings::default().with_wait(3.0, 1.0);
        assert!(matches!(settings.validate(), Err(AiError::InvalidSettings(_))));
    }

    #[test]
    fn test_drone_altitude_order_rejected() {
        let settings = AgentSettings {
            drone_hover_height: 20.0,
            ..AgentSettings::drone()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AiConfig::from_toml_str(
            r#"
            seed = 7

            [grid]
            width = 10
            height = 12

            [ground]
            move_speed = 2.5
            patrol_mode = "ping_pong"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.grid.height, 12);
        assert_eq!(config.grid.cell_size, 1.0);
        assert_eq!(config.ground.move_speed, 2.5);
        assert_eq!(config.ground.patrol_mode, PatrolMode::PingPong);
        assert_eq!(config.ground.chase_speed, AgentSettings::default().chase_speed);
        assert_eq!(config.drone, AgentSettings::drone());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = AiConfig::from_toml_str("seed = \"not a number\"").unwrap_err();
        assert!(matches!(err, AiError::ConfigParse(_)));
    }

    #[test]
    fn test_zero_grid_rejected() {
        let err = AiConfig::from_toml_str("[grid]\nwidth = 0").unwrap_err();
        assert!(matches!(err, AiError::InvalidGrid { width: 0, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AiConfig::load("/definitely/not/here/tactics.toml").unwrap_err();
        assert!(matches!(err, AiError::Io(_)));
    }
}
