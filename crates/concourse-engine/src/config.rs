//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration is a single YAML file mirrored by
//! [`EngineConfig`]. Every field is optional with a named default, so an
//! empty file (or no file at all) yields a fully usable configuration.
//! Sections convert into the per-component config structs at
//! construction time; component constructors do the value validation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use concourse_camera::DeadZone;
use concourse_nav::NavEngineConfig;
use concourse_poi::PoiRegistryConfig;
use concourse_presence::PresenceTrackerConfig;
use concourse_types::{Point, Rect};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// POI registry settings.
    #[serde(default)]
    pub poi: PoiConfig,

    /// Presence tracker settings.
    #[serde(default)]
    pub presence: PresenceConfig,

    /// Navigation engine settings.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Camera controller settings.
    #[serde(default)]
    pub camera: CameraConfig,

    /// Virtual joystick settings.
    #[serde(default)]
    pub joystick: JoystickConfig,

    /// Startup preferences (read once, never watched).
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// POI registry configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoiConfig {
    /// Radius around the player inside which `poi-proximity` fires.
    #[serde(default = "default_proximity_radius")]
    pub proximity_radius: f32,

    /// Proximity scan period in milliseconds.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: f64,
}

impl PoiConfig {
    /// Convert into the registry's own config struct.
    pub const fn to_registry_config(&self) -> PoiRegistryConfig {
        PoiRegistryConfig {
            proximity_radius: self.proximity_radius,
            scan_interval_ms: self.scan_interval_ms,
        }
    }
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            proximity_radius: default_proximity_radius(),
            scan_interval_ms: default_scan_interval_ms(),
        }
    }
}

/// Presence tracker configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresenceConfig {
    /// Hard cap on simultaneously materialized markers.
    #[serde(default = "default_max_markers")]
    pub max_markers: usize,

    /// Clustering distance in world units.
    #[serde(default = "default_cluster_distance")]
    pub cluster_distance: f32,

    /// Marker animation tick period in milliseconds.
    #[serde(default = "default_anim_interval_ms")]
    pub anim_interval_ms: f64,

    /// Focused-label reveal duration in milliseconds.
    #[serde(default = "default_focus_label_ms")]
    pub focus_label_ms: f64,

    /// Centre x of the derived-placement ring.
    #[serde(default = "default_ring_center_x")]
    pub ring_center_x: f32,

    /// Centre y of the derived-placement ring.
    #[serde(default = "default_ring_center_y")]
    pub ring_center_y: f32,

    /// Inner radius of the placement ring.
    #[serde(default = "default_ring_min_radius")]
    pub ring_min_radius: f32,

    /// Outer radius of the placement ring.
    #[serde(default = "default_ring_max_radius")]
    pub ring_max_radius: f32,
}

impl PresenceConfig {
    /// Convert into the tracker's own config struct.
    pub const fn to_tracker_config(&self) -> PresenceTrackerConfig {
        PresenceTrackerConfig {
            max_markers: self.max_markers,
            cluster_distance: self.cluster_distance,
            anim_interval_ms: self.anim_interval_ms,
            focus_label_ms: self.focus_label_ms,
            ring_center: Point::new(self.ring_center_x, self.ring_center_y),
            ring_min_radius: self.ring_min_radius,
            ring_max_radius: self.ring_max_radius,
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            max_markers: default_max_markers(),
            cluster_distance: default_cluster_distance(),
            anim_interval_ms: default_anim_interval_ms(),
            focus_label_ms: default_focus_label_ms(),
            ring_center_x: default_ring_center_x(),
            ring_center_y: default_ring_center_y(),
            ring_min_radius: default_ring_min_radius(),
            ring_max_radius: default_ring_max_radius(),
        }
    }
}

/// Navigation engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NavigationConfig {
    /// Arrival threshold distance in world units.
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f32,

    /// Progress tick period in milliseconds.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: f64,

    /// Post-arrival grace delay before the automatic reset, milliseconds.
    #[serde(default = "default_arrival_grace_ms")]
    pub arrival_grace_ms: f64,
}

impl NavigationConfig {
    /// Convert into the navigation engine's own config struct.
    pub const fn to_engine_config(&self) -> NavEngineConfig {
        NavEngineConfig {
            arrival_threshold: self.arrival_threshold,
            progress_interval_ms: self.progress_interval_ms,
            arrival_grace_ms: self.arrival_grace_ms,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: default_arrival_threshold(),
            progress_interval_ms: default_progress_interval_ms(),
            arrival_grace_ms: default_arrival_grace_ms(),
        }
    }
}

/// Camera controller configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraConfig {
    /// Lower zoom bound.
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,

    /// Upper zoom bound.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,

    /// Discrete zoom step.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    /// Starting zoom.
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f32,

    /// Starting centre x.
    #[serde(default)]
    pub initial_x: f32,

    /// Starting centre y.
    #[serde(default)]
    pub initial_y: f32,

    /// Follow smoothing fraction in `(0, 1]`.
    #[serde(default = "default_follow_smoothing")]
    pub follow_smoothing: f32,

    /// Follow dead-zone width; zero disables the dead-zone.
    #[serde(default = "default_dead_zone_width")]
    pub follow_dead_zone_width: f32,

    /// Follow dead-zone height; zero disables the dead-zone.
    #[serde(default = "default_dead_zone_height")]
    pub follow_dead_zone_height: f32,

    /// Pinch distance dead-zone in screen units.
    #[serde(default = "default_pinch_dead_zone")]
    pub pinch_dead_zone: f32,

    /// Zoom-to-point animation duration in milliseconds.
    #[serde(default = "default_zoom_tween_ms")]
    pub zoom_tween_ms: f64,
}

impl CameraConfig {
    /// Convert into the controller's own config struct. The reserved
    /// region comes from the joystick section, keeping the two in step.
    pub fn to_controller_config(&self, reserved_region: Option<Rect>) -> concourse_camera::CameraConfig {
        let dead_zone = (self.follow_dead_zone_width > 0.0 && self.follow_dead_zone_height > 0.0)
            .then_some(DeadZone {
                width: self.follow_dead_zone_width,
                height: self.follow_dead_zone_height,
            });
        concourse_camera::CameraConfig {
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            zoom_step: self.zoom_step,
            initial_zoom: self.initial_zoom,
            initial_center: Point::new(self.initial_x, self.initial_y),
            follow_smoothing: self.follow_smoothing,
            follow_dead_zone: dead_zone,
            pinch_dead_zone: self.pinch_dead_zone,
            reserved_region,
            zoom_tween_ms: self.zoom_tween_ms,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            zoom_step: default_zoom_step(),
            initial_zoom: default_initial_zoom(),
            initial_x: 0.0,
            initial_y: 0.0,
            follow_smoothing: default_follow_smoothing(),
            follow_dead_zone_width: default_dead_zone_width(),
            follow_dead_zone_height: default_dead_zone_height(),
            pinch_dead_zone: default_pinch_dead_zone(),
            zoom_tween_ms: default_zoom_tween_ms(),
        }
    }
}

/// Virtual joystick configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JoystickConfig {
    /// Whether the joystick exists at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Left edge of the reserved screen region.
    #[serde(default = "default_joystick_x")]
    pub x: f32,

    /// Top edge of the reserved screen region.
    #[serde(default = "default_joystick_y")]
    pub y: f32,

    /// Width of the reserved screen region.
    #[serde(default = "default_joystick_size")]
    pub width: f32,

    /// Height of the reserved screen region.
    #[serde(default = "default_joystick_size")]
    pub height: f32,

    /// Pointer travel that maps to full deflection.
    #[serde(default = "default_joystick_max_radius")]
    pub max_radius: f32,
}

impl JoystickConfig {
    /// The reserved screen region.
    pub const fn region(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x: default_joystick_x(),
            y: default_joystick_y(),
            width: default_joystick_size(),
            height: default_joystick_size(),
            max_radius: default_joystick_max_radius(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_proximity_radius() -> f32 {
    120.0
}

const fn default_scan_interval_ms() -> f64 {
    1000.0
}

const fn default_max_markers() -> usize {
    50
}

const fn default_cluster_distance() -> f32 {
    40.0
}

const fn default_anim_interval_ms() -> f64 {
    250.0
}

const fn default_focus_label_ms() -> f64 {
    2000.0
}

const fn default_ring_center_x() -> f32 {
    512.0
}

const fn default_ring_center_y() -> f32 {
    384.0
}

const fn default_ring_min_radius() -> f32 {
    60.0
}

const fn default_ring_max_radius() -> f32 {
    280.0
}

const fn default_arrival_threshold() -> f32 {
    30.0
}

const fn default_progress_interval_ms() -> f64 {
    100.0
}

const fn default_arrival_grace_ms() -> f64 {
    5000.0
}

const fn default_min_zoom() -> f32 {
    0.5
}

const fn default_max_zoom() -> f32 {
    3.0
}

const fn default_zoom_step() -> f32 {
    0.25
}

const fn default_initial_zoom() -> f32 {
    1.0
}

const fn default_follow_smoothing() -> f32 {
    0.15
}

const fn default_dead_zone_width() -> f32 {
    80.0
}

const fn default_dead_zone_height() -> f32 {
    60.0
}

const fn default_pinch_dead_zone() -> f32 {
    8.0
}

const fn default_zoom_tween_ms() -> f64 {
    300.0
}

const fn default_joystick_x() -> f32 {
    20.0
}

const fn default_joystick_y() -> f32 {
    520.0
}

const fn default_joystick_size() -> f32 {
    180.0
}

const fn default_joystick_max_radius() -> f32 {
    60.0
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.poi.proximity_radius, 120.0);
        assert_eq!(config.presence.max_markers, 50);
        assert_eq!(config.navigation.arrival_threshold, 30.0);
        assert_eq!(config.camera.max_zoom, 3.0);
        assert!(config.joystick.enabled);
        assert!(config.preferences.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
poi:
  proximity_radius: 200.0
  scan_interval_ms: 500.0

presence:
  max_markers: 25
  cluster_distance: 60.0
  anim_interval_ms: 100.0
  focus_label_ms: 1500.0
  ring_center_x: 400.0
  ring_center_y: 300.0
  ring_min_radius: 40.0
  ring_max_radius: 200.0

navigation:
  arrival_threshold: 50.0
  progress_interval_ms: 200.0
  arrival_grace_ms: 3000.0

camera:
  min_zoom: 0.25
  max_zoom: 4.0
  zoom_step: 0.5
  initial_zoom: 1.5
  follow_smoothing: 0.3
  follow_dead_zone_width: 100.0
  follow_dead_zone_height: 80.0
  pinch_dead_zone: 12.0
  zoom_tween_ms: 250.0

joystick:
  enabled: false
  x: 10.0
  y: 400.0
  width: 150.0
  height: 150.0
  max_radius: 50.0

preferences:
  share_location: "false"
  theme: "dark"

logging:
  level: "debug"
"#;

        let config = EngineConfig::parse(yaml).unwrap();
        assert_eq!(config.poi.proximity_radius, 200.0);
        assert_eq!(config.presence.max_markers, 25);
        assert_eq!(config.navigation.arrival_grace_ms, 3000.0);
        assert_eq!(config.camera.max_zoom, 4.0);
        assert!(!config.joystick.enabled);
        assert_eq!(
            config.preferences.get("share_location").map(String::as_str),
            Some("false")
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml_fills_defaults() {
        let config = EngineConfig::parse("navigation:\n  arrival_threshold: 75.0\n").unwrap();
        assert_eq!(config.navigation.arrival_threshold, 75.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.navigation.progress_interval_ms, 100.0);
        assert_eq!(config.poi.scan_interval_ms, 1000.0);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(EngineConfig::parse("").is_ok());
    }

    #[test]
    fn zero_dead_zone_disables_follow_dead_zone() {
        let config = EngineConfig::parse(
            "camera:\n  follow_dead_zone_width: 0.0\n  follow_dead_zone_height: 0.0\n",
        )
        .unwrap();
        let controller = config.camera.to_controller_config(None);
        assert!(controller.follow_dead_zone.is_none());
    }

    #[test]
    fn joystick_region_matches_fields() {
        let config = JoystickConfig::default();
        let region = config.region();
        assert_eq!(region.x, 20.0);
        assert_eq!(region.width, 180.0);
    }
}
