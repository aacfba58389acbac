use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level configuration for a bottom sheet engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Resting positions starting from the top, as absolute offsets or percentages ("50%")
    #[serde(default = "default_snap_points")]
    pub snap_points: Vec<SnapPointSpec>,
    /// Index of the snap point the sheet starts at
    #[serde(default)]
    pub initial_snap_index: usize,
    /// Space reserved at the top (status bar, notch) when resolving percentages
    #[serde(default)]
    pub top_inset: f64,
    /// Height available to the sheet container
    #[serde(default = "default_container_height")]
    pub container_height: f64,
    /// Resistance when the gesture is released: 0 = maximum momentum, 1 = none
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Allow the sheet to be dragged below the lowest snap point
    #[serde(default)]
    pub enable_over_scroll: bool,
    /// Platform whose scroll deceleration rates apply
    #[serde(default)]
    pub platform: Platform,
    /// Override for the content's normal deceleration rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deceleration_rate: Option<f64>,
    /// Animation used to reach a snap point
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            snap_points: default_snap_points(),
            initial_snap_index: 0,
            top_inset: 0.0,
            container_height: default_container_height(),
            friction: default_friction(),
            enable_over_scroll: false,
            platform: Platform::default(),
            deceleration_rate: None,
            animation: AnimationConfig::default(),
        }
    }
}

/// A single snap point as written in configuration
///
/// Accepts either a bare number (`120`) or a percentage string (`"50%"`).
/// Percentage strings are only checked for well-formedness when the snap
/// point table is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapPointSpec {
    Absolute(f64),
    Percent(String),
}

impl From<f64> for SnapPointSpec {
    fn from(value: f64) -> Self {
        SnapPointSpec::Absolute(value)
    }
}

impl From<&str> for SnapPointSpec {
    fn from(value: &str) -> Self {
        SnapPointSpec::Percent(value.to_string())
    }
}

impl fmt::Display for SnapPointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapPointSpec::Absolute(v) => write!(f, "{}", v),
            SnapPointSpec::Percent(s) => write!(f, "{:?}", s),
        }
    }
}

/// Easing curve for timing animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value on the last frame
    None,
    #[default]
    Linear,
    Cubic,
    Quintic,
    EaseOut,
    EaseInOut,
}

/// Animation policy selected by `kind = "timing"` or `kind = "spring"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationConfig {
    Timing(TimingConfig),
    Spring(SpringConfig),
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig::Timing(TimingConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Animation duration in milliseconds
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: EasingType::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    /// Stop at the target instead of bouncing past it
    #[serde(default = "default_true")]
    pub overshoot_clamping: bool,
    /// Speed (points/s) below which the spring may come to rest
    #[serde(default = "default_rest_threshold")]
    pub rest_speed_threshold: f64,
    /// Distance from the target below which the spring may come to rest
    #[serde(default = "default_rest_threshold")]
    pub rest_displacement_threshold: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            mass: default_mass(),
            stiffness: default_stiffness(),
            overshoot_clamping: default_true(),
            rest_speed_threshold: default_rest_threshold(),
            rest_displacement_threshold: default_rest_threshold(),
        }
    }
}

/// Target platform, used to pick the content's normal deceleration rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

fn default_snap_points() -> Vec<SnapPointSpec> {
    vec![
        SnapPointSpec::Absolute(100.0),
        SnapPointSpec::Percent("50%".to_string()),
        SnapPointSpec::Percent("90%".to_string()),
    ]
}

fn default_container_height() -> f64 {
    800.0
}

fn default_friction() -> f64 {
    0.95
}

fn default_duration_ms() -> u64 {
    250
}

fn default_damping() -> f64 {
    50.0
}

fn default_mass() -> f64 {
    0.3
}

fn default_stiffness() -> f64 {
    121.6
}

fn default_rest_threshold() -> f64 {
    0.3
}

fn default_true() -> bool {
    true
}

impl TimingConfig {
    fn validate(&self) -> crate::Result<()> {
        if self.duration_ms == 0 {
            return Err(crate::Error::Config(
                "timing animation duration_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl SpringConfig {
    fn validate(&self) -> crate::Result<()> {
        let positive = [
            ("damping", self.damping),
            ("mass", self.mass),
            ("stiffness", self.stiffness),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(crate::Error::Config(format!(
                    "spring {} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("rest_speed_threshold", self.rest_speed_threshold),
            ("rest_displacement_threshold", self.rest_displacement_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::Config(format!(
                    "spring {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl AnimationConfig {
    /// Reject parameters that could never bring an animation to rest
    pub fn validate(&self) -> crate::Result<()> {
        match self {
            AnimationConfig::Timing(timing) => timing.validate(),
            AnimationConfig::Spring(spring) => spring.validate(),
        }
    }
}

impl SheetConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::from_path(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit TOML file
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Serialize configuration as pretty TOML
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml_string()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/snapsheet/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("snapsheet")
            .join("config.toml")
    }

    /// Momentum weight applied to the release velocity
    pub fn drag_toss(&self) -> f64 {
        1.0 - self.friction
    }

    /// Check scalar options; snap points are checked when the table is resolved
    pub fn validate(&self) -> crate::Result<()> {
        if self.snap_points.is_empty() {
            return Err(crate::Error::Config(
                "at least one snap point is required".to_string(),
            ));
        }
        if !self.container_height.is_finite() || self.container_height <= 0.0 {
            return Err(crate::Error::Config(format!(
                "container_height must be positive, got {}",
                self.container_height
            )));
        }
        if !self.top_inset.is_finite()
            || self.top_inset < 0.0
            || self.top_inset >= self.container_height
        {
            return Err(crate::Error::Config(format!(
                "top_inset must be within [0, container_height), got {}",
                self.top_inset
            )));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(crate::Error::Config(format!(
                "friction must be within [0, 1], got {}",
                self.friction
            )));
        }
        if let Some(rate) = self.deceleration_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(crate::Error::Config(format!(
                    "deceleration_rate must be within [0, 1], got {}",
                    rate
                )));
            }
        }
        self.animation.validate()
    }
}
