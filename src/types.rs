use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::angles;
use crate::error::{Result, ShadingError};

pub const MAX_PANELS: u32 = 25;
pub const MAX_OBSTACLES: usize = 3;
pub const MIN_SOLAR_ELEVATION_DEG: f64 = 5.0;
pub const MAX_SOLAR_ELEVATION_DEG: f64 = 89.9;
pub const MAX_BEARING_DEG: f64 = 90.0;

// Upper bounds keep every derived quantity finite.
pub const MAX_OBSTACLE_HEIGHT_M: f64 = 500.0;
pub const MAX_OBSTACLE_DISTANCE_M: f64 = 5_000.0;
pub const MAX_PANEL_POWER_KW: f64 = 1.0;
pub const MAX_MODULE_AREA_M2: f64 = 5.0;
pub const MAX_IRRADIATION_KWH_M2: f64 = 3_000.0;
pub const MAX_ANNUAL_CONSUMPTION_KWH: f64 = 1_000_000.0;
pub const MAX_ROOF_LENGTH_M: f64 = 100.0;
pub const MAX_WALL_HEIGHT_M: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rainy,
}

impl Weather {
    pub fn factor(self) -> f64 {
        match self {
            Weather::Clear => 1.0,
            Weather::Cloudy => 0.75,
            Weather::Rainy => 0.55,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Cloudy => "cloudy",
            Weather::Rainy => "rainy",
        }
    }
}

impl FromStr for Weather {
    type Err = ShadingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "cloudy" => Ok(Weather::Cloudy),
            "rainy" => Ok(Weather::Rainy),
            other => Err(ShadingError::parameter(
                "weather",
                format!("unknown category `{other}` (expected clear, cloudy or rainy)"),
            )),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Tree,
    Building,
    Wall,
    Hill,
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObstacleKind::Tree => "tree",
            ObstacleKind::Building => "building",
            ObstacleKind::Wall => "wall",
            ObstacleKind::Hill => "hill",
        };
        f.write_str(label)
    }
}

/// Array nameplate and site parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArraySpec {
    pub panel_count: u32,
    /// Rated power per panel (kWp).
    pub panel_power_kw: f64,
    /// Module surface (m²), display only.
    pub module_area_m2: f64,
    /// Site annual irradiation (kWh/m²/yr).
    pub irradiation_kwh_m2: f64,
    /// System derate factor in [0, 1].
    pub derate: f64,
    pub weather: Weather,
}

impl Default for ArraySpec {
    fn default() -> Self {
        Self {
            panel_count: 20,
            panel_power_kw: 0.4,
            module_area_m2: 1.7,
            irradiation_kwh_m2: 1824.0,
            derate: 0.85,
            weather: Weather::Clear,
        }
    }
}

impl ArraySpec {
    /// Array with the default (Marseille) site constants.
    pub fn new(panel_count: u32, weather: Weather) -> Result<Self> {
        let spec = Self {
            panel_count,
            weather,
            ..Self::default()
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn peak_power_kw(&self) -> f64 {
        self.panel_count as f64 * self.panel_power_kw
    }

    pub fn total_area_m2(&self) -> f64 {
        self.panel_count as f64 * self.module_area_m2
    }

    pub fn validate(&self) -> Result<()> {
        if self.panel_count == 0 || self.panel_count > MAX_PANELS {
            return Err(ShadingError::parameter(
                "panel_count",
                format!("{} outside 1..={MAX_PANELS}", self.panel_count),
            ));
        }
        check_bounded("panel_power_kw", self.panel_power_kw, MAX_PANEL_POWER_KW)?;
        check_bounded("module_area_m2", self.module_area_m2, MAX_MODULE_AREA_M2)?;
        check_bounded("irradiation_kwh_m2", self.irradiation_kwh_m2, MAX_IRRADIATION_KWH_M2)?;
        check_fraction("derate", self.derate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub height_m: f64,
    /// Horizontal distance to the array.
    pub distance_m: f64,
    /// Offset from due south, kept for display.
    #[serde(default)]
    pub bearing_deg: Option<f64>,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, height_m: f64, distance_m: f64) -> Result<Self> {
        let obstacle = Self {
            kind,
            height_m,
            distance_m,
            bearing_deg: None,
        };
        obstacle.validate()?;
        Ok(obstacle)
    }

    pub fn with_bearing(mut self, bearing_deg: f64) -> Result<Self> {
        self.bearing_deg = Some(bearing_deg);
        self.validate()?;
        Ok(self)
    }

    /// Elevation of the obstacle top as seen from the array (degrees).
    pub fn angle_deg(&self) -> f64 {
        angles::obstacle_angle(self.height_m, self.distance_m)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.height_m > 0.0 && self.height_m <= MAX_OBSTACLE_HEIGHT_M) {
            return Err(ShadingError::geometry(format!(
                "{} height must lie in (0, {MAX_OBSTACLE_HEIGHT_M}] m, got {} m",
                self.kind, self.height_m
            )));
        }
        if !(self.distance_m > 0.0 && self.distance_m <= MAX_OBSTACLE_DISTANCE_M) {
            return Err(ShadingError::geometry(format!(
                "{} distance must lie in (0, {MAX_OBSTACLE_DISTANCE_M}] m, got {} m",
                self.kind, self.distance_m
            )));
        }
        if let Some(bearing) = self.bearing_deg {
            if !(bearing.is_finite() && bearing.abs() <= MAX_BEARING_DEG) {
                return Err(ShadingError::geometry(format!(
                    "{} bearing {bearing}° outside -90..=90",
                    self.kind
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_obstacles(obstacles: &[Obstacle]) -> Result<()> {
    if obstacles.len() > MAX_OBSTACLES {
        return Err(ShadingError::parameter(
            "obstacles",
            format!("{} given, at most {MAX_OBSTACLES} supported", obstacles.len()),
        ));
    }
    obstacles.iter().try_for_each(Obstacle::validate)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarContext {
    pub elevation_deg: f64,
}

impl SolarContext {
    pub fn new(elevation_deg: f64) -> Result<Self> {
        let ctx = Self { elevation_deg };
        ctx.validate()?;
        Ok(ctx)
    }

    /// Clamps into [`MIN_SOLAR_ELEVATION_DEG`, `MAX_SOLAR_ELEVATION_DEG`].
    /// Non-finite input falls back to the floor.
    pub fn clamped(elevation_deg: f64) -> Self {
        let elevation_deg = if elevation_deg.is_nan() {
            MIN_SOLAR_ELEVATION_DEG
        } else {
            elevation_deg.clamp(MIN_SOLAR_ELEVATION_DEG, MAX_SOLAR_ELEVATION_DEG)
        };
        Self { elevation_deg }
    }

    pub fn validate(&self) -> Result<()> {
        let e = self.elevation_deg;
        if e.is_finite() && e > 0.0 && e < 90.0 {
            Ok(())
        } else {
            Err(ShadingError::InvalidElevation(e))
        }
    }
}

/// Household load the shaded production is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionProfile {
    pub annual_consumption_kwh: f64,
    /// Share of the directly usable production actually self-consumed.
    pub self_consumption_efficiency: f64,
}

impl Default for ConsumptionProfile {
    fn default() -> Self {
        Self {
            annual_consumption_kwh: 8260.0,
            self_consumption_efficiency: 0.9,
        }
    }
}

impl ConsumptionProfile {
    pub fn validate(&self) -> Result<()> {
        check_bounded(
            "annual_consumption_kwh",
            self.annual_consumption_kwh,
            MAX_ANNUAL_CONSUMPTION_KWH,
        )?;
        check_fraction("self_consumption_efficiency", self.self_consumption_efficiency)
    }
}

/// Elevation profile of the house the shadows fall on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseProfile {
    /// Horizontal roof projection length.
    pub roof_length_m: f64,
    pub wall_height_m: f64,
    pub roof_pitch_deg: f64,
}

impl Default for HouseProfile {
    fn default() -> Self {
        Self {
            roof_length_m: 12.0,
            wall_height_m: 2.8,
            roof_pitch_deg: 30.0,
        }
    }
}

impl HouseProfile {
    /// Apex height of a symmetric gable roof.
    pub fn ridge_height_m(&self) -> f64 {
        self.wall_height_m + angles::rise_over_run(self.roof_pitch_deg, self.roof_length_m / 2.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.roof_length_m > 0.0 && self.roof_length_m <= MAX_ROOF_LENGTH_M) {
            return Err(ShadingError::geometry(format!(
                "roof length must lie in (0, {MAX_ROOF_LENGTH_M}] m, got {} m",
                self.roof_length_m
            )));
        }
        check_bounded("wall_height_m", self.wall_height_m, MAX_WALL_HEIGHT_M)?;
        if !(0.0..90.0).contains(&self.roof_pitch_deg) {
            return Err(ShadingError::parameter(
                "roof_pitch_deg",
                format!("{} outside 0..90", self.roof_pitch_deg),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleLoss {
    pub angle_deg: f64,
    pub loss_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBreakdown {
    pub peak_power_kw: f64,
    pub theoretical_kwh: f64,
    pub loss_pct: f64,
    pub shaded_kwh: f64,
    pub self_consumed_kwh: f64,
    pub injected_kwh: f64,
    pub grid_import_kwh: f64,
    /// One entry per input obstacle, in input order.
    pub obstacle_losses: Vec<ObstacleLoss>,
}

/// One projected shadow, placed after the previous ones starting at the house edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSegment {
    pub start_m: f64,
    pub length_m: f64,
}

/// One-decimal figures for a masking summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskingReport {
    pub total_shadow_m: f64,
    pub masking_pct: f64,
    pub energy_loss_kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowGeometry {
    pub shadow_lengths_m: Vec<f64>,
    /// Cumulative shadow, never longer than the roof.
    pub total_shadow_m: f64,
    pub masking_pct: f64,
    pub energy_loss_kwh: f64,
    pub segments: Vec<ShadowSegment>,
}

pub(crate) fn check_bounded(name: &'static str, value: f64, max: f64) -> Result<()> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ShadingError::parameter(name, format!("{value} outside 0..={max}")))
    }
}

pub(crate) fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ShadingError::parameter(name, format!("{value} outside 0..=1")))
    }
}
