pub mod angles;
pub mod config;
pub mod energy;
pub mod error;
pub mod masking;
pub mod types;

pub use angles::{obstacle_angle, rise_over_run, shadow_length};

pub use config::{ArraySettings, EstimatorConfig, SiteSettings};

pub use energy::{
    aggregate_loss, consumption_split, estimate, estimate_with, obstacle_loss, shaded_yield,
    theoretical_yield, PER_OBSTACLE_LOSS_CAP_PCT, TOTAL_LOSS_CAP_PCT, WINTER_SUN_THRESHOLD_DEG,
};

pub use error::{Result, ShadingError};

pub use masking::{
    equivalent_loss_kwh, estimate_masking, masking_percentage, masking_report, round_display,
    total_shadow,
};

pub use types::{
    ArraySpec, ConsumptionProfile, EnergyBreakdown, HouseProfile, MaskingReport, Obstacle,
    ObstacleKind, ObstacleLoss, ShadowGeometry, ShadowSegment, SolarContext, Weather,
    MAX_ANNUAL_CONSUMPTION_KWH, MAX_BEARING_DEG, MAX_IRRADIATION_KWH_M2, MAX_MODULE_AREA_M2, MAX_OBSTACLES,
    MAX_OBSTACLE_DISTANCE_M, MAX_OBSTACLE_HEIGHT_M, MAX_PANELS, MAX_PANEL_POWER_KW,
    MAX_ROOF_LENGTH_M, MAX_SOLAR_ELEVATION_DEG, MAX_WALL_HEIGHT_M, MIN_SOLAR_ELEVATION_DEG,
};
