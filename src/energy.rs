//! Annual energy yield of the array and the angular shading-loss model.
//!
//! Each obstacle is reduced to the angle of its top above the horizon as
//! seen from the array. Angles at or below the winter-sun threshold cost
//! nothing; above it the loss grows linearly up to a per-obstacle cap, and
//! the sum over all obstacles is capped again.

use log::{debug, trace, warn};

use crate::error::Result;
use crate::types::{
    validate_obstacles, ArraySpec, ConsumptionProfile, EnergyBreakdown, Obstacle, ObstacleLoss,
};

/// Obstacles whose top sits at or below this angle cast no loss.
pub const WINTER_SUN_THRESHOLD_DEG: f64 = 6.0;
pub const PER_OBSTACLE_LOSS_CAP_PCT: f64 = 25.0;
pub const TOTAL_LOSS_CAP_PCT: f64 = 60.0;

/// Unshaded annual production (kWh/yr).
pub fn theoretical_yield(array: &ArraySpec) -> f64 {
    array.peak_power_kw() * array.irradiation_kwh_m2 * array.derate * array.weather.factor()
}

/// Loss in percentage points caused by one obstacle at `angle_deg`.
pub fn obstacle_loss(angle_deg: f64) -> f64 {
    if angle_deg <= WINTER_SUN_THRESHOLD_DEG {
        0.0
    } else {
        (angle_deg / 90.0 * PER_OBSTACLE_LOSS_CAP_PCT).min(PER_OBSTACLE_LOSS_CAP_PCT)
    }
}

pub fn aggregate_loss<I>(contributions: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    contributions
        .into_iter()
        .fold(0.0, |acc, pct| acc + pct)
        .clamp(0.0, TOTAL_LOSS_CAP_PCT)
}

pub fn shaded_yield(theoretical_kwh: f64, loss_pct: f64) -> f64 {
    theoretical_kwh * (1.0 - loss_pct / 100.0)
}

/// Splits the shaded production into (self-consumed, injected, grid import).
pub fn consumption_split(shaded_kwh: f64, profile: &ConsumptionProfile) -> (f64, f64, f64) {
    let demand = profile.annual_consumption_kwh;
    let self_consumed = demand.min(shaded_kwh) * profile.self_consumption_efficiency;
    let injected = (shaded_kwh - self_consumed).max(0.0);
    let grid_import = (demand - self_consumed).max(0.0);
    (self_consumed, injected, grid_import)
}

pub fn estimate(array: &ArraySpec, obstacles: &[Obstacle]) -> Result<EnergyBreakdown> {
    estimate_with(array, obstacles, &ConsumptionProfile::default())
}

pub fn estimate_with(
    array: &ArraySpec,
    obstacles: &[Obstacle],
    profile: &ConsumptionProfile,
) -> Result<EnergyBreakdown> {
    array.validate()?;
    validate_obstacles(obstacles)?;
    profile.validate()?;

    let obstacle_losses: Vec<ObstacleLoss> = obstacles
        .iter()
        .map(|o| {
            let angle_deg = o.angle_deg();
            let loss_pct = obstacle_loss(angle_deg);
            trace!(
                "{} h={} m d={} m: angle {:.2}°, loss {:.2}%",
                o.kind, o.height_m, o.distance_m, angle_deg, loss_pct
            );
            ObstacleLoss {
                angle_deg,
                loss_pct,
            }
        })
        .collect();

    let raw_loss: f64 = obstacle_losses.iter().map(|l| l.loss_pct).sum();
    let loss_pct = aggregate_loss(obstacle_losses.iter().map(|l| l.loss_pct));
    if raw_loss > TOTAL_LOSS_CAP_PCT {
        warn!(
            "shading loss {:.1}% capped at {}%",
            raw_loss, TOTAL_LOSS_CAP_PCT
        );
    }

    let theoretical_kwh = theoretical_yield(array);
    let shaded_kwh = shaded_yield(theoretical_kwh, loss_pct);
    let (self_consumed_kwh, injected_kwh, grid_import_kwh) =
        consumption_split(shaded_kwh, profile);

    debug!(
        "{} panels ({}), {} obstacles: theoretical {:.1} kWh, loss {:.2}%, shaded {:.1} kWh",
        array.panel_count,
        array.weather,
        obstacles.len(),
        theoretical_kwh,
        loss_pct,
        shaded_kwh
    );

    Ok(EnergyBreakdown {
        peak_power_kw: array.peak_power_kw(),
        theoretical_kwh,
        loss_pct,
        shaded_kwh,
        self_consumed_kwh,
        injected_kwh,
        grid_import_kwh,
        obstacle_losses,
    })
}
