//! Shadow-length and roof-masking model.
//!
//! Independent from [`crate::energy`]: shadows are projected from each
//! obstacle height at a single solar elevation, laid end to end from the
//! house edge, and compared to the roof projection length.

use log::{debug, warn};

use crate::angles;
use crate::error::{Result, ShadingError};
use crate::types::{
    validate_obstacles, ConsumptionProfile, HouseProfile, MaskingReport, Obstacle,
    ShadowGeometry, ShadowSegment, SolarContext,
};

pub fn total_shadow(lengths: &[f64], roof_length_m: f64) -> f64 {
    roof_length_m.min(lengths.iter().sum())
}

pub fn masking_percentage(total_shadow_m: f64, roof_length_m: f64) -> f64 {
    total_shadow_m / roof_length_m * 100.0
}

pub fn equivalent_loss_kwh(masking_pct: f64, annual_consumption_kwh: f64) -> f64 {
    masking_pct / 100.0 * annual_consumption_kwh
}

/// Rounds to one decimal place for reporting.
pub fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Printed figures: the masking rate is rounded first and the kWh loss is
/// derived from the rounded rate, then rounded itself.
pub fn masking_report(geometry: &ShadowGeometry, annual_consumption_kwh: f64) -> MaskingReport {
    let masking_pct = round_display(geometry.masking_pct);
    MaskingReport {
        total_shadow_m: geometry.total_shadow_m,
        masking_pct,
        energy_loss_kwh: round_display(equivalent_loss_kwh(masking_pct, annual_consumption_kwh)),
    }
}

fn lay_segments(lengths: &[f64]) -> Vec<ShadowSegment> {
    lengths
        .iter()
        .scan(0.0, |start, &length_m| {
            let segment = ShadowSegment {
                start_m: *start,
                length_m,
            };
            *start += length_m;
            Some(segment)
        })
        .collect()
}

pub fn estimate_masking(
    obstacles: &[Obstacle],
    solar: &SolarContext,
    house: &HouseProfile,
    profile: &ConsumptionProfile,
) -> Result<ShadowGeometry> {
    validate_obstacles(obstacles)?;
    solar.validate()?;
    house.validate()?;
    profile.validate()?;

    let shadow_lengths_m: Vec<f64> = obstacles
        .iter()
        .map(|o| angles::shadow_length(o.height_m, solar.elevation_deg))
        .collect();
    // Elevations a hair above zero still overflow the projection.
    if shadow_lengths_m.iter().any(|l| !l.is_finite()) {
        return Err(ShadingError::InvalidElevation(solar.elevation_deg));
    }

    let total_shadow_m = total_shadow(&shadow_lengths_m, house.roof_length_m);
    let masking_pct = masking_percentage(total_shadow_m, house.roof_length_m);
    let energy_loss_kwh = equivalent_loss_kwh(masking_pct, profile.annual_consumption_kwh);

    if total_shadow_m >= house.roof_length_m {
        warn!(
            "roof fully masked at {}° elevation ({} m of shadow over {} m)",
            solar.elevation_deg,
            shadow_lengths_m.iter().sum::<f64>(),
            house.roof_length_m
        );
    }
    debug!(
        "{} obstacles at {}°: shadow {:.2} m, masking {:.1}%, loss {:.1} kWh",
        obstacles.len(),
        solar.elevation_deg,
        total_shadow_m,
        masking_pct,
        energy_loss_kwh
    );

    Ok(ShadowGeometry {
        segments: lay_segments(&shadow_lengths_m),
        shadow_lengths_m,
        total_shadow_m,
        masking_pct,
        energy_loss_kwh,
    })
}
