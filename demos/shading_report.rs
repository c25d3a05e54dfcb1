use pv_shading::config::EstimatorConfig;
use pv_shading::energy::estimate_with;
use pv_shading::masking::{estimate_masking, masking_report};
use pv_shading::types::{Obstacle, ObstacleKind, SolarContext, Weather};

fn main() -> Result<(), pv_shading::ShadingError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EstimatorConfig::from_file(path)?,
        None => EstimatorConfig::default(),
    };

    let array = config.array_spec(20, Weather::Clear)?;
    let obstacles = [
        Obstacle::new(ObstacleKind::Tree, 4.0, 5.0)?,
        Obstacle::new(ObstacleKind::Building, 6.0, 10.0)?.with_bearing(-20.0)?,
    ];
    let solar = SolarContext::clamped(60.0);

    let energy = estimate_with(&array, &obstacles, &config.household)?;
    let shadow = estimate_masking(&obstacles, &solar, &config.house, &config.household)?;

    println!("=== Shading Report: {} ===", config.site.name);
    println!(
        "Array: {} panels, {:.1} kWp, {:.1} m², weather {}",
        array.panel_count,
        energy.peak_power_kw,
        array.total_area_m2(),
        array.weather
    );
    println!();
    println!("--- Angular loss model ---");
    for (o, loss) in obstacles.iter().zip(&energy.obstacle_losses) {
        println!(
            "{} ({} m at {} m): angle {:.2}°, loss {:.2}%",
            o.kind, o.height_m, o.distance_m, loss.angle_deg, loss.loss_pct
        );
    }
    println!("Production without shade: {:.0} kWh/yr", energy.theoretical_kwh);
    println!("Production with shade: {:.0} kWh/yr", energy.shaded_kwh);
    println!("Shading loss: {:.1}%", energy.loss_pct);
    println!("Self-consumed: {:.0} kWh", energy.self_consumed_kwh);
    println!("Injected: {:.0} kWh", energy.injected_kwh);
    println!("Grid import: {:.0} kWh", energy.grid_import_kwh);
    println!();
    println!("--- Roof masking model ({}° sun) ---", solar.elevation_deg);
    println!(
        "House: roof {} m, ridge {:.2} m",
        config.house.roof_length_m,
        config.house.ridge_height_m()
    );
    for (i, seg) in shadow.segments.iter().enumerate() {
        println!(
            "Shadow {}: {:.2} m starting at {:.2} m",
            i + 1,
            seg.length_m,
            seg.start_m
        );
    }
    let report = masking_report(&shadow, config.household.annual_consumption_kwh);
    println!("Cumulative shadow on roof: {:.2} m", report.total_shadow_m);
    println!("Masking rate: {:.1}%", report.masking_pct);
    println!(
        "Estimated loss: {:.1} kWh/yr of {} kWh",
        report.energy_loss_kwh, config.household.annual_consumption_kwh
    );
    Ok(())
}
