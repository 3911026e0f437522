use mob_plotter::config::PlotterConfig;
use mob_plotter::engine::bearing::unwrapped_bearing;
use mob_plotter::engine::dms::dd_to_dms_formatted;
use mob_plotter::engine::grid::{grid_lines, GridLineKind};
use mob_plotter::engine::minutes::closest_minute;
use mob_plotter::engine::projection::{off_grid_direction, project, GridAxis};
use mob_plotter::sim::{format_elapsed, ServerEvent, Simulation};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("--- MOB Plotter Track Debugger ---");

    // 1. Setup
    let mut config = PlotterConfig::default();
    config.simulation.seed = Some(7);
    config.simulation.start.speed = 12.0;

    let start = config.simulation.start.clone();
    let viewport = config.viewport.viewport();
    let bounds = viewport.bounds();
    // The man-overboard mark stays at the start position
    let ctx = config.viewport.projection_context(start.position);

    println!(
        "Start: {} N, {} E, heading {}, {} kn",
        dd_to_dms_formatted(start.position.lat, 2),
        dd_to_dms_formatted(start.position.long, 2),
        start.heading,
        start.speed
    );

    let mut simulation = Simulation::new(&config.simulation);
    simulation.handle_json(&format!(r#"{{"event":"init","payload":{}}}"#, serde_json::to_string(&start)?))?;
    let mut events = simulation.handle_json(&format!(r#"{{"event":"start","payload":{}}}"#, serde_json::to_string(&start)?))?;

    // 2. Run Steps
    let mut needle = start.heading;
    for step in 1..=10 {
        let start_time = Instant::now();
        println!("\n--- Step {} ---", step);

        for event in &events {
            if let ServerEvent::Position(payload) = event {
                let point = project(&payload.position, &ctx);
                needle = unwrapped_bearing(needle, payload.heading);

                println!(
                    "Lat: {}, Long: {} (closest minute {})",
                    dd_to_dms_formatted(payload.position.lat, 2),
                    dd_to_dms_formatted(payload.position.long, 2),
                    dd_to_dms_formatted(closest_minute(payload.position.long, 0), 0)
                );
                println!(
                    "Grid: ({}, {}), heading {}, needle {}, distance {:.1} m, elapsed {}",
                    point.x,
                    point.y,
                    payload.heading,
                    needle,
                    payload.distance,
                    format_elapsed(payload.elapsed)
                );
                if let Some(direction) = off_grid_direction(&point, &bounds) {
                    println!("Vessel off grid, bearing {:.0} from centre", direction);
                }
            }
        }

        events = vec![simulation.tick()?];
        println!("Calculation time: {:?}", start_time.elapsed());
    }

    // 3. Grid
    let subdivisions = config.viewport.subdivisions();
    for axis in [GridAxis::Latitude, GridAxis::Longitude] {
        let lines = grid_lines(axis, &ctx, &viewport, subdivisions);
        let minutes = lines.iter().filter(|l| l.kind == GridLineKind::Minute).count();
        println!("\n{:?}: {} minute lines, {} subdivisions", axis, minutes, lines.len() - minutes);
        for line in &lines {
            if let Some(label) = &line.label {
                println!("  {:>6} {}", line.position, label);
            }
        }
    }

    println!(
        "\nTrack: {} points, {:.1} m sailed",
        simulation.track().len(),
        simulation.track().total_distance()
    );
    println!("Debug completed.");
    Ok(())
}
