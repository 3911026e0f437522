use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use mob_plotter::config::PlotterConfig;
use mob_plotter::sim::{format_elapsed, ClientEvent, ServerEvent, Simulation};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting mob_plotter simulation driver...");

    let config = match std::env::args().nth(1) {
        Some(path) => match PlotterConfig::load_from_json(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load configuration from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => PlotterConfig::default(),
    };

    let mut simulation = Simulation::new(&config.simulation);
    let start = config.simulation.start.clone();

    for event in [ClientEvent::Init(start.clone()), ClientEvent::Start(start)] {
        match simulation.handle(event) {
            Ok(events) => events.iter().for_each(emit),
            Err(e) => {
                error!("Simulation rejected start-up event: {}", e);
                std::process::exit(1);
            }
        }
    }

    let interval = Duration::from_secs_f64(simulation.tick_interval());
    let mut ticks: u64 = 0;

    while config.simulation.max_ticks.is_none_or(|max| ticks < max) {
        thread::sleep(interval);
        match simulation.tick() {
            Ok(event) => emit(&event),
            Err(e) => {
                warn!("Tick failed, ending run: {}", e);
                break;
            }
        }
        ticks += 1;
    }

    if let Ok(events) = simulation.handle(ClientEvent::Stop) {
        events.iter().for_each(emit);
    }

    let elapsed = simulation.vessel().map(|v| v.elapsed_time).unwrap_or(0.0);
    info!(
        "Run finished after {} ({} ticks), {:.1} m sailed",
        format_elapsed(elapsed),
        ticks,
        simulation.track().total_distance()
    );
}

/// Writes one server event per line on stdout.
fn emit(event: &ServerEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("Failed to encode {} event: {}", event.name(), e),
    }
}
