use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::models::{Coordinate, GridPoint};
use crate::engine::projection::{zoom_level_to_factor, ProjectionContext, Viewport};
use crate::sim::events::StartPosition;

/// Top-level configuration of the plotter. Every field falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    pub viewport: ViewportConfig,
    pub simulation: SimulationConfig,
}

/// Canvas geometry and how much of the sea it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub label_width: f64,
    pub label_height: f64,
    /// Whole minutes of arc spanning the drawable area on each axis
    pub visible_minutes: f64,
    pub zoom_level: f64,
    /// Pan offset in pixels
    pub offset: GridPoint,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 10.0,
            label_width: 80.0,
            label_height: 20.0,
            visible_minutes: 3.0,
            zoom_level: 1.0,
            offset: GridPoint::ZERO,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
            padding: self.padding,
            label_width: self.label_width,
            label_height: self.label_height,
        }
    }

    /// Projection centred on `reference` with densities fitted to the viewport.
    pub fn projection_context(&self, reference: Coordinate) -> ProjectionContext {
        let viewport = self.viewport();
        ProjectionContext {
            reference,
            pixels_per_lat_second: viewport.pixels_per_lat_second(self.visible_minutes),
            pixels_per_long_second: viewport.pixels_per_long_second(self.visible_minutes),
            offset: self.offset,
            zoom_factor: zoom_level_to_factor(self.zoom_level),
        }
    }

    fn has_drawable_area(&self) -> bool {
        let bounds = self.viewport().bounds();
        self.padding >= 0.0
            && self.label_width >= 0.0
            && self.label_height >= 0.0
            && bounds.width() > 0.0
            && bounds.height() > 0.0
    }

    /// Grid subdivisions per minute, one per zoom level.
    pub fn subdivisions(&self) -> u32 {
        self.zoom_level.round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start: StartPosition,
    pub tick_interval_secs: f64,
    /// Largest heading change (degrees, either way) applied by one wander step; 0 disables wander
    pub max_bearing_wander: u32,
    /// Upper bound of the random delay between two heading changes
    pub max_wander_interval_secs: f64,
    /// Fixes the RNG for reproducible runs
    pub seed: Option<u64>,
    /// Stop the driver after this many ticks; run until interrupted when unset
    pub max_ticks: Option<u64>,
    /// Oldest track points are dropped beyond this many; unbounded when unset
    pub max_track_points: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: StartPosition::default(),
            tick_interval_secs: 1.0,
            max_bearing_wander: 120,
            max_wander_interval_secs: 5.0,
            seed: None,
            max_ticks: None,
            // A day of one-second ticks
            max_track_points: Some(86_400),
        }
    }
}

impl PlotterConfig {
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Loading plotter configuration from: {:?}", path.as_ref());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: PlotterConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replaces values the engine cannot work with by their defaults.
    fn sanitized(mut self) -> Self {
        let viewport_defaults = ViewportConfig::default();
        let simulation_defaults = SimulationConfig::default();

        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            warn!(
                "Invalid viewport size {}x{}, falling back to {}x{}",
                self.viewport.width, self.viewport.height, viewport_defaults.width, viewport_defaults.height
            );
            self.viewport.width = viewport_defaults.width;
            self.viewport.height = viewport_defaults.height;
        }
        if !self.viewport.has_drawable_area() {
            warn!(
                "Padding {} and label size {}x{} leave no drawable area in {}x{}, falling back to {} and {}x{}",
                self.viewport.padding,
                self.viewport.label_width,
                self.viewport.label_height,
                self.viewport.width,
                self.viewport.height,
                viewport_defaults.padding,
                viewport_defaults.label_width,
                viewport_defaults.label_height
            );
            self.viewport.padding = viewport_defaults.padding;
            self.viewport.label_width = viewport_defaults.label_width;
            self.viewport.label_height = viewport_defaults.label_height;
        }
        if !self.viewport.has_drawable_area() {
            warn!(
                "Viewport {}x{} too small for its labels, falling back to {}x{}",
                self.viewport.width, self.viewport.height, viewport_defaults.width, viewport_defaults.height
            );
            self.viewport.width = viewport_defaults.width;
            self.viewport.height = viewport_defaults.height;
        }
        if !(self.viewport.visible_minutes > 0.0) {
            warn!("Invalid visible_minutes {}, falling back to {}", self.viewport.visible_minutes, viewport_defaults.visible_minutes);
            self.viewport.visible_minutes = viewport_defaults.visible_minutes;
        }
        if !(self.viewport.zoom_level >= 1.0) {
            warn!("Invalid zoom_level {}, falling back to 1", self.viewport.zoom_level);
            self.viewport.zoom_level = 1.0;
        }
        if !(self.simulation.tick_interval_secs > 0.0 && self.simulation.tick_interval_secs.is_finite()) {
            warn!(
                "Invalid tick_interval_secs {}, falling back to {}",
                self.simulation.tick_interval_secs, simulation_defaults.tick_interval_secs
            );
            self.simulation.tick_interval_secs = simulation_defaults.tick_interval_secs;
        }
        if self.simulation.max_bearing_wander > 180 {
            warn!("max_bearing_wander {} exceeds 180, clamping", self.simulation.max_bearing_wander);
            self.simulation.max_bearing_wander = 180;
        }
        if !(self.simulation.max_wander_interval_secs >= 0.0 && self.simulation.max_wander_interval_secs.is_finite()) {
            warn!(
                "Invalid max_wander_interval_secs {}, falling back to {}",
                self.simulation.max_wander_interval_secs, simulation_defaults.max_wander_interval_secs
            );
            self.simulation.max_wander_interval_secs = simulation_defaults.max_wander_interval_secs;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::projection::project;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = PlotterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PlotterConfig::default());
        assert_eq!(config.simulation.tick_interval_secs, 1.0);
        assert_eq!(config.simulation.max_bearing_wander, 120);
        assert_eq!(config.viewport.visible_minutes, 3.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = PlotterConfig::from_json_str(
            r#"{
                "viewport": { "width": 1024, "zoom_level": 3, "offset": { "x": 12, "y": -4 } },
                "simulation": {
                    "start": { "position": { "lat": -33.5, "long": -70.6 }, "heading": 270, "speed": 3 },
                    "seed": 7,
                    "max_ticks": 10
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.viewport.width, 1024.0);
        assert_eq!(config.viewport.height, 600.0);
        assert_eq!(config.viewport.offset, GridPoint::new(12.0, -4.0));
        assert_eq!(config.viewport.subdivisions(), 3);
        assert_eq!(config.simulation.start.position, Coordinate::new(-33.5, -70.6));
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.max_ticks, Some(10));
        assert_eq!(config.simulation.max_wander_interval_secs, 5.0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = PlotterConfig::from_json_str(
            r#"{
                "viewport": { "width": 0, "visible_minutes": -1, "zoom_level": 0.2 },
                "simulation": { "tick_interval_secs": 0, "max_bearing_wander": 500, "max_wander_interval_secs": -3 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.viewport.width, 800.0);
        assert_eq!(config.viewport.visible_minutes, 3.0);
        assert_eq!(config.viewport.zoom_level, 1.0);
        assert_eq!(config.simulation.tick_interval_secs, 1.0);
        assert_eq!(config.simulation.max_bearing_wander, 180);
        assert_eq!(config.simulation.max_wander_interval_secs, 5.0);
    }

    #[test]
    fn test_margins_leaving_no_drawable_area_fall_back() {
        let config = PlotterConfig::from_json_str(r#"{"viewport": {"padding": 400}}"#).unwrap();
        assert_eq!(config.viewport.padding, 10.0);
        assert!(config.viewport.viewport().bounds().width() > 0.0);

        let config = PlotterConfig::from_json_str(r#"{"viewport": {"label_height": -5}}"#).unwrap();
        assert_eq!(config.viewport.label_height, 20.0);

        // Default labels still do not fit a 50x40 canvas
        let config = PlotterConfig::from_json_str(r#"{"viewport": {"width": 50, "height": 40}}"#).unwrap();
        assert_eq!((config.viewport.width, config.viewport.height), (800.0, 600.0));

        let ctx = config.viewport.projection_context(Coordinate::new(52.95, 4.78));
        assert!(ctx.pixels_per_lat_second > 0.0 && ctx.pixels_per_long_second > 0.0);
    }

    #[test]
    fn test_track_limit() {
        assert_eq!(PlotterConfig::default().simulation.max_track_points, Some(86_400));
        let config = PlotterConfig::from_json_str(r#"{"simulation": {"max_track_points": null}}"#).unwrap();
        assert_eq!(config.simulation.max_track_points, None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(PlotterConfig::from_json_str("{ not json").is_err());
        assert!(PlotterConfig::from_json_str(r#"{"viewport": {"width": "wide"}}"#).is_err());
    }

    #[test]
    fn test_load_from_json_file() {
        let path = std::env::temp_dir().join(format!("mob_plotter_config_{}.json", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            write!(file, r#"{{"simulation": {{"tick_interval_secs": 0.5}}}}"#).unwrap();
        }
        let config = PlotterConfig::load_from_json(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.simulation.tick_interval_secs, 0.5);

        assert!(PlotterConfig::load_from_json(&path).is_err());
    }

    #[test]
    fn test_projection_context_fits_visible_minutes() {
        let viewport = ViewportConfig::default();
        let reference = Coordinate::new(52.95, 4.78);
        let ctx = viewport.projection_context(reference);

        assert!((ctx.pixels_per_lat_second - 570.0 / 180.0).abs() < 1e-12);
        assert!((ctx.pixels_per_long_second - 700.0 / 180.0).abs() < 1e-12);
        assert_eq!(ctx.zoom_factor, 1.0);

        // 90 arc-seconds east lands on the right-hand edge of the drawable area
        let east = project(&Coordinate::new(52.95, 4.78 + 90.0 / 3600.0), &ctx);
        assert_eq!(east.x, 350.0);
    }

    #[test]
    fn test_subdivisions_follow_zoom() {
        let mut viewport = ViewportConfig::default();
        assert_eq!(viewport.subdivisions(), 1);
        viewport.zoom_level = 4.0;
        assert_eq!(viewport.subdivisions(), 4);
    }
}
