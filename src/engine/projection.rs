//! Grid projection: places geographic coordinates on the navigator's plotting grid.
//!
//! Positions are expressed as arc-seconds past the whole degree of each axis
//! and scaled by per-axis pixel densities, so the projection is only valid
//! while the reference and the position share the same whole degree (the
//! plotting grid covers a few nautical miles). Antimeridian and polar
//! wraparound are not handled. The hemisphere sign is dropped by the DMS
//! conversion, which mirrors the x axis west of Greenwich and the y axis
//! south of the equator.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::constants::{PIXELS_PER_LAT_SECOND, PIXELS_PER_LONG_SECOND, SECONDS_PER_MINUTE};
use crate::engine::dms::{from_dms, to_dms};
use crate::engine::models::{Coordinate, Dms, GridPoint};

/// Maps a UI zoom level (1, 2, 3, ...) to the factor applied to pixel densities.
pub fn zoom_level_to_factor(zoom_level: f64) -> f64 {
    1.0 + (zoom_level - 1.0) / 2.0
}

/// Inverse of [`zoom_level_to_factor`].
pub fn zoom_factor_to_level(zoom_factor: f64) -> f64 {
    1.0 + (zoom_factor - 1.0) * 2.0
}

/// Everything needed to place a coordinate on the grid. Built per call by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionContext {
    /// Coordinate drawn at the canvas centre (before panning)
    pub reference: Coordinate,
    pub pixels_per_lat_second: f64,
    pub pixels_per_long_second: f64,
    /// Pan offset, added after zoom scaling
    pub offset: GridPoint,
    pub zoom_factor: f64,
}

impl ProjectionContext {
    /// A context using the default grid densities, no pan and no zoom.
    pub fn new(reference: Coordinate) -> Self {
        Self {
            reference,
            pixels_per_lat_second: PIXELS_PER_LAT_SECOND,
            pixels_per_long_second: PIXELS_PER_LONG_SECOND,
            offset: GridPoint::ZERO,
            zoom_factor: 1.0,
        }
    }

    pub fn with_densities(mut self, pixels_per_lat_second: f64, pixels_per_long_second: f64) -> Self {
        self.pixels_per_lat_second = pixels_per_lat_second;
        self.pixels_per_long_second = pixels_per_long_second;
        self
    }

    pub fn with_offset(mut self, offset: GridPoint) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_zoom_level(mut self, zoom_level: f64) -> Self {
        self.zoom_factor = zoom_level_to_factor(zoom_level);
        self
    }

    pub fn zoom_level(&self) -> f64 {
        zoom_factor_to_level(self.zoom_factor)
    }
}

/// Projects `position` to a pixel offset from the canvas origin.
///
/// Composition is `round(arc_seconds * density * zoom) + offset`; latitude is
/// inverted because the pixel space grows downwards.
pub fn project(position: &Coordinate, ctx: &ProjectionContext) -> GridPoint {
    let position_lat = to_dms(position.lat);
    let position_long = to_dms(position.long);
    let reference_lat = to_dms(ctx.reference.lat);
    let reference_long = to_dms(ctx.reference.long);

    let long_seconds_diff = position_long.seconds_past_degree() - reference_long.seconds_past_degree();
    let lat_seconds_diff = reference_lat.seconds_past_degree() - position_lat.seconds_past_degree();

    let x = (long_seconds_diff * ctx.pixels_per_long_second * ctx.zoom_factor).round();
    let y = (lat_seconds_diff * ctx.pixels_per_lat_second * ctx.zoom_factor).round();

    GridPoint {
        x: x + ctx.offset.x,
        y: y + ctx.offset.y,
    }
}

/// Inverse of [`project`] for positions in the reference's degree cell.
///
/// The recovered arc-seconds are cascaded onto the reference's whole degree and
/// the reference's hemisphere sign is reapplied.
pub fn unproject(point: &GridPoint, ctx: &ProjectionContext) -> Coordinate {
    let long_seconds_diff = (point.x - ctx.offset.x) / ctx.zoom_factor / ctx.pixels_per_long_second;
    let lat_seconds_diff = (point.y - ctx.offset.y) / ctx.zoom_factor / ctx.pixels_per_lat_second;

    let reference_lat = to_dms(ctx.reference.lat);
    let reference_long = to_dms(ctx.reference.long);

    let lat = Dms::from_arc_seconds(
        reference_lat.degrees,
        reference_lat.seconds_past_degree() - lat_seconds_diff,
    );
    let long = Dms::from_arc_seconds(
        reference_long.degrees,
        reference_long.seconds_past_degree() + long_seconds_diff,
    );

    Coordinate {
        lat: with_sign_of(from_dms(&lat), ctx.reference.lat),
        long: with_sign_of(from_dms(&long), ctx.reference.long),
    }
}

fn with_sign_of(absolute: f64, reference: f64) -> f64 {
    if reference.is_sign_negative() {
        -absolute
    } else {
        absolute
    }
}

/// Projects every point of a track polyline.
pub fn project_track(points: &[Coordinate], ctx: &ProjectionContext) -> Vec<GridPoint> {
    points.par_iter().map(|point| project(point, ctx)).collect()
}

/// Axis of the plotting grid. Latitude lines are horizontal, longitude lines vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAxis {
    Latitude,
    Longitude,
}

/// Drawable region relative to the canvas centre, in pixels (top/left are negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl CanvasBounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Inclusive check that `point` lies inside `bounds`.
pub fn fits_within_bounds(point: &GridPoint, bounds: &CanvasBounds) -> bool {
    point.x >= bounds.left && point.x <= bounds.right && point.y >= bounds.top && point.y <= bounds.bottom
}

/// Canvas dimensions and label metrics the grid is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub label_width: f64,
    pub label_height: f64,
}

impl Viewport {
    /// Bounds leave room for latitude labels on the left and longitude labels at the bottom.
    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds {
            top: -(self.height / 2.0 - self.padding),
            right: self.width / 2.0 - self.padding,
            bottom: self.height / 2.0 - self.label_height,
            left: -(self.width / 2.0 - self.padding - self.label_width),
        }
    }

    /// Whether a grid-line label at `position` along `axis` can be drawn without clipping.
    ///
    /// `position` is a y offset for latitude lines and an x offset for longitude lines.
    pub fn label_fits_within_bounds(&self, axis: GridAxis, position: f64) -> bool {
        let bounds = self.bounds();
        match axis {
            GridAxis::Latitude => position >= bounds.top && position <= bounds.bottom - self.label_height,
            GridAxis::Longitude => {
                position >= bounds.left - self.label_width / 2.0
                    && position <= bounds.right - self.label_width / 2.0
            }
        }
    }

    /// Pixel density that fits `visible_minutes` of latitude into the drawable height.
    pub fn pixels_per_lat_second(&self, visible_minutes: f64) -> f64 {
        self.bounds().height() / (visible_minutes * SECONDS_PER_MINUTE)
    }

    /// Pixel density that fits `visible_minutes` of longitude into the drawable width.
    pub fn pixels_per_long_second(&self, visible_minutes: f64) -> f64 {
        self.bounds().width() / (visible_minutes * SECONDS_PER_MINUTE)
    }
}

/// Screen direction (degrees clockwise from up, [0, 360)) from the canvas centre
/// towards a point that has left the drawable area, or `None` while it is visible.
pub fn off_grid_direction(point: &GridPoint, bounds: &CanvasBounds) -> Option<f64> {
    if fits_within_bounds(point, bounds) {
        return None;
    }
    Some(point.x.atan2(-point.y).to_degrees().rem_euclid(360.0))
}
