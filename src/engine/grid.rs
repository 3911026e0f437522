//! Grid-line placement for the plotting canvas.
//!
//! Lines sit on whole minutes of arc, anchored at the minute closest to the
//! projection reference and swept outwards until they leave the viewport.
//! Each minute can be split into subdivisions (conventionally as many as the
//! zoom level). Every line is placed through [`project`] so it agrees with
//! the ship glyph and track drawn on top of it.

use serde::{Deserialize, Serialize};

use crate::engine::constants::{SECONDS_PER_DEGREE, SECONDS_PER_MINUTE};
use crate::engine::dms::{dd_to_dms_formatted, format_dms, from_dms, to_dms};
use crate::engine::minutes::closest_minute;
use crate::engine::models::{Coordinate, Dms, GridPoint};
use crate::engine::projection::{
    fits_within_bounds, project, CanvasBounds, GridAxis, ProjectionContext, Viewport,
};

/// Upper bound on whole-minute lines considered on each side of the anchor.
pub const MAX_LINES_PER_SIDE: i32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLineKind {
    Minute,
    Subdivision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub axis: GridAxis,
    pub kind: GridLineKind,
    /// Pixel offset along the axis: y for latitude lines, x for longitude lines
    pub position: f64,
    /// Decimal degrees the line marks
    pub degrees: f64,
    /// DMS label, present only when it fits inside the viewport
    pub label: Option<String>,
}

/// Computes the minute and subdivision lines of one axis that fall inside the viewport.
pub fn grid_lines(
    axis: GridAxis,
    ctx: &ProjectionContext,
    viewport: &Viewport,
    subdivisions: u32,
) -> Vec<GridLine> {
    let bounds = viewport.bounds();
    let center = axis_value(axis, &ctx.reference);
    let sign = if center.is_sign_negative() { -1.0 } else { 1.0 };

    let anchor = axis_position(axis, ctx, minute_from_anchor(center, 0));
    let reach = minute_reach(axis, ctx, &bounds, anchor);

    let mut lines = Vec::new();

    for k in -reach..=reach {
        let degrees = minute_from_anchor(center, k);
        let position = axis_position(axis, ctx, degrees);
        if axis_fits(axis, position, &bounds) {
            lines.push(GridLine {
                axis,
                kind: GridLineKind::Minute,
                position,
                degrees,
                label: label_if_fits(viewport, axis, position, || dd_to_dms_formatted(degrees, 2)),
            });
        }
    }

    if subdivisions == 0 {
        return lines;
    }

    let seconds_per_subdivision = SECONDS_PER_MINUTE / (subdivisions + 1) as f64;

    for k in (-reach - 1)..=reach {
        let minute = to_dms(minute_from_anchor(center, k));
        for i in 1..=subdivisions {
            let seconds = seconds_per_subdivision * i as f64;
            let degrees = sign * (from_dms(&minute) + seconds / SECONDS_PER_DEGREE);
            let position = axis_position(axis, ctx, degrees);
            if !axis_fits(axis, position, &bounds) {
                continue;
            }

            let dms = Dms::new(minute.degrees, minute.minutes, seconds).normalized();
            lines.push(GridLine {
                axis,
                kind: GridLineKind::Subdivision,
                position,
                degrees,
                label: label_if_fits(viewport, axis, position, || format_dms(&dms, 0)),
            });
        }
    }

    lines
}

/// The whole minute `k` minutes away from the minute closest to `center`, in
/// `center`'s hemisphere. Unlike [`closest_minute`] with an offset, this also
/// steps when `center` already sits on a whole minute.
fn minute_from_anchor(center: f64, k: i32) -> f64 {
    let anchor = to_dms(closest_minute(center, 0));
    let stepped = from_dms(&Dms::new(anchor.degrees, anchor.minutes + k, 0.0).normalized());
    if center.is_sign_negative() { -stepped } else { stepped }
}

fn axis_value(axis: GridAxis, coord: &Coordinate) -> f64 {
    match axis {
        GridAxis::Latitude => coord.lat,
        GridAxis::Longitude => coord.long,
    }
}

/// Pixel position of the line marking `degrees` on `axis`.
fn axis_position(axis: GridAxis, ctx: &ProjectionContext, degrees: f64) -> f64 {
    match axis {
        GridAxis::Latitude => project(&Coordinate::new(degrees, ctx.reference.long), ctx).y,
        GridAxis::Longitude => project(&Coordinate::new(ctx.reference.lat, degrees), ctx).x,
    }
}

fn axis_fits(axis: GridAxis, position: f64, bounds: &CanvasBounds) -> bool {
    let sample = match axis {
        GridAxis::Latitude => GridPoint::new(bounds.left, position),
        GridAxis::Longitude => GridPoint::new(position, bounds.top),
    };
    fits_within_bounds(&sample, bounds)
}

/// How many whole minutes either side of the anchor can still land in the viewport.
fn minute_reach(axis: GridAxis, ctx: &ProjectionContext, bounds: &CanvasBounds, anchor: f64) -> i32 {
    let (pixels_per_second, low, high) = match axis {
        GridAxis::Latitude => (ctx.pixels_per_lat_second, bounds.top, bounds.bottom),
        GridAxis::Longitude => (ctx.pixels_per_long_second, bounds.left, bounds.right),
    };
    let pixels_per_minute = (pixels_per_second * ctx.zoom_factor * SECONDS_PER_MINUTE).abs();

    if !pixels_per_minute.is_finite() || pixels_per_minute < f64::EPSILON {
        return 0;
    }

    let towards_low = ((anchor - low) / pixels_per_minute).ceil() + 1.0;
    let towards_high = ((high - anchor) / pixels_per_minute).ceil() + 1.0;
    let reach = towards_low.max(towards_high);

    if reach.is_nan() {
        return 0;
    }
    reach.clamp(0.0, MAX_LINES_PER_SIDE as f64) as i32
}

fn label_if_fits(
    viewport: &Viewport,
    axis: GridAxis,
    position: f64,
    label: impl FnOnce() -> String,
) -> Option<String> {
    viewport.label_fits_within_bounds(axis, position).then(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            width: 800.0,
            height: 600.0,
            padding: 10.0,
            label_width: 80.0,
            label_height: 20.0,
        }
    }

    /// Three visible minutes across the drawable area, as the plotter configures it.
    fn context(reference: Coordinate) -> ProjectionContext {
        let vp = viewport();
        ProjectionContext::new(reference).with_densities(vp.pixels_per_lat_second(3.0), vp.pixels_per_long_second(3.0))
    }

    fn positions(lines: &[GridLine], kind: GridLineKind) -> Vec<f64> {
        let mut positions: Vec<f64> = lines.iter().filter(|l| l.kind == kind).map(|l| l.position).collect();
        positions.sort_by(|a, b| a.total_cmp(b));
        positions
    }

    #[test]
    fn test_latitude_minute_lines() {
        let ctx = context(Coordinate::new(52.95, 4.78));
        let lines = grid_lines(GridAxis::Latitude, &ctx, &viewport(), 0);

        assert_eq!(positions(&lines, GridLineKind::Minute), vec![-190.0, 0.0, 190.0]);
        assert!(positions(&lines, GridLineKind::Subdivision).is_empty());

        let label_at = |position: f64| {
            lines
                .iter()
                .find(|l| l.position == position)
                .and_then(|l| l.label.clone())
        };
        // North is up: the line above the centre is the next minute of latitude
        assert_eq!(label_at(-190.0).as_deref(), Some("052° 58' 0\""));
        assert_eq!(label_at(0.0).as_deref(), Some("052° 57' 0\""));
        assert_eq!(label_at(190.0).as_deref(), Some("052° 56' 0\""));
    }

    #[test]
    fn test_latitude_subdivision_lines() {
        let ctx = context(Coordinate::new(52.95, 4.78));
        let lines = grid_lines(GridAxis::Latitude, &ctx, &viewport(), 1);

        assert_eq!(positions(&lines, GridLineKind::Subdivision), vec![-285.0, -95.0, 95.0]);

        let half_past = lines
            .iter()
            .find(|l| l.kind == GridLineKind::Subdivision && l.position == -95.0)
            .unwrap();
        assert_eq!(half_past.label.as_deref(), Some("052° 57' 30\""));
        assert!((half_past.degrees - (52.0 + 57.5 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_longitude_lines_anchor_on_closest_minute() {
        // 4°46'48" snaps to 4°47'
        let ctx = context(Coordinate::new(52.95, 4.78));
        let lines = grid_lines(GridAxis::Longitude, &ctx, &viewport(), 0);

        assert_eq!(positions(&lines, GridLineKind::Minute), vec![-187.0, 47.0, 280.0]);
        let labels: Vec<_> = lines.iter().filter_map(|l| l.label.clone()).collect();
        assert!(labels.contains(&"004° 46' 0\"".to_string()));
        assert!(labels.contains(&"004° 47' 0\"".to_string()));
        assert!(labels.contains(&"004° 48' 0\"".to_string()));
    }

    #[test]
    fn test_subdivision_labels_cascade() {
        let ctx = context(Coordinate::new(52.95, 4.78)).with_zoom_level(3.0);
        let lines = grid_lines(GridAxis::Longitude, &ctx, &viewport(), 3);

        for line in lines.iter().filter(|l| l.kind == GridLineKind::Subdivision) {
            if let Some(label) = &line.label {
                assert!(!label.contains(" 60'") && !label.contains(" 60\""), "{label}");
                assert!(label.ends_with("15\"") || label.ends_with("30\"") || label.ends_with("45\""), "{label}");
            }
        }
    }

    #[test]
    fn test_all_lines_fit_and_labels_follow_bounds() {
        let vp = viewport();
        let bounds = vp.bounds();
        let ctx = context(Coordinate::new(52.9513, 4.7812))
            .with_offset(GridPoint::new(1000.0, -40.0))
            .with_zoom_level(2.0);

        for axis in [GridAxis::Latitude, GridAxis::Longitude] {
            let lines = grid_lines(axis, &ctx, &vp, 2);
            assert!(!lines.is_empty(), "{axis:?}");
            for line in &lines {
                let (low, high) = match axis {
                    GridAxis::Latitude => (bounds.top, bounds.bottom),
                    GridAxis::Longitude => (bounds.left, bounds.right),
                };
                assert!(line.position >= low && line.position <= high, "{line:?}");
                assert_eq!(line.label.is_some(), vp.label_fits_within_bounds(axis, line.position));
            }
        }
    }

    #[test]
    fn test_minute_from_anchor_steps_from_exact_minute() {
        let whole = 4.0 + 59.0 / 60.0;
        assert!((minute_from_anchor(whole, 1) - 5.0).abs() < 1e-12);
        assert!((minute_from_anchor(whole, -2) - (4.0 + 57.0 / 60.0)).abs() < 1e-12);
        assert!((minute_from_anchor(-whole, 1) - -5.0).abs() < 1e-12);
        // 52°57'10" anchors on 52°57'
        let dd = 52.0 + 57.0 / 60.0 + 10.0 / 3600.0;
        assert!((minute_from_anchor(dd, 2) * 60.0 - (52.0 * 60.0 + 59.0)).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_zoom_terminates() {
        let mut ctx = context(Coordinate::new(52.95, 4.78));
        ctx.zoom_factor = 0.0;
        let lines = grid_lines(GridAxis::Longitude, &ctx, &viewport(), 4);
        assert_eq!(lines.iter().filter(|l| l.kind == GridLineKind::Minute).count(), 1);
    }
}
